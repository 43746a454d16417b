use chrono::{DateTime, Utc};
use std::{
    fs::{DirEntry, Metadata},
    path::PathBuf,
};

/// A directory child as seen by one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Real path on disk, used for deletion.
    pub path: PathBuf,
    /// Lossy UTF-8 rendering of the file name, used for filtering and display.
    pub name: String,
    pub extension: String,
    /// Last modification in unix seconds, negative before the epoch.
    pub modified: i64,
    pub is_dir: bool,
}

impl FileEntry {
    pub fn new(path: PathBuf, modified: i64, is_dir: bool) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = extension_of(&name).to_string();
        FileEntry {
            path,
            name,
            extension,
            modified,
            is_dir,
        }
    }

    pub(crate) fn from_dir_entry(entry: &DirEntry, metadata: &Metadata) -> std::io::Result<Self> {
        let modified = DateTime::<Utc>::from(metadata.modified()?).timestamp();

        Ok(FileEntry::new(entry.path(), modified, metadata.is_dir()))
    }
}

/// Suffix of `name` starting at its last '.', separator included.
///
/// Returns "" when there is no '.' at all, so `".bashrc"` yields `".bashrc"`.
pub fn extension_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) => &name[i..],
        None => "",
    }
}
