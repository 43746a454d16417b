use log::{debug, error, info, warn};
use std::{fs, path::Path};

use super::{Cleaner, FileEntry};
use crate::errors::{Error, Result};

/// Outcome of a single cleanup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    // Entries listed by the scan
    pub scanned: usize,
    // Files removed
    pub deleted: usize,
    // Files that matched but could not be removed
    pub failed: usize,
}

impl Cleaner {
    /// Reads the immediate children of the root directory into the entry cache.
    fn read_files(&mut self) -> Result<()> {
        self.entries.clear();

        let access_error = |source| Error::DirectoryAccess {
            path: self.root_dir.clone(),
            source,
        };
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root_dir).map_err(access_error)? {
            let entry = entry.map_err(access_error)?;
            // The entry may vanish between listing and stat
            match entry
                .metadata()
                .and_then(|metadata| FileEntry::from_dir_entry(&entry, &metadata))
            {
                Ok(file) => entries.push(file),
                Err(e) => warn!("Skipping {}: {e}", entry.path().display()),
            }
        }
        self.entries = entries;

        Ok(())
    }

    /// Scans the root directory and returns every child, without filtering.
    pub fn files(&mut self) -> Result<&[FileEntry]> {
        self.read_files()?;

        Ok(&self.entries)
    }

    pub fn delete_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|source| Error::Deletion {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Successfully deleted file: {}", path.display());

        Ok(())
    }

    fn should_delete(&self, file: &FileEntry) -> bool {
        !file.is_dir && file.extension == self.extension && self.is_expired(file.modified)
    }

    /// Runs one scan-filter-delete pass over the root directory.
    ///
    /// Only a failure to list the directory aborts the pass; individual deletion
    /// failures are logged and counted in the report.
    pub fn run_cleanup(&mut self) -> Result<CleanupReport> {
        self.snapshot_now();
        let scanned = self.read_files();
        // Take the cache so that it is empty again once the pass is over
        let files = std::mem::take(&mut self.entries);
        scanned?;

        Ok(self.remove_expired(&files))
    }

    /// Deletes the eligible entries of a scan. A failed deletion is logged and
    /// counted, the remaining entries are still processed.
    fn remove_expired(&self, files: &[FileEntry]) -> CleanupReport {
        let mut report = CleanupReport {
            scanned: files.len(),
            ..Default::default()
        };
        for file in files.iter().filter(|file| self.should_delete(file)) {
            match self.delete_file(&file.path) {
                Ok(()) => report.deleted += 1,
                Err(e) => {
                    error!("{e}");
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Runs a pass and logs its outcome, never failing.
    pub fn sweep(&mut self) -> Option<CleanupReport> {
        debug!("Starting cleanup of {}...", self.root_dir.display());
        match self.run_cleanup() {
            Ok(report) if report.deleted > 0 || report.failed > 0 => {
                info!(
                    "Cleaned up {} expired file(s) in {}, {} failed",
                    report.deleted,
                    self.root_dir.display(),
                    report.failed
                );
                Some(report)
            }
            Ok(report) => {
                debug!("No expired files in {}", self.root_dir.display());
                Some(report)
            }
            Err(e) => {
                error!("Cleanup aborted: {e}");
                None
            }
        }
    }
}
