mod entry;
mod pipeline;

pub use entry::{FileEntry, extension_of};
pub use pipeline::CleanupReport;

use chrono::Utc;
use log::warn;
use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock},
};

pub const SECONDS_IN_A_DAY: i64 = 86400;

/// Handle shared by the scheduler and manual triggers, the mutex serializes passes.
pub type SharedCleaner = Arc<Mutex<Cleaner>>;

static CLEANER: OnceLock<SharedCleaner> = OnceLock::new();

/// Retention settings for one directory plus the state of the current scan.
#[derive(Debug)]
pub struct Cleaner {
    // Scanned directory, fixed for the lifetime of the cleaner
    root_dir: PathBuf,
    // Target extension including the leading '.'
    extension: String,
    age_threshold_days: i64,
    // Always age_threshold_days * SECONDS_IN_A_DAY
    age_threshold_secs: i64,
    // Reference "now" of the latest scan, in unix seconds
    snapshot_time: i64,
    // Entries of the latest scan, emptied after each pass
    entries: Vec<FileEntry>,
}

impl Cleaner {
    pub fn new(
        root_dir: impl Into<PathBuf>,
        extension: impl Into<String>,
        age_threshold_days: i64,
    ) -> Self {
        Cleaner {
            root_dir: root_dir.into(),
            extension: extension.into(),
            age_threshold_days,
            age_threshold_secs: days_to_secs(age_threshold_days),
            snapshot_time: 0,
            entries: Vec::new(),
        }
    }

    pub fn shared(self) -> SharedCleaner {
        Arc::new(Mutex::new(self))
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn set_extension(&mut self, extension: impl Into<String>) {
        self.extension = extension.into();
    }

    pub fn age_threshold_days(&self) -> i64 {
        self.age_threshold_days
    }

    pub fn set_age_threshold_days(&mut self, days: i64) {
        self.age_threshold_days = days;
        self.age_threshold_secs = days_to_secs(days);
    }

    pub fn age_threshold_secs(&self) -> i64 {
        self.age_threshold_secs
    }

    /// Captures the wall clock as the reference time for the next comparisons.
    pub fn snapshot_now(&mut self) {
        self.snapshot_time = Utc::now().timestamp();
    }

    pub fn snapshot_time(&self) -> i64 {
        self.snapshot_time
    }

    /// Entries cached by the latest scan.
    ///
    /// A cleanup pass empties the cache when it ends, a plain [`Cleaner::files`] scan
    /// leaves it filled until the next pass.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Case-sensitive comparison of the name's extension with the target one.
    pub fn check_extension(&self, file_name: &str) -> bool {
        extension_of(file_name) == self.extension
    }

    /// Whether a file modified at `modified` is older than the threshold, measured
    /// from the snapshot. A file exactly at the threshold is kept.
    pub fn is_expired(&self, modified: i64) -> bool {
        self.snapshot_time.saturating_sub(modified) > self.age_threshold_secs
    }

    fn same_settings(&self, root_dir: &Path, extension: &str, age_threshold_days: i64) -> bool {
        self.root_dir == root_dir
            && self.extension == extension
            && self.age_threshold_days == age_threshold_days
    }
}

fn days_to_secs(days: i64) -> i64 {
    days.saturating_mul(SECONDS_IN_A_DAY)
}

/// Returns the process-wide cleaner, constructing it on the first call.
///
/// The first call wins: later calls get the same instance back untouched, even when
/// their arguments differ (which is logged). Concurrent first callers construct it
/// exactly once.
pub fn init(
    root_dir: impl Into<PathBuf>,
    extension: impl Into<String>,
    age_threshold_days: i64,
) -> &'static SharedCleaner {
    let root_dir = root_dir.into();
    let extension = extension.into();
    let mut created = false;
    let cleaner = CLEANER.get_or_init(|| {
        created = true;
        Cleaner::new(root_dir.clone(), extension.clone(), age_threshold_days).shared()
    });

    // A busy lock (pass in flight, or held by the caller) skips the comparison
    if !created {
        if let Ok(current) = cleaner.try_lock() {
            if !current.same_settings(&root_dir, &extension, age_threshold_days) {
                warn!(
                    "Cleaner already initialized for {} ({}, {} days), ignoring {} ({extension}, {age_threshold_days} days)",
                    current.root_dir.display(),
                    current.extension,
                    current.age_threshold_days,
                    root_dir.display(),
                );
            }
        }
    }

    cleaner
}

pub fn global() -> Option<&'static SharedCleaner> {
    CLEANER.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    // The process-wide slot is only touched by this test
    #[test]
    fn test_init_first_call_wins() {
        let first = init("test_dir", ".txt", 7);
        let second = init("other_dir", ".log", 30);

        assert!(Arc::ptr_eq(first, second));
        assert!(Arc::ptr_eq(first, global().unwrap()));

        {
            let cleaner = second.lock().unwrap();
            assert_eq!(cleaner.root_dir(), Path::new("test_dir"));
            assert_eq!(cleaner.extension(), ".txt");
            assert_eq!(cleaner.age_threshold_days(), 7);
            assert_eq!(cleaner.age_threshold_secs(), 7 * SECONDS_IN_A_DAY);

            // Re-initializing while the guard is held must not block
            assert!(Arc::ptr_eq(first, init("busy_dir", ".tmp", 1)));
        }

        let handles = (0..8)
            .map(|i| {
                std::thread::spawn(move || Arc::as_ptr(init(format!("dir{i}"), ".txt", i)) as usize)
            })
            .collect::<Vec<_>>();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Arc::as_ptr(first) as usize);
        }
    }

    #[test]
    fn test_getters_and_setters() {
        let mut cleaner = Cleaner::new("", "", 0);
        assert!(cleaner.entries().is_empty());

        cleaner.set_extension(".log");
        assert_eq!(cleaner.extension(), ".log");

        cleaner.set_age_threshold_days(5);
        assert_eq!(cleaner.age_threshold_days(), 5);
        assert_eq!(cleaner.age_threshold_secs(), 5 * 86400);

        cleaner.set_age_threshold_days(-2);
        assert_eq!(cleaner.age_threshold_secs(), -2 * 86400);
    }

    #[test]
    fn test_check_extension() {
        let cleaner = Cleaner::new("", ".txt", 0);

        assert!(cleaner.check_extension("test_file.txt"));
        assert!(!cleaner.check_extension("test_file.jpg"));
        assert!(!cleaner.check_extension("test_file.TXT"));
        assert!(!cleaner.check_extension("txt"));
        assert!(!cleaner.check_extension("test_file"));
    }

    #[test]
    fn test_is_expired() {
        let mut cleaner = Cleaner::new("", ".txt", 1);
        cleaner.snapshot_now();
        let now = cleaner.snapshot_time();

        // Two days old
        assert!(cleaner.is_expired(now - 2 * SECONDS_IN_A_DAY));
        // Twelve hours old
        assert!(!cleaner.is_expired(now - 12 * 3600));
        // Exactly at the threshold
        assert!(!cleaner.is_expired(now - SECONDS_IN_A_DAY));
        // One second past it
        assert!(cleaner.is_expired(now - SECONDS_IN_A_DAY - 1));
    }

    #[test]
    fn test_is_expired_non_positive_threshold() {
        let mut cleaner = Cleaner::new("", ".txt", 0);
        cleaner.snapshot_now();
        let now = cleaner.snapshot_time();

        assert!(cleaner.is_expired(now - 1));
        assert!(!cleaner.is_expired(now));
        assert!(!cleaner.is_expired(now + 60));

        cleaner.set_age_threshold_days(-1);
        assert!(cleaner.is_expired(now));
        assert!(cleaner.is_expired(now + 60));
    }
}
