//! Age-based cleanup of files in a single directory.
//!
//! A [`cleaner::Cleaner`] holds the retention settings for one directory and runs
//! scan-filter-delete passes over it; a [`scheduler::Scheduler`] fires those passes
//! once a day at a local wall-clock time until it is canceled.

pub mod cleaner;
pub mod errors;
pub mod scheduler;

pub use cleaner::{Cleaner, CleanupReport, FileEntry, SharedCleaner};
pub use errors::{Error, Result};
pub use scheduler::{DailyAt, Execution, Scheduler};
