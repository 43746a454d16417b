pub mod once;

use agesweep::DailyAt;
use clap::Parser;
use std::path::PathBuf;

use crate::vars::{AGESWEEP_EXTENSION, AGESWEEP_ROOT_DIR, AGESWEEP_RUN_AT, MAX_AGE_DAYS};

/// Deletes files older than a given age from a directory, once a day.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// Directory to clean (defaults to AGESWEEP_ROOT_DIR)
    #[arg(long)]
    pub root_dir: Option<PathBuf>,
    /// Extension of the files to delete, including the dot (defaults to AGESWEEP_EXTENSION)
    #[arg(long)]
    pub extension: Option<String>,
    /// Files older than this many days are deleted (defaults to AGESWEEP_MAX_AGE_DAYS)
    #[arg(long, allow_negative_numbers = true)]
    pub max_age_days: Option<i64>,
    /// Daily run time as HH:MM in local time (defaults to AGESWEEP_RUN_AT)
    #[arg(long)]
    pub at: Option<DailyAt>,
    /// Run passes on the blocking thread pool
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub blocking: bool,
    /// Run a single pass now and exit
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub once: bool,
}

impl Args {
    pub fn root_dir(&self) -> PathBuf {
        self.root_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(*AGESWEEP_ROOT_DIR))
    }

    pub fn extension(&self) -> String {
        self.extension
            .clone()
            .unwrap_or_else(|| AGESWEEP_EXTENSION.to_string())
    }

    pub fn max_age_days(&self) -> i64 {
        self.max_age_days.unwrap_or(*MAX_AGE_DAYS)
    }

    pub fn at(&self) -> agesweep::Result<DailyAt> {
        match self.at {
            Some(at) => Ok(at),
            None => AGESWEEP_RUN_AT.parse(),
        }
    }
}
