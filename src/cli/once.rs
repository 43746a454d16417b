use agesweep::SharedCleaner;
use std::sync::PoisonError;

pub fn run(cleaner: &SharedCleaner) {
    let mut cleaner = cleaner.lock().unwrap_or_else(PoisonError::into_inner);
    println!("Running cleanup of {}...", cleaner.root_dir().display());

    match cleaner.run_cleanup() {
        Ok(report) => {
            println!(
                "Cleanup completed. Scanned: {}, deleted: {}, failed: {}",
                report.scanned, report.deleted, report.failed
            );
        }
        Err(e) => {
            eprintln!("Cleanup failed: {e}");
            std::process::exit(1);
        }
    }
}
