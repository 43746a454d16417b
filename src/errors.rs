use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

// Filesystem errors are terminal for one item or one pass, never for the process:
//  - DirectoryAccess aborts the current pass
//  - Deletion is recorded and the pass moves on
// InvalidSchedule only surfaces at startup.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Root directory cannot be opened or listed
    #[error("failed to read directory {}: {source}", path.display())]
    DirectoryAccess {
        path: PathBuf,
        source: std::io::Error,
    },
    // A single file could not be removed
    #[error("failed to delete file {}: {source}", path.display())]
    Deletion {
        path: PathBuf,
        source: std::io::Error,
    },
    // Hour/minute out of range or malformed "HH:MM"
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display() {
        let e = Error::DirectoryAccess {
            path: PathBuf::from("/var/log/app"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(
            e.to_string()
                .starts_with("failed to read directory /var/log/app:")
        );
        // The io error stays reachable as the source
        assert!(e.source().is_some());

        let e = Error::InvalidSchedule("expected HH:MM, got '7'".to_string());
        assert_eq!(e.to_string(), "invalid schedule: expected HH:MM, got '7'");
    }
}
