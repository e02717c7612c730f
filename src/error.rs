//! Error types shared across the crate

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NweatError {
    /// The root directory could not be listed
    #[error("Cannot read directory {}: {source}", path.display())]
    DirectoryUnreadable { path: PathBuf, source: io::Error },

    /// A file could not be moved (destination exists, permission denied, source vanished)
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error("Failed to delete {}: {source}", path.display())]
    DeleteFailed { path: PathBuf, source: io::Error },

    #[error("Failed to create folder {}: {source}", path.display())]
    CreateFolderFailed { path: PathBuf, source: io::Error },

    /// A command referenced a missing item or folder, or the cursor is out of range
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Invalid folder name: {0:?}")]
    InvalidFolderName(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, NweatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_failed_message_names_both_paths() {
        let err = NweatError::MoveFailed {
            from: PathBuf::from("/photos/a.jpg"),
            to: PathBuf::from("/photos/Archived/a.jpg"),
            source: io::Error::new(io::ErrorKind::AlreadyExists, "exists"),
        };
        let message = err.to_string();
        assert!(message.contains("/photos/a.jpg"));
        assert!(message.contains("/photos/Archived/a.jpg"));
    }

    #[test]
    fn test_invalid_folder_name_is_quoted() {
        let err = NweatError::InvalidFolderName(String::new());
        assert_eq!(err.to_string(), "Invalid folder name: \"\"");
    }
}
