use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What a prospective application directory currently looks like.
/// Recomputed on demand, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryStatus {
    /// Path does not exist yet.
    Available,
    /// Existing directory with no entries.
    Empty,
    /// Path exists but is not a directory.
    NotDirectory,
    /// Existing directory that already has entries.
    NotEmpty,
    /// Permissions or other access failure.
    OtherError,
}

/// Classify `path` by attempting to enumerate it. Pure read; every
/// failure mode maps to a status value.
pub fn directory_status(path: impl AsRef<Path>) -> DirectoryStatus {
    let mut entries = match fs::read_dir(path.as_ref()) {
        Ok(entries) => entries,
        Err(err) => {
            return match err.kind() {
                io::ErrorKind::NotFound => DirectoryStatus::Available,
                io::ErrorKind::NotADirectory => DirectoryStatus::NotDirectory,
                _ => DirectoryStatus::OtherError,
            }
        }
    };

    if entries.next().is_some() {
        DirectoryStatus::NotEmpty
    } else {
        DirectoryStatus::Empty
    }
}

/// Absolute form of `path` for display. The raw value is what gets used
/// on disk and handed to the delegate tool.
pub fn absolute_display(path: &str) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_path_is_available() {
        let temp = TempDir::new().unwrap();
        let status = directory_status(temp.path().join("does-not-exist"));
        assert_eq!(status, DirectoryStatus::Available);
    }

    #[test]
    fn test_empty_directory() {
        let temp = TempDir::new().unwrap();
        assert_eq!(directory_status(temp.path()), DirectoryStatus::Empty);
    }

    #[test]
    fn test_directory_with_entries_is_not_empty() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("fastly.toml"), "").unwrap();
        assert_eq!(directory_status(temp.path()), DirectoryStatus::NotEmpty);
    }

    #[test]
    fn test_regular_file_is_not_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "contents").unwrap();
        assert_eq!(directory_status(&file), DirectoryStatus::NotDirectory);
    }
}
