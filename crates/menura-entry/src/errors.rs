use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using EntryError
pub type Result<T> = std::result::Result<T, EntryError>;

/// Errors raised while locating or parsing desktop-entry files.
///
/// The menu resolver treats every variant as a record-level failure: the
/// offending file contributes nothing and the build continues.
#[derive(Error, Debug)]
pub enum EntryError {
    /// File could not be read or canonicalized
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither `[Desktop Entry]` nor `[KDE Desktop Entry]` is present
    #[error("No desktop-entry group in {}", path.display())]
    MissingGroup { path: PathBuf },

    /// The required `Name` key is absent
    #[error("Desktop entry has no Name: {}", path.display())]
    MissingName { path: PathBuf },

    /// `Type` is absent or names no known entry kind
    #[error("Desktop entry {} has unrecognized type: {value:?}", path.display())]
    UnknownKind { path: PathBuf, value: String },

    /// OnlyShowIn/NotShowIn excludes the active desktop environment
    #[error("Desktop entry {} is not shown in environment {environment}", path.display())]
    NotShown { path: PathBuf, environment: String },
}
