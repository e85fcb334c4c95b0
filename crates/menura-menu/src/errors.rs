use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using MenuError
pub type Result<T> = std::result::Result<T, MenuError>;

/// Errors aborting a menu build.
///
/// Every variant here is structural: the build returns no partial tree.
/// Missing merge targets, unreadable scan directories, and broken desktop
/// entries are resource or record conditions handled inside the pipeline
/// and never surface through this enum.
#[derive(Error, Debug)]
pub enum MenuError {
    /// A menu-definition file could not be read or written
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The XML loader rejected a menu-definition file
    #[error("Malformed XML in {} at byte {position}: {source}", path.display())]
    Xml {
        path: PathBuf,
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// A menu-definition file whose document element is not `<Menu>`
    #[error("Menu file {} does not start with <Menu>", path.display())]
    RootTag { path: PathBuf },

    /// A tag outside the vocabulary of its context
    #[error("Unknown tag <{tag}> in <{context}>")]
    UnknownTag { context: String, tag: String },

    /// A tag that requires text content but has none
    #[error("Tag <{tag}> requires text content")]
    MissingText { tag: String },

    /// A required attribute is absent or carries an unusable value
    #[error("Invalid {attr} attribute on <{tag}>: {value:?}")]
    InvalidAttr {
        tag: String,
        attr: String,
        value: String,
    },

    /// A `<Move>` block whose `<Old>`/`<New>` pairing is broken
    #[error("Incomplete <Move>: {reason}")]
    IncompleteMove { reason: String },

    /// A menu reached the filter pass without an internal name
    #[error("Menu without a <Name> cannot be resolved")]
    UnnamedMenu,

    /// Discovery exhausted every config directory
    #[error("No menu definition found in the config search path")]
    RootNotFound,
}
