//! Menura Entry - Desktop-entry records and XDG base directories
//!
//! This crate supplies the record layer the menu resolver builds on:
//! - `DesktopEntry` model parsed from the desktop-entry key/value dialect
//!   (localized keys, escape sequences, string lists)
//! - `EntryStore`, a caching loader that revalidates records against file
//!   modification time and applies OnlyShowIn/NotShowIn environment checks
//! - `XdgPaths`, the base-directory search paths resolved from the
//!   environment (data/config home and dirs, menu prefix)
//! - file-id derivation (path relative to an applications dir, `/` → `-`)

pub mod errors;
pub mod id;
pub mod ini;
pub mod model;
pub mod store;
pub mod xdg;

// Re-export commonly used types
pub use errors::{EntryError, Result};
pub use ini::{IniFile, Locale};
pub use model::{DesktopEntry, EntryKind};
pub use store::EntryStore;
pub use xdg::XdgPaths;
