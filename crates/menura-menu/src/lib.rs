//! Menura Menu - freedesktop menu-definition resolver
//!
//! Turns XML menu-definition files plus pools of desktop-entry records
//! into an ordered menu tree:
//! - definition parsing with file and directory merging, `<Move>`
//!   resolution and legacy-directory support
//! - per-menu application pools matched through Include/Exclude filter
//!   trees, with a second pass for `OnlyUnallocated` menus
//! - layout resolution (explicit, inherited default, or implicit) with
//!   sub-menu inlining
//! - serialization of a resolved tree back to definition XML
//!
//! [`MenuResolver`] is the entry point; [`Menu`] and [`MenuEntry`] are
//! the resolved output.

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod xml;

mod filter;
mod layout;
mod merge;
mod moves;
mod parse;
mod pool;
mod resolve;
mod serialize;

// Re-export commonly used types
pub use errors::{MenuError, Result};
pub use model::{Menu, MenuEntry};
pub use resolve::MenuResolver;
pub use xml::XmlNode;
