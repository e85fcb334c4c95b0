//! Data model for the menu resolver
//!
//! `entry` is the public output tree; everything else is the internal
//! representation a build works on and discards.

pub mod entry;
pub(crate) mod filter;
pub(crate) mod layout;
pub(crate) mod node;

pub use entry::{Menu, MenuEntry};
pub(crate) use filter::{FilterOp, FilterRule, FilterTerms, Polarity};
pub(crate) use layout::{InlineFlags, InlineOverrides, LayoutDirective, MergeKind};
pub(crate) use node::{AppDir, MenuNode, MoveRule, PoolEntry, SourceFile};
