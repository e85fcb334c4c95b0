//! The intermediate menu tree
//!
//! A [`MenuNode`] tree is what the pipeline passes between its stages:
//! built by the definition parser, spliced by the merge and move
//! resolvers, populated by the pool builder and filter engine, and
//! consumed whole by the layout engine. Nodes own their children;
//! records are shared `Rc` snapshots from the entry store.

use std::cell::Cell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use menura_entry::DesktopEntry;

use super::filter::FilterRule;
use super::layout::{InlineOverrides, LayoutDirective};

/// Where a node's defining XML came from: the containing directory (for
/// relative-path resolution) and, for file roots, the file name (for
/// `MergeFile type="parent"` and `DefaultMergeDirs`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SourceFile {
    pub dir: PathBuf,
    pub name: Option<String>,
}

/// One application-source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AppDir {
    pub path: PathBuf,
    /// Joined onto scanned file names with `-` to form ids
    pub prefix: Option<String>,
    /// Legacy directories scan one level only
    pub legacy: bool,
}

impl AppDir {
    pub fn plain(path: PathBuf) -> AppDir {
        AppDir {
            path,
            prefix: None,
            legacy: false,
        }
    }
}

/// One `<Move>` rule: slash-separated origin and destination paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MoveRule {
    pub from: String,
    pub to: String,
}

/// A pooled application record. The allocation mark is shared through
/// `Rc` with every pool snapshot referencing this entry, so a claim made
/// by one OnlyUnallocated menu is visible to all others.
#[derive(Debug)]
pub(crate) struct PoolEntry {
    pub id: String,
    pub entry: Rc<DesktopEntry>,
    pub allocated: Cell<bool>,
}

impl PoolEntry {
    pub fn new(id: String, entry: Rc<DesktopEntry>) -> Rc<PoolEntry> {
        Rc::new(PoolEntry {
            id,
            entry,
            allocated: Cell::new(false),
        })
    }
}

/// One menu in the intermediate tree.
#[derive(Debug, Default)]
pub(crate) struct MenuNode {
    pub file: SourceFile,
    /// Internal name; required by the time filtering runs
    pub name: Option<String>,
    /// `<Directory>` references, most recently declared first
    pub directories: Vec<String>,
    /// Resolved directory record, when any reference resolved
    pub directory: Option<Rc<DesktopEntry>>,
    /// Application sources in document order
    pub app_dirs: Vec<AppDir>,
    /// Directory-metadata sources in document order
    pub directory_dirs: Vec<PathBuf>,
    /// Relative path -> directory record, filled by the pool builder
    pub directory_cache: HashMap<String, Rc<DesktopEntry>>,
    pub moves: Vec<MoveRule>,
    /// Filter rules in document order
    pub filters: Vec<FilterRule>,
    pub layout: Vec<LayoutDirective>,
    pub default_layout: Vec<LayoutDirective>,
    /// Inline options; unset options inherit at layout time
    pub flags: InlineOverrides,
    /// `None` until `OnlyUnallocated`/`NotOnlyUnallocated` is seen
    pub only_unallocated: Option<bool>,
    /// `None` until `Deleted`/`NotDeleted` is seen
    pub deleted: Option<bool>,
    /// Applications scanned from this node's app dirs
    pub pool: Vec<Rc<PoolEntry>>,
    /// Applications assigned by the filter engine, sorted for display
    pub applications: Vec<Rc<PoolEntry>>,
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    pub fn new(file: SourceFile) -> MenuNode {
        MenuNode {
            file,
            ..MenuNode::default()
        }
    }

    /// Whether this node's internal name equals `name`.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }

    /// Index of the direct child with the given internal name.
    pub fn child_index(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|child| child.is_named(name))
    }

    /// Display name: the directory record's name when resolved, else the
    /// internal name.
    pub fn display_name(&self) -> &str {
        match &self.directory {
            Some(record) => &record.name,
            None => self.name.as_deref().unwrap_or_default(),
        }
    }

    /// Whether the layout engine must skip this menu entirely.
    pub fn is_suppressed(&self) -> bool {
        self.deleted.unwrap_or(false)
            || self
                .directory
                .as_ref()
                .is_some_and(|record| record.no_display)
    }
}
