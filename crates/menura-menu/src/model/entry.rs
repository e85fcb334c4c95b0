//! The public menu tree
//!
//! [`Menu`] is what a build returns: an ordered tree of sub-menus,
//! launchable desktop entries, separators, and inline headers. It owns
//! `Rc` handles to the records it retains and carries no reference back
//! into the build that produced it.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use menura_entry::{id::path_to_file_id, DesktopEntry, XdgPaths};

/// A resolved menu: internal id, display name, optional icon, and the
/// ordered entries a shell would render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    /// Internal name, unique among siblings
    pub id: String,
    /// Display name from the directory record, or the id
    pub name: String,
    /// Icon name from the directory record
    pub icon: Option<String>,
    /// Directory record backing this menu, when one resolved
    pub directory: Option<Rc<DesktopEntry>>,
    pub entries: Vec<MenuEntry>,
}

/// One slot in a menu's entry list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MenuEntry {
    /// A nested sub-menu
    Menu(Menu),
    /// A launchable application
    Desktop {
        /// Desktop-file id
        id: String,
        name: String,
        icon: Option<String>,
        entry: Rc<DesktopEntry>,
    },
    /// A visual divider
    Separator,
    /// Non-selectable heading left behind by inlining a sub-menu
    Header { name: String, icon: Option<String> },
}

impl Menu {
    /// New menu with no directory metadata and no entries.
    pub fn new(id: impl Into<String>) -> Menu {
        let id = id.into();
        Menu {
            name: id.clone(),
            id,
            icon: None,
            directory: None,
            entries: Vec::new(),
        }
    }

    /// Iterate the desktop-file ids of this menu's direct Desktop entries.
    pub fn desktop_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            MenuEntry::Desktop { id, .. } => Some(id.as_str()),
            _ => None,
        })
    }

    /// Insert a Desktop entry for `record` at `position` (clamped to the
    /// end; `None` appends). The id is derived from the record's path
    /// under the XDG applications directories, falling back to the bare
    /// file name. Returns `false` when no id can be derived.
    pub fn insert_desktop(
        &mut self,
        record: Rc<DesktopEntry>,
        position: Option<usize>,
        xdg: &XdgPaths,
    ) -> bool {
        let id = match path_to_file_id(&record.path, xdg) {
            Some(id) => id,
            None => match record.file_name() {
                Some(name) => name.to_string(),
                None => return false,
            },
        };
        let entry = MenuEntry::Desktop {
            id,
            name: record.name.clone(),
            icon: record.icon.clone(),
            entry: record,
        };
        let at = position
            .unwrap_or(self.entries.len())
            .min(self.entries.len());
        self.entries.insert(at, entry);
        true
    }

    /// Remove the Desktop entry backed by `record` (matched by source
    /// path). Returns `false` when no such entry exists.
    pub fn remove_desktop(&mut self, record: &DesktopEntry) -> bool {
        let position = self.entries.iter().position(|entry| {
            matches!(entry, MenuEntry::Desktop { entry, .. } if entry.path == record.path)
        });
        match position {
            Some(at) => {
                self.entries.remove(at);
                true
            }
            None => false,
        }
    }
}
