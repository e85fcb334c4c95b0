use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{EntryError, Result};
use crate::ini::{IniFile, Locale};

const GROUP: &str = "Desktop Entry";
const KDE_GROUP: &str = "KDE Desktop Entry";

/// What a desktop entry launches or describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// A launchable program
    Application,
    /// A bookmark-style URL entry
    Link,
    /// Metadata for a menu directory (`.directory` files)
    Directory,
}

impl EntryKind {
    /// Map a `Type` value onto a kind; unknown values are a record error
    /// for the caller to raise.
    pub fn parse(value: &str) -> Option<EntryKind> {
        match value {
            "Application" => Some(EntryKind::Application),
            "Link" => Some(EntryKind::Link),
            "Directory" => Some(EntryKind::Directory),
            _ => None,
        }
    }
}

/// One parsed `.desktop` or `.directory` record.
///
/// Localized keys are resolved against a single [`Locale`] at parse time,
/// so a record holds exactly the strings the current session would show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopEntry {
    /// Source file this record was parsed from
    pub path: PathBuf,

    /// Entry kind from the `Type` key
    pub kind: EntryKind,

    /// Display name (required, localized)
    pub name: String,

    /// Generic name, e.g. "Web Browser" (localized)
    pub generic_name: Option<String>,

    /// Tooltip-style comment (localized)
    pub comment: Option<String>,

    /// Icon name or path (localized)
    pub icon: Option<String>,

    /// Entry exists but must not be shown in menus
    pub no_display: bool,

    /// Entry should be treated as if it had been deleted
    pub hidden: bool,

    /// Show only in these environments (empty means everywhere)
    pub only_show_in: Vec<String>,

    /// Hide in these environments
    pub not_show_in: Vec<String>,

    /// Binary to test for before offering the entry
    pub try_exec: Option<String>,

    /// Command line to execute
    pub exec: Option<String>,

    /// Working directory for `exec` (the `Path` key)
    pub working_dir: Option<String>,

    /// Expected WM_CLASS of the launched window
    pub startup_wm_class: Option<String>,

    /// Target of a `Link` entry
    pub url: Option<String>,

    /// Menu categories from the `Categories` key
    pub categories: Vec<String>,

    /// MIME types this application handles
    pub mime_types: Vec<String>,

    /// Run in a terminal
    pub terminal: bool,

    /// Sends startup notification (absent means unknown)
    pub startup_notify: Option<bool>,

    /// Raw `X-*` extension keys, document values unmodified
    pub extensions: BTreeMap<String, String>,
}

impl DesktopEntry {
    /// Read and parse a desktop-entry file.
    pub fn load(path: &Path, locale: &Locale) -> Result<DesktopEntry> {
        let text = std::fs::read_to_string(path).map_err(|source| EntryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        DesktopEntry::parse(path.to_path_buf(), &text, locale)
    }

    /// Parse desktop-entry text.
    ///
    /// Requirements enforced here: a `[Desktop Entry]` group (the KDE
    /// spelling is accepted as a fallback), a known `Type`, and a `Name`.
    /// When both `OnlyShowIn` and `NotShowIn` are present the entry is
    /// malformed; we log and keep `OnlyShowIn`.
    pub fn parse(path: PathBuf, text: &str, locale: &Locale) -> Result<DesktopEntry> {
        let ini = IniFile::parse(text);
        let group = if ini.has_group(GROUP) {
            GROUP
        } else if ini.has_group(KDE_GROUP) {
            KDE_GROUP
        } else {
            return Err(EntryError::MissingGroup { path });
        };

        let kind = match ini.get(group, "Type") {
            Some(value) => match EntryKind::parse(value) {
                Some(kind) => kind,
                None => {
                    return Err(EntryError::UnknownKind {
                        path,
                        value: value.to_string(),
                    })
                }
            },
            None => {
                return Err(EntryError::UnknownKind {
                    path,
                    value: String::new(),
                })
            }
        };

        let Some(name) = ini.localized(group, "Name", locale) else {
            return Err(EntryError::MissingName { path });
        };

        let only_show_in = ini.list(group, "OnlyShowIn");
        let mut not_show_in = ini.list(group, "NotShowIn");
        if !only_show_in.is_empty() && !not_show_in.is_empty() {
            warn!(
                path = %path.display(),
                "both OnlyShowIn and NotShowIn are set, ignoring NotShowIn"
            );
            not_show_in.clear();
        }

        let extensions = ini
            .entries(group)
            .filter(|(key, _)| key.starts_with("X-"))
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        Ok(DesktopEntry {
            kind,
            name,
            generic_name: ini.localized(group, "GenericName", locale),
            comment: ini.localized(group, "Comment", locale),
            icon: ini.localized(group, "Icon", locale),
            no_display: ini.boolean(group, "NoDisplay"),
            hidden: ini.boolean(group, "Hidden"),
            only_show_in,
            not_show_in,
            try_exec: ini.string(group, "TryExec"),
            exec: ini.string(group, "Exec"),
            working_dir: ini.string(group, "Path"),
            startup_wm_class: ini.string(group, "StartupWMClass"),
            url: ini.string(group, "URL"),
            categories: ini.list(group, "Categories"),
            mime_types: ini.list(group, "MimeType"),
            terminal: ini.boolean(group, "Terminal"),
            startup_notify: ini.get(group, "StartupNotify").map(|v| v == "true"),
            extensions,
            path,
        })
    }

    /// Whether the entry belongs in menus built for `environment`.
    ///
    /// An entry with `OnlyShowIn` needs a matching environment name; an
    /// entry with `NotShowIn` is shown everywhere else. With no
    /// environment configured only `OnlyShowIn` entries are excluded.
    pub fn shown_in(&self, environment: Option<&str>) -> bool {
        if !self.only_show_in.is_empty() {
            return environment.is_some_and(|env| self.only_show_in.iter().any(|e| e == env));
        }
        match environment {
            Some(env) => !self.not_show_in.iter().any(|e| e == env),
            None => true,
        }
    }

    /// Copy of this record with `category` appended to its categories.
    /// Used when legacy directories imply a category the file never names.
    pub fn with_category(&self, category: &str) -> DesktopEntry {
        let mut entry = self.clone();
        if !entry.categories.iter().any(|c| c == category) {
            entry.categories.push(category.to_string());
        }
        entry
    }

    /// Final component of the source path, when valid UTF-8.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}
