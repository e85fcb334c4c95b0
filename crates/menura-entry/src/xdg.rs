//! XDG base-directory resolution
//!
//! Search paths come from the `XDG_*` environment variables with the
//! base-directory spec fallbacks. Everything is resolved once at
//! construction; menu building never re-reads the environment.

use std::path::{Path, PathBuf};

/// Resolved XDG search paths plus the menu-file prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XdgPaths {
    home: PathBuf,
    data_home: PathBuf,
    data_dirs: Vec<PathBuf>,
    config_home: PathBuf,
    config_dirs: Vec<PathBuf>,
    menu_prefix: String,
}

impl XdgPaths {
    /// Resolve from the process environment.
    ///
    /// Fallbacks: `HOME` → `/tmp`; `XDG_DATA_HOME` → `<home>/.local/share`;
    /// `XDG_DATA_DIRS` → `/usr/share:/usr/local/share`; `XDG_CONFIG_HOME` →
    /// `<home>/.config`; `XDG_CONFIG_DIRS` → `/etc/xdg`; `XDG_MENU_PREFIX` →
    /// empty.
    pub fn from_env() -> XdgPaths {
        XdgPaths::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> XdgPaths {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let home = get("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/tmp"));
        let data_home = get("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(".local/share"));
        let data_dirs = get("XDG_DATA_DIRS")
            .map(|value| split_search_path(&value))
            .unwrap_or_else(|| {
                vec![PathBuf::from("/usr/share"), PathBuf::from("/usr/local/share")]
            });
        let config_home = get("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(".config"));
        let config_dirs = get("XDG_CONFIG_DIRS")
            .map(|value| split_search_path(&value))
            .unwrap_or_else(|| vec![PathBuf::from("/etc/xdg")]);
        let menu_prefix = get("XDG_MENU_PREFIX").unwrap_or_default();

        XdgPaths {
            home,
            data_home,
            data_dirs,
            config_home,
            config_dirs,
            menu_prefix,
        }
    }

    /// Replace the data home (tests, embedders).
    pub fn with_data_home(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_home = dir.into();
        self
    }

    /// Replace the system data dirs.
    pub fn with_data_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.data_dirs = dirs;
        self
    }

    /// Replace the config home.
    pub fn with_config_home(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_home = dir.into();
        self
    }

    /// Replace the system config dirs.
    pub fn with_config_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.config_dirs = dirs;
        self
    }

    /// Replace the menu-file prefix (`XDG_MENU_PREFIX`).
    pub fn with_menu_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.menu_prefix = prefix.into();
        self
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn data_home(&self) -> &Path {
        &self.data_home
    }

    pub fn data_dirs(&self) -> &[PathBuf] {
        &self.data_dirs
    }

    pub fn config_home(&self) -> &Path {
        &self.config_home
    }

    pub fn config_dirs(&self) -> &[PathBuf] {
        &self.config_dirs
    }

    pub fn menu_prefix(&self) -> &str {
        &self.menu_prefix
    }

    /// Data search roots, user first.
    pub fn data_roots(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.data_home.as_path()).chain(self.data_dirs.iter().map(PathBuf::as_path))
    }

    /// Config search roots, user first.
    pub fn config_roots(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.config_home.as_path())
            .chain(self.config_dirs.iter().map(PathBuf::as_path))
    }

    /// Every data root joined with `suffix`, e.g. `applications`.
    pub fn data_dirs_with(&self, suffix: &str) -> Vec<PathBuf> {
        self.data_roots().map(|root| root.join(suffix)).collect()
    }

    /// Every config root joined with `suffix`, e.g. `menus`.
    pub fn config_dirs_with(&self, suffix: &str) -> Vec<PathBuf> {
        self.config_roots().map(|root| root.join(suffix)).collect()
    }
}

/// Split a colon-separated search path, dropping empty segments and
/// later duplicates.
pub fn split_search_path(value: &str) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    for segment in value.split(':') {
        if segment.is_empty() {
            continue;
        }
        let dir = PathBuf::from(segment);
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }
    dirs
}
