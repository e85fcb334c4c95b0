//! Menu resolution façade
//!
//! [`MenuResolver`] owns the configuration (XDG search paths, desktop
//! environment, legacy directories) and drives the full pipeline:
//! parse and merge the definition files, resolve moves, build the
//! application and directory pools, run both filter passes, and lay the
//! tree out into the public [`Menu`] form.

use std::path::{Path, PathBuf};

use tracing::debug;

use menura_entry::{EntryStore, XdgPaths};

use crate::errors::{MenuError, Result};
use crate::filter;
use crate::layout;
use crate::model::Menu;
use crate::moves;
use crate::parse::{self, BuildContext};
use crate::pool;

/// Resolves menu-definition files into [`Menu`] trees.
///
/// A resolver can be reused across files; desktop-entry records are
/// cached in its [`EntryStore`] and revalidated by modification time.
pub struct MenuResolver {
    xdg: XdgPaths,
    store: EntryStore,
    menu_file: Option<PathBuf>,
    kde_legacy_dirs: Vec<PathBuf>,
    strict: bool,
}

impl MenuResolver {
    /// Resolver with paths and locale taken from the environment.
    pub fn new() -> MenuResolver {
        MenuResolver::with_paths(XdgPaths::from_env())
    }

    pub fn with_paths(xdg: XdgPaths) -> MenuResolver {
        MenuResolver {
            xdg,
            store: EntryStore::new(),
            menu_file: None,
            kde_legacy_dirs: Vec::new(),
            strict: false,
        }
    }

    /// Desktop environment name for OnlyShowIn/NotShowIn checks.
    pub fn set_environment(&mut self, environment: Option<String>) {
        self.store.set_environment(environment);
    }

    /// Override the file picked up by [`resolve_default`](Self::resolve_default).
    pub fn set_menu_file(&mut self, path: Option<PathBuf>) {
        self.menu_file = path;
    }

    /// Candidate directories for `<KDELegacyDirs>`; the first one that
    /// exists is used.
    pub fn set_kde_legacy_dirs(&mut self, dirs: Vec<PathBuf>) {
        self.kde_legacy_dirs = dirs;
    }

    /// In strict mode applications sort by desktop-file name instead of
    /// display name.
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn xdg(&self) -> &XdgPaths {
        &self.xdg
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    /// Resolve the menu-definition file at `path`.
    pub fn resolve(&self, path: &Path) -> Result<Menu> {
        debug!(path = %path.display(), "resolving menu file");
        let mut ctx = BuildContext::new(&self.xdg, &self.store, &self.kde_legacy_dirs);
        let mut root = parse::parse_root(path, &mut ctx)?;
        moves::resolve_moves(&mut root);
        pool::build_pools(&mut root, &self.store, &[]);
        filter::assign_applications(&mut root, false, self.strict, &[])?;
        filter::assign_applications(&mut root, true, self.strict, &[])?;
        Ok(layout::layout_tree(root))
    }

    /// Resolve the standard applications menu: the first
    /// `menus/<prefix>applications.menu` found in the config search
    /// order, unless a file override is set.
    pub fn resolve_default(&self) -> Result<Menu> {
        match self.default_menu_file() {
            Some(path) => self.resolve(&path),
            None => Err(MenuError::RootNotFound),
        }
    }

    fn default_menu_file(&self) -> Option<PathBuf> {
        let relative = format!("menus/{}applications.menu", self.xdg.menu_prefix());

        // a user file in the config home outranks the override
        let user = self.xdg.config_home().join(&relative);
        if user.exists() {
            return Some(user);
        }
        if let Some(path) = &self.menu_file {
            if path.exists() {
                return Some(path.clone());
            }
        }
        self.xdg
            .config_dirs()
            .iter()
            .map(|dir| dir.join(&relative))
            .find(|path| path.exists())
    }

    /// Every `.menu` file visible in the config search order, user
    /// directory first, name-sorted within each directory.
    pub fn menu_files(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for root in self.xdg.config_roots() {
            for entry in parse::sorted_dir(&root.join("menus")) {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "menu") && path.is_file() {
                    found.push(path);
                }
            }
        }
        found
    }
}

impl Default for MenuResolver {
    fn default() -> Self {
        MenuResolver::new()
    }
}
