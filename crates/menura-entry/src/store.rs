//! Caching desktop-entry store
//!
//! `EntryStore` hands out shared, immutable `DesktopEntry` snapshots. A
//! record is parsed once per path and revalidated against the file's
//! modification time, so repeated lookups during a menu build stay cheap
//! while an edited file is picked up on the next build.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::SystemTime;

use tracing::debug;

use crate::errors::{EntryError, Result};
use crate::ini::Locale;
use crate::model::DesktopEntry;

struct CachedRecord {
    modified: SystemTime,
    entry: Rc<DesktopEntry>,
}

/// Loader and cache for `.desktop` / `.directory` records.
///
/// Single-threaded by design: records are shared via `Rc` and the cache
/// lives behind a `RefCell`. One store can serve many builds; the
/// environment check runs per lookup, so changing the environment does
/// not require dropping the cache.
pub struct EntryStore {
    locale: Locale,
    environment: Option<String>,
    cache: RefCell<HashMap<PathBuf, CachedRecord>>,
}

impl EntryStore {
    /// Store using the locale from the process environment.
    pub fn new() -> EntryStore {
        EntryStore::with_locale(Locale::from_env())
    }

    /// Store with an explicit message locale (tests, embedders).
    pub fn with_locale(locale: Locale) -> EntryStore {
        EntryStore {
            locale,
            environment: None,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Set the desktop environment used for OnlyShowIn/NotShowIn checks.
    /// `None` disables the check except for entries with `OnlyShowIn`.
    pub fn set_environment(&mut self, environment: Option<String>) {
        self.environment = environment;
    }

    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    /// Load the record at `path`, from cache when still fresh.
    ///
    /// # Errors
    ///
    /// `Io` when the file cannot be read, a parse error from
    /// [`DesktopEntry::parse`], or `NotShown` when the active environment
    /// is excluded by the record's OnlyShowIn/NotShowIn lists. Callers in
    /// the menu pipeline treat every variant as "this record contributes
    /// nothing".
    pub fn load(&self, path: &Path) -> Result<Rc<DesktopEntry>> {
        let canonical = std::fs::canonicalize(path).map_err(|source| EntryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let modified = std::fs::metadata(&canonical)
            .and_then(|meta| meta.modified())
            .map_err(|source| EntryError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let mut cache = self.cache.borrow_mut();
        let entry = match cache.get(&canonical) {
            Some(cached) if cached.modified == modified => Rc::clone(&cached.entry),
            stale => {
                if stale.is_some() {
                    debug!(path = %canonical.display(), "desktop entry changed on disk, reparsing");
                }
                let entry = Rc::new(DesktopEntry::load(&canonical, &self.locale)?);
                cache.insert(
                    canonical,
                    CachedRecord {
                        modified,
                        entry: Rc::clone(&entry),
                    },
                );
                entry
            }
        };
        drop(cache);

        if !entry.shown_in(self.environment.as_deref()) {
            return Err(EntryError::NotShown {
                path: entry.path.clone(),
                environment: self.environment.clone().unwrap_or_default(),
            });
        }
        Ok(entry)
    }

    /// Number of cached records, for diagnostics.
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl Default for EntryStore {
    fn default() -> Self {
        EntryStore::new()
    }
}
