//! Application and directory pools
//!
//! Walks the node tree top-down, scanning every registered application
//! directory into a per-node pool of (file id, record) pairs and every
//! directory-entry directory into a per-node cache keyed by relative
//! path. Directory references then resolve against the node's own cache
//! first and its ancestors' caches after, nearest first.

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use tracing::debug;

use menura_entry::{DesktopEntry, EntryKind, EntryStore};

use crate::model::{MenuNode, PoolEntry};
use crate::parse::{legacy_id, sorted_dir};

pub(crate) fn build_pools(
    node: &mut MenuNode,
    store: &EntryStore,
    ancestor_caches: &[&HashMap<String, Rc<DesktopEntry>>],
) {
    node.pool.clear();
    for dir in &node.app_dirs {
        scan_app_dir(
            &dir.path,
            dir.prefix.as_deref(),
            dir.legacy,
            store,
            &mut node.pool,
        );
    }

    node.directory_cache.clear();
    // scanned front to back with overwrite, so later-declared dirs win
    for dir in &node.directory_dirs {
        scan_directory_dir(dir, "", store, &mut node.directory_cache);
    }

    // legacy nodes may already carry a record from their .directory file
    if node.directory.is_none() {
        for reference in &node.directories {
            if let Some(record) = lookup_directory(reference, &node.directory_cache, ancestor_caches)
            {
                node.directory = Some(record);
                break;
            }
        }
    }

    let caches: Vec<&HashMap<String, Rc<DesktopEntry>>> = ancestor_caches
        .iter()
        .copied()
        .chain(std::iter::once(&node.directory_cache))
        .collect();
    for child in &mut node.children {
        build_pools(child, store, &caches);
    }
}

fn lookup_directory(
    reference: &str,
    own: &HashMap<String, Rc<DesktopEntry>>,
    ancestors: &[&HashMap<String, Rc<DesktopEntry>>],
) -> Option<Rc<DesktopEntry>> {
    if let Some(record) = own.get(reference) {
        return Some(Rc::clone(record));
    }
    // ancestors are passed root-first; nearest one wins
    for cache in ancestors.iter().rev() {
        if let Some(record) = cache.get(reference) {
            return Some(Rc::clone(record));
        }
    }
    None
}

/// Scan one application directory into `pool`. Sub-directories extend
/// the file id with a `-` separator; legacy directories do not recurse,
/// their sub-directories are distinct sources. The first record seen for
/// an id wins.
fn scan_app_dir(
    path: &Path,
    prefix: Option<&str>,
    legacy: bool,
    store: &EntryStore,
    pool: &mut Vec<Rc<PoolEntry>>,
) {
    for entry in sorted_dir(path) {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let child_path = entry.path();

        if child_path.is_dir() {
            if !legacy {
                let child_prefix = match prefix {
                    Some(prefix) => format!("{prefix}-{name}"),
                    None => name.to_string(),
                };
                scan_app_dir(&child_path, Some(&child_prefix), false, store, pool);
            }
            continue;
        }
        if !name.ends_with(".desktop") {
            continue;
        }

        let id = if legacy {
            legacy_id(prefix, name)
        } else {
            match prefix {
                Some(prefix) => format!("{prefix}-{name}"),
                None => name.to_string(),
            }
        };
        if pool.iter().any(|existing| existing.id == id) {
            continue;
        }

        match store.load(&child_path) {
            Ok(record) if record.kind == EntryKind::Application => {
                // legacy records without categories get a synthetic one so
                // category filters elsewhere can take them up
                let record = if legacy && record.categories.is_empty() {
                    Rc::new(record.with_category("Legacy"))
                } else {
                    record
                };
                pool.push(PoolEntry::new(id, record));
            }
            Ok(_) => {}
            Err(err) => debug!(path = %child_path.display(), error = %err, "skipping desktop file"),
        }
    }
}

/// Scan one directory-entry directory into `cache`, keyed by path
/// relative to the scan root. Later inserts overwrite.
fn scan_directory_dir(
    path: &Path,
    relative: &str,
    store: &EntryStore,
    cache: &mut HashMap<String, Rc<DesktopEntry>>,
) {
    for entry in sorted_dir(path) {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let child_path = entry.path();
        let key = if relative.is_empty() {
            name.to_string()
        } else {
            format!("{relative}/{name}")
        };

        if child_path.is_dir() {
            scan_directory_dir(&child_path, &key, store, cache);
            continue;
        }
        if !name.ends_with(".directory") {
            continue;
        }
        match store.load(&child_path) {
            Ok(record) if record.kind == EntryKind::Directory => {
                cache.insert(key, record);
            }
            Ok(_) => {}
            Err(err) => {
                debug!(path = %child_path.display(), error = %err, "skipping directory entry")
            }
        }
    }
}
