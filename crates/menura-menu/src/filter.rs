//! Include/Exclude processing
//!
//! Runs twice over the whole tree: a first pass for regular menus and a
//! second for the `OnlyUnallocated` ones, which may only take entries no
//! regular menu claimed. A menu matches entries against its own pool and
//! its ancestors' pools, nearest ancestor first.

use std::collections::HashSet;
use std::rc::Rc;

use crate::errors::{MenuError, Result};
use crate::model::{MenuNode, Polarity, PoolEntry};

pub(crate) fn assign_applications(
    node: &mut MenuNode,
    unallocated_pass: bool,
    strict: bool,
    ancestor_pools: &[&[Rc<PoolEntry>]],
) -> Result<()> {
    if node.name.as_deref().map_or(true, str::is_empty) {
        return Err(MenuError::UnnamedMenu);
    }

    if node.only_unallocated.unwrap_or(false) == unallocated_pass {
        node.applications.clear();
        let mut seen_include = false;
        for rule in &node.filters {
            match rule.polarity {
                Polarity::Include => {
                    seen_include = true;
                    // ids already taken by this rule; a nearer pool's
                    // record shadows a farther one
                    let mut matched: HashSet<String> = HashSet::new();
                    let pools = std::iter::once(node.pool.as_slice())
                        .chain(ancestor_pools.iter().rev().copied());
                    for pool in pools {
                        for entry in pool {
                            if matched.contains(entry.id.as_str()) {
                                continue;
                            }
                            if unallocated_pass && entry.allocated.get() {
                                continue;
                            }
                            if rule.op.matches(&entry.id, &entry.entry) {
                                matched.insert(entry.id.clone());
                                entry.allocated.set(true);
                                node.applications.push(Rc::clone(entry));
                            }
                        }
                    }
                }
                Polarity::Exclude => {
                    // excludes before the first include have nothing to act on
                    if seen_include {
                        let op = &rule.op;
                        node.applications
                            .retain(|app| !op.matches(&app.id, &app.entry));
                    }
                }
            }
        }

        if strict {
            node.applications.sort_by(|a, b| {
                a.entry
                    .file_name()
                    .unwrap_or_default()
                    .cmp(b.entry.file_name().unwrap_or_default())
            });
        } else {
            node.applications.sort_by(|a, b| {
                a.entry
                    .name
                    .to_lowercase()
                    .cmp(&b.entry.name.to_lowercase())
            });
        }
        node.applications.retain(|app| !app.entry.no_display);
    }

    let pools: Vec<&[Rc<PoolEntry>]> = ancestor_pools
        .iter()
        .copied()
        .chain(std::iter::once(node.pool.as_slice()))
        .collect();
    for child in &mut node.children {
        assign_applications(child, unallocated_pass, strict, &pools)?;
    }
    Ok(())
}
