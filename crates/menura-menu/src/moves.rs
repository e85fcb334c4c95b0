//! `<Move>` resolution
//!
//! Runs after all files are merged and before pools are built. Rules are
//! applied bottom-up so a child's moves settle before its parent's rules
//! can reference the results.

use tracing::debug;

use crate::merge;
use crate::model::MenuNode;

pub(crate) fn resolve_moves(node: &mut MenuNode) {
    for child in &mut node.children {
        resolve_moves(child);
    }
    for rule in std::mem::take(&mut node.moves) {
        let Some(origin) = detach(node, &rule.from) else {
            debug!(from = %rule.from, "move origin not found, skipping rule");
            continue;
        };
        graft(node, &rule.to, origin);
    }
}

/// Remove and return the descendant at the slash-separated `path`.
fn detach(node: &mut MenuNode, path: &str) -> Option<MenuNode> {
    let mut current = node;
    let mut parts = path.split('/').peekable();
    while let Some(part) = parts.next() {
        let index = current.child_index(part)?;
        if parts.peek().is_none() {
            return Some(current.children.remove(index));
        }
        current = &mut current.children[index];
    }
    None
}

/// Attach `origin` at the slash-separated `path`, creating only the
/// intermediate menus that do not exist yet. An existing menu at the
/// final component absorbs the origin's content.
fn graft(node: &mut MenuNode, path: &str, mut origin: MenuNode) {
    let mut current = node;
    let mut parts = path.split('/').peekable();
    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            match current.child_index(part) {
                Some(index) => merge::concatenate(&mut current.children[index], origin),
                None => {
                    origin.name = Some(part.to_string());
                    current.children.push(origin);
                }
            }
            return;
        }
        let index = match current.child_index(part) {
            Some(index) => index,
            None => {
                let mut intermediate = MenuNode::new(current.file.clone());
                intermediate.name = Some(part.to_string());
                current.children.push(intermediate);
                current.children.len() - 1
            }
        };
        current = &mut current.children[index];
    }
}
