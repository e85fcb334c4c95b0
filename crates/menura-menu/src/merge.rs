//! Menu-file merging
//!
//! `<MergeFile>`, `<MergeDir>` and `<DefaultMergeDirs>` splice other menu
//! files into the tree under construction. Already-merged files and
//! directories are tracked by canonical path so cycles degrade to no-ops.

use std::path::{Path, PathBuf};

use tracing::debug;

use menura_entry::XdgPaths;

use crate::errors::{MenuError, Result};
use crate::model::MenuNode;
use crate::parse::{self, BuildContext};
use crate::xml::XmlNode;

/// Merge the menu file at `path` into `dest`. A missing file is skipped;
/// a present but unreadable or malformed file aborts the build.
pub(crate) fn merge_file(dest: &mut MenuNode, path: &Path, ctx: &mut BuildContext) -> Result<()> {
    if !path.exists() {
        debug!(path = %path.display(), "merge file missing, skipping");
        return Ok(());
    }
    let canonical = match path.canonicalize() {
        Ok(canonical) => canonical,
        Err(err) => {
            return Err(MenuError::Io {
                path: path.to_path_buf(),
                source: err,
            })
        }
    };
    if !ctx.merged_files.insert(canonical) {
        debug!(path = %path.display(), "merge cycle detected, skipping");
        return Ok(());
    }

    let xml = XmlNode::from_file(path)?;
    if xml.tag != "Menu" {
        return Err(MenuError::RootTag {
            path: path.to_path_buf(),
        });
    }
    let mut src = MenuNode::new(parse::source_file(path));
    parse::handle_menu(&mut src, &xml, ctx)?;
    concatenate(dest, src);
    Ok(())
}

/// Merge every `.menu` file found directly in `dir`, in name order.
pub(crate) fn merge_dir(dest: &mut MenuNode, dir: &Path, ctx: &mut BuildContext) -> Result<()> {
    let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    if !ctx.merged_dirs.insert(canonical) {
        debug!(path = %dir.display(), "merge directory already processed, skipping");
        return Ok(());
    }
    for entry in parse::sorted_dir(dir) {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "menu") && path.is_file() {
            merge_file(dest, &path, ctx)?;
        }
    }
    Ok(())
}

/// Merge `menus/<base>-merged` from every config dir, where `base` is the
/// current menu file's name without its extension. A prefixed
/// `applications.menu` falls back to plain `applications`.
pub(crate) fn default_merge_dirs(dest: &mut MenuNode, ctx: &mut BuildContext) -> Result<()> {
    let Some(file_name) = dest.file.name.clone() else {
        debug!("menu has no file name, skipping default merge dirs");
        return Ok(());
    };
    let prefix = ctx.xdg.menu_prefix();
    let base = if (prefix == "gnome-" || prefix == "kde-")
        && file_name == format!("{prefix}applications.menu")
    {
        "applications".to_string()
    } else {
        match file_name.rfind('.') {
            Some(dot) => file_name[..dot].to_string(),
            None => file_name,
        }
    };
    for dir in ctx.xdg.config_dirs_with(&format!("menus/{base}-merged")) {
        merge_dir(dest, &dir, ctx)?;
    }
    Ok(())
}

/// For `<MergeFile type="parent">`: the next file with the same path
/// relative to its config root, in the config search order after the root
/// containing the current file.
pub(crate) fn parent_merge_target(node: &MenuNode, xdg: &XdgPaths) -> Option<PathBuf> {
    let file_name = node.file.name.as_deref()?;
    let roots: Vec<&Path> = xdg.config_roots().collect();
    let (index, relative) = roots.iter().enumerate().find_map(|(index, root)| {
        node.file
            .dir
            .strip_prefix(root)
            .ok()
            .map(|relative| (index, relative))
    })?;
    for root in &roots[index + 1..] {
        let candidate = root.join(relative).join(file_name);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

/// Fold `src` into `dest`. Scalar fields transfer only where `dest` has
/// none; ordered lists from `src` come first (they were declared earlier
/// in merge order); same-named sub-menus fold recursively, the rest are
/// prepended.
pub(crate) fn concatenate(dest: &mut MenuNode, src: MenuNode) {
    if dest.name.is_none() {
        dest.name = src.name;
    }
    if dest.directory.is_none() {
        dest.directory = src.directory;
    }
    if dest.only_unallocated.is_none() {
        dest.only_unallocated = src.only_unallocated;
    }
    if dest.deleted.is_none() {
        dest.deleted = src.deleted;
    }

    dest.app_dirs.splice(0..0, src.app_dirs);
    dest.directory_dirs.splice(0..0, src.directory_dirs);
    dest.moves.splice(0..0, src.moves);
    dest.filters.splice(0..0, src.filters);
    // directory references stay most-recent-first, so the absorbing
    // node's own references keep precedence
    dest.directories.extend(src.directories);

    for sub in src.children.into_iter().rev() {
        match sub.name.as_deref().and_then(|name| dest.child_index(name)) {
            Some(index) => concatenate(&mut dest.children[index], sub),
            None => dest.children.insert(0, sub),
        }
    }
}
