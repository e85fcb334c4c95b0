//! Definition parser
//!
//! Walks a generic [`XmlNode`] tree into the intermediate [`MenuNode`]
//! tree. Children of a `<Menu>` element are processed in reverse document
//! order so that the tags where the last declaration wins (`Directory`,
//! `OnlyUnallocated`, `Layout`, ...) are seen first and can be dealt with
//! immediately; order-preserving list tags prepend to restore document
//! order.
//!
//! Every context has a closed tag vocabulary; a tag outside it aborts the
//! whole build.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use menura_entry::{EntryKind, EntryStore, XdgPaths};

use crate::errors::{MenuError, Result};
use crate::merge;
use crate::model::{
    AppDir, FilterOp, FilterRule, FilterTerms, InlineOverrides, LayoutDirective, MenuNode,
    MergeKind, MoveRule, Polarity, SourceFile,
};
use crate::xml::XmlNode;

/// Shared state of one top-level build.
pub(crate) struct BuildContext<'a> {
    pub xdg: &'a XdgPaths,
    pub store: &'a EntryStore,
    pub kde_legacy_dirs: &'a [PathBuf],
    /// Canonical paths of every file merged so far
    pub merged_files: HashSet<PathBuf>,
    /// Canonical paths of every directory merged so far
    pub merged_dirs: HashSet<PathBuf>,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        xdg: &'a XdgPaths,
        store: &'a EntryStore,
        kde_legacy_dirs: &'a [PathBuf],
    ) -> BuildContext<'a> {
        BuildContext {
            xdg,
            store,
            kde_legacy_dirs,
            merged_files: HashSet::new(),
            merged_dirs: HashSet::new(),
        }
    }
}

/// Tags recognized under `<Menu>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuTag {
    Menu,
    Name,
    Directory,
    AppDir,
    DefaultAppDirs,
    DirectoryDir,
    DefaultDirectoryDirs,
    OnlyUnallocated,
    NotOnlyUnallocated,
    Deleted,
    NotDeleted,
    Include,
    Exclude,
    MergeFile,
    MergeDir,
    DefaultMergeDirs,
    LegacyDir,
    KdeLegacyDirs,
    Move,
    Layout,
    DefaultLayout,
}

impl MenuTag {
    fn parse(tag: &str) -> Option<MenuTag> {
        Some(match tag {
            "Menu" => MenuTag::Menu,
            "Name" => MenuTag::Name,
            "Directory" => MenuTag::Directory,
            "AppDir" => MenuTag::AppDir,
            "DefaultAppDirs" => MenuTag::DefaultAppDirs,
            "DirectoryDir" => MenuTag::DirectoryDir,
            "DefaultDirectoryDirs" => MenuTag::DefaultDirectoryDirs,
            "OnlyUnallocated" => MenuTag::OnlyUnallocated,
            "NotOnlyUnallocated" => MenuTag::NotOnlyUnallocated,
            "Deleted" => MenuTag::Deleted,
            "NotDeleted" => MenuTag::NotDeleted,
            "Include" => MenuTag::Include,
            "Exclude" => MenuTag::Exclude,
            "MergeFile" => MenuTag::MergeFile,
            "MergeDir" => MenuTag::MergeDir,
            "DefaultMergeDirs" => MenuTag::DefaultMergeDirs,
            "LegacyDir" => MenuTag::LegacyDir,
            "KDELegacyDirs" => MenuTag::KdeLegacyDirs,
            "Move" => MenuTag::Move,
            "Layout" => MenuTag::Layout,
            "DefaultLayout" => MenuTag::DefaultLayout,
            _ => return None,
        })
    }
}

/// Split a menu-file path into its [`SourceFile`] parts.
pub(crate) fn source_file(path: &Path) -> SourceFile {
    SourceFile {
        dir: path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
        name: path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string),
    }
}

/// Load and parse the menu file at `path` into a fresh node tree.
pub(crate) fn parse_root(path: &Path, ctx: &mut BuildContext) -> Result<MenuNode> {
    let xml = XmlNode::from_file(path)?;
    if xml.tag != "Menu" {
        return Err(MenuError::RootTag {
            path: path.to_path_buf(),
        });
    }
    let mut node = MenuNode::new(source_file(path));
    handle_menu(&mut node, &xml, ctx)?;
    Ok(node)
}

/// Populate `node` from the children of a `<Menu>` element.
pub(crate) fn handle_menu(node: &mut MenuNode, xml: &XmlNode, ctx: &mut BuildContext) -> Result<()> {
    for child in xml.children.iter().rev() {
        let tag = MenuTag::parse(&child.tag).ok_or_else(|| MenuError::UnknownTag {
            context: "Menu".to_string(),
            tag: child.tag.clone(),
        })?;
        match tag {
            MenuTag::Menu => handle_sub_menu(node, child, ctx)?,
            MenuTag::Name => handle_name(node, child)?,
            MenuTag::Directory => {
                // most recently declared reference first
                node.directories.push(required_text(child)?.to_string());
            }
            MenuTag::AppDir => {
                let path = resolve_path(node, required_text(child)?);
                if !node.app_dirs.iter().any(|dir| dir.path == path) {
                    node.app_dirs.insert(0, AppDir::plain(path));
                }
            }
            MenuTag::DefaultAppDirs => {
                let defaults: Vec<AppDir> = ctx
                    .xdg
                    .data_dirs_with("applications")
                    .into_iter()
                    .filter(|path| !node.app_dirs.iter().any(|dir| &dir.path == path))
                    .map(AppDir::plain)
                    .collect();
                node.app_dirs.splice(0..0, defaults);
            }
            MenuTag::DirectoryDir => {
                let path = resolve_path(node, required_text(child)?);
                if !node.directory_dirs.contains(&path) {
                    node.directory_dirs.insert(0, path);
                }
            }
            MenuTag::DefaultDirectoryDirs => {
                // inserted one by one, so the scan (front to back, last
                // write wins) ends with the data-home dir overriding the
                // system dirs
                for path in ctx.xdg.data_dirs_with("desktop-directories") {
                    if !node.directory_dirs.contains(&path) {
                        node.directory_dirs.insert(0, path);
                    }
                }
            }
            MenuTag::OnlyUnallocated => {
                // the reverse walk sees the document-last flag first
                node.only_unallocated.get_or_insert(true);
            }
            MenuTag::NotOnlyUnallocated => {
                node.only_unallocated.get_or_insert(false);
            }
            MenuTag::Deleted => {
                node.deleted.get_or_insert(true);
            }
            MenuTag::NotDeleted => {
                node.deleted.get_or_insert(false);
            }
            MenuTag::Include => handle_filter(node, child, Polarity::Include)?,
            MenuTag::Exclude => handle_filter(node, child, Polarity::Exclude)?,
            MenuTag::MergeFile => handle_merge_file(node, child, ctx)?,
            MenuTag::MergeDir => {
                let path = resolve_path(node, required_text(child)?);
                merge::merge_dir(node, &path, ctx)?;
            }
            MenuTag::DefaultMergeDirs => merge::default_merge_dirs(node, ctx)?,
            MenuTag::LegacyDir => handle_legacy_dir(node, child, ctx)?,
            MenuTag::KdeLegacyDirs => handle_kde_legacy_dirs(node, ctx)?,
            MenuTag::Move => handle_move(node, child)?,
            MenuTag::Layout => {
                // under the reverse walk the document-last layout wins
                if node.layout.is_empty() {
                    node.layout = parse_layout_directives(child, "Layout")?;
                }
            }
            MenuTag::DefaultLayout => handle_default_layout(node, child)?,
        }
    }
    Ok(())
}

fn handle_sub_menu(node: &mut MenuNode, xml: &XmlNode, ctx: &mut BuildContext) -> Result<()> {
    let mut sub = MenuNode::new(SourceFile {
        dir: node.file.dir.clone(),
        name: None,
    });
    handle_menu(&mut sub, xml, ctx)?;

    // a same-named sibling absorbs the new content instead of duplicating
    match sub.name.as_deref().and_then(|name| node.child_index(name)) {
        Some(index) => merge::concatenate(&mut node.children[index], sub),
        None => node.children.insert(0, sub),
    }
    Ok(())
}

fn handle_name(node: &mut MenuNode, xml: &XmlNode) -> Result<()> {
    let text = required_text(xml)?;
    if text.contains('/') {
        warn!(name = text, "ignoring menu name containing a path separator");
        return Ok(());
    }
    // overwrite: the reverse walk ends on the document-first name
    node.name = Some(text.to_string());
    Ok(())
}

fn handle_filter(node: &mut MenuNode, xml: &XmlNode, polarity: Polarity) -> Result<()> {
    let mut terms = FilterTerms::default();
    parse_filter_terms(&mut terms, xml)?;
    node.filters.insert(
        0,
        FilterRule {
            polarity,
            // the children of Include/Exclude stand in an or relationship
            op: FilterOp::Or(terms),
        },
    );
    Ok(())
}

/// Tags recognized inside filter operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterTag {
    Filename,
    Category,
    All,
    And,
    Or,
    Not,
}

impl FilterTag {
    fn parse(tag: &str) -> Option<FilterTag> {
        Some(match tag {
            "Filename" => FilterTag::Filename,
            "Category" => FilterTag::Category,
            "All" => FilterTag::All,
            "And" => FilterTag::And,
            "Or" => FilterTag::Or,
            "Not" => FilterTag::Not,
            _ => return None,
        })
    }
}

fn parse_filter_terms(terms: &mut FilterTerms, xml: &XmlNode) -> Result<()> {
    for child in &xml.children {
        let tag = FilterTag::parse(&child.tag).ok_or_else(|| MenuError::UnknownTag {
            context: xml.tag.clone(),
            tag: child.tag.clone(),
        })?;
        match tag {
            FilterTag::Filename => terms.filenames.push(required_text(child)?.to_string()),
            FilterTag::Category => terms.categories.push(required_text(child)?.to_string()),
            FilterTag::All => terms.children.push(FilterOp::MatchAll),
            FilterTag::And => terms.children.push(FilterOp::And(sub_terms(child)?)),
            FilterTag::Or => terms.children.push(FilterOp::Or(sub_terms(child)?)),
            FilterTag::Not => terms.children.push(FilterOp::Not(sub_terms(child)?)),
        }
    }
    Ok(())
}

fn sub_terms(xml: &XmlNode) -> Result<FilterTerms> {
    let mut terms = FilterTerms::default();
    parse_filter_terms(&mut terms, xml)?;
    Ok(terms)
}

fn handle_merge_file(node: &mut MenuNode, xml: &XmlNode, ctx: &mut BuildContext) -> Result<()> {
    let path = if xml.attr("type") == Some("parent") {
        match merge::parent_merge_target(node, ctx.xdg) {
            Some(path) => path,
            None => return Ok(()),
        }
    } else {
        resolve_path(node, required_text(xml)?)
    };
    merge::merge_file(node, &path, ctx)
}

/// Tags recognized inside `<Move>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveTag {
    Old,
    New,
}

impl MoveTag {
    fn parse(tag: &str) -> Option<MoveTag> {
        match tag {
            "Old" => Some(MoveTag::Old),
            "New" => Some(MoveTag::New),
            _ => None,
        }
    }
}

fn handle_move(node: &mut MenuNode, xml: &XmlNode) -> Result<()> {
    let mut pending: Option<String> = None;
    for child in &xml.children {
        let tag = MoveTag::parse(&child.tag).ok_or_else(|| MenuError::UnknownTag {
            context: "Move".to_string(),
            tag: child.tag.clone(),
        })?;
        match tag {
            MoveTag::Old => {
                if pending.is_some() {
                    return Err(MenuError::IncompleteMove {
                        reason: "second <Old> before <New>".to_string(),
                    });
                }
                let from = required_text(child)?.to_string();
                // a repeated origin replaces the earlier rule
                node.moves.retain(|rule| rule.from != from);
                pending = Some(from);
            }
            MoveTag::New => {
                let from = pending.take().ok_or_else(|| MenuError::IncompleteMove {
                    reason: "<New> without a preceding <Old>".to_string(),
                })?;
                node.moves.push(MoveRule {
                    from,
                    to: required_text(child)?.to_string(),
                });
            }
        }
    }
    if pending.is_some() {
        return Err(MenuError::IncompleteMove {
            reason: "<Old> without a following <New>".to_string(),
        });
    }
    Ok(())
}

fn handle_default_layout(node: &mut MenuNode, xml: &XmlNode) -> Result<()> {
    if !node.default_layout.is_empty() {
        return Ok(());
    }
    let overrides = parse_inline_overrides(xml)?;
    apply_overrides(&mut node.flags, overrides);
    node.default_layout = parse_layout_directives(xml, "DefaultLayout")?;
    Ok(())
}

fn apply_overrides(flags: &mut InlineOverrides, overrides: InlineOverrides) {
    if overrides.show_empty.is_some() {
        flags.show_empty = overrides.show_empty;
    }
    if overrides.inline.is_some() {
        flags.inline = overrides.inline;
    }
    if overrides.inline_limit.is_some() {
        flags.inline_limit = overrides.inline_limit;
    }
    if overrides.inline_header.is_some() {
        flags.inline_header = overrides.inline_header;
    }
    if overrides.inline_alias.is_some() {
        flags.inline_alias = overrides.inline_alias;
    }
}

/// Tags recognized inside `<Layout>` and `<DefaultLayout>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LayoutTag {
    Menuname,
    Filename,
    Separator,
    Merge,
}

impl LayoutTag {
    fn parse(tag: &str) -> Option<LayoutTag> {
        match tag {
            "Menuname" => Some(LayoutTag::Menuname),
            "Filename" => Some(LayoutTag::Filename),
            "Separator" => Some(LayoutTag::Separator),
            "Merge" => Some(LayoutTag::Merge),
            _ => None,
        }
    }
}

fn parse_layout_directives(xml: &XmlNode, context: &str) -> Result<Vec<LayoutDirective>> {
    let mut directives = Vec::new();
    for child in &xml.children {
        let tag = LayoutTag::parse(&child.tag).ok_or_else(|| MenuError::UnknownTag {
            context: context.to_string(),
            tag: child.tag.clone(),
        })?;
        match tag {
            LayoutTag::Menuname => directives.push(LayoutDirective::MenuName(
                required_text(child)?.to_string(),
                parse_inline_overrides(child)?,
            )),
            LayoutTag::Filename => {
                directives.push(LayoutDirective::Filename(required_text(child)?.to_string()))
            }
            LayoutTag::Separator => directives.push(LayoutDirective::Separator),
            LayoutTag::Merge => {
                let kind = match child.attr("type") {
                    Some("files") => MergeKind::Files,
                    Some("menus") => MergeKind::Menus,
                    Some("all") => MergeKind::All,
                    other => {
                        return Err(MenuError::InvalidAttr {
                            tag: "Merge".to_string(),
                            attr: "type".to_string(),
                            value: other.unwrap_or_default().to_string(),
                        })
                    }
                };
                directives.push(LayoutDirective::Merge(kind));
            }
        }
    }
    Ok(directives)
}

fn parse_inline_overrides(xml: &XmlNode) -> Result<InlineOverrides> {
    let boolean = |name: &str| xml.attr(name).map(|value| value == "true");
    let inline_limit = match xml.attr("inline_limit") {
        Some(value) => Some(value.parse::<u32>().map_err(|_| MenuError::InvalidAttr {
            tag: xml.tag.clone(),
            attr: "inline_limit".to_string(),
            value: value.to_string(),
        })?),
        None => None,
    };
    Ok(InlineOverrides {
        show_empty: boolean("show_empty"),
        inline: boolean("inline"),
        inline_limit,
        inline_header: boolean("inline_header"),
        inline_alias: boolean("inline_alias"),
    })
}

fn handle_legacy_dir(node: &mut MenuNode, xml: &XmlNode, ctx: &mut BuildContext) -> Result<()> {
    let path = resolve_path(node, required_text(xml)?);
    let prefix = xml
        .attr("prefix")
        .filter(|prefix| !prefix.contains('/'))
        .map(str::to_string);
    merge_legacy_dir(node, &path, prefix.as_deref(), ctx);
    Ok(())
}

fn handle_kde_legacy_dirs(node: &mut MenuNode, ctx: &mut BuildContext) -> Result<()> {
    // the first configured directory that exists wins
    for dir in ctx.kde_legacy_dirs {
        if dir.is_dir() {
            let dir = dir.clone();
            merge_legacy_dir(node, &dir, Some("kde"), ctx);
            break;
        }
    }
    Ok(())
}

fn merge_legacy_dir(node: &mut MenuNode, path: &Path, prefix: Option<&str>, ctx: &BuildContext) {
    let mut subdir_app_dirs = Vec::new();
    if let Some(legacy) = legacy_scan(path, prefix, ctx, &mut subdir_app_dirs) {
        merge::concatenate(node, legacy);
        // sub-directory sources are recorded here too, so legacy ids are
        // resolvable from this node's pool throughout the tree
        node.app_dirs.extend(subdir_app_dirs);
    }
}

/// Build the menu hierarchy implied by a legacy directory: one node per
/// sub-directory, an include rule listing the category-less desktop
/// files, and the directory registered as a legacy application source.
fn legacy_scan(
    path: &Path,
    prefix: Option<&str>,
    ctx: &BuildContext,
    subdir_app_dirs: &mut Vec<AppDir>,
) -> Option<MenuNode> {
    if !path.is_dir() {
        debug!(path = %path.display(), "legacy directory missing, skipping");
        return None;
    }

    let mut node = MenuNode::new(SourceFile {
        dir: path.to_path_buf(),
        name: None,
    });
    node.name = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string);
    node.app_dirs.push(AppDir {
        path: path.to_path_buf(),
        prefix: prefix.map(str::to_string),
        legacy: true,
    });
    node.directory_dirs.push(path.to_path_buf());

    let mut filenames = Vec::new();
    for entry in sorted_dir(path) {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let child_path = entry.path();

        if child_path.is_dir() {
            let child_prefix = match prefix {
                Some(prefix) => format!("{prefix}-{name}"),
                None => name.to_string(),
            };
            if let Some(child) = legacy_scan(&child_path, Some(&child_prefix), ctx, subdir_app_dirs)
            {
                subdir_app_dirs.push(AppDir {
                    path: child_path,
                    prefix: Some(child_prefix),
                    legacy: true,
                });
                node.children.push(child);
            }
            continue;
        }

        if name == ".directory" {
            match ctx.store.load(&child_path) {
                Ok(record) if record.kind == EntryKind::Directory => {
                    node.directory = Some(record);
                }
                Ok(_) => {}
                Err(err) => debug!(path = %child_path.display(), error = %err, "skipping legacy .directory"),
            }
            continue;
        }

        if !name.ends_with(".desktop") {
            continue;
        }
        match ctx.store.load(&child_path) {
            // files with categories already take part in normal filtering
            Ok(record)
                if record.kind == EntryKind::Application && record.categories.is_empty() =>
            {
                filenames.push(legacy_id(prefix, name));
            }
            Ok(_) => {}
            Err(err) => {
                debug!(path = %child_path.display(), error = %err, "skipping legacy desktop file")
            }
        }
    }

    node.filters.push(FilterRule {
        polarity: Polarity::Include,
        op: FilterOp::Or(FilterTerms {
            categories: Vec::new(),
            filenames,
            children: Vec::new(),
        }),
    });
    Some(node)
}

/// File id of a legacy desktop file under an optional id prefix.
pub(crate) fn legacy_id(prefix: Option<&str>, file_name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}-{file_name}"),
        None => file_name.to_string(),
    }
}

/// Directory entries sorted by name, for deterministic scans. An
/// unreadable directory yields nothing; absence contributes nothing.
pub(crate) fn sorted_dir(path: &Path) -> Vec<std::fs::DirEntry> {
    let mut entries: Vec<std::fs::DirEntry> = match std::fs::read_dir(path) {
        Ok(iter) => iter.filter_map(|entry| entry.ok()).collect(),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "unreadable directory, skipping");
            Vec::new()
        }
    };
    entries.sort_by_key(|entry| entry.file_name());
    entries
}

fn required_text<'x>(xml: &'x XmlNode) -> Result<&'x str> {
    xml.text().ok_or_else(|| MenuError::MissingText {
        tag: xml.tag.clone(),
    })
}

/// Resolve a tag's path text against the current file's directory and
/// strip trailing separators.
fn resolve_path(node: &MenuNode, text: &str) -> PathBuf {
    let trimmed = if text.len() > 1 {
        text.trim_end_matches('/')
    } else {
        text
    };
    let path = Path::new(trimmed);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        node.file.dir.join(path)
    }
}
