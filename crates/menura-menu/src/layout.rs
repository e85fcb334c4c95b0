//! Layout resolution
//!
//! The last pipeline stage: consumes the intermediate node tree and
//! produces the public [`Menu`] tree. Each node's `<Layout>` directives
//! (or the nearest ancestor's `<DefaultLayout>`, or the implicit default
//! of sub-menus followed by applications) decide the order of its
//! entries, and the inline flags decide whether small sub-menus collapse
//! into their parent.

use std::rc::Rc;

use crate::model::{
    InlineFlags, LayoutDirective, Menu, MenuEntry, MenuNode, MergeKind, PoolEntry,
};

pub(crate) fn layout_tree(root: MenuNode) -> Menu {
    layout_menu(root, InlineFlags::default(), &[])
}

fn layout_menu(
    mut node: MenuNode,
    parent_flags: InlineFlags,
    inherited_default: &[LayoutDirective],
) -> Menu {
    let resolved = node.flags.apply(parent_flags);
    let own_layout = std::mem::take(&mut node.layout);
    let own_default = std::mem::take(&mut node.default_layout);
    // a node's own default layout applies to its children, not itself
    let child_default: &[LayoutDirective] = if own_default.is_empty() {
        inherited_default
    } else {
        &own_default
    };
    let directives: &[LayoutDirective] = if own_layout.is_empty() {
        inherited_default
    } else {
        &own_layout
    };

    let mut menu = Menu::new(node.name.clone().unwrap_or_default());
    menu.name = node.display_name().to_string();
    menu.icon = node.directory.as_ref().and_then(|dir| dir.icon.clone());
    menu.directory = node.directory.take();

    let mut subs = std::mem::take(&mut node.children);
    subs.sort_by(|a, b| {
        let a = a.name.as_deref().unwrap_or_default().to_lowercase();
        let b = b.name.as_deref().unwrap_or_default().to_lowercase();
        a.cmp(&b)
    });
    let mut apps = std::mem::take(&mut node.applications);

    if directives.is_empty() {
        // implicit default: sub-menus first, applications after
        for sub in subs {
            if sub.is_suppressed() {
                continue;
            }
            let laid_out = layout_menu(sub, resolved, child_default);
            if laid_out.entries.is_empty() {
                continue;
            }
            menu.entries.push(MenuEntry::Menu(laid_out));
        }
        for app in apps {
            menu.entries.push(desktop_entry(&app));
        }
        return menu;
    }

    for directive in directives {
        match directive {
            LayoutDirective::MenuName(name, overrides) => {
                let Some(index) = subs.iter().position(|sub| sub.is_named(name)) else {
                    continue;
                };
                let sub = subs.remove(index);
                if sub.is_suppressed() {
                    continue;
                }
                let effective = overrides.apply(sub.flags.apply(resolved));
                let laid_out = layout_menu(sub, resolved, child_default);
                place_menu(&mut menu.entries, laid_out, effective);
            }
            LayoutDirective::Filename(id) => {
                if let Some(index) = apps.iter().position(|app| &app.id == id) {
                    let app = apps.remove(index);
                    menu.entries.push(desktop_entry(&app));
                }
            }
            LayoutDirective::Separator => menu.entries.push(MenuEntry::Separator),
            LayoutDirective::Merge(kind) => {
                if matches!(kind, MergeKind::Menus | MergeKind::All) {
                    merge_remaining_menus(&mut menu.entries, &mut subs, resolved, child_default);
                }
                if matches!(kind, MergeKind::Files | MergeKind::All) {
                    merge_remaining_files(&mut menu.entries, &mut apps);
                }
            }
        }
    }
    menu
}

fn merge_remaining_menus(
    out: &mut Vec<MenuEntry>,
    subs: &mut Vec<MenuNode>,
    resolved: InlineFlags,
    child_default: &[LayoutDirective],
) {
    for sub in subs.drain(..).collect::<Vec<_>>() {
        if sub.is_suppressed() {
            continue;
        }
        let already_placed = sub.name.as_deref().is_some_and(|name| {
            out.iter()
                .any(|entry| matches!(entry, MenuEntry::Menu(menu) if menu.id == name))
        });
        if already_placed {
            continue;
        }
        let effective = sub.flags.apply(resolved);
        let laid_out = layout_menu(sub, resolved, child_default);
        place_menu(out, laid_out, effective);
    }
}

fn merge_remaining_files(out: &mut Vec<MenuEntry>, apps: &mut Vec<Rc<PoolEntry>>) {
    for app in apps.drain(..) {
        let already_placed = out
            .iter()
            .any(|entry| matches!(entry, MenuEntry::Desktop { id, .. } if *id == app.id));
        if already_placed {
            continue;
        }
        out.push(desktop_entry(&app));
    }
}

/// Append a laid-out sub-menu, applying the inline policy of the flags
/// that are effective for it.
fn place_menu(out: &mut Vec<MenuEntry>, menu: Menu, flags: InlineFlags) {
    if !flags.show_empty && is_content_free(&menu) {
        return;
    }
    let within_limit =
        flags.inline_limit == 0 || menu.entries.len() <= flags.inline_limit as usize;
    if !(flags.inline && within_limit) {
        out.push(MenuEntry::Menu(menu));
        return;
    }
    if menu.entries.is_empty() {
        // show_empty kept it alive; nothing to inline
        out.push(MenuEntry::Menu(menu));
        return;
    }

    let Menu {
        name,
        icon,
        mut entries,
        ..
    } = menu;
    if flags.inline_alias && entries.len() == 1 {
        let promoted = match entries.pop().unwrap_or(MenuEntry::Separator) {
            MenuEntry::Desktop {
                id,
                icon: child_icon,
                entry,
                ..
            } => MenuEntry::Desktop {
                id,
                name,
                icon: icon.or(child_icon),
                entry,
            },
            MenuEntry::Menu(mut sub) => {
                sub.name = name;
                sub.icon = icon.or(sub.icon);
                MenuEntry::Menu(sub)
            }
            other => other,
        };
        out.push(promoted);
        return;
    }
    if flags.inline_header {
        out.push(MenuEntry::Header { name, icon });
    }
    out.append(&mut entries);
}

/// Separators and headers alone do not make a menu worth showing.
fn is_content_free(menu: &Menu) -> bool {
    !menu
        .entries
        .iter()
        .any(|entry| matches!(entry, MenuEntry::Menu(_) | MenuEntry::Desktop { .. }))
}

fn desktop_entry(app: &Rc<PoolEntry>) -> MenuEntry {
    MenuEntry::Desktop {
        id: app.id.clone(),
        name: app.entry.name.clone(),
        icon: app.entry.icon.clone(),
        entry: Rc::clone(&app.entry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InlineOverrides, SourceFile};
    use menura_entry::ini::Locale;
    use menura_entry::DesktopEntry;
    use std::path::PathBuf;

    fn record(id: &str, name: &str, icon: Option<&str>) -> Rc<PoolEntry> {
        let icon_line = icon.map(|icon| format!("Icon={icon}\n")).unwrap_or_default();
        let text = format!(
            "[Desktop Entry]\nType=Application\nName={name}\nExec={name}\n{icon_line}"
        );
        let entry =
            DesktopEntry::parse(PathBuf::from(format!("/apps/{id}")), &text, &Locale::default())
                .unwrap();
        PoolEntry::new(id.to_string(), Rc::new(entry))
    }

    fn named(name: &str) -> MenuNode {
        let mut node = MenuNode::new(SourceFile {
            dir: PathBuf::from("/fixture"),
            name: None,
        });
        node.name = Some(name.to_string());
        node
    }

    fn labels(menu: &Menu) -> Vec<String> {
        menu.entries
            .iter()
            .map(|entry| match entry {
                MenuEntry::Menu(menu) => format!("menu:{}", menu.id),
                MenuEntry::Desktop { id, .. } => format!("app:{id}"),
                MenuEntry::Separator => "separator".to_string(),
                MenuEntry::Header { name, .. } => format!("header:{name}"),
            })
            .collect()
    }

    #[test]
    fn test_implicit_default_menus_before_apps() {
        let mut root = named("Root");
        let mut games = named("Games");
        games.applications.push(record("g.desktop", "Game", None));
        root.children.push(games);
        root.applications.push(record("a.desktop", "Alpha", None));

        let menu = layout_tree(root);
        assert_eq!(labels(&menu), vec!["menu:Games", "app:a.desktop"]);
    }

    #[test]
    fn test_implicit_default_sorts_menus_case_insensitively() {
        let mut root = named("Root");
        for name in ["zeta", "Alpha", "beta"] {
            let mut sub = named(name);
            sub.applications.push(record("x.desktop", "X", None));
            root.children.push(sub);
        }
        let menu = layout_tree(root);
        assert_eq!(labels(&menu), vec!["menu:Alpha", "menu:beta", "menu:zeta"]);
    }

    #[test]
    fn test_empty_menus_dropped_by_default() {
        let mut root = named("Root");
        root.children.push(named("Empty"));
        let menu = layout_tree(root);
        assert!(menu.entries.is_empty());
    }

    #[test]
    fn test_deleted_menus_are_suppressed() {
        let mut root = named("Root");
        let mut sub = named("Gone");
        sub.deleted = Some(true);
        sub.applications.push(record("x.desktop", "X", None));
        root.children.push(sub);
        let menu = layout_tree(root);
        assert!(menu.entries.is_empty());
    }

    #[test]
    fn test_explicit_layout_orders_entries() {
        let mut root = named("Root");
        let mut games = named("Games");
        games.applications.push(record("g.desktop", "Game", None));
        root.children.push(games);
        root.applications.push(record("a.desktop", "Alpha", None));
        root.applications.push(record("b.desktop", "Beta", None));
        root.layout = vec![
            LayoutDirective::Filename("b.desktop".to_string()),
            LayoutDirective::Separator,
            LayoutDirective::MenuName("Games".to_string(), InlineOverrides::default()),
            LayoutDirective::Merge(MergeKind::Files),
        ];

        let menu = layout_tree(root);
        assert_eq!(
            labels(&menu),
            vec!["app:b.desktop", "separator", "menu:Games", "app:a.desktop"]
        );
    }

    #[test]
    fn test_merge_all_appends_leftovers_without_duplicates() {
        let mut root = named("Root");
        let mut games = named("Games");
        games.applications.push(record("g.desktop", "Game", None));
        root.children.push(games);
        let mut office = named("Office");
        office.applications.push(record("o.desktop", "Office", None));
        root.children.push(office);
        root.applications.push(record("a.desktop", "Alpha", None));
        root.layout = vec![
            LayoutDirective::MenuName("Office".to_string(), InlineOverrides::default()),
            LayoutDirective::Filename("a.desktop".to_string()),
            LayoutDirective::Merge(MergeKind::All),
        ];

        let menu = layout_tree(root);
        assert_eq!(
            labels(&menu),
            vec!["menu:Office", "app:a.desktop", "menu:Games"]
        );
    }

    #[test]
    fn test_unmatched_directives_are_skipped() {
        let mut root = named("Root");
        root.applications.push(record("a.desktop", "Alpha", None));
        root.layout = vec![
            LayoutDirective::MenuName("Absent".to_string(), InlineOverrides::default()),
            LayoutDirective::Filename("missing.desktop".to_string()),
            LayoutDirective::Filename("a.desktop".to_string()),
        ];
        let menu = layout_tree(root);
        assert_eq!(labels(&menu), vec!["app:a.desktop"]);
    }

    #[test]
    fn test_show_empty_keeps_empty_menu() {
        let mut root = named("Root");
        root.children.push(named("Empty"));
        root.layout = vec![LayoutDirective::MenuName(
            "Empty".to_string(),
            InlineOverrides {
                show_empty: Some(true),
                ..InlineOverrides::default()
            },
        )];
        let menu = layout_tree(root);
        assert_eq!(labels(&menu), vec!["menu:Empty"]);
    }

    #[test]
    fn test_inline_splices_small_menu() {
        let mut root = named("Root");
        let mut tools = named("Tools");
        tools.applications.push(record("t1.desktop", "One", None));
        tools.applications.push(record("t2.desktop", "Two", None));
        root.children.push(tools);
        root.layout = vec![LayoutDirective::MenuName(
            "Tools".to_string(),
            InlineOverrides {
                inline: Some(true),
                inline_header: Some(false),
                ..InlineOverrides::default()
            },
        )];
        let menu = layout_tree(root);
        assert_eq!(labels(&menu), vec!["app:t1.desktop", "app:t2.desktop"]);
    }

    #[test]
    fn test_inline_header_precedes_spliced_entries() {
        let mut root = named("Root");
        let mut tools = named("Tools");
        tools.applications.push(record("t1.desktop", "One", None));
        root.children.push(tools);
        root.layout = vec![LayoutDirective::MenuName(
            "Tools".to_string(),
            InlineOverrides {
                inline: Some(true),
                inline_alias: Some(false),
                ..InlineOverrides::default()
            },
        )];
        let menu = layout_tree(root);
        assert_eq!(labels(&menu), vec!["header:Tools", "app:t1.desktop"]);
    }

    #[test]
    fn test_inline_alias_promotes_single_entry_under_menu_name() {
        let mut root = named("Root");
        let mut editors = named("Editors");
        editors
            .applications
            .push(record("vi.desktop", "Vi", Some("vi-icon")));
        root.children.push(editors);
        root.layout = vec![LayoutDirective::MenuName(
            "Editors".to_string(),
            InlineOverrides {
                inline: Some(true),
                inline_alias: Some(true),
                ..InlineOverrides::default()
            },
        )];

        let menu = layout_tree(root);
        let MenuEntry::Desktop { id, name, icon, .. } = &menu.entries[0] else {
            panic!("expected promoted desktop entry");
        };
        assert_eq!(id, "vi.desktop");
        assert_eq!(name, "Editors");
        // the child's icon survives when the menu itself has none
        assert_eq!(icon.as_deref(), Some("vi-icon"));
    }

    #[test]
    fn test_inline_alias_prefers_menu_icon_over_child_icon() {
        let text = "[Desktop Entry]\nType=Directory\nName=Editors\nIcon=editors-icon\n";
        let dir_record = DesktopEntry::parse(
            PathBuf::from("/dirs/editors.directory"),
            text,
            &Locale::default(),
        )
        .unwrap();
        let mut root = named("Root");
        let mut editors = named("Editors");
        editors.directory = Some(Rc::new(dir_record));
        editors
            .applications
            .push(record("vi.desktop", "Vi", Some("vi-icon")));
        root.children.push(editors);
        root.layout = vec![LayoutDirective::MenuName(
            "Editors".to_string(),
            InlineOverrides {
                inline: Some(true),
                inline_alias: Some(true),
                ..InlineOverrides::default()
            },
        )];

        let menu = layout_tree(root);
        let MenuEntry::Desktop { icon, .. } = &menu.entries[0] else {
            panic!("expected promoted desktop entry");
        };
        assert_eq!(icon.as_deref(), Some("editors-icon"));
    }

    #[test]
    fn test_inline_limit_blocks_large_menus() {
        let mut root = named("Root");
        let mut tools = named("Tools");
        for index in 0..3 {
            tools
                .applications
                .push(record(&format!("t{index}.desktop"), "T", None));
        }
        root.children.push(tools);
        root.layout = vec![LayoutDirective::MenuName(
            "Tools".to_string(),
            InlineOverrides {
                inline: Some(true),
                inline_limit: Some(2),
                ..InlineOverrides::default()
            },
        )];
        let menu = layout_tree(root);
        assert_eq!(labels(&menu), vec!["menu:Tools"]);
    }

    #[test]
    fn test_inline_limit_zero_is_unlimited() {
        let mut root = named("Root");
        let mut tools = named("Tools");
        for index in 0..10 {
            tools
                .applications
                .push(record(&format!("t{index}.desktop"), "T", None));
        }
        root.children.push(tools);
        root.layout = vec![LayoutDirective::MenuName(
            "Tools".to_string(),
            InlineOverrides {
                inline: Some(true),
                inline_limit: Some(0),
                inline_header: Some(false),
                ..InlineOverrides::default()
            },
        )];
        let menu = layout_tree(root);
        assert_eq!(menu.entries.len(), 10);
    }

    #[test]
    fn test_default_layout_inherited_by_children_not_self() {
        let mut root = named("Root");
        root.default_layout = vec![LayoutDirective::Separator];
        root.applications.push(record("a.desktop", "Alpha", None));
        let mut sub = named("Sub");
        sub.applications.push(record("s.desktop", "Sub", None));
        root.children.push(sub);

        let menu = layout_tree(root);
        // the root itself uses the implicit default
        assert_eq!(labels(&menu), vec!["menu:Sub", "app:a.desktop"]);
        let MenuEntry::Menu(sub) = &menu.entries[0] else {
            panic!("expected sub-menu");
        };
        // the child only sees the separator directive
        assert_eq!(labels(sub), vec!["separator"]);
    }

    #[test]
    fn test_explicit_layout_overrides_inherited_default() {
        let mut root = named("Root");
        root.default_layout = vec![LayoutDirective::Separator];
        let mut sub = named("Sub");
        sub.applications.push(record("s.desktop", "Sub", None));
        sub.layout = vec![LayoutDirective::Merge(MergeKind::Files)];
        root.children.push(sub);

        let menu = layout_tree(root);
        let MenuEntry::Menu(sub) = &menu.entries[0] else {
            panic!("expected sub-menu");
        };
        assert_eq!(labels(sub), vec!["app:s.desktop"]);
    }

    #[test]
    fn test_menu_name_uses_directory_record() {
        let text = "[Desktop Entry]\nType=Directory\nName=Fun and Games\nIcon=games\n";
        let dir_record = DesktopEntry::parse(
            PathBuf::from("/dirs/games.directory"),
            text,
            &Locale::default(),
        )
        .unwrap();
        let mut root = named("Root");
        let mut games = named("Games");
        games.directory = Some(Rc::new(dir_record));
        games.applications.push(record("g.desktop", "G", None));
        root.children.push(games);

        let menu = layout_tree(root);
        let MenuEntry::Menu(games) = &menu.entries[0] else {
            panic!("expected sub-menu");
        };
        assert_eq!(games.id, "Games");
        assert_eq!(games.name, "Fun and Games");
        assert_eq!(games.icon.as_deref(), Some("games"));
    }
}
