mod common;

use common::{labels, sub_menu, Fixture};
use menura_menu::{MenuEntry, MenuError};

#[test]
fn test_move_relocates_menu_and_its_entries() {
    let fx = Fixture::new();
    fx.application("data/applications/chess.desktop", "Chess", "Game;");
    let menu_file = fx.write(
        "config/menus/applications.menu",
        "<Menu>\n\
           <Name>Applications</Name>\n\
           <DefaultAppDirs/>\n\
           <Menu><Name>Games</Name><Include><Category>Game</Category></Include></Menu>\n\
           <Move><Old>Games</Old><New>Leisure/Games</New></Move>\n\
         </Menu>",
    );

    let menu = fx.resolver().resolve(&menu_file).unwrap();
    assert_eq!(labels(&menu), vec!["menu:Leisure"]);
    let leisure = sub_menu(&menu, "Leisure");
    assert_eq!(labels(leisure), vec!["menu:Games"]);
    assert_eq!(
        labels(sub_menu(leisure, "Games")),
        vec!["app:chess.desktop"]
    );
}

#[test]
fn test_move_into_existing_menu_merges_content() {
    let fx = Fixture::new();
    fx.application("data/applications/chess.desktop", "Chess", "Game;");
    fx.application("data/applications/writer.desktop", "Writer", "Office;");
    let menu_file = fx.write(
        "config/menus/applications.menu",
        "<Menu>\n\
           <Name>Applications</Name>\n\
           <DefaultAppDirs/>\n\
           <Menu><Name>Games</Name><Include><Category>Game</Category></Include></Menu>\n\
           <Menu><Name>Office</Name><Include><Category>Office</Category></Include></Menu>\n\
           <Move><Old>Games</Old><New>Office</New></Move>\n\
         </Menu>",
    );

    let menu = fx.resolver().resolve(&menu_file).unwrap();
    assert_eq!(labels(&menu), vec!["menu:Office"]);
    assert_eq!(
        labels(sub_menu(&menu, "Office")),
        vec!["app:chess.desktop", "app:writer.desktop"]
    );
}

#[test]
fn test_move_with_missing_destination_text_aborts() {
    let fx = Fixture::new();
    let menu_file = fx.write(
        "config/menus/applications.menu",
        "<Menu><Name>X</Name><Move><Old>A</Old><New/></Move></Menu>",
    );
    assert!(matches!(
        fx.resolver().resolve(&menu_file),
        Err(MenuError::MissingText { .. })
    ));
}

#[test]
fn test_only_unallocated_menu_takes_leftovers() {
    let fx = Fixture::new();
    fx.application("data/applications/chess.desktop", "Chess", "Game;");
    fx.application("data/applications/stray.desktop", "Stray", "Other;");
    let menu_file = fx.write(
        "config/menus/applications.menu",
        "<Menu>\n\
           <Name>Applications</Name>\n\
           <DefaultAppDirs/>\n\
           <Menu><Name>Games</Name><Include><Category>Game</Category></Include></Menu>\n\
           <Menu><Name>Other</Name><OnlyUnallocated/><Include><All/></Include></Menu>\n\
         </Menu>",
    );

    let menu = fx.resolver().resolve(&menu_file).unwrap();
    assert_eq!(labels(sub_menu(&menu, "Games")), vec!["app:chess.desktop"]);
    // only the entry no regular menu claimed
    assert_eq!(labels(sub_menu(&menu, "Other")), vec!["app:stray.desktop"]);
}

#[test]
fn test_sibling_only_unallocated_menus_share_nothing() {
    let fx = Fixture::new();
    fx.application("data/applications/stray.desktop", "Stray", "Other;");
    let menu_file = fx.write(
        "config/menus/applications.menu",
        "<Menu>\n\
           <Name>Applications</Name>\n\
           <DefaultAppDirs/>\n\
           <Menu><Name>First</Name><OnlyUnallocated/><Include><All/></Include></Menu>\n\
           <Menu><Name>Second</Name><OnlyUnallocated/><Include><All/></Include></Menu>\n\
         </Menu>",
    );

    // both siblings claim everything, but allocation marks are shared:
    // the entry lands in exactly one of them
    let menu = fx.resolver().resolve(&menu_file).unwrap();
    let first = labels(sub_menu(&menu, "First"));
    let second_placed = menu
        .entries
        .iter()
        .any(|entry| matches!(entry, MenuEntry::Menu(m) if m.id == "Second"));
    assert_eq!(first, vec!["app:stray.desktop"]);
    assert!(!second_placed, "the second menu stays empty and is pruned");
}

#[test]
fn test_explicit_layout_with_separator_and_merge() {
    let fx = Fixture::new();
    fx.application("data/applications/alpha.desktop", "Alpha", "Office;");
    fx.application("data/applications/beta.desktop", "Beta", "Office;");
    let menu_file = fx.write(
        "config/menus/applications.menu",
        "<Menu>\n\
           <Name>Applications</Name>\n\
           <DefaultAppDirs/>\n\
           <Include><Category>Office</Category></Include>\n\
           <Layout>\n\
             <Filename>beta.desktop</Filename>\n\
             <Separator/>\n\
             <Merge type=\"files\"/>\n\
           </Layout>\n\
         </Menu>",
    );

    let menu = fx.resolver().resolve(&menu_file).unwrap();
    assert_eq!(
        labels(&menu),
        vec!["app:beta.desktop", "separator", "app:alpha.desktop"]
    );
}

#[test]
fn test_inline_alias_promotes_single_entry() {
    let fx = Fixture::new();
    fx.write(
        "data/applications/vi.desktop",
        "[Desktop Entry]\nType=Application\nName=Vi\nExec=vi\nIcon=vi-icon\nCategories=TextEditor;\n",
    );
    let menu_file = fx.write(
        "config/menus/applications.menu",
        "<Menu>\n\
           <Name>Applications</Name>\n\
           <DefaultAppDirs/>\n\
           <Menu><Name>Editors</Name><Include><Category>TextEditor</Category></Include></Menu>\n\
           <Layout>\n\
             <Menuname inline=\"true\" inline_alias=\"true\">Editors</Menuname>\n\
           </Layout>\n\
         </Menu>",
    );

    let menu = fx.resolver().resolve(&menu_file).unwrap();
    assert_eq!(menu.entries.len(), 1);
    let MenuEntry::Desktop { id, name, icon, .. } = &menu.entries[0] else {
        panic!("expected an aliased desktop entry");
    };
    assert_eq!(id, "vi.desktop");
    assert_eq!(name, "Editors");
    assert_eq!(icon.as_deref(), Some("vi-icon"));
}

#[test]
fn test_inline_alias_takes_menu_name_and_icon() {
    let fx = Fixture::new();
    fx.write(
        "data/desktop-directories/editors.directory",
        "[Desktop Entry]\nType=Directory\nName=Editors\nIcon=editors-icon\n",
    );
    // the application carries no Icon of its own
    fx.application("data/applications/vi.desktop", "Vi", "TextEditor;");
    let menu_file = fx.write(
        "config/menus/applications.menu",
        "<Menu>\n\
           <Name>Applications</Name>\n\
           <DefaultAppDirs/>\n\
           <DefaultDirectoryDirs/>\n\
           <Menu>\n\
             <Name>Editors</Name>\n\
             <Directory>editors.directory</Directory>\n\
             <Include><Category>TextEditor</Category></Include>\n\
           </Menu>\n\
           <Layout>\n\
             <Menuname inline=\"true\" inline_alias=\"true\">Editors</Menuname>\n\
           </Layout>\n\
         </Menu>",
    );

    let menu = fx.resolver().resolve(&menu_file).unwrap();
    assert_eq!(menu.entries.len(), 1);
    let MenuEntry::Desktop { id, name, icon, .. } = &menu.entries[0] else {
        panic!("expected an aliased desktop entry");
    };
    assert_eq!(id, "vi.desktop");
    assert_eq!(name, "Editors");
    assert_eq!(icon.as_deref(), Some("editors-icon"));
}

#[test]
fn test_empty_menus_are_pruned_unless_show_empty() {
    let fx = Fixture::new();
    let menu_file = fx.write(
        "config/menus/applications.menu",
        "<Menu>\n\
           <Name>Applications</Name>\n\
           <Menu><Name>Nothing</Name></Menu>\n\
           <Menu><Name>Kept</Name></Menu>\n\
           <Layout>\n\
             <Menuname show_empty=\"true\">Kept</Menuname>\n\
             <Merge type=\"menus\"/>\n\
           </Layout>\n\
         </Menu>",
    );

    let menu = fx.resolver().resolve(&menu_file).unwrap();
    assert_eq!(labels(&menu), vec!["menu:Kept"]);
}

#[test]
fn test_default_layout_applies_to_descendants() {
    let fx = Fixture::new();
    fx.application("data/applications/chess.desktop", "Chess", "Game;");
    let menu_file = fx.write(
        "config/menus/applications.menu",
        "<Menu>\n\
           <Name>Applications</Name>\n\
           <DefaultAppDirs/>\n\
           <DefaultLayout><Separator/><Merge type=\"all\"/></DefaultLayout>\n\
           <Menu><Name>Games</Name><Include><Category>Game</Category></Include></Menu>\n\
         </Menu>",
    );

    let menu = fx.resolver().resolve(&menu_file).unwrap();
    // the root itself keeps the implicit order
    assert_eq!(labels(&menu), vec!["menu:Games"]);
    // the child starts with the inherited separator
    assert_eq!(
        labels(sub_menu(&menu, "Games")),
        vec!["separator", "app:chess.desktop"]
    );
}

#[test]
fn test_deleted_menu_suppressed_even_when_laid_out() {
    let fx = Fixture::new();
    fx.application("data/applications/chess.desktop", "Chess", "Game;");
    let menu_file = fx.write(
        "config/menus/applications.menu",
        "<Menu>\n\
           <Name>Applications</Name>\n\
           <DefaultAppDirs/>\n\
           <Menu><Name>Games</Name><Deleted/><Include><Category>Game</Category></Include></Menu>\n\
           <Layout><Menuname show_empty=\"true\">Games</Menuname></Layout>\n\
         </Menu>",
    );

    let menu = fx.resolver().resolve(&menu_file).unwrap();
    assert!(menu.entries.is_empty());
}
