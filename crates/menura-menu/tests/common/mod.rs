use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use menura_entry::XdgPaths;
use menura_menu::{Menu, MenuEntry, MenuResolver};

/// Disk layout for resolver tests: a temp directory standing in for the
/// whole XDG world, with `config/`, `data/`, `sysconf/` and `sysdata/`
/// as the four search roots.
pub struct Fixture {
    temp: TempDir,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Fixture {
        Fixture {
            temp: tempfile::tempdir().expect("temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp.path().join(relative)
    }

    /// Write a file under the fixture root, creating parent directories.
    pub fn write(&self, relative: &str, text: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().expect("parent dir")).expect("create dirs");
        fs::write(&path, text).expect("write fixture file");
        path
    }

    /// Write an application desktop file.
    pub fn application(&self, relative: &str, name: &str, categories: &str) -> PathBuf {
        self.write(
            relative,
            &format!(
                "[Desktop Entry]\nType=Application\nName={name}\nExec={name}\nCategories={categories}\n"
            ),
        )
    }

    /// Write a directory entry file.
    pub fn directory_entry(&self, relative: &str, name: &str) -> PathBuf {
        self.write(
            relative,
            &format!("[Desktop Entry]\nType=Directory\nName={name}\nIcon={name}-icon\n"),
        )
    }

    /// Resolver whose search paths all point into the fixture.
    pub fn resolver(&self) -> MenuResolver {
        let xdg = XdgPaths::from_env()
            .with_data_home(self.path("data"))
            .with_data_dirs(vec![self.path("sysdata")])
            .with_config_home(self.path("config"))
            .with_config_dirs(vec![self.path("sysconf")])
            .with_menu_prefix("");
        MenuResolver::with_paths(xdg)
    }
}

/// Flatten a menu's entries into readable labels for assertions.
#[allow(dead_code)]
pub fn labels(menu: &Menu) -> Vec<String> {
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

/// Find a direct sub-menu by internal name.
#[allow(dead_code)]
pub fn sub_menu<'m>(menu: &'m Menu, id: &str) -> &'m Menu {
    menu.entries
        .iter()
        .find_map(|entry| match entry {
            MenuEntry::Menu(menu) if menu.id == id => Some(menu),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no sub-menu named {id}"))
}
