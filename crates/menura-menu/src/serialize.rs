//! Menu-definition output
//!
//! Renders a resolved [`Menu`] tree back into menu-definition XML: every
//! entry pinned through an explicit `<Layout>` and an `<Include>` listing
//! the desktop-file ids, so resolving the written file reproduces the
//! tree.

use std::fmt::Write as _;
use std::path::Path;

use crate::errors::{MenuError, Result};
use crate::model::{Menu, MenuEntry};

const DOCTYPE: &str = "<!DOCTYPE Menu PUBLIC \"-//freedesktop//DTD Menu 1.0//EN\" \
     \"http://www.freedesktop.org/standards/menu-spec/menu-1.0.dtd\">";

impl Menu {
    /// Render the tree as a standalone menu-definition document.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\"?>\n");
        out.push_str(DOCTYPE);
        out.push('\n');
        write_menu(&mut out, self, 0);
        out
    }

    /// Write the rendered document to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_xml()).map_err(|err| MenuError::Io {
            path: path.to_path_buf(),
            source: err,
        })
    }
}

fn write_menu(out: &mut String, menu: &Menu, depth: usize) {
    let pad = "  ".repeat(depth);
    let inner = "  ".repeat(depth + 1);
    let _ = writeln!(out, "{pad}<Menu>");
    let _ = writeln!(out, "{inner}<Name>{}</Name>", escape(&menu.id));
    if depth == 0 {
        let _ = writeln!(out, "{inner}<DefaultAppDirs/>");
        let _ = writeln!(out, "{inner}<DefaultDirectoryDirs/>");
    }
    if let Some(directory) = &menu.directory {
        if let Some(name) = directory.file_name() {
            let _ = writeln!(out, "{inner}<Directory>{}</Directory>", escape(name));
        }
    }

    if !menu.entries.is_empty() {
        let _ = writeln!(out, "{inner}<Layout>");
        for entry in &menu.entries {
            match entry {
                MenuEntry::Menu(sub) => {
                    let _ = writeln!(out, "{inner}  <Menuname>{}</Menuname>", escape(&sub.id));
                }
                MenuEntry::Desktop { id, .. } => {
                    let _ = writeln!(out, "{inner}  <Filename>{}</Filename>", escape(id));
                }
                MenuEntry::Separator => {
                    let _ = writeln!(out, "{inner}  <Separator/>");
                }
                // headers are a rendering artifact with no definition form
                MenuEntry::Header { .. } => {}
            }
        }
        let _ = writeln!(out, "{inner}</Layout>");
    }

    if menu.desktop_ids().next().is_some() {
        let _ = writeln!(out, "{inner}<Include>");
        for id in menu.desktop_ids() {
            let _ = writeln!(out, "{inner}  <Filename>{}</Filename>", escape(id));
        }
        let _ = writeln!(out, "{inner}</Include>");
    }

    for entry in &menu.entries {
        if let MenuEntry::Menu(sub) = entry {
            write_menu(out, sub, depth + 1);
        }
    }
    let _ = writeln!(out, "{pad}</Menu>");
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
