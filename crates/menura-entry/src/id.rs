//! Desktop file ids
//!
//! A desktop file is addressed by an id derived from its path relative to
//! an `applications` directory, with path separators turned into `-`:
//! `/usr/share/applications/kde/kate.desktop` has the id `kde-kate.desktop`.

use std::path::Path;

use crate::xdg::XdgPaths;

/// Compute the file id of `path` relative to `base`.
///
/// Returns `None` when `path` does not lie under `base`, equals it, or
/// contains non-UTF-8 components.
pub fn relative_id(path: &Path, base: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let mut parts = Vec::new();
    for component in rel.components() {
        parts.push(component.as_os_str().to_str()?);
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("-"))
}

/// Compute the file id of `path` under the XDG `applications` search
/// directories, or `None` when it lies under none of them.
///
/// When several search directories contain the path (nested roots), the
/// one listed last wins.
pub fn path_to_file_id(path: &Path, xdg: &XdgPaths) -> Option<String> {
    let mut id = None;
    for base in xdg.data_dirs_with("applications") {
        if let Some(candidate) = relative_id(path, &base) {
            id = Some(candidate);
        }
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture_xdg() -> XdgPaths {
        XdgPaths::from_env()
            .with_data_home("/home/ada/.local/share")
            .with_data_dirs(vec![PathBuf::from("/usr/share")])
    }

    #[test]
    fn test_plain_file_id() {
        let id = path_to_file_id(Path::new("/usr/share/applications/firefox.desktop"), &fixture_xdg());
        assert_eq!(id.as_deref(), Some("firefox.desktop"));
    }

    #[test]
    fn test_nested_file_id_joins_with_dashes() {
        let id = path_to_file_id(
            Path::new("/usr/share/applications/kde/net/kopete.desktop"),
            &fixture_xdg(),
        );
        assert_eq!(id.as_deref(), Some("kde-net-kopete.desktop"));
    }

    #[test]
    fn test_data_home_is_searched() {
        let id = path_to_file_id(
            Path::new("/home/ada/.local/share/applications/own.desktop"),
            &fixture_xdg(),
        );
        assert_eq!(id.as_deref(), Some("own.desktop"));
    }

    #[test]
    fn test_path_outside_search_dirs() {
        assert_eq!(path_to_file_id(Path::new("/opt/apps/x.desktop"), &fixture_xdg()), None);
        assert_eq!(
            path_to_file_id(Path::new("/usr/share/applications"), &fixture_xdg()),
            None
        );
    }

    #[test]
    fn test_relative_id() {
        let base = Path::new("/legacy/apps");
        assert_eq!(
            relative_id(Path::new("/legacy/apps/games/snake.desktop"), base).as_deref(),
            Some("games-snake.desktop")
        );
        assert_eq!(relative_id(Path::new("/other/snake.desktop"), base), None);
        assert_eq!(relative_id(base, base), None);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn ids_never_contain_separators(name in "[a-z]{1,8}", sub in "[a-z]{1,8}") {
                let base = PathBuf::from("/usr/share/applications");
                let path = base.join(&sub).join(format!("{name}.desktop"));
                let id = relative_id(&path, &base).unwrap();
                prop_assert!(!id.contains('/'));
                prop_assert_eq!(id, format!("{sub}-{name}.desktop"));
            }
        }
    }
}
