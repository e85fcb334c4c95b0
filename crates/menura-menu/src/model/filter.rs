//! Include/Exclude filter rules
//!
//! An `<Include>` or `<Exclude>` block is parsed into a [`FilterRule`]
//! whose operation tree is evaluated against pool entries by id and
//! category set.

use menura_entry::DesktopEntry;

/// Constraints carried by a boolean filter operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FilterTerms {
    pub categories: Vec<String>,
    pub filenames: Vec<String>,
    pub children: Vec<FilterOp>,
}

impl FilterTerms {
    fn any_matches(&self, id: &str, entry: &DesktopEntry) -> bool {
        self.categories
            .iter()
            .any(|c| entry.categories.iter().any(|have| have == c))
            || self.filenames.iter().any(|f| f == id)
            || self.children.iter().any(|op| op.matches(id, entry))
    }
}

/// One boolean filter operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FilterOp {
    /// `<All/>`: every record
    MatchAll,
    /// Any constraint holds; vacuously false
    Or(FilterTerms),
    /// Every present constraint holds; vacuously true
    And(FilterTerms),
    /// Negation of the `Or` test over the same constraints
    Not(FilterTerms),
}

impl FilterOp {
    /// Whether the pool entry with id `id` and record `entry` matches.
    pub fn matches(&self, id: &str, entry: &DesktopEntry) -> bool {
        match self {
            FilterOp::MatchAll => true,
            FilterOp::Or(terms) => terms.any_matches(id, entry),
            FilterOp::And(terms) => {
                // a category requirement can never hold for a record
                // without categories
                if !terms.categories.is_empty() && entry.categories.is_empty() {
                    return false;
                }
                terms
                    .categories
                    .iter()
                    .all(|c| entry.categories.iter().any(|have| have == c))
                    && terms.filenames.iter().all(|f| f == id)
                    && terms.children.iter().all(|op| op.matches(id, entry))
            }
            FilterOp::Not(terms) => !terms.any_matches(id, entry),
        }
    }
}

/// Whether a rule adds or removes applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Polarity {
    Include,
    Exclude,
}

/// A filter operation plus its polarity, in document order on the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FilterRule {
    pub polarity: Polarity,
    pub op: FilterOp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use menura_entry::ini::Locale;
    use std::path::PathBuf;

    fn record(categories: &str) -> DesktopEntry {
        let text = format!(
            "[Desktop Entry]\nType=Application\nName=X\nCategories={categories}\n"
        );
        DesktopEntry::parse(PathBuf::from("/apps/x.desktop"), &text, &Locale::default()).unwrap()
    }

    fn or(categories: &[&str], filenames: &[&str]) -> FilterOp {
        FilterOp::Or(FilterTerms {
            categories: categories.iter().map(|s| s.to_string()).collect(),
            filenames: filenames.iter().map(|s| s.to_string()).collect(),
            children: Vec::new(),
        })
    }

    #[test]
    fn test_match_all() {
        assert!(FilterOp::MatchAll.matches("x.desktop", &record("")));
    }

    #[test]
    fn test_or_matches_category_or_filename() {
        let op = or(&["Game"], &["x.desktop"]);
        assert!(op.matches("other.desktop", &record("Game;Arcade;")));
        assert!(op.matches("x.desktop", &record("Utility;")));
        assert!(!op.matches("other.desktop", &record("Utility;")));
        // vacuous Or is false
        assert!(!or(&[], &[]).matches("x.desktop", &record("Game;")));
    }

    #[test]
    fn test_and_requires_every_constraint() {
        let op = FilterOp::And(FilterTerms {
            categories: vec!["Game".to_string(), "Arcade".to_string()],
            filenames: Vec::new(),
            children: Vec::new(),
        });
        assert!(op.matches("x.desktop", &record("Arcade;Game;")));
        assert!(!op.matches("x.desktop", &record("Game;")));
        // empty constraint sets are vacuously satisfied
        assert!(FilterOp::And(FilterTerms::default()).matches("x.desktop", &record("")));
    }

    #[test]
    fn test_and_with_categories_never_matches_category_less_record() {
        let op = FilterOp::And(FilterTerms {
            categories: vec!["Game".to_string()],
            filenames: vec!["x.desktop".to_string()],
            children: Vec::new(),
        });
        // the filename alone would match, but the category requirement
        // fails against an empty category set
        assert!(!op.matches("x.desktop", &record("")));
    }

    #[test]
    fn test_not_negates_the_or_test() {
        let op = FilterOp::Not(FilterTerms {
            categories: vec!["Game".to_string()],
            filenames: Vec::new(),
            children: Vec::new(),
        });
        assert!(!op.matches("x.desktop", &record("Game;")));
        assert!(op.matches("x.desktop", &record("Utility;")));
    }

    #[test]
    fn test_match_all_under_not_matches_nothing() {
        let op = FilterOp::Not(FilterTerms {
            categories: Vec::new(),
            filenames: Vec::new(),
            children: vec![FilterOp::MatchAll],
        });
        assert!(!op.matches("x.desktop", &record("Game;")));
        assert!(!op.matches("y.desktop", &record("")));
    }

    #[test]
    fn test_nested_ops() {
        // Or over an And child
        let op = FilterOp::Or(FilterTerms {
            categories: Vec::new(),
            filenames: Vec::new(),
            children: vec![FilterOp::And(FilterTerms {
                categories: vec!["Game".to_string()],
                filenames: Vec::new(),
                children: Vec::new(),
            })],
        });
        assert!(op.matches("x.desktop", &record("Game;")));
        assert!(!op.matches("x.desktop", &record("Utility;")));
    }
}
