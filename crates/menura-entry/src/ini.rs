//! Desktop-entry key/value dialect
//!
//! Parses the ini-like format used by `.desktop` and `.directory` files:
//! `[Group]` headers, `Key=Value` lines, `Key[locale]=Value` localized
//! lines, `#` comments. Values carry escape sequences (`\s`, `\n`, `\t`,
//! `\r`, `\\`) and list values split on non-escaped `;`.

use std::collections::HashMap;

/// A parsed key/value file, grouped by `[Group]` header.
///
/// Values are stored raw; unescaping happens on access so list splitting
/// can still see escaped separators.
#[derive(Debug, Clone, Default)]
pub struct IniFile {
    groups: HashMap<String, HashMap<String, String>>,
}

impl IniFile {
    /// Parse file text. Lines outside any group and lines without `=`
    /// are ignored rather than rejected; desktop files in the wild are
    /// frequently sloppy and a record-level parse failure would drop
    /// the whole entry.
    pub fn parse(text: &str) -> IniFile {
        let mut groups: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current: Option<String> = None;

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
                let name = name.trim().to_string();
                groups.entry(name.clone()).or_default();
                current = Some(name);
                continue;
            }
            let Some(group) = current.as_deref() else {
                continue;
            };
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim_end();
            if key.is_empty() {
                continue;
            }
            if let Some(entries) = groups.get_mut(group) {
                entries.insert(key.to_string(), value.trim_start().to_string());
            }
        }

        IniFile { groups }
    }

    /// True when the named group exists.
    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    /// Raw (still escaped) value lookup.
    pub fn get(&self, group: &str, key: &str) -> Option<&str> {
        self.groups.get(group)?.get(key).map(String::as_str)
    }

    /// Unescaped string value.
    pub fn string(&self, group: &str, key: &str) -> Option<String> {
        self.get(group, key).map(unescape)
    }

    /// Localized string value: tries `Key[locale]` candidates from most to
    /// least specific, then the bare key.
    pub fn localized(&self, group: &str, key: &str, locale: &Locale) -> Option<String> {
        for candidate in locale.key_candidates(key) {
            if let Some(value) = self.get(group, &candidate) {
                return Some(unescape(value));
            }
        }
        None
    }

    /// Boolean value; only the literal `true` is true.
    pub fn boolean(&self, group: &str, key: &str) -> bool {
        self.get(group, key) == Some("true")
    }

    /// Semicolon-separated list value; empty or absent yields an empty list.
    pub fn list(&self, group: &str, key: &str) -> Vec<String> {
        self.get(group, key).map(split_list).unwrap_or_default()
    }

    /// Iterate the raw key/value pairs of a group.
    pub fn entries<'a>(&'a self, group: &str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.groups
            .get(group)
            .into_iter()
            .flat_map(|entries| entries.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

/// Resolve desktop-entry escape sequences in a value.
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(';') => out.push(';'),
            Some(other) => {
                // unknown escape: keep it verbatim
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Split a list value on non-escaped `;`, unescaping each element.
///
/// A trailing element without a closing `;` is still kept; empty elements
/// are dropped.
pub fn split_list(value: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut escaped = false;

    for c in value.chars() {
        if escaped {
            current.push(c);
            escaped = false;
        } else if c == '\\' {
            current.push('\\');
            escaped = true;
        } else if c == ';' {
            if !current.is_empty() {
                items.push(unescape(&current));
                current.clear();
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        items.push(unescape(&current));
    }
    items
}

/// The message locale, decomposed for `Key[locale]` matching.
///
/// Resolution order for a localized key, best first:
/// `lang_COUNTRY@MODIFIER`, `lang_COUNTRY`, `lang@MODIFIER`, `lang`,
/// then the unlocalized key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locale {
    lang: Option<String>,
    country: Option<String>,
    modifier: Option<String>,
}

impl Locale {
    /// Read the locale from `LC_ALL`, `LC_MESSAGES`, or `LANG`, first
    /// non-empty wins. No variable set means unlocalized lookups only.
    pub fn from_env() -> Locale {
        for key in ["LC_ALL", "LC_MESSAGES", "LANG"] {
            match std::env::var(key) {
                Ok(value) if !value.is_empty() => return Locale::parse(&value),
                _ => {}
            }
        }
        Locale::default()
    }

    /// Parse a `lang_COUNTRY.ENCODING@MODIFIER` locale spec. The encoding
    /// part is discarded. `C` and `POSIX` behave like no locale at all.
    pub fn parse(spec: &str) -> Locale {
        let (rest, modifier) = match spec.split_once('@') {
            Some((rest, modifier)) if !modifier.is_empty() => (rest, Some(modifier.to_string())),
            Some((rest, _)) => (rest, None),
            None => (spec, None),
        };
        let rest = rest.split_once('.').map_or(rest, |(head, _)| head);
        let (lang, country) = match rest.split_once('_') {
            Some((lang, country)) => (lang, Some(country)),
            None => (rest, None),
        };

        Locale {
            lang: (!lang.is_empty() && lang != "C" && lang != "POSIX").then(|| lang.to_string()),
            country: country.filter(|c| !c.is_empty()).map(str::to_string),
            modifier,
        }
    }

    /// All `Key[...]` spellings to try, most specific first, ending with
    /// the bare key.
    pub fn key_candidates(&self, key: &str) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(lang) = &self.lang {
            if let (Some(country), Some(modifier)) = (&self.country, &self.modifier) {
                out.push(format!("{key}[{lang}_{country}@{modifier}]"));
            }
            if let Some(country) = &self.country {
                out.push(format!("{key}[{lang}_{country}]"));
            }
            if let Some(modifier) = &self.modifier {
                out.push(format!("{key}[{lang}@{modifier}]"));
            }
            out.push(format!("{key}[{lang}]"));
        }
        out.push(key.to_string());
        out
    }
}
