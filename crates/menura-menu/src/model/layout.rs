//! Layout directives and inline flags
//!
//! A `<Layout>`/`<DefaultLayout>` block becomes a list of
//! [`LayoutDirective`]s. The five inline options are tri-state during
//! parsing ([`InlineOverrides`], `None` = unset) and collapse into
//! concrete [`InlineFlags`] through inheritance at layout time.

/// What a `<Merge>` directive drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MergeKind {
    Files,
    Menus,
    All,
}

/// Per-directive or per-node inline options; `None` inherits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct InlineOverrides {
    pub show_empty: Option<bool>,
    pub inline: Option<bool>,
    pub inline_limit: Option<u32>,
    pub inline_header: Option<bool>,
    pub inline_alias: Option<bool>,
}

impl InlineOverrides {
    /// Concrete flags with unset options taken from `base`.
    pub fn apply(&self, base: InlineFlags) -> InlineFlags {
        InlineFlags {
            show_empty: self.show_empty.unwrap_or(base.show_empty),
            inline: self.inline.unwrap_or(base.inline),
            inline_limit: self.inline_limit.unwrap_or(base.inline_limit),
            inline_header: self.inline_header.unwrap_or(base.inline_header),
            inline_alias: self.inline_alias.unwrap_or(base.inline_alias),
        }
    }
}

/// Fully resolved inline options for one menu level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InlineFlags {
    pub show_empty: bool,
    pub inline: bool,
    /// 0 means unlimited
    pub inline_limit: u32,
    pub inline_header: bool,
    pub inline_alias: bool,
}

impl Default for InlineFlags {
    fn default() -> Self {
        InlineFlags {
            show_empty: false,
            inline: false,
            inline_limit: 4,
            inline_header: true,
            inline_alias: false,
        }
    }
}

/// One entry of a `<Layout>` block, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LayoutDirective {
    /// `<Menuname>`: place the named sub-menu here
    MenuName(String, InlineOverrides),
    /// `<Filename>`: place the application with this id here
    Filename(String),
    /// `<Separator/>`
    Separator,
    /// `<Merge type=.../>`: place all leftovers here
    Merge(MergeKind),
}
