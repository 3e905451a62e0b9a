//! Link-type formatters — `(target, title) -> text`.
//!
//! Every formatter is a plain `fn` pointer: pure, total, and free of
//! side effects. `html` performs no escaping of either field; callers
//! that need safe HTML must sanitize titles themselves.

use std::sync::LazyLock;

use regex::Regex;

use crate::registry::{Registry, RegistryEntry, RegistryError};

/// Signature shared by all formatters.
pub type Formatter = fn(&str, &str) -> String;

/// Link type id that the `store` delivery applies to.
pub const ORG: &str = "org";

/// Fallback link type when context inference finds no match.
pub const PLAIN: &str = "plain";

/// A link type offered in the menu.
#[derive(Debug, Clone)]
pub struct LinkTypeEntry {
    pub id: String,
    pub label: String,
    pub formatter: Formatter,
}

impl LinkTypeEntry {
    pub fn new(id: &str, label: &str, formatter: Formatter) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            formatter,
        }
    }

    pub fn format(&self, target: &str, title: &str) -> String {
        (self.formatter)(target, title)
    }
}

impl RegistryEntry for LinkTypeEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// The standard link types in menu order: plain, markdown, org, html.
pub fn default_link_types() -> Result<Registry<LinkTypeEntry>, RegistryError> {
    Registry::from_entries([
        LinkTypeEntry::new(PLAIN, "plain", plain),
        LinkTypeEntry::new("markdown", "markdown", markdown),
        LinkTypeEntry::new(ORG, "org", org),
        LinkTypeEntry::new("html", "html", html),
    ])
}

/// The bare target; the title is discarded.
pub fn plain(target: &str, _title: &str) -> String {
    target.to_string()
}

/// `[title](target)`
pub fn markdown(target: &str, title: &str) -> String {
    format!("[{title}]({target})")
}

/// `[[target][title]]`, with `::` runs in the title collapsed.
///
/// Org reads `::` inside a link as a search-option separator, so a
/// title carrying one would corrupt the description field.
pub fn org(target: &str, title: &str) -> String {
    format!("[[{target}][{}]]", collapse_delimiters(title))
}

/// `<a href="target">title</a>`, unescaped.
pub fn html(target: &str, title: &str) -> String {
    format!("<a href=\"{target}\">{title}</a>")
}

static COLON_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(":{2,}").expect("colon-run pattern is valid"));

/// Collapse every run of two or more colons to a single colon.
fn collapse_delimiters(title: &str) -> std::borrow::Cow<'_, str> {
    COLON_RUN.replace_all(title, ":")
}
