//! Table of contents extraction.
//!
//! Headings are found by a line-oriented pattern over the raw body, not by a
//! Markdown parse: only lines starting with exactly `## ` or `### ` count.
//! Identical heading texts produce identical identifiers; no suffix is added.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A second- or third-level ATX heading line.
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{2,3})[ \t]+(.+)$").unwrap());

/// Runs of characters that are not ASCII lower-case letters or digits.
static NON_ALNUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Anchor identifier.
    pub id: String,
    /// Heading text, trimmed.
    pub text: String,
    /// Heading level (2 or 3).
    pub level: u8,
}

/// Extract `##` and `###` headings from a document body in source order.
///
/// # Examples
///
/// ```
/// use kb_content::extract_table_of_contents;
///
/// let toc = extract_table_of_contents("# Title\n\n## Hello World!\n");
/// assert_eq!(toc.len(), 1);
/// assert_eq!(toc[0].id, "hello-world");
/// assert_eq!(toc[0].level, 2);
/// ```
#[must_use]
pub fn extract_table_of_contents(body: &str) -> Vec<TocEntry> {
    body.lines().filter_map(heading_entry).collect()
}

/// Outline entry for a single source line, if it is a `##` or `###` heading.
///
/// The heading text is taken verbatim from the line, so inline markup and
/// trailing attributes such as `{#id}` contribute to the identifier.
///
/// # Examples
///
/// ```
/// use kb_content::heading_entry;
///
/// let entry = heading_entry("## See [the guide](/docs/guide)").unwrap();
/// assert_eq!(entry.id, "see-the-guide-docs-guide");
/// assert!(heading_entry("# Title").is_none());
/// ```
#[must_use]
pub fn heading_entry(line: &str) -> Option<TocEntry> {
    let caps = HEADING_RE.captures(line)?;
    let text = caps[2].trim();
    if text.is_empty() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let level = caps[1].len() as u8;
    Some(TocEntry {
        id: heading_id(text),
        text: text.to_owned(),
        level,
    })
}

/// Derive an anchor identifier from heading text.
///
/// Lower-cases the text, collapses every run of non-alphanumeric characters
/// into one hyphen, and strips a leading or trailing hyphen.
///
/// # Examples
///
/// ```
/// use kb_content::heading_id;
///
/// assert_eq!(heading_id("Hello World!"), "hello-world");
/// assert_eq!(heading_id("What's New in v2.0?"), "what-s-new-in-v2-0");
/// ```
#[must_use]
pub fn heading_id(text: &str) -> String {
    let lower = text.to_lowercase();
    let replaced = NON_ALNUM_RE.replace_all(&lower, "-");
    let trimmed = replaced.strip_prefix('-').unwrap_or(&replaced);
    let trimmed = trimmed.strip_suffix('-').unwrap_or(trimmed);
    trimmed.to_owned()
}
