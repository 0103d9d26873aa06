//! Document and frontmatter types.
//!
//! A content file starts with an optional YAML frontmatter block delimited by
//! `---` lines, followed by the Markdown/MDX body:
//!
//! ```text
//! ---
//! title: Installation
//! description: Getting the site running locally
//! order: 2
//! tags: [setup]
//! ---
//!
//! ## Requirements
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

/// Frontmatter delimiter line.
const DELIMITER: &str = "---";

/// Structured header block of a content file.
///
/// Unknown keys are ignored. A missing `title` deserializes as an empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Page title.
    #[serde(default)]
    pub title: String,

    /// Short description shown under the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Publication date, kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Free-form category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Tag list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Navigation rank. Non-integer values are treated as unset.
    #[serde(
        default,
        deserialize_with = "lenient_order",
        skip_serializing_if = "Option::is_none"
    )]
    pub order: Option<i64>,
}

/// A content file resolved by slug.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Slug segments joined by `/` (e.g. `"guides/writing-mdx"`).
    pub slug: String,
    /// Parsed header block.
    pub frontmatter: Frontmatter,
    /// Body text after the header block.
    pub content: String,
    /// File the document was read from.
    #[serde(skip)]
    pub source_path: PathBuf,
}

impl Document {
    /// Slug segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.slug.split('/')
    }

    /// Root-relative link path under `base` (e.g. `/docs/guides/writing-mdx`).
    #[must_use]
    pub fn href(&self, base: &str) -> String {
        format!("/{base}/{}", self.slug)
    }
}

/// Error parsing a frontmatter block.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    /// Opening `---` without a closing one.
    #[error("frontmatter block is not terminated")]
    Unterminated,
    /// The block is not valid YAML for [`Frontmatter`].
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Split a content file into its frontmatter and body.
///
/// Text that does not open with a `---` line has default frontmatter and is
/// returned whole as the body. A leading byte-order mark is ignored.
///
/// # Errors
///
/// Returns [`FrontmatterError::Unterminated`] when the closing delimiter is
/// missing, and [`FrontmatterError::Yaml`] when the block does not parse.
pub fn parse_frontmatter(text: &str) -> Result<(Frontmatter, &str), FrontmatterError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let Some(rest) = strip_delimiter_line(text) else {
        return Ok((Frontmatter::default(), text));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let frontmatter = parse_yaml(&rest[..offset])?;
            return Ok((frontmatter, &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    Err(FrontmatterError::Unterminated)
}

/// Return the text after the first line if that line is a delimiter.
fn strip_delimiter_line(text: &str) -> Option<&str> {
    let (first, rest) = match text.find('\n') {
        Some(i) => (&text[..i], &text[i + 1..]),
        None => (text, ""),
    };
    (first.trim_end() == DELIMITER).then_some(rest)
}

/// Parse the YAML between the delimiters. An empty block is the default.
fn parse_yaml(yaml: &str) -> Result<Frontmatter, FrontmatterError> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }
    Ok(serde_yaml::from_str(yaml)?)
}

/// Accept any YAML value for `order`, keeping only integers.
pub(crate) fn lenient_order<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_yaml::Value::deserialize(deserializer)?;
    Ok(value.as_i64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_frontmatter() {
        let text = "---\ntitle: Installation\ndescription: Set up\ndate: 2024-01-15\ncategory: guides\ntags:\n  - setup\n  - cli\norder: 2\n---\n\n## Steps\n";
        let (fm, body) = parse_frontmatter(text).unwrap();

        assert_eq!(
            fm,
            Frontmatter {
                title: "Installation".to_owned(),
                description: Some("Set up".to_owned()),
                date: Some("2024-01-15".to_owned()),
                category: Some("guides".to_owned()),
                tags: vec!["setup".to_owned(), "cli".to_owned()],
                order: Some(2),
            }
        );
        assert_eq!(body, "\n## Steps\n");
    }

    #[test]
    fn test_parse_quoted_title() {
        let (fm, body) = parse_frontmatter("---\ntitle: \"Intro\"\norder: 2\n---\nHello").unwrap();
        assert_eq!(fm.title, "Intro");
        assert_eq!(fm.order, Some(2));
        assert_eq!(body, "Hello");
    }

    #[test]
    fn test_no_frontmatter_returns_whole_body() {
        let text = "# Title\n\nBody";
        let (fm, body) = parse_frontmatter(text).unwrap();
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(body, text);
    }

    #[test]
    fn test_empty_frontmatter_block() {
        let (fm, body) = parse_frontmatter("---\n---\nBody").unwrap();
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_crlf_delimiters() {
        let (fm, body) = parse_frontmatter("---\r\ntitle: Win\r\n---\r\nBody").unwrap();
        assert_eq!(fm.title, "Win");
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_bom_is_ignored() {
        let (fm, _) = parse_frontmatter("\u{feff}---\ntitle: Bom\n---\n").unwrap();
        assert_eq!(fm.title, "Bom");
    }

    #[test]
    fn test_unterminated_block_is_error() {
        let result = parse_frontmatter("---\ntitle: Open\n\n# Body");
        assert!(matches!(result, Err(FrontmatterError::Unterminated)));
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let result = parse_frontmatter("---\ntitle: [broken\n---\n");
        assert!(matches!(result, Err(FrontmatterError::Yaml(_))));
    }

    #[test]
    fn test_non_numeric_order_is_unset() {
        let (fm, _) = parse_frontmatter("---\ntitle: A\norder: first\n---\n").unwrap();
        assert_eq!(fm.order, None);

        let (fm, _) = parse_frontmatter("---\ntitle: A\norder: \"3\"\n---\n").unwrap();
        assert_eq!(fm.order, None);
    }

    #[test]
    fn test_negative_order() {
        let (fm, _) = parse_frontmatter("---\norder: -1\n---\n").unwrap();
        assert_eq!(fm.order, Some(-1));
        assert_eq!(fm.title, "");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let (fm, _) = parse_frontmatter("---\ntitle: A\nauthor: someone\n---\n").unwrap();
        assert_eq!(fm.title, "A");
    }

    #[test]
    fn test_delimiter_must_be_first_line() {
        let text = "\n---\ntitle: A\n---\n";
        let (fm, body) = parse_frontmatter(text).unwrap();
        assert_eq!(fm.title, "");
        assert_eq!(body, text);
    }

    #[test]
    fn test_document_href() {
        let doc = Document {
            slug: "guides/writing-mdx".to_owned(),
            frontmatter: Frontmatter::default(),
            content: String::new(),
            source_path: PathBuf::new(),
        };
        assert_eq!(doc.href("docs"), "/docs/guides/writing-mdx");
        assert_eq!(doc.segments().collect::<Vec<_>>(), ["guides", "writing-mdx"]);
    }
}
