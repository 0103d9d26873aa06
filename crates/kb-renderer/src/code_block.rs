//! Fenced code block rendering.
//!
//! The fence info string carries a language followed by optional attributes:
//!
//! ````text
//! ```ts title="lib/config.ts"
//! ````
//!
//! Attribute values may be bare words or quoted with `"` or `'`. Quoted values
//! may contain whitespace.

use std::collections::HashMap;
use std::fmt::Write;

use crate::state::escape_html;

/// Language whose blocks are handed to the client-side diagram renderer.
const MERMAID: &str = "mermaid";

/// Language shown in titled blocks that do not name one.
const PLAIN_TEXT: &str = "text";

/// Button wired up by the client script to copy the block's text.
const COPY_BUTTON: &str = r#"<button type="button" class="copy-button" data-copy-code aria-label="Copy code">Copy</button>"#;

/// Parsed fence info string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FenceInfo {
    /// First word of the info string, if any.
    pub language: Option<String>,
    /// `key=value` attributes after the language.
    pub attrs: HashMap<String, String>,
}

impl FenceInfo {
    /// Value of the `title` attribute.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.attrs.get("title").map(String::as_str).filter(|t| !t.is_empty())
    }
}

/// Parse a fence info string into language and attributes.
///
/// Words without `=` after the language are ignored. An info string that
/// starts with an attribute has no language.
///
/// # Examples
///
/// ```
/// use kb_renderer::parse_fence_info;
///
/// let info = parse_fence_info(r#"js title="Hello world.js" showLineNumbers"#);
/// assert_eq!(info.language.as_deref(), Some("js"));
/// assert_eq!(info.title(), Some("Hello world.js"));
/// ```
#[must_use]
pub fn parse_fence_info(info: &str) -> FenceInfo {
    let mut tokens = tokenize(info).into_iter().peekable();
    let language = tokens.next_if(|first| !first.contains('='));

    FenceInfo {
        language,
        attrs: collect_attributes(tokens),
    }
}

/// Parse `key=value` attributes, ignoring bare words.
pub(crate) fn parse_attributes(input: &str) -> HashMap<String, String> {
    collect_attributes(tokenize(input))
}

fn collect_attributes(tokens: impl IntoIterator<Item = String>) -> HashMap<String, String> {
    tokens
        .into_iter()
        .filter_map(|token| {
            let (key, value) = token.split_once('=')?;
            Some((key.to_owned(), value.to_owned()))
        })
        .collect()
}

/// Split on whitespace, keeping quoted runs together and dropping the quotes.
fn tokenize(info: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in info.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Render a code block to `out`.
///
/// Every block except diagrams sits in a `code-block` container carrying a
/// copy button, plus a header when the fence has a title.
pub(crate) fn render_code_block(info: &FenceInfo, content: &str, out: &mut String) {
    let language = info.language.as_deref();

    if language == Some(MERMAID) {
        write!(out, r#"<pre class="mermaid">{}</pre>"#, escape_html(content.trim())).unwrap();
        return;
    }

    out.push_str(r#"<div class="code-block">"#);
    if let Some(title) = info.title() {
        write!(
            out,
            r#"<div class="code-block-header"><span class="code-block-title">{}</span><span class="code-block-lang">{}</span></div>"#,
            escape_html(title),
            escape_html(language.unwrap_or(PLAIN_TEXT))
        )
        .unwrap();
    }
    out.push_str(COPY_BUTTON);

    match language {
        Some(lang) => write!(
            out,
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            escape_html(lang),
            escape_html(content)
        )
        .unwrap(),
        None => write!(out, "<pre><code>{}</code></pre>", escape_html(content)).unwrap(),
    }

    out.push_str("</div>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(info: &str, content: &str) -> String {
        let mut out = String::new();
        render_code_block(&parse_fence_info(info), content, &mut out);
        out
    }

    #[test]
    fn test_parse_fence_info_language_only() {
        let info = parse_fence_info("rust");
        assert_eq!(info.language.as_deref(), Some("rust"));
        assert!(info.attrs.is_empty());
    }

    #[test]
    fn test_parse_fence_info_empty() {
        assert_eq!(parse_fence_info(""), FenceInfo::default());
        assert_eq!(parse_fence_info("   "), FenceInfo::default());
    }

    #[test]
    fn test_parse_fence_info_quoted_values() {
        let info = parse_fence_info(r#"ts title="lib/config file.ts" theme='dark mode'"#);
        assert_eq!(info.language.as_deref(), Some("ts"));
        assert_eq!(info.attrs.get("title").map(String::as_str), Some("lib/config file.ts"));
        assert_eq!(info.attrs.get("theme").map(String::as_str), Some("dark mode"));
    }

    #[test]
    fn test_parse_fence_info_ignores_flags() {
        let info = parse_fence_info("py showLineNumbers title=main.py");
        assert_eq!(info.attrs.len(), 1);
        assert_eq!(info.title(), Some("main.py"));
    }

    #[test]
    fn test_empty_title_is_none() {
        assert_eq!(parse_fence_info(r#"js title="""#).title(), None);
    }

    #[test]
    fn test_parse_attributes() {
        let attrs = parse_attributes(r#"type="warning" title='Heads up' open"#);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("type").map(String::as_str), Some("warning"));
        assert_eq!(attrs.get("title").map(String::as_str), Some("Heads up"));
    }

    #[test]
    fn test_render_plain_block() {
        assert_eq!(
            render("", "a < b\n"),
            format!(r#"<div class="code-block">{COPY_BUTTON}<pre><code>a &lt; b
</code></pre></div>"#)
        );
    }

    #[test]
    fn test_render_language_block() {
        assert_eq!(
            render("rust", "fn main() {}\n"),
            format!(r#"<div class="code-block">{COPY_BUTTON}<pre><code class="language-rust">fn main() {{}}
</code></pre></div>"#)
        );
    }

    #[test]
    fn test_render_titled_block() {
        assert_eq!(
            render(r#"js title="app.js""#, "run();\n"),
            [
                r#"<div class="code-block"><div class="code-block-header">"#,
                r#"<span class="code-block-title">app.js</span>"#,
                r#"<span class="code-block-lang">js</span></div>"#,
                COPY_BUTTON,
                r#"<pre><code class="language-js">run();"#,
                "\n</code></pre></div>",
            ]
            .concat()
        );
    }

    #[test]
    fn test_render_titled_block_without_language() {
        let html = render(r#"title="notes""#, "x");
        assert!(html.contains(r#"<span class="code-block-lang">text</span>"#));
        assert!(html.contains("<pre><code>x</code></pre>"));
    }

    #[test]
    fn test_every_block_has_copy_button() {
        assert!(render("", "x").contains("data-copy-code"));
        assert!(render(r#"py title="main.py""#, "x").contains("data-copy-code"));
        assert!(!render("mermaid", "graph TD").contains("data-copy-code"));
    }

    #[test]
    fn test_render_mermaid() {
        assert_eq!(
            render("mermaid", "graph TD\n  A --> B\n"),
            r#"<pre class="mermaid">graph TD
  A --&gt; B</pre>"#
        );
    }
}
