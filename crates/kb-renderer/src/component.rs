//! `<Callout>` component preprocessing.
//!
//! MDX callouts are rewritten into callout markup before the body is parsed.
//! Each generated tag sits on its own line between blank lines, so
//! pulldown-cmark passes it through as an HTML block and renders the Markdown
//! between the tags as usual.
//!
//! Recognised forms, each on a single line:
//!
//! - `<Callout type="warning" title="Heads up">` ... `</Callout>`
//! - `<Callout type="info">Short note.</Callout>`
//! - `<Callout title="Empty" />`
//!
//! `type` is one of `info`, `success`, `warning` or `error` and defaults to
//! `info`. `title` is optional. Tags inside fenced code are left alone.

use crate::callout::{CalloutKind, callout_end, callout_start};
use crate::code_block::parse_attributes;
use crate::fence::FenceTracker;

const OPEN_TAG: &str = "<Callout";
const CLOSE_TAG: &str = "</Callout>";

/// A recognised `<Callout>` line.
#[derive(Debug, PartialEq, Eq)]
enum CalloutTag<'a> {
    Open { attrs: &'a str },
    Inline { attrs: &'a str, content: &'a str },
    SelfClosing { attrs: &'a str },
    Close,
}

/// Rewrites `<Callout>` components into callout HTML blocks.
///
/// # Example
///
/// ```
/// use kb_renderer::CalloutPreprocessor;
///
/// let mut preprocessor = CalloutPreprocessor::new();
/// let output = preprocessor.process("<Callout type=\"error\">\nDo not run as root.\n</Callout>\n");
///
/// assert!(output.contains(r#"<div class="callout callout-error" role="note">"#));
/// assert!(output.contains("\nDo not run as root.\n"));
/// assert!(preprocessor.warnings().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct CalloutPreprocessor {
    fence: FenceTracker,
    /// Line numbers of callouts still open.
    open: Vec<usize>,
    warnings: Vec<String>,
}

impl CalloutPreprocessor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrite `input`, preserving every other line as-is.
    ///
    /// Callouts still open at the end of the input are closed there.
    #[must_use]
    pub fn process(&mut self, input: &str) -> String {
        let mut output = String::with_capacity(input.len());
        for (idx, line) in input.lines().enumerate() {
            if idx > 0 {
                output.push('\n');
            }
            self.process_line(line, idx + 1, &mut output);
        }
        if input.ends_with('\n') {
            output.push('\n');
        }

        while let Some(line_num) = self.open.pop() {
            self.warnings.push(format!(
                "line {line_num}: <Callout> is never closed, closing at end of document"
            ));
            output.push('\n');
            push_close("", &mut output);
        }

        output
    }

    /// Problems found while processing, one message per problem.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    #[must_use]
    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }

    fn process_line(&mut self, line: &str, line_num: usize, out: &mut String) {
        if self.fence.update(line) || self.fence.in_fence() {
            out.push_str(line);
            return;
        }

        let trimmed = line.trim_start();
        let indent = &line[..line.len() - trimmed.len()];
        match parse_tag(trimmed.trim_end()) {
            Some(CalloutTag::Open { attrs }) => {
                self.push_open(attrs, indent, line_num, out);
                self.open.push(line_num);
            }
            Some(CalloutTag::Inline { attrs, content }) => {
                self.push_open(attrs, indent, line_num, out);
                out.push('\n');
                out.push_str(indent);
                out.push_str(content.trim());
                out.push_str("\n\n");
                push_close(indent, out);
            }
            Some(CalloutTag::SelfClosing { attrs }) => {
                self.push_open(attrs, indent, line_num, out);
                out.push('\n');
                push_close(indent, out);
            }
            Some(CalloutTag::Close) => {
                if self.open.pop().is_some() {
                    out.push('\n');
                    push_close(indent, out);
                } else {
                    self.warnings
                        .push(format!("line {line_num}: </Callout> without a matching <Callout>"));
                    out.push_str(line);
                }
            }
            None => out.push_str(line),
        }
    }

    /// Write the opening markup on a line of its own after a blank line.
    fn push_open(&mut self, attrs: &str, indent: &str, line_num: usize, out: &mut String) {
        let attrs = parse_attributes(attrs);
        let kind = match attrs.get("type") {
            None => CalloutKind::Info,
            Some(name) => CalloutKind::from_name(name).unwrap_or_else(|| {
                self.warnings.push(format!(
                    "line {line_num}: unknown callout type \"{name}\", using info"
                ));
                CalloutKind::Info
            }),
        };

        out.push('\n');
        out.push_str(indent);
        let title = attrs.get("title").map(String::as_str).filter(|t| !t.is_empty());
        callout_start(kind, title, out);
        out.push('\n');
    }
}

/// Write the closing markup followed by a blank line.
fn push_close(indent: &str, out: &mut String) {
    out.push_str(indent);
    callout_end(out);
    out.push('\n');
}

fn parse_tag(trimmed: &str) -> Option<CalloutTag<'_>> {
    if trimmed == CLOSE_TAG {
        return Some(CalloutTag::Close);
    }

    let rest = trimmed.strip_prefix(OPEN_TAG)?;
    if !rest.starts_with(|c: char| c == '>' || c == '/' || c.is_whitespace()) {
        return None;
    }

    let end = find_tag_end(rest)?;
    let (attrs, after) = (&rest[..end], &rest[end + 1..]);
    if after.is_empty() {
        return Some(match attrs.strip_suffix('/') {
            Some(attrs) => CalloutTag::SelfClosing { attrs },
            None => CalloutTag::Open { attrs },
        });
    }

    after
        .strip_suffix(CLOSE_TAG)
        .map(|content| CalloutTag::Inline { attrs, content })
}

/// Byte offset of the first `>` outside a quoted attribute value.
fn find_tag_end(tag: &str) -> Option<usize> {
    let mut quote = None;
    for (idx, c) in tag.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some(idx),
            _ => {}
        }
    }
    None
}
