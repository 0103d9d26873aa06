//! State tracked while walking markdown events.

use kb_content::{heading_entry, heading_id};
use pulldown_cmark::Alignment;

use crate::code_block::FenceInfo;

/// Fenced or indented code block being collected.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    info: Option<FenceInfo>,
    buffer: String,
}

impl CodeBlockState {
    pub fn start(&mut self, info: FenceInfo) {
        self.info = Some(info);
        self.buffer.clear();
    }

    /// Finish the block, returning its fence info and raw content.
    pub fn end(&mut self) -> (FenceInfo, String) {
        (
            self.info.take().unwrap_or_default(),
            std::mem::take(&mut self.buffer),
        )
    }

    pub fn is_active(&self) -> bool {
        self.info.is_some()
    }

    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// Table being rendered.
#[derive(Default)]
pub(crate) struct TableState {
    in_head: bool,
    alignments: Vec<Alignment>,
    cell_index: usize,
}

impl TableState {
    pub fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub fn end_head(&mut self) {
        self.in_head = false;
    }

    pub fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub fn cell_tag(&self) -> &'static str {
        if self.in_head { "th" } else { "td" }
    }

    /// Inline style for the current cell's column alignment.
    pub fn alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Image whose alt text is being collected.
#[derive(Default)]
pub(crate) struct ImageState {
    pending: Option<(String, String)>,
    alt: String,
}

impl ImageState {
    pub fn start(&mut self, src: String, title: String) {
        self.pending = Some((src, title));
        self.alt.clear();
    }

    /// Finish the image, returning `(src, title, alt)`.
    pub fn end(&mut self) -> Option<(String, String, String)> {
        let (src, title) = self.pending.take()?;
        Some((src, title, std::mem::take(&mut self.alt)))
    }

    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub fn push_str(&mut self, text: &str) {
        self.alt.push_str(text);
    }
}

/// Heading being rendered.
#[derive(Default)]
pub(crate) struct HeadingState {
    level: Option<u8>,
    source_id: Option<String>,
    text: String,
    html: String,
}

impl HeadingState {
    /// Start a heading whose source line is `source`.
    ///
    /// `##`/`###` lines take their identifier from the raw line, the same way
    /// the page outline does. Other headings use their rendered plain text.
    pub fn start(&mut self, level: u8, source: &str) {
        let first_line = source.lines().next().unwrap_or_default();
        self.level = Some(level);
        self.source_id = heading_entry(first_line)
            .filter(|entry| entry.level == level)
            .map(|entry| entry.id);
        self.text.clear();
        self.html.clear();
    }

    pub fn is_active(&self) -> bool {
        self.level.is_some()
    }

    /// Append plain text (used for the identifier fallback).
    pub fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Append rendered inline HTML.
    pub fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    /// Finish the heading, returning `(level, id, inner_html)`.
    pub fn end(&mut self) -> Option<(u8, String, String)> {
        let level = self.level.take()?;
        let text = std::mem::take(&mut self.text);
        let id = self
            .source_id
            .take()
            .unwrap_or_else(|| heading_id(&text));

        Some((level, id, std::mem::take(&mut self.html)))
    }
}

/// Escape text for use in HTML content and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
