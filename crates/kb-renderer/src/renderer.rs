//! Markdown event walker producing HTML.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::callout::{alert_style, callout_end, callout_start};
use crate::code_block::{FenceInfo, parse_fence_info, render_code_block};
use crate::component::CalloutPreprocessor;
use crate::state::{CodeBlockState, HeadingState, ImageState, TableState, escape_html};

/// Result of rendering a document body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Problems found in `<Callout>` components.
    pub warnings: Vec<String>,
}

/// Render a Markdown/MDX body to HTML.
#[must_use]
pub fn render_markdown(body: &str) -> RenderResult {
    HtmlRenderer::new().render(body)
}

/// Single-use HTML renderer.
pub struct HtmlRenderer {
    output: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    /// One entry per open blockquote; `true` for callouts.
    quote_stack: Vec<bool>,
}

impl HtmlRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::default(),
            quote_stack: Vec::new(),
        }
    }

    /// Parser options: GFM tables, strikethrough, task lists and alerts.
    ///
    /// Heading attributes stay disabled: `{#id}` is heading text, so the
    /// heading id matches the page outline.
    #[must_use]
    pub fn parser_options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM
    }

    /// Render `markdown`, consuming the renderer.
    #[must_use]
    pub fn render(mut self, markdown: &str) -> RenderResult {
        let mut components = CalloutPreprocessor::new();
        let source = components.process(markdown);

        for (event, range) in Parser::new_ext(&source, Self::parser_options()).into_offset_iter() {
            self.process_event(event, &source[range]);
        }

        RenderResult {
            html: self.output,
            warnings: components.into_warnings(),
        }
    }

    /// Push inline markup to the heading buffer or the output.
    fn push_inline(&mut self, content: &str) {
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    /// Handle one event; `source` is the Markdown it was parsed from.
    fn process_event(&mut self, event: Event<'_>, source: &str) {
        match event {
            Event::Start(tag) => self.start_tag(tag, source),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.push_inline(&html),
            Event::SoftBreak => self.text("\n"),
            Event::HardBreak => self.push_inline("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => {
                self.output.push_str(if checked {
                    r#"<input type="checkbox" checked disabled> "#
                } else {
                    r#"<input type="checkbox" disabled> "#
                });
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>, source: &str) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                // Opening tag is written at the end, once the id is known
                self.heading.start(heading_level_to_num(level), source);
            }
            Tag::BlockQuote(Some(kind)) => {
                let (callout, title) = alert_style(kind);
                self.quote_stack.push(true);
                callout_start(callout, Some(title), &mut self.output);
            }
            Tag::BlockQuote(None) => {
                self.quote_stack.push(false);
                self.output.push_str("<blockquote>");
            }
            Tag::CodeBlock(kind) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) => parse_fence_info(&info),
                    CodeBlockKind::Indented => FenceInfo::default(),
                };
                self.code.start(info);
            }
            Tag::List(Some(1)) => self.output.push_str("<ol>"),
            Tag::List(Some(start)) => write!(self.output, r#"<ol start="{start}">"#).unwrap(),
            Tag::List(None) => self.output.push_str("<ul>"),
            Tag::Item => self.output.push_str("<li>"),
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                write!(
                    self.output,
                    "<{}{}>",
                    self.table.cell_tag(),
                    self.table.alignment_style()
                )
                .unwrap();
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut link = format!(r#"<a href="{}""#, escape_html(&dest_url));
                if !title.is_empty() {
                    write!(link, r#" title="{}""#, escape_html(&title)).unwrap();
                }
                link.push('>');
                self.push_inline(&link);
            }
            Tag::Image {
                dest_url, title, ..
            } => self.image.start(dest_url.to_string(), title.to_string()),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(_) => {
                if let Some((level, id, html)) = self.heading.end() {
                    write!(
                        self.output,
                        r#"<h{level} id="{}">{}</h{level}>"#,
                        escape_html(&id),
                        html.trim()
                    )
                    .unwrap();
                }
            }
            TagEnd::BlockQuote(_) => {
                if self.quote_stack.pop() == Some(true) {
                    callout_end(&mut self.output);
                } else {
                    self.output.push_str("</blockquote>");
                }
            }
            TagEnd::CodeBlock => {
                let (info, content) = self.code.end();
                render_code_block(&info, &content, &mut self.output);
            }
            TagEnd::List(ordered) => self.output.push_str(if ordered { "</ol>" } else { "</ul>" }),
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                write!(self.output, "</{}>", self.table.cell_tag()).unwrap();
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Image => {
                if let Some((src, title, alt)) = self.image.end() {
                    let mut img = format!(
                        r#"<img src="{}" alt="{}""#,
                        escape_html(&src),
                        escape_html(&alt)
                    );
                    if !title.is_empty() {
                        write!(img, r#" title="{}""#, escape_html(&title)).unwrap();
                    }
                    img.push('>');
                    self.push_inline(&img);
                }
            }
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else if self.heading.is_active() {
            self.heading.push_text(text);
            self.heading.push_html(&escape_html(text));
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
            return;
        }
        if self.heading.is_active() {
            self.heading.push_text(code);
        }
        let html = format!("<code>{}</code>", escape_html(code));
        self.push_inline(&html);
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn html(markdown: &str) -> String {
        render_markdown(markdown).html
    }

    #[test]
    fn test_paragraph_and_inline_formatting() {
        assert_eq!(
            html("Some **bold**, *italic* and ~~gone~~ text."),
            "<p>Some <strong>bold</strong>, <em>italic</em> and <s>gone</s> text.</p>"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(html("1 &lt; 2 and a & b"), "<p>1 &lt; 2 and a &amp; b</p>");
    }

    #[test]
    fn test_heading_ids() {
        assert_eq!(
            html("# Title\n\n## Hello World!"),
            r#"<h1 id="title">Title</h1><h2 id="hello-world">Hello World!</h2>"#
        );
    }

    #[test]
    fn test_heading_with_inline_code() {
        assert_eq!(
            html("## The `kb` CLI"),
            r#"<h2 id="the-kb-cli">The <code>kb</code> CLI</h2>"#
        );
    }

    #[test]
    fn test_heading_attribute_syntax_is_text() {
        assert_eq!(
            html("## Setup {#install}"),
            r#"<h2 id="setup-install">Setup {#install}</h2>"#
        );
    }

    #[test]
    fn test_duplicate_heading_ids_not_suffixed() {
        let result = render_markdown("## Example\n\n## Example");
        assert_eq!(
            result.html,
            r#"<h2 id="example">Example</h2><h2 id="example">Example</h2>"#
        );
    }

    #[test]
    fn test_heading_ids_match_extracted_outline() {
        let body = concat!(
            "# Title\n\n",
            "## See [the guide](https://x.io)\n\n",
            "## Setup {#install}\n\n",
            "### Use *foo* & `bar`\n\n",
            "### **Bold** ~~old~~ name\n\n",
            "#### Deep\n\n",
            "## Trailing hashes ##\n",
        );
        let html = html(body);

        let outline = kb_content::extract_table_of_contents(body);
        assert_eq!(outline.len(), 5);
        for entry in outline {
            assert!(
                html.contains(&format!(r#"id="{}""#, entry.id)),
                "no heading with id {:?} in {html}",
                entry.id
            );
        }
    }

    #[test]
    fn test_heading_inside_callout_keeps_source_id() {
        let out = html("<Callout>\n\n## Inside [here](/x)\n\n</Callout>");
        assert!(out.contains(r#"<h2 id="inside-here-x">"#));
    }

    #[test]
    fn test_fenced_code() {
        assert_eq!(
            html("```rust\nlet x = 1;\n```"),
            concat!(
                r#"<div class="code-block"><button type="button" class="copy-button" data-copy-code aria-label="Copy code">Copy</button>"#,
                "<pre><code class=\"language-rust\">let x = 1;\n</code></pre></div>"
            )
        );
    }

    #[test]
    fn test_indented_code() {
        let out = html("    <tag>\n");
        assert!(out.starts_with(r#"<div class="code-block">"#));
        assert!(out.ends_with("<pre><code>&lt;tag&gt;\n</code></pre></div>"));
    }

    #[test]
    fn test_titled_code_block() {
        let out = html("```ts title=\"lib/config.ts\"\nexport {};\n```");
        assert!(out.starts_with(r#"<div class="code-block">"#));
        assert!(out.contains(r#"<span class="code-block-title">lib/config.ts</span>"#));
        assert!(out.contains(r#"<span class="code-block-lang">ts</span>"#));
    }

    #[test]
    fn test_mermaid_block() {
        assert_eq!(
            html("```mermaid\ngraph LR\n  A --> B\n```"),
            "<pre class=\"mermaid\">graph LR\n  A --&gt; B</pre>"
        );
    }

    #[test]
    fn test_alert_becomes_callout() {
        let out = html("> [!WARNING]\n> Mind the gap.");
        assert!(out.starts_with(r#"<div class="callout callout-warning" role="note">"#));
        assert!(out.contains(r#"<p class="callout-title">Warning</p>"#));
        assert!(out.contains("<p>Mind the gap.</p>"));
        assert!(out.ends_with("</div></div>"));
        assert!(!out.contains("<blockquote>"));
    }

    #[test]
    fn test_tip_alert_is_success() {
        assert!(html("> [!TIP]\n> Try it.").contains("callout-success"));
        assert!(html("> [!CAUTION]\n> Stop.").contains("callout-error"));
    }

    #[test]
    fn test_plain_blockquote() {
        assert_eq!(
            html("> quoted"),
            "<blockquote><p>quoted</p></blockquote>"
        );
    }

    #[test]
    fn test_raw_html_passes_through() {
        let out = html("<FileTree root=\"src\">\n\nCareful\n\n</FileTree>");
        assert!(out.contains("<FileTree root=\"src\">"));
        assert!(out.contains("</FileTree>"));
        assert!(out.contains("<p>Careful</p>"));
    }

    #[test]
    fn test_callout_component() {
        let result = render_markdown(
            "<Callout type=\"warning\" title=\"Before you start\">\nBack up **everything**.\n</Callout>\n\nAfter.",
        );
        let out = result.html;

        assert!(out.starts_with(r#"<div class="callout callout-warning" role="note">"#));
        assert!(out.contains(r#"<p class="callout-title">Before you start</p>"#));
        assert!(out.contains("<p>Back up <strong>everything</strong>.</p>"));
        assert!(out.contains("</div></div>"));
        assert!(out.ends_with("<p>After.</p>"));
        assert!(!out.contains("<Callout"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_callout_component_defaults() {
        let out = html("<Callout>Short note.</Callout>");
        assert!(out.contains("callout-info"));
        assert!(!out.contains("callout-title"));
        assert!(out.contains("<p>Short note.</p>"));
    }

    #[test]
    fn test_callout_component_in_code_fence() {
        let out = html("```mdx\n<Callout type=\"error\">\n```");
        assert!(out.contains("&lt;Callout type=&quot;error&quot;&gt;"));
        assert!(!out.contains("callout-error"));
    }

    #[test]
    fn test_callout_warnings_reported() {
        let result = render_markdown("<Callout type=\"tip\">\nText\n</Callout>");
        assert_eq!(
            result.warnings,
            vec!["line 1: unknown callout type \"tip\", using info".to_owned()]
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            html("- a\n- b\n\n3. c\n4. d"),
            r#"<ul><li>a</li><li>b</li></ul><ol start="3"><li>c</li><li>d</li></ol>"#
        );
    }

    #[test]
    fn test_task_list() {
        assert_eq!(
            html("- [x] done\n- [ ] todo"),
            r#"<ul><li><input type="checkbox" checked disabled> done</li><li><input type="checkbox" disabled> todo</li></ul>"#
        );
    }

    #[test]
    fn test_table() {
        assert_eq!(
            html("| a | b |\n|---|--:|\n| 1 | 2 |"),
            concat!(
                "<table><thead><tr><th>a</th><th style=\"text-align:right\">b</th></tr></thead>",
                "<tbody><tr><td>1</td><td style=\"text-align:right\">2</td></tr></tbody></table>"
            )
        );
    }

    #[test]
    fn test_link_and_image() {
        assert_eq!(
            html("[Guide](/docs/guide \"Read me\") ![Logo `kb`](/logo.png)"),
            concat!(
                r#"<p><a href="/docs/guide" title="Read me">Guide</a> "#,
                r#"<img src="/logo.png" alt="Logo kb"></p>"#
            )
        );
    }

    #[test]
    fn test_link_in_heading() {
        assert_eq!(
            html("## See [docs](/docs)"),
            r#"<h2 id="see-docs-docs">See <a href="/docs">docs</a></h2>"#
        );
    }
}
