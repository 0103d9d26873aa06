//! Markdown/MDX body rendering for the kb documentation site.
//!
//! [`render_markdown`] turns a document body into HTML with GitHub Flavored
//! Markdown enabled. On top of plain Markdown the renderer adds:
//!
//! - `id` attributes on every heading. Second- and third-level ids come from
//!   the raw heading line, so they match [`kb_content::extract_table_of_contents`]
//! - `mermaid` fences rendered as `<pre class="mermaid">` for client-side diagrams
//! - code blocks wrapped with a copy button, plus a header for titled fences
//!   (```` ```js title="app.js" ````)
//! - GFM alerts (`> [!WARNING]`) and `<Callout>` components rendered as callouts
//!
//! Other raw HTML and MDX component tags are passed through untouched.
//!
//! # Example
//!
//! ```
//! use kb_renderer::render_markdown;
//!
//! let result = render_markdown("## Install\n\n<Callout>Run `kb serve`.</Callout>");
//! assert!(result.html.contains(r#"<h2 id="install">Install</h2>"#));
//! assert!(result.html.contains("callout-info"));
//! assert!(result.warnings.is_empty());
//! ```

mod callout;
mod code_block;
mod component;
mod fence;
mod renderer;
mod state;

pub use callout::CalloutKind;
pub use code_block::{FenceInfo, parse_fence_info};
pub use component::CalloutPreprocessor;
pub use renderer::{HtmlRenderer, RenderResult, render_markdown};
pub use state::escape_html;
