//! Content indexing for the kb documentation site.
//!
//! This crate reads Markdown/MDX files from a content directory and derives
//! the views the site needs to render pages:
//!
//! - [`ContentIndex::resolve_document`]: a single [`Document`] by slug
//! - [`ContentIndex::list_all_documents`]: every document under the content root
//! - [`ContentIndex::navigation`]: the sidebar [`NavItem`] tree
//! - [`extract_table_of_contents`]: per-document [`TocEntry`] outline
//!
//! Every call reads the filesystem afresh. Nothing is cached and no state is
//! shared between calls, so a [`ContentIndex`] can be used from many threads.
//!
//! # URL Encoding
//!
//! File and directory names map to slug segments through [`encode_segment`]
//! (whitespace runs become `-`). Resolution applies the same encoding to the
//! names it finds on disk, so every generated link resolves back to its file.
//!
//! # Example
//!
//! ```no_run
//! use kb_content::{ContentIndex, extract_table_of_contents};
//!
//! let index = ContentIndex::new("content/docs");
//! if let Some(doc) = index.resolve_document(&["guides", "writing-mdx"]) {
//!     let toc = extract_table_of_contents(&doc.content);
//!     println!("{} has {} headings", doc.frontmatter.title, toc.len());
//! }
//! ```

mod document;
mod error;
mod index;
mod navigation;
mod slug;
mod toc;

pub use document::{Document, Frontmatter, FrontmatterError, parse_frontmatter};
pub use error::ContentError;
pub use index::{ContentIndex, DOCUMENT_EXTENSIONS, IndexOptions};
pub use navigation::{DEFAULT_ORDER, NavItem};
pub use slug::{encode_segment, is_valid_segment, title_case};
pub use toc::{TocEntry, extract_table_of_contents, heading_entry, heading_id};
