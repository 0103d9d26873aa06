//! Navigation tree builder.
//!
//! Builds a sidebar tree mirroring the content directory. Directories become
//! groups and document files become pages. Entries are ordered by rank, then
//! by name.
//!
//! # Directory metadata
//!
//! A directory may contain a YAML sidecar file (default: `_meta.yaml`) that
//! sets the title and rank of its group:
//!
//! ```yaml
//! title: API Reference
//! order: 3
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::document::{lenient_order, parse_frontmatter};
use crate::index::{ContentIndex, Entry, read_entries};
use crate::slug::{encode_segment, title_case};

/// Rank of entries that do not set one.
pub const DEFAULT_ORDER: i64 = 999;

/// Navigation tree node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NavItem {
    /// Link to a document.
    Page {
        title: String,
        href: String,
        order: i64,
    },
    /// Directory with at least one descendant page.
    Group {
        title: String,
        order: i64,
        items: Vec<NavItem>,
    },
}

impl NavItem {
    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Page { title, .. } | Self::Group { title, .. } => title,
        }
    }

    /// Rank among siblings.
    #[must_use]
    pub fn order(&self) -> i64 {
        match self {
            Self::Page { order, .. } | Self::Group { order, .. } => *order,
        }
    }

    /// Link target, for pages.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        match self {
            Self::Page { href, .. } => Some(href),
            Self::Group { .. } => None,
        }
    }

    /// Child items, empty for pages.
    #[must_use]
    pub fn items(&self) -> &[NavItem] {
        match self {
            Self::Page { .. } => &[],
            Self::Group { items, .. } => items,
        }
    }

    /// Check whether `href` is this item or one of its descendants.
    #[must_use]
    pub fn contains_href(&self, href: &str) -> bool {
        match self {
            Self::Page { href: own, .. } => own == href,
            Self::Group { items, .. } => items.iter().any(|item| item.contains_href(href)),
        }
    }
}

/// Group metadata from a directory sidecar file.
#[derive(Debug, Default, Deserialize)]
struct GroupMeta {
    #[serde(default)]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_order")]
    order: Option<i64>,
}

/// Sortable node collected before recursion.
struct Node {
    name: String,
    title: String,
    order: i64,
    kind: NodeKind,
}

enum NodeKind {
    Page { href: String },
    Group { path: PathBuf, segment: String },
}

impl ContentIndex {
    /// Build the navigation tree for the whole content root.
    ///
    /// A missing root yields an empty tree. Unreadable or malformed files keep
    /// their derived title and default rank.
    pub fn navigation(&self) -> Vec<NavItem> {
        let mut prefix = Vec::new();
        self.build_tree(self.root(), &mut prefix)
    }

    fn build_tree(&self, dir: &Path, prefix: &mut Vec<String>) -> Vec<NavItem> {
        let entries = read_entries(dir);
        let mdx_stems: HashSet<&str> = entries
            .iter()
            .filter_map(Entry::document_stem)
            .filter(|(_, ext)| *ext == "mdx")
            .map(|(stem, _)| stem)
            .collect();

        let mut nodes: Vec<Node> = entries
            .iter()
            .filter(|e| !is_excluded(&e.name))
            .filter_map(|entry| {
                if entry.is_dir {
                    return Some(self.group_node(entry));
                }
                let (stem, ext) = entry.document_stem()?;
                if ext == "md" && mdx_stems.contains(stem) {
                    return None;
                }
                Some(self.page_node(entry, stem, prefix.as_slice()))
            })
            .collect();

        nodes.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));

        let mut items = Vec::with_capacity(nodes.len());
        for node in nodes {
            match node.kind {
                NodeKind::Page { href } => items.push(NavItem::Page {
                    title: node.title,
                    href,
                    order: node.order,
                }),
                NodeKind::Group { path, segment } => {
                    prefix.push(segment);
                    let children = self.build_tree(&path, prefix);
                    prefix.pop();

                    if children.is_empty() {
                        tracing::debug!(path = %path.display(), "Pruning empty group");
                        continue;
                    }
                    items.push(NavItem::Group {
                        title: node.title,
                        order: node.order,
                        items: children,
                    });
                }
            }
        }

        items
    }

    fn page_node(&self, entry: &Entry, stem: &str, prefix: &[String]) -> Node {
        let mut title = title_case(stem);
        let mut order = DEFAULT_ORDER;

        match fs::read_to_string(&entry.path) {
            Ok(text) => match parse_frontmatter(&text) {
                Ok((frontmatter, _)) => {
                    if !frontmatter.title.is_empty() {
                        title = frontmatter.title;
                    }
                    if let Some(rank) = frontmatter.order {
                        order = rank;
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %entry.path.display(), error = %e, "Malformed frontmatter");
                }
            },
            Err(e) => {
                tracing::warn!(path = %entry.path.display(), error = %e, "Failed to read document");
            }
        }

        let mut segments = prefix.to_vec();
        segments.push(encode_segment(stem));

        Node {
            name: stem.to_owned(),
            title,
            order,
            kind: NodeKind::Page {
                href: self.href(&segments.join("/")),
            },
        }
    }

    fn group_node(&self, entry: &Entry) -> Node {
        let meta = self.group_meta(&entry.path);

        Node {
            name: entry.name.clone(),
            title: meta
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| title_case(&entry.name)),
            order: meta.order.unwrap_or(DEFAULT_ORDER),
            kind: NodeKind::Group {
                path: entry.path.clone(),
                segment: encode_segment(&entry.name),
            },
        }
    }

    fn group_meta(&self, dir: &Path) -> GroupMeta {
        let path = dir.join(&self.options().meta_filename);
        let Ok(content) = fs::read_to_string(&path) else {
            return GroupMeta::default();
        };
        if content.trim().is_empty() {
            return GroupMeta::default();
        }

        match serde_yaml::from_str(&content) {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Invalid directory metadata");
                GroupMeta::default()
            }
        }
    }
}

/// Hidden entries, reserved `_` entries and the directory readme.
fn is_excluded(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('_') || name.eq_ignore_ascii_case("readme.md")
}
