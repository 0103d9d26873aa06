//! Document resolution and discovery.
//!
//! [`ContentIndex`] maps slugs to content files and back. It owns only the
//! content root and options; every operation walks the filesystem again.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::{Document, parse_frontmatter};
use crate::error::ContentError;
use crate::slug::{encode_segment, is_valid_segment, title_case};

/// Recognized document extensions, in resolution precedence order.
pub const DOCUMENT_EXTENSIONS: [&str; 2] = ["mdx", "md"];

/// Options controlling link generation and directory metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexOptions {
    /// First segment of every generated link (e.g. `"docs"` for `/docs/...`).
    pub base_path: String,
    /// Name of the per-directory YAML file providing group title and order.
    pub meta_filename: String,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            base_path: "docs".to_owned(),
            meta_filename: "_meta.yaml".to_owned(),
        }
    }
}

/// Read-only view over a content directory.
#[derive(Clone, Debug)]
pub struct ContentIndex {
    root: PathBuf,
    options: IndexOptions,
}

/// Directory entry with its kind resolved once.
#[derive(Debug)]
pub(crate) struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

impl Entry {
    /// Stem and extension if this is a document file.
    pub fn document_stem(&self) -> Option<(&str, &'static str)> {
        if self.is_dir {
            return None;
        }
        document_stem(&self.name)
    }
}

impl ContentIndex {
    /// Create an index over `root` with default options.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_options(root, IndexOptions::default())
    }

    /// Create an index over `root` with custom options.
    pub fn with_options(root: impl Into<PathBuf>, options: IndexOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    /// Content root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Index options.
    #[must_use]
    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    /// Root-relative link for a slug (e.g. `/docs/guides/intro`).
    #[must_use]
    pub fn href(&self, slug: &str) -> String {
        format!("/{}/{slug}", self.options.base_path)
    }

    /// Resolve a document by its slug segments.
    ///
    /// Returns `None` when no `.mdx` or `.md` file matches, when a segment is
    /// invalid, or when the file cannot be read or parsed. Failures other than
    /// absence are logged.
    pub fn resolve_document<S: AsRef<str>>(&self, segments: &[S]) -> Option<Document> {
        if segments.is_empty() || !segments.iter().all(|s| is_valid_segment(s.as_ref())) {
            tracing::debug!("Rejected invalid slug");
            return None;
        }

        let slug = segments
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("/");

        let Some(path) = self.locate(segments) else {
            tracing::debug!(slug = %slug, "Document not found");
            return None;
        };

        match load_document(slug, &path) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(path = %e.path().display(), error = %e, "Failed to load document");
                None
            }
        }
    }

    /// List every document under the content root.
    ///
    /// Order is not significant. A missing root yields an empty list. When both
    /// `name.mdx` and `name.md` exist the slug appears once.
    pub fn list_all_documents(&self) -> Vec<Document> {
        let mut documents = Vec::new();
        let mut seen = HashSet::new();
        let mut prefix = Vec::new();
        self.collect_documents(&self.root, &mut prefix, &mut documents, &mut seen);
        documents
    }

    fn collect_documents(
        &self,
        dir: &Path,
        prefix: &mut Vec<String>,
        documents: &mut Vec<Document>,
        seen: &mut HashSet<String>,
    ) {
        for entry in read_entries(dir) {
            if entry.is_dir {
                prefix.push(encode_segment(&entry.name));
                self.collect_documents(&entry.path, prefix, documents, seen);
                prefix.pop();
            } else if let Some((stem, _)) = entry.document_stem() {
                let mut slug = prefix.clone();
                slug.push(encode_segment(stem));

                let key = slug.join("/");
                if seen.contains(&key) {
                    continue;
                }
                if let Some(doc) = self.resolve_document(&slug) {
                    seen.insert(key);
                    documents.push(doc);
                }
            }
        }
    }

    /// Map slug segments to a file under the root.
    fn locate<S: AsRef<str>>(&self, segments: &[S]) -> Option<PathBuf> {
        let (last, dirs) = segments.split_last()?;

        let mut dir = self.root.clone();
        for segment in dirs {
            dir = find_directory(&dir, segment.as_ref())?;
        }

        find_document_file(&dir, last.as_ref())
    }
}

/// Read and parse a document file.
///
/// A document without a title takes the title-cased last slug segment.
pub(crate) fn load_document(slug: String, path: &Path) -> Result<Document, ContentError> {
    let text = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (mut frontmatter, body) =
        parse_frontmatter(&text).map_err(|source| ContentError::MalformedHeader {
            path: path.to_path_buf(),
            source,
        })?;

    if frontmatter.title.is_empty() {
        let last = slug.rsplit('/').next().unwrap_or_default();
        frontmatter.title = title_case(last);
    }

    Ok(Document {
        content: body.to_owned(),
        slug,
        frontmatter,
        source_path: path.to_path_buf(),
    })
}

/// Find a subdirectory whose encoded name equals `segment`.
fn find_directory(dir: &Path, segment: &str) -> Option<PathBuf> {
    let entries = read_entries(dir);
    let candidates = entries
        .iter()
        .filter(|e| e.is_dir)
        .map(|e| (e.name.as_str(), e));
    best_match(candidates, segment).map(|e| e.path.clone())
}

/// Find a document file whose encoded stem equals `segment`.
///
/// `.mdx` is preferred over `.md`.
fn find_document_file(dir: &Path, segment: &str) -> Option<PathBuf> {
    let entries = read_entries(dir);
    DOCUMENT_EXTENSIONS.iter().find_map(|&ext| {
        let candidates = entries.iter().filter_map(|e| {
            let (stem, e_ext) = e.document_stem()?;
            (e_ext == ext).then_some((stem, e))
        });
        best_match(candidates, segment).map(|e| e.path.clone())
    })
}

/// Pick the candidate whose name encodes to `segment`.
///
/// Names come from the directory listing, never from `segment` itself, so a
/// lookup cannot reach an entry under any spelling other than its encoded
/// one. An exact name wins, then the first match in name order.
fn best_match<'a, T>(candidates: impl Iterator<Item = (&'a str, T)>, segment: &str) -> Option<T> {
    let mut first = None;
    for (name, item) in candidates {
        if name == segment {
            return Some(item);
        }
        if first.is_none() && encode_segment(name) == segment {
            first = Some(item);
        }
    }
    first
}

/// Split a file name into stem and document extension.
pub(crate) fn document_stem(name: &str) -> Option<(&str, &'static str)> {
    DOCUMENT_EXTENSIONS.iter().find_map(|&ext| {
        name.strip_suffix(ext)
            .and_then(|rest| rest.strip_suffix('.'))
            .filter(|stem| !stem.is_empty())
            .map(|stem| (stem, ext))
    })
}

/// List directory entries sorted by name.
///
/// Unreadable directories yield nothing. Entries with non-UTF-8 names or
/// unreadable metadata are skipped. Symlinks are followed.
pub(crate) fn read_entries(dir: &Path) -> Vec<Entry> {
    let Ok(read_dir) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut entries: Vec<Entry> = read_dir
        .filter_map(Result::ok)
        .filter_map(|e| {
            let path = e.path();
            let Ok(name) = e.file_name().into_string() else {
                tracing::debug!(path = %path.display(), "Skipping entry with non-UTF-8 name");
                return None;
            };
            let is_dir = match fs::metadata(&path) {
                Ok(meta) => meta.is_dir(),
                Err(err) => {
                    tracing::debug!(path = %path.display(), error = %err, "Skipping unreadable entry");
                    return None;
                }
            };
            Some(Entry { name, path, is_dir })
        })
        .collect();

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn slugs(docs: &[Document]) -> Vec<String> {
        let mut slugs: Vec<_> = docs.iter().map(|d| d.slug.clone()).collect();
        slugs.sort();
        slugs
    }

    #[test]
    fn test_document_stem() {
        assert_eq!(document_stem("guide.md"), Some(("guide", "md")));
        assert_eq!(document_stem("guide.mdx"), Some(("guide", "mdx")));
        assert_eq!(document_stem("archive.tar.md"), Some(("archive.tar", "md")));
        assert_eq!(document_stem("notes.txt"), None);
        assert_eq!(document_stem("readmemd"), None);
        assert_eq!(document_stem(".md"), None);
    }

    #[test]
    fn test_resolve_md_file() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "introduction.md", "---\ntitle: Introduction\n---\nHello");

        let index = ContentIndex::new(temp_dir.path());
        let doc = index.resolve_document(&["introduction"]).unwrap();

        assert_eq!(doc.slug, "introduction");
        assert_eq!(doc.frontmatter.title, "Introduction");
        assert_eq!(doc.content, "Hello");
        assert!(doc.source_path.ends_with("introduction.md"));
    }

    #[test]
    fn test_resolve_prefers_mdx() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "page.md", "---\ntitle: Markdown\n---\n");
        write(temp_dir.path(), "page.mdx", "---\ntitle: MDX\n---\n");

        let index = ContentIndex::new(temp_dir.path());
        let doc = index.resolve_document(&["page"]).unwrap();

        assert_eq!(doc.frontmatter.title, "MDX");
        assert!(doc.source_path.ends_with("page.mdx"));
    }

    #[test]
    fn test_resolve_nested_slug_joined() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "guides/code-blocks.mdx", "---\ntitle: Code Blocks\n---\n");

        let index = ContentIndex::new(temp_dir.path());
        let doc = index.resolve_document(&["guides", "code-blocks"]).unwrap();

        assert_eq!(doc.slug, "guides/code-blocks");
        assert_eq!(doc.href("docs"), "/docs/guides/code-blocks");
    }

    #[test]
    fn test_resolve_encoded_names_with_spaces() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "Getting Started/First Steps.md", "---\ntitle: First\n---\n");

        let index = ContentIndex::new(temp_dir.path());
        let doc = index
            .resolve_document(&["Getting-Started", "First-Steps"])
            .unwrap();

        assert_eq!(doc.slug, "Getting-Started/First-Steps");
        assert_eq!(doc.frontmatter.title, "First");
    }

    #[test]
    fn test_resolve_only_by_encoded_name() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "guides/Getting Started.md", "---\ntitle: Start\n---\n");
        write(temp_dir.path(), "My Guides/intro.md", "---\ntitle: Intro\n---\n");

        let index = ContentIndex::new(temp_dir.path());
        assert!(index.resolve_document(&["guides", "Getting-Started"]).is_some());
        assert!(index.resolve_document(&["guides", "Getting Started"]).is_none());
        assert!(index.resolve_document(&["My-Guides", "intro"]).is_some());
        assert!(index.resolve_document(&["My Guides", "intro"]).is_none());
    }

    #[test]
    fn test_resolve_matches_exact_case_only() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "Guides/Intro.md", "---\ntitle: Intro\n---\n");

        let index = ContentIndex::new(temp_dir.path());
        assert!(index.resolve_document(&["Guides", "Intro"]).is_some());
        assert!(index.resolve_document(&["guides", "Intro"]).is_none());
        assert!(index.resolve_document(&["Guides", "intro"]).is_none());
    }

    #[test]
    fn test_resolve_prefers_exact_name_over_encoded() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "a b.md", "---\ntitle: Spaced\n---\n");
        write(temp_dir.path(), "a-b.md", "---\ntitle: Hyphenated\n---\n");

        let index = ContentIndex::new(temp_dir.path());
        let doc = index.resolve_document(&["a-b"]).unwrap();
        assert_eq!(doc.frontmatter.title, "Hyphenated");
    }

    #[test]
    fn test_resolve_keeps_hyphenated_names() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "quick-start.md", "---\ntitle: Quick Start\n---\n");

        let index = ContentIndex::new(temp_dir.path());
        assert!(index.resolve_document(&["quick-start"]).is_some());
    }

    #[test]
    fn test_resolve_missing_is_none() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "guide.md", "# Guide");

        let index = ContentIndex::new(temp_dir.path());
        assert!(index.resolve_document(&["missing"]).is_none());
        assert!(index.resolve_document(&["guide", "child"]).is_none());
        assert!(index.resolve_document(&["nope", "guide"]).is_none());
    }

    #[test]
    fn test_resolve_other_extension_is_none() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "notes.txt", "text");

        let index = ContentIndex::new(temp_dir.path());
        assert!(index.resolve_document(&["notes"]).is_none());
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let temp_dir = create_test_dir();
        let content = temp_dir.path().join("content");
        write(temp_dir.path(), "secret.md", "---\ntitle: Secret\n---\n");
        fs::create_dir_all(&content).unwrap();

        let index = ContentIndex::new(&content);
        assert!(index.resolve_document(&["..", "secret"]).is_none());
        assert!(index.resolve_document(&["../secret"]).is_none());
        assert!(index.resolve_document(&[""]).is_none());
        assert!(index.resolve_document::<&str>(&[]).is_none());
    }

    #[test]
    fn test_resolve_malformed_header_is_none() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "broken.md", "---\ntitle: [oops\n---\nBody");

        let index = ContentIndex::new(temp_dir.path());
        assert!(index.resolve_document(&["broken"]).is_none());
    }

    #[test]
    fn test_resolve_without_title_uses_slug() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "api/plugin-hooks.md", "## Hooks");

        let index = ContentIndex::new(temp_dir.path());
        let doc = index.resolve_document(&["api", "plugin-hooks"]).unwrap();
        assert_eq!(doc.frontmatter.title, "Plugin Hooks");
        assert_eq!(doc.content, "## Hooks");
    }

    #[test]
    fn test_resolve_directory_is_not_document() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "guides/intro.md", "# Intro");

        let index = ContentIndex::new(temp_dir.path());
        assert!(index.resolve_document(&["guides"]).is_none());
    }

    #[test]
    fn test_list_all_documents() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "introduction.mdx", "---\ntitle: Introduction\n---\n");
        write(temp_dir.path(), "guides/writing-mdx.mdx", "---\ntitle: Writing\n---\n");
        write(temp_dir.path(), "guides/deep/nested.md", "---\ntitle: Nested\n---\n");
        write(temp_dir.path(), "Api Reference/Config File.md", "---\ntitle: Config\n---\n");
        write(temp_dir.path(), "assets/logo.svg", "<svg/>");

        let index = ContentIndex::new(temp_dir.path());
        let docs = index.list_all_documents();

        assert_eq!(
            slugs(&docs),
            vec![
                "Api-Reference/Config-File",
                "guides/deep/nested",
                "guides/writing-mdx",
                "introduction",
            ]
        );
    }

    #[test]
    fn test_list_all_skips_malformed_documents() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "good.md", "---\ntitle: Good\n---\n");
        write(temp_dir.path(), "bad.md", "---\ntitle: Bad\n");

        let index = ContentIndex::new(temp_dir.path());
        assert_eq!(slugs(&index.list_all_documents()), vec!["good"]);
    }

    #[test]
    fn test_list_all_dedupes_extension_pairs() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "page.md", "---\ntitle: Markdown\n---\n");
        write(temp_dir.path(), "page.mdx", "---\ntitle: MDX\n---\n");

        let index = ContentIndex::new(temp_dir.path());
        let docs = index.list_all_documents();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].frontmatter.title, "MDX");
    }

    #[test]
    fn test_list_all_missing_root() {
        let index = ContentIndex::new("/nonexistent/content/root");
        assert!(index.list_all_documents().is_empty());
    }

    #[test]
    fn test_list_all_is_idempotent() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "a.md", "---\ntitle: A\n---\n");
        write(temp_dir.path(), "b/c.mdx", "---\ntitle: C\n---\n");

        let index = ContentIndex::new(temp_dir.path());
        assert_eq!(
            slugs(&index.list_all_documents()),
            slugs(&index.list_all_documents())
        );
    }

    #[test]
    fn test_every_listed_document_resolves() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "My Notes/Day One.md", "---\ntitle: Day One\n---\n");
        write(temp_dir.path(), "plain.md", "Body only");

        let index = ContentIndex::new(temp_dir.path());
        for doc in index.list_all_documents() {
            let segments: Vec<&str> = doc.segments().collect();
            let resolved = index.resolve_document(&segments).unwrap();
            assert_eq!(resolved, doc);
        }
    }

    #[test]
    fn test_href_uses_base_path() {
        let options = IndexOptions {
            base_path: "kb".to_owned(),
            ..IndexOptions::default()
        };
        let index = ContentIndex::with_options("/content", options);
        assert_eq!(index.href("a/b"), "/kb/a/b");
    }

    #[test]
    fn test_read_entries_sorted() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "b.md", "");
        write(temp_dir.path(), "a.md", "");
        write(temp_dir.path(), "C/x.md", "");

        let names: Vec<_> = read_entries(temp_dir.path())
            .into_iter()
            .map(|e| (e.name, e.is_dir))
            .collect();
        assert_eq!(
            names,
            vec![
                ("C".to_owned(), true),
                ("a.md".to_owned(), false),
                ("b.md".to_owned(), false),
            ]
        );
    }
}
