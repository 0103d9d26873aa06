//! HTML page templates shared by the server and the static builder.
//!
//! Every page uses the same shell: a sticky header with the site title and
//! theme toggle, the navigation sidebar, and a content area.

use std::fmt::Write;

use kb_content::{Document, NavItem, TocEntry, extract_table_of_contents};
use kb_renderer::{escape_html, render_markdown};

/// Mermaid build loaded when `diagrams.mermaid_url` is unset.
pub const DEFAULT_MERMAID_URL: &str =
    "https://cdn.jsdelivr.net/npm/mermaid@11/dist/mermaid.esm.min.mjs";

/// Shiki build loaded when `highlight.shiki_url` is unset.
pub const DEFAULT_SHIKI_URL: &str = "https://esm.sh/shiki@1";

/// Client-side syntax highlighting settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightOptions {
    /// Shiki ES module URL.
    pub shiki_url: String,
    pub light_theme: String,
    pub dark_theme: String,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            shiki_url: DEFAULT_SHIKI_URL.to_owned(),
            light_theme: "github-light".to_owned(),
            dark_theme: "github-dark".to_owned(),
        }
    }
}

/// Site-wide presentation settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteOptions {
    /// Site title shown in the header and page titles.
    pub title: String,
    /// Description shown on the home page.
    pub description: Option<String>,
    /// First URL segment of every document link.
    pub base_path: String,
    /// Mermaid ES module URL.
    pub mermaid_url: String,
    /// Code highlighting, `None` when disabled.
    pub highlight: Option<HighlightOptions>,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            title: "Knowledge Base".to_owned(),
            description: None,
            base_path: "docs".to_owned(),
            mermaid_url: DEFAULT_MERMAID_URL.to_owned(),
            highlight: Some(HighlightOptions::default()),
        }
    }
}

impl SiteOptions {
    /// Presentation settings from kb config.
    #[must_use]
    pub fn from_config(config: &kb_config::Config) -> Self {
        Self {
            title: config.site.title.clone(),
            description: config.site.description.clone(),
            base_path: config.docs_resolved.base_path.clone(),
            mermaid_url: config
                .diagrams
                .mermaid_url
                .clone()
                .unwrap_or_else(|| DEFAULT_MERMAID_URL.to_owned()),
            highlight: config.highlight.enabled.then(|| HighlightOptions {
                shiki_url: config
                    .highlight
                    .shiki_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SHIKI_URL.to_owned()),
                light_theme: config.highlight.light_theme.clone(),
                dark_theme: config.highlight.dark_theme.clone(),
            }),
        }
    }
}

/// Render a document body to HTML, logging component warnings.
pub(crate) fn render_body(doc: &Document) -> String {
    let result = render_markdown(&doc.content);
    for warning in &result.warnings {
        tracing::warn!(slug = %doc.slug, warning = %warning, "Document render warning");
    }
    result.html
}

/// Render a document page.
pub(crate) fn render_document_page(site: &SiteOptions, nav: &[NavItem], doc: &Document) -> String {
    let title = &doc.frontmatter.title;
    let body = render_body(doc);
    let toc = extract_table_of_contents(&doc.content);

    let mut main = String::with_capacity(body.len() + 1024);
    main.push_str("<article>\n<div class=\"doc-header\">\n");
    let _ = writeln!(main, "<h1>{}</h1>", escape_html(title));
    if let Some(description) = &doc.frontmatter.description {
        let _ = writeln!(
            main,
            "<p class=\"doc-description\">{}</p>",
            escape_html(description)
        );
    }
    main.push_str("<hr>\n</div>\n");
    main.push_str(&body);
    main.push_str("\n</article>\n");
    render_toc(&mut main, &toc);

    let page_title = format!("{title} - {}", site.title);
    let active = doc.href(&site.base_path);
    render_layout(
        site,
        &page_title,
        doc.frontmatter.description.as_deref(),
        nav,
        Some(&active),
        &main,
    )
}

/// Render the home page listing every navigation entry.
pub(crate) fn render_home_page(site: &SiteOptions, nav: &[NavItem]) -> String {
    let mut main = String::with_capacity(2048);
    main.push_str("<div class=\"home\">\n");
    let _ = writeln!(main, "<h1>{}</h1>", escape_html(&site.title));
    if let Some(description) = &site.description {
        let _ = writeln!(
            main,
            "<p class=\"doc-description\">{}</p>",
            escape_html(description)
        );
    }

    if nav.is_empty() {
        main.push_str("<p>No documents yet.</p>\n");
    }

    let (pages, groups): (Vec<&NavItem>, Vec<&NavItem>) =
        nav.iter().partition(|item| item.href().is_some());
    if !pages.is_empty() {
        main.push_str("<section class=\"home-section\">\n<ul>\n");
        for page in pages {
            render_nav_item(&mut main, page, None);
        }
        main.push_str("</ul>\n</section>\n");
    }
    for group in groups {
        main.push_str("<section class=\"home-section\">\n");
        let _ = writeln!(main, "<h2>{}</h2>", escape_html(group.title()));
        main.push_str("<ul>\n");
        for item in group.items() {
            render_nav_item(&mut main, item, None);
        }
        main.push_str("</ul>\n</section>\n");
    }
    main.push_str("</div>\n");

    render_layout(site, &site.title, site.description.as_deref(), nav, None, &main)
}

/// Render the page shown for unknown paths.
pub(crate) fn render_not_found_page(site: &SiteOptions, nav: &[NavItem]) -> String {
    let main = "<div class=\"home\">\n<h1>Page not found</h1>\n\
                <p>The page you are looking for does not exist. \
                <a href=\"/\">Back to the home page</a>.</p>\n</div>\n";
    let page_title = format!("Not Found - {}", site.title);
    render_layout(site, &page_title, None, nav, None, main)
}

/// Wrap `main` in the document shell.
fn render_layout(
    site: &SiteOptions,
    page_title: &str,
    description: Option<&str>,
    nav: &[NavItem],
    active: Option<&str>,
    main: &str,
) -> String {
    let mut html = String::with_capacity(main.len() + 4096);

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\" data-mermaid-src=\"{}\"",
        escape_html(&site.mermaid_url)
    );
    if let Some(highlight) = &site.highlight {
        let _ = write!(
            html,
            " data-shiki-src=\"{}\" data-shiki-light=\"{}\" data-shiki-dark=\"{}\"",
            escape_html(&highlight.shiki_url),
            escape_html(&highlight.light_theme),
            escape_html(&highlight.dark_theme)
        );
    }
    html.push_str(">\n");
    html.push_str("<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(page_title));
    if let Some(description) = description {
        let _ = writeln!(
            html,
            "<meta name=\"description\" content=\"{}\">",
            escape_html(description)
        );
    }
    html.push_str("<link rel=\"stylesheet\" href=\"/assets/style.css\">\n");
    html.push_str("<script src=\"/assets/app.js\"></script>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header class=\"site-header\">\n");
    let _ = writeln!(
        html,
        "<a href=\"/\" class=\"site-title\">{}</a>",
        escape_html(&site.title)
    );
    html.push_str(
        "<button type=\"button\" class=\"theme-toggle\" data-theme-toggle \
         aria-label=\"Toggle theme\">&#9680;</button>\n",
    );
    html.push_str("</header>\n");

    html.push_str("<div class=\"layout\">\n");
    render_sidebar(&mut html, nav, active);
    html.push_str("<main class=\"content\">\n");
    html.push_str(main);
    html.push_str("</main>\n</div>\n</body>\n</html>\n");
    html
}

/// Render the navigation sidebar.
///
/// Top-level groups become headed sections. Consecutive top-level pages share
/// one list.
fn render_sidebar(html: &mut String, nav: &[NavItem], active: Option<&str>) {
    html.push_str("<aside class=\"sidebar\">\n<nav aria-label=\"Documentation\">\n");

    let mut list_open = false;
    for item in nav {
        match item {
            NavItem::Page { .. } => {
                if !list_open {
                    html.push_str("<ul>\n");
                    list_open = true;
                }
                render_nav_item(html, item, active);
            }
            NavItem::Group { title, items, .. } => {
                if list_open {
                    html.push_str("</ul>\n");
                    list_open = false;
                }
                html.push_str("<div class=\"nav-group\">\n");
                let _ = writeln!(html, "<h4>{}</h4>", escape_html(title));
                html.push_str("<ul>\n");
                for child in items {
                    render_nav_item(html, child, active);
                }
                html.push_str("</ul>\n</div>\n");
            }
        }
    }
    if list_open {
        html.push_str("</ul>\n");
    }

    html.push_str("</nav>\n</aside>\n");
}

/// Render one navigation entry as a list item, recursing into groups.
fn render_nav_item(html: &mut String, item: &NavItem, active: Option<&str>) {
    match item {
        NavItem::Page { title, href, .. } => {
            if active == Some(href.as_str()) {
                let _ = writeln!(
                    html,
                    "<li><a href=\"{}\" class=\"active\" aria-current=\"page\">{}</a></li>",
                    escape_html(href),
                    escape_html(title)
                );
            } else {
                let _ = writeln!(
                    html,
                    "<li><a href=\"{}\">{}</a></li>",
                    escape_html(href),
                    escape_html(title)
                );
            }
        }
        NavItem::Group { title, items, .. } => {
            let _ = writeln!(
                html,
                "<li class=\"nav-subgroup\"><span>{}</span>\n<ul>",
                escape_html(title)
            );
            for child in items {
                render_nav_item(html, child, active);
            }
            html.push_str("</ul>\n</li>\n");
        }
    }
}

/// Render the "On This Page" outline. Nothing is written for an empty outline.
fn render_toc(html: &mut String, toc: &[TocEntry]) {
    if toc.is_empty() {
        return;
    }

    html.push_str("<nav class=\"toc\" aria-label=\"On this page\">\n");
    html.push_str("<h4>On This Page</h4>\n<ul>\n");
    for entry in toc {
        let indent = entry.level.saturating_sub(2);
        let _ = writeln!(
            html,
            "<li style=\"padding-left:{indent}rem\"><a href=\"#{}\">{}</a></li>",
            escape_html(&entry.id),
            escape_html(&entry.text)
        );
    }
    html.push_str("</ul>\n</nav>\n");
}
