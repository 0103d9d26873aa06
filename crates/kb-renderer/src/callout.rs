//! Callout boxes rendered from GFM alerts and `<Callout>` components.

use std::fmt::Write;

use pulldown_cmark::BlockQuoteKind;

use crate::state::escape_html;

// 16x16 outline icons
const SVG_INFO: &str = r#"<svg class="callout-icon" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path d="M0 8a8 8 0 1 1 16 0A8 8 0 0 1 0 8Zm8-6.5a6.5 6.5 0 1 0 0 13 6.5 6.5 0 0 0 0-13ZM6.5 7.75A.75.75 0 0 1 7.25 7h1a.75.75 0 0 1 .75.75v2.75h.25a.75.75 0 0 1 0 1.5h-2a.75.75 0 0 1 0-1.5h.25v-2h-.25a.75.75 0 0 1-.75-.75ZM8 6a1 1 0 1 1 0-2 1 1 0 0 1 0 2Z"></path></svg>"#;
const SVG_CHECK: &str = r#"<svg class="callout-icon" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path d="M8 0a8 8 0 1 1 0 16A8 8 0 0 1 8 0Zm0 1.5a6.5 6.5 0 1 0 0 13 6.5 6.5 0 0 0 0-13Zm3.28 4.22a.75.75 0 0 1 0 1.06l-3.75 3.75a.75.75 0 0 1-1.06 0l-1.75-1.75a.75.75 0 1 1 1.06-1.06L7 8.94l3.22-3.22a.75.75 0 0 1 1.06 0Z"></path></svg>"#;
const SVG_ALERT: &str = r#"<svg class="callout-icon" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path d="M6.457 1.047c.659-1.234 2.427-1.234 3.086 0l6.082 11.378A1.75 1.75 0 0 1 14.082 15H1.918a1.75 1.75 0 0 1-1.543-2.575Zm1.763.707a.25.25 0 0 0-.44 0L1.698 13.132a.25.25 0 0 0 .22.368h12.164a.25.25 0 0 0 .22-.368Zm.53 3.996v2.5a.75.75 0 0 1-1.5 0v-2.5a.75.75 0 0 1 1.5 0ZM9 11a1 1 0 1 1-2 0 1 1 0 0 1 2 0Z"></path></svg>"#;
const SVG_STOP: &str = r#"<svg class="callout-icon" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path d="M4.47.22A.749.749 0 0 1 5 0h6c.199 0 .389.079.53.22l4.25 4.25c.141.14.22.331.22.53v6a.749.749 0 0 1-.22.53l-4.25 4.25A.749.749 0 0 1 11 16H5a.749.749 0 0 1-.53-.22L.22 11.53A.749.749 0 0 1 0 11V5c0-.199.079-.389.22-.53Zm.84 1.28L1.5 5.31v5.38l3.81 3.81h5.38l3.81-3.81V5.31L10.69 1.5ZM8 4a.75.75 0 0 1 .75.75v3.5a.75.75 0 0 1-1.5 0v-3.5A.75.75 0 0 1 8 4Zm0 8a1 1 0 1 1 0-2 1 1 0 0 1 0 2Z"></path></svg>"#;

/// Visual style of a callout box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalloutKind {
    Info,
    Success,
    Warning,
    Error,
}

impl CalloutKind {
    /// CSS modifier name (`callout-info`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Look up a kind by its `type` attribute value.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "info" => Some(Self::Info),
            "success" => Some(Self::Success),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Self::Info => SVG_INFO,
            Self::Success => SVG_CHECK,
            Self::Warning => SVG_ALERT,
            Self::Error => SVG_STOP,
        }
    }
}

/// Map an alert marker to its callout style and heading.
pub(crate) fn alert_style(kind: BlockQuoteKind) -> (CalloutKind, &'static str) {
    match kind {
        BlockQuoteKind::Note => (CalloutKind::Info, "Note"),
        BlockQuoteKind::Tip => (CalloutKind::Success, "Tip"),
        BlockQuoteKind::Important => (CalloutKind::Info, "Important"),
        BlockQuoteKind::Warning => (CalloutKind::Warning, "Warning"),
        BlockQuoteKind::Caution => (CalloutKind::Error, "Caution"),
    }
}

pub(crate) fn callout_start(kind: CalloutKind, title: Option<&str>, out: &mut String) {
    write!(
        out,
        r#"<div class="callout callout-{}" role="note">{}<div class="callout-body">"#,
        kind.as_str(),
        kind.icon()
    )
    .unwrap();
    if let Some(title) = title {
        write!(out, r#"<p class="callout-title">{}</p>"#, escape_html(title)).unwrap();
    }
}

pub(crate) fn callout_end(out: &mut String) {
    out.push_str("</div></div>");
}
