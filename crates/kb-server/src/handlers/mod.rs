//! HTTP request handlers.

pub(crate) mod docs;
pub(crate) mod navigation;
pub(crate) mod pages;

/// Split a wildcard slug into segments, ignoring one trailing slash.
pub(crate) fn slug_segments(slug: &str) -> Vec<&str> {
    slug.strip_suffix('/').unwrap_or(slug).split('/').collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_slug_segments() {
        assert_eq!(slug_segments("guides/setup"), vec!["guides", "setup"]);
        assert_eq!(slug_segments("guides/setup/"), vec!["guides", "setup"]);
        assert_eq!(slug_segments("intro"), vec!["intro"]);
        assert_eq!(slug_segments("a//b"), vec!["a", "", "b"]);
    }
}
