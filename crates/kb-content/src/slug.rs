//! Slug segment encoding.
//!
//! File and directory names become URL segments by replacing each run of
//! whitespace with a single hyphen:
//!
//! - `quick-start` -> `quick-start`
//! - `Getting Started` -> `Getting-Started`
//! - `api  reference` -> `api-reference`

/// Encode a file or directory name as a slug segment.
#[must_use]
pub fn encode_segment(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut in_whitespace = false;

    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                result.push('-');
                in_whitespace = true;
            }
        } else {
            result.push(c);
            in_whitespace = false;
        }
    }

    result
}

/// Check that a slug segment can name a single entry inside its parent.
///
/// Rejects empty segments, `.` and `..`, anything containing a path
/// separator, and whitespace, which [`encode_segment`] never produces.
#[must_use]
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\', '\0'])
        && !segment.contains(char::is_whitespace)
}

/// Convert a hyphen-delimited name into a display title.
///
/// Each hyphen-separated word gets an upper-cased first character; the rest
/// of the word is kept as is.
///
/// # Examples
///
/// ```
/// use kb_content::title_case;
///
/// assert_eq!(title_case("getting-started"), "Getting Started");
/// assert_eq!(title_case("api"), "Api");
/// ```
#[must_use]
pub fn title_case(name: &str) -> String {
    name.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
