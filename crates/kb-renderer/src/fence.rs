//! Fenced code block tracking for line-based preprocessing.

/// Follows fenced code blocks line by line.
///
/// A fence opens with three or more backticks or tildes and closes with a
/// run of the same character that is at least as long and followed only by
/// whitespace.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<(char, usize)>,
}

impl FenceTracker {
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed the next line. Returns `true` when the line opens or closes a fence.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();
        match self.open {
            Some((marker, len)) => {
                let closes = fence_run(trimmed)
                    .is_some_and(|(ch, run)| ch == marker && run >= len)
                    && trimmed.trim_start_matches(marker).trim().is_empty();
                if closes {
                    self.open = None;
                }
                closes
            }
            None => {
                self.open = fence_run(trimmed);
                self.open.is_some()
            }
        }
    }
}

/// Leading run of three or more fence characters.
fn fence_run(trimmed: &str) -> Option<(char, usize)> {
    let marker = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let run = trimmed.chars().take_while(|&c| c == marker).count();
    (run >= 3).then_some((marker, run))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backtick_fence_opens_and_closes() {
        let mut fence = FenceTracker::default();
        assert!(!fence.in_fence());

        assert!(fence.update("```tsx title=\"page.tsx\""));
        assert!(fence.in_fence());
        assert!(!fence.update("<Callout>"));
        assert!(fence.update("```"));
        assert!(!fence.in_fence());
    }

    #[test]
    fn test_closing_fence_must_match() {
        let mut fence = FenceTracker::default();
        fence.update("````md");

        assert!(!fence.update("```"));
        assert!(!fence.update("~~~~"));
        assert!(!fence.update("```` trailing"));
        assert!(fence.in_fence());

        assert!(fence.update("  `````  "));
        assert!(!fence.in_fence());
    }

    #[test]
    fn test_short_runs_are_not_fences() {
        let mut fence = FenceTracker::default();
        assert!(!fence.update("``inline``"));
        assert!(!fence.update("~~struck~~"));
        assert!(!fence.in_fence());
    }
}
