//! Bounded window of recent conversation turns.
//!
//! The window is substring evidence only: it never remembers anything between
//! requests, it just folds the caller-supplied history into one lower-cased
//! lookup string.

/// How many prior turns the classifier looks at.
pub const DEFAULT_WINDOW: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationWindow {
    turns: usize,
    history_len: usize,
    context: String,
}

impl ConversationWindow {
    /// Keep the last `size` entries of `history` (oldest first).
    pub fn new<S: AsRef<str>>(history: &[S], size: usize) -> Self {
        let start = history.len().saturating_sub(size);
        let kept = &history[start..];
        let context = kept
            .iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            turns: kept.len(),
            history_len: history.len(),
            context,
        }
    }

    pub fn from_history<S: AsRef<str>>(history: &[S]) -> Self {
        Self::new(history, DEFAULT_WINDOW)
    }

    /// Number of turns retained (at most the window size).
    pub fn len(&self) -> usize {
        self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns == 0
    }

    /// True for a brand-new conversation: fewer than 2 prior turns in the
    /// whole history, whatever the window size.
    pub fn is_fresh(&self) -> bool {
        self.history_len < 2
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn contains(&self, needle: &str) -> bool {
        !self.context.is_empty() && self.context.contains(needle)
    }
}
