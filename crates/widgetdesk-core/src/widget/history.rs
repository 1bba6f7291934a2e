//! Bounded undo/redo log of configuration snapshots.

use std::collections::VecDeque;

use super::model::WidgetConfig;

/// Default number of snapshots kept on each stack.
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// An immutable snapshot plus its position in the edit sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub sequence: u64,
    pub config: WidgetConfig,
}

/// Two bounded stacks of snapshots with editor semantics.
///
/// - `push` records a new edit and discards anything that could be redone.
/// - `undo`/`redo` swap the live config with the top of the opposite stack.
/// - When a stack exceeds `max_depth`, its oldest entry is evicted.
///
/// Empty stacks make `undo`/`redo` return `None`; they never error.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    undo: VecDeque<HistoryEntry>,
    redo: VecDeque<HistoryEntry>,
    max_depth: usize,
    next_sequence: u64,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl HistoryStack {
    /// Creates an empty history keeping at most `max_depth` entries per stack.
    ///
    /// A depth of zero is treated as one.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            max_depth: max_depth.max(1),
            next_sequence: 0,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn entry(&mut self, config: WidgetConfig) -> HistoryEntry {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        HistoryEntry { sequence, config }
    }

    fn push_bounded(stack: &mut VecDeque<HistoryEntry>, entry: HistoryEntry, max_depth: usize) {
        stack.push_back(entry);
        while stack.len() > max_depth {
            stack.pop_front();
        }
    }

    /// Records `snapshot` (the config as it was before an edit).
    pub fn push(&mut self, snapshot: WidgetConfig) {
        let entry = self.entry(snapshot);
        Self::push_bounded(&mut self.undo, entry, self.max_depth);
        self.redo.clear();
    }

    /// Steps back one edit.
    ///
    /// `current` is the live config; it moves onto the redo stack and the
    /// returned entry becomes the new live config.
    pub fn undo(&mut self, current: &WidgetConfig) -> Option<HistoryEntry> {
        let previous = self.undo.pop_back()?;
        let entry = self.entry(current.clone());
        Self::push_bounded(&mut self.redo, entry, self.max_depth);
        Some(previous)
    }

    /// Re-applies the most recently undone edit. Mirror image of [`Self::undo`].
    pub fn redo(&mut self, current: &WidgetConfig) -> Option<HistoryEntry> {
        let next = self.redo.pop_back()?;
        let entry = self.entry(current.clone());
        Self::push_bounded(&mut self.undo, entry, self.max_depth);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> WidgetConfig {
        WidgetConfig {
            widget_name: name.to_string(),
            ..WidgetConfig::default()
        }
    }

    #[test]
    fn test_empty_history_is_a_no_op() {
        let mut history = HistoryStack::default();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo(&named("live")).is_none());
        assert!(history.redo(&named("live")).is_none());
        // A failed undo must not leak the live config onto the redo stack
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_then_redo_round_trips() {
        let mut history = HistoryStack::default();
        history.push(named("a"));
        let live = named("b");

        let restored = history.undo(&live).unwrap();
        assert_eq!(restored.config, named("a"));
        assert!(history.can_redo());

        let redone = history.redo(&restored.config).unwrap();
        assert_eq!(redone.config, live);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = HistoryStack::default();
        history.push(named("a"));
        history.undo(&named("b"));
        assert!(history.can_redo());

        history.push(named("a"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_depth_evicts_oldest() {
        let mut history = HistoryStack::new(3);
        for name in ["a", "b", "c", "d"] {
            history.push(named(name));
        }
        assert_eq!(history.undo_len(), 3);

        let mut live = named("e");
        let mut seen = Vec::new();
        while let Some(entry) = history.undo(&live) {
            seen.push(entry.config.widget_name.clone());
            live = entry.config;
        }
        assert_eq!(seen, vec!["d", "c", "b"]);
    }

    #[test]
    fn test_sequence_numbers_are_monotonic() {
        let mut history = HistoryStack::default();
        history.push(named("a"));
        history.push(named("b"));
        let second = history.undo(&named("c")).unwrap();
        let first = history.undo(&second.config).unwrap();
        assert!(second.sequence > first.sequence);
    }

    #[test]
    fn test_clear_empties_both_stacks() {
        let mut history = HistoryStack::new(0);
        assert_eq!(history.max_depth(), 1);
        history.push(named("a"));
        history.undo(&named("b"));
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
