//! Per-session conversation history

use std::collections::VecDeque;

use crate::domain::session_cache::ContextTurn;

const PREALLOCATED_TURNS: usize = 16;

/// Bounded, oldest-first list of turns for one session
#[derive(Debug)]
pub struct ContextStore {
    turns: VecDeque<ContextTurn>,
    max_turns: usize,
}

impl ContextStore {
    pub fn new(max_turns: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(max_turns.min(PREALLOCATED_TURNS) + 1),
            max_turns,
        }
    }

    /// Append a turn, returning the oldest turn if it was dropped to stay in bounds
    pub fn append(&mut self, turn: ContextTurn) -> Option<ContextTurn> {
        self.turns.push_back(turn);

        if self.turns.len() > self.max_turns {
            return self.turns.pop_front();
        }

        None
    }

    /// Render the last `window` turns followed by the current question.
    ///
    /// Each turn becomes two lines; previous answers are cut to
    /// `preview_chars` characters. With no history the query is returned as is.
    pub fn build_enhanced_query(
        &self,
        current_query: &str,
        window: usize,
        preview_chars: usize,
    ) -> String {
        if self.turns.is_empty() {
            return current_query.to_string();
        }

        let skip = self.turns.len().saturating_sub(window);
        let mut lines = Vec::with_capacity(window.min(self.turns.len()) * 2 + 1);

        for turn in self.turns.iter().skip(skip) {
            lines.push(format!("user asked: {}", turn.query));
            lines.push(format!(
                "assistant answered: {}...",
                truncate_chars(&turn.response, preview_chars)
            ));
        }

        lines.push(format!("current question: {}", current_query));

        lines.join("\n")
    }

    pub fn turns(&self) -> impl Iterator<Item = &ContextTurn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// First `max` characters of `text`, never splitting a UTF-8 sequence
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(turns: &[(&str, &str)]) -> ContextStore {
        let mut store = ContextStore::new(10);
        for (query, response) in turns {
            store.append(ContextTurn::new(*query, *response));
        }
        store
    }

    #[test]
    fn test_huge_limit_does_not_preallocate() {
        let mut store = ContextStore::new(usize::MAX);

        assert!(store.append(ContextTurn::new("q", "r")).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_empty_history_returns_query_unchanged() {
        let store = ContextStore::new(10);

        assert_eq!(
            store.build_enhanced_query("how to fry rice", 3, 100),
            "how to fry rice"
        );
    }

    #[test]
    fn test_single_turn_rendering() {
        let store = store_with(&[("what is mirin", "A sweet rice wine.")]);

        let enhanced = store.build_enhanced_query("can I replace it", 3, 100);

        assert_eq!(
            enhanced,
            "user asked: what is mirin\n\
             assistant answered: A sweet rice wine....\n\
             current question: can I replace it"
        );
    }

    #[test]
    fn test_window_keeps_last_three_turns() {
        let store = store_with(&[("q1", "r1"), ("q2", "r2"), ("q3", "r3"), ("q4", "r4")]);

        let enhanced = store.build_enhanced_query("q5", 3, 100);

        assert!(!enhanced.contains("user asked: q1"));
        assert!(!enhanced.contains("r1"));
        assert!(enhanced.contains("user asked: q2"));
        assert!(enhanced.contains("user asked: q3"));
        assert!(enhanced.contains("user asked: q4"));
        assert!(enhanced.ends_with("current question: q5"));
        assert_eq!(enhanced.lines().count(), 7);
    }

    #[test]
    fn test_turns_rendered_oldest_first() {
        let store = store_with(&[("q1", "r1"), ("q2", "r2")]);

        let enhanced = store.build_enhanced_query("q3", 3, 100);
        let lines: Vec<&str> = enhanced.lines().collect();

        assert_eq!(lines[0], "user asked: q1");
        assert_eq!(lines[2], "user asked: q2");
    }

    #[test]
    fn test_response_preview_truncated_by_chars() {
        let long = "a".repeat(250);
        let store = store_with(&[("q", long.as_str())]);

        let enhanced = store.build_enhanced_query("next", 3, 100);
        let answer_line = enhanced.lines().nth(1).unwrap();

        assert_eq!(answer_line, format!("assistant answered: {}...", "a".repeat(100)));
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_chars("红烧肉的做法", 3), "红烧肉");
        assert_eq!(truncate_chars("短", 100), "短");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_append_drops_oldest_beyond_capacity() {
        let mut store = ContextStore::new(10);

        for i in 0..10 {
            assert!(store.append(ContextTurn::new(format!("q{}", i), "r")).is_none());
        }

        let dropped = store.append(ContextTurn::new("q10", "r")).unwrap();

        assert_eq!(dropped.query, "q0");
        assert_eq!(store.len(), 10);
        assert_eq!(store.turns().next().unwrap().query, "q1");
    }

    #[test]
    fn test_build_is_deterministic() {
        let store = store_with(&[("q1", "r1"), ("q2", "r2")]);

        assert_eq!(
            store.build_enhanced_query("q3", 3, 100),
            store.build_enhanced_query("q3", 3, 100)
        );
    }
}
