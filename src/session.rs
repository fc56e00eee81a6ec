use std::time::SystemTime;

use tracing::debug;

use crate::render::{render_input_echo, render_target, StyledSpan};
use crate::stats::{FrequencyMap, Stats};

/// What the user is typing against and what they have typed so far.
///
/// Every mutation recomputes the stats and frequency map from scratch; the
/// `_at` variants take the current time explicitly so tests can pin it.
#[derive(Debug, Clone, Default)]
pub struct TypingSession {
    target: Vec<char>,
    input: Vec<char>,
    started_at: Option<SystemTime>,
    stats: Stats,
    frequency: FrequencyMap,
}

impl TypingSession {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.chars().collect(),
            ..Self::default()
        }
    }

    pub fn target(&self) -> String {
        self.target.iter().collect()
    }

    pub fn input(&self) -> String {
        self.input.iter().collect()
    }

    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    pub fn started_at(&self) -> Option<SystemTime> {
        self.started_at
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn frequency(&self) -> &FrequencyMap {
        &self.frequency
    }

    /// Typed everything, at least up to the end of the target.
    pub fn is_complete(&self) -> bool {
        !self.target.is_empty() && self.input.len() >= self.target.len()
    }

    pub fn on_input_changed(&mut self, new_input: &str) -> Stats {
        self.on_input_changed_at(new_input, SystemTime::now())
    }

    /// Replace the whole input buffer and recompute.
    pub fn on_input_changed_at(&mut self, new_input: &str, now: SystemTime) -> Stats {
        self.input = new_input.chars().collect();
        self.recompute(now)
    }

    pub fn push_char(&mut self, c: char) -> Stats {
        self.push_char_at(c, SystemTime::now())
    }

    pub fn push_char_at(&mut self, c: char, now: SystemTime) -> Stats {
        self.input.push(c);
        self.recompute(now)
    }

    pub fn backspace(&mut self) -> Stats {
        self.backspace_at(SystemTime::now())
    }

    pub fn backspace_at(&mut self, now: SystemTime) -> Stats {
        self.input.pop();
        self.recompute(now)
    }

    pub fn skip(&mut self, window: usize) -> Stats {
        self.skip_at(window, SystemTime::now())
    }

    /// Copy the next `window` target characters into the input without
    /// checking them. Nothing happens once the input reaches the target's end.
    pub fn skip_at(&mut self, window: usize, now: SystemTime) -> Stats {
        let start = self.input.len().min(self.target.len());
        let end = start.saturating_add(window).min(self.target.len());
        self.input.extend_from_slice(&self.target[start..end]);
        self.recompute(now)
    }

    /// Clear the clock and the displayed statistics. Target and input stay.
    pub fn reset(&mut self) {
        self.started_at = None;
        self.stats = Stats::default();
        self.frequency.clear();
    }

    /// Swap in a new target text and start over with an empty input.
    pub fn replace_target(&mut self, new_target: &str) {
        self.target = new_target.chars().collect();
        self.input.clear();
        self.reset();
        debug!(chars = self.target.len(), "target replaced");
    }

    pub fn target_window(&self, window: usize) -> Vec<StyledSpan> {
        render_target(&self.target(), &self.input(), window)
    }

    pub fn input_echo(&self, window: usize) -> Vec<StyledSpan> {
        render_input_echo(&self.input(), &self.target(), window)
    }

    fn recompute(&mut self, now: SystemTime) -> Stats {
        if self.started_at.is_none() && !self.input.is_empty() {
            self.started_at = Some(now);
        }
        self.stats = Stats::compute(&self.input, &self.target, self.started_at, now);
        self.frequency = FrequencyMap::from_input(&self.input);
        self.stats
    }
}
