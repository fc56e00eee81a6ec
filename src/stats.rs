use std::collections::HashMap;
use std::time::SystemTime;

use itertools::Itertools;

use crate::util::{per_minute, round2};

/// Snapshot shown on the stats line after every input event
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stats {
    pub error_rate: f64,
    pub chars_per_minute: f64,
    pub words_per_minute: f64,
}

impl Stats {
    pub fn compute(
        input: &[char],
        target: &[char],
        started_at: Option<SystemTime>,
        now: SystemTime,
    ) -> Self {
        let error_rate = error_rate(input, target);
        let Some(started_at) = started_at else {
            return Self {
                error_rate,
                ..Self::default()
            };
        };

        let minutes = elapsed_minutes(started_at, now);
        Self {
            error_rate,
            chars_per_minute: per_minute(input.len(), minutes),
            words_per_minute: per_minute(word_count(input), minutes),
        }
    }
}

/// Mismatches over the offsets both texts share. Input past the end of the
/// target is never compared.
pub fn count_errors(input: &[char], target: &[char]) -> usize {
    input
        .iter()
        .zip(target)
        .filter(|(typed, expected)| typed != expected)
        .count()
}

/// Percentage of typed characters that miss, over everything typed
/// (including overflow past the target).
pub fn error_rate(input: &[char], target: &[char]) -> f64 {
    match input.len() {
        0 => 0.0,
        total => round2(count_errors(input, target) as f64 * 100.0 / total as f64),
    }
}

pub fn word_count(input: &[char]) -> usize {
    input
        .split(|c| c.is_whitespace())
        .filter(|word| !word.is_empty())
        .count()
}

fn elapsed_minutes(started_at: SystemTime, now: SystemTime) -> f64 {
    now.duration_since(started_at)
        .map(|d| d.as_secs_f64() / 60.0)
        .unwrap_or(0.0)
}

/// Characters typed so far, in order of first appearance. Spaces and
/// newlines are not counted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyMap {
    counts: Vec<(char, usize)>,
    index: HashMap<char, usize>,
}

impl FrequencyMap {
    pub fn from_input(input: &[char]) -> Self {
        let mut map = Self::default();
        for &c in input {
            map.record(c);
        }
        map
    }

    fn record(&mut self, c: char) {
        if c == ' ' || c == '\n' {
            return;
        }
        match self.index.get(&c) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(c, self.counts.len());
                self.counts.push((c, 1));
            }
        }
    }

    pub fn entries(&self) -> &[(char, usize)] {
        &self.counts
    }

    pub fn get(&self, c: char) -> usize {
        self.index.get(&c).map_or(0, |&slot| self.counts[slot].1)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.index.clear();
    }

    /// Most frequent first; ties stay in first-appearance order.
    pub fn by_count(&self) -> Vec<(char, usize)> {
        self.counts
            .iter()
            .copied()
            .sorted_by(|a, b| b.1.cmp(&a.1))
            .collect()
    }
}
