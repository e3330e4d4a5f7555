//! Scoring candidate continuations.

use serde::{Deserialize, Serialize};

/// Outcome of ranking the choices of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ranking {
    /// Zero-based index of the most plausible choice.
    Chosen(usize),
    /// No choice was strictly more plausible than the others.
    Undecided,
}

impl Ranking {
    /// The chosen index, if any.
    pub fn chosen(&self) -> Option<usize> {
        match self {
            Ranking::Chosen(index) => Some(*index),
            Ranking::Undecided => None,
        }
    }

    pub fn is_undecided(&self) -> bool {
        matches!(self, Ranking::Undecided)
    }
}

impl std::fmt::Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ranking::Chosen(index) => write!(f, "choice {}", index + 1),
            Ranking::Undecided => write!(f, "undecided"),
        }
    }
}

/// Running score of one candidate continuation.
///
/// Probabilities of resolved events are multiplied together. Choices with
/// fewer resolved events are padded up to a common length with the mean of
/// their own resolved probabilities, so short choices are not favored for
/// being short.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoiceScore {
    probability: f64,
    mean: f64,
    resolved: usize,
}

impl ChoiceScore {
    pub fn new() -> Self {
        Self {
            probability: 1.0,
            mean: 0.0,
            resolved: 0,
        }
    }

    /// Account for one resolved event observed with probability `p`.
    pub fn record(&mut self, p: f64) {
        self.probability *= p;
        self.resolved += 1;
        self.mean += (p - self.mean) / self.resolved as f64;
    }

    /// Number of resolved events recorded.
    pub fn resolved(&self) -> usize {
        self.resolved
    }

    /// Final score, padded to `length` events. A choice with no resolved
    /// event scores 0.
    pub fn finish(&self, length: usize) -> f64 {
        if self.resolved == 0 {
            return 0.0;
        }
        let padding = length.saturating_sub(self.resolved);
        (0..padding).fold(self.probability, |p, _| p * self.mean)
    }
}

impl Default for ChoiceScore {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the strictly most probable choice.
///
/// The first choice that equals the best so far ends the ranking as
/// undecided, whatever follows. Nothing at or below 0 is ever chosen.
pub fn pick_best(scores: &[f64]) -> Ranking {
    let mut best: Option<(usize, f64)> = None;
    for (index, &score) in scores.iter().enumerate() {
        match best {
            Some((_, highest)) if score == highest => return Ranking::Undecided,
            Some((_, highest)) if score < highest => {}
            _ if score > 0.0 => best = Some((index, score)),
            _ => {}
        }
    }
    best.map_or(Ranking::Undecided, |(index, _)| Ranking::Chosen(index))
}
