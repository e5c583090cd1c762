// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Solver Facade
//!
//! Every solving engine implements [`Solver`]: take a reduced puzzle and a
//! wall-clock budget, return a [`SolveOutcome`]. A timeout is not an error;
//! the outcome then carries `solved = false` together with the best partial
//! assignment the engine reached. No engine panics or unwinds across this
//! boundary.

use formica_model::board::Board;
use std::time::Duration;

/// The result of one solving run.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    /// Whether a complete assignment was found within the time budget.
    pub solved: bool,
    /// The best board reached. Complete when `solved`, otherwise the
    /// highest-scoring partial assignment.
    pub solution: Board,
    /// Wall time consumed by the run.
    pub elapsed: Duration,
    /// Iterations completed (construction rounds for the colony engines,
    /// search nodes for backtracking).
    pub iterations: u64,
    /// Whether any inter-colony communication round took place.
    pub communication: bool,
}

impl SolveOutcome {
    /// Creates an outcome with no communication, the common case for the
    /// single-threaded engines.
    #[inline]
    pub fn new(solved: bool, solution: Board, elapsed: Duration, iterations: u64) -> Self {
        Self {
            solved,
            solution,
            elapsed,
            iterations,
            communication: false,
        }
    }

    /// Elapsed time in seconds, as reported to the user.
    #[inline]
    pub fn seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

impl std::fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolveOutcome(solved: {}, iterations: {}, time: {:.3}s)",
            self.solved,
            self.iterations,
            self.seconds()
        )
    }
}

/// A sudoku solving engine.
pub trait Solver {
    /// Returns the name of the engine.
    fn name(&self) -> &str;

    /// Attempts to complete `puzzle` within `limit` wall time.
    fn solve(&mut self, puzzle: &Board, limit: Duration) -> SolveOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_constructor_and_seconds() {
        let board = Board::from_puzzle(&".".repeat(81)).unwrap();
        let outcome = SolveOutcome::new(false, board, Duration::from_millis(1500), 7);
        assert!(!outcome.solved);
        assert!(!outcome.communication);
        assert_eq!(outcome.iterations, 7);
        assert!((outcome.seconds() - 1.5).abs() < 1e-6);
    }
}
