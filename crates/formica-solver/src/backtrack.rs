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

//! # Backtracking Solver
//!
//! A depth-first search interleaved with constraint propagation. At every
//! node the cell with the fewest remaining candidates is branched on
//! (minimum-remaining-values ordering); each trial assignment is installed
//! with full propagation on a cloned board, and branches whose propagation
//! produces an infeasible cell are pruned immediately.
//!
//! The time budget is enforced with a bitmask-gated clock check: the node
//! counter is incremented on every expansion, and the wall clock is only
//! consulted when the low bits are zero, keeping the hot path free of
//! syscalls.

use crate::solver::{SolveOutcome, Solver};
use formica_core::set::ValueSet;
use formica_model::board::Board;
use formica_model::propagation;
use smallvec::SmallVec;
use std::time::{Duration, Instant};

/// Check the clock every 4096 nodes.
const CLOCK_CHECK_MASK: u64 = 0xFFF;

/// Depth-first search with propagation and MRV branching.
#[derive(Debug, Default)]
pub struct BacktrackSolver {
    nodes: u64,
    timed_out: bool,
}

impl BacktrackSolver {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of the unfixed cell with the fewest candidates,
    /// or `None` when every cell is fixed.
    fn select_cell(board: &Board) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for i in 0..board.cell_count() {
            let cell = board.cell(i);
            if cell.is_fixed() {
                continue;
            }
            let count = cell.count();
            if count == 0 {
                // A dead branch; report it so the caller can prune.
                return Some(i);
            }
            match best {
                Some((_, c)) if c <= count => {}
                _ => best = Some((i, count)),
            }
            if count == 2 {
                break;
            }
        }
        best.map(|(i, _)| i)
    }

    fn search(&mut self, board: &Board, start: Instant, limit: Duration) -> Option<Board> {
        self.nodes = self.nodes.wrapping_add(1);
        if self.nodes & CLOCK_CHECK_MASK == 0 && start.elapsed() >= limit {
            self.timed_out = true;
            return None;
        }

        let Some(i) = Self::select_cell(board) else {
            return Some(board.clone());
        };
        let cell = board.cell(i);
        if cell.is_empty() {
            return None;
        }

        let candidates: SmallVec<[usize; 16]> = cell.indices().collect();
        for j in candidates {
            let mut child = board.clone();
            propagation::set_and_propagate(
                &mut child,
                i,
                ValueSet::singleton(board.num_units(), j + 1),
            );
            if child.infeasible_cell_count() > board.infeasible_cell_count() {
                continue;
            }
            if let Some(solution) = self.search(&child, start, limit) {
                return Some(solution);
            }
            if self.timed_out {
                return None;
            }
        }
        None
    }
}

impl Solver for BacktrackSolver {
    fn name(&self) -> &str {
        "BacktrackSolver"
    }

    fn solve(&mut self, puzzle: &Board, limit: Duration) -> SolveOutcome {
        let start = Instant::now();
        self.nodes = 0;
        self.timed_out = false;

        // A puzzle already infeasible after reduction has no solution.
        let result = if puzzle.infeasible_cell_count() > 0 {
            None
        } else {
            self.search(puzzle, start, limit)
        };

        let solved = result.is_some();
        let solution = result.unwrap_or_else(|| puzzle.clone());
        SolveOutcome::new(solved, solution, start.elapsed(), self.nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EASY: &str =
        "..3.2.6..9..3.5..1..18.64....81.29..7.......8..67.82....26.95..8..2.3..9..5.1.3..";

    const HARD: &str =
        "4.....8.5.3..........7......2.....6.....8.4......1.......6.3.7.5..2.....1.4......";

    fn solve(puzzle: &str, secs: u64) -> (Board, SolveOutcome) {
        let board = Board::from_puzzle(puzzle).unwrap();
        let mut solver = BacktrackSolver::new();
        let outcome = solver.solve(&board, Duration::from_secs(secs));
        (Board::givens(puzzle).unwrap(), outcome)
    }

    #[test]
    fn test_solves_easy_puzzle() {
        let (fingerprint, outcome) = solve(EASY, 5);
        assert!(outcome.solved);
        assert!(fingerprint.check_solution(&outcome.solution));
    }

    #[test]
    fn test_solves_hard_puzzle() {
        let (fingerprint, outcome) = solve(HARD, 30);
        assert!(outcome.solved);
        assert!(fingerprint.check_solution(&outcome.solution));
    }

    #[test]
    fn test_fills_a_blank_board() {
        let blank = ".".repeat(81);
        let (fingerprint, outcome) = solve(&blank, 30);
        assert!(outcome.solved);
        assert!(fingerprint.check_solution(&outcome.solution));
    }

    #[test]
    fn test_infeasible_puzzle_reports_failure() {
        let mut rows = String::from("123456...");
        rows.push_str("......789");
        rows.push_str(&".".repeat(63));
        let board = Board::from_puzzle(&rows).unwrap();
        assert!(board.infeasible_cell_count() > 0);
        let mut solver = BacktrackSolver::new();
        let outcome = solver.solve(&board, Duration::from_secs(5));
        assert!(!outcome.solved);
    }
}
