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

//! # Ant
//!
//! One constructive agent. Per iteration an ant walks the whole board once,
//! starting from a random cell and wrapping around, and fills each undecided
//! cell with a pheromone-guided choice: with probability `q0` the candidate
//! with the highest weight, otherwise a roulette draw proportional to the
//! weights (the ACS pseudo-random-proportional rule). Every placement is
//! installed with full constraint propagation on the ant's private board,
//! and triggers the colony's local pheromone update.
//!
//! Cells that have lost all candidates when the ant reaches them are
//! unfillable this round; the ant counts them and moves on. The iteration
//! score is the number of cells that did get a value.
//!
//! The ant borrows its colony's pheromone matrix and RNG through
//! [`AntContext`] for the duration of a step.

use crate::pheromone::PheromoneMatrix;
use formica_core::set::ValueSet;
use formica_model::board::Board;
use formica_model::propagation;
use rand::Rng;
use rand::rngs::SmallRng;

/// The slice of colony state an ant needs while stepping.
pub struct AntContext<'a> {
    pub pher: &'a mut PheromoneMatrix,
    pub rng: &'a mut SmallRng,
    pub q0: f32,
}

/// A single solution-constructing agent.
#[derive(Debug)]
pub struct Ant {
    board: Board,
    cursor: usize,
    fail_cells: usize,
    // Roulette scratch, allocated once and reused every step.
    roulette: Vec<f32>,
    roulette_vals: Vec<ValueSet>,
}

impl Ant {
    /// Creates an ant whose working board is sized for `puzzle`.
    pub fn new(puzzle: &Board) -> Self {
        let num_units = puzzle.num_units();
        Self {
            board: puzzle.clone(),
            cursor: 0,
            fail_cells: 0,
            roulette: vec![0.0; num_units],
            roulette_vals: vec![ValueSet::empty(num_units); num_units],
        }
    }

    /// Resets the ant for a new iteration: re-copies the puzzle into the
    /// working board (no allocation) and positions the cursor.
    pub fn init_solution(&mut self, puzzle: &Board, start_cell: usize) {
        self.board.clone_from(puzzle);
        self.cursor = start_cell;
        self.fail_cells = 0;
    }

    /// Advances one cell: decides the cell under the cursor (if it still
    /// needs a decision) and moves the cursor forward, wrapping at the end
    /// of the board.
    pub fn step_solution(&mut self, ctx: &mut AntContext<'_>) {
        let i = self.cursor;
        self.cursor = (self.cursor + 1) % self.board.cell_count();

        let cell = self.board.cell(i);
        if cell.is_fixed() {
            return;
        }
        if cell.is_empty() {
            self.fail_cells += 1;
            return;
        }

        let num_units = self.board.num_units();
        let mut total = 0.0f32;
        let mut num_candidates = 0;
        let mut argmax = 0;
        let mut argmax_weight = f32::NEG_INFINITY;
        for j in cell.indices() {
            let w = ctx.pher.get(i, j);
            total += w;
            self.roulette[num_candidates] = total;
            self.roulette_vals[num_candidates] = ValueSet::singleton(num_units, j + 1);
            if w > argmax_weight {
                argmax_weight = w;
                argmax = num_candidates;
            }
            num_candidates += 1;
        }

        let pick = if ctx.rng.random::<f32>() < ctx.q0 {
            argmax
        } else {
            let r = ctx.rng.random::<f32>() * total;
            let mut k = 0;
            while k + 1 < num_candidates && self.roulette[k] < r {
                k += 1;
            }
            k
        };

        let chosen = self.roulette_vals[pick];
        ctx.pher.local_update(i, chosen.index());
        propagation::set_and_propagate(&mut self.board, i, chosen);
    }

    /// Cells that received a value this iteration.
    #[inline]
    pub fn cells_filled(&self) -> usize {
        self.board.cell_count() - self.fail_cells
    }

    /// The ant's working board.
    #[inline]
    pub fn solution(&self) -> &Board {
        &self.board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pheromone::PheromoneMatrix;
    use rand::SeedableRng;

    const EASY: &str =
        "..3.2.6..9..3.5..1..18.64....81.29..7.......8..67.82....26.95..8..2.3..9..5.1.3..";

    fn run_ant(puzzle: &Board, seed: u64, start: usize) -> Ant {
        let mut pher = PheromoneMatrix::new(
            puzzle.cell_count(),
            puzzle.num_units(),
            1.0 / puzzle.cell_count() as f32,
        );
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut ant = Ant::new(puzzle);
        ant.init_solution(puzzle, start);
        for _ in 0..puzzle.cell_count() {
            let mut ctx = AntContext { pher: &mut pher, rng: &mut rng, q0: 0.9 };
            ant.step_solution(&mut ctx);
        }
        ant
    }

    #[test]
    fn test_fully_reduced_puzzle_needs_no_choices() {
        let puzzle = Board::from_puzzle(EASY).unwrap();
        assert_eq!(puzzle.fixed_cell_count(), 81);
        let ant = run_ant(&puzzle, 1, 17);
        assert_eq!(ant.cells_filled(), 81);
        assert_eq!(ant.solution().fixed_cell_count(), 81);
    }

    #[test]
    fn test_score_matches_final_fixed_count() {
        // After a full sweep every cell is either fixed or was empty when
        // visited, so the score equals the board's fixed-cell count.
        let puzzle = Board::from_puzzle(&".".repeat(81)).unwrap();
        for seed in [3u64, 7, 11] {
            let ant = run_ant(&puzzle, seed, seed as usize % 81);
            assert_eq!(ant.cells_filled(), ant.solution().fixed_cell_count());
        }
    }

    #[test]
    fn test_init_solution_resets_state() {
        let puzzle = Board::from_puzzle(&".".repeat(81)).unwrap();
        let mut ant = run_ant(&puzzle, 5, 0);
        assert!(ant.solution().fixed_cell_count() > 0);
        ant.init_solution(&puzzle, 42);
        assert_eq!(ant.solution().fixed_cell_count(), 0);
        assert_eq!(ant.cells_filled(), 81);
    }

    #[test]
    fn test_identical_seeds_build_identical_solutions() {
        let puzzle = Board::from_puzzle(&".".repeat(81)).unwrap();
        let a = run_ant(&puzzle, 99, 13);
        let b = run_ant(&puzzle, 99, 13);
        assert_eq!(a.solution(), b.solution());
        assert_eq!(a.cells_filled(), b.cells_filled());
    }
}
