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

//! # Sub-Colony
//!
//! A colony participating in the parallel engine. On top of the plain
//! colony it keeps two slots for solutions received at communication
//! rounds (the ring neighbor's iteration best and a random partner's
//! best-so-far) and can run the **three-source pheromone update** that
//! replaces the standard global update on those rounds.
//!
//! The three-source update is *selective*: for every cell, the deposits of
//! the up-to-three source solutions are accumulated per digit, and only
//! (cell, digit) pairs that actually received a deposit are evaporated.
//! Entries no source endorses keep their current level, preserving
//! knowledge the exchange round has no opinion about. Received solutions
//! never touch the colony's own best-so-far slot; they only shape the
//! matrix.

use crate::colony::Colony;
use crate::params::AcsParams;
use formica_model::board::Board;

/// A colony plus the communication state of the parallel engine.
#[derive(Debug)]
pub struct SubColony {
    colony: Colony,
    received_iteration_best: Board,
    received_iteration_best_score: usize,
    received_best_sol: Board,
    received_best_sol_score: usize,
    // Per-cell deposit scratch, reused across communication rounds.
    contributions: Vec<f32>,
    has_contribution: Vec<bool>,
    current_iteration: u64,
}

impl SubColony {
    /// Creates a sub-colony sized for `puzzle`, seeded with `seed`.
    pub fn new(params: AcsParams, puzzle: &Board, seed: u64) -> Self {
        let num_units = puzzle.num_units();
        Self {
            colony: Colony::new(params, puzzle, seed),
            received_iteration_best: puzzle.clone(),
            received_iteration_best_score: 0,
            received_best_sol: puzzle.clone(),
            received_best_sol_score: 0,
            contributions: vec![0.0; num_units],
            has_contribution: vec![false; num_units],
            current_iteration: 0,
        }
    }

    /// Stores the ring neighbor's iteration best for the next three-source
    /// update.
    pub fn receive_iteration_best(&mut self, solution: &Board) {
        self.received_iteration_best.clone_from(solution);
        self.received_iteration_best_score = solution.fixed_cell_count();
    }

    /// Stores the random partner's best-so-far for the next three-source
    /// update.
    pub fn receive_best_sol(&mut self, solution: &Board) {
        self.received_best_sol.clone_from(solution);
        self.received_best_sol_score = solution.fixed_cell_count();
    }

    /// Three-source selective pheromone update, used instead of the
    /// standard global update on communication iterations.
    pub fn communication_update(&mut self) {
        let num_cells = self.colony.cell_count();
        let rho = self.colony.params().rho;

        let local_score = self.colony.iteration_best_score();
        let deposit_local = if local_score > 0 { self.colony.pher_add(local_score) } else { 0.0 };
        let deposit_ring = if self.received_iteration_best_score > 0 {
            self.colony.pher_add(self.received_iteration_best_score)
        } else {
            0.0
        };
        let deposit_random = if self.received_best_sol_score > 0 {
            self.colony.pher_add(self.received_best_sol_score)
        } else {
            0.0
        };

        for i in 0..num_cells {
            self.contributions.fill(0.0);
            self.has_contribution.fill(false);

            if deposit_local > 0.0 {
                let cell = self.colony.iteration_best().cell(i);
                if cell.is_fixed() {
                    self.contributions[cell.index()] += deposit_local;
                    self.has_contribution[cell.index()] = true;
                }
            }
            if deposit_ring > 0.0 {
                let cell = self.received_iteration_best.cell(i);
                if cell.is_fixed() {
                    self.contributions[cell.index()] += deposit_ring;
                    self.has_contribution[cell.index()] = true;
                }
            }
            if deposit_random > 0.0 {
                let cell = self.received_best_sol.cell(i);
                if cell.is_fixed() {
                    self.contributions[cell.index()] += deposit_random;
                    self.has_contribution[cell.index()] = true;
                }
            }

            for (j, &touched) in self.has_contribution.iter().enumerate() {
                if touched {
                    self.colony
                        .pheromone_mut()
                        .reinforce(i, j, rho, self.contributions[j]);
                }
            }
        }
    }

    /// One construction round (identical to the plain colony's).
    #[inline]
    pub fn run_iteration(&mut self, puzzle: &Board) {
        self.colony.run_iteration(puzzle);
    }

    /// The standard global update and best-value decay, used on
    /// non-communication iterations. The decay lives here, not in the
    /// communication path: `best_pher` only erodes while it is being spent.
    #[inline]
    pub fn standard_update(&mut self) {
        self.colony.global_update();
    }

    #[inline]
    pub fn iteration_best(&self) -> &Board {
        self.colony.iteration_best()
    }

    #[inline]
    pub fn received_iteration_best(&self) -> &Board {
        &self.received_iteration_best
    }

    #[inline]
    pub fn received_iteration_best_score(&self) -> usize {
        self.received_iteration_best_score
    }

    #[inline]
    pub fn received_best_sol(&self) -> &Board {
        &self.received_best_sol
    }

    #[inline]
    pub fn received_best_sol_score(&self) -> usize {
        self.received_best_sol_score
    }

    #[inline]
    pub fn best_sol(&self) -> &Board {
        self.colony.best_sol()
    }

    #[inline]
    pub fn best_sol_score(&self) -> usize {
        self.colony.best_sol_score()
    }

    #[inline]
    pub fn is_solved(&self) -> bool {
        self.colony.is_solved()
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.colony.cell_count()
    }

    #[inline]
    pub fn current_iteration(&self) -> u64 {
        self.current_iteration
    }

    #[inline]
    pub fn set_current_iteration(&mut self, iteration: u64) {
        self.current_iteration = iteration;
    }

    #[inline]
    pub fn colony(&self) -> &Colony {
        &self.colony
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::AcsParams;
    use formica_model::board::Board;

    const SOLVED: &str = "123456789456789123789123456234567891567891234891234567345678912678912345912345678";

    fn blank_board() -> Board {
        Board::from_puzzle(&".".repeat(81)).unwrap()
    }

    #[test]
    fn test_receive_stores_clone_and_score() {
        let puzzle = blank_board();
        let solved = Board::from_puzzle(SOLVED).unwrap();
        let mut sub = SubColony::new(AcsParams::default(), &puzzle, 0);

        assert_eq!(sub.received_iteration_best_score, 0);
        sub.receive_iteration_best(&solved);
        assert_eq!(sub.received_iteration_best_score, 81);
        assert_eq!(&sub.received_iteration_best, &solved);

        sub.receive_best_sol(&solved);
        assert_eq!(sub.received_best_sol_score, 81);
    }

    #[test]
    fn test_communication_update_is_selective() {
        let puzzle = blank_board();
        let solved = Board::from_puzzle(SOLVED).unwrap();
        let mut sub = SubColony::new(AcsParams::default(), &puzzle, 0);
        let tau0 = 1.0 / 81.0;

        // Only the ring slot carries a solution; the local iteration best
        // and the random slot are empty (score 0).
        sub.receive_iteration_best(&solved);
        sub.communication_update();

        let deposit = sub.colony.pher_add(81);
        assert!(deposit.is_infinite());

        for i in 0..81 {
            let endorsed = solved.cell(i).index();
            for j in 0..9 {
                let value = sub.colony.pheromone().get(i, j);
                if j == endorsed {
                    // Evaporated and reinforced with the (infinite) deposit.
                    assert!(value > tau0, "cell {i} digit {j} was not reinforced");
                } else {
                    // Untouched: selective evaporation skips silent entries.
                    assert_eq!(value, tau0, "cell {i} digit {j} was evaporated");
                }
            }
        }
    }

    #[test]
    fn test_communication_update_accumulates_agreeing_sources() {
        let puzzle = blank_board();
        let mut finite = Board::from_puzzle(&".".repeat(81)).unwrap();
        // A partial board: only cell 0 fixed, matching the solved grid.
        formica_model::propagation::set_and_propagate(
            &mut finite,
            0,
            formica_core::set::ValueSet::singleton(9, 1),
        );

        let mut sub = SubColony::new(AcsParams::default().with_rho(0.5), &puzzle, 0);
        sub.receive_iteration_best(&finite);
        sub.receive_best_sol(&finite);
        sub.communication_update();

        let tau0 = 1.0 / 81.0;
        let per_source = sub.colony.pher_add(finite.fixed_cell_count());
        let expected = tau0 * 0.5 + 0.5 * (2.0 * per_source);
        let got = sub.colony.pheromone().get(0, 0);
        assert!((got - expected).abs() < 1e-5, "got {got}, expected {expected}");
    }

    #[test]
    fn test_received_solutions_do_not_replace_best_sol() {
        let puzzle = blank_board();
        let solved = Board::from_puzzle(SOLVED).unwrap();
        let mut sub = SubColony::new(AcsParams::default(), &puzzle, 0);
        sub.receive_iteration_best(&solved);
        sub.receive_best_sol(&solved);
        assert_eq!(sub.best_sol_score(), 0);
        assert!(!sub.is_solved());
    }
}
