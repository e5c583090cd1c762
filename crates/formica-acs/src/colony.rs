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

//! # Colony
//!
//! One ant colony and the single-threaded ACS engine built on it.
//!
//! Each iteration the ants construct solutions in lock step: the outer loop
//! runs once per cell, and every ant takes one step inside it, so the
//! population advances simultaneously rather than one ant finishing before
//! the next begins. The best construction of the iteration competes for the
//! best-so-far slot through its pheromone value `N² / (N² − filled)`, an
//! increasing function of the score that reaches `+∞` exactly when a
//! construction is complete. Because `best_pher` decays a little every
//! iteration, a later, not strictly better construction can still take over
//! the slot once the incumbent's value has eroded; the matrix then keeps
//! being reinforced from fresh material instead of a stale champion.

use crate::ant::{Ant, AntContext};
use crate::params::AcsParams;
use crate::pheromone::PheromoneMatrix;
use formica_model::board::Board;
use formica_solver::solver::{SolveOutcome, Solver};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::time::{Duration, Instant};

/// A pheromone matrix, an ant population, and the bookkeeping of the best
/// assignments they have produced.
#[derive(Debug)]
pub struct Colony {
    params: AcsParams,
    num_cells: usize,
    pher: PheromoneMatrix,
    ants: Vec<Ant>,
    rng: SmallRng,
    iteration_best: Board,
    iteration_best_score: usize,
    best_sol: Board,
    best_sol_score: usize,
    best_pher: f32,
}

impl Colony {
    /// Creates a colony sized for `puzzle`, seeded with `seed`.
    pub fn new(params: AcsParams, puzzle: &Board, seed: u64) -> Self {
        let num_cells = puzzle.cell_count();
        let tau0 = 1.0 / num_cells as f32;
        Self {
            params,
            num_cells,
            pher: PheromoneMatrix::new(num_cells, puzzle.num_units(), tau0),
            ants: (0..params.num_ants).map(|_| Ant::new(puzzle)).collect(),
            rng: SmallRng::seed_from_u64(seed),
            iteration_best: puzzle.clone(),
            iteration_best_score: puzzle.fixed_cell_count(),
            best_sol: puzzle.clone(),
            best_sol_score: puzzle.fixed_cell_count(),
            best_pher: 0.0,
        }
    }

    /// Pheromone deposit for a construction that filled `cells_filled`
    /// cells. `+∞` for a complete assignment.
    #[inline]
    pub fn pher_add(&self, cells_filled: usize) -> f32 {
        self.num_cells as f32 / (self.num_cells - cells_filled) as f32
    }

    /// Runs one construction round: every ant builds a solution from a
    /// random start cell, the iteration best is recorded, and the
    /// best-so-far slot is updated when the new pheromone value beats the
    /// (decayed) incumbent value.
    pub fn run_iteration(&mut self, puzzle: &Board) {
        for ant in self.ants.iter_mut() {
            let start = self.rng.random_range(0..self.num_cells);
            ant.init_solution(puzzle, start);
        }

        let mut ctx = AntContext {
            pher: &mut self.pher,
            rng: &mut self.rng,
            q0: self.params.q0,
        };
        for _ in 0..self.num_cells {
            for ant in self.ants.iter_mut() {
                ant.step_solution(&mut ctx);
            }
        }

        let mut best_index = 0;
        let mut best_score = 0;
        for (i, ant) in self.ants.iter().enumerate() {
            if ant.cells_filled() > best_score {
                best_score = ant.cells_filled();
                best_index = i;
            }
        }

        self.iteration_best.clone_from(self.ants[best_index].solution());
        self.iteration_best_score = best_score;

        let pher_to_add = self.pher_add(best_score);
        if pher_to_add > self.best_pher {
            self.best_sol.clone_from(&self.iteration_best);
            self.best_sol_score = self.iteration_best_score;
            self.best_pher = pher_to_add;
        }
    }

    /// Standard ACS global update followed by the best-value decay: every
    /// fixed cell of the best-so-far solution is reinforced with the
    /// current `best_pher`.
    pub fn global_update(&mut self) {
        for i in 0..self.num_cells {
            let cell = self.best_sol.cell(i);
            if cell.is_fixed() {
                self.pher.reinforce(i, cell.index(), self.params.rho, self.best_pher);
            }
        }
        self.best_pher *= 1.0 - self.params.best_evap;
    }

    #[inline]
    pub fn params(&self) -> &AcsParams {
        &self.params
    }

    #[inline]
    pub fn pheromone(&self) -> &PheromoneMatrix {
        &self.pher
    }

    #[inline]
    pub(crate) fn pheromone_mut(&mut self) -> &mut PheromoneMatrix {
        &mut self.pher
    }

    #[inline]
    pub fn iteration_best(&self) -> &Board {
        &self.iteration_best
    }

    #[inline]
    pub fn iteration_best_score(&self) -> usize {
        self.iteration_best_score
    }

    #[inline]
    pub fn best_sol(&self) -> &Board {
        &self.best_sol
    }

    #[inline]
    pub fn best_sol_score(&self) -> usize {
        self.best_sol_score
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.num_cells
    }

    /// Whether the best-so-far solution is complete.
    #[inline]
    pub fn is_solved(&self) -> bool {
        self.best_sol_score == self.num_cells
    }
}

/// The single-threaded ACS engine.
#[derive(Debug, Clone)]
pub struct AcsSolver {
    params: AcsParams,
}

impl AcsSolver {
    #[inline]
    pub fn new(params: AcsParams) -> Self {
        Self { params }
    }
}

impl Solver for AcsSolver {
    fn name(&self) -> &str {
        "AcsSolver"
    }

    fn solve(&mut self, puzzle: &Board, limit: Duration) -> SolveOutcome {
        let start = Instant::now();
        let mut colony = Colony::new(self.params, puzzle, self.params.base_seed());
        let mut iterations: u64 = 0;

        loop {
            colony.run_iteration(puzzle);
            let solved = colony.is_solved();
            colony.global_update();
            iterations += 1;

            if solved {
                break;
            }
            // Poll the clock sparsely; an iteration is cheap next to it.
            if iterations % 100 == 0 && start.elapsed() > limit {
                break;
            }
        }

        SolveOutcome::new(
            colony.is_solved(),
            colony.best_sol().clone(),
            start.elapsed(),
            iterations,
        )
    }
}
