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

//! # Parallel Coordinator
//!
//! Several sub-colonies on dedicated workers, each iterating independently
//! and meeting at periodic barriers to trade solutions.
//!
//! ## Communication schedule
//!
//! Rounds happen at iteration 100 and 200, then every 10 iterations (210,
//! 220, …). The early phase lets each colony develop its own bias before
//! any cross-pollination; once trajectories have matured, exchanges become
//! frequent.
//!
//! ## Barrier protocol
//!
//! Workers arriving at a round increment an atomic counter under the
//! communication mutex. The last to arrive becomes the **master** for the
//! round: it snapshots every colony's iteration best and delivers it to the
//! ring successor, snapshots every best-so-far and delivers it along a
//! freshly shuffled permutation (each colony receives exactly one, never
//! its own), checks for completed solutions, resets the counter, and wakes
//! everyone. The other workers wait on a condition variable with a 100 ms
//! timeout so a stalled run still notices the wall clock. Exclusive access
//! during the master phase holds by construction: every other worker is
//! parked in the wait loop.
//!
//! After a round each worker applies its colony's three-source pheromone
//! update; on all other iterations it applies the standard ACS global
//! update locally. With a single sub-colony communication is disabled
//! entirely and the engine degenerates to the plain ACS loop, using a
//! thread-local stop flag instead of the shared atomic.

use crate::params::AcsParams;
use crate::subcolony::SubColony;
use formica_model::board::Board;
use formica_solver::solver::{SolveOutcome, Solver};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Returns whether `iteration` is a communication round (with more than one
/// colony). Multiples of 100 up to iteration 200, multiples of 10 after.
#[inline]
pub(crate) fn communication_due(iteration: u64) -> bool {
    if iteration < 200 {
        iteration % 100 == 0
    } else {
        iteration % 10 == 0
    }
}

/// The shared state of one parallel run: the colonies and the barrier
/// machinery coordinating their workers.
struct ColonySet {
    colonies: Vec<Mutex<SubColony>>,
    comm_lock: Mutex<()>,
    comm_cv: Condvar,
    barrier: AtomicUsize,
    stop: AtomicBool,
    communication_occurred: AtomicBool,
    master_rng: Mutex<SmallRng>,
    start: Instant,
    limit: Duration,
}

impl ColonySet {
    fn new(
        params: AcsParams,
        num_colonies: usize,
        puzzle: &Board,
        base_seed: u64,
        start: Instant,
        limit: Duration,
    ) -> Self {
        let colonies = (0..num_colonies)
            .map(|id| {
                Mutex::new(SubColony::new(
                    params,
                    puzzle,
                    base_seed.wrapping_add(id as u64),
                ))
            })
            .collect();
        Self {
            colonies,
            comm_lock: Mutex::new(()),
            comm_cv: Condvar::new(),
            barrier: AtomicUsize::new(0),
            stop: AtomicBool::new(false),
            communication_occurred: AtomicBool::new(false),
            // The permutation stream must be independent of the colony
            // streams.
            master_rng: Mutex::new(SmallRng::seed_from_u64(
                base_seed.rotate_left(32) ^ 0x9E37_79B9_7F4A_7C15,
            )),
            start,
            limit,
        }
    }

    #[inline]
    fn num_colonies(&self) -> usize {
        self.colonies.len()
    }

    /// Sets the stop flag when the wall clock has run out.
    fn check_timeout(&self) -> bool {
        if self.start.elapsed() >= self.limit {
            self.stop.store(true, Ordering::SeqCst);
            if self.num_colonies() > 1 {
                self.comm_cv.notify_all();
            }
            true
        } else {
            false
        }
    }

    /// Sets the stop flag when colony `id` holds a complete solution.
    fn solution_found(&self, id: usize) -> bool {
        let solved = self.colonies[id].lock().unwrap().is_solved();
        if solved {
            self.stop.store(true, Ordering::SeqCst);
            if self.num_colonies() > 1 {
                self.comm_cv.notify_all();
            }
        }
        solved
    }

    /// A fresh random matching of colonies for the random topology.
    fn match_permutation(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.num_colonies()).collect();
        order.shuffle(&mut *self.master_rng.lock().unwrap());
        order
    }

    /// Delivers every colony's iteration best to its ring successor.
    fn ring_exchange(&self) {
        let n = self.num_colonies();
        let snapshots: Vec<Board> = (0..n)
            .map(|i| self.colonies[i].lock().unwrap().iteration_best().clone())
            .collect();
        for (i, snapshot) in snapshots.iter().enumerate() {
            self.colonies[(i + 1) % n]
                .lock()
                .unwrap()
                .receive_iteration_best(snapshot);
        }
    }

    /// Delivers best-so-far solutions along the shuffled `order`: the
    /// colony at position `i` receives from the colony at position `i − 1`.
    fn random_exchange(&self, order: &[usize]) {
        let n = self.num_colonies();
        let snapshots: Vec<Board> = (0..n)
            .map(|i| self.colonies[i].lock().unwrap().best_sol().clone())
            .collect();
        for i in 0..n {
            let to = order[i];
            let from = order[(i + n - 1) % n];
            self.colonies[to]
                .lock()
                .unwrap()
                .receive_best_sol(&snapshots[from]);
        }
    }

    /// The master phase of a communication round. Runs with the
    /// communication mutex held while every other worker waits.
    fn master_round(&self) {
        self.communication_occurred.store(true, Ordering::SeqCst);

        let order = self.match_permutation();
        self.ring_exchange();
        self.random_exchange(&order);

        for colony in &self.colonies {
            if colony.lock().unwrap().is_solved() {
                self.stop.store(true, Ordering::SeqCst);
                break;
            }
        }

        self.barrier.store(0, Ordering::SeqCst);
        self.comm_cv.notify_all();
    }

    /// Waits for the master to finish the round. The timed wait keeps the
    /// worker responsive to the wall clock even if a wakeup is missed.
    fn worker_wait(&self, mut guard: MutexGuard<'_, ()>) {
        loop {
            if self.barrier.load(Ordering::SeqCst) == 0 || self.stop.load(Ordering::SeqCst) {
                return;
            }
            let (reacquired, _) = self
                .comm_cv
                .wait_timeout(guard, Duration::from_millis(100))
                .unwrap();
            guard = reacquired;

            if self.start.elapsed() >= self.limit && !self.stop.load(Ordering::SeqCst) {
                self.stop.store(true, Ordering::SeqCst);
                self.barrier.store(0, Ordering::SeqCst);
                self.comm_cv.notify_all();
            }
        }
    }

    /// Joins the communication barrier; the last worker to arrive runs the
    /// master phase.
    fn barrier_sync(&self) {
        if self.stop.load(Ordering::SeqCst) {
            return;
        }

        let guard = self.comm_lock.lock().unwrap();

        // The flag may have been raised while we acquired the lock.
        if self.stop.load(Ordering::SeqCst) {
            self.barrier.store(0, Ordering::SeqCst);
            self.comm_cv.notify_all();
            return;
        }

        let arrived = self.barrier.fetch_add(1, Ordering::SeqCst) + 1;
        if arrived == self.num_colonies() {
            self.master_round();
        } else {
            self.worker_wait(guard);
        }
    }

    /// Progress line for colony 0, every 50 iterations: the best score
    /// across all colonies, read under the communication mutex.
    fn report_progress(&self, id: usize, iteration: u64) {
        if id != 0 || iteration % 50 != 0 {
            return;
        }
        let _guard = self.comm_lock.lock().unwrap();
        let mut best = 0;
        let mut cells = 0;
        for colony in &self.colonies {
            let colony = colony.lock().unwrap();
            best = best.max(colony.best_sol_score());
            cells = colony.cell_count();
        }
        eprintln!("Progress: iteration {iteration} (global best-so-far: {best}/{cells})");
    }

    /// The iteration loop of one worker.
    fn worker_loop(&self, id: usize, puzzle: &Board) {
        let n = self.num_colonies();
        let single = n == 1;
        let mut local_stop = false;
        let mut iteration: u64 = 0;

        loop {
            let stop_requested = if single {
                local_stop
            } else {
                self.stop.load(Ordering::SeqCst)
            };
            if stop_requested || self.check_timeout() {
                break;
            }

            iteration += 1;

            let mut colony = self.colonies[id].lock().unwrap();
            colony.set_current_iteration(iteration);
            colony.run_iteration(puzzle);

            if n > 1 && communication_due(iteration) {
                drop(colony);
                self.barrier_sync();

                let mut colony = self.colonies[id].lock().unwrap();
                colony.communication_update();
                drop(colony);

                if self.stop.load(Ordering::SeqCst) {
                    local_stop = true;
                    break;
                }
            } else {
                colony.standard_update();
                drop(colony);
            }

            self.report_progress(id, iteration);

            if self.solution_found(id) {
                local_stop = true;
                break;
            }
        }
    }
}

/// The parallel multi-colony ACS engine.
#[derive(Debug, Clone)]
pub struct ParallelAcsSolver {
    params: AcsParams,
    num_colonies: usize,
}

impl ParallelAcsSolver {
    #[inline]
    pub fn new(params: AcsParams, num_colonies: usize) -> Self {
        assert!(num_colonies > 0, "called `ParallelAcsSolver::new` with zero colonies");
        Self { params, num_colonies }
    }
}

impl Solver for ParallelAcsSolver {
    fn name(&self) -> &str {
        "ParallelAcsSolver"
    }

    fn solve(&mut self, puzzle: &Board, limit: Duration) -> SolveOutcome {
        let start = Instant::now();
        let base_seed = self.params.base_seed();
        let set = ColonySet::new(self.params, self.num_colonies, puzzle, base_seed, start, limit);

        std::thread::scope(|scope| {
            for id in 0..self.num_colonies {
                let set = &set;
                scope.spawn(move || set.worker_loop(id, puzzle));
            }
        });

        let mut solution = puzzle.clone();
        let mut best_score = puzzle.fixed_cell_count();
        let mut iterations: u64 = 0;
        for colony in &set.colonies {
            let colony = colony.lock().unwrap();
            if colony.best_sol_score() > best_score {
                solution.clone_from(colony.best_sol());
                best_score = colony.best_sol_score();
            }
            iterations = iterations.max(colony.current_iteration());
        }

        SolveOutcome {
            solved: best_score == puzzle.cell_count(),
            solution,
            elapsed: start.elapsed(),
            iterations,
            communication: set.communication_occurred.load(Ordering::SeqCst),
        }
    }
}
