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

//! # Pheromone Matrix
//!
//! The weight `τ[i][j]` biasing digit `j` (0-based bit position) at cell
//! `i`. Stored as one flat row-major `f32` vector for cache locality; the
//! mixing rules never push a weight below zero.
//!
//! Two update rules operate on single entries:
//!
//! - the **local** rule, applied by ants as they place digits, nudges the
//!   entry toward the base level `τ₀` with fixed 0.9/0.1 mixing, eroding
//!   heavily used choices to keep exploration alive;
//! - the **reinforce** rule, `τ ← (1−ρ)·τ + ρ·amount`, applied by the
//!   global and communication updates.

/// A dense `num_cells × num_units` pheromone matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneMatrix {
    values: Vec<f32>,
    num_units: usize,
    tau0: f32,
}

impl PheromoneMatrix {
    /// Creates a matrix with every entry at the base level `tau0`.
    pub fn new(num_cells: usize, num_units: usize, tau0: f32) -> Self {
        Self {
            values: vec![tau0; num_cells * num_units],
            num_units,
            tau0,
        }
    }

    /// The base pheromone level `τ₀`.
    #[inline]
    pub fn tau0(&self) -> f32 {
        self.tau0
    }

    /// The weight of digit `j` at cell `i`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.values[i * self.num_units + j]
    }

    /// Local ACS update: pulls the entry toward `τ₀`.
    #[inline]
    pub fn local_update(&mut self, i: usize, j: usize) {
        let v = &mut self.values[i * self.num_units + j];
        *v = *v * 0.9 + self.tau0 * 0.1;
    }

    /// Evaporate-and-deposit update on one entry.
    #[inline]
    pub fn reinforce(&mut self, i: usize, j: usize, rho: f32, amount: f32) {
        let v = &mut self.values[i * self.num_units + j];
        *v = *v * (1.0 - rho) + rho * amount;
    }
}
