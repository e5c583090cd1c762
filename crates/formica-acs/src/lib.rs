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

//! # Formica ACS
//!
//! Ant Colony System engines for sudoku. A population of ants builds
//! candidate assignments cell by cell, each choice biased by a pheromone
//! matrix that is reinforced from the best assignments found so far
//! (Dorigo & Gambardella's ACS rules).
//!
//! Two engines are provided:
//!
//! - [`colony::AcsSolver`]: one colony in the calling thread.
//! - [`parallel::ParallelAcsSolver`]: several independent sub-colonies on
//!   dedicated workers, periodically exchanging solutions over a ring
//!   topology (iteration bests) and a freshly shuffled random topology
//!   (best-so-far solutions), each exchange feeding a selective
//!   three-source pheromone update.

pub mod ant;
pub mod colony;
pub mod parallel;
pub mod params;
pub mod pheromone;
pub mod subcolony;
