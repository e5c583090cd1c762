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

//! # Formica Model
//!
//! The sudoku problem domain: the [`board::Board`] grid of candidate sets,
//! puzzle parsing for the inline and file formats, the logical reduction
//! engine in [`propagation`], and the process-wide propagation timing
//! counters in [`timing`].
//!
//! Boards of order `k ∈ 3..=8` (9×9 up to 64×64) are supported. A board is a
//! flat vector of [`formica_core::set::ValueSet`] candidate sets together
//! with fixed/infeasible counters that the propagation engine maintains
//! incrementally.

pub mod board;
pub mod loading;
pub mod propagation;
pub mod timing;
