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

//! # Formica Core
//!
//! Foundational primitives for the Formica sudoku solving ecosystem. This
//! crate consolidates the small, reusable building blocks that underpin the
//! higher-level model and solver crates.
//!
//! ## Modules
//!
//! - `set`: `ValueSet`, a `Copy` bitset over the digit universe `1..=N`
//!   (N ≤ 64) with full set algebra via operator overloads.
//! - `atomic`: `AtomicF32`, a compare-and-swap accumulator over `f32` bit
//!   patterns used by the process-wide propagation timing counters.
//!
//! These primitives sit on the hottest paths of the solvers, so they favor
//! plain machine words and branch-free operations over abstraction.

pub mod atomic;
pub mod set;
