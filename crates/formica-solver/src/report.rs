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

//! # Propagation Cost Report
//!
//! A snapshot of the process-wide propagation timing counters, shaped for
//! reporting. The ant-phase total is accumulated across every worker, so
//! for the parallel engine the per-worker average divides by the number of
//! sub-colonies.

use formica_model::timing;

/// Aggregated propagation timing for one solver run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpReport {
    /// Seconds spent reducing the puzzle during board construction.
    pub initial: f32,
    /// Seconds spent in propagation during ant construction, summed over
    /// all workers.
    pub ant_total: f32,
    /// Ant-phase seconds averaged per worker.
    pub ant_avg: f32,
    /// Cell fixations performed during ant construction.
    pub calls: usize,
}

impl CpReport {
    /// Reads the timing counters, averaging the ant phase over
    /// `num_workers` parallel workers.
    pub fn gather(num_workers: usize) -> Self {
        let initial = timing::initial_cp_time();
        let ant_total = timing::ant_cp_time();
        Self {
            initial,
            ant_total,
            ant_avg: ant_total / num_workers.max(1) as f32,
            calls: timing::cp_call_count(),
        }
    }

    /// Initial plus ant-phase seconds.
    #[inline]
    pub fn total(&self) -> f32 {
        self.initial + self.ant_total
    }
}

impl std::fmt::Display for CpReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CpReport(initial: {:.6}s, ant: {:.6}s, calls: {})",
            self.initial, self.ant_total, self.calls
        )
    }
}
