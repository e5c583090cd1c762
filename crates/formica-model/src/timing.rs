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

//! # Propagation Timing
//!
//! Process-wide counters for the cost of constraint propagation, split into
//! two phases: the reduction performed while a board is constructed from a
//! puzzle ("initial"), and the reductions performed by ants while they build
//! candidate solutions ("ant"). The split supports a cost/benefit view of
//! how much wall time logical deduction consumes relative to the stochastic
//! search around it.
//!
//! The accumulators are atomics because every colony worker records into
//! them concurrently. The phase flag is flipped only by board construction,
//! which happens before any worker exists.

use formica_core::atomic::AtomicF32;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

static INITIAL_CP_TIME: AtomicF32 = AtomicF32::new(0.0);
static ANT_CP_TIME: AtomicF32 = AtomicF32::new(0.0);
static CP_CALLS: AtomicUsize = AtomicUsize::new(0);
static IN_INITIAL_PHASE: AtomicBool = AtomicBool::new(false);

/// Clears all counters and leaves the initial phase.
pub fn reset() {
    INITIAL_CP_TIME.store(0.0);
    ANT_CP_TIME.store(0.0);
    CP_CALLS.store(0, Ordering::Relaxed);
    IN_INITIAL_PHASE.store(false, Ordering::Relaxed);
}

/// Enters the initial phase; subsequent rule time is credited to
/// [`initial_cp_time`].
pub fn begin_initial() {
    IN_INITIAL_PHASE.store(true, Ordering::Relaxed);
}

/// Leaves the initial phase; subsequent rule time is credited to
/// [`ant_cp_time`].
pub fn end_initial() {
    IN_INITIAL_PHASE.store(false, Ordering::Relaxed);
}

/// Seconds spent in propagation rules during board construction.
pub fn initial_cp_time() -> f32 {
    INITIAL_CP_TIME.load()
}

/// Seconds spent in propagation rules during ant construction, summed over
/// all workers.
pub fn ant_cp_time() -> f32 {
    ANT_CP_TIME.load()
}

/// Number of cell fixations performed outside the initial phase.
pub fn cp_call_count() -> usize {
    CP_CALLS.load(Ordering::Relaxed)
}

/// Credits the elapsed time since `start` to the current phase.
pub(crate) fn record_rule_time(start: Instant) {
    let elapsed = start.elapsed().as_secs_f32();
    if IN_INITIAL_PHASE.load(Ordering::Relaxed) {
        INITIAL_CP_TIME.add(elapsed);
    } else {
        ANT_CP_TIME.add(elapsed);
    }
}

/// Counts one cell fixation when outside the initial phase.
pub(crate) fn count_propagation_call() {
    if !IN_INITIAL_PHASE.load(Ordering::Relaxed) {
        CP_CALLS.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    // The counters are process-wide and other tests may record into them
    // concurrently, so these assertions rely only on monotonicity.

    #[test]
    fn test_record_rule_time_accumulates() {
        let before = initial_cp_time() + ant_cp_time();
        record_rule_time(Instant::now());
        let after = initial_cp_time() + ant_cp_time();
        assert!(after >= before);
    }

    #[test]
    fn test_call_count_is_monotone() {
        let before = cp_call_count();
        count_propagation_call();
        assert!(cp_call_count() >= before);
    }
}
