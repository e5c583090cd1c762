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

//! # Atomic f32 Accumulator
//!
//! The standard library has no floating-point atomics, so this type runs a
//! compare-and-swap loop over the `u32` bit pattern of an `f32`. It exists
//! for the propagation timing counters, which are incremented concurrently
//! by every colony worker.
//!
//! All operations use `Ordering::Relaxed`: the counters are additive
//! statistics read after the workers have joined, not synchronization points.

use std::sync::atomic::{AtomicU32, Ordering};

/// An `f32` that supports atomic load, store, and add.
#[derive(Debug)]
pub struct AtomicF32 {
    bits: AtomicU32,
}

impl AtomicF32 {
    /// Creates a new accumulator holding `value`.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self {
            bits: AtomicU32::new(value.to_bits()),
        }
    }

    /// Returns the current value.
    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Replaces the current value.
    #[inline]
    pub fn store(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Adds `delta` to the current value.
    pub fn add(&self, delta: f32) {
        let mut current = self.bits.load(Ordering::Relaxed);
        loop {
            let next = (f32::from_bits(current) + delta).to_bits();
            match self
                .bits
                .compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for AtomicF32 {
    #[inline]
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl std::fmt::Display for AtomicF32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.load())
    }
}

#[cfg(test)]
mod tests {
    use super::AtomicF32;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_load_store() {
        let a = AtomicF32::new(1.5);
        assert_eq!(a.load(), 1.5);
        a.store(-2.25);
        assert_eq!(a.load(), -2.25);
    }

    #[test]
    fn test_add_accumulates() {
        let a = AtomicF32::new(0.0);
        a.add(0.5);
        a.add(0.25);
        assert_eq!(a.load(), 0.75);
    }

    #[test]
    fn test_concurrent_adds_are_not_lost() {
        let a = Arc::new(AtomicF32::new(0.0));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let a = Arc::clone(&a);
            handles.push(thread::spawn(move || {
                for _ in 0..1000 {
                    a.add(1.0);
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        // 8000 fits exactly in an f32 mantissa, so the sum is exact.
        assert_eq!(a.load(), 8000.0);
    }
}
