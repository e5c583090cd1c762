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

//! Tuning parameters shared by the colony engines. All values are fixed at
//! construction; the per-puzzle base pheromone level (`1 / num_cells`) is
//! derived when a colony is initialized, not stored here.

/// Parameters of an ant colony run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcsParams {
    /// Ants per colony.
    pub num_ants: usize,
    /// Probability of taking the argmax candidate outright
    /// (pseudo-random-proportional rule).
    pub q0: f32,
    /// Evaporation rate of the global and communication updates.
    pub rho: f32,
    /// Per-iteration decay of the best-solution pheromone level.
    pub best_evap: f32,
    /// Base RNG seed. `None` draws a fresh seed per run; colonies offset
    /// the base by their index so parallel colonies stay diverse.
    pub seed: Option<u64>,
}

impl Default for AcsParams {
    #[inline]
    fn default() -> Self {
        Self {
            num_ants: 10,
            q0: 0.9,
            rho: 0.9,
            best_evap: 0.005,
            seed: None,
        }
    }
}

impl AcsParams {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_num_ants(mut self, num_ants: usize) -> Self {
        self.num_ants = num_ants;
        self
    }

    #[inline]
    pub fn with_q0(mut self, q0: f32) -> Self {
        self.q0 = q0;
        self
    }

    #[inline]
    pub fn with_rho(mut self, rho: f32) -> Self {
        self.rho = rho;
        self
    }

    #[inline]
    pub fn with_best_evap(mut self, best_evap: f32) -> Self {
        self.best_evap = best_evap;
        self
    }

    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The seed actually used for a run: the configured one, or fresh
    /// entropy.
    #[inline]
    pub(crate) fn base_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

impl std::fmt::Display for AcsParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AcsParams(ants: {}, q0: {}, rho: {}, best_evap: {})",
            self.num_ants, self.q0, self.rho, self.best_evap
        )
    }
}

#[cfg(test)]
mod tests {
    use super::AcsParams;

    #[test]
    fn test_defaults() {
        let p = AcsParams::default();
        assert_eq!(p.num_ants, 10);
        assert_eq!(p.q0, 0.9);
        assert_eq!(p.rho, 0.9);
        assert_eq!(p.best_evap, 0.005);
        assert!(p.seed.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let p = AcsParams::new()
            .with_num_ants(4)
            .with_q0(0.5)
            .with_rho(0.8)
            .with_best_evap(0.01)
            .with_seed(42);
        assert_eq!(p.num_ants, 4);
        assert_eq!(p.q0, 0.5);
        assert_eq!(p.rho, 0.8);
        assert_eq!(p.best_evap, 0.01);
        assert_eq!(p.base_seed(), 42);
    }
}
