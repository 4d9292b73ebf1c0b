//! Seeded generator for Monte Carlo workers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Per-worker random source. One instance per worker; never shared.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::rng::PricerRng;
///
/// let mut a = PricerRng::from_seed(12345);
/// let mut b = PricerRng::from_seed(12345);
/// assert_eq!(a.gen_normal(), b.gen_normal());
/// ```
#[derive(Debug, Clone)]
pub struct PricerRng {
    inner: StdRng,
}

impl PricerRng {
    /// Creates a generator whose sequence is fixed by `seed`.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform draw in [0, 1).
    #[inline]
    pub fn gen_uniform(&mut self) -> f64 {
        self.inner.gen()
    }

    /// Standard normal draw (Ziggurat, via `rand_distr::StandardNormal`).
    #[inline]
    pub fn gen_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.inner)
    }
}
