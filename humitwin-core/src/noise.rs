//! Noise Source Abstraction
//!
//! The sensor model draws one uniform sample per reading. Where that sample
//! comes from is injected so the same model runs on a seeded generator in
//! production and on fixed values in tests.
//!
//! ## Common Implementations
//!
//! - `RngNoise`: any `rand` generator (requires the `rand` feature)
//! - `FixedNoise`: always the same draw
//! - `SequenceNoise`: cycles through a fixed list of draws

/// Source of uniform noise draws
///
/// ## Implementation Requirements
///
/// - `uniform(bound)` returns a value in `[-bound, +bound]`
/// - A zero or non-finite bound must return zero
/// - Implementations own their state; one source per sensor
pub trait NoiseSource {
    /// Draw a value uniformly from `[-bound, +bound]`
    fn uniform(&mut self, bound: f64) -> f64;
}

impl<N: NoiseSource + ?Sized> NoiseSource for &mut N {
    fn uniform(&mut self, bound: f64) -> f64 {
        (**self).uniform(bound)
    }
}

/// Noise drawn from a `rand` generator
#[cfg(feature = "rand")]
#[derive(Debug, Clone)]
pub struct RngNoise<R = rand::rngs::StdRng> {
    rng: R,
}

#[cfg(feature = "rand")]
impl<R: rand::RngCore> RngNoise<R> {
    /// Wrap an existing generator
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Give back the wrapped generator
    pub fn into_inner(self) -> R {
        self.rng
    }
}

#[cfg(feature = "rand")]
impl RngNoise<rand::rngs::StdRng> {
    /// Reproducible noise from a fixed seed
    pub fn seeded(seed: u64) -> Self {
        use rand::SeedableRng;
        Self::new(rand::rngs::StdRng::seed_from_u64(seed))
    }

    /// Noise seeded from the operating system
    #[cfg(feature = "std")]
    pub fn from_entropy() -> Self {
        use rand::SeedableRng;
        Self::new(rand::rngs::StdRng::from_entropy())
    }
}

#[cfg(feature = "rand")]
impl<R: rand::RngCore> NoiseSource for RngNoise<R> {
    fn uniform(&mut self, bound: f64) -> f64 {
        use rand::Rng;

        let bound = usable_bound(bound);
        if bound == 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-bound..=bound)
    }
}

/// Magnitude of `bound`, or zero when it is NaN or infinite
fn usable_bound(bound: f64) -> f64 {
    if bound.is_finite() {
        bound.abs()
    } else {
        0.0
    }
}

/// Noise that always returns the same fraction of the bound
///
/// `FixedNoise::new(0.5)` draws `+bound/2` every time. The fraction is
/// clamped to [-1, 1] so draws stay inside the bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedNoise {
    fraction: f64,
}

impl FixedNoise {
    /// Create from a fraction of the bound in [-1, 1]
    pub fn new(fraction: f64) -> Self {
        Self {
            fraction: fraction.clamp(-1.0, 1.0),
        }
    }

    /// Noise-free source
    pub fn zero() -> Self {
        Self::new(0.0)
    }
}

impl NoiseSource for FixedNoise {
    fn uniform(&mut self, bound: f64) -> f64 {
        self.fraction * usable_bound(bound)
    }
}

/// Noise that cycles through a fixed list of fractions of the bound
#[derive(Debug, Clone)]
pub struct SequenceNoise<const N: usize> {
    fractions: [f64; N],
    index: usize,
}

impl<const N: usize> SequenceNoise<N> {
    /// Create from fractions of the bound; each is clamped to [-1, 1]
    pub fn new(fractions: [f64; N]) -> Self {
        Self {
            fractions: fractions.map(|f| f.clamp(-1.0, 1.0)),
            index: 0,
        }
    }
}

impl<const N: usize> NoiseSource for SequenceNoise<N> {
    fn uniform(&mut self, bound: f64) -> f64 {
        let Some(&fraction) = self.fractions.get(self.index) else {
            return 0.0;
        };
        self.index = (self.index + 1) % self.fractions.len();
        fraction * usable_bound(bound)
    }
}
