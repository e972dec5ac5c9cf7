// Import the random number generator trait from the rand crate
use rand::Rng;
// Exp1 is the unit-rate exponential, which is exactly Gamma(shape = 1, scale = 1)
use rand_distr::Exp1;
// Import serialization traits so probabilities can travel inside a Genome
use serde::{Deserialize, Serialize};

use crate::error::{GenomeError, Result};

/// A source of randomness for the genetic operators
///
/// Every operator on a [`Genome`](crate::Genome) draws through this trait instead of
/// a global generator. That lets tests plug in a seeded or scripted source, and
/// lets each worker thread own its own generator.
///
/// **Rust Concept: Blanket implementations**
/// Any type that implements `rand::Rng` (thread_rng, StdRng, SmallRng, ...)
/// is automatically an `EntropySource` - see the `impl<R: Rng>` block below.
pub trait EntropySource {
    /// Uniform float in `[0, 1)`
    fn uniform(&mut self) -> f64;

    /// One sample from Gamma(shape = 1.0, scale = 1.0)
    fn unit_gamma(&mut self) -> f64;

    /// Uniform integer in `[0, n)`
    ///
    /// `n` must be non-zero.
    fn below(&mut self, n: u32) -> u32 {
        // uniform() < 1.0, so the product is strictly below n
        ((self.uniform() * f64::from(n)) as u32).min(n - 1)
    }
}

impl<R: Rng> EntropySource for R {
    fn uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn unit_gamma(&mut self) -> f64 {
        self.sample(Exp1)
    }

    fn below(&mut self, n: u32) -> u32 {
        self.gen_range(0..n)
    }
}

/// A probability known to lie within `[0, 1]`
///
/// **Why a newtype?**
/// Out-of-range probabilities are a driver bug. Checking once when the value is
/// built means [`bool_prob`] itself can never be handed garbage.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Probability(f64);

impl Probability {
    /// Never fires
    pub const NEVER: Probability = Probability(0.0);
    /// Fair coin flip
    pub const HALF: Probability = Probability(0.5);
    /// Always fires
    pub const ALWAYS: Probability = Probability(1.0);
    /// Per-field mutation chance a fresh genome starts with
    pub const DEFAULT_MUTATION_CHANCE: Probability = Probability(0.02);

    /// Validate a raw probability
    ///
    /// Rejects NaN and anything outside `0.0..=1.0`. No clamping.
    pub fn new(value: f64) -> Result<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(GenomeError::InvalidProbability(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Probability {
    type Error = GenomeError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Probability> for f64 {
    fn from(p: Probability) -> f64 {
        p.0
    }
}

/// Bernoulli gate: true with probability `prob`
///
/// `uniform()` lies in `[0, 1)`, so `prob = 0` is always false and
/// `prob = 1` is always true.
pub fn bool_prob<E: EntropySource + ?Sized>(source: &mut E, prob: Probability) -> bool {
    source.uniform() < prob.value()
}

/// Draw a signed mutation step
///
/// The magnitude is a Gamma(1, 1) sample rounded up, so it is at least 1 and
/// usually small (mean about 1.58) with a long right tail. A separate fair coin
/// picks the sign. The result is never zero.
pub fn mutation_delta<E: EntropySource + ?Sized>(source: &mut E) -> i32 {
    let magnitude = mutation_magnitude(source);
    if bool_prob(source, Probability::HALF) {
        magnitude
    } else {
        -magnitude
    }
}

/// The unsigned half of [`mutation_delta`]: `ceil(Gamma(1, 1))`, at least 1
///
/// Exposed on its own for the histogram driver.
pub fn mutation_magnitude<E: EntropySource + ?Sized>(source: &mut E) -> i32 {
    // `as` saturates, so a freak tail sample cannot overflow
    // max(1.0) covers an exact 0.0 draw, which ceil would leave at zero
    (source.unit_gamma().ceil().max(1.0)) as i32
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    /// Entropy source that replays fixed values, for exact-outcome tests
    pub(crate) struct ScriptedSource {
        uniforms: VecDeque<f64>,
        gammas: VecDeque<f64>,
    }

    impl ScriptedSource {
        pub(crate) fn new(uniforms: &[f64], gammas: &[f64]) -> Self {
            Self {
                uniforms: uniforms.iter().copied().collect(),
                gammas: gammas.iter().copied().collect(),
            }
        }
    }

    impl EntropySource for ScriptedSource {
        fn uniform(&mut self) -> f64 {
            self.uniforms.pop_front().expect("scripted uniforms exhausted")
        }

        fn unit_gamma(&mut self) -> f64 {
            self.gammas.pop_front().expect("scripted gammas exhausted")
        }
    }

    #[test]
    fn test_probability_rejects_out_of_range() {
        assert!(Probability::new(0.0).is_ok());
        assert!(Probability::new(1.0).is_ok());
        assert!(Probability::new(0.02).is_ok());

        assert_eq!(
            Probability::new(1.01),
            Err(GenomeError::InvalidProbability(1.01))
        );
        assert!(Probability::new(-0.1).is_err());
        assert!(Probability::new(f64::NAN).is_err());
        assert!(Probability::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_bool_prob_boundaries() {
        let mut rng = StdRng::seed_from_u64(7);

        // prob = 0 never fires, prob = 1 always fires
        for _ in 0..10_000 {
            assert!(!bool_prob(&mut rng, Probability::NEVER));
            assert!(bool_prob(&mut rng, Probability::ALWAYS));
        }

        // Extreme uniform draws still respect the boundaries
        let mut scripted = ScriptedSource::new(&[0.0, 0.999_999_999], &[]);
        assert!(!bool_prob(&mut scripted, Probability::NEVER));
        assert!(bool_prob(&mut scripted, Probability::ALWAYS));
    }

    #[test]
    fn test_bool_prob_frequency() {
        let mut rng = StdRng::seed_from_u64(11);
        let p = Probability::new(0.3).unwrap();

        let trials = 100_000;
        let hits = (0..trials).filter(|_| bool_prob(&mut rng, p)).count();
        let freq = hits as f64 / trials as f64;

        // Standard deviation is about 0.0015, so this is a very wide margin
        assert!((freq - 0.3).abs() < 0.01, "observed frequency {}", freq);
    }

    #[test]
    fn test_mutation_delta_is_never_zero() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100_000 {
            assert_ne!(mutation_delta(&mut rng), 0);
        }
    }

    #[test]
    fn test_mutation_delta_rounds_up_and_signs() {
        // gamma 2.1 -> magnitude 3; sign coin 0.7 >= 0.5 -> negative
        let mut scripted = ScriptedSource::new(&[0.7], &[2.1]);
        assert_eq!(mutation_delta(&mut scripted), -3);

        // gamma 0.2 -> magnitude 1; sign coin 0.1 < 0.5 -> positive
        let mut scripted = ScriptedSource::new(&[0.1], &[0.2]);
        assert_eq!(mutation_delta(&mut scripted), 1);

        // An exact zero draw still yields a non-zero step
        let mut scripted = ScriptedSource::new(&[0.1], &[0.0]);
        assert_eq!(mutation_delta(&mut scripted), 1);
    }

    #[test]
    fn test_mutation_delta_distribution() {
        let mut rng = StdRng::seed_from_u64(1234);
        let samples = 100_000;

        let mut positive = 0;
        let mut magnitude_sum = 0i64;
        let mut ones = 0;
        for _ in 0..samples {
            let delta = mutation_delta(&mut rng);
            if delta > 0 {
                positive += 1;
            }
            if delta.abs() == 1 {
                ones += 1;
            }
            magnitude_sum += i64::from(delta.abs());
        }

        // Fair sign
        let positive_freq = positive as f64 / samples as f64;
        assert!((positive_freq - 0.5).abs() < 0.01);

        // P(ceil(X) = 1) = 1 - e^-1 ~ 0.632
        let ones_freq = ones as f64 / samples as f64;
        assert!((ones_freq - 0.632).abs() < 0.01, "P(|delta| = 1) = {}", ones_freq);

        // E[ceil(X)] = 1 / (1 - e^-1) ~ 1.582
        let mean = magnitude_sum as f64 / samples as f64;
        assert!((mean - 1.582).abs() < 0.03, "mean magnitude {}", mean);
    }

    #[test]
    fn test_below_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..10_000 {
            assert!(rng.below(16) < 16);
        }

        // The provided method on a non-Rng source
        let mut scripted = ScriptedSource::new(&[0.0, 0.5, 0.999_999_999_9], &[]);
        assert_eq!(scripted.below(128), 0);
        assert_eq!(scripted.below(128), 64);
        assert_eq!(scripted.below(128), 127);
    }

    #[test]
    fn test_probability_serde_validates() {
        let p: Probability = serde_json::from_str("0.25").unwrap();
        assert_eq!(p.value(), 0.25);
        assert_eq!(serde_json::to_string(&p).unwrap(), "0.25");

        assert!(serde_json::from_str::<Probability>("2.0").is_err());
    }
}
