//! Discrete Gaussian sampling for RLWE error and key polynomials.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Default Gaussian standard deviation
pub const DEFAULT_SIGMA: f64 = 3.2;

/// Discrete Gaussian sampler over Z using rejection sampling
#[derive(Clone)]
pub struct GaussianSampler {
    sigma: f64,
    /// Samples beyond this bound are never produced
    tailcut: i64,
    rng: ChaCha20Rng,
}

impl GaussianSampler {
    /// Sampler seeded from OS entropy
    pub fn new(sigma: f64) -> Self {
        Self::from_rng(sigma, ChaCha20Rng::from_entropy())
    }

    /// Deterministic sampler, for tests and reproducible simulations
    pub fn with_seed(sigma: f64, seed: u64) -> Self {
        Self::from_rng(sigma, ChaCha20Rng::seed_from_u64(seed))
    }

    fn from_rng(sigma: f64, rng: ChaCha20Rng) -> Self {
        Self {
            sigma,
            tailcut: (sigma * 6.0).ceil() as i64,
            rng,
        }
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Access the underlying RNG for uniform sampling alongside Gaussian draws
    pub fn rng(&mut self) -> &mut ChaCha20Rng {
        &mut self.rng
    }

    /// Sample a single value from D_σ
    pub fn sample(&mut self) -> i64 {
        let two_sigma_sq = 2.0 * self.sigma * self.sigma;
        loop {
            let x = self.rng.gen_range(-self.tailcut..=self.tailcut);
            let prob = (-((x * x) as f64) / two_sigma_sq).exp();
            let u: f64 = self.rng.gen();
            if u < prob {
                return x;
            }
        }
    }

    /// Sample `len` values embedded in Z_q
    pub fn sample_vec_centered(&mut self, len: usize, q: u64) -> Vec<u64> {
        (0..len)
            .map(|_| {
                let s = self.sample();
                if s >= 0 {
                    s as u64 % q
                } else {
                    q - (s.unsigned_abs() % q)
                }
            })
            .collect()
    }
}

impl std::fmt::Debug for GaussianSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GaussianSampler")
            .field("sigma", &self.sigma)
            .field("tailcut", &self.tailcut)
            .finish()
    }
}
