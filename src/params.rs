//! Encryption parameter sets.
//!
//! Ring dimension and ciphertext modulus follow the 128-bit RLWE settings
//! validated via lattice-estimator for q ≈ 2^60.

use serde::{Deserialize, Serialize};

use crate::error::{GenomicsError, Result};
use crate::math::gaussian::DEFAULT_SIGMA;
use crate::math::{DEFAULT_P, DEFAULT_Q};

/// Security level for parameter selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityLevel {
    /// 128-bit security (recommended)
    Bits128,
    /// 256-bit security (conservative)
    Bits256,
}

/// Parameters of the batched RLWE scheme shared by every party in a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FheParams {
    /// Ring dimension d (power of two); also the number of plaintext slots
    pub ring_dim: usize,

    /// Ciphertext modulus q, NTT-friendly: q ≡ 1 (mod 2d) and q ≡ 1 (mod p)
    pub q: u64,

    /// Plaintext modulus p, prime with p ≡ 1 (mod 2d) so slots exist
    pub p: u64,

    /// Standard deviation for Gaussian key and error sampling
    pub sigma: f64,

    /// Target security level
    pub security_level: SecurityLevel,
}

impl FheParams {
    /// 128-bit secure parameters for d=2048
    pub fn secure_128_d2048() -> Self {
        Self {
            ring_dim: 2048,
            q: DEFAULT_Q,
            p: DEFAULT_P,
            sigma: DEFAULT_SIGMA,
            security_level: SecurityLevel::Bits128,
        }
    }

    /// 128-bit secure parameters for d=4096 (more noise margin)
    pub fn secure_128_d4096() -> Self {
        Self {
            ring_dim: 4096,
            ..Self::secure_128_d2048()
        }
    }

    /// Scaling factor Δ = ⌊q/p⌋
    pub fn delta(&self) -> u64 {
        self.q / self.p
    }

    /// Number of plaintext slots per ciphertext
    pub fn slot_count(&self) -> usize {
        self.ring_dim
    }

    /// Largest contributor count K for which 1/(2K) has a faithful
    /// representation mod p (every allele sum must stay below p).
    pub fn max_contributors(&self) -> u64 {
        (self.p - 1) / 2
    }

    /// Check if parameters are valid
    pub fn validate(&self) -> Result<()> {
        if !self.ring_dim.is_power_of_two() || self.ring_dim < 2 {
            return Err(GenomicsError::InvalidParameters(format!(
                "ring_dim must be a power of two, got {}",
                self.ring_dim
            )));
        }
        let two_d = 2 * self.ring_dim as u64;
        if self.q % two_d != 1 {
            return Err(GenomicsError::InvalidParameters(
                "q must be ≡ 1 (mod 2d) for NTT".into(),
            ));
        }
        if self.p % two_d != 1 {
            return Err(GenomicsError::InvalidParameters(
                "p must be ≡ 1 (mod 2d) for slot packing".into(),
            ));
        }
        if self.q % self.p != 1 {
            return Err(GenomicsError::InvalidParameters(
                "q must be ≡ 1 (mod p) to bound plaintext multiplication noise".into(),
            ));
        }
        if self.q <= self.p || self.q >= 1 << 63 {
            return Err(GenomicsError::InvalidParameters(
                "q must satisfy p < q < 2^63".into(),
            ));
        }
        if !(self.sigma > 0.0) {
            return Err(GenomicsError::InvalidParameters(
                "sigma must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for FheParams {
    fn default() -> Self {
        Self::secure_128_d2048()
    }
}
