//! RLWE key and ciphertext types.
//!
//! Ring-LWE over R_q = Z_q[X]/(X^d + 1).

use crate::math::Poly;
use serde::{Deserialize, Serialize};

/// RLWE secret key: polynomial in R_q with small coefficients.
///
/// Only the private-context holder ever constructs or deserializes one.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RlweSecretKey {
    /// Secret polynomial in R_q.
    pub poly: Poly,
}

/// RLWE public key: an encryption of zero, (a, b = -a·s + e).
///
/// Lets contributors encrypt without ever holding `s`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RlwePublicKey {
    /// Uniformly random polynomial in R_q.
    pub a: Poly,
    /// b = -a·s + e.
    pub b: Poly,
}

/// RLWE ciphertext: (a, b) ∈ R_q × R_q with b + a·s = Δ·m + e.
///
/// # Example
///
/// ```
/// use secure_genomics::rlwe::RlweCiphertext;
/// use secure_genomics::math::{Poly, DEFAULT_Q};
///
/// let ct = RlweCiphertext::from_parts(Poly::zero(256, DEFAULT_Q), Poly::zero(256, DEFAULT_Q));
/// assert_eq!(ct.ring_dim(), 256);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RlweCiphertext {
    pub a: Poly,
    pub b: Poly,
}

impl RlweSecretKey {
    pub fn from_poly(poly: Poly) -> Self {
        Self { poly }
    }

    pub fn ring_dim(&self) -> usize {
        self.poly.dimension()
    }

    pub fn is_well_formed(&self, ring_dim: usize, q: u64) -> bool {
        self.poly.in_ring(ring_dim, q)
    }
}

impl RlwePublicKey {
    pub fn is_well_formed(&self, ring_dim: usize, q: u64) -> bool {
        self.a.in_ring(ring_dim, q) && self.b.in_ring(ring_dim, q)
    }
}

impl RlweCiphertext {
    /// Creates a ciphertext from component polynomials.
    ///
    /// Debug-asserts that `a` and `b` share dimension and modulus.
    pub fn from_parts(a: Poly, b: Poly) -> Self {
        debug_assert_eq!(
            a.dimension(),
            b.dimension(),
            "Ciphertext polynomials must have same dimension"
        );
        debug_assert_eq!(
            a.modulus(),
            b.modulus(),
            "Ciphertext polynomials must have same modulus"
        );
        Self { a, b }
    }

    pub fn ring_dim(&self) -> usize {
        self.a.dimension()
    }

    pub fn modulus(&self) -> u64 {
        self.a.modulus()
    }

    /// Both components in R_q for `ring_dim` and `q`, coefficients reduced.
    ///
    /// Ring arithmetic panics on mismatched operands, so anything decoded
    /// from untrusted bytes must pass this first.
    pub fn is_well_formed(&self, ring_dim: usize, q: u64) -> bool {
        self.a.in_ring(ring_dim, q) && self.b.in_ring(ring_dim, q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::DEFAULT_Q;

    #[test]
    fn test_ciphertext_shape() {
        let ct = RlweCiphertext::from_parts(Poly::zero(16, DEFAULT_Q), Poly::zero(16, DEFAULT_Q));
        assert!(ct.is_well_formed(16, DEFAULT_Q));
        assert!(!ct.is_well_formed(32, DEFAULT_Q));

        let truncated = RlweCiphertext {
            a: Poly::zero(16, DEFAULT_Q),
            b: Poly::zero(4, DEFAULT_Q),
        };
        assert!(!truncated.is_well_formed(16, DEFAULT_Q));

        let foreign_b = RlweCiphertext {
            a: Poly::zero(16, DEFAULT_Q),
            b: Poly::zero(16, 12289),
        };
        assert!(!foreign_b.is_well_formed(16, DEFAULT_Q));
    }
}
