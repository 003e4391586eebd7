//! SIMD slot packing.
//!
//! Because p ≡ 1 (mod 2d), X^d + 1 splits into d linear factors mod p and
//! R_p ≅ Z_p^d. A vector of slot values is packed into one plaintext
//! polynomial with the inverse NTT mod p; addition and multiplication of
//! plaintext polynomials then act slot-wise. This is what lets the circuit
//! scale the variant slots and the contributor-count slot differently with a
//! single plaintext multiplication.

use crate::math::{ModQ, NttContext, Poly};
use crate::params::FheParams;

/// Packs `[u64]` slot vectors into R_p and back.
#[derive(Clone, Debug)]
pub struct SlotEncoder {
    ntt_p: NttContext,
    p: u64,
    q: u64,
}

impl SlotEncoder {
    /// Parameters must already have passed [`FheParams::validate`].
    pub fn new(params: &FheParams) -> Self {
        Self {
            ntt_p: NttContext::new(params.ring_dim, params.p),
            p: params.p,
            q: params.q,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.ntt_p.dimension()
    }

    /// Pack slot values (padded with zeros) into a polynomial mod p.
    ///
    /// # Panics
    ///
    /// Panics if more values than slots are supplied.
    pub fn encode(&self, slots: &[u64]) -> Poly {
        assert!(
            slots.len() <= self.slot_count(),
            "{} values exceed {} slots",
            slots.len(),
            self.slot_count()
        );
        let mut values = vec![0u64; self.slot_count()];
        for (v, &s) in values.iter_mut().zip(slots) {
            *v = s % self.p;
        }
        self.ntt_p.inverse(&mut values);
        Poly::from_coeffs(values, self.p)
    }

    /// Unpack a polynomial mod p into its slot values.
    pub fn decode(&self, plain: &Poly) -> Vec<u64> {
        assert_eq!(plain.modulus(), self.p, "plaintext must be reduced mod p");
        let mut values = plain.coeffs().to_vec();
        self.ntt_p.forward(&mut values);
        values
    }

    /// Embed a plaintext polynomial mod p into R_q through centered lifts.
    pub fn lift(&self, plain: &Poly) -> Poly {
        let coeffs = plain
            .coeffs()
            .iter()
            .map(|&c| ModQ::lift_centered(c, self.p, self.q))
            .collect();
        Poly::from_coeffs(coeffs, self.q)
    }

    /// `encode` followed by `lift`.
    pub fn encode_lifted(&self, slots: &[u64]) -> Poly {
        self.lift(&self.encode(slots))
    }
}
