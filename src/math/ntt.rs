//! Negacyclic Number-Theoretic Transform over Z_q[X]/(X^n + 1).
//!
//! Cooley-Tukey forward and Gentleman-Sande inverse butterflies with twiddle
//! factors stored in bit-reversed order. The forward transform evaluates a
//! polynomial at the odd powers of a primitive 2n-th root of unity ψ, so
//! pointwise products in the evaluation domain are products in the ring.
//!
//! The same context type serves two roles in this crate: multiplication of
//! ciphertext polynomials modulo q, and SIMD slot packing modulo the
//! plaintext prime p (see [`crate::rlwe::SlotEncoder`]).
//!
//! # Example
//!
//! ```
//! use secure_genomics::math::NttContext;
//!
//! let ctx = NttContext::new(16, 65537);
//! let mut coeffs: Vec<u64> = (0..16).collect();
//! let original = coeffs.clone();
//! ctx.forward(&mut coeffs);
//! ctx.inverse(&mut coeffs);
//! assert_eq!(coeffs, original);
//! ```

use super::modular::ModQ;

/// Precomputed NTT tables for one (dimension, modulus) pair.
#[derive(Clone, Debug)]
pub struct NttContext {
    n: usize,
    q: u64,
    /// ψ^bitrev(i)
    psi_rev: Vec<u64>,
    /// ψ^(-bitrev(i))
    psi_inv_rev: Vec<u64>,
    n_inv: u64,
}

impl NttContext {
    /// Build tables for dimension `n` and prime modulus `q`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is not a power of two or `q ≢ 1 (mod 2n)`. Callers
    /// validate parameters first (see [`crate::params::FheParams::validate`]).
    pub fn new(n: usize, q: u64) -> Self {
        assert!(n.is_power_of_two(), "n must be a power of two");
        assert!(q % (2 * n as u64) == 1, "q must be ≡ 1 (mod 2n)");

        let psi = Self::find_primitive_root(2 * n as u64, q);
        let psi_inv = ModQ::pow(psi, q - 2, q);
        let log_n = n.trailing_zeros();

        let mut psi_rev = vec![0u64; n];
        let mut psi_inv_rev = vec![0u64; n];
        let mut pow = 1u64;
        let mut pow_inv = 1u64;
        for i in 0..n {
            let r = bit_reverse(i, log_n);
            psi_rev[r] = pow;
            psi_inv_rev[r] = pow_inv;
            pow = ModQ::mul(pow, psi, q);
            pow_inv = ModQ::mul(pow_inv, psi_inv, q);
        }

        Self {
            n,
            q,
            psi_rev,
            psi_inv_rev,
            n_inv: ModQ::pow(n as u64, q - 2, q),
        }
    }

    /// Ring dimension.
    pub fn dimension(&self) -> usize {
        self.n
    }

    /// Modulus.
    pub fn modulus(&self) -> u64 {
        self.q
    }

    /// Coefficients → evaluations, in place.
    pub fn forward(&self, a: &mut [u64]) {
        assert_eq!(a.len(), self.n, "Input length must match dimension");
        let q = self.q;
        let mut t = self.n;
        let mut m = 1;
        while m < self.n {
            t >>= 1;
            for i in 0..m {
                let j1 = 2 * i * t;
                let s = self.psi_rev[m + i];
                for j in j1..j1 + t {
                    let u = a[j];
                    let v = ModQ::mul(a[j + t], s, q);
                    a[j] = ModQ::add(u, v, q);
                    a[j + t] = ModQ::sub(u, v, q);
                }
            }
            m <<= 1;
        }
    }

    /// Evaluations → coefficients, in place.
    pub fn inverse(&self, a: &mut [u64]) {
        assert_eq!(a.len(), self.n, "Input length must match dimension");
        let q = self.q;
        let mut t = 1;
        let mut m = self.n;
        while m > 1 {
            let h = m >> 1;
            let mut j1 = 0;
            for i in 0..h {
                let s = self.psi_inv_rev[h + i];
                for j in j1..j1 + t {
                    let u = a[j];
                    let v = a[j + t];
                    a[j] = ModQ::add(u, v, q);
                    a[j + t] = ModQ::mul(ModQ::sub(u, v, q), s, q);
                }
                j1 += 2 * t;
            }
            t <<= 1;
            m = h;
        }
        for c in a.iter_mut() {
            *c = ModQ::mul(*c, self.n_inv, q);
        }
    }

    /// Pointwise product of two evaluation vectors.
    pub fn pointwise_mul(&self, a: &[u64], b: &[u64], out: &mut [u64]) {
        assert_eq!(a.len(), self.n);
        assert_eq!(b.len(), self.n);
        assert_eq!(out.len(), self.n);
        for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
            *o = ModQ::mul(x, y, self.q);
        }
    }

    /// Smallest-generator search for ψ with ψ^(order/2) = -1.
    fn find_primitive_root(order: u64, q: u64) -> u64 {
        let exp = (q - 1) / order;
        for g in 2..q {
            let candidate = ModQ::pow(g, exp, q);
            if ModQ::pow(candidate, order / 2, q) == q - 1 {
                return candidate;
            }
        }
        panic!("no primitive {}-th root of unity modulo {}", order, q);
    }
}

fn bit_reverse(x: usize, bits: u32) -> usize {
    if bits == 0 {
        return 0;
    }
    x.reverse_bits() >> (usize::BITS - bits)
}
