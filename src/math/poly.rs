//! Polynomials over R_q = Z_q[X]/(X^d + 1).
//!
//! Coefficient-domain storage; multiplication goes through an
//! [`NttContext`] built for the same dimension and modulus.
//!
//! # Example
//!
//! ```
//! use secure_genomics::math::{NttContext, Poly, DEFAULT_Q};
//!
//! let ctx = NttContext::new(256, DEFAULT_Q);
//! let a = Poly::constant(3, 256, DEFAULT_Q);
//! let b = Poly::constant(5, 256, DEFAULT_Q);
//! assert_eq!(a.mul_ntt(&b, &ctx).coeff(0), 15);
//! ```

use std::ops::{Add, AddAssign, Neg, Sub};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::gaussian::GaussianSampler;
use super::modular::ModQ;
use super::ntt::NttContext;

/// Polynomial in R_q with coefficients in `[0, q)`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poly {
    coeffs: Vec<u64>,
    q: u64,
}

impl Poly {
    /// Zero polynomial
    pub fn zero(dim: usize, q: u64) -> Self {
        Self {
            coeffs: vec![0; dim],
            q,
        }
    }

    /// Polynomial from coefficients, reduced modulo q
    pub fn from_coeffs(mut coeffs: Vec<u64>, q: u64) -> Self {
        for c in &mut coeffs {
            *c %= q;
        }
        Self { coeffs, q }
    }

    /// Constant polynomial
    pub fn constant(value: u64, dim: usize, q: u64) -> Self {
        let mut p = Self::zero(dim, q);
        p.coeffs[0] = value % q;
        p
    }

    /// Uniformly random polynomial
    pub fn random_with_rng<R: Rng>(dim: usize, q: u64, rng: &mut R) -> Self {
        let coeffs = (0..dim).map(|_| rng.gen_range(0..q)).collect();
        Self { coeffs, q }
    }

    /// Polynomial with discrete Gaussian coefficients
    pub fn sample_gaussian(dim: usize, q: u64, sampler: &mut GaussianSampler) -> Self {
        Self {
            coeffs: sampler.sample_vec_centered(dim, q),
            q,
        }
    }

    pub fn dimension(&self) -> usize {
        self.coeffs.len()
    }

    pub fn modulus(&self) -> u64 {
        self.q
    }

    pub fn coeff(&self, i: usize) -> u64 {
        self.coeffs[i]
    }

    pub fn coeffs(&self) -> &[u64] {
        &self.coeffs
    }

    /// True for an element of Z_q[X]/(X^dim + 1) with every coefficient below q.
    pub fn in_ring(&self, dim: usize, q: u64) -> bool {
        self.q == q && self.coeffs.len() == dim && self.coeffs.iter().all(|&c| c < q)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|&c| c == 0)
    }

    /// Multiply every coefficient by `scalar`
    pub fn scalar_mul(&self, scalar: u64) -> Self {
        let scalar = scalar % self.q;
        let coeffs = self
            .coeffs
            .iter()
            .map(|&c| ModQ::mul(c, scalar, self.q))
            .collect();
        Self { coeffs, q: self.q }
    }

    /// Negacyclic product via NTT
    pub fn mul_ntt(&self, other: &Self, ctx: &NttContext) -> Self {
        assert_eq!(self.q, other.q, "Moduli must match");
        assert_eq!(self.q, ctx.modulus(), "NTT context modulus mismatch");
        assert_eq!(
            self.coeffs.len(),
            other.coeffs.len(),
            "Dimensions must match"
        );

        let mut a = self.coeffs.clone();
        let mut b = other.coeffs.clone();
        ctx.forward(&mut a);
        ctx.forward(&mut b);

        let mut out = vec![0u64; a.len()];
        ctx.pointwise_mul(&a, &b, &mut out);
        ctx.inverse(&mut out);

        Self {
            coeffs: out,
            q: self.q,
        }
    }

    /// Largest coefficient in centered representation
    pub fn linf_norm(&self) -> u64 {
        self.coeffs
            .iter()
            .map(|&c| if c <= self.q / 2 { c } else { self.q - c })
            .max()
            .unwrap_or(0)
    }
}

impl Add for &Poly {
    type Output = Poly;

    fn add(self, rhs: Self) -> Poly {
        assert_eq!(self.q, rhs.q, "Moduli must match");
        assert_eq!(self.coeffs.len(), rhs.coeffs.len(), "Dimensions must match");
        let coeffs = self
            .coeffs
            .iter()
            .zip(&rhs.coeffs)
            .map(|(&a, &b)| ModQ::add(a, b, self.q))
            .collect();
        Poly { coeffs, q: self.q }
    }
}

impl Add for Poly {
    type Output = Poly;

    fn add(self, rhs: Self) -> Poly {
        &self + &rhs
    }
}

impl AddAssign<&Poly> for Poly {
    fn add_assign(&mut self, rhs: &Poly) {
        assert_eq!(self.q, rhs.q, "Moduli must match");
        assert_eq!(self.coeffs.len(), rhs.coeffs.len(), "Dimensions must match");
        for (a, &b) in self.coeffs.iter_mut().zip(&rhs.coeffs) {
            *a = ModQ::add(*a, b, self.q);
        }
    }
}

impl Sub for &Poly {
    type Output = Poly;

    fn sub(self, rhs: Self) -> Poly {
        assert_eq!(self.q, rhs.q, "Moduli must match");
        assert_eq!(self.coeffs.len(), rhs.coeffs.len(), "Dimensions must match");
        let coeffs = self
            .coeffs
            .iter()
            .zip(&rhs.coeffs)
            .map(|(&a, &b)| ModQ::sub(a, b, self.q))
            .collect();
        Poly { coeffs, q: self.q }
    }
}

impl Neg for &Poly {
    type Output = Poly;

    fn neg(self) -> Poly {
        let coeffs = self.coeffs.iter().map(|&c| ModQ::negate(c, self.q)).collect();
        Poly { coeffs, q: self.q }
    }
}

impl Neg for Poly {
    type Output = Poly;

    fn neg(self) -> Poly {
        -&self
    }
}
