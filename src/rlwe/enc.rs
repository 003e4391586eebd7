//! RLWE key generation, public-key encryption and decryption
//!
//! Encryption of a message m under pk = (a, b = -a·s + e):
//! (a·u + e1, b·u + e2 + Δ·m), which decrypts because
//! b' + a'·s = Δ·m + e·u + e2 + e1·s.

use crate::math::{GaussianSampler, ModQ, NttContext, Poly};
use crate::params::FheParams;

use super::types::{RlweCiphertext, RlwePublicKey, RlweSecretKey};

impl RlweSecretKey {
    /// Generate a secret key from the Gaussian distribution
    pub fn generate(params: &FheParams, sampler: &mut GaussianSampler) -> Self {
        let coeffs: Vec<u64> = (0..params.ring_dim)
            .map(|_| ModQ::from_signed(sampler.sample(), params.q))
            .collect();
        Self {
            poly: Poly::from_coeffs(coeffs, params.q),
        }
    }
}

impl RlwePublicKey {
    /// Derive a public key (an encryption of zero) from `sk`
    pub fn generate(
        sk: &RlweSecretKey,
        params: &FheParams,
        sampler: &mut GaussianSampler,
        ctx: &NttContext,
    ) -> Self {
        let a = Poly::random_with_rng(params.ring_dim, params.q, sampler.rng());
        let e = Poly::sample_gaussian(params.ring_dim, params.q, sampler);
        let b = &(-a.mul_ntt(&sk.poly, ctx)) + &e;
        Self { a, b }
    }

    pub fn ring_dim(&self) -> usize {
        self.a.dimension()
    }
}

impl RlweCiphertext {
    /// Encrypt a message polynomial under a public key
    ///
    /// # Arguments
    /// * `pk` - Public key
    /// * `message` - Message polynomial embedded in R_q
    /// * `delta` - Scaling factor Δ = ⌊q/p⌋
    /// * `sampler` - Source of the ephemeral u, e1, e2
    /// * `ctx` - NTT context for R_q
    pub fn encrypt_public(
        pk: &RlwePublicKey,
        message: &Poly,
        delta: u64,
        sampler: &mut GaussianSampler,
        ctx: &NttContext,
    ) -> Self {
        let d = pk.ring_dim();
        let q = pk.a.modulus();

        let u = Poly::sample_gaussian(d, q, sampler);
        let e1 = Poly::sample_gaussian(d, q, sampler);
        let e2 = Poly::sample_gaussian(d, q, sampler);

        let a = &pk.a.mul_ntt(&u, ctx) + &e1;
        let b = &(&pk.b.mul_ntt(&u, ctx) + &e2) + &message.scalar_mul(delta);

        Self { a, b }
    }

    /// Decrypt to the message polynomial mod p
    ///
    /// Computes m = ⌊(b + a·s) / Δ⌉ mod p
    pub fn decrypt(&self, sk: &RlweSecretKey, delta: u64, p: u64, ctx: &NttContext) -> Poly {
        let noisy = &self.b + &self.a.mul_ntt(&sk.poly, ctx);
        let half_delta = delta / 2;

        let coeffs = noisy
            .coeffs()
            .iter()
            .map(|&val| {
                let rounded = ((val as u128 + half_delta as u128) / delta as u128) as u64;
                rounded % p
            })
            .collect();

        Poly::from_coeffs(coeffs, p)
    }

    /// Homomorphic addition: decrypts to m1 + m2
    pub fn add(&self, other: &RlweCiphertext) -> RlweCiphertext {
        RlweCiphertext {
            a: &self.a + &other.a,
            b: &self.b + &other.b,
        }
    }

    /// In-place homomorphic addition
    pub fn add_assign(&mut self, other: &RlweCiphertext) {
        self.a += &other.a;
        self.b += &other.b;
    }

    /// Multiply by a plaintext polynomial: decrypts to m·pt
    ///
    /// Consumes one multiplicative level; `plaintext` must already be
    /// lifted into R_q (centered).
    pub fn poly_mul(&self, plaintext: &Poly, ctx: &NttContext) -> RlweCiphertext {
        RlweCiphertext {
            a: self.a.mul_ntt(plaintext, ctx),
            b: self.b.mul_ntt(plaintext, ctx),
        }
    }

    /// Noiseless encryption of zero, the identity for addition
    pub fn zero(params: &FheParams) -> RlweCiphertext {
        RlweCiphertext {
            a: Poly::zero(params.ring_dim, params.q),
            b: Poly::zero(params.ring_dim, params.q),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params() -> FheParams {
        FheParams {
            ring_dim: 256,
            ..FheParams::default()
        }
    }

    struct Fixture {
        params: FheParams,
        ctx: NttContext,
        sk: RlweSecretKey,
        pk: RlwePublicKey,
        sampler: GaussianSampler,
    }

    fn fixture(seed: u64) -> Fixture {
        let params = test_params();
        let ctx = NttContext::new(params.ring_dim, params.q);
        let mut sampler = GaussianSampler::with_seed(params.sigma, seed);
        let sk = RlweSecretKey::generate(&params, &mut sampler);
        let pk = RlwePublicKey::generate(&sk, &params, &mut sampler, &ctx);
        Fixture {
            params,
            ctx,
            sk,
            pk,
            sampler,
        }
    }

    fn message(params: &FheParams, f: impl Fn(usize) -> u64) -> Poly {
        let coeffs = (0..params.ring_dim).map(|i| f(i) % params.p).collect();
        Poly::from_coeffs(coeffs, params.q)
    }

    #[test]
    fn test_public_key_roundtrip() {
        let mut fx = fixture(1);
        let delta = fx.params.delta();
        let msg = message(&fx.params, |i| i as u64 * 257);

        let ct = RlweCiphertext::encrypt_public(&fx.pk, &msg, delta, &mut fx.sampler, &fx.ctx);
        let dec = ct.decrypt(&fx.sk, delta, fx.params.p, &fx.ctx);

        for i in 0..fx.params.ring_dim {
            assert_eq!(dec.coeff(i), msg.coeff(i), "Mismatch at coefficient {}", i);
        }
    }

    #[test]
    fn test_homomorphic_addition_wraps_mod_p() {
        let mut fx = fixture(2);
        let delta = fx.params.delta();
        let p = fx.params.p;
        let m1 = message(&fx.params, |i| p - 1 - i as u64);
        let m2 = message(&fx.params, |i| 3 * i as u64 + 5);

        let c1 = RlweCiphertext::encrypt_public(&fx.pk, &m1, delta, &mut fx.sampler, &fx.ctx);
        let c2 = RlweCiphertext::encrypt_public(&fx.pk, &m2, delta, &mut fx.sampler, &fx.ctx);
        let dec = c1.add(&c2).decrypt(&fx.sk, delta, p, &fx.ctx);

        for i in 0..fx.params.ring_dim {
            assert_eq!(dec.coeff(i), (m1.coeff(i) + m2.coeff(i)) % p);
        }
    }

    #[test]
    fn test_plaintext_constant_multiplication() {
        let mut fx = fixture(3);
        let delta = fx.params.delta();
        let p = fx.params.p;
        let msg = message(&fx.params, |i| i as u64);

        let ct = RlweCiphertext::encrypt_public(&fx.pk, &msg, delta, &mut fx.sampler, &fx.ctx);
        let three = Poly::constant(3, fx.params.ring_dim, fx.params.q);
        let dec = ct.poly_mul(&three, &fx.ctx).decrypt(&fx.sk, delta, p, &fx.ctx);

        for i in 0..fx.params.ring_dim {
            assert_eq!(dec.coeff(i), (3 * msg.coeff(i)) % p);
        }
    }

    #[test]
    fn test_zero_ciphertext_decrypts_to_zero() {
        let fx = fixture(4);
        let dec = RlweCiphertext::zero(&fx.params).decrypt(
            &fx.sk,
            fx.params.delta(),
            fx.params.p,
            &fx.ctx,
        );
        assert!(dec.is_zero());
    }

    #[test]
    fn test_add_assign_matches_add() {
        let mut fx = fixture(5);
        let delta = fx.params.delta();
        let msg = message(&fx.params, |i| i as u64 % 3);
        let c1 = RlweCiphertext::encrypt_public(&fx.pk, &msg, delta, &mut fx.sampler, &fx.ctx);
        let c2 = RlweCiphertext::encrypt_public(&fx.pk, &msg, delta, &mut fx.sampler, &fx.ctx);
        let mut acc = c1.clone();
        acc.add_assign(&c2);
        assert_eq!(acc, c1.add(&c2));
    }
}
