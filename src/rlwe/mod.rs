//! Batched RLWE encryption over R_q = Z_q[X]/(X^d + 1).
//!
//! - Secret key s: small Gaussian polynomial
//! - Public key (a, -a·s + e): lets any contributor encrypt
//! - Ciphertext (a, b) with b + a·s = Δ·m + e, Δ = ⌊q/p⌋
//! - Messages are packed into d slots mod p by [`SlotEncoder`]
//!
//! Supported homomorphic operations are exactly what the aggregation
//! circuit needs: ciphertext addition and plaintext multiplication.
//!
//! # Example
//!
//! ```
//! use secure_genomics::math::{GaussianSampler, NttContext};
//! use secure_genomics::params::FheParams;
//! use secure_genomics::rlwe::{RlweCiphertext, RlwePublicKey, RlweSecretKey, SlotEncoder};
//!
//! let params = FheParams { ring_dim: 256, ..FheParams::default() };
//! let ctx = NttContext::new(params.ring_dim, params.q);
//! let encoder = SlotEncoder::new(&params);
//! let mut sampler = GaussianSampler::with_seed(params.sigma, 7);
//!
//! let sk = RlweSecretKey::generate(&params, &mut sampler);
//! let pk = RlwePublicKey::generate(&sk, &params, &mut sampler, &ctx);
//!
//! let msg = encoder.encode_lifted(&[2, 0, 1]);
//! let ct = RlweCiphertext::encrypt_public(&pk, &msg, params.delta(), &mut sampler, &ctx);
//! let slots = encoder.decode(&ct.decrypt(&sk, params.delta(), params.p, &ctx));
//! assert_eq!(&slots[..3], &[2, 0, 1]);
//! ```

mod enc;
mod encoder;
mod types;

pub use encoder::SlotEncoder;
pub use types::{RlweCiphertext, RlwePublicKey, RlweSecretKey};
