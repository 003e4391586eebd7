//! Mathematical primitives for the batched RLWE scheme.
//!
//! - **Modular arithmetic** over Z_q
//! - **Negacyclic NTT** for polynomial multiplication and slot packing
//! - **Polynomials** over R_q = Z_q[X]/(X^d + 1)
//! - **Discrete Gaussian sampling** for keys and error terms

pub mod gaussian;
pub mod modular;
pub mod ntt;
pub mod poly;

pub use gaussian::GaussianSampler;
pub use modular::ModQ;
pub use ntt::NttContext;
pub use poly::Poly;

/// Ciphertext modulus: a 60-bit prime with q ≡ 1 (mod 2^15 · 65537).
///
/// q ≡ 1 (mod 2d) for ring dimensions up to 2^14, and q ≡ 1 (mod p) so that
/// Δ·p ≡ -1 (mod q). The second congruence keeps the rounding term of a
/// plaintext multiplication at one unit per wrapped coefficient.
pub const DEFAULT_Q: u64 = 1152921497895862273;

/// Plaintext modulus p = 2^16 + 1 (Fermat prime F4).
///
/// p ≡ 1 (mod 2d) for every d ≤ 2^15, which is what SIMD slot packing needs.
pub const DEFAULT_P: u64 = 65537;
