//! Modular arithmetic helpers over Z_q.
//!
//! Values are plain `u64` residues in `[0, q)`; products go through `u128`
//! so any modulus below 2^63 is safe.

/// Modular arithmetic operations over Z_q
pub struct ModQ;

impl ModQ {
    /// Add two values modulo q
    #[inline]
    pub fn add(a: u64, b: u64, q: u64) -> u64 {
        let sum = (a as u128) + (b as u128);
        (sum % (q as u128)) as u64
    }

    /// Subtract two values modulo q
    #[inline]
    pub fn sub(a: u64, b: u64, q: u64) -> u64 {
        if a >= b {
            a - b
        } else {
            q - (b - a)
        }
    }

    /// Multiply two values modulo q
    #[inline]
    pub fn mul(a: u64, b: u64, q: u64) -> u64 {
        let prod = (a as u128) * (b as u128);
        (prod % (q as u128)) as u64
    }

    /// Negate a value modulo q
    #[inline]
    pub fn negate(a: u64, q: u64) -> u64 {
        if a == 0 {
            0
        } else {
            q - a
        }
    }

    /// Square-and-multiply exponentiation
    pub fn pow(mut base: u64, mut exp: u64, q: u64) -> u64 {
        let mut result = 1u64 % q;
        base %= q;
        while exp > 0 {
            if exp & 1 == 1 {
                result = Self::mul(result, base, q);
            }
            base = Self::mul(base, base, q);
            exp >>= 1;
        }
        result
    }

    /// Multiplicative inverse via the extended Euclidean algorithm.
    ///
    /// Returns `None` when `gcd(a, q) != 1`.
    pub fn inverse(a: u64, q: u64) -> Option<u64> {
        let (mut t, mut new_t): (i128, i128) = (0, 1);
        let (mut r, mut new_r): (i128, i128) = (q as i128, (a % q) as i128);

        while new_r != 0 {
            let quotient = r / new_r;
            (t, new_t) = (new_t, t - quotient * new_t);
            (r, new_r) = (new_r, r - quotient * new_r);
        }

        if r != 1 {
            return None;
        }
        if t < 0 {
            t += q as i128;
        }
        Some(t as u64)
    }

    /// Convert a signed integer to its representation in Z_q
    #[inline]
    pub fn from_signed(val: i64, q: u64) -> u64 {
        if val >= 0 {
            (val as u64) % q
        } else {
            let abs = val.unsigned_abs();
            Self::negate(abs % q, q)
        }
    }

    /// Convert from Z_q to signed representation in (-q/2, q/2]
    #[inline]
    pub fn to_signed(val: u64, q: u64) -> i64 {
        if val <= q / 2 {
            val as i64
        } else {
            -((q - val) as i64)
        }
    }

    /// Re-embed a residue mod `from` into Z_`to` through its centered lift.
    ///
    /// Keeps small negative values small, which bounds the noise added by
    /// plaintext multiplication.
    #[inline]
    pub fn lift_centered(val: u64, from: u64, to: u64) -> u64 {
        Self::from_signed(Self::to_signed(val, from), to)
    }
}
