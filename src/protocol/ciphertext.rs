//! Encrypted vectors and aggregates
//!
//! Both wrap one [`RlweCiphertext`] together with public metadata that lets
//! every party check, without decrypting, that inputs belong to the same
//! round: catalog identity, slot count and encryption-context id.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogId;
use crate::error::{GenomicsError, Result};
use crate::rlwe::RlweCiphertext;

/// Reject decoded ciphertexts whose two components disagree in shape or
/// carry unreduced coefficients.
fn check_transport(ciphertext: &RlweCiphertext) -> Result<()> {
    if !ciphertext.is_well_formed(ciphertext.ring_dim(), ciphertext.modulus()) {
        return Err(GenomicsError::Serialization(format!(
            "malformed ciphertext: a has d={}, b has d={} (q={})",
            ciphertext.a.dimension(),
            ciphertext.b.dimension(),
            ciphertext.modulus()
        )));
    }
    Ok(())
}

/// One contributor's encrypted genotype vector.
///
/// Slot layout: `[g_0, .., g_{n-1}, 1]`, the trailing 1 counting the
/// contributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedVector {
    pub(crate) catalog: CatalogId,
    pub(crate) slots: usize,
    pub(crate) context_id: u64,
    pub(crate) ciphertext: RlweCiphertext,
}

impl EncryptedVector {
    pub fn catalog(&self) -> &CatalogId {
        &self.catalog
    }

    /// Catalog size plus the contributor slot
    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn context_id(&self) -> u64 {
        self.context_id
    }

    pub fn ciphertext(&self) -> &RlweCiphertext {
        &self.ciphertext
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let v: Self = bincode::deserialize(bytes)?;
        check_transport(&v.ciphertext)?;
        Ok(v)
    }
}

/// Normalized sum of K encrypted vectors.
///
/// Decrypts to `[sum_0/(2K), .., sum_{n-1}/(2K), K]` in Z_p. Exposes no
/// arithmetic: the single multiplicative level the scheme budgets for has
/// already been spent on normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateCiphertext {
    pub(crate) catalog: CatalogId,
    pub(crate) slots: usize,
    pub(crate) context_id: u64,
    pub(crate) contributors: u64,
    pub(crate) levels_consumed: u32,
    pub(crate) ciphertext: RlweCiphertext,
}

impl AggregateCiphertext {
    pub fn catalog(&self) -> &CatalogId {
        &self.catalog
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn context_id(&self) -> u64 {
        self.context_id
    }

    /// Number of vectors combined (K)
    pub fn contributors(&self) -> u64 {
        self.contributors
    }

    /// Always 1
    pub fn levels_consumed(&self) -> u32 {
        self.levels_consumed
    }

    pub fn ciphertext(&self) -> &RlweCiphertext {
        &self.ciphertext
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let v: Self = bincode::deserialize(bytes)?;
        check_transport(&v.ciphertext)?;
        Ok(v)
    }
}
