//! Aggregation circuit
//!
//! Runs on the untrusted aggregator and never touches the secret key:
//!
//! 1. Homomorphically add the K contributor ciphertexts. Modular addition
//!    is exact, so any grouping or order gives the same ciphertext bits.
//! 2. Multiply once by a plaintext mask whose slots are `(2K)^{-1} mod p`
//!    over the variant slots, 1 over the contributor slot and 0 elsewhere.
//!
//! Step 2 is the only multiplication, so the circuit has depth one.

use rayon::prelude::*;

use crate::catalog::VariantCatalog;
use crate::error::{schema_err, GenomicsError, Result};
use crate::math::{ModQ, NttContext, Poly};
use crate::params::FheParams;
use crate::rlwe::{RlweCiphertext, SlotEncoder};

use super::ciphertext::{AggregateCiphertext, EncryptedVector};

/// Multiplicative levels spent by [`AggregationCircuit`]
pub const LEVELS_CONSUMED: u32 = 1;

/// Combines encrypted vectors of one catalog into an [`AggregateCiphertext`].
#[derive(Debug, Clone)]
pub struct AggregationCircuit {
    params: FheParams,
    catalog: VariantCatalog,
    ntt: NttContext,
    encoder: SlotEncoder,
}

impl AggregationCircuit {
    pub fn new(params: &FheParams, catalog: &VariantCatalog) -> Result<Self> {
        params.validate()?;
        if catalog.slot_len() > params.slot_count() {
            return Err(schema_err!(
                "catalog {} needs {} slots, ring dimension {} provides {}",
                catalog.id(),
                catalog.slot_len(),
                params.ring_dim,
                params.slot_count()
            ));
        }
        Ok(Self {
            params: params.clone(),
            catalog: catalog.clone(),
            ntt: NttContext::new(params.ring_dim, params.q),
            encoder: SlotEncoder::new(params),
        })
    }

    pub fn catalog(&self) -> &VariantCatalog {
        &self.catalog
    }

    /// Sum with a parallel tree reduction, then normalize.
    pub fn aggregate(&self, vectors: &[EncryptedVector]) -> Result<AggregateCiphertext> {
        let k = self.check_inputs(vectors)?;
        let sum = vectors
            .par_iter()
            .map(|v| v.ciphertext.clone())
            .reduce_with(|acc, ct| acc.add(&ct))
            .ok_or_else(|| GenomicsError::InvalidAggregationInput("no vectors".into()))?;
        self.finish(&vectors[0], sum, k)
    }

    /// Same result as [`aggregate`](Self::aggregate), folded left to right.
    pub fn aggregate_sequential(&self, vectors: &[EncryptedVector]) -> Result<AggregateCiphertext> {
        let k = self.check_inputs(vectors)?;
        let mut sum = RlweCiphertext::zero(&self.params);
        for v in vectors {
            sum.add_assign(&v.ciphertext);
        }
        self.finish(&vectors[0], sum, k)
    }

    /// Plaintext multiplier for K contributors, lifted into R_q.
    pub fn normalization_mask(&self, k: u64) -> Result<Poly> {
        let p = self.params.p;
        let two_k = k
            .checked_mul(2)
            .filter(|&t| t > 0 && t < p)
            .ok_or_else(|| {
                GenomicsError::InvalidAggregationInput(format!(
                    "{} contributors: 2K must lie in [2, {})",
                    k, p
                ))
            })?;
        let inv = ModQ::inverse(two_k, p).ok_or_else(|| {
            GenomicsError::InvalidAggregationInput(format!("2K = {} not invertible mod {}", two_k, p))
        })?;

        let mut slots = vec![inv; self.catalog.len()];
        slots.push(1);
        Ok(self.encoder.encode_lifted(&slots))
    }

    /// Validate shape and round membership; returns K.
    fn check_inputs(&self, vectors: &[EncryptedVector]) -> Result<u64> {
        let first = vectors.first().ok_or_else(|| {
            GenomicsError::InvalidAggregationInput("cannot aggregate zero vectors".into())
        })?;

        let k = vectors.len() as u64;
        if k > self.params.max_contributors() {
            return Err(GenomicsError::InvalidAggregationInput(format!(
                "{} contributors exceed the maximum of {} for p = {}",
                k,
                self.params.max_contributors(),
                self.params.p
            )));
        }

        for (i, v) in vectors.iter().enumerate() {
            self.catalog.ensure_same(&v.catalog)?;
            if v.slots != self.catalog.slot_len() {
                return Err(schema_err!(
                    "vector {} has {} slots, catalog {} needs {}",
                    i,
                    v.slots,
                    self.catalog.id(),
                    self.catalog.slot_len()
                ));
            }
            if v.context_id != first.context_id {
                return Err(schema_err!(
                    "vector {} was encrypted under context {:#x}, expected {:#x}",
                    i,
                    v.context_id,
                    first.context_id
                ));
            }
            if !v.ciphertext.is_well_formed(self.params.ring_dim, self.params.q) {
                return Err(schema_err!(
                    "vector {} has ring (d={}/{}, q={}), circuit expects (d={}, q={})",
                    i,
                    v.ciphertext.a.dimension(),
                    v.ciphertext.b.dimension(),
                    v.ciphertext.modulus(),
                    self.params.ring_dim,
                    self.params.q
                ));
            }
        }
        Ok(k)
    }

    fn finish(&self, first: &EncryptedVector, sum: RlweCiphertext, k: u64) -> Result<AggregateCiphertext> {
        let mask = self.normalization_mask(k)?;
        let normalized = sum.poly_mul(&mask, &self.ntt);

        tracing::info!(
            catalog = %self.catalog.id(),
            contributors = k,
            "aggregated encrypted vectors"
        );

        Ok(AggregateCiphertext {
            catalog: self.catalog.id().clone(),
            slots: self.catalog.slot_len(),
            context_id: first.context_id,
            contributors: k,
            levels_consumed: LEVELS_CONSUMED,
            ciphertext: normalized,
        })
    }
}

/// One-shot aggregation of `vectors` under `catalog`.
pub fn aggregate(
    params: &FheParams,
    catalog: &VariantCatalog,
    vectors: &[EncryptedVector],
) -> Result<AggregateCiphertext> {
    AggregationCircuit::new(params, catalog)?.aggregate(vectors)
}
