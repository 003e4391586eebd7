//! Encryption contexts
//!
//! The key holder generates a [`PrivateContext`] and hands out its
//! [`PublicContext`]. Contributors only ever see the public half: it can
//! encrypt but not decrypt.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::encode::PlaintextVector;
use crate::error::{schema_err, GenomicsError, Result};
use crate::math::{GaussianSampler, NttContext};
use crate::params::FheParams;
use crate::rlwe::{RlweCiphertext, RlwePublicKey, RlweSecretKey, SlotEncoder};

use super::ciphertext::{AggregateCiphertext, EncryptedVector};
use super::decode::DecryptedAggregate;

/// Serialized form of a public context.
#[derive(Serialize, Deserialize)]
struct PublicData {
    params: FheParams,
    context_id: u64,
    public_key: RlwePublicKey,
}

#[derive(Serialize, Deserialize)]
struct PrivateData {
    public: PublicData,
    secret_key: RlweSecretKey,
}

/// Encryption-only view of a round's keys.
#[derive(Debug, Clone)]
pub struct PublicContext {
    params: FheParams,
    context_id: u64,
    public_key: RlwePublicKey,
    ntt: NttContext,
    encoder: SlotEncoder,
}

impl PublicContext {
    fn from_data(data: PublicData) -> Result<Self> {
        data.params.validate()?;
        if !data
            .public_key
            .is_well_formed(data.params.ring_dim, data.params.q)
        {
            return Err(GenomicsError::InvalidParameters(format!(
                "public key does not lie in R_q for ring_dim {} and q {}",
                data.params.ring_dim, data.params.q
            )));
        }
        Ok(Self {
            ntt: NttContext::new(data.params.ring_dim, data.params.q),
            encoder: SlotEncoder::new(&data.params),
            params: data.params,
            context_id: data.context_id,
            public_key: data.public_key,
        })
    }

    fn data(&self) -> PublicData {
        PublicData {
            params: self.params.clone(),
            context_id: self.context_id,
            public_key: self.public_key.clone(),
        }
    }

    pub fn params(&self) -> &FheParams {
        &self.params
    }

    /// Random identifier shared by every ciphertext produced under this key
    pub fn context_id(&self) -> u64 {
        self.context_id
    }

    /// Encrypt one genotype vector with fresh randomness.
    pub fn encrypt(&self, vector: &PlaintextVector) -> Result<EncryptedVector> {
        let mut sampler = GaussianSampler::new(self.params.sigma);
        self.encrypt_with_sampler(vector, &mut sampler)
    }

    /// Encrypt with caller-supplied randomness (deterministic when seeded).
    pub fn encrypt_with_sampler(
        &self,
        vector: &PlaintextVector,
        sampler: &mut GaussianSampler,
    ) -> Result<EncryptedVector> {
        let slots = vector.len() + 1;
        if slots > self.params.slot_count() {
            return Err(schema_err!(
                "{} slots needed, ring dimension {} provides {}",
                slots,
                self.params.ring_dim,
                self.params.slot_count()
            ));
        }

        let mut values: Vec<u64> = vector.genotypes().iter().map(|&g| g as u64).collect();
        values.push(1);
        let message = self.encoder.encode_lifted(&values);

        let ciphertext = RlweCiphertext::encrypt_public(
            &self.public_key,
            &message,
            self.params.delta(),
            sampler,
            &self.ntt,
        );

        Ok(EncryptedVector {
            catalog: vector.catalog().clone(),
            slots,
            context_id: self.context_id,
            ciphertext,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&self.data())?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_data(bincode::deserialize(bytes)?)
    }
}

/// Key holder's context: the only party able to decrypt.
#[derive(Debug, Clone)]
pub struct PrivateContext {
    public: PublicContext,
    secret_key: RlweSecretKey,
}

impl PrivateContext {
    /// Generate a fresh key pair from OS entropy.
    pub fn generate(params: &FheParams) -> Result<Self> {
        Self::generate_with_sampler(params, GaussianSampler::new(params.sigma))
    }

    /// Deterministic key generation, for tests and reproducible simulations.
    pub fn generate_with_seed(params: &FheParams, seed: u64) -> Result<Self> {
        Self::generate_with_sampler(params, GaussianSampler::with_seed(params.sigma, seed))
    }

    fn generate_with_sampler(params: &FheParams, mut sampler: GaussianSampler) -> Result<Self> {
        params.validate()?;
        let ntt = NttContext::new(params.ring_dim, params.q);
        let secret_key = RlweSecretKey::generate(params, &mut sampler);
        let public_key = RlwePublicKey::generate(&secret_key, params, &mut sampler, &ntt);
        let context_id = sampler.rng().gen::<u64>();

        tracing::info!(
            ring_dim = params.ring_dim,
            context_id,
            "generated encryption context"
        );

        Ok(Self {
            public: PublicContext {
                params: params.clone(),
                context_id,
                public_key,
                ntt,
                encoder: SlotEncoder::new(params),
            },
            secret_key,
        })
    }

    pub fn public(&self) -> &PublicContext {
        &self.public
    }

    fn decrypt_slots(&self, ciphertext: &RlweCiphertext, context_id: u64) -> Result<Vec<u64>> {
        let params = &self.public.params;
        if context_id != self.public.context_id {
            return Err(schema_err!(
                "ciphertext from context {:#x}, key belongs to {:#x}",
                context_id,
                self.public.context_id
            ));
        }
        if !ciphertext.is_well_formed(params.ring_dim, params.q) {
            return Err(schema_err!(
                "ciphertext ring (d={}/{}, q={}) does not match context",
                ciphertext.a.dimension(),
                ciphertext.b.dimension(),
                ciphertext.modulus()
            ));
        }
        let plain = ciphertext.decrypt(&self.secret_key, params.delta(), params.p, &self.public.ntt);
        Ok(self.public.encoder.decode(&plain))
    }

    /// Decrypt an aggregate and undo the normalization.
    ///
    /// Slot `i` holds `sum_i·(2K)^{-1} mod p`; since `0 ≤ sum_i ≤ 2K < p` the
    /// sum is recovered exactly as `slot_i·2K mod p`. K itself is read from
    /// the trailing slot and must agree with the aggregate's header.
    pub fn decrypt(&self, aggregate: &AggregateCiphertext) -> Result<DecryptedAggregate> {
        let p = self.public.params.p;
        let slots = self.decrypt_slots(&aggregate.ciphertext, aggregate.context_id)?;
        if aggregate.slots < 1 || aggregate.slots > slots.len() {
            return Err(schema_err!("aggregate claims {} slots", aggregate.slots));
        }

        let n = aggregate.slots - 1;
        let k = slots[n];
        if k == 0 {
            return Err(GenomicsError::EmptyAggregate);
        }
        if k != aggregate.contributors {
            return Err(GenomicsError::CorruptCiphertext(format!(
                "contributor slot decrypts to {}, header says {}",
                k, aggregate.contributors
            )));
        }
        let two_k = 2 * k;
        if two_k >= p {
            return Err(GenomicsError::CorruptCiphertext(format!(
                "{} contributors exceed the plaintext field",
                k
            )));
        }

        let mut allele_sums = Vec::with_capacity(n);
        for (i, &slot) in slots[..n].iter().enumerate() {
            let sum = ((slot as u128 * two_k as u128) % p as u128) as u64;
            if sum > two_k {
                return Err(GenomicsError::CorruptCiphertext(format!(
                    "slot {} reconstructs to {} > 2K = {}",
                    i, sum, two_k
                )));
            }
            allele_sums.push(sum);
        }

        tracing::debug!(contributors = k, variants = n, "decrypted aggregate");
        DecryptedAggregate::new(aggregate.catalog.clone(), allele_sums, k)
    }

    /// Decrypt a single contributor's vector (key-holder diagnostics only).
    pub fn decrypt_vector(&self, vector: &EncryptedVector) -> Result<PlaintextVector> {
        let slots = self.decrypt_slots(&vector.ciphertext, vector.context_id)?;
        if vector.slots < 1 || vector.slots > slots.len() {
            return Err(schema_err!("vector claims {} slots", vector.slots));
        }
        let n = vector.slots - 1;
        if slots[n] != 1 {
            return Err(GenomicsError::CorruptCiphertext(format!(
                "contributor slot decrypts to {}, expected 1",
                slots[n]
            )));
        }
        let genotypes = slots[..n]
            .iter()
            .map(|&v| match v {
                0..=2 => Ok(v as u8),
                _ => Err(GenomicsError::CorruptCiphertext(format!(
                    "genotype slot decrypts to {}",
                    v
                ))),
            })
            .collect::<Result<Vec<u8>>>()?;
        Ok(PlaintextVector::from_parts(vector.catalog.clone(), genotypes))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let data = PrivateData {
            public: self.public.data(),
            secret_key: self.secret_key.clone(),
        };
        Ok(bincode::serialize(&data)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let data: PrivateData = bincode::deserialize(bytes)?;
        let params = &data.public.params;
        if !data.secret_key.is_well_formed(params.ring_dim, params.q) {
            return Err(GenomicsError::InvalidParameters(format!(
                "secret key does not lie in R_q for ring_dim {} and q {}",
                params.ring_dim, params.q
            )));
        }
        Ok(Self {
            public: PublicContext::from_data(data.public)?,
            secret_key: data.secret_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::alzheimers_disease;
    use crate::math::Poly;

    fn params() -> FheParams {
        FheParams {
            ring_dim: 256,
            ..FheParams::default()
        }
    }

    #[test]
    fn test_encrypt_decrypt_vector() {
        let ctx = PrivateContext::generate_with_seed(&params(), 11).unwrap();
        let catalog = alzheimers_disease();
        let v = PlaintextVector::new(&catalog, vec![2, 0, 1, 1, 0, 0, 2, 0, 1, 0]).unwrap();

        let ct = ctx.public().encrypt(&v).unwrap();
        assert_eq!(ct.slots(), 11);
        assert_eq!(ct.context_id(), ctx.public().context_id());
        assert_eq!(ctx.decrypt_vector(&ct).unwrap(), v);
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let a = PrivateContext::generate_with_seed(&params(), 5).unwrap();
        let b = PrivateContext::generate_with_seed(&params(), 5).unwrap();
        assert_eq!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
    }

    #[test]
    fn test_context_bytes_roundtrip() {
        let ctx = PrivateContext::generate_with_seed(&params(), 6).unwrap();
        let public = PublicContext::from_bytes(&ctx.public().to_bytes().unwrap()).unwrap();
        assert_eq!(public.context_id(), ctx.public().context_id());

        let restored = PrivateContext::from_bytes(&ctx.to_bytes().unwrap()).unwrap();
        let catalog = alzheimers_disease();
        let v = PlaintextVector::new(&catalog, vec![1; 10]).unwrap();
        let ct = public.encrypt(&v).unwrap();
        assert_eq!(restored.decrypt_vector(&ct).unwrap(), v);
    }

    #[test]
    fn test_foreign_context_rejected() {
        let ours = PrivateContext::generate_with_seed(&params(), 7).unwrap();
        let theirs = PrivateContext::generate_with_seed(&params(), 8).unwrap();
        let catalog = alzheimers_disease();
        let v = PlaintextVector::new(&catalog, vec![0; 10]).unwrap();
        let ct = theirs.public().encrypt(&v).unwrap();
        assert!(matches!(
            ours.decrypt_vector(&ct),
            Err(GenomicsError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_malformed_ciphertext_not_decrypted() {
        let ctx = PrivateContext::generate_with_seed(&params(), 9).unwrap();
        let v = PlaintextVector::new(&alzheimers_disease(), vec![1; 10]).unwrap();
        let mut ct = ctx.public().encrypt(&v).unwrap();
        ct.ciphertext.b = Poly::zero(4, params().q);
        assert!(matches!(
            ctx.decrypt_vector(&ct),
            Err(GenomicsError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_secret_key_modulus_checked() {
        let ctx = PrivateContext::generate_with_seed(&params(), 10).unwrap();
        let p = params();
        let data = PrivateData {
            public: ctx.public().data(),
            secret_key: RlweSecretKey::from_poly(Poly::zero(p.ring_dim, 12289)),
        };
        let bytes = bincode::serialize(&data).unwrap();
        assert!(matches!(
            PrivateContext::from_bytes(&bytes),
            Err(GenomicsError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_public_key_shape_checked() {
        let ctx = PrivateContext::generate_with_seed(&params(), 12).unwrap();
        let mut data = ctx.public().data();
        data.public_key.b = Poly::zero(8, params().q);
        let bytes = bincode::serialize(&data).unwrap();
        assert!(matches!(
            PublicContext::from_bytes(&bytes),
            Err(GenomicsError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let bad = FheParams {
            ring_dim: 100,
            ..FheParams::default()
        };
        assert!(matches!(
            PrivateContext::generate(&bad),
            Err(GenomicsError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_catalog_too_large_for_ring() {
        let tiny = FheParams {
            ring_dim: 8,
            ..FheParams::default()
        };
        let ctx = PrivateContext::generate_with_seed(&tiny, 1).unwrap();
        let v = PlaintextVector::new(&alzheimers_disease(), vec![0; 10]).unwrap();
        assert!(matches!(
            ctx.public().encrypt(&v),
            Err(GenomicsError::SchemaMismatch(_))
        ));
    }
}
