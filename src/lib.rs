//! Secure Genomics: privacy-preserving allele frequency aggregation
//!
//! Contributors encode their genotypes against a shared variant catalog,
//! encrypt them under a batched RLWE public key, and hand only ciphertexts
//! to an untrusted aggregator. The aggregator sums the ciphertexts and
//! normalizes them with one plaintext multiplication; the key holder
//! decrypts the result into population allele frequencies.
//!
//! Key components:
//! - [`catalog`]: ordered variant schemas with odds ratios
//! - [`encode`]: genotype sources to fixed-layout vectors
//! - [`protocol`]: encryption contexts, aggregation circuit, decode, report
//! - [`risk`]: single-party polygenic risk score, no encryption
//! - [`rlwe`] / [`math`]: the underlying lattice scheme

pub mod catalog;
pub mod encode;
pub mod error;
pub mod math;
pub mod params;
pub mod protocol;
pub mod risk;
pub mod rlwe;

pub use catalog::{CatalogId, CatalogKind, VariantCatalog, VariantEntry, VariantKey};
pub use encode::{encode, GenotypeRecord, GenotypeSource, PlaintextVector, RecordMap};
pub use error::{GenomicsError, Result};
pub use params::{FheParams, SecurityLevel};
pub use protocol::{
    aggregate, decode, decode_raw, report, AggregateCiphertext, AggregationCircuit,
    AlleleFrequencyReport, DecryptedAggregate, EncryptedVector, FrequencyEntry,
    FrequencyReporter, PrivateContext, PublicContext,
};
pub use risk::{NarrativeFormatter, PlainNarrative, RiskScoreResult, RiskScorer, RiskTier};
