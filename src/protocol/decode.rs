//! Decoding decrypted aggregates into allele frequencies

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogId, VariantCatalog};
use crate::error::{schema_err, GenomicsError, Result};

/// Per-variant allele sums of K genomes, plus K.
///
/// Invariant: every sum lies in `0..=2K`. Deserialization goes through
/// [`DecryptedAggregate::new`] and enforces it too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDecryptedAggregate")]
pub struct DecryptedAggregate {
    catalog: CatalogId,
    allele_sums: Vec<u64>,
    num_genomes: u64,
}

#[derive(Deserialize)]
struct RawDecryptedAggregate {
    catalog: CatalogId,
    allele_sums: Vec<u64>,
    num_genomes: u64,
}

impl TryFrom<RawDecryptedAggregate> for DecryptedAggregate {
    type Error = GenomicsError;

    fn try_from(raw: RawDecryptedAggregate) -> Result<Self> {
        Self::new(raw.catalog, raw.allele_sums, raw.num_genomes)
    }
}

impl DecryptedAggregate {
    pub fn new(catalog: CatalogId, allele_sums: Vec<u64>, num_genomes: u64) -> Result<Self> {
        let bound = num_genomes.saturating_mul(2);
        if let Some((i, s)) = allele_sums.iter().enumerate().find(|(_, &s)| s > bound) {
            return Err(schema_err!(
                "allele sum {} at index {} exceeds 2K = {}",
                s,
                i,
                bound
            ));
        }
        Ok(Self {
            catalog,
            allele_sums,
            num_genomes,
        })
    }

    pub fn catalog(&self) -> &CatalogId {
        &self.catalog
    }

    pub fn allele_sums(&self) -> &[u64] {
        &self.allele_sums
    }

    /// Contributor count K
    pub fn num_genomes(&self) -> u64 {
        self.num_genomes
    }

    /// Flat layout: the sums followed by K.
    pub fn to_sequence(&self) -> Vec<f64> {
        self.allele_sums
            .iter()
            .chain(std::iter::once(&self.num_genomes))
            .map(|&v| v as f64)
            .collect()
    }

    /// `sum[i] / (2K)` for every variant.
    pub fn frequencies(&self) -> Result<Vec<f64>> {
        if self.num_genomes == 0 {
            return Err(GenomicsError::EmptyAggregate);
        }
        let denom = 2.0 * self.num_genomes as f64;
        Ok(self.allele_sums.iter().map(|&s| s as f64 / denom).collect())
    }
}

/// Frequencies of a decrypted aggregate. Zero contributors is an error.
pub fn decode(plain: &DecryptedAggregate) -> Result<Vec<f64>> {
    plain.frequencies()
}

/// Split a flat decrypted sequence (sums then K) into a [`DecryptedAggregate`].
pub fn decode_raw(sequence: &[f64], catalog: &VariantCatalog) -> Result<DecryptedAggregate> {
    if sequence.len() != catalog.slot_len() {
        return Err(schema_err!(
            "sequence has {} entries, catalog {} needs {} variants plus the count",
            sequence.len(),
            catalog.id(),
            catalog.len()
        ));
    }

    let to_count = |i: usize, v: f64| -> Result<u64> {
        if !v.is_finite() || v < 0.0 || v.fract() != 0.0 || v > u64::MAX as f64 {
            return Err(schema_err!(
                "entry {} = {} is not a non-negative integer",
                i,
                v
            ));
        }
        Ok(v as u64)
    };

    let (k_entry, sums) = sequence
        .split_last()
        .ok_or_else(|| schema_err!("empty sequence"))?;
    let num_genomes = to_count(sums.len(), *k_entry)?;
    let allele_sums = sums
        .iter()
        .enumerate()
        .map(|(i, &v)| to_count(i, v))
        .collect::<Result<Vec<_>>>()?;

    DecryptedAggregate::new(catalog.id().clone(), allele_sums, num_genomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogKind, VariantEntry, VariantKey};

    fn two_variant_catalog() -> VariantCatalog {
        VariantCatalog::new(
            CatalogKind::Custom("pair".into()),
            vec![
                VariantEntry::new(VariantKey::ByIdentifier("rsA".into()), 12.0, "A"),
                VariantEntry::new(VariantKey::ByIdentifier("rsB".into()), 0.62, "B"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_decode_raw_and_frequencies() {
        let catalog = two_variant_catalog();
        let agg = decode_raw(&[2.0, 1.0, 2.0], &catalog).unwrap();
        assert_eq!(agg.allele_sums(), &[2, 1]);
        assert_eq!(agg.num_genomes(), 2);
        assert_eq!(decode(&agg).unwrap(), vec![0.5, 0.25]);
        assert_eq!(agg.to_sequence(), vec![2.0, 1.0, 2.0]);
    }

    #[test]
    fn test_zero_contributors() {
        let catalog = two_variant_catalog();
        let agg = decode_raw(&[0.0, 0.0, 0.0], &catalog).unwrap();
        assert!(matches!(decode(&agg), Err(GenomicsError::EmptyAggregate)));
    }

    #[test]
    fn test_decode_raw_rejects_bad_sequences() {
        let catalog = two_variant_catalog();
        for seq in [
            vec![1.0, 1.0],
            vec![1.0, 1.0, 1.0, 1.0],
            vec![0.5, 1.0, 1.0],
            vec![-1.0, 1.0, 1.0],
            vec![3.0, 0.0, 1.0],
            vec![f64::NAN, 0.0, 1.0],
        ] {
            assert!(
                matches!(decode_raw(&seq, &catalog), Err(GenomicsError::SchemaMismatch(_))),
                "{:?} should be rejected",
                seq
            );
        }
    }

    #[test]
    fn test_deserialize_enforces_sum_bound() {
        let catalog = two_variant_catalog();
        let valid = DecryptedAggregate::new(catalog.id().clone(), vec![2, 1], 1).unwrap();
        let json = serde_json::to_string(&valid).unwrap();
        assert_eq!(serde_json::from_str::<DecryptedAggregate>(&json).unwrap(), valid);

        let forged = serde_json::json!({
            "catalog": catalog.id(),
            "allele_sums": [5, 0],
            "num_genomes": 1,
        });
        let err = serde_json::from_value::<DecryptedAggregate>(forged).unwrap_err();
        assert!(err.to_string().contains("exceeds 2K"));
    }
}
