//! Genotype encoding
//!
//! Turns one genome into a [`PlaintextVector`] laid out by a catalog: slot
//! `i` holds the number of alternate-allele copies (0, 1 or 2) at catalog
//! entry `i`. Variants the genome does not cover are encoded as 0
//! (homozygous reference), so partial data degrades instead of aborting a
//! round.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogId, VariantCatalog, VariantKey};
use crate::error::{schema_err, GenomicsError, Result};

/// Anything that can report an alternate-allele count for a variant.
pub trait GenotypeSource {
    /// `None` when the variant is not covered.
    fn alt_count(&self, key: &VariantKey) -> Option<u8>;
}

impl GenotypeSource for HashMap<VariantKey, u8> {
    fn alt_count(&self, key: &VariantKey) -> Option<u8> {
        self.get(key).copied()
    }
}

/// One called site, as produced by an upstream variant-file parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenotypeRecord {
    /// dbSNP identifier, `"."` or absent when unknown
    #[serde(default)]
    pub id: Option<String>,
    pub chrom: String,
    pub pos: u64,
    pub alts: Vec<String>,
    /// Allele indices of the call (0 = reference), `None` for a no-call
    /// allele; absent when the sample has no GT field
    #[serde(default)]
    pub genotype: Option<Vec<Option<u8>>>,
}

impl GenotypeRecord {
    /// Alternate-allele dosage of this call.
    ///
    /// Any missing allele makes the whole call count as reference.
    pub fn alt_count(&self) -> u8 {
        let Some(alleles) = &self.genotype else {
            return 0;
        };
        let mut count = 0u8;
        for allele in alleles {
            match allele {
                None => return 0,
                Some(0) => {}
                Some(_) => count = count.saturating_add(1),
            }
        }
        count.min(2)
    }

    fn identifier(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty() && *id != ".")
    }
}

/// Genotype records indexed by rsID and by `(chrom, pos, first alt)`.
#[derive(Debug, Clone, Default)]
pub struct RecordMap {
    counts: HashMap<VariantKey, u8>,
}

impl RecordMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: &GenotypeRecord) {
        let count = record.alt_count();
        if let Some(id) = record.identifier() {
            self.counts
                .insert(VariantKey::ByIdentifier(id.to_string()), count);
        }
        if let Some(alt) = record.alts.first() {
            self.counts.insert(
                VariantKey::ByCoordinate {
                    chrom: record.chrom.clone(),
                    pos: record.pos,
                    alt: alt.clone(),
                },
                count,
            );
        }
    }

    /// Parse a JSON array of [`GenotypeRecord`]s.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<GenotypeRecord> = serde_json::from_str(json)?;
        Ok(records.iter().collect())
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl<'a> FromIterator<&'a GenotypeRecord> for RecordMap {
    fn from_iter<I: IntoIterator<Item = &'a GenotypeRecord>>(iter: I) -> Self {
        let mut map = Self::new();
        for record in iter {
            map.insert(record);
        }
        map
    }
}

impl GenotypeSource for RecordMap {
    fn alt_count(&self, key: &VariantKey) -> Option<u8> {
        self.counts.get(key).copied()
    }
}

/// Per-variant allele counts of one genome, ordered by a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaintextVector {
    catalog: CatalogId,
    genotypes: Vec<u8>,
}

impl PlaintextVector {
    /// Tag raw genotype counts with `catalog`, checking shape and range.
    pub fn new(catalog: &VariantCatalog, genotypes: Vec<u8>) -> Result<Self> {
        if genotypes.len() != catalog.len() {
            return Err(schema_err!(
                "vector has {} entries, catalog {} has {}",
                genotypes.len(),
                catalog.id(),
                catalog.len()
            ));
        }
        if let Some((i, g)) = genotypes.iter().enumerate().find(|(_, &g)| g > 2) {
            return Err(schema_err!(
                "genotype {} at index {} is not in {{0, 1, 2}}",
                g,
                i
            ));
        }
        Ok(Self {
            catalog: catalog.id().clone(),
            genotypes,
        })
    }

    /// Rebuild a vector recovered by decryption; values already range-checked.
    pub(crate) fn from_parts(catalog: CatalogId, genotypes: Vec<u8>) -> Self {
        Self { catalog, genotypes }
    }

    pub fn catalog(&self) -> &CatalogId {
        &self.catalog
    }

    pub fn genotypes(&self) -> &[u8] {
        &self.genotypes
    }

    pub fn len(&self) -> usize {
        self.genotypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genotypes.is_empty()
    }
}

/// Resolve every catalog entry against `source`.
pub fn encode<S: GenotypeSource + ?Sized>(
    source: &S,
    catalog: &VariantCatalog,
) -> Result<PlaintextVector> {
    let genotypes = catalog
        .entries()
        .iter()
        .map(|entry| match source.alt_count(entry.key()) {
            Some(count) => count.min(2),
            None => {
                tracing::debug!(variant = %entry.key(), "variant not covered, encoding as reference");
                0
            }
        })
        .collect();
    PlaintextVector::new(catalog, genotypes)
}
