//! Variant catalogs.
//!
//! A catalog is the schema every party in a round agrees on: entry `i`
//! defines what slot `i` of every plaintext and encrypted vector means.
//! Catalogs are explicit values handed to each component; the catalog
//! identity travels with every vector and ciphertext derived from it so a
//! round can never silently mix two schemas.

mod builtin;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{GenomicsError, Result};

pub use builtin::{alzheimers_disease, breast_cancer};

/// Which condition a catalog describes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogKind {
    AlzheimersDisease,
    BreastCancer,
    /// User-supplied catalog, named by its author
    Custom(String),
}

impl CatalogKind {
    /// Human-readable condition name
    pub fn display_name(&self) -> &str {
        match self {
            Self::AlzheimersDisease => "Alzheimer's Disease",
            Self::BreastCancer => "Breast Cancer",
            Self::Custom(name) => name,
        }
    }

    fn tag(&self) -> u8 {
        match self {
            Self::AlzheimersDisease => 0,
            Self::BreastCancer => 1,
            Self::Custom(_) => 2,
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Identity of a catalog: its kind plus a SHA-256 fingerprint of the
/// ordered entries.
///
/// Same-named catalogs whose rows differ in content or order get different
/// identities, so vectors built against one are rejected by the other.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogId {
    kind: CatalogKind,
    fingerprint: [u8; 32],
}

impl CatalogId {
    fn compute(kind: CatalogKind, entries: &[VariantEntry]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"secure-genomics/catalog/v1");
        hasher.update([kind.tag()]);
        hash_str(&mut hasher, kind.display_name());
        hasher.update((entries.len() as u64).to_le_bytes());
        for entry in entries {
            hash_str(&mut hasher, &entry.key.to_string());
            hasher.update(entry.odds_ratio.to_bits().to_le_bytes());
            hash_str(&mut hasher, &entry.gene_label);
        }
        let mut fingerprint = [0u8; 32];
        fingerprint.copy_from_slice(&hasher.finalize());
        Self { kind, fingerprint }
    }

    pub fn kind(&self) -> &CatalogKind {
        &self.kind
    }

    /// Human-readable condition name
    pub fn display_name(&self) -> &str {
        self.kind.display_name()
    }

    pub fn fingerprint(&self) -> &[u8; 32] {
        &self.fingerprint
    }

    /// First eight hex digits of the fingerprint
    pub fn short_fingerprint(&self) -> String {
        self.fingerprint[..4]
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}

fn hash_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.kind, self.short_fingerprint())
    }
}

/// How a variant is looked up in a genome.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VariantKey {
    /// dbSNP-style identifier, e.g. `rs429358`
    ByIdentifier(String),
    /// `chrom:pos:alt`, matched against the first alternate allele
    ByCoordinate { chrom: String, pos: u64, alt: String },
}

impl VariantKey {
    /// Parse `rs429358` or `19:44908684:C`.
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        let invalid = || GenomicsError::InvalidVariantSpecification(format!("{:?}", spec));

        if spec.is_empty() || spec == "." || spec.chars().any(char::is_whitespace) {
            return Err(invalid());
        }
        if !spec.contains(':') {
            return Ok(Self::ByIdentifier(spec.to_string()));
        }

        let mut parts = spec.split(':');
        let (chrom, pos, alt) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(c), Some(p), Some(a), None) => (c, p, a),
            _ => return Err(invalid()),
        };
        let pos: u64 = pos.parse().map_err(|_| invalid())?;
        if chrom.is_empty() || pos == 0 || alt.is_empty() {
            return Err(invalid());
        }
        Ok(Self::ByCoordinate {
            chrom: chrom.to_string(),
            pos,
            alt: alt.to_string(),
        })
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByIdentifier(id) => f.write_str(id),
            Self::ByCoordinate { chrom, pos, alt } => write!(f, "{}:{}:{}", chrom, pos, alt),
        }
    }
}

impl FromStr for VariantKey {
    type Err = GenomicsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VariantKey {
    type Error = GenomicsError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<VariantKey> for String {
    fn from(key: VariantKey) -> String {
        key.to_string()
    }
}

/// One catalog row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantEntry {
    #[serde(rename = "variant")]
    key: VariantKey,
    odds_ratio: f64,
    #[serde(rename = "gene")]
    gene_label: String,
}

impl VariantEntry {
    pub fn new(key: VariantKey, odds_ratio: f64, gene_label: impl Into<String>) -> Self {
        Self {
            key,
            odds_ratio,
            gene_label: gene_label.into(),
        }
    }

    pub fn key(&self) -> &VariantKey {
        &self.key
    }

    pub fn variant_id(&self) -> String {
        self.key.to_string()
    }

    pub fn odds_ratio(&self) -> f64 {
        self.odds_ratio
    }

    pub fn gene_label(&self) -> &str {
        &self.gene_label
    }

    /// `"{gene_label} ({variant_id})"`, the key used in frequency reports
    pub fn report_label(&self) -> String {
        format!("{} ({})", self.gene_label, self.key)
    }
}

/// On-disk catalog format.
#[derive(Deserialize)]
struct CatalogFile {
    name: String,
    variants: Vec<VariantEntry>,
}

/// Immutable, validated, ordered variant schema.
#[derive(Clone, Debug, PartialEq)]
pub struct VariantCatalog {
    id: CatalogId,
    entries: Vec<VariantEntry>,
}

impl VariantCatalog {
    /// Validate and freeze a catalog.
    ///
    /// Rejects empty catalogs, duplicate keys, and odds ratios that are not
    /// finite and strictly positive. The identity is derived from `kind` and
    /// the entries in order.
    pub fn new(kind: CatalogKind, entries: Vec<VariantEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(GenomicsError::InvalidCatalogEntry(format!(
                "catalog {} has no variants",
                kind
            )));
        }
        for (i, entry) in entries.iter().enumerate() {
            if !(entry.odds_ratio.is_finite() && entry.odds_ratio > 0.0) {
                return Err(GenomicsError::InvalidCatalogEntry(format!(
                    "{} has odds ratio {}",
                    entry.report_label(),
                    entry.odds_ratio
                )));
            }
            if entries[..i].iter().any(|e| e.key == entry.key) {
                return Err(GenomicsError::InvalidCatalogEntry(format!(
                    "duplicate variant {}",
                    entry.key
                )));
            }
        }
        Ok(Self::from_entries_unchecked(kind, entries))
    }

    /// Freeze `entries` without validation.
    pub(crate) fn from_entries_unchecked(kind: CatalogKind, entries: Vec<VariantEntry>) -> Self {
        Self {
            id: CatalogId::compute(kind, &entries),
            entries,
        }
    }

    /// Parse a custom catalog from JSON:
    ///
    /// ```json
    /// {"name": "demo", "variants": [{"variant": "rs429358", "odds_ratio": 12.0, "gene": "APOE"}]}
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(CatalogKind::Custom(file.name), file.variants)
    }

    /// Load a custom catalog JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn id(&self) -> &CatalogId {
        &self.id
    }

    pub fn entries(&self) -> &[VariantEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slots used per vector: one per variant plus the contributor count.
    pub fn slot_len(&self) -> usize {
        self.entries.len() + 1
    }

    /// Fail with `SchemaMismatch` unless `other` is this catalog's identity.
    pub fn ensure_same(&self, other: &CatalogId) -> Result<()> {
        if &self.id != other {
            return Err(crate::error::schema_err!(
                "expected catalog {}, got {}",
                self.id,
                other
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identifier() {
        assert_eq!(
            VariantKey::parse("rs429358").unwrap(),
            VariantKey::ByIdentifier("rs429358".into())
        );
    }

    #[test]
    fn test_parse_coordinate() {
        let key: VariantKey = "19:44908684:C".parse().unwrap();
        assert_eq!(
            key,
            VariantKey::ByCoordinate {
                chrom: "19".into(),
                pos: 44908684,
                alt: "C".into()
            }
        );
        assert_eq!(key.to_string(), "19:44908684:C");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", ".", "rs 1", "19:abc:C", "19:0:C", ":5:C", "19:5:", "1:2:3:4"] {
            assert!(
                matches!(
                    VariantKey::parse(bad),
                    Err(GenomicsError::InvalidVariantSpecification(_))
                ),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_rejects_non_positive_odds_ratio() {
        let entries = vec![VariantEntry::new(
            VariantKey::ByIdentifier("rsA".into()),
            0.0,
            "A",
        )];
        assert!(matches!(
            VariantCatalog::new(CatalogKind::Custom("t".into()), entries),
            Err(GenomicsError::InvalidCatalogEntry(_))
        ));
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        let key = VariantKey::ByIdentifier("rsA".into());
        let entries = vec![
            VariantEntry::new(key.clone(), 1.5, "A"),
            VariantEntry::new(key, 2.0, "A"),
        ];
        assert!(VariantCatalog::new(CatalogKind::Custom("t".into()), entries).is_err());
        assert!(VariantCatalog::new(CatalogKind::Custom("t".into()), vec![]).is_err());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "name": "demo",
            "variants": [
                {"variant": "rsA", "odds_ratio": 12.0, "gene": "GENE1"},
                {"variant": "1:1000:T", "odds_ratio": 0.62, "gene": "GENE2"}
            ]
        }"#;
        let catalog = VariantCatalog::from_json(json).unwrap();
        assert_eq!(catalog.id().kind(), &CatalogKind::Custom("demo".into()));
        assert_eq!(catalog.id().display_name(), "demo");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[1].report_label(), "GENE2 (1:1000:T)");
    }

    #[test]
    fn test_from_json_bad_key() {
        let json = r#"{"name": "x", "variants": [{"variant": "1:x:T", "odds_ratio": 1.0, "gene": "G"}]}"#;
        assert!(VariantCatalog::from_json(json).is_err());
    }

    #[test]
    fn test_builtin_catalogs_are_distinct() {
        let ad = alzheimers_disease();
        let bc = breast_cancer();
        assert_eq!(ad.len(), 10);
        assert_eq!(bc.len(), 12);
        assert!(ad.ensure_same(bc.id()).is_err());
        assert!(ad.ensure_same(ad.id()).is_ok());
    }

    fn demo(rows: &[(&str, f64)]) -> VariantCatalog {
        let entries = rows
            .iter()
            .map(|&(id, or)| VariantEntry::new(VariantKey::ByIdentifier(id.into()), or, "G"))
            .collect();
        VariantCatalog::new(CatalogKind::Custom("demo".into()), entries).unwrap()
    }

    #[test]
    fn test_same_name_different_content_is_distinct() {
        let base = demo(&[("rsA", 1.5), ("rsB", 2.0)]);
        let reordered = demo(&[("rsB", 2.0), ("rsA", 1.5)]);
        let reweighted = demo(&[("rsA", 1.5), ("rsB", 2.5)]);

        for other in [&reordered, &reweighted] {
            assert_ne!(base.id(), other.id());
            assert!(matches!(
                base.ensure_same(other.id()),
                Err(GenomicsError::SchemaMismatch(_))
            ));
        }
        assert_eq!(base.id(), demo(&[("rsA", 1.5), ("rsB", 2.0)]).id());
    }

    #[test]
    fn test_id_display_carries_fingerprint() {
        let catalog = demo(&[("rsA", 1.5)]);
        let shown = catalog.id().to_string();
        assert!(shown.starts_with("demo ["));
        assert_eq!(catalog.id().short_fingerprint().len(), 8);
        assert!(shown.contains(&catalog.id().short_fingerprint()));
    }
}
