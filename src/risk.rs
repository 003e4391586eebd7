//! Single-party polygenic risk scoring
//!
//! Runs on one genome in the clear: no encryption, no aggregation. The score
//! is the log-odds weighted allele count `Σ g_i · ln(OR_i)`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::VariantCatalog;
use crate::encode::PlaintextVector;
use crate::error::{schema_err, GenomicsError, Result};

/// Scores strictly above this are HIGH
pub const HIGH_THRESHOLD: f64 = 1.2;
/// Scores strictly above this (and not HIGH) are MODERATE
pub const MODERATE_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub fn classify(score: f64) -> Self {
        if score > HIGH_THRESHOLD {
            Self::High
        } else if score > MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "LOW RISK",
            Self::Moderate => "MODERATE RISK",
            Self::High => "HIGH RISK",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScoreResult {
    pub score: f64,
    pub tier: RiskTier,
    pub narrative: String,
}

/// Renders the human-readable part of a [`RiskScoreResult`].
pub trait NarrativeFormatter {
    fn render(&self, condition: &str, score: f64, tier: RiskTier) -> String;
}

/// Uncoloured text layout: ruled title block, score, tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainNarrative;

impl NarrativeFormatter for PlainNarrative {
    fn render(&self, condition: &str, score: f64, tier: RiskTier) -> String {
        let rule = "=".repeat(60);
        format!(
            "\n{rule}\n{condition} Risk Assessment\n{rule}\n\n\
             Your polygenic risk score (PRS) is:  {score:.2}\n\n\
             {tier}\n\n{rule}\n",
            rule = rule,
            condition = condition,
            score = score,
            tier = tier.label(),
        )
    }
}

pub struct RiskScorer<'a, F = PlainNarrative> {
    catalog: &'a VariantCatalog,
    formatter: F,
}

impl<'a> RiskScorer<'a, PlainNarrative> {
    pub fn new(catalog: &'a VariantCatalog) -> Self {
        Self {
            catalog,
            formatter: PlainNarrative,
        }
    }
}

impl<'a, F: NarrativeFormatter> RiskScorer<'a, F> {
    pub fn with_formatter(catalog: &'a VariantCatalog, formatter: F) -> Self {
        Self { catalog, formatter }
    }

    pub fn score(&self, vector: &PlaintextVector) -> Result<RiskScoreResult> {
        self.catalog.ensure_same(vector.catalog())?;
        if vector.len() != self.catalog.len() {
            return Err(schema_err!(
                "vector has {} entries, catalog {} has {}",
                vector.len(),
                self.catalog.id(),
                self.catalog.len()
            ));
        }

        let mut score = 0.0;
        for (entry, &g) in self.catalog.entries().iter().zip(vector.genotypes()) {
            let or = entry.odds_ratio();
            if !(or.is_finite() && or > 0.0) {
                return Err(GenomicsError::InvalidCatalogEntry(format!(
                    "{} has odds ratio {}",
                    entry.report_label(),
                    or
                )));
            }
            score += g as f64 * or.ln();
        }

        let tier = RiskTier::classify(score);
        tracing::debug!(catalog = %self.catalog.id(), score, ?tier, "scored genome");

        Ok(RiskScoreResult {
            score,
            tier,
            narrative: self
                .formatter
                .render(self.catalog.id().display_name(), score, tier),
        })
    }
}

/// Score one genome with the plain narrative.
pub fn score(vector: &PlaintextVector, catalog: &VariantCatalog) -> Result<RiskScoreResult> {
    RiskScorer::new(catalog).score(vector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{breast_cancer, CatalogKind, VariantEntry, VariantKey};

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(RiskTier::classify(0.0), RiskTier::Low);
        assert_eq!(RiskTier::classify(0.8), RiskTier::Low);
        assert_eq!(RiskTier::classify(0.81), RiskTier::Moderate);
        assert_eq!(RiskTier::classify(1.2), RiskTier::Moderate);
        assert_eq!(RiskTier::classify(1.21), RiskTier::High);
        assert_eq!(RiskTier::classify(-3.0), RiskTier::Low);
    }

    #[test]
    fn test_plain_narrative_layout() {
        let text = PlainNarrative.render("Breast Cancer", 1.234, RiskTier::High);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "=".repeat(60));
        assert_eq!(lines[2], "Breast Cancer Risk Assessment");
        assert_eq!(lines[5], "Your polygenic risk score (PRS) is:  1.23");
        assert_eq!(lines[7], "HIGH RISK");
        assert!(!text.contains('\u{1b}'));
    }

    struct Terse;

    impl NarrativeFormatter for Terse {
        fn render(&self, _condition: &str, score: f64, tier: RiskTier) -> String {
            format!("{:.1} {:?}", score, tier)
        }
    }

    #[test]
    fn test_custom_formatter() {
        let catalog = breast_cancer();
        let mut g = vec![0u8; catalog.len()];
        g[8] = 1; // BRCA1, OR 5.0
        let v = PlaintextVector::new(&catalog, g).unwrap();
        let result = RiskScorer::with_formatter(&catalog, Terse).score(&v).unwrap();
        assert_eq!(result.narrative, "1.6 High");
        assert!((result.score - 5.0f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_tier_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&RiskTier::Moderate).unwrap(), "\"MODERATE\"");
    }

    #[test]
    fn test_unvalidated_odds_ratio_rejected() {
        for or in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let catalog = VariantCatalog::from_entries_unchecked(
                CatalogKind::Custom("raw".into()),
                vec![VariantEntry::new(VariantKey::ByIdentifier("rsA".into()), or, "G")],
            );
            let v = PlaintextVector::new(&catalog, vec![1]).unwrap();
            assert!(
                matches!(
                    RiskScorer::new(&catalog).score(&v),
                    Err(GenomicsError::InvalidCatalogEntry(_))
                ),
                "odds ratio {} should be rejected",
                or
            );
        }
    }
}
