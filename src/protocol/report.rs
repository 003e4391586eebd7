//! Allele frequency reports

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::VariantCatalog;
use crate::error::{schema_err, Result};

use super::decode::DecryptedAggregate;

/// Per-variant report entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub odds_ratio: f64,
    pub allele_frequency: f64,
}

/// Population-level result of one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlleleFrequencyReport {
    pub num_genomes: u64,
    /// Frequencies in catalog order
    pub allele_frequencies_vector: Vec<f64>,
    /// Keyed by `"{gene_label} ({variant_id})"`
    pub allele_frequencies_map: BTreeMap<String, FrequencyEntry>,
}

impl AlleleFrequencyReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Joins decoded aggregates with the catalog they were encoded under.
#[derive(Debug, Clone, Copy)]
pub struct FrequencyReporter<'a> {
    catalog: &'a VariantCatalog,
}

impl<'a> FrequencyReporter<'a> {
    pub fn new(catalog: &'a VariantCatalog) -> Self {
        Self { catalog }
    }

    pub fn report(&self, aggregate: &DecryptedAggregate) -> Result<AlleleFrequencyReport> {
        self.catalog.ensure_same(aggregate.catalog())?;
        if aggregate.allele_sums().len() != self.catalog.len() {
            return Err(schema_err!(
                "aggregate has {} variant slots, catalog {} has {}",
                aggregate.allele_sums().len(),
                self.catalog.id(),
                self.catalog.len()
            ));
        }

        let frequencies = aggregate.frequencies()?;
        let allele_frequencies_map = self
            .catalog
            .entries()
            .iter()
            .zip(&frequencies)
            .map(|(entry, &freq)| {
                tracing::debug!(
                    variant = %entry.key(),
                    gene = entry.gene_label(),
                    frequency = freq,
                    "variant frequency"
                );
                (
                    entry.report_label(),
                    FrequencyEntry {
                        odds_ratio: entry.odds_ratio(),
                        allele_frequency: freq,
                    },
                )
            })
            .collect();

        tracing::info!(
            catalog = %self.catalog.id(),
            num_genomes = aggregate.num_genomes(),
            variants = self.catalog.len(),
            "built allele frequency report"
        );

        Ok(AlleleFrequencyReport {
            num_genomes: aggregate.num_genomes(),
            allele_frequencies_vector: frequencies,
            allele_frequencies_map,
        })
    }
}

/// Shorthand for `FrequencyReporter::new(catalog).report(aggregate)`.
pub fn report(aggregate: &DecryptedAggregate, catalog: &VariantCatalog) -> Result<AlleleFrequencyReport> {
    FrequencyReporter::new(catalog).report(aggregate)
}
