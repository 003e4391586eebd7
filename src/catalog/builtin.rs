//! Built-in catalogs.
//!
//! Odds ratios are per risk allele, taken from published GWAS and
//! case-control estimates.

use super::{CatalogKind, VariantCatalog, VariantEntry, VariantKey};

fn build(kind: CatalogKind, rows: &[(&str, f64, &str)]) -> VariantCatalog {
    let entries = rows
        .iter()
        .map(|&(rsid, or, gene)| {
            VariantEntry::new(VariantKey::ByIdentifier(rsid.to_string()), or, gene)
        })
        .collect();
    // Static tables: every row has a unique rsID and a positive odds ratio.
    VariantCatalog::from_entries_unchecked(kind, entries)
}

/// Late-onset Alzheimer's disease, 10 variants.
pub fn alzheimers_disease() -> VariantCatalog {
    build(
        CatalogKind::AlzheimersDisease,
        &[
            ("rs429358", 12.0, "APOE ε4"),
            ("rs7412", 0.62, "APOE ε2"),
            ("rs2075650", 4.18, "TOMM40"),
            ("rs199768005", 0.10, "APOE rare"),
            ("rs6857", 1.27, "NECTIN2"),
            ("rs11136000", 1.19, "CLU"),
            ("rs3851179", 1.18, "PICALM"),
            ("rs6733839", 1.22, "BIN1"),
            ("rs6656401", 1.18, "CR1"),
            ("rs3764650", 1.23, "ABCA7"),
        ],
    )
}

/// Breast cancer, 12 variants.
pub fn breast_cancer() -> VariantCatalog {
    build(
        CatalogKind::BreastCancer,
        &[
            ("rs2981579", 1.27, "FGFR2"),
            ("rs3803662", 1.28, "TOX3"),
            ("rs1045485", 1.10, "CASP8"),
            ("rs2981582", 1.26, "FGFR2"),
            ("rs1801516", 1.10, "ATM"),
            ("rs17879961", 1.50, "CHEK2"),
            ("rs11515", 1.10, "CDKN2A"),
            ("rs25487", 1.10, "XRCC1"),
            ("rs80357713", 5.00, "BRCA1"),
            ("rs11571833", 1.53, "BRCA2"),
            ("rs180177102", 3.00, "PALB2"),
            ("rs555607708", 2.34, "CHEK2"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_pass_validation() {
        for catalog in [alzheimers_disease(), breast_cancer()] {
            let rebuilt = VariantCatalog::new(catalog.id().kind().clone(), catalog.entries().to_vec());
            assert_eq!(rebuilt.unwrap(), catalog);
        }
    }

    #[test]
    fn test_report_labels() {
        let ad = alzheimers_disease();
        assert_eq!(ad.entries()[0].report_label(), "APOE ε4 (rs429358)");
        assert_eq!(ad.entries()[0].odds_ratio(), 12.0);
    }
}
