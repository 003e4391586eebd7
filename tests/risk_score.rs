//! Polygenic risk score tests

use secure_genomics::catalog::alzheimers_disease;
use secure_genomics::risk::score;
use secure_genomics::{
    CatalogKind, GenomicsError, PlaintextVector, RiskScorer, RiskTier, VariantCatalog,
    VariantEntry, VariantKey,
};

fn catalog_with(odds: &[f64]) -> VariantCatalog {
    let entries = odds
        .iter()
        .enumerate()
        .map(|(i, &or)| {
            VariantEntry::new(VariantKey::ByIdentifier(format!("rs{}", i + 1)), or, "G")
        })
        .collect();
    VariantCatalog::new(CatalogKind::Custom("prs".into()), entries).unwrap()
}

#[test]
fn test_pair_scenario_is_high() {
    let catalog = catalog_with(&[12.0, 0.62]);
    let v = PlaintextVector::new(&catalog, vec![1, 1]).unwrap();
    let result = score(&v, &catalog).unwrap();

    assert!((result.score - (12.0f64.ln() + 0.62f64.ln())).abs() < 1e-12);
    assert!((result.score - 2.0069).abs() < 1e-3);
    assert_eq!(result.tier, RiskTier::High);
    assert!(result.narrative.contains("HIGH RISK"));
    assert!(result.narrative.contains("prs Risk Assessment"));
    assert!(result.narrative.contains("Your polygenic risk score (PRS) is:  2.01"));
}

#[test]
fn test_zero_vector_is_low() {
    let catalog = alzheimers_disease();
    let v = PlaintextVector::new(&catalog, vec![0; 10]).unwrap();
    let result = RiskScorer::new(&catalog).score(&v).unwrap();
    assert_eq!(result.score, 0.0);
    assert_eq!(result.tier, RiskTier::Low);
    assert!(result.narrative.contains("Alzheimer's Disease Risk Assessment"));
}

#[test]
fn test_tier_boundaries() {
    assert_eq!(RiskTier::classify(0.8), RiskTier::Low);
    assert_eq!(RiskTier::classify(1.2), RiskTier::Moderate);

    let catalog = catalog_with(&[1.0f64.exp()]);
    let v = PlaintextVector::new(&catalog, vec![1]).unwrap();
    assert_eq!(score(&v, &catalog).unwrap().tier, RiskTier::Moderate);
}

#[test]
fn test_score_is_linear() {
    let catalog = alzheimers_disease();
    let a = vec![1, 0, 2, 0, 1, 0, 0, 1, 2, 0];
    let b = vec![0, 1, 0, 2, 0, 1, 0, 0, 0, 1];
    let sum: Vec<u8> = a.iter().zip(&b).map(|(x, y)| x + y).collect();

    let s = |g: Vec<u8>| score(&PlaintextVector::new(&catalog, g).unwrap(), &catalog).unwrap().score;
    let (sa, sb, ssum) = (s(a), s(b), s(sum));
    assert!((ssum - (sa + sb)).abs() < 1e-9);

    let weighted: f64 = catalog
        .entries()
        .iter()
        .zip([1u8, 0, 2, 0, 1, 0, 0, 1, 2, 0])
        .map(|(e, g)| g as f64 * e.odds_ratio().ln())
        .sum();
    assert!((sa - weighted).abs() < 1e-12);
}

#[test]
fn test_catalog_mismatch_rejected() {
    let ad = alzheimers_disease();
    let other = catalog_with(&[1.5; 10]);
    let v = PlaintextVector::new(&other, vec![1; 10]).unwrap();
    assert!(matches!(
        score(&v, &ad),
        Err(GenomicsError::SchemaMismatch(_))
    ));
}

#[test]
fn test_non_positive_odds_ratio_rejected() {
    let entries = vec![VariantEntry::new(VariantKey::ByIdentifier("rs1".into()), -2.0, "G")];
    assert!(matches!(
        VariantCatalog::new(CatalogKind::Custom("bad".into()), entries),
        Err(GenomicsError::InvalidCatalogEntry(_))
    ));
}
