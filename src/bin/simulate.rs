//! sg-simulate: run one complete aggregation round locally
//!
//! Plays every role in turn (key holder, contributors, aggregator) and
//! prints the resulting allele frequency report as JSON.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use eyre::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use secure_genomics::catalog::{alzheimers_disease, breast_cancer};
use secure_genomics::math::GaussianSampler;
use secure_genomics::{
    encode, report, AggregationCircuit, FheParams, PlaintextVector, PrivateContext, PublicContext,
    RecordMap, RiskScorer, VariantCatalog,
};

#[derive(Parser)]
#[command(name = "sg-simulate")]
#[command(about = "Simulate a privacy-preserving allele frequency round")]
#[command(version)]
struct Args {
    /// Built-in catalog (`alzheimers`, `breast-cancer`) or path to a catalog JSON file
    #[arg(long, default_value = "alzheimers")]
    catalog: String,

    /// Number of synthetic contributors (ignored when genotype files are given)
    #[arg(long, default_value = "100")]
    contributors: usize,

    /// Genotype record JSON files, one per contributor
    #[arg(long, num_args = 1..)]
    genotypes: Vec<PathBuf>,

    /// Ring dimension (2048 or 4096)
    #[arg(long, default_value = "2048")]
    ring_dim: usize,

    /// Random seed for deterministic keys, genotypes and encryption (optional)
    #[arg(long)]
    seed: Option<u64>,

    /// Also print the first contributor's risk assessment
    #[arg(long)]
    risk: bool,
}

fn load_catalog(spec: &str) -> Result<VariantCatalog> {
    match spec {
        "alzheimers" => Ok(alzheimers_disease()),
        "breast-cancer" => Ok(breast_cancer()),
        path => VariantCatalog::load(Path::new(path))
            .with_context(|| format!("Failed to load catalog from {}", path)),
    }
}

/// Genotypes drawn per variant from a per-round allele frequency in [0.05, 0.5).
fn synthetic_cohort(
    catalog: &VariantCatalog,
    count: usize,
    rng: &mut ChaCha20Rng,
) -> Result<Vec<PlaintextVector>> {
    let freqs: Vec<f64> = (0..catalog.len()).map(|_| rng.gen_range(0.05..0.5)).collect();
    (0..count)
        .map(|_| -> Result<PlaintextVector> {
            let genotypes = freqs
                .iter()
                .map(|&f| rng.gen_bool(f) as u8 + rng.gen_bool(f) as u8)
                .collect();
            Ok(PlaintextVector::new(catalog, genotypes)?)
        })
        .collect()
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let params = match args.ring_dim {
        2048 => FheParams::secure_128_d2048(),
        4096 => FheParams::secure_128_d4096(),
        _ => {
            return Err(eyre::eyre!(
                "Invalid ring dimension: {}. Must be 2048 or 4096",
                args.ring_dim
            ));
        }
    };

    let catalog = load_catalog(&args.catalog)?;
    info!("Catalog: {} ({} variants)", catalog.id(), catalog.len());

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    let vectors = if args.genotypes.is_empty() {
        info!("Generating {} synthetic contributors", args.contributors);
        synthetic_cohort(&catalog, args.contributors, &mut rng)?
    } else {
        args.genotypes
            .iter()
            .map(|path| -> Result<PlaintextVector> {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let records = RecordMap::from_json(&json)
                    .with_context(|| format!("Failed to parse {}", path.display()))?;
                Ok(encode(&records, &catalog)?)
            })
            .collect::<Result<Vec<_>>>()?
    };

    let total_start = Instant::now();

    info!("Key holder: generating encryption context (d={})", params.ring_dim);
    let private = PrivateContext::generate_with_seed(&params, rng.gen())?;
    let public_bytes = private.public().to_bytes()?;
    info!("Public context: {} bytes", public_bytes.len());
    let public = PublicContext::from_bytes(&public_bytes)?;

    info!("Contributors: encrypting {} vectors", vectors.len());
    let pb = ProgressBar::new(vectors.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );
    let mut sampler = GaussianSampler::with_seed(params.sigma, rng.gen());
    let mut submissions = Vec::with_capacity(vectors.len());
    for v in &vectors {
        submissions.push(public.encrypt_with_sampler(v, &mut sampler)?);
        pb.inc(1);
    }
    pb.finish_with_message("Done");

    info!("Aggregator: combining ciphertexts");
    let agg_start = Instant::now();
    let circuit = AggregationCircuit::new(&params, &catalog)?;
    let aggregate = circuit.aggregate(&submissions)?;
    info!(
        "Aggregate: {} contributors, {} bytes, {:.2?}",
        aggregate.contributors(),
        aggregate.to_bytes()?.len(),
        agg_start.elapsed()
    );

    info!("Key holder: decrypting aggregate");
    let decrypted = private.decrypt(&aggregate)?;
    let freq_report = report(&decrypted, &catalog)?;
    info!("Round complete in {:.2?}", total_start.elapsed());

    println!("{}", freq_report.to_json()?);

    if args.risk {
        if let Some(first) = vectors.first() {
            let result = RiskScorer::new(&catalog).score(first)?;
            println!("{}", result.narrative);
        }
    }

    Ok(())
}
