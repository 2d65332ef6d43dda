//! Cluster tab-separated feature records with sparse k-means.
//!
//! Usage: `sparse-kmeans <K> <DATA> [--init random|kmeans++] [--max-iters N] [--seed S]`
//!
//! Each input line is `label<TAB>feature<TAB>weight...`. Assignments are
//! written to stdout as `label<TAB>cluster`; logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use sparse_kmeans::io::{load_dataset, write_assignments, write_vectors};
use sparse_kmeans::{InitMethod, KMeansConfig, SparseKMeans, Termination};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing::{info, warn};

/// Parallel k-means clustering of sparse feature records.
#[derive(Parser, Debug)]
#[command(name = "sparse-kmeans", version, about)]
struct Cli {
    /// Number of clusters
    k: usize,

    /// Input file, one `label<TAB>feature<TAB>weight...` record per line
    data: PathBuf,

    /// Center initialization: `kmeans++` or `random`
    #[arg(long, default_value_t = InitMethod::KMeansPlusPlus)]
    init: InitMethod,

    /// Maximum number of assign/update iterations
    #[arg(long, default_value_t = 10)]
    max_iters: usize,

    /// Seed for center initialization (entropy-seeded when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Print the parsed vectors to stdout before clustering
    #[arg(long)]
    dump_vectors: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let report = load_dataset(&cli.data)
        .with_context(|| format!("failed to read {}", cli.data.display()))?;
    // Each skipped line was already logged by the loader.
    if !report.skipped.is_empty() {
        warn!(
            count = report.skipped.len(),
            "Skipped malformed records in {}",
            cli.data.display()
        );
    }

    let stdout = io::stdout();
    if cli.dump_vectors {
        write_vectors(BufWriter::new(stdout.lock()), &report.dataset, &report.dictionary)
            .context("failed to write vectors")?;
    }

    let mut config = KMeansConfig::new(cli.k)
        .with_init(cli.init)
        .with_max_iters(cli.max_iters);
    config.seed = cli.seed;

    let mut kmeans = SparseKMeans::with_config(config);
    let clustering = kmeans
        .fit_predict(&report.dataset)
        .context("clustering failed")?;

    match clustering.termination {
        Termination::Converged => info!(
            iterations = clustering.n_iterations,
            inertia = clustering.inertia,
            "Clustering converged"
        ),
        Termination::IterationLimitReached => warn!(
            iterations = clustering.n_iterations,
            "Reached the iteration cap before assignments stabilized"
        ),
    }
    if !clustering.empty_clusters.is_empty() {
        warn!(
            count = clustering.empty_clusters.len(),
            "Some clusters ended up empty"
        );
    }

    write_assignments(BufWriter::new(stdout.lock()), &report.dataset, &clustering)
        .context("failed to write assignments")?;

    Ok(())
}
