//main.rs
use anyhow::Context;
use clap::{Parser, ValueEnum};
use env_logger::Env;
use lloyd_kmeans::init::DEFAULT_SEED;
use lloyd_kmeans::output::{self, DEFAULT_PRECISION};
use lloyd_kmeans::{DataSet, EmptyClusterPolicy, Init, KMeansConfig};
use std::process::ExitCode;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InitMethod {
    /// Start from the first K observations
    First,
    /// k-means++ seeding
    PlusPlus,
}

#[derive(Parser)]
#[clap(version, author = "Stefan L. <stefan.lang@med.lu.se>")]
struct Opts {
    /// Number of clusters
    #[clap(allow_negative_numbers = true)]
    k: i64,

    /// Number of observations
    #[clap(allow_negative_numbers = true)]
    n: i64,

    /// Number of dimensions
    #[clap(allow_negative_numbers = true)]
    d: i64,

    /// Maximum number of iterations
    #[clap(allow_negative_numbers = true)]
    max_iter: i64,

    /// Comma separated observations file; stdin is read when missing
    #[clap(short, long)]
    input: Option<String>,

    #[clap(long, value_enum, default_value_t = InitMethod::First)]
    init: InitMethod,

    /// Seed for k-means++
    #[clap(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Decimal places in the centroid table
    #[clap(short, long, default_value_t = DEFAULT_PRECISION)]
    precision: usize,

    /// Abort when a cluster ends up empty instead of keeping its centroid
    #[clap(long)]
    fail_on_empty_cluster: bool,
}

fn run(opts: Opts) -> anyhow::Result<()> {
    let policy = if opts.fail_on_empty_cluster {
        EmptyClusterPolicy::Fail
    } else {
        EmptyClusterPolicy::Retain
    };
    let config = KMeansConfig::from_signed(opts.k, opts.n, opts.d, opts.max_iter)
        .context("invalid command line arguments")?
        .with_empty_cluster_policy(policy);

    let ds = match &opts.input {
        Some(path) => DataSet::from_csv(path, config.n, config.d)
            .with_context(|| format!("failed to read observations from {path}"))?,
        None => DataSet::from_reader(std::io::stdin().lock(), config.n, config.d)
            .context("failed to read observations from stdin")?,
    };

    let init = match opts.init {
        InitMethod::First => Init::FirstK,
        InitMethod::PlusPlus => Init::PlusPlus { seed: opts.seed },
    };

    let (centroids, indices, summary) = ds.kmeans(&config, &init)?;
    log::info!(
        "{} iterations, converged: {}, empty clusters: {}",
        summary.iterations,
        summary.converged,
        summary.empty_clusters
    );

    if matches!(init, Init::PlusPlus { .. }) {
        println!("{}", output::format_indices(&indices));
    }
    output::write_centroids(std::io::stdout().lock(), centroids.view(), opts.precision)?;

    Ok(())
}

fn main() -> ExitCode {
    let opts = Opts::parse();

    let env = Env::default().filter_or("RUST_LOG", "warn");
    env_logger::init_from_env(env);

    match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
