use cascade_matcher::raster::io::load_raster;
use cascade_matcher::{run, OrchestratorConfig};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Locate rotated and rescaled instances of one or more query images inside
/// a target image.
#[derive(Parser, Debug)]
#[command(author, version, about = "cascade-matcher: rotation/scale-invariant template search")]
struct Cli {
    /// Worker thread count for the matching sweep; 0 uses the platform default.
    max_threads: i64,
    /// Upper bound of the per-query scale sweep, as a multiple of the query's own size.
    max_scale: f32,
    /// Path to the target image to search within.
    target_path: PathBuf,
    /// Paths to one or more query (pattern) images, assigned query_id 1, 2, ...
    #[arg(required = true)]
    query_paths: Vec<PathBuf>,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.trace {
        let filter = EnvFilter::from_default_env().add_directive("cascade_matcher=info".parse().unwrap());
        tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
    }

    if let Err(err) = run_cli(cli) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run_cli(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let target = load_raster(&cli.target_path)?;
    let mut queries = Vec::with_capacity(cli.query_paths.len());
    for path in &cli.query_paths {
        queries.push(load_raster(path)?);
    }

    let mut cfg = OrchestratorConfig::default();
    cfg.thread_count = cli.max_threads;
    cfg.index.max_scale = cli.max_scale;

    let mut matches = run(target, queries, &cfg)?;
    matches.sort_by_key(|m| (m.query_id, m.x, m.y));

    for m in matches {
        println!("{}\t{}\t{}", m.query_id, m.x, m.y);
    }
    Ok(())
}
