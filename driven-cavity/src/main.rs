use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use driven_cavity::relaxation::Scheme;
use driven_cavity::{Config, OutputWriter, RunState, Solver};

/// Lid-driven cavity solver
#[derive(Parser)]
#[command(name = "driven-cavity")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Artificial-compressibility solver for the 2-D lid-driven cavity", long_about = None)]
struct Cli {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Restart file to resume from
    #[arg(short, long)]
    restart: Option<PathBuf>,

    /// Relaxation scheme
    #[arg(long, value_enum)]
    scheme: Option<Scheme>,

    /// Iteration budget
    #[arg(long)]
    max_iterations: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    // Command line wins over the file
    if let Some(output) = cli.output {
        config.output.directory = output;
    }
    if let Some(restart) = cli.restart {
        config.run.restart = Some(restart);
    }
    if let Some(scheme) = cli.scheme {
        config.numerics.scheme = scheme;
    }
    if let Some(max_iterations) = cli.max_iterations {
        config.numerics.max_iterations = max_iterations;
    }
    config.validate()?;
    config.print_summary();

    let mut solver = Solver::new(&config).context("Failed to initialise solver")?;
    let mut output = OutputWriter::create(&config.output, config.run.manufactured_solution)
        .context("Failed to open output files")?;

    let start = Instant::now();
    let summary = solver.run(&mut output)?;
    let elapsed = start.elapsed();

    info!(
        "Finished in {:.2?}: {:?} after {} iterations (t = {:e} s)",
        elapsed, summary.state, summary.iterations, summary.time
    );
    info!("Output written to {}", output.directory().display());

    if summary.state != RunState::Converged {
        info!("Resume with --restart {}", output.restart_path().display());
    }
    Ok(())
}
