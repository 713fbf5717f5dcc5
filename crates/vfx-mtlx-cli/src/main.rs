//! mtlxgen - MaterialX color transform generator
//!
//! Lowers OCIO transform lists stored in a YAML library into MaterialX
//! nodedef/nodegraph documents.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vfx_mtlx::BoundaryType;

mod alias;
mod commands;

#[derive(Parser)]
#[command(name = "mtlxgen")]
#[command(author, version, about = "Generate MaterialX node graphs from OCIO transform lists")]
#[command(long_about = "
Lowers color-space conversions from a YAML transform library into MaterialX
nodedef/nodegraph documents. Matrix and exponent transforms become nodes;
everything else is skipped and reported.

Examples:
  mtlxgen list aces.yaml                            # Show spaces and conversions
  mtlxgen lower aces.yaml --from acescg --to lin_rec709
  mtlxgen lower aces.yaml --from acescg --to lin_rec709 -t color4 -o out.mtlx
  mtlxgen batch aces.yaml -o mtlx/ --target lin_rec709
  mtlxgen -j 4 batch aces.yaml -o mtlx/ --strict
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// List color spaces and conversions in a library
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Lower one conversion to a MaterialX document
    #[command(visible_alias = "l")]
    Lower(LowerArgs),

    /// Lower every conversion in a library
    #[command(visible_alias = "b")]
    Batch(BatchArgs),
}

/// Arguments for the `list` command.
#[derive(Args)]
struct ListArgs {
    /// Transform library (YAML)
    library: PathBuf,
}

/// Arguments for the `lower` command.
#[derive(Args)]
struct LowerArgs {
    /// Transform library (YAML)
    library: PathBuf,

    /// Source color space (name or alias)
    #[arg(short, long)]
    from: String,

    /// Target color space (name or alias)
    #[arg(long)]
    to: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Interface type: color3, color4, vector3
    #[arg(short = 't', long = "type", default_value = "color3", value_parser = parse_boundary)]
    boundary: BoundaryType,

    /// Fail if any transform has no node graph equivalent
    #[arg(long)]
    strict: bool,
}

/// Arguments for the `batch` command.
#[derive(Args)]
struct BatchArgs {
    /// Transform library (YAML)
    library: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Only conversions ending at this color space
    #[arg(long)]
    target: Option<String>,

    /// Interface type: color3, color4, vector3
    #[arg(short = 't', long = "type", default_value = "color3", value_parser = parse_boundary)]
    boundary: BoundaryType,

    /// Fail conversions with transforms that have no node graph equivalent
    #[arg(long)]
    strict: bool,
}

fn parse_boundary(s: &str) -> Result<BoundaryType, String> {
    BoundaryType::from_name(s)
        .ok_or_else(|| format!("unknown type '{}' (expected color3, color4 or vector3)", s))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::List(args) => commands::list::run(args, cli.verbose),
        Commands::Lower(args) => commands::lower::run(args, cli.verbose),
        Commands::Batch(args) => commands::batch::run(args, cli.verbose),
    }
}
