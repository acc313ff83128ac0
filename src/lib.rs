//! Blackout: automated image redaction for detection pipelines.
//!
//! Blackout watches a directory for images produced by an upstream object
//! detector, correlates each image with its YOLO-style label file, and
//! writes a copy with the sensitive regions blacked out. The decision of
//! *whether* to redact and *what* to paint is driven by a class-based
//! [`policy::RedactionPolicy`].
//!
//! # Modules
//!
//! - [`labels`]: detection records, label-file parsing, pixel-rect resolution
//! - [`policy`]: redaction gating and per-detection selection
//! - [`redact`]: image loading, region fill, and output persistence
//! - [`pipeline`]: the per-image job that ties the above together
//! - [`watch`]: the directory watcher / dispatcher
//! - [`error`]: error types for blackout operations

pub mod error;
pub mod labels;
pub mod pipeline;
pub mod policy;
pub mod redact;
pub mod watch;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

pub use error::BlackoutError;

use pipeline::{JobOutcome, PipelineConfig};
use policy::RedactionPolicy;
use watch::{StopHandle, DEFAULT_POLL_INTERVAL};

/// The blackout CLI application.
#[derive(Parser)]
#[command(name = "blackout")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Watch a directory and redact new images as they appear.
    Watch(WatchArgs),

    /// Run the redaction pipeline once, for a single image.
    Redact(RedactArgs),
}

/// Arguments for the watch subcommand.
#[derive(clap::Args)]
struct WatchArgs {
    /// Directory to watch for new detection images.
    #[arg(long)]
    images: PathBuf,

    /// Directory holding the matching label files.
    #[arg(long)]
    labels: PathBuf,

    /// Directory to write redacted copies to.
    #[arg(long)]
    output: PathBuf,

    /// Stop-flag poll interval in milliseconds.
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    poll_ms: u64,

    /// Optional TOML file overriding the default redaction policy.
    #[arg(long)]
    policy: Option<PathBuf>,
}

/// Arguments for the redact subcommand.
#[derive(clap::Args)]
struct RedactArgs {
    /// Image to run through the pipeline.
    image: PathBuf,

    /// Directory holding the matching label files.
    #[arg(long)]
    labels: PathBuf,

    /// Directory to write the redacted copy to.
    #[arg(long)]
    output: PathBuf,

    /// Optional TOML file overriding the default redaction policy.
    #[arg(long)]
    policy: Option<PathBuf>,
}

/// Run the blackout CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), BlackoutError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Watch(args)) => run_watch(args),
        Some(Commands::Redact(args)) => run_redact(args),
        None => {
            println!("blackout {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Automated image redaction for detection pipelines.");
            println!();
            println!("Run 'blackout --help' for usage information.");
            Ok(())
        }
    }
}

fn load_policy(path: Option<&PathBuf>) -> Result<RedactionPolicy, BlackoutError> {
    match path {
        Some(path) => RedactionPolicy::from_toml_file(path),
        None => Ok(RedactionPolicy::default()),
    }
}

/// Execute the watch subcommand. Runs until the process is terminated.
fn run_watch(args: WatchArgs) -> Result<(), BlackoutError> {
    let config = PipelineConfig {
        images_dir: args.images,
        labels_dir: args.labels,
        output_dir: args.output,
    };
    let policy = load_policy(args.policy.as_ref())?;

    // The handle is never signalled from the CLI itself; library embedders
    // and tests use it for clean shutdown.
    let stop = StopHandle::new();
    watch::watch(&config, &policy, &stop, Duration::from_millis(args.poll_ms))
}

/// Execute the redact subcommand: one synchronous pipeline run.
fn run_redact(args: RedactArgs) -> Result<(), BlackoutError> {
    let image = args.image;
    let config = PipelineConfig {
        images_dir: image
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
        labels_dir: args.labels,
        output_dir: args.output,
    };
    config.validate()?;
    let policy = load_policy(args.policy.as_ref())?;

    match pipeline::process_image(&config, &policy, &image)? {
        JobOutcome::Redacted { output, regions } => {
            println!(
                "redacted {} -> {} ({} region(s))",
                image.display(),
                output.display(),
                regions
            );
        }
        JobOutcome::Skipped(reason) => {
            println!("skipped {} ({reason})", image.display());
        }
    }

    Ok(())
}
