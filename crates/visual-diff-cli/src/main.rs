//! visual-diff command-line entry point.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use visual_diff::{OverlayStyle, DEFAULT_THRESHOLD, EDGE_PAD_PX};
use visual_diff_cli::config::{overlay_style, resolve_output_path, resolve_threshold};
use visual_diff_cli::error::exit_codes;
use visual_diff_cli::regions::{load_ignore_regions, parse_ignore_regions};
use visual_diff_cli::{run_compare, CliResult, CompareRequest};

#[derive(Parser)]
#[command(
    name = "visual-diff",
    about = "Compare two screenshots and render the changed pixels as an overlay",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Diff two images and print a JSON report.
    Compare {
        /// Before image (path or data URI).
        before: String,

        /// After image (path or data URI). Resampled to the before size if needed.
        after: String,

        /// Per-pixel channel difference threshold (0-255).
        /// Also reads from VISUAL_DIFF_THRESHOLD env var.
        #[arg(short, long, allow_negative_numbers = true)]
        threshold: Option<i64>,

        /// Ignore regions as a JSON array of {x, y, w, h} fractions.
        #[arg(long, conflicts_with = "ignore_regions_file")]
        ignore_regions: Option<String>,

        /// File containing ignore regions as a JSON array.
        #[arg(long)]
        ignore_regions_file: Option<PathBuf>,

        /// Overlay output path (PNG).
        /// Also reads from VISUAL_DIFF_OUT env var.
        #[arg(short, long)]
        out: Option<String>,

        /// Also write the change mask as a black/white PNG.
        #[arg(long)]
        mask_out: Option<PathBuf>,

        /// Highlight alpha (0-255).
        #[arg(long)]
        alpha: Option<u8>,

        /// Exit with code 3 when the change percentage exceeds this value.
        #[arg(long)]
        fail_above: Option<f64>,
    },

    /// Print default settings as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   visual-diff completions bash > ~/.local/share/bash-completion/completions/visual-diff
    ///   visual-diff completions zsh > ~/.zfunc/_visual-diff
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Compare {
            before,
            after,
            threshold,
            ignore_regions,
            ignore_regions_file,
            out,
            mask_out,
            alpha,
            fail_above,
        } => {
            let request = match build_request(
                before,
                after,
                threshold,
                ignore_regions,
                ignore_regions_file,
                out,
                mask_out,
                alpha,
            ) {
                Ok(req) => req,
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(e.exit_code());
                }
            };

            let report = match run_compare(&request) {
                Ok(report) => report,
                Err(e) => {
                    eprintln!("Comparison failed: {e}");
                    std::process::exit(e.exit_code());
                }
            };

            println!("{}", serde_json::to_string_pretty(&report)?);

            if let Some(limit) = fail_above {
                if report.exceeds(limit) {
                    tracing::warn!(
                        "Change {}% exceeds limit {limit}%",
                        report.diff_percentage
                    );
                    std::process::exit(exit_codes::DIFF_ABOVE_LIMIT);
                }
            }
        }

        Commands::Info => {
            let style = OverlayStyle::default();
            let info = serde_json::json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "default_threshold": DEFAULT_THRESHOLD,
                "edge_pad_px": EDGE_PAD_PX,
                "highlight": {
                    "color": style.color,
                    "alpha": style.alpha,
                },
                "metric": "max_abs_channel_diff",
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "visual-diff", &mut std::io::stdout());
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn build_request(
    before: String,
    after: String,
    threshold: Option<i64>,
    ignore_regions: Option<String>,
    ignore_regions_file: Option<PathBuf>,
    out: Option<String>,
    mask_out: Option<PathBuf>,
    alpha: Option<u8>,
) -> CliResult<CompareRequest> {
    let threshold = resolve_threshold(threshold)?;

    let regions = match (ignore_regions, ignore_regions_file) {
        (Some(json), _) => parse_ignore_regions(&json)?,
        (None, Some(path)) => load_ignore_regions(&path)?,
        (None, None) => Vec::new(),
    };

    let out = resolve_output_path(out.as_deref(), &before);

    Ok(CompareRequest {
        before,
        after,
        threshold,
        ignore_regions: regions,
        style: overlay_style(alpha),
        out,
        mask_out,
    })
}
