//! The `infobar process` command.

mod batch;
mod setup;
pub mod types;

pub use types::ReportFormat;

use clap::Args;
use infobar_core::Config;
use std::path::PathBuf;

use batch::run_batch;
use setup::setup_runner;

/// Arguments for the `process` command.
///
/// RAW files are developed at half the sensor resolution, one pixel per 2x2
/// block. Cameras rawloader cannot develop use their largest embedded preview.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Directory of photos to annotate (RAW files come out at half resolution)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Directory for annotated JPEGs [default: from config, "output"]
    #[arg(short, long, env = "INFOBAR_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum files processed at once [default: from config, 32]
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Directory of manufacturer logos named <Make>.jpg
    #[arg(long, env = "INFOBAR_LOGO_DIR")]
    pub logo_dir: Option<PathBuf>,

    /// Write a per-file run report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "json")]
    pub report_format: ReportFormat,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Execute the process command with the config loaded at startup.
pub async fn execute(args: ProcessArgs, config: Config) -> anyhow::Result<()> {
    let ctx = setup_runner(&args, config)?;

    let discovery = ctx.runner.discover(&args.input)?;
    if discovery.files.is_empty() {
        tracing::warn!("No supported image files found in {:?}", args.input);
        return Ok(());
    }
    tracing::info!(
        "Found {} image(s) to annotate ({:.1} MB)",
        discovery.files.len(),
        discovery.total_size() as f64 / (1024.0 * 1024.0)
    );

    run_batch(ctx, &args, discovery).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ProcessArgs,
    }

    #[test]
    fn test_process_args_defaults() {
        let cli = TestCli::try_parse_from(["infobar", "./photos"]).unwrap();
        assert_eq!(cli.args.input, PathBuf::from("./photos"));
        assert!(cli.args.workers.is_none());
        assert!(cli.args.report.is_none());
        assert!(matches!(cli.args.report_format, ReportFormat::Json));
        assert!(!cli.args.no_progress);
    }

    #[test]
    fn test_process_args_overrides() {
        let cli = TestCli::try_parse_from([
            "infobar",
            "./photos",
            "--output-dir",
            "/tmp/out",
            "-w",
            "4",
            "--report",
            "run.jsonl",
            "--report-format",
            "jsonl",
        ])
        .unwrap();
        assert_eq!(cli.args.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(cli.args.workers, Some(4));
        assert!(matches!(cli.args.report_format, ReportFormat::Jsonl));
    }

    #[test]
    fn test_process_args_require_input() {
        assert!(TestCli::try_parse_from(["infobar"]).is_err());
    }
}
