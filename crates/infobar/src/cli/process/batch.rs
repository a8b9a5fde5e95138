//! Batch run with a progress bar, summary table and optional report file.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use infobar_core::pipeline::Discovery;
use infobar_core::{BatchReport, JobOutcome, OutputWriter};

use super::setup::ProcessContext;
use super::ProcessArgs;

/// Annotate every discovered file, then summarize and write the report.
pub async fn run_batch(
    ctx: ProcessContext,
    args: &ProcessArgs,
    discovery: Discovery,
) -> anyhow::Result<()> {
    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        create_progress_bar(discovery.files.len() as u64)
    };

    let bar = progress.clone();
    let report = ctx
        .runner
        .run_discovered(discovery, move |outcome: &JobOutcome| {
            bar.inc(1);
            if let JobOutcome::Failed { source, stage, .. } = outcome {
                bar.set_message(format!("{} failed ({stage})", file_name(source)));
            }
        })
        .await?;
    progress.finish_and_clear();

    print_summary(&report, &ctx.config.output.dir);

    if let Some(path) = &args.report {
        let records = write_report(&report, path, args)?;
        tracing::info!(
            "Report written to {:?} ({} {} record(s))",
            path,
            records,
            args.report_format
        );
    }
    Ok(())
}

/// Write the run report, returning how many records it holds.
fn write_report(report: &BatchReport, path: &Path, args: &ProcessArgs) -> anyhow::Result<usize> {
    let file = File::create(path)?;
    let mut writer = OutputWriter::new(BufWriter::new(file), args.report_format.into(), true);
    writer.write_outcomes(&report.outcomes)?;
    writer.flush()?;
    Ok(writer.items_written())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    ) {
        pb.set_style(style.progress_chars("##-"));
    }
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after the batch.
fn print_summary(report: &BatchReport, output_dir: &Path) {
    let total = report.outcomes.len() + report.skipped;

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Written:      {:>8}", report.succeeded());
    if report.failed() > 0 {
        eprintln!("    Failed:       {:>8}", report.failed());
    }
    if report.skipped > 0 {
        eprintln!("    Skipped:      {:>8}", report.skipped);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", total);
    eprintln!("    Duration:     {:>7.1}s", report.elapsed.as_secs_f64());
    eprintln!("    Rate:         {:>7.1} img/sec", report.rate());
    eprintln!("    Output:       {}", output_dir.display());
    eprintln!("  ====================================");

    for outcome in &report.outcomes {
        if let JobOutcome::Failed {
            source, message, ..
        } = outcome
        {
            eprintln!("    ✗ {}: {}", file_name(source), message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::process::ReportFormat;
    use std::path::PathBuf;
    use std::time::Duration;

    fn report() -> BatchReport {
        BatchReport {
            outcomes: vec![
                JobOutcome::Written {
                    source: PathBuf::from("in/a.png"),
                    output: PathBuf::from("output/a.jpg"),
                    elapsed_ms: 40,
                },
                JobOutcome::Failed {
                    source: PathBuf::from("in/b.cr2"),
                    stage: "raw-decode".into(),
                    message: "RAW decode error".into(),
                    elapsed_ms: 5,
                },
            ],
            skipped: 1,
            elapsed: Duration::from_millis(500),
        }
    }

    fn args(format: ReportFormat) -> ProcessArgs {
        ProcessArgs {
            input: PathBuf::from("in"),
            output_dir: None,
            workers: None,
            logo_dir: None,
            report: None,
            report_format: format,
            no_progress: true,
        }
    }

    #[test]
    fn test_write_report_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.jsonl");
        let records = write_report(&report(), &path, &args(ReportFormat::Jsonl)).unwrap();
        assert_eq!(records, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["status"], "written");
        assert_eq!(lines[1]["stage"], "raw-decode");
    }

    #[test]
    fn test_write_report_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        write_report(&report(), &path, &args(ReportFormat::Json)).unwrap();

        let parsed: Vec<JobOutcome> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed[0].is_success());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(Path::new("/x/y/IMG_1.CR2")), "IMG_1.CR2");
    }
}
