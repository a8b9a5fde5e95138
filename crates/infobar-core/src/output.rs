//! Run reports in JSON or JSON Lines.
//!
//! A report is the list of [`JobOutcome`]s of a batch: one record per file
//! with its output path or the stage that failed.

use serde::Serialize;
use std::io::{self, Write};

use crate::types::JobOutcome;

/// Report format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// A single JSON array
    #[default]
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

/// Serializes job outcomes to a writer.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    items_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects the JSON format; JSON Lines is always compact.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            items_written: 0,
        }
    }

    /// Write one record as a line. Used to stream outcomes as they finish.
    pub fn write_line<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        writeln!(self.writer)?;
        self.items_written += 1;
        Ok(())
    }

    /// Write a whole batch: an array for JSON, one line each for JSON Lines.
    pub fn write_outcomes(&mut self, outcomes: &[JobOutcome]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, outcomes)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, outcomes).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
                self.items_written += outcomes.len();
            }
            OutputFormat::JsonLines => {
                for outcome in outcomes {
                    self.write_line(outcome)?;
                }
            }
        }
        Ok(())
    }

    /// Records written so far.
    pub fn items_written(&self) -> usize {
        self.items_written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn outcomes() -> Vec<JobOutcome> {
        vec![
            JobOutcome::Written {
                source: PathBuf::from("in/a.png"),
                output: PathBuf::from("output/a.jpg"),
                elapsed_ms: 12,
            },
            JobOutcome::Failed {
                source: PathBuf::from("in/b.cr2"),
                stage: "raw-decode".to_string(),
                message: "no embedded preview".to_string(),
                elapsed_ms: 3,
            },
        ]
    }

    #[test]
    fn test_write_json_array() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, false);
        writer.write_outcomes(&outcomes()).unwrap();
        assert_eq!(writer.items_written(), 2);

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.starts_with('['));
        assert!(output.trim().ends_with(']'));

        let parsed: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["status"], "written");
        assert_eq!(parsed[1]["status"], "failed");
        assert_eq!(parsed[1]["stage"], "raw-decode");
    }

    #[test]
    fn test_write_jsonl() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::JsonLines, true);
        writer.write_outcomes(&outcomes()).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        let first: JobOutcome = serde_json::from_str(lines[0]).unwrap();
        assert!(first.is_success());
        assert!(lines[1].contains("\"source\":\"in/b.cr2\""));
    }
}
