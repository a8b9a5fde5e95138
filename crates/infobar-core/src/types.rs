//! Core data types for the infobar annotation pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::LabelsConfig;

/// Brand names stripped from the EXIF model before it is drawn next to the
/// logo. Longer names come first so "NIKON CORPORATION" wins over "NIKON".
const BRAND_NAMES: &[&str] = &[
    "OM Digital Solutions",
    "NIKON CORPORATION",
    "HASSELBLAD",
    "Panasonic",
    "FUJIFILM",
    "OLYMPUS",
    "Xiaomi",
    "HUAWEI",
    "PENTAX",
    "Canon",
    "NIKON",
    "RICOH",
    "SIGMA",
    "Apple",
    "LEICA",
    "Leica",
    "SONY",
    "DJI",
];

/// Capture metadata resolved once per file.
///
/// Every field is optional: cameras routinely omit tags, and each consumer
/// substitutes a fallback string instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureMetadata {
    /// ISO sensitivity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<u32>,

    /// Raw FNumber value, usually a fraction such as "28/10"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aperture: Option<String>,

    /// Exposure time as recorded (e.g. "1/250")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_time: Option<String>,

    /// Focal length as recorded (e.g. "35")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<String>,

    /// Camera manufacturer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_make: Option<String>,

    /// Camera model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,

    /// Capture time in EXIF form ("YYYY:MM:DD HH:MM:SS")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<String>,

    /// Copyright holder, or the artist when no copyright is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
}

impl CaptureMetadata {
    /// Aperture rendered for display.
    ///
    /// A fraction "N/D" becomes N/D with one decimal; any other value is shown
    /// verbatim; a missing tag yields `unknown`.
    pub fn aperture_display(&self, unknown: &str) -> String {
        let Some(raw) = self.aperture.as_deref() else {
            return unknown.to_string();
        };
        let Some((num, den)) = raw.split_once('/') else {
            return raw.to_string();
        };
        match (num.trim().parse::<f64>(), den.trim().parse::<f64>()) {
            (Ok(n), Ok(d)) if d != 0.0 => format!("{:.1}", n / d),
            _ => raw.to_string(),
        }
    }

    /// Capture time with the date separators turned into slashes.
    pub fn timestamp_display(&self, unknown_time: &str) -> String {
        match self.captured_at.as_deref() {
            Some(ts) => ts.replacen(':', "/", 2),
            None => unknown_time.to_string(),
        }
    }

    /// The one-line capture summary drawn in landscape bars.
    pub fn summary_line(&self, labels: &LabelsConfig) -> String {
        let unknown = labels.unknown.as_str();
        let iso = self
            .iso
            .map(|v| v.to_string())
            .unwrap_or_else(|| unknown.to_string());
        format!(
            "ISO-{} | F/{} | {}S | {}MM",
            iso,
            self.aperture_display(unknown),
            self.exposure_time.as_deref().unwrap_or(unknown),
            self.focal_length.as_deref().unwrap_or(unknown),
        )
    }

    /// Attribution text: the tag if present, otherwise the default signature.
    pub fn signature<'a>(&'a self, labels: &'a LabelsConfig) -> &'a str {
        self.attribution
            .as_deref()
            .unwrap_or(&labels.default_signature)
    }

    /// Model name with manufacturer names removed ("Canon EOS R5" -> "EOS R5").
    ///
    /// Returns `None` when nothing is left after stripping.
    pub fn model_label(&self) -> Option<String> {
        let mut model = self.camera_model.clone()?;
        for brand in BRAND_NAMES {
            model = model.replace(brand, "");
        }
        let label = model.split_whitespace().collect::<Vec<_>>().join(" ");
        if label.is_empty() {
            None
        } else {
            Some(label)
        }
    }
}

/// Orientation of a photo, landscape when width >= height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn of(width: u32, height: u32) -> Self {
        if width >= height {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }

    /// Only landscape bars have room for the summary and signature lines.
    pub fn shows_text(self) -> bool {
        matches!(self, Self::Landscape)
    }
}

/// Result of one unit of work in a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    /// The annotated image was written
    Written {
        source: PathBuf,
        output: PathBuf,
        elapsed_ms: u64,
    },
    /// The file could not be processed
    Failed {
        source: PathBuf,
        stage: String,
        message: String,
        elapsed_ms: u64,
    },
}

impl JobOutcome {
    pub fn source(&self) -> &PathBuf {
        match self {
            Self::Written { source, .. } | Self::Failed { source, .. } => source,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Aggregate result of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// One outcome per dispatched file, in dispatch order
    pub outcomes: Vec<JobOutcome>,

    /// Inputs skipped because another file already claimed the same output name
    pub skipped: usize,

    /// Wall-clock time from first dispatch to last completion
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Files written per second over the whole run.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.succeeded() as f64 / secs
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_aperture(raw: Option<&str>) -> CaptureMetadata {
        CaptureMetadata {
            aperture: raw.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_aperture_fraction_one_decimal() {
        assert_eq!(with_aperture(Some("28/10")).aperture_display("?"), "2.8");
        assert_eq!(with_aperture(Some("7/2")).aperture_display("?"), "3.5");
        assert_eq!(with_aperture(Some("8/1")).aperture_display("?"), "8.0");
        assert_eq!(with_aperture(Some("71/10")).aperture_display("?"), "7.1");
    }

    #[test]
    fn test_aperture_fallbacks() {
        assert_eq!(with_aperture(None).aperture_display("unknown"), "unknown");
        assert_eq!(with_aperture(Some("4")).aperture_display("unknown"), "4");
        assert_eq!(
            with_aperture(Some("f/two")).aperture_display("unknown"),
            "f/two"
        );
        assert_eq!(with_aperture(Some("5/0")).aperture_display("unknown"), "5/0");
    }

    #[test]
    fn test_timestamp_replaces_date_separators_only() {
        let meta = CaptureMetadata {
            captured_at: Some("2024:05:01 10:20:30".to_string()),
            ..Default::default()
        };
        assert_eq!(meta.timestamp_display("none"), "2024/05/01 10:20:30");

        let missing = CaptureMetadata::default();
        assert_eq!(missing.timestamp_display("unknown time"), "unknown time");
    }

    #[test]
    fn test_summary_line_full_and_empty() {
        let labels = LabelsConfig::default();
        let meta = CaptureMetadata {
            iso: Some(200),
            aperture: Some("56/10".to_string()),
            exposure_time: Some("1/250".to_string()),
            focal_length: Some("35".to_string()),
            ..Default::default()
        };
        assert_eq!(meta.summary_line(&labels), "ISO-200 | F/5.6 | 1/250S | 35MM");

        let empty = CaptureMetadata::default();
        assert_eq!(
            empty.summary_line(&labels),
            "ISO-unknown | F/unknown | unknownS | unknownMM"
        );
    }

    #[test]
    fn test_signature_prefers_tag() {
        let labels = LabelsConfig::default();
        let tagged = CaptureMetadata {
            attribution: Some("Jane Doe".to_string()),
            ..Default::default()
        };
        assert_eq!(tagged.signature(&labels), "Jane Doe");
        assert_eq!(
            CaptureMetadata::default().signature(&labels),
            labels.default_signature
        );
    }

    #[test]
    fn test_model_label_strips_brands() {
        let model = |m: &str| CaptureMetadata {
            camera_model: Some(m.to_string()),
            ..Default::default()
        };
        assert_eq!(model("Canon EOS R5").model_label().as_deref(), Some("EOS R5"));
        assert_eq!(
            model("NIKON CORPORATION NIKON Z 6_2").model_label().as_deref(),
            Some("Z 6_2")
        );
        assert_eq!(model("ILCE-7M4").model_label().as_deref(), Some("ILCE-7M4"));
        assert_eq!(model("SONY").model_label(), None);
        assert_eq!(CaptureMetadata::default().model_label(), None);
    }

    #[test]
    fn test_orientation() {
        assert_eq!(Orientation::of(300, 200), Orientation::Landscape);
        assert_eq!(Orientation::of(200, 200), Orientation::Landscape);
        assert_eq!(Orientation::of(200, 300), Orientation::Portrait);
        assert!(Orientation::Landscape.shows_text());
        assert!(!Orientation::Portrait.shows_text());
    }

    #[test]
    fn test_report_counts() {
        let report = BatchReport {
            outcomes: vec![
                JobOutcome::Written {
                    source: PathBuf::from("a.jpg"),
                    output: PathBuf::from("out/a.jpg"),
                    elapsed_ms: 5,
                },
                JobOutcome::Failed {
                    source: PathBuf::from("b.cr2"),
                    stage: "raw-decode".to_string(),
                    message: "bad".to_string(),
                    elapsed_ms: 1,
                },
            ],
            skipped: 0,
            elapsed: Duration::from_secs(2),
        };
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert!((report.rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = JobOutcome::Failed {
            source: PathBuf::from("b.cr2"),
            stage: "raw-decode".to_string(),
            message: "bad".to_string(),
            elapsed_ms: 1,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"status\":\"failed\""));
        assert!(json.contains("\"stage\":\"raw-decode\""));
    }
}
