//! Per-file results and the run summary.
//!
//! Every discovered source produces exactly one [`FileReport`]. The
//! [`RunSummary`] owns the reports for one invocation and derives every
//! count from them; nothing is tallied separately.

use crate::config::JobConfig;
use crate::imaging::{Dimensions, VariantLabel};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One WebP file written for a source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrittenVariant {
    #[serde(serialize_with = "serialize_label")]
    pub label: VariantLabel,
    /// Where the file was written.
    #[serde(skip)]
    pub path: PathBuf,
    /// Path relative to the output root, `/`-separated, for `srcset` use.
    #[serde(rename = "path")]
    pub url_path: String,
    pub width: u32,
    pub height: u32,
}

fn serialize_label<S: serde::Serializer>(label: &VariantLabel, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&label.dir_name())
}

/// One variant that could not be written.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantFailure {
    pub label: VariantLabel,
    pub reason: String,
}

/// What happened to one source file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Every variant was written.
    Converted {
        dimensions: Dimensions,
        outputs: Vec<WrittenVariant>,
    },
    /// Some variants were written, some failed.
    Partial {
        dimensions: Dimensions,
        outputs: Vec<WrittenVariant>,
        failures: Vec<VariantFailure>,
    },
    /// Decoded, but no variant could be written.
    Failed {
        dimensions: Dimensions,
        failures: Vec<VariantFailure>,
    },
    /// The source could not be decoded; nothing was attempted.
    Skipped { reason: String },
}

impl FileOutcome {
    /// Classify a decoded file by how its variants went.
    pub fn from_variants(
        dimensions: Dimensions,
        outputs: Vec<WrittenVariant>,
        failures: Vec<VariantFailure>,
    ) -> Self {
        match (outputs.is_empty(), failures.is_empty()) {
            (_, true) => FileOutcome::Converted {
                dimensions,
                outputs,
            },
            (true, false) => FileOutcome::Failed {
                dimensions,
                failures,
            },
            (false, false) => FileOutcome::Partial {
                dimensions,
                outputs,
                failures,
            },
        }
    }

    pub fn outputs(&self) -> &[WrittenVariant] {
        match self {
            FileOutcome::Converted { outputs, .. } | FileOutcome::Partial { outputs, .. } => {
                outputs
            }
            FileOutcome::Failed { .. } | FileOutcome::Skipped { .. } => &[],
        }
    }

    pub fn failures(&self) -> &[VariantFailure] {
        match self {
            FileOutcome::Partial { failures, .. } | FileOutcome::Failed { failures, .. } => {
                failures
            }
            FileOutcome::Converted { .. } | FileOutcome::Skipped { .. } => &[],
        }
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        match self {
            FileOutcome::Converted { dimensions, .. }
            | FileOutcome::Partial { dimensions, .. }
            | FileOutcome::Failed { dimensions, .. } => Some(*dimensions),
            FileOutcome::Skipped { .. } => None,
        }
    }

    /// Human-readable reason for a non-successful outcome.
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            FileOutcome::Converted { .. } => None,
            FileOutcome::Skipped { reason } => Some(reason.clone()),
            FileOutcome::Partial { failures, .. } | FileOutcome::Failed { failures, .. } => Some(
                failures
                    .iter()
                    .map(|f| format!("{}: {}", f.label, f.reason))
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
        }
    }
}

/// Result of processing one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub source: PathBuf,
    /// Name shown to the user (relative to the input folder).
    pub name: String,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn skipped(source: &Path, name: String, reason: String) -> Self {
        Self {
            source: source.to_path_buf(),
            name,
            outcome: FileOutcome::Skipped { reason },
        }
    }
}

/// A file the run writes for itself (`sourceset_info.txt`, `sourceset.json`)
/// that could not be written.
#[derive(Debug, Clone, PartialEq)]
pub struct RunFileFailure {
    pub name: String,
    pub reason: String,
}

/// Accumulated results of one run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<FileReport>,
    pub run_file_failures: Vec<RunFileFailure>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: FileReport) {
        self.reports.push(report);
    }

    pub fn record_run_file_failure(&mut self, name: &str, reason: String) {
        self.run_file_failures.push(RunFileFailure {
            name: name.to_string(),
            reason,
        });
    }

    /// Files found by discovery.
    pub fn discovered(&self) -> usize {
        self.reports.len()
    }

    /// Files with every variant written.
    pub fn processed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Converted { .. }))
    }

    /// Files that could not be decoded.
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped { .. }))
    }

    /// Files with at least one variant that failed to write.
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Partial { .. } | FileOutcome::Failed { .. }))
    }

    /// Total WebP files written across all sources.
    pub fn files_written(&self) -> usize {
        self.reports.iter().map(|r| r.outcome.outputs().len()).sum()
    }

    /// `(name, reason)` for every file that did not fully convert, in run
    /// order, then any run file that could not be written.
    pub fn failures(&self) -> Vec<(&str, String)> {
        self.reports
            .iter()
            .filter_map(|r| r.outcome.failure_reason().map(|why| (r.name.as_str(), why)))
            .chain(
                self.run_file_failures
                    .iter()
                    .map(|f| (f.name.as_str(), f.reason.clone())),
            )
            .collect()
    }

    /// Machine-readable listing of everything written, for `sourceset.json`.
    pub fn manifest(&self, config: &JobConfig) -> Manifest {
        let images = self
            .reports
            .iter()
            .filter_map(|r| {
                let dims = r.outcome.dimensions()?;
                let variants = r.outcome.outputs().to_vec();
                (!variants.is_empty()).then(|| ManifestImage {
                    source: r.name.clone(),
                    width: dims.width,
                    height: dims.height,
                    variants,
                })
            })
            .collect();

        Manifest {
            source_folder: config.folder.display().to_string(),
            output_folder: config.savepath.display().to_string(),
            widths: config.widths.clone(),
            quality: config.quality.value(),
            images,
        }
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Serialized as `sourceset.json`.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub source_folder: String,
    pub output_folder: String,
    pub widths: Vec<u32>,
    pub quality: u8,
    pub images: Vec<ManifestImage>,
}

#[derive(Debug, Serialize)]
pub struct ManifestImage {
    pub source: String,
    pub width: u32,
    pub height: u32,
    pub variants: Vec<WrittenVariant>,
}
