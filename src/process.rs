//! Batch conversion.
//!
//! Stage 2 of the pipeline. Takes every source that discovery yields and,
//! one file at a time, decodes it once and writes a WebP variant per target
//! width plus an unresized copy.
//!
//! ## Output Structure
//!
//! ```text
//! savepath/
//! ├── 320/
//! │   └── photo.webp             # 320 wide
//! ├── 640/
//! │   └── photo.webp
//! ├── originalsize/
//! │   └── photo.webp             # source dimensions
//! ├── sourceset_info.txt         # run description (unless disabled)
//! └── sourceset.json             # variant listing (opt-in)
//! ```
//!
//! In recursive runs the source's subfolder is mirrored inside each width
//! folder (`640/trips/photo.webp`).
//!
//! ## Failure Handling
//!
//! Nothing that goes wrong with a single file stops the batch. A source that
//! will not decode is recorded as skipped. A variant that will not encode or
//! write is recorded against its file and the remaining variants are still
//! attempted. Failing to write `sourceset_info.txt` or `sourceset.json` is
//! recorded in the summary too. Only configuration problems (see
//! [`ConfigError`]) end a run early.

use crate::config::{ConfigError, JobConfig};
use crate::imaging::{
    BackendError, EncodeParams, ImageBackend, Quality, RustBackend, VariantPlan, plan_variants,
};
use crate::output;
use crate::scan::{ImageFiles, SourceFile};
use crate::summary::{FileOutcome, FileReport, RunSummary, VariantFailure, WrittenVariant};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::Instant;
use tracing::{debug, info, warn};

pub const INFO_FILE_NAME: &str = "sourceset_info.txt";
pub const MANIFEST_FILE_NAME: &str = "sourceset.json";

/// Progress notifications: one `Started`, then one event per source.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    /// Input and output folders checked; conversion is about to begin.
    Started { config: JobConfig },
    ImageProcessed { index: usize, report: FileReport },
}

/// Run a job with the production backend.
pub fn run(
    config: &JobConfig,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<RunSummary, ConfigError> {
    run_with_backend(&RustBackend::new(), config, progress)
}

/// Run a job using a specific backend (allows testing with mock).
pub fn run_with_backend<B: ImageBackend>(
    backend: &B,
    config: &JobConfig,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<RunSummary, ConfigError> {
    let started = Instant::now();

    config.validate()?;
    let sources = ImageFiles::open(&config.folder)?;
    let output_root = config.prepare_output()?;
    let sources = sources
        .recursive(config.recursive)
        .exclude(&output_root);

    info!(
        folder = %config.folder.display(),
        savepath = %output_root.display(),
        widths = ?config.widths,
        quality = config.quality.value(),
        "converting"
    );
    if let Some(tx) = &progress {
        tx.send(ProcessEvent::Started {
            config: config.clone(),
        })
        .ok();
    }

    let mut summary = RunSummary::new();
    let mut seen = HashSet::new();

    for (i, source) in sources.iter().enumerate() {
        if !seen.insert(source.relative_dir.join(&source.stem)) {
            warn!(
                file = %source.relative_name().display(),
                "another source has the same name; its outputs will be overwritten"
            );
        }

        let report = process_file(backend, config, &output_root, &source);
        if let Some(tx) = &progress {
            tx.send(ProcessEvent::ImageProcessed {
                index: i + 1,
                report: report.clone(),
            })
            .ok();
        }
        summary.record(report);
    }

    summary.elapsed = started.elapsed();

    if config.write_info {
        let info = output::format_info_file(config, &summary).join("\n");
        write_run_file(&mut summary, &output_root, INFO_FILE_NAME, info.as_bytes());
    }
    if config.write_manifest {
        match serde_json::to_vec_pretty(&summary.manifest(config)) {
            Ok(json) => write_run_file(&mut summary, &output_root, MANIFEST_FILE_NAME, &json),
            Err(e) => {
                warn!(file = MANIFEST_FILE_NAME, error = %e, "could not serialize manifest");
                summary.record_run_file_failure(MANIFEST_FILE_NAME, e.to_string());
            }
        }
    }

    info!(
        processed = summary.processed(),
        skipped = summary.skipped(),
        failed = summary.failed(),
        written = summary.files_written(),
        "done"
    );

    Ok(summary)
}

/// Write one of the run's own files next to the width folders. A failure is
/// recorded in the summary and does not end the run.
fn write_run_file(summary: &mut RunSummary, output_root: &Path, name: &str, contents: &[u8]) {
    if let Err(e) = std::fs::write(output_root.join(name), contents) {
        warn!(file = name, error = %e, "could not write run file");
        summary.record_run_file_failure(name, format!("IO error: {e}"));
    }
}

/// Convert one source into all of its variants.
///
/// Never fails: every problem ends up in the returned report.
pub fn process_file<B: ImageBackend>(
    backend: &B,
    config: &JobConfig,
    output_root: &Path,
    source: &SourceFile,
) -> FileReport {
    let name = source.relative_name().display().to_string();

    let raster = match backend.decode(&source.path) {
        Ok(raster) => raster,
        Err(e) => {
            warn!(file = %name, error = %e, "skipping undecodable source");
            return FileReport::skipped(&source.path, name, e.to_string());
        }
    };

    let dimensions = backend.dimensions(&raster);
    if dimensions.is_empty() {
        let e = BackendError::Decode(format!("image has no pixels ({dimensions})"));
        warn!(file = %name, error = %e, "skipping undecodable source");
        return FileReport::skipped(&source.path, name, e.to_string());
    }

    let mut outputs = Vec::new();
    let mut failures = Vec::new();

    for plan in plan_variants(dimensions, &config.widths, config.upscale) {
        let relative = variant_relative_path(&plan.label.dir_name(), source);
        let output = output_root.join(&relative);

        match write_variant(backend, &raster, &output, &plan, config.quality) {
            Ok(()) => {
                debug!(
                    file = %name,
                    variant = %plan.label,
                    width = plan.width,
                    height = plan.height,
                    "written"
                );
                outputs.push(WrittenVariant {
                    label: plan.label,
                    path: output,
                    url_path: to_url_path(&relative),
                    width: plan.width,
                    height: plan.height,
                });
            }
            Err(e) => {
                warn!(file = %name, variant = %plan.label, error = %e, "variant failed");
                failures.push(VariantFailure {
                    label: plan.label,
                    reason: e.to_string(),
                });
            }
        }
    }

    FileReport {
        source: source.path.clone(),
        name,
        outcome: FileOutcome::from_variants(dimensions, outputs, failures),
    }
}

/// Create the variant's folder on demand and hand the raster to the backend.
fn write_variant<B: ImageBackend>(
    backend: &B,
    raster: &B::Raster,
    output: &Path,
    plan: &VariantPlan,
    quality: Quality,
) -> Result<(), BackendError> {
    if let Some(dir) = output.parent() {
        std::fs::create_dir_all(dir)?;
    }
    backend.encode(
        raster,
        &EncodeParams {
            output: output.to_path_buf(),
            width: plan.width,
            height: plan.height,
            quality,
        },
    )
}

/// `/`-joined form of a relative path, as it would appear in a `srcset`.
fn to_url_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Where a source's variant lands, relative to the output root.
pub fn variant_relative_path(dir_name: &str, source: &SourceFile) -> PathBuf {
    Path::new(dir_name)
        .join(&source.relative_dir)
        .join(format!("{}.webp", source.stem))
}
