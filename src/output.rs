//! CLI output formatting.
//!
//! Every piece of user-facing text has a `format_*` function returning
//! `Vec<String>` (pure, no I/O, unit tested) and, where the CLI needs it, a
//! `print_*` wrapper that writes to stdout.
//!
//! # Output Format
//!
//! ## Progress
//!
//! ```text
//! 001 photo.jpg (2400x1600)
//!     320px: 320x213
//!     640px: 640x427
//!     originalsize: 2400x1600
//! 002 notes.png
//!     skipped: Decode failed: ...
//! ```
//!
//! ## Summary
//!
//! ```text
//! Summary
//!     Discovered: 2
//!     Processed: 1
//!     Skipped: 1
//!     Failed: 0
//!     Files written: 3
//!     Elapsed: 0.84s
//! Failures
//!     notes.png: Decode failed: ...
//! ```

use crate::config::JobConfig;
use crate::imaging::ORIGINAL_SIZE_DIR;
use crate::process::ProcessEvent;
use crate::scan::supported_extensions;
use crate::summary::{FileOutcome, FileReport, RunSummary};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn join_widths(widths: &[u32]) -> String {
    widths
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Header printed before processing starts.
pub fn format_run_header(config: &JobConfig) -> Vec<String> {
    vec![format!(
        "==> Converting {} \u{2192} {} (widths {}; quality {})",
        config.folder.display(),
        config.savepath.display(),
        join_widths(&config.widths),
        config.quality
    )]
}

/// Format one finished source: header line, then one line per variant.
pub fn format_report(index: usize, report: &FileReport) -> Vec<String> {
    let mut lines = Vec::new();
    let header = format!("{} {}", format_index(index), report.name);

    match &report.outcome {
        FileOutcome::Skipped { reason } => {
            lines.push(header);
            lines.push(format!("{}skipped: {}", indent(1), reason));
        }
        outcome => {
            match outcome.dimensions() {
                Some(dims) => lines.push(format!("{} ({})", header, dims)),
                None => lines.push(header),
            }
            for written in outcome.outputs() {
                lines.push(format!(
                    "{}{}: {}x{}",
                    indent(1),
                    written.label,
                    written.width,
                    written.height
                ));
            }
            for failure in outcome.failures() {
                lines.push(format!(
                    "{}{}: failed: {}",
                    indent(1),
                    failure.label,
                    failure.reason
                ));
            }
        }
    }

    lines
}

pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started { config } => format_run_header(config),
        ProcessEvent::ImageProcessed { index, report } => format_report(*index, report),
    }
}

/// End-of-run summary block.
pub fn format_summary(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![
        "Summary".to_string(),
        format!("{}Discovered: {}", indent(1), summary.discovered()),
        format!("{}Processed: {}", indent(1), summary.processed()),
        format!("{}Skipped: {}", indent(1), summary.skipped()),
        format!("{}Failed: {}", indent(1), summary.failed()),
        format!("{}Files written: {}", indent(1), summary.files_written()),
        format!("{}Elapsed: {:.2}s", indent(1), summary.elapsed.as_secs_f64()),
    ];

    let failures = summary.failures();
    if !failures.is_empty() {
        lines.push("Failures".to_string());
        for (name, reason) in failures {
            lines.push(format!("{}{}: {}", indent(1), name, reason));
        }
    }

    lines
}

pub fn print_summary(summary: &RunSummary) {
    for line in format_summary(summary) {
        println!("{}", line);
    }
}

/// Contents of `sourceset_info.txt`, describing the run and the folders it
/// produced. Widths are listed in ascending order.
pub fn format_info_file(config: &JobConfig, summary: &RunSummary) -> Vec<String> {
    let mut sorted = config.widths.clone();
    sorted.sort_unstable();

    let title = "srcset-webp: generated files";
    let mut lines = vec![
        title.to_string(),
        "=".repeat(title.len()),
        String::new(),
        format!("Source folder: {}", config.folder.display()),
        format!("Output folder: {}", config.savepath.display()),
        format!("Target widths: {}", join_widths(&sorted)),
        format!("WebP quality: {}", config.quality),
        format!(
            "Upscaling: {}",
            if config.upscale { "enabled" } else { "disabled" }
        ),
        format!("Accepted inputs: {}", supported_extensions().join(", ")),
        String::new(),
        format!("Images found: {}", summary.discovered()),
        format!("Converted: {}", summary.processed()),
        format!("Skipped: {}", summary.skipped()),
        format!("Failed: {}", summary.failed()),
        format!("Files written: {}", summary.files_written()),
        String::new(),
        "Directory structure:".to_string(),
    ];

    for w in &sorted {
        lines.push(format!("  {w}/ - images resized to {w}px wide"));
    }
    lines.push(format!("  {ORIGINAL_SIZE_DIR}/ - full-size WebP copies"));
    lines.push(String::new());

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{Dimensions, Quality, VariantLabel};
    use crate::summary::{VariantFailure, WrittenVariant};
    use std::path::PathBuf;
    use std::time::Duration;

    fn written(label: VariantLabel, width: u32, height: u32) -> WrittenVariant {
        WrittenVariant {
            label,
            path: PathBuf::from("/out/x.webp"),
            url_path: "x.webp".into(),
            width,
            height,
        }
    }

    fn converted(name: &str) -> FileReport {
        FileReport {
            source: PathBuf::from("/in").join(name),
            name: name.to_string(),
            outcome: FileOutcome::Converted {
                dimensions: Dimensions {
                    width: 2400,
                    height: 1600,
                },
                outputs: vec![
                    written(VariantLabel::Width(320), 320, 213),
                    written(VariantLabel::Width(640), 640, 427),
                    written(VariantLabel::OriginalSize, 2400, 1600),
                ],
            },
        }
    }

    fn skipped(name: &str) -> FileReport {
        FileReport::skipped(
            &PathBuf::from("/in").join(name),
            name.to_string(),
            "Decode failed: bad magic".to_string(),
        )
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1234), "1234");
    }

    #[test]
    fn format_converted_report() {
        let lines = format_report(1, &converted("photo.jpg"));
        assert_eq!(
            lines,
            vec![
                "001 photo.jpg (2400x1600)",
                "    320px: 320x213",
                "    640px: 640x427",
                "    originalsize: 2400x1600",
            ]
        );
    }

    #[test]
    fn format_skipped_report() {
        let lines = format_report(3, &skipped("notes.png"));
        assert_eq!(
            lines,
            vec!["003 notes.png", "    skipped: Decode failed: bad magic"]
        );
    }

    #[test]
    fn format_partial_report_lists_failures_last() {
        let report = FileReport {
            source: PathBuf::from("/in/a.jpg"),
            name: "a.jpg".into(),
            outcome: FileOutcome::Partial {
                dimensions: Dimensions {
                    width: 100,
                    height: 50,
                },
                outputs: vec![written(VariantLabel::OriginalSize, 100, 50)],
                failures: vec![VariantFailure {
                    label: VariantLabel::Width(80),
                    reason: "IO error: permission denied".into(),
                }],
            },
        };
        let lines = format_report(2, &report);
        assert_eq!(lines[0], "002 a.jpg (100x50)");
        assert_eq!(lines[1], "    originalsize: 100x50");
        assert_eq!(lines[2], "    80px: failed: IO error: permission denied");
    }

    #[test]
    fn format_process_event_delegates_to_report() {
        let event = ProcessEvent::ImageProcessed {
            index: 7,
            report: skipped("x.gif"),
        };
        assert_eq!(format_process_event(&event)[0], "007 x.gif");
    }

    #[test]
    fn format_started_event_is_run_header() {
        let event = ProcessEvent::Started {
            config: JobConfig::new("/photos", "/site/img"),
        };
        let lines = format_process_event(&event);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("==> Converting /photos"));
    }

    #[test]
    fn format_summary_lists_run_file_failures() {
        let mut summary = RunSummary::new();
        summary.record(converted("photo.jpg"));
        summary.record_run_file_failure("sourceset.json", "IO error: disk full".into());

        let lines = format_summary(&summary);
        assert!(lines.contains(&"    Failed: 0".to_string()));
        assert_eq!(lines.last().unwrap(), "    sourceset.json: IO error: disk full");
    }

    #[test]
    fn format_summary_counts() {
        let mut summary = RunSummary::new();
        summary.record(converted("photo.jpg"));
        summary.elapsed = Duration::from_millis(1500);

        let lines = format_summary(&summary);
        assert_eq!(
            lines,
            vec![
                "Summary",
                "    Discovered: 1",
                "    Processed: 1",
                "    Skipped: 0",
                "    Failed: 0",
                "    Files written: 3",
                "    Elapsed: 1.50s",
            ]
        );
    }

    #[test]
    fn format_summary_lists_failures() {
        let mut summary = RunSummary::new();
        summary.record(converted("good.jpg"));
        summary.record(skipped("bad.jpg"));

        let lines = format_summary(&summary);
        let failures_at = lines.iter().position(|l| l == "Failures").unwrap();
        assert_eq!(
            lines[failures_at + 1],
            "    bad.jpg: Decode failed: bad magic"
        );
    }

    #[test]
    fn format_summary_empty_run() {
        let lines = format_summary(&RunSummary::new());
        assert!(lines.contains(&"    Discovered: 0".to_string()));
        assert!(lines.contains(&"    Failed: 0".to_string()));
        assert!(!lines.contains(&"Failures".to_string()));
    }

    #[test]
    fn run_header_mentions_paths_and_settings() {
        let mut config = JobConfig::new("/photos", "/site/img");
        config.widths = vec![640, 320];
        config.quality = Quality::new(85);

        let header = &format_run_header(&config)[0];
        assert!(header.contains("/photos"));
        assert!(header.contains("/site/img"));
        assert!(header.contains("widths 640, 320"));
        assert!(header.contains("quality 85"));
    }

    #[test]
    fn info_file_sorts_widths_and_lists_folders() {
        let mut config = JobConfig::new("/photos", "/site/img");
        config.widths = vec![960, 320, 640];
        let mut summary = RunSummary::new();
        summary.record(converted("photo.jpg"));

        let lines = format_info_file(&config, &summary);
        assert!(lines.contains(&"Target widths: 320, 640, 960".to_string()));
        assert!(lines.contains(&"WebP quality: 80".to_string()));
        assert!(lines.contains(&"Images found: 1".to_string()));
        assert!(lines.contains(&"Files written: 3".to_string()));

        let structure = lines
            .iter()
            .position(|l| l == "Directory structure:")
            .unwrap();
        assert_eq!(lines[structure + 1], "  320/ - images resized to 320px wide");
        assert_eq!(lines[structure + 3], "  960/ - images resized to 960px wide");
        assert_eq!(lines[structure + 4], "  originalsize/ - full-size WebP copies");
    }
}
