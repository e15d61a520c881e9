//! Job configuration.
//!
//! A run is described by a [`JobConfig`]: where to read, where to write, which
//! widths to produce and at what quality. It is assembled from three layers,
//! later layers winning:
//!
//! 1. Built-in defaults ([`Settings::default`])
//! 2. An optional TOML settings file (`--config path/to/srcset.toml`)
//! 3. Command-line flags ([`Overrides`])
//!
//! ## Settings File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [images]
//! widths = [320, 640, 960, 1200]  # Target widths in pixels, processed in order
//! quality = 80                    # WebP quality (0-100)
//! upscale = false                 # Enlarge sources narrower than a target width
//!
//! [discovery]
//! recursive = false               # Also convert images in subfolders
//!
//! [output]
//! info_file = true                # Write sourceset_info.txt
//! manifest = false                # Write sourceset.json
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::Quality;
use crate::scan::ScanError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_WIDTHS: [u32; 4] = [320, 640, 960, 1200];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Input(#[from] ScanError),
    #[error("Output path is not a directory: {0}")]
    OutputNotDirectory(PathBuf),
    #[error("Cannot create output folder {path}: {source}")]
    OutputNotWritable {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Contents of a settings file.
///
/// All fields have defaults; a file only needs the values it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub images: ImagesSettings,
    pub discovery: DiscoverySettings,
    pub output: OutputSettings,
}

/// Variant generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesSettings {
    /// Target widths in pixels, in output order.
    pub widths: Vec<u32>,
    /// WebP encoding quality (0 = worst, 100 = best).
    pub quality: u32,
    /// Enlarge sources narrower than a target width instead of keeping
    /// their native size.
    pub upscale: bool,
}

impl Default for ImagesSettings {
    fn default() -> Self {
        Self {
            widths: DEFAULT_WIDTHS.to_vec(),
            quality: u32::from(Quality::default().value()),
            upscale: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoverySettings {
    pub recursive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Write `sourceset_info.txt` into the output root.
    pub info_file: bool,
    /// Write `sourceset.json` into the output root.
    pub manifest: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            info_file: true,
            manifest: false,
        }
    }
}

/// Values given on the command line. `None`/`false` leaves the settings
/// file value in place.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub widths: Option<Vec<u32>>,
    pub quality: Option<u32>,
    pub upscale: bool,
    pub recursive: bool,
    pub no_info: bool,
    pub manifest: bool,
}

impl Settings {
    /// Validate values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.quality > u32::from(Quality::MAX) {
            return Err(ConfigError::Validation(
                "images.quality must be 0-100".into(),
            ));
        }
        validate_widths(&self.images.widths)
    }

    /// Apply command-line values on top of these settings.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(widths) = &overrides.widths {
            self.images.widths = widths.clone();
        }
        if let Some(quality) = overrides.quality {
            self.images.quality = quality;
        }
        self.images.upscale |= overrides.upscale;
        self.discovery.recursive |= overrides.recursive;
        if overrides.no_info {
            self.output.info_file = false;
        }
        self.output.manifest |= overrides.manifest;
        self
    }
}

/// Widths must be non-empty, positive, and unique.
///
/// Duplicates are rejected rather than collapsed: each width names an
/// output folder, and two identical entries would write one file twice.
pub fn validate_widths(widths: &[u32]) -> Result<(), ConfigError> {
    if widths.is_empty() {
        return Err(ConfigError::Validation(
            "at least one target width is required".into(),
        ));
    }
    if widths.contains(&0) {
        return Err(ConfigError::Validation(
            "target widths must be positive".into(),
        ));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = widths.iter().find(|w| !seen.insert(**w)) {
        return Err(ConfigError::Validation(format!(
            "target width {dup} is listed more than once"
        )));
    }
    Ok(())
}

/// Load a settings file.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&content)?;
    Ok(settings)
}

/// Fully resolved description of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct JobConfig {
    /// Folder holding the source images.
    pub folder: PathBuf,
    /// Output root; width folders are created inside it.
    pub savepath: PathBuf,
    pub widths: Vec<u32>,
    pub quality: Quality,
    pub upscale: bool,
    pub recursive: bool,
    pub write_info: bool,
    pub write_manifest: bool,
}

impl JobConfig {
    /// A job with default widths and quality.
    pub fn new(folder: impl Into<PathBuf>, savepath: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            savepath: savepath.into(),
            widths: DEFAULT_WIDTHS.to_vec(),
            quality: Quality::default(),
            upscale: false,
            recursive: false,
            write_info: true,
            write_manifest: false,
        }
    }

    /// Build a job from validated settings.
    pub fn from_settings(
        folder: impl Into<PathBuf>,
        savepath: impl Into<PathBuf>,
        settings: &Settings,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            folder: folder.into(),
            savepath: savepath.into(),
            widths: settings.images.widths.clone(),
            quality: Quality::new(settings.images.quality as u8),
            upscale: settings.images.upscale,
            recursive: settings.discovery.recursive,
            write_info: settings.output.info_file,
            write_manifest: settings.output.manifest,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quality.value() > Quality::MAX {
            return Err(ConfigError::Validation("quality must be 0-100".into()));
        }
        validate_widths(&self.widths)
    }

    /// Create the output root if needed and confirm it is a directory.
    pub fn prepare_output(&self) -> Result<PathBuf, ConfigError> {
        if self.savepath.exists() && !self.savepath.is_dir() {
            return Err(ConfigError::OutputNotDirectory(self.savepath.clone()));
        }
        fs::create_dir_all(&self.savepath).map_err(|source| ConfigError::OutputNotWritable {
            path: self.savepath.clone(),
            source,
        })?;
        Ok(self.savepath.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_settings_values() {
        let settings = Settings::default();
        assert_eq!(settings.images.widths, vec![320, 640, 960, 1200]);
        assert_eq!(settings.images.quality, 80);
        assert!(!settings.images.upscale);
        assert!(!settings.discovery.recursive);
        assert!(settings.output.info_file);
        assert!(!settings.output.manifest);
    }

    #[test]
    fn default_settings_pass_validation() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn parse_partial_settings() {
        let settings: Settings = toml::from_str(
            r#"
[images]
quality = 65
"#,
        )
        .unwrap();

        assert_eq!(settings.images.quality, 65);
        assert_eq!(settings.images.widths, vec![320, 640, 960, 1200]);
        assert!(settings.output.info_file);
    }

    #[test]
    fn parse_full_settings() {
        let settings: Settings = toml::from_str(
            r#"
[images]
widths = [480, 1024]
quality = 90
upscale = true

[discovery]
recursive = true

[output]
info_file = false
manifest = true
"#,
        )
        .unwrap();

        assert_eq!(settings.images.widths, vec![480, 1024]);
        assert_eq!(settings.images.quality, 90);
        assert!(settings.images.upscale);
        assert!(settings.discovery.recursive);
        assert!(!settings.output.info_file);
        assert!(settings.output.manifest);
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<Settings, _> = toml::from_str(
            r#"
[images]
qualty = 90
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<Settings, _> = toml::from_str("[colors]\nbackground = \"#fff\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn load_settings_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("srcset.toml");
        fs::write(&path, "[images]\nwidths = [100]\n").unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.images.widths, vec![100]);
    }

    #[test]
    fn load_settings_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_settings(&tmp.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_settings_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("srcset.toml");
        fs::write(&path, "[images\nwidths = ").unwrap();

        assert!(matches!(load_settings(&path), Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_quality_boundary_ok() {
        let mut settings = Settings::default();
        settings.images.quality = 100;
        assert!(settings.validate().is_ok());

        settings.images.quality = 0;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn validate_quality_too_high() {
        let mut settings = Settings::default();
        settings.images.quality = 101;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("quality"));
    }

    #[test]
    fn validate_widths_empty() {
        assert!(validate_widths(&[]).is_err());
    }

    #[test]
    fn validate_widths_zero() {
        let err = validate_widths(&[320, 0]).unwrap_err();
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn validate_widths_duplicate() {
        let err = validate_widths(&[320, 640, 320]).unwrap_err();
        assert!(err.to_string().contains("320"));
    }

    #[test]
    fn validate_widths_any_order_ok() {
        assert!(validate_widths(&[1200, 320, 960]).is_ok());
    }

    // =========================================================================
    // Overrides
    // =========================================================================

    #[test]
    fn overrides_replace_file_values() {
        let mut settings = Settings::default();
        settings.images.widths = vec![100, 200];
        settings.images.quality = 50;

        let merged = settings.with_overrides(&Overrides {
            widths: Some(vec![300]),
            quality: Some(95),
            no_info: true,
            manifest: true,
            ..Overrides::default()
        });

        assert_eq!(merged.images.widths, vec![300]);
        assert_eq!(merged.images.quality, 95);
        assert!(!merged.output.info_file);
        assert!(merged.output.manifest);
    }

    #[test]
    fn absent_overrides_keep_file_values() {
        let mut settings = Settings::default();
        settings.images.widths = vec![100, 200];
        settings.discovery.recursive = true;

        let merged = settings.clone().with_overrides(&Overrides::default());
        assert_eq!(merged, settings);
    }

    // =========================================================================
    // JobConfig
    // =========================================================================

    #[test]
    fn job_from_settings_copies_values() {
        let mut settings = Settings::default();
        settings.images.quality = 85;
        settings.discovery.recursive = true;

        let job = JobConfig::from_settings("in", "out", &settings).unwrap();
        assert_eq!(job.folder, PathBuf::from("in"));
        assert_eq!(job.savepath, PathBuf::from("out"));
        assert_eq!(job.quality, Quality::new(85));
        assert!(job.recursive);
        assert!(job.write_info);
    }

    #[test]
    fn job_from_invalid_settings_errors() {
        let mut settings = Settings::default();
        settings.images.widths.clear();
        assert!(JobConfig::from_settings("in", "out", &settings).is_err());
    }

    #[test]
    fn job_new_uses_defaults() {
        let job = JobConfig::new("in", "out");
        assert_eq!(job.widths, DEFAULT_WIDTHS.to_vec());
        assert_eq!(job.quality.value(), 80);
        assert!(job.validate().is_ok());
    }

    #[test]
    fn prepare_output_creates_nested_dirs() {
        let tmp = TempDir::new().unwrap();
        let job = JobConfig::new(tmp.path(), tmp.path().join("a/b/c"));

        let out = job.prepare_output().unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn prepare_output_rejects_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("taken");
        fs::write(&file, b"x").unwrap();

        let job = JobConfig::new(tmp.path(), &file);
        assert!(matches!(
            job.prepare_output(),
            Err(ConfigError::OutputNotDirectory(_))
        ));
    }
}
