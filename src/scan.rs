//! Source discovery.
//!
//! Stage 1 of the pipeline. Finds the images in the input folder that the
//! converter can decode, judged by file extension only.
//!
//! ## Supported Formats
//!
//! | Format | Extensions |
//! |---|---|
//! | JPEG | `jpg`, `jpeg` |
//! | PNG | `png` |
//! | WebP | `webp` |
//! | BMP | `bmp` |
//! | TIFF | `tif`, `tiff` |
//! | GIF | `gif` (first frame) |
//!
//! Extensions match case-insensitively. Hidden entries (leading `.`) and
//! everything else in the folder are ignored.
//!
//! ## Walking
//!
//! [`ImageFiles`] is a handle on the folder, not a list: [`ImageFiles::iter`]
//! walks the directory lazily, and calling it again walks it again. Entries
//! come back sorted by file name so runs are reproducible.
//!
//! By default only the top level is scanned. With
//! [`recursive`](ImageFiles::recursive), subdirectories are walked too and
//! each [`SourceFile`] carries its directory relative to the root, which the
//! converter mirrors under every width folder.

use image::ImageFormat;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Input folder does not exist: {0}")]
    NotFound(PathBuf),
    #[error("Input path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Input formats the converter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedFormat {
    Jpeg,
    Png,
    WebP,
    Bmp,
    Tiff,
    Gif,
}

impl SupportedFormat {
    pub const ALL: [SupportedFormat; 6] = [
        SupportedFormat::Jpeg,
        SupportedFormat::Png,
        SupportedFormat::WebP,
        SupportedFormat::Bmp,
        SupportedFormat::Tiff,
        SupportedFormat::Gif,
    ];

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            SupportedFormat::Jpeg => &["jpg", "jpeg"],
            SupportedFormat::Png => &["png"],
            SupportedFormat::WebP => &["webp"],
            SupportedFormat::Bmp => &["bmp"],
            SupportedFormat::Tiff => &["tif", "tiff"],
            SupportedFormat::Gif => &["gif"],
        }
    }

    /// The `image` crate decoder behind this format.
    pub fn image_format(self) -> ImageFormat {
        match self {
            SupportedFormat::Jpeg => ImageFormat::Jpeg,
            SupportedFormat::Png => ImageFormat::Png,
            SupportedFormat::WebP => ImageFormat::WebP,
            SupportedFormat::Bmp => ImageFormat::Bmp,
            SupportedFormat::Tiff => ImageFormat::Tiff,
            SupportedFormat::Gif => ImageFormat::Gif,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|fmt| {
            fmt.extensions()
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Every accepted extension, sorted, for help text and the info file.
pub fn supported_extensions() -> Vec<&'static str> {
    let mut exts: Vec<&'static str> = SupportedFormat::ALL
        .iter()
        .flat_map(|fmt| fmt.extensions().iter().copied())
        .collect();
    exts.sort_unstable();
    exts
}

/// Whether `path` names a file this build can decode.
///
/// Checks the extension against [`SupportedFormat`] and that the matching
/// decoder is compiled into the `image` crate.
pub fn can_decode(path: &Path) -> bool {
    SupportedFormat::from_path(path).is_some_and(|fmt| fmt.image_format().reading_enabled())
}

/// A discovered source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Directory of the file relative to the scan root (empty at top level).
    pub relative_dir: PathBuf,
    /// File name without extension; becomes `<stem>.webp`.
    pub stem: String,
}

impl SourceFile {
    /// File name for progress and summary lines.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Path relative to the scan root, for messages in recursive runs.
    pub fn relative_name(&self) -> PathBuf {
        self.relative_dir.join(self.display_name())
    }
}

/// Lazily walked, restartable set of images under a folder.
#[derive(Debug, Clone)]
pub struct ImageFiles {
    root: PathBuf,
    recursive: bool,
    exclude: Option<PathBuf>,
}

impl ImageFiles {
    /// Open `root` for scanning. Fails if it is missing or not a directory.
    pub fn open(root: &Path) -> Result<Self, ScanError> {
        if !root.exists() {
            return Err(ScanError::NotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }
        Ok(Self {
            root: root.to_path_buf(),
            recursive: false,
            exclude: None,
        })
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Never descend into `dir`, typically the output root nested inside
    /// the input folder.
    pub fn exclude(mut self, dir: &Path) -> Self {
        self.exclude = dir.canonicalize().ok();
        self
    }

    /// Walk the folder. Each call starts a fresh walk.
    pub fn iter(&self) -> impl Iterator<Item = SourceFile> + '_ {
        let max_depth = if self.recursive { usize::MAX } else { 1 };
        WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e) && !self.is_excluded(e))
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable entry");
                    None
                }
            })
            .filter(|e| e.file_type().is_file() && can_decode(e.path()))
            .map(|e| self.source_file(e.path()))
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        let Some(exclude) = &self.exclude else {
            return false;
        };
        entry.file_type().is_dir()
            && entry
                .path()
                .canonicalize()
                .is_ok_and(|p| p == *exclude)
    }

    fn source_file(&self, path: &Path) -> SourceFile {
        let relative_dir = path
            .parent()
            .and_then(|parent| parent.strip_prefix(&self.root).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        SourceFile {
            path: path.to_path_buf(),
            relative_dir,
            stem,
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}
