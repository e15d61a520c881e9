//! Parameter types for image operations.
//!
//! These structs describe *what* to write, not *how*. They sit between the
//! [`process`](crate::process) pipeline (which decides which variants to
//! produce) and the [`backend`](super::backend) (which does the pixel work),
//! so a mock backend can stand in during tests.
//!
//! ## Types
//!
//! - [`Quality`]: WebP encoding quality (0–100, default 80). Clamped on construction.
//! - [`EncodeParams`]: One output file: destination path, pixel size, quality.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Quality setting for lossy WebP encoding (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(pub u8);

impl Quality {
    pub const MAX: u8 = 100;

    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Quality as the float factor libwebp expects.
    pub fn as_factor(self) -> f32 {
        f32::from(self.0)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters for writing one WebP variant of an already-decoded raster.
///
/// When `width`/`height` match the raster, the backend encodes it as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeParams {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}
