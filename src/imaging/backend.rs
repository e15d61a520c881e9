//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the pipeline
//! needs: decode a source once, report its dimensions, and encode a WebP
//! variant of it at a given size.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::EncodeParams;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

impl BackendError {
    /// True when the source itself could not be read or decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, BackendError::Decode(_))
    }
}

/// Pixel dimensions of a decoded raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Trait for image processing backends.
///
/// A source is decoded once into a `Raster`, then encoded any number of
/// times at different sizes. The raster is dropped by the caller once all
/// of its variants are written.
pub trait ImageBackend {
    type Raster;

    /// Read and decode a source file.
    fn decode(&self, path: &Path) -> Result<Self::Raster, BackendError>;

    /// Dimensions of a decoded raster.
    fn dimensions(&self, raster: &Self::Raster) -> Dimensions;

    /// Resize (if needed) and write one WebP file.
    fn encode(&self, raster: &Self::Raster, params: &EncodeParams) -> Result<(), BackendError>;
}
