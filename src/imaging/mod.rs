//! Image processing: decode once, resize, encode WebP.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` |
//! | **Resize** | `image::imageops::resize` (Lanczos3) |
//! | **Encode → WebP** | `webp::Encoder` (libwebp, lossy) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing one output file
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{
    ORIGINAL_SIZE_DIR, VariantLabel, VariantPlan, plan_variants, proportional_height,
    target_dimensions,
};
pub use params::{EncodeParams, Quality};
pub use rust_backend::RustBackend;
