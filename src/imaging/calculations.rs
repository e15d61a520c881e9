//! Pure calculation functions for output dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;

/// Name of the folder holding the unresized copy of every source.
pub const ORIGINAL_SIZE_DIR: &str = "originalsize";

/// Which output folder a variant belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantLabel {
    /// One of the configured target widths.
    Width(u32),
    /// The full-resolution copy.
    OriginalSize,
}

impl VariantLabel {
    /// Folder name under the output root (`"640"`, `"originalsize"`).
    pub fn dir_name(self) -> String {
        match self {
            VariantLabel::Width(w) => w.to_string(),
            VariantLabel::OriginalSize => ORIGINAL_SIZE_DIR.to_string(),
        }
    }
}

impl std::fmt::Display for VariantLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariantLabel::Width(w) => write!(f, "{w}px"),
            VariantLabel::OriginalSize => f.write_str(ORIGINAL_SIZE_DIR),
        }
    }
}

/// A single output to produce for one source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPlan {
    pub label: VariantLabel,
    /// Calculated output width.
    pub width: u32,
    /// Calculated output height.
    pub height: u32,
}

/// Height for `target_width` that keeps the source aspect ratio.
///
/// `round(H * w / W)`, never less than one pixel. The caller guarantees a
/// non-zero source width.
///
/// # Examples
/// ```
/// # use srcset_webp::imaging::{Dimensions, proportional_height};
/// let src = Dimensions { width: 2400, height: 1600 };
/// assert_eq!(proportional_height(src, 640), 427);
/// assert_eq!(proportional_height(src, 320), 213);
/// ```
pub fn proportional_height(original: Dimensions, target_width: u32) -> u32 {
    let h = f64::from(original.height) * f64::from(target_width) / f64::from(original.width);
    (h.round() as u32).max(1)
}

/// Output dimensions for one target width.
///
/// Without `upscale`, a target at or above the source width yields the
/// source dimensions unchanged: the variant is still written, just not
/// enlarged.
pub fn target_dimensions(original: Dimensions, target_width: u32, upscale: bool) -> (u32, u32) {
    if target_width >= original.width && !upscale {
        return (original.width, original.height);
    }
    (target_width, proportional_height(original, target_width))
}

/// Plan every variant for a source: one per width, in the given order,
/// followed by the `originalsize` copy.
pub fn plan_variants(original: Dimensions, widths: &[u32], upscale: bool) -> Vec<VariantPlan> {
    let mut plans: Vec<VariantPlan> = widths
        .iter()
        .map(|&w| {
            let (width, height) = target_dimensions(original, w, upscale);
            VariantPlan {
                label: VariantLabel::Width(w),
                width,
                height,
            }
        })
        .collect();

    plans.push(VariantPlan {
        label: VariantLabel::OriginalSize,
        width: original.width,
        height: original.height,
    });

    plans
}
