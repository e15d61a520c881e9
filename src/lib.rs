//! # srcset-webp
//!
//! Turns a folder of photos into WebP source sets for responsive images.
//! Every source is written once per target width into a folder named after
//! that width, plus a full-size copy, so an HTML `srcset` can point at
//! `640/photo.webp 640w, 1200/photo.webp 1200w, ...`.
//!
//! # Pipeline
//!
//! ```text
//! 1. Scan      folder/    →  sources     (extension match, sorted, lazy)
//! 2. Process   sources    →  savepath/   (decode once, resize, encode WebP)
//! 3. Report    results    →  stdout      (progress lines + summary block)
//! ```
//!
//! Files are handled strictly one at a time and each file is independent:
//! a corrupt source or a failed write is recorded in the run summary and
//! the batch moves on.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: supported formats, `can_decode`, lazy folder walk |
//! | [`process`] | Stage 2: per-file, per-width conversion with per-file results |
//! | [`summary`] | Per-file outcomes and the run accumulator |
//! | [`output`] | Progress, summary, and info-file formatting |
//! | [`imaging`] | Dimension math, backend trait, `image` + libwebp backend |
//! | [`config`] | Job configuration, TOML settings file, validation |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## No Upscaling By Default
//!
//! A target width at or above the source width still produces a file in
//! that width's folder, encoded at the source's own size. Every successful
//! source therefore yields exactly `widths + 1` files and a `srcset` built
//! from the folder names never points at a missing file. `--upscale` enlarges
//! instead.
//!
//! ## Decode Once
//!
//! Each source is decoded a single time and every variant is resized from
//! that raster. Transparent images are flattened onto white first.
//!
//! ## Lossy WebP Via libwebp
//!
//! The `image` crate only writes lossless WebP, which ignores quality. The
//! `webp` crate's libwebp bindings give the quality knob web delivery needs.

pub mod config;
pub mod imaging;
pub mod logging;
pub mod output;
pub mod process;
pub mod scan;
pub mod summary;

#[cfg(test)]
pub(crate) mod test_helpers;
