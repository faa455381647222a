// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// retouche-filters — Stateless image filters for the Retouche editor.
//
// Provides the `Bitmap` value type (decode, encode, never empty), the stock
// filters (sepia, pixelate, Gaussian blur, grayscale, contrast, rotation,
// edge detection, color channel isolation, brightness, resize), and the
// brightness measurement used to suggest a resize target.

pub mod bitmap;
pub mod filters;
pub mod measure;

// Re-export the primary API so callers can use `retouche_filters::sepia` etc.
pub use bitmap::Bitmap;
pub use filters::{
    adjust_brightness, adjust_contrast, apply, detect_edges, gaussian_blur, grayscale,
    isolate_channel, isolate_channel_by_name, pixelate, resize, rotate, sepia,
};
pub use measure::{measure_brightness, suggested_dimensions};
