// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Brightness measurement and the brightness-driven suggested resize.

use retouche_core::Dimensions;
use tracing::{debug, instrument};

use crate::bitmap::Bitmap;
use crate::filters::color::luma;

/// Mean luma of the bitmap divided by 255, in `[0, 1]`.
///
/// All-white is exactly 1.0 and all-black exactly 0.0.
#[instrument(skip(bitmap), fields(width = bitmap.width(), height = bitmap.height()))]
pub fn measure_brightness(bitmap: &Bitmap) -> f64 {
    let gray = luma(bitmap);
    let sum: u64 = gray.as_raw().iter().map(|&v| u64::from(v)).sum();
    let count = gray.as_raw().len() as f64;
    let brightness = sum as f64 / count / 255.0;
    debug!(brightness, "Brightness measured");
    brightness
}

/// Width and height scaled by the measured brightness, truncated, and never
/// below 1.
///
/// Dark images get small suggestions, bright images stay near full size.
pub fn suggested_dimensions(bitmap: &Bitmap) -> Dimensions {
    scale_dimensions(bitmap.dimensions(), measure_brightness(bitmap))
}

fn scale_dimensions(dims: Dimensions, brightness: f64) -> Dimensions {
    let scale = |extent: u32| ((f64::from(extent) * brightness) as u32).max(1);
    Dimensions::new(scale(dims.width), scale(dims.height))
}
