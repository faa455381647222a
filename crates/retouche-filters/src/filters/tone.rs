// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Point operations on sample values: contrast around mid-gray and
// brightness scaling. Both work on RGB and gray bitmaps through a 256-entry
// lookup table.

use retouche_core::Result;
use retouche_core::error::ensure_at_least;
use tracing::{info, instrument};

use crate::bitmap::Bitmap;

/// Scale every sample's distance from mid-gray (128) by `factor`.
///
/// 1.0 is the identity, 0.0 yields a flat 128 image. Negative or non-finite
/// factors are rejected.
#[instrument(skip(bitmap), fields(width = bitmap.width(), height = bitmap.height()))]
pub fn adjust_contrast(bitmap: &Bitmap, factor: f32) -> Result<Bitmap> {
    let factor = ensure_at_least("contrast factor", factor, 0.0)?;
    info!("Adjusting contrast");

    let lut = build_lut(|value| factor * (value - 128.0) + 128.0);
    Ok(bitmap.map_samples(&lut))
}

/// Multiply every sample by `factor`, scaling luminance by the same amount.
///
/// 1.0 is the identity, 0.0 yields black.
#[instrument(skip(bitmap), fields(width = bitmap.width(), height = bitmap.height()))]
pub fn adjust_brightness(bitmap: &Bitmap, factor: f32) -> Result<Bitmap> {
    let factor = ensure_at_least("brightness factor", factor, 0.0)?;
    info!("Adjusting brightness");

    Ok(bitmap.map_samples(&scale_lut(factor)))
}

/// Lookup table multiplying a sample by `factor`, rounded and clamped.
pub(crate) fn scale_lut(factor: f32) -> [u8; 256] {
    build_lut(|value| value * factor)
}

fn build_lut(curve: impl Fn(f32) -> f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (value, slot) in lut.iter_mut().enumerate() {
        *slot = curve(value as f32).round().clamp(0.0, 255.0) as u8;
    }
    lut
}
