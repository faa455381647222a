// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filter module — one pure function per stock filter, plus `apply`, which
// runs exactly one `FilterRequest` against a bitmap.

pub mod color;
pub mod geometry;
pub mod spatial;
pub mod tone;

use retouche_core::{FilterRequest, Result};
use tracing::{info, instrument};

use crate::bitmap::Bitmap;

pub use color::{grayscale, isolate_channel, isolate_channel_by_name, sepia};
pub use geometry::{resize, rotate};
pub use spatial::{detect_edges, gaussian_blur, pixelate};
pub use tone::{adjust_brightness, adjust_contrast};

/// Run a single filter request. The input bitmap is never modified; on
/// error no output exists.
#[instrument(skip(bitmap), fields(filter = %request.kind()))]
pub fn apply(bitmap: &Bitmap, request: &FilterRequest) -> Result<Bitmap> {
    let output = match *request {
        FilterRequest::Resize { width, height } => resize(bitmap, width, height)?,
        FilterRequest::Sepia => sepia(bitmap)?,
        FilterRequest::Pixelate { factor } => pixelate(bitmap, factor)?,
        FilterRequest::Blur { radius } => gaussian_blur(bitmap, radius)?,
        FilterRequest::Grayscale => grayscale(bitmap),
        FilterRequest::Contrast { factor } => adjust_contrast(bitmap, factor)?,
        FilterRequest::Rotate { degrees } => rotate(bitmap, degrees)?,
        FilterRequest::Edges { intensity } => detect_edges(bitmap, intensity)?,
        FilterRequest::ColorChannel { channel } => isolate_channel(bitmap, channel)?,
        FilterRequest::Brightness { factor } => adjust_brightness(bitmap, factor)?,
    };
    info!(
        out_w = output.width(),
        out_h = output.height(),
        channels = output.channels(),
        "Filter applied"
    );
    Ok(output)
}
