// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometric filters: rotation onto an expanded canvas and exact resizing.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use retouche_core::{Dimensions, Result, RetoucheError};
use tracing::{debug, info, instrument};

use crate::bitmap::Bitmap;

/// Tolerance, in degrees, for treating an angle as a quarter turn.
const QUARTER_TURN_EPSILON: f32 = 0.01;

/// Rotate counter-clockwise by `degrees` using bicubic resampling.
///
/// The canvas grows to the bounding box of the rotated image so nothing is
/// cropped; uncovered areas are black. Quarter turns are lossless transposes
/// and a full turn (or 0) returns an unchanged copy.
#[instrument(skip(bitmap), fields(width = bitmap.width(), height = bitmap.height()))]
pub fn rotate(bitmap: &Bitmap, degrees: f32) -> Result<Bitmap> {
    if !degrees.is_finite() {
        return Err(RetoucheError::InvalidParameter(format!(
            "rotation angle must be a finite number, got {degrees}"
        )));
    }
    info!("Rotating image");

    // Fast-path for exact multiples of 90.
    let normalised = degrees.rem_euclid(360.0);
    let near = |target: f32| (normalised - target).abs() < QUARTER_TURN_EPSILON;
    if near(0.0) || near(360.0) {
        return Ok(bitmap.clone());
    }
    // `image` turns clockwise, so a counter-clockwise quarter is its 270.
    if near(90.0) {
        return Ok(bitmap.transform(
            |img| imageops::rotate270(img),
            |img| imageops::rotate270(img),
        ));
    }
    if near(180.0) {
        return Ok(bitmap.transform(
            |img| imageops::rotate180(img),
            |img| imageops::rotate180(img),
        ));
    }
    if near(270.0) {
        return Ok(bitmap.transform(
            |img| imageops::rotate90(img),
            |img| imageops::rotate90(img),
        ));
    }

    let (out_w, out_h) = expanded_canvas(bitmap.width(), bitmap.height(), degrees);
    let projection = centred_rotation(bitmap.width(), bitmap.height(), out_w, out_h, degrees);
    debug!(out_w, out_h, "General rotation onto expanded canvas");

    Ok(bitmap.transform(
        |img| {
            let mut out = RgbImage::new(out_w, out_h);
            warp_into(img, &projection, Interpolation::Bicubic, Rgb([0, 0, 0]), &mut out);
            out
        },
        |img| {
            let mut out = GrayImage::new(out_w, out_h);
            warp_into(img, &projection, Interpolation::Bicubic, Luma([0]), &mut out);
            out
        },
    ))
}

/// Resize to exactly `width` x `height`, ignoring aspect ratio, with bicubic
/// (Catmull-Rom) filtering.
#[instrument(skip(bitmap), fields(from_w = bitmap.width(), from_h = bitmap.height()))]
pub fn resize(bitmap: &Bitmap, width: u32, height: u32) -> Result<Bitmap> {
    if width == 0 || height == 0 {
        return Err(RetoucheError::InvalidParameter(format!(
            "resize dimensions must be at least 1x1, got {}",
            Dimensions::new(width, height)
        )));
    }
    info!("Resizing image");

    Ok(bitmap.transform(
        |img| imageops::resize(img, width, height, FilterType::CatmullRom),
        |img| imageops::resize(img, width, height, FilterType::CatmullRom),
    ))
}

/// Size of the smallest canvas holding a `width` x `height` image rotated by
/// `degrees`.
fn expanded_canvas(width: u32, height: u32, degrees: f32) -> (u32, u32) {
    let (sin, cos) = f64::from(degrees).to_radians().sin_cos();
    let (w, h) = (f64::from(width), f64::from(height));
    // Shave float noise so e.g. 40.0000001 does not round up to 41.
    let fit = |extent: f64| ((extent - 1e-6).ceil() as u32).max(1);
    (
        fit(w * cos.abs() + h * sin.abs()),
        fit(w * sin.abs() + h * cos.abs()),
    )
}

/// Input-to-output mapping: move the input centre to the origin, rotate,
/// then move the origin to the output centre.
///
/// `Projection::rotate` is clockwise in image coordinates, hence the negated
/// angle.
fn centred_rotation(in_w: u32, in_h: u32, out_w: u32, out_h: u32, degrees: f32) -> Projection {
    let (in_cx, in_cy) = (in_w as f32 / 2.0, in_h as f32 / 2.0);
    let (out_cx, out_cy) = (out_w as f32 / 2.0, out_h as f32 / 2.0);
    Projection::translate(out_cx, out_cy)
        * Projection::rotate(-degrees.to_radians())
        * Projection::translate(-in_cx, -in_cy)
}
