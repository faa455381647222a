// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Neighbourhood filters: pixelation by nearest-neighbour down/up sampling,
// Gaussian blur, and 3x3 edge finding.

use image::imageops::{self, FilterType};
use imageproc::filter::gaussian_blur_f32;
use retouche_core::error::ensure_at_least;
use retouche_core::{Result, RetoucheError};
use tracing::{debug, info, instrument};

use crate::bitmap::Bitmap;
use crate::filters::tone::scale_lut;

/// Pixelate by shrinking to a square of side `max(1, width / factor)` and
/// blowing it back up to the original size, both with nearest-neighbour
/// sampling.
///
/// The square uses the width for both sides, so non-square images are
/// stretched while blocky. A factor of 1 returns an unchanged copy.
#[instrument(skip(bitmap), fields(width = bitmap.width(), height = bitmap.height()))]
pub fn pixelate(bitmap: &Bitmap, factor: u32) -> Result<Bitmap> {
    if factor == 0 {
        return Err(RetoucheError::invalid_parameter(
            "pixelate factor must be >= 1, got 0",
        ));
    }
    if factor == 1 {
        debug!("Factor 1, nothing to pixelate");
        return Ok(bitmap.clone());
    }

    let (width, height) = (bitmap.width(), bitmap.height());
    let side = (width / factor).max(1);
    info!(side, "Pixelating");

    Ok(bitmap.transform(
        |img| {
            let small = imageops::resize(img, side, side, FilterType::Nearest);
            imageops::resize(&small, width, height, FilterType::Nearest)
        },
        |img| {
            let small = imageops::resize(img, side, side, FilterType::Nearest);
            imageops::resize(&small, width, height, FilterType::Nearest)
        },
    ))
}

/// Radii below this leave every off-centre kernel tap at 0 in `f32`.
const MIN_BLUR_RADIUS: f32 = 0.01;

/// Gaussian blur with `radius` as the standard deviation.
///
/// Radii too small to move a sample return an unchanged copy. Radii wider
/// than the image are capped at its longest side, past which the result
/// stops changing.
#[instrument(skip(bitmap), fields(width = bitmap.width(), height = bitmap.height()))]
pub fn gaussian_blur(bitmap: &Bitmap, radius: f32) -> Result<Bitmap> {
    let radius = ensure_at_least("blur radius", radius, 0.0)?;
    if radius < MIN_BLUR_RADIUS {
        debug!("Radius too small to blur");
        return Ok(bitmap.clone());
    }
    let sigma = radius.min(bitmap.width().max(bitmap.height()) as f32);
    info!(sigma, "Applying Gaussian blur");

    Ok(bitmap.transform(
        |img| gaussian_blur_f32(img, sigma),
        |img| gaussian_blur_f32(img, sigma),
    ))
}

/// 3x3 "find edges" kernel: 8 at the centre, -1 on every neighbour.
const EDGE_KERNEL: [[i32; 3]; 3] = [[-1, -1, -1], [-1, 8, -1], [-1, -1, -1]];

/// Highlight edges, then scale the result by `intensity`.
///
/// The kernel runs on every channel independently and is clamped to
/// `[0, 255]`. The one-pixel border has no full neighbourhood and keeps its
/// source value. The scaling step rounds and clamps as well, so intensities
/// above 1 saturate instead of wrapping.
#[instrument(skip(bitmap), fields(width = bitmap.width(), height = bitmap.height()))]
pub fn detect_edges(bitmap: &Bitmap, intensity: f32) -> Result<Bitmap> {
    let intensity = ensure_at_least("edge intensity", intensity, 0.0)?;
    info!("Detecting edges");

    let width = bitmap.width() as usize;
    let height = bitmap.height() as usize;
    let channels = bitmap.channels() as usize;
    let src = bitmap.as_raw();
    let stride = width * channels;
    let mut out = src.to_vec();

    if width >= 3 && height >= 3 {
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                for c in 0..channels {
                    let mut acc = 0i32;
                    for (ky, row) in EDGE_KERNEL.iter().enumerate() {
                        for (kx, weight) in row.iter().enumerate() {
                            let sy = y + ky - 1;
                            let sx = x + kx - 1;
                            acc += weight * i32::from(src[sy * stride + sx * channels + c]);
                        }
                    }
                    out[y * stride + x * channels + c] = acc.clamp(0, 255) as u8;
                }
            }
        }
    } else {
        debug!("Bitmap smaller than the kernel, only scaling");
    }

    let lut = scale_lut(intensity);
    for sample in out.iter_mut() {
        *sample = lut[*sample as usize];
    }

    Bitmap::from_raw(bitmap.width(), bitmap.height(), bitmap.channels(), out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> Bitmap {
        Bitmap::from_rgb(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 13 % 256) as u8, (y * 29 % 256) as u8, ((x + y) * 7 % 256) as u8])
        }))
        .unwrap()
    }

    #[test]
    fn pixelate_factor_one_is_identity() {
        let square = gradient(8, 8);
        assert_eq!(pixelate(&square, 1).unwrap(), square);

        let tall = gradient(3, 7);
        assert_eq!(pixelate(&tall, 1).unwrap(), tall);
    }

    #[test]
    fn pixelate_keeps_dimensions_and_makes_blocks() {
        let bitmap = gradient(8, 8);
        let out = pixelate(&bitmap, 2).unwrap();
        assert_eq!(out.dimensions(), bitmap.dimensions());

        let rgb = out.as_rgb().unwrap();
        for by in (0..8).step_by(2) {
            for bx in (0..8).step_by(2) {
                let corner = rgb.get_pixel(bx, by);
                assert_eq!(rgb.get_pixel(bx + 1, by), corner);
                assert_eq!(rgb.get_pixel(bx, by + 1), corner);
                assert_eq!(rgb.get_pixel(bx + 1, by + 1), corner);
            }
        }
    }

    #[test]
    fn pixelate_uses_width_for_both_sides_of_the_square() {
        // 4 wide, 8 tall, factor 2: a 2x2 square stretched back gives 2x4 blocks.
        let bitmap = gradient(4, 8);
        let out = pixelate(&bitmap, 2).unwrap();
        assert_eq!(out.dimensions(), bitmap.dimensions());

        let rgb = out.as_rgb().unwrap();
        for by in [0, 4] {
            for bx in [0, 2] {
                let corner = rgb.get_pixel(bx, by);
                for y in by..by + 4 {
                    for x in bx..bx + 2 {
                        assert_eq!(rgb.get_pixel(x, y), corner, "pixel ({x},{y})");
                    }
                }
            }
        }
        assert_ne!(rgb.get_pixel(0, 0), rgb.get_pixel(0, 4));
    }

    #[test]
    fn pixelate_huge_factor_gives_single_color() {
        let bitmap = gradient(10, 6);
        let out = pixelate(&bitmap, 50).unwrap();
        assert_eq!(out.dimensions(), bitmap.dimensions());
        let first = *out.as_rgb().unwrap().get_pixel(0, 0);
        assert!(out.as_rgb().unwrap().pixels().all(|p| *p == first));
    }

    #[test]
    fn pixelate_rejects_zero() {
        assert!(matches!(
            pixelate(&gradient(4, 4), 0),
            Err(RetoucheError::InvalidParameter(_))
        ));
    }

    #[test]
    fn blur_zero_is_identity() {
        let bitmap = gradient(9, 5);
        assert_eq!(gaussian_blur(&bitmap, 0.0).unwrap(), bitmap);
    }

    #[test]
    fn blur_smooths_a_single_bright_pixel() {
        let mut img = GrayImage::new(9, 9);
        img.put_pixel(4, 4, Luma([255]));
        let bitmap = Bitmap::from_gray(img).unwrap();

        let out = gaussian_blur(&bitmap, 1.5).unwrap();
        let blurred = out.as_gray().unwrap();
        assert_eq!(out.dimensions(), bitmap.dimensions());
        assert!(blurred.get_pixel(4, 4).0[0] < 255);
        assert!(blurred.get_pixel(5, 4).0[0] > 0);
    }

    #[test]
    fn blur_with_vanishing_radius_is_identity() {
        let bitmap = Bitmap::from_rgb(RgbImage::from_pixel(4, 4, Rgb([200, 100, 50]))).unwrap();
        assert_eq!(gaussian_blur(&bitmap, 1e-30).unwrap(), bitmap);
        assert_eq!(gaussian_blur(&bitmap, 0.005).unwrap(), bitmap);
    }

    #[test]
    fn blur_with_enormous_radius_is_capped() {
        let bitmap = gradient(4, 4);
        let out = gaussian_blur(&bitmap, 1e20).unwrap();
        assert_eq!(out.dimensions(), bitmap.dimensions());
        assert_eq!(gaussian_blur(&bitmap, f32::MAX).unwrap(), out);
    }

    #[test]
    fn blur_rejects_negative_radius() {
        assert!(matches!(
            gaussian_blur(&gradient(4, 4), -1.0),
            Err(RetoucheError::InvalidParameter(_))
        ));
    }

    #[test]
    fn flat_image_has_no_interior_edges() {
        let bitmap = Bitmap::from_rgb(RgbImage::from_pixel(6, 5, Rgb([90, 90, 90]))).unwrap();
        let out = detect_edges(&bitmap, 1.0).unwrap();
        let rgb = out.as_rgb().unwrap();

        for y in 1..4 {
            for x in 1..5 {
                assert_eq!(rgb.get_pixel(x, y), &Rgb([0, 0, 0]));
            }
        }
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([90, 90, 90]));
    }

    #[test]
    fn edges_scale_and_saturate() {
        let mut img = GrayImage::new(5, 5);
        img.put_pixel(2, 2, Luma([20]));
        let bitmap = Bitmap::from_gray(img).unwrap();

        let unit = detect_edges(&bitmap, 1.0).unwrap();
        // centre: 8 * 20; neighbours: -20 clamps to 0
        assert_eq!(unit.as_gray().unwrap().get_pixel(2, 2).0[0], 160);
        assert_eq!(unit.as_gray().unwrap().get_pixel(1, 2).0[0], 0);

        let boosted = detect_edges(&bitmap, 3.0).unwrap();
        assert_eq!(boosted.as_gray().unwrap().get_pixel(2, 2).0[0], 255);

        let halved = detect_edges(&bitmap, 0.5).unwrap();
        assert_eq!(halved.as_gray().unwrap().get_pixel(2, 2).0[0], 80);
    }

    #[test]
    fn tiny_bitmap_is_only_scaled() {
        let bitmap = Bitmap::from_gray(GrayImage::from_pixel(2, 2, Luma([100]))).unwrap();
        let out = detect_edges(&bitmap, 2.0).unwrap();
        assert_eq!(out.as_raw(), &[200, 200, 200, 200]);
    }

    #[test]
    fn edges_reject_negative_intensity() {
        assert!(matches!(
            detect_edges(&gradient(4, 4), -0.1),
            Err(RetoucheError::InvalidParameter(_))
        ));
    }
}
