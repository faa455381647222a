// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-pixel color filters: sepia toning, luma grayscale, and single channel
// isolation.

use std::borrow::Cow;

use image::{GrayImage, Luma, Rgb, RgbImage};
use retouche_core::{ColorChannel, Result, RetoucheError};
use tracing::{debug, info, instrument};

use crate::bitmap::{Bitmap, View};

/// Rows of the sepia matrix, applied to `(r, g, b)`.
const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Apply the classic sepia tone matrix.
///
/// Each output channel is clamped to 255 and its fractional part dropped.
/// Needs an RGB bitmap.
#[instrument(skip(bitmap), fields(width = bitmap.width(), height = bitmap.height()))]
pub fn sepia(bitmap: &Bitmap) -> Result<Bitmap> {
    let rgb = require_rgb(bitmap, "sepia")?;
    info!("Applying sepia");

    let mut out = RgbImage::new(rgb.width(), rgb.height());
    for (dst, src) in out.pixels_mut().zip(rgb.pixels()) {
        let [r, g, b] = src.0.map(f32::from);
        let tone = |row: [f32; 3]| -> u8 {
            let value = row[0] * r + row[1] * g + row[2] * b;
            value.clamp(0.0, 255.0) as u8
        };
        *dst = Rgb([tone(SEPIA[0]), tone(SEPIA[1]), tone(SEPIA[2])]);
    }
    Ok(Bitmap::rgb(out))
}

/// Convert to a single-channel luma bitmap. A gray input is copied.
#[instrument(skip(bitmap), fields(width = bitmap.width(), height = bitmap.height()))]
pub fn grayscale(bitmap: &Bitmap) -> Bitmap {
    info!("Converting to grayscale");
    Bitmap::gray(luma(bitmap).into_owned())
}

/// Keep one RGB channel and zero the other two.
///
/// The kept channel's samples are copied unchanged into a fresh buffer.
#[instrument(skip(bitmap), fields(width = bitmap.width(), height = bitmap.height()))]
pub fn isolate_channel(bitmap: &Bitmap, channel: ColorChannel) -> Result<Bitmap> {
    let rgb = require_rgb(bitmap, "color channel isolation")?;
    info!("Isolating color channel");

    let keep = channel.index();
    let mut out = RgbImage::new(rgb.width(), rgb.height());
    for (dst, src) in out.pixels_mut().zip(rgb.pixels()) {
        dst.0[keep] = src.0[keep];
    }
    Ok(Bitmap::rgb(out))
}

/// [`isolate_channel`] for a channel chosen by name (`red`, `green`, `blue`).
///
/// Any other name, `violet` included, is an `InvalidParameter`.
pub fn isolate_channel_by_name(bitmap: &Bitmap, name: &str) -> Result<Bitmap> {
    let channel: ColorChannel = name.parse()?;
    isolate_channel(bitmap, channel)
}

/// Luma view of a bitmap: borrowed when already gray, converted otherwise.
///
/// Uses BT.601 weights in 16-bit fixed point so white stays 255 and black 0.
pub(crate) fn luma(bitmap: &Bitmap) -> Cow<'_, GrayImage> {
    let rgb = match bitmap.view() {
        View::Gray(gray) => return Cow::Borrowed(gray),
        View::Rgb(rgb) => rgb,
    };
    let mut out = GrayImage::new(rgb.width(), rgb.height());
    for (dst, src) in out.pixels_mut().zip(rgb.pixels()) {
        *dst = Luma([luma_of(src.0)]);
    }
    debug!("Luma computed");
    Cow::Owned(out)
}

fn luma_of([r, g, b]: [u8; 3]) -> u8 {
    let weighted = 19_595 * u32::from(r) + 38_470 * u32::from(g) + 7_471 * u32::from(b);
    ((weighted + 0x8000) >> 16) as u8
}

fn require_rgb<'a>(bitmap: &'a Bitmap, filter: &str) -> Result<&'a RgbImage> {
    bitmap.as_rgb().ok_or_else(|| {
        RetoucheError::InvalidParameter(format!(
            "{filter} needs an RGB bitmap, got {} channel(s)",
            bitmap.channels()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_bitmap(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 3]) -> Bitmap {
        Bitmap::from_rgb(RgbImage::from_fn(width, height, |x, y| Rgb(f(x, y)))).unwrap()
    }

    #[test]
    fn sepia_on_mid_gray_truncates_each_channel() {
        let bitmap = rgb_bitmap(4, 4, |_, _| [128, 128, 128]);
        let out = sepia(&bitmap).unwrap();

        // 128 * 1.351 = 172.928, 128 * 1.203 = 153.984, 128 * 0.937 = 119.936
        for pixel in out.as_rgb().unwrap().pixels() {
            assert_eq!(pixel, &Rgb([172, 153, 119]));
        }
        assert_eq!(out.dimensions(), bitmap.dimensions());
    }

    #[test]
    fn sepia_clamps_bright_pixels() {
        let bitmap = rgb_bitmap(2, 2, |_, _| [255, 255, 255]);
        let out = sepia(&bitmap).unwrap();
        // 255 * 0.937 = 238.935
        assert_eq!(out.as_rgb().unwrap().get_pixel(0, 0), &Rgb([255, 255, 238]));
    }

    #[test]
    fn sepia_rejects_gray_input() {
        let gray = Bitmap::from_gray(GrayImage::new(2, 2)).unwrap();
        assert!(matches!(sepia(&gray), Err(RetoucheError::InvalidParameter(_))));
    }

    #[test]
    fn grayscale_is_single_channel_with_luma_weights() {
        let bitmap = rgb_bitmap(3, 1, |x, _| match x {
            0 => [255, 0, 0],
            1 => [0, 255, 0],
            _ => [255, 255, 255],
        });
        let out = grayscale(&bitmap);

        assert!(out.is_gray());
        assert_eq!(out.dimensions(), bitmap.dimensions());
        assert_eq!(out.as_raw(), &[76, 150, 255]);
    }

    #[test]
    fn grayscale_of_gray_is_a_copy() {
        let gray = Bitmap::from_gray(GrayImage::from_fn(3, 3, |x, y| Luma([(x * 30 + y) as u8])))
            .unwrap();
        assert_eq!(grayscale(&gray), gray);
    }

    #[test]
    fn isolate_red_keeps_red_and_zeroes_the_rest() {
        let bitmap = rgb_bitmap(5, 3, |x, y| [x as u8 * 50, y as u8 * 70 + 1, 99]);
        let out = isolate_channel(&bitmap, ColorChannel::Red).unwrap();

        let src = bitmap.as_rgb().unwrap();
        for (x, y, pixel) in out.as_rgb().unwrap().enumerate_pixels() {
            assert_eq!(pixel.0[0], src.get_pixel(x, y).0[0]);
            assert_eq!(pixel.0[1], 0);
            assert_eq!(pixel.0[2], 0);
        }
    }

    #[test]
    fn isolate_leaves_input_untouched() {
        let bitmap = rgb_bitmap(2, 2, |_, _| [10, 20, 30]);
        let before = bitmap.clone();
        let out = isolate_channel(&bitmap, ColorChannel::Blue).unwrap();

        assert_eq!(bitmap, before);
        assert_eq!(out.as_rgb().unwrap().get_pixel(1, 1), &Rgb([0, 0, 30]));
    }

    #[test]
    fn isolate_by_name_rejects_violet() {
        let bitmap = rgb_bitmap(2, 2, |_, _| [10, 20, 30]);
        assert!(matches!(
            isolate_channel_by_name(&bitmap, "violet"),
            Err(RetoucheError::InvalidParameter(_))
        ));
        let green = isolate_channel_by_name(&bitmap, "green").unwrap();
        assert_eq!(green.as_rgb().unwrap().get_pixel(0, 0), &Rgb([0, 20, 0]));
    }
}
