// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bitmap — the decoded, never-empty 8-bit raster every filter consumes and
// produces. Decoding and encoding helpers live here so filters stay free of
// I/O.

use std::path::Path;

use image::{ColorType, DynamicImage, GrayImage, ImageFormat, RgbImage};
use retouche_core::{Dimensions, Result, RetoucheError};
use tracing::{debug, info, instrument};

/// Decoded image: 3-channel RGB or 1-channel gray, 8 bits per channel.
///
/// A `Bitmap` always has at least one pixel. Filters borrow it and return a
/// new `Bitmap`; nothing in this crate mutates one after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pixels: Pixels,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pixels {
    Rgb(RgbImage),
    Gray(GrayImage),
}

/// Borrowed view of the underlying buffer, for filters that treat the two
/// layouts differently.
pub(crate) enum View<'a> {
    Rgb(&'a RgbImage),
    Gray(&'a GrayImage),
}

impl Bitmap {
    // -- Construction ---------------------------------------------------------

    /// Wrap an RGB buffer. Fails with `InvalidBitmap` if it has no pixels.
    pub fn from_rgb(image: RgbImage) -> Result<Self> {
        ensure_not_empty(image.width(), image.height())?;
        Ok(Self::rgb(image))
    }

    /// Wrap a gray buffer. Fails with `InvalidBitmap` if it has no pixels.
    pub fn from_gray(image: GrayImage) -> Result<Self> {
        ensure_not_empty(image.width(), image.height())?;
        Ok(Self::gray(image))
    }

    /// Build a bitmap from interleaved 8-bit samples.
    ///
    /// `channels` must be 1 (gray) or 3 (RGB) and `data.len()` must equal
    /// `width * height * channels`.
    pub fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        ensure_not_empty(width, height)?;
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(RetoucheError::InvalidBitmap(format!(
                "{width}x{height}x{channels} needs {expected} bytes, got {}",
                data.len()
            )));
        }
        let pixels = match channels {
            1 => GrayImage::from_raw(width, height, data).map(Pixels::Gray),
            3 => RgbImage::from_raw(width, height, data).map(Pixels::Rgb),
            other => {
                return Err(RetoucheError::InvalidBitmap(format!(
                    "unsupported channel count {other} (expected 1 or 3)"
                )));
            }
        };
        pixels
            .map(|pixels| Self { pixels })
            .ok_or_else(|| RetoucheError::invalid_bitmap("raw buffer does not match dimensions"))
    }

    /// Normalise any decoded image to 8-bit RGB, or 8-bit gray when the
    /// source has no color channels. Alpha is dropped.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        ensure_not_empty(image.width(), image.height())?;
        let pixels = match image.color() {
            ColorType::L8 | ColorType::La8 | ColorType::L16 | ColorType::La16 => {
                Pixels::Gray(image.to_luma8())
            }
            ColorType::Rgb8 => match image {
                DynamicImage::ImageRgb8(rgb) => Pixels::Rgb(rgb),
                other => Pixels::Rgb(other.to_rgb8()),
            },
            _ => Pixels::Rgb(image.to_rgb8()),
        };
        Ok(Self { pixels })
    }

    /// Decode encoded bytes (JPEG, PNG, ...).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(data).map_err(|err| {
            RetoucheError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = image.width(),
            height = image.height(),
            "Image decoded from bytes"
        );
        Self::from_dynamic(image)
    }

    /// Load and decode an image file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let image = image::open(path.as_ref()).map_err(|err| match err {
            image::ImageError::IoError(io) => RetoucheError::Io(io),
            other => RetoucheError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                other
            )),
        })?;
        info!(width = image.width(), height = image.height(), "Image loaded");
        Self::from_dynamic(image)
    }

    pub(crate) fn rgb(image: RgbImage) -> Self {
        debug_assert!(image.width() > 0 && image.height() > 0);
        Self {
            pixels: Pixels::Rgb(image),
        }
    }

    pub(crate) fn gray(image: GrayImage) -> Self {
        debug_assert!(image.width() > 0 && image.height() > 0);
        Self {
            pixels: Pixels::Gray(image),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        match &self.pixels {
            Pixels::Rgb(img) => img.width(),
            Pixels::Gray(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match &self.pixels {
            Pixels::Rgb(img) => img.height(),
            Pixels::Gray(img) => img.height(),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width(), self.height())
    }

    /// 3 for RGB, 1 for gray.
    pub fn channels(&self) -> u8 {
        match &self.pixels {
            Pixels::Rgb(_) => 3,
            Pixels::Gray(_) => 1,
        }
    }

    pub fn is_gray(&self) -> bool {
        matches!(self.pixels, Pixels::Gray(_))
    }

    pub fn as_rgb(&self) -> Option<&RgbImage> {
        match &self.pixels {
            Pixels::Rgb(img) => Some(img),
            Pixels::Gray(_) => None,
        }
    }

    pub fn as_gray(&self) -> Option<&GrayImage> {
        match &self.pixels {
            Pixels::Gray(img) => Some(img),
            Pixels::Rgb(_) => None,
        }
    }

    /// Interleaved samples, row-major, `channels()` bytes per pixel.
    pub fn as_raw(&self) -> &[u8] {
        match &self.pixels {
            Pixels::Rgb(img) => img.as_raw(),
            Pixels::Gray(img) => img.as_raw(),
        }
    }

    pub fn into_dynamic(self) -> DynamicImage {
        match self.pixels {
            Pixels::Rgb(img) => DynamicImage::ImageRgb8(img),
            Pixels::Gray(img) => DynamicImage::ImageLuma8(img),
        }
    }

    // -- Shared plumbing for filters --------------------------------------------

    pub(crate) fn view(&self) -> View<'_> {
        match &self.pixels {
            Pixels::Rgb(img) => View::Rgb(img),
            Pixels::Gray(img) => View::Gray(img),
        }
    }

    /// Run a buffer-to-buffer operation on whichever layout this bitmap has.
    ///
    /// Both closures usually call the same generic `image`/`imageproc`
    /// function; the split only exists because the pixel types differ. The
    /// operation must not produce an empty buffer.
    pub(crate) fn transform<F, G>(&self, on_rgb: F, on_gray: G) -> Bitmap
    where
        F: FnOnce(&RgbImage) -> RgbImage,
        G: FnOnce(&GrayImage) -> GrayImage,
    {
        match &self.pixels {
            Pixels::Rgb(img) => Bitmap::rgb(on_rgb(img)),
            Pixels::Gray(img) => Bitmap::gray(on_gray(img)),
        }
    }

    /// Copy the bitmap with every sample passed through a lookup table.
    pub(crate) fn map_samples(&self, lut: &[u8; 256]) -> Bitmap {
        let remap = |samples: &mut [u8]| {
            for sample in samples.iter_mut() {
                *sample = lut[*sample as usize];
            }
        };
        self.transform(
            |img| {
                let mut out = img.clone();
                remap(&mut *out);
                out
            },
            |img| {
                let mut out = img.clone();
                remap(&mut *out);
                out
            },
        )
    }

    // -- Output ---------------------------------------------------------------

    /// Encode as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        let result = match &self.pixels {
            Pixels::Rgb(img) => img.write_to(&mut cursor, ImageFormat::Png),
            Pixels::Gray(img) => img.write_to(&mut cursor, ImageFormat::Png),
        };
        result.map_err(|err| RetoucheError::ImageError(format!("PNG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Encode as JPEG bytes with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        let result = match &self.pixels {
            Pixels::Rgb(img) => img.write_with_encoder(encoder),
            Pixels::Gray(img) => img.write_with_encoder(encoder),
        };
        result.map_err(|err| RetoucheError::ImageError(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Write the image to a file. The format is inferred from the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let result = match &self.pixels {
            Pixels::Rgb(img) => img.save(path.as_ref()),
            Pixels::Gray(img) => img.save(path.as_ref()),
        };
        result.map_err(|err| {
            RetoucheError::ImageError(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

fn ensure_not_empty(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(RetoucheError::InvalidBitmap(format!(
            "image has no pixels ({width}x{height})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbaImage};

    #[test]
    fn empty_buffers_are_rejected() {
        assert!(matches!(
            Bitmap::from_rgb(RgbImage::new(0, 4)),
            Err(RetoucheError::InvalidBitmap(_))
        ));
        assert!(matches!(
            Bitmap::from_gray(GrayImage::new(4, 0)),
            Err(RetoucheError::InvalidBitmap(_))
        ));
        assert!(matches!(
            Bitmap::from_raw(0, 0, 3, Vec::new()),
            Err(RetoucheError::InvalidBitmap(_))
        ));
    }

    #[test]
    fn raw_length_must_match() {
        assert!(matches!(
            Bitmap::from_raw(2, 2, 3, vec![0; 11]),
            Err(RetoucheError::InvalidBitmap(_))
        ));
        assert!(matches!(
            Bitmap::from_raw(2, 2, 4, vec![0; 16]),
            Err(RetoucheError::InvalidBitmap(_))
        ));

        let bitmap = Bitmap::from_raw(2, 1, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(bitmap.channels(), 3);
        assert_eq!(bitmap.as_rgb().unwrap().get_pixel(1, 0), &Rgb([4, 5, 6]));
    }

    #[test]
    fn rgba_source_drops_alpha() {
        let rgba = RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 40]));
        let bitmap = Bitmap::from_dynamic(DynamicImage::ImageRgba8(rgba)).unwrap();
        assert_eq!(bitmap.channels(), 3);
        assert_eq!(bitmap.as_rgb().unwrap().get_pixel(2, 1), &Rgb([10, 20, 30]));
    }

    #[test]
    fn gray_source_stays_gray() {
        let gray = GrayImage::from_pixel(3, 3, Luma([77]));
        let bitmap = Bitmap::from_dynamic(DynamicImage::ImageLuma8(gray)).unwrap();
        assert!(bitmap.is_gray());
        assert_eq!(bitmap.as_raw(), &[77u8; 9]);
    }

    #[test]
    fn png_bytes_decode_back_to_same_pixels() {
        let img = RgbImage::from_fn(5, 4, |x, y| Rgb([x as u8 * 40, y as u8 * 60, 200]));
        let bitmap = Bitmap::from_rgb(img).unwrap();

        let png = bitmap.to_png_bytes().unwrap();
        let decoded = Bitmap::from_bytes(&png).unwrap();
        assert_eq!(decoded, bitmap);
    }

    #[test]
    fn garbage_bytes_are_an_image_error() {
        assert!(matches!(
            Bitmap::from_bytes(b"definitely not a picture"),
            Err(RetoucheError::ImageError(_))
        ));
    }

    #[test]
    fn jpeg_encoding_produces_jpeg_magic() {
        let bitmap = Bitmap::from_rgb(RgbImage::from_pixel(8, 8, Rgb([120, 60, 30]))).unwrap();
        let jpeg = bitmap.to_jpeg_bytes(85).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn save_and_open_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        let bitmap = Bitmap::from_gray(GrayImage::from_fn(4, 4, |x, y| Luma([(x * 16 + y) as u8])))
            .unwrap();

        bitmap.save(&path).unwrap();
        assert_eq!(Bitmap::open(&path).unwrap(), bitmap);
    }

    #[test]
    fn opening_a_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Bitmap::open(dir.path().join("missing.png")),
            Err(RetoucheError::Io(_))
        ));
    }
}
