// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Editor configuration: slider ranges and defaults for every adjustable
// filter, and resolution of a user choice into a `FilterRequest`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::{Result, RetoucheError};
use crate::types::{ColorChannel, Dimensions, FilterKind, FilterRequest};

/// Inclusive slider range with the value pre-selected when the user has not
/// touched the slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl IntensityRange {
    pub const fn new(min: f32, max: f32, default: f32) -> Self {
        Self { min, max, default }
    }

    /// Pick `value` if given, the default otherwise, and reject anything
    /// outside `[min, max]`.
    pub fn resolve(&self, name: &str, value: Option<f32>) -> Result<f32> {
        let Some(value) = value else {
            return Ok(self.default);
        };
        if !value.is_finite() || value < self.min || value > self.max {
            return Err(RetoucheError::InvalidParameter(format!(
                "{name} must be between {} and {}, got {value}",
                self.min, self.max
            )));
        }
        Ok(value)
    }

    fn validate(&self, name: &str) -> Result<()> {
        let finite = self.min.is_finite() && self.max.is_finite() && self.default.is_finite();
        if !finite || self.min > self.default || self.default > self.max {
            return Err(RetoucheError::Config(format!(
                "{name}: expected min <= default <= max, got {} / {} / {}",
                self.min, self.default, self.max
            )));
        }
        Ok(())
    }
}

/// Persistent editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Gaussian blur radius.
    pub blur: IntensityRange,
    /// Pixelation factor (whole numbers only).
    pub pixelate: IntensityRange,
    /// Contrast factor; 1.0 leaves the image unchanged.
    pub contrast: IntensityRange,
    /// Edge detection intensity.
    pub edges: IntensityRange,
    /// Rotation angle in degrees, counter-clockwise.
    pub rotation: IntensityRange,
    /// Brightness factor; 1.0 leaves the image unchanged.
    pub brightness: IntensityRange,
    /// Channel kept by the color channel filter when none is chosen.
    pub default_channel: ColorChannel,
    /// Quality used when the output is encoded as JPEG (1-100).
    pub jpeg_quality: u8,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            blur: IntensityRange::new(0.0, 10.0, 5.0),
            pixelate: IntensityRange::new(1.0, 20.0, 10.0),
            contrast: IntensityRange::new(0.1, 3.0, 1.5),
            edges: IntensityRange::new(0.1, 2.0, 1.0),
            rotation: IntensityRange::new(-360.0, 360.0, 90.0),
            brightness: IntensityRange::new(0.0, 3.0, 1.0),
            default_channel: ColorChannel::Red,
            jpeg_quality: 90,
        }
    }
}

impl EditorConfig {
    /// Load settings from a JSON file. Missing fields take their defaults.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        info!("Editor configuration loaded");
        Ok(config)
    }

    /// Check every range and the JPEG quality.
    pub fn validate(&self) -> Result<()> {
        self.blur.validate("blur")?;
        self.pixelate.validate("pixelate")?;
        self.contrast.validate("contrast")?;
        self.edges.validate("edges")?;
        self.rotation.validate("rotation")?;
        self.brightness.validate("brightness")?;
        if self.blur.min < 0.0 || self.pixelate.min < 1.0 {
            return Err(RetoucheError::Config(
                "blur must start at 0 or above and pixelate at 1 or above".into(),
            ));
        }
        if self.contrast.min < 0.0 || self.edges.min < 0.0 || self.brightness.min < 0.0 {
            return Err(RetoucheError::Config(
                "contrast, edges and brightness factors cannot be negative".into(),
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(RetoucheError::Config(format!(
                "jpeg_quality must be 1-100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }

    /// Turn a user's choice into a request for the filter library.
    ///
    /// `intensity` falls back to the slider default and must lie inside the
    /// slider range. Filters without a parameter ignore it. Resize has no
    /// slider and needs explicit `dimensions`.
    pub fn build_request(
        &self,
        kind: FilterKind,
        intensity: Option<f32>,
        channel: Option<ColorChannel>,
        dimensions: Option<Dimensions>,
    ) -> Result<FilterRequest> {
        let request = match kind {
            FilterKind::Resize => {
                let dims = dimensions.ok_or_else(|| {
                    RetoucheError::invalid_parameter("resize needs a target width and height")
                })?;
                if dims.width == 0 || dims.height == 0 {
                    return Err(RetoucheError::InvalidParameter(format!(
                        "resize dimensions must be at least 1x1, got {dims}"
                    )));
                }
                FilterRequest::Resize {
                    width: dims.width,
                    height: dims.height,
                }
            }
            FilterKind::Sepia => FilterRequest::Sepia,
            FilterKind::Grayscale => FilterRequest::Grayscale,
            FilterKind::Pixelate => {
                let factor = self.pixelate.resolve("pixelate factor", intensity)?;
                if factor.fract() != 0.0 {
                    return Err(RetoucheError::InvalidParameter(format!(
                        "pixelate factor must be a whole number, got {factor}"
                    )));
                }
                FilterRequest::Pixelate {
                    factor: factor as u32,
                }
            }
            FilterKind::Blur => FilterRequest::Blur {
                radius: self.blur.resolve("blur radius", intensity)?,
            },
            FilterKind::Contrast => FilterRequest::Contrast {
                factor: self.contrast.resolve("contrast factor", intensity)?,
            },
            FilterKind::Rotate => FilterRequest::Rotate {
                degrees: self.rotation.resolve("rotation angle", intensity)?,
            },
            FilterKind::Edges => FilterRequest::Edges {
                intensity: self.edges.resolve("edge intensity", intensity)?,
            },
            FilterKind::ColorChannel => FilterRequest::ColorChannel {
                channel: channel.unwrap_or(self.default_channel),
            },
            FilterKind::Brightness => FilterRequest::Brightness {
                factor: self.brightness.resolve("brightness factor", intensity)?,
            },
        };
        debug!(?request, "Filter request resolved");
        Ok(request)
    }
}
