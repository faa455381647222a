// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Retouche.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RetoucheError;

/// A single RGB color channel, used by the channel isolation filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChannel {
    Red,
    Green,
    Blue,
}

impl ColorChannel {
    /// Index of this channel inside an `[r, g, b]` pixel.
    pub fn index(self) -> usize {
        match self {
            ColorChannel::Red => 0,
            ColorChannel::Green => 1,
            ColorChannel::Blue => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorChannel::Red => "red",
            ColorChannel::Green => "green",
            ColorChannel::Blue => "blue",
        }
    }
}

impl fmt::Display for ColorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for ColorChannel {
    type Err = RetoucheError;

    /// Parse `red`, `green` or `blue` (case-insensitive). Anything else,
    /// including `violet`, has no channel mapping and is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(ColorChannel::Red),
            "green" => Ok(ColorChannel::Green),
            "blue" => Ok(ColorChannel::Blue),
            other => Err(RetoucheError::InvalidParameter(format!(
                "unknown color channel '{other}' (expected red, green or blue)"
            ))),
        }
    }
}

/// Target size for a resize, or a suggested size for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The filters a caller can select, without their parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    Resize,
    Sepia,
    Pixelate,
    Blur,
    Grayscale,
    Contrast,
    Rotate,
    Edges,
    ColorChannel,
    Brightness,
}

impl FilterKind {
    pub const ALL: [FilterKind; 10] = [
        FilterKind::Resize,
        FilterKind::Sepia,
        FilterKind::Pixelate,
        FilterKind::Blur,
        FilterKind::Grayscale,
        FilterKind::Contrast,
        FilterKind::Rotate,
        FilterKind::Edges,
        FilterKind::ColorChannel,
        FilterKind::Brightness,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Resize => "resize",
            FilterKind::Sepia => "sepia",
            FilterKind::Pixelate => "pixelate",
            FilterKind::Blur => "blur",
            FilterKind::Grayscale => "grayscale",
            FilterKind::Contrast => "contrast",
            FilterKind::Rotate => "rotate",
            FilterKind::Edges => "edges",
            FilterKind::ColorChannel => "color-channel",
            FilterKind::Brightness => "brightness",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = RetoucheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = FilterKind::ALL.iter().map(|k| k.name()).collect();
                RetoucheError::InvalidParameter(format!(
                    "unknown filter '{s}' (expected one of: {})",
                    known.join(", ")
                ))
            })
    }
}

/// One user interaction: exactly one filter plus its parameter.
///
/// Built fresh for every request and never mutated afterwards, so a
/// presentation layer can keep its widget state out of the filter library.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "filter", rename_all = "kebab-case")]
pub enum FilterRequest {
    Resize { width: u32, height: u32 },
    Sepia,
    Pixelate { factor: u32 },
    Blur { radius: f32 },
    Grayscale,
    Contrast { factor: f32 },
    Rotate { degrees: f32 },
    Edges { intensity: f32 },
    ColorChannel { channel: ColorChannel },
    Brightness { factor: f32 },
}

impl FilterRequest {
    pub fn kind(&self) -> FilterKind {
        match self {
            FilterRequest::Resize { .. } => FilterKind::Resize,
            FilterRequest::Sepia => FilterKind::Sepia,
            FilterRequest::Pixelate { .. } => FilterKind::Pixelate,
            FilterRequest::Blur { .. } => FilterKind::Blur,
            FilterRequest::Grayscale => FilterKind::Grayscale,
            FilterRequest::Contrast { .. } => FilterKind::Contrast,
            FilterRequest::Rotate { .. } => FilterKind::Rotate,
            FilterRequest::Edges { .. } => FilterKind::Edges,
            FilterRequest::ColorChannel { .. } => FilterKind::ColorChannel,
            FilterRequest::Brightness { .. } => FilterKind::Brightness,
        }
    }
}
