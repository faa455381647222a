// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use retouche_core::{ColorChannel, FilterKind};

#[derive(Debug, Parser)]
#[command(name = "retouche", version, about = "Apply one stock filter to an image")]
pub struct Cli {
    /// JSON file with slider ranges and defaults (built-in defaults otherwise)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show size, brightness and the brightness-based suggested size
    Inspect {
        /// Image to inspect (JPEG or PNG)
        input: PathBuf,
    },
    /// Apply one filter and write the result
    Apply {
        /// Image to edit (JPEG or PNG)
        input: PathBuf,
        /// Where to write the result; the extension picks the format
        output: PathBuf,
        /// resize, sepia, pixelate, blur, grayscale, contrast, rotate,
        /// edges, color-channel or brightness
        #[arg(long, short)]
        filter: FilterKind,
        /// Filter strength; defaults to the slider default
        #[arg(long, short, allow_negative_numbers = true)]
        intensity: Option<f32>,
        /// Channel kept by the color-channel filter: red, green or blue
        #[arg(long)]
        channel: Option<ColorChannel>,
        /// Resize width; defaults to the suggested width
        #[arg(long, requires = "height")]
        width: Option<u32>,
        /// Resize height; defaults to the suggested height
        #[arg(long, requires = "width")]
        height: Option<u32>,
    },
    /// List the filters with their intensity ranges
    Filters,
}
