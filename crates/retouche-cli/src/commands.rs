// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command handlers. Each one decodes its input, makes exactly one call into
// the filter library and writes what it produced.

use std::path::Path;

use anyhow::Context;
use retouche_core::{ColorChannel, Dimensions, EditorConfig, FilterKind};
use retouche_filters::{Bitmap, apply, measure_brightness, suggested_dimensions};
use tracing::{info, instrument};

use crate::cli::{Cli, Commands};

pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Inspect { input } => {
            let report = inspect(input)?;
            println!("{report}");
        }
        Commands::Apply {
            input,
            output,
            filter,
            intensity,
            channel,
            width,
            height,
        } => {
            let dimensions = match (width, height) {
                (Some(w), Some(h)) => Some(Dimensions::new(*w, *h)),
                _ => None,
            };
            let options = ApplyOptions {
                filter: *filter,
                intensity: *intensity,
                channel: *channel,
                dimensions,
            };
            let written = apply_to_file(&config, input, output, &options)?;
            println!("Wrote {} ({written})", output.display());
        }
        Commands::Filters => print!("{}", describe_filters(&config)),
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EditorConfig> {
    match path {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("loading editor config {}", path.display())),
        None => Ok(EditorConfig::default()),
    }
}

/// Dimensions, brightness as a percentage, and the suggested resize.
#[instrument(skip_all, fields(input = %input.display()))]
pub fn inspect(input: &Path) -> anyhow::Result<String> {
    let bitmap = Bitmap::open(input).with_context(|| format!("opening {}", input.display()))?;
    let brightness = measure_brightness(&bitmap);
    let suggested = suggested_dimensions(&bitmap);
    info!(brightness, %suggested, "Image inspected");

    Ok(format!(
        "{}: {} with {} channel(s)\nBrightness: {:.2}%\nSuggested dimensions: {}",
        input.display(),
        bitmap.dimensions(),
        bitmap.channels(),
        brightness * 100.0,
        suggested
    ))
}

/// The user's choices for one `apply` run.
#[derive(Debug, Clone, Copy)]
pub struct ApplyOptions {
    pub filter: FilterKind,
    pub intensity: Option<f32>,
    pub channel: Option<ColorChannel>,
    pub dimensions: Option<Dimensions>,
}

/// Decode `input`, apply one filter, encode to `output`. Returns the output
/// size.
#[instrument(skip(config, options), fields(input = %input.display(), filter = %options.filter))]
pub fn apply_to_file(
    config: &EditorConfig,
    input: &Path,
    output: &Path,
    options: &ApplyOptions,
) -> anyhow::Result<Dimensions> {
    let bitmap = Bitmap::open(input).with_context(|| format!("opening {}", input.display()))?;

    // Resize without explicit dimensions falls back to the brightness-based
    // suggestion, the same value `inspect` reports.
    let dimensions = match (options.filter, options.dimensions) {
        (FilterKind::Resize, None) => Some(suggested_dimensions(&bitmap)),
        (_, dims) => dims,
    };
    let request =
        config.build_request(options.filter, options.intensity, options.channel, dimensions)?;
    let edited = apply(&bitmap, &request)?;

    write_bitmap(&edited, output, config.jpeg_quality)
        .with_context(|| format!("writing {}", output.display()))?;
    Ok(edited.dimensions())
}

fn write_bitmap(bitmap: &Bitmap, output: &Path, jpeg_quality: u8) -> retouche_core::Result<()> {
    let extension = output
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let is_jpeg = matches!(extension.as_deref(), Some("jpg" | "jpeg"));
    if is_jpeg {
        std::fs::write(output, bitmap.to_jpeg_bytes(jpeg_quality)?)?;
        Ok(())
    } else {
        bitmap.save(output)
    }
}

/// One line per filter with its slider range, if it has one.
pub fn describe_filters(config: &EditorConfig) -> String {
    let mut text = String::new();
    for kind in FilterKind::ALL {
        let range = match kind {
            FilterKind::Pixelate => Some(config.pixelate),
            FilterKind::Blur => Some(config.blur),
            FilterKind::Contrast => Some(config.contrast),
            FilterKind::Rotate => Some(config.rotation),
            FilterKind::Edges => Some(config.edges),
            FilterKind::Brightness => Some(config.brightness),
            FilterKind::Resize | FilterKind::Sepia | FilterKind::Grayscale => None,
            FilterKind::ColorChannel => {
                text.push_str(&format!(
                    "{kind:<14} channel red|green|blue (default {})\n",
                    config.default_channel
                ));
                continue;
            }
        };
        match range {
            Some(r) => text.push_str(&format!(
                "{kind:<14} {} to {} (default {})\n",
                r.min, r.max, r.default
            )),
            None => text.push_str(&format!("{kind}\n")),
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use retouche_core::RetoucheError;

    fn write_fixture(dir: &Path, color: [u8; 3]) -> std::path::PathBuf {
        let path = dir.join("input.png");
        Bitmap::from_rgb(RgbImage::from_pixel(8, 4, Rgb(color)))
            .unwrap()
            .save(&path)
            .unwrap();
        path
    }

    fn options(filter: FilterKind) -> ApplyOptions {
        ApplyOptions {
            filter,
            intensity: None,
            channel: None,
            dimensions: None,
        }
    }

    #[test]
    fn sepia_round_trips_through_png() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_fixture(dir.path(), [128, 128, 128]);
        let output = dir.path().join("sepia.png");

        let dims = apply_to_file(
            &EditorConfig::default(),
            &input,
            &output,
            &options(FilterKind::Sepia),
        )
        .unwrap();
        assert_eq!(dims, Dimensions::new(8, 4));

        let written = Bitmap::open(&output).unwrap();
        assert_eq!(written.as_rgb().unwrap().get_pixel(3, 2), &Rgb([172, 153, 119]));
    }

    #[test]
    fn resize_defaults_to_suggested_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_fixture(dir.path(), [255, 255, 255]);
        let output = dir.path().join("resized.JPEG");

        let dims = apply_to_file(
            &EditorConfig::default(),
            &input,
            &output,
            &options(FilterKind::Resize),
        )
        .unwrap();
        // Fully white image: brightness 1.0, suggestion is the full size.
        assert_eq!(dims, Dimensions::new(8, 4));
        assert_eq!(&std::fs::read(&output).unwrap()[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn out_of_range_intensity_is_reported_as_invalid_parameter() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_fixture(dir.path(), [10, 20, 30]);
        let output = dir.path().join("blurred.png");

        let err = apply_to_file(
            &EditorConfig::default(),
            &input,
            &output,
            &ApplyOptions {
                intensity: Some(50.0),
                ..options(FilterKind::Blur)
            },
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RetoucheError>(),
            Some(RetoucheError::InvalidParameter(_))
        ));
        assert!(!output.exists());
    }

    #[test]
    fn inspect_reports_brightness_and_suggestion() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_fixture(dir.path(), [0, 0, 0]);

        let report = inspect(&input).unwrap();
        assert!(report.contains("8x4 with 3 channel(s)"));
        assert!(report.contains("Brightness: 0.00%"));
        assert!(report.contains("Suggested dimensions: 1x1"));
    }

    #[test]
    fn missing_input_keeps_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = inspect(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RetoucheError>(),
            Some(RetoucheError::Io(_))
        ));
    }

    #[test]
    fn filter_listing_mentions_every_filter() {
        let listing = describe_filters(&EditorConfig::default());
        for kind in FilterKind::ALL {
            assert!(listing.contains(kind.name()), "{kind} missing");
        }
        assert!(listing.contains("0.1 to 3 (default 1.5)"));
    }
}
