// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for whoever sits in front of the editor.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how a presentation layer shows it.

use crate::error::RetoucheError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Disk or permission hiccup; trying again may work.
    Transient,
    /// User must change something (a slider value, a filter choice).
    ActionRequired,
    /// The input itself is unusable; retrying will not help.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether repeating the same action could succeed.
    pub retriable: bool,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `RetoucheError` into a `HumanError` anyone can act on.
pub fn humanize_error(err: &RetoucheError) -> HumanError {
    match err {
        RetoucheError::InvalidParameter(detail) => {
            if detail.contains("color channel") {
                HumanError {
                    message: "That color can't be isolated.".into(),
                    suggestion: "Pick red, green or blue.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "That setting is out of range.".into(),
                    suggestion: format!(
                        "Move the slider back inside its range and try again. ({detail})"
                    ),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            }
        }

        RetoucheError::InvalidBitmap(_) => HumanError {
            message: "This picture has no pixels we can work with.".into(),
            suggestion: "Choose a different image file.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        RetoucheError::ImageError(detail) => HumanError {
            message: "We couldn't read or write this image.".into(),
            suggestion: format!("Make sure the file is a JPEG or PNG picture. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        RetoucheError::Config(detail) => HumanError {
            message: "The editor settings file has a mistake.".into(),
            suggestion: format!(
                "Fix the settings file or remove it to use the defaults. ({detail})"
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        RetoucheError::Serialization(_) => HumanError {
            message: "The editor settings file isn't valid JSON.".into(),
            suggestion: "Fix the settings file or remove it to use the defaults.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        RetoucheError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "We couldn't find that file.".into(),
                suggestion: "Check the file name and folder, then try again.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "We aren't allowed to open that file.".into(),
                suggestion: "Check the file's permissions or pick another folder.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "Something went wrong reading or writing a file.".into(),
                suggestion: "Try again. If this keeps happening, check there is free disk space."
                    .into(),
                retriable: true,
                severity: Severity::Transient,
            },
        },
    }
}
