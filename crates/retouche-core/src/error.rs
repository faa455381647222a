// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Retouche.

use thiserror::Error;

/// Top-level error type for all Retouche operations.
#[derive(Debug, Error)]
pub enum RetoucheError {
    // -- Filter errors --
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid bitmap: {0}")]
    InvalidBitmap(String),

    // -- Codec errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RetoucheError {
    /// Shorthand for building an [`RetoucheError::InvalidParameter`].
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// Shorthand for building an [`RetoucheError::InvalidBitmap`].
    pub fn invalid_bitmap(message: impl Into<String>) -> Self {
        Self::InvalidBitmap(message.into())
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RetoucheError>;

/// Reject NaN, infinities and values below `min`.
///
/// Every real-valued filter parameter goes through this check so the error
/// messages stay uniform across filters.
pub fn ensure_at_least(name: &str, value: f32, min: f32) -> Result<f32> {
    if !value.is_finite() {
        return Err(RetoucheError::InvalidParameter(format!(
            "{name} must be a finite number, got {value}"
        )));
    }
    if value < min {
        return Err(RetoucheError::InvalidParameter(format!(
            "{name} must be >= {min}, got {value}"
        )));
    }
    Ok(value)
}
