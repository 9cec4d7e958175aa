// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Kensho.
//
// Validators are total functions and never produce one of these; a failed
// checksum or an impossible date is an ordinary `Invalid` outcome.

use thiserror::Error;

/// Top-level error type for all Kensho operations.
#[derive(Debug, Error)]
pub enum KenshoError {
    // -- Request shape --
    #[error("unsupported document type: {0}")]
    UnsupportedDocumentType(String),

    #[error("unsupported MIME type: {0}")]
    UnsupportedMimeType(String),

    // -- Image pipeline --
    /// Encoding after a successful decode failed. Undecodable input is not an
    /// error; it is passed through untouched.
    #[error("image encoding failed: {0}")]
    ImageEncode(String),

    // -- Recognition boundary --
    #[error("recognition failed: {0}")]
    Recognition(String),

    #[error("failed to parse recognition response: {0}")]
    ResponseParse(String),

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KenshoError>;
