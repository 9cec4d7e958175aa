// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Kensho — Core types, error definitions, and configuration shared across all
// crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;

pub use config::{DocumentCatalog, DocumentSpec, EnhanceConfig, PreprocessConfig, SkewSearch};
pub use error::KenshoError;
pub use types::*;
