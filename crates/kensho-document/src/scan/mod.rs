// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan normalisation — skew detection/correction and the fixed enhancement
// chain.

pub mod deskew;
pub mod enhance;

pub use deskew::{Deskewer, SkewEstimator};
pub use enhance::Enhancer;
