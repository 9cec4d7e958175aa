// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// kensho-document — Image normalisation for photographed identity documents.
//
// Provides pixel primitives over `image`/`imageproc` (grayscale, Sobel edge
// magnitude, rotation about the centre, contrast, unsharp mask, median
// filter), projection-profile skew estimation, and the preprocessing pipeline
// decode → deskew → enhance → re-encode with passthrough for non-image input.

pub mod image;
pub mod mime;
pub mod preprocess;
pub mod scan;

pub use crate::image::processor::{EdgeImage, ImageProcessor};
pub use preprocess::{Preprocessed, Preprocessor};
pub use scan::deskew::{Deskewer, SkewEstimator};
pub use scan::enhance::Enhancer;
