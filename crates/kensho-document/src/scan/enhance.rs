// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Enhancement chain for photographed cards: contrast boost, unsharp mask,
// median denoise. The order is fixed; denoising runs after sharpening.

use kensho_core::config::EnhanceConfig;
use tracing::{debug, instrument};

use crate::image::processor::ImageProcessor;

/// Fixed-order composition of contrast → sharpen → denoise.
#[derive(Debug, Clone, Default)]
pub struct Enhancer {
    config: EnhanceConfig,
}

impl Enhancer {
    pub fn new(config: EnhanceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EnhanceConfig {
        &self.config
    }

    /// Run the full chain:
    ///
    /// 1. Contrast gain (1.5 by default)
    /// 2. Unsharp mask (radius 1.0, amount 1.2) to recover detail softened
    ///    by deskew resampling
    /// 3. Median filter (radius 1) against isolated-pixel noise
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn enhance(&self, image: ImageProcessor) -> ImageProcessor {
        let EnhanceConfig {
            contrast_gain,
            sharpen_radius,
            sharpen_amount,
            denoise_radius,
        } = self.config;

        let enhanced = image
            .adjust_contrast(contrast_gain)
            .unsharp_mask(sharpen_radius, sharpen_amount)
            .median_denoise(denoise_radius);
        debug!("Enhancement complete");
        enhanced
    }
}
