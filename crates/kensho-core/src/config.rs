// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Configuration: image preprocessing parameters and the document catalog.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{KenshoError, Result};

/// Embedded default catalog.
const DEFAULT_CATALOG: &str = include_str!("../document_types.yml");

/// Parameters of the skew angle search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkewSearch {
    /// Search covers `[-max_angle, max_angle]` degrees.
    pub max_angle: f64,
    /// Sampling step in degrees.
    pub step: f64,
    /// Best angles with a smaller magnitude are not applied.
    pub min_correction: f64,
}

impl Default for SkewSearch {
    fn default() -> Self {
        Self {
            max_angle: 10.0,
            step: 0.2,
            min_correction: 0.1,
        }
    }
}

/// Parameters of the contrast → sharpen → denoise chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhanceConfig {
    /// Linear contrast gain around mid-grey.
    pub contrast_gain: f32,
    /// Gaussian sigma of the unsharp mask.
    pub sharpen_radius: f32,
    /// Unsharp mask amount.
    pub sharpen_amount: f32,
    /// Median filter radius (1 = 3x3 window).
    pub denoise_radius: u32,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            contrast_gain: 1.5,
            sharpen_radius: 1.0,
            sharpen_amount: 1.2,
            denoise_radius: 1,
        }
    }
}

/// Image preprocessing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    #[serde(default)]
    pub skew: SkewSearch,
    #[serde(default)]
    pub enhance: EnhanceConfig,
    /// JPEG re-encode quality (1-100).
    pub jpeg_quality: u8,
    /// RGBA fill for corners exposed by deskew rotation.
    pub background: [u8; 4],
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            skew: SkewSearch::default(),
            enhance: EnhanceConfig::default(),
            jpeg_quality: 90,
            background: [0, 0, 0, 0],
        }
    }
}

impl PreprocessConfig {
    /// Reject settings the image filters cannot run with.
    pub fn validate(&self) -> Result<()> {
        let SkewSearch {
            max_angle,
            step,
            min_correction,
        } = self.skew;
        if !(step.is_finite() && step > 0.0) {
            return Err(KenshoError::Config(format!("skew step must be positive, got {step}")));
        }
        if !(max_angle.is_finite() && max_angle >= 0.0) || !min_correction.is_finite() {
            return Err(KenshoError::Config(format!(
                "skew range must be finite and non-negative, got max_angle {max_angle}, min_correction {min_correction}"
            )));
        }

        let enhance = &self.enhance;
        if !(enhance.sharpen_radius.is_finite() && enhance.sharpen_radius > 0.0) {
            return Err(KenshoError::Config(format!(
                "sharpen_radius must be positive, got {}",
                enhance.sharpen_radius
            )));
        }
        if !enhance.sharpen_amount.is_finite() || !enhance.contrast_gain.is_finite() {
            return Err(KenshoError::Config(
                "contrast_gain and sharpen_amount must be finite".to_owned(),
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(KenshoError::Config(format!(
                "jpeg_quality must be 1-100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}

/// How one document type is presented to the recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSpec {
    pub prompt: String,
    /// Expected field name → human description.
    #[serde(default)]
    pub json_structure: BTreeMap<String, String>,
    /// Part names in the order they are sent. Parts missing from a request
    /// are skipped.
    #[serde(default)]
    pub image_parts: Vec<String>,
}

/// All document types known to this deployment, keyed by tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCatalog {
    pub documents: BTreeMap<String, DocumentSpec>,
}

impl DocumentCatalog {
    /// The catalog compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_yaml_str(DEFAULT_CATALOG)
            .map_err(|err| KenshoError::Config(format!("embedded catalog: {err}")))
    }

    /// Load a catalog from a YAML file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|err| {
            KenshoError::Config(format!(
                "failed to read catalog {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        let catalog = Self::from_yaml_str(&content)?;
        debug!(documents = catalog.documents.len(), "Catalog loaded");
        Ok(catalog)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|err| KenshoError::Config(format!("invalid catalog: {err}")))
    }

    pub fn get(&self, tag: &str) -> Option<&DocumentSpec> {
        self.documents.get(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }
}
