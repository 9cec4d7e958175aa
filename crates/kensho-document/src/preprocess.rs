// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preprocessing pipeline: decode → deskew → enhance → re-encode.
//
// Input that does not decode as an image (a PDF, a text file, a truncated
// upload) is passed through byte-for-byte. Only an encoding failure after a
// successful decode is reported as an error.

use std::borrow::Cow;

use kensho_core::config::PreprocessConfig;
use kensho_core::error::Result;
use tracing::{debug, info, instrument};

use crate::image::processor::ImageProcessor;
use crate::mime::{self, MIME_JPEG, MIME_PNG};
use crate::scan::deskew::Deskewer;
use crate::scan::enhance::Enhancer;

/// Output of one preprocessing run.
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessed<'a> {
    /// Re-encoded image, or the untouched input on passthrough.
    pub bytes: Cow<'a, [u8]>,
    /// MIME type of `bytes`.
    pub mime_type: String,
    /// Deskew rotation applied, in clockwise degrees.
    pub skew_angle: Option<f64>,
}

impl Preprocessed<'_> {
    /// Whether the input was passed through without decoding.
    pub fn is_passthrough(&self) -> bool {
        matches!(self.bytes, Cow::Borrowed(_))
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes.into_owned()
    }
}

/// Normalises photographed identity documents for recognition.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    deskewer: Deskewer,
    enhancer: Enhancer,
    jpeg_quality: u8,
}

impl Preprocessor {
    pub fn new(config: &PreprocessConfig) -> Self {
        Self {
            deskewer: Deskewer::new(&config.skew, config.background),
            enhancer: Enhancer::new(config.enhance.clone()),
            jpeg_quality: config.jpeg_quality,
        }
    }

    pub fn deskewer(&self) -> &Deskewer {
        &self.deskewer
    }

    /// Preprocess `bytes` declared as `mime_type`, returning the new bytes.
    ///
    /// Never fails for non-image input; see [`Preprocessor::process_detailed`].
    pub fn process<'a>(&self, bytes: &'a [u8], mime_type: &str) -> Result<Cow<'a, [u8]>> {
        Ok(self.process_detailed(bytes, mime_type)?.bytes)
    }

    /// Preprocess `bytes`, also reporting the output MIME type and the skew
    /// correction applied.
    ///
    /// JPEG input is re-encoded as JPEG; everything else that decodes
    /// (PNG, WEBP, or whatever generic decoding recognises) becomes PNG.
    #[instrument(skip(self, bytes), fields(data_len = bytes.len()))]
    pub fn process_detailed<'a>(&self, bytes: &'a [u8], mime_type: &str) -> Result<Preprocessed<'a>> {
        let mime_type = mime::clean_mime_type(mime_type);

        let image = match ImageProcessor::decode(bytes, mime::decode_format(mime_type)) {
            Ok(image) => image,
            Err(err) => {
                debug!(error = %err, mime_type, "Input is not a decodable image; passing through");
                return Ok(Preprocessed {
                    bytes: Cow::Borrowed(bytes),
                    mime_type: mime_type.to_owned(),
                    skew_angle: None,
                });
            }
        };

        let (image, skew_angle) = self.deskewer.deskew(image);
        let image = self.enhancer.enhance(image);

        let (encoded, output_mime) = if mime_type == MIME_JPEG {
            (image.to_jpeg_bytes(self.jpeg_quality)?, MIME_JPEG)
        } else {
            (image.to_png_bytes()?, MIME_PNG)
        };

        info!(
            input_mime = mime_type,
            output_mime,
            skew_angle,
            output_len = encoded.len(),
            "Image preprocessed"
        );
        Ok(Preprocessed {
            bytes: Cow::Owned(encoded),
            mime_type: output_mime.to_owned(),
            skew_angle,
        })
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(&PreprocessConfig::default())
    }
}
