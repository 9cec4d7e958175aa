// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extraction flow:
//
//   catalog lookup → MIME resolution → preprocess (parallel, per part)
//     → recognize → sanitise → parse → validate → mask
//
// `Annotator` owns the post-recognition half so it can run on a response
// obtained elsewhere; `Extractor` adds preprocessing and the recognizer.

use std::borrow::Cow;
use std::collections::HashMap;

use kensho_core::config::{DocumentCatalog, DocumentSpec};
use kensho_core::error::{KenshoError, Result};
use kensho_core::types::{DocumentType, ExtractionResult, FilePart};
use kensho_document::Preprocessor;
use kensho_document::mime;
use kensho_validation::FieldValidator;
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::masking::mask_card_number;
use crate::recognizer::{RecognitionPart, RecognitionRequest, Recognizer};
use crate::response::{parse_response, sanitize_json_response};

/// Turns recognizer text into an annotated `ExtractionResult`.
#[derive(Debug, Clone)]
pub struct Annotator {
    catalog: DocumentCatalog,
    validator: FieldValidator,
}

impl Annotator {
    pub fn new(catalog: DocumentCatalog, validator: FieldValidator) -> Self {
        Self { catalog, validator }
    }

    pub fn catalog(&self) -> &DocumentCatalog {
        &self.catalog
    }

    /// Catalog entry for `document_type`.
    pub fn document(&self, document_type: &str) -> Result<&DocumentSpec> {
        self.catalog
            .get(document_type)
            .ok_or_else(|| KenshoError::UnsupportedDocumentType(document_type.to_owned()))
    }

    /// Sanitise, parse, validate and optionally mask a recognizer response.
    ///
    /// Only document types with field checks are annotated; other catalog
    /// entries pass their fields through as parsed.
    #[instrument(skip(self, response), fields(response_len = response.len()))]
    pub fn finalize(
        &self,
        response: &str,
        document_type: &str,
        masking: bool,
    ) -> Result<ExtractionResult> {
        self.document(document_type)?;

        let cleaned = sanitize_json_response(response);
        let mut parsed = parse_response(cleaned)?;

        match document_type.parse::<DocumentType>() {
            Ok(document) => self.validator.annotate(document, &mut parsed.fields),
            Err(_) => debug!("No field checks for this document type"),
        }
        if masking {
            mask_card_number(&mut parsed.fields);
        }

        info!(
            fields = parsed.fields.len(),
            forgery_flagged = parsed
                .forgery_warning
                .as_ref()
                .is_some_and(|w| w.has_signs_of_forgery),
            "Extraction result assembled"
        );
        Ok(ExtractionResult {
            extracted_data: parsed.fields,
            forgery_warning: parsed.forgery_warning,
            raw_response: cleaned.to_owned(),
        })
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new(DocumentCatalog::default(), FieldValidator::default())
    }
}

/// Full extraction against a recognizer.
pub struct Extractor<R> {
    recognizer: R,
    preprocessor: Preprocessor,
    annotator: Annotator,
}

impl<R: Recognizer> Extractor<R> {
    /// An extractor with default preprocessing and validation tables.
    pub fn new(recognizer: R, catalog: DocumentCatalog) -> Self {
        Self {
            recognizer,
            preprocessor: Preprocessor::default(),
            annotator: Annotator::new(catalog, FieldValidator::default()),
        }
    }

    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn with_validator(mut self, validator: FieldValidator) -> Self {
        self.annotator.validator = validator;
        self
    }

    pub fn annotator(&self) -> &Annotator {
        &self.annotator
    }

    /// Build the recognition request for `parts`.
    ///
    /// Parts are taken in catalog order; names the catalog lists but the
    /// upload lacks are skipped. MIME types are resolved before any
    /// preprocessing so an unsupported part fails the request early.
    #[instrument(skip(self, parts), fields(supplied = parts.len()))]
    pub fn prepare<'a>(
        &'a self,
        parts: &'a HashMap<String, FilePart>,
        document_type: &'a str,
    ) -> Result<RecognitionRequest<'a>> {
        let spec = self.annotator.document(document_type)?;

        let selected = spec
            .image_parts
            .iter()
            .filter_map(|name| match parts.get(name) {
                Some(part) => Some((name.as_str(), part)),
                None => {
                    debug!(part = name.as_str(), "Optional part not supplied");
                    None
                }
            })
            .map(|(name, part)| {
                mime::resolve_mime_type(&part.mime_type, &part.content)
                    .map(|mime_type| (name, part, mime_type))
            })
            .collect::<Result<Vec<_>>>()?;

        let preprocessor = &self.preprocessor;
        let prepared = selected
            .into_par_iter()
            .map(|(name, part, mime_type)| prepare_part(preprocessor, name, part, mime_type))
            .collect();

        Ok(RecognitionRequest {
            document_type,
            prompt: &spec.prompt,
            parts: prepared,
        })
    }

    /// Preprocess, recognise and assemble the result for one document.
    #[instrument(skip(self, parts), fields(supplied = parts.len()))]
    pub fn extract(
        &self,
        parts: &HashMap<String, FilePart>,
        document_type: &str,
        masking: bool,
    ) -> Result<ExtractionResult> {
        let request = self.prepare(parts, document_type)?;
        info!(
            parts = ?request.part_names().collect::<Vec<_>>(),
            "Sending document to recognizer"
        );

        let response = self.recognizer.recognize(&request)?;
        self.annotator.finalize(&response, document_type, masking)
    }

    /// Post-recognition half of [`Extractor::extract`].
    pub fn finalize(
        &self,
        response: &str,
        document_type: &str,
        masking: bool,
    ) -> Result<ExtractionResult> {
        self.annotator.finalize(response, document_type, masking)
    }
}

/// Preprocess one part. PDFs are sent as uploaded; a preprocessing failure
/// falls back to the original bytes.
fn prepare_part<'a>(
    preprocessor: &Preprocessor,
    name: &'a str,
    part: &'a FilePart,
    mime_type: String,
) -> RecognitionPart<'a> {
    if mime::is_pdf(&mime_type) {
        return RecognitionPart {
            name,
            mime_type,
            data: Cow::Borrowed(&part.content),
        };
    }

    match preprocessor.process_detailed(&part.content, &mime_type) {
        Ok(processed) => RecognitionPart {
            name,
            mime_type: processed.mime_type,
            data: processed.bytes,
        },
        Err(err) => {
            warn!(part = name, error = %err, "Could not preprocess part; using original");
            RecognitionPart {
                name,
                mime_type,
                data: Cow::Borrowed(&part.content),
            }
        }
    }
}
