// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Abstraction over the external recognition service.
//
// Implementations live outside this workspace (a Gemini client, a local OCR
// model, a test double). They receive the document prompt followed by the
// labelled, already-preprocessed parts and return the model's raw text.

use std::borrow::Cow;

use kensho_core::error::Result;

/// One labelled file part, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionPart<'a> {
    /// Catalog part name, e.g. `front` or `back`.
    pub name: &'a str,
    /// MIME type of `data` as sent.
    pub mime_type: String,
    pub data: Cow<'a, [u8]>,
}

/// Everything the recognizer needs for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionRequest<'a> {
    pub document_type: &'a str,
    pub prompt: &'a str,
    /// Parts in catalog order; parts absent from the upload are omitted.
    pub parts: Vec<RecognitionPart<'a>>,
}

impl RecognitionRequest<'_> {
    /// Caption placed before each part when the request is flattened into a
    /// single prompt stream.
    pub fn part_caption(part: &RecognitionPart<'_>) -> String {
        format!("\nFile part: {}", part.name)
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|part| part.name)
    }
}

/// A service that turns document images into field JSON.
///
/// Errors should be `KenshoError::Recognition`, including the case where the
/// service answers without any text content.
pub trait Recognizer {
    fn recognize(&self, request: &RecognitionRequest<'_>) -> Result<String>;
}

impl<R: Recognizer + ?Sized> Recognizer for &R {
    fn recognize(&self, request: &RecognitionRequest<'_>) -> Result<String> {
        (**self).recognize(request)
    }
}

impl<R: Recognizer + ?Sized> Recognizer for Box<R> {
    fn recognize(&self, request: &RecognitionRequest<'_>) -> Result<String> {
        (**self).recognize(request)
    }
}
