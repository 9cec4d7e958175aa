// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Kensho.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KenshoError;

/// Identity documents with field-level checks.
///
/// The catalog may describe further document types; those are still
/// recognised but their fields are never annotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// 運転免許証
    DriverLicense,
    /// マイナンバーカード
    IndividualNumberCard,
}

impl DocumentType {
    /// Tag used in requests and in the document catalog.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::DriverLicense => "driver_license",
            Self::IndividualNumberCard => "individual_number_card",
        }
    }
}

impl FromStr for DocumentType {
    type Err = KenshoError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim() {
            "driver_license" => Ok(Self::DriverLicense),
            "individual_number_card" => Ok(Self::IndividualNumberCard),
            other => Err(KenshoError::UnsupportedDocumentType(other.to_owned())),
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Result of checking a single field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationOutcome {
    /// No check is defined for this (document type, field) pair.
    #[default]
    Unannotated,
    Valid,
    Invalid,
}

impl ValidationOutcome {
    pub fn from_check(passed: bool) -> Self {
        if passed { Self::Valid } else { Self::Invalid }
    }

    pub fn is_unannotated(&self) -> bool {
        matches!(self, Self::Unannotated)
    }
}

/// A single recognised field as returned by the upstream recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawField {
    /// Decoded value: usually a string, sometimes a number.
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub confidence_score: f64,
    #[serde(default, skip_serializing_if = "ValidationOutcome::is_unannotated")]
    pub validation: ValidationOutcome,
}

impl RawField {
    pub fn new(value: impl Into<serde_json::Value>, confidence_score: f64) -> Self {
        Self {
            value: value.into(),
            confidence_score,
            validation: ValidationOutcome::Unannotated,
        }
    }

    /// The value as text, if the recognizer produced a string.
    pub fn as_text(&self) -> Option<&str> {
        self.value.as_str()
    }
}

/// Forgery signal reported by the recognizer (never computed locally).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgeryWarning {
    pub has_signs_of_forgery: bool,
    #[serde(default)]
    pub reason: String,
}

/// Overall result of one extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub extracted_data: BTreeMap<String, RawField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forgery_warning: Option<ForgeryWarning>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub raw_response: String,
}

/// One uploaded file (front or back of a card, etc.).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub content: Vec<u8>,
    /// MIME type as declared by the uploader; may carry parameters.
    pub mime_type: String,
}

impl FilePart {
    pub fn new(content: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            content,
            mime_type: mime_type.into(),
        }
    }
}
