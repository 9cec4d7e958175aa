// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// kensho-extract — From uploaded card images to annotated field data.
//
// The external recognition service sits behind the `Recognizer` trait. This
// crate prepares the request (MIME resolution, preprocessing), then turns the
// recognizer's text back into an `ExtractionResult`: sanitising, parsing,
// field validation, forgery-warning extraction and card-number masking.

pub mod extractor;
pub mod masking;
pub mod recognizer;
pub mod response;

pub use extractor::{Annotator, Extractor};
pub use masking::{mask_card_number, mask_string};
pub use recognizer::{RecognitionPart, RecognitionRequest, Recognizer};
pub use response::{ParsedResponse, parse_response, sanitize_json_response};
