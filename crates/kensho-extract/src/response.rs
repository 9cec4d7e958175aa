// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recognizer response handling.
//
// Models wrap their JSON in Markdown fences or surround it with chatter, so
// the JSON is cut out of the text before parsing. The top-level object maps
// field names to `{ value, confidence_score }`, plus an optional
// `forgery_warning` entry that is reported separately.

use std::collections::BTreeMap;

use kensho_core::error::{KenshoError, Result};
use kensho_core::types::{ForgeryWarning, RawField};
use serde_json::{Map, Value};
use tracing::warn;

/// Top-level key carrying the recognizer's forgery signal.
pub const FORGERY_WARNING_KEY: &str = "forgery_warning";

/// Fields and forgery signal parsed from one response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResponse {
    pub fields: BTreeMap<String, RawField>,
    pub forgery_warning: Option<ForgeryWarning>,
}

/// Cut the JSON payload out of a model response.
///
/// Returns the slice from the first `{` or `[` to the last `}` or `]`. When
/// there is no such pair, backticks and whitespace are trimmed instead.
pub fn sanitize_json_response(text: &str) -> &str {
    let text = text.trim();
    let start = text.find(['{', '[']);
    let end = text.rfind(['}', ']']);
    match (start, end) {
        (Some(start), Some(end)) if end >= start => &text[start..=end],
        _ => text.trim_matches(|c| matches!(c, '`' | '\n' | ' ' | '\t' | '\r')),
    }
}

/// Parse sanitised response JSON.
///
/// A malformed `forgery_warning` is logged and dropped; any other malformed
/// entry fails the whole response.
pub fn parse_response(json: &str) -> Result<ParsedResponse> {
    let mut object: Map<String, Value> = serde_json::from_str(json)
        .map_err(|err| KenshoError::ResponseParse(format!("{err} (raw response: {json})")))?;

    let forgery_warning = object
        .remove(FORGERY_WARNING_KEY)
        .and_then(|raw| match serde_json::from_value::<ForgeryWarning>(raw) {
            Ok(warning) => Some(warning),
            Err(err) => {
                warn!(error = %err, "Ignoring malformed forgery warning");
                None
            }
        });

    let fields = object
        .into_iter()
        .map(|(key, raw)| {
            serde_json::from_value::<RawField>(raw)
                .map(|field| (key.clone(), field))
                .map_err(|err| KenshoError::ResponseParse(format!("field {key}: {err}")))
        })
        .collect::<Result<BTreeMap<_, _>>>()?;

    Ok(ParsedResponse {
        fields,
        forgery_warning,
    })
}
