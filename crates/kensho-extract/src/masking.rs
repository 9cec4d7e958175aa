// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Card-number masking for results shown to operators.

use std::collections::BTreeMap;

use kensho_core::types::RawField;
use kensho_validation::field::CARD_NUMBER_FIELD;

/// Fixed-width prefix that replaces all but the last four characters.
pub const MASK_PREFIX: &str = "************";

/// Characters left visible at the end of a masked value.
pub const VISIBLE_SUFFIX: usize = 4;

/// Mask all but the last four characters. Values of four characters or
/// fewer are returned unchanged.
pub fn mask_string(value: &str) -> String {
    let len = value.chars().count();
    if len <= VISIBLE_SUFFIX {
        return value.to_owned();
    }
    let suffix: String = value.chars().skip(len - VISIBLE_SUFFIX).collect();
    format!("{MASK_PREFIX}{suffix}")
}

/// Mask the `card_number` field in place if it holds a string.
pub fn mask_card_number(fields: &mut BTreeMap<String, RawField>) {
    if let Some(field) = fields.get_mut(CARD_NUMBER_FIELD) {
        if let Some(text) = field.as_text() {
            field.value = mask_string(text).into();
        }
    }
}
