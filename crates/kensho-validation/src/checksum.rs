// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Check-digit validation for 12-digit identity numbers.
//
// Both schemes take 11 payload digits and one trailing check digit. Input is
// normalised (separators and printed markers removed) before the length
// check; anything that is not exactly 12 ASCII digits afterwards is invalid.

use tracing::trace;

/// Number of digits in a normalised identity number.
pub const NUMBER_LEN: usize = 12;

/// Number of payload digits covered by the check digit.
pub const PAYLOAD_LEN: usize = NUMBER_LEN - 1;

/// Driver-licence weights over payload positions 0..=10, left to right.
///
/// Not a published algorithm. Kept for compatibility with existing
/// annotations; do not treat an `Invalid` result as authoritative.
pub const DRIVER_LICENSE_WEIGHTS: [u32; PAYLOAD_LEN] = [5, 4, 3, 2, 7, 6, 5, 4, 3, 2, 1];

/// A check-digit scheme over 11 payload digits.
pub trait CheckDigitScheme {
    /// Strip separators and printed markers from raw recognised text.
    fn normalize(&self, raw: &str) -> String;

    /// Expected check digit (0-9) for the payload.
    fn check_digit(&self, payload: &[u8; PAYLOAD_LEN]) -> u8;

    /// Whether `raw` is a well-formed number with a matching check digit.
    fn validate(&self, raw: &str) -> bool {
        let normalized = self.normalize(raw);
        let Some(digits) = parse_digits(&normalized) else {
            trace!(len = normalized.chars().count(), "Not a 12-digit number");
            return false;
        };
        let (payload, check) = split_check(&digits);
        self.check_digit(&payload) == check
    }
}

/// Driver-licence number (運転免許証番号).
///
/// Printed as `第 123456789012 号`; spaces and the `第`/`号` markers are
/// removed wherever they appear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverLicenseChecksum {
    weights: [u32; PAYLOAD_LEN],
}

impl DriverLicenseChecksum {
    pub fn with_weights(weights: [u32; PAYLOAD_LEN]) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &[u32; PAYLOAD_LEN] {
        &self.weights
    }
}

impl Default for DriverLicenseChecksum {
    fn default() -> Self {
        Self::with_weights(DRIVER_LICENSE_WEIGHTS)
    }
}

impl CheckDigitScheme for DriverLicenseChecksum {
    fn normalize(&self, raw: &str) -> String {
        raw.chars()
            .filter(|c| !matches!(c, ' ' | '\u{3000}' | '第' | '号'))
            .collect()
    }

    fn check_digit(&self, payload: &[u8; PAYLOAD_LEN]) -> u8 {
        let sum: u32 = payload
            .iter()
            .zip(&self.weights)
            .map(|(&digit, &weight)| u32::from(digit) * weight)
            .sum();
        ((11 - sum % 11) % 10) as u8
    }
}

/// Individual number (個人番号, "My Number").
///
/// Weights run right to left over the payload: position `i` from the
/// least-significant payload digit has weight `i + 2` for `i < 6` and
/// `i - 4` otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MyNumberChecksum;

impl MyNumberChecksum {
    pub fn weight(position_from_right: usize) -> u32 {
        if position_from_right < 6 {
            position_from_right as u32 + 2
        } else {
            position_from_right as u32 - 4
        }
    }
}

impl CheckDigitScheme for MyNumberChecksum {
    fn normalize(&self, raw: &str) -> String {
        raw.chars().filter(|&c| c != '-').collect()
    }

    fn check_digit(&self, payload: &[u8; PAYLOAD_LEN]) -> u8 {
        let sum: u32 = payload
            .iter()
            .rev()
            .enumerate()
            .map(|(i, &digit)| u32::from(digit) * Self::weight(i))
            .sum();
        match sum % 11 {
            0 | 1 => 0,
            remainder => (11 - remainder) as u8,
        }
    }
}

/// Validate a driver-licence number with the default weight table.
pub fn validate_driver_license(raw: &str) -> bool {
    DriverLicenseChecksum::default().validate(raw)
}

/// Validate an individual number.
pub fn validate_my_number(raw: &str) -> bool {
    MyNumberChecksum.validate(raw)
}

/// Exactly 12 ASCII digits, as numeric values.
fn parse_digits(normalized: &str) -> Option<[u8; NUMBER_LEN]> {
    let bytes = normalized.as_bytes();
    if bytes.len() != NUMBER_LEN || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let mut digits = [0u8; NUMBER_LEN];
    for (slot, byte) in digits.iter_mut().zip(bytes) {
        *slot = byte - b'0';
    }
    Some(digits)
}

fn split_check(digits: &[u8; NUMBER_LEN]) -> ([u8; PAYLOAD_LEN], u8) {
    let mut payload = [0u8; PAYLOAD_LEN];
    payload.copy_from_slice(&digits[..PAYLOAD_LEN]);
    (payload, digits[PAYLOAD_LEN])
}
