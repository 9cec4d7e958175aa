// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Property-based tests for the check-digit validators and the date parser.

use kensho_validation::{validate_date, validate_driver_license, validate_my_number};
use proptest::prelude::*;

/// Weighted-sum check digit written directly from the published formula:
/// digits indexed from the right of the 11-digit payload, weights 2..=7 then
/// 2..=6.
fn my_number_reference(number: &str) -> bool {
    let digits: Vec<u32> = number.chars().filter_map(|c| c.to_digit(10)).collect();
    if number.len() != 12 || digits.len() != 12 {
        return false;
    }
    const WEIGHTS_FROM_RIGHT: [u32; 11] = [2, 3, 4, 5, 6, 7, 2, 3, 4, 5, 6];
    let sum: u32 = (0..11)
        .map(|i| digits[10 - i] * WEIGHTS_FROM_RIGHT[i])
        .sum();
    let remainder = sum % 11;
    let expected = if remainder <= 1 { 0 } else { 11 - remainder };
    digits[11] == expected
}

/// Weighted payload sum modulo 11, as used by `my_number_reference`.
fn my_number_remainder(payload: &str) -> u32 {
    const WEIGHTS_FROM_RIGHT: [u32; 11] = [2, 3, 4, 5, 6, 7, 2, 3, 4, 5, 6];
    let digits: Vec<u32> = payload.chars().filter_map(|c| c.to_digit(10)).collect();
    (0..11).map(|i| digits[10 - i] * WEIGHTS_FROM_RIGHT[i]).sum::<u32>() % 11
}

/// Complete an 11-digit payload with the check digit `validate` accepts.
fn complete(payload: &str, validate: fn(&str) -> bool) -> String {
    (0..=9)
        .map(|d| format!("{payload}{d}"))
        .find(|candidate| validate(candidate.as_str()))
        .unwrap_or_else(|| panic!("no check digit completes {payload}"))
}

/// Replace the digit at `position` with `digit`.
fn substitute(number: &str, position: usize, digit: u32) -> String {
    number
        .chars()
        .enumerate()
        .map(|(i, c)| if i == position { char::from_digit(digit, 10).unwrap() } else { c })
        .collect()
}

/// Share of single-digit payload substitutions of valid numbers that the
/// validator rejects.
fn substitution_detection_rate(validate: fn(&str) -> bool) -> f64 {
    let (mut detected, mut total) = (0u32, 0u32);
    for seed in 0u64..200 {
        let payload = format!("{:011}", seed.wrapping_mul(48_271_019) % 100_000_000_000);
        let valid = complete(&payload, validate);
        for position in 0..11 {
            let original = valid.as_bytes()[position] - b'0';
            for digit in (0..=9).filter(|&d| d != u32::from(original)) {
                total += 1;
                if !validate(&substitute(&valid, position, digit)) {
                    detected += 1;
                }
            }
        }
    }
    f64::from(detected) / f64::from(total)
}

#[test]
fn my_number_catches_nearly_all_payload_substitutions() {
    let rate = substitution_detection_rate(validate_my_number);
    assert!(rate >= 0.95, "detection rate {rate}");
    // Remainders 0 and 1 share check digit 0, so some substitutions slip through.
    assert!(rate < 1.0, "detection rate {rate}");
}

#[test]
fn driver_license_catches_nearly_all_payload_substitutions() {
    let rate = substitution_detection_rate(validate_driver_license);
    assert!(rate >= 0.95, "detection rate {rate}");
}

fn twelve_digits() -> impl Strategy<Value = String> {
    "[0-9]{12}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Property: the validator agrees with the direct formula on any
    /// 12-digit string.
    #[test]
    fn my_number_matches_reference(number in twelve_digits()) {
        prop_assert_eq!(validate_my_number(&number), my_number_reference(&number));
    }

    /// Property: exactly one check digit completes any payload.
    #[test]
    fn my_number_has_one_valid_check_digit(payload in "[0-9]{11}") {
        let valid = (0..=9)
            .filter(|d| validate_my_number(&format!("{payload}{d}")))
            .count();
        prop_assert_eq!(valid, 1);
    }

    /// Property: a payload substitution keeps a My Number valid only when
    /// the weighted remainder moves between 0 and 1.
    #[test]
    fn my_number_substitution_collisions_share_check_digit_zero(
        payload in "[0-9]{11}",
        position in 0usize..11,
        digit in 0u32..10,
    ) {
        let valid = complete(&payload, validate_my_number);
        let mutated = substitute(&valid, position, digit);
        prop_assume!(mutated != valid);

        if validate_my_number(&mutated) {
            let before = my_number_remainder(&valid[..11]);
            let after = my_number_remainder(&mutated[..11]);
            prop_assert!(before <= 1 && after <= 1 && before != after);
        }
    }

    /// Property: hyphens never change the outcome.
    #[test]
    fn my_number_ignores_hyphens(number in twelve_digits()) {
        let grouped = format!("{}-{}-{}", &number[..4], &number[4..8], &number[8..]);
        prop_assert_eq!(validate_my_number(&grouped), validate_my_number(&number));
    }

    /// Property: exactly one check digit completes any licence payload.
    #[test]
    fn driver_license_has_one_valid_check_digit(payload in "[0-9]{11}") {
        let valid = (0..=9)
            .filter(|d| validate_driver_license(&format!("{payload}{d}")))
            .count();
        prop_assert_eq!(valid, 1);
    }

    /// Property: anything other than 12 digits is rejected.
    #[test]
    fn wrong_lengths_are_rejected(number in "[0-9]{0,11}|[0-9]{13,20}") {
        prop_assert!(!validate_my_number(&number));
        prop_assert!(!validate_driver_license(&number));
    }

    /// Property: the validators never panic on arbitrary text.
    #[test]
    fn validators_are_total(text in "\\PC{0,40}") {
        let _ = validate_my_number(&text);
        let _ = validate_driver_license(&text);
        let _ = validate_date(&text);
    }

    /// Property: ISO dates agree with chrono.
    #[test]
    fn iso_dates_agree_with_chrono(year in 1900i32..2100, month in 0u32..14, day in 0u32..33) {
        let text = format!("{year:04}-{month:02}-{day:02}");
        let exists = chrono::NaiveDate::from_ymd_opt(year, month, day).is_some();
        prop_assert_eq!(validate_date(&text), exists);
    }
}
