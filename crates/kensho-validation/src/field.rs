// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Field dispatch: decides which check, if any, applies to a recognised field.

use std::collections::BTreeMap;

use kensho_core::types::{DocumentType, RawField, ValidationOutcome};
use tracing::debug;

use crate::checksum::{CheckDigitScheme, DriverLicenseChecksum, MyNumberChecksum};
use crate::date::DateValidator;

/// Field key carrying the document's identity number.
pub const CARD_NUMBER_FIELD: &str = "card_number";

/// Routes `(document type, field key)` pairs to checksum or date checks.
///
/// - `card_number` uses the document type's check-digit scheme
/// - any key containing `date` uses the date validator
/// - everything else is left unannotated
#[derive(Debug, Clone, Default)]
pub struct FieldValidator {
    driver_license: DriverLicenseChecksum,
    my_number: MyNumberChecksum,
    dates: DateValidator,
}

impl FieldValidator {
    pub fn new(driver_license: DriverLicenseChecksum, dates: DateValidator) -> Self {
        Self {
            driver_license,
            my_number: MyNumberChecksum,
            dates,
        }
    }

    pub fn validate(&self, document: DocumentType, key: &str, value: &str) -> ValidationOutcome {
        if key == CARD_NUMBER_FIELD {
            let scheme: &dyn CheckDigitScheme = match document {
                DocumentType::DriverLicense => &self.driver_license,
                DocumentType::IndividualNumberCard => &self.my_number,
            };
            return ValidationOutcome::from_check(scheme.validate(value));
        }
        if key.contains("date") {
            return ValidationOutcome::from_check(self.dates.validate(value));
        }
        ValidationOutcome::Unannotated
    }

    /// Annotate every string-valued field in place. Non-string values and
    /// fields without a check keep their current annotation.
    pub fn annotate(&self, document: DocumentType, fields: &mut BTreeMap<String, RawField>) {
        for (key, field) in fields.iter_mut() {
            let Some(text) = field.as_text() else {
                continue;
            };
            let outcome = self.validate(document, key, text);
            if outcome.is_unannotated() {
                continue;
            }
            debug!(document = %document, field = key.as_str(), ?outcome, "Field checked");
            field.validation = outcome;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::era::{EraCalendar, EraEntry};

    #[test]
    fn card_number_uses_the_document_scheme() {
        let v = FieldValidator::default();
        assert_eq!(
            v.validate(DocumentType::DriverLicense, "card_number", "123456789012"),
            ValidationOutcome::Valid
        );
        // Valid licence number, wrong My Number check digit.
        assert_eq!(
            v.validate(DocumentType::IndividualNumberCard, "card_number", "123456789012"),
            ValidationOutcome::Invalid
        );
        assert_eq!(
            v.validate(DocumentType::IndividualNumberCard, "card_number", "123456789018"),
            ValidationOutcome::Valid
        );
    }

    #[test]
    fn date_keys_match_by_substring() {
        let v = FieldValidator::default();
        for key in ["birth_date", "issue_date", "expiry_date", "date"] {
            assert_eq!(
                v.validate(DocumentType::DriverLicense, key, "令和3年9月22日"),
                ValidationOutcome::Valid,
                "{key}"
            );
        }
        assert_eq!(
            v.validate(DocumentType::IndividualNumberCard, "expiry_date", "2023年2月30日"),
            ValidationOutcome::Invalid
        );
    }

    #[test]
    fn other_fields_are_unannotated() {
        let v = FieldValidator::default();
        for key in ["name", "address", "Card_Number", "license_conditions"] {
            assert_eq!(
                v.validate(DocumentType::DriverLicense, key, "123456789012"),
                ValidationOutcome::Unannotated,
                "{key}"
            );
        }
    }

    #[test]
    fn annotate_skips_non_string_values() {
        let mut fields = BTreeMap::from([
            ("card_number".to_owned(), RawField::new("123456789013", 0.9)),
            ("birth_date".to_owned(), RawField::new("平成2年10月8日", 0.8)),
            ("expiry_date".to_owned(), RawField::new(20_300_101, 0.7)),
            ("name".to_owned(), RawField::new("山田太郎", 0.99)),
        ]);
        FieldValidator::default().annotate(DocumentType::DriverLicense, &mut fields);

        assert_eq!(fields["card_number"].validation, ValidationOutcome::Invalid);
        assert_eq!(fields["birth_date"].validation, ValidationOutcome::Valid);
        assert_eq!(fields["expiry_date"].validation, ValidationOutcome::Unannotated);
        assert_eq!(fields["name"].validation, ValidationOutcome::Unannotated);
    }

    #[test]
    fn injected_tables_are_used() {
        let v = FieldValidator::new(
            DriverLicenseChecksum::with_weights([1; 11]),
            DateValidator::new(EraCalendar::from_entries(Vec::<EraEntry>::new())),
        );
        assert_eq!(
            v.validate(DocumentType::DriverLicense, "card_number", "111111111111"),
            ValidationOutcome::Valid
        );
        assert_eq!(
            v.validate(DocumentType::DriverLicense, "issue_date", "令和3年9月22日"),
            ValidationOutcome::Invalid
        );
    }
}
