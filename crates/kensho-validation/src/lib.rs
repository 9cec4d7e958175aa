// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// kensho-validation — Field checks for recognised identity-document data.
//
// Check-digit validation for driver-licence and individual ("My Number")
// numbers, Japanese era (wareki) and Gregorian date validation, and the
// dispatcher that routes a (document type, field key) pair to the right
// check. Every check is a total function: malformed input is simply invalid.

pub mod checksum;
pub mod date;
pub mod era;
pub mod field;

pub use checksum::{DriverLicenseChecksum, MyNumberChecksum, validate_driver_license, validate_my_number};
pub use date::{DateValidator, WarekiDate, validate_date};
pub use era::{EraCalendar, EraEntry};
pub use field::FieldValidator;
