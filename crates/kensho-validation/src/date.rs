// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Date validation for recognised text.
//
// Two layouts are understood:
//
//   era form:        <era><year|元>年<month>月<day>日   e.g. 令和元年5月1日
//   Gregorian form:  YYYY年M月D日 or YYYY-M-D           e.g. 2023-01-15
//
// The era form is searched for anywhere in the text (recognisers often keep
// a label such as 生年月日 around the value); the Gregorian form must span
// the whole trimmed input. Numbers are ASCII digits with optional leading
// zeros. A date is valid only if it exists in the Gregorian calendar.

use chrono::NaiveDate;
use tracing::trace;

use crate::era::{EraCalendar, EraEntry};

/// Era-relative Gregorian years are written with exactly four digits.
const ERA_GREGORIAN_YEARS: std::ops::RangeInclusive<i32> = 1000..=9999;

/// A parsed era date. Not yet checked against the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarekiDate {
    pub era: EraEntry,
    /// Era-relative year; 元 (gannen) is 1.
    pub era_year: u32,
    pub month: u32,
    pub day: u32,
}

impl WarekiDate {
    pub fn gregorian_year(&self) -> Option<i32> {
        self.era.to_gregorian(self.era_year)
    }

    /// The calendar date this denotes, if it exists.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        let year = self.gregorian_year().filter(|y| ERA_GREGORIAN_YEARS.contains(y))?;
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

/// Validates recognised date strings against an injected era table.
#[derive(Debug, Clone, Default)]
pub struct DateValidator {
    calendar: EraCalendar,
}

impl DateValidator {
    pub fn new(calendar: EraCalendar) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> &EraCalendar {
        &self.calendar
    }

    /// Whether `raw` denotes an existing date in either layout.
    pub fn validate(&self, raw: &str) -> bool {
        self.to_date(raw).is_some()
    }

    /// Resolve `raw` to a calendar date. The era form is tried first; if it
    /// is absent or denotes an impossible date, the Gregorian form is tried.
    pub fn to_date(&self, raw: &str) -> Option<NaiveDate> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        if let Some(date) = self.parse_wareki(text).and_then(|w| w.to_naive_date()) {
            return Some(date);
        }
        let date = parse_gregorian(text);
        if date.is_none() {
            trace!(input = text, "Not a recognisable date");
        }
        date
    }

    /// Parse the leftmost era date in `raw`.
    ///
    /// The first position where the era layout matches decides the result:
    /// a numeric overflow there fails the parse rather than resuming the
    /// search further along.
    pub fn parse_wareki(&self, raw: &str) -> Option<WarekiDate> {
        let text = raw.trim();
        let found = text
            .char_indices()
            .find_map(|(idx, _)| self.match_era_layout(&text[idx..]))?;

        Some(WarekiDate {
            era: found.era,
            era_year: found.year.value()?,
            month: parse_number(found.month)?,
            day: parse_number(found.day)?,
        })
    }

    fn match_era_layout<'a>(&self, text: &'a str) -> Option<EraMatch<'a>> {
        let era = *self.calendar.match_prefix(text)?;
        let mut scanner = Scanner::new(&text[era.name.len()..]);

        let year = scanner.era_year()?;
        scanner.marker('年').then_some(())?;
        let month = scanner.digits()?;
        scanner.marker('月').then_some(())?;
        let day = scanner.digits()?;
        scanner.marker('日').then_some(())?;

        Some(EraMatch {
            era,
            year,
            month,
            day,
        })
    }
}

/// Validate `raw` against the standard era table.
pub fn validate_date(raw: &str) -> bool {
    DateValidator::default().validate(raw)
}

/// Token positions of one syntactic era-date match.
struct EraMatch<'a> {
    era: EraEntry,
    year: YearToken<'a>,
    month: &'a str,
    day: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YearToken<'a> {
    Digits(&'a str),
    /// 元, the first year of an era.
    Gannen,
}

impl YearToken<'_> {
    fn value(self) -> Option<u32> {
        match self {
            Self::Digits(digits) => parse_number(digits),
            Self::Gannen => Some(1),
        }
    }
}

/// Left-to-right tokenizer over a date string.
struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    /// One or more ASCII digits.
    fn digits(&mut self) -> Option<&'a str> {
        let end = self
            .rest
            .bytes()
            .position(|b| !b.is_ascii_digit())
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let (digits, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(digits)
    }

    fn era_year(&mut self) -> Option<YearToken<'a>> {
        if self.marker('元') {
            return Some(YearToken::Gannen);
        }
        self.digits().map(YearToken::Digits)
    }

    fn marker(&mut self, marker: char) -> bool {
        match self.rest.strip_prefix(marker) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn is_done(&self) -> bool {
        self.rest.is_empty()
    }
}

fn parse_number(digits: &str) -> Option<u32> {
    digits.parse().ok()
}

/// `YYYY年M月D日`, `YYYY-M-D` or `YYYY-MM-DD` spanning all of `text`.
fn parse_gregorian(text: &str) -> Option<NaiveDate> {
    let mut scanner = Scanner::new(text);

    let year = scanner.digits().filter(|d| d.len() == 4)?;
    let kanji = scanner.marker('年');
    if !kanji && !scanner.marker('-') {
        return None;
    }
    let month = scanner.digits().filter(|d| d.len() <= 2)?;
    if !scanner.marker(if kanji { '月' } else { '-' }) {
        return None;
    }
    let day = scanner.digits().filter(|d| d.len() <= 2)?;
    if kanji && !scanner.marker('日') {
        return None;
    }
    if !scanner.is_done() {
        return None;
    }

    NaiveDate::from_ymd_opt(year.parse().ok()?, parse_number(month)?, parse_number(day)?)
}
