// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Japanese imperial eras (元号) and their Gregorian start years.

/// An era name paired with the Gregorian year of its first year (元年).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EraEntry {
    pub name: &'static str,
    pub start_year: i32,
}

impl EraEntry {
    pub const fn new(name: &'static str, start_year: i32) -> Self {
        Self { name, start_year }
    }

    /// Gregorian year for `era_year` of this era. Year 1 is the start year;
    /// year 0 is accepted and maps to the year before.
    pub fn to_gregorian(&self, era_year: u32) -> Option<i32> {
        let era_year = i32::try_from(era_year).ok()?;
        self.start_year.checked_add(era_year)?.checked_sub(1)
    }
}

const STANDARD_ERAS: [EraEntry; 5] = [
    EraEntry::new("令和", 2019),
    EraEntry::new("平成", 1989),
    EraEntry::new("昭和", 1926),
    EraEntry::new("大正", 1912),
    EraEntry::new("明治", 1868),
];

/// Immutable lookup table of eras, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EraCalendar {
    eras: Vec<EraEntry>,
}

impl EraCalendar {
    /// The five modern eras, 明治 through 令和.
    pub fn standard() -> Self {
        Self {
            eras: STANDARD_ERAS.to_vec(),
        }
    }

    /// A calendar over a custom table. Entries are kept in the given order.
    pub fn from_entries(eras: impl IntoIterator<Item = EraEntry>) -> Self {
        Self {
            eras: eras.into_iter().collect(),
        }
    }

    pub fn eras(&self) -> &[EraEntry] {
        &self.eras
    }

    pub fn get(&self, name: &str) -> Option<&EraEntry> {
        self.eras.iter().find(|era| era.name == name)
    }

    pub fn start_year(&self, name: &str) -> Option<i32> {
        self.get(name).map(|era| era.start_year)
    }

    /// The era whose name begins `text`, if any.
    pub fn match_prefix(&self, text: &str) -> Option<&EraEntry> {
        self.eras.iter().find(|era| text.starts_with(era.name))
    }
}

impl Default for EraCalendar {
    fn default() -> Self {
        Self::standard()
    }
}
