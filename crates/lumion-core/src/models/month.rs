//! Reference month of a bill (`MMM/YYYY` with Portuguese abbreviations).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Portuguese month abbreviations as printed on bills.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "JAN", "FEV", "MAR", "ABR", "MAI", "JUN", "JUL", "AGO", "SET", "OUT", "NOV", "DEZ",
];

/// A billing month. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReferenceMonth {
    pub year: i32,
    /// 1-based month number.
    pub month: u32,
}

impl ReferenceMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Upper-case abbreviation, e.g. `ABR`.
    pub fn abbreviation(&self) -> &'static str {
        MONTH_ABBREVIATIONS[(self.month - 1) as usize]
    }
}

/// Map a Portuguese month abbreviation to its number.
pub fn month_from_abbreviation(s: &str) -> Option<u32> {
    let upper = s.trim().to_uppercase();
    MONTH_ABBREVIATIONS
        .iter()
        .position(|m| *m == upper)
        .map(|i| i as u32 + 1)
}

impl FromStr for ReferenceMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (month, year) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| format!("expected MMM/YYYY, got {:?}", s))?;

        let month = month_from_abbreviation(month)
            .ok_or_else(|| format!("unknown month abbreviation {:?}", month))?;
        let year: i32 = year
            .trim()
            .parse()
            .map_err(|_| format!("invalid year in {:?}", s))?;

        if !(1000..=9999).contains(&year) {
            return Err(format!("year out of range in {:?}", s));
        }

        Self::new(year, month).ok_or_else(|| format!("invalid month in {:?}", s))
    }
}

impl fmt::Display for ReferenceMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.abbreviation(), self.year)
    }
}
