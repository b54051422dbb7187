//! Fiscal settings
//!
//! The singleton record holding the fiscal year and the four quarter start
//! boundaries. Boundaries are month-day markers reused for every year.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::quarter::{MonthDay, Quarter};

/// Id of the only settings record
pub const SETTINGS_ID: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_settings_id")]
    pub id: u32,
    pub year: i32,
    pub q1_start: MonthDay,
    pub q2_start: MonthDay,
    pub q3_start: MonthDay,
    pub q4_start: MonthDay,
}

fn default_settings_id() -> u32 {
    SETTINGS_ID
}

/// The four quarter boundaries, in quarter order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuarterBoundaries(pub [MonthDay; 4]);

impl Default for QuarterBoundaries {
    /// Calendar quarters: 01-01, 04-01, 07-01, 10-01
    fn default() -> Self {
        Self([
            MonthDay::known(1, 1),
            MonthDay::known(4, 1),
            MonthDay::known(7, 1),
            MonthDay::known(10, 1),
        ])
    }
}

impl Settings {
    /// Default calendar-quarter settings for a fiscal year
    pub fn default_for_year(year: i32) -> Self {
        Self::with_boundaries(year, QuarterBoundaries::default())
    }

    pub fn with_boundaries(year: i32, boundaries: QuarterBoundaries) -> Self {
        let [q1, q2, q3, q4] = boundaries.0;
        Self {
            id: SETTINGS_ID,
            year,
            q1_start: q1,
            q2_start: q2,
            q3_start: q3,
            q4_start: q4,
        }
    }

    pub fn boundaries(&self) -> QuarterBoundaries {
        QuarterBoundaries([self.q1_start, self.q2_start, self.q3_start, self.q4_start])
    }

    /// Start boundary of a quarter
    pub fn start_of(&self, quarter: Quarter) -> MonthDay {
        self.boundaries().0[quarter.index()]
    }

    /// Calendar date a quarter starts on in `year`
    pub fn quarter_start(&self, quarter: Quarter, year: i32) -> Option<NaiveDate> {
        self.start_of(quarter).in_year(year)
    }

    /// The quarter a date falls in: the one with the latest boundary on or
    /// before the date's month-day. Dates before every boundary belong to the
    /// quarter with the latest boundary (it started the previous year).
    pub fn quarter_for_date(&self, date: NaiveDate) -> Quarter {
        let md = MonthDay::of(date);
        let mut starts: Vec<(MonthDay, Quarter)> = Quarter::ALL
            .iter()
            .map(|q| (self.start_of(*q), *q))
            .collect();
        starts.sort();

        starts
            .iter()
            .rev()
            .find(|(start, _)| *start <= md)
            .or_else(|| starts.last())
            .map(|(_, q)| *q)
            .unwrap_or(Quarter::Q1)
    }
}
