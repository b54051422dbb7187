//! Fiscal quarters and their month-day boundaries

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One of the four fiscal quarters, persisted as the integer 1-4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    /// All quarters in order
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Q1),
            2 => Some(Self::Q2),
            3 => Some(Self::Q3),
            4 => Some(Self::Q4),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Self::Q1 => 1,
            Self::Q2 => 2,
            Self::Q3 => 3,
            Self::Q4 => 4,
        }
    }

    /// Zero-based position, for indexing per-quarter arrays
    pub fn index(&self) -> usize {
        self.number() as usize - 1
    }
}

impl TryFrom<u8> for Quarter {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Quarter::from_number(n).ok_or_else(|| format!("quarter must be 1-4, got {}", n))
    }
}

impl From<Quarter> for u8 {
    fn from(q: Quarter) -> u8 {
        q.number()
    }
}

impl FromStr for Quarter {
    type Err = String;

    /// Accepts "1".."4" and "Q1".."Q4"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s
            .strip_prefix('Q')
            .or_else(|| s.strip_prefix('q'))
            .unwrap_or(s);
        let n: u8 = digits
            .parse()
            .map_err(|_| format!("invalid quarter '{}'", s))?;
        Quarter::try_from(n)
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.number())
    }
}

/// A year-independent boundary such as `04-01`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Create a boundary; Feb 29 is allowed
    pub fn new(month: u32, day: u32) -> Option<Self> {
        // 2000 is a leap year, so every real month-day validates
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| Self { month, day })
    }

    /// Boundary from literal values already known to be valid
    pub(crate) const fn known(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Month-day of a calendar date
    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    /// Calendar date of this boundary in `year`; Feb 29 falls back to Feb 28
    /// in common years
    pub fn in_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
            .or_else(|| NaiveDate::from_ymd_opt(year, self.month, self.day - 1))
    }

    /// Parse `MM-DD`
    pub fn parse(s: &str) -> Result<Self, MonthDayParseError> {
        let s = s.trim();
        let (m, d) = s
            .split_once('-')
            .ok_or_else(|| MonthDayParseError(s.to_string()))?;
        if m.len() != 2 || d.len() != 2 {
            return Err(MonthDayParseError(s.to_string()));
        }
        let month: u32 = m.parse().map_err(|_| MonthDayParseError(s.to_string()))?;
        let day: u32 = d.parse().map_err(|_| MonthDayParseError(s.to_string()))?;
        Self::new(month, day).ok_or_else(|| MonthDayParseError(s.to_string()))
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for MonthDay {
    type Err = MonthDayParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for MonthDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        MonthDay::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthDayParseError(pub String);

impl fmt::Display for MonthDayParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid quarter boundary '{}', expected MM-DD", self.0)
    }
}

impl std::error::Error for MonthDayParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_numbers() {
        for (i, q) in Quarter::ALL.iter().enumerate() {
            assert_eq!(q.index(), i);
            assert_eq!(Quarter::from_number(q.number()), Some(*q));
        }
        assert_eq!(Quarter::from_number(0), None);
        assert_eq!(Quarter::from_number(5), None);
    }

    #[test]
    fn test_quarter_from_str() {
        assert_eq!("2".parse::<Quarter>().unwrap(), Quarter::Q2);
        assert_eq!("Q4".parse::<Quarter>().unwrap(), Quarter::Q4);
        assert!("5".parse::<Quarter>().is_err());
        assert!("All".parse::<Quarter>().is_err());
    }

    #[test]
    fn test_quarter_serde_as_integer() {
        assert_eq!(serde_json::to_string(&Quarter::Q3).unwrap(), "3");
        let q: Quarter = serde_json::from_str("1").unwrap();
        assert_eq!(q, Quarter::Q1);
        assert!(serde_json::from_str::<Quarter>("9").is_err());
    }

    #[test]
    fn test_month_day_parse() {
        let md = MonthDay::parse("04-01").unwrap();
        assert_eq!(md.month(), 4);
        assert_eq!(md.day(), 1);
        assert_eq!(md.to_string(), "04-01");

        assert!(MonthDay::parse("02-29").is_ok());
        assert!(MonthDay::parse("02-30").is_err());
        assert!(MonthDay::parse("4-1").is_err());
        assert!(MonthDay::parse("2024-04-01").is_err());
    }

    #[test]
    fn test_month_day_in_year() {
        let leap = MonthDay::parse("02-29").unwrap();
        assert_eq!(leap.in_year(2024), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(leap.in_year(2023), NaiveDate::from_ymd_opt(2023, 2, 28));
    }

    #[test]
    fn test_month_day_serde() {
        let md = MonthDay::parse("10-01").unwrap();
        assert_eq!(serde_json::to_string(&md).unwrap(), "\"10-01\"");
        let back: MonthDay = serde_json::from_str("\"07-15\"").unwrap();
        assert_eq!(back, MonthDay::new(7, 15).unwrap());
    }
}
