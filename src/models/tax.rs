//! Tax percentage attached to a transaction
//!
//! Stored as basis points (hundredths of a percent) so `5.5%` and `21%` are
//! exact. Serialized as the plain percentage number.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TaxRate(i64);

impl TaxRate {
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Whole percentage, e.g. `from_percent(10)` is 10%
    pub const fn from_percent(percent: i64) -> Self {
        Self(percent * 100)
    }

    pub const fn from_basis_points(bp: i64) -> Self {
        Self(bp)
    }

    pub const fn basis_points(&self) -> i64 {
        self.0
    }

    /// Largest accepted rate, in either direction
    pub const MAX_PERCENT: f64 = 1_000_000.0;

    /// Rate from a percentage; `None` when not finite or beyond
    /// [`Self::MAX_PERCENT`]
    pub fn from_f64(percent: f64) -> Option<Self> {
        if !percent.is_finite() || percent.abs() > Self::MAX_PERCENT {
            return None;
        }
        Some(Self((percent * 100.0).round() as i64))
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Parse a percentage such as "10", "5.5" or "21%"
    pub fn parse(s: &str) -> Result<Self, TaxParseError> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
        let value: f64 = trimmed
            .parse()
            .map_err(|_| TaxParseError(s.to_string()))?;
        Self::from_f64(value).ok_or_else(|| TaxParseError(s.to_string()))
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let whole = (self.0 / 100).abs();
        let frac = (self.0 % 100).abs();
        match frac {
            0 => write!(f, "{}{}", sign, whole),
            f_ if f_ % 10 == 0 => write!(f, "{}{}.{}", sign, whole, f_ / 10),
            f_ => write!(f, "{}{}.{:02}", sign, whole, f_),
        }
    }
}

impl Serialize for TaxRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for TaxRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        TaxRate::from_f64(value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid tax rate: {}", value)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxParseError(pub String);

impl fmt::Display for TaxParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid tax percentage: {}", self.0)
    }
}

impl std::error::Error for TaxParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(TaxRate::parse("10").unwrap(), TaxRate::from_percent(10));
        assert_eq!(TaxRate::parse("5.5").unwrap().basis_points(), 550);
        assert_eq!(TaxRate::parse("21%").unwrap(), TaxRate::from_percent(21));
        assert!(TaxRate::parse("ten").is_err());
        assert!(TaxRate::parse("1e300").is_err());
        assert!(TaxRate::parse("NaN").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(TaxRate::from_percent(10).to_string(), "10");
        assert_eq!(TaxRate::from_basis_points(550).to_string(), "5.5");
        assert_eq!(TaxRate::from_basis_points(1225).to_string(), "12.25");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&TaxRate::from_basis_points(550)).unwrap();
        assert_eq!(json, "5.5");
        let back: TaxRate = serde_json::from_str("21").unwrap();
        assert_eq!(back, TaxRate::from_percent(21));
    }
}
