//! Transaction identifiers
//!
//! Ids are millisecond timestamps, bumped past the last issued id so two
//! transactions created in the same millisecond still get distinct values.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(i64);

impl TransactionId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> i64 {
        self.0
    }

    /// Next id after `last`, preferring the current millisecond timestamp
    pub fn next_after(last: Option<TransactionId>) -> Self {
        Self::next_at(Utc::now().timestamp_millis(), last)
    }

    /// Next id for a given clock reading
    pub fn next_at(now_millis: i64, last: Option<TransactionId>) -> Self {
        match last {
            Some(TransactionId(prev)) if prev >= now_millis => Self(prev + 1),
            _ => Self(now_millis),
        }
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl From<i64> for TransactionId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}
