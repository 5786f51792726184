use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
///
/// Every timestamp in the exploration loop comes from the player store's
/// clock, so two sessions fed the same clock produce identical logs.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The Unix epoch.
    pub const EPOCH: Self = Self(0);

    /// Wrap a raw millisecond count.
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Convert a chrono UTC datetime.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }

    /// The raw millisecond count.
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// This timestamp shifted by `millis` (negative moves backwards).
    pub const fn plus_millis(self, millis: i64) -> Self {
        Self(self.0.saturating_add(millis))
    }

    /// Milliseconds elapsed from `earlier` to `self`.
    pub const fn millis_since(self, earlier: Self) -> i64 {
        self.0.saturating_sub(earlier.0)
    }

    /// The equivalent chrono datetime, if it is in chrono's range.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_millis_adds() {
        let t = Timestamp::from_millis(1_000);
        assert_eq!(t.plus_millis(3_600_000).as_millis(), 3_601_000);
        assert_eq!(t.plus_millis(-500).as_millis(), 500);
    }

    #[test]
    fn plus_millis_saturates() {
        let t = Timestamp::from_millis(i64::MAX - 1);
        assert_eq!(t.plus_millis(10).as_millis(), i64::MAX);
    }

    #[test]
    fn datetime_conversion() {
        let t = Timestamp::from_millis(1_700_000_000_123);
        let dt = t.to_datetime().unwrap();
        assert_eq!(Timestamp::from_datetime(dt), t);
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&Timestamp::from_millis(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn display_is_millis() {
        assert_eq!(Timestamp::from_millis(1234).to_string(), "1234");
    }
}
