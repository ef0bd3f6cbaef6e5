use serde::{Deserialize, Serialize};
use std::fmt;

/// Optimistic-concurrency stamp carried by every mutable record.
///
/// The database assigns [`RecordVersion::INITIAL`] on insert and increments
/// the stored value on every successful update. A writer must present the
/// version it last read; the store refuses the write otherwise.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
    Deserialize,
)]
#[serde(transparent)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct RecordVersion(pub i32);

impl RecordVersion {
    pub const INITIAL: RecordVersion = RecordVersion(1);

    pub fn get(&self) -> i32 {
        self.0
    }

    /// The version the store will assign after one successful update.
    pub fn next(&self) -> RecordVersion {
        RecordVersion(self.0.saturating_add(1))
    }
}

impl Default for RecordVersion {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl From<i32> for RecordVersion {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for RecordVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_start_at_one_and_count_up() {
        assert_eq!(RecordVersion::default(), RecordVersion::INITIAL);
        assert_eq!(RecordVersion::INITIAL.next(), RecordVersion(2));
        assert_eq!(RecordVersion(i32::MAX).next(), RecordVersion(i32::MAX));
    }
}
