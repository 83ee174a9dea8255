//! ロック期間

use crate::error::DomainError;
use std::fmt;

/// ロック期間（時間単位）。表示層の上下限 1〜168 時間（1週間）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LockDuration {
    hours: u32,
}

impl LockDuration {
    pub const MIN_HOURS: u32 = 1;
    pub const MAX_HOURS: u32 = 168;

    pub fn from_hours(hours: u32) -> Result<Self, DomainError> {
        if !(Self::MIN_HOURS..=Self::MAX_HOURS).contains(&hours) {
            return Err(DomainError::Validation(format!(
                "lock duration must be {}-{} hours, got {}",
                Self::MIN_HOURS,
                Self::MAX_HOURS,
                hours
            )));
        }
        Ok(Self { hours })
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn as_secs(&self) -> u64 {
        u64::from(self.hours) * 3_600
    }
}

impl fmt::Display for LockDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h", self.hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert_eq!(LockDuration::from_hours(1).unwrap().as_secs(), 3_600);
        assert_eq!(LockDuration::from_hours(168).unwrap().as_secs(), 604_800);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            LockDuration::from_hours(0),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            LockDuration::from_hours(169),
            Err(DomainError::Validation(_))
        ));
    }
}
