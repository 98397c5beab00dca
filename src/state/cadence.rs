//! Refresh cadences and the idempotence gate built on them.

use crate::state::store::RunState;
use chrono::NaiveDateTime;
use std::fmt;

/// How often a dataset is refreshed. The gate compares the period key of
/// "now" with the key persisted by the previous run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshCadence {
    /// `YYYY-MM-DD`
    Daily,
    /// `YYYY-MM`
    Monthly,
}

impl RefreshCadence {
    pub fn period_key(&self, now: NaiveDateTime) -> String {
        match self {
            RefreshCadence::Daily => now.format("%Y-%m-%d").to_string(),
            RefreshCadence::Monthly => now.format("%Y-%m").to_string(),
        }
    }

    /// True when a run already completed in the period containing `now`.
    pub fn already_ran(&self, state: &RunState, now: NaiveDateTime) -> bool {
        state.last_update.as_deref() == Some(self.period_key(now).as_str())
    }
}

impl fmt::Display for RefreshCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshCadence::Daily => write!(f, "daily"),
            RefreshCadence::Monthly => write!(f, "monthly"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(8, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_period_keys() {
        assert_eq!(RefreshCadence::Daily.period_key(at(2024, 3, 7)), "2024-03-07");
        assert_eq!(RefreshCadence::Monthly.period_key(at(2024, 3, 7)), "2024-03");
    }

    #[test]
    fn test_gate() {
        let state = RunState::new("2024-03", 10);
        assert!(RefreshCadence::Monthly.already_ran(&state, at(2024, 3, 31)));
        assert!(!RefreshCadence::Monthly.already_ran(&state, at(2024, 4, 1)));
        assert!(!RefreshCadence::Daily.already_ran(&state, at(2024, 3, 31)));
        assert!(!RefreshCadence::Daily.already_ran(&RunState::default(), at(2024, 3, 31)));
    }
}
