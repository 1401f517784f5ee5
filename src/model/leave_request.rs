use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaveRequest {
    pub id: u64,
    pub employee_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_type: String,
    pub status: String,
}

/// Leave request lifecycle. A request starts `Pending`, a manager forwards
/// it to `PendingRhApproval`, RH settles it. `Rejected` and `Cancelled`
/// are terminal, as is `Approved`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum LeaveStatus {
    Pending,
    PendingRhApproval,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LeaveStatus::Approved | LeaveStatus::Rejected | LeaveStatus::Cancelled
        )
    }

    pub fn can_transition_to(&self, next: LeaveStatus) -> bool {
        use LeaveStatus::*;
        matches!(
            (self, next),
            (Pending, PendingRhApproval)
                | (Pending, Rejected)
                | (Pending, Cancelled)
                | (PendingRhApproval, Approved)
                | (PendingRhApproval, Rejected)
                | (PendingRhApproval, Cancelled)
        )
    }
}

/// Days of balance a request consumes: Mon-Fri days in the inclusive
/// range. Weekends never count against the balance.
pub fn leave_day_count(start: NaiveDate, end: NaiveDate) -> i64 {
    let mut days = 0;
    let mut current = start;
    while current <= end {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            days += 1;
        }
        current = current.succ_opt().expect("date overflow");
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn legal_transitions() {
        assert!(LeaveStatus::Pending.can_transition_to(LeaveStatus::Rejected));
        assert!(LeaveStatus::Pending.can_transition_to(LeaveStatus::PendingRhApproval));
        assert!(LeaveStatus::PendingRhApproval.can_transition_to(LeaveStatus::Approved));
        assert!(LeaveStatus::Pending.can_transition_to(LeaveStatus::Cancelled));
        assert!(LeaveStatus::PendingRhApproval.can_transition_to(LeaveStatus::Cancelled));
    }

    #[test]
    fn terminal_states_allow_nothing() {
        for terminal in [
            LeaveStatus::Approved,
            LeaveStatus::Rejected,
            LeaveStatus::Cancelled,
        ] {
            assert!(terminal.is_terminal());
            for next in [
                LeaveStatus::Pending,
                LeaveStatus::PendingRhApproval,
                LeaveStatus::Approved,
                LeaveStatus::Rejected,
                LeaveStatus::Cancelled,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn approved_cannot_go_back_to_pending() {
        assert!(!LeaveStatus::Approved.can_transition_to(LeaveStatus::Pending));
    }

    #[test]
    fn pending_cannot_skip_to_approved() {
        assert!(!LeaveStatus::Pending.can_transition_to(LeaveStatus::Approved));
    }

    #[test]
    fn status_string_round_trip() {
        assert_eq!(LeaveStatus::PendingRhApproval.to_string(), "pending_rh_approval");
        assert_eq!(
            "cancelled".parse::<LeaveStatus>().unwrap(),
            LeaveStatus::Cancelled
        );
        assert!("archived".parse::<LeaveStatus>().is_err());
    }

    #[test]
    fn day_count_skips_weekends() {
        // Mon 2026-01-05 .. Fri 2026-01-09
        assert_eq!(leave_day_count(date(2026, 1, 5), date(2026, 1, 9)), 5);
        // Fri .. Mon spans a weekend
        assert_eq!(leave_day_count(date(2026, 1, 9), date(2026, 1, 12)), 2);
        // Sat .. Sun is free
        assert_eq!(leave_day_count(date(2026, 1, 10), date(2026, 1, 11)), 0);
        // single day
        assert_eq!(leave_day_count(date(2026, 1, 7), date(2026, 1, 7)), 1);
    }
}
