//! Calendar arithmetic relative to a caller-supplied "today".
//!
//! Everything here is pure so callers (and tests) pin the reference date
//! instead of reading the clock.

use crate::types::Recurrence;
use chrono::{Days, Local, Months, NaiveDate};
use std::fmt;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Signed number of days from `today` to `due`; positive in the future.
pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Signed number of days `due` lies behind `today`; negative in the future.
pub fn days_overdue(due: NaiveDate, today: NaiveDate) -> i64 {
    (today - due).num_days()
}

pub fn is_overdue(due: NaiveDate, today: NaiveDate) -> bool {
    due < today
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Overdue(i64),
    Today,
    Upcoming(i64),
}

impl DueStatus {
    pub fn of(due: NaiveDate, today: NaiveDate) -> Self {
        if is_overdue(due, today) {
            DueStatus::Overdue(days_overdue(due, today))
        } else if due == today {
            DueStatus::Today
        } else {
            DueStatus::Upcoming(days_until(due, today))
        }
    }
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueStatus::Overdue(days) => write!(f, "(due {} days ago)", days),
            DueStatus::Today => write!(f, "(Due today)"),
            DueStatus::Upcoming(days) => write!(f, "(due in {} days)", days),
        }
    }
}

impl Recurrence {
    /// Due date of the occurrence following one due on `from`.
    ///
    /// Monthly steps keep the day of month, clamped to the end of shorter
    /// months (Jan 31 -> Feb 28/29).
    pub fn next_due(self, from: NaiveDate) -> NaiveDate {
        let next = match self {
            Recurrence::Daily => from.checked_add_days(Days::new(1)),
            Recurrence::Weekly => from.checked_add_days(Days::new(7)),
            Recurrence::Monthly => from.checked_add_months(Months::new(1)),
        };
        next.unwrap_or(NaiveDate::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn due_status_relative_to_today() {
        let today = date(2024, 3, 10);

        assert_eq!(DueStatus::of(today, today).to_string(), "(Due today)");
        assert_eq!(
            DueStatus::of(date(2024, 3, 9), today).to_string(),
            "(due 1 days ago)"
        );
        assert_eq!(
            DueStatus::of(date(2024, 3, 11), today).to_string(),
            "(due in 1 days)"
        );
        assert_eq!(
            DueStatus::of(date(2024, 2, 29), today),
            DueStatus::Overdue(10)
        );
    }

    #[test]
    fn overdue_counts_are_signed() {
        let today = date(2024, 1, 1);
        assert!(is_overdue(date(2023, 12, 31), today));
        assert!(!is_overdue(today, today));
        assert_eq!(days_overdue(date(2023, 12, 29), today), 3);
        assert_eq!(days_overdue(date(2024, 1, 4), today), -3);
        assert_eq!(days_until(date(2024, 1, 4), today), 3);
    }

    #[test]
    fn recurrence_steps() {
        let from = date(2024, 1, 31);
        assert_eq!(Recurrence::Daily.next_due(from), date(2024, 2, 1));
        assert_eq!(Recurrence::Weekly.next_due(from), date(2024, 2, 7));
        assert_eq!(Recurrence::Monthly.next_due(from), date(2024, 2, 29));
        assert_eq!(Recurrence::Monthly.next_due(date(2023, 1, 31)), date(2023, 2, 28));
        assert_eq!(Recurrence::Monthly.next_due(date(2023, 12, 15)), date(2024, 1, 15));
    }
}
