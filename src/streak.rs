//! Consecutive-day engagement streak logic.
//!
//! Pure date arithmetic; persistence lives in the subscriber service. All
//! comparisons use the subscriber's local calendar date so a subscriber far
//! from the default zone never sees a boundary mismatch.

use chrono::Days;
use chrono::NaiveDate;

/// Streak counters as stored on the subscriber row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakState {
    pub current: i64,
    pub best: i64,
    pub last_check_date: Option<NaiveDate>,
}

/// Result of advancing a streak for a given local date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakAdvance {
    pub current: i64,
    pub best: i64,
    pub is_new_record: bool,
    /// False when the advance was a same-day no-op and nothing needs writing.
    pub changed: bool,
}

/// Advances a streak for `today`.
///
/// Gap of exactly one day extends the streak; a gap of zero is a no-op;
/// anything else (including an unset date) starts over at 1.
pub fn advance(state: &StreakState, today: NaiveDate) -> StreakAdvance {
    let Some(last) = state.last_check_date else {
        return StreakAdvance {
            current: 1,
            best: state.best.max(1),
            is_new_record: state.best == 0,
            changed: true,
        };
    };

    if last == today {
        return StreakAdvance {
            current: state.current,
            best: state.best,
            is_new_record: false,
            changed: false,
        };
    }

    let extended = last
        .checked_add_days(Days::new(1))
        .is_some_and(|next| next == today);

    if extended {
        let current = state.current + 1;
        StreakAdvance {
            current,
            best: state.best.max(current),
            is_new_record: current > state.best,
            changed: true,
        }
    } else {
        StreakAdvance {
            current: 1,
            best: state.best.max(1),
            is_new_record: state.best == 0,
            changed: true,
        }
    }
}
