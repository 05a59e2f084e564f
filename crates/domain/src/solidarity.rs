// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Solidarity shifts.
//!
//! A member with a done attendance to spare may give it away: their balance
//! drops by one and the shift lands in a shared pool. A member short on
//! points may take one shift from the pool, a limited number of times per
//! calendar year.

use crate::error::DomainError;
use time::Date;

/// A shift given to the solidarity pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolidarityShift {
    pub solidarity_shift_id: Option<i64>,
    /// The done attendance that was given away.
    pub gifted_attendance_id: i64,
    pub date_gifted: Date,
    /// The member who received the shift, once used.
    pub used_by_member_id: Option<i64>,
    pub date_used: Option<Date>,
}

impl SolidarityShift {
    /// Creates an unused solidarity shift.
    #[must_use]
    pub const fn new(gifted_attendance_id: i64, date_gifted: Date) -> Self {
        Self {
            solidarity_shift_id: None,
            gifted_attendance_id,
            date_gifted,
            used_by_member_id: None,
            date_used: None,
        }
    }

    /// Returns the persisted ID.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingIdentifier` if the shift was never stored.
    pub fn id(&self) -> Result<i64, DomainError> {
        self.solidarity_shift_id
            .ok_or(DomainError::MissingIdentifier { entity: "solidarity shift" })
    }

    #[must_use]
    pub const fn is_used_up(&self) -> bool {
        self.used_by_member_id.is_some()
    }

    /// Returns a copy handed to `member_id` on `date`.
    #[must_use]
    pub fn used_by(&self, member_id: i64, date: Date) -> Self {
        Self {
            used_by_member_id: Some(member_id),
            date_used: Some(date),
            ..self.clone()
        }
    }
}

/// Counts the solidarity shifts `member_id` received in `year`.
#[must_use]
pub fn solidarity_shifts_used_in_year(
    shifts: &[SolidarityShift],
    member_id: i64,
    year: i32,
) -> usize {
    shifts
        .iter()
        .filter(|shift| shift.used_by_member_id == Some(member_id))
        .filter(|shift| shift.date_used.is_some_and(|date: Date| date.year() == year))
        .count()
}

/// Why a solidarity shift cannot be given or received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolidarityBlocker {
    /// The pool is empty.
    NoneAvailable,
    /// The member already received the yearly maximum.
    YearlyLimitReached { used: usize, limit: usize },
    /// The member has no done attendance that was not given away already.
    NoAttendanceToGive,
}

impl SolidarityBlocker {
    /// Stable name used in error reports.
    #[must_use]
    pub const fn rule(&self) -> &'static str {
        match self {
            Self::NoneAvailable => "no_solidarity_shift_available",
            Self::YearlyLimitReached { .. } => "solidarity_yearly_limit",
            Self::NoAttendanceToGive => "no_attendance_to_give",
        }
    }
}

impl std::fmt::Display for SolidarityBlocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoneAvailable => write!(f, "there are no available solidarity shifts"),
            Self::YearlyLimitReached { used, limit } => {
                write!(f, "{used} of {limit} solidarity shifts already used this year")
            }
            Self::NoAttendanceToGive => {
                write!(f, "no done attendance is left to give as a solidarity shift")
            }
        }
    }
}
