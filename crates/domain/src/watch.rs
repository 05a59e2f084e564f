// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift watches.
//!
//! A member watching a shift is told when its staffing changes in a way
//! they asked about. Recurring watches create a watch for every matching
//! shift, including shifts generated later.

use crate::error::DomainError;
use crate::shift::Shift;
use crate::types::WeekGroup;
use std::str::FromStr;
use time::Weekday;

/// How well a shift is staffed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaffingStatus {
    /// Fewer valid attendances than required.
    Understaffed,
    /// Exactly one slot left.
    AlmostFull,
    /// Every slot is taken.
    Full,
    /// Enough attendances again after being understaffed.
    AllClear,
}

impl StaffingStatus {
    pub const ALL: [Self; 4] = [Self::Understaffed, Self::AlmostFull, Self::Full, Self::AllClear];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Understaffed => "understaffed",
            Self::AlmostFull => "almost_full",
            Self::Full => "full",
            Self::AllClear => "all_clear",
        }
    }
}

impl FromStr for StaffingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::InvalidStaffingStatus(s.to_string()))
    }
}

impl std::fmt::Display for StaffingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Staffing counts of one shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffingCounts {
    pub slots: usize,
    pub valid_attendances: usize,
    pub required_attendances: usize,
}

/// Computes the staffing status of a shift.
///
/// Returns `None` when nothing noteworthy holds: the shift has enough
/// attendances, more than one free slot, and was not understaffed before.
#[must_use]
pub fn calculate_staffing_status(
    counts: StaffingCounts,
    last_status: Option<StaffingStatus>,
) -> Option<StaffingStatus> {
    if counts.valid_attendances < counts.required_attendances {
        return Some(StaffingStatus::Understaffed);
    }
    match counts.slots.saturating_sub(counts.valid_attendances) {
        0 => Some(StaffingStatus::Full),
        1 => Some(StaffingStatus::AlmostFull),
        _ if last_status == Some(StaffingStatus::Understaffed) => Some(StaffingStatus::AllClear),
        _ => None,
    }
}

/// Returns the current status only if it differs from `last_status`.
#[must_use]
pub fn staffing_status_if_changed(
    counts: StaffingCounts,
    last_status: Option<StaffingStatus>,
) -> Option<StaffingStatus> {
    let current: Option<StaffingStatus> = calculate_staffing_status(counts, last_status);
    if current == last_status { None } else { current }
}

/// The status a new watch starts from.
///
/// A shift with nothing noteworthy starts as `AllClear`, so only later
/// changes are reported.
#[must_use]
pub fn initial_staffing_status(counts: StaffingCounts) -> StaffingStatus {
    calculate_staffing_status(counts, None).unwrap_or(StaffingStatus::AllClear)
}

/// Joins statuses for a `TEXT` column.
#[must_use]
pub fn join_staffing_statuses(statuses: &[StaffingStatus]) -> String {
    statuses
        .iter()
        .map(StaffingStatus::as_str)
        .collect::<Vec<&str>>()
        .join(",")
}

/// Parses a comma separated status list. Empty input yields no statuses.
///
/// # Errors
///
/// Returns `DomainError::InvalidStaffingStatus` for an unknown entry.
pub fn parse_staffing_statuses(raw: &str) -> Result<Vec<StaffingStatus>, DomainError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(StaffingStatus::from_str)
        .collect()
}

/// A member watching one shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftWatch {
    pub shift_watch_id: Option<i64>,
    pub member_id: i64,
    pub shift_id: i64,
    /// The statuses the member wants to hear about.
    pub watched_statuses: Vec<StaffingStatus>,
    /// The status last seen by the watch job.
    pub last_status: Option<StaffingStatus>,
    /// The recurring watch that created this watch, if any.
    pub recurring_watch_id: Option<i64>,
}

impl ShiftWatch {
    /// Creates a watch starting from `last_status`.
    #[must_use]
    pub const fn new(
        member_id: i64,
        shift_id: i64,
        watched_statuses: Vec<StaffingStatus>,
        last_status: Option<StaffingStatus>,
    ) -> Self {
        Self {
            shift_watch_id: None,
            member_id,
            shift_id,
            watched_statuses,
            last_status,
            recurring_watch_id: None,
        }
    }

    /// Returns the persisted ID.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingIdentifier` if the watch was never stored.
    pub fn id(&self) -> Result<i64, DomainError> {
        self.shift_watch_id
            .ok_or(DomainError::MissingIdentifier { entity: "shift watch" })
    }

    #[must_use]
    pub fn watches(&self, status: StaffingStatus) -> bool {
        self.watched_statuses.contains(&status)
    }
}

/// A standing request to watch every shift matching a pattern.
///
/// Weekdays and week groups take precedence over shift templates. A watch
/// with no criteria at all matches every shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringShiftWatch {
    pub recurring_watch_id: Option<i64>,
    pub member_id: i64,
    pub weekdays: Vec<Weekday>,
    pub week_groups: Vec<WeekGroup>,
    pub shift_template_ids: Vec<i64>,
    pub watched_statuses: Vec<StaffingStatus>,
}

impl RecurringShiftWatch {
    /// Returns the persisted ID.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingIdentifier` if the watch was never stored.
    pub fn id(&self) -> Result<i64, DomainError> {
        self.recurring_watch_id
            .ok_or(DomainError::MissingIdentifier { entity: "recurring shift watch" })
    }

    /// Returns true if `shift` falls under this watch.
    ///
    /// `template_group` is the week group of the shift's template, if any.
    #[must_use]
    pub fn matches(&self, shift: &Shift, template_group: Option<WeekGroup>) -> bool {
        if !self.weekdays.is_empty() || !self.week_groups.is_empty() {
            let weekday_ok: bool =
                self.weekdays.is_empty() || self.weekdays.contains(&shift.start_time.weekday());
            let group_ok: bool = self.week_groups.is_empty()
                || template_group.is_some_and(|group: WeekGroup| self.week_groups.contains(&group));
            return weekday_ok && group_ok;
        }
        if !self.shift_template_ids.is_empty() {
            return shift
                .shift_template_id
                .is_some_and(|id: i64| self.shift_template_ids.contains(&id));
        }
        true
    }

    /// Builds the watch this recurring watch places on `shift_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if this recurring watch was never stored.
    pub fn watch_for(
        &self,
        shift_id: i64,
        counts: StaffingCounts,
    ) -> Result<ShiftWatch, DomainError> {
        let mut watch: ShiftWatch = ShiftWatch::new(
            self.member_id,
            shift_id,
            self.watched_statuses.clone(),
            Some(initial_staffing_status(counts)),
        );
        watch.recurring_watch_id = Some(self.id()?);
        Ok(watch)
    }
}
