// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staffing watch decisions.

use crate::error::CoreError;
use coop_shifts_domain::{
    RecurringShiftWatch, Shift, ShiftWatch, StaffingCounts, StaffingStatus, WeekGroup,
    calculate_staffing_status,
};

/// A change of the status a watch last saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchUpdate {
    pub shift_watch_id: i64,
    pub status: Option<StaffingStatus>,
    /// The status to tell the member about, when they asked for it.
    pub notify: Option<StaffingStatus>,
}

/// Plans the update of one watch against the current staffing.
///
/// Returns `Ok(None)` when the status did not change.
///
/// # Errors
///
/// Returns an error if the watch has no identifier.
pub fn plan_watch_update(
    watch: &ShiftWatch,
    counts: StaffingCounts,
) -> Result<Option<WatchUpdate>, CoreError> {
    let status: Option<StaffingStatus> = calculate_staffing_status(counts, watch.last_status);
    if status == watch.last_status {
        return Ok(None);
    }
    Ok(Some(WatchUpdate {
        shift_watch_id: watch.id()?,
        status,
        notify: status.filter(|current: &StaffingStatus| watch.watches(*current)),
    }))
}

/// Plans the watches recurring watches place on a shift.
///
/// Members in `already_watching` keep their existing watch.
///
/// # Errors
///
/// Returns an error if the shift or a matching recurring watch has no
/// identifier.
pub fn plan_recurring_watches(
    recurring: &[RecurringShiftWatch],
    shift: &Shift,
    template_group: Option<WeekGroup>,
    counts: StaffingCounts,
    already_watching: &[i64],
) -> Result<Vec<ShiftWatch>, CoreError> {
    let shift_id: i64 = shift.id()?;
    let mut watches: Vec<ShiftWatch> = Vec::new();
    for watch in recurring {
        if !watch.matches(shift, template_group) {
            continue;
        }
        let member_seen: bool = already_watching.contains(&watch.member_id)
            || watches
                .iter()
                .any(|planned: &ShiftWatch| planned.member_id == watch.member_id);
        if member_seen {
            continue;
        }
        watches.push(watch.watch_for(shift_id, counts)?);
    }
    Ok(watches)
}
