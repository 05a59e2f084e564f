// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift watches and their notifications.
//!
//! The watch job compares each watched shift's staffing with the status it
//! saw last time. Every change is stored; members are only told about the
//! statuses they asked for.

use crate::attendance::require_shift;
use crate::error::ApiError;
use crate::members::require_member;
use crate::notifications::{self, MailTransport, send_notification};
use crate::reminders::NotificationSummary;
use coop_shifts::{WatchUpdate, plan_recurring_watches, plan_watch_update};
use coop_shifts_domain::{
    Member, Notification, RecurringShiftWatch, Shift, ShiftTemplate, ShiftWatch, StaffingCounts,
    StaffingStatus, WeekGroup, initial_staffing_status,
};
use coop_shifts_persistence::Persistence;
use std::collections::HashMap;
use time::PrimitiveDateTime;
use tracing::{debug, error, info};

/// Loads the staffing counts of a shift.
///
/// # Errors
///
/// Returns an error if the shift was never stored or a query fails.
pub fn staffing_counts(
    persistence: &mut Persistence,
    shift: &Shift,
) -> Result<StaffingCounts, ApiError> {
    let shift_id: i64 = shift.id()?;
    Ok(StaffingCounts {
        slots: persistence.list_slots_for_shift(shift_id)?.len(),
        valid_attendances: persistence.count_valid_attendances_for_shift(shift_id)?,
        required_attendances: usize::try_from(shift.num_required_attendances)
            .unwrap_or(usize::MAX),
    })
}

/// Starts watching a shift for the given statuses.
///
/// # Errors
///
/// Returns an error if the member or shift does not exist, the member
/// already watches the shift, or a write fails.
pub fn watch_shift(
    persistence: &mut Persistence,
    member_id: i64,
    shift_id: i64,
    statuses: Vec<StaffingStatus>,
) -> Result<ShiftWatch, ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        require_member(tx, member_id)?;
        let shift: Shift = require_shift(tx, shift_id)?;
        if tx.shift_watch_exists(member_id, shift_id)? {
            return Err(ApiError::DomainRuleViolation {
                rule: String::from("shift_already_watched"),
                message: format!("member {member_id} already watches shift {shift_id}"),
            });
        }
        let counts: StaffingCounts = staffing_counts(tx, &shift)?;
        let mut watch: ShiftWatch = ShiftWatch::new(
            member_id,
            shift_id,
            statuses,
            Some(initial_staffing_status(counts)),
        );
        watch.shift_watch_id = Some(tx.create_shift_watch(&watch)?);
        info!(member_id, shift_id, "Watching shift");
        Ok(watch)
    })
}

/// Places watches on `shift` for every matching recurring watch.
///
/// Members already watching the shift keep their existing watch. Returns
/// the number of watches created.
pub(crate) fn create_watches_for_shift(
    persistence: &mut Persistence,
    shift: &Shift,
    template_group: Option<WeekGroup>,
) -> Result<usize, ApiError> {
    let recurring: Vec<RecurringShiftWatch> = persistence.list_recurring_shift_watches()?;
    if recurring.is_empty() {
        return Ok(0);
    }
    let shift_id: i64 = shift.id()?;
    let mut already_watching: Vec<i64> = Vec::new();
    for watch in &recurring {
        if persistence.shift_watch_exists(watch.member_id, shift_id)? {
            already_watching.push(watch.member_id);
        }
    }
    let counts: StaffingCounts = staffing_counts(persistence, shift)?;
    let watches: Vec<ShiftWatch> =
        plan_recurring_watches(&recurring, shift, template_group, counts, &already_watching)?;
    for watch in &watches {
        persistence.create_shift_watch(watch)?;
    }
    if !watches.is_empty() {
        debug!(shift_id, created = watches.len(), "Placed recurring watches on shift");
    }
    Ok(watches.len())
}

/// Stores a recurring watch and places it on every matching upcoming shift.
///
/// Shifts generated later pick the watch up when they are created.
///
/// # Errors
///
/// Returns an error if the member does not exist or a write fails.
pub fn create_recurring_shift_watch(
    persistence: &mut Persistence,
    watch: RecurringShiftWatch,
    now: PrimitiveDateTime,
) -> Result<RecurringShiftWatch, ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        require_member(tx, watch.member_id)?;
        let mut watch: RecurringShiftWatch = watch;
        watch.recurring_watch_id = Some(tx.create_recurring_shift_watch(&watch)?);

        let groups: HashMap<i64, Option<WeekGroup>> = tx
            .list_shift_templates()?
            .into_iter()
            .filter_map(|template: ShiftTemplate| {
                template.shift_template_id.map(|id: i64| (id, template.group))
            })
            .collect();
        let mut created: usize = 0;
        for shift in tx.list_live_shifts_after(now)? {
            let template_group: Option<WeekGroup> = shift
                .shift_template_id
                .and_then(|id: i64| groups.get(&id).copied().flatten());
            if !watch.matches(&shift, template_group) {
                continue;
            }
            let shift_id: i64 = shift.id()?;
            if tx.shift_watch_exists(watch.member_id, shift_id)? {
                continue;
            }
            let counts: StaffingCounts = staffing_counts(tx, &shift)?;
            tx.create_shift_watch(&watch.watch_for(shift_id, counts)?)?;
            created += 1;
        }
        info!(member_id = watch.member_id, created, "Created recurring shift watch");
        Ok(watch)
    })
}

fn update_watch(
    persistence: &mut Persistence,
    transport: &dyn MailTransport,
    watch: &ShiftWatch,
    shift: &Shift,
    now: PrimitiveDateTime,
) -> Result<bool, ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        let counts: StaffingCounts = staffing_counts(tx, shift)?;
        let Some(update) = plan_watch_update(watch, counts)? else {
            return Ok(false);
        };
        let WatchUpdate {
            shift_watch_id,
            status,
            notify,
        } = update;
        tx.update_shift_watch_status(shift_watch_id, status)?;
        let Some(news) = notify else {
            debug!(shift_watch_id, ?status, "Shift watch status changed silently");
            return Ok(false);
        };
        let member: Member = require_member(tx, watch.member_id)?;
        let notification: Notification = notifications::shift_watch(&member, shift, news)?;
        send_notification(tx, transport, &notification, now)?;
        Ok(true)
    })
}

/// Checks every watch on an upcoming shift and tells members about the
/// status changes they watch for.
///
/// Each watch is handled in its own transaction, so a failed delivery
/// leaves its status untouched and is retried on the next run.
///
/// # Errors
///
/// Returns an error only if the watches cannot be listed.
pub fn send_shift_watch_notifications(
    persistence: &mut Persistence,
    transport: &dyn MailTransport,
    now: PrimitiveDateTime,
) -> Result<NotificationSummary, ApiError> {
    let watches: Vec<(ShiftWatch, Shift)> = persistence.list_shift_watches_on_shifts_after(now)?;

    let mut summary: NotificationSummary = NotificationSummary::default();
    for (watch, shift) in watches {
        match update_watch(persistence, transport, &watch, &shift, now) {
            Ok(true) => summary.sent += 1,
            Ok(false) => {}
            Err(err) => {
                error!(
                    shift_watch_id = ?watch.shift_watch_id,
                    error = %err,
                    "Failed to update shift watch"
                );
                summary.failed += 1;
            }
        }
    }
    info!(sent = summary.sent, failed = summary.failed, "Sent shift watch notifications");
    Ok(summary)
}
