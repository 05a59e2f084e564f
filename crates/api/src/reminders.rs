// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scheduled member notifications.
//!
//! Each notification is logged and delivered inside one transaction, so a
//! failed delivery is retried on the next run.

use crate::cycles::get_start_date_of_current_cycle;
use crate::error::ApiError;
use crate::members::{MemberFacts, get_attendance_mode, load_member_facts, require_member};
use crate::notifications::{self, MailTransport, send_notification};
use coop_shifts_domain::{
    Attendance, AttendanceMode, Member, Notification, NotificationKind, Shift, ShiftPolicy,
    add_days, is_member_expected_to_do_shifts, start_of_day,
};
use coop_shifts_persistence::Persistence;
use time::{Date, Duration, PrimitiveDateTime};
use tracing::{debug, error, info};

/// Outcome counts of a notification run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationSummary {
    pub sent: usize,
    pub failed: usize,
}

fn send_shift_reminder(
    persistence: &mut Persistence,
    transport: &dyn MailTransport,
    attendance_id: i64,
    member_id: i64,
    shift: &Shift,
    now: PrimitiveDateTime,
) -> Result<(), ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        tx.mark_reminder_sent(attendance_id)?;
        let member: Member = require_member(tx, member_id)?;
        let notification: Notification = notifications::shift_reminder(&member, shift)?;
        send_notification(tx, transport, &notification, now)
    })
}

/// Reminds members of their pending attendances on shifts starting within
/// the reminder window.
///
/// The reminder flag is set together with the delivery, so each attendance
/// is reminded once.
///
/// # Errors
///
/// Returns an error only if the attendances cannot be listed.
pub fn send_shift_reminders(
    persistence: &mut Persistence,
    transport: &dyn MailTransport,
    policy: &ShiftPolicy,
    now: PrimitiveDateTime,
) -> Result<NotificationSummary, ApiError> {
    let until: PrimitiveDateTime = now + Duration::days(policy.reminder_days_before_shift);
    let due: Vec<(Attendance, Shift)> =
        persistence.list_pending_attendances_starting_between(now, until)?;

    let mut summary: NotificationSummary = NotificationSummary::default();
    for (attendance, shift) in due {
        let Some(attendance_id) = attendance.attendance_id else {
            continue;
        };
        match send_shift_reminder(
            persistence,
            transport,
            attendance_id,
            attendance.member_id,
            &shift,
            now,
        ) {
            Ok(()) => summary.sent += 1,
            Err(err) => {
                error!(attendance_id, error = %err, "Failed to send shift reminder");
                summary.failed += 1;
            }
        }
    }
    info!(sent = summary.sent, failed = summary.failed, "Sent shift reminders");
    Ok(summary)
}

fn warn_member_about_shift(
    persistence: &mut Persistence,
    transport: &dyn MailTransport,
    member: &Member,
    shift: &Shift,
    valid_attendances: usize,
    since: PrimitiveDateTime,
    now: PrimitiveDateTime,
) -> Result<bool, ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        let member_id: i64 = member.id()?;
        let shift_id: i64 = shift.id()?;
        if member.is_frozen || tx.member_has_valid_attendance_on_shift(member_id, shift_id)? {
            return Ok(false);
        }
        if tx.notification_exists(
            member_id,
            NotificationKind::ShiftUnderstaffed,
            Some(shift_id),
            since,
        )? {
            return Ok(false);
        }
        let notification: Notification =
            notifications::shift_understaffed(member, shift, valid_attendances)?;
        send_notification(tx, transport, &notification, now)?;
        Ok(true)
    })
}

/// Alerts opted-in members about upcoming shifts that lack members.
///
/// Each member hears about a given shift at most once. Members already
/// registered to the shift and frozen members are skipped.
///
/// # Errors
///
/// Returns an error if the shifts or members cannot be listed.
pub fn send_understaffed_shift_warnings(
    persistence: &mut Persistence,
    transport: &dyn MailTransport,
    policy: &ShiftPolicy,
    now: PrimitiveDateTime,
) -> Result<NotificationSummary, ApiError> {
    let window: Duration = Duration::days(policy.understaffed_warning_days);
    let shifts: Vec<Shift> = persistence.list_shifts_starting_between(now, now + window)?;
    let recipients: Vec<Member> = persistence.list_members_wanting_understaffed_alerts()?;

    let mut summary: NotificationSummary = NotificationSummary::default();
    for shift in shifts.iter().filter(|shift: &&Shift| !shift.cancelled) {
        let shift_id: i64 = shift.id()?;
        let valid: usize = persistence.count_valid_attendances_for_shift(shift_id)?;
        let required: usize =
            usize::try_from(shift.num_required_attendances).unwrap_or(usize::MAX);
        if valid >= required {
            continue;
        }
        debug!(shift_id, valid, required, "Shift is understaffed");

        // Any earlier warning for this shift was sent inside this window.
        let since: PrimitiveDateTime = shift.start_time - window;
        for member in &recipients {
            match warn_member_about_shift(
                persistence,
                transport,
                member,
                shift,
                valid,
                since,
                now,
            ) {
                Ok(true) => summary.sent += 1,
                Ok(false) => {}
                Err(err) => {
                    error!(
                        shift_id,
                        member_id = ?member.member_id,
                        error = %err,
                        "Failed to send understaffed warning"
                    );
                    summary.failed += 1;
                }
            }
        }
    }
    info!(
        sent = summary.sent,
        failed = summary.failed,
        "Sent understaffed shift warnings"
    );
    Ok(summary)
}

/// Returns true if the flying member should be reminded in this cycle.
fn needs_registration_reminder(
    persistence: &mut Persistence,
    member_id: i64,
    cycle_start: Date,
    cycle_end: Date,
    now: PrimitiveDateTime,
) -> Result<bool, ApiError> {
    if get_attendance_mode(persistence, member_id, now)? != AttendanceMode::Flying {
        return Ok(false);
    }
    let facts: MemberFacts = load_member_facts(persistence, member_id)?;
    if !is_member_expected_to_do_shifts(&facts.expectation_at(now), now.date()) {
        return Ok(false);
    }
    if !persistence.member_has_cycle_entry_before(member_id, cycle_start)? {
        return Ok(false);
    }
    let registered: usize = persistence.count_member_attendances_between(
        member_id,
        start_of_day(cycle_start),
        start_of_day(cycle_end),
    )?;
    if registered > 0 {
        return Ok(false);
    }
    let reminded: bool = persistence.notification_exists(
        member_id,
        NotificationKind::FlyingMemberRegistrationReminder,
        None,
        start_of_day(cycle_start),
    )?;
    Ok(!reminded)
}

/// Reminds flying members who have not registered for any shift in the
/// current cycle.
///
/// Nothing is sent in the first and the last week of a cycle, nor to
/// members in their first cycle.
///
/// # Errors
///
/// Returns an error if the current cycle or the members cannot be loaded.
pub fn send_flying_member_registration_reminders(
    persistence: &mut Persistence,
    transport: &dyn MailTransport,
    policy: &ShiftPolicy,
    now: PrimitiveDateTime,
) -> Result<NotificationSummary, ApiError> {
    let today: Date = now.date();
    let Some(cycle_start) = get_start_date_of_current_cycle(persistence, today)? else {
        info!("No cycle started yet, no registration reminder to send");
        return Ok(NotificationSummary::default());
    };
    let cycle_end: Date = add_days(cycle_start, policy.cycle_duration_days)?;
    if today < add_days(cycle_start, 7)? || today >= add_days(cycle_end, -7)? {
        debug!(%cycle_start, %today, "Outside the registration reminder window");
        return Ok(NotificationSummary::default());
    }

    let member_ids: Vec<i64> = persistence
        .list_members()?
        .iter()
        .filter_map(|member: &Member| member.member_id)
        .collect();
    let mut summary: NotificationSummary = NotificationSummary::default();
    for member_id in member_ids {
        let outcome: Result<bool, ApiError> =
            persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
                if !needs_registration_reminder(tx, member_id, cycle_start, cycle_end, now)? {
                    return Ok(false);
                }
                let member: Member = require_member(tx, member_id)?;
                let notification: Notification =
                    notifications::flying_member_registration_reminder(&member, cycle_start)?;
                send_notification(tx, transport, &notification, now)?;
                Ok(true)
            });
        match outcome {
            Ok(true) => summary.sent += 1,
            Ok(false) => {}
            Err(err) => {
                error!(member_id, error = %err, "Failed to send registration reminder");
                summary.failed += 1;
            }
        }
    }
    info!(
        %cycle_start,
        sent = summary.sent,
        failed = summary.failed,
        "Sent flying member registration reminders"
    );
    Ok(summary)
}
