// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification dispatch.
//!
//! Sending a notification writes a log entry first and then hands the
//! notification to the [`MailTransport`] chosen at startup. Transport
//! failures are reported to the caller and never retried here.

use crate::error::ApiError;
use coop_shifts_domain::{
    Member, Notification, NotificationKind, NotificationLogEntry, Shift, StaffingStatus,
    format_short_date,
};
use coop_shifts_persistence::Persistence;
use time::{Date, PrimitiveDateTime};
use tracing::{debug, info};

/// A delivery failure reported by a mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub message: String,
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mail transport error: {}", self.message)
    }
}

impl std::error::Error for TransportError {}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        Self::NotificationFailed {
            message: err.message,
        }
    }
}

/// Delivers notifications to members.
///
/// Implementations must be `Send + Sync` so a single transport can be
/// shared by every job of a process.
pub trait MailTransport: Send + Sync {
    /// Delivers one notification.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` if the notification could not be handed
    /// over.
    fn deliver(&self, notification: &Notification) -> Result<(), TransportError>;
}

/// A transport that writes every notification to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingTransport;

impl MailTransport for LoggingTransport {
    fn deliver(&self, notification: &Notification) -> Result<(), TransportError> {
        info!(
            kind = notification.kind.id(),
            member_id = notification.member_id,
            email = %notification.email,
            shift_id = ?notification.shift_id,
            subject = notification.kind.subject(),
            "Delivering notification"
        );
        debug!(body = %notification.body, "Notification body");
        Ok(())
    }
}

/// Records a notification in the log and delivers it.
///
/// Called inside a transaction, a delivery failure rolls the log entry back
/// together with the caller's writes.
///
/// # Errors
///
/// Returns an error if the log entry cannot be written or the transport
/// refuses the notification.
pub fn send_notification(
    persistence: &mut Persistence,
    transport: &dyn MailTransport,
    notification: &Notification,
    now: PrimitiveDateTime,
) -> Result<(), ApiError> {
    let entry: NotificationLogEntry = NotificationLogEntry {
        log_id: None,
        member_id: notification.member_id,
        kind: notification.kind,
        shift_id: notification.shift_id,
        created_at: now,
    };
    persistence.record_notification(&entry)?;
    transport.deliver(notification)?;
    Ok(())
}

fn shift_label(shift: &Shift) -> String {
    format!(
        "'{}' on {} at {}",
        shift.name,
        format_short_date(shift.date()),
        shift.start_time.time()
    )
}

fn build(
    kind: NotificationKind,
    member: &Member,
    shift_id: Option<i64>,
    body: String,
) -> Result<Notification, ApiError> {
    Ok(Notification {
        kind,
        member_id: member.id()?,
        email: member.email.clone(),
        shift_id,
        body,
    })
}

pub fn member_frozen(member: &Member, balance: i64) -> Result<Notification, ApiError> {
    build(
        NotificationKind::MemberFrozen,
        member,
        None,
        format!(
            "Hello {}, your shift account is at {balance}. You are frozen and may not shop \
             until your balance recovers. Your recurring shifts have been cancelled.",
            member.display_name
        ),
    )
}

pub fn unfrozen(member: &Member) -> Result<Notification, ApiError> {
    build(
        NotificationKind::Unfrozen,
        member,
        None,
        format!(
            "Hello {}, your shift status is no longer frozen. You may shop again.",
            member.display_name
        ),
    )
}

pub fn freeze_warning(
    member: &Member,
    balance: i64,
    freeze_after_days: i64,
) -> Result<Notification, ApiError> {
    build(
        NotificationKind::FreezeWarning,
        member,
        None,
        format!(
            "Hello {}, your shift account is at {balance}. Register for shifts within \
             {freeze_after_days} days or you will be frozen.",
            member.display_name
        ),
    )
}

pub fn stand_in_found(member: &Member, shift: &Shift) -> Result<Notification, ApiError> {
    build(
        NotificationKind::StandInFound,
        member,
        shift.shift_id,
        format!(
            "Hello {}, someone took over your shift {}. You no longer need to come.",
            member.display_name,
            shift_label(shift)
        ),
    )
}

pub fn shift_missed(member: &Member, shift: &Shift) -> Result<Notification, ApiError> {
    build(
        NotificationKind::ShiftMissed,
        member,
        shift.shift_id,
        format!(
            "Hello {}, you missed your shift {}. One point was taken from your shift account.",
            member.display_name,
            shift_label(shift)
        ),
    )
}

pub fn shift_reminder(member: &Member, shift: &Shift) -> Result<Notification, ApiError> {
    build(
        NotificationKind::ShiftReminder,
        member,
        shift.shift_id,
        format!(
            "Hello {}, this is a reminder of your shift {}.",
            member.display_name,
            shift_label(shift)
        ),
    )
}

pub fn shift_understaffed(
    member: &Member,
    shift: &Shift,
    valid_attendances: usize,
) -> Result<Notification, ApiError> {
    build(
        NotificationKind::ShiftUnderstaffed,
        member,
        shift.shift_id,
        format!(
            "Hello {}, the shift {} has {valid_attendances} of {} members. Can you help?",
            member.display_name,
            shift_label(shift),
            shift.num_required_attendances
        ),
    )
}

pub fn flying_member_registration_reminder(
    member: &Member,
    cycle_start: Date,
) -> Result<Notification, ApiError> {
    build(
        NotificationKind::FlyingMemberRegistrationReminder,
        member,
        None,
        format!(
            "Hello {}, you have not registered for a shift in the cycle that started on {}.",
            member.display_name,
            format_short_date(cycle_start)
        ),
    )
}

pub fn shift_watch(
    member: &Member,
    shift: &Shift,
    status: StaffingStatus,
) -> Result<Notification, ApiError> {
    let news: &str = match status {
        StaffingStatus::Understaffed => "is understaffed",
        StaffingStatus::AlmostFull => "has one slot left",
        StaffingStatus::Full => "is full",
        StaffingStatus::AllClear => "has enough members again",
    };
    build(
        NotificationKind::ShiftWatch,
        member,
        shift.shift_id,
        format!("Hello {}, the shift {} {news}.", member.display_name, shift_label(shift)),
    )
}
