// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The closed set of notifications the shift system sends.

use crate::error::DomainError;
use std::str::FromStr;
use time::PrimitiveDateTime;

/// Every notification the shift system can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    MemberFrozen,
    Unfrozen,
    FreezeWarning,
    StandInFound,
    ShiftMissed,
    ShiftReminder,
    ShiftUnderstaffed,
    FlyingMemberRegistrationReminder,
    ShiftWatch,
}

impl NotificationKind {
    /// All kinds, in registration order.
    pub const ALL: [Self; 9] = [
        Self::MemberFrozen,
        Self::Unfrozen,
        Self::FreezeWarning,
        Self::StandInFound,
        Self::ShiftMissed,
        Self::ShiftReminder,
        Self::ShiftUnderstaffed,
        Self::FlyingMemberRegistrationReminder,
        Self::ShiftWatch,
    ];

    /// Stable identifier written to the notification log.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::MemberFrozen => "shifts.member_frozen",
            Self::Unfrozen => "shifts.unfrozen",
            Self::FreezeWarning => "shifts.freeze_warning",
            Self::StandInFound => "shifts.stand_in_found",
            Self::ShiftMissed => "shifts.shift_missed",
            Self::ShiftReminder => "shifts.shift_reminder",
            Self::ShiftUnderstaffed => "shifts.shift_understaffed",
            Self::FlyingMemberRegistrationReminder => "shifts.flying_member_registration_reminder",
            Self::ShiftWatch => "shifts.shift_watch",
        }
    }

    /// Subject line handed to the mail transport.
    #[must_use]
    pub const fn subject(&self) -> &'static str {
        match self {
            Self::MemberFrozen => "Your shift status has been set to frozen",
            Self::Unfrozen => "Your shift status is no longer frozen",
            Self::FreezeWarning => "Your shift account is too low",
            Self::StandInFound => "A stand-in was found for your shift",
            Self::ShiftMissed => "You missed a shift",
            Self::ShiftReminder => "Reminder: your upcoming shift",
            Self::ShiftUnderstaffed => "A shift needs help",
            Self::FlyingMemberRegistrationReminder => "Please register for a shift this cycle",
            Self::ShiftWatch => "The staffing of a shift you watch changed",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| DomainError::InvalidNotificationKind(s.to_string()))
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A notification addressed to one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub member_id: i64,
    pub email: String,
    /// The shift the notification is about, if any.
    pub shift_id: Option<i64>,
    pub body: String,
}

/// A sent notification as recorded in the notification log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationLogEntry {
    pub log_id: Option<i64>,
    pub member_id: i64,
    pub kind: NotificationKind,
    pub shift_id: Option<i64>,
    pub created_at: PrimitiveDateTime,
}
