// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendance states and their lifecycle rules.
//!
//! An attendance binds one member to one slot of a concrete shift. Its state
//! decides both whether the slot counts as occupied and which ledger value
//! the attendance contributes to the member's balance.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::PrimitiveDateTime;

/// The lifecycle state of an attendance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceState {
    /// The member is registered and expected to show up.
    #[default]
    Pending,
    /// The member attended.
    Done,
    /// The registration was withdrawn.
    Cancelled,
    /// The member did not show up.
    Missed,
    /// The member did not work but is not penalized.
    MissedExcused,
    /// The member is registered but searching for a replacement.
    LookingForStandIn,
}

impl AttendanceState {
    /// Converts this state to its string representation.
    ///
    /// This is used for persistence and audit snapshots.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
            Self::Missed => "missed",
            Self::MissedExcused => "missed_excused",
            Self::LookingForStandIn => "looking_for_stand_in",
        }
    }

    /// Returns true if an attendance in this state occupies its slot.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Pending | Self::Done | Self::LookingForStandIn)
    }

    /// Returns true if the member is still expected at the shift.
    #[must_use]
    pub const fn is_expected_to_show_up(&self) -> bool {
        matches!(self, Self::Pending | Self::LookingForStandIn)
    }

    /// The signed value this state contributes to the member's ledger.
    #[must_use]
    pub const fn ledger_value(&self) -> i32 {
        match self {
            Self::Done | Self::MissedExcused => 1,
            Self::Missed => -1,
            Self::Pending | Self::Cancelled | Self::LookingForStandIn => 0,
        }
    }

    /// Checks if a transition from this state to another is valid.
    ///
    /// Valid transitions are:
    /// - `Pending` → any other state
    /// - `LookingForStandIn` → `Pending`, `Done`, `Missed`, `MissedExcused`, `Cancelled`
    /// - `Done`, `Missed`, `MissedExcused` → each other or `Cancelled`
    /// - `Cancelled` → `Pending`
    ///
    /// A state never transitions to itself; callers treat that as a no-op.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Pending,
                Self::Done
                    | Self::Missed
                    | Self::MissedExcused
                    | Self::Cancelled
                    | Self::LookingForStandIn
            ) | (
                Self::LookingForStandIn,
                Self::Pending | Self::Done | Self::Missed | Self::MissedExcused | Self::Cancelled
            ) | (Self::Done, Self::Missed | Self::MissedExcused | Self::Cancelled)
                | (Self::Missed, Self::Done | Self::MissedExcused | Self::Cancelled)
                | (Self::MissedExcused, Self::Done | Self::Missed | Self::Cancelled)
                | (Self::Cancelled, Self::Pending)
        )
    }

    /// Validates a transition.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if the transition is not allowed.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidStateTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
            })
        }
    }

    /// Human readable label used in ledger entry descriptions.
    #[must_use]
    pub const fn ledger_label(&self) -> &'static str {
        match self {
            Self::Done => "attended",
            Self::Missed => "missed",
            Self::MissedExcused => "missed (excused)",
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
            Self::LookingForStandIn => "looking for a stand-in",
        }
    }
}

impl FromStr for AttendanceState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "done" => Ok(Self::Done),
            "cancelled" => Ok(Self::Cancelled),
            "missed" => Ok(Self::Missed),
            "missed_excused" => Ok(Self::MissedExcused),
            "looking_for_stand_in" => Ok(Self::LookingForStandIn),
            _ => Err(DomainError::InvalidAttendanceState(s.to_string())),
        }
    }
}

impl std::fmt::Display for AttendanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How an attendance came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceOrigin {
    /// Created from an attendance template.
    Template,
    /// Created by a registration of the member or a manager.
    Registration,
}

impl AttendanceOrigin {
    /// Converts this origin to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::Registration => "registration",
        }
    }
}

impl FromStr for AttendanceOrigin {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "template" => Ok(Self::Template),
            "registration" => Ok(Self::Registration),
            _ => Err(DomainError::InvalidAttendanceOrigin(s.to_string())),
        }
    }
}

impl std::fmt::Display for AttendanceOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The binding of a member to a slot of a concrete shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attendance {
    pub attendance_id: Option<i64>,
    pub member_id: i64,
    pub slot_id: i64,
    pub state: AttendanceState,
    pub origin: AttendanceOrigin,
    pub excused_reason: Option<String>,
    /// The ledger entry currently representing this attendance.
    pub account_entry_id: Option<i64>,
    pub last_state_update: PrimitiveDateTime,
    pub reminder_sent: bool,
}

impl Attendance {
    /// Creates a new pending attendance.
    #[must_use]
    pub const fn new(
        member_id: i64,
        slot_id: i64,
        origin: AttendanceOrigin,
        now: PrimitiveDateTime,
    ) -> Self {
        Self {
            attendance_id: None,
            member_id,
            slot_id,
            state: AttendanceState::Pending,
            origin,
            excused_reason: None,
            account_entry_id: None,
            last_state_update: now,
            reminder_sent: false,
        }
    }

    /// Returns the persisted identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the attendance has not been persisted yet.
    pub fn id(&self) -> Result<i64, DomainError> {
        self.attendance_id
            .ok_or(DomainError::MissingIdentifier {
                entity: "attendance",
            })
    }
}

/// Why a member may not withdraw from an attendance on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelfUnregisterBlocker {
    /// The attendance belongs to someone else.
    NotOwnAttendance,
    /// The attendance does not occupy its slot anymore.
    NotRegistered,
    /// The member holds the recurring slot this attendance comes from.
    IsAbcdAttendance,
    /// The shift starts too soon.
    TooCloseToShift,
}

impl SelfUnregisterBlocker {
    /// Converts this blocker to a short message.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotOwnAttendance => "the attendance belongs to another member",
            Self::NotRegistered => "the member is not registered to this slot",
            Self::IsAbcdAttendance => "the attendance belongs to a recurring ABCD slot",
            Self::TooCloseToShift => "the shift starts too soon",
        }
    }
}

impl std::fmt::Display for SelfUnregisterBlocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a member may not take a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationBlocker {
    /// Another member validly holds the slot.
    SlotTaken,
    /// The member already holds another slot of the same shift.
    AlreadyRegisteredToShift,
    /// The member lacks a capability the slot requires.
    MissingCapabilities,
    /// The shift already started.
    ShiftInPast,
    /// The shift was cancelled.
    ShiftCancelled,
}

impl RegistrationBlocker {
    /// Converts this blocker to a short message.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SlotTaken => "the slot is already taken",
            Self::AlreadyRegisteredToShift => "the member is already registered to this shift",
            Self::MissingCapabilities => "the member lacks a required capability",
            Self::ShiftInPast => "the shift already started",
            Self::ShiftCancelled => "the shift was cancelled",
        }
    }
}

impl std::fmt::Display for RegistrationBlocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
