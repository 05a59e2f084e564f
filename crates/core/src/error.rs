// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use coop_shifts_domain::{
    DomainError, RegistrationBlocker, SelfUnregisterBlocker, SolidarityBlocker,
};

/// Errors that can occur while planning a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// A member may not unregister from the attendance.
    SelfUnregisterRefused(Vec<SelfUnregisterBlocker>),
    /// A member may not look for a stand-in.
    StandInRefused { reason: String },
    /// A member may not be registered to the slot.
    RegistrationRefused(Vec<RegistrationBlocker>),
    /// Another attendance validly holds the slot.
    SlotOccupied { slot_id: i64, holder_id: i64 },
    /// A solidarity shift cannot be given or received.
    SolidarityRefused(SolidarityBlocker),
    /// A member was named as their own shift partner.
    InvalidShiftPartner { member_id: i64 },
    /// The facts handed to a planner are inconsistent.
    Internal(String),
}

fn join_reasons<T: std::fmt::Display>(reasons: &[T]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join(", ")
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::SelfUnregisterRefused(blockers) => {
                write!(f, "Cannot unregister: {}", join_reasons(blockers))
            }
            Self::StandInRefused { reason } => {
                write!(f, "Cannot look for a stand-in: {reason}")
            }
            Self::RegistrationRefused(blockers) => {
                write!(f, "Cannot register: {}", join_reasons(blockers))
            }
            Self::SlotOccupied { slot_id, holder_id } => {
                write!(f, "Slot {slot_id} is already held by member {holder_id}")
            }
            Self::SolidarityRefused(blocker) => write!(f, "Solidarity shift refused: {blocker}"),
            Self::InvalidShiftPartner { member_id } => {
                write!(f, "Member {member_id} cannot be their own shift partner")
            }
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
