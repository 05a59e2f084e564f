// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use coop_shifts::CoreError;
use coop_shifts_domain::DomainError;
use coop_shifts_persistence::PersistenceError;

/// API-level errors.
///
/// These errors are distinct from domain and persistence errors: they are
/// what callers of the boundary layer (jobs, a future web frontend) see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
    /// The mail transport refused a notification.
    NotificationFailed {
        /// What the transport reported.
        message: String,
    },
    /// A member may not unregister from an attendance.
    SelfUnregisterNotAllowed {
        /// Every reason the request was refused.
        reasons: Vec<String>,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
            Self::NotificationFailed { message } => {
                write!(f, "Notification failed: {message}")
            }
            Self::SelfUnregisterNotAllowed { reasons } => {
                write!(f, "Cannot unregister: {}", reasons.join(", "))
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound(message) => Self::ResourceNotFound {
                resource_type: String::from("Record"),
                message,
            },
            PersistenceError::ConstraintViolation(message) => Self::DomainRuleViolation {
                rule: String::from("database_constraint"),
                message,
            },
            other => Self::Internal {
                message: format!("Persistence error: {other}"),
            },
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        translate_core_error(err)
    }
}

/// Builds the error for a missing row.
#[must_use]
pub fn not_found(resource_type: &str, id: i64) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: resource_type.to_string(),
        message: format!("{resource_type} {id} does not exist"),
    }
}

/// Translates a domain error into an API error.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidName(msg) => ApiError::InvalidInput {
            field: String::from("display_name"),
            message: msg,
        },
        DomainError::InvalidEmail(msg) => ApiError::InvalidInput {
            field: String::from("email"),
            message: msg,
        },
        DomainError::InvalidCapability(msg) => ApiError::InvalidInput {
            field: String::from("capabilities"),
            message: msg,
        },
        DomainError::InvalidWeekday(index) => ApiError::InvalidInput {
            field: String::from("weekday"),
            message: format!("{index} is not a weekday index"),
        },
        DomainError::InvalidTimeRange { start, end } => ApiError::InvalidInput {
            field: String::from("end_time"),
            message: format!("end {end} must be after start {start}"),
        },
        DomainError::InvalidDateInterval {
            start_date,
            end_date,
        } => ApiError::InvalidInput {
            field: String::from("end_date"),
            message: format!("end {end_date} precedes start {start_date}"),
        },
        DomainError::InvalidRequiredAttendances(count) => ApiError::InvalidInput {
            field: String::from("num_required_attendances"),
            message: format!("a shift needs at least one attendance, got {count}"),
        },
        DomainError::InvalidPolicy { field, reason } => ApiError::InvalidInput {
            field,
            message: reason,
        },
        DomainError::InvalidStateTransition { from, to } => ApiError::DomainRuleViolation {
            rule: String::from("attendance_state_transition"),
            message: format!("an attendance cannot go from {from} to {to}"),
        },
        DomainError::MissingIdentifier { entity } => ApiError::Internal {
            message: format!("{entity} was used before being persisted"),
        },
        other @ (DomainError::InvalidAttendanceState(_)
        | DomainError::InvalidAttendanceOrigin(_)
        | DomainError::InvalidWeekGroup(_)
        | DomainError::InvalidAttendanceMode(_)
        | DomainError::InvalidNotificationKind(_)
        | DomainError::InvalidStaffingStatus(_)
        | DomainError::DateArithmeticOverflow { .. }
        | DomainError::DateParseError { .. }) => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::SelfUnregisterRefused(blockers) => ApiError::SelfUnregisterNotAllowed {
            reasons: blockers.iter().map(ToString::to_string).collect(),
        },
        CoreError::StandInRefused { reason } => ApiError::DomainRuleViolation {
            rule: String::from("look_for_stand_in"),
            message: reason,
        },
        CoreError::RegistrationRefused(blockers) => ApiError::DomainRuleViolation {
            rule: String::from("slot_registration"),
            message: blockers
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<String>>()
                .join(", "),
        },
        CoreError::SlotOccupied { slot_id, holder_id } => ApiError::DomainRuleViolation {
            rule: String::from("slot_occupied"),
            message: format!("slot {slot_id} is already held by member {holder_id}"),
        },
        CoreError::SolidarityRefused(blocker) => ApiError::DomainRuleViolation {
            rule: blocker.rule().to_string(),
            message: blocker.to_string(),
        },
        CoreError::InvalidShiftPartner { member_id } => ApiError::InvalidInput {
            field: String::from("partner_id"),
            message: format!("member {member_id} cannot be their own shift partner"),
        },
        CoreError::Internal(msg) => ApiError::Internal {
            message: format!("Internal error: {msg}"),
        },
    }
}
