// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Member display name is empty or invalid.
    InvalidName(String),
    /// Member email is empty or invalid.
    InvalidEmail(String),
    /// A capability name is empty.
    InvalidCapability(String),
    /// An attendance state string could not be parsed.
    InvalidAttendanceState(String),
    /// An attendance origin string could not be parsed.
    InvalidAttendanceOrigin(String),
    /// A week group label could not be parsed.
    InvalidWeekGroup(String),
    /// An attendance mode string could not be parsed.
    InvalidAttendanceMode(String),
    /// A notification kind identifier could not be parsed.
    InvalidNotificationKind(String),
    /// A staffing status string could not be parsed.
    InvalidStaffingStatus(String),
    /// A weekday index outside `0..=6`.
    InvalidWeekday(u8),
    /// A time range whose end is not after its start.
    InvalidTimeRange {
        /// The start of the range.
        start: String,
        /// The end of the range.
        end: String,
    },
    /// A date interval whose end precedes its start.
    InvalidDateInterval {
        /// The start date.
        start_date: time::Date,
        /// The end date.
        end_date: time::Date,
    },
    /// A shift requires at least one attendance.
    InvalidRequiredAttendances(u32),
    /// An attendance state transition is not permitted.
    InvalidStateTransition {
        /// The state before the transition.
        from: String,
        /// The requested state.
        to: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Failed to parse a date or datetime from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// An entity was used before it was persisted.
    MissingIdentifier {
        /// The kind of entity.
        entity: &'static str,
    },
    /// A policy value is out of range.
    InvalidPolicy {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidCapability(msg) => write!(f, "Invalid capability: {msg}"),
            Self::InvalidAttendanceState(state) => {
                write!(f, "Invalid attendance state: {state}")
            }
            Self::InvalidAttendanceOrigin(origin) => {
                write!(f, "Invalid attendance origin: {origin}")
            }
            Self::InvalidWeekGroup(group) => write!(f, "Invalid week group: {group}"),
            Self::InvalidAttendanceMode(mode) => write!(f, "Invalid attendance mode: {mode}"),
            Self::InvalidNotificationKind(kind) => {
                write!(f, "Invalid notification kind: {kind}")
            }
            Self::InvalidStaffingStatus(status) => {
                write!(f, "Invalid staffing status: {status}")
            }
            Self::InvalidWeekday(index) => {
                write!(f, "Invalid weekday index: {index}. Must be between 0 and 6")
            }
            Self::InvalidTimeRange { start, end } => {
                write!(f, "Invalid time range: end {end} is not after start {start}")
            }
            Self::InvalidDateInterval {
                start_date,
                end_date,
            } => {
                write!(
                    f,
                    "Invalid date interval: end {end_date} is before start {start_date}"
                )
            }
            Self::InvalidRequiredAttendances(count) => {
                write!(
                    f,
                    "Invalid required attendance count: {count}. Must be greater than 0"
                )
            }
            Self::InvalidStateTransition { from, to } => {
                write!(f, "Attendance cannot transition from {from} to {to}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::MissingIdentifier { entity } => {
                write!(f, "The {entity} has not been persisted and has no identifier")
            }
            Self::InvalidPolicy { field, reason } => {
                write!(f, "Invalid policy value for '{field}': {reason}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
