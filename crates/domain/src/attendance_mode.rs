// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendance mode derived from logged history.
//!
//! The mode is never stored. It is recomputed from the frozen flag history
//! and the attendance template history, so it can be asked for any instant.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::PrimitiveDateTime;

/// How a member participates in shifts at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceMode {
    /// Holds a recurring ABCD slot.
    Regular,
    /// Registers ad hoc.
    Flying,
    /// Lost participation rights.
    Frozen,
}

impl AttendanceMode {
    /// Converts this mode to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Flying => "flying",
            Self::Frozen => "frozen",
        }
    }
}

impl FromStr for AttendanceMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(Self::Regular),
            "flying" => Ok(Self::Flying),
            "frozen" => Ok(Self::Frozen),
            _ => Err(DomainError::InvalidAttendanceMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for AttendanceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One logged change of the frozen flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrozenStatusChange {
    pub changed_at: PrimitiveDateTime,
    pub old_value: bool,
    pub new_value: bool,
}

/// Whether an attendance template was created or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateChangeKind {
    Created,
    Deleted,
}

/// One logged change of a member's attendance templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceTemplateChange {
    pub changed_at: PrimitiveDateTime,
    pub kind: TemplateChangeKind,
}

/// Returns the frozen flag as it was at `at`.
///
/// The earliest change logged at or after `at` still carries the value of
/// the flag at `at` as its old value. Without such a change the current
/// flag has not moved since.
#[must_use]
pub fn is_frozen_at(
    current_flag: bool,
    history: &[FrozenStatusChange],
    at: PrimitiveDateTime,
) -> bool {
    history
        .iter()
        .filter(|change| change.changed_at >= at)
        .min_by_key(|change| change.changed_at)
        .map_or(current_flag, |change| change.old_value)
}

/// Computes the attendance mode at `at`.
///
/// Frozen wins. Otherwise a member with more template creations than
/// deletions logged up to `at` is regular, everyone else flies.
#[must_use]
pub fn compute_attendance_mode(
    current_flag: bool,
    frozen_history: &[FrozenStatusChange],
    template_history: &[AttendanceTemplateChange],
    at: PrimitiveDateTime,
) -> AttendanceMode {
    if is_frozen_at(current_flag, frozen_history, at) {
        return AttendanceMode::Frozen;
    }
    let (created, deleted): (usize, usize) = template_history
        .iter()
        .filter(|change| change.changed_at <= at)
        .fold((0, 0), |(created, deleted), change| match change.kind {
            TemplateChangeKind::Created => (created + 1, deleted),
            TemplateChangeKind::Deleted => (created, deleted + 1),
        });
    if created > deleted {
        AttendanceMode::Regular
    } else {
        AttendanceMode::Flying
    }
}
