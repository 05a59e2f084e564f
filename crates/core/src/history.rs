// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reading frozen-status and template history back from audit events.

use crate::actions;
use coop_shifts_audit::AuditEvent;
use coop_shifts_domain::{AttendanceTemplateChange, FrozenStatusChange, TemplateChangeKind};

fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value? {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Extracts the frozen flag changes from a member's audit events.
///
/// Events with unreadable snapshots are skipped.
#[must_use]
pub fn frozen_status_history(events: &[AuditEvent]) -> Vec<FrozenStatusChange> {
    events
        .iter()
        .filter(|event| event.action.name == actions::UPDATE_FROZEN_STATUS)
        .filter_map(|event| {
            Some(FrozenStatusChange {
                changed_at: event.occurred_at,
                old_value: parse_flag(event.before.field("is_frozen"))?,
                new_value: parse_flag(event.after.field("is_frozen"))?,
            })
        })
        .collect()
}

/// Extracts attendance template creations and deletions from a member's
/// audit events.
#[must_use]
pub fn attendance_template_history(events: &[AuditEvent]) -> Vec<AttendanceTemplateChange> {
    events
        .iter()
        .filter_map(|event| {
            let kind: TemplateChangeKind = match event.action.name.as_str() {
                actions::CREATE_ATTENDANCE_TEMPLATE => TemplateChangeKind::Created,
                actions::DELETE_ATTENDANCE_TEMPLATE => TemplateChangeKind::Deleted,
                _ => return None,
            };
            Some(AttendanceTemplateChange {
                changed_at: event.occurred_at,
                kind,
            })
        })
        .collect()
}
