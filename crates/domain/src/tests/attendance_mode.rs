// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AttendanceMode, AttendanceTemplateChange, FrozenStatusChange, TemplateChangeKind,
    compute_attendance_mode, is_frozen_at,
};
use std::str::FromStr;
use time::macros::datetime;

fn frozen_history() -> Vec<FrozenStatusChange> {
    vec![
        FrozenStatusChange {
            changed_at: datetime!(2024-03-01 10:00),
            old_value: false,
            new_value: true,
        },
        FrozenStatusChange {
            changed_at: datetime!(2024-05-01 10:00),
            old_value: true,
            new_value: false,
        },
    ]
}

#[test]
fn test_frozen_at_uses_next_change_old_value() {
    let history: Vec<FrozenStatusChange> = frozen_history();
    assert!(!is_frozen_at(false, &history, datetime!(2024-02-01 0:00)));
    assert!(is_frozen_at(false, &history, datetime!(2024-04-01 0:00)));
    assert!(!is_frozen_at(false, &history, datetime!(2024-06-01 0:00)));
}

#[test]
fn test_frozen_at_without_history_uses_current_flag() {
    assert!(is_frozen_at(true, &[], datetime!(2024-02-01 0:00)));
    assert!(!is_frozen_at(false, &[], datetime!(2024-02-01 0:00)));
}

#[test]
fn test_attendance_mode_regular_after_template_creation() {
    let templates: Vec<AttendanceTemplateChange> = vec![AttendanceTemplateChange {
        changed_at: datetime!(2024-01-10 9:00),
        kind: TemplateChangeKind::Created,
    }];
    assert_eq!(
        compute_attendance_mode(false, &[], &templates, datetime!(2024-01-09 9:00)),
        AttendanceMode::Flying
    );
    assert_eq!(
        compute_attendance_mode(false, &[], &templates, datetime!(2024-01-10 9:00)),
        AttendanceMode::Regular
    );
}

#[test]
fn test_attendance_mode_flying_after_template_deletion() {
    let templates: Vec<AttendanceTemplateChange> = vec![
        AttendanceTemplateChange {
            changed_at: datetime!(2024-01-10 9:00),
            kind: TemplateChangeKind::Created,
        },
        AttendanceTemplateChange {
            changed_at: datetime!(2024-02-10 9:00),
            kind: TemplateChangeKind::Deleted,
        },
    ];
    assert_eq!(
        compute_attendance_mode(false, &[], &templates, datetime!(2024-02-11 9:00)),
        AttendanceMode::Flying
    );
}

#[test]
fn test_frozen_overrides_templates() {
    let templates: Vec<AttendanceTemplateChange> = vec![AttendanceTemplateChange {
        changed_at: datetime!(2024-01-10 9:00),
        kind: TemplateChangeKind::Created,
    }];
    assert_eq!(
        compute_attendance_mode(
            false,
            &frozen_history(),
            &templates,
            datetime!(2024-04-01 9:00)
        ),
        AttendanceMode::Frozen
    );
}

#[test]
fn test_attendance_mode_parsing() {
    assert_eq!(
        AttendanceMode::from_str("flying").unwrap(),
        AttendanceMode::Flying
    );
    assert!(AttendanceMode::from_str("hovering").is_err());
}
