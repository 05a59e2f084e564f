// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::Path;

use coop_shifts_domain::ShiftPolicy;
use time::macros::date;

use crate::error::JobError;
use crate::policy::{load_policy, parse_policy};

#[test]
fn test_partial_policy_keeps_defaults() {
    let policy: ShiftPolicy = parse_policy(
        Path::new("policy.json"),
        r#"{"freeze_threshold": -6, "week_group_anchors": ["2024-03-04"]}"#,
    )
    .unwrap();

    assert_eq!(policy.freeze_threshold, -6);
    assert_eq!(policy.week_group_anchors, vec![date!(2024 - 03 - 04)]);
    assert_eq!(
        policy.cycle_duration_days,
        ShiftPolicy::default().cycle_duration_days
    );
}

#[test]
fn test_unknown_field_is_rejected() {
    let result: Result<ShiftPolicy, JobError> =
        parse_policy(Path::new("policy.json"), r#"{"freeze_treshold": -6}"#);

    assert!(matches!(result, Err(JobError::PolicyJson { .. })));
}

#[test]
fn test_non_positive_duration_is_rejected() {
    let result: Result<ShiftPolicy, JobError> =
        parse_policy(Path::new("policy.json"), r#"{"cycle_duration_days": 0}"#);

    assert!(matches!(result, Err(JobError::InvalidPolicy(_))));
}

#[test]
fn test_missing_file_is_reported() {
    let result: Result<ShiftPolicy, JobError> =
        load_policy(Some(Path::new("/nonexistent/coop-shifts/policy.json")));

    assert!(matches!(result, Err(JobError::PolicyIo { .. })));
}

#[test]
fn test_no_file_uses_defaults() {
    assert_eq!(load_policy(None).unwrap(), ShiftPolicy::default());
}
