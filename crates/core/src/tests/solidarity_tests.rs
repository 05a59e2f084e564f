// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use coop_shifts_domain::{
    Attendance, AttendanceOrigin, AttendanceState, ShiftPolicy, SolidarityBlocker,
    SolidarityShift,
};
use time::macros::date;

use crate::tests::helpers::{NOW, create_test_actor, create_test_attendance, create_test_cause};
use crate::{
    CoreError, SOLIDARITY_GIVEN, SOLIDARITY_RECEIVED, SolidarityPlan, actions,
    plan_solidarity_gift, plan_solidarity_use,
};

fn pooled(id: i64) -> SolidarityShift {
    let mut shift: SolidarityShift = SolidarityShift::new(100 + id, date!(2024 - 01 - 15));
    shift.solidarity_shift_id = Some(id);
    shift
}

#[test]
fn test_gift_debits_one_point_and_pools_the_attendance() {
    let attendance: Attendance =
        create_test_attendance(7, 1, 3, AttendanceState::Done, AttendanceOrigin::Template);

    let plan: SolidarityPlan = plan_solidarity_gift(
        1,
        Some(&attendance),
        create_test_actor(),
        create_test_cause(),
        NOW,
    )
    .unwrap();

    assert_eq!(plan.entry.value, -1);
    assert_eq!(plan.entry.member_id, 1);
    assert_eq!(plan.entry.description, SOLIDARITY_GIVEN);
    assert_eq!(plan.solidarity_shift.gifted_attendance_id, 7);
    assert_eq!(plan.solidarity_shift.date_gifted, NOW.date());
    assert!(!plan.solidarity_shift.is_used_up());
    assert_eq!(plan.audit_event.action.name, actions::GIVE_SOLIDARITY_SHIFT);
}

#[test]
fn test_gift_without_done_attendance_is_refused() {
    let result: Result<SolidarityPlan, CoreError> =
        plan_solidarity_gift(1, None, create_test_actor(), create_test_cause(), NOW);
    assert_eq!(
        result,
        Err(CoreError::SolidarityRefused(
            SolidarityBlocker::NoAttendanceToGive
        ))
    );

    let pending: Attendance =
        create_test_attendance(7, 1, 3, AttendanceState::Pending, AttendanceOrigin::Template);
    let result: Result<SolidarityPlan, CoreError> = plan_solidarity_gift(
        1,
        Some(&pending),
        create_test_actor(),
        create_test_cause(),
        NOW,
    );
    assert!(matches!(result, Err(CoreError::Internal(_))));
}

#[test]
fn test_use_credits_one_point() {
    let available: SolidarityShift = pooled(1);
    let plan: SolidarityPlan = plan_solidarity_use(
        2,
        Some(&available),
        &[],
        &ShiftPolicy::default(),
        create_test_actor(),
        create_test_cause(),
        NOW,
    )
    .unwrap();

    assert_eq!(plan.entry.value, 1);
    assert_eq!(plan.entry.description, SOLIDARITY_RECEIVED);
    assert_eq!(plan.solidarity_shift.used_by_member_id, Some(2));
    assert_eq!(plan.solidarity_shift.date_used, Some(NOW.date()));
    assert_eq!(plan.audit_event.action.name, actions::USE_SOLIDARITY_SHIFT);
}

#[test]
fn test_empty_pool_is_refused() {
    let result: Result<SolidarityPlan, CoreError> = plan_solidarity_use(
        2,
        None,
        &[],
        &ShiftPolicy::default(),
        create_test_actor(),
        create_test_cause(),
        NOW,
    );
    assert_eq!(
        result,
        Err(CoreError::SolidarityRefused(SolidarityBlocker::NoneAvailable))
    );
}

#[test]
fn test_yearly_limit_counts_only_this_year() {
    let received: Vec<SolidarityShift> = vec![
        pooled(2).used_by(2, date!(2023 - 11 - 01)),
        pooled(3).used_by(2, date!(2024 - 01 - 20)),
    ];
    let available: SolidarityShift = pooled(4);
    let policy: ShiftPolicy = ShiftPolicy::default();

    let allowed: Result<SolidarityPlan, CoreError> = plan_solidarity_use(
        2,
        Some(&available),
        &received,
        &policy,
        create_test_actor(),
        create_test_cause(),
        NOW,
    );
    assert!(allowed.is_ok());

    let mut received: Vec<SolidarityShift> = received;
    received.push(pooled(5).used_by(2, date!(2024 - 02 - 10)));
    let refused: Result<SolidarityPlan, CoreError> = plan_solidarity_use(
        2,
        Some(&available),
        &received,
        &policy,
        create_test_actor(),
        create_test_cause(),
        NOW,
    );
    assert_eq!(
        refused,
        Err(CoreError::SolidarityRefused(
            SolidarityBlocker::YearlyLimitReached { used: 2, limit: 2 }
        ))
    );
}
