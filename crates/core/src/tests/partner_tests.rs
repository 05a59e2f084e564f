// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{NOW, create_test_actor, create_test_cause};
use crate::{CoreError, ShiftPartnerPlan, actions, plan_shift_partner_change};

#[test]
fn test_new_partner_is_recorded_with_audit() {
    let plan: ShiftPartnerPlan =
        plan_shift_partner_change(1, None, Some(2), create_test_actor(), create_test_cause(), NOW)
            .unwrap()
            .unwrap();
    assert_eq!(plan.change.member_id, 1);
    assert_eq!(plan.change.partner_id, Some(2));
    assert_eq!(plan.change.changed_at, NOW);
    assert_eq!(plan.audit_event.action.name, actions::UPDATE_SHIFT_PARTNER);
    assert_eq!(plan.audit_event.before.data, "partner=none");
    assert_eq!(plan.audit_event.after.data, "partner=2");
}

#[test]
fn test_same_partner_plans_nothing() {
    let plan: Option<ShiftPartnerPlan> = plan_shift_partner_change(
        1,
        Some(2),
        Some(2),
        create_test_actor(),
        create_test_cause(),
        NOW,
    )
    .unwrap();
    assert!(plan.is_none());
}

#[test]
fn test_member_cannot_partner_themselves() {
    let result: Result<Option<ShiftPartnerPlan>, CoreError> =
        plan_shift_partner_change(1, None, Some(1), create_test_actor(), create_test_cause(), NOW);
    assert_eq!(result, Err(CoreError::InvalidShiftPartner { member_id: 1 }));
}
