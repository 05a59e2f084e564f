// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Pure transition planners for shift accounting.
//!
//! Every planner takes the facts it needs, decides, and returns the rows to
//! write together with their audit events. Nothing here touches storage.

pub mod actions;
mod absence;
mod attendance;
mod cycle;
mod error;
mod freeze;
mod generation;
mod history;
mod partner;
mod shift;
mod solidarity;
mod template;
mod watch;

#[cfg(test)]
mod tests;

pub use absence::{
    AbsenceEffects, ExemptionPlan, PAUSE_REASON, PausePlan, TemplateAttendances,
    plan_exemption, plan_membership_pause,
};
pub use attendance::{
    AttendanceTransition, RegistrationFacts, RegistrationMode, RegistrationPlan,
    check_slot_free_for_transition, plan_attendance_transition, plan_cancel_look_for_stand_in,
    plan_look_for_stand_in, plan_registration, plan_self_unregister, registration_blockers,
    self_unregister_blockers,
};
pub use cycle::{CycleStartPlan, plan_cycle_start};
pub use error::CoreError;
pub use freeze::{
    FREEZE_REASON, FreezeFacts, FreezePlan, FrozenStatusUpdate, plan_freeze,
    plan_frozen_status_change, should_freeze_member, should_send_freeze_warning,
    should_unfreeze_member,
};
pub use generation::{ShiftOccurrence, plan_generation};
pub use history::{attendance_template_history, frozen_status_history};
pub use partner::{ShiftPartnerPlan, plan_shift_partner_change};
pub use shift::{
    SHIFT_CANCELLED_REASON, ShiftCancellationPlan, SlotAttendances, plan_shift_cancellation,
};
pub use solidarity::{
    SOLIDARITY_GIVEN, SOLIDARITY_RECEIVED, SolidarityPlan, plan_solidarity_gift,
    plan_solidarity_use,
};
pub use template::{
    AttendanceTemplatePlan, SlotReconciliation, SlotReconciliationFacts, TemplateWithdrawal,
    plan_attendance_template_creation, plan_slot_reconciliation, plan_template_withdrawal,
    slot_template_registration_blockers,
};
pub use watch::{WatchUpdate, plan_recurring_watches, plan_watch_update};
