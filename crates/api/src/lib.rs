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

//! Boundary layer of the shift accounting engine.
//!
//! Each operation loads what it needs from [`Persistence`], asks the core
//! planners what to do, and writes the outcome inside one transaction.
//! Errors from every layer surface as [`ApiError`].
//!
//! [`Persistence`]: coop_shifts_persistence::Persistence

mod attendance;
mod cycles;
mod error;
mod exemptions;
mod freeze;
mod members;
mod notifications;
mod partners;
mod reminders;
mod shifts;
mod solidarity;
mod watches;

#[cfg(test)]
mod tests;

pub use attendance::{
    cancel_look_for_stand_in, look_for_stand_in, register_member_to_slot, self_unregister,
    update_attendance_state,
};
pub use coop_shifts::RegistrationMode;
pub use cycles::{
    CycleSummary, apply_cycle_start, apply_cycles_from, apply_pending_cycles,
    get_next_cycle_start_date, get_start_date_of_current_cycle,
};
pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use exemptions::{create_exemption, create_membership_pause, update_exemption};
pub use freeze::{
    FreezeCheckSummary, FreezeInputs, FreezeOutcome, check_member_freeze_status,
    freeze_member_and_send_email, load_freeze_inputs, run_freeze_checks,
    send_freeze_warning_email, should_freeze_member, should_send_freeze_warning,
    should_unfreeze_member, unfreeze_and_send_notification_email,
};
pub use members::{
    MemberFacts, get_attendance_mode, get_balance, is_member_expected_to_do_shifts,
    load_member_facts,
};
pub use notifications::{LoggingTransport, MailTransport, TransportError};
pub use partners::{get_shift_partner_at, set_shift_partner};
pub use reminders::{
    NotificationSummary, send_flying_member_registration_reminders, send_shift_reminders,
    send_understaffed_shift_warnings,
};
pub use shifts::{
    GenerationSummary, add_slot_template, cancel_shift, create_shift, delete_attendance_template,
    generate_shifts_up_to, register_member_to_slot_template, update_attendances_from_shift_template,
    update_future_shift_attendances,
};
pub use solidarity::{
    count_available_solidarity_shifts, give_solidarity_shift, use_solidarity_shift,
};
pub use watches::{
    create_recurring_shift_watch, send_shift_watch_notifications, staffing_counts, watch_shift,
};
