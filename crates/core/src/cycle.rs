// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-member cycle debits.

use coop_shifts_domain::{
    AccountEntry, ExpectationFacts, ShiftCycleEntry, credit_requirement_for_cycle,
    format_short_date, start_of_day,
};
use time::Date;

/// The writes applying one cycle start to one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleStartPlan {
    pub cycle_entry: ShiftCycleEntry,
    /// The debit to attach to the cycle entry, absent when nothing is owed.
    pub debit: Option<AccountEntry>,
}

/// Plans applying the cycle starting at `cycle_start_date` to a member.
///
/// Returns `None` when the cycle was already applied to the member, so
/// applying a cycle twice never debits twice.
#[must_use]
pub fn plan_cycle_start(
    member_id: i64,
    facts: &ExpectationFacts<'_>,
    cycle_start_date: Date,
    already_applied: bool,
) -> Option<CycleStartPlan> {
    if already_applied {
        return None;
    }
    let requirement: i32 = credit_requirement_for_cycle(facts, cycle_start_date);
    let debit: Option<AccountEntry> = (requirement > 0).then(|| {
        AccountEntry::new(
            member_id,
            -requirement,
            start_of_day(cycle_start_date),
            format!(
                "Shift cycle starting the {}",
                format_short_date(cycle_start_date)
            ),
        )
    });
    Some(CycleStartPlan {
        cycle_entry: ShiftCycleEntry::new(member_id, cycle_start_date),
        debit,
    })
}
