// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use coop_shifts_domain::{
    Member, ShareOwner, Shift, ShiftPolicy, ShiftTemplate, SlotTemplate, WeekGroup,
};
use coop_shifts_persistence::Persistence;
use time::macros::{date, datetime, time};
use time::{PrimitiveDateTime, Weekday};

use crate::{Job, run_job};

const NOW: PrimitiveDateTime = datetime!(2024-03-04 06:00);

fn setup() -> (Persistence, ShiftTemplate, i64) {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let member: Member = Member::new("Ada Lovelace", "ada@example.org", date!(2023 - 01 - 02))
        .unwrap();
    let member_id: i64 = persistence.create_member(&member).unwrap();
    persistence
        .set_share_owner(&ShareOwner::new(member_id, date!(2023 - 01 - 02)))
        .unwrap();

    let mut template: ShiftTemplate = ShiftTemplate::new(
        "Monday morning",
        Some(WeekGroup::A),
        Some(Weekday::Monday),
        time!(9:00),
        time!(12:00),
        1,
    )
    .unwrap();
    template.shift_template_id = Some(persistence.create_shift_template(&template).unwrap());
    persistence
        .create_slot_template(&SlotTemplate::new(
            template.shift_template_id.unwrap(),
            "Cashier",
            Vec::new(),
        ))
        .unwrap();
    (persistence, template, member_id)
}

fn policy() -> ShiftPolicy {
    ShiftPolicy {
        generation_horizon_days: 35,
        week_group_anchors: vec![date!(2024 - 03 - 04)],
        ..ShiftPolicy::default()
    }
}

#[test]
fn test_generate_shifts_covers_the_horizon() {
    let (mut persistence, template, _): (Persistence, ShiftTemplate, i64) = setup();

    run_job(&mut persistence, &policy(), Job::GenerateShifts, NOW).unwrap();

    let template_id: i64 = template.shift_template_id.unwrap();
    for week_start in [date!(2024 - 03 - 04), date!(2024 - 04 - 01)] {
        let shift: Shift = template.build_shift(week_start).unwrap();
        assert!(
            persistence
                .find_shift(template_id, shift.start_time)
                .unwrap()
                .is_some()
        );
    }
    let skipped: Shift = template.build_shift(date!(2024 - 03 - 11)).unwrap();
    assert!(
        persistence
            .find_shift(template_id, skipped.start_time)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_apply_cycles_after_generation_starts_the_first_cycle() {
    let (mut persistence, _, member_id): (Persistence, ShiftTemplate, i64) = setup();

    run_job(&mut persistence, &policy(), Job::GenerateShifts, NOW).unwrap();
    run_job(&mut persistence, &policy(), Job::ApplyCycles, NOW).unwrap();
    run_job(&mut persistence, &policy(), Job::ApplyCycles, NOW).unwrap();

    assert!(
        persistence
            .cycle_entry_exists(member_id, date!(2024 - 03 - 04))
            .unwrap()
    );
}

#[test]
fn test_notification_jobs_run_on_an_empty_database() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    for job in [
        Job::RunFreezeChecks,
        Job::SendShiftReminders,
        Job::SendUnderstaffedWarnings,
        Job::SendFlyingReminders,
        Job::SendShiftWatchNotifications,
    ] {
        run_job(&mut persistence, &ShiftPolicy::default(), job, NOW).unwrap();
    }
}
