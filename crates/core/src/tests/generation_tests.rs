// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ShiftOccurrence, plan_generation};
use coop_shifts_domain::{ShiftTemplate, WeekGroup};
use time::Weekday;
use time::macros::{date, time};

fn template(id: i64, group: WeekGroup) -> ShiftTemplate {
    let mut template: ShiftTemplate = ShiftTemplate::new(
        "Morning",
        Some(group),
        Some(Weekday::Wednesday),
        time!(9:00),
        time!(12:00),
        2,
    )
    .unwrap();
    template.shift_template_id = Some(id);
    template
}

#[test]
fn test_each_week_generates_its_group() {
    let templates: Vec<ShiftTemplate> = vec![template(1, WeekGroup::A), template(2, WeekGroup::B)];

    let occurrences: Vec<ShiftOccurrence> = plan_generation(
        &templates,
        date!(2024 - 03 - 04),
        date!(2024 - 03 - 17),
        &[date!(2024 - 03 - 04)],
    )
    .unwrap();

    assert_eq!(
        occurrences,
        vec![
            ShiftOccurrence {
                shift_template_id: 1,
                week_start: date!(2024 - 03 - 04),
            },
            ShiftOccurrence {
                shift_template_id: 2,
                week_start: date!(2024 - 03 - 11),
            },
        ]
    );
}

#[test]
fn test_template_start_date_delays_generation() {
    let mut delayed: ShiftTemplate = template(1, WeekGroup::A);
    delayed.start_date = Some(date!(2024 - 03 - 05));

    let occurrences: Vec<ShiftOccurrence> = plan_generation(
        &[delayed],
        date!(2024 - 03 - 04),
        date!(2024 - 04 - 07),
        &[date!(2024 - 03 - 04)],
    )
    .unwrap();

    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0].week_start, date!(2024 - 04 - 01));
}

#[test]
fn test_no_anchor_means_no_generation() {
    let occurrences: Vec<ShiftOccurrence> = plan_generation(
        &[template(1, WeekGroup::A)],
        date!(2024 - 03 - 04),
        date!(2024 - 04 - 07),
        &[],
    )
    .unwrap();

    assert!(occurrences.is_empty());
}
