// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Which recurring shifts exist in which week.

use crate::error::CoreError;
use coop_shifts_domain::{ShiftTemplate, mondays_between, week_group_at};
use time::Date;

/// One shift to generate: a template in the week starting at `week_start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftOccurrence {
    pub shift_template_id: i64,
    pub week_start: Date,
}

/// Lists the shifts to generate for every week between `start` and `end`.
///
/// Each week gets the templates of its week group whose first generation
/// date is unset or not after the week's Monday. Without anchors no week
/// has a group and nothing is generated.
///
/// # Errors
///
/// Returns an error if a template has no identifier or the date range
/// overflows.
pub fn plan_generation(
    templates: &[ShiftTemplate],
    start: Date,
    end: Date,
    anchors: &[Date],
) -> Result<Vec<ShiftOccurrence>, CoreError> {
    let mut occurrences: Vec<ShiftOccurrence> = Vec::new();
    for monday in mondays_between(start, end)? {
        let Some(group) = week_group_at(monday, anchors) else {
            continue;
        };
        for template in templates {
            if template.is_generated_in_week(monday, group) {
                occurrences.push(ShiftOccurrence {
                    shift_template_id: template.id()?,
                    week_start: monday,
                });
            }
        }
    }
    Ok(occurrences)
}

