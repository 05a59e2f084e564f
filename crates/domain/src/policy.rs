// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tunable shift accounting parameters.

use crate::error::DomainError;
use serde::{Deserialize, Deserializer};
use time::Date;
use time::macros::format_description;

/// Parameters of the shift accounting rules.
///
/// Every field has a default, so a configuration file only needs to list
/// what differs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShiftPolicy {
    /// Balance at or below which a member risks being frozen.
    pub freeze_threshold: i32,
    /// Days the balance must stay low before freezing.
    pub freeze_after_days: i64,
    /// Look-ahead window in weeks for registrations that compensate a deficit.
    pub make_up_weeks: i64,
    /// Length of one accounting cycle in days.
    pub cycle_duration_days: i64,
    /// Members may unregister themselves only from shifts further away than this.
    pub nb_days_for_self_unregister: i64,
    /// Members may look for a stand-in only for shifts at least this far away.
    pub nb_days_for_self_look_for_stand_in: i64,
    /// Exemptions spanning at least this many cycles remove recurring slots.
    pub abcd_unregister_threshold_cycles: i64,
    /// Reminders go out this many days before a shift.
    pub reminder_days_before_shift: i64,
    /// Understaffed warnings cover shifts starting within this many days.
    pub understaffed_warning_days: i64,
    /// How far ahead shift generation runs.
    pub generation_horizon_days: i64,
    /// Solidarity shifts one member may receive per calendar year.
    pub max_solidarity_shifts_per_year: usize,
    /// Dates on which a new A week starts.
    #[serde(deserialize_with = "deserialize_dates")]
    pub week_group_anchors: Vec<Date>,
}

impl Default for ShiftPolicy {
    fn default() -> Self {
        Self {
            freeze_threshold: -4,
            freeze_after_days: 10,
            make_up_weeks: 8,
            cycle_duration_days: 28,
            nb_days_for_self_unregister: 7,
            nb_days_for_self_look_for_stand_in: 2,
            abcd_unregister_threshold_cycles: 6,
            reminder_days_before_shift: 3,
            understaffed_warning_days: 7,
            generation_horizon_days: 180,
            max_solidarity_shifts_per_year: 2,
            week_group_anchors: Vec::new(),
        }
    }
}

impl ShiftPolicy {
    /// Minimum exemption length in days that removes recurring slots.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPolicy` if the product overflows.
    pub fn abcd_unregister_threshold_days(&self) -> Result<i64, DomainError> {
        self.abcd_unregister_threshold_cycles
            .checked_mul(self.cycle_duration_days)
            .ok_or_else(|| DomainError::InvalidPolicy {
                field: String::from("abcd_unregister_threshold_cycles"),
                reason: format!(
                    "{} cycles of {} days overflow",
                    self.abcd_unregister_threshold_cycles, self.cycle_duration_days
                ),
            })
    }

    /// Validates that every duration is positive.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPolicy` naming the first offending field.
    pub fn validate(&self) -> Result<(), DomainError> {
        let durations: [(&str, i64); 9] = [
            ("freeze_after_days", self.freeze_after_days),
            ("make_up_weeks", self.make_up_weeks),
            ("cycle_duration_days", self.cycle_duration_days),
            ("nb_days_for_self_unregister", self.nb_days_for_self_unregister),
            (
                "nb_days_for_self_look_for_stand_in",
                self.nb_days_for_self_look_for_stand_in,
            ),
            (
                "abcd_unregister_threshold_cycles",
                self.abcd_unregister_threshold_cycles,
            ),
            ("reminder_days_before_shift", self.reminder_days_before_shift),
            ("understaffed_warning_days", self.understaffed_warning_days),
            ("generation_horizon_days", self.generation_horizon_days),
        ];
        for (field, value) in durations {
            if value <= 0 {
                return Err(DomainError::InvalidPolicy {
                    field: field.to_string(),
                    reason: format!("must be greater than 0, got {value}"),
                });
            }
        }
        self.abcd_unregister_threshold_days()?;
        Ok(())
    }
}

fn deserialize_dates<'de, D>(deserializer: D) -> Result<Vec<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<String> = Vec::deserialize(deserializer)?;
    raw.iter()
        .map(|value| {
            Date::parse(value, format_description!("[year]-[month]-[day]"))
                .map_err(serde::de::Error::custom)
        })
        .collect()
}
