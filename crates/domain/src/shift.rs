// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Recurring shift definitions and their concrete instances.

use crate::error::DomainError;
use crate::types::{Capability, WeekGroup};
use time::{Date, Duration, PrimitiveDateTime, Time, Weekday};

/// Converts a Monday-based index (Monday = 0) to a weekday.
///
/// # Errors
///
/// Returns an error if the index is greater than 6.
pub const fn weekday_from_index(index: u8) -> Result<Weekday, DomainError> {
    match index {
        0 => Ok(Weekday::Monday),
        1 => Ok(Weekday::Tuesday),
        2 => Ok(Weekday::Wednesday),
        3 => Ok(Weekday::Thursday),
        4 => Ok(Weekday::Friday),
        5 => Ok(Weekday::Saturday),
        6 => Ok(Weekday::Sunday),
        _ => Err(DomainError::InvalidWeekday(index)),
    }
}

/// A recurring shift definition.
///
/// Templates belonging to a week group are instantiated once per rotation
/// by the shift generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftTemplate {
    /// Database identifier, `None` until persisted.
    pub shift_template_id: Option<i64>,
    pub name: String,
    pub description: String,
    /// Rotation group; ungrouped templates are never generated automatically.
    pub group: Option<WeekGroup>,
    pub num_required_attendances: u32,
    /// Day of the week the shift happens on. `None` means the week start.
    pub weekday: Option<Weekday>,
    pub start_time: Time,
    pub end_time: Time,
    /// First day generation is allowed for this template.
    pub start_date: Option<Date>,
}

impl ShiftTemplate {
    /// Creates a new shift template.
    ///
    /// # Arguments
    ///
    /// * `name` - The template name
    /// * `group` - The week group the template rotates in
    /// * `weekday` - The day of the week of each occurrence
    /// * `start_time` - Time of day the shift starts
    /// * `end_time` - Time of day the shift ends
    /// * `num_required_attendances` - How many members the shift needs
    ///
    /// # Errors
    ///
    /// Returns an error if the time range is empty or no attendance is required.
    pub fn new(
        name: &str,
        group: Option<WeekGroup>,
        weekday: Option<Weekday>,
        start_time: Time,
        end_time: Time,
        num_required_attendances: u32,
    ) -> Result<Self, DomainError> {
        if end_time <= start_time {
            return Err(DomainError::InvalidTimeRange {
                start: start_time.to_string(),
                end: end_time.to_string(),
            });
        }
        if num_required_attendances == 0 {
            return Err(DomainError::InvalidRequiredAttendances(
                num_required_attendances,
            ));
        }
        Ok(Self {
            shift_template_id: None,
            name: name.trim().to_string(),
            description: String::new(),
            group,
            num_required_attendances,
            weekday,
            start_time,
            end_time,
            start_date: None,
        })
    }

    /// Returns the persisted identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the template has not been persisted yet.
    pub fn id(&self) -> Result<i64, DomainError> {
        self.shift_template_id
            .ok_or(DomainError::MissingIdentifier {
                entity: "shift template",
            })
    }

    /// Returns the date of the occurrence in the week starting at `week_start`.
    ///
    /// The date advances day by day from `week_start` until it reaches the
    /// template weekday.
    #[must_use]
    pub fn occurrence_date(&self, week_start: Date) -> Date {
        let Some(weekday) = self.weekday else {
            return week_start;
        };
        let offset: i64 = i64::from(
            (7 + weekday.number_days_from_monday() - week_start.weekday().number_days_from_monday())
                % 7,
        );
        week_start + Duration::days(offset)
    }

    /// Returns true if the template may produce a shift in the week of `monday`.
    #[must_use]
    pub fn is_generated_in_week(&self, monday: Date, group: WeekGroup) -> bool {
        self.group == Some(group) && self.start_date.is_none_or(|start| start <= monday)
    }

    /// Builds the concrete shift for the week starting at `week_start`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template has not been persisted.
    pub fn build_shift(&self, week_start: Date) -> Result<Shift, DomainError> {
        let shift_date: Date = self.occurrence_date(week_start);
        Ok(Shift {
            shift_id: None,
            shift_template_id: Some(self.id()?),
            name: self.name.clone(),
            description: self.description.clone(),
            num_required_attendances: self.num_required_attendances,
            start_time: PrimitiveDateTime::new(shift_date, self.start_time),
            end_time: PrimitiveDateTime::new(shift_date, self.end_time),
            cancelled: false,
            cancelled_reason: None,
        })
    }
}

/// A position within a recurring shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTemplate {
    pub slot_template_id: Option<i64>,
    pub shift_template_id: i64,
    pub name: String,
    pub required_capabilities: Vec<Capability>,
}

impl SlotTemplate {
    /// Creates a new slot template.
    #[must_use]
    pub fn new(shift_template_id: i64, name: &str, required_capabilities: Vec<Capability>) -> Self {
        Self {
            slot_template_id: None,
            shift_template_id,
            name: name.trim().to_string(),
            required_capabilities,
        }
    }

    /// Returns the persisted identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot template has not been persisted yet.
    pub fn id(&self) -> Result<i64, DomainError> {
        self.slot_template_id.ok_or(DomainError::MissingIdentifier {
            entity: "slot template",
        })
    }

    /// Builds the slot generated from this template on a shift.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot template has not been persisted.
    pub fn build_slot(&self, shift_id: i64) -> Result<Slot, DomainError> {
        Ok(Slot {
            slot_id: None,
            shift_id,
            slot_template_id: Some(self.id()?),
            name: self.name.clone(),
            required_capabilities: self.required_capabilities.clone(),
        })
    }
}

/// The durable assignment of a member to a slot template (an ABCD slot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceTemplate {
    pub attendance_template_id: Option<i64>,
    pub member_id: i64,
    pub slot_template_id: i64,
}

impl AttendanceTemplate {
    /// Creates a new attendance template.
    #[must_use]
    pub const fn new(member_id: i64, slot_template_id: i64) -> Self {
        Self {
            attendance_template_id: None,
            member_id,
            slot_template_id,
        }
    }

    /// Returns the persisted identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the attendance template has not been persisted yet.
    pub fn id(&self) -> Result<i64, DomainError> {
        self.attendance_template_id
            .ok_or(DomainError::MissingIdentifier {
                entity: "attendance template",
            })
    }
}

/// A concrete dated shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shift {
    pub shift_id: Option<i64>,
    /// The generating template, `None` for one-off shifts.
    pub shift_template_id: Option<i64>,
    pub name: String,
    pub description: String,
    pub num_required_attendances: u32,
    pub start_time: PrimitiveDateTime,
    pub end_time: PrimitiveDateTime,
    pub cancelled: bool,
    pub cancelled_reason: Option<String>,
}

impl Shift {
    /// Creates a one-off shift that does not belong to a template.
    ///
    /// # Errors
    ///
    /// Returns an error if the time range is empty or no attendance is required.
    pub fn new(
        name: &str,
        start_time: PrimitiveDateTime,
        end_time: PrimitiveDateTime,
        num_required_attendances: u32,
    ) -> Result<Self, DomainError> {
        if end_time <= start_time {
            return Err(DomainError::InvalidTimeRange {
                start: start_time.to_string(),
                end: end_time.to_string(),
            });
        }
        if num_required_attendances == 0 {
            return Err(DomainError::InvalidRequiredAttendances(
                num_required_attendances,
            ));
        }
        Ok(Self {
            shift_id: None,
            shift_template_id: None,
            name: name.trim().to_string(),
            description: String::new(),
            num_required_attendances,
            start_time,
            end_time,
            cancelled: false,
            cancelled_reason: None,
        })
    }

    /// Returns the persisted identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the shift has not been persisted yet.
    pub fn id(&self) -> Result<i64, DomainError> {
        self.shift_id
            .ok_or(DomainError::MissingIdentifier { entity: "shift" })
    }

    /// Returns true if the shift has not started yet.
    #[must_use]
    pub fn is_in_future(&self, now: PrimitiveDateTime) -> bool {
        self.start_time > now
    }

    /// Returns the calendar day of the shift.
    #[must_use]
    pub const fn date(&self) -> Date {
        self.start_time.date()
    }
}

/// A position within a concrete shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub slot_id: Option<i64>,
    pub shift_id: i64,
    pub slot_template_id: Option<i64>,
    pub name: String,
    pub required_capabilities: Vec<Capability>,
}

impl Slot {
    /// Creates a slot without a template.
    #[must_use]
    pub fn new(shift_id: i64, name: &str, required_capabilities: Vec<Capability>) -> Self {
        Self {
            slot_id: None,
            shift_id,
            slot_template_id: None,
            name: name.trim().to_string(),
            required_capabilities,
        }
    }

    /// Returns the persisted identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot has not been persisted yet.
    pub fn id(&self) -> Result<i64, DomainError> {
        self.slot_id
            .ok_or(DomainError::MissingIdentifier { entity: "slot" })
    }
}
