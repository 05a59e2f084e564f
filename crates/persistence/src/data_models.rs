// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use coop_shifts_domain::{WeekGroup, weekday_from_index};
use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime, Time, Weekday};

use crate::error::PersistenceError;

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const DATETIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

/// Formats a date for a `TEXT` column.
///
/// # Errors
///
/// Returns an error if the date cannot be formatted.
pub fn format_date(date: Date) -> Result<String, PersistenceError> {
    date.format(DATE_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Formats a timestamp for a `TEXT` column.
///
/// Stored timestamps sort the same way as text and as time.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn format_datetime(datetime: PrimitiveDateTime) -> Result<String, PersistenceError> {
    datetime
        .format(DATETIME_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Formats a time of day for a `TEXT` column.
///
/// # Errors
///
/// Returns an error if the time cannot be formatted.
pub fn format_time(time: Time) -> Result<String, PersistenceError> {
    time.format(TIME_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Formats an optional date for a nullable `TEXT` column.
///
/// # Errors
///
/// Returns an error if the date cannot be formatted.
pub fn format_optional_date(date: Option<Date>) -> Result<Option<String>, PersistenceError> {
    date.map(format_date).transpose()
}

/// Parses a stored date.
///
/// # Errors
///
/// Returns `PersistenceError::ReconstructionError` for malformed text.
pub fn parse_date(raw: &str) -> Result<Date, PersistenceError> {
    Date::parse(raw, DATE_FORMAT)
        .map_err(|e| PersistenceError::ReconstructionError(format!("invalid date '{raw}': {e}")))
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns `PersistenceError::ReconstructionError` for malformed text.
pub fn parse_datetime(raw: &str) -> Result<PrimitiveDateTime, PersistenceError> {
    PrimitiveDateTime::parse(raw, DATETIME_FORMAT).map_err(|e| {
        PersistenceError::ReconstructionError(format!("invalid timestamp '{raw}': {e}"))
    })
}

/// Parses a stored time of day.
///
/// # Errors
///
/// Returns `PersistenceError::ReconstructionError` for malformed text.
pub fn parse_time(raw: &str) -> Result<Time, PersistenceError> {
    Time::parse(raw, TIME_FORMAT)
        .map_err(|e| PersistenceError::ReconstructionError(format!("invalid time '{raw}': {e}")))
}

/// Parses an optional stored date.
///
/// # Errors
///
/// Returns `PersistenceError::ReconstructionError` for malformed text.
pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<Date>, PersistenceError> {
    raw.map(parse_date).transpose()
}

/// Converts a stored `INTEGER` flag to a boolean.
#[must_use]
pub const fn flag(value: i32) -> bool {
    value != 0
}

/// Converts a boolean to a stored `INTEGER` flag.
#[must_use]
pub fn to_flag(value: bool) -> i32 {
    i32::from(value)
}

/// Joins values into a comma separated `TEXT` column.
#[must_use]
pub fn join_list<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join(",")
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|part| !part.is_empty())
}

/// Parses a comma separated list of row IDs.
///
/// # Errors
///
/// Returns `PersistenceError::ReconstructionError` for a malformed entry.
pub fn parse_id_list(raw: &str) -> Result<Vec<i64>, PersistenceError> {
    split_list(raw)
        .map(|part| {
            part.parse::<i64>().map_err(|e| {
                PersistenceError::ReconstructionError(format!("invalid id '{part}': {e}"))
            })
        })
        .collect()
}

/// Joins weekdays as day indices counted from Monday.
#[must_use]
pub fn join_weekdays(weekdays: &[Weekday]) -> String {
    let indices: Vec<u8> = weekdays
        .iter()
        .map(|weekday| weekday.number_days_from_monday())
        .collect();
    join_list(&indices)
}

/// Parses a comma separated list of weekday indices.
///
/// # Errors
///
/// Returns `PersistenceError::ReconstructionError` for a malformed entry.
pub fn parse_weekdays(raw: &str) -> Result<Vec<Weekday>, PersistenceError> {
    split_list(raw)
        .map(|part| {
            let index: u8 = part.parse::<u8>().map_err(|e| {
                PersistenceError::ReconstructionError(format!("invalid weekday '{part}': {e}"))
            })?;
            Ok(weekday_from_index(index)?)
        })
        .collect()
}

/// Parses a comma separated list of week group labels.
///
/// # Errors
///
/// Returns `PersistenceError::ReconstructionError` for an unknown label.
pub fn parse_week_groups(raw: &str) -> Result<Vec<WeekGroup>, PersistenceError> {
    split_list(raw)
        .map(|part| Ok(part.parse::<WeekGroup>()?))
        .collect()
}
