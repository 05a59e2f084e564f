// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` persistence for cooperative shift accounting.
//!
//! The crate stores members, recurring definitions, concrete shifts,
//! attendances, the shift account ledger, audit events and the
//! notification log. It is built on Diesel with embedded migrations.
//!
//! ## Storage conventions
//!
//! - Dates, timestamps and times of day are `TEXT` columns in ISO order,
//!   so text comparison matches chronological comparison
//! - Flags are `INTEGER` columns holding `0` or `1`
//! - Capabilities are stored as a comma-separated list
//!
//! ## Invariants enforced by the schema
//!
//! - At most one valid attendance per slot (partial unique index)
//! - At most one cycle marker per member and cycle start
//! - At most one attendance template per slot template
//! - At most one generated shift per template and start
//!
//! ## Testing
//!
//! Every call to [`Persistence::new_in_memory`] opens an isolated shared
//! in-memory database, so tests never observe each other's rows.

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
#![allow(clippy::multiple_crate_versions)]

use coop_shifts_audit::AuditEvent;
use coop_shifts_domain::{
    AccountEntry, Attendance, AttendanceTemplate, Exemption, Member, MembershipPause,
    NotificationKind, NotificationLogEntry, RecurringShiftWatch, ShareOwner, Shift,
    ShiftCycleEntry, ShiftPartnerChange, ShiftTemplate, ShiftWatch, Slot, SlotTemplate,
    SolidarityShift, StaffingStatus,
};
use crate::backend::sqlite::StorageMode;
use diesel::SqliteConnection;
use diesel::connection::{AnsiTransactionManager, TransactionManager};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, PrimitiveDateTime};
use tracing::error;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection =
            backend::sqlite::open_database(&shared_memory_url, StorageMode::Memory)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let conn: SqliteConnection = backend::sqlite::open_database(path_str, StorageMode::File)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    /// Runs `f` inside a database transaction.
    ///
    /// The transaction commits if `f` returns `Ok` and rolls back otherwise.
    /// Nested calls use savepoints.
    ///
    /// # Errors
    ///
    /// Returns the error of `f`, or a persistence error if the transaction
    /// cannot be opened or committed.
    pub fn transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<PersistenceError>,
    {
        AnsiTransactionManager::begin_transaction(&mut self.conn).map_err(PersistenceError::from)?;
        match f(self) {
            Ok(value) => {
                AnsiTransactionManager::commit_transaction(&mut self.conn)
                    .map_err(PersistenceError::from)?;
                Ok(value)
            }
            Err(err) => {
                let rollback: Result<(), diesel::result::Error> =
                    AnsiTransactionManager::rollback_transaction(&mut self.conn);
                if let Err(rollback_err) = rollback {
                    error!(error = %rollback_err, "Failed to roll back transaction");
                }
                Err(err)
            }
        }
    }

    // ========================================================================
    // Members & memberships
    // ========================================================================

    /// Inserts a member and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_member(&mut self, member: &Member) -> Result<i64, PersistenceError> {
        mutations::members::insert_member(&mut self.conn, member)
    }

    /// Retrieves a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_member(&mut self, member_id: i64) -> Result<Option<Member>, PersistenceError> {
        queries::members::get_member(&mut self.conn, member_id)
    }

    /// Lists every member.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_members(&mut self) -> Result<Vec<Member>, PersistenceError> {
        queries::members::list_members(&mut self.conn)
    }

    /// Lists the members subscribed to understaffed shift alerts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_members_wanting_understaffed_alerts(
        &mut self,
    ) -> Result<Vec<Member>, PersistenceError> {
        queries::members::list_members_wanting_understaffed_alerts(&mut self.conn)
    }

    /// Sets the frozen flag of a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the member does not exist.
    pub fn update_member_frozen(
        &mut self,
        member_id: i64,
        is_frozen: bool,
    ) -> Result<(), PersistenceError> {
        mutations::members::update_member_frozen(&mut self.conn, member_id, is_frozen)
    }

    /// Inserts or replaces a share ownership record.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_share_owner(&mut self, share_owner: &ShareOwner) -> Result<(), PersistenceError> {
        mutations::members::upsert_share_owner(&mut self.conn, share_owner)
    }

    /// Retrieves the share ownership record of a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_share_owner(
        &mut self,
        member_id: i64,
    ) -> Result<Option<ShareOwner>, PersistenceError> {
        queries::members::get_share_owner(&mut self.conn, member_id)
    }

    /// Inserts a membership pause and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_membership_pause(
        &mut self,
        pause: &MembershipPause,
    ) -> Result<i64, PersistenceError> {
        mutations::members::insert_membership_pause(&mut self.conn, pause)
    }

    /// Lists the membership pauses of a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_membership_pauses(
        &mut self,
        member_id: i64,
    ) -> Result<Vec<MembershipPause>, PersistenceError> {
        queries::members::list_membership_pauses(&mut self.conn, member_id)
    }

    /// Inserts an exemption and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_exemption(&mut self, exemption: &Exemption) -> Result<i64, PersistenceError> {
        mutations::members::insert_exemption(&mut self.conn, exemption)
    }

    /// Rewrites a stored exemption.
    ///
    /// # Errors
    ///
    /// Returns an error if the exemption does not exist.
    pub fn update_exemption(
        &mut self,
        exemption_id: i64,
        exemption: &Exemption,
    ) -> Result<(), PersistenceError> {
        mutations::members::update_exemption(&mut self.conn, exemption_id, exemption)
    }

    /// Retrieves an exemption.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_exemption(
        &mut self,
        exemption_id: i64,
    ) -> Result<Option<Exemption>, PersistenceError> {
        queries::members::get_exemption(&mut self.conn, exemption_id)
    }

    /// Lists the exemptions of a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_exemptions(&mut self, member_id: i64) -> Result<Vec<Exemption>, PersistenceError> {
        queries::members::list_exemptions(&mut self.conn, member_id)
    }

    // ========================================================================
    // Recurring definitions
    // ========================================================================

    /// Inserts a shift template and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_shift_template(
        &mut self,
        template: &ShiftTemplate,
    ) -> Result<i64, PersistenceError> {
        mutations::templates::insert_shift_template(&mut self.conn, template)
    }

    /// Retrieves a shift template.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_shift_template(
        &mut self,
        shift_template_id: i64,
    ) -> Result<Option<ShiftTemplate>, PersistenceError> {
        queries::templates::get_shift_template(&mut self.conn, shift_template_id)
    }

    /// Lists every shift template.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_shift_templates(&mut self) -> Result<Vec<ShiftTemplate>, PersistenceError> {
        queries::templates::list_shift_templates(&mut self.conn)
    }

    /// Inserts a slot template and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_slot_template(
        &mut self,
        slot_template: &SlotTemplate,
    ) -> Result<i64, PersistenceError> {
        mutations::templates::insert_slot_template(&mut self.conn, slot_template)
    }

    /// Retrieves a slot template.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_slot_template(
        &mut self,
        slot_template_id: i64,
    ) -> Result<Option<SlotTemplate>, PersistenceError> {
        queries::templates::get_slot_template(&mut self.conn, slot_template_id)
    }

    /// Lists the slot templates of a shift template.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_slot_templates(
        &mut self,
        shift_template_id: i64,
    ) -> Result<Vec<SlotTemplate>, PersistenceError> {
        queries::templates::list_slot_templates(&mut self.conn, shift_template_id)
    }

    /// Inserts an attendance template and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot template is already held.
    pub fn create_attendance_template(
        &mut self,
        attendance_template: &AttendanceTemplate,
    ) -> Result<i64, PersistenceError> {
        mutations::templates::insert_attendance_template(&mut self.conn, attendance_template)
    }

    /// Deletes an attendance template.
    ///
    /// # Errors
    ///
    /// Returns an error if the template does not exist.
    pub fn delete_attendance_template(
        &mut self,
        attendance_template_id: i64,
    ) -> Result<(), PersistenceError> {
        mutations::templates::delete_attendance_template(&mut self.conn, attendance_template_id)
    }

    /// Retrieves an attendance template.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_attendance_template(
        &mut self,
        attendance_template_id: i64,
    ) -> Result<Option<AttendanceTemplate>, PersistenceError> {
        queries::templates::get_attendance_template(&mut self.conn, attendance_template_id)
    }

    /// Retrieves the attendance template holding a slot template.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_attendance_template_for_slot_template(
        &mut self,
        slot_template_id: i64,
    ) -> Result<Option<AttendanceTemplate>, PersistenceError> {
        queries::templates::get_attendance_template_for_slot_template(
            &mut self.conn,
            slot_template_id,
        )
    }

    /// Lists the attendance templates of a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_attendance_templates_for_member(
        &mut self,
        member_id: i64,
    ) -> Result<Vec<AttendanceTemplate>, PersistenceError> {
        queries::templates::list_attendance_templates_for_member(&mut self.conn, member_id)
    }

    /// Returns `true` if the member holds a slot template of the shift template.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn member_has_attendance_template_in_shift_template(
        &mut self,
        member_id: i64,
        shift_template_id: i64,
    ) -> Result<bool, PersistenceError> {
        queries::templates::member_has_attendance_template_in_shift_template(
            &mut self.conn,
            member_id,
            shift_template_id,
        )
    }

    // ========================================================================
    // Shifts & slots
    // ========================================================================

    /// Inserts a shift and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_shift(&mut self, shift: &Shift) -> Result<i64, PersistenceError> {
        mutations::shifts::insert_shift(&mut self.conn, shift)
    }

    /// Writes the cancellation flag and reason of a shift.
    ///
    /// # Errors
    ///
    /// Returns an error if the shift does not exist.
    pub fn update_shift_cancellation(
        &mut self,
        shift_id: i64,
        cancelled: bool,
        cancelled_reason: Option<&str>,
    ) -> Result<(), PersistenceError> {
        mutations::shifts::update_shift_cancellation(
            &mut self.conn,
            shift_id,
            cancelled,
            cancelled_reason,
        )
    }

    /// Retrieves a shift.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_shift(&mut self, shift_id: i64) -> Result<Option<Shift>, PersistenceError> {
        queries::shifts::get_shift(&mut self.conn, shift_id)
    }

    /// Finds the shift generated from a template at `start_time`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_shift(
        &mut self,
        shift_template_id: i64,
        start_time: PrimitiveDateTime,
    ) -> Result<Option<Shift>, PersistenceError> {
        queries::shifts::find_shift(&mut self.conn, shift_template_id, start_time)
    }

    /// Lists the shifts of a template starting after `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_future_shifts_for_template(
        &mut self,
        shift_template_id: i64,
        now: PrimitiveDateTime,
    ) -> Result<Vec<Shift>, PersistenceError> {
        queries::shifts::list_future_shifts_for_template(&mut self.conn, shift_template_id, now)
    }

    /// Lists shifts starting in `[from, until)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_shifts_starting_between(
        &mut self,
        from: PrimitiveDateTime,
        until: PrimitiveDateTime,
    ) -> Result<Vec<Shift>, PersistenceError> {
        queries::shifts::list_shifts_starting_between(&mut self.conn, from, until)
    }

    /// Lists non-cancelled shifts starting after `from`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_live_shifts_after(
        &mut self,
        from: PrimitiveDateTime,
    ) -> Result<Vec<Shift>, PersistenceError> {
        queries::shifts::list_live_shifts_after(&mut self.conn, from)
    }

    /// Returns the start of the shift anchoring the cycle calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_earliest_shift_start(
        &mut self,
    ) -> Result<Option<PrimitiveDateTime>, PersistenceError> {
        queries::shifts::get_earliest_shift_start(&mut self.conn)
    }

    /// Inserts a slot and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_slot(&mut self, slot: &Slot) -> Result<i64, PersistenceError> {
        mutations::shifts::insert_slot(&mut self.conn, slot)
    }

    /// Retrieves a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_slot(&mut self, slot_id: i64) -> Result<Option<Slot>, PersistenceError> {
        queries::shifts::get_slot(&mut self.conn, slot_id)
    }

    /// Lists the slots of a shift.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_slots_for_shift(&mut self, shift_id: i64) -> Result<Vec<Slot>, PersistenceError> {
        queries::shifts::list_slots_for_shift(&mut self.conn, shift_id)
    }

    /// Finds the slot of a shift generated from a slot template.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_slot_for_slot_template(
        &mut self,
        shift_id: i64,
        slot_template_id: i64,
    ) -> Result<Option<Slot>, PersistenceError> {
        queries::shifts::find_slot_for_slot_template(&mut self.conn, shift_id, slot_template_id)
    }

    // ========================================================================
    // Attendances
    // ========================================================================

    /// Inserts an attendance and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot already has a valid attendance.
    pub fn create_attendance(&mut self, attendance: &Attendance) -> Result<i64, PersistenceError> {
        mutations::attendances::insert_attendance(&mut self.conn, attendance)
    }

    /// Rewrites a stored attendance.
    ///
    /// # Errors
    ///
    /// Returns an error if the attendance has no ID or does not exist.
    pub fn update_attendance(&mut self, attendance: &Attendance) -> Result<(), PersistenceError> {
        let attendance_id: i64 = attendance.id()?;
        mutations::attendances::update_attendance(&mut self.conn, attendance_id, attendance)
    }

    /// Deletes an attendance.
    ///
    /// # Errors
    ///
    /// Returns an error if the attendance does not exist.
    pub fn delete_attendance(&mut self, attendance_id: i64) -> Result<(), PersistenceError> {
        mutations::attendances::delete_attendance(&mut self.conn, attendance_id)
    }

    /// Marks the reminder of an attendance as sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_reminder_sent(&mut self, attendance_id: i64) -> Result<(), PersistenceError> {
        mutations::attendances::mark_reminder_sent(&mut self.conn, attendance_id)
    }

    /// Retrieves an attendance.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_attendance(
        &mut self,
        attendance_id: i64,
    ) -> Result<Option<Attendance>, PersistenceError> {
        queries::attendances::get_attendance(&mut self.conn, attendance_id)
    }

    /// Lists every attendance of a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_attendances_for_slot(
        &mut self,
        slot_id: i64,
    ) -> Result<Vec<Attendance>, PersistenceError> {
        queries::attendances::list_attendances_for_slot(&mut self.conn, slot_id)
    }

    /// Returns `true` if the member holds a valid attendance on the shift.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn member_has_valid_attendance_on_shift(
        &mut self,
        member_id: i64,
        shift_id: i64,
    ) -> Result<bool, PersistenceError> {
        queries::attendances::member_has_valid_attendance_on_shift(
            &mut self.conn,
            member_id,
            shift_id,
        )
    }

    /// Counts the valid attendances of a shift.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_valid_attendances_for_shift(
        &mut self,
        shift_id: i64,
    ) -> Result<usize, PersistenceError> {
        queries::attendances::count_valid_attendances_for_shift(&mut self.conn, shift_id)
    }

    /// Lists a member's attendances on shifts starting at or after `from`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_member_attendances_from(
        &mut self,
        member_id: i64,
        from: PrimitiveDateTime,
    ) -> Result<Vec<(Attendance, Shift)>, PersistenceError> {
        queries::attendances::list_member_attendances_from(&mut self.conn, member_id, from)
    }

    /// Lists a member's attendances on slots of a slot template.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_member_attendances_for_slot_template(
        &mut self,
        member_id: i64,
        slot_template_id: i64,
    ) -> Result<Vec<(Attendance, Shift)>, PersistenceError> {
        queries::attendances::list_member_attendances_for_slot_template(
            &mut self.conn,
            member_id,
            slot_template_id,
        )
    }

    /// Counts a member's expected attendances starting in `[from, until)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_upcoming_expected_attendances(
        &mut self,
        member_id: i64,
        from: PrimitiveDateTime,
        until: PrimitiveDateTime,
    ) -> Result<usize, PersistenceError> {
        queries::attendances::count_upcoming_expected_attendances(
            &mut self.conn,
            member_id,
            from,
            until,
        )
    }

    /// Counts a member's non-cancelled attendances starting in `[from, until)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_member_attendances_between(
        &mut self,
        member_id: i64,
        from: PrimitiveDateTime,
        until: PrimitiveDateTime,
    ) -> Result<usize, PersistenceError> {
        queries::attendances::count_member_attendances_between(
            &mut self.conn,
            member_id,
            from,
            until,
        )
    }

    /// Lists pending attendances still owed a reminder, starting in
    /// `[from, until)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_pending_attendances_starting_between(
        &mut self,
        from: PrimitiveDateTime,
        until: PrimitiveDateTime,
    ) -> Result<Vec<(Attendance, Shift)>, PersistenceError> {
        queries::attendances::list_pending_attendances_starting_between(&mut self.conn, from, until)
    }

    // ========================================================================
    // Ledger
    // ========================================================================

    /// Appends an account entry and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_account_entry(&mut self, entry: &AccountEntry) -> Result<i64, PersistenceError> {
        mutations::ledger::insert_account_entry(&mut self.conn, entry)
    }

    /// Retrieves an account entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_account_entry(
        &mut self,
        entry_id: i64,
    ) -> Result<Option<AccountEntry>, PersistenceError> {
        queries::ledger::get_account_entry(&mut self.conn, entry_id)
    }

    /// Lists a member's account entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_account_entries(
        &mut self,
        member_id: i64,
    ) -> Result<Vec<AccountEntry>, PersistenceError> {
        queries::ledger::list_account_entries(&mut self.conn, member_id)
    }

    /// Inserts a cycle marker and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the cycle was already applied to the member.
    pub fn create_cycle_entry(
        &mut self,
        cycle_entry: &ShiftCycleEntry,
    ) -> Result<i64, PersistenceError> {
        mutations::ledger::insert_cycle_entry(&mut self.conn, cycle_entry)
    }

    /// Returns `true` if the cycle starting on `cycle_start_date` was applied
    /// to the member.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn cycle_entry_exists(
        &mut self,
        member_id: i64,
        cycle_start_date: Date,
    ) -> Result<bool, PersistenceError> {
        queries::ledger::cycle_entry_exists(&mut self.conn, member_id, cycle_start_date)
    }

    /// Returns `true` if the member has a cycle marker before `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn member_has_cycle_entry_before(
        &mut self,
        member_id: i64,
        date: Date,
    ) -> Result<bool, PersistenceError> {
        queries::ledger::member_has_cycle_entry_before(&mut self.conn, member_id, date)
    }

    /// Lists a member's cycle markers.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_cycle_entries(
        &mut self,
        member_id: i64,
    ) -> Result<Vec<ShiftCycleEntry>, PersistenceError> {
        queries::ledger::list_cycle_entries(&mut self.conn, member_id)
    }

    /// Returns the most recent cycle start applied to anyone.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_latest_cycle_start_date(&mut self) -> Result<Option<Date>, PersistenceError> {
        queries::ledger::get_latest_cycle_start_date(&mut self.conn)
    }

    /// Returns the most recent cycle start applied on or before `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_latest_cycle_start_on_or_before(
        &mut self,
        date: Date,
    ) -> Result<Option<Date>, PersistenceError> {
        queries::ledger::get_latest_cycle_start_on_or_before(&mut self.conn, date)
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Persists an audit event and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence or serialization fails.
    pub fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        mutations::audit::persist_audit_event(&mut self.conn, event)
    }

    /// Retrieves an audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is not found or cannot be deserialized.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::audit::get_audit_event(&mut self.conn, event_id)
    }

    /// Lists a member's audit events with one of the given action names.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_member_audit_events(
        &mut self,
        member_id: i64,
        action_names: &[&str],
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::list_member_audit_events(&mut self.conn, member_id, action_names)
    }

    // ========================================================================
    // Notification log
    // ========================================================================

    /// Records a sent notification and returns its log ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn record_notification(
        &mut self,
        entry: &NotificationLogEntry,
    ) -> Result<i64, PersistenceError> {
        mutations::notifications::insert_notification_log(&mut self.conn, entry)
    }

    /// Returns the latest notification of `kind` sent to the member.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn latest_notification(
        &mut self,
        member_id: i64,
        kind: NotificationKind,
    ) -> Result<Option<NotificationLogEntry>, PersistenceError> {
        queries::notifications::latest_notification(&mut self.conn, member_id, kind)
    }

    /// Returns `true` if a matching notification was sent at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn notification_exists(
        &mut self,
        member_id: i64,
        kind: NotificationKind,
        shift_id: Option<i64>,
        since: PrimitiveDateTime,
    ) -> Result<bool, PersistenceError> {
        queries::notifications::notification_exists(
            &mut self.conn,
            member_id,
            kind,
            shift_id,
            since,
        )
    }

    /// Lists every notification sent to a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_notifications(
        &mut self,
        member_id: i64,
    ) -> Result<Vec<NotificationLogEntry>, PersistenceError> {
        queries::notifications::list_notifications(&mut self.conn, member_id)
    }

    // ========================================================================
    // Solidarity pool
    // ========================================================================

    /// Adds a shift to the solidarity pool and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the attendance was already given away.
    pub fn create_solidarity_shift(
        &mut self,
        shift: &SolidarityShift,
    ) -> Result<i64, PersistenceError> {
        mutations::solidarity::insert_solidarity_shift(&mut self.conn, shift)
    }

    /// Records who used a solidarity shift.
    ///
    /// # Errors
    ///
    /// Returns an error if the shift has no ID or was already used.
    pub fn mark_solidarity_shift_used(
        &mut self,
        shift: &SolidarityShift,
    ) -> Result<(), PersistenceError> {
        let solidarity_shift_id: i64 = shift.id()?;
        mutations::solidarity::mark_solidarity_shift_used(
            &mut self.conn,
            solidarity_shift_id,
            shift,
        )
    }

    /// Returns the oldest unused solidarity shift.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn first_available_solidarity_shift(
        &mut self,
    ) -> Result<Option<SolidarityShift>, PersistenceError> {
        queries::solidarity::first_available_solidarity_shift(&mut self.conn)
    }

    /// Counts the unused solidarity shifts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_available_solidarity_shifts(&mut self) -> Result<i64, PersistenceError> {
        queries::solidarity::count_available_solidarity_shifts(&mut self.conn)
    }

    /// Lists the solidarity shifts a member received.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_solidarity_shifts_used_by(
        &mut self,
        member_id: i64,
    ) -> Result<Vec<SolidarityShift>, PersistenceError> {
        queries::solidarity::list_solidarity_shifts_used_by(&mut self.conn, member_id)
    }

    /// Returns the member's oldest done attendance not yet given away.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn first_done_attendance_not_given(
        &mut self,
        member_id: i64,
    ) -> Result<Option<Attendance>, PersistenceError> {
        queries::attendances::first_done_attendance_not_given(&mut self.conn, member_id)
    }

    // ========================================================================
    // Shift watches
    // ========================================================================

    /// Inserts a shift watch and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the member already watches the shift.
    pub fn create_shift_watch(&mut self, watch: &ShiftWatch) -> Result<i64, PersistenceError> {
        mutations::watches::insert_shift_watch(&mut self.conn, watch)
    }

    /// Stores the status last seen by a watch.
    ///
    /// # Errors
    ///
    /// Returns an error if the watch does not exist.
    pub fn update_shift_watch_status(
        &mut self,
        shift_watch_id: i64,
        last_status: Option<StaffingStatus>,
    ) -> Result<(), PersistenceError> {
        mutations::watches::update_shift_watch_status(&mut self.conn, shift_watch_id, last_status)
    }

    /// Returns `true` if the member already watches the shift.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn shift_watch_exists(
        &mut self,
        member_id: i64,
        shift_id: i64,
    ) -> Result<bool, PersistenceError> {
        queries::watches::shift_watch_exists(&mut self.conn, member_id, shift_id)
    }

    /// Lists every watch of a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_shift_watches_for_member(
        &mut self,
        member_id: i64,
    ) -> Result<Vec<ShiftWatch>, PersistenceError> {
        queries::watches::list_shift_watches_for_member(&mut self.conn, member_id)
    }

    /// Lists the watches on live shifts starting after `from`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_shift_watches_on_shifts_after(
        &mut self,
        from: PrimitiveDateTime,
    ) -> Result<Vec<(ShiftWatch, Shift)>, PersistenceError> {
        queries::watches::list_shift_watches_on_shifts_after(&mut self.conn, from)
    }

    /// Inserts a recurring shift watch and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_recurring_shift_watch(
        &mut self,
        watch: &RecurringShiftWatch,
    ) -> Result<i64, PersistenceError> {
        mutations::watches::insert_recurring_shift_watch(&mut self.conn, watch)
    }

    /// Lists every recurring shift watch.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_recurring_shift_watches(
        &mut self,
    ) -> Result<Vec<RecurringShiftWatch>, PersistenceError> {
        queries::watches::list_recurring_shift_watches(&mut self.conn)
    }

    // ========================================================================
    // Shift partners
    // ========================================================================

    /// Appends a shift partner change and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if a member is named as their own partner.
    pub fn record_shift_partner_change(
        &mut self,
        change: &ShiftPartnerChange,
    ) -> Result<i64, PersistenceError> {
        mutations::partners::insert_shift_partner_change(&mut self.conn, change)
    }

    /// Lists a member's shift partner changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_shift_partner_changes(
        &mut self,
        member_id: i64,
    ) -> Result<Vec<ShiftPartnerChange>, PersistenceError> {
        queries::partners::list_shift_partner_changes(&mut self.conn, member_id)
    }
}
