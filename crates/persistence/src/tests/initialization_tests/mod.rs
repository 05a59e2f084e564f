// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.

use diesel::RunQueryDsl;

use crate::Persistence;
use crate::backend::sqlite::verify_required_indexes;
use crate::error::PersistenceError;
use crate::tests::{create_test_persistence, insert_test_member};

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_keys_are_enforced() {
    let mut persistence: Persistence = create_test_persistence();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1: Persistence = create_test_persistence();
    let mut db2: Persistence = create_test_persistence();

    insert_test_member(&mut db1, "one@example.org");

    assert_eq!(db1.list_members().unwrap().len(), 1);
    assert!(db2.list_members().unwrap().is_empty());
}

#[test]
fn test_file_database_survives_reopen() {
    let path: std::path::PathBuf = std::env::temp_dir().join(format!(
        "coop_shifts_init_test_{}.sqlite",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        insert_test_member(&mut persistence, "file@example.org");
    }

    let mut reopened: Persistence = Persistence::new_with_file(&path).unwrap();
    assert_eq!(reopened.list_members().unwrap().len(), 1);

    drop(reopened);
    let _ = std::fs::remove_file(&path);
}

#[derive(diesel::QueryableByName)]
struct JournalModeRow {
    #[diesel(sql_type = diesel::sql_types::Text)]
    journal_mode: String,
}

#[test]
fn test_schema_carries_the_one_valid_attendance_index() {
    let mut persistence: Persistence = create_test_persistence();
    assert!(verify_required_indexes(&mut persistence.conn).is_ok());

    diesel::sql_query("DROP INDEX idx_shift_attendances_one_valid_per_slot")
        .execute(&mut persistence.conn)
        .unwrap();
    assert!(matches!(
        verify_required_indexes(&mut persistence.conn),
        Err(PersistenceError::InitializationError(_))
    ));
}

#[test]
fn test_file_database_runs_in_wal_mode() {
    let path: std::path::PathBuf = std::env::temp_dir().join(format!(
        "coop_shifts_wal_test_{}.sqlite",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
    let row: JournalModeRow = diesel::sql_query("PRAGMA journal_mode")
        .get_result(&mut persistence.conn)
        .unwrap();
    assert_eq!(row.journal_mode, "wal");

    drop(persistence);
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}
