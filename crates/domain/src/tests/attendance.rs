// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AttendanceOrigin, AttendanceState, DomainError};
use std::str::FromStr;

const ALL_STATES: [AttendanceState; 6] = [
    AttendanceState::Pending,
    AttendanceState::Done,
    AttendanceState::Cancelled,
    AttendanceState::Missed,
    AttendanceState::MissedExcused,
    AttendanceState::LookingForStandIn,
];

#[test]
fn test_state_string_round_trip() {
    for state in ALL_STATES {
        let parsed: AttendanceState = AttendanceState::from_str(state.as_str()).unwrap();
        assert_eq!(parsed, state);
    }
    assert!(matches!(
        AttendanceState::from_str("asleep"),
        Err(DomainError::InvalidAttendanceState(_))
    ));
}

#[test]
fn test_valid_states_occupy_the_slot() {
    assert!(AttendanceState::Pending.is_valid());
    assert!(AttendanceState::Done.is_valid());
    assert!(AttendanceState::LookingForStandIn.is_valid());
    assert!(!AttendanceState::Cancelled.is_valid());
    assert!(!AttendanceState::Missed.is_valid());
    assert!(!AttendanceState::MissedExcused.is_valid());
}

#[test]
fn test_expected_to_show_up_states() {
    assert!(AttendanceState::Pending.is_expected_to_show_up());
    assert!(AttendanceState::LookingForStandIn.is_expected_to_show_up());
    assert!(!AttendanceState::Done.is_expected_to_show_up());
}

#[test]
fn test_ledger_values() {
    assert_eq!(AttendanceState::Done.ledger_value(), 1);
    assert_eq!(AttendanceState::MissedExcused.ledger_value(), 1);
    assert_eq!(AttendanceState::Missed.ledger_value(), -1);
    assert_eq!(AttendanceState::Pending.ledger_value(), 0);
    assert_eq!(AttendanceState::Cancelled.ledger_value(), 0);
    assert_eq!(AttendanceState::LookingForStandIn.ledger_value(), 0);
}

#[test]
fn test_no_state_transitions_to_itself() {
    for state in ALL_STATES {
        assert!(!state.can_transition_to(state), "{state} -> {state}");
    }
}

#[test]
fn test_pending_transitions() {
    for target in ALL_STATES {
        if target != AttendanceState::Pending {
            assert!(AttendanceState::Pending.can_transition_to(target));
        }
    }
}

#[test]
fn test_cancelled_only_reactivates() {
    assert!(AttendanceState::Cancelled.can_transition_to(AttendanceState::Pending));
    assert!(!AttendanceState::Cancelled.can_transition_to(AttendanceState::Done));
    assert!(
        AttendanceState::Cancelled
            .validate_transition(AttendanceState::LookingForStandIn)
            .is_err()
    );
}

#[test]
fn test_terminal_states_allow_corrections() {
    assert!(AttendanceState::Done.can_transition_to(AttendanceState::Missed));
    assert!(AttendanceState::Missed.can_transition_to(AttendanceState::MissedExcused));
    assert!(AttendanceState::MissedExcused.can_transition_to(AttendanceState::Cancelled));
    assert!(!AttendanceState::Done.can_transition_to(AttendanceState::Pending));
    assert!(!AttendanceState::Missed.can_transition_to(AttendanceState::LookingForStandIn));
}

#[test]
fn test_looking_for_stand_in_transitions() {
    assert!(AttendanceState::LookingForStandIn.can_transition_to(AttendanceState::Pending));
    assert!(AttendanceState::LookingForStandIn.can_transition_to(AttendanceState::Cancelled));
    assert!(AttendanceState::LookingForStandIn.can_transition_to(AttendanceState::Done));
}

#[test]
fn test_origin_parsing() {
    assert_eq!(
        AttendanceOrigin::from_str("template").unwrap(),
        AttendanceOrigin::Template
    );
    assert_eq!(AttendanceOrigin::Registration.to_string(), "registration");
    assert!(AttendanceOrigin::from_str("manual").is_err());
}
