//! Attendance state machine
//!
//! Personal attendance (`Going` / `Maybe`) is a single slot per user that can be
//! switched in place. `GoingPlusOne` entries are guests: they are additive, never
//! deduplicated, and do not count as the user's own attendance.

use crate::models::{Attendee, AttendanceAction, AttendanceStatus, ChangeResult, Event, UserKey};

/// Apply a button press to the event roster.
///
/// `display_name` is only used when a new entry is appended.
pub fn apply(event: &mut Event, user_id: UserKey, display_name: &str, action: AttendanceAction) -> ChangeResult {
    match action {
        AttendanceAction::JoinGoing => join_personal(event, user_id, display_name, AttendanceStatus::Going),
        AttendanceAction::JoinMaybe => join_personal(event, user_id, display_name, AttendanceStatus::Maybe),
        AttendanceAction::JoinPlusOne => {
            event.attendees.push(Attendee {
                user_id,
                display_name: display_name.to_string(),
                status: AttendanceStatus::GoingPlusOne,
            });
            ChangeResult::CHANGED
        }
        AttendanceAction::Leave => match personal_entry(event, user_id) {
            Some(index) => {
                event.attendees.remove(index);
                ChangeResult::CHANGED
            }
            None => ChangeResult::UNCHANGED,
        },
        AttendanceAction::RetractPlusOne => {
            let oldest_guest = event
                .attendees
                .iter()
                .position(|a| a.user_id == user_id && a.status == AttendanceStatus::GoingPlusOne);
            match oldest_guest {
                Some(index) => {
                    event.attendees.remove(index);
                    ChangeResult::CHANGED
                }
                None => ChangeResult::UNCHANGED,
            }
        }
    }
}

/// Display names of everyone still undecided
pub fn maybe_names(event: &Event) -> Vec<String> {
    event
        .attendees
        .iter()
        .filter(|a| a.status == AttendanceStatus::Maybe)
        .map(|a| a.display_name.clone())
        .collect()
}

/// Current personal status of a user, if any
pub fn personal_status(event: &Event, user_id: UserKey) -> Option<AttendanceStatus> {
    personal_entry(event, user_id).map(|index| event.attendees[index].status)
}

fn personal_entry(event: &Event, user_id: UserKey) -> Option<usize> {
    event
        .attendees
        .iter()
        .position(|a| a.user_id == user_id && a.status.is_personal())
}

fn join_personal(event: &mut Event, user_id: UserKey, display_name: &str, status: AttendanceStatus) -> ChangeResult {
    match personal_entry(event, user_id) {
        Some(index) if event.attendees[index].status == status => ChangeResult::UNCHANGED,
        Some(index) => {
            event.attendees[index].status = status;
            ChangeResult::CHANGED
        }
        None => {
            event.attendees.push(Attendee {
                user_id,
                display_name: display_name.to_string(),
                status,
            });
            ChangeResult::CHANGED
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn empty_event() -> Event {
        Event {
            id: 1,
            date: NaiveDate::from_ymd_opt(2024, 10, 10).unwrap(),
            title: "#game".to_string(),
            author_id: 1,
            hourly_rate: 2500,
            duration_hours: 3,
            capacity: 14,
            attendees: vec![],
        }
    }

    fn statuses(event: &Event) -> Vec<(UserKey, AttendanceStatus)> {
        event.attendees.iter().map(|a| (a.user_id, a.status)).collect()
    }

    #[test]
    fn test_join_from_absent() {
        for (action, status) in [
            (AttendanceAction::JoinGoing, AttendanceStatus::Going),
            (AttendanceAction::JoinPlusOne, AttendanceStatus::GoingPlusOne),
            (AttendanceAction::JoinMaybe, AttendanceStatus::Maybe),
        ] {
            let mut event = empty_event();
            assert!(apply(&mut event, 10, "Ann", action).changed);
            assert_eq!(statuses(&event), vec![(10, status)]);
            assert_eq!(event.attendees[0].display_name, "Ann");
        }
    }

    #[test]
    fn test_duplicate_going_is_ignored() {
        let mut event = empty_event();
        assert!(apply(&mut event, 10, "Ann", AttendanceAction::JoinGoing).changed);
        assert!(!apply(&mut event, 10, "Ann", AttendanceAction::JoinGoing).changed);
        assert_eq!(event.attendees.len(), 1);
    }

    #[test]
    fn test_duplicate_maybe_is_ignored() {
        let mut event = empty_event();
        apply(&mut event, 10, "Ann", AttendanceAction::JoinMaybe);
        assert!(!apply(&mut event, 10, "Ann", AttendanceAction::JoinMaybe).changed);
        assert_eq!(statuses(&event), vec![(10, AttendanceStatus::Maybe)]);
    }

    #[test]
    fn test_switch_keeps_position() {
        let mut event = empty_event();
        apply(&mut event, 10, "Ann", AttendanceAction::JoinGoing);
        apply(&mut event, 20, "Bob", AttendanceAction::JoinGoing);

        assert!(apply(&mut event, 10, "Ann", AttendanceAction::JoinMaybe).changed);
        assert_eq!(
            statuses(&event),
            vec![(10, AttendanceStatus::Maybe), (20, AttendanceStatus::Going)]
        );

        assert!(apply(&mut event, 10, "Ann", AttendanceAction::JoinGoing).changed);
        assert_eq!(
            statuses(&event),
            vec![(10, AttendanceStatus::Going), (20, AttendanceStatus::Going)]
        );
    }

    #[test]
    fn test_plus_one_holder_joining_appends_personal_entry() {
        let mut event = empty_event();
        apply(&mut event, 10, "Ann", AttendanceAction::JoinPlusOne);
        assert!(apply(&mut event, 10, "Ann", AttendanceAction::JoinGoing).changed);
        assert_eq!(
            statuses(&event),
            vec![(10, AttendanceStatus::GoingPlusOne), (10, AttendanceStatus::Going)]
        );

        // the personal slot is still deduplicated afterwards
        assert!(!apply(&mut event, 10, "Ann", AttendanceAction::JoinGoing).changed);
        assert!(apply(&mut event, 10, "Ann", AttendanceAction::JoinMaybe).changed);
        assert_eq!(event.attendees.len(), 2);
    }

    #[test]
    fn test_plus_one_is_additive() {
        let mut event = empty_event();
        apply(&mut event, 10, "Ann", AttendanceAction::JoinGoing);
        assert!(apply(&mut event, 10, "Ann", AttendanceAction::JoinPlusOne).changed);
        assert!(apply(&mut event, 10, "Ann", AttendanceAction::JoinPlusOne).changed);
        assert_eq!(event.attendees.len(), 3);
    }

    #[test]
    fn test_leave() {
        let mut event = empty_event();
        apply(&mut event, 10, "Ann", AttendanceAction::JoinMaybe);
        apply(&mut event, 20, "Bob", AttendanceAction::JoinGoing);

        assert!(apply(&mut event, 10, "Ann", AttendanceAction::Leave).changed);
        assert_eq!(statuses(&event), vec![(20, AttendanceStatus::Going)]);
        assert!(!apply(&mut event, 10, "Ann", AttendanceAction::Leave).changed);
    }

    #[test]
    fn test_leave_does_not_touch_guests() {
        let mut event = empty_event();
        apply(&mut event, 10, "Ann", AttendanceAction::JoinPlusOne);
        assert!(!apply(&mut event, 10, "Ann", AttendanceAction::Leave).changed);
        assert_eq!(statuses(&event), vec![(10, AttendanceStatus::GoingPlusOne)]);
    }

    #[test]
    fn test_retract_plus_one_removes_oldest_guest() {
        let mut event = empty_event();
        apply(&mut event, 10, "Ann guest 1", AttendanceAction::JoinPlusOne);
        apply(&mut event, 20, "Bob", AttendanceAction::JoinGoing);
        apply(&mut event, 10, "Ann guest 2", AttendanceAction::JoinPlusOne);

        assert!(apply(&mut event, 10, "Ann", AttendanceAction::RetractPlusOne).changed);
        let names: Vec<&str> = event.attendees.iter().map(|a| a.display_name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Ann guest 2"]);
    }

    #[test]
    fn test_retract_without_guest_is_noop() {
        let mut event = empty_event();
        apply(&mut event, 10, "Ann", AttendanceAction::JoinGoing);
        assert!(!apply(&mut event, 10, "Ann", AttendanceAction::RetractPlusOne).changed);
        assert!(!apply(&mut event, 99, "Zed", AttendanceAction::RetractPlusOne).changed);
        assert_eq!(event.attendees.len(), 1);
    }

    #[test]
    fn test_maybe_names() {
        let mut event = empty_event();
        apply(&mut event, 10, "Ann", AttendanceAction::JoinMaybe);
        apply(&mut event, 20, "Bob", AttendanceAction::JoinGoing);
        apply(&mut event, 30, "Cid", AttendanceAction::JoinMaybe);

        assert_eq!(maybe_names(&event), vec!["Ann".to_string(), "Cid".to_string()]);
        assert_eq!(personal_status(&event, 20), Some(AttendanceStatus::Going));
        assert_eq!(personal_status(&event, 40), None);
    }

    fn personal_action() -> impl Strategy<Value = AttendanceAction> {
        prop_oneof![
            Just(AttendanceAction::JoinGoing),
            Just(AttendanceAction::JoinMaybe),
            Just(AttendanceAction::Leave),
        ]
    }

    proptest! {
        #[test]
        fn prop_at_most_one_entry_per_user(
            steps in proptest::collection::vec((0i64..4, personal_action()), 0..60)
        ) {
            let mut event = empty_event();
            for (user_id, action) in steps {
                apply(&mut event, user_id, "name", action);
            }
            for user_id in 0i64..4 {
                let entries = event.attendees.iter().filter(|a| a.user_id == user_id).count();
                prop_assert!(entries <= 1);
            }
        }

        #[test]
        fn prop_at_most_one_personal_entry_with_guests(
            steps in proptest::collection::vec(
                (0i64..3, proptest::sample::select(AttendanceAction::ALL.to_vec())),
                0..60,
            )
        ) {
            let mut event = empty_event();
            for (user_id, action) in steps {
                apply(&mut event, user_id, "name", action);
            }
            for user_id in 0i64..3 {
                let personal = event
                    .attendees
                    .iter()
                    .filter(|a| a.user_id == user_id && a.status.is_personal())
                    .count();
                prop_assert!(personal <= 1);
            }
        }
    }
}
