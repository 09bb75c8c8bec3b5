//! Event model

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

/// Telegram chat identifier
pub type ChatKey = i64;

/// Telegram user identifier
pub type UserKey = i64;

/// Message id of the announcement that carries the roster
pub type EventId = i32;

/// One scheduled game announcement with its roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub date: NaiveDate,
    pub title: String,
    pub author_id: UserKey,
    pub hourly_rate: u32,
    pub duration_hours: u32,
    pub capacity: u32,
    /// Signup order; decides who is inside capacity and who is waitlisted
    #[serde(default)]
    pub attendees: Vec<Attendee>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub user_id: UserKey,
    pub display_name: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Going,
    GoingPlusOne,
    Maybe,
}

impl AttendanceStatus {
    /// Going and Maybe describe the user themselves; plus-one entries are guests
    pub fn is_personal(self) -> bool {
        matches!(self, AttendanceStatus::Going | AttendanceStatus::Maybe)
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Going => write!(f, "going"),
            AttendanceStatus::GoingPlusOne => write!(f, "going_plus_one"),
            AttendanceStatus::Maybe => write!(f, "maybe"),
        }
    }
}

/// Button actions a chat member can take on a roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttendanceAction {
    JoinGoing,
    JoinPlusOne,
    JoinMaybe,
    Leave,
    RetractPlusOne,
}

impl AttendanceAction {
    pub const ALL: [AttendanceAction; 5] = [
        AttendanceAction::JoinGoing,
        AttendanceAction::JoinPlusOne,
        AttendanceAction::JoinMaybe,
        AttendanceAction::Leave,
        AttendanceAction::RetractPlusOne,
    ];
}

impl std::fmt::Display for AttendanceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AttendanceAction::JoinGoing => "join_going",
            AttendanceAction::JoinPlusOne => "join_plus_one",
            AttendanceAction::JoinMaybe => "join_maybe",
            AttendanceAction::Leave => "leave",
            AttendanceAction::RetractPlusOne => "retract_plus_one",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of applying an attendance action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeResult {
    pub changed: bool,
}

impl ChangeResult {
    pub const CHANGED: ChangeResult = ChangeResult { changed: true };
    pub const UNCHANGED: ChangeResult = ChangeResult { changed: false };
}

/// Author-editable numeric fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventField {
    HourlyRate,
    DurationHours,
    Capacity,
}

impl std::fmt::Display for EventField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventField::HourlyRate => write!(f, "hourly_rate"),
            EventField::DurationHours => write!(f, "duration_hours"),
            EventField::Capacity => write!(f, "capacity"),
        }
    }
}

/// Values used when the organizer does not override them at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDefaults {
    pub hourly_rate: u32,
    pub duration_hours: u32,
    pub capacity: u32,
}

impl Default for EventDefaults {
    fn default() -> Self {
        Self {
            hourly_rate: 2500,
            duration_hours: 3,
            capacity: 14,
        }
    }
}

/// Parameters of a `/new` command after parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEventRequest {
    pub id: EventId,
    pub date: NaiveDate,
    pub title: String,
    pub author_id: UserKey,
    pub hourly_rate: Option<u32>,
    pub duration_hours: Option<u32>,
    pub capacity: Option<u32>,
}

impl Event {
    pub fn total_cost(&self) -> u64 {
        u64::from(self.hourly_rate) * u64::from(self.duration_hours)
    }

    pub fn is_author(&self, user_id: UserKey) -> bool {
        self.author_id == user_id
    }

    /// Number of attendees past capacity
    pub fn waitlisted_count(&self) -> usize {
        self.attendees.len().saturating_sub(self.capacity as usize)
    }
}
