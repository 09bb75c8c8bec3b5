//! Data models module
//!
//! This module contains the roster data structures shared by the core and the adapters

pub mod event;

// Re-export commonly used models
pub use event::{
    Attendee, AttendanceAction, AttendanceStatus, ChangeResult, ChatKey, CreateEventRequest,
    Event, EventDefaults, EventField, EventId, UserKey,
};
