//! Event roster core
//!
//! Attendance transitions, cost splitting, roster rendering and the per-chat
//! event store. Nothing in here talks to Telegram or touches the disk.

pub mod alias;
pub mod attendance;
pub mod clock;
pub mod pricing;
pub mod render;
pub mod store;

pub use alias::{AliasChange, AliasTable, UserProfile, display_name};
pub use clock::{Clock, FixedClock, SystemClock};
pub use pricing::per_person_cost;
pub use render::{RosterLabels, render, render_header};
pub use store::{ChatRoster, EventStore, SweepExpired};
