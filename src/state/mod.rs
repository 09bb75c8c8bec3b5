//! State management module
//!
//! This module handles persistence of the event store snapshot

pub mod storage;

// Re-export commonly used state components
pub use storage::StateStorage;
