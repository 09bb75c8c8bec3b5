//! Utility modules
//!
//! This module contains common utilities used throughout the application,
//! including error handling, logging setup, and command argument parsing.

pub mod errors;
pub mod logging;
pub mod parsing;

pub use errors::{RosterBuddyError, RosterError, Result};
