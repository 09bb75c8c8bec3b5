//! Roster inline keyboard
//!
//! Callback data values are stored in already-posted messages, so they must
//! stay stable across releases.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use crate::i18n::I18n;
use crate::models::AttendanceAction;

/// What a roster button does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Attendance(AttendanceAction),
    /// Author-only: post the names of everyone still undecided
    BroadcastMaybe,
}

impl ButtonAction {
    /// Rows of the roster keyboard
    pub const LAYOUT: [&'static [ButtonAction]; 3] = [
        &[
            ButtonAction::Attendance(AttendanceAction::JoinGoing),
            ButtonAction::Attendance(AttendanceAction::JoinPlusOne),
            ButtonAction::Attendance(AttendanceAction::RetractPlusOne),
        ],
        &[
            ButtonAction::Attendance(AttendanceAction::JoinMaybe),
            ButtonAction::Attendance(AttendanceAction::Leave),
        ],
        &[ButtonAction::BroadcastMaybe],
    ];

    pub fn callback_data(self) -> &'static str {
        match self {
            ButtonAction::Attendance(AttendanceAction::JoinGoing) => "i",
            ButtonAction::Attendance(AttendanceAction::JoinPlusOne) => "i+1",
            ButtonAction::Attendance(AttendanceAction::RetractPlusOne) => "i-1",
            ButtonAction::Attendance(AttendanceAction::JoinMaybe) => "not_sure",
            ButtonAction::Attendance(AttendanceAction::Leave) => "not_play",
            ButtonAction::BroadcastMaybe => "check_not_sure",
        }
    }

    pub fn from_callback_data(data: &str) -> Option<Self> {
        Self::LAYOUT
            .iter()
            .flat_map(|row| row.iter().copied())
            .find(|action| action.callback_data() == data)
    }

    fn label_key(self) -> &'static str {
        match self {
            ButtonAction::Attendance(AttendanceAction::JoinGoing) => "buttons.going",
            ButtonAction::Attendance(AttendanceAction::JoinPlusOne) => "buttons.plus_one",
            ButtonAction::Attendance(AttendanceAction::RetractPlusOne) => "buttons.retract_plus_one",
            ButtonAction::Attendance(AttendanceAction::JoinMaybe) => "buttons.maybe",
            ButtonAction::Attendance(AttendanceAction::Leave) => "buttons.not_going",
            ButtonAction::BroadcastMaybe => "buttons.resolve_maybe",
        }
    }
}

/// Keyboard attached to every roster message
pub fn roster_keyboard(i18n: &I18n, lang: &str) -> InlineKeyboardMarkup {
    let rows = ButtonAction::LAYOUT.iter().map(|row| {
        row.iter()
            .map(|action| InlineKeyboardButton::callback(i18n.t(action.label_key(), lang, None), action.callback_data()))
            .collect::<Vec<_>>()
    });

    InlineKeyboardMarkup::new(rows)
}
