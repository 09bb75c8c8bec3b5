//! Roster text rendering
//!
//! The announcement message is edited in place after every change, so the text
//! must be fully re-derivable from the stored [`Event`].

use crate::i18n::I18n;
use crate::models::{AttendanceStatus, Event};
use super::pricing::per_person_cost;

/// Fixed strings used in the roster message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterLabels {
    pub participants_header: String,
    pub plus_one_suffix: String,
    pub maybe_suffix: String,
    pub waitlist_divider: String,
    pub price_per_hour: String,
    pub duration: String,
    pub total: String,
    pub per_person: String,
    pub currency: String,
    pub hours_unit: String,
}

impl Default for RosterLabels {
    fn default() -> Self {
        Self {
            participants_header: "Participants:".to_string(),
            plus_one_suffix: " +1 guest".to_string(),
            maybe_suffix: " (pending)".to_string(),
            waitlist_divider: "--- Waitlist ---".to_string(),
            price_per_hour: "Price per hour".to_string(),
            duration: "Duration".to_string(),
            total: "Total".to_string(),
            per_person: "Per person".to_string(),
            currency: "₽".to_string(),
            hours_unit: "h".to_string(),
        }
    }
}

impl RosterLabels {
    /// Build labels from the `roster.*` translation keys
    pub fn from_i18n(i18n: &I18n, lang: &str) -> Self {
        Self {
            participants_header: i18n.t("roster.participants_header", lang, None),
            plus_one_suffix: format!(" {}", i18n.t("roster.plus_one_suffix", lang, None)),
            maybe_suffix: format!(" {}", i18n.t("roster.maybe_suffix", lang, None)),
            waitlist_divider: i18n.t("roster.waitlist_divider", lang, None),
            price_per_hour: i18n.t("roster.price_per_hour", lang, None),
            duration: i18n.t("roster.duration", lang, None),
            total: i18n.t("roster.total", lang, None),
            per_person: i18n.t("roster.per_person", lang, None),
            currency: i18n.t("roster.currency", lang, None),
            hours_unit: i18n.t("roster.hours_unit", lang, None),
        }
    }

    fn suffix(&self, status: AttendanceStatus) -> &str {
        match status {
            AttendanceStatus::Going => "",
            AttendanceStatus::GoingPlusOne => &self.plus_one_suffix,
            AttendanceStatus::Maybe => &self.maybe_suffix,
        }
    }
}

/// Announcement header shared by the roster and `/list`
pub fn render_header(event: &Event) -> String {
    format!("{} {}", event.date.format("%d.%m.%Y"), event.title).trim_end().to_string()
}

/// Render the full roster message for an event
pub fn render(event: &Event, labels: &RosterLabels) -> String {
    let capacity = event.capacity as usize;
    let overflow = event.attendees.len() > capacity;

    let mut lines = Vec::with_capacity(event.attendees.len() + 8);
    lines.push(render_header(event));
    lines.push(labels.participants_header.clone());

    for (index, attendee) in event.attendees.iter().enumerate() {
        let position = index + 1;
        lines.push(format!("{}. {}{}", position, attendee.display_name, labels.suffix(attendee.status)));
        if overflow && position == capacity {
            lines.push(labels.waitlist_divider.clone());
        }
    }

    let total = event.total_cost();
    let share = per_person_cost(event.hourly_rate, event.duration_hours, event.attendees.len(), event.capacity);

    lines.push("------".to_string());
    lines.push(format!("{}: `{}{}`", labels.price_per_hour, event.hourly_rate, labels.currency));
    lines.push(format!("{}: `{}{}`", labels.duration, event.duration_hours, labels.hours_unit));
    lines.push(format!("{}: `{}{}`", labels.total, total, labels.currency));
    lines.push(format!("{}: `{}{}`", labels.per_person, share, labels.currency));

    lines.join("\n")
}
