//! Event store
//!
//! Events and aliases of every chat, keyed by chat id. All operations are
//! synchronous; callers serialize access (see `services::roster`).

use std::collections::{BTreeMap, HashMap};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::models::{
    AttendanceAction, ChangeResult, ChatKey, CreateEventRequest, Event, EventDefaults, EventField,
    EventId, UserKey,
};
use crate::utils::errors::{RosterError, RosterResult, ValidationError};
use super::alias::{AliasChange, AliasTable};
use super::attendance;

/// All chats known to the bot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStore {
    #[serde(default)]
    chats: HashMap<ChatKey, ChatRoster>,
}

/// Events and aliases of a single chat
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRoster {
    #[serde(default)]
    events: BTreeMap<EventId, Event>,
    #[serde(default)]
    aliases: AliasTable,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chat(&self, chat_id: ChatKey) -> Option<&ChatRoster> {
        self.chats.get(&chat_id)
    }

    /// Roster of a chat, created on first touch
    pub fn chat_mut(&mut self, chat_id: ChatKey) -> &mut ChatRoster {
        self.chats.entry(chat_id).or_default()
    }

    pub fn set_alias(&mut self, chat_id: ChatKey, user_id: UserKey, name: Option<&str>) -> AliasChange {
        self.chat_mut(chat_id).set_alias(user_id, name)
    }

    pub fn chat_count(&self) -> usize {
        self.chats.len()
    }

    pub fn event_count(&self) -> usize {
        self.chats.values().map(|c| c.events.len()).sum()
    }
}

impl ChatRoster {
    /// Store a new event. A date already in the past is moved one month ahead, once.
    pub fn create(&mut self, request: CreateEventRequest, defaults: &EventDefaults, today: NaiveDate) -> Event {
        let date = roll_past_date(request.date, today);
        if date != request.date {
            debug!(event_id = request.id, from = %request.date, to = %date, "Moved past event date one month ahead");
        }

        let event = Event {
            id: request.id,
            date,
            title: request.title,
            author_id: request.author_id,
            hourly_rate: request.hourly_rate.unwrap_or(defaults.hourly_rate),
            duration_hours: request.duration_hours.unwrap_or(defaults.duration_hours),
            capacity: request.capacity.unwrap_or(defaults.capacity),
            attendees: Vec::new(),
        };

        self.events.insert(event.id, event.clone());
        event
    }

    pub fn get(&self, event_id: EventId) -> Option<&Event> {
        self.events.get(&event_id)
    }

    pub fn contains(&self, event_id: EventId) -> bool {
        self.events.contains_key(&event_id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Author-only edit of a numeric field; `value` is the raw command argument
    pub fn set_field(
        &mut self,
        event_id: EventId,
        requester_id: UserKey,
        field: EventField,
        value: &str,
    ) -> RosterResult<&Event> {
        let event = self.authored_mut(event_id, requester_id)?;
        let value = parse_positive(value)?;

        match field {
            EventField::HourlyRate => event.hourly_rate = value,
            EventField::DurationHours => event.duration_hours = value,
            EventField::Capacity => event.capacity = value,
        }

        debug!(event_id = event_id, field = %field, value = value, "Event field updated");
        Ok(&*event)
    }

    /// Author-only removal; returns the removed event
    pub fn delete(&mut self, event_id: EventId, requester_id: UserKey) -> RosterResult<Event> {
        self.authored_mut(event_id, requester_id)?;
        self.events
            .remove(&event_id)
            .ok_or(RosterError::NotFound { event_id })
    }

    pub fn apply_attendance(
        &mut self,
        event_id: EventId,
        user_id: UserKey,
        display_name: &str,
        action: AttendanceAction,
    ) -> RosterResult<ChangeResult> {
        let event = self
            .events
            .get_mut(&event_id)
            .ok_or(RosterError::NotFound { event_id })?;
        Ok(attendance::apply(event, user_id, display_name, action))
    }

    /// Author-only snapshot of undecided attendees
    pub fn maybe_list(&self, event_id: EventId, requester_id: UserKey) -> RosterResult<Vec<String>> {
        let event = self.events.get(&event_id).ok_or(RosterError::NotFound { event_id })?;
        if !event.is_author(requester_id) {
            return Err(RosterError::NotAuthor { event_id, user_id: requester_id });
        }
        Ok(attendance::maybe_names(event))
    }

    /// Lazily walk the events, dropping every event dated before `today`.
    ///
    /// Expired events are removed as the iterator reaches them, so the sweep is
    /// one-shot and a partially consumed iterator leaves later events untouched.
    pub fn sweep_expired(&mut self, today: NaiveDate) -> SweepExpired<'_> {
        let pending: Vec<EventId> = self.events.keys().copied().collect();
        SweepExpired {
            events: &mut self.events,
            pending: pending.into_iter(),
            today,
        }
    }

    pub fn set_alias(&mut self, user_id: UserKey, name: Option<&str>) -> AliasChange {
        self.aliases.set(user_id, name)
    }

    pub fn alias(&self, user_id: UserKey) -> Option<&str> {
        self.aliases.get(user_id)
    }

    fn authored_mut(&mut self, event_id: EventId, requester_id: UserKey) -> RosterResult<&mut Event> {
        let event = self
            .events
            .get_mut(&event_id)
            .ok_or(RosterError::NotFound { event_id })?;
        if !event.is_author(requester_id) {
            return Err(RosterError::NotAuthor { event_id, user_id: requester_id });
        }
        Ok(event)
    }
}

/// Iterator returned by [`ChatRoster::sweep_expired`]
pub struct SweepExpired<'a> {
    events: &'a mut BTreeMap<EventId, Event>,
    pending: std::vec::IntoIter<EventId>,
    today: NaiveDate,
}

impl Iterator for SweepExpired<'_> {
    type Item = (EventId, Event);

    fn next(&mut self) -> Option<Self::Item> {
        for event_id in self.pending.by_ref() {
            let expired = match self.events.get(&event_id) {
                Some(event) => event.date < self.today,
                None => continue,
            };

            if expired {
                self.events.remove(&event_id);
                debug!(event_id = event_id, "Swept expired event");
                continue;
            }

            if let Some(event) = self.events.get(&event_id) {
                return Some((event_id, event.clone()));
            }
        }
        None
    }
}

fn roll_past_date(date: NaiveDate, today: NaiveDate) -> NaiveDate {
    if date < today {
        date.checked_add_months(Months::new(1)).unwrap_or(date)
    } else {
        date
    }
}

fn parse_positive(value: &str) -> Result<u32, ValidationError> {
    // only the first word counts, like `/price 1000 per hour`
    let Some(value) = value.split_whitespace().next() else {
        return Err(ValidationError::Missing);
    };

    let number: i64 = value
        .parse()
        .map_err(|_| ValidationError::NotANumber(value.to_string()))?;
    if number <= 0 {
        return Err(ValidationError::NotPositive(number));
    }

    u32::try_from(number).map_err(|_| ValidationError::NotANumber(value.to_string()))
}
