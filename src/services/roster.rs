//! Roster service
//!
//! Owns the in-memory [`EventStore`] and its snapshot storage. Every operation
//! runs its whole read-modify-render sequence under one lock and hands back
//! plain data (rendered text, names, errors) for the handlers to send.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use crate::config::RosterConfig;
use crate::models::{
    AttendanceAction, ChatKey, CreateEventRequest, Event, EventDefaults, EventField, EventId, UserKey,
};
use crate::roster::{self, attendance, AliasChange, ChatRoster, Clock, EventStore, RosterLabels, UserProfile};
use crate::state::StateStorage;
use crate::utils::errors::{Result, RosterError, RosterResult};
use crate::utils::logging::{log_attendance_change, log_event_action};
use crate::utils::parsing::{parse_new_event_args, NewEventArgs, TokenPrefixes};

/// Event roster service
#[derive(Clone)]
pub struct RosterService {
    store: Arc<Mutex<EventStore>>,
    storage: StateStorage,
    clock: Arc<dyn Clock>,
    defaults: EventDefaults,
    prefixes: TokenPrefixes,
    labels: Arc<RosterLabels>,
    dirty: Arc<AtomicBool>,
}

impl RosterService {
    /// Create a service with an empty store
    pub fn new(storage: StateStorage, clock: Arc<dyn Clock>, config: &RosterConfig, labels: RosterLabels) -> Self {
        Self {
            store: Arc::new(Mutex::new(EventStore::new())),
            storage,
            clock,
            defaults: config.event_defaults(),
            prefixes: TokenPrefixes::from(config),
            labels: Arc::new(labels),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the in-memory store with the last saved snapshot
    pub async fn load(&self) -> Result<()> {
        let loaded = self.storage.load().await?;
        let mut store = self.store.lock().await;
        *store = loaded;
        self.dirty.store(false, Ordering::SeqCst);
        Ok(())
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Parse the text after `/new` relative to `today`
    pub fn parse_new_event(&self, text: &str, today: NaiveDate) -> Result<NewEventArgs> {
        parse_new_event_args(text, today, &self.prefixes)
    }

    /// Text of the announcement before it is posted.
    ///
    /// Built through the same create path as the stored event, so given the
    /// same `today` the rollover and defaults match [`Self::create_event`].
    pub fn preview(&self, args: &NewEventArgs, author_id: UserKey, today: NaiveDate) -> String {
        let event = ChatRoster::default().create(self.request(0, args, author_id), &self.defaults, today);
        roster::render(&event, &self.labels)
    }

    /// Store the event announced by message `event_id`
    pub async fn create_event(
        &self,
        chat_id: ChatKey,
        event_id: EventId,
        args: &NewEventArgs,
        author_id: UserKey,
        today: NaiveDate,
    ) -> Event {
        let event = {
            let mut store = self.store.lock().await;
            store
                .chat_mut(chat_id)
                .create(self.request(event_id, args, author_id), &self.defaults, today)
        };
        self.mark_dirty();

        log_event_action(chat_id, event_id, "create", author_id, Some(event.date.to_string().as_str()));
        event
    }

    /// Author-only delete
    pub async fn delete_event(&self, chat_id: ChatKey, event_id: EventId, requester_id: UserKey) -> RosterResult<Event> {
        let removed = {
            let mut store = self.store.lock().await;
            store.chat_mut(chat_id).delete(event_id, requester_id)?
        };
        self.mark_dirty();

        log_event_action(chat_id, event_id, "delete", requester_id, None);
        Ok(removed)
    }

    /// Author-only numeric edit; returns the re-rendered roster
    pub async fn set_field(
        &self,
        chat_id: ChatKey,
        event_id: EventId,
        requester_id: UserKey,
        field: EventField,
        value: &str,
    ) -> RosterResult<String> {
        let text = {
            let mut store = self.store.lock().await;
            let event = store.chat_mut(chat_id).set_field(event_id, requester_id, field, value)?;
            roster::render(event, &self.labels)
        };
        self.mark_dirty();

        log_event_action(chat_id, event_id, "set_field", requester_id, Some(format!("{}={}", field, value.trim()).as_str()));
        Ok(text)
    }

    /// Apply a button press; returns the new roster text when it changed
    pub async fn apply_attendance(
        &self,
        chat_id: ChatKey,
        event_id: EventId,
        user: &UserProfile,
        action: AttendanceAction,
    ) -> RosterResult<Option<String>> {
        let text = {
            let mut store = self.store.lock().await;
            let chat = store.chat_mut(chat_id);
            let name = roster::display_name(user, chat.alias(user.id));
            let result = chat.apply_attendance(event_id, user.id, &name, action)?;
            let event = chat.get(event_id).ok_or(RosterError::NotFound { event_id })?;
            log_attendance_change(
                chat_id,
                event_id,
                user.id,
                action,
                attendance::personal_status(event, user.id),
                event.waitlisted_count(),
                result.changed,
            );

            if !result.changed {
                return Ok(None);
            }
            roster::render(event, &self.labels)
        };
        self.mark_dirty();
        Ok(Some(text))
    }

    /// Author-only list of undecided attendees
    pub async fn maybe_list(&self, chat_id: ChatKey, event_id: EventId, requester_id: UserKey) -> RosterResult<Vec<String>> {
        let store = self.store.lock().await;
        match store.chat(chat_id) {
            Some(chat) => chat.maybe_list(event_id, requester_id),
            None => Err(RosterError::NotFound { event_id }),
        }
    }

    /// Sweep expired events and return `(id, header)` of the rest
    pub async fn list_active(&self, chat_id: ChatKey) -> Vec<(EventId, String)> {
        let today = self.today();
        let mut store = self.store.lock().await;
        let chat = store.chat_mut(chat_id);
        let before = chat.len();

        let active: Vec<(EventId, String)> = chat
            .sweep_expired(today)
            .map(|(event_id, event)| (event_id, roster::render_header(&event)))
            .collect();

        let swept = before - chat.len();
        drop(store);

        if swept > 0 {
            info!(chat_id = chat_id, swept = swept, "Expired events removed");
            self.mark_dirty();
        }
        active
    }

    /// Set or clear the caller's alias in this chat
    pub async fn set_alias(&self, chat_id: ChatKey, user_id: UserKey, name: Option<&str>) -> AliasChange {
        let change = self.store.lock().await.set_alias(chat_id, user_id, name);
        if change != AliasChange::Unchanged {
            self.mark_dirty();
        }
        debug!(chat_id = chat_id, user_id = user_id, change = ?change, "Alias updated");
        change
    }

    /// Current roster text of an event
    pub async fn render(&self, chat_id: ChatKey, event_id: EventId) -> Option<String> {
        let store = self.store.lock().await;
        store
            .chat(chat_id)
            .and_then(|chat| chat.get(event_id))
            .map(|event| roster::render(event, &self.labels))
    }

    /// Copy of the whole store
    pub async fn snapshot(&self) -> EventStore {
        self.store.lock().await.clone()
    }

    /// Check that the snapshot backend is reachable
    pub async fn test_storage(&self) -> Result<()> {
        self.storage.test_connection().await
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Save the store if anything changed since the last save
    pub async fn flush_if_dirty(&self) -> Result<bool> {
        if !self.dirty.swap(false, Ordering::SeqCst) {
            return Ok(false);
        }

        let snapshot = self.snapshot().await;
        if let Err(e) = self.storage.save(&snapshot).await {
            self.mark_dirty();
            return Err(e);
        }
        Ok(true)
    }

    /// Save the store unconditionally
    pub async fn flush(&self) -> Result<()> {
        self.dirty.store(false, Ordering::SeqCst);
        let snapshot = self.snapshot().await;
        if let Err(e) = self.storage.save(&snapshot).await {
            self.mark_dirty();
            return Err(e);
        }
        Ok(())
    }

    /// Start the periodic snapshot task
    pub fn start_flusher(&self, interval: Duration) -> JoinHandle<()> {
        let service = self.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // the first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;

                if let Err(e) = service.flush_if_dirty().await {
                    error!(error = %e, backend = service.storage.backend_name(), "Snapshot flush failed");
                }
            }
        });

        info!("Started snapshot flusher with interval {:?}", interval);
        handle
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    fn request(&self, event_id: EventId, args: &NewEventArgs, author_id: UserKey) -> CreateEventRequest {
        CreateEventRequest {
            id: event_id,
            date: args.date,
            title: args.title.clone(),
            author_id,
            hourly_rate: args.hourly_rate,
            duration_hours: args.duration_hours,
            capacity: args.capacity,
        }
    }
}

impl std::fmt::Debug for RosterService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterService")
            .field("storage", &self.storage)
            .field("defaults", &self.defaults)
            .field("dirty", &self.is_dirty())
            .finish_non_exhaustive()
    }
}
