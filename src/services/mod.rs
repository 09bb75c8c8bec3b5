//! Services module
//!
//! This module contains business logic services

pub mod roster;

// Re-export commonly used services
pub use roster::RosterService;

use std::sync::Arc;
use crate::config::settings::Settings;
use crate::i18n::I18n;
use crate::middleware::AccessGate;
use crate::roster::{RosterLabels, SystemClock};
use crate::state::StateStorage;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub roster_service: RosterService,
    pub access_gate: AccessGate,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized.
    ///
    /// Roster messages are shared by the whole chat, so they are rendered in
    /// the default language.
    pub async fn new(settings: &Settings, i18n: &I18n) -> Result<Self> {
        let storage = StateStorage::new(&settings.storage).await?;
        let clock = Arc::new(SystemClock::with_utc_offset_hours(settings.roster.utc_offset_hours));
        let labels = RosterLabels::from_i18n(i18n, i18n.default_language());

        let roster_service = RosterService::new(storage, clock, &settings.roster, labels);
        roster_service.load().await?;

        Ok(Self {
            roster_service,
            access_gate: AccessGate::new(&settings.bot),
        })
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        ServiceHealthStatus {
            storage_healthy: self.roster_service.test_storage().await.is_ok(),
            allowed_chats: self.access_gate.allowed_chat_ids().len(),
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub storage_healthy: bool,
    pub allowed_chats: usize,
}

impl ServiceHealthStatus {
    /// Check if all critical services are healthy
    pub fn is_healthy(&self) -> bool {
        self.storage_healthy && self.allowed_chats > 0
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.storage_healthy {
            issues.push("Snapshot storage unreachable".to_string());
        }
        if self.allowed_chats == 0 {
            issues.push("No allowed chats configured".to_string());
        }

        issues
    }
}
