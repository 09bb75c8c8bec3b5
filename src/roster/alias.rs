//! Per-chat display name aliases

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::models::UserKey;

/// Custom names chosen with `/mynameis`, keyed by user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    names: HashMap<UserKey, String>,
}

/// What `/mynameis` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasChange {
    Set(String),
    Cleared,
    Unchanged,
}

impl AliasTable {
    pub fn get(&self, user_id: UserKey) -> Option<&str> {
        self.names.get(&user_id).map(String::as_str)
    }

    /// Upsert an alias, or clear it when `name` is `None` or blank
    pub fn set(&mut self, user_id: UserKey, name: Option<&str>) -> AliasChange {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => {
                self.names.insert(user_id, name.to_string());
                AliasChange::Set(name.to_string())
            }
            None => match self.names.remove(&user_id) {
                Some(_) => AliasChange::Cleared,
                None => AliasChange::Unchanged,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// The parts of a Telegram user needed to name them on a roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserKey,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl From<&teloxide::types::User> for UserProfile {
    fn from(user: &teloxide::types::User) -> Self {
        Self {
            id: user.id.0 as i64,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
        }
    }
}

/// Plain name: alias, then full name, then `@username`, then the numeric id
pub fn plain_name(profile: &UserProfile, alias: Option<&str>) -> String {
    if let Some(alias) = alias.filter(|a| !a.trim().is_empty()) {
        return alias.trim().to_string();
    }

    let full_name = [Some(profile.first_name.as_str()), profile.last_name.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if !full_name.is_empty() {
        return full_name;
    }

    match profile.username.as_deref().filter(|u| !u.is_empty()) {
        Some(username) => format!("@{}", username),
        None => format!("id{}", profile.id),
    }
}

/// Markdown mention link stored on roster entries
pub fn display_name(profile: &UserProfile, alias: Option<&str>) -> String {
    format!("[{}](tg://user?id={})", plain_name(profile, alias), profile.id)
}
