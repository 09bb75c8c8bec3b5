//! Command argument parsing
//!
//! Turns the free text after `/new` into a date, optional price/duration/capacity
//! overrides and the announcement title.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use crate::config::RosterConfig;
use crate::utils::errors::{RosterBuddyError, Result};

/// Prefixes of the inline override tokens, e.g. `₽1000 ч.2 max.10`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPrefixes {
    pub price: String,
    pub hours: String,
    pub capacity: String,
}

impl From<&RosterConfig> for TokenPrefixes {
    fn from(config: &RosterConfig) -> Self {
        Self {
            price: config.price_token_prefix.clone(),
            hours: config.hours_token_prefix.clone(),
            capacity: config.capacity_token_prefix.clone(),
        }
    }
}

impl Default for TokenPrefixes {
    fn default() -> Self {
        Self::from(&RosterConfig::default())
    }
}

/// Parsed `/new` arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEventArgs {
    pub date: NaiveDate,
    pub title: String,
    pub hourly_rate: Option<u32>,
    pub duration_hours: Option<u32>,
    pub capacity: Option<u32>,
}

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})(?:\.(\d{1,2})(?:\.(\d{4}|\d{2}))?)?\.?$").expect("valid date pattern")
});

/// Parse the date argument of `/new`.
///
/// `D` is a day of the current month, `D.M` a day of the current year;
/// `D.M.YY`, `D.M.YYYY` and ISO `YYYY-MM-DD` are absolute.
pub fn parse_event_date(arg: &str, today: NaiveDate) -> Option<NaiveDate> {
    let arg = arg.trim();

    if let Ok(date) = NaiveDate::parse_from_str(arg, "%Y-%m-%d") {
        return Some(date);
    }

    let captures = DATE_PATTERN.captures(arg)?;
    let day: u32 = captures.get(1)?.as_str().parse().ok()?;
    let month: u32 = match captures.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => today.month(),
    };
    let year: i32 = match captures.get(3) {
        Some(y) if y.as_str().len() == 2 => 2000 + y.as_str().parse::<i32>().ok()?,
        Some(y) => y.as_str().parse().ok()?,
        None => today.year(),
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Value of a `<prefix><positive integer>` token
fn override_value(token: &str, prefix: &str) -> Option<u32> {
    token
        .strip_prefix(prefix)?
        .parse::<u32>()
        .ok()
        .filter(|value| *value > 0)
}

/// Split `/new` arguments into date, overrides and title.
///
/// Recognized override tokens are removed from the title. A token with a known
/// prefix but an unusable value keeps the default and stays in the title.
pub fn parse_new_event_args(text: &str, today: NaiveDate, prefixes: &TokenPrefixes) -> Result<NewEventArgs> {
    let mut tokens = text.split_whitespace();
    let date_arg = tokens
        .next()
        .ok_or_else(|| RosterBuddyError::InvalidInput("missing date".to_string()))?;
    let date = parse_event_date(date_arg, today)
        .ok_or_else(|| RosterBuddyError::InvalidInput(format!("invalid date: {}", date_arg)))?;

    let mut args = NewEventArgs {
        date,
        title: String::new(),
        hourly_rate: None,
        duration_hours: None,
        capacity: None,
    };
    let mut title_words = Vec::new();

    for token in tokens {
        if let Some(value) = override_value(token, &prefixes.price) {
            args.hourly_rate = Some(value);
        } else if let Some(value) = override_value(token, &prefixes.hours) {
            args.duration_hours = Some(value);
        } else if let Some(value) = override_value(token, &prefixes.capacity) {
            args.capacity = Some(value);
        } else {
            title_words.push(token);
        }
    }

    args.title = title_words.join(" ");
    Ok(args)
}
