//! Presentation helpers for the history list

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone, Utc};
use medchat_types::HistoryEntry;
use std::fmt::{self, Write};

pub const ELLIPSIS: &str = "...";
pub const USER_PREFIX: &str = "You: ";
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Formats used by [`relative_label`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLabelFormats {
    pub time: String,
    pub date: String,
}

impl Default for TimeLabelFormats {
    fn default() -> Self {
        Self {
            time: DEFAULT_TIME_FORMAT.to_string(),
            date: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Whether `format` is a strftime pattern chrono can render
pub fn is_valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Render `at` with `format`, or with `fallback` if `format` cannot be rendered
fn render<Tz>(at: &DateTime<Tz>, format: &str, fallback: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    if is_valid_format(format) && write!(out, "{}", at.format(format)).is_ok() {
        return out;
    }
    tracing::warn!(format, "Unusable time format, using default");
    at.format(fallback).to_string()
}

/// Keep at most `max_chars` characters, appending an ellipsis when cut
pub fn truncate_preview(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &content[..cut], ELLIPSIS),
        None => content.to_string(),
    }
}

/// Preview line for a history entry: the last message, truncated, marked
/// with [`USER_PREFIX`] when the user wrote it
pub fn preview(entry: &HistoryEntry, max_chars: usize) -> Option<String> {
    let last = entry.last_message()?;
    let text = truncate_preview(&last.content, max_chars);
    Some(if last.is_user() {
        format!("{}{}", USER_PREFIX, text)
    } else {
        text
    })
}

/// Label for `last_activity` relative to `now`, in `now`'s time zone.
///
/// Same calendar day gives the clock time, one day back "Yesterday",
/// two to six days back "N days ago", anything older the date.
pub fn relative_label<Tz>(now: &DateTime<Tz>, last_activity: DateTime<Utc>, formats: &TimeLabelFormats) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let local = last_activity.with_timezone(&now.timezone());
    let days = now
        .date_naive()
        .signed_duration_since(local.date_naive())
        .num_days();

    match days {
        // future timestamps (clock skew) read as today
        d if d <= 0 => render(&local, &formats.time, DEFAULT_TIME_FORMAT),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{} days ago", days),
        _ => render(&local, &formats.date, DEFAULT_DATE_FORMAT),
    }
}
