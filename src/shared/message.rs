/**
 * Message Data Structure
 *
 * This module defines the Message struct broadcast to every connected client
 * and kept in the history buffer, along with the helpers that normalize the
 * untrusted `author` and `date` fields supplied by clients.
 *
 * The `content` field always holds HTML that has already gone through the
 * rendering pipeline. Nothing downstream sanitizes it again.
 */
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Seconds since the Unix epoch for 1987-11-13T00:00:00Z.
const SENTINEL_EPOCH_SECS: i64 = 563_760_000;

/// Discriminator carried in the `type` field of every chat message
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Message,
}

/// Represents a single accepted chat message
///
/// Serialized to JSON exactly as clients receive it:
///
/// ```json
/// {"type":"message","content":"<p>hi</p>","author":"Alice","date":"1987-11-13T00:00:00.000Z"}
/// ```
///
/// # Fields
/// * `kind` - Always [`MessageKind::Message`], serialized as `type`
/// * `content` - Rendered, sanitized HTML
/// * `author` - Display name, already truncated
/// * `date` - UTC timestamp, millisecond precision on the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    pub author: String,
    #[serde(with = "wire_date")]
    pub date: DateTime<Utc>,
}

impl Message {
    /// Create a message from already rendered content
    ///
    /// # Example
    /// ```rust
    /// use limechat::shared::message::{sentinel_date, Message};
    ///
    /// let message = Message::new("<p>hi</p>".to_string(), "Alice".to_string(), sentinel_date());
    /// assert_eq!(message.author, "Alice");
    /// ```
    pub fn new(content: String, author: String, date: DateTime<Utc>) -> Self {
        Self {
            kind: MessageKind::Message,
            content,
            author,
            date,
        }
    }
}

/// The placeholder date used when a client supplies no usable date
///
/// It marks "no date supplied" and carries no chronological meaning.
pub fn sentinel_date() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(SENTINEL_EPOCH_SECS, 0).unwrap_or_default()
}

/// Keep at most `max` characters of `text`
///
/// Counts Unicode scalar values so the cut never lands inside a character.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Interpret a client-supplied `date` value
///
/// Accepts RFC 3339 strings, naive ISO date-times (taken as UTC), bare
/// `YYYY-MM-DD` and `MM/DD/YYYY` dates, and epoch milliseconds. Anything
/// else yields `None` so the caller can fall back to [`sentinel_date`].
pub fn parse_client_date(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::String(raw) => parse_date_str(raw.trim()),
        serde_json::Value::Number(number) => {
            let millis = number
                .as_i64()
                .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))?;
            DateTime::<Utc>::from_timestamp_millis(millis)
        }
        _ => None,
    }
}

fn parse_date_str(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    ["%Y-%m-%d", "%m/%d/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// ISO-8601 with milliseconds and a `Z` suffix, as browsers print dates.
mod wire_date {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|date| date.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
