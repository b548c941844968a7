use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Fields of an export record the report looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    WeMet,
    Match,
    Chats,
    Like,
    Block,
}

impl Field {
    pub fn key(self) -> &'static str {
        match self {
            Field::WeMet => "we_met",
            Field::Match => "match",
            Field::Chats => "chats",
            Field::Like => "like",
            Field::Block => "block",
        }
    }
}

/// Whether an outgoing like carried a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeKind {
    WithMessage,
    NoMessage,
}

/// One interaction with another user, as found in the export.
///
/// Every field is optional and presence is what matters, so the record
/// keeps the raw object (in document order) and answers presence queries.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct InteractionRecord {
    fields: Map<String, Value>,
}

impl InteractionRecord {
    pub fn has(&self, field: Field) -> bool {
        self.fields.contains_key(field.key())
    }

    pub fn signature(&self) -> FieldSignature {
        FieldSignature(self.fields.keys().cloned().collect())
    }

    /// Number of chat messages, zero when the record has no `chats`.
    ///
    /// A string or object in place of the message list counts its
    /// characters or keys; scalars are an error.
    pub fn chat_count(&self) -> Result<usize> {
        match self.fields.get(Field::Chats.key()) {
            None => Ok(0),
            Some(Value::Array(messages)) => Ok(messages.len()),
            Some(Value::String(text)) => Ok(text.chars().count()),
            Some(Value::Object(entries)) => Ok(entries.len()),
            Some(other) => Err(anyhow!(
                "`chats` should be a list of messages, found {}",
                json_type(other)
            )),
        }
    }

    /// Messages under `chats`, empty unless it is a list.
    pub fn chat_messages(&self) -> &[Value] {
        match self.fields.get(Field::Chats.key()) {
            Some(Value::Array(messages)) => messages,
            _ => &[],
        }
    }

    /// Text bodies of the chat messages, skipping entries without one.
    pub fn chat_bodies(&self) -> impl Iterator<Item = &str> {
        self.chat_messages()
            .iter()
            .filter_map(|message| message.get("body").and_then(Value::as_str))
    }

    /// Raw `timestamp` of the first event under `field`, if it has a
    /// non-empty one.
    pub fn first_timestamp(&self, field: Field) -> Option<&str> {
        self.fields
            .get(field.key())?
            .as_array()?
            .first()?
            .get("timestamp")?
            .as_str()
            .filter(|ts| !ts.is_empty())
    }

    /// Parsed `timestamp` of the first event under `field`.
    pub fn event_time(&self, field: Field) -> Option<NaiveDateTime> {
        self.first_timestamp(field).and_then(parse_timestamp)
    }

    /// The time used to place the record in a date range: the like, else
    /// the match, else the block.
    pub fn interaction_time(&self) -> Option<NaiveDateTime> {
        [Field::Like, Field::Match, Field::Block]
            .into_iter()
            .find_map(|field| self.first_timestamp(field))
            .and_then(parse_timestamp)
    }

    /// Classifies the like sent on this record by its first like entry.
    ///
    /// Returns `Ok(None)` when the record has no `like`. The export nests
    /// entries as `like[0].like[0]`; any break in that chain is an error.
    pub fn like_kind(&self) -> Result<Option<LikeKind>> {
        let Some(events) = self.fields.get(Field::Like.key()) else {
            return Ok(None);
        };

        let first_event = events
            .as_array()
            .ok_or_else(|| anyhow!("`like` should be a list, found {}", json_type(events)))?
            .first()
            .ok_or_else(|| anyhow!("`like` is an empty list"))?;

        let entries = first_event
            .get("like")
            .ok_or_else(|| anyhow!("first like event has no `like` key"))?;

        let first_entry = entries
            .as_array()
            .ok_or_else(|| anyhow!("`like[0].like` should be a list, found {}", json_type(entries)))?
            .first()
            .ok_or_else(|| anyhow!("`like[0].like` is an empty list"))?
            .as_object()
            .ok_or_else(|| anyhow!("`like[0].like[0]` should be an object"))?;

        if first_entry.contains_key("comment") {
            Ok(Some(LikeKind::WithMessage))
        } else {
            Ok(Some(LikeKind::NoMessage))
        }
    }
}

/// Parses export timestamps. Offsets are normalised to UTC; naive
/// timestamps are taken as wall-clock time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// The ordered field names of one record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldSignature(pub Vec<String>);

impl FieldSignature {
    pub fn fields(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for FieldSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, name) in self.fields().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", quote_field_name(name))?;
        }
        // one-element tuples keep their trailing comma
        if self.fields().len() == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}

/// Quotes a field name as a string literal: single quotes unless the name
/// only contains single quotes, with backslash escapes.
fn quote_field_name(name: &str) -> String {
    let quote = if name.contains('\'') && !name.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(name.len() + 2);
    out.push(quote);
    for c in name.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || (0x7f..=0xa0).contains(&(c as u32)) => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
