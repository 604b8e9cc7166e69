//! Records and the collections that hold them.
//!
//! A record is an untyped field map. The only key the system itself
//! interprets is `id`, which the server assigns when a record is created.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const ID_KEY: &str = "id";

/// Field map of a record, in submission order.
pub type Fields = Map<String, Value>;

/// The named collections a store holds.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CollectionName {
    #[serde(rename = "actors")]
    Actors,
    #[serde(rename = "requirements")]
    Requirements,
    #[serde(rename = "acceptanceCriteria")]
    AcceptanceCriteria,
}

impl CollectionName {
    pub const ALL: [CollectionName; 3] = [
        CollectionName::Actors,
        CollectionName::Requirements,
        CollectionName::AcceptanceCriteria,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionName::Actors => "actors",
            CollectionName::Requirements => "requirements",
            CollectionName::AcceptanceCriteria => "acceptanceCriteria",
        }
    }

    /// Resolve a path segment to a collection. Names are case sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted entity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Fields,
}

impl Record {
    /// Build a record carrying `id` as its first key. Any `id` already in
    /// `fields` is discarded.
    pub fn with_id(id: impl Into<String>, fields: Fields) -> Self {
        let mut out = Fields::with_capacity(fields.len() + 1);
        out.insert(ID_KEY.to_string(), Value::String(id.into()));
        for (key, value) in fields {
            if key != ID_KEY {
                out.insert(key, value);
            }
        }
        Self { fields: out }
    }

    /// The record id, when present and a string.
    pub fn id(&self) -> Option<&str> {
        self.fields.get(ID_KEY).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Text shown for `key` in a table cell or form input. Missing and null
    /// values render empty; non-string values render as JSON.
    pub fn display_value(&self, key: &str) -> String {
        match self.fields.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}
