use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// External identifier of a track, opaque to the service.
///
/// Snapshots carry either strings (e.g. streaming ids) or JSON numbers, and
/// the id is echoed back exactly as it was loaded. Numbers are kept as
/// `serde_json::Number`, so floats like `1.0` and ids beyond `i64` survive.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackId {
    Numeric(Number),
    Text(String),
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackId::Numeric(id) => write!(f, "{}", id),
            TrackId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<&str> for TrackId {
    fn from(value: &str) -> Self {
        TrackId::Text(value.to_owned())
    }
}

impl From<i64> for TrackId {
    fn from(value: i64) -> Self {
        TrackId::Numeric(Number::from(value))
    }
}

impl From<Number> for TrackId {
    fn from(value: Number) -> Self {
        TrackId::Numeric(value)
    }
}

/// A single catalog entry. Serializes with the field names of the HTTP API.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TrackRecord {
    #[serde(rename = "track_name")]
    pub name: String,
    #[serde(rename = "track_id")]
    pub id: TrackId,
    #[serde(rename = "emotions")]
    pub labels: String,
}

impl TrackRecord {
    pub fn new<N: Into<String>, I: Into<TrackId>, L: Into<String>>(
        name: N,
        id: I,
        labels: L,
    ) -> TrackRecord {
        TrackRecord {
            name: name.into(),
            id: id.into(),
            labels: labels.into(),
        }
    }
}
