use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::errors::IngestError;
use crate::timestamps::format_timestamp;

/// Tracker data file as written by the tracker.
/// Entries stay untyped so one malformed record cannot fail the whole file.
#[derive(Debug, Deserialize, Default)]
pub struct RawSnapshot {
    #[serde(default)]
    pub torrents: Vec<Value>,
}

/// One hosted torrent, timestamps still in their serialized form
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub info_hash: Option<String>,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub seeders: u32,
    #[serde(default)]
    pub leechers: u32,
    #[serde(default)]
    pub peers: Vec<Value>,
}

impl RawItem {
    /// Display label: `name`, else the tracker's `info_hash`
    pub fn label(&self) -> Option<&str> {
        self.name.as_deref().or(self.info_hash.as_deref())
    }
}

/// One hosted peer. Identity fields other than `peer_id` are ignored.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawParticipant {
    #[serde(default)]
    pub peer_id: Option<Value>,
    #[serde(default)]
    pub dt_connection: Option<Value>,
    #[serde(default)]
    pub dt_disconnection: Option<Value>,
    #[serde(default)]
    pub dt_completion: Option<Value>,
}

/// Validated snapshot, read-only input of one reconstruction pass
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub items: Vec<Item>,
}

/// A tracked item and its participant history
#[derive(Debug, Clone)]
pub struct Item {
    pub name: String,
    pub seeder_count: u32,
    pub leecher_count: u32,
    pub registered_at: DateTime<Utc>,
    pub participants: Vec<Participant>,
}

/// Lifecycle of one participant. No disconnection means still active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participant {
    pub connected_at: DateTime<Utc>,
    pub disconnected_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Participant {
    pub fn connected(connected_at: DateTime<Utc>) -> Self {
        Self {
            connected_at,
            disconnected_at: None,
            completed_at: None,
        }
    }

    pub fn disconnected(mut self, at: DateTime<Utc>) -> Self {
        self.disconnected_at = Some(at);
        self
    }

    pub fn completed(mut self, at: DateTime<Utc>) -> Self {
        self.completed_at = Some(at);
        self
    }

    /// Still connected strictly after `at`
    pub fn connected_after(&self, at: DateTime<Utc>) -> bool {
        self.disconnected_at.map_or(true, |d| d > at)
    }
}

/// One point of a step series, serialized the way the charts read it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesPoint {
    pub at: DateTime<Utc>,
    pub count: i64,
}

impl Serialize for SeriesPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Point {
            x: String,
            y: i64,
        }

        Point {
            x: format_timestamp(self.at),
            y: self.count,
        }
        .serialize(serializer)
    }
}

/// Window bounds echoed in the response
#[derive(Debug, Serialize, Clone)]
pub struct WindowInfo {
    pub start: String,
    pub end: String,
    pub seconds: f64,
}

/// Per-item output
#[derive(Debug, Serialize, Clone)]
pub struct ItemStats {
    pub name: String,
    pub seeders: u32,
    pub leechers: u32,
    pub active: Vec<SeriesPoint>,
    pub completed: Vec<SeriesPoint>,
}

/// Everything the dashboard charts need for one window
#[derive(Debug, Serialize, Clone)]
pub struct Dashboard {
    pub window: WindowInfo,
    pub labels: Vec<String>,
    pub seeders: Vec<u32>,
    pub leechers: Vec<u32>,
    pub items: Vec<ItemStats>,
    pub item_count: Vec<SeriesPoint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<IngestError>,
}
