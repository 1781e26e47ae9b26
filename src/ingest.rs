//! Raw tracker records into validated snapshot records.
//!
//! A peer without a connection time is dropped; a missing or unparseable
//! field anywhere else in an item drops the whole item. Either way the
//! refusal is reported and the remaining items go through.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::errors::IngestError;
use crate::models::{Item, Participant, RawItem, RawParticipant, RawSnapshot, Snapshot};
use crate::timestamps::parse_timestamp;

/// Outcome of ingesting a raw snapshot
#[derive(Debug, Default)]
pub struct Ingested {
    pub snapshot: Snapshot,
    pub rejected: Vec<IngestError>,
}

pub fn ingest(raw: RawSnapshot) -> Ingested {
    let mut ingested = Ingested::default();

    for (idx, entry) in raw.torrents.into_iter().enumerate() {
        let mut dropped = Vec::new();
        match ingest_item(idx, entry, &mut dropped) {
            Ok(item) => {
                ingested.snapshot.items.push(item);
                // Dropped peers only matter once the item itself survives
                for e in dropped {
                    report(e, &mut ingested.rejected);
                }
            }
            Err(e) => report(e, &mut ingested.rejected),
        }
    }

    ingested
}

fn report(e: IngestError, rejected: &mut Vec<IngestError>) {
    let scope = if e.rejects_item() { "item" } else { "peer" };
    warn!(item = e.item(), scope, "{}", e);
    rejected.push(e);
}

fn ingest_item(
    idx: usize,
    entry: Value,
    dropped: &mut Vec<IngestError>,
) -> Result<Item, IngestError> {
    let raw: RawItem = match serde_json::from_value(entry.clone()) {
        Ok(raw) => raw,
        Err(e) => {
            return Err(IngestError::MalformedInput {
                item: fallback_label(idx, &entry),
                field: "record".to_string(),
                value: e.to_string(),
            })
        }
    };

    let Some(name) = raw.label().map(str::to_string) else {
        return Err(IngestError::MissingItemField {
            item: fallback_label(idx, &entry),
            field: "name".to_string(),
        });
    };

    let Some(timestamp) = raw.timestamp.as_ref().filter(|v| !v.is_null()) else {
        return Err(IngestError::MissingItemField {
            item: name,
            field: "timestamp".to_string(),
        });
    };
    let registered_at = parse_value(&name, "timestamp", timestamp)?;

    let mut participants = Vec::with_capacity(raw.peers.len());
    for peer in raw.peers {
        let parsed: RawParticipant = match serde_json::from_value(peer.clone()) {
            Ok(parsed) => parsed,
            Err(_) => {
                return Err(IngestError::MalformedInput {
                    item: name,
                    field: "peers".to_string(),
                    value: peer.to_string(),
                })
            }
        };
        match ingest_participant(&name, &parsed)? {
            Some(participant) => participants.push(participant),
            None => dropped.push(IngestError::MissingRequiredField {
                item: name.clone(),
                field: "dt_connection".to_string(),
            }),
        }
    }

    Ok(Item {
        name,
        seeder_count: raw.seeders,
        leecher_count: raw.leechers,
        registered_at,
        participants,
    })
}

fn ingest_participant(
    item: &str,
    raw: &RawParticipant,
) -> Result<Option<Participant>, IngestError> {
    let Some(connection) = raw.dt_connection.as_ref() else {
        return Ok(None);
    };

    let mut participant = Participant::connected(parse_value(item, "dt_connection", connection)?);
    if let Some(at) = parse_optional(item, "dt_disconnection", raw.dt_disconnection.as_ref())? {
        participant = participant.disconnected(at);
    }
    if let Some(at) = parse_optional(item, "dt_completion", raw.dt_completion.as_ref())? {
        participant = participant.completed(at);
    }

    if participant.disconnected_at.is_some_and(|d| d < participant.connected_at)
        || participant.completed_at.is_some_and(|c| c < participant.connected_at)
    {
        warn!(
            item,
            peer_id = ?raw.peer_id,
            "peer has an event before its connection, counters may dip"
        );
    }

    Ok(Some(participant))
}

/// Label used in refusals for entries whose own label is unusable
fn fallback_label(idx: usize, entry: &Value) -> String {
    ["name", "info_hash"]
        .into_iter()
        .find_map(|key| entry.get(key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{}", idx))
}

fn parse_value(item: &str, field: &str, value: &Value) -> Result<DateTime<Utc>, IngestError> {
    value
        .as_str()
        .and_then(|text| parse_timestamp(text).ok())
        .ok_or_else(|| IngestError::MalformedInput {
            item: item.to_string(),
            field: field.to_string(),
            value: match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            },
        })
}

fn parse_optional(
    item: &str,
    field: &str,
    value: Option<&Value>,
) -> Result<Option<DateTime<Utc>>, IngestError> {
    value.map(|v| parse_value(item, field, v)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_item(name: &str, peers: Vec<Value>) -> Value {
        json!({
            "info_hash": name,
            "timestamp": "2022-06-10T10:00:00+00:00",
            "seeders": 1,
            "leechers": 2,
            "peers": peers,
        })
    }

    fn peer(connection: Option<&str>) -> Value {
        json!({ "peer_id": "-AR1234-111111111111", "dt_connection": connection })
    }

    fn snapshot(torrents: Vec<Value>) -> RawSnapshot {
        RawSnapshot { torrents }
    }

    #[test]
    fn test_ingest_valid_item() {
        let completed = json!({
            "dt_connection": "2022-06-10T10:05:00+00:00",
            "dt_completion": "2022-06-10T10:30:00+00:00",
            "dt_disconnection": "2022-06-10T11:00:00+00:00",
        });
        let ingested = ingest(snapshot(vec![raw_item("abc", vec![completed])]));

        assert!(ingested.rejected.is_empty());
        let item = &ingested.snapshot.items[0];
        assert_eq!(item.name, "abc");
        assert_eq!(item.seeder_count, 1);
        assert_eq!(item.leecher_count, 2);
        assert!(item.participants[0].completed_at.is_some());
        assert!(item.participants[0].disconnected_at.is_some());
    }

    #[test]
    fn test_peer_without_connection_is_dropped() {
        let peers = vec![peer(None), peer(Some("2022-06-10T10:05:00Z"))];
        let ingested = ingest(snapshot(vec![raw_item("abc", peers)]));

        assert_eq!(ingested.snapshot.items[0].participants.len(), 1);
        assert_eq!(ingested.rejected.len(), 1);
        assert!(!ingested.rejected[0].rejects_item());
    }

    #[test]
    fn test_malformed_timestamp_rejects_only_that_item() {
        let bad = json!({
            "dt_connection": "2022-06-10T10:05:00Z",
            "dt_disconnection": "not a date",
        });
        let ingested = ingest(snapshot(vec![
            raw_item("bad", vec![bad, peer(None)]),
            raw_item("good", vec![peer(Some("2022-06-10T10:05:00Z"))]),
        ]));

        assert_eq!(ingested.snapshot.items.len(), 1);
        assert_eq!(ingested.snapshot.items[0].name, "good");
        assert_eq!(
            ingested.rejected,
            vec![IngestError::MalformedInput {
                item: "bad".to_string(),
                field: "dt_disconnection".to_string(),
                value: "not a date".to_string(),
            }]
        );
    }

    #[test]
    fn test_malformed_registration_rejects_item() {
        let mut item = raw_item("abc", vec![]);
        item["timestamp"] = json!("");
        let ingested = ingest(snapshot(vec![item]));

        assert!(ingested.snapshot.items.is_empty());
        assert!(ingested.rejected[0].rejects_item());
    }

    #[test]
    fn test_missing_registration_rejects_only_that_item() {
        let json = r#"{"torrents":[
            {"info_hash":"good","timestamp":"2022-06-10T10:00:00+00:00","peers":[]},
            {"info_hash":"undated","peers":[]}]}"#;
        let raw: RawSnapshot = serde_json::from_str(json).unwrap();
        let ingested = ingest(raw);

        assert_eq!(ingested.snapshot.items.len(), 1);
        assert_eq!(ingested.snapshot.items[0].name, "good");
        assert_eq!(
            ingested.rejected,
            vec![IngestError::MissingItemField {
                item: "undated".to_string(),
                field: "timestamp".to_string(),
            }]
        );
    }

    #[test]
    fn test_non_string_connection_rejects_only_that_item() {
        let json = r#"{"torrents":[
            {"info_hash":"numeric","timestamp":"2022-06-10T10:00:00Z",
             "peers":[{"dt_connection":12345}]},
            {"info_hash":"good","timestamp":"2022-06-10T10:00:00Z",
             "peers":[{"dt_connection":"2022-06-10T10:01:00Z"}]}]}"#;
        let raw: RawSnapshot = serde_json::from_str(json).unwrap();
        let ingested = ingest(raw);

        assert_eq!(ingested.snapshot.items.len(), 1);
        assert_eq!(ingested.snapshot.items[0].participants.len(), 1);
        assert_eq!(
            ingested.rejected,
            vec![IngestError::MalformedInput {
                item: "numeric".to_string(),
                field: "dt_connection".to_string(),
                value: "12345".to_string(),
            }]
        );
    }

    #[test]
    fn test_wrongly_typed_record_rejects_only_that_item() {
        let mut negative = raw_item("negative", vec![]);
        negative["seeders"] = json!(-1);
        let ingested = ingest(snapshot(vec![
            negative,
            json!(42),
            json!({ "info_hash": "loose", "timestamp": "2022-06-10T10:00:00Z", "peers": [7] }),
            raw_item("good", vec![]),
        ]));

        assert_eq!(ingested.snapshot.items.len(), 1);
        assert_eq!(ingested.snapshot.items[0].name, "good");
        let items: Vec<&str> = ingested.rejected.iter().map(|e| e.item()).collect();
        assert_eq!(items, vec!["negative", "#1", "loose"]);
        assert!(ingested.rejected.iter().all(|e| e.rejects_item()));
    }

    #[test]
    fn test_name_preferred_over_info_hash() {
        let mut both = raw_item("f07e0b05", vec![]);
        both["name"] = json!("ubuntu.iso");
        let ingested = ingest(snapshot(vec![both]));

        assert!(ingested.rejected.is_empty());
        assert_eq!(ingested.snapshot.items[0].name, "ubuntu.iso");
    }

    #[test]
    fn test_unlabelled_item_is_rejected() {
        let ingested = ingest(snapshot(vec![json!({ "timestamp": "2022-06-10T10:00:00Z" })]));

        assert!(ingested.snapshot.items.is_empty());
        assert_eq!(
            ingested.rejected,
            vec![IngestError::MissingItemField {
                item: "#0".to_string(),
                field: "name".to_string(),
            }]
        );
    }

    #[test]
    fn test_tracker_json_shape() {
        let json = r#"{"torrents":[{"info_hash":"f07e0b05",
            "timestamp":"2022-06-10T10:00:00.123+00:00","seeders":1,"leechers":0,
            "peers":[{"peer_id":"-AR1234-111111111111","peer_ip":"127.0.0.1","port":8080,
            "dt_connection":"2022-06-10T10:01:00+00:00","dt_disconnection":null,
            "completed":true,"dt_completion":"2022-06-10T10:01:00+00:00"}]}]}"#;
        let raw: RawSnapshot = serde_json::from_str(json).unwrap();
        let ingested = ingest(raw);

        assert!(ingested.rejected.is_empty());
        assert_eq!(ingested.snapshot.items[0].name, "f07e0b05");
        assert_eq!(ingested.snapshot.items[0].participants[0].disconnected_at, None);
    }
}
