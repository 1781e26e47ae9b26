use chrono::{DateTime, Utc};

use super::Metric;
use crate::models::Participant;

/// Counter value holding exactly at `at`.
///
/// Scans every participant, not only the in-window ones: a peer that
/// connected long before `at` and is still around must be counted even
/// though its connect event is outside the window.
pub fn baseline(participants: &[Participant], metric: Metric, at: DateTime<Utc>) -> i64 {
    participants
        .iter()
        .filter(|participant| match metric {
            Metric::Activity => participant.connected_at <= at,
            Metric::Completion => participant
                .completed_at
                .is_some_and(|completed_at| completed_at <= at),
        })
        .filter(|participant| participant.connected_after(at))
        .count() as i64
}
