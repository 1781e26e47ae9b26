use chrono::{DateTime, Utc};

use super::Metric;
use crate::models::Participant;
use crate::window::Window;

/// Effect of an event on the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Increase,
    Decrease,
    /// Window edge marker, no effect
    Boundary,
}

impl Tag {
    pub fn delta(&self) -> i64 {
        match self {
            Tag::Increase => 1,
            Tag::Decrease => -1,
            Tag::Boundary => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedEvent {
    pub at: DateTime<Utc>,
    pub tag: Tag,
}

impl TaggedEvent {
    fn new(at: DateTime<Utc>, tag: Tag) -> Self {
        Self { at, tag }
    }
}

/// Tags the in-window events of one item for `metric`.
///
/// The result starts with a boundary at the window start and ends with a
/// boundary at `now`, so it is never shorter than two events. Events in
/// between are in chronological order; events sharing an instant keep
/// their emission order (participant order, connect/complete before
/// disconnect), which is why the sort must be stable.
pub fn tag_events(
    participants: &[Participant],
    metric: Metric,
    window: &Window,
) -> Vec<TaggedEvent> {
    let mut events = vec![TaggedEvent::new(window.effective_start(), Tag::Boundary)];

    for participant in participants {
        match metric {
            Metric::Activity => {
                if window.is_recent(participant.connected_at) {
                    events.push(TaggedEvent::new(participant.connected_at, Tag::Increase));
                }
                if let Some(disconnected_at) = participant.disconnected_at {
                    if window.is_recent(disconnected_at) {
                        events.push(TaggedEvent::new(disconnected_at, Tag::Decrease));
                    }
                }
            }
            Metric::Completion => {
                // Peers that never completed do not move the completion counter at all
                let Some(completed_at) = participant.completed_at else {
                    continue;
                };
                if window.is_recent(completed_at) {
                    events.push(TaggedEvent::new(completed_at, Tag::Increase));
                }
                if let Some(disconnected_at) = participant.disconnected_at {
                    if window.is_recent(disconnected_at) {
                        events.push(TaggedEvent::new(disconnected_at, Tag::Decrease));
                    }
                }
            }
        }
    }

    // slice::sort_by_key is stable
    events.sort_by_key(|event| event.at);
    events.push(TaggedEvent::new(window.end, Tag::Boundary));
    events
}
