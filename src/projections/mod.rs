//! Event replay projections.
//!
//! Per item and per [`Metric`]: tag the in-window participant events,
//! compute the counter at the window start from full history, then fold the
//! tagged events into a step series. [`item_count`] does the same over the
//! items' own registration instants.

pub mod baseline;
pub mod item_count;
pub mod series;
pub mod tagger;

use serde::Serialize;

pub use baseline::baseline;
pub use item_count::item_count_timeline;
pub use series::build_series;
pub use tagger::{tag_events, Tag, TaggedEvent};

use crate::models::{Participant, SeriesPoint};
use crate::window::Window;

/// Which participant counter a series tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Connected participants
    Activity,
    /// Connected participants that have completed
    Completion,
}

/// Full pipeline for one item and one metric
pub fn project(participants: &[Participant], metric: Metric, window: &Window) -> Vec<SeriesPoint> {
    let events = tag_events(participants, metric, window);
    // An empty window counts against `now`, which is where effective_start lands.
    let seed = baseline(participants, metric, window.effective_start());
    build_series(&events, seed)
}
