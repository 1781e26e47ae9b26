use super::tagger::TaggedEvent;
use crate::models::SeriesPoint;

/// Folds tagged events into a step series seeded with `baseline`.
///
/// The first event carries the seed unchanged; each later event moves the
/// counter by its tag's delta. One point per event, boundaries included.
/// The counter may go negative on inconsistent input.
pub fn build_series(events: &[TaggedEvent], baseline: i64) -> Vec<SeriesPoint> {
    let mut points: Vec<SeriesPoint> = Vec::with_capacity(events.len());
    let mut counter = baseline;

    for (idx, event) in events.iter().enumerate() {
        if idx > 0 {
            counter += event.tag.delta();
        }
        debug_assert!(points.last().map_or(true, |prev| (counter - prev.count).abs() <= 1));
        points.push(SeriesPoint {
            at: event.at,
            count: counter,
        });
    }

    points
}
