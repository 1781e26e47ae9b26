use chrono::{DateTime, Utc};

use crate::models::SeriesPoint;
use crate::window::Window;

/// Number of registered items over the window.
///
/// Registration instants are merged with two sentinels (window start, then
/// `now`) and stably sorted, items first on ties. Each entry's value is its
/// position in that merged order, so the start sentinel reports how many
/// items came before the window and every later registration adds one.
/// Entries before the window start are dropped. The last entry always
/// reports its position minus one, which discounts the start sentinel's own
/// slot.
pub fn item_count_timeline(registrations: &[DateTime<Utc>], window: &Window) -> Vec<SeriesPoint> {
    let start = window.effective_start();

    let mut instants: Vec<DateTime<Utc>> = Vec::with_capacity(registrations.len() + 2);
    instants.extend_from_slice(registrations);
    instants.push(start);
    instants.push(window.end);
    instants.sort();

    let last = instants.len() - 1;
    instants
        .iter()
        .enumerate()
        .filter_map(|(idx, &at)| {
            if idx == last {
                Some(SeriesPoint {
                    at,
                    count: idx as i64 - 1,
                })
            } else if at >= start {
                Some(SeriesPoint {
                    at,
                    count: idx as i64,
                })
            } else {
                None
            }
        })
        .collect()
}
