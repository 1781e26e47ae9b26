use chrono::{DateTime, Utc};
use tracing::debug;

use crate::errors::ReconstructError;
use crate::models::{Dashboard, ItemStats, Snapshot, WindowInfo};
use crate::projections::{item_count_timeline, project, Metric};
use crate::timestamps::format_timestamp;
use crate::window::{duration_from_secs, Window};

/// Rebuilds the dashboard series for one trailing window.
/// Holds no state between calls; `now` is captured once per call.
#[derive(Debug, Clone, Copy)]
pub struct TimelineReconstructor {
    window_secs: f64,
}

impl TimelineReconstructor {
    pub fn new(window_secs: f64) -> Self {
        Self { window_secs }
    }

    pub fn reconstruct(&self, snapshot: &Snapshot) -> Result<Dashboard, ReconstructError> {
        self.reconstruct_at(snapshot, Utc::now())
    }

    pub fn reconstruct_at(
        &self,
        snapshot: &Snapshot,
        now: DateTime<Utc>,
    ) -> Result<Dashboard, ReconstructError> {
        let window = Window::trailing(now, duration_from_secs(self.window_secs)?);
        debug!(
            start = %window.start,
            end = %window.end,
            items = snapshot.items.len(),
            "reconstructing timelines"
        );

        let items: Vec<ItemStats> = snapshot
            .items
            .iter()
            .map(|item| ItemStats {
                name: item.name.clone(),
                seeders: item.seeder_count,
                leechers: item.leecher_count,
                active: project(&item.participants, Metric::Activity, &window),
                completed: project(&item.participants, Metric::Completion, &window),
            })
            .collect();

        let registrations: Vec<DateTime<Utc>> =
            snapshot.items.iter().map(|item| item.registered_at).collect();
        let item_count = item_count_timeline(&registrations, &window);

        Ok(Dashboard {
            window: WindowInfo {
                start: format_timestamp(window.start),
                end: format_timestamp(window.end),
                seconds: self.window_secs,
            },
            labels: items.iter().map(|i| i.name.clone()).collect(),
            seeders: items.iter().map(|i| i.seeders).collect(),
            leechers: items.iter().map(|i| i.leechers).collect(),
            items,
            item_count,
            rejected: Vec::new(),
        })
    }
}
