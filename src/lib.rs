//! Swarm tracker dashboard.
//!
//! Replays each torrent's peer connect, disconnect and completion events
//! into step series over a trailing window, and serves them as JSON for the
//! tracker's chart page.

pub mod api;
pub mod config;
pub mod errors;
pub mod ingest;
pub mod models;
pub mod projections;
pub mod reconstruct;
pub mod timestamps;
pub mod window;


pub use errors::{IngestError, ReconstructError};
pub use ingest::{ingest, Ingested};
pub use models::{Dashboard, Item, ItemStats, Participant, SeriesPoint, Snapshot};
pub use reconstruct::TimelineReconstructor;
