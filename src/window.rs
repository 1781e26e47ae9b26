//! Trailing time windows.
//!
//! A [`Window`] is computed once per reconstruction from a single captured
//! `now`; every recency check downstream goes through it so no component
//! re-reads the clock.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer};

use crate::errors::ReconstructError;

/// Trailing window ending at the reconstruction instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration: Duration,
}

impl Window {
    /// `start = now - duration`, `end = now`. Non-positive durations are
    /// accepted and produce an empty window.
    pub fn trailing(now: DateTime<Utc>, duration: Duration) -> Self {
        let start = now
            .checked_sub_signed(duration)
            .unwrap_or(if duration > Duration::zero() {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            });

        Self {
            start,
            end: now,
            duration,
        }
    }

    /// Window holds no events when it does not extend into the past
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Where the window begins for counting purposes. An empty window
    /// collapses onto `end`.
    pub fn effective_start(&self) -> DateTime<Utc> {
        self.start.min(self.end)
    }

    /// Elapsed-time recency test against the captured `now`: `now - at <= duration`.
    /// The start instant is included; instants after `now` count as recent.
    pub fn is_recent(&self, at: DateTime<Utc>) -> bool {
        !self.is_empty() && self.end.signed_duration_since(at) <= self.duration
    }
}

/// Converts a caller-supplied duration in seconds. NaN and infinities are
/// rejected; finite values beyond what chrono represents saturate.
pub fn duration_from_secs(secs: f64) -> Result<Duration, ReconstructError> {
    if !secs.is_finite() {
        return Err(ReconstructError::InvalidWindow(secs));
    }
    let millis = (secs * 1000.0).round();
    if millis >= i64::MAX as f64 {
        return Ok(Duration::MAX);
    }
    if millis <= -(i64::MAX as f64) {
        return Ok(Duration::MIN);
    }
    let saturated = if millis > 0.0 { Duration::MAX } else { Duration::MIN };
    Ok(Duration::try_milliseconds(millis as i64).unwrap_or(saturated))
}

/// Fixed windows offered by the dashboard.
/// Short format on the API: 1h, 1d, 1w, 1m, 1y
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowPreset {
    Hour1,
    Day1,
    Week1,
    Month1,
    Year1,
}

impl WindowPreset {
    pub fn seconds(&self) -> f64 {
        match self {
            WindowPreset::Hour1 => 3_600.0,
            WindowPreset::Day1 => 86_400.0,
            WindowPreset::Week1 => 604_800.0,
            WindowPreset::Month1 => 2_592_000.0,
            WindowPreset::Year1 => 31_536_000.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WindowPreset::Hour1 => "1h",
            WindowPreset::Day1 => "1d",
            WindowPreset::Week1 => "1w",
            WindowPreset::Month1 => "1m",
            WindowPreset::Year1 => "1y",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "1h" => Some(WindowPreset::Hour1),
            "1d" => Some(WindowPreset::Day1),
            "1w" => Some(WindowPreset::Week1),
            "1m" => Some(WindowPreset::Month1),
            "1y" => Some(WindowPreset::Year1),
            _ => None,
        }
    }
}

impl std::fmt::Display for WindowPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for WindowPreset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        WindowPreset::parse(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid window preset '{}', expected 1h, 1d, 1w, 1m or 1y",
                s
            ))
        })
    }
}
