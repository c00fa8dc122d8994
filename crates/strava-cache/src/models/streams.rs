//! Telemetry stream models
//!
//! `StreamSet` is the raw, per-activity response: a sparse set of named
//! channels whose presence depends on the activity type and the recording
//! device. `StreamRow` is one row of the archive's fixed schema; the
//! normalizer maps the former into the latter.

use serde::{Deserialize, Serialize};

/// One named channel from the streams endpoint (`key_by_type=true` shape).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub original_size: Option<usize>,
    #[serde(default)]
    pub series_type: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
}

impl<T> Channel<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data,
            original_size: None,
            series_type: None,
            resolution: None,
        }
    }
}

/// Raw telemetry response for one activity. Every channel is optional; the
/// numeric channels are nullable floats because the wire data mixes integers,
/// floats, and nulls per device.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamSet {
    #[serde(default)]
    pub time: Option<Channel<i64>>,
    #[serde(default)]
    pub latlng: Option<Channel<[f64; 2]>>,
    #[serde(default)]
    pub distance: Option<Channel<Option<f64>>>,
    #[serde(default)]
    pub altitude: Option<Channel<Option<f64>>>,
    #[serde(default)]
    pub velocity_smooth: Option<Channel<Option<f64>>>,
    #[serde(default)]
    pub heartrate: Option<Channel<Option<f64>>>,
    #[serde(default)]
    pub cadence: Option<Channel<Option<f64>>>,
    #[serde(default)]
    pub watts: Option<Channel<Option<f64>>>,
    #[serde(default)]
    pub temp: Option<Channel<Option<f64>>>,
    #[serde(default)]
    pub moving: Option<Channel<bool>>,
    #[serde(default)]
    pub grade_smooth: Option<Channel<Option<f64>>>,
}

/// One archived telemetry sample. The column set and types are identical for
/// every activity regardless of which channels the source returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamRow {
    /// Owning activity id
    pub id: i64,
    /// Categorical activity-type code; null for unencoded types
    pub kind: Option<i64>,
    /// Seconds offset from activity start
    pub time: i64,
    /// Distance in miles
    pub distance: Option<f64>,
    pub altitude: Option<f64>,
    pub velocity_smooth: Option<f64>,
    pub heartrate: Option<f64>,
    pub cadence: Option<f64>,
    pub watts: Option<f64>,
    pub temp: Option<f64>,
    pub moving: Option<bool>,
    pub grade_smooth: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}
