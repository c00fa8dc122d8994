//! Activity metadata models
//!
//! `ActivityRecord` is both the wire shape of a Strava summary activity and a
//! ledger row: the API's snake_case JSON and the CSV header share field names,
//! so one serde definition serves both. The only field that changes meaning
//! between wire and ledger is `distance` (meters on the wire, miles at rest).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Categorical encoding for activity types shared by the ledger's `type`
/// strings and the archive's numeric `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Run,
    Walk,
    Hike,
    Ride,
    Swim,
    Workout,
    VirtualRide,
    AlpineSki,
}

impl ActivityKind {
    /// Map a Strava type key to its categorical kind, if it is one of the
    /// encoded kinds. Anything else archives as a missing value.
    pub fn from_type_key(key: &str) -> Option<Self> {
        match key {
            "Run" => Some(Self::Run),
            "Walk" => Some(Self::Walk),
            "Hike" => Some(Self::Hike),
            "Ride" => Some(Self::Ride),
            "Swim" => Some(Self::Swim),
            "Workout" => Some(Self::Workout),
            "VirtualRide" => Some(Self::VirtualRide),
            "AlpineSki" => Some(Self::AlpineSki),
            _ => None,
        }
    }

    /// Numeric code stored in the archive's `type` column.
    pub fn code(self) -> i64 {
        match self {
            Self::Run => 1,
            Self::Walk => 2,
            Self::Hike => 3,
            Self::Ride => 4,
            Self::Swim => 5,
            Self::Workout => 6,
            Self::VirtualRide => 7,
            Self::AlpineSki => 8,
        }
    }
}

/// One activity, as fetched from the activity list and as stored in the
/// ledger CSV. Ordered by `start_date` ascending in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Unique activity identifier
    pub id: i64,

    /// User-provided or auto-generated activity name
    #[serde(default)]
    pub name: Option<String>,

    /// Activity type key (e.g. "Run", "Ride", "VirtualRide")
    #[serde(rename = "type", default)]
    pub activity_type: Option<String>,

    /// Start time in UTC (ISO 8601)
    pub start_date: DateTime<Utc>,

    /// Start time in the activity's local timezone
    #[serde(default)]
    pub start_date_local: Option<DateTime<Utc>>,

    /// Distance: meters on the wire, miles once ingested
    #[serde(default)]
    pub distance: f64,

    #[serde(default)]
    pub moving_time: Option<i64>,
    #[serde(default)]
    pub elapsed_time: Option<i64>,
    #[serde(default)]
    pub total_elevation_gain: Option<f64>,
    #[serde(default)]
    pub elev_high: Option<f64>,
    #[serde(default)]
    pub elev_low: Option<f64>,

    #[serde(default)]
    pub average_speed: Option<f64>,
    #[serde(default)]
    pub max_speed: Option<f64>,
    #[serde(default)]
    pub average_cadence: Option<f64>,
    #[serde(default)]
    pub average_temp: Option<f64>,
    #[serde(default)]
    pub average_heartrate: Option<f64>,
    #[serde(default)]
    pub max_heartrate: Option<f64>,
    #[serde(default)]
    pub average_watts: Option<f64>,
    #[serde(default)]
    pub max_watts: Option<f64>,
    #[serde(default)]
    pub weighted_average_watts: Option<f64>,
    #[serde(default)]
    pub kilojoules: Option<f64>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub suffer_score: Option<f64>,

    #[serde(default)]
    pub achievement_count: Option<i64>,
    #[serde(default)]
    pub athlete_count: Option<i64>,
    #[serde(default)]
    pub comment_count: Option<i64>,
    #[serde(default)]
    pub kudos_count: Option<i64>,
    #[serde(default)]
    pub photo_count: Option<i64>,
    #[serde(default)]
    pub total_photo_count: Option<i64>,
    #[serde(default)]
    pub pr_count: Option<i64>,
    #[serde(default)]
    pub workout_type: Option<i64>,
    #[serde(default)]
    pub upload_id: Option<i64>,

    #[serde(default)]
    pub commute: Option<bool>,
    #[serde(default)]
    pub trainer: Option<bool>,
    #[serde(default)]
    pub manual: Option<bool>,
    #[serde(default)]
    pub private: Option<bool>,
    #[serde(default)]
    pub flagged: Option<bool>,
    #[serde(default)]
    pub has_heartrate: Option<bool>,
    #[serde(default)]
    pub device_watts: Option<bool>,

    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub gear_id: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub location_city: Option<String>,
    #[serde(default)]
    pub location_state: Option<String>,
    #[serde(default)]
    pub location_country: Option<String>,
}

impl ActivityRecord {
    /// Display-friendly name for progress lines
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed Activity")
    }

    /// Categorical kind of this activity, if its type key is encoded
    pub fn kind(&self) -> Option<ActivityKind> {
        self.activity_type
            .as_deref()
            .and_then(ActivityKind::from_type_key)
    }
}
