//! Schema normalizer: raw channel sets into the fixed archive schema
//!
//! The streams endpoint returns a different channel set per activity (a Swim
//! has no watts, a trainer Ride has no latlng, and so on). The archive is one
//! uniform table, so every response is mapped to the same column set here:
//! absent channels become null columns, the paired latlng channel is split
//! into independent lat/lon, distance is converted to miles, and the activity
//! id and categorical type code are attached to every row.

use crate::error::{CacheError, Result};
use crate::models::activity::ActivityKind;
use crate::models::streams::{StreamRow, StreamSet};
use crate::models::METERS_PER_MILE;

/// Normalize one activity's raw streams into archive rows.
///
/// Fails with `EmptyStream` when the response has no samples and with
/// `Normalization` when a channel's length disagrees with `time`; both are
/// per-activity skips for the caller.
pub fn normalize(streams: &StreamSet, id: i64, kind: Option<ActivityKind>) -> Result<Vec<StreamRow>> {
    let time = match &streams.time {
        Some(channel) if !channel.data.is_empty() => &channel.data,
        _ => return Err(CacheError::EmptyStream { activity_id: id }),
    };
    let n = time.len();

    check_len(n, id, "latlng", streams.latlng.as_ref().map(|c| c.data.len()))?;
    check_len(n, id, "distance", streams.distance.as_ref().map(|c| c.data.len()))?;
    check_len(n, id, "altitude", streams.altitude.as_ref().map(|c| c.data.len()))?;
    check_len(
        n,
        id,
        "velocity_smooth",
        streams.velocity_smooth.as_ref().map(|c| c.data.len()),
    )?;
    check_len(n, id, "heartrate", streams.heartrate.as_ref().map(|c| c.data.len()))?;
    check_len(n, id, "cadence", streams.cadence.as_ref().map(|c| c.data.len()))?;
    check_len(n, id, "watts", streams.watts.as_ref().map(|c| c.data.len()))?;
    check_len(n, id, "temp", streams.temp.as_ref().map(|c| c.data.len()))?;
    check_len(n, id, "moving", streams.moving.as_ref().map(|c| c.data.len()))?;
    check_len(
        n,
        id,
        "grade_smooth",
        streams.grade_smooth.as_ref().map(|c| c.data.len()),
    )?;

    let code = kind.map(ActivityKind::code);
    let mut rows = Vec::with_capacity(n);

    for i in 0..n {
        let (lat, lon) = match &streams.latlng {
            Some(channel) => {
                let [lat, lon] = channel.data[i];
                (Some(lat), Some(lon))
            }
            None => (None, None),
        };

        rows.push(StreamRow {
            id,
            kind: code,
            time: time[i],
            distance: float_at(&streams.distance, i).map(|m| m / METERS_PER_MILE),
            altitude: float_at(&streams.altitude, i),
            velocity_smooth: float_at(&streams.velocity_smooth, i),
            heartrate: float_at(&streams.heartrate, i),
            cadence: float_at(&streams.cadence, i),
            watts: float_at(&streams.watts, i),
            temp: float_at(&streams.temp, i),
            moving: streams.moving.as_ref().map(|c| c.data[i]),
            grade_smooth: float_at(&streams.grade_smooth, i),
            lat,
            lon,
        });
    }

    Ok(rows)
}

fn float_at(
    channel: &Option<crate::models::streams::Channel<Option<f64>>>,
    i: usize,
) -> Option<f64> {
    channel.as_ref().and_then(|c| c.data[i])
}

fn check_len(expected: usize, id: i64, name: &str, actual: Option<usize>) -> Result<()> {
    match actual {
        Some(len) if len != expected => Err(CacheError::normalization(format!(
            "activity {}: channel '{}' has {} samples, expected {}",
            id, name, len, expected
        ))),
        _ => Ok(()),
    }
}
