pub mod activity;
pub mod streams;

pub use activity::{ActivityKind, ActivityRecord};
pub use streams::{StreamRow, StreamSet};

/// Meters-per-mile divisor used for all distance columns.
///
/// The cache stores miles; the API delivers meters. The factor matches the
/// stored history, so it must not be "corrected" to 1609.344 without
/// rewriting both stores.
pub const METERS_PER_MILE: f64 = 1609.0;
