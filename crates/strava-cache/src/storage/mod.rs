//! Storage layer for the two persistent stores
//!
//! - **Activity ledger**: a CSV table of activity metadata, small enough to
//!   rewrite in full on every merge. Owned by [`ActivityLedger`].
//! - **Stream archive**: a ZSTD-compressed Parquet table of per-second
//!   telemetry rows across all activities, append-only between runs. Owned by
//!   [`StreamArchive`].
//!
//! The stores are independent files; only the sync orchestrator sequences
//! them, and nothing here defends against concurrent writers.
//!
//! Parquet files are replaced atomically (temp file + rename), so an external
//! reader never sees a half-written archive. The archive stays queryable by
//! column, e.g. with DuckDB:
//!
//! ```sql
//! SELECT heartrate, watts FROM 'streams.parquet' WHERE id = 321934;
//! ```

mod archive;
mod ledger;

pub use archive::{ArchiveWriter, StreamArchive};
pub use ledger::{ActivityLedger, EPOCH_SENTINEL};
