//! Sync engine for incremental activity and stream synchronization
//!
//! Drives the end-to-end sequence: load the ledger, fetch the activity delta
//! after the resume cursor, merge and persist, then walk the ledger appending
//! telemetry for activities the archive has not seen. Fetches are strictly
//! sequential; the API's rate limits make parallel fetching a liability.
//!
//! Per-activity telemetry failures (network, malformed response, empty
//! stream) are logged and skipped; only ledger corruption and archive
//! open/write failures abort a run. A skipped activity stays absent from the
//! archive and is retried on the next invocation.

use crate::client::{AccessToken, StravaClient};
use crate::config::CachePaths;
use crate::error::Result;
use crate::models::{ActivityRecord, StreamRow, METERS_PER_MILE};
use crate::normalize::normalize;
use crate::storage::{ActivityLedger, StreamArchive};

/// Summary of one streams-sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSyncReport {
    /// Not-yet-synced activities visited (bounded by the cap)
    pub processed: usize,
    /// Activities whose rows were appended to the archive
    pub appended: usize,
    /// Activities skipped after a fetch/normalize failure
    pub skipped: usize,
}

impl std::fmt::Display for StreamSyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} processed, {} appended, {} skipped",
            self.processed, self.appended, self.skipped
        )
    }
}

/// Orchestrates both stores against the remote source.
///
/// Owns the client handle and both store handles explicitly; there is no
/// module-level state, so tests can point the engine at a mock server and a
/// temp directory.
pub struct SyncEngine {
    client: StravaClient,
    token: AccessToken,
    ledger: ActivityLedger,
    archive: StreamArchive,
    /// Activity table as of the last `sync_activities` in this run
    activities: Option<Vec<ActivityRecord>>,
}

impl SyncEngine {
    pub fn new(client: StravaClient, token: AccessToken, paths: CachePaths) -> Self {
        Self {
            client,
            token,
            ledger: ActivityLedger::new(paths.ledger),
            archive: StreamArchive::new(paths.archive),
            activities: None,
        }
    }

    pub fn ledger(&self) -> &ActivityLedger {
        &self.ledger
    }

    pub fn archive(&self) -> &StreamArchive {
        &self.archive
    }

    /// Fetch the activity delta and merge it into the ledger.
    ///
    /// Distances are converted from meters to miles here, before merge, so
    /// the conversion happens exactly once per record. When the fetch returns
    /// nothing the ledger file is left untouched, byte for byte.
    pub async fn sync_activities(&mut self) -> Result<usize> {
        let table = self.ledger.load()?;
        let cursor = ActivityLedger::resume_cursor(&table);

        let mut fetched = self.client.list_activities(&self.token, &cursor).await?;
        for record in &mut fetched {
            record.distance /= METERS_PER_MILE;
        }

        let fetched_any = !fetched.is_empty();
        let merged = ActivityLedger::merge(table, fetched);
        if fetched_any {
            self.ledger.persist(&merged)?;
        }

        println!("Number of activities: {}", merged.len());
        let count = merged.len();
        self.activities = Some(merged);
        Ok(count)
    }

    /// Fetch, normalize, and archive telemetry for activities the archive has
    /// not seen yet, in ledger order, up to `max_count` of them.
    ///
    /// Runs `sync_activities` first if it has not run yet this invocation.
    /// The archive handle is held open for the whole pass and released on
    /// every exit path.
    pub async fn sync_streams(&mut self, max_count: Option<usize>) -> Result<StreamSyncReport> {
        if self.activities.is_none() {
            self.sync_activities().await?;
        }
        let activities = self.activities.clone().unwrap_or_default();

        let synced = self.archive.already_synced_ids();
        let mut writer = self.archive.open_writer()?;
        let mut report = StreamSyncReport::default();

        for record in &activities {
            if let Some(cap) = max_count {
                if report.processed >= cap {
                    break;
                }
            }
            if synced.contains(&record.id) {
                continue;
            }
            report.processed += 1;

            println!("Processing ID: {} Name: {}", record.id, record.display_name());
            match self.fetch_rows(record).await {
                Ok(rows) => {
                    writer.append(&rows)?;
                    report.appended += 1;
                }
                Err(e) => {
                    eprintln!(
                        "Skipping activity {} ({} error): {}",
                        record.id,
                        e.skip_reason(),
                        e
                    );
                    report.skipped += 1;
                }
            }
        }

        writer.finish()?;
        Ok(report)
    }

    async fn fetch_rows(&self, record: &ActivityRecord) -> Result<Vec<StreamRow>> {
        let streams = self.client.get_streams(&self.token, record.id).await?;
        normalize(&streams, record.id, record.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_display() {
        let report = StreamSyncReport {
            processed: 5,
            appended: 3,
            skipped: 2,
        };
        assert_eq!(report.to_string(), "5 processed, 3 appended, 2 skipped");
    }

    #[test]
    fn test_report_default_is_zeroed() {
        assert_eq!(
            StreamSyncReport::default(),
            StreamSyncReport {
                processed: 0,
                appended: 0,
                skipped: 0
            }
        );
    }
}
