//! Stream archive: the on-disk append-only telemetry store
//!
//! One Parquet file holding every archived telemetry row across all synced
//! activities, ZSTD-compressed so individual columns stay cheap to scan.
//! Parquet files cannot be appended in place, so an append pass copies the
//! existing row data forward into a temp-file writer, takes per-activity
//! appends under that one open handle, and atomically renames over the
//! archive on finish. An abandoned pass leaves the prior archive untouched.

use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, BooleanArray, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::{ArrowWriter, ProjectionMask};
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::error::{CacheError, Result};
use crate::models::StreamRow;

/// Arrow schema of the `streams` table. Fixed: every append must carry
/// exactly these columns with these types.
pub fn stream_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("type", DataType::Int64, true),
        Field::new("time", DataType::Int64, false),
        Field::new("distance", DataType::Float64, true),
        Field::new("altitude", DataType::Float64, true),
        Field::new("velocity_smooth", DataType::Float64, true),
        Field::new("heartrate", DataType::Float64, true),
        Field::new("cadence", DataType::Float64, true),
        Field::new("watts", DataType::Float64, true),
        Field::new("temp", DataType::Float64, true),
        Field::new("moving", DataType::Boolean, true),
        Field::new("grade_smooth", DataType::Float64, true),
        Field::new("lat", DataType::Float64, true),
        Field::new("lon", DataType::Float64, true),
    ]))
}

/// Owns the telemetry archive file.
pub struct StreamArchive {
    path: PathBuf,
}

impl StreamArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Activity ids already present in the archive.
    ///
    /// Reads only the `id` column via a projection mask. A missing or
    /// unqueryable archive is a legitimate fresh store and yields the empty
    /// set; this is never fatal.
    pub fn already_synced_ids(&self) -> HashSet<i64> {
        match self.read_ids() {
            Ok(ids) => ids,
            Err(e) => {
                eprintln!(
                    "Warning: could not query archive {} ({}); treating as empty",
                    self.path.display(),
                    e
                );
                HashSet::new()
            }
        }
    }

    fn read_ids(&self) -> Result<HashSet<i64>> {
        if !self.path.exists() {
            return Ok(HashSet::new());
        }

        let file = File::open(&self.path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)
            .map_err(|e| CacheError::storage(format!("Failed to open archive reader: {}", e)))?;

        let id_index = builder
            .parquet_schema()
            .columns()
            .iter()
            .position(|c| c.name() == "id")
            .ok_or_else(|| CacheError::storage("Archive has no 'id' column"))?;
        let mask = ProjectionMask::roots(builder.parquet_schema(), [id_index]);

        let reader = builder
            .with_projection(mask)
            .build()
            .map_err(|e| CacheError::storage(format!("Failed to build archive reader: {}", e)))?;

        let mut ids = HashSet::new();
        for batch in reader {
            let batch =
                batch.map_err(|e| CacheError::storage(format!("Failed to read archive: {}", e)))?;
            let column = batch
                .column(0)
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| CacheError::storage("Archive 'id' column is not Int64"))?;
            for i in 0..column.len() {
                ids.insert(column.value(i));
            }
        }

        Ok(ids)
    }

    /// Open an append pass over the archive.
    ///
    /// The returned writer is the single open handle for a whole streams-sync
    /// pass. Existing row data is carried forward first; an existing file
    /// whose content cannot be read is treated as a fresh store, consistent
    /// with [`Self::already_synced_ids`]. Failure to create the writer itself
    /// is fatal.
    pub fn open_writer(&self) -> Result<ArchiveWriter> {
        let existing = if self.path.exists() {
            match self.read_existing() {
                Ok(batches) => batches,
                Err(e) => {
                    eprintln!(
                        "Warning: existing archive {} is unreadable ({}); starting fresh",
                        self.path.display(),
                        e
                    );
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let temp_path = self.path.with_extension("parquet.tmp");
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    CacheError::storage(format!("Failed to create archive directory: {}", e))
                })?;
            }
        }

        let file = File::create(&temp_path)
            .map_err(|e| CacheError::storage(format!("Failed to create temp archive: {}", e)))?;
        let props = WriterProperties::builder()
            .set_compression(Compression::ZSTD(Default::default()))
            .build();
        let mut writer = ArrowWriter::try_new(file, stream_schema(), Some(props))
            .map_err(|e| CacheError::storage(format!("Failed to create archive writer: {}", e)))?;

        for batch in &existing {
            writer
                .write(batch)
                .map_err(|e| CacheError::storage(format!("Failed to carry forward rows: {}", e)))?;
        }

        Ok(ArchiveWriter {
            final_path: self.path.clone(),
            temp_path,
            writer: Some(writer),
        })
    }

    fn read_existing(&self) -> Result<Vec<RecordBatch>> {
        let file = File::open(&self.path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .map_err(|e| CacheError::storage(format!("Failed to open archive reader: {}", e)))?
            .build()
            .map_err(|e| CacheError::storage(format!("Failed to build archive reader: {}", e)))?;

        reader
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| CacheError::storage(format!("Failed to read archive: {}", e)))
    }
}

/// Scoped append handle over the archive; one per streams-sync pass.
///
/// Dropping without [`finish`](Self::finish) discards the pass and leaves the
/// previous archive in place, so every exit path releases the file cleanly.
pub struct ArchiveWriter {
    final_path: PathBuf,
    temp_path: PathBuf,
    writer: Option<ArrowWriter<File>>,
}

impl ArchiveWriter {
    /// Append one activity's normalized rows as a single block.
    pub fn append(&mut self, rows: &[StreamRow]) -> Result<()> {
        let batch = rows_to_batch(rows)?;
        match self.writer.as_mut() {
            Some(writer) => writer
                .write(&batch)
                .map_err(|e| CacheError::storage(format!("Failed to append rows: {}", e))),
            None => Err(CacheError::storage("Archive writer already closed")),
        }
    }

    /// Close the writer and atomically replace the archive file.
    pub fn finish(mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer
                .close()
                .map_err(|e| CacheError::storage(format!("Failed to close archive: {}", e)))?;
            fs::rename(&self.temp_path, &self.final_path)
                .map_err(|e| CacheError::storage(format!("Failed to replace archive: {}", e)))?;
        }
        Ok(())
    }
}

impl Drop for ArchiveWriter {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            drop(writer);
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

fn rows_to_batch(rows: &[StreamRow]) -> Result<RecordBatch> {
    let id = Int64Array::from_iter_values(rows.iter().map(|r| r.id));
    let kind: Int64Array = rows.iter().map(|r| r.kind).collect();
    let time = Int64Array::from_iter_values(rows.iter().map(|r| r.time));
    let distance: Float64Array = rows.iter().map(|r| r.distance).collect();
    let altitude: Float64Array = rows.iter().map(|r| r.altitude).collect();
    let velocity_smooth: Float64Array = rows.iter().map(|r| r.velocity_smooth).collect();
    let heartrate: Float64Array = rows.iter().map(|r| r.heartrate).collect();
    let cadence: Float64Array = rows.iter().map(|r| r.cadence).collect();
    let watts: Float64Array = rows.iter().map(|r| r.watts).collect();
    let temp: Float64Array = rows.iter().map(|r| r.temp).collect();
    let moving: BooleanArray = rows.iter().map(|r| r.moving).collect();
    let grade_smooth: Float64Array = rows.iter().map(|r| r.grade_smooth).collect();
    let lat: Float64Array = rows.iter().map(|r| r.lat).collect();
    let lon: Float64Array = rows.iter().map(|r| r.lon).collect();

    RecordBatch::try_new(
        stream_schema(),
        vec![
            Arc::new(id),
            Arc::new(kind),
            Arc::new(time),
            Arc::new(distance),
            Arc::new(altitude),
            Arc::new(velocity_smooth),
            Arc::new(heartrate),
            Arc::new(cadence),
            Arc::new(watts),
            Arc::new(temp),
            Arc::new(moving),
            Arc::new(grade_smooth),
            Arc::new(lat),
            Arc::new(lon),
        ],
    )
    .map_err(|e| CacheError::storage(format!("Failed to create record batch: {}", e)))
}
