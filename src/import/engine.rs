use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;
use std::io::Read;
use std::sync::Arc;
use std::time::Instant;

use axum::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::import::rows::{CsvRow, CsvRows, RawRow};
use crate::import::{ImportError, ImportKind};
use crate::store::{PizzaStore, StoreResult};

/// Default number of staged rows written per transaction
pub const DEFAULT_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Field count or typed field parsing failed
    InvalidRow,
    /// Key already stored, or staged earlier in the same file by a batch
    /// that was not rejected
    DuplicateKey,
    MissingOrder,
    MissingPizza,
    MissingPizzaType,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRow {
    pub id: String,
    pub reason: SkipReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Outcome of one CSV import
///
/// `total == imported + skipped + rows_failed` always holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub total: usize,
    pub imported: usize,
    pub skipped: usize,
    pub skipped_ids: Vec<String>,
    pub skipped_rows: Vec<SkippedRow>,
    /// Rows lost to batches the store rejected
    pub rows_failed: usize,
    pub failed_batches: usize,
    pub duration_ms: u64,
}

impl ImportSummary {
    fn skip(&mut self, id: String, reason: SkipReason, detail: Option<String>) {
        self.skipped += 1;
        self.skipped_ids.push(id.clone());
        self.skipped_rows.push(SkippedRow { id, reason, detail });
    }
}

/// Row-to-table mapping for one import type
#[async_trait]
pub trait ImportTarget: Send + Sync {
    type Record: Send + Sync;
    type Key: Eq + Hash + Display + Send + Sync;
    /// Keys of the tables this target references
    type References: Send + Sync;

    const KIND: ImportKind;
    /// Required header columns; the first one is the key column
    const COLUMNS: &'static [&'static str];

    fn parse(&self, row: &RawRow) -> Result<Self::Record, String>;

    fn key(&self, record: &Self::Record) -> Self::Key;

    async fn existing_keys(&self, store: &dyn PizzaStore) -> StoreResult<HashSet<Self::Key>>;

    async fn load_references(&self, store: &dyn PizzaStore) -> StoreResult<Self::References>;

    /// Reason to skip a record whose referenced rows do not exist
    fn check_references(
        &self,
        references: &Self::References,
        record: &Self::Record,
    ) -> Option<(SkipReason, String)>;

    async fn write_batch(&self, store: &dyn PizzaStore, batch: &[Self::Record]) -> StoreResult<u64>;
}

/// Streams CSV rows into the store in fixed-size batches
#[derive(Clone)]
pub struct ImportEngine {
    store: Arc<dyn PizzaStore>,
    batch_size: usize,
}

impl ImportEngine {
    pub fn new(store: Arc<dyn PizzaStore>, batch_size: usize) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
        }
    }

    /// Import every row of `input` through `target`.
    ///
    /// Existing keys are loaded once up front. Each row is either staged or
    /// skipped; staged rows are written whenever the batch is full and once
    /// more at end of stream. A rejected batch is dropped and counted in
    /// `rows_failed`, its keys are forgotten so later rows may reuse them, and
    /// the import carries on with the next one.
    pub async fn run<T, R>(&self, target: &T, input: R) -> Result<ImportSummary, ImportError>
    where
        T: ImportTarget,
        R: Read + Send,
    {
        let started = Instant::now();
        let rows = CsvRows::new(input, T::COLUMNS)?;

        let mut known = target.existing_keys(self.store.as_ref()).await?;
        let references = target.load_references(self.store.as_ref()).await?;
        tracing::debug!("{} import: {} keys already stored", T::KIND, known.len());

        let mut summary = ImportSummary::default();
        let mut batch = Vec::with_capacity(self.batch_size);

        for row in rows {
            summary.total += 1;

            let raw = match row? {
                CsvRow::Parsed(raw) => raw,
                CsvRow::Invalid { id, detail } => {
                    summary.skip(id, SkipReason::InvalidRow, Some(detail));
                    continue;
                }
            };

            let record = match target.parse(&raw) {
                Ok(record) => record,
                Err(detail) => {
                    summary.skip(raw.id(), SkipReason::InvalidRow, Some(detail));
                    continue;
                }
            };

            let key = target.key(&record);
            if known.contains(&key) {
                summary.skip(key.to_string(), SkipReason::DuplicateKey, None);
                continue;
            }
            if let Some((reason, detail)) = target.check_references(&references, &record) {
                summary.skip(key.to_string(), reason, Some(detail));
                continue;
            }

            known.insert(key);
            batch.push(record);

            if batch.len() >= self.batch_size {
                self.flush(target, &mut batch, &mut known, &mut summary).await;
            }
        }
        self.flush(target, &mut batch, &mut known, &mut summary).await;

        summary.duration_ms = started.elapsed().as_millis() as u64;

        if summary.skipped > 0 {
            tracing::warn!(
                "{} import skipped {} of {} rows",
                T::KIND,
                summary.skipped,
                summary.total
            );
        }
        tracing::info!(
            "{} import finished: {} imported, {} skipped, {} failed in {} ms",
            T::KIND,
            summary.imported,
            summary.skipped,
            summary.rows_failed,
            summary.duration_ms
        );

        Ok(summary)
    }

    async fn flush<T: ImportTarget>(
        &self,
        target: &T,
        batch: &mut Vec<T::Record>,
        known: &mut HashSet<T::Key>,
        summary: &mut ImportSummary,
    ) {
        if batch.is_empty() {
            return;
        }

        match target.write_batch(self.store.as_ref(), batch).await {
            Ok(_) => {
                summary.imported += batch.len();
                tracing::debug!("{} import: wrote batch of {} rows", T::KIND, batch.len());
            }
            Err(e) => {
                summary.rows_failed += batch.len();
                summary.failed_batches += 1;
                tracing::error!(
                    "{} import: dropping batch of {} rows after insert failure: {}",
                    T::KIND,
                    batch.len(),
                    e
                );
                for record in batch.iter() {
                    known.remove(&target.key(record));
                }
            }
        }
        batch.clear();
    }
}
