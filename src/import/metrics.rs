// Most recent import outcome per import type.
//
// Entries are replaced wholesale on every import of that type and live for
// the lifetime of the process.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use utoipa::ToSchema;

use crate::import::{ImportKind, ImportSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportMetrics {
    pub rows_processed: usize,
    pub rows_imported: usize,
    pub rows_skipped: usize,
    pub skipped_ids: Vec<String>,
    pub duration_ms: u64,
}

impl From<&ImportSummary> for ImportMetrics {
    fn from(summary: &ImportSummary) -> Self {
        Self {
            rows_processed: summary.total,
            rows_imported: summary.imported,
            rows_skipped: summary.skipped,
            skipped_ids: summary.skipped_ids.clone(),
            duration_ms: summary.duration_ms,
        }
    }
}

/// Shared, concurrency-safe map of the last import per type
#[derive(Debug, Clone, Default)]
pub struct ImportMetricsRecorder {
    inner: Arc<RwLock<HashMap<String, ImportMetrics>>>,
}

impl ImportMetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the entry for `kind`
    pub async fn record(&self, kind: ImportKind, summary: &ImportSummary) {
        let metrics = ImportMetrics::from(summary);
        self.inner
            .write()
            .await
            .insert(kind.key().to_string(), metrics);
    }

    /// Look up metrics by import type name, case-insensitively
    pub async fn get(&self, kind: &str) -> Option<ImportMetrics> {
        self.inner.read().await.get(&kind.to_lowercase()).cloned()
    }
}
