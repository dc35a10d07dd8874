use std::sync::Arc;

use axum::body::Bytes;

use crate::import::decompress::UploadReader;
use crate::import::engine::{ImportEngine, ImportSummary};
use crate::import::metrics::{ImportMetrics, ImportMetricsRecorder};
use crate::import::targets::{OrderDetailImport, OrderImport, PizzaImport, PizzaTypeImport};
use crate::import::{ImportError, ImportKind};
use crate::store::PizzaStore;

/// Service for CSV uploads and their metrics
#[derive(Clone)]
pub struct ImportService {
    engine: ImportEngine,
    metrics: ImportMetricsRecorder,
}

impl ImportService {
    pub fn new(store: Arc<dyn PizzaStore>, batch_size: usize, metrics: ImportMetricsRecorder) -> Self {
        Self {
            engine: ImportEngine::new(store, batch_size),
            metrics,
        }
    }

    /// Import an uploaded file, plain or gzip compressed, into the table for
    /// `kind` and record the outcome.
    pub async fn import(&self, kind: ImportKind, upload: Bytes) -> Result<ImportSummary, ImportError> {
        let size = upload.len();
        let reader = UploadReader::new(upload);
        tracing::info!(
            "Starting {} import ({} bytes{})",
            kind,
            size,
            if reader.is_compressed() { ", gzip" } else { "" }
        );

        let summary = match kind {
            ImportKind::Orders => self.engine.run(&OrderImport, reader).await,
            ImportKind::OrderDetails => self.engine.run(&OrderDetailImport, reader).await,
            ImportKind::PizzaTypes => self.engine.run(&PizzaTypeImport, reader).await,
            ImportKind::Pizzas => self.engine.run(&PizzaImport, reader).await,
        }
        .map_err(|e| e.during(kind))?;

        self.metrics.record(kind, &summary).await;
        Ok(summary)
    }

    pub async fn metrics(&self, kind: &str) -> Result<ImportMetrics, ImportError> {
        self.metrics
            .get(kind)
            .await
            .ok_or_else(|| ImportError::MetricsNotFound(kind.to_string()))
    }
}
