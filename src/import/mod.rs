pub mod decompress;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod kind;
pub mod metrics;
pub mod rows;
pub mod service;
pub mod targets;

pub use engine::{ImportSummary, SkipReason, SkippedRow, DEFAULT_BATCH_SIZE};
pub use error::*;
pub use handlers::*;
pub use kind::*;
pub use metrics::*;
pub use service::*;
