//! Bulkload Client
//!
//! Drives one import session against the remote bulk-import service:
//!
//! - [`ImportClient`] speaks the HTTP contract (multipart upload, result
//!   download, health check)
//! - [`ImportSession`] owns the selected file, its preview and the single
//!   import state machine every view is derived from
//! - [`Summary`] turns an [`ImportResult`](bulkload_core::types::ImportResult)
//!   into something to show

pub mod error;
pub mod outcome;
pub mod progress;
pub mod session;
pub mod summary;
pub mod transport;

pub use error::{ClientResult, ImportError};
pub use outcome::{ImportFailure, ImportOutcome};
pub use progress::{Milestone, NoProgress, ProgressLog, ProgressSink};
pub use session::{ImportSession, ImportState, Phase};
pub use summary::{RowErrorGroup, Summary};
pub use transport::{HealthStatus, ImportClient};
