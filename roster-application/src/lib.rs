// Roster Application Layer

pub mod commands;
pub mod error;
pub mod metrics;
pub mod queries;
pub mod state;

pub use commands::{flush_watermark, run_scan_once, ScanReport};
pub use error::AppError;
pub use metrics::{Metrics, MetricsSnapshot};
pub use queries::fetch_roster;
pub use state::AppState;
