//! Download pipeline: yt-dlp runs, progress parsing, enhancement pass

pub mod batch;
pub mod enhance;
pub mod progress;
pub mod runner;
pub mod summary;

// Re-export for convenience
pub use batch::{BatchJob, BatchRunner, BatchUpdate};
pub use progress::{DownloadProgress, ProgressEvent};
pub use runner::{run_download, DownloadOutcome};
pub use summary::{BatchSummary, SummaryMessage};
