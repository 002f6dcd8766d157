use crate::auth::{Browser, BrowserPreference, FetchFailure};
use crate::database::DownloadRecord;
use crate::downloader::{BatchSummary, BatchUpdate};
use crate::extractor::MediaItem;
use crate::options::DownloadRequest;
use crate::utils::config::AppSettings;

/// Commands sent from GUI to Backend
#[derive(Debug, Clone)]
pub enum BackendCommand {
    /// List the items behind a URL
    Fetch {
        url: String,
        preference: BrowserPreference,
    },
    /// Download the selected items in order
    Download {
        items: Vec<MediaItem>,
        request: DownloadRequest,
        preference: BrowserPreference,
    },
    CancelDownload,

    SaveSettings(AppSettings),
    /// Re-run browser and YouTube login detection
    RefreshBrowsers,
    LoadHistory,
    ClearHistory,

    // System
    Shutdown,
}

/// Events sent from Backend to GUI
#[derive(Debug, Clone)]
pub enum BackendEvent {
    // Startup
    SettingsLoaded(AppSettings),
    ToolsDetected {
        ytdlp_version: Option<String>,
        ffmpeg_found: bool,
    },
    BrowsersDetected {
        available: Vec<Browser>,
        with_youtube: Vec<Browser>,
    },

    // Fetch
    FetchStatus(String),
    FetchCompleted {
        url: String,
        items: Vec<MediaItem>,
    },
    FetchFailed {
        url: String,
        failure: FetchFailure,
    },

    // Batch life-cycle
    BatchStarted {
        total: usize,
    },
    /// The batch never started (tool missing or another batch running)
    BatchRejected(String),
    BatchProgress(BatchUpdate),
    BatchFinished(BatchSummary),

    History(Vec<DownloadRecord>),

    // System
    Error(String),
}
