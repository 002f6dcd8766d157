//! AV Morning Star library
//!
//! Everything behind the desktop app: extractor dispatch, yt-dlp option
//! building, browser cookie authentication, the batch downloader, persistence
//! and the iced GUI.

pub mod auth;
pub mod backend;
pub mod database;
pub mod downloader;
pub mod extractor;
pub mod gui;
pub mod options;
pub mod utils;

// Re-export main types for easier use
pub use backend::{BackendActor, BackendCommand, BackendEvent};
pub use extractor::{Extractor, ExtractorRegistry, MediaItem, YtDlp};
pub use gui::{Message, MorningStarApp, View};
pub use options::{DownloadRequest, YdlOptions};
pub use utils::{AppSettings, MorningStarError};
