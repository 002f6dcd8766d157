//! Errors, settings, platform paths and diagnostics

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod paths;

pub use config::AppSettings;
pub use diagnostics::{friendly_fetch_error, strip_ansi, SUPPORTED_BROWSERS_LINE};
pub use error::MorningStarError;
pub use paths::{database_path, default_download_dir};
