use crate::extractor::models::MediaItem;
use crate::options::{DownloadRequest, YdlOptions};
use anyhow::Result;
use async_trait::async_trait;

/// A platform-specific strategy for listing media and configuring yt-dlp
///
/// Extractors decide which options yt-dlp sees for their sites; the yt-dlp
/// process itself is shared.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Stable identifier used in logs (e.g. "youtube", "generic")
    fn id(&self) -> &'static str;

    /// Human-readable platform name
    fn platform_name(&self) -> &'static str;

    /// Whether this extractor claims the URL
    fn supports(&self, url: &str) -> bool;

    /// Options for listing items without downloading
    fn fetch_options(&self) -> YdlOptions {
        YdlOptions::fetch()
    }

    /// Options for downloading one item of a batch
    fn download_options(&self, request: &DownloadRequest) -> YdlOptions {
        YdlOptions::download(request)
    }

    /// List the downloadable items behind a URL
    async fn extract_info(&self, url: &str) -> Result<Vec<MediaItem>>;
}
