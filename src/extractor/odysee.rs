use crate::extractor::models::{MediaItem, UrlPreference};
use crate::extractor::traits::Extractor;
use crate::extractor::ytdlp::YtDlp;
use crate::utils::diagnostics::friendly_fetch_error;
use crate::utils::error::MorningStarError;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Odysee / LBRY. yt-dlp handles it with the default options and no cookies.
pub struct OdyseeExtractor {
    ytdlp: Arc<YtDlp>,
}

impl OdyseeExtractor {
    pub fn new(ytdlp: Arc<YtDlp>) -> Self {
        Self { ytdlp }
    }

    pub fn matches(url: &str) -> bool {
        let url = url.to_lowercase();
        url.contains("odysee.com") || url.contains("lbry.tv")
    }
}

#[async_trait]
impl Extractor for OdyseeExtractor {
    fn id(&self) -> &'static str {
        "odysee"
    }

    fn platform_name(&self) -> &'static str {
        "Odysee"
    }

    fn supports(&self, url: &str) -> bool {
        Self::matches(url)
    }

    async fn extract_info(&self, url: &str) -> Result<Vec<MediaItem>> {
        let info = self
            .ytdlp
            .fetch_info(url, &self.fetch_options())
            .await
            .map_err(|e| MorningStarError::ExtractionError(friendly_fetch_error(&e.to_string())))?;
        Ok(info.into_items(url, UrlPreference::Direct))
    }
}
