use crate::auth::Browser;
use crate::extractor::models::{MediaItem, UrlPreference};
use crate::extractor::traits::Extractor;
use crate::extractor::ytdlp::YtDlp;
use crate::options::{DownloadRequest, ExtractFlat, YdlOptions};
use crate::utils::diagnostics::{bot_detection_message, is_bot_detection};
use crate::utils::error::MorningStarError;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// yt-dlp's external challenge-solver scripts, fetched from GitHub
pub const REMOTE_COMPONENTS: &str = "ejs:github";

/// YouTube videos, playlists and channels
pub struct YouTubeExtractor {
    ytdlp: Arc<YtDlp>,
    cookies: Option<Browser>,
}

impl YouTubeExtractor {
    pub fn new(ytdlp: Arc<YtDlp>, cookies: Option<Browser>) -> Self {
        Self { ytdlp, cookies }
    }

    pub fn matches(url: &str) -> bool {
        let url = url.to_lowercase();
        url.contains("youtube.com") || url.contains("youtu.be")
    }

    fn browser_name(&self) -> Option<&'static str> {
        self.cookies.map(|b| b.as_str())
    }

    fn with_youtube_extras(&self, mut opts: YdlOptions) -> YdlOptions {
        opts.remote_components = vec![REMOTE_COMPONENTS.to_string()];
        opts.with_cookies(self.browser_name())
    }

    fn describe_failure(&self, err: MorningStarError) -> String {
        let browser = self.browser_name();
        match err {
            MorningStarError::ExtractionError(msg) if is_bot_detection(&msg) => {
                bot_detection_message(&msg, browser)
            }
            MorningStarError::ExtractionError(msg) => format!("YouTube extraction failed: {}", msg),
            other => format!(
                "Failed to extract YouTube info: {}\n\n\
                 Troubleshooting:\n\
                 1. Verify you're logged into YouTube in {}\n\
                 2. Update yt-dlp: yt-dlp -U\n\
                 3. Ensure Deno is installed: deno --version\n\
                 4. Try a different browser in Preferences",
                other,
                browser.unwrap_or("your browser")
            ),
        }
    }
}

#[async_trait]
impl Extractor for YouTubeExtractor {
    fn id(&self) -> &'static str {
        "youtube"
    }

    fn platform_name(&self) -> &'static str {
        "YouTube"
    }

    fn supports(&self, url: &str) -> bool {
        Self::matches(url)
    }

    fn fetch_options(&self) -> YdlOptions {
        let mut opts = YdlOptions::fetch();
        opts.extract_flat = Some(ExtractFlat::InPlaylist);
        self.with_youtube_extras(opts)
    }

    fn download_options(&self, request: &DownloadRequest) -> YdlOptions {
        self.with_youtube_extras(YdlOptions::download(request))
    }

    async fn extract_info(&self, url: &str) -> Result<Vec<MediaItem>> {
        debug!(
            "Fetching YouTube info for {} (cookies: {:?})",
            url,
            self.browser_name()
        );
        match self.ytdlp.fetch_info(url, &self.fetch_options()).await {
            Ok(info) => Ok(info.into_items(url, UrlPreference::Webpage)),
            Err(e) => {
                warn!("YouTube fetch failed: {}", e);
                Err(MorningStarError::ExtractionError(self.describe_failure(e)).into())
            }
        }
    }
}
