use crate::auth::Browser;
use crate::extractor::models::{MediaItem, UrlPreference};
use crate::extractor::traits::Extractor;
use crate::extractor::ytdlp::YtDlp;
use crate::options::{DownloadRequest, YdlOptions};
use crate::utils::diagnostics::friendly_fetch_error;
use crate::utils::error::MorningStarError;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Any other site yt-dlp knows about
pub struct GenericExtractor {
    ytdlp: Arc<YtDlp>,
    cookies: Option<Browser>,
}

impl GenericExtractor {
    pub fn new(ytdlp: Arc<YtDlp>, cookies: Option<Browser>) -> Self {
        Self { ytdlp, cookies }
    }

    /// Keep certificate checks on and prefer HTTPS
    fn harden(&self, mut opts: YdlOptions) -> YdlOptions {
        opts.nocheckcertificate = Some(false);
        opts.prefer_insecure = Some(false);
        opts.with_cookies(self.cookies.map(|b| b.as_str()))
    }
}

#[async_trait]
impl Extractor for GenericExtractor {
    fn id(&self) -> &'static str {
        "generic"
    }

    fn platform_name(&self) -> &'static str {
        "Generic"
    }

    fn supports(&self, _url: &str) -> bool {
        true
    }

    fn fetch_options(&self) -> YdlOptions {
        self.harden(YdlOptions::fetch())
    }

    fn download_options(&self, request: &DownloadRequest) -> YdlOptions {
        self.harden(YdlOptions::download(request))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_options_keep_tls_checks() {
        let ytdlp = Arc::new(YtDlp::with_paths("yt-dlp".into(), None));
        let opts = GenericExtractor::new(ytdlp, Some(Browser::Chrome)).fetch_options();
        let json = opts.to_json().unwrap();
        assert_eq!(json["nocheckcertificate"], false);
        assert_eq!(json["prefer_insecure"], false);
        assert_eq!(json["cookiesfrombrowser"], serde_json::json!(["chrome"]));

        let args = opts.to_args();
        assert!(!args.contains(&"--no-check-certificates".to_string()));
        assert!(!args.contains(&"--prefer-insecure".to_string()));
    }
}
