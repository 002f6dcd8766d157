use crate::auth::Browser;
use crate::extractor::generic::GenericExtractor;
use crate::extractor::models::MediaItem;
use crate::extractor::odysee::OdyseeExtractor;
use crate::extractor::podcast::PodcastPageExtractor;
use crate::extractor::traits::Extractor;
use crate::extractor::youtube::YouTubeExtractor;
use crate::extractor::ytdlp::YtDlp;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Routes URLs to the most specific extractor
///
/// Specific extractors are tried in order; anything unclaimed goes to the
/// generic yt-dlp extractor. When that fails, the page is scanned for direct
/// audio links before giving up.
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn Extractor>>,
    fallback: Arc<dyn Extractor>,
    page_scan: Option<Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    pub fn new(
        extractors: Vec<Arc<dyn Extractor>>,
        fallback: Arc<dyn Extractor>,
        page_scan: Option<Arc<dyn Extractor>>,
    ) -> Self {
        Self {
            extractors,
            fallback,
            page_scan,
        }
    }

    /// The standard set: YouTube, Odysee, direct audio, then generic
    pub fn standard(ytdlp: Arc<YtDlp>, cookies: Option<Browser>) -> Result<Self> {
        let youtube: Arc<dyn Extractor> = Arc::new(YouTubeExtractor::new(ytdlp.clone(), cookies));
        let odysee: Arc<dyn Extractor> = Arc::new(OdyseeExtractor::new(ytdlp.clone()));
        let podcast: Arc<dyn Extractor> = Arc::new(PodcastPageExtractor::new()?);
        let generic: Arc<dyn Extractor> = Arc::new(GenericExtractor::new(ytdlp, cookies));

        let extractors: Vec<Arc<dyn Extractor>> = vec![youtube, odysee, podcast.clone()];
        Ok(Self::new(extractors, generic, Some(podcast)))
    }

    /// Find the best extractor for a given URL
    pub fn find_extractor(&self, url: &str) -> &Arc<dyn Extractor> {
        for extractor in &self.extractors {
            if extractor.supports(url) {
                debug!("Routing to extractor: {}", extractor.id());
                return extractor;
            }
        }
        debug!("Routing to fallback extractor: {}", self.fallback.id());
        &self.fallback
    }

    pub async fn extract_info(&self, url: &str) -> Result<Vec<MediaItem>> {
        let extractor = self.find_extractor(url);
        match extractor.extract_info(url).await {
            Ok(items) => Ok(items),
            Err(e) => {
                let Some(page_scan) = &self.page_scan else {
                    return Err(e);
                };
                if extractor.id() != self.fallback.id() {
                    return Err(e);
                }
                info!(
                    "Extractor {} failed: {}. Scanning page for audio links...",
                    extractor.id(),
                    e
                );
                match page_scan.extract_info(url).await {
                    Ok(items) if !items.is_empty() => Ok(items),
                    Ok(_) => Err(e),
                    Err(scan_err) => {
                        debug!("Page scan failed: {}", scan_err);
                        Err(e)
                    }
                }
            }
        }
    }
}
