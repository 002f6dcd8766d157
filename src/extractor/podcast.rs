//! Pages that simply link to audio files, and direct audio URLs

use crate::extractor::models::MediaItem;
use crate::extractor::traits::Extractor;
use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const AUDIO_EXTENSIONS: [&str; 7] = [".mp3", ".m4a", ".aac", ".ogg", ".opus", ".wav", ".flac"];

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const PAGE_TIMEOUT: Duration = Duration::from_secs(30);

pub const PODCAST_UPLOADER: &str = "Podcast Page";
const FALLBACK_TITLE: &str = "Podcast Audio";

/// Whether the URL path ends in a known audio extension
pub fn is_audio_url(url: &str) -> bool {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_lowercase(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_lowercase(),
    };
    AUDIO_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// File stem with `_`/`-` turned into spaces
pub fn title_from_url(audio_url: &str) -> String {
    let path = Url::parse(audio_url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| audio_url.to_string());
    let filename = path.rsplit('/').next().unwrap_or_default();
    let stem = match filename.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => filename,
    };
    let title = stem.replace(['_', '-'], " ");
    let title = title.trim();
    if title.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        title.to_string()
    }
}

/// Absolute audio links found in `<a href>` tags, first occurrence kept
pub fn extract_audio_links(html: &str, page_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(anchors) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    document
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| page_url.join(href.trim()).ok())
        .map(|u| u.to_string())
        .filter(|u| is_audio_url(u))
        .filter(|u| seen.insert(u.clone()))
        .collect()
}

pub fn audio_item(audio_url: &str) -> MediaItem {
    MediaItem {
        id: None,
        title: title_from_url(audio_url),
        url: audio_url.to_string(),
        uploader: PODCAST_UPLOADER.to_string(),
        duration: None,
        thumbnail: None,
        upload_date: None,
        view_count: None,
    }
}

pub struct PodcastPageExtractor {
    client: reqwest::Client,
}

impl PodcastPageExtractor {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(PAGE_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT_HTML)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl Extractor for PodcastPageExtractor {
    fn id(&self) -> &'static str {
        "podcast-page"
    }

    fn platform_name(&self) -> &'static str {
        PODCAST_UPLOADER
    }

    fn supports(&self, url: &str) -> bool {
        is_audio_url(url)
    }

    async fn extract_info(&self, url: &str) -> Result<Vec<MediaItem>> {
        if is_audio_url(url) {
            return Ok(vec![audio_item(url)]);
        }

        let page_url = Url::parse(url).with_context(|| format!("Invalid page URL: {}", url))?;
        debug!("Scanning {} for audio links", page_url);
        let html = self.fetch_html(url).await?;
        let links = extract_audio_links(&html, &page_url);
        info!("Found {} audio link(s) on {}", links.len(), page_url);
        Ok(links.iter().map(|link| audio_item(link)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_url_detection() {
        assert!(is_audio_url("https://cdn.example.com/ep/001.MP3"));
        assert!(is_audio_url("https://cdn.example.com/ep/001.m4a?token=abc"));
        assert!(!is_audio_url("https://cdn.example.com/ep/001.mp3.html"));
        assert!(!is_audio_url("https://example.com/episodes/"));
    }

    #[test]
    fn test_title_from_url() {
        assert_eq!(
            title_from_url("https://x.example/media/my_great-episode.mp3"),
            "my great episode"
        );
        assert_eq!(title_from_url("https://x.example/a/Season-2_Finale.ogg?x=1"), "Season 2 Finale");
        assert_eq!(title_from_url("https://x.example/.mp3"), "Podcast Audio");
    }

    #[test]
    fn test_extract_links_resolves_and_dedups() {
        let html = r#"
            <html><body>
              <a href="/audio/ep1.mp3">Episode 1</a>
              <a href="ep2.ogg">Episode 2</a>
              <a href="https://cdn.example.net/ep3.flac">Episode 3</a>
              <a href="/audio/ep1.mp3">Episode 1 again</a>
              <a href="/about">About</a>
              <a>no href</a>
            </body></html>
        "#;
        let page = Url::parse("https://pod.example.com/show/index.html").unwrap();
        assert_eq!(
            extract_audio_links(html, &page),
            vec![
                "https://pod.example.com/audio/ep1.mp3",
                "https://pod.example.com/show/ep2.ogg",
                "https://cdn.example.net/ep3.flac",
            ]
        );
    }

    #[tokio::test]
    async fn test_direct_audio_url_needs_no_request() {
        let extractor = PodcastPageExtractor::new().unwrap();
        let items = extractor
            .extract_info("https://cdn.example.com/shows/deep_dive-42.mp3")
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "deep dive 42");
        assert_eq!(items[0].uploader, PODCAST_UPLOADER);
        assert_eq!(items[0].duration, None);
    }
}
