//! Data structures for fetched media

use serde::{Deserialize, Serialize};
use tracing::debug;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_UPLOADER: &str = "Unknown";

/// One downloadable item shown in the results list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: Option<String>,
    pub title: String,
    pub url: String,
    pub uploader: String,
    /// Whole seconds
    pub duration: Option<u64>,
    pub thumbnail: Option<String>,
    pub upload_date: Option<String>,
    pub view_count: Option<u64>,
}

impl MediaItem {
    /// `HH:MM:SS`, or `N/A` when unknown or zero
    pub fn duration_display(&self) -> String {
        format_duration(self.duration)
    }
}

pub fn format_duration(duration: Option<u64>) -> String {
    match duration {
        Some(secs) if secs > 0 => format!(
            "{:02}:{:02}:{:02}",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        ),
        _ => "N/A".to_string(),
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Thumbnail {
    #[serde(default, deserialize_with = "lenient::string")]
    url: Option<String>,
}

/// Subset of yt-dlp's `-J` output the app reads
///
/// Extractors are loose about field types (numeric ids, float view counts),
/// so every field is read leniently and an unreadable value becomes `None`
/// instead of failing the whole document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInfo {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub webpage_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub uploader: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub channel: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub uploader_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub creator: Option<String>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    thumbnails: Option<Vec<Option<Thumbnail>>>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub upload_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub view_count: Option<u64>,
    /// Present for playlists and channels; unavailable or unreadable entries are `None`
    #[serde(default, deserialize_with = "lenient::list")]
    pub entries: Option<Vec<Option<RawInfo>>>,
}

mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn float<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .filter(|v: &f64| v.is_finite()))
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        let value = Value::deserialize(d)?;
        if let Some(n) = value.as_u64() {
            return Ok(Some(n));
        }
        let float = match &value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(float.filter(|v| v.is_finite() && *v >= 0.0).map(|v| v as u64))
    }

    /// A list whose unreadable elements become `None`; a non-list is `None`
    pub fn list<'de, D, T>(d: D) -> Result<Option<Vec<Option<T>>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .map(|item| serde_json::from_value::<Option<T>>(item).ok().flatten())
                    .collect(),
            ),
            _ => None,
        })
    }
}

/// Which URL field an extractor trusts first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlPreference {
    /// `url`, then `webpage_url`; single items keep the URL the user fetched
    Direct,
    /// `webpage_url`, then `url`, for single items and entries alike
    Webpage,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl RawInfo {
    /// `uploader` → `channel` → `uploader_id` → `creator` → `Unknown`
    pub fn uploader_name(&self) -> String {
        non_empty(&self.uploader)
            .or_else(|| non_empty(&self.channel))
            .or_else(|| non_empty(&self.uploader_id))
            .or_else(|| non_empty(&self.creator))
            .unwrap_or(UNKNOWN_UPLOADER)
            .to_string()
    }

    fn thumbnail_url(&self) -> Option<String> {
        non_empty(&self.thumbnail).map(str::to_string).or_else(|| {
            self.thumbnails
                .as_ref()?
                .iter()
                .rev()
                .flatten()
                .find_map(|t| t.url.clone())
        })
    }

    fn watch_url(&self) -> Option<String> {
        non_empty(&self.id).map(|id| format!("https://www.youtube.com/watch?v={}", id))
    }

    fn entry_url(&self, preference: UrlPreference) -> Option<String> {
        let (first, second) = match preference {
            UrlPreference::Direct => (&self.url, &self.webpage_url),
            UrlPreference::Webpage => (&self.webpage_url, &self.url),
        };
        non_empty(first)
            .or_else(|| non_empty(second))
            .map(str::to_string)
            .or_else(|| self.watch_url())
    }

    fn into_item(self, url: String) -> MediaItem {
        MediaItem {
            title: non_empty(&self.title).unwrap_or(UNKNOWN_TITLE).to_string(),
            uploader: self.uploader_name(),
            duration: self
                .duration
                .filter(|d| d.is_finite() && *d >= 0.0)
                .map(|d| d.trunc() as u64),
            thumbnail: self.thumbnail_url(),
            id: self.id,
            url,
            upload_date: self.upload_date,
            view_count: self.view_count,
        }
    }

    /// Flatten into list items. Playlists yield their non-null entries; a
    /// single item yields itself.
    pub fn into_items(self, requested_url: &str, preference: UrlPreference) -> Vec<MediaItem> {
        if let Some(entries) = self.entries {
            return entries
                .into_iter()
                .flatten()
                .filter_map(|entry| match entry.entry_url(preference) {
                    Some(url) => Some(entry.into_item(url)),
                    None => {
                        debug!("Skipping playlist entry without a URL: {:?}", entry.title);
                        None
                    }
                })
                .collect();
        }

        let url = match preference {
            UrlPreference::Direct => requested_url.to_string(),
            UrlPreference::Webpage => self
                .entry_url(preference)
                .unwrap_or_else(|| requested_url.to_string()),
        };
        vec![self.into_item(url)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawInfo {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_duration_display() {
        assert_eq!(format_duration(Some(3725)), "01:02:05");
        assert_eq!(format_duration(Some(59)), "00:00:59");
        assert_eq!(format_duration(Some(0)), "N/A");
        assert_eq!(format_duration(None), "N/A");
    }

    #[test]
    fn test_uploader_fallback_chain() {
        assert_eq!(raw(json!({"uploader": "A", "channel": "B"})).uploader_name(), "A");
        assert_eq!(raw(json!({"uploader": null, "channel": "B"})).uploader_name(), "B");
        assert_eq!(raw(json!({"uploader_id": "@c"})).uploader_name(), "@c");
        assert_eq!(raw(json!({"creator": "D"})).uploader_name(), "D");
        assert_eq!(raw(json!({})).uploader_name(), "Unknown");
    }

    #[test]
    fn test_playlist_skips_null_entries() {
        let info = raw(json!({
            "title": "Mix",
            "entries": [
                {"id": "a1", "title": "First", "url": "https://example.com/a1", "duration": 61.9},
                null,
                {"id": "b2", "webpage_url": "https://example.com/b2"},
                {"id": "c3"},
            ]
        }));
        let items = info.into_items("https://example.com/list", UrlPreference::Direct);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].url, "https://example.com/a1");
        assert_eq!(items[0].duration, Some(61));
        assert_eq!(items[1].url, "https://example.com/b2");
        assert_eq!(items[1].title, UNKNOWN_TITLE);
        assert_eq!(items[2].url, "https://www.youtube.com/watch?v=c3");
    }

    #[test]
    fn test_single_item_keeps_requested_url() {
        let info = raw(json!({
            "id": "xyz",
            "title": "Talk",
            "webpage_url": "https://site.example/canonical",
            "thumbnails": [{"url": "https://img/1.jpg"}, {"url": "https://img/2.jpg"}]
        }));
        let items = info.clone().into_items("https://site.example/short", UrlPreference::Direct);
        assert_eq!(items[0].url, "https://site.example/short");
        assert_eq!(items[0].thumbnail.as_deref(), Some("https://img/2.jpg"));

        let items = info.into_items("https://site.example/short", UrlPreference::Webpage);
        assert_eq!(items[0].url, "https://site.example/canonical");
    }

    #[test]
    fn test_webpage_preference_for_entries() {
        let info = raw(json!({
            "entries": [{
                "id": "v1",
                "url": "https://www.youtube.com/shorts/v1",
                "webpage_url": "https://www.youtube.com/watch?v=v1"
            }]
        }));
        let items = info.into_items("https://www.youtube.com/@chan", UrlPreference::Webpage);
        assert_eq!(items[0].url, "https://www.youtube.com/watch?v=v1");
    }

    #[test]
    fn test_loosely_typed_entry_keeps_playlist() {
        let document = br#"{
            "title": "Uploads",
            "entries": [
                {"id": "a1", "title": "First", "url": "https://example.com/a1", "uploader": "Ann"},
                {"id": 4242, "title": "Second", "url": "https://example.com/b2", "uploader_id": 12345, "view_count": 1.5e3, "duration": "90"},
                "not an entry"
            ]
        }"#;
        let info: RawInfo = serde_json::from_slice(document).unwrap();
        let items = info.into_items("https://example.com/list", UrlPreference::Direct);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].uploader, "Ann");
        assert_eq!(items[1].id.as_deref(), Some("4242"));
        assert_eq!(items[1].uploader, "12345");
        assert_eq!(items[1].view_count, Some(1500));
        assert_eq!(items[1].duration, Some(90));
    }

    #[test]
    fn test_unreadable_values_become_none() {
        let info = raw(json!({
            "title": ["not", "a", "title"],
            "view_count": -3,
            "duration": {"seconds": 10},
            "thumbnails": [7, {"url": "https://img/ok.jpg"}],
            "entries": "none"
        }));
        assert!(info.title.is_none());
        assert!(info.view_count.is_none());
        assert!(info.duration.is_none());
        assert!(info.entries.is_none());
        let items = info.into_items("https://example.com/v", UrlPreference::Direct);
        assert_eq!(items[0].title, UNKNOWN_TITLE);
        assert_eq!(items[0].thumbnail.as_deref(), Some("https://img/ok.jpg"));
    }
}
