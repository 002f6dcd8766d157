//! Application settings

use crate::auth::BrowserPreference;
use crate::options::{DownloadChoices, DownloadMode, FilenameTemplate, FormatType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::warn;

/// Settings keys as stored in the `settings` table
pub mod keys {
    pub const DOWNLOAD_LOCATION: &str = "download_location";
    pub const BROWSER_PREFERENCE: &str = "browser_preference";
    pub const MODE: &str = "mode";
    pub const FORMAT_TYPE: &str = "format_type";
    pub const CHOICES: &str = "advanced_choices";
    pub const FILENAME_TAGS: &str = "filename_tags";
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Directory downloads are written to
    pub download_location: PathBuf,

    /// Browser whose cookies are sent to yt-dlp
    pub browser_preference: BrowserPreference,

    pub mode: DownloadMode,

    pub format_type: FormatType,

    /// Advanced-mode controls
    pub choices: DownloadChoices,

    pub filename_template: FilenameTemplate,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            download_location: crate::utils::paths::default_download_dir(),
            browser_preference: BrowserPreference::Auto,
            mode: DownloadMode::Basic,
            format_type: FormatType::Video,
            choices: DownloadChoices::default(),
            filename_template: FilenameTemplate::default(),
        }
    }
}

impl AppSettings {
    /// Flatten into `(key, value)` rows for the settings table
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                keys::DOWNLOAD_LOCATION,
                self.download_location.to_string_lossy().into_owned(),
            ),
            (
                keys::BROWSER_PREFERENCE,
                self.browser_preference.as_str().to_string(),
            ),
            (keys::MODE, self.mode.as_str().to_string()),
            (keys::FORMAT_TYPE, self.format_type.as_str().to_string()),
            (
                keys::CHOICES,
                serde_json::to_string(&self.choices).unwrap_or_default(),
            ),
            (keys::FILENAME_TAGS, self.filename_template.to_string()),
        ]
    }

    /// Rebuild from stored rows; missing or unreadable values keep their default
    pub fn from_pairs(pairs: &HashMap<String, String>) -> Self {
        let mut settings = Self::default();

        if let Some(location) = pairs.get(keys::DOWNLOAD_LOCATION) {
            if !location.trim().is_empty() {
                settings.download_location = PathBuf::from(location);
            }
        }

        if let Some(raw) = pairs.get(keys::BROWSER_PREFERENCE) {
            match raw.parse() {
                Ok(pref) => settings.browser_preference = pref,
                Err(e) => warn!("Ignoring stored browser preference: {}", e),
            }
        }

        if let Some(raw) = pairs.get(keys::MODE) {
            settings.mode = match raw.as_str() {
                "advanced" => DownloadMode::Advanced,
                _ => DownloadMode::Basic,
            };
        }

        if let Some(raw) = pairs.get(keys::FORMAT_TYPE) {
            match raw.parse() {
                Ok(format_type) => settings.format_type = format_type,
                Err(e) => warn!("Ignoring stored format type: {}", e),
            }
        }

        if let Some(raw) = pairs.get(keys::CHOICES) {
            match serde_json::from_str(raw) {
                Ok(choices) => settings.choices = choices,
                Err(e) => warn!("Ignoring stored download choices: {}", e),
            }
        }

        if let Some(raw) = pairs.get(keys::FILENAME_TAGS) {
            match raw.parse() {
                Ok(template) => settings.filename_template = template,
                Err(e) => warn!("Ignoring stored filename tags: {}", e),
            }
        }

        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Browser;
    use crate::options::{AudioCodec, FilenameTag};

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.browser_preference, BrowserPreference::Auto);
        assert_eq!(settings.mode, DownloadMode::Basic);
        assert!(settings.choices.embed_thumbnail);
        assert!(!settings.choices.download_subs);
        assert!(settings.download_location.is_absolute());
    }

    #[test]
    fn test_pairs_round_trip() {
        let mut settings = AppSettings::default();
        settings.download_location = PathBuf::from("/srv/media");
        settings.browser_preference = BrowserPreference::Browser(Browser::Vivaldi);
        settings.mode = DownloadMode::Advanced;
        settings.format_type = FormatType::Audio;
        settings.choices.audio_codec = AudioCodec::Opus;
        settings.choices.video_enhancements.stabilize_video = true;
        settings.filename_template = FilenameTemplate::new([FilenameTag::Id]);

        let stored: HashMap<String, String> = settings
            .to_pairs()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert_eq!(AppSettings::from_pairs(&stored), settings);
    }

    #[test]
    fn test_bad_values_fall_back_to_defaults() {
        let stored: HashMap<String, String> = [
            (keys::BROWSER_PREFERENCE, "netscape"),
            (keys::FORMAT_TYPE, "hologram"),
            (keys::CHOICES, "{not json"),
            (keys::FILENAME_TAGS, "title,bogus"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let settings = AppSettings::from_pairs(&stored);
        let defaults = AppSettings::default();
        assert_eq!(settings.browser_preference, defaults.browser_preference);
        assert_eq!(settings.format_type, defaults.format_type);
        assert_eq!(settings.choices, defaults.choices);
        assert_eq!(settings.filename_template, defaults.filename_template);
    }
}
