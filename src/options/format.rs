//! Format choices offered to the user and their yt-dlp spellings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a download keeps the video stream or extracts audio only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatType {
    #[default]
    Video,
    Audio,
}

impl FormatType {
    pub const ALL: [FormatType; 2] = [FormatType::Video, FormatType::Audio];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatType::Video => "video",
            FormatType::Audio => "audio",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormatType::Video => "Video",
            FormatType::Audio => "Audio Only",
        }
    }
}

/// Video height ceilings, in the order shown in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoQuality {
    #[default]
    Best,
    Uhd2160,
    P1440,
    P1080,
    P720,
    P480,
    P360,
}

impl VideoQuality {
    pub const ALL: [VideoQuality; 7] = [
        VideoQuality::Best,
        VideoQuality::Uhd2160,
        VideoQuality::P1440,
        VideoQuality::P1080,
        VideoQuality::P720,
        VideoQuality::P480,
        VideoQuality::P360,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VideoQuality::Best => "Best",
            VideoQuality::Uhd2160 => "4K (2160p)",
            VideoQuality::P1440 => "1440p",
            VideoQuality::P1080 => "1080p",
            VideoQuality::P720 => "720p",
            VideoQuality::P480 => "480p",
            VideoQuality::P360 => "360p",
        }
    }

    /// Height ceiling in pixels, `None` for best available
    pub fn max_height(&self) -> Option<u32> {
        match self {
            VideoQuality::Best => None,
            VideoQuality::Uhd2160 => Some(2160),
            VideoQuality::P1440 => Some(1440),
            VideoQuality::P1080 => Some(1080),
            VideoQuality::P720 => Some(720),
            VideoQuality::P480 => Some(480),
            VideoQuality::P360 => Some(360),
        }
    }

    pub fn format_selector(&self) -> String {
        format_selector(self.label())
    }
}

/// Map a free-form quality label to a yt-dlp format selector.
///
/// Matching is by substring on the lowercased text and the first hit wins, so
/// `"Best"` beats any height and `"4K (2160p)"` resolves through `2160`.
/// Unrecognised text falls back to `best`.
pub fn format_selector(quality_text: &str) -> String {
    let quality = quality_text.to_lowercase();

    if quality.contains("best") {
        return "bestvideo*+bestaudio/best".to_string();
    }

    let height = if quality.contains("2160") || quality.contains("4k") {
        2160
    } else if quality.contains("1440") {
        1440
    } else if quality.contains("1080") {
        1080
    } else if quality.contains("720") {
        720
    } else if quality.contains("480") {
        480
    } else if quality.contains("360") {
        360
    } else {
        return "best".to_string();
    };

    format!(
        "bestvideo[height<={}]+bestaudio/bestvideo*+bestaudio/best",
        height
    )
}

/// Output container for merged video downloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoContainer {
    #[default]
    Mp4,
    Mkv,
    Webm,
    Avi,
    Mov,
    Flv,
}

impl VideoContainer {
    pub const ALL: [VideoContainer; 6] = [
        VideoContainer::Mp4,
        VideoContainer::Mkv,
        VideoContainer::Webm,
        VideoContainer::Avi,
        VideoContainer::Mov,
        VideoContainer::Flv,
    ];

    /// Extension / ffmpeg muxer name passed to yt-dlp
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoContainer::Mp4 => "mp4",
            VideoContainer::Mkv => "mkv",
            VideoContainer::Webm => "webm",
            VideoContainer::Avi => "avi",
            VideoContainer::Mov => "mov",
            VideoContainer::Flv => "flv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VideoContainer::Mp4 => "MP4",
            VideoContainer::Mkv => "MKV",
            VideoContainer::Webm => "WebM",
            VideoContainer::Avi => "AVI",
            VideoContainer::Mov => "MOV",
            VideoContainer::Flv => "FLV",
        }
    }
}

/// Target codec for audio extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCodec {
    #[default]
    Mp3,
    Aac,
    Flac,
    Opus,
    M4a,
    Wav,
    Alac,
    Vorbis,
}

impl AudioCodec {
    pub const ALL: [AudioCodec; 8] = [
        AudioCodec::Mp3,
        AudioCodec::Aac,
        AudioCodec::Flac,
        AudioCodec::Opus,
        AudioCodec::M4a,
        AudioCodec::Wav,
        AudioCodec::Alac,
        AudioCodec::Vorbis,
    ];

    /// `preferredcodec` value understood by FFmpegExtractAudio
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCodec::Mp3 => "mp3",
            AudioCodec::Aac => "aac",
            AudioCodec::Flac => "flac",
            AudioCodec::Opus => "opus",
            AudioCodec::M4a => "m4a",
            AudioCodec::Wav => "wav",
            AudioCodec::Alac => "alac",
            AudioCodec::Vorbis => "vorbis",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AudioCodec::Mp3 => "MP3",
            AudioCodec::Aac => "AAC",
            AudioCodec::Flac => "FLAC",
            AudioCodec::Opus => "Opus",
            AudioCodec::M4a => "M4A",
            AudioCodec::Wav => "WAV",
            AudioCodec::Alac => "ALAC",
            AudioCodec::Vorbis => "OGG Vorbis",
        }
    }
}

/// Audio bitrate choice; `Lossless` maps to yt-dlp's best VBR quality `0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioBitrate {
    Lossless,
    Kbps320,
    Kbps256,
    #[default]
    Kbps192,
    Kbps128,
    Kbps96,
}

impl AudioBitrate {
    pub const ALL: [AudioBitrate; 6] = [
        AudioBitrate::Lossless,
        AudioBitrate::Kbps320,
        AudioBitrate::Kbps256,
        AudioBitrate::Kbps192,
        AudioBitrate::Kbps128,
        AudioBitrate::Kbps96,
    ];

    /// `preferredquality` value for FFmpegExtractAudio
    pub fn preferred_quality(&self) -> &'static str {
        match self {
            AudioBitrate::Lossless => "0",
            AudioBitrate::Kbps320 => "320",
            AudioBitrate::Kbps256 => "256",
            AudioBitrate::Kbps192 => "192",
            AudioBitrate::Kbps128 => "128",
            AudioBitrate::Kbps96 => "96",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AudioBitrate::Lossless => "Lossless",
            AudioBitrate::Kbps320 => "320 kbps",
            AudioBitrate::Kbps256 => "256 kbps",
            AudioBitrate::Kbps192 => "192 kbps",
            AudioBitrate::Kbps128 => "128 kbps",
            AudioBitrate::Kbps96 => "96 kbps",
        }
    }
}

macro_rules! labelled_choice {
    ($ty:ty, $wire:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            /// Accepts either the display label or the wire spelling, ignoring case
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|choice| {
                        choice.label().eq_ignore_ascii_case(wanted)
                            || choice.$wire().eq_ignore_ascii_case(wanted)
                    })
                    .ok_or_else(|| format!("Unknown {}: {}", stringify!($ty), s))
            }
        }
    };
}

labelled_choice!(FormatType, as_str);
labelled_choice!(VideoQuality, label);
labelled_choice!(VideoContainer, as_str);
labelled_choice!(AudioCodec, as_str);
labelled_choice!(AudioBitrate, preferred_quality);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_selector() {
        assert_eq!(format_selector("Best"), "bestvideo*+bestaudio/best");
        assert_eq!(
            VideoQuality::Best.format_selector(),
            "bestvideo*+bestaudio/best"
        );
    }

    #[test]
    fn test_height_selectors() {
        assert_eq!(
            VideoQuality::Uhd2160.format_selector(),
            "bestvideo[height<=2160]+bestaudio/bestvideo*+bestaudio/best"
        );
        assert_eq!(
            format_selector("4k"),
            "bestvideo[height<=2160]+bestaudio/bestvideo*+bestaudio/best"
        );
        for quality in &VideoQuality::ALL[2..] {
            let height = quality.max_height().unwrap();
            assert_eq!(
                quality.format_selector(),
                format!(
                    "bestvideo[height<={}]+bestaudio/bestvideo*+bestaudio/best",
                    height
                )
            );
        }
    }

    #[test]
    fn test_unknown_quality_falls_back_to_best() {
        assert_eq!(format_selector("240p"), "best");
        assert_eq!(format_selector(""), "best");
    }

    #[test]
    fn test_codec_wire_names() {
        assert_eq!(AudioCodec::Vorbis.as_str(), "vorbis");
        assert_eq!(AudioCodec::Vorbis.label(), "OGG Vorbis");
        assert_eq!("OGG Vorbis".parse::<AudioCodec>().unwrap(), AudioCodec::Vorbis);
        assert_eq!("FLAC".parse::<AudioCodec>().unwrap(), AudioCodec::Flac);
    }

    #[test]
    fn test_bitrate_parsing() {
        assert_eq!(AudioBitrate::Lossless.preferred_quality(), "0");
        assert_eq!("320 kbps".parse::<AudioBitrate>().unwrap(), AudioBitrate::Kbps320);
        assert_eq!("96".parse::<AudioBitrate>().unwrap(), AudioBitrate::Kbps96);
        assert_eq!(AudioBitrate::default(), AudioBitrate::Kbps192);
        assert!("500 kbps".parse::<AudioBitrate>().is_err());
    }

    #[test]
    fn test_container_round_trip_through_label() {
        for container in VideoContainer::ALL {
            assert_eq!(container.label().parse::<VideoContainer>().unwrap(), container);
        }
        assert_eq!(VideoContainer::Webm.as_str(), "webm");
    }
}
