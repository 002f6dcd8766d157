//! Resolution of UI choices into a concrete download request

use super::filters::{AudioProcessing, VideoEnhancements};
use super::format::{AudioBitrate, AudioCodec, FormatType, VideoContainer, VideoQuality};
use super::template::FilenameTemplate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Basic picks sensible defaults; Advanced exposes every control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadMode {
    #[default]
    Basic,
    Advanced,
}

impl DownloadMode {
    pub const ALL: [DownloadMode; 2] = [DownloadMode::Basic, DownloadMode::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadMode::Basic => "basic",
            DownloadMode::Advanced => "advanced",
        }
    }
}

impl fmt::Display for DownloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadMode::Basic => write!(f, "Basic (Auto-detect best quality)"),
            DownloadMode::Advanced => write!(f, "Advanced (Manual settings)"),
        }
    }
}

/// State of the Advanced-mode controls, persisted between sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadChoices {
    pub video_quality: VideoQuality,
    pub video_container: VideoContainer,
    pub audio_codec: AudioCodec,
    pub audio_quality: AudioBitrate,
    pub download_subs: bool,
    pub embed_thumbnail: bool,
    pub normalize_audio: bool,
    pub dynamic_normalization: bool,
    pub denoise_audio: bool,
    pub video_enhancements: VideoEnhancements,
}

impl Default for DownloadChoices {
    fn default() -> Self {
        Self {
            video_quality: VideoQuality::Best,
            video_container: VideoContainer::Mp4,
            audio_codec: AudioCodec::Mp3,
            audio_quality: AudioBitrate::default(),
            download_subs: false,
            embed_thumbnail: true,
            normalize_audio: false,
            dynamic_normalization: false,
            denoise_audio: false,
            video_enhancements: VideoEnhancements::default(),
        }
    }
}

/// Everything needed to build download options for one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub output_dir: PathBuf,
    /// yt-dlp output template relative to `output_dir`
    pub filename_template: String,
    pub format_type: FormatType,
    pub video_quality: VideoQuality,
    pub video_container: VideoContainer,
    pub audio_codec: AudioCodec,
    pub audio_quality: AudioBitrate,
    pub download_subs: bool,
    pub embed_thumbnail: bool,
    pub audio: AudioProcessing,
    pub video_enhancements: VideoEnhancements,
}

impl DownloadRequest {
    pub fn resolve(
        mode: DownloadMode,
        format_type: FormatType,
        choices: &DownloadChoices,
        output_dir: impl Into<PathBuf>,
        template: &FilenameTemplate,
    ) -> Self {
        let is_audio = format_type == FormatType::Audio;
        let output_dir = output_dir.into();
        let filename_template = template.build(format_type);

        match mode {
            DownloadMode::Basic => Self {
                output_dir,
                filename_template,
                format_type,
                video_quality: VideoQuality::Best,
                video_container: VideoContainer::Mp4,
                audio_codec: AudioCodec::Mp3,
                audio_quality: AudioBitrate::Kbps320,
                download_subs: false,
                embed_thumbnail: is_audio,
                audio: AudioProcessing {
                    denoise: false,
                    normalize: is_audio,
                    dynamic: false,
                },
                video_enhancements: VideoEnhancements::default(),
            },
            DownloadMode::Advanced => Self {
                output_dir,
                filename_template,
                format_type,
                video_quality: choices.video_quality,
                video_container: choices.video_container,
                audio_codec: choices.audio_codec,
                audio_quality: choices.audio_quality,
                download_subs: choices.download_subs,
                embed_thumbnail: is_audio && choices.embed_thumbnail,
                audio: if is_audio {
                    AudioProcessing {
                        denoise: choices.denoise_audio,
                        normalize: choices.normalize_audio,
                        dynamic: choices.dynamic_normalization,
                    }
                } else {
                    AudioProcessing::default()
                },
                video_enhancements: if is_audio {
                    VideoEnhancements::default()
                } else {
                    choices.video_enhancements
                },
            },
        }
    }

    /// Full yt-dlp `outtmpl`: output directory joined with the filename template
    pub fn output_template(&self) -> String {
        self.output_dir
            .join(&self.filename_template)
            .to_string_lossy()
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advanced_choices() -> DownloadChoices {
        DownloadChoices {
            video_quality: VideoQuality::P480,
            video_container: VideoContainer::Webm,
            audio_codec: AudioCodec::Opus,
            audio_quality: AudioBitrate::Kbps128,
            download_subs: true,
            embed_thumbnail: true,
            normalize_audio: true,
            dynamic_normalization: true,
            denoise_audio: true,
            video_enhancements: VideoEnhancements {
                sharpen_video: true,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_basic_audio_defaults() {
        let request = DownloadRequest::resolve(
            DownloadMode::Basic,
            FormatType::Audio,
            &advanced_choices(),
            "/tmp/out",
            &FilenameTemplate::default(),
        );
        assert_eq!(request.audio_codec, AudioCodec::Mp3);
        assert_eq!(request.audio_quality, AudioBitrate::Kbps320);
        assert!(request.embed_thumbnail);
        assert!(!request.download_subs);
        assert_eq!(
            request.audio,
            AudioProcessing {
                denoise: false,
                normalize: true,
                dynamic: false
            }
        );
        assert_eq!(
            request.filename_template,
            "%(title)s - %(abr)skbps - %(uploader)s.%(ext)s"
        );
    }

    #[test]
    fn test_basic_video_defaults() {
        let request = DownloadRequest::resolve(
            DownloadMode::Basic,
            FormatType::Video,
            &advanced_choices(),
            "/tmp/out",
            &FilenameTemplate::default(),
        );
        assert_eq!(request.video_quality, VideoQuality::Best);
        assert_eq!(request.video_container, VideoContainer::Mp4);
        assert!(!request.embed_thumbnail);
        assert!(request.audio.filter_chain().is_none());
        assert!(!request.video_enhancements.any());
    }

    #[test]
    fn test_advanced_video_drops_audio_toggles() {
        let request = DownloadRequest::resolve(
            DownloadMode::Advanced,
            FormatType::Video,
            &advanced_choices(),
            "/tmp/out",
            &FilenameTemplate::default(),
        );
        assert_eq!(request.video_quality, VideoQuality::P480);
        assert_eq!(request.video_container, VideoContainer::Webm);
        assert!(request.download_subs);
        assert!(!request.embed_thumbnail);
        assert_eq!(request.audio, AudioProcessing::default());
        assert!(request.video_enhancements.sharpen_video);
    }

    #[test]
    fn test_advanced_audio_drops_enhancements() {
        let request = DownloadRequest::resolve(
            DownloadMode::Advanced,
            FormatType::Audio,
            &advanced_choices(),
            "/tmp/out",
            &FilenameTemplate::default(),
        );
        assert!(request.audio.dynamic);
        assert!(request.audio.denoise);
        assert!(!request.video_enhancements.any());
    }

    #[test]
    fn test_output_template_joins_directory() {
        let request = DownloadRequest::resolve(
            DownloadMode::Basic,
            FormatType::Video,
            &DownloadChoices::default(),
            "/home/user/Downloads",
            &FilenameTemplate::new([]),
        );
        assert_eq!(
            request.output_template(),
            "/home/user/Downloads/%(title)s.%(ext)s"
        );
    }
}
