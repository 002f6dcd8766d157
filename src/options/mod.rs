//! yt-dlp option construction

pub mod filters;
pub mod format;
pub mod request;
pub mod template;
pub mod ydl;

pub use filters::{AudioProcessing, VideoEnhancements};
pub use format::{format_selector, AudioBitrate, AudioCodec, FormatType, VideoContainer, VideoQuality};
pub use request::{DownloadChoices, DownloadMode, DownloadRequest};
pub use template::{FilenameTag, FilenameTemplate};
pub use ydl::{ExtractFlat, Postprocessor, YdlOptions};
