//! ffmpeg filter graphs for audio clean-up and video enhancement

use serde::{Deserialize, Serialize};

/// FFT-based broadband noise reduction with a -20 dB floor
pub const AUDIO_DENOISE: &str = "afftdn=nf=-20:nr=15:tn=1";
/// EBU R128 loudness target (-16 LUFS, -1.5 dBTP), resampled back to 48 kHz
pub const EBU_R128_LOUDNORM: &str = "loudnorm=I=-16:LRA=11:TP=-1.5,aresample=48000";
pub const DYNAMIC_NORMALIZATION: &str = "dynaudnorm=p=0.95:m=10:s=12:g=5";

pub const VIDEO_DENOISE: &str = "hqdn3d=4:3:6:4.5";
pub const VIDEO_STABILIZE: &str = "deshake=rx=32:ry=32:edge=mirror";
pub const VIDEO_SHARPEN: &str = "unsharp=5:5:0.8";

/// Audio clean-up chosen for an audio-only download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AudioProcessing {
    pub denoise: bool,
    pub normalize: bool,
    /// Use dynaudnorm instead of loudnorm when `normalize` is set
    pub dynamic: bool,
}

impl AudioProcessing {
    /// `-af` chain: denoise first, then a single normalizer
    pub fn filter_chain(&self) -> Option<String> {
        let mut filters = Vec::new();
        if self.denoise {
            filters.push(AUDIO_DENOISE);
        }
        if self.normalize {
            filters.push(if self.dynamic {
                DYNAMIC_NORMALIZATION
            } else {
                EBU_R128_LOUDNORM
            });
        }
        join(&filters)
    }
}

/// Enhancements applied to the merged file of a video download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VideoEnhancements {
    pub denoise_video: bool,
    pub stabilize_video: bool,
    pub sharpen_video: bool,
    pub normalize_audio: bool,
    pub denoise_audio: bool,
}

impl VideoEnhancements {
    pub fn any(&self) -> bool {
        self.video_filter_chain().is_some() || self.audio_filter_chain().is_some()
    }

    /// `-vf` chain in fixed order: denoise, stabilize, sharpen
    pub fn video_filter_chain(&self) -> Option<String> {
        let mut filters = Vec::new();
        if self.denoise_video {
            filters.push(VIDEO_DENOISE);
        }
        if self.stabilize_video {
            filters.push(VIDEO_STABILIZE);
        }
        if self.sharpen_video {
            filters.push(VIDEO_SHARPEN);
        }
        join(&filters)
    }

    /// `-af` chain for the soundtrack of a video
    pub fn audio_filter_chain(&self) -> Option<String> {
        AudioProcessing {
            denoise: self.denoise_audio,
            normalize: self.normalize_audio,
            dynamic: false,
        }
        .filter_chain()
    }
}

fn join(filters: &[&str]) -> Option<String> {
    if filters.is_empty() {
        None
    } else {
        Some(filters.join(","))
    }
}
