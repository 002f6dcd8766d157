//! Typed mirror of the yt-dlp option dictionary
//!
//! `YdlOptions` carries the same keys the yt-dlp library accepts. It can be
//! rendered as a JSON map (for logging and inspection) or as command-line
//! arguments for the `yt-dlp` executable.

use super::filters::AudioProcessing;
use super::format::{AudioBitrate, AudioCodec, FormatType};
use super::request::DownloadRequest;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

pub const SUBTITLE_LANGUAGES: [&str; 2] = ["en", "en-US"];

/// Post-processor name used as the `--postprocessor-args` key for audio extraction
pub const EXTRACT_AUDIO_PP: &str = "ExtractAudio";

/// How far playlist resolution goes when only metadata is wanted
///
/// The two modes only differ as library options (`extract_flat: true` versus
/// `"in_playlist"`). yt-dlp's command line has a single flat mode,
/// `--flat-playlist`, which is `in_playlist`, so both render to that flag and
/// a subprocess run always resolves the top-level page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractFlat {
    /// Never resolve nested URLs
    All,
    /// Resolve the top-level item but leave playlist entries flat
    InPlaylist,
}

impl ExtractFlat {
    /// The command-line flag a subprocess run uses for this mode
    pub fn cli_flag(self) -> &'static str {
        match self {
            ExtractFlat::All | ExtractFlat::InPlaylist => "--flat-playlist",
        }
    }

    /// Library value of the mode a subprocess run actually applies
    pub fn cli_mode(self) -> &'static str {
        "in_playlist"
    }
}

impl Serialize for ExtractFlat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExtractFlat::All => serializer.serialize_bool(true),
            ExtractFlat::InPlaylist => serializer.serialize_str("in_playlist"),
        }
    }
}

/// yt-dlp post-processor entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "key")]
pub enum Postprocessor {
    #[serde(rename = "FFmpegExtractAudio")]
    ExtractAudio {
        preferredcodec: String,
        preferredquality: String,
    },
    EmbedThumbnail,
    #[serde(rename = "FFmpegMetadata")]
    Metadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YdlOptions {
    pub quiet: bool,
    pub no_warnings: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment_retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket_timeout: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract_flat: Option<ExtractFlat>,
    #[serde(skip_serializing_if = "is_false")]
    pub skip_download: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignoreerrors: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nocheckcertificate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefer_insecure: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub outtmpl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noprogress: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_no_formats_error: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_output_format: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub postprocessors: Vec<Postprocessor>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub postprocessor_args: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "is_false")]
    pub writethumbnail: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub writesubtitles: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub writeautomaticsub: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtitleslangs: Vec<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub embedsubtitles: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remote_components: Vec<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "browser_tuple"
    )]
    pub cookiesfrombrowser: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ffmpeg_location: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// yt-dlp expects `cookiesfrombrowser` as a `(browser,)` tuple
fn browser_tuple<S: Serializer>(browser: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    match browser {
        Some(name) => (name.as_str(),).serialize(serializer),
        None => serializer.serialize_none(),
    }
}

impl YdlOptions {
    /// Options shared by every fetch and download
    pub fn base() -> Self {
        Self {
            quiet: true,
            no_warnings: true,
            retries: Some(3),
            fragment_retries: Some(3),
            socket_timeout: Some(30),
            ..Default::default()
        }
    }

    /// Metadata-only options: flat extraction, no format selection, never download
    pub fn fetch() -> Self {
        Self {
            extract_flat: Some(ExtractFlat::All),
            ignoreerrors: Some(false),
            skip_download: true,
            ..Self::base()
        }
    }

    /// Complete download options for one request
    pub fn download(request: &DownloadRequest) -> Self {
        let mut opts = Self::base();
        opts.outtmpl = Some(request.output_template());
        opts.noprogress = Some(false);
        opts.quiet = false;
        opts.no_warnings = false;
        opts.ignore_no_formats_error = Some(false);
        opts.ignoreerrors = Some(false);

        if request.download_subs {
            opts.writesubtitles = true;
            opts.writeautomaticsub = true;
            opts.subtitleslangs = SUBTITLE_LANGUAGES.iter().map(|s| s.to_string()).collect();
            if request.format_type == FormatType::Video {
                opts.embedsubtitles = true;
            }
        }

        match request.format_type {
            FormatType::Audio => opts.apply_audio(
                request.audio_codec,
                request.audio_quality,
                request.embed_thumbnail,
                request.audio,
            ),
            FormatType::Video => {
                opts.format = Some(request.video_quality.format_selector());
                opts.merge_output_format = Some(request.video_container.as_str().to_string());
            }
        }

        opts
    }

    fn apply_audio(
        &mut self,
        codec: AudioCodec,
        quality: AudioBitrate,
        embed_thumbnail: bool,
        processing: AudioProcessing,
    ) {
        self.format = Some("bestaudio/best".to_string());
        self.postprocessors.push(Postprocessor::ExtractAudio {
            preferredcodec: codec.as_str().to_string(),
            preferredquality: quality.preferred_quality().to_string(),
        });

        if let Some(chain) = processing.filter_chain() {
            self.postprocessor_args
                .insert(EXTRACT_AUDIO_PP.to_string(), vec!["-af".to_string(), chain]);
        }

        if embed_thumbnail {
            self.postprocessors.push(Postprocessor::EmbedThumbnail);
            self.writethumbnail = true;
        }

        self.postprocessors.push(Postprocessor::Metadata);
    }

    /// Attach browser cookies, if any
    pub fn with_cookies(mut self, browser: Option<&str>) -> Self {
        self.cookiesfrombrowser = browser.map(str::to_string);
        self
    }

    /// JSON map keyed the way the yt-dlp library names its options
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// `to_json` adjusted to what `to_args` actually applies
    pub fn to_effective_json(&self) -> serde_json::Result<serde_json::Value> {
        let mut json = self.to_json()?;
        if let (Some(mode), Some(map)) = (self.extract_flat, json.as_object_mut()) {
            map.insert("extract_flat".to_string(), mode.cli_mode().into());
        }
        Ok(json)
    }

    /// Equivalent `yt-dlp` command-line arguments (URL not included)
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();
        let mut flag = |args: &mut Vec<String>, name: &str| args.push(name.to_string());

        if self.quiet {
            flag(&mut args, "--quiet");
        }
        if self.no_warnings {
            flag(&mut args, "--no-warnings");
        }
        push_value(&mut args, "--retries", self.retries);
        push_value(&mut args, "--fragment-retries", self.fragment_retries);
        push_value(&mut args, "--socket-timeout", self.socket_timeout);

        if let Some(mode) = self.extract_flat {
            flag(&mut args, mode.cli_flag());
        }
        if self.skip_download {
            flag(&mut args, "--skip-download");
        }
        match self.ignoreerrors {
            Some(true) => flag(&mut args, "--ignore-errors"),
            Some(false) => flag(&mut args, "--no-ignore-errors"),
            None => {}
        }
        if self.nocheckcertificate == Some(true) {
            flag(&mut args, "--no-check-certificates");
        }
        if self.prefer_insecure == Some(true) {
            flag(&mut args, "--prefer-insecure");
        }

        push_value(&mut args, "-o", self.outtmpl.as_ref());
        if self.noprogress == Some(true) {
            flag(&mut args, "--no-progress");
        }
        if self.ignore_no_formats_error == Some(true) {
            flag(&mut args, "--ignore-no-formats-error");
        }

        push_value(&mut args, "-f", self.format.as_ref());
        push_value(
            &mut args,
            "--merge-output-format",
            self.merge_output_format.as_ref(),
        );

        let mut embeds_thumbnail = false;
        for pp in &self.postprocessors {
            match pp {
                Postprocessor::ExtractAudio {
                    preferredcodec,
                    preferredquality,
                } => {
                    flag(&mut args, "--extract-audio");
                    push_value(&mut args, "--audio-format", Some(preferredcodec));
                    push_value(&mut args, "--audio-quality", Some(preferredquality));
                }
                Postprocessor::EmbedThumbnail => {
                    embeds_thumbnail = true;
                    flag(&mut args, "--embed-thumbnail");
                }
                Postprocessor::Metadata => flag(&mut args, "--embed-metadata"),
            }
        }
        // --embed-thumbnail already writes the image and removes it afterwards
        if self.writethumbnail && !embeds_thumbnail {
            flag(&mut args, "--write-thumbnail");
        }
        for (pp, pp_args) in &self.postprocessor_args {
            args.push("--postprocessor-args".to_string());
            args.push(format!("{}:{}", pp, pp_args.join(" ")));
        }

        if self.writesubtitles {
            flag(&mut args, "--write-subs");
        }
        if self.writeautomaticsub {
            flag(&mut args, "--write-auto-subs");
        }
        if !self.subtitleslangs.is_empty() {
            push_value(&mut args, "--sub-langs", Some(self.subtitleslangs.join(",")));
        }
        if self.embedsubtitles {
            flag(&mut args, "--embed-subs");
        }

        for component in &self.remote_components {
            push_value(&mut args, "--remote-components", Some(component));
        }
        push_value(
            &mut args,
            "--cookies-from-browser",
            self.cookiesfrombrowser.as_ref(),
        );
        push_value(&mut args, "--ffmpeg-location", self.ffmpeg_location.as_ref());

        args
    }
}

fn push_value<T: ToString>(args: &mut Vec<String>, name: &str, value: Option<T>) {
    if let Some(value) = value {
        args.push(name.to_string());
        args.push(value.to_string());
    }
}
