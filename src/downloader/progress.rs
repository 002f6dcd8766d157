//! Progress tracking from yt-dlp's console output
//!
//! Downloads run with `--newline` and a `--progress-template` that prints one
//! machine-readable line per update. Plain `[download]  42.0% ...` lines are
//! still understood in case the template is ignored.

use crate::utils::diagnostics::strip_ansi;
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

pub const PROGRESS_PREFIX: &str = "[morningstar]";
pub const POST_PROCESSING: &str = "Post-processing...";
const MAX_LABEL_CHARS: usize = 50;

/// Value for `--progress-template`
pub fn progress_template() -> String {
    format!(
        "download:{} %(progress.status)s|%(progress._percent_str)s|%(progress.downloaded_bytes)s|\
         %(progress.total_bytes)s|%(progress.total_bytes_estimate)s|%(progress.speed)s|\
         %(progress.eta)s|%(progress.filename)s",
        PROGRESS_PREFIX
    )
}

/// One progress reading for the item being downloaded
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadProgress {
    pub filename: String,
    /// 0.0 ..= 100.0
    pub percent: f32,
    /// Bytes per second
    pub speed: Option<f64>,
    pub eta: Option<Duration>,
}

impl DownloadProgress {
    /// Filename as shown next to the bar
    pub fn label(&self) -> String {
        shorten_label(&self.filename)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Downloading(DownloadProgress),
    /// Bare percentage from a classic `[download]` line
    Percent(f32),
    /// yt-dlp finished transferring and is running post-processors
    PostProcessing,
    /// File yt-dlp is writing (download target, merge output, extracted audio)
    Destination { path: PathBuf, post_processing: bool },
}

fn classic_percent_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[download\]\s+(\d+(?:\.\d+)?)%").expect("valid percent regex"))
}

fn quoted_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"Merging formats into "(.+)"$"#).expect("valid merger regex"))
}

/// Post-processor tags that mean the transfer itself is over
const POST_PROCESSOR_TAGS: [&str; 7] = [
    "[ExtractAudio]",
    "[Merger]",
    "[VideoConvertor]",
    "[EmbedThumbnail]",
    "[Metadata]",
    "[EmbedSubtitle]",
    "[Fixup",
];

/// `...` plus the last 47 characters when longer than 50
pub fn shorten_label(name: &str) -> String {
    let count = name.chars().count();
    if count <= MAX_LABEL_CHARS {
        return name.to_string();
    }
    let tail: String = name.chars().skip(count - (MAX_LABEL_CHARS - 3)).collect();
    format!("...{}", tail)
}

fn number(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Percent from yt-dlp's own string, else downloaded/total, else
/// downloaded/estimate; clamped to 0..=100
pub fn compute_percent(
    percent_str: &str,
    downloaded: Option<f64>,
    total: Option<f64>,
    estimate: Option<f64>,
) -> f32 {
    let from_string = number(strip_ansi(percent_str).trim().trim_end_matches('%')).unwrap_or(0.0);
    let ratio = |denominator: Option<f64>| match (downloaded, denominator) {
        (Some(done), Some(all)) if all > 0.0 => done / all * 100.0,
        _ => 0.0,
    };

    let mut percent = from_string;
    if percent == 0.0 {
        percent = ratio(total);
    }
    if percent == 0.0 {
        percent = ratio(estimate);
    }
    percent.clamp(0.0, 100.0) as f32
}

fn parse_template_line(body: &str) -> Option<ProgressEvent> {
    let fields: Vec<&str> = body.splitn(8, '|').collect();
    if fields.len() < 8 {
        return None;
    }
    let status = fields[0].trim();
    if status == "finished" {
        return Some(ProgressEvent::PostProcessing);
    }
    if status != "downloading" {
        return None;
    }

    let filename = match fields[7].trim() {
        "" | "NA" => "Downloading...".to_string(),
        name => name.to_string(),
    };
    Some(ProgressEvent::Downloading(DownloadProgress {
        filename,
        percent: compute_percent(fields[1], number(fields[2]), number(fields[3]), number(fields[4])),
        speed: number(fields[5]),
        eta: number(fields[6])
            .filter(|s| *s >= 0.0)
            .map(Duration::from_secs_f64),
    }))
}

/// Interpret one line of yt-dlp output
pub fn parse_line(raw: &str) -> Option<ProgressEvent> {
    let line = strip_ansi(raw);
    let line = line.trim();

    if let Some(body) = line.strip_prefix(PROGRESS_PREFIX) {
        return parse_template_line(body.trim_start());
    }

    if let Some(path) = line.strip_prefix("[download] Destination: ") {
        return Some(ProgressEvent::Destination {
            path: PathBuf::from(path),
            post_processing: false,
        });
    }

    if let Some(rest) = line.strip_prefix("[download] ") {
        if let Some(path) = rest.strip_suffix(" has already been downloaded") {
            return Some(ProgressEvent::Destination {
                path: PathBuf::from(path),
                post_processing: false,
            });
        }
    }

    if let Some(caps) = classic_percent_regex().captures(line) {
        let percent = number(&caps[1]).unwrap_or(0.0).clamp(0.0, 100.0);
        return Some(ProgressEvent::Percent(percent as f32));
    }

    if let Some(caps) = quoted_path_regex().captures(line) {
        return Some(ProgressEvent::Destination {
            path: PathBuf::from(&caps[1]),
            post_processing: true,
        });
    }

    if let Some(path) = line.strip_prefix("[ExtractAudio] Destination: ") {
        return Some(ProgressEvent::Destination {
            path: PathBuf::from(path),
            post_processing: true,
        });
    }

    if POST_PROCESSOR_TAGS.iter().any(|tag| line.starts_with(tag)) {
        return Some(ProgressEvent::PostProcessing);
    }

    None
}
