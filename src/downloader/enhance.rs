//! Filter pass over a finished video download
//!
//! yt-dlp's converter skips files that are already in the requested
//! container, so video and soundtrack filters are applied here with a
//! separate ffmpeg run on the final file. Streams without a filter are copied.

use crate::options::VideoEnhancements;
use crate::utils::error::MorningStarError;
use std::collections::VecDeque;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command as AsyncCommand;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const ENHANCING: &str = "Applying enhancements...";
const STDERR_TAIL_LINES: usize = 20;

/// `Clip.mp4` -> `Clip.enhanced.mp4` in the same directory
pub fn scratch_path(file: &Path) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = match file.extension() {
        Some(ext) => format!("{}.enhanced.{}", stem, ext.to_string_lossy()),
        None => format!("{}.enhanced", stem),
    };
    file.with_file_name(name)
}

/// Keeps the last `STDERR_TAIL_LINES` lines of ffmpeg's error output
async fn read_tail<R: AsyncRead + Unpin>(stderr: R) -> String {
    let mut segments = BufReader::new(stderr).split(b'\n');
    let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
    while let Ok(Some(segment)) = segments.next_segment().await {
        if tail.len() == STDERR_TAIL_LINES {
            tail.pop_front();
        }
        tail.push_back(String::from_utf8_lossy(&segment).trim_end().to_string());
    }
    tail.into_iter().collect::<Vec<_>>().join("\n")
}

pub fn ffmpeg_args(input: &Path, output: &Path, enhancements: &VideoEnhancements) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-y", "-hide_banner", "-loglevel", "error", "-i"]
        .iter()
        .map(OsString::from)
        .collect();
    args.push(input.as_os_str().to_owned());
    args.extend(["-map", "0"].iter().map(OsString::from));

    if let Some(chain) = enhancements.video_filter_chain() {
        args.push("-vf".into());
        args.push(chain.into());
    } else {
        args.extend(["-c:v", "copy"].iter().map(OsString::from));
    }

    if let Some(chain) = enhancements.audio_filter_chain() {
        args.push("-af".into());
        args.push(chain.into());
    } else {
        args.extend(["-c:a", "copy"].iter().map(OsString::from));
    }

    args.extend(["-c:s", "copy"].iter().map(OsString::from));
    args.push(output.as_os_str().to_owned());
    args
}

/// Re-encode `file` in place with the selected filters
pub async fn apply_enhancements(
    ffmpeg: &Path,
    file: &Path,
    enhancements: &VideoEnhancements,
    cancel: &CancellationToken,
) -> Result<(), MorningStarError> {
    if !enhancements.any() {
        return Ok(());
    }

    let scratch = scratch_path(file);
    let args = ffmpeg_args(file, &scratch, enhancements);
    debug!("Running {} {:?}", ffmpeg.display(), args);

    let mut child = AsyncCommand::new(ffmpeg)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;
    // Drained alongside the wait so a chatty ffmpeg never blocks on a full pipe
    let stderr_tail = child.stderr.take().map(|stderr| tokio::spawn(read_tail(stderr)));

    let status = tokio::select! {
        _ = cancel.cancelled() => {
            let _ = child.kill().await;
            let _ = tokio::fs::remove_file(&scratch).await;
            return Err(MorningStarError::Cancelled);
        }
        status = child.wait() => status?,
    };

    let detail = match stderr_tail {
        Some(handle) => handle.await.unwrap_or_default(),
        None => String::new(),
    };

    if !status.success() {
        let _ = tokio::fs::remove_file(&scratch).await;
        warn!("ffmpeg enhancement failed for {}: {}", file.display(), detail.trim());
        return Err(MorningStarError::DownloadError(format!(
            "Enhancement failed: {}",
            detail.trim()
        )));
    }

    tokio::fs::rename(&scratch, file).await?;
    info!("Enhanced {}", file.display());
    Ok(())
}
