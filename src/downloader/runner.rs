//! Running one yt-dlp download and streaming its progress

use crate::downloader::progress::{parse_line, progress_template, ProgressEvent};
use crate::extractor::YtDlp;
use crate::options::YdlOptions;
use crate::utils::diagnostics::strip_ansi;
use crate::utils::error::MorningStarError;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::process::Stdio;
use tokio_util::codec::{AnyDelimiterCodec, FramedRead};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// What yt-dlp reported about a finished download
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadOutcome {
    /// Last destination announced (merge/extract output wins over raw streams)
    pub final_path: Option<PathBuf>,
}

/// Splits on `\r` or `\n` without requiring valid UTF-8
fn line_codec() -> AnyDelimiterCodec {
    AnyDelimiterCodec::new(b"\r\n".to_vec(), b"\n".to_vec())
}

/// Arguments for a progress-reporting download
pub fn download_args(ytdlp: &YtDlp, opts: &YdlOptions, url: &str) -> Vec<String> {
    let mut args = vec![
        "--newline".to_string(),
        "--progress-template".to_string(),
        progress_template(),
    ];
    args.extend(ytdlp.args_for(opts, url));
    args
}

/// Download one URL, reporting parsed progress through `on_event`.
///
/// The child is killed as soon as `cancel` fires.
pub async fn run_download<F>(
    ytdlp: &YtDlp,
    url: &str,
    opts: &YdlOptions,
    cancel: &CancellationToken,
    mut on_event: F,
) -> Result<DownloadOutcome, MorningStarError>
where
    F: FnMut(ProgressEvent) + Send,
{
    let args = download_args(ytdlp, opts, url);
    debug!("Running {} {}", ytdlp.path().display(), args.join(" "));

    let mut child = ytdlp
        .command()
        .args(&args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| MorningStarError::OperationFailed("yt-dlp stdout unavailable".into()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| MorningStarError::OperationFailed("yt-dlp stderr unavailable".into()))?;

    let mut lines = stream::select(
        FramedRead::new(stdout, line_codec()),
        FramedRead::new(stderr, line_codec()),
    );

    let mut outcome = DownloadOutcome::default();
    let mut errors: Vec<String> = Vec::new();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Cancelling download of {}", url);
                let _ = child.kill().await;
                return Err(MorningStarError::Cancelled);
            }
            next = lines.next() => match next {
                Some(Ok(bytes)) => {
                    let line = strip_ansi(&String::from_utf8_lossy(&bytes));
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if line.starts_with("ERROR:") {
                        error!("{}", line);
                        errors.push(line.to_string());
                        continue;
                    }
                    if let Some(event) = parse_line(line) {
                        if let ProgressEvent::Destination { path, .. } = &event {
                            outcome.final_path = Some(path.clone());
                        }
                        on_event(event);
                    }
                }
                Some(Err(e)) => warn!("Unreadable yt-dlp output: {}", e),
                None => break,
            }
        }
    }

    let status = tokio::select! {
        _ = cancel.cancelled() => {
            let _ = child.kill().await;
            return Err(MorningStarError::Cancelled);
        }
        status = child.wait() => status?,
    };

    if !status.success() {
        let message = if errors.is_empty() {
            format!("yt-dlp exited with {}", status)
        } else {
            errors.join("\n")
        };
        return Err(MorningStarError::DownloadError(message));
    }

    info!("Finished {} -> {:?}", url, outcome.final_path);
    Ok(outcome)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::sync::{Arc, Mutex};

    fn fake_ytdlp(dir: &std::path::Path, body: &str) -> YtDlp {
        let script = dir.join("yt-dlp");
        std::fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        YtDlp::with_paths(script, None)
    }

    #[test]
    fn test_args_start_with_progress_template() {
        let ytdlp = YtDlp::with_paths(PathBuf::from("/bin/yt-dlp"), None);
        let args = download_args(&ytdlp, &YdlOptions::base(), "https://example.com/v");
        assert_eq!(args[0], "--newline");
        assert_eq!(args[1], "--progress-template");
        assert!(args[2].starts_with("download:[morningstar]"));
        assert_eq!(args.last().unwrap(), "https://example.com/v");
    }

    #[tokio::test]
    async fn test_progress_and_destination_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let ytdlp = fake_ytdlp(
            dir.path(),
            r#"echo "[download] Destination: /tmp/x/Clip.f137.mp4"
echo "[morningstar] downloading| 40.0%|40|100|NA|10|6|/tmp/x/Clip.f137.mp4"
echo "[morningstar] finished|100.0%|100|100|NA|NA|NA|/tmp/x/Clip.f137.mp4"
echo '[Merger] Merging formats into "/tmp/x/Clip.mp4"'
exit 0"#,
        );

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let outcome = run_download(
            &ytdlp,
            "https://example.com/v",
            &YdlOptions::base(),
            &CancellationToken::new(),
            move |e| sink.lock().unwrap().push(e),
        )
        .await
        .unwrap();

        assert_eq!(outcome.final_path, Some(PathBuf::from("/tmp/x/Clip.mp4")));
        let events = events.lock().unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, ProgressEvent::Downloading(p) if p.percent == 40.0)));
        assert!(events.contains(&ProgressEvent::PostProcessing));
    }

    #[tokio::test]
    async fn test_failure_collects_error_lines() {
        let dir = tempfile::tempdir().unwrap();
        let ytdlp = fake_ytdlp(
            dir.path(),
            r#"echo "WARNING: something odd" >&2
echo "ERROR: [generic] Unsupported URL: https://example.com/v" >&2
exit 1"#,
        );

        let err = run_download(
            &ytdlp,
            "https://example.com/v",
            &YdlOptions::base(),
            &CancellationToken::new(),
            |_| {},
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Download failed: ERROR: [generic] Unsupported URL: https://example.com/v"
        );
    }

    #[tokio::test]
    async fn test_cancel_kills_child() {
        let dir = tempfile::tempdir().unwrap();
        let ytdlp = fake_ytdlp(dir.path(), "sleep 30");
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let started = std::time::Instant::now();
        let err = run_download(&ytdlp, "https://example.com/v", &YdlOptions::base(), &cancel, |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, MorningStarError::Cancelled));
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
    }
}
