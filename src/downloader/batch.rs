//! Sequential batch downloads
//!
//! Items are downloaded one at a time in selection order. A failed item is
//! recorded and the batch moves on; cancellation stops the batch after
//! killing the running child.

use crate::auth::Browser;
use crate::downloader::enhance::{apply_enhancements, ENHANCING};
use crate::downloader::progress::{shorten_label, ProgressEvent, POST_PROCESSING};
use crate::downloader::runner::run_download;
use crate::downloader::summary::BatchSummary;
use crate::extractor::{ExtractorRegistry, YtDlp};
use crate::options::{DownloadRequest, FormatType, YdlOptions};
use crate::utils::error::MorningStarError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

/// A set of selected item URLs downloaded with one request
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub id: Uuid,
    pub urls: Vec<String>,
    pub request: DownloadRequest,
    pub cookies: Option<Browser>,
}

impl BatchJob {
    pub fn new(urls: Vec<String>, request: DownloadRequest, cookies: Option<Browser>) -> Self {
        Self {
            id: Uuid::new_v4(),
            urls,
            request,
            cookies,
        }
    }
}

/// Per-item state changes reported while a batch runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BatchUpdate {
    Started {
        index: usize,
        total: usize,
    },
    Progress {
        index: usize,
        total: usize,
        label: String,
        percent: f32,
        speed: Option<f64>,
        eta: Option<Duration>,
    },
    PostProcessing {
        index: usize,
        total: usize,
        label: String,
    },
    ItemDone {
        index: usize,
        url: String,
        path: Option<PathBuf>,
    },
    ItemFailed {
        index: usize,
        total: usize,
        url: String,
        error: String,
    },
}

impl BatchUpdate {
    /// Status line for the progress area (indices are 1-based)
    pub fn status_text(&self) -> String {
        match self {
            BatchUpdate::Started { index, total } => format!("Downloading {}/{}...", index, total),
            BatchUpdate::Progress { label, .. } => label.clone(),
            BatchUpdate::PostProcessing { label, .. } => label.clone(),
            BatchUpdate::ItemDone { url, .. } => format!("Finished {}", url),
            BatchUpdate::ItemFailed { index, total, .. } => {
                format!("Failed {}/{}, continuing...", index, total)
            }
        }
    }

    /// Bar value for this update, if it carries one
    pub fn percent(&self) -> Option<f32> {
        match self {
            BatchUpdate::Started { .. } => Some(0.0),
            BatchUpdate::Progress { percent, .. } => Some(*percent),
            BatchUpdate::PostProcessing { .. } | BatchUpdate::ItemDone { .. } => Some(100.0),
            BatchUpdate::ItemFailed { .. } => None,
        }
    }
}

/// Drives yt-dlp (and the enhancement pass) over a batch
pub struct BatchRunner {
    ytdlp: Arc<YtDlp>,
}

impl BatchRunner {
    pub fn new(ytdlp: Arc<YtDlp>) -> Self {
        Self { ytdlp }
    }

    pub async fn run<F>(
        &self,
        job: &BatchJob,
        cancel: &CancellationToken,
        mut report: F,
    ) -> Result<BatchSummary>
    where
        F: FnMut(BatchUpdate) + Send,
    {
        let registry = ExtractorRegistry::standard(self.ytdlp.clone(), job.cookies)?;
        let total = job.urls.len();
        let mut summary = BatchSummary::default();
        info!("Starting batch {} with {} item(s)", job.id, total);

        for (i, url) in job.urls.iter().enumerate() {
            let index = i + 1;
            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            report(BatchUpdate::Started { index, total });
            let extractor = registry.find_extractor(url);
            let opts = extractor.download_options(&job.request);

            let result = self
                .download_one(url, index, total, &opts, &job.request, cancel, &mut report)
                .await;

            match result {
                Ok(path) => {
                    summary.record_success();
                    report(BatchUpdate::ItemDone {
                        index,
                        url: url.clone(),
                        path,
                    });
                }
                Err(MorningStarError::Cancelled) => {
                    summary.cancelled = true;
                    break;
                }
                Err(e) => {
                    warn!("Item {}/{} failed ({}): {}", index, total, url, e);
                    summary.record_failure(url.clone(), e.to_string());
                    report(BatchUpdate::ItemFailed {
                        index,
                        total,
                        url: url.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Batch {} finished: {} succeeded, {} failed{}",
            job.id,
            summary.succeeded,
            summary.failed(),
            if summary.cancelled { " (cancelled)" } else { "" }
        );
        Ok(summary)
    }

    #[allow(clippy::too_many_arguments)]
    async fn download_one<F>(
        &self,
        url: &str,
        index: usize,
        total: usize,
        opts: &YdlOptions,
        request: &DownloadRequest,
        cancel: &CancellationToken,
        report: &mut F,
    ) -> Result<Option<PathBuf>, MorningStarError>
    where
        F: FnMut(BatchUpdate) + Send,
    {
        let mut label = String::from("Downloading...");
        let outcome = run_download(&self.ytdlp, url, opts, cancel, |event| match event {
            ProgressEvent::Downloading(progress) => {
                label = progress.label();
                report(BatchUpdate::Progress {
                    index,
                    total,
                    label: label.clone(),
                    percent: progress.percent,
                    speed: progress.speed,
                    eta: progress.eta,
                });
            }
            ProgressEvent::Percent(percent) => report(BatchUpdate::Progress {
                index,
                total,
                label: label.clone(),
                percent,
                speed: None,
                eta: None,
            }),
            ProgressEvent::PostProcessing => report(BatchUpdate::PostProcessing {
                index,
                total,
                label: POST_PROCESSING.to_string(),
            }),
            ProgressEvent::Destination {
                path,
                post_processing,
            } => {
                label = shorten_label(&path.to_string_lossy());
                if post_processing {
                    report(BatchUpdate::PostProcessing {
                        index,
                        total,
                        label: POST_PROCESSING.to_string(),
                    });
                }
            }
        })
        .await?;

        let enhancements = request.video_enhancements;
        if request.format_type == FormatType::Video && enhancements.any() {
            let ffmpeg = self.ytdlp.ffmpeg().ok_or_else(|| {
                MorningStarError::DownloadError("ffmpeg is required for video enhancements".into())
            })?;
            match &outcome.final_path {
                Some(path) => {
                    report(BatchUpdate::PostProcessing {
                        index,
                        total,
                        label: ENHANCING.to_string(),
                    });
                    apply_enhancements(ffmpeg, path, &enhancements, cancel).await?;
                }
                None => warn!("No output file reported for {}; skipping enhancements", url),
            }
        }

        Ok(outcome.final_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_texts() {
        assert_eq!(
            BatchUpdate::Started { index: 2, total: 5 }.status_text(),
            "Downloading 2/5..."
        );
        assert_eq!(
            BatchUpdate::ItemFailed {
                index: 3,
                total: 5,
                url: "u".into(),
                error: "e".into()
            }
            .status_text(),
            "Failed 3/5, continuing..."
        );
        assert_eq!(
            BatchUpdate::PostProcessing {
                index: 1,
                total: 1,
                label: POST_PROCESSING.into()
            }
            .percent(),
            Some(100.0)
        );
    }

    #[test]
    fn test_job_ids_are_unique() {
        let request = DownloadRequest::resolve(
            crate::options::DownloadMode::Basic,
            FormatType::Audio,
            &Default::default(),
            "/tmp",
            &Default::default(),
        );
        let a = BatchJob::new(vec![], request.clone(), None);
        let b = BatchJob::new(vec![], request, None);
        assert_ne!(a.id, b.id);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_batch_continues_after_failure() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("yt-dlp");
        // Fails for any URL containing "bad"
        std::fs::write(
            &script,
            r#"#!/bin/sh
for a; do url="$a"; done
case "$url" in
  *bad*) echo "ERROR: Unable to download $url" >&2; exit 1 ;;
esac
echo "[download] Destination: /tmp/out/ok.mp3"
echo "[morningstar] downloading| 50.0%|5|10|NA|NA|NA|/tmp/out/ok.mp3"
exit 0
"#,
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let runner = BatchRunner::new(Arc::new(YtDlp::with_paths(script, None)));
        let request = DownloadRequest::resolve(
            crate::options::DownloadMode::Basic,
            FormatType::Audio,
            &Default::default(),
            dir.path(),
            &Default::default(),
        );
        let job = BatchJob::new(
            vec![
                "https://example.com/good1".into(),
                "https://example.com/bad".into(),
                "https://example.com/good2".into(),
            ],
            request,
            None,
        );

        let mut updates = Vec::new();
        let summary = runner
            .run(&job, &CancellationToken::new(), |u| updates.push(u))
            .await
            .unwrap();

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.failures[0].0, "https://example.com/bad");
        assert!(summary.failures[0].1.contains("Unable to download"));
        assert!(updates.contains(&BatchUpdate::ItemFailed {
            index: 2,
            total: 3,
            url: "https://example.com/bad".into(),
            error: summary.failures[0].1.clone(),
        }));
        assert!(updates.iter().any(|u| matches!(
            u,
            BatchUpdate::ItemDone { index: 3, path: Some(p), .. } if p == &PathBuf::from("/tmp/out/ok.mp3")
        )));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let runner = BatchRunner::new(Arc::new(YtDlp::with_paths(
            PathBuf::from("/nonexistent/yt-dlp"),
            None,
        )));
        let request = DownloadRequest::resolve(
            crate::options::DownloadMode::Basic,
            FormatType::Video,
            &Default::default(),
            "/tmp",
            &Default::default(),
        );
        let job = BatchJob::new(vec!["https://example.com/a".into()], request, None);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let summary = runner.run(&job, &cancel, |_| {}).await.unwrap();
        assert!(summary.cancelled);
        assert_eq!(summary.succeeded, 0);
    }
}
