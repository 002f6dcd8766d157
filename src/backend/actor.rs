use super::messages::{BackendCommand, BackendEvent};
use crate::auth::strategy::{handle_fetch_error, needs_cookie_retry, plan_fetch};
use crate::auth::{BrowserPreference, BrowserSurvey, FetchFailure};
use crate::database::{initialize_database, DatabaseManager, DownloadRecord, HistoryStatus};
use crate::downloader::{BatchJob, BatchRunner, BatchSummary, BatchUpdate};
use crate::extractor::{ExtractorRegistry, MediaItem, YtDlp};
use crate::options::DownloadRequest;
use crate::utils::error::MorningStarError;
use crate::utils::paths;
use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const HISTORY_LIMIT: u32 = 200;

/// State shared with the fetch and batch tasks the actor spawns
struct Shared {
    ytdlp: Option<Arc<YtDlp>>,
    db: Option<DatabaseManager>,
    survey: Mutex<Option<BrowserSurvey>>,
    /// Set once a cookieless YouTube fetch hit bot detection; kept for the session
    cookieless_failed: AtomicBool,
    /// Cancellation handle of the running batch; `None` when idle
    active_batch: Mutex<Option<CancellationToken>>,
}

impl Shared {
    fn ytdlp_path(&self) -> Option<PathBuf> {
        self.ytdlp.as_ref().map(|y| y.path().to_path_buf())
    }

    async fn fresh_survey(&self) -> BrowserSurvey {
        let survey = BrowserSurvey::collect(self.ytdlp_path().as_ref()).await;
        *self.survey.lock().await = Some(survey.clone());
        survey
    }

    async fn survey(&self) -> BrowserSurvey {
        if let Some(survey) = self.survey.lock().await.clone() {
            return survey;
        }
        self.fresh_survey().await
    }

    async fn cancel_batch(&self) -> bool {
        match self.active_batch.lock().await.as_ref() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    async fn record(&self, record: DownloadRecord) {
        if let Some(db) = &self.db {
            if let Err(e) = db.save_download(&record).await {
                warn!("Failed to record history for {}: {}", record.url, e);
            }
        }
    }

    async fn history(&self) -> Vec<DownloadRecord> {
        match &self.db {
            Some(db) => db.recent_downloads(HISTORY_LIMIT).await.unwrap_or_else(|e| {
                warn!("Failed to load history: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        }
    }
}

pub struct BackendActor {
    receiver: mpsc::Receiver<BackendCommand>,
    sender: mpsc::Sender<BackendEvent>,

    shared: Arc<Shared>,
}

impl BackendActor {
    pub fn new(
        ytdlp: Option<Arc<YtDlp>>,
        db: Option<DatabaseManager>,
        receiver: mpsc::Receiver<BackendCommand>,
        sender: mpsc::Sender<BackendEvent>,
    ) -> Self {
        Self {
            receiver,
            sender,
            shared: Arc::new(Shared {
                ytdlp,
                db,
                survey: Mutex::new(None),
                cookieless_failed: AtomicBool::new(false),
                active_batch: Mutex::new(None),
            }),
        }
    }

    /// Locate the tools and open the database under the platform data dir.
    /// Either may be missing; the GUI still starts and reports it.
    pub async fn start(
        receiver: mpsc::Receiver<BackendCommand>,
        sender: mpsc::Sender<BackendEvent>,
    ) -> Self {
        let ytdlp = match YtDlp::locate() {
            Ok(ytdlp) => Some(Arc::new(ytdlp)),
            Err(e) => {
                error!("{}", e);
                None
            }
        };

        let db = match open_database().await {
            Ok(db) => Some(db),
            Err(e) => {
                error!("Failed to open database: {}", e);
                None
            }
        };

        Self::new(ytdlp, db, receiver, sender)
    }

    pub async fn run(mut self) {
        info!("BackendActor started");
        self.announce_startup().await;

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                BackendCommand::Fetch { url, preference } => {
                    self.handle_fetch(url, preference);
                }
                BackendCommand::Download {
                    items,
                    request,
                    preference,
                } => {
                    self.handle_download(items, request, preference).await;
                }
                BackendCommand::CancelDownload => {
                    if self.shared.cancel_batch().await {
                        info!("Cancelling active batch");
                    }
                }
                BackendCommand::SaveSettings(settings) => {
                    if let Some(db) = &self.shared.db {
                        if let Err(e) = db.save_settings(&settings).await {
                            error!("Failed to save settings: {}", e);
                            self.emit(BackendEvent::Error(format!("Failed to save preferences: {}", e)))
                                .await;
                        }
                    }
                }
                BackendCommand::RefreshBrowsers => self.spawn_browser_survey(),
                BackendCommand::LoadHistory => {
                    let history = self.shared.history().await;
                    self.emit(BackendEvent::History(history)).await;
                }
                BackendCommand::ClearHistory => {
                    if let Some(db) = &self.shared.db {
                        if let Err(e) = db.clear_history().await {
                            error!("Failed to clear history: {}", e);
                        }
                    }
                    let history = self.shared.history().await;
                    self.emit(BackendEvent::History(history)).await;
                }
                BackendCommand::Shutdown => {
                    info!("BackendActor shutting down");
                    self.shared.cancel_batch().await;
                    break;
                }
            }
        }
    }

    async fn emit(&self, event: BackendEvent) {
        let _ = self.sender.send(event).await;
    }

    async fn announce_startup(&self) {
        let settings = match &self.shared.db {
            Some(db) => db.load_settings().await.unwrap_or_else(|e| {
                warn!("Falling back to default settings: {}", e);
                Default::default()
            }),
            None => Default::default(),
        };
        self.emit(BackendEvent::SettingsLoaded(settings)).await;

        let (ytdlp_version, ffmpeg_found) = match &self.shared.ytdlp {
            Some(ytdlp) => (ytdlp.version().await, ytdlp.ffmpeg().is_some()),
            None => (None, false),
        };
        info!("yt-dlp version: {:?}, ffmpeg: {}", ytdlp_version, ffmpeg_found);
        self.emit(BackendEvent::ToolsDetected {
            ytdlp_version,
            ffmpeg_found,
        })
        .await;

        self.spawn_browser_survey();
    }

    fn spawn_browser_survey(&self) {
        let shared = self.shared.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let survey = shared.fresh_survey().await;
            let _ = sender
                .send(BackendEvent::BrowsersDetected {
                    available: survey.available,
                    with_youtube: survey.with_youtube,
                })
                .await;
        });
    }

    fn handle_fetch(&self, url: String, preference: BrowserPreference) {
        let shared = self.shared.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let event = fetch(&shared, &sender, &url, preference).await;
            let _ = sender.send(event).await;
        });
    }

    async fn handle_download(
        &self,
        items: Vec<MediaItem>,
        request: DownloadRequest,
        preference: BrowserPreference,
    ) {
        let Some(ytdlp) = self.shared.ytdlp.clone() else {
            self.emit(BackendEvent::BatchRejected(
                MorningStarError::YtDlpNotFound.to_string(),
            ))
            .await;
            return;
        };
        let cancel = {
            let mut slot = self.shared.active_batch.lock().await;
            if slot.is_some() {
                drop(slot);
                self.emit(BackendEvent::BatchRejected(
                    "A download is already running".to_string(),
                ))
                .await;
                return;
            }
            let cancel = CancellationToken::new();
            *slot = Some(cancel.clone());
            cancel
        };

        let shared = self.shared.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let summary = run_batch(&shared, &sender, ytdlp, items, request, preference, cancel).await;
            shared.active_batch.lock().await.take();
            let _ = sender.send(BackendEvent::BatchFinished(summary)).await;
            let _ = sender.send(BackendEvent::History(shared.history().await)).await;
        });
    }
}

async fn open_database() -> Result<DatabaseManager> {
    let pool = initialize_database(&paths::database_path()).await?;
    Ok(DatabaseManager::new(pool))
}

async fn fetch(
    shared: &Shared,
    sender: &mpsc::Sender<BackendEvent>,
    url: &str,
    preference: BrowserPreference,
) -> BackendEvent {
    let Some(ytdlp) = shared.ytdlp.clone() else {
        return BackendEvent::FetchFailed {
            url: url.to_string(),
            failure: FetchFailure::Error {
                message: MorningStarError::YtDlpNotFound.to_string(),
            },
        };
    };

    let survey = match preference {
        BrowserPreference::None => BrowserSurvey::default(),
        _ => shared.survey().await,
    };
    let cookieless_failed = shared.cookieless_failed.load(Ordering::SeqCst);
    let plan = plan_fetch(url, preference, survey.resolve(preference), cookieless_failed);
    info!("{} ({})", plan.status, url);
    let _ = sender.send(BackendEvent::FetchStatus(plan.status.clone())).await;

    let result = match ExtractorRegistry::standard(ytdlp, plan.cookies) {
        Ok(registry) => registry.extract_info(url).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(items) => {
            info!("Fetched {} item(s) from {}", items.len(), url);
            BackendEvent::FetchCompleted {
                url: url.to_string(),
                items,
            }
        }
        Err(e) => {
            let error = format!("Error scraping URL: {}", e);
            warn!("{}", error);
            let retry = needs_cookie_retry(url, &error, cookieless_failed);
            let survey = if retry {
                shared.cookieless_failed.store(true, Ordering::SeqCst);
                shared.fresh_survey().await
            } else {
                survey
            };
            BackendEvent::FetchFailed {
                url: url.to_string(),
                failure: handle_fetch_error(url, &error, retry, &survey),
            }
        }
    }
}

fn history_record(
    batch_id: Uuid,
    item: Option<&MediaItem>,
    url: &str,
    request: &DownloadRequest,
    status: HistoryStatus,
    output_path: Option<PathBuf>,
    error_message: Option<String>,
) -> DownloadRecord {
    DownloadRecord {
        id: Uuid::new_v4().to_string(),
        batch_id: batch_id.to_string(),
        url: url.to_string(),
        title: item
            .map(|i| i.title.clone())
            .unwrap_or_else(|| url.to_string()),
        format_type: request.format_type.as_str().to_string(),
        output_path,
        status,
        error_message,
        created_at: Utc::now(),
    }
}

async fn run_batch(
    shared: &Shared,
    sender: &mpsc::Sender<BackendEvent>,
    ytdlp: Arc<YtDlp>,
    items: Vec<MediaItem>,
    request: DownloadRequest,
    preference: BrowserPreference,
    cancel: CancellationToken,
) -> BatchSummary {
    let cookies = match preference {
        BrowserPreference::None => None,
        _ => shared.survey().await.resolve(preference),
    };
    let urls = items.iter().map(|i| i.url.clone()).collect();
    let job = BatchJob::new(urls, request, cookies);
    let _ = sender
        .send(BackendEvent::BatchStarted {
            total: job.urls.len(),
        })
        .await;

    // Progress is reported synchronously by the runner; forward it from here
    let (update_tx, mut update_rx) = mpsc::unbounded_channel::<BatchUpdate>();
    let forward_sender = sender.clone();
    let forwarder = async {
        let mut in_flight = None;
        while let Some(update) = update_rx.recv().await {
            match &update {
                BatchUpdate::Started { index, .. } => in_flight = Some(*index),
                BatchUpdate::ItemDone { index, url, path } => {
                    in_flight = None;
                    shared
                        .record(history_record(
                            job.id,
                            items.get(index - 1),
                            url,
                            &job.request,
                            HistoryStatus::Completed,
                            path.clone(),
                            None,
                        ))
                        .await;
                }
                BatchUpdate::ItemFailed {
                    index, url, error, ..
                } => {
                    in_flight = None;
                    shared
                        .record(history_record(
                            job.id,
                            items.get(index - 1),
                            url,
                            &job.request,
                            HistoryStatus::Failed,
                            None,
                            Some(error.clone()),
                        ))
                        .await;
                }
                _ => {}
            }
            let _ = forward_sender.send(BackendEvent::BatchProgress(update)).await;
        }
        in_flight
    };

    let runner = BatchRunner::new(ytdlp);
    let run = async {
        let result = runner
            .run(&job, &cancel, |update| {
                let _ = update_tx.send(update);
            })
            .await;
        drop(update_tx);
        result
    };

    let (result, in_flight) = tokio::join!(run, forwarder);

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            error!("Batch {} could not start: {}", job.id, e);
            let mut summary = BatchSummary::default();
            for url in &job.urls {
                summary.record_failure(url.clone(), e.to_string());
            }
            summary
        }
    };

    if summary.cancelled {
        if let Some(index) = in_flight {
            let url = &job.urls[index - 1];
            shared
                .record(history_record(
                    job.id,
                    items.get(index - 1),
                    url,
                    &job.request,
                    HistoryStatus::Cancelled,
                    None,
                    None,
                ))
                .await;
        }
    }

    debug!("Batch {} summary: {:?}", job.id, summary);
    summary
}
