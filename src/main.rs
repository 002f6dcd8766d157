//! AV Morning Star - Video & Audio Downloader
//!
//! A desktop front end for yt-dlp and ffmpeg. Without flags the GUI starts;
//! `--fetch` and `--download` run the same backend headless.

use anyhow::{bail, Context, Result};
use av_morning_star::auth::{validate_url, BrowserPreference, FetchFailure};
use av_morning_star::backend::{BackendActor, BackendCommand, BackendEvent};
use av_morning_star::downloader::BatchUpdate;
use av_morning_star::extractor::MediaItem;
use av_morning_star::gui::{self, MorningStarApp};
use av_morning_star::options::{DownloadRequest, FormatType};
use av_morning_star::utils::{config::AppSettings, paths};
use clap::Parser;
use iced::Application;
use path_absolutize::Absolutize;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "av-morning-star", version, about)]
struct Args {
    /// List the items found at URL and exit
    #[arg(long, value_name = "URL", conflicts_with = "download")]
    fetch: Option<String>,

    /// Download every item found at URL and exit
    #[arg(long, value_name = "URL")]
    download: Option<String>,

    /// Extract audio instead of downloading video
    #[arg(long, requires = "download")]
    audio: bool,

    /// Output directory (defaults to the saved download location)
    #[arg(long, value_name = "DIR", requires = "download")]
    output: Option<PathBuf>,

    /// Browser cookies to use: auto, none, firefox, chrome, ...
    #[arg(long, value_name = "NAME")]
    browser: Option<BrowserPreference>,
}

/// What a headless run should do once items are fetched
struct HeadlessJob {
    url: String,
    download: Option<DownloadTarget>,
    browser: Option<BrowserPreference>,
}

struct DownloadTarget {
    format_type: FormatType,
    output: Option<PathBuf>,
}

/// `None` starts the GUI; a headless URL must pass the same check as the URL field
fn headless_job(args: Args) -> Result<Option<HeadlessJob>> {
    let (url, download) = match (args.fetch, args.download) {
        (Some(url), _) => (url, None),
        (None, Some(url)) => (
            url,
            Some(DownloadTarget {
                format_type: if args.audio {
                    FormatType::Audio
                } else {
                    FormatType::Video
                },
                output: args.output,
            }),
        ),
        (None, None) => return Ok(None),
    };

    let url = match validate_url(&url) {
        Ok(url) => url.to_string(),
        Err(message) => bail!(message),
    };

    Ok(Some(HeadlessJob {
        url,
        download,
        browser: args.browser,
    }))
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let job = headless_job(args)?;

    if let Some(job) = job {
        let rt = tokio::runtime::Runtime::new()?;
        return rt.block_on(run_headless(job));
    }

    MorningStarApp::run(iced::Settings {
        window: iced::window::Settings {
            size: iced::Size::new(1000.0, 900.0),
            min_size: Some(iced::Size::new(900.0, 850.0)),
            icon: gui::icon::load_icon(),
            ..Default::default()
        },
        antialiasing: true,
        ..Default::default()
    })?;

    Ok(())
}

/// Drive the backend actor from the terminal, the same way the GUI does
async fn run_headless(job: HeadlessJob) -> Result<()> {
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (evt_tx, mut evt_rx) = mpsc::channel(256);
    let actor = BackendActor::start(cmd_rx, evt_tx).await;
    let backend = tokio::spawn(actor.run());

    let mut settings = AppSettings::default();
    let mut preference = BrowserPreference::Auto;
    let mut outcome: Result<()> = Ok(());

    loop {
        let event = tokio::select! {
            event = evt_rx.recv() => match event {
                Some(event) => event,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted, cancelling");
                cmd_tx.send(BackendCommand::CancelDownload).await?;
                continue;
            }
        };

        match event {
            BackendEvent::SettingsLoaded(loaded) => {
                settings = loaded;
                preference = job.browser.unwrap_or(settings.browser_preference);
                cmd_tx
                    .send(BackendCommand::Fetch {
                        url: job.url.clone(),
                        preference,
                    })
                    .await?;
            }
            BackendEvent::ToolsDetected {
                ytdlp_version,
                ffmpeg_found,
            } => {
                info!(
                    "yt-dlp {}, ffmpeg {}",
                    ytdlp_version.as_deref().unwrap_or("missing"),
                    if ffmpeg_found { "found" } else { "missing" }
                );
            }
            BackendEvent::FetchStatus(status) => info!("{}", status),
            BackendEvent::FetchCompleted { items, .. } => {
                print_items(&items);
                match &job.download {
                    Some(_) if items.is_empty() => {
                        outcome = Err(anyhow::anyhow!("No videos found at the provided URL"));
                        break;
                    }
                    Some(target) => {
                        let request = build_request(&settings, target)?;
                        println!(
                            "Starting download of {} item(s) to {}",
                            items.len(),
                            request.output_dir.display()
                        );
                        cmd_tx
                            .send(BackendCommand::Download {
                                items,
                                request,
                                preference,
                            })
                            .await?;
                    }
                    None => break,
                }
            }
            BackendEvent::FetchFailed { failure, .. } => {
                outcome = Err(fetch_failure_error(failure));
                break;
            }
            BackendEvent::BatchProgress(update) => print_update(&update),
            BackendEvent::BatchRejected(message) => {
                outcome = Err(anyhow::anyhow!(message));
                break;
            }
            BackendEvent::BatchFinished(summary) => {
                let message = summary.message();
                println!("{}", message.text());
                if message.is_error() {
                    outcome = Err(anyhow::anyhow!("{} download(s) failed", summary.failed()));
                }
                break;
            }
            BackendEvent::Error(message) => warn!("{}", message),
            BackendEvent::BrowsersDetected { .. }
            | BackendEvent::BatchStarted { .. }
            | BackendEvent::History(_) => {}
        }
    }

    let _ = cmd_tx.send(BackendCommand::Shutdown).await;
    if let Err(e) = backend.await {
        warn!("Backend task ended abnormally: {}", e);
    }
    outcome
}

fn build_request(settings: &AppSettings, target: &DownloadTarget) -> Result<DownloadRequest> {
    let output_dir = match &target.output {
        Some(dir) => paths::expand_home(&dir.to_string_lossy())
            .absolutize()
            .context("Invalid output directory")?
            .into_owned(),
        None => settings.download_location.clone(),
    };
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Cannot create {}", output_dir.display()))?;

    Ok(DownloadRequest::resolve(
        settings.mode,
        target.format_type,
        &settings.choices,
        output_dir,
        &settings.filename_template,
    ))
}

fn fetch_failure_error(failure: FetchFailure) -> anyhow::Error {
    match failure {
        FetchFailure::OfferRetry { browser, .. } => anyhow::anyhow!(
            "YouTube is requesting authentication. You are logged in with {}; rerun with --browser {}",
            browser,
            browser.as_str()
        ),
        FetchFailure::AuthenticationRequired { message } | FetchFailure::Error { message } => {
            anyhow::anyhow!(message)
        }
    }
}

fn print_items(items: &[MediaItem]) {
    if items.is_empty() {
        println!("No videos found");
        return;
    }
    println!("Found {} video(s)", items.len());
    for (i, item) in items.iter().enumerate() {
        println!("{:>3}. {}", i + 1, item.title);
        println!(
            "     Uploader: {} | Duration: {}",
            item.uploader,
            item.duration_display()
        );
        println!("     {}", item.url);
    }
}

fn print_update(update: &BatchUpdate) {
    match update {
        BatchUpdate::Progress { .. } => {
            if let Some(percent) = update.percent() {
                println!("[{:>5.1}%] {}", percent, update.status_text());
            }
        }
        BatchUpdate::ItemFailed { url, error, .. } => {
            println!("{} ({}: {})", update.status_text(), url, error);
        }
        _ => println!("{}", update.status_text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "av-morning-star",
            "--download",
            "https://example.com/v",
            "--audio",
            "--browser",
            "firefox",
        ])
        .unwrap();
        assert_eq!(args.download.as_deref(), Some("https://example.com/v"));
        assert!(args.audio);
        assert!(matches!(args.browser, Some(BrowserPreference::Browser(_))));

        // --audio only makes sense with --download
        assert!(Args::try_parse_from(["av-morning-star", "--audio"]).is_err());
        assert!(Args::try_parse_from([
            "av-morning-star",
            "--fetch",
            "https://a",
            "--download",
            "https://b"
        ])
        .is_err());
    }

    #[test]
    fn test_build_request_uses_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = DownloadTarget {
            format_type: FormatType::Audio,
            output: Some(dir.path().join("music")),
        };
        let request = build_request(&AppSettings::default(), &target).unwrap();
        assert_eq!(request.output_dir, dir.path().join("music"));
        assert_eq!(request.format_type, FormatType::Audio);
        assert!(dir.path().join("music").is_dir());
    }

    fn job_for(argv: &[&str]) -> Result<Option<HeadlessJob>> {
        let mut full = vec!["av-morning-star"];
        full.extend_from_slice(argv);
        headless_job(Args::try_parse_from(full).unwrap())
    }

    #[test]
    fn test_headless_job_rejects_bad_urls() {
        let err = job_for(&["--fetch", "ftp://x"]).err().unwrap();
        assert_eq!(
            err.to_string(),
            "Please enter a valid URL starting with http:// or https://"
        );
        let err = job_for(&["--download", "   "]).err().unwrap();
        assert_eq!(err.to_string(), "Please enter a URL");
    }

    #[test]
    fn test_headless_job_trims_and_keeps_target() {
        let job = job_for(&["--download", "  https://example.com/v  ", "--audio"])
            .unwrap()
            .unwrap();
        assert_eq!(job.url, "https://example.com/v");
        assert_eq!(job.download.unwrap().format_type, FormatType::Audio);

        let job = job_for(&["--fetch", "https://example.com/list"]).unwrap().unwrap();
        assert!(job.download.is_none());

        assert!(job_for(&[]).unwrap().is_none());
    }
}
