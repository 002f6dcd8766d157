#![cfg(unix)]

use av_morning_star::auth::BrowserPreference;
use av_morning_star::backend::{BackendActor, BackendCommand, BackendEvent};
use av_morning_star::database::{initialize_database, DatabaseManager, HistoryStatus};
use av_morning_star::downloader::BatchUpdate;
use av_morning_star::options::{DownloadMode, DownloadRequest, FormatType};
use av_morning_star::utils::config::AppSettings;
use av_morning_star::YtDlp;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const PLAYLIST: &str = r#"{"title":"Morning Mix","entries":[
{"title":"First Light","url":"https://media.example.net/v/first","uploader":"Dawn Chorus","duration":61.5},
null,
{"title":"Broken Track","url":"https://media.example.net/v/bad"}]}"#;

/// Answers `--version`, dumps a playlist for `--dump-single-json` and
/// "downloads" anything else except URLs containing `bad`
fn fake_ytdlp(dir: &Path) -> PathBuf {
    let script = dir.join("yt-dlp");
    let body = format!(
        r#"#!/bin/sh
for a; do url="$a"; done
case "$1" in
  --version) echo "2026.09.30"; exit 0 ;;
  --dump-single-json) cat <<'EOF'
{PLAYLIST}
EOF
    exit 0 ;;
esac
case "$url" in
  *bad*) echo "ERROR: [generic] Unable to download webpage: HTTP Error 404" >&2; exit 1 ;;
esac
echo "[download] Destination: {out}/First Light.mp3"
echo "[morningstar] downloading| 50.0%|512|1024|NA|256|2|{out}/First Light.mp3"
exit 0
"#,
        out = dir.display()
    );
    std::fs::write(&script, body).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

/// Next event that isn't background chatter, or panic after a while
async fn next_event(events: &mut mpsc::Receiver<BackendEvent>) -> BackendEvent {
    loop {
        let event = tokio::time::timeout(Duration::from_secs(20), events.recv())
            .await
            .expect("Timed out waiting for backend")
            .expect("Backend closed its event channel");
        match event {
            BackendEvent::BrowsersDetected { .. } | BackendEvent::FetchStatus(_) => continue,
            other => return other,
        }
    }
}

#[tokio::test]
async fn test_fetch_download_and_history() {
    let dir = tempfile::tempdir().unwrap();
    let script = fake_ytdlp(dir.path());

    let pool = initialize_database(&dir.path().join("morning_star.db"))
        .await
        .unwrap();
    let db = DatabaseManager::new(pool);
    let mut stored = AppSettings::default();
    stored.mode = DownloadMode::Advanced;
    stored.download_location = dir.path().to_path_buf();
    db.save_settings(&stored).await.unwrap();

    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (evt_tx, mut evt_rx) = mpsc::channel(64);
    let ytdlp = Arc::new(YtDlp::with_paths(script, None));
    let backend = tokio::spawn(BackendActor::new(Some(ytdlp), Some(db), cmd_rx, evt_tx).run());

    // Startup
    match next_event(&mut evt_rx).await {
        BackendEvent::SettingsLoaded(settings) => assert_eq!(settings, stored),
        other => panic!("expected settings first, got {:?}", other),
    }
    match next_event(&mut evt_rx).await {
        BackendEvent::ToolsDetected {
            ytdlp_version,
            ffmpeg_found,
        } => {
            assert_eq!(ytdlp_version.as_deref(), Some("2026.09.30"));
            assert!(!ffmpeg_found);
        }
        other => panic!("expected tool detection, got {:?}", other),
    }

    // Fetch skips the null entry
    let url = "https://media.example.net/playlist/morning".to_string();
    cmd_tx
        .send(BackendCommand::Fetch {
            url: url.clone(),
            preference: BrowserPreference::None,
        })
        .await
        .unwrap();
    let items = match next_event(&mut evt_rx).await {
        BackendEvent::FetchCompleted { url: fetched, items } => {
            assert_eq!(fetched, url);
            items
        }
        other => panic!("expected fetched items, got {:?}", other),
    };
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "First Light");
    assert_eq!(items[0].uploader, "Dawn Chorus");
    assert_eq!(items[0].duration, Some(61));
    assert_eq!(items[1].uploader, "Unknown");

    // Download both; the second fails and the batch carries on
    let request = DownloadRequest::resolve(
        DownloadMode::Basic,
        FormatType::Audio,
        &Default::default(),
        dir.path(),
        &Default::default(),
    );
    cmd_tx
        .send(BackendCommand::Download {
            items,
            request,
            preference: BrowserPreference::None,
        })
        .await
        .unwrap();

    let mut updates = Vec::new();
    let summary = loop {
        match next_event(&mut evt_rx).await {
            BackendEvent::BatchStarted { total } => assert_eq!(total, 2),
            BackendEvent::BatchProgress(update) => updates.push(update),
            BackendEvent::BatchFinished(summary) => break summary,
            other => panic!("unexpected event during batch: {:?}", other),
        }
    };
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed(), 1);
    assert!(!summary.cancelled);
    assert!(summary
        .message()
        .text()
        .starts_with("Completed with mixed results"));
    assert!(updates
        .iter()
        .any(|u| matches!(u, BatchUpdate::Progress { index: 1, percent, .. } if *percent == 50.0)));
    assert!(updates.iter().any(|u| matches!(
        u,
        BatchUpdate::ItemFailed { index: 2, total: 2, url, .. } if url.ends_with("/bad")
    )));

    // History follows the summary
    match next_event(&mut evt_rx).await {
        BackendEvent::History(history) => {
            assert_eq!(history.len(), 2);
            let done = history
                .iter()
                .find(|r| r.status == HistoryStatus::Completed)
                .expect("completed record");
            assert_eq!(done.title, "First Light");
            assert_eq!(done.format_type, "audio");
            assert_eq!(
                done.output_path.as_deref(),
                Some(dir.path().join("First Light.mp3").as_path())
            );
            let failed = history
                .iter()
                .find(|r| r.status == HistoryStatus::Failed)
                .expect("failed record");
            assert!(failed
                .error_message
                .as_deref()
                .unwrap_or_default()
                .contains("HTTP Error 404"));
        }
        other => panic!("expected history, got {:?}", other),
    }

    cmd_tx.send(BackendCommand::ClearHistory).await.unwrap();
    match next_event(&mut evt_rx).await {
        BackendEvent::History(history) => assert!(history.is_empty()),
        other => panic!("expected empty history, got {:?}", other),
    }

    cmd_tx.send(BackendCommand::Shutdown).await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), backend)
        .await
        .expect("Backend did not stop")
        .unwrap();
}
