use av_morning_star::extractor::podcast::{
    extract_audio_links, is_audio_url, title_from_url, PODCAST_UPLOADER,
};
use av_morning_star::extractor::{ExtractorRegistry, YtDlp};
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

const SHOW_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head><title>The Dawn Show</title></head>
  <body>
    <ul class="episodes">
      <li><a href="/media/001_first-light.mp3">Episode 1</a></li>
      <li><a href="/media/002_golden-hour.m4a?dl=1">Episode 2</a></li>
      <li><a href="https://cdn.example.org/003-blue_hour.opus">Episode 3</a></li>
      <li><a href="/media/001_first-light.mp3">Download again</a></li>
    </ul>
    <a href="/media/cover.jpg">Cover</a>
    <a href="mailto:host@example.org">Contact</a>
  </body>
</html>"#;

#[test]
fn test_show_page_scan() {
    let page = Url::parse("https://dawn.example.org/shows/dawn/").unwrap();
    let links = extract_audio_links(SHOW_PAGE, &page);
    assert_eq!(
        links,
        vec![
            "https://dawn.example.org/media/001_first-light.mp3",
            "https://dawn.example.org/media/002_golden-hour.m4a?dl=1",
            "https://cdn.example.org/003-blue_hour.opus",
        ]
    );

    let titles: Vec<String> = links.iter().map(|l| title_from_url(l)).collect();
    assert_eq!(titles, vec!["001 first light", "002 golden hour", "003 blue hour"]);
}

#[test]
fn test_audio_url_edge_cases() {
    assert!(is_audio_url("https://x.example/ep.WAV"));
    assert!(is_audio_url("https://x.example/ep.flac#t=30"));
    assert!(!is_audio_url("https://x.example/feed.xml"));
    assert!(!is_audio_url("https://x.example/mp3"));
}

#[test]
fn test_standard_registry_routing() {
    let ytdlp = Arc::new(YtDlp::with_paths(PathBuf::from("yt-dlp"), None));
    let registry = ExtractorRegistry::standard(ytdlp, None).unwrap();

    let cases = [
        ("https://m.youtube.com/playlist?list=PL1", "youtube"),
        ("https://odysee.com/@chan:1/video:2", "odysee"),
        ("https://dawn.example.org/media/ep.ogg", "podcast-page"),
        ("https://dawn.example.org/shows/dawn/", "generic"),
    ];
    for (url, id) in cases {
        assert_eq!(registry.find_extractor(url).id(), id, "routing {}", url);
    }
}

/// yt-dlp rejects the page, so the registry falls back to scanning it
#[cfg(unix)]
#[tokio::test]
async fn test_unsupported_page_falls_back_to_audio_links() {
    use std::os::unix::fs::PermissionsExt;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("yt-dlp");
    std::fs::write(
        &script,
        "#!/bin/sh\necho 'ERROR: Unsupported URL: page' >&2\nexit 1\n",
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let _ = socket.read(&mut buf).await.unwrap();
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            SHOW_PAGE.len(),
            SHOW_PAGE
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    let registry = ExtractorRegistry::standard(Arc::new(YtDlp::with_paths(script, None)), None).unwrap();
    let page = format!("http://{}/shows/dawn/", addr);
    let items = registry.extract_info(&page).await.unwrap();
    server.await.unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].url, format!("http://{}/media/001_first-light.mp3", addr));
    assert_eq!(items[0].title, "001 first light");
    assert!(items.iter().all(|i| i.uploader == PODCAST_UPLOADER));
}
