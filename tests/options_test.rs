use av_morning_star::options::filters::{DYNAMIC_NORMALIZATION, EBU_R128_LOUDNORM};
use av_morning_star::options::{
    DownloadChoices, DownloadMode, DownloadRequest, FilenameTag, FilenameTemplate, FormatType,
    VideoContainer, VideoQuality, YdlOptions,
};
use std::path::Path;

fn args_pair(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

#[test]
fn test_basic_audio_download_options() {
    let request = DownloadRequest::resolve(
        DownloadMode::Basic,
        FormatType::Audio,
        &DownloadChoices::default(),
        Path::new("/music"),
        &FilenameTemplate::default(),
    );
    let opts = YdlOptions::download(&request);

    let json = opts.to_json().unwrap();
    assert_eq!(json["format"], "bestaudio/best");
    let expected = Path::new("/music").join("%(title)s - %(abr)skbps - %(uploader)s.%(ext)s");
    assert_eq!(json["outtmpl"], &*expected.to_string_lossy());

    let args = opts.to_args();
    assert!(args.contains(&"--extract-audio".to_string()));
    assert_eq!(args_pair(&args, "--audio-format").as_deref(), Some("mp3"));
    assert!(args.contains(&"--embed-thumbnail".to_string()));
    assert!(args.contains(&"--embed-metadata".to_string()));
    assert_eq!(
        args_pair(&args, "--postprocessor-args"),
        Some(format!("ExtractAudio:-af {}", EBU_R128_LOUDNORM))
    );
    // Thumbnail embedding writes the image itself
    assert!(!args.contains(&"--write-thumbnail".to_string()));
}

#[test]
fn test_advanced_video_options() {
    let mut choices = DownloadChoices::default();
    choices.video_quality = VideoQuality::P720;
    choices.video_container = VideoContainer::ALL[1];
    choices.download_subs = true;
    // Audio-only controls are ignored for video
    choices.normalize_audio = true;

    let request = DownloadRequest::resolve(
        DownloadMode::Advanced,
        FormatType::Video,
        &choices,
        Path::new("/videos"),
        &FilenameTemplate::new([FilenameTag::Title, FilenameTag::Quality]),
    );
    let opts = YdlOptions::download(&request);
    let args = opts.to_args();

    assert_eq!(
        args_pair(&args, "-f").as_deref(),
        Some("bestvideo[height<=720]+bestaudio/bestvideo*+bestaudio/best")
    );
    assert_eq!(
        args_pair(&args, "--merge-output-format").as_deref(),
        Some(VideoContainer::ALL[1].as_str())
    );
    let expected = Path::new("/videos").join("%(title)s - %(height)sp.%(ext)s");
    assert_eq!(
        args_pair(&args, "-o"),
        Some(expected.to_string_lossy().into_owned())
    );
    assert!(args.contains(&"--embed-subs".to_string()));
    assert_eq!(args_pair(&args, "--sub-langs").as_deref(), Some("en,en-US"));
    assert!(!args.contains(&"--extract-audio".to_string()));
    assert!(!args.contains(&"--postprocessor-args".to_string()));
}

#[test]
fn test_dynamic_normalization_replaces_loudnorm() {
    let mut choices = DownloadChoices::default();
    choices.normalize_audio = true;
    choices.dynamic_normalization = true;

    let request = DownloadRequest::resolve(
        DownloadMode::Advanced,
        FormatType::Audio,
        &choices,
        Path::new("/music"),
        &FilenameTemplate::default(),
    );
    let args = YdlOptions::download(&request).to_args();
    let pp = args_pair(&args, "--postprocessor-args").unwrap();
    assert!(pp.contains(DYNAMIC_NORMALIZATION));
    assert!(!pp.contains("loudnorm"));
}

#[test]
fn test_template_editing() {
    let mut template = FilenameTemplate::new(Vec::<FilenameTag>::new());
    assert_eq!(template.build(FormatType::Video), "%(title)s.%(ext)s");

    assert!(template.add(FilenameTag::Uploader));
    assert!(template.add(FilenameTag::Title));
    assert!(!template.add(FilenameTag::Uploader));
    assert_eq!(
        template.build(FormatType::Video),
        "%(uploader)s - %(title)s.%(ext)s"
    );
    assert_eq!(template.preview(), "Channel Name - Example Video Title.mp4");

    assert!(template.remove(FilenameTag::Uploader));
    assert!(!template.remove(FilenameTag::Uploader));
    assert_eq!(template.tags(), &[FilenameTag::Title]);
    assert!(template.available().contains(&FilenameTag::Uploader));
}
