//! Main GUI application

use crate::auth::{validate_url, Browser, BrowserPreference, FetchFailure};
use crate::backend::{BackendActor, BackendCommand, BackendEvent};
use crate::database::DownloadRecord;
use crate::downloader::{BatchSummary, BatchUpdate, SummaryMessage};
use crate::extractor::MediaItem;
use crate::gui::{clipboard, dialogs, theme};
use crate::options::{
    AudioBitrate, AudioCodec, DownloadChoices, DownloadMode, DownloadRequest, FilenameTag,
    FormatType, VideoContainer, VideoQuality,
};
use crate::utils::config::AppSettings;
use crate::utils::paths;
use iced::widget::{button, column, container, row, text, Space};
use iced::{Alignment, Application, Command, Element, Length, Subscription, Theme};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

const CHANNEL_CAPACITY: usize = 256;

/// Main application state
pub struct MorningStarApp {
    // Keep a long-lived runtime so the backend actor stays alive
    _runtime: Arc<Runtime>,
    commands: mpsc::Sender<BackendCommand>,
    events: mpsc::Receiver<BackendEvent>,

    // UI state
    pub(crate) current_view: View,
    pub(crate) settings: AppSettings,
    pub(crate) location_input: String,
    pub(crate) url_input: String,
    pub(crate) url_error: Option<String>,
    pub(crate) items: Vec<SelectableItem>,
    pub(crate) status: StatusLine,
    pub(crate) progress: Option<ProgressState>,
    pub(crate) history: Vec<DownloadRecord>,
    pub(crate) browsers: DetectedBrowsers,
    pub(crate) tools: Option<ToolInfo>,

    // Flags
    pub(crate) is_fetching: bool,
    pub(crate) is_downloading: bool,
}

/// Application view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Downloads,
    Preferences,
    History,
    About,
}

impl View {
    const ALL: [View; 4] = [View::Downloads, View::Preferences, View::History, View::About];

    fn label(&self) -> &'static str {
        match self {
            View::Downloads => "Downloads",
            View::Preferences => "Preferences",
            View::History => "History",
            View::About => "Help & About",
        }
    }
}

/// A fetched item and whether it is ticked for download
#[derive(Debug, Clone)]
pub struct SelectableItem {
    pub item: MediaItem,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Neutral,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusLine {
    fn neutral(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Neutral,
        }
    }

    fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Success,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }
}

/// Progress of the item currently downloading
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressState {
    pub percent: f32,
    pub label: String,
    pub speed: Option<f64>,
    pub eta: Option<Duration>,
}

impl ProgressState {
    fn starting(total: usize) -> Self {
        Self {
            percent: 0.0,
            label: format!("Starting download of {} item(s)...", total),
            speed: None,
            eta: None,
        }
    }

    fn apply(&mut self, update: &BatchUpdate) {
        if let Some(percent) = update.percent() {
            self.percent = percent;
        }
        self.label = update.status_text();
        match update {
            BatchUpdate::Progress { speed, eta, .. } => {
                self.speed = *speed;
                self.eta = *eta;
            }
            _ => {
                self.speed = None;
                self.eta = None;
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectedBrowsers {
    pub surveyed: bool,
    pub available: Vec<Browser>,
    pub with_youtube: Vec<Browser>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    pub ytdlp_version: Option<String>,
    pub ffmpeg_found: bool,
}

/// Advanced-mode checkboxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Subtitles,
    Thumbnail,
    NormalizeAudio,
    DynamicNormalization,
    DenoiseAudio,
    DenoiseVideo,
    StabilizeVideo,
    SharpenVideo,
    VideoLoudness,
    VideoAudioDenoise,
}

impl Toggle {
    pub fn label(&self) -> &'static str {
        match self {
            Toggle::Subtitles => "Download subtitles",
            Toggle::Thumbnail => "Embed thumbnail",
            Toggle::NormalizeAudio => "Normalize loudness (EBU R128)",
            Toggle::DynamicNormalization => "Dynamic normalization",
            Toggle::DenoiseAudio => "Reduce background noise",
            Toggle::DenoiseVideo => "Denoise video",
            Toggle::StabilizeVideo => "Stabilize video",
            Toggle::SharpenVideo => "Sharpen video",
            Toggle::VideoLoudness => "Normalize audio track",
            Toggle::VideoAudioDenoise => "Denoise audio track",
        }
    }

    pub fn is_set(&self, choices: &DownloadChoices) -> bool {
        let enhance = &choices.video_enhancements;
        match self {
            Toggle::Subtitles => choices.download_subs,
            Toggle::Thumbnail => choices.embed_thumbnail,
            Toggle::NormalizeAudio => choices.normalize_audio,
            Toggle::DynamicNormalization => choices.dynamic_normalization,
            Toggle::DenoiseAudio => choices.denoise_audio,
            Toggle::DenoiseVideo => enhance.denoise_video,
            Toggle::StabilizeVideo => enhance.stabilize_video,
            Toggle::SharpenVideo => enhance.sharpen_video,
            Toggle::VideoLoudness => enhance.normalize_audio,
            Toggle::VideoAudioDenoise => enhance.denoise_audio,
        }
    }

    pub fn set(&self, choices: &mut DownloadChoices, value: bool) {
        let enhance = &mut choices.video_enhancements;
        let slot = match self {
            Toggle::Subtitles => &mut choices.download_subs,
            Toggle::Thumbnail => &mut choices.embed_thumbnail,
            Toggle::NormalizeAudio => &mut choices.normalize_audio,
            Toggle::DynamicNormalization => &mut choices.dynamic_normalization,
            Toggle::DenoiseAudio => &mut choices.denoise_audio,
            Toggle::DenoiseVideo => &mut enhance.denoise_video,
            Toggle::StabilizeVideo => &mut enhance.stabilize_video,
            Toggle::SharpenVideo => &mut enhance.sharpen_video,
            Toggle::VideoLoudness => &mut enhance.normalize_audio,
            Toggle::VideoAudioDenoise => &mut enhance.denoise_audio,
        };
        *slot = value;
    }
}

/// Application messages
#[derive(Debug, Clone)]
pub enum Message {
    // Navigation
    SwitchView(View),

    // URL and fetch
    UrlInputChanged(String),
    PasteFromClipboard,
    ClearUrlInput,
    FetchPressed,
    RetryAnswered {
        url: String,
        browser: Browser,
        accepted: bool,
    },

    // Item selection
    ItemToggled(usize, bool),
    SelectAll,
    SelectNone,

    // Download options
    ModeSelected(DownloadMode),
    FormatSelected(FormatType),
    QualitySelected(VideoQuality),
    ContainerSelected(VideoContainer),
    CodecSelected(AudioCodec),
    BitrateSelected(AudioBitrate),
    OptionToggled(Toggle, bool),
    TagAdded(FilenameTag),
    TagRemoved(FilenameTag),

    // Batch control
    DownloadPressed,
    CancelPressed,

    // Preferences
    BrowserPreferenceSelected(BrowserPreference),
    DownloadLocationChanged(String),
    BrowseDownloadLocation,
    DownloadLocationPicked(Option<PathBuf>),
    SavePreferences,
    RefreshBrowsers,

    // History
    ClearHistory,
    OpenFolder(PathBuf),
    CopyText(String),

    // System
    DialogClosed,
    Tick,
}

impl Application for MorningStarApp {
    type Executor = iced::executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = ();

    fn new(_flags: Self::Flags) -> (Self, Command<Message>) {
        // Create a single runtime and keep it alive for the app lifetime
        let runtime = Arc::new(Runtime::new().expect("Failed to create tokio runtime"));

        let (cmd_tx, cmd_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (evt_tx, evt_rx) = mpsc::channel(CHANNEL_CAPACITY);
        runtime.spawn(async move {
            BackendActor::start(cmd_rx, evt_tx).await.run().await;
        });

        let settings = AppSettings::default();
        let app = Self {
            _runtime: runtime,
            commands: cmd_tx,
            events: evt_rx,
            current_view: View::Downloads,
            location_input: settings.download_location.display().to_string(),
            settings,
            url_input: String::new(),
            url_error: None,
            items: Vec::new(),
            status: StatusLine::neutral("Ready"),
            progress: None,
            history: Vec::new(),
            browsers: DetectedBrowsers::default(),
            tools: None,
            is_fetching: false,
            is_downloading: false,
        };

        (app, Command::none())
    }

    fn title(&self) -> String {
        String::from("AV Morning Star - Video & Audio Downloader")
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::SwitchView(view) => {
                self.current_view = view;
                if view == View::History {
                    self.send(BackendCommand::LoadHistory);
                }
                Command::none()
            }

            // URL and fetch
            Message::UrlInputChanged(url) => {
                self.url_input = url;
                self.url_error = None;
                Command::none()
            }

            Message::PasteFromClipboard => {
                match clipboard::paste_text() {
                    Ok(content) => {
                        self.url_input = content;
                        self.url_error = None;
                        self.status = StatusLine::neutral("URL pasted from clipboard");
                    }
                    Err(e) => self.status = StatusLine::error(e),
                }
                Command::none()
            }

            Message::ClearUrlInput => {
                self.url_input.clear();
                self.url_error = None;
                Command::none()
            }

            Message::FetchPressed => {
                if self.is_busy() {
                    return Command::none();
                }
                let url = match validate_url(&self.url_input) {
                    Ok(url) => url.to_string(),
                    Err(message) => {
                        self.url_error = Some(message.to_string());
                        return Command::none();
                    }
                };
                self.start_fetch(url, self.settings.browser_preference);
                Command::none()
            }

            Message::RetryAnswered {
                url,
                browser,
                accepted,
            } => {
                if !accepted {
                    self.status = StatusLine::error("Authentication declined");
                    return Command::none();
                }
                info!("Retrying fetch with {} cookies", browser);
                self.settings.browser_preference = BrowserPreference::Browser(browser);
                self.persist_settings();
                self.start_fetch(url, self.settings.browser_preference);
                Command::none()
            }

            // Item selection
            Message::ItemToggled(index, checked) => {
                if let Some(entry) = self.items.get_mut(index) {
                    entry.selected = checked;
                }
                Command::none()
            }

            Message::SelectAll => {
                self.items.iter_mut().for_each(|entry| entry.selected = true);
                Command::none()
            }

            Message::SelectNone => {
                self.items.iter_mut().for_each(|entry| entry.selected = false);
                Command::none()
            }

            // Download options
            Message::ModeSelected(mode) => self.change_settings(|s| s.mode = mode),
            Message::FormatSelected(format_type) => {
                self.change_settings(|s| s.format_type = format_type)
            }
            Message::QualitySelected(quality) => {
                self.change_settings(|s| s.choices.video_quality = quality)
            }
            Message::ContainerSelected(container) => {
                self.change_settings(|s| s.choices.video_container = container)
            }
            Message::CodecSelected(codec) => self.change_settings(|s| s.choices.audio_codec = codec),
            Message::BitrateSelected(bitrate) => {
                self.change_settings(|s| s.choices.audio_quality = bitrate)
            }
            Message::OptionToggled(toggle, value) => {
                self.change_settings(|s| toggle.set(&mut s.choices, value))
            }
            Message::TagAdded(tag) => self.change_settings(|s| {
                s.filename_template.add(tag);
            }),
            Message::TagRemoved(tag) => self.change_settings(|s| {
                s.filename_template.remove(tag);
            }),

            // Batch control
            Message::DownloadPressed => self.start_download(),

            Message::CancelPressed => {
                if self.is_downloading {
                    self.send(BackendCommand::CancelDownload);
                    self.status = StatusLine::neutral("Cancelling...");
                }
                Command::none()
            }

            // Preferences
            Message::BrowserPreferenceSelected(preference) => {
                self.change_settings(|s| s.browser_preference = preference)
            }

            Message::DownloadLocationChanged(location) => {
                self.location_input = location;
                Command::none()
            }

            Message::BrowseDownloadLocation => Command::perform(
                dialogs::pick_folder(self.settings.download_location.clone()),
                Message::DownloadLocationPicked,
            ),

            Message::DownloadLocationPicked(Some(path)) => {
                self.location_input = path.display().to_string();
                self.change_settings(|s| s.download_location = path)
            }
            Message::DownloadLocationPicked(None) => Command::none(),

            Message::SavePreferences => {
                let location = self.location_input.trim();
                if location.is_empty() {
                    self.status = StatusLine::error("Please choose a download location");
                    return Command::none();
                }
                let path = paths::expand_home(location);
                self.location_input = path.display().to_string();
                self.settings.download_location = path;
                self.persist_settings();
                self.status = StatusLine::success("Preferences saved");
                Command::none()
            }

            Message::RefreshBrowsers => {
                self.browsers.surveyed = false;
                self.send(BackendCommand::RefreshBrowsers);
                Command::none()
            }

            // History
            Message::ClearHistory => {
                self.send(BackendCommand::ClearHistory);
                Command::none()
            }

            Message::OpenFolder(path) => {
                let folder = if path.is_dir() {
                    path
                } else {
                    path.parent().map(PathBuf::from).unwrap_or(path)
                };
                if let Err(e) = open::that(&folder) {
                    warn!("Failed to open {:?}: {}", folder, e);
                    self.status = StatusLine::error(format!("Failed to open folder: {}", e));
                }
                Command::none()
            }

            Message::CopyText(value) => {
                match clipboard::copy_text(&value) {
                    Ok(()) => self.status = StatusLine::neutral("Copied to clipboard"),
                    Err(e) => self.status = StatusLine::error(e),
                }
                Command::none()
            }

            Message::DialogClosed => Command::none(),

            Message::Tick => {
                let mut commands = Vec::new();
                while let Ok(event) = self.events.try_recv() {
                    commands.push(self.handle_event(event));
                }
                Command::batch(commands)
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        use crate::gui::views::{about_view, downloads_view, history_view, preferences_view};

        let nav = View::ALL.iter().fold(
            column![
                container(
                    column![
                        text("AV Morning Star")
                            .size(22)
                            .style(iced::theme::Text::Color(theme::TEXT_PRIMARY)),
                        text("Video & Audio Downloader")
                            .size(12)
                            .style(iced::theme::Text::Color(theme::TEXT_SECONDARY)),
                    ]
                    .spacing(4)
                )
                .padding([20, 12]),
                Space::with_height(12),
            ]
            .spacing(6),
            |nav, view| {
                let style = if *view == self.current_view {
                    theme::NavButton::Active
                } else {
                    theme::NavButton::Inactive
                };
                nav.push(
                    button(text(view.label()).size(15))
                        .style(iced::theme::Button::Custom(Box::new(style)))
                        .width(Length::Fill)
                        .padding(12)
                        .on_press(Message::SwitchView(*view)),
                )
            },
        );

        let sidebar = container(nav.padding(10))
            .width(Length::Fixed(220.0))
            .height(Length::Fill)
            .style(iced::theme::Container::Custom(Box::new(theme::Sidebar)));

        let content = match self.current_view {
            View::Downloads => downloads_view(self),
            View::Preferences => preferences_view(
                self.settings.browser_preference,
                &self.location_input,
                &self.browsers,
            ),
            View::History => history_view(&self.history),
            View::About => about_view(self.tools.as_ref()),
        };

        let layout = row![
            sidebar,
            container(content)
                .width(Length::Fill)
                .height(Length::Fill)
                .padding(20)
        ]
        .align_items(Alignment::Start);

        container(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(iced::theme::Container::Custom(Box::new(theme::Backdrop)))
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        iced::time::every(Duration::from_millis(100)).map(|_| Message::Tick)
    }

    fn theme(&self) -> Self::Theme {
        Theme::Light
    }
}

impl MorningStarApp {
    pub(crate) fn is_busy(&self) -> bool {
        self.is_fetching || self.is_downloading
    }

    pub(crate) fn selected_count(&self) -> usize {
        self.items.iter().filter(|entry| entry.selected).count()
    }

    fn send(&self, command: BackendCommand) {
        if let Err(e) = self.commands.try_send(command) {
            error!("Backend channel unavailable: {}", e);
        }
    }

    fn persist_settings(&self) {
        self.send(BackendCommand::SaveSettings(self.settings.clone()));
    }

    fn change_settings(&mut self, change: impl FnOnce(&mut AppSettings)) -> Command<Message> {
        change(&mut self.settings);
        self.persist_settings();
        Command::none()
    }

    fn start_fetch(&mut self, url: String, preference: BrowserPreference) {
        self.is_fetching = true;
        self.url_error = None;
        self.items.clear();
        self.status = StatusLine::neutral("Fetching...");
        self.send(BackendCommand::Fetch { url, preference });
    }

    fn start_download(&mut self) -> Command<Message> {
        if self.is_busy() {
            return Command::none();
        }
        let items: Vec<MediaItem> = self
            .items
            .iter()
            .filter(|entry| entry.selected)
            .map(|entry| entry.item.clone())
            .collect();
        if items.is_empty() {
            return Command::perform(
                dialogs::warning(
                    "No Selection".to_string(),
                    "Please select at least one video to download".to_string(),
                ),
                |_| Message::DialogClosed,
            );
        }

        let request = DownloadRequest::resolve(
            self.settings.mode,
            self.settings.format_type,
            &self.settings.choices,
            self.settings.download_location.clone(),
            &self.settings.filename_template,
        );
        debug!("Download request: {:?}", request);

        self.is_downloading = true;
        self.progress = Some(ProgressState::starting(items.len()));
        self.status = StatusLine::neutral(format!("Starting download of {} item(s)...", items.len()));
        self.send(BackendCommand::Download {
            items,
            request,
            preference: self.settings.browser_preference,
        });
        Command::none()
    }

    fn handle_event(&mut self, event: BackendEvent) -> Command<Message> {
        match event {
            BackendEvent::SettingsLoaded(settings) => {
                self.location_input = settings.download_location.display().to_string();
                self.settings = settings;
            }

            BackendEvent::ToolsDetected {
                ytdlp_version,
                ffmpeg_found,
            } => {
                if ytdlp_version.is_none() {
                    self.status = StatusLine::error("yt-dlp not found. Please install yt-dlp");
                }
                self.tools = Some(ToolInfo {
                    ytdlp_version,
                    ffmpeg_found,
                });
            }

            BackendEvent::BrowsersDetected {
                available,
                with_youtube,
            } => {
                self.browsers = DetectedBrowsers {
                    surveyed: true,
                    available,
                    with_youtube,
                };
            }

            BackendEvent::FetchStatus(status) => self.status = StatusLine::neutral(status),

            BackendEvent::FetchCompleted { url, items } => {
                self.is_fetching = false;
                info!("Fetched {} item(s) from {}", items.len(), url);
                if items.is_empty() {
                    self.status = StatusLine::error("No videos found");
                    return Command::perform(
                        dialogs::warning(
                            "No Videos".to_string(),
                            "No videos found at the provided URL".to_string(),
                        ),
                        |_| Message::DialogClosed,
                    );
                }
                self.status = StatusLine::success(format!("Found {} video(s)", items.len()));
                self.items = items
                    .into_iter()
                    .map(|item| SelectableItem {
                        item,
                        selected: true,
                    })
                    .collect();
            }

            BackendEvent::FetchFailed { url, failure } => {
                self.is_fetching = false;
                return self.handle_fetch_failure(url, failure);
            }

            BackendEvent::BatchStarted { total } => {
                self.is_downloading = true;
                self.progress = Some(ProgressState::starting(total));
            }

            BackendEvent::BatchProgress(update) => {
                if let BatchUpdate::Progress { label, .. } = &update {
                    self.status = StatusLine::neutral(format!("Downloading: {}", label));
                }
                self.progress
                    .get_or_insert_with(|| ProgressState::starting(0))
                    .apply(&update);
            }

            BackendEvent::BatchFinished(summary) => {
                self.is_downloading = false;
                return self.finish_batch(&summary);
            }

            BackendEvent::History(records) => self.history = records,

            BackendEvent::BatchRejected(message) => {
                self.is_downloading = false;
                self.progress = None;
                self.status = StatusLine::error(message.clone());
                return Command::perform(
                    dialogs::error("Download Error".to_string(), message),
                    |_| Message::DialogClosed,
                );
            }

            BackendEvent::Error(message) => {
                warn!("Backend error: {}", message);
                self.status = StatusLine::error(message.clone());
                return Command::perform(
                    dialogs::error("Error".to_string(), message),
                    |_| Message::DialogClosed,
                );
            }
        }
        Command::none()
    }

    fn handle_fetch_failure(&mut self, url: String, failure: FetchFailure) -> Command<Message> {
        match failure {
            FetchFailure::OfferRetry { browser, prompt } => {
                self.status = StatusLine::neutral("Authentication required");
                Command::perform(
                    dialogs::confirm("Authentication Required".to_string(), prompt),
                    move |accepted| Message::RetryAnswered {
                        url: url.clone(),
                        browser,
                        accepted,
                    },
                )
            }
            FetchFailure::AuthenticationRequired { message } => {
                self.status = StatusLine::error("Authentication required");
                Command::perform(
                    dialogs::error("Authentication Required".to_string(), message),
                    |_| Message::DialogClosed,
                )
            }
            FetchFailure::Error { message } => {
                self.status = StatusLine::error("Fetch failed");
                Command::perform(
                    dialogs::error("Error".to_string(), message),
                    |_| Message::DialogClosed,
                )
            }
        }
    }

    fn finish_batch(&mut self, summary: &BatchSummary) -> Command<Message> {
        let message = summary.message();
        match &message {
            SummaryMessage::Success(_) => {
                self.status = StatusLine::success("All downloads completed!");
                if let Some(progress) = &mut self.progress {
                    progress.percent = 100.0;
                    progress.label = "Complete".to_string();
                }
            }
            SummaryMessage::Error(_) => {
                self.status = StatusLine::error("Download failed - check error message");
            }
        }

        let text = message.text().to_string();
        if message.is_error() {
            Command::perform(
                dialogs::error("Download Error".to_string(), text),
                |_| Message::DialogClosed,
            )
        } else {
            Command::perform(
                dialogs::info("Download Complete".to_string(), text),
                |_| Message::DialogClosed,
            )
        }
    }
}

impl Drop for MorningStarApp {
    fn drop(&mut self) {
        // Kills a running yt-dlp child before the runtime goes away
        let _ = self.commands.try_send(BackendCommand::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_targets_matching_field() {
        let mut choices = DownloadChoices::default();
        Toggle::StabilizeVideo.set(&mut choices, true);
        assert!(choices.video_enhancements.stabilize_video);
        assert!(Toggle::StabilizeVideo.is_set(&choices));
        assert!(!Toggle::DenoiseVideo.is_set(&choices));

        Toggle::VideoLoudness.set(&mut choices, true);
        assert!(choices.video_enhancements.normalize_audio);
        assert!(!choices.normalize_audio);

        Toggle::Thumbnail.set(&mut choices, false);
        assert!(!choices.embed_thumbnail);
    }

    #[test]
    fn test_progress_state_follows_updates() {
        let mut state = ProgressState::starting(2);
        assert_eq!(state.label, "Starting download of 2 item(s)...");

        state.apply(&BatchUpdate::Progress {
            index: 1,
            total: 2,
            label: "clip.mp4".to_string(),
            percent: 42.0,
            speed: Some(1024.0),
            eta: Some(Duration::from_secs(3)),
        });
        assert_eq!(state.percent, 42.0);
        assert_eq!(state.speed, Some(1024.0));

        state.apply(&BatchUpdate::ItemFailed {
            index: 1,
            total: 2,
            url: "https://example.com/a".to_string(),
            error: "boom".to_string(),
        });
        assert_eq!(state.percent, 42.0);
        assert_eq!(state.label, "Failed 1/2, continuing...");
        assert_eq!(state.speed, None);
    }
}
