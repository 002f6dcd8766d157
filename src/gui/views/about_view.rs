//! Help & About view

use crate::gui::app::{Message, ToolInfo};
use crate::gui::theme;
use iced::widget::{column, container, scrollable, text, Column};
use iced::{Element, Length};

const HELP: [(&str, &str); 5] = [
    (
        "Fetching",
        "Paste a video, playlist, channel or podcast page URL and press Fetch. \
         Every item found is listed and ticked.",
    ),
    (
        "Downloading",
        "Untick anything you do not want, pick Video or Audio Only and press \
         Download Selected. Items download one after another; a failure does \
         not stop the rest.",
    ),
    (
        "Basic and Advanced",
        "Basic grabs the best quality (MP4 video, or 320 kbps MP3 with \
         normalized loudness and cover art). Advanced lets you choose quality, \
         container, codec, bitrate and post-processing.",
    ),
    (
        "Signed-in content",
        "If YouTube asks you to confirm you are not a bot, AV Morning Star can \
         retry with the cookies of a browser where you are logged in. Choose \
         the browser under Preferences.",
    ),
    (
        "Requirements",
        "yt-dlp must be installed. ffmpeg is needed for audio conversion, \
         merging and video enhancements.",
    ),
];

/// Create the about view
pub fn about_view(tools: Option<&ToolInfo>) -> Element<'static, Message> {
    let tool_lines = match tools {
        None => vec!["Checking tools...".to_string()],
        Some(info) => vec![
            format!(
                "yt-dlp: {}",
                info.ytdlp_version.as_deref().unwrap_or("not found")
            ),
            format!(
                "ffmpeg: {}",
                if info.ffmpeg_found { "found" } else { "not found" }
            ),
        ],
    };

    let tools_block = Column::with_children(tool_lines.into_iter().map(|line| {
        text(line)
            .size(13)
            .style(iced::theme::Text::Color(theme::TEXT_SECONDARY))
            .into()
    }))
    .spacing(4);

    let help = Column::with_children(HELP.iter().map(|(title, body)| {
        column![
            text(*title)
                .size(15)
                .style(iced::theme::Text::Color(theme::ACCENT)),
            text(*body).size(13),
        ]
        .spacing(4)
        .into()
    }))
    .spacing(14);

    let content = column![
        text("AV Morning Star")
            .size(32)
            .style(iced::theme::Text::Color(theme::TEXT_PRIMARY)),
        text("Video & Audio Downloader")
            .size(16)
            .style(iced::theme::Text::Color(theme::TEXT_SECONDARY)),
        text(format!("Version {}", env!("CARGO_PKG_VERSION"))).size(13),
        text("A powerful video and audio downloader supporting 1000+ websites.").size(14),
        tools_block,
        container(help)
            .padding(20)
            .width(Length::Fill)
            .style(iced::theme::Container::Custom(Box::new(theme::Card))),
    ]
    .spacing(12);

    scrollable(content)
        .height(Length::Fill)
        .style(iced::theme::Scrollable::Custom(Box::new(theme::Scroll)))
        .into()
}
