//! Downloads view: URL, fetched items, options and batch progress

use crate::gui::app::{Message, MorningStarApp, StatusKind, Toggle};
use crate::gui::components::{filename_builder, media_item, progress_bar, url_input};
use crate::gui::theme;
use crate::options::{
    AudioBitrate, AudioCodec, DownloadMode, FormatType, VideoContainer, VideoQuality,
};
use iced::widget::{button, checkbox, column, container, pick_list, row, scrollable, text, Column, Space};
use iced::{Alignment, Element, Length};

/// Create the downloads view
pub fn downloads_view(app: &MorningStarApp) -> Element<'_, Message> {
    let busy = app.is_busy();

    let fetch_button = button(text(if app.is_fetching { "Fetching..." } else { "Fetch" }).size(15))
        .on_press_maybe((!busy && !app.url_input.trim().is_empty()).then_some(Message::FetchPressed))
        .padding([12, 28])
        .style(iced::theme::Button::Custom(Box::new(theme::PrimaryButton)));

    let url_card = card(
        column![
            section_title("Media URL"),
            row![
                url_input(&app.url_input, app.url_error.as_deref(), !busy),
                fetch_button
            ]
            .spacing(12)
            .align_items(Alignment::Start),
        ]
        .spacing(12),
    );

    let content = column![
        text("Download Video & Audio")
            .size(28)
            .style(iced::theme::Text::Color(theme::TEXT_PRIMARY)),
        url_card,
        card(items_section(app)),
        card(options_section(app)),
        actions_row(app),
        status_strip(app),
    ]
    .spacing(16)
    .padding([0, 8, 16, 0]);

    scrollable(content)
        .height(Length::Fill)
        .style(iced::theme::Scrollable::Custom(Box::new(theme::Scroll)))
        .into()
}

fn card<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .padding(18)
        .width(Length::Fill)
        .style(iced::theme::Container::Custom(Box::new(theme::Card)))
        .into()
}

fn section_title(label: &str) -> iced::widget::Text<'static> {
    text(label.to_string())
        .size(16)
        .style(iced::theme::Text::Color(theme::TEXT_PRIMARY))
}

fn caption(label: &str) -> iced::widget::Text<'static> {
    text(label.to_string())
        .size(12)
        .style(iced::theme::Text::Color(theme::TEXT_SECONDARY))
}

fn items_section(app: &MorningStarApp) -> Element<'_, Message> {
    let enabled = !app.is_busy();

    let header = row![
        section_title("Items"),
        Space::with_width(Length::Fill),
        caption(&format!("{} of {} selected", app.selected_count(), app.items.len())),
        button(text("Select All").size(13))
            .on_press_maybe((enabled && !app.items.is_empty()).then_some(Message::SelectAll))
            .padding([6, 12])
            .style(iced::theme::Button::Custom(Box::new(theme::SecondaryButton))),
        button(text("Select None").size(13))
            .on_press_maybe((enabled && !app.items.is_empty()).then_some(Message::SelectNone))
            .padding([6, 12])
            .style(iced::theme::Button::Custom(Box::new(theme::SecondaryButton))),
    ]
    .spacing(10)
    .align_items(Alignment::Center);

    let body: Element<'_, Message> = if app.items.is_empty() {
        container(caption(if app.is_fetching {
            "Fetching media information..."
        } else {
            "Paste a URL and press Fetch to list its videos"
        }))
        .padding(24)
        .center_x()
        .width(Length::Fill)
        .into()
    } else {
        let list = Column::with_children(
            app.items
                .iter()
                .enumerate()
                .map(|(index, entry)| media_item(index, &entry.item, entry.selected, enabled)),
        )
        .spacing(4);

        scrollable(list)
            .height(Length::Fixed(220.0))
            .style(iced::theme::Scrollable::Custom(Box::new(theme::Scroll)))
            .into()
    };

    column![header, body].spacing(10).into()
}

fn options_section(app: &MorningStarApp) -> Element<'_, Message> {
    let settings = &app.settings;

    let basics = row![
        labelled(
            "Mode",
            pick_list(DownloadMode::ALL.to_vec(), Some(settings.mode), Message::ModeSelected)
                .text_size(13)
                .width(Length::Fixed(260.0)),
        ),
        labelled(
            "Format",
            pick_list(
                FormatType::ALL.to_vec(),
                Some(settings.format_type),
                Message::FormatSelected
            )
            .text_size(13)
            .width(Length::Fixed(160.0)),
        ),
    ]
    .spacing(16);

    let mut section = column![section_title("Options"), basics].spacing(14);

    match settings.mode {
        DownloadMode::Basic => {
            let summary = match settings.format_type {
                FormatType::Video => "Best available quality, merged to MP4",
                FormatType::Audio => "MP3 at 320 kbps with loudness normalization and cover art",
            };
            section = section.push(caption(summary));
        }
        DownloadMode::Advanced => {
            section = section.push(match settings.format_type {
                FormatType::Video => video_controls(app),
                FormatType::Audio => audio_controls(app),
            });
        }
    }

    section
        .push(filename_builder(&settings.filename_template))
        .push(caption(&format!(
            "Saving to {}",
            settings.download_location.display()
        )))
        .into()
}

fn video_controls(app: &MorningStarApp) -> Element<'_, Message> {
    let choices = &app.settings.choices;

    let pickers = row![
        labelled(
            "Quality",
            pick_list(
                VideoQuality::ALL.to_vec(),
                Some(choices.video_quality),
                Message::QualitySelected
            )
            .text_size(13)
            .width(Length::Fixed(200.0)),
        ),
        labelled(
            "Container",
            pick_list(
                VideoContainer::ALL.to_vec(),
                Some(choices.video_container),
                Message::ContainerSelected
            )
            .text_size(13)
            .width(Length::Fixed(200.0)),
        ),
    ]
    .spacing(16);

    let mut enhancements = column![
        toggle_row(app, &[Toggle::Subtitles]),
        caption("Enhancements (re-encodes after download)"),
        toggle_row(
            app,
            &[Toggle::DenoiseVideo, Toggle::StabilizeVideo, Toggle::SharpenVideo]
        ),
        toggle_row(app, &[Toggle::VideoLoudness, Toggle::VideoAudioDenoise]),
    ]
    .spacing(8);

    let ffmpeg_missing = app.tools.as_ref().is_some_and(|tools| !tools.ffmpeg_found);
    if ffmpeg_missing && choices.video_enhancements.any() {
        enhancements = enhancements.push(
            text("ffmpeg was not found; enhanced downloads will fail")
                .size(12)
                .style(iced::theme::Text::Color(theme::DANGER)),
        );
    }

    column![pickers, enhancements].spacing(12).into()
}

fn audio_controls(app: &MorningStarApp) -> Element<'_, Message> {
    let choices = &app.settings.choices;

    let pickers = row![
        labelled(
            "Codec",
            pick_list(AudioCodec::ALL.to_vec(), Some(choices.audio_codec), Message::CodecSelected)
                .text_size(13)
                .width(Length::Fixed(200.0)),
        ),
        labelled(
            "Bitrate",
            pick_list(
                AudioBitrate::ALL.to_vec(),
                Some(choices.audio_quality),
                Message::BitrateSelected
            )
            .text_size(13)
            .width(Length::Fixed(160.0)),
        ),
    ]
    .spacing(16);

    column![
        pickers,
        toggle_row(app, &[Toggle::Thumbnail, Toggle::Subtitles]),
        caption("Audio processing"),
        toggle_row(
            app,
            &[
                Toggle::NormalizeAudio,
                Toggle::DynamicNormalization,
                Toggle::DenoiseAudio
            ]
        ),
    ]
    .spacing(10)
    .into()
}

fn labelled<'a>(label: &str, control: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    column![caption(label), control.into()].spacing(4).into()
}

fn toggle_row<'a>(app: &'a MorningStarApp, toggles: &[Toggle]) -> Element<'a, Message> {
    let enabled = !app.is_busy();
    toggles
        .iter()
        .fold(row![].spacing(18), |line, toggle| {
            let toggle = *toggle;
            let mut check = checkbox(toggle.label(), toggle.is_set(&app.settings.choices))
                .size(16)
                .text_size(13);
            if enabled {
                check = check.on_toggle(move |value| Message::OptionToggled(toggle, value));
            }
            line.push(check)
        })
        .into()
}

fn actions_row(app: &MorningStarApp) -> Element<'_, Message> {
    let can_download = !app.is_busy() && app.selected_count() > 0;

    let mut actions = row![
        button(text("Download Selected").size(15))
            .on_press_maybe(can_download.then_some(Message::DownloadPressed))
            .padding([12, 28])
            .style(iced::theme::Button::Custom(Box::new(theme::PrimaryButton))),
        button(text("Cancel").size(15))
            .on_press_maybe(app.is_downloading.then_some(Message::CancelPressed))
            .padding([12, 20])
            .style(iced::theme::Button::Custom(Box::new(theme::DangerButton))),
    ]
    .spacing(12)
    .align_items(Alignment::Center);

    if let Some(progress) = &app.progress {
        actions = actions.push(
            container(progress_bar(
                progress.percent,
                &progress.label,
                progress.speed,
                progress.eta,
            ))
            .width(Length::Fill),
        );
    }

    actions.into()
}

fn status_strip(app: &MorningStarApp) -> Element<'_, Message> {
    let style = match app.status.kind {
        StatusKind::Neutral => theme::StatusStrip::Neutral,
        StatusKind::Success => theme::StatusStrip::Success,
        StatusKind::Error => theme::StatusStrip::Error,
    };

    container(text(app.status.text.clone()).size(13))
        .padding([8, 12])
        .width(Length::Fill)
        .style(iced::theme::Container::Custom(Box::new(style)))
        .into()
}
