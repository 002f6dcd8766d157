//! Preferences view

use crate::auth::{Browser, BrowserPreference};
use crate::gui::app::{DetectedBrowsers, Message};
use crate::gui::theme;
use iced::widget::{button, column, container, pick_list, row, text, text_input, Space};
use iced::{Alignment, Element, Length};

/// Create the preferences view
pub fn preferences_view(
    preference: BrowserPreference,
    download_location: &str,
    browsers: &DetectedBrowsers,
) -> Element<'static, Message> {
    let header = text("Preferences")
        .size(28)
        .style(iced::theme::Text::Color(theme::TEXT_PRIMARY));

    // Browser authentication
    let browser_section = column![
        text("Browser for Authentication")
            .size(16)
            .style(iced::theme::Text::Color(theme::TEXT_PRIMARY)),
        text("Cookies from this browser are used when a site requires you to be signed in.")
            .size(12)
            .style(iced::theme::Text::Color(theme::TEXT_SECONDARY)),
        pick_list(
            BrowserPreference::options(),
            Some(preference),
            Message::BrowserPreferenceSelected,
        )
        .width(Length::Fixed(280.0))
        .padding(10),
        detected_summary(browsers),
        button(text("Re-detect Browsers").size(13))
            .on_press_maybe(browsers.surveyed.then_some(Message::RefreshBrowsers))
            .padding([8, 14])
            .style(iced::theme::Button::Custom(Box::new(theme::SecondaryButton))),
    ]
    .spacing(10);

    // Download location section
    let location_section = column![
        text("Download Location")
            .size(16)
            .style(iced::theme::Text::Color(theme::TEXT_PRIMARY)),
        row![
            text_input("~/Downloads", download_location)
                .on_input(Message::DownloadLocationChanged)
                .on_submit(Message::SavePreferences)
                .padding(12)
                .width(Length::Fill)
                .style(iced::theme::TextInput::Custom(Box::new(theme::Input {
                    invalid: download_location.trim().is_empty(),
                }))),
            button(text("Browse...").size(14))
                .on_press(Message::BrowseDownloadLocation)
                .padding([10, 16])
                .style(iced::theme::Button::Custom(Box::new(theme::SecondaryButton))),
        ]
        .spacing(10)
        .align_items(Alignment::Center),
    ]
    .spacing(10);

    let save_button = button(text("Save Preferences").size(16))
        .on_press(Message::SavePreferences)
        .padding([12, 24])
        .style(iced::theme::Button::Custom(Box::new(theme::PrimaryButton)));

    column![
        header,
        container(column![browser_section, location_section].spacing(28))
            .padding(24)
            .width(Length::Fill)
            .style(iced::theme::Container::Custom(Box::new(theme::Card))),
        Space::with_height(Length::Fill),
        row![Space::with_width(Length::Fill), save_button],
    ]
    .spacing(20)
    .height(Length::Fill)
    .into()
}

fn detected_summary(browsers: &DetectedBrowsers) -> Element<'static, Message> {
    if !browsers.surveyed {
        return text("Detecting browsers...")
            .size(13)
            .style(iced::theme::Text::Color(theme::TEXT_SECONDARY))
            .into();
    }

    column![
        text(format!("Detected browsers: {}", names(&browsers.available)))
            .size(13)
            .style(iced::theme::Text::Color(theme::TEXT_SECONDARY)),
        text(format!("Logged into YouTube: {}", names(&browsers.with_youtube)))
            .size(13)
            .style(iced::theme::Text::Color(if browsers.with_youtube.is_empty() {
                theme::TEXT_SECONDARY
            } else {
                theme::SUCCESS
            })),
    ]
    .spacing(4)
    .into()
}

fn names(browsers: &[Browser]) -> String {
    if browsers.is_empty() {
        return "none".to_string();
    }
    browsers
        .iter()
        .map(|b| b.label())
        .collect::<Vec<_>>()
        .join(", ")
}
