//! URL input component

use crate::gui::app::Message;
use crate::gui::theme;
use iced::widget::{button, column, row, text, text_input, tooltip};
use iced::{Alignment, Element, Length};

/// URL field with paste and clear buttons, plus the validation message if any
pub fn url_input(value: &str, error_message: Option<&str>, enabled: bool) -> Element<'static, Message> {
    let mut field = text_input("Paste a video, playlist or podcast URL...", value)
        .padding(14)
        .width(Length::Fill)
        .style(iced::theme::TextInput::Custom(Box::new(theme::Input {
            invalid: error_message.is_some(),
        })));
    if enabled {
        field = field
            .on_input(Message::UrlInputChanged)
            .on_submit(Message::FetchPressed);
    }

    let input_row = row![
        field,
        tooltip(
            button(text("Paste").size(14))
                .on_press_maybe(enabled.then_some(Message::PasteFromClipboard))
                .padding([10, 14])
                .style(iced::theme::Button::Custom(Box::new(theme::SecondaryButton))),
            "Paste from clipboard",
            tooltip::Position::Bottom,
        ),
        button(text("Clear").size(14))
            .on_press_maybe(enabled.then_some(Message::ClearUrlInput))
            .padding([10, 14])
            .style(iced::theme::Button::Custom(Box::new(theme::SecondaryButton))),
    ]
    .spacing(10)
    .align_items(Alignment::Center);

    match error_message {
        Some(error) => column![
            input_row,
            text(error)
                .size(13)
                .style(iced::theme::Text::Color(theme::DANGER)),
        ]
        .spacing(6)
        .into(),
        None => input_row.into(),
    }
}
