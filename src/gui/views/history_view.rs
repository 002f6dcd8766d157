//! History view

use crate::database::{DownloadRecord, HistoryStatus};
use crate::gui::app::Message;
use crate::gui::theme;
use iced::widget::{button, column, container, row, scrollable, text, Column, Space};
use iced::{Alignment, Element, Length};

/// Past downloads, newest first
pub fn history_view(records: &[DownloadRecord]) -> Element<'static, Message> {
    let header = row![
        text("History")
            .size(28)
            .style(iced::theme::Text::Color(theme::TEXT_PRIMARY)),
        Space::with_width(Length::Fill),
        button(text("Clear History").size(14))
            .on_press_maybe((!records.is_empty()).then_some(Message::ClearHistory))
            .padding([8, 16])
            .style(iced::theme::Button::Custom(Box::new(theme::DangerButton))),
    ]
    .align_items(Alignment::Center);

    let body: Element<'static, Message> = if records.is_empty() {
        container(
            text("No downloads yet")
                .size(14)
                .style(iced::theme::Text::Color(theme::TEXT_SECONDARY)),
        )
        .padding(40)
        .center_x()
        .width(Length::Fill)
        .into()
    } else {
        scrollable(Column::with_children(records.iter().map(history_row)).spacing(10))
            .height(Length::Fill)
            .style(iced::theme::Scrollable::Custom(Box::new(theme::Scroll)))
            .into()
    };

    column![header, body].spacing(20).height(Length::Fill).into()
}

fn history_row(record: &DownloadRecord) -> Element<'static, Message> {
    let status_color = match record.status {
        HistoryStatus::Completed => theme::SUCCESS,
        HistoryStatus::Failed => theme::DANGER,
        HistoryStatus::Cancelled => theme::TEXT_SECONDARY,
    };

    let mut details = column![
        row![
            text(record.title.clone())
                .size(15)
                .style(iced::theme::Text::Color(theme::TEXT_PRIMARY))
                .width(Length::Fill),
            text(record.status.to_string())
                .size(13)
                .style(iced::theme::Text::Color(status_color)),
        ]
        .spacing(10),
        text(format!(
            "{} · {} · {}",
            record.format_type,
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.url
        ))
        .size(12)
        .style(iced::theme::Text::Color(theme::TEXT_SECONDARY)),
    ]
    .spacing(4);

    if let Some(error) = &record.error_message {
        details = details.push(
            row![
                text(error.clone())
                    .size(12)
                    .style(iced::theme::Text::Color(theme::DANGER))
                    .width(Length::Fill),
                button(text("Copy").size(12))
                    .on_press(Message::CopyText(error.clone()))
                    .padding([4, 10])
                    .style(iced::theme::Button::Custom(Box::new(theme::SecondaryButton))),
            ]
            .spacing(8)
            .align_items(Alignment::Center),
        );
    }

    if let Some(path) = &record.output_path {
        details = details.push(
            row![
                text(path.display().to_string())
                    .size(12)
                    .style(iced::theme::Text::Color(theme::TEXT_SECONDARY))
                    .width(Length::Fill),
                button(text("Open Folder").size(12))
                    .on_press(Message::OpenFolder(path.clone()))
                    .padding([4, 10])
                    .style(iced::theme::Button::Custom(Box::new(theme::SecondaryButton))),
            ]
            .spacing(8)
            .align_items(Alignment::Center),
        );
    }

    container(details)
        .padding(14)
        .width(Length::Fill)
        .style(iced::theme::Container::Custom(Box::new(theme::Card)))
        .into()
}
