//! Filename template chips

use crate::gui::app::Message;
use crate::gui::theme;
use crate::options::{FilenameTag, FilenameTemplate};
use iced::widget::{button, column, row, text, Column, Row};
use iced::{Alignment, Element};

const CHIPS_PER_ROW: usize = 5;

fn chip(tag: FilenameTag, selected: bool) -> Element<'static, Message> {
    let (label, message, style) = if selected {
        (format!("{} ×", tag.label()), Message::TagRemoved(tag), theme::Chip::Selected)
    } else {
        (format!("+ {}", tag.label()), Message::TagAdded(tag), theme::Chip::Available)
    };

    button(text(label).size(12))
        .on_press(message)
        .padding([4, 10])
        .style(iced::theme::Button::Custom(Box::new(style)))
        .into()
}

/// Selected tags in filename order, the unused ones, and the resulting preview
pub fn filename_builder(template: &FilenameTemplate) -> Element<'static, Message> {
    let selected = Row::with_children(template.tags().iter().map(|tag| chip(*tag, true)))
        .spacing(6)
        .align_items(Alignment::Center);

    // No wrapping rows in iced, so split the unused tags by hand
    let unused = template.available();
    let available = Column::with_children(unused.chunks(CHIPS_PER_ROW).map(|line| {
        Row::with_children(line.iter().map(|tag| chip(*tag, false)))
            .spacing(6)
            .into()
    }))
    .spacing(6);

    column![
        row![
            text("Filename:").size(13),
            if template.tags().is_empty() {
                Element::from(
                    text("Title only")
                        .size(12)
                        .style(iced::theme::Text::Color(theme::TEXT_SECONDARY)),
                )
            } else {
                selected.into()
            },
        ]
        .spacing(8)
        .align_items(Alignment::Center),
        row![text("Add:").size(13), available].spacing(8),
        text(format!("Preview: {}", template.preview()))
            .size(12)
            .style(iced::theme::Text::Color(theme::TEXT_SECONDARY)),
    ]
    .spacing(8)
    .into()
}
