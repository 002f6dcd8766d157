//! One fetched item in the selection list

use crate::extractor::MediaItem;
use crate::gui::app::Message;
use crate::gui::theme;
use iced::widget::{checkbox, column, text};
use iced::Element;

/// Checkbox row: title on the first line, uploader and duration below
pub fn media_item(index: usize, item: &MediaItem, selected: bool, enabled: bool) -> Element<'static, Message> {
    let mut toggle = checkbox(item.title.clone(), selected).size(18).spacing(10);
    if enabled {
        toggle = toggle.on_toggle(move |checked| Message::ItemToggled(index, checked));
    }

    column![
        toggle,
        text(format!(
            "Uploader: {} | Duration: {}",
            item.uploader,
            item.duration_display()
        ))
        .size(12)
        .style(iced::theme::Text::Color(theme::TEXT_SECONDARY)),
    ]
    .spacing(2)
    .padding([6, 4])
    .into()
}
