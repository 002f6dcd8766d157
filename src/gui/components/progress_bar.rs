//! Batch progress bar

use crate::gui::app::Message;
use crate::gui::theme;
use iced::widget::{column, progress_bar as iced_progress_bar, row, text, Space};
use iced::{Element, Length};
use std::time::Duration;

/// Bar for the current item (`percent` is 0 to 100) with its label, speed and ETA
pub fn progress_bar(
    percent: f32,
    label: &str,
    speed: Option<f64>,
    eta: Option<Duration>,
) -> Element<'static, Message> {
    let style = if percent >= 100.0 {
        theme::Progress::Done
    } else {
        theme::Progress::Running
    };

    let bar = iced_progress_bar(0.0..=100.0, percent)
        .height(Length::Fixed(10.0))
        .style(iced::theme::ProgressBar::Custom(Box::new(style)));

    let mut details = Vec::new();
    if let Some(speed) = speed {
        details.push(format_speed(speed));
    }
    if let Some(eta) = eta {
        details.push(format!("{} remaining", format_eta(eta)));
    }

    column![
        row![
            text(label.to_string())
                .size(13)
                .style(iced::theme::Text::Color(theme::TEXT_PRIMARY)),
            Space::with_width(Length::Fill),
            text(format!("{:.0}%", percent))
                .size(13)
                .style(iced::theme::Text::Color(theme::TEXT_SECONDARY)),
        ],
        bar,
        text(details.join("  ·  "))
            .size(12)
            .style(iced::theme::Text::Color(theme::TEXT_SECONDARY)),
    ]
    .spacing(6)
    .into()
}

/// Bytes per second as KiB/s or MiB/s
pub fn format_speed(bytes_per_sec: f64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = 1024.0 * 1024.0;
    if bytes_per_sec >= MIB {
        format!("{:.1} MiB/s", bytes_per_sec / MIB)
    } else {
        format!("{:.0} KiB/s", bytes_per_sec / KIB)
    }
}

fn format_eta(duration: Duration) -> String {
    let total = duration.as_secs();
    match total {
        0..=59 => format!("{}s", total),
        60..=3599 => format!("{}m {}s", total / 60, total % 60),
        _ => format!("{}h {}m", total / 3600, (total % 3600) / 60),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_speed() {
        assert_eq!(format_speed(512.0 * 1024.0), "512 KiB/s");
        assert_eq!(format_speed(3.0 * 1024.0 * 1024.0), "3.0 MiB/s");
    }

    #[test]
    fn test_format_eta() {
        assert_eq!(format_eta(Duration::from_secs(42)), "42s");
        assert_eq!(format_eta(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_eta(Duration::from_secs(7260)), "2h 1m");
    }
}
