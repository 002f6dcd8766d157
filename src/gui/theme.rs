//! Dawn palette and widget style sheets

use iced::widget::{button, container, progress_bar, scrollable, text_input};
use iced::{Background, Border, Color, Gradient, Shadow, Theme, Vector};

// --- Palette ---

// Backdrop gradient, pre-dawn sky to first light
pub const SKY_TOP: Color = Color::from_rgb(0.996, 0.973, 0.941);
pub const SKY_MID: Color = Color::from_rgb(1.0, 0.937, 0.859);
pub const SKY_LOW: Color = Color::from_rgb(0.992, 0.894, 0.882);

// Accents
pub const AMBER_600: Color = Color::from_rgb(0.851, 0.467, 0.024);
pub const AMBER_500: Color = Color::from_rgb(0.961, 0.620, 0.043);
pub const AMBER_100: Color = Color::from_rgb(0.996, 0.953, 0.780);
pub const ROSE_500: Color = Color::from_rgb(0.957, 0.247, 0.369);
pub const VIOLET_600: Color = Color::from_rgb(0.486, 0.227, 0.929);

pub const GREEN_600: Color = Color::from_rgb(0.086, 0.639, 0.290);
pub const GREEN_400: Color = Color::from_rgb(0.290, 0.871, 0.502);
pub const RED_600: Color = Color::from_rgb(0.863, 0.149, 0.149);
pub const RED_50: Color = Color::from_rgb(0.996, 0.949, 0.949);

// Neutrals (warm stone)
pub const STONE_900: Color = Color::from_rgb(0.110, 0.098, 0.090);
pub const STONE_700: Color = Color::from_rgb(0.267, 0.251, 0.235);
pub const STONE_500: Color = Color::from_rgb(0.471, 0.443, 0.424);
pub const STONE_400: Color = Color::from_rgb(0.659, 0.635, 0.620);
pub const STONE_200: Color = Color::from_rgb(0.906, 0.898, 0.894);
pub const STONE_100: Color = Color::from_rgb(0.961, 0.961, 0.957);

pub const WHITE: Color = Color::WHITE;
pub const PANEL: Color = Color::from_rgba(1.0, 1.0, 1.0, 0.88);
pub const RAIL: Color = Color::from_rgba(1.0, 0.992, 0.976, 0.75);

pub const TEXT_PRIMARY: Color = STONE_900;
pub const TEXT_SECONDARY: Color = STONE_500;
pub const SUCCESS: Color = GREEN_600;
pub const DANGER: Color = RED_600;
pub const ACCENT: Color = AMBER_600;

fn sunrise(angle: f32) -> Gradient {
    Gradient::Linear(
        iced::gradient::Linear::new(iced::Radians(angle))
            .add_stop(0.0, AMBER_500)
            .add_stop(0.6, ROSE_500)
            .add_stop(1.0, VIOLET_600),
    )
}

// --- Containers ---

/// Whole-window backdrop
pub struct Backdrop;

impl container::StyleSheet for Backdrop {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: Some(TEXT_PRIMARY),
            background: Some(Background::Gradient(Gradient::Linear(
                iced::gradient::Linear::new(iced::Radians(std::f32::consts::PI))
                    .add_stop(0.0, SKY_TOP)
                    .add_stop(0.55, SKY_MID)
                    .add_stop(1.0, SKY_LOW),
            ))),
            ..Default::default()
        }
    }
}

/// Raised panel grouping related controls
pub struct Card;

impl container::StyleSheet for Card {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: Some(TEXT_PRIMARY),
            background: Some(Background::Color(PANEL)),
            border: Border {
                color: STONE_200,
                width: 1.0,
                radius: 18.0.into(),
            },
            shadow: Shadow {
                color: Color::from_rgba(0.851, 0.467, 0.024, 0.12),
                offset: Vector::new(0.0, 6.0),
                blur_radius: 18.0,
            },
        }
    }
}

pub struct Sidebar;

impl container::StyleSheet for Sidebar {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: Some(STONE_700),
            background: Some(Background::Color(RAIL)),
            border: Border {
                color: STONE_200,
                width: 1.0,
                radius: 0.0.into(),
            },
            ..Default::default()
        }
    }
}

/// Status strip at the bottom of the Downloads view
pub enum StatusStrip {
    Neutral,
    Success,
    Error,
}

impl container::StyleSheet for StatusStrip {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        let (text, background) = match self {
            Self::Neutral => (STONE_700, STONE_100),
            Self::Success => (GREEN_600, Color::from_rgb(0.941, 0.992, 0.957)),
            Self::Error => (RED_600, RED_50),
        };
        container::Appearance {
            text_color: Some(text),
            background: Some(Background::Color(background)),
            border: Border {
                radius: 10.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

// --- Buttons ---

pub struct PrimaryButton;

impl button::StyleSheet for PrimaryButton {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Gradient(sunrise(0.0))),
            text_color: WHITE,
            border: Border {
                radius: 14.0.into(),
                ..Default::default()
            },
            shadow: Shadow {
                color: Color::from_rgba(0.957, 0.247, 0.369, 0.25),
                offset: Vector::new(0.0, 4.0),
                blur_radius: 12.0,
            },
            shadow_offset: Vector::new(0.0, 0.0),
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        let active = self.active(style);
        button::Appearance {
            shadow: Shadow {
                blur_radius: 20.0,
                ..active.shadow
            },
            ..active
        }
    }

    fn disabled(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(STONE_200)),
            text_color: STONE_400,
            shadow: Shadow::default(),
            ..self.active(style)
        }
    }
}

pub struct SecondaryButton;

impl button::StyleSheet for SecondaryButton {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(WHITE)),
            text_color: STONE_700,
            border: Border {
                radius: 10.0.into(),
                color: STONE_200,
                width: 1.0,
            },
            ..Default::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(AMBER_100)),
            ..self.active(style)
        }
    }

    fn disabled(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            text_color: STONE_400,
            ..self.active(style)
        }
    }
}

pub enum NavButton {
    Active,
    Inactive,
}

impl button::StyleSheet for NavButton {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        let radius = 10.0.into();
        match self {
            Self::Active => button::Appearance {
                background: Some(Background::Color(AMBER_100)),
                text_color: AMBER_600,
                border: Border {
                    radius,
                    ..Default::default()
                },
                ..Default::default()
            },
            Self::Inactive => button::Appearance {
                background: None,
                text_color: STONE_500,
                border: Border {
                    radius,
                    ..Default::default()
                },
                ..Default::default()
            },
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        match self {
            Self::Active => self.active(style),
            Self::Inactive => button::Appearance {
                background: Some(Background::Color(STONE_100)),
                text_color: STONE_700,
                ..self.active(style)
            },
        }
    }
}

/// Filename tag chip, filled when part of the template
pub enum Chip {
    Selected,
    Available,
}

impl button::StyleSheet for Chip {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        let (background, text_color, border_color) = match self {
            Self::Selected => (AMBER_500, WHITE, AMBER_600),
            Self::Available => (WHITE, STONE_700, STONE_200),
        };
        button::Appearance {
            background: Some(Background::Color(background)),
            text_color,
            border: Border {
                radius: 999.0.into(),
                color: border_color,
                width: 1.0,
            },
            ..Default::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        let active = self.active(style);
        match self {
            Self::Selected => active,
            Self::Available => button::Appearance {
                background: Some(Background::Color(AMBER_100)),
                ..active
            },
        }
    }
}

pub struct DangerButton;

impl button::StyleSheet for DangerButton {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(WHITE)),
            text_color: RED_600,
            border: Border {
                radius: 10.0.into(),
                color: RED_600,
                width: 1.0,
            },
            ..Default::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(RED_50)),
            ..self.active(style)
        }
    }

    fn disabled(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            text_color: STONE_400,
            border: Border {
                color: STONE_200,
                ..self.active(style).border
            },
            ..self.active(style)
        }
    }
}

// --- Text input ---

/// URL and path inputs; `invalid` draws the red outline
pub struct Input {
    pub invalid: bool,
}

impl text_input::StyleSheet for Input {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> text_input::Appearance {
        text_input::Appearance {
            background: Background::Color(WHITE),
            border: Border {
                radius: 12.0.into(),
                width: if self.invalid { 2.0 } else { 1.0 },
                color: if self.invalid { RED_600 } else { STONE_200 },
            },
            icon_color: STONE_500,
        }
    }

    fn focused(&self, style: &Self::Style) -> text_input::Appearance {
        let active = self.active(style);
        if self.invalid {
            return active;
        }
        text_input::Appearance {
            border: Border {
                color: AMBER_500,
                width: 2.0,
                ..active.border
            },
            ..active
        }
    }

    fn placeholder_color(&self, _style: &Self::Style) -> Color {
        STONE_400
    }

    fn value_color(&self, _style: &Self::Style) -> Color {
        STONE_900
    }

    fn selection_color(&self, _style: &Self::Style) -> Color {
        Color::from_rgba(0.961, 0.620, 0.043, 0.3)
    }

    fn disabled(&self, style: &Self::Style) -> text_input::Appearance {
        text_input::Appearance {
            background: Background::Color(STONE_100),
            ..self.active(style)
        }
    }

    fn disabled_color(&self, _style: &Self::Style) -> Color {
        STONE_400
    }
}

// --- Scrollable ---

pub struct Scroll;

impl scrollable::StyleSheet for Scroll {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> scrollable::Appearance {
        scrollable::Appearance {
            container: container::Appearance::default(),
            scrollbar: scrollable::Scrollbar {
                background: Some(Background::Color(Color::TRANSPARENT)),
                border: Border::default(),
                scroller: scrollable::Scroller {
                    color: Color::from_rgba(0.851, 0.467, 0.024, 0.35),
                    border: Border {
                        radius: 4.0.into(),
                        ..Default::default()
                    },
                },
            },
            gap: None,
        }
    }

    fn hovered(&self, style: &Self::Style, is_mouse_over_scrollbar: bool) -> scrollable::Appearance {
        let active = self.active(style);
        if !is_mouse_over_scrollbar {
            return active;
        }
        scrollable::Appearance {
            scrollbar: scrollable::Scrollbar {
                scroller: scrollable::Scroller {
                    color: AMBER_600,
                    ..active.scrollbar.scroller
                },
                ..active.scrollbar
            },
            ..active
        }
    }
}

// --- Progress bar ---

pub enum Progress {
    Running,
    Done,
}

impl progress_bar::StyleSheet for Progress {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> progress_bar::Appearance {
        let bar = match self {
            Self::Running => Background::Gradient(sunrise(0.0)),
            Self::Done => Background::Gradient(Gradient::Linear(
                iced::gradient::Linear::new(iced::Radians(0.0))
                    .add_stop(0.0, GREEN_400)
                    .add_stop(1.0, GREEN_600),
            )),
        };
        progress_bar::Appearance {
            background: Background::Color(AMBER_100),
            bar,
            border_radius: 6.0.into(),
        }
    }
}
