//! Window icon: a four-pointed morning star on a dawn disc, drawn at startup

use iced::window;
use image::{Rgba, RgbaImage};

const SIZE: u32 = 128;

const DISC_TOP: [u8; 3] = [245, 158, 11];
const DISC_BOTTOM: [u8; 3] = [244, 63, 94];
const STAR: [u8; 3] = [255, 251, 235];

/// Render the icon pixels
pub fn render(size: u32) -> RgbaImage {
    let centre = (size as f32 - 1.0) / 2.0;
    let radius = size as f32 / 2.0;

    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 - centre;
        let dy = y as f32 - centre;
        let distance = (dx * dx + dy * dy).sqrt();

        if distance > radius {
            return Rgba([0, 0, 0, 0]);
        }

        // Astroid |x|^0.5 + |y|^0.5 <= r^0.5 gives the pointed star
        let r = radius * 0.85;
        let star = (dx.abs() / r).sqrt() + (dy.abs() / r).sqrt() <= 1.0;
        if star {
            return Rgba([STAR[0], STAR[1], STAR[2], 255]);
        }

        let t = y as f32 / (size - 1).max(1) as f32;
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        // Soft edge on the disc
        let alpha = ((radius - distance).clamp(0.0, 1.0) * 255.0) as u8;
        Rgba([
            mix(DISC_TOP[0], DISC_BOTTOM[0]),
            mix(DISC_TOP[1], DISC_BOTTOM[1]),
            mix(DISC_TOP[2], DISC_BOTTOM[2]),
            alpha,
        ])
    })
}

/// Window icon, or `None` if iced rejects the buffer
pub fn load_icon() -> Option<window::Icon> {
    let image = render(SIZE);
    match window::icon::from_rgba(image.into_raw(), SIZE, SIZE) {
        Ok(icon) => Some(icon),
        Err(e) => {
            tracing::warn!("Failed to build window icon: {}", e);
            None
        }
    }
}
