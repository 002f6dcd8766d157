//! GUI module

pub mod app;
pub mod clipboard;
pub mod components;
pub mod dialogs;
pub mod icon;
pub mod theme;
pub mod views;

// Re-export for convenience
pub use app::Message;
pub use app::MorningStarApp;
pub use app::View;
