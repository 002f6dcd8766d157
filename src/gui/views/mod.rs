//! GUI views

pub mod about_view;
pub mod downloads_view;
pub mod history_view;
pub mod preferences_view;

// Re-export for convenience
pub use about_view::about_view;
pub use downloads_view::downloads_view;
pub use history_view::history_view;
pub use preferences_view::preferences_view;
