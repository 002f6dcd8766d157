//! GUI components

pub mod media_item;
pub mod progress_bar;
pub mod tag_chip;
pub mod url_input;

// Re-export for convenience
pub use media_item::media_item;
pub use progress_bar::progress_bar;
pub use tag_chip::filename_builder;
pub use url_input::url_input;
