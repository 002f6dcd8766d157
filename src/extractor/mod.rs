pub mod generic;
pub mod models;
pub mod odysee;
pub mod podcast;
pub mod registry;
pub mod traits;
pub mod youtube;
pub mod ytdlp;

pub use models::{MediaItem, RawInfo, UrlPreference};
pub use registry::ExtractorRegistry;
pub use traits::Extractor;
pub use ytdlp::YtDlp;
