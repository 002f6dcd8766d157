//! Platform path resolution
//!
//! Paths are resolved through `dirs` so the app behaves the same whether it is
//! started from a terminal, a desktop launcher or a macOS app bundle (where the
//! working directory is `/`). Nothing here returns a relative path.

use std::path::PathBuf;
use tracing::{debug, warn};

#[cfg(target_os = "linux")]
const APP_DIR_NAME: &str = "av-morning-star";
#[cfg(not(target_os = "linux"))]
const APP_DIR_NAME: &str = "AV Morning Star";

const DATABASE_FILE: &str = "morningstar.db";

/// Application data directory, created on first use
///
/// - Linux: `~/.local/share/av-morning-star`
/// - macOS: `~/Library/Application Support/AV Morning Star`
/// - Windows: `%APPDATA%\AV Morning Star`
pub fn app_data_dir() -> PathBuf {
    let dir = dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME);

    if let Err(e) = std::fs::create_dir_all(&dir) {
        warn!("Failed to create data directory {:?}: {}", dir, e);
    }

    debug!("App data directory: {:?}", dir);
    dir
}

pub fn database_path() -> PathBuf {
    app_data_dir().join(DATABASE_FILE)
}

/// The user's Downloads folder, never a relative path
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| {
            warn!("Could not determine Downloads directory, using temp dir");
            std::env::temp_dir()
        })
}

/// `~/.deno/bin`, when Deno was installed with its official script
pub fn deno_bin_dir() -> Option<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".deno").join("bin"))
        .filter(|dir| dir.is_dir())
}

/// Directories searched for a bundled `yt-dlp` before PATH
///
/// The executable's own directory and, inside a macOS app bundle,
/// `Contents/Resources/bin`.
pub fn bundled_bin_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let Ok(exe) = std::env::current_exe() else {
        return dirs;
    };
    if let Some(exe_dir) = exe.parent() {
        dirs.push(exe_dir.to_path_buf());
        if let Some(contents) = exe_dir.parent() {
            let resources = contents.join("Resources").join("bin");
            if resources.is_dir() {
                dirs.push(resources);
            }
        }
    }
    dirs
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if path == "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_absolute() {
        assert!(default_download_dir().is_absolute());
        assert!(database_path().is_absolute());
        assert!(database_path().ends_with(DATABASE_FILE));
    }

    #[test]
    fn test_expand_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/Music"), home.join("Music"));
            assert_eq!(expand_home("~"), home);
        }
        assert_eq!(expand_home("/srv/media"), PathBuf::from("/srv/media"));
    }
}
