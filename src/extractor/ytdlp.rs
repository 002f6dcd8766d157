//! yt-dlp executable: discovery and metadata fetches
//!
//! Handles bundled yt-dlp (next to the binary or inside a macOS .app bundle)
//! as well as system installs. ffmpeg is looked up once and forwarded with
//! `--ffmpeg-location`; `~/.deno/bin` is put on the child's PATH so yt-dlp can
//! find a JavaScript runtime for YouTube challenges.

use crate::extractor::models::RawInfo;
use crate::options::YdlOptions;
use crate::utils::diagnostics::strip_ansi;
use crate::utils::error::MorningStarError;
use crate::utils::paths;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command as AsyncCommand;
use tracing::{debug, error, info, warn};

#[cfg(windows)]
const YTDLP_BINARY: &str = "yt-dlp.exe";
#[cfg(not(windows))]
const YTDLP_BINARY: &str = "yt-dlp";

/// A located yt-dlp, plus the ffmpeg it should use
#[derive(Debug, Clone)]
pub struct YtDlp {
    path: PathBuf,
    ffmpeg: Option<PathBuf>,
}

impl YtDlp {
    /// Locate yt-dlp and ffmpeg.
    ///
    /// Search order for yt-dlp:
    /// 1. Bundled next to the executable / in `Contents/Resources/bin`
    /// 2. System PATH
    /// 3. Common installation paths (Homebrew, pip user installs)
    pub fn locate() -> Result<Self, MorningStarError> {
        let path = match find_ytdlp() {
            Some(path) => path,
            None => {
                error!("yt-dlp not found anywhere!");
                return Err(MorningStarError::YtDlpNotFound);
            }
        };
        let ffmpeg = find_ffmpeg();
        if ffmpeg.is_none() {
            warn!("ffmpeg not found; merging and post-processing will fail");
        }
        Ok(Self { path, ffmpeg })
    }

    pub fn with_paths(path: PathBuf, ffmpeg: Option<PathBuf>) -> Self {
        Self { path, ffmpeg }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ffmpeg(&self) -> Option<&Path> {
        self.ffmpeg.as_deref()
    }

    /// Base command: PATH extended with Deno, killed if the handle is dropped
    pub fn command(&self) -> AsyncCommand {
        let mut cmd = AsyncCommand::new(&self.path);
        if let Some(path) = child_path_env() {
            cmd.env("PATH", path);
        }
        cmd.stdin(Stdio::null()).kill_on_drop(true);
        cmd
    }

    /// Full argument list for an option set and URL
    pub fn args_for(&self, opts: &YdlOptions, url: &str) -> Vec<String> {
        let mut opts = opts.clone();
        if opts.ffmpeg_location.is_none() {
            opts.ffmpeg_location = self
                .ffmpeg
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned());
        }
        let mut args = opts.to_args();
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }

    /// Run a metadata-only fetch (`--dump-single-json`) and parse the result
    pub async fn fetch_info(&self, url: &str, opts: &YdlOptions) -> Result<RawInfo, MorningStarError> {
        if let Ok(map) = opts.to_effective_json() {
            debug!("yt-dlp fetch options: {}", map);
        }

        let mut args = vec!["--dump-single-json".to_string()];
        args.extend(self.args_for(opts, url));
        debug!("Running {} {}", self.path.display(), args.join(" "));

        let output = self
            .command()
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = strip_ansi(&String::from_utf8_lossy(&output.stderr));
            error!("yt-dlp extraction failed: {}", stderr.trim());
            return Err(MorningStarError::ExtractionError(error_lines(&stderr)));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }

    /// `yt-dlp --version`, for the About view and diagnostics
    pub async fn version(&self) -> Option<String> {
        let output = self.command().arg("--version").output().await.ok()?;
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// `ERROR:` lines from yt-dlp stderr, or the whole text when there are none
pub fn error_lines(stderr: &str) -> String {
    let errors: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("ERROR:"))
        .collect();
    if errors.is_empty() {
        stderr.trim().to_string()
    } else {
        errors.join("\n")
    }
}

/// PATH for child processes with `~/.deno/bin` in front, when Deno exists
fn child_path_env() -> Option<OsString> {
    let deno = paths::deno_bin_dir()?;
    let current = std::env::var_os("PATH").unwrap_or_default();
    let mut dirs = vec![deno];
    dirs.extend(std::env::split_paths(&current));
    std::env::join_paths(dirs).ok()
}

// ============================================================
// Discovery
// ============================================================

pub fn find_ytdlp() -> Option<PathBuf> {
    if let Some(bundled) = find_bundled_ytdlp() {
        info!("Using bundled yt-dlp: {:?}", bundled);
        return Some(bundled);
    }

    if let Ok(system) = which::which("yt-dlp") {
        info!("Using system yt-dlp: {:?}", system);
        return Some(system);
    }

    if let Some(common) = find_in_common_paths() {
        info!("Using yt-dlp from common path: {:?}", common);
        return Some(common);
    }

    warn!("yt-dlp not found anywhere!");
    None
}

fn find_bundled_ytdlp() -> Option<PathBuf> {
    paths::bundled_bin_dirs()
        .into_iter()
        .map(|dir| dir.join(YTDLP_BINARY))
        .find(|candidate| is_executable(candidate))
}

fn find_in_common_paths() -> Option<PathBuf> {
    const COMMON_PATHS: [&str; 7] = [
        "/opt/homebrew/bin/yt-dlp",
        "/usr/local/bin/yt-dlp",
        "/usr/bin/yt-dlp",
        "/snap/bin/yt-dlp",
        "/Library/Frameworks/Python.framework/Versions/Current/bin/yt-dlp",
        "~/.local/bin/yt-dlp",
        "~/.local/pipx/venvs/yt-dlp/bin/yt-dlp",
    ];

    COMMON_PATHS
        .iter()
        .map(|p| paths::expand_home(p))
        .find(|candidate| is_executable(candidate))
}

pub fn find_ffmpeg() -> Option<PathBuf> {
    let bundled = paths::bundled_bin_dirs()
        .into_iter()
        .map(|dir| dir.join(if cfg!(windows) { "ffmpeg.exe" } else { "ffmpeg" }))
        .find(|candidate| is_executable(candidate));

    bundled.or_else(|| which::which("ffmpeg").ok()).map(|path| {
        debug!("Using ffmpeg at {:?}", path);
        path
    })
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path)
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        path.is_file()
    }
}
