//! Browser cookie stores: which browsers exist, which are logged into YouTube
//!
//! Detection only looks for cookie databases on disk. Whether a browser holds
//! a YouTube login is answered by asking yt-dlp to export that browser's
//! cookies into a scratch Netscape cookie file and scanning it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::str::FromStr;
use std::time::Duration;
use tokio::process::Command as AsyncCommand;
use tracing::{debug, info, warn};

const XDG_TIMEOUT: Duration = Duration::from_secs(2);
const COOKIE_EXPORT_TIMEOUT: Duration = Duration::from_secs(10);

/// Cookie names that only exist for a signed-in Google account
const YOUTUBE_AUTH_COOKIES: [&str; 5] = ["SAPISID", "SSID", "SID", "HSID", "APISID"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Brave,
    Firefox,
    Chrome,
    Chromium,
    Edge,
    Opera,
    Vivaldi,
    Safari,
}

impl Browser {
    /// Detection order: the first hit wins for Auto
    pub const ALL: [Browser; 8] = [
        Browser::Brave,
        Browser::Firefox,
        Browser::Chrome,
        Browser::Chromium,
        Browser::Edge,
        Browser::Opera,
        Browser::Vivaldi,
        Browser::Safari,
    ];

    /// Name accepted by `--cookies-from-browser`
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Brave => "brave",
            Browser::Firefox => "firefox",
            Browser::Chrome => "chrome",
            Browser::Chromium => "chromium",
            Browser::Edge => "edge",
            Browser::Opera => "opera",
            Browser::Vivaldi => "vivaldi",
            Browser::Safari => "safari",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Browser::Brave => "Brave",
            Browser::Firefox => "Firefox",
            Browser::Chrome => "Chrome",
            Browser::Chromium => "Chromium",
            Browser::Edge => "Edge",
            Browser::Opera => "Opera",
            Browser::Vivaldi => "Vivaldi",
            Browser::Safari => "Safari",
        }
    }

    /// Cookie database locations relative to the home directory.
    ///
    /// Covers native and Flatpak installs on Linux, macOS Application Support
    /// and Windows `AppData`. Firefox entries are profile directories.
    pub fn cookie_store_candidates(&self) -> &'static [&'static str] {
        match self {
            Browser::Brave => &[
                ".var/app/com.brave.Browser/config/BraveSoftware/Brave-Browser/Default/Cookies",
                ".config/BraveSoftware/Brave-Browser/Default/Cookies",
                ".config/BraveSoftware/Brave-Browser/Default/Network/Cookies",
                "Library/Application Support/BraveSoftware/Brave-Browser/Default/Cookies",
                "AppData/Local/BraveSoftware/Brave-Browser/User Data/Default/Network/Cookies",
            ],
            Browser::Firefox => &[
                ".var/app/org.mozilla.firefox/.mozilla/firefox",
                ".mozilla/firefox",
                "snap/firefox/common/.mozilla/firefox",
                "Library/Application Support/Firefox/Profiles",
                "AppData/Roaming/Mozilla/Firefox/Profiles",
            ],
            Browser::Chrome => &[
                ".var/app/com.google.Chrome/config/google-chrome/Default/Cookies",
                ".config/google-chrome/Default/Cookies",
                ".config/google-chrome/Default/Network/Cookies",
                "Library/Application Support/Google/Chrome/Default/Cookies",
                "AppData/Local/Google/Chrome/User Data/Default/Network/Cookies",
            ],
            Browser::Chromium => &[
                ".var/app/org.chromium.Chromium/config/chromium/Default/Cookies",
                ".config/chromium/Default/Cookies",
                ".config/chromium/Default/Network/Cookies",
                "Library/Application Support/Chromium/Default/Cookies",
                "AppData/Local/Chromium/User Data/Default/Network/Cookies",
            ],
            Browser::Edge => &[
                ".var/app/com.microsoft.Edge/config/microsoft-edge/Default/Cookies",
                ".config/microsoft-edge/Default/Cookies",
                ".config/microsoft-edge/Default/Network/Cookies",
                "Library/Application Support/Microsoft Edge/Default/Cookies",
                "AppData/Local/Microsoft/Edge/User Data/Default/Network/Cookies",
            ],
            Browser::Opera => &[
                ".var/app/com.opera.Opera/config/opera/Cookies",
                ".config/opera/Cookies",
                ".config/opera/Network/Cookies",
                "Library/Application Support/com.operasoftware.Opera/Cookies",
                "AppData/Roaming/Opera Software/Opera Stable/Network/Cookies",
            ],
            Browser::Vivaldi => &[
                ".config/vivaldi/Default/Cookies",
                ".config/vivaldi/Default/Network/Cookies",
                "Library/Application Support/Vivaldi/Default/Cookies",
                "AppData/Local/Vivaldi/User Data/Default/Network/Cookies",
            ],
            Browser::Safari => &[
                "Library/Cookies/Cookies.binarycookies",
                "Library/Containers/com.apple.Safari/Data/Library/Cookies/Cookies.binarycookies",
            ],
        }
    }

    /// Whether a cookie store for this browser exists under `home`
    pub fn has_cookie_store(&self, home: &Path) -> bool {
        self.cookie_store_candidates().iter().any(|relative| {
            let path = home.join(relative);
            match self {
                Browser::Firefox => path.is_dir() && has_firefox_profile(&path),
                _ => path.is_file(),
            }
        })
    }

    /// Map an xdg `.desktop` entry (e.g. `google-chrome.desktop`) to a browser
    pub fn from_desktop_entry(entry: &str) -> Option<Browser> {
        const DESKTOP_NAMES: [(&str, Browser); 6] = [
            ("brave", Browser::Brave),
            ("google-chrome", Browser::Chrome),
            ("chromium", Browser::Chromium),
            ("firefox", Browser::Firefox),
            ("microsoft-edge", Browser::Edge),
            ("opera", Browser::Opera),
        ];
        let entry = entry.trim().to_lowercase();
        DESKTOP_NAMES
            .iter()
            .find(|(key, _)| entry.contains(key))
            .map(|(_, browser)| *browser)
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Browser {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Browser::ALL
            .iter()
            .copied()
            .find(|b| b.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unsupported browser: {}", s))
    }
}

fn has_firefox_profile(dir: &Path) -> bool {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .any(|entry| entry.file_name().to_string_lossy().contains(".default")),
        Err(_) => false,
    }
}

/// Which browser's cookies to hand to yt-dlp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BrowserPreference {
    /// Pick the browser logged into YouTube, else any browser with cookies
    #[default]
    Auto,
    /// Never send cookies
    None,
    Browser(Browser),
}

impl BrowserPreference {
    /// Choices offered in Preferences, in display order
    pub fn options() -> Vec<BrowserPreference> {
        let mut options = vec![BrowserPreference::Auto, BrowserPreference::None];
        options.extend(
            [
                Browser::Firefox,
                Browser::Chrome,
                Browser::Brave,
                Browser::Edge,
                Browser::Chromium,
                Browser::Opera,
                Browser::Vivaldi,
            ]
            .map(BrowserPreference::Browser),
        );
        if cfg!(target_os = "macos") {
            options.push(BrowserPreference::Browser(Browser::Safari));
        }
        options
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserPreference::Auto => "auto",
            BrowserPreference::None => "none",
            BrowserPreference::Browser(b) => b.as_str(),
        }
    }
}

impl fmt::Display for BrowserPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserPreference::Auto => write!(f, "Auto (Recommended)"),
            BrowserPreference::None => write!(f, "None (No authentication)"),
            BrowserPreference::Browser(b) => write!(f, "{}", b.label()),
        }
    }
}

impl FromStr for BrowserPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(BrowserPreference::Auto),
            "none" | "" => Ok(BrowserPreference::None),
            other => other.parse().map(BrowserPreference::Browser),
        }
    }
}

impl Serialize for BrowserPreference {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BrowserPreference {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Browsers with a cookie store under `home`, in detection order
pub fn detect_available_in(home: &Path) -> Vec<Browser> {
    Browser::ALL
        .iter()
        .copied()
        .filter(|b| b.has_cookie_store(home))
        .collect()
}

pub fn detect_available_browsers() -> Vec<Browser> {
    match dirs::home_dir() {
        Some(home) => {
            let found = detect_available_in(&home);
            debug!("Browsers with cookie stores: {:?}", found);
            found
        }
        None => {
            warn!("No home directory, skipping browser detection");
            Vec::new()
        }
    }
}

/// The desktop's default browser, via `xdg-settings` (Linux only in practice)
pub async fn default_system_browser() -> Option<Browser> {
    let child = AsyncCommand::new("xdg-settings")
        .args(["get", "default-web-browser"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .output();

    match tokio::time::timeout(XDG_TIMEOUT, child).await {
        Ok(Ok(output)) if output.status.success() => {
            Browser::from_desktop_entry(&String::from_utf8_lossy(&output.stdout))
        }
        Ok(Ok(_)) => None,
        Ok(Err(e)) => {
            debug!("xdg-settings unavailable: {}", e);
            None
        }
        Err(_) => {
            debug!("xdg-settings timed out");
            None
        }
    }
}

/// Whether a Netscape cookie file holds YouTube login cookies
pub fn has_youtube_login(cookie_file: &str) -> bool {
    cookie_file.lines().any(|line| {
        let line = line.strip_prefix("#HttpOnly_").unwrap_or(line);
        if line.starts_with('#') {
            return false;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 7 {
            return false;
        }
        let (domain, name) = (fields[0], fields[5].to_uppercase());
        domain.contains("youtube.com") && YOUTUBE_AUTH_COOKIES.iter().any(|c| name.contains(c))
    })
}

/// Export `browser`'s cookies through yt-dlp and look for a YouTube login
pub async fn probe_youtube_login(ytdlp: &Path, browser: Browser) -> bool {
    let scratch = match tempfile::Builder::new()
        .prefix("morningstar-cookies-")
        .suffix(".txt")
        .tempfile()
    {
        Ok(file) => file,
        Err(e) => {
            warn!("Could not create scratch cookie file: {}", e);
            return false;
        }
    };

    // With no URL yt-dlp exits with a usage error after saving the cookie jar,
    // so the exit status is not meaningful here.
    let export = AsyncCommand::new(ytdlp)
        .arg("--cookies-from-browser")
        .arg(browser.as_str())
        .arg("--cookies")
        .arg(scratch.path())
        .args(["--skip-download", "--quiet", "--no-warnings"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status();

    match tokio::time::timeout(COOKIE_EXPORT_TIMEOUT, export).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => {
            debug!("Cookie export for {} failed to start: {}", browser, e);
            return false;
        }
        Err(_) => {
            warn!("Cookie export for {} timed out", browser);
            return false;
        }
    }

    match tokio::fs::read_to_string(scratch.path()).await {
        Ok(contents) => has_youtube_login(&contents),
        Err(_) => false,
    }
}

/// Available browsers that are signed into YouTube, in detection order
pub async fn browsers_with_youtube_cookies(ytdlp: &Path) -> Vec<Browser> {
    let mut logged_in = Vec::new();
    for browser in detect_available_browsers() {
        if probe_youtube_login(ytdlp, browser).await {
            logged_in.push(browser);
        }
    }
    info!("Browsers signed into YouTube: {:?}", logged_in);
    logged_in
}

/// Browser state gathered once per decision
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserSurvey {
    pub available: Vec<Browser>,
    pub with_youtube: Vec<Browser>,
    pub system_default: Option<Browser>,
}

impl BrowserSurvey {
    pub async fn collect(ytdlp: Option<&PathBuf>) -> Self {
        let available = detect_available_browsers();
        let with_youtube = match ytdlp {
            Some(path) => browsers_with_youtube_cookies(path).await,
            None => Vec::new(),
        };
        Self {
            available,
            with_youtube,
            system_default: default_system_browser().await,
        }
    }

    /// Auto resolution: a browser signed into YouTube, then any cookie store,
    /// else none. Within each group the desktop's default browser wins.
    pub fn auto_choice(&self) -> Option<Browser> {
        let prefer_default = |group: &[Browser]| {
            self.system_default
                .filter(|b| group.contains(b))
                .or_else(|| group.first().copied())
        };
        prefer_default(&self.with_youtube).or_else(|| prefer_default(&self.available))
    }

    pub fn resolve(&self, preference: BrowserPreference) -> Option<Browser> {
        match preference {
            BrowserPreference::Auto => self.auto_choice(),
            BrowserPreference::None => None,
            BrowserPreference::Browser(b) => Some(b),
        }
    }

    pub fn available_names(&self) -> Vec<String> {
        self.available.iter().map(|b| b.as_str().to_string()).collect()
    }

    pub fn youtube_names(&self) -> Vec<String> {
        self.with_youtube.iter().map(|b| b.as_str().to_string()).collect()
    }
}
