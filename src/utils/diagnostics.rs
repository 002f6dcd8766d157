//! Turning raw yt-dlp stderr into text a user can act on

use regex::Regex;
use std::sync::OnceLock;

pub const SUPPORTED_BROWSERS_LINE: &str =
    "Supported browsers: Firefox, Chrome, Brave, Edge, Chromium, Opera, Vivaldi";

fn ansi_regex() -> &'static Regex {
    static ANSI: OnceLock<Regex> = OnceLock::new();
    ANSI.get_or_init(|| Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").expect("valid ANSI regex"))
}

/// Remove terminal colour and cursor escape sequences
pub fn strip_ansi(text: &str) -> String {
    ansi_regex().replace_all(text, "").into_owned()
}

/// First `max` characters of `text`, on a char boundary
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Capitalise the first letter, e.g. `firefox` -> `Firefox`
pub fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Map a failed metadata fetch onto a friendlier explanation
pub fn friendly_fetch_error(raw: &str) -> String {
    let msg = strip_ansi(raw);
    let lower = msg.to_lowercase();

    if lower.contains("n challenge solving failed") || lower.contains("no video formats found") {
        return "YouTube video extraction failed due to anti-bot measures.\n\n\
                This is a known YouTube issue. Try:\n\n\
                1. Wait a few minutes and try again\n\
                2. Use a different video URL\n\
                3. Make sure you're logged into YouTube in your browser\n\n\
                Technical: yt-dlp's n-parameter challenge solver needs updating.\n\
                This affects many YouTube videos currently."
            .to_string();
    }

    if lower.contains("only images are available") {
        return "This video is not available for download.\n\n\
                Possible reasons:\n\
                • Video has been deleted or made private\n\
                • Video is a premiere that hasn't started\n\
                • Content is restricted in your region\n\n\
                Please try a different video URL."
            .to_string();
    }

    if lower.contains("format is not available") {
        return "This video cannot be downloaded.\n\n\
                This usually means:\n\
                • Video has been deleted or made private\n\
                • Video is currently being processed\n\
                • Content is age-restricted or region-locked\n\
                • YouTube anti-bot protection is active\n\n\
                Please verify the video works in your browser, or try a different URL."
            .to_string();
    }

    if msg.contains("Sign in") || lower.contains("not a bot") {
        return "YouTube authentication required.\n\n\
                Please:\n\
                1. Open YouTube in your browser\n\
                2. Sign in to your account\n\
                3. Try fetching the video again\n\n\
                The app uses your browser's login cookies."
            .to_string();
    }

    if lower.contains("private video") || lower.contains("video unavailable") {
        return "Video is private or unavailable.\n\n\
                This video cannot be accessed. It may be:\n\
                • Set to private by the uploader\n\
                • Removed by YouTube\n\
                • Not available in your region\n\n\
                Please try a different video URL."
            .to_string();
    }

    format!(
        "Unable to fetch video information.\n\n{}\n\n\
         Please verify:\n\
         • The URL is correct\n\
         • The video is publicly accessible\n\
         • You're logged into YouTube in your browser",
        truncate_chars(&msg, 300)
    )
}

/// Whether yt-dlp output points at YouTube bot detection
pub fn is_bot_detection(raw: &str) -> bool {
    let lower = raw.to_lowercase();
    lower.contains("bot")
        || lower.contains("sign in to confirm")
        || lower.contains("requested format is not available")
}

/// Instructions shown when YouTube rejects a fetch as automated
pub fn bot_detection_message(raw: &str, browser: Option<&str>) -> String {
    let msg = strip_ansi(raw);
    format!(
        "YouTube bot detection active. To fix this:\n\n\
         1. Make sure you're logged into YouTube in {}\n\
         2. Go to Tools > Preferences and verify browser selection\n\
         3. Try signing out and back in to YouTube\n\
         4. Clear YouTube cookies and login again\n\
         5. Wait a few minutes if rate-limited\n\n\
         Technical details: {}",
        browser.unwrap_or("your browser"),
        truncate_chars(&msg, 200)
    )
}

/// Cookie-store failures that have a clearer explanation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieProblem {
    /// yt-dlp could not find the cookie database of the named browser
    MissingDatabase { browser: String },
    Corrupted,
    PermissionDenied,
}

const COOKIE_BROWSERS: [&str; 8] = [
    "firefox", "chrome", "brave", "edge", "chromium", "opera", "vivaldi", "safari",
];

pub fn classify_cookie_error(raw: &str) -> Option<CookieProblem> {
    let lower = raw.to_lowercase();

    if lower.contains("could not find") && lower.contains("cookies database") {
        if let Some(browser) = COOKIE_BROWSERS.iter().find(|b| lower.contains(*b)) {
            return Some(CookieProblem::MissingDatabase {
                browser: browser.to_string(),
            });
        }
    }

    if lower.contains("database") && (lower.contains("corrupt") || lower.contains("malformed")) {
        return Some(CookieProblem::Corrupted);
    }

    if lower.contains("permission denied") || lower.contains("access denied") {
        return Some(CookieProblem::PermissionDenied);
    }

    None
}

impl CookieProblem {
    /// User-facing text; `available` and `with_youtube` are the detected browsers
    pub fn message(&self, available: &[String], with_youtube: &[String]) -> String {
        match self {
            CookieProblem::MissingDatabase { browser } => {
                let name = title_case(browser);
                if available.is_empty() {
                    return format!(
                        "❌ {name} not found\n\n\
                         I couldn't find {name} or any other supported browsers on your system.\n\n\
                         {SUPPORTED_BROWSERS_LINE}\n\n\
                         💡 Recommendation: Install a browser, sign into YouTube, then use 'Auto (Recommended)' mode."
                    );
                }

                let mut msg = format!(
                    "❌ {name} cookies not found\n\n\
                     The selected browser ({name}) doesn't appear to be installed \
                     or doesn't have cookies on this system.\n\n\
                     Available browsers with YouTube login:\n"
                );
                if with_youtube.is_empty() {
                    msg.push_str("  (None detected with YouTube login)\n\n");
                    msg.push_str(
                        "💡 Recommendation: Sign into YouTube in one of your browsers, \
                         then use 'Auto (Recommended)' mode.",
                    );
                } else {
                    for b in with_youtube {
                        msg.push_str(&format!("  ✓ {}\n", title_case(b)));
                    }
                    msg.push_str(&format!(
                        "\n💡 Recommendation: Set authentication to 'Auto (Recommended)' \
                         in Tools > Preferences, and I'll automatically use {}.",
                        title_case(&with_youtube[0])
                    ));
                }
                msg
            }
            CookieProblem::Corrupted => "❌ Browser cookie database is corrupted\n\n\
                 The selected browser's cookie file appears to be damaged or corrupted.\n\n\
                 💡 Try these solutions:\n\
                 \x20 1. Restart your browser and try again\n\
                 \x20 2. Use 'Auto (Recommended)' to try a different browser\n\
                 \x20 3. Clear browser cookies and sign into YouTube again\n"
                .to_string(),
            CookieProblem::PermissionDenied => "❌ Permission denied\n\n\
                 Cannot access browser cookies due to file permissions.\n\n\
                 💡 This can happen if:\n\
                 \x20 - The browser is currently running (some browsers lock cookie files)\n\
                 \x20 - Your user account doesn't have permission to read the cookie file\n\n\
                 Try closing the browser and running this app again."
                .to_string(),
        }
    }
}
