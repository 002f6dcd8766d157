//! When to send browser cookies with a fetch, and what to do when YouTube
//! pushes back.
//!
//! YouTube is tried cookieless first so a signed-out user is never asked for
//! anything. Once a cookieless fetch trips bot detection, that fact is kept
//! for the rest of the session and later fetches go straight to cookies.

use super::browser::{Browser, BrowserPreference, BrowserSurvey};
use crate::utils::diagnostics::{classify_cookie_error, is_bot_detection, truncate_chars};
use crate::utils::SUPPORTED_BROWSERS_LINE;

pub const EMPTY_URL: &str = "Please enter a URL";
pub const NOT_HTTP_URL: &str = "Please enter a valid URL starting with http:// or https://";

/// Trimmed URL, or the message to show the user
pub fn validate_url(input: &str) -> Result<&str, &'static str> {
    let url = input.trim();
    if url.is_empty() {
        return Err(EMPTY_URL);
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(NOT_HTTP_URL);
    }
    Ok(url)
}

pub fn is_youtube_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.contains("youtube.com") || lower.contains("youtu.be")
}

/// Cookies to use for one fetch and the status line describing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub cookies: Option<Browser>,
    pub status: String,
}

pub fn plan_fetch(
    url: &str,
    preference: BrowserPreference,
    resolved: Option<Browser>,
    cookieless_failed: bool,
) -> FetchPlan {
    if !is_youtube_url(url) {
        return FetchPlan {
            cookies: resolved,
            status: "Connecting to URL...".to_string(),
        };
    }

    if !cookieless_failed && resolved.is_none() {
        return FetchPlan {
            cookies: None,
            status: "Fetching video information (no authentication)...".to_string(),
        };
    }

    let status = match (resolved, preference) {
        (Some(browser), BrowserPreference::Auto) => format!("Auto-detected {}, fetching...", browser),
        (Some(browser), _) => format!("Fetching with {} authentication...", browser),
        (None, _) => "Fetching (no authentication)...".to_string(),
    };
    FetchPlan {
        cookies: resolved,
        status,
    }
}

/// What the UI should do after a failed fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// Ask whether to retry using this browser's YouTube login
    OfferRetry { browser: Browser, prompt: String },
    /// YouTube wants a login and no signed-in browser was found
    AuthenticationRequired { message: String },
    Error { message: String },
}

/// Whether a failed fetch is YouTube bot detection that cookies could fix
pub fn needs_cookie_retry(url: &str, error: &str, cookieless_failed: bool) -> bool {
    is_youtube_url(url) && is_bot_detection(error) && !cookieless_failed
}

/// Decide how to react to a failed fetch.
///
/// Callers check [`needs_cookie_retry`] first and, when it holds, record that
/// cookieless fetching failed before calling this with a fresh survey.
pub fn handle_fetch_error(url: &str, error: &str, retry: bool, survey: &BrowserSurvey) -> FetchFailure {
    if retry && is_youtube_url(url) {
        if let Some(browser) = survey.with_youtube.first().copied() {
            return FetchFailure::OfferRetry {
                browser,
                prompt: format!(
                    "YouTube is requesting authentication to prevent bot access.\n\n\
                     Good news! I detected you're logged into YouTube in {browser}.\n\n\
                     Would you like to retry using your {browser} login?"
                ),
            };
        }
        return FetchFailure::AuthenticationRequired {
            message: authentication_required_message(error, &survey.available),
        };
    }

    let message = match classify_cookie_error(error) {
        Some(problem) => problem.message(&survey.available_names(), &survey.youtube_names()),
        None => error.to_string(),
    };
    FetchFailure::Error { message }
}

fn authentication_required_message(error: &str, available: &[Browser]) -> String {
    let details = truncate_chars(error, 200);
    if available.is_empty() {
        return format!(
            "YouTube requires authentication, but I couldn't find any supported browsers.\n\n\
             {SUPPORTED_BROWSERS_LINE}\n\n\
             Please install a browser and sign into YouTube, then try again.\n\n\
             Technical details: {details}"
        );
    }

    let names: Vec<&str> = available.iter().map(|b| b.label()).collect();
    format!(
        "YouTube requires authentication to download this video.\n\n\
         I found these browsers on your system:\n\
         \x20 • {}\n\n\
         To fix this:\n\
         1. Sign into YouTube in one of these browsers\n\
         2. Go to Tools > Preferences\n\
         3. Select your browser\n\
         4. Try fetching again\n\n\
         Technical details: {details}",
        names.join(", ")
    )
}
