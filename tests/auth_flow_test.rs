use av_morning_star::auth::strategy::{handle_fetch_error, needs_cookie_retry, plan_fetch};
use av_morning_star::auth::{Browser, BrowserPreference, BrowserSurvey, FetchFailure};

const WATCH: &str = "https://www.youtube.com/watch?v=aqz-KE-bpKQ";
const BOT_ERROR: &str = "ERROR: [youtube] aqz-KE-bpKQ: Sign in to confirm you're not a bot";

fn survey() -> BrowserSurvey {
    BrowserSurvey {
        available: vec![Browser::Chrome, Browser::Firefox, Browser::Vivaldi],
        with_youtube: vec![Browser::Chrome, Browser::Firefox],
        system_default: Some(Browser::Firefox),
    }
}

/// A signed-out first attempt, bot detection, an accepted retry, then a
/// later fetch in the same session
#[test]
fn test_session_falls_back_to_cookies() {
    let survey = survey();
    let mut cookieless_failed = false;

    // Auto first tries YouTube without cookies
    let first = plan_fetch(WATCH, BrowserPreference::Auto, None, cookieless_failed);
    assert_eq!(first.cookies, None);

    assert!(needs_cookie_retry(WATCH, BOT_ERROR, cookieless_failed));
    cookieless_failed = true;

    let browser = match handle_fetch_error(WATCH, BOT_ERROR, true, &survey) {
        FetchFailure::OfferRetry { browser, prompt } => {
            assert!(prompt.contains("logged into YouTube in Chrome"));
            browser
        }
        other => panic!("expected a retry offer, got {:?}", other),
    };
    assert_eq!(browser, Browser::Chrome);

    // Accepting pins the browser
    let pinned = BrowserPreference::Browser(browser);
    let retry = plan_fetch(WATCH, pinned, survey.resolve(pinned), cookieless_failed);
    assert_eq!(retry.cookies, Some(Browser::Chrome));
    assert_eq!(retry.status, "Fetching with Chrome authentication...");

    // A second bot error in the same session is reported, not retried
    assert!(!needs_cookie_retry(WATCH, BOT_ERROR, cookieless_failed));
    match handle_fetch_error(WATCH, BOT_ERROR, false, &survey) {
        FetchFailure::Error { message } => assert_eq!(message, BOT_ERROR),
        other => panic!("expected a plain error, got {:?}", other),
    }
}

#[test]
fn test_auto_after_failure_prefers_default_browser() {
    let survey = survey();
    let resolved = survey.resolve(BrowserPreference::Auto);
    assert_eq!(resolved, Some(Browser::Firefox));

    let plan = plan_fetch(WATCH, BrowserPreference::Auto, resolved, true);
    assert_eq!(plan.cookies, Some(Browser::Firefox));
    assert_eq!(plan.status, "Auto-detected Firefox, fetching...");
}

#[test]
fn test_none_preference_never_sends_cookies() {
    let survey = survey();
    let resolved = survey.resolve(BrowserPreference::None);
    assert_eq!(resolved, None);

    let youtube = plan_fetch(WATCH, BrowserPreference::None, resolved, true);
    assert_eq!(youtube.cookies, None);

    let other = plan_fetch("https://odysee.com/@chan", BrowserPreference::None, resolved, false);
    assert_eq!(other.cookies, None);
    assert_eq!(other.status, "Connecting to URL...");
}

#[test]
fn test_missing_cookie_store_suggests_signed_in_browser() {
    let survey = BrowserSurvey {
        available: vec![Browser::Chrome],
        with_youtube: vec![Browser::Chrome],
        system_default: None,
    };
    let error = "ERROR: could not find firefox cookies database in \"/home/u/.mozilla/firefox\"";

    assert!(!needs_cookie_retry(WATCH, error, false));
    match handle_fetch_error(WATCH, error, false, &survey) {
        FetchFailure::Error { message } => {
            assert!(message.starts_with("❌ Firefox cookies not found"));
            assert!(message.contains("  ✓ Chrome\n"));
            assert!(message.contains("I'll automatically use Chrome."));
        }
        other => panic!("expected a cookie explanation, got {:?}", other),
    }
}

#[test]
fn test_bot_detection_without_signed_in_browser() {
    let survey = BrowserSurvey {
        available: vec![Browser::Vivaldi],
        ..Default::default()
    };
    match handle_fetch_error(WATCH, BOT_ERROR, true, &survey) {
        FetchFailure::AuthenticationRequired { message } => {
            assert!(message.contains("  • Vivaldi\n"));
            assert!(message.contains("2. Go to Tools > Preferences"));
        }
        other => panic!("expected authentication required, got {:?}", other),
    }
}
