//! Browser cookie authentication

pub mod browser;
pub mod strategy;

pub use browser::{Browser, BrowserPreference, BrowserSurvey};
pub use strategy::{validate_url, FetchFailure, FetchPlan};
