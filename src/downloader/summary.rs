//! End-of-batch report

use crate::utils::diagnostics::truncate_chars;
use serde::{Deserialize, Serialize};

/// Tally of one batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    /// `(url, error)` in the order they failed
    pub failures: Vec<(String, String)>,
    pub cancelled: bool,
}

/// Message shown when a batch ends; `Error` is presented as a failure dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryMessage {
    Success(String),
    Error(String),
}

impl SummaryMessage {
    pub fn text(&self) -> &str {
        match self {
            SummaryMessage::Success(text) | SummaryMessage::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SummaryMessage::Error(_))
    }
}

impl BatchSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, url: impl Into<String>, error: impl Into<String>) {
        self.failures.push((url.into(), error.into()));
    }

    pub fn message(&self) -> SummaryMessage {
        let succeeded = self.succeeded;
        let failed = self.failed();

        if self.cancelled {
            return SummaryMessage::Error(format!(
                "Download cancelled.\n✓ {} completed\n✗ {} failed",
                succeeded, failed
            ));
        }

        if failed == 0 {
            return SummaryMessage::Success(format!(
                "All {} downloads completed successfully!",
                succeeded
            ));
        }

        if succeeded == 0 {
            let mut text = format!("All {} downloads failed.\n\nErrors:\n", failed);
            for (_, error) in self.failures.iter().take(3) {
                text.push_str(&format!("- {}...\n", truncate_chars(error, 100)));
            }
            return SummaryMessage::Error(text);
        }

        let mut text = format!(
            "Completed with mixed results:\n✓ {} succeeded\n✗ {} failed",
            succeeded, failed
        );
        if let Some((_, first)) = self.failures.first() {
            text.push_str(&format!("\n\nFirst error: {}", truncate_chars(first, 150)));
        }
        SummaryMessage::Success(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_succeeded() {
        let summary = BatchSummary {
            succeeded: 3,
            ..Default::default()
        };
        assert_eq!(
            summary.message(),
            SummaryMessage::Success("All 3 downloads completed successfully!".into())
        );
    }

    #[test]
    fn test_all_failed_lists_first_three() {
        let mut summary = BatchSummary::default();
        for i in 0..4 {
            summary.record_failure(format!("https://e.x/{}", i), format!("boom {}", i));
        }
        let message = summary.message();
        assert!(message.is_error());
        assert_eq!(
            message.text(),
            "All 4 downloads failed.\n\nErrors:\n- boom 0...\n- boom 1...\n- boom 2...\n"
        );
    }

    #[test]
    fn test_long_errors_are_truncated() {
        let mut summary = BatchSummary::default();
        summary.record_failure("u", "x".repeat(300));
        let text = summary.message().text().to_string();
        assert!(text.contains(&format!("- {}...", "x".repeat(100))));
        assert!(!text.contains(&"x".repeat(101)));

        summary.record_success();
        let text = summary.message().text().to_string();
        assert!(text.starts_with("Completed with mixed results:\n✓ 1 succeeded\n✗ 1 failed"));
        assert!(text.ends_with(&format!("First error: {}", "x".repeat(150))));
    }

    #[test]
    fn test_cancelled_batch() {
        let summary = BatchSummary {
            succeeded: 1,
            failures: vec![],
            cancelled: true,
        };
        assert!(summary.message().is_error());
        assert!(summary.message().text().starts_with("Download cancelled."));
    }
}
