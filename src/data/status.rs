//! Status code classification.
//!
//! Maps the numeric result status of a measurement to a [`Severity`] tier
//! and a short word for the cell label.

use serde::Serialize;

use crate::source::StatusLabels;

/// Word used when an unrecognized code has no document-provided label.
pub const UNKNOWN_WORD: &str = "Unknown";

/// Severity tier of a measurement result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
    Timeout,
    Unknown,
}

impl Severity {
    /// All tiers, in display order.
    pub const ALL: [Severity; 5] = [
        Severity::Success,
        Severity::Warning,
        Severity::Error,
        Severity::Timeout,
        Severity::Unknown,
    ];

    /// Returns a short symbol for compact display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Success => "OK",
            Severity::Warning => "WARN",
            Severity::Error => "ERR",
            Severity::Timeout => "T/O",
            Severity::Unknown => "?",
        }
    }

    /// Timeout and Unknown share the neutral ("inverse") visual tier.
    pub fn is_neutral(&self) -> bool {
        matches!(self, Severity::Timeout | Severity::Unknown)
    }
}

/// Outcome of classifying one status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub severity: Severity,
    /// Short human-facing word ("OK", "Warning", ...).
    pub word: String,
}

/// Classify a status code.
///
/// Total over `i64`: codes outside 0..=4 are `Unknown` and borrow their
/// word from `labels` when the document provides one.
pub fn classify(code: i64, labels: &StatusLabels) -> Classification {
    let (severity, word) = match code {
        0 => (Severity::Success, "OK"),
        1 => (Severity::Warning, "Warning"),
        2 | 3 => (Severity::Error, "Error"),
        4 => (Severity::Timeout, "Timeout"),
        other => (
            Severity::Unknown,
            labels.get(other).unwrap_or(UNKNOWN_WORD),
        ),
    };

    Classification {
        severity,
        word: word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn labels() -> StatusLabels {
        [(0, "OK"), (2, "CRITICAL"), (7, "MAINTENANCE")].into_iter().collect()
    }

    #[test]
    fn test_known_codes() {
        let labels = labels();
        assert_eq!(classify(0, &labels).severity, Severity::Success);
        assert_eq!(classify(0, &labels).word, "OK");
        assert_eq!(classify(1, &labels).severity, Severity::Warning);
        assert_eq!(classify(1, &labels).word, "Warning");
        assert_eq!(classify(4, &labels).severity, Severity::Timeout);
        assert_eq!(classify(4, &labels).word, "Timeout");
    }

    #[test]
    fn test_error_codes_ignore_labels() {
        // The document calls 2 "CRITICAL" but the cell word stays short.
        let c = classify(2, &labels());
        assert_eq!(c.severity, Severity::Error);
        assert_eq!(c.word, "Error");
        assert_eq!(classify(3, &labels()).severity, Severity::Error);
    }

    #[test]
    fn test_unknown_code_uses_document_label() {
        let c = classify(7, &labels());
        assert_eq!(c.severity, Severity::Unknown);
        assert_eq!(c.word, "MAINTENANCE");
    }

    #[test]
    fn test_unknown_code_without_label() {
        let c = classify(-3, &StatusLabels::default());
        assert_eq!(c.severity, Severity::Unknown);
        assert_eq!(c.word, UNKNOWN_WORD);
    }

    #[test]
    fn test_neutral_tier() {
        assert!(Severity::Timeout.is_neutral());
        assert!(Severity::Unknown.is_neutral());
        assert!(!Severity::Error.is_neutral());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_classify_is_total(code in any::<i64>()) {
            let c = classify(code, &labels());
            prop_assert!(Severity::ALL.contains(&c.severity));
            prop_assert!(!c.word.is_empty());
            if !(0..=4).contains(&code) {
                prop_assert_eq!(c.severity, Severity::Unknown);
            }
        }
    }
}
