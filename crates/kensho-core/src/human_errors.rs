// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for people submitting identity documents.
//
// Every technical error is mapped to plain English with a clear suggestion.
// An unreadable image is not an error at all (it is processed as-is), and a
// failed checksum or date is an `invalid` field annotation, so neither
// appears here.

use crate::error::KenshoError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Recognition service hiccup; retrying may help.
    Transient,
    /// The user must change what they submitted.
    ActionRequired,
    /// Deployment problem. Neither retrying nor the user can fix it.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the caller may retry automatically.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `KenshoError` into a `HumanError`.
pub fn humanize_error(err: &KenshoError) -> HumanError {
    match err {
        KenshoError::UnsupportedDocumentType(tag) => HumanError {
            message: "This kind of document isn't supported.".into(),
            suggestion: format!(
                "Choose one of the supported document types, such as a driver's licence or an Individual Number Card. (Type: {tag})"
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        KenshoError::UnsupportedMimeType(mime) => HumanError {
            message: "This file format can't be read.".into(),
            suggestion: format!(
                "Upload a JPEG, PNG, or WEBP photo of the card, or a PDF scan. (Format: {mime})"
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        KenshoError::ImageEncode(_) => HumanError {
            message: "The photo couldn't be prepared for reading.".into(),
            suggestion: "This is an internal problem. Please report it along with the photo.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        KenshoError::Recognition(detail) => humanize_recognition_error(detail),

        KenshoError::ResponseParse(_) => HumanError {
            message: "The card was read, but the result was garbled.".into(),
            suggestion: "Try again with a sharper, well-lit photo of the whole card.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        KenshoError::Config(detail) => HumanError {
            message: "The service is not set up correctly.".into(),
            suggestion: format!("Check the document catalog configuration. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        KenshoError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "We don't have permission to read or write that file.".into(),
                    suggestion: "Check the file permissions, or copy the file to a different location first.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        KenshoError::Serialization(_) => HumanError {
            message: "There was an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

/// Parse recognizer failure details into human-readable messages.
fn humanize_recognition_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("timed out") || lower.contains("deadline") {
        HumanError {
            message: "Reading the card took too long.".into(),
            suggestion: "The recognition service is busy. Wait a moment and try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        }
    } else if lower.contains("no content") {
        HumanError {
            message: "Nothing could be read from the card.".into(),
            suggestion: "Make sure the whole card is in the photo, in focus, and without glare.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("api key") || lower.contains("unauthenticated") {
        HumanError {
            message: "The recognition service rejected our credentials.".into(),
            suggestion: "Check the recognition service API key.".into(),
            retriable: false,
            severity: Severity::Permanent,
        }
    } else {
        HumanError {
            message: "The recognition service had a problem.".into(),
            suggestion: format!("Try again. (Detail: {detail})"),
            retriable: true,
            severity: Severity::Transient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_transient() {
        let err = KenshoError::Recognition("request timed out after 60s".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn empty_response_needs_a_better_photo() {
        let err = KenshoError::Recognition("no content generated".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    #[test]
    fn unsupported_mime_is_action_required() {
        let err = KenshoError::UnsupportedMimeType("application/zip".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("application/zip"));
    }

    #[test]
    fn bad_catalog_is_permanent() {
        let human = humanize_error(&KenshoError::Config("invalid catalog".into()));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.retriable);
    }

    #[test]
    fn encode_failure_is_permanent() {
        let human = humanize_error(&KenshoError::ImageEncode("PNG encoding failed".into()));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.retriable);
    }

    #[test]
    fn missing_file_is_action_required() {
        let err = KenshoError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }
}
