//! Seams for the external OCR and translation services.
//!
//! The actual network calls live with the host; this module owns the
//! pieces with behavior worth testing: the error-message classifier that
//! sorts service failures into actionable categories, and the shared
//! language tables.

/// Category of an external-service failure, derived from its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// Blocked by browser security (CORS / fetch refusal).
    Cors,
    /// Connectivity problem or timeout.
    Network,
    /// The service answered with an error payload.
    Api,
    Unknown,
}

impl ServiceErrorKind {
    /// User-facing summary for the status line.
    pub fn message(&self) -> &'static str {
        match self {
            ServiceErrorKind::Cors => {
                "Translation service blocked by browser security. Using proxy..."
            }
            ServiceErrorKind::Network => "Network error. Please check your connection.",
            ServiceErrorKind::Api => "Translation service returned an error.",
            ServiceErrorKind::Unknown => "Translation failed.",
        }
    }
}

/// Classify a raw service error message.
///
/// Matching is on message substrings because that is all the upstream
/// fetch layer exposes; callers may retry manually on any category.
pub fn classify_service_error(message: &str) -> ServiceErrorKind {
    if message.contains("CORS") || message.contains("Failed to fetch") {
        ServiceErrorKind::Cors
    } else if message.contains("NetworkError") || message.contains("timeout") {
        ServiceErrorKind::Network
    } else if message.contains("translate error") {
        ServiceErrorKind::Api
    } else {
        ServiceErrorKind::Unknown
    }
}

/// A failed service call: classified category plus the raw message.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{}: {}", .kind.message(), .message)]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: classify_service_error(&message),
            message,
        }
    }
}

/// Machine translation collaborator: text in, translated text out.
pub trait Translator {
    fn translate(&mut self, text: &str, target_lang: &str) -> Result<String, ServiceError>;
}

/// OCR collaborator: image bytes in, recognized text out.
pub trait OcrEngine {
    fn recognize(&mut self, image: &[u8], language: &str) -> Result<String, ServiceError>;
}

/// Languages offered for translation, dictation, and OCR.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("pt", "Portuguese"),
    ("it", "Italian"),
    ("ru", "Russian"),
    ("zh", "Chinese"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
];

/// OCR page-segmentation modes, as (mode value, display name).
pub const OCR_TEXT_TYPES: &[(&str, &str)] = &[
    ("3", "Automatic (Default)"),
    ("1", "Automatic (with OSD)"),
    ("6", "Block of Text"),
    ("4", "Single Column"),
    ("11", "Sparse Text"),
    ("7", "Single Line"),
    ("8", "Single Word"),
    ("10", "Single Character"),
];

/// Display name for a language code, if offered.
pub fn language_name(code: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_message_pattern() {
        let cases = [
            ("CORS policy blocked the request", ServiceErrorKind::Cors),
            ("TypeError: Failed to fetch", ServiceErrorKind::Cors),
            ("NetworkError when attempting to fetch", ServiceErrorKind::Network),
            ("request timeout after 30000ms", ServiceErrorKind::Network),
            ("translate error 503: upstream down", ServiceErrorKind::Api),
            ("something else entirely", ServiceErrorKind::Unknown),
        ];
        for (message, expected) in cases {
            assert_eq!(classify_service_error(message), expected, "{message}");
        }
    }

    #[test]
    fn service_error_carries_classification() {
        let err = ServiceError::new("translate error 400: bad request");
        assert_eq!(err.kind, ServiceErrorKind::Api);
        assert!(err.to_string().contains("translate error 400"));
    }

    #[test]
    fn language_table_lookups() {
        assert_eq!(language_name("es"), Some("Spanish"));
        assert_eq!(language_name("xx"), None);
        assert_eq!(LANGUAGES.len(), 12);
    }
}
