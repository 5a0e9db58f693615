//! Speech-recognition configuration and transcript cleanup.
//!
//! Capture itself happens in the host's recognition engine; this module
//! holds the configuration handed to it and the auto-formatting applied to
//! final transcripts before they land in the editor.

use serde::{Deserialize, Serialize};

/// Configuration for the host speech-recognition engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionConfig {
    /// Language tag for recognition, e.g. "en" or "fr".
    pub language: String,
    /// Deliver interim (non-final) transcripts as they form.
    pub interim_results: bool,
    /// Keep listening after a final result instead of stopping.
    pub continuous: bool,
    pub max_alternatives: u8,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            interim_results: true,
            // Stop after a short utterance; the user restarts for more.
            continuous: false,
            max_alternatives: 1,
        }
    }
}

/// Tidy a final transcript: collapse whitespace, capitalize the first
/// letter, and make sure it ends with sentence punctuation.
pub fn auto_format_transcript(transcript: &str) -> String {
    let collapsed = transcript.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return collapsed;
    }

    let mut chars = collapsed.chars();
    let first = chars.next().unwrap_or_default();
    let mut formatted: String = first.to_uppercase().collect();
    formatted.push_str(chars.as_str());

    if !formatted.ends_with(['.', '!', '?']) {
        formatted.push('.');
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_and_punctuates() {
        assert_eq!(auto_format_transcript("hello world"), "Hello world.");
    }

    #[test]
    fn keeps_existing_terminal_punctuation() {
        assert_eq!(auto_format_transcript("is it done?"), "Is it done?");
        assert_eq!(auto_format_transcript("stop!"), "Stop!");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(
            auto_format_transcript("  spread \t out\nwords "),
            "Spread out words."
        );
    }

    #[test]
    fn empty_transcript_stays_empty() {
        assert_eq!(auto_format_transcript(""), "");
        assert_eq!(auto_format_transcript("   "), "");
    }

    #[test]
    fn default_config_matches_capture_settings() {
        let config = RecognitionConfig::default();
        assert!(config.interim_results);
        assert!(!config.continuous);
        assert_eq!(config.max_alternatives, 1);
    }
}
