//! Voice cataloging, selection heuristics, and speech parameter tuning.
//!
//! The host platform loads voices asynchronously, so the catalog starts
//! empty and is refreshed whenever the platform signals a change. Two
//! independent "best voice" heuristics live here:
//!
//! - [`VoiceCatalog::suggest_best_voice`] walks a fixed, ordered list of
//!   quality keywords and returns the first hit;
//! - [`VoiceQualityAnalyzer`] scores clarity/naturalness/pronunciation and
//!   ranks by the weighted total.
//!
//! The two can disagree; they are kept separate on purpose and are never
//! reconciled.

pub mod catalog;
pub mod optimizer;
pub mod quality;

pub use catalog::{
    is_female_voice, is_male_voice, Gender, GenderKeywords, GenderPreference, Voice, VoiceCatalog,
};
pub use optimizer::{Recommendation, RecommendationKind, SpeechParameterOptimizer, SpeechParams};
pub use quality::{SpeedHint, ToneHint, VoiceAnalysis, VoiceCharacteristics, VoiceQualityAnalyzer};
