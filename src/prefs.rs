//! Persisted user preferences.
//!
//! Preferences live in a flat, string-keyed collaborator store (the
//! browser's local storage in the original deployment). They are loaded
//! once at startup and written back on every control change and on page
//! unload. Malformed stored values fall back to that field's default
//! rather than failing the whole load.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::voice::GenderPreference;

mod keys {
    pub const VOICE: &str = "kc_tts_voice";
    pub const RATE: &str = "kc_tts_rate";
    pub const PITCH: &str = "kc_tts_pitch";
    pub const VOLUME: &str = "kc_tts_volume";
    pub const HIGHLIGHT: &str = "kc_tts_highlight";
    pub const SEGMENT_DELAY: &str = "kc_tts_segmentDelay";
    pub const GENDER: &str = "kc_tts_gender";
    pub const REQUIRE_GENDER: &str = "kc_tts_requireGender";
    pub const TRANSLATE_TO: &str = "kc_translate_to";
    pub const SPEECH_LANG: &str = "kc_speech_lang";
    pub const BG_ANIMATE: &str = "kc_tts_bgAnimate";
    pub const BG_SPEED: &str = "kc_tts_bgSpeed";
    pub const OCR_TEXT_TYPE: &str = "kc_ocr_text_type";
    pub const OCR_LANG: &str = "kc_ocr_lang";
}

/// Flat string key-value store the preferences persist into.
pub trait PrefStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store for tests and demos, with JSON import/export.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MemoryPrefStore {
    values: HashMap<String, String>,
}

impl MemoryPrefStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.values)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            values: serde_json::from_str(json)?,
        })
    }
}

impl PrefStore for MemoryPrefStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// All persisted reader settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    pub voice_id: Option<String>,
    pub gender_preference: GenderPreference,
    pub require_strict_gender: bool,
    pub highlight_enabled: bool,
    pub segment_delay_ms: u32,
    pub bg_animate: bool,
    pub bg_speed: f32,
    pub translate_to: String,
    pub speech_lang: String,
    pub ocr_language: String,
    pub ocr_text_type: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
            voice_id: None,
            gender_preference: GenderPreference::Any,
            require_strict_gender: false,
            highlight_enabled: true,
            segment_delay_ms: 0,
            bg_animate: false,
            bg_speed: 1.0,
            translate_to: "es".to_string(),
            speech_lang: "en".to_string(),
            ocr_language: "en".to_string(),
            ocr_text_type: "3".to_string(),
        }
    }
}

impl UserPreferences {
    /// Load preferences from the store, field by field.
    pub fn load(store: &dyn PrefStore) -> Self {
        let defaults = Self::default();
        Self {
            rate: parse_or(store.get(keys::RATE), defaults.rate),
            pitch: parse_or(store.get(keys::PITCH), defaults.pitch),
            volume: parse_or(store.get(keys::VOLUME), defaults.volume),
            voice_id: store.get(keys::VOICE).filter(|v| !v.is_empty()),
            gender_preference: store
                .get(keys::GENDER)
                .map(|v| GenderPreference::parse(&v))
                .unwrap_or(defaults.gender_preference),
            require_strict_gender: flag_or(
                store.get(keys::REQUIRE_GENDER),
                defaults.require_strict_gender,
            ),
            highlight_enabled: flag_or(store.get(keys::HIGHLIGHT), defaults.highlight_enabled),
            segment_delay_ms: parse_or(store.get(keys::SEGMENT_DELAY), defaults.segment_delay_ms),
            bg_animate: flag_or(store.get(keys::BG_ANIMATE), defaults.bg_animate),
            bg_speed: parse_or(store.get(keys::BG_SPEED), defaults.bg_speed),
            translate_to: store.get(keys::TRANSLATE_TO).unwrap_or(defaults.translate_to),
            speech_lang: store.get(keys::SPEECH_LANG).unwrap_or(defaults.speech_lang),
            ocr_language: store.get(keys::OCR_LANG).unwrap_or(defaults.ocr_language),
            ocr_text_type: store
                .get(keys::OCR_TEXT_TYPE)
                .unwrap_or(defaults.ocr_text_type),
        }
    }

    /// Write every preference back to the store.
    pub fn save(&self, store: &mut dyn PrefStore) {
        store.set(keys::RATE, &self.rate.to_string());
        store.set(keys::PITCH, &self.pitch.to_string());
        store.set(keys::VOLUME, &self.volume.to_string());
        match &self.voice_id {
            Some(id) => store.set(keys::VOICE, id),
            None => store.remove(keys::VOICE),
        }
        store.set(keys::GENDER, self.gender_preference.as_str());
        store.set(keys::REQUIRE_GENDER, flag(self.require_strict_gender));
        store.set(keys::HIGHLIGHT, flag(self.highlight_enabled));
        store.set(keys::SEGMENT_DELAY, &self.segment_delay_ms.to_string());
        store.set(keys::BG_ANIMATE, flag(self.bg_animate));
        store.set(keys::BG_SPEED, &self.bg_speed.to_string());
        store.set(keys::TRANSLATE_TO, &self.translate_to);
        store.set(keys::SPEECH_LANG, &self.speech_lang);
        store.set(keys::OCR_LANG, &self.ocr_language);
        store.set(keys::OCR_TEXT_TYPE, &self.ocr_text_type);
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

fn flag_or(stored: Option<String>, default: bool) -> bool {
    match stored.as_deref() {
        Some("1") => true,
        Some("0") => false,
        _ => default,
    }
}

fn parse_or<T: std::str::FromStr>(stored: Option<String>, default: T) -> T {
    stored.and_then(|v| v.parse().ok()).unwrap_or(default)
}
