use std::fmt;

use serde::{Deserialize, Serialize};

/// A synthesis voice exposed by the host platform.
///
/// Immutable: the catalog never mutates voices, only derives analyses from
/// `name`, `id`, and `language`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Opaque identifier (URI or name) used to select the voice.
    pub id: String,
    /// Display name; the input to every classification heuristic.
    pub name: String,
    /// BCP-47 language tag, possibly empty.
    #[serde(default)]
    pub language: String,
    /// Whether the platform marks this as its default voice.
    #[serde(default)]
    pub is_default: bool,
}

impl Voice {
    pub fn new(id: impl Into<String>, name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            language: language.into(),
            is_default: false,
        }
    }

    /// The lowercased string gender classification matches against.
    fn classification_key(&self) -> String {
        format!("{} {}", self.name, self.id).to_lowercase()
    }

    /// Two-letter primary language subtag, lowercased.
    pub fn primary_subtag(&self) -> String {
        self.language.chars().take(2).collect::<String>().to_lowercase()
    }
}

/// Gender classification derived from a voice's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Neutral,
}

/// User-facing gender preference for voice selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderPreference {
    #[default]
    Any,
    Female,
    Male,
}

impl GenderPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenderPreference::Any => "any",
            GenderPreference::Female => "female",
            GenderPreference::Male => "male",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "female" => GenderPreference::Female,
            "male" => GenderPreference::Male,
            _ => GenderPreference::Any,
        }
    }
}

impl fmt::Display for GenderPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Injectable keyword tables for gender classification.
///
/// Classification is a case-insensitive substring match of the voice's
/// display name and identifier against these lists; a voice matching
/// neither is neutral.
#[derive(Debug, Clone)]
pub struct GenderKeywords {
    pub female: Vec<&'static str>,
    pub male: Vec<&'static str>,
}

impl Default for GenderKeywords {
    fn default() -> Self {
        Self {
            female: vec![
                "female", "samantha", "salli", "amy", "emma", "ivy", "joanna", "alloy",
                "victoria", "luna", "olivia", "sophie", "suzanne", "angelica", "penelope",
                "rosa", "linda", "alice",
            ],
            male: vec![
                "male", "alex", "mark", "john", "matthew", "david", "daniel", "max", "ben",
                "ryan", "michael", "paul",
            ],
        }
    }
}

/// Whether the voice's name classifies as female under the given keywords.
pub fn is_female_voice(voice: &Voice, keywords: &GenderKeywords) -> bool {
    let key = voice.classification_key();
    keywords.female.iter().any(|p| key.contains(p))
}

/// Whether the voice's name classifies as male under the given keywords.
pub fn is_male_voice(voice: &Voice, keywords: &GenderKeywords) -> bool {
    let key = voice.classification_key();
    keywords.male.iter().any(|p| key.contains(p))
}

/// Quality keywords for [`VoiceCatalog::suggest_best_voice`], in priority
/// order. The first keyword with any match wins; matching is
/// case-sensitive on the voice name and identifier.
const QUALITY_PATTERNS: &[&str] = &[
    "Neural",
    "WaveNet",
    "Wavenet",
    "Google",
    "Microsoft",
    "Azure",
    "Alloy",
    "Deep",
    "Samantha",
    "Alex",
];

/// The set of voices currently exposed by the host platform.
///
/// Voices load asynchronously: the catalog may be empty at first query and
/// is replaced wholesale on every platform "voices changed" signal.
#[derive(Debug, Clone)]
pub struct VoiceCatalog {
    voices: Vec<Voice>,
    keywords: GenderKeywords,
    /// Host UI language (primary subtag), the last-resort suggestion filter.
    ui_language: String,
}

impl VoiceCatalog {
    pub fn new(ui_language: impl Into<String>) -> Self {
        Self {
            voices: Vec::new(),
            keywords: GenderKeywords::default(),
            ui_language: ui_language.into().to_lowercase(),
        }
    }

    pub fn with_keywords(mut self, keywords: GenderKeywords) -> Self {
        self.keywords = keywords;
        self
    }

    /// Replace the voice list, e.g. on the platform's voices-changed signal.
    /// Voices are kept sorted by display name.
    pub fn set_voices(&mut self, mut voices: Vec<Voice>) {
        voices.sort_by(|a, b| a.name.cmp(&b.name));
        log::info!("voice catalog refreshed: {} voices", voices.len());
        self.voices = voices;
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn keywords(&self) -> &GenderKeywords {
        &self.keywords
    }

    /// Classify a voice's gender from its name and identifier.
    pub fn classify(&self, voice: &Voice) -> Gender {
        if is_female_voice(voice, &self.keywords) {
            Gender::Female
        } else if is_male_voice(voice, &self.keywords) {
            Gender::Male
        } else {
            Gender::Neutral
        }
    }

    /// Whether a voice satisfies a non-any gender preference.
    pub fn matches_preference(&self, voice: &Voice, pref: GenderPreference) -> bool {
        match pref {
            GenderPreference::Any => true,
            GenderPreference::Female => is_female_voice(voice, &self.keywords),
            GenderPreference::Male => is_male_voice(voice, &self.keywords),
        }
    }

    /// Filter voices by gender preference.
    ///
    /// Non-strict matching also admits voices of unclassified gender whose
    /// name contains the generic token "voice". When non-strict filtering
    /// leaves nothing, the full unfiltered list is returned instead; strict
    /// filtering may return an empty list.
    pub fn filter_by_gender(&self, pref: GenderPreference, strict: bool) -> Vec<&Voice> {
        if pref == GenderPreference::Any {
            return self.voices.iter().collect();
        }

        let filtered: Vec<&Voice> = self
            .voices
            .iter()
            .filter(|v| {
                let female = is_female_voice(v, &self.keywords);
                let male = is_male_voice(v, &self.keywords);
                let generic = v.name.to_lowercase().contains("voice");
                match (pref, strict) {
                    (GenderPreference::Female, true) => female,
                    (GenderPreference::Male, true) => male,
                    (GenderPreference::Female, false) => female || (!male && generic),
                    (GenderPreference::Male, false) => male || (!female && generic),
                    (GenderPreference::Any, _) => true,
                }
            })
            .collect();

        if filtered.is_empty() && !strict {
            return self.voices.iter().collect();
        }
        filtered
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Voice> {
        self.voices.iter().find(|v| v.id == id)
    }

    /// First voice whose language tag starts with the given two-letter
    /// prefix (case-insensitive).
    pub fn find_by_language_prefix(&self, prefix: &str) -> Option<&Voice> {
        let prefix = prefix.to_lowercase();
        self.voices
            .iter()
            .find(|v| v.language.to_lowercase().starts_with(&prefix))
    }

    /// Suggest a high-quality voice honoring the gender preference.
    ///
    /// The candidate pool is gender-filtered; with `strict` an empty pool
    /// yields `None`, otherwise it widens back to the full catalog. Within
    /// the pool, the first match of the ordered quality keyword list wins.
    /// Failing that, the first catalog voice matching the host UI language
    /// is suggested, then the first voice of the pool.
    pub fn suggest_best_voice(&self, pref: GenderPreference, strict: bool) -> Option<&Voice> {
        if self.voices.is_empty() {
            return None;
        }

        let mut pool: Vec<&Voice> = match pref {
            GenderPreference::Any => self.voices.iter().collect(),
            GenderPreference::Female => self
                .voices
                .iter()
                .filter(|v| is_female_voice(v, &self.keywords))
                .collect(),
            GenderPreference::Male => self
                .voices
                .iter()
                .filter(|v| is_male_voice(v, &self.keywords))
                .collect(),
        };
        if pool.is_empty() {
            if strict {
                return None;
            }
            pool = self.voices.iter().collect();
        }

        for pattern in QUALITY_PATTERNS {
            if let Some(v) = pool
                .iter()
                .find(|v| v.name.contains(pattern) || v.id.contains(pattern))
            {
                return Some(v);
            }
        }

        self.voices
            .iter()
            .find(|v| v.primary_subtag() == self.ui_language)
            .or_else(|| pool.first().copied())
    }
}
