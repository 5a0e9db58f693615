use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::catalog::{Gender, Voice};

/// Name keywords the characteristic detector classifies as female/male.
/// These lists are intentionally separate from the catalog's gender tables;
/// the two heuristics evolved independently and are kept that way.
const FEMALE_INDICATORS: &[&str] = &[
    "female", "woman", "lady", "girl", "samantha", "susan", "victoria", "karen", "zira",
];
const MALE_INDICATORS: &[&str] = &[
    "male", "man", "guy", "david", "mark", "daniel", "alex", "tom",
];

/// Perceived speaking speed hinted by the voice name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedHint {
    Fast,
    Slow,
    Normal,
}

/// Perceived tone hinted by the voice name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneHint {
    Robotic,
    Formal,
    Casual,
}

/// Derived traits of a voice, detected from its name and language tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceCharacteristics {
    pub gender: Gender,
    pub accent: String,
    pub speed: SpeedHint,
    pub tone: ToneHint,
}

/// Cached quality analysis for one voice.
///
/// Recomputation is pure: the same `Voice` always produces the same
/// analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceAnalysis {
    pub voice_id: String,
    pub name: String,
    pub language: String,
    /// Weighted overall score, 0-100.
    pub quality_score: u8,
    pub clarity: u8,
    pub naturalness: u8,
    pub pronunciation: u8,
    /// Set when the overall score reaches 75.
    pub is_recommended: bool,
    pub characteristics: VoiceCharacteristics,
}

/// Scores voices by name and language heuristics and ranks them.
#[derive(Debug, Default)]
pub struct VoiceQualityAnalyzer {
    cache: HashMap<String, VoiceAnalysis>,
}

impl VoiceQualityAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze a voice, reusing the cached result for a known id.
    pub fn analyze(&mut self, voice: &Voice) -> &VoiceAnalysis {
        self.cache
            .entry(voice.id.clone())
            .or_insert_with(|| compute_analysis(voice))
    }

    /// Analyze and rank voices by quality score, best first.
    pub fn rank_voices(&mut self, voices: &[Voice]) -> Vec<VoiceAnalysis> {
        let mut ranked: Vec<VoiceAnalysis> =
            voices.iter().map(|v| self.analyze(v).clone()).collect();
        ranked.sort_by(|a, b| b.quality_score.cmp(&a.quality_score));
        ranked
    }

    /// Best-scoring voice, preferring a gender match when one is requested.
    ///
    /// Falls back to the best overall voice when no candidate matches the
    /// requested gender.
    pub fn get_best_voice(
        &mut self,
        voices: &[Voice],
        gender: Option<Gender>,
    ) -> Option<VoiceAnalysis> {
        let ranked = self.rank_voices(voices);
        if let Some(wanted) = gender {
            if let Some(hit) = ranked.iter().find(|a| a.characteristics.gender == wanted) {
                return Some(hit.clone());
            }
        }
        ranked.into_iter().next()
    }
}

/// Compute the full analysis for one voice. Pure and deterministic.
fn compute_analysis(voice: &Voice) -> VoiceAnalysis {
    let (clarity, naturalness, pronunciation) = quality_metrics(voice);
    let quality_score = overall_score(clarity, naturalness, pronunciation);
    VoiceAnalysis {
        voice_id: voice.id.clone(),
        name: voice.name.clone(),
        language: voice.language.clone(),
        quality_score,
        clarity,
        naturalness,
        pronunciation,
        is_recommended: quality_score >= 75,
        characteristics: detect_characteristics(voice),
    }
}

/// Clarity/naturalness/pronunciation subscores, each seeded at 50 and
/// adjusted by fixed deltas for name keywords, then clamped to [0, 100].
fn quality_metrics(voice: &Voice) -> (u8, u8, u8) {
    let name = voice.name.to_lowercase();
    let mut clarity = 50i32;
    let mut naturalness = 50i32;
    let mut pronunciation = 50i32;

    if name.contains("premium") || name.contains("enhanced") || name.contains("neural") {
        clarity += 30;
        naturalness += 25;
        pronunciation += 20;
    }

    if name.contains("siri") || name.contains("cortana") || name.contains("google") {
        clarity += 25;
        naturalness += 20;
        pronunciation += 25;
    }

    if voice.language.starts_with("en") {
        clarity += 10;
        pronunciation += 15;
    }

    if name.contains("compact") || name.contains("basic") {
        clarity -= 20;
        naturalness -= 15;
    }

    (
        clarity.clamp(0, 100) as u8,
        naturalness.clamp(0, 100) as u8,
        pronunciation.clamp(0, 100) as u8,
    )
}

/// Weighted average with emphasis on clarity.
fn overall_score(clarity: u8, naturalness: u8, pronunciation: u8) -> u8 {
    let weighted =
        f64::from(clarity) * 0.4 + f64::from(naturalness) * 0.35 + f64::from(pronunciation) * 0.25;
    weighted.round() as u8
}

fn detect_characteristics(voice: &Voice) -> VoiceCharacteristics {
    let name = voice.name.to_lowercase();
    VoiceCharacteristics {
        gender: detect_gender(&name),
        accent: detect_accent(&voice.language, &name),
        speed: detect_speed(&name),
        tone: detect_tone(&name),
    }
}

fn detect_gender(name: &str) -> Gender {
    // Female indicators first: "woman" would otherwise hit "man".
    if FEMALE_INDICATORS.iter().any(|p| name.contains(p)) {
        Gender::Female
    } else if MALE_INDICATORS.iter().any(|p| name.contains(p)) {
        Gender::Male
    } else {
        Gender::Neutral
    }
}

fn detect_accent(language: &str, name: &str) -> String {
    if language.is_empty() {
        return "unknown".to_string();
    }
    let mut parts = language.split('-');
    let code = parts.next().unwrap_or_default();
    let region = parts.next();

    if code == "en" {
        if region == Some("US") || name.contains("us") {
            return "American".to_string();
        }
        if region == Some("GB") || name.contains("uk") || name.contains("british") {
            return "British".to_string();
        }
        if region == Some("AU") || name.contains("australian") {
            return "Australian".to_string();
        }
        return "English".to_string();
    }
    code.to_string()
}

fn detect_speed(name: &str) -> SpeedHint {
    if name.contains("fast") || name.contains("quick") {
        SpeedHint::Fast
    } else if name.contains("slow") || name.contains("careful") {
        SpeedHint::Slow
    } else {
        SpeedHint::Normal
    }
}

fn detect_tone(name: &str) -> ToneHint {
    if name.contains("robotic") || name.contains("synthetic") {
        ToneHint::Robotic
    } else if name.contains("formal") || name.contains("business") {
        ToneHint::Formal
    } else {
        ToneHint::Casual
    }
}
