use serde::{Deserialize, Serialize};

use super::quality::{SpeedHint, ToneHint, VoiceAnalysis};

/// Synthesis parameters shared by every utterance of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeechParams {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Pause between segments, in milliseconds.
    pub pause_ms: u32,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
            volume: 0.9,
            pause_ms: 200,
        }
    }
}

/// What a recommendation asks the user to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Voice,
    Rate,
}

/// A suggested settings change derived from a voice analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub message: String,
}

/// Adjusts rate/pitch/volume for maximum clarity, optionally taking the
/// active voice's quality analysis into account.
#[derive(Debug, Default)]
pub struct SpeechParameterOptimizer;

impl SpeechParameterOptimizer {
    pub fn new() -> Self {
        Self
    }

    /// Nudge parameters into their clear-speech ranges.
    ///
    /// Very fast speech is slowed (and boosted slightly in volume), very
    /// slow speech sped up, extreme pitch pulled toward natural, and quiet
    /// volume raised to an audible floor. Low-quality, fast, or robotic
    /// voices get further voice-specific adjustments. The result is always
    /// within the engine's accepted parameter ranges.
    pub fn optimize_for_clarity(
        &self,
        params: SpeechParams,
        voice: Option<&VoiceAnalysis>,
    ) -> SpeechParams {
        let mut p = params;

        if p.rate > 1.5 {
            p.rate = p.rate.min(1.4);
            p.volume = (p.volume + 0.1).min(1.0);
        }
        if p.rate < 0.7 {
            p.rate = p.rate.max(0.8);
        }

        if p.pitch > 1.5 || p.pitch < 0.7 {
            p.pitch = p.pitch.clamp(0.8, 1.3);
        }

        if p.volume < 0.3 {
            p.volume = 0.5;
        }

        if let Some(analysis) = voice {
            p = adjust_for_voice(p, analysis);
        }

        validate(p)
    }

    /// Settings changes worth surfacing for the given voice.
    pub fn recommendations(&self, analysis: &VoiceAnalysis) -> Vec<Recommendation> {
        let mut out = Vec::new();
        if analysis.quality_score < 70 {
            out.push(Recommendation {
                kind: RecommendationKind::Voice,
                message: "Consider selecting a higher quality voice for better clarity"
                    .to_string(),
            });
        }
        if analysis.clarity < 60 {
            out.push(Recommendation {
                kind: RecommendationKind::Rate,
                message: "Try reducing speech speed for better clarity".to_string(),
            });
        }
        out
    }
}

fn adjust_for_voice(mut p: SpeechParams, analysis: &VoiceAnalysis) -> SpeechParams {
    // Lower quality voices need slower, louder speech.
    if analysis.quality_score < 60 {
        p.rate = p.rate.min(1.2);
        p.volume = (p.volume + 0.1).min(1.0);
    }

    if analysis.characteristics.speed == SpeedHint::Fast {
        p.rate = (p.rate - 0.1).max(0.9);
    }

    if analysis.characteristics.tone == ToneHint::Robotic {
        p.pitch = p.pitch.clamp(0.9, 1.1);
        p.rate = (p.rate - 0.1).max(0.9);
    }

    p
}

/// Clamp every parameter into the engine's accepted range.
fn validate(p: SpeechParams) -> SpeechParams {
    SpeechParams {
        rate: p.rate.clamp(0.5, 2.0),
        pitch: p.pitch.clamp(0.0, 2.0),
        volume: p.volume.clamp(0.0, 1.0),
        pause_ms: p.pause_ms.min(2000),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::catalog::Voice;
    use crate::voice::quality::VoiceQualityAnalyzer;

    fn analysis_for(name: &str, language: &str) -> VoiceAnalysis {
        VoiceQualityAnalyzer::new()
            .analyze(&Voice::new("id", name, language))
            .clone()
    }

    #[test]
    fn slows_very_fast_speech_and_boosts_volume() {
        let opt = SpeechParameterOptimizer::new();
        let p = opt.optimize_for_clarity(
            SpeechParams {
                rate: 1.9,
                volume: 0.8,
                ..Default::default()
            },
            None,
        );
        assert_eq!(p.rate, 1.4);
        assert!((p.volume - 0.9).abs() < 1e-6);
    }

    #[test]
    fn speeds_up_very_slow_speech() {
        let opt = SpeechParameterOptimizer::new();
        let p = opt.optimize_for_clarity(
            SpeechParams {
                rate: 0.5,
                ..Default::default()
            },
            None,
        );
        assert!((p.rate - 0.8).abs() < 1e-6);
    }

    #[test]
    fn pulls_extreme_pitch_to_natural_range() {
        let opt = SpeechParameterOptimizer::new();
        let p = opt.optimize_for_clarity(
            SpeechParams {
                pitch: 1.9,
                ..Default::default()
            },
            None,
        );
        assert!((p.pitch - 1.3).abs() < 1e-6);

        let p = opt.optimize_for_clarity(
            SpeechParams {
                pitch: 0.2,
                ..Default::default()
            },
            None,
        );
        assert!((p.pitch - 0.8).abs() < 1e-6);
    }

    #[test]
    fn raises_inaudible_volume() {
        let opt = SpeechParameterOptimizer::new();
        let p = opt.optimize_for_clarity(
            SpeechParams {
                volume: 0.1,
                ..Default::default()
            },
            None,
        );
        assert!((p.volume - 0.5).abs() < 1e-6);
    }

    #[test]
    fn low_quality_voice_caps_rate() {
        let opt = SpeechParameterOptimizer::new();
        let analysis = analysis_for("Compact Basic", "de-DE");
        assert!(analysis.quality_score < 60);
        let p = opt.optimize_for_clarity(
            SpeechParams {
                rate: 1.5,
                volume: 0.8,
                ..Default::default()
            },
            Some(&analysis),
        );
        assert!((p.rate - 1.2).abs() < 1e-6);
        assert!((p.volume - 0.9).abs() < 1e-6);
    }

    #[test]
    fn robotic_voice_narrows_pitch() {
        let opt = SpeechParameterOptimizer::new();
        let analysis = analysis_for("Synthetic Sam Neural Premium", "en-US");
        let p = opt.optimize_for_clarity(
            SpeechParams {
                pitch: 1.4,
                ..Default::default()
            },
            Some(&analysis),
        );
        assert!((p.pitch - 1.1).abs() < 1e-6);
        assert!((p.rate - 0.9).abs() < 1e-6);
    }

    #[test]
    fn validation_bounds_everything() {
        let opt = SpeechParameterOptimizer::new();
        let p = opt.optimize_for_clarity(
            SpeechParams {
                rate: 1.0,
                pitch: 1.0,
                volume: 0.9,
                pause_ms: 9999,
            },
            None,
        );
        assert_eq!(p.pause_ms, 2000);
    }

    #[test]
    fn recommendations_for_weak_voices() {
        let opt = SpeechParameterOptimizer::new();
        let analysis = analysis_for("Compact Basic", "de-DE");
        let recs = opt.recommendations(&analysis);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].kind, RecommendationKind::Voice);
        assert_eq!(recs[1].kind, RecommendationKind::Rate);

        let good = analysis_for("Premium Neural Joanna", "en-US");
        assert!(opt.recommendations(&good).is_empty());
    }
}
