//! Tunable constants for both pipeline stages. Missing TOML keys keep their defaults.

use serde::{Deserialize, Serialize};

use crate::{Result, TitleCase};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    pub scoring: BlockScoring,
    pub grouping: Grouping,
    pub modifiers: GroupModifiers,
    pub ranking: RankWeights,
    pub title_case: TitleCase,
}

impl ResolverOptions {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}

/// Weights of the per-detection score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockScoring {
    pub vertical_weight: f32,
    /// Added when the detection sits in the top third.
    pub top_third_bonus: f32,
    /// Added when the detection sits in the top half but not the top third.
    pub top_half_bonus: f32,
    pub centering_weight: f32,
    pub size_weight: f32,
    pub optimal_relative_area: f32,
    pub size_penalty: f32,
    pub aspect_weight: f32,
    pub optimal_aspect_ratio: f32,
    pub aspect_penalty: f32,
    pub max_aspect_penalty: f32,
    /// Vertical band in pixels within which two detections count as neighbours on one line.
    pub proximity_band: f32,
    pub proximity_bonus: f32,
    pub short_word_count_bonus: f32,
    pub medium_word_count_bonus: f32,
    pub letter_ratio_weight: f32,
    pub keyboard_penalty: f32,
}

impl Default for BlockScoring {
    fn default() -> Self {
        Self {
            vertical_weight: 30.0,
            top_third_bonus: 20.0,
            top_half_bonus: 10.0,
            centering_weight: 15.0,
            size_weight: 20.0,
            optimal_relative_area: 0.05,
            size_penalty: 200.0,
            aspect_weight: 10.0,
            optimal_aspect_ratio: 3.0,
            aspect_penalty: 2.0,
            max_aspect_penalty: 10.0,
            proximity_band: 10.0,
            proximity_bonus: 5.0,
            short_word_count_bonus: 15.0,
            medium_word_count_bonus: 8.0,
            letter_ratio_weight: 10.0,
            keyboard_penalty: 30.0,
        }
    }
}

/// Thresholds for line grouping and cross-group merging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Grouping {
    /// A new line starts when the centre gap exceeds this multiple of the taller height.
    pub line_gap_factor: f32,
    pub merge_vertical_factor: f32,
    pub merge_vertical_cap: f32,
    /// Horizontal centres must be within this fraction of the wider group.
    pub merge_horizontal_factor: f32,
}

impl Default for Grouping {
    fn default() -> Self {
        Self {
            line_gap_factor: 1.5,
            merge_vertical_factor: 2.0,
            merge_vertical_cap: 50.0,
            merge_horizontal_factor: 0.5,
        }
    }
}

/// Multipliers applied to a group's summed score before selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupModifiers {
    pub keyboard: f32,
    pub upper_band: f32,
    pub upper_band_multiplier: f32,
    pub middle_band: f32,
    pub middle_band_multiplier: f32,
    pub centered_tolerance: f32,
    pub centered_multiplier: f32,
    pub uppercase_multiplier: f32,
    pub leading_article_multiplier: f32,
    pub title_format_multiplier: f32,
    pub two_words_multiplier: f32,
    pub few_words_multiplier: f32,
}

impl Default for GroupModifiers {
    fn default() -> Self {
        Self {
            keyboard: 0.01,
            upper_band: 0.4,
            upper_band_multiplier: 4.0,
            middle_band: 0.6,
            middle_band_multiplier: 2.5,
            centered_tolerance: 0.15,
            centered_multiplier: 2.5,
            uppercase_multiplier: 1.8,
            leading_article_multiplier: 1.4,
            title_format_multiplier: 2.2,
            two_words_multiplier: 3.0,
            few_words_multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankWeights {
    pub text: f64,
    pub popularity: f64,
    pub votes: f64,
    /// Popularity at which the popularity signal saturates.
    pub popularity_norm: f64,
    pub vote_norm: f64,
}

impl Default for RankWeights {
    fn default() -> Self {
        Self {
            text: 0.7,
            popularity: 0.2,
            votes: 0.1,
            popularity_norm: 100.0,
            vote_norm: 1000.0,
        }
    }
}
