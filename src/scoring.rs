use std::sync::LazyLock;

use float_ord::FloatOrd;
use regex::Regex;

use crate::{
    cluster::TextGroup,
    lexicon::{is_all_uppercase, is_keyboard_text, word_count, Lexicon},
    options::{BlockScoring, GroupModifiers},
    util::{BlockMetrics, ImageBounds, MeasuredBlock},
};

static TITLE_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9][\w'&.]*(?:[\s:\-]+[A-Z0-9][\w'&.]*)*$").expect("valid regex")
});

#[derive(Debug, Clone)]
pub(crate) struct ScoredBlock<'a> {
    pub block: MeasuredBlock<'a>,
    pub score: f32,
}

/// Geometric and textual plausibility of a single detection being part of the title.
pub fn block_score(
    metrics: &BlockMetrics,
    text: &str,
    neighbours: usize,
    weights: &BlockScoring,
    lexicon: &dyn Lexicon,
) -> f32 {
    let relative = metrics.relative;

    let mut vertical = (1.0 - relative.y) * weights.vertical_weight;
    if relative.y < 1.0 / 3.0 {
        vertical += weights.top_third_bonus;
    } else if relative.y < 0.5 {
        vertical += weights.top_half_bonus;
    }

    let centering = (1.0 - (0.5 - relative.x).abs()) * weights.centering_weight;

    let size_distance = (metrics.relative_area - weights.optimal_relative_area).abs();
    let size = (weights.size_weight - size_distance * weights.size_penalty).max(0.0);

    let aspect_penalty = ((metrics.aspect_ratio - weights.optimal_aspect_ratio).abs()
        * weights.aspect_penalty)
        .min(weights.max_aspect_penalty);
    let aspect = weights.aspect_weight - aspect_penalty;

    let proximity = neighbours as f32 * weights.proximity_bonus;

    vertical + centering + size + aspect + proximity + text_quality(text, weights, lexicon)
}

fn text_quality(text: &str, weights: &BlockScoring, lexicon: &dyn Lexicon) -> f32 {
    let mut quality = match word_count(text) {
        1..=4 => weights.short_word_count_bonus,
        5..=6 => weights.medium_word_count_bonus,
        _ => 0.0,
    };

    let len = text.chars().count();
    if len > 0 {
        let letters = text.chars().filter(|c| c.is_alphabetic()).count();
        quality += letters as f32 / len as f32 * weights.letter_ratio_weight;
    }

    if is_keyboard_text(text, lexicon) {
        quality -= weights.keyboard_penalty;
    }
    quality
}

pub(crate) fn score_blocks<'a>(
    blocks: Vec<MeasuredBlock<'a>>,
    weights: &BlockScoring,
    lexicon: &dyn Lexicon,
) -> Vec<ScoredBlock<'a>> {
    let centers = blocks
        .iter()
        .map(|block| block.metrics.center.y)
        .collect::<Vec<_>>();

    blocks
        .into_iter()
        .enumerate()
        .map(|(index, block)| {
            let y = block.metrics.center.y;
            let neighbours = centers
                .iter()
                .enumerate()
                .filter(|(other, other_y)| {
                    *other != index && (y - **other_y).abs() <= weights.proximity_band
                })
                .count();
            let score = block_score(
                &block.metrics,
                &block.detection.text,
                neighbours,
                weights,
                lexicon,
            );
            log::trace!("Block {:?} scored {score:.2}", block.detection.text);
            ScoredBlock { block, score }
        })
        .collect()
}

/// Final selection score of a group: its summed block scores scaled by layout and text modifiers.
pub fn group_score(
    group: &TextGroup<'_>,
    bounds: &ImageBounds,
    modifiers: &GroupModifiers,
    lexicon: &dyn Lexicon,
) -> f32 {
    let text = group.text();
    if is_keyboard_text(text, lexicon) {
        return group.score() * modifiers.keyboard;
    }

    let relative = bounds.relative(group.center());
    let words = text.split_whitespace().collect::<Vec<_>>();
    let mut multiplier = 1.0;

    if relative.y < modifiers.upper_band {
        multiplier *= modifiers.upper_band_multiplier;
    } else if relative.y < modifiers.middle_band {
        multiplier *= modifiers.middle_band_multiplier;
    }
    if (0.5 - relative.x).abs() < modifiers.centered_tolerance {
        multiplier *= modifiers.centered_multiplier;
    }
    if is_all_uppercase(text) {
        multiplier *= modifiers.uppercase_multiplier;
    }
    if words.len() > 1 && lexicon.is_leading_article(words[0]) {
        multiplier *= modifiers.leading_article_multiplier;
    }
    if TITLE_FORMAT.is_match(text) {
        multiplier *= modifiers.title_format_multiplier;
    }
    match words.len() {
        2 => multiplier *= modifiers.two_words_multiplier,
        3..=4 => multiplier *= modifiers.few_words_multiplier,
        _ => {}
    }

    #[cfg(feature = "debug")]
    log::info!(
        "Group {text:?}: raw {:.2} x {multiplier:.2} at ({:.2}, {:.2})",
        group.score(),
        relative.x,
        relative.y
    );

    group.score() * multiplier
}

/// Highest-scoring group with its score. On ties the group that comes first wins.
pub fn select_best<'g, 'a>(
    groups: &'g [TextGroup<'a>],
    bounds: &ImageBounds,
    modifiers: &GroupModifiers,
    lexicon: &dyn Lexicon,
) -> Option<(&'g TextGroup<'a>, f32)> {
    // `max_by_key` keeps the last maximum, hence the reversal.
    groups
        .iter()
        .map(|group| (group, group_score(group, bounds, modifiers, lexicon)))
        .rev()
        .max_by_key(|(_, score)| FloatOrd(*score))
}
