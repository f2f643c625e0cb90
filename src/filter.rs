use std::sync::LazyLock;

use regex::Regex;

use crate::{lexicon::Lexicon, TextDetection};

static IMAGE_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(?:jpe?g|png|gif|bmp|webp|tiff?|heic|svg)\b").expect("valid regex")
});
static LONG_ALNUM_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9]{20,}").expect("valid regex"));
static SHORT_ABBREVIATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{1,3}$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JunkReason {
    TooShort,
    NoLetters,
    Filename,
    RandomString,
    KeyboardToken,
    Abbreviation,
}

/// Why `text` cannot be part of a title, or `None` if it may be.
pub fn junk_reason(text: &str, lexicon: &dyn Lexicon) -> Option<JunkReason> {
    let text = text.trim();
    let len = text.chars().count();
    if len < 2 {
        return Some(JunkReason::TooShort);
    }
    if !text.chars().any(char::is_alphabetic) {
        return Some(JunkReason::NoLetters);
    }
    if IMAGE_FILENAME.is_match(text) {
        return Some(JunkReason::Filename);
    }
    if LONG_ALNUM_RUN.is_match(text) {
        return Some(JunkReason::RandomString);
    }
    if lexicon.is_keyboard_token(text) {
        return Some(JunkReason::KeyboardToken);
    }
    if SHORT_ABBREVIATION.is_match(text) && !lexicon.is_common_short_word(text) {
        return Some(JunkReason::Abbreviation);
    }
    if len == 2 && !lexicon.is_common_short_word(text) {
        return Some(JunkReason::TooShort);
    }
    None
}

pub(crate) fn filter_junk<'a>(
    detections: &'a [TextDetection],
    lexicon: &dyn Lexicon,
) -> Vec<&'a TextDetection> {
    detections
        .iter()
        .filter(|detection| match junk_reason(&detection.text, lexicon) {
            Some(reason) => {
                log::trace!("Filtered {:?}: {reason:?}", detection.text);
                false
            }
            None => true,
        })
        .collect()
}
