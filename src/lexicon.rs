use std::sync::LazyLock;

use regex::Regex;

/// Vocabulary the filters and scorers consult.
pub trait Lexicon: Send + Sync {
    /// Short word that should survive the short-token and abbreviation filters.
    fn is_common_short_word(&self, word: &str) -> bool;

    /// Whole-text keyboard or UI label (`Enter`, `Ctrl`, `F5`, ...).
    ///
    /// [`StaticLexicon`] treats keys that are also ordinary words (`Home`, `Space`, `Up`, ...) as
    /// keys only when written like a key cap label, so an all-caps `HOME` is still a title.
    fn is_keyboard_token(&self, text: &str) -> bool;

    fn is_leading_article(&self, word: &str) -> bool {
        matches!(word.to_uppercase().as_str(), "THE" | "A" | "AN")
    }
}

const COMMON_SHORT_WORDS: &[&str] = &[
    "A", "AN", "AS", "AT", "BE", "BY", "DO", "GO", "HE", "IF", "IN", "IS", "IT", "ME", "MY", "NO",
    "OF", "OH", "ON", "OR", "SO", "TO", "UP", "US", "WE", "ALL", "AND", "ARE", "BIG", "BOY", "BUT",
    "DAY", "DOG", "FOR", "GET", "GUN", "HER", "HIM", "HIS", "HOW", "ICE", "KID", "MAN", "MEN", "NEW",
    "NOT", "NOW", "OLD", "ONE", "OUR", "OUT", "RED", "RUN", "SEA", "SHE", "SKY", "SUN", "THE", "TWO",
    "WAR", "WAY", "WHO", "WHY", "YOU",
];

const KEYBOARD_TOKENS: &[&str] = &[
    "ALT", "ALTGR", "BACKSPACE", "BREAK", "CAPS", "CAPS LOCK", "CAPSLOCK", "CMD", "COMMAND", "CTRL",
    "CONTROL", "DEL", "DELETE", "DOWN", "END", "ENTER", "ESC", "ESCAPE", "FN", "HOME", "INS",
    "INSERT", "LEFT", "META", "NUM LOCK", "NUMLOCK", "OPTION", "PAGE DOWN", "PAGE UP", "PAUSE",
    "PGDN", "PGUP", "PRINT SCREEN", "PRTSC", "RETURN", "RIGHT", "SCROLL LOCK", "SHIFT", "SPACE",
    "SUPER", "TAB", "UP", "WIN",
];

/// Keys that double as words a poster could carry as its title.
const WORD_KEYS: &[&str] = &[
    "BREAK", "END", "HOME", "PAUSE", "RETURN", "SPACE", "SUPER", "UP", "WIN",
];

static FUNCTION_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^F(?:[1-9]|1[0-2])$").expect("valid regex"));

static KEYBOARD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:ctrl|alt|shift|cmd|esc|backspace|pgup|pgdn|prtsc|capslock|f(?:[1-9]|1[0-2]))\b|\w\s*\+\s*\w",
    )
    .expect("valid regex")
});

/// Built-in English vocabulary.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLexicon;

impl Lexicon for StaticLexicon {
    fn is_common_short_word(&self, word: &str) -> bool {
        COMMON_SHORT_WORDS.contains(&word.to_uppercase().as_str())
    }

    fn is_keyboard_token(&self, text: &str) -> bool {
        let text = text.trim();
        if FUNCTION_KEY.is_match(text) {
            return true;
        }
        let upper = text.to_uppercase();
        if !KEYBOARD_TOKENS.contains(&upper.as_str()) {
            return false;
        }
        !WORD_KEYS.contains(&upper.as_str()) || is_key_label(text)
    }
}

/// Keyboard or UI residue anywhere in `text`, including fragments the exact-match filter missed.
pub fn looks_like_keyboard(text: &str) -> bool {
    KEYBOARD_PATTERN.is_match(text)
}

/// Either a whole-text key label or keyboard residue inside the text.
pub(crate) fn is_keyboard_text(text: &str, lexicon: &dyn Lexicon) -> bool {
    looks_like_keyboard(text) || lexicon.is_keyboard_token(text)
}

/// Capitalised the way key caps are printed: `Home`, not `HOME` or `home`.
fn is_key_label(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(|c| c.is_uppercase()) && chars.all(|c| c.is_lowercase())
}

pub(crate) fn is_all_uppercase(text: &str) -> bool {
    let mut letters = text.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(|c| c.is_uppercase())
}

pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
