use std::sync::LazyLock;

use regex::Regex;

use crate::TitleCase;

static LEADING_BOILERPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(?:official|poster)\b[\s:\-]*)+").expect("valid regex")
});
static TRAILING_BOILERPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:[\s:\-]*\b(?:official|poster|movie|trailer|coming\s+soon|in\s+theaters))+$",
    )
    .expect("valid regex")
});

/// Strips OCR debris and poster boilerplate from the winning group's text.
pub fn clean_title(raw: &str, case: TitleCase) -> Option<String> {
    let kept = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | ':' | '\'' | '-'))
        .collect::<String>();
    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");

    let stripped = LEADING_BOILERPLATE.replace(&collapsed, "");
    let stripped = TRAILING_BOILERPLATE.replace(&stripped, "");
    let title = stripped.trim_matches(|c: char| c.is_whitespace() || c == ':' || c == '-');

    if title.is_empty() {
        log::debug!("Nothing left of {raw:?} after cleanup");
        return None;
    }
    Some(apply_case(title, case))
}

fn apply_case(title: &str, case: TitleCase) -> String {
    match case {
        TitleCase::Upper => title.to_uppercase(),
        TitleCase::Preserve => title.to_string(),
        TitleCase::Title => title
            .split(' ')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}
