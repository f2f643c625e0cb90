use std::sync::LazyLock;

use float_ord::FloatOrd;
use geo::{Coord, Rect};
use regex::Regex;

use crate::{
    lexicon::{is_all_uppercase, is_keyboard_text, Lexicon},
    options::Grouping,
    scoring::ScoredBlock,
    util::{quad_rect, union},
    TextDetection,
};

static COLON_SPACING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*:\s*").expect("valid regex"));

/// Detections merged into one candidate line or block, in merge order.
#[derive(Debug, Clone)]
pub struct TextGroup<'a> {
    members: Vec<&'a TextDetection>,
    text: String,
    score: f32,
    rect: Rect<f32>,
}

impl<'a> TextGroup<'a> {
    /// Single-member group. `None` if the detection has no usable quad.
    pub fn new(detection: &'a TextDetection, score: f32) -> Option<Self> {
        let rect = quad_rect(&detection.quad)?;
        Some(Self {
            members: vec![detection],
            text: detection.text.trim().to_string(),
            score,
            rect,
        })
    }

    fn from_block(scored: &ScoredBlock<'a>) -> Self {
        Self {
            members: vec![scored.block.detection],
            text: scored.block.detection.text.trim().to_string(),
            score: scored.score,
            rect: scored.block.metrics.rect,
        }
    }

    fn push(&mut self, scored: &ScoredBlock<'a>) {
        self.members.push(scored.block.detection);
        self.text.push(' ');
        self.text.push_str(scored.block.detection.text.trim());
        self.score += scored.score;
        self.rect = union(self.rect, scored.block.metrics.rect);
    }

    fn absorb(&mut self, other: TextGroup<'a>) {
        let joined = format!("{} {}", self.text, other.text);
        self.text = COLON_SPACING.replace_all(&joined, ": ").trim().to_string();
        self.members.extend(other.members);
        self.score += other.score;
        self.rect = union(self.rect, other.rect);
    }

    pub fn members(&self) -> &[&'a TextDetection] {
        &self.members
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Sum of member scores.
    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn rect(&self) -> Rect<f32> {
        self.rect
    }

    pub fn center(&self) -> Coord<f32> {
        self.rect.center()
    }

    pub fn width(&self) -> f32 {
        self.rect.width()
    }

    pub fn height(&self) -> f32 {
        self.rect.height()
    }
}

/// Walks the blocks top to bottom, starting a new group whenever the gap to the previous block
/// exceeds `line_gap_factor` times the taller of the two.
pub(crate) fn group_lines<'a>(
    mut blocks: Vec<ScoredBlock<'a>>,
    grouping: &Grouping,
) -> Vec<TextGroup<'a>> {
    blocks.sort_by_key(|scored| FloatOrd(scored.block.metrics.center.y));

    let mut blocks = blocks.iter();
    let Some(first) = blocks.next() else {
        return Vec::new();
    };

    let mut groups = Vec::new();
    let mut current = TextGroup::from_block(first);
    let mut last = first;
    for scored in blocks {
        let gap = (scored.block.metrics.center.y - last.block.metrics.center.y).abs();
        let threshold =
            scored.block.metrics.height.max(last.block.metrics.height) * grouping.line_gap_factor;
        if gap > threshold {
            log::trace!(
                "Line break before {:?} (gap {gap:.1} > {threshold:.1})",
                scored.block.detection.text
            );
            groups.push(std::mem::replace(&mut current, TextGroup::from_block(scored)));
        } else {
            current.push(scored);
        }
        last = scored;
    }
    groups.push(current);

    log::debug!("Formed {} line groups", groups.len());
    groups
}

/// Merges compatible groups until a full scan finds nothing to merge. Returns the number of merges
/// performed, which is at most `groups.len() - 1`.
pub fn merge_groups(
    groups: &mut Vec<TextGroup<'_>>,
    grouping: &Grouping,
    lexicon: &dyn Lexicon,
) -> usize {
    let mut merges = 0;
    while let Some((earlier, later)) = find_mergeable(groups, grouping, lexicon) {
        let absorbed = groups.remove(later);
        log::debug!("Merging {:?} into {:?}", absorbed.text, groups[earlier].text);
        groups[earlier].absorb(absorbed);
        merges += 1;
    }
    merges
}

fn find_mergeable(
    groups: &[TextGroup<'_>],
    grouping: &Grouping,
    lexicon: &dyn Lexicon,
) -> Option<(usize, usize)> {
    (0..groups.len())
        .flat_map(|i| (i + 1..groups.len()).map(move |j| (i, j)))
        .find(|&(i, j)| can_merge(&groups[i], &groups[j], grouping, lexicon))
}

fn can_merge(
    earlier: &TextGroup<'_>,
    later: &TextGroup<'_>,
    grouping: &Grouping,
    lexicon: &dyn Lexicon,
) -> bool {
    let (a, b) = (earlier.center(), later.center());

    let vertical_limit = (earlier.height().max(later.height()) * grouping.merge_vertical_factor)
        .min(grouping.merge_vertical_cap);
    if (b.y - a.y).abs() >= vertical_limit {
        return false;
    }

    let horizontal_limit = earlier.width().max(later.width()) * grouping.merge_horizontal_factor;
    if (b.x - a.x).abs() >= horizontal_limit {
        return false;
    }

    texts_compatible(earlier.text(), later.text(), lexicon)
}

/// Uppercase pairs, a line ending in a colon, or a lone leading article before an uppercase line.
fn texts_compatible(earlier: &str, later: &str, lexicon: &dyn Lexicon) -> bool {
    let plain_upper = |text: &str| is_all_uppercase(text) && !is_keyboard_text(text, lexicon);

    let later_upper = plain_upper(later);
    (plain_upper(earlier) && later_upper)
        || earlier.trim_end().ends_with(':')
        || (lexicon.is_leading_article(earlier.trim()) && later_upper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticLexicon;

    fn group<'a>(detection: &'a TextDetection) -> TextGroup<'a> {
        TextGroup::new(detection, 10.0).unwrap()
    }

    #[test]
    fn article_merges_with_uppercase_line() {
        let the = TextDetection::from_rect("The", 220.0, 45.0, 280.0, 75.0);
        let matrix = TextDetection::from_rect("MATRIX", 100.0, 80.0, 400.0, 120.0);
        let mut groups = vec![group(&the), group(&matrix)];

        let merges = merge_groups(&mut groups, &Grouping::default(), &StaticLexicon);

        assert_eq!(merges, 1);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].text(), "The MATRIX");
        assert_eq!(groups[0].score(), 20.0);
        assert_eq!(groups[0].members().len(), 2);
        assert_eq!(groups[0].rect().min(), Coord { x: 100.0, y: 45.0 });
        assert_eq!(groups[0].rect().max(), Coord { x: 400.0, y: 120.0 });
    }

    #[test]
    fn colon_joins_subtitle() {
        let title = TextDetection::from_rect("Dune :", 200.0, 40.0, 400.0, 80.0);
        let subtitle = TextDetection::from_rect("part two", 200.0, 85.0, 400.0, 115.0);
        let mut groups = vec![group(&title), group(&subtitle)];

        merge_groups(&mut groups, &Grouping::default(), &StaticLexicon);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].text(), "Dune: part two");
    }

    #[test]
    fn mixed_case_lines_stay_apart() {
        let title = TextDetection::from_rect("Arrival", 200.0, 40.0, 400.0, 80.0);
        let tagline = TextDetection::from_rect("why are they here", 200.0, 85.0, 400.0, 115.0);
        let mut groups = vec![group(&title), group(&tagline)];

        assert_eq!(merge_groups(&mut groups, &Grouping::default(), &StaticLexicon), 0);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn distant_groups_stay_apart() {
        let top = TextDetection::from_rect("ALIEN", 200.0, 40.0, 400.0, 80.0);
        let far = TextDetection::from_rect("ROMULUS", 200.0, 400.0, 400.0, 440.0);
        let side = TextDetection::from_rect("PREY", 900.0, 60.0, 1000.0, 100.0);
        let mut groups = vec![group(&top), group(&far), group(&side)];

        assert_eq!(merge_groups(&mut groups, &Grouping::default(), &StaticLexicon), 0);
    }

    #[test]
    fn merging_reaches_a_fixed_point() {
        let lines = ["THE", "LORD", "OF", "THE", "RINGS"]
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let y = 40.0 + i as f32 * 30.0;
                TextDetection::from_rect(*text, 200.0, y, 400.0, y + 28.0)
            })
            .collect::<Vec<_>>();
        let mut groups = lines.iter().map(group).collect::<Vec<_>>();
        let initial = groups.len();

        let merges = merge_groups(&mut groups, &Grouping::default(), &StaticLexicon);

        assert!(merges <= initial - 1);
        assert_eq!(groups.len(), initial - merges);
        assert!(groups.iter().any(|group| group.text().starts_with("THE LORD")));
    }

    #[test]
    fn line_grouping_splits_on_large_gaps() {
        // Centre gaps of 100 only stay under 1.5x the taller neighbour, never the 20px line.
        let detections = [
            TextDetection::from_rect("NIGHT", 100.0, 50.0, 500.0, 150.0),
            TextDetection::from_rect("of the", 200.0, 190.0, 400.0, 210.0),
            TextDetection::from_rect("LIVING", 100.0, 250.0, 500.0, 350.0),
            TextDetection::from_rect("in cinemas", 250.0, 800.0, 350.0, 820.0),
        ];
        let refs = detections.iter().collect::<Vec<_>>();
        let (_, measured) = crate::util::measure(&refs).unwrap();
        let scored = measured
            .into_iter()
            .map(|block| ScoredBlock { block, score: 1.0 })
            .collect();

        let groups = group_lines(scored, &Grouping::default());

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].text(), "NIGHT of the LIVING");
        assert_eq!(groups[0].score(), 3.0);
        assert_eq!(groups[1].text(), "in cinemas");
    }
}
