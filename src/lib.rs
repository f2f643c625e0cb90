use std::sync::Arc;

use tracing::instrument;

pub mod cleanup;
pub mod cluster;
mod error;
pub mod filter;
pub mod lexicon;
pub mod options;
pub mod ranker;
mod result;
pub mod scoring;
pub mod util;
pub mod wire;

pub use error::*;
pub use lexicon::{Lexicon, StaticLexicon};
pub use options::ResolverOptions;
pub use result::*;

pub struct TitleResolverBuilder {
    options: ResolverOptions,
    lexicon: Arc<dyn Lexicon>,
}

impl TitleResolverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn title_case(mut self, case: TitleCase) -> Self {
        self.options.title_case = case;
        self
    }

    pub fn scoring(mut self, scoring: options::BlockScoring) -> Self {
        self.options.scoring = scoring;
        self
    }

    pub fn grouping(mut self, grouping: options::Grouping) -> Self {
        self.options.grouping = grouping;
        self
    }

    pub fn modifiers(mut self, modifiers: options::GroupModifiers) -> Self {
        self.options.modifiers = modifiers;
        self
    }

    pub fn ranking(mut self, ranking: options::RankWeights) -> Self {
        self.options.ranking = ranking;
        self
    }

    pub fn lexicon(mut self, lexicon: impl Lexicon + 'static) -> Self {
        self.lexicon = Arc::new(lexicon);
        self
    }

    pub fn build(self) -> TitleResolver {
        TitleResolver {
            options: self.options,
            lexicon: self.lexicon,
        }
    }
}

impl Default for TitleResolverBuilder {
    fn default() -> Self {
        Self {
            options: ResolverOptions::default(),
            lexicon: Arc::new(StaticLexicon),
        }
    }
}

/// Picks the title out of a poster's OCR detections and resolves it against database records.
///
/// Holds configuration only, so one resolver can serve concurrent scans.
#[derive(Clone)]
pub struct TitleResolver {
    options: ResolverOptions,
    lexicon: Arc<dyn Lexicon>,
}

impl Default for TitleResolver {
    fn default() -> Self {
        TitleResolverBuilder::default().build()
    }
}

impl TitleResolver {
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// The most title-like text among `detections`, cleaned, or `None` if nothing qualifies.
    #[instrument(skip(self, detections), fields(detections = detections.len()), level = "debug")]
    pub fn resolve_title(&self, detections: &[TextDetection]) -> Option<String> {
        let lexicon = self.lexicon.as_ref();
        let ResolverOptions {
            scoring,
            grouping,
            modifiers,
            title_case,
            ..
        } = &self.options;

        let candidates = filter::filter_junk(detections, lexicon);
        if candidates.is_empty() {
            log::debug!("No detections survived filtering");
            return None;
        }

        let (bounds, blocks) = util::measure(&candidates)?;
        let blocks = scoring::score_blocks(blocks, scoring, lexicon);

        let mut groups = cluster::group_lines(blocks, grouping);
        let merges = cluster::merge_groups(&mut groups, grouping, lexicon);
        log::debug!("{merges} merges left {} groups", groups.len());

        let (best, score) = scoring::select_best(&groups, &bounds, modifiers, lexicon)?;
        log::debug!("Selected {:?} with score {score:.2}", best.text());
        if crate::lexicon::is_keyboard_text(best.text(), lexicon) {
            log::debug!("Best group is keyboard residue, no title");
            return None;
        }

        cleanup::clean_title(best.text(), *title_case)
    }

    pub fn rank<'a>(&self, query: &str, records: &'a [CandidateRecord]) -> Vec<MatchResult<'a>> {
        ranker::rank(query, records, &self.options.ranking)
    }

    #[instrument(skip(self, records), fields(records = records.len()), level = "debug")]
    pub fn best_match<'a>(
        &self,
        query: &str,
        records: &'a [CandidateRecord],
    ) -> Option<MatchResult<'a>> {
        ranker::best_match(query, records, &self.options.ranking)
    }

    /// Both stages: title from `detections`, then its best match among `records`.
    pub fn resolve<'a>(
        &self,
        detections: &[TextDetection],
        records: &'a [CandidateRecord],
    ) -> Option<MatchResult<'a>> {
        let title = self.resolve_title(detections)?;
        self.best_match(&title, records)
    }
}
