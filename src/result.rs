use geo::Coord;
use serde::{Deserialize, Serialize};

/// One text fragment reported by the OCR collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDetection {
    pub text: String,
    /// Corner points in image pixel coordinates. Anything short of four points is treated as
    /// malformed and skipped when metrics are computed.
    pub quad: Vec<Coord<f32>>,
}

impl TextDetection {
    pub fn new(text: impl Into<String>, quad: impl IntoIterator<Item = (f32, f32)>) -> Self {
        Self {
            text: text.into(),
            quad: quad.into_iter().map(|(x, y)| Coord { x, y }).collect(),
        }
    }

    /// Axis-aligned detection spanning `(x0, y0)` to `(x1, y1)`, corners in clockwise order.
    pub fn from_rect(text: impl Into<String>, x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(text, [(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default, alias = "original_name")]
    pub original_title: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
}

impl CandidateRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_original_title(mut self, original_title: impl Into<String>) -> Self {
        self.original_title = Some(original_title.into());
        self
    }

    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = Some(popularity);
        self
    }

    pub fn with_vote_count(mut self, vote_count: u64) -> Self {
        self.vote_count = Some(vote_count);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult<'a> {
    pub record: &'a CandidateRecord,
    pub score: f64,
}

/// How the cleaned title is presented to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleCase {
    #[default]
    Upper,
    Title,
    Preserve,
}
