//! Relevance scoring of candidate items against a user profile.
//!
//! Each entity kind has a named, pure scorer (`score_trial`, `score_expert`,
//! ...) driven by a weight table from [`weights`]. Scores are summed as
//! saturating partial credits ([`Points`]) and clamped into a
//! [`MatchScore`], so they always land in `0..=100`. Trials and experts
//! additionally carry a [`LocationTier`] used as the primary sort key by
//! [`rank`].

pub mod collaborator;
pub mod distance;
pub mod expert;
pub mod forum;
pub mod publication;
pub mod rank;
pub mod trial;
pub mod weights;

pub use collaborator::score_collaborator;
pub use distance::{DistanceClassifier, LocationTier, Region};
pub use expert::score_expert;
pub use forum::score_forum_post;
pub use publication::score_publication;
pub use rank::{ForumSort, rank_by_proximity, rank_by_score, rank_forum_posts};
pub use trial::score_trial;
pub use weights::{
    CollaboratorWeights, ExpertWeights, ForumWeights, PublicationWeights, TierBonus, TrialWeights,
    Weights,
};

use chrono::Datelike;
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::AddAssign;

/// Relevance of one candidate to one profile, in `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchScore(u8);

impl MatchScore {
    pub const MAX: u8 = 100;

    /// Clamp accumulated partial credit into a score.
    pub fn from_points(points: u32) -> Self {
        Self(points.min(u32::from(Self::MAX)) as u8)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Display band used by the dashboards: 80+ strong, 60+ fair, else weak.
    pub const fn band(self) -> &'static str {
        match self.0 {
            80.. => "strong",
            60..=79 => "fair",
            _ => "weak",
        }
    }
}

impl fmt::Display for MatchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl Serialize for MatchScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

/// Partial credit collected by a scorer.
///
/// Additions saturate, so weight tables loaded from config can never
/// overflow a score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Points(u32);

impl Points {
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl AddAssign<u32> for Points {
    fn add_assign(&mut self, rhs: u32) {
        self.0 = self.0.saturating_add(rhs);
    }
}

impl From<Points> for MatchScore {
    fn from(points: Points) -> Self {
        Self::from_points(points.0)
    }
}

/// Inputs to scoring that are not part of the candidate or the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringContext {
    /// Year publication recency is measured against.
    pub current_year: i32,
}

impl ScoringContext {
    pub const fn new(current_year: i32) -> Self {
        Self { current_year }
    }

    /// Context anchored at today's date (UTC).
    pub fn now() -> Self {
        Self::new(chrono::Utc::now().year())
    }
}

/// A candidate with its computed relevance attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scored<T> {
    #[serde(flatten)]
    pub item: T,
    pub match_score: MatchScore,
    #[serde(rename = "location_distance", skip_serializing_if = "Option::is_none")]
    pub location_tier: Option<LocationTier>,
}

/// Something that can be scored against a profile.
///
/// The blanket [`score_all`] uses this to run any scorer over a batch.
pub trait Scorable: Sized {
    type Profile: ?Sized;
    type Weights;

    fn match_score(
        &self,
        profile: &Self::Profile,
        weights: &Self::Weights,
        context: &ScoringContext,
    ) -> MatchScore;

    /// Coarse proximity to the profile, for kinds that rank by location.
    fn location_tier(&self, _profile: &Self::Profile) -> Option<LocationTier> {
        None
    }
}

/// Score every item, keeping input order.
pub fn score_all<T: Scorable>(
    items: Vec<T>,
    profile: &T::Profile,
    weights: &T::Weights,
    context: &ScoringContext,
) -> Vec<Scored<T>> {
    items
        .into_iter()
        .map(|item| {
            let match_score = item.match_score(profile, weights, context);
            let location_tier = item.location_tier(profile);
            Scored {
                item,
                match_score,
                location_tier,
            }
        })
        .collect()
}

/// A lowercased search phrase and its first word, as the text scorers use them.
///
/// An empty phrase yields no terms, so it never earns match credit.
#[derive(Debug, Clone)]
pub(crate) struct Terms {
    full: String,
    first_word: String,
}

impl Terms {
    pub(crate) fn new(phrase: &str) -> Option<Self> {
        let full = phrase.trim().to_lowercase();
        let first_word = full.split_whitespace().next()?.to_string();
        Some(Self { full, first_word })
    }

    pub(crate) fn full(&self) -> &str {
        &self.full
    }

    pub(crate) fn found_in(&self, text: &str) -> bool {
        text.contains(&self.full)
    }

    pub(crate) fn first_word_found_in(&self, text: &str) -> bool {
        text.contains(&self.first_word)
    }

    pub(crate) fn mentions(&self, keyword: &str) -> bool {
        self.full.contains(keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0)]
    #[case(87, 87)]
    #[case(100, 100)]
    #[case(135, 100)]
    #[case(u32::MAX, 100)]
    fn test_score_clamped(#[case] points: u32, #[case] expected: u8) {
        check!(MatchScore::from_points(points).value() == expected);
    }

    #[rstest]
    #[case(95, "strong")]
    #[case(80, "strong")]
    #[case(60, "fair")]
    #[case(59, "weak")]
    fn test_score_band(#[case] points: u32, #[case] band: &str) {
        check!(MatchScore::from_points(points).band() == band);
    }

    #[test]
    fn test_points_saturate() {
        let mut points = Points::default();
        points += u32::MAX - 1;
        points += 10;
        check!(points.value() == u32::MAX);
        check!(MatchScore::from(points).value() == 100);
    }

    #[test]
    fn test_terms_empty_phrase() {
        check!(Terms::new("").is_none());
        check!(Terms::new("   ").is_none());
    }

    #[test]
    fn test_terms_first_word() {
        let terms = Terms::new("  Brain Cancer ").unwrap();
        check!(terms.full() == "brain cancer");
        check!(terms.found_in("a brain cancer trial"));
        check!(!terms.found_in("a brain tumour trial"));
        check!(terms.first_word_found_in("a brain tumour trial"));
    }

    #[test]
    fn test_score_serializes_as_number() {
        let json = serde_json::to_string(&MatchScore::from_points(72)).unwrap();
        check!(json == "72");
    }
}
