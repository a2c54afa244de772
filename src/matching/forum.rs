use super::{ForumWeights, MatchScore, Points, Scorable, ScoringContext, Terms};
use crate::types::{ForumPost, PatientProfile};

/// Condition keyword paired with the forum category it belongs in.
pub const CATEGORY_AFFINITIES: &[(&str, &str)] = &[("cancer", "cancer"), ("brain", "neurology")];

/// Score a forum post for a patient.
pub fn score_forum_post(
    post: &ForumPost,
    profile: &PatientProfile,
    weights: &ForumWeights,
) -> MatchScore {
    let mut points = Points::default();
    let terms = Terms::new(&profile.condition);

    if let Some(terms) = &terms {
        let title = post.title.to_lowercase();
        if terms.found_in(&title) {
            points += weights.title_match;
        } else if terms.first_word_found_in(&title) {
            points += weights.title_first_word;
        }

        let content = post.content.to_lowercase();
        if terms.found_in(&content) {
            points += weights.content_match;
        } else if terms.first_word_found_in(&content) {
            points += weights.content_first_word;
        }
    }

    let category = post.category.to_lowercase();
    let on_topic = terms.as_ref().is_some_and(|terms| {
        CATEGORY_AFFINITIES
            .iter()
            .any(|(keyword, cat)| terms.mentions(keyword) && category.contains(cat))
    });
    if on_topic {
        points += weights.category_match;
    } else if category.contains("general") {
        points += weights.general_category;
    }

    if !post.replies.is_empty() {
        points += weights.has_replies;
    } else if post.upvotes > weights.popular_threshold {
        points += weights.popular;
    }

    MatchScore::from(points)
}

impl Scorable for ForumPost {
    type Profile = PatientProfile;
    type Weights = ForumWeights;

    fn match_score(
        &self,
        profile: &PatientProfile,
        weights: &ForumWeights,
        _context: &ScoringContext,
    ) -> MatchScore {
        score_forum_post(self, profile, weights)
    }
}
