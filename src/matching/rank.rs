//! Ordering of scored results. All sorts are stable.

use super::{LocationTier, Scored};
use crate::types::ForumPost;
use rmcp::schemars;
use serde::Deserialize;
use std::cmp::Reverse;
use std::str::FromStr;

/// Closest first, then highest score. Items without a tier sort as distant.
pub fn rank_by_proximity<T>(items: &mut [Scored<T>]) {
    items.sort_by_key(|s| {
        (
            s.location_tier.unwrap_or(LocationTier::Distant),
            Reverse(s.match_score),
        )
    });
}

/// Highest score first.
pub fn rank_by_score<T>(items: &mut [Scored<T>]) {
    items.sort_by_key(|s| Reverse(s.match_score));
}

/// Forum listing order chosen by the reader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ForumSort {
    #[default]
    Relevance,
    Popular,
    Unanswered,
}

impl FromStr for ForumSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relevance" => Ok(Self::Relevance),
            "popular" => Ok(Self::Popular),
            "unanswered" => Ok(Self::Unanswered),
            other => Err(format!("unknown forum sort '{}'", other)),
        }
    }
}

pub fn rank_forum_posts(items: &mut [Scored<ForumPost>], sort: ForumSort) {
    match sort {
        ForumSort::Relevance => rank_by_score(items),
        ForumSort::Popular => items.sort_by_key(|s| Reverse(s.item.upvotes)),
        ForumSort::Unanswered => items.sort_by_key(|s| s.item.replies.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::MatchScore;
    use assert2::check;

    fn scored(id: u32, score: u32, tier: Option<LocationTier>) -> Scored<u32> {
        Scored {
            item: id,
            match_score: MatchScore::from_points(score),
            location_tier: tier,
        }
    }

    fn ids<T: Copy>(items: &[Scored<T>]) -> Vec<T> {
        items.iter().map(|s| s.item).collect()
    }

    #[test]
    fn test_proximity_beats_score() {
        let mut items = vec![
            scored(1, 95, Some(LocationTier::Distant)),
            scored(2, 40, Some(LocationTier::SameCity)),
            scored(3, 70, Some(LocationTier::MultiCenter)),
            scored(4, 80, Some(LocationTier::SameCity)),
            scored(5, 99, None),
        ];
        rank_by_proximity(&mut items);
        check!(ids(&items) == vec![4, 2, 3, 5, 1]);
    }

    #[test]
    fn test_rank_by_score_is_stable() {
        let mut items = vec![scored(1, 50, None), scored(2, 90, None), scored(3, 50, None)];
        rank_by_score(&mut items);
        check!(ids(&items) == vec![2, 1, 3]);
    }

    #[test]
    fn test_forum_sort_parsing() {
        check!("Popular".parse::<ForumSort>() == Ok(ForumSort::Popular));
        check!("newest".parse::<ForumSort>().is_err());
    }
}
