//! Scorer weight tables.
//!
//! Every table deserializes with `#[serde(default)]`, so a config file only
//! needs to name the weights it changes.

use super::LocationTier;
use serde::{Deserialize, Serialize};

/// All scorer weights, as read from the `[weights]` config table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub trial: TrialWeights,
    pub expert: ExpertWeights,
    pub publication: PublicationWeights,
    pub forum: ForumWeights,
    pub collaborator: CollaboratorWeights,
}

/// Points awarded per [`LocationTier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierBonus {
    pub same_city: u32,
    pub multi_center: u32,
    pub same_country: u32,
    pub same_region: u32,
    pub distant: u32,
}

impl TierBonus {
    pub const fn points(&self, tier: LocationTier) -> u32 {
        match tier {
            LocationTier::SameCity => self.same_city,
            LocationTier::MultiCenter => self.multi_center,
            LocationTier::SameCountry => self.same_country,
            LocationTier::SameRegion => self.same_region,
            LocationTier::Distant => self.distant,
        }
    }
}

impl Default for TierBonus {
    fn default() -> Self {
        Self {
            same_city: 30,
            multi_center: 28,
            same_country: 20,
            same_region: 10,
            distant: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialWeights {
    pub title_match: u32,
    pub description_match: u32,
    pub title_first_word: u32,
    pub location: TierBonus,
    pub phase_iii: u32,
    pub phase_ii: u32,
    pub phase_i: u32,
    pub recruiting: u32,
    pub enrolling: u32,
    pub active: u32,
}

impl Default for TrialWeights {
    fn default() -> Self {
        Self {
            title_match: 40,
            description_match: 30,
            title_first_word: 20,
            location: TierBonus::default(),
            phase_iii: 15,
            phase_ii: 12,
            phase_i: 8,
            recruiting: 15,
            enrolling: 10,
            active: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpertWeights {
    pub specialty_match: u32,
    pub related_specialty: u32,
    pub per_interest: u32,
    pub interest_cap: u32,
    pub location: TierBonus,
    pub available: u32,
    pub unavailable: u32,
}

impl Default for ExpertWeights {
    fn default() -> Self {
        Self {
            specialty_match: 35,
            related_specialty: 30,
            per_interest: 10,
            interest_cap: 30,
            // Experts are classified without the multi-center tier
            location: TierBonus {
                same_city: 25,
                multi_center: 25,
                same_country: 20,
                same_region: 10,
                distant: 0,
            },
            available: 10,
            unavailable: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicationWeights {
    pub title_match: u32,
    pub title_first_word: u32,
    pub abstract_match: u32,
    pub abstract_first_word: u32,
    pub high_impact_journal: u32,
    pub other_journal: u32,
    pub within_1_year: u32,
    pub within_3_years: u32,
    pub within_5_years: u32,
}

impl Default for PublicationWeights {
    fn default() -> Self {
        Self {
            title_match: 40,
            title_first_word: 25,
            abstract_match: 25,
            abstract_first_word: 15,
            high_impact_journal: 20,
            other_journal: 10,
            within_1_year: 15,
            within_3_years: 10,
            within_5_years: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForumWeights {
    pub title_match: u32,
    pub title_first_word: u32,
    pub content_match: u32,
    pub content_first_word: u32,
    pub category_match: u32,
    pub general_category: u32,
    pub has_replies: u32,
    pub popular: u32,
    /// Upvotes needed, exclusive, for the `popular` bonus.
    pub popular_threshold: u32,
}

impl Default for ForumWeights {
    fn default() -> Self {
        Self {
            title_match: 40,
            title_first_word: 25,
            content_match: 30,
            content_first_word: 20,
            category_match: 20,
            general_category: 10,
            has_replies: 10,
            popular: 5,
            popular_threshold: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollaboratorWeights {
    /// Awarded when no focus rule applies but specialties overlap.
    pub specialty_overlap: u32,
    pub per_shared_interest: u32,
    pub shared_interest_cap: u32,
    pub shared_city: u32,
    pub affiliated_site: u32,
    pub prestige_institution: u32,
    pub prolific: u32,
    pub prolific_threshold: u32,
    pub established: u32,
    pub established_threshold: u32,
}

impl Default for CollaboratorWeights {
    fn default() -> Self {
        Self {
            specialty_overlap: 40,
            per_shared_interest: 12,
            shared_interest_cap: 35,
            shared_city: 20,
            affiliated_site: 25,
            prestige_institution: 10,
            prolific: 5,
            prolific_threshold: 50,
            established: 3,
            established_threshold: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn test_tier_bonus_lookup() {
        let bonus = TierBonus::default();
        check!(bonus.points(LocationTier::SameCity) == 30);
        check!(bonus.points(LocationTier::MultiCenter) == 28);
        check!(bonus.points(LocationTier::Distant) == 0);
    }

    #[test]
    fn test_partial_table_keeps_defaults() {
        let weights: Weights = toml::from_str(
            r#"
[expert]
available = 0

[expert.location]
same_city = 40
"#,
        )
        .unwrap();
        check!(weights.expert.available == 0);
        check!(weights.expert.location.same_city == 40);
        check!(weights.expert.location.same_country == 20);
        check!(weights.expert.specialty_match == 35);
        check!(weights.trial == TrialWeights::default());
    }
}
