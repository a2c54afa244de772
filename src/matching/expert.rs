use super::{
    DistanceClassifier, ExpertWeights, LocationTier, MatchScore, Points, Scorable, ScoringContext,
    Terms,
};
use crate::types::{HealthExpert, PatientProfile};

/// Condition keyword paired with the specialty that treats it.
pub const RELATED_SPECIALTIES: &[(&str, &str)] = &[
    ("cancer", "oncology"),
    ("heart", "cardiology"),
    ("brain", "neurology"),
];

/// Score a health expert for a patient.
///
/// Specialty naming the condition beats a related field. Each research
/// interest that overlaps the condition adds a capped bonus, then location
/// tier and meeting availability are added.
pub fn score_expert(
    expert: &HealthExpert,
    profile: &PatientProfile,
    weights: &ExpertWeights,
) -> MatchScore {
    let mut points = Points::default();

    if let Some(terms) = Terms::new(&profile.condition) {
        let specialty = expert.specialty.to_lowercase();
        if terms.found_in(&specialty) {
            points += weights.specialty_match;
        } else if RELATED_SPECIALTIES
            .iter()
            .any(|(keyword, field)| terms.mentions(keyword) && specialty.contains(field))
        {
            points += weights.related_specialty;
        }

        let matching = expert
            .research_interests
            .iter()
            .map(|interest| interest.trim().to_lowercase())
            .filter(|interest| !interest.is_empty())
            .filter(|interest| terms.found_in(interest) || terms.mentions(interest))
            .count() as u32;
        points += matching.saturating_mul(weights.per_interest).min(weights.interest_cap);
    }

    points += weights.location.points(expert_tier(expert, profile));

    points += if expert.available_for_meetings {
        weights.available
    } else {
        weights.unavailable
    };

    MatchScore::from(points)
}

pub fn expert_tier(expert: &HealthExpert, profile: &PatientProfile) -> LocationTier {
    DistanceClassifier::SITE.classify(&expert.location, &profile.location)
}

impl Scorable for HealthExpert {
    type Profile = PatientProfile;
    type Weights = ExpertWeights;

    fn match_score(
        &self,
        profile: &PatientProfile,
        weights: &ExpertWeights,
        _context: &ScoringContext,
    ) -> MatchScore {
        score_expert(self, profile, weights)
    }

    fn location_tier(&self, profile: &PatientProfile) -> Option<LocationTier> {
        Some(expert_tier(self, profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn expert(specialty: &str, location: &str, available: bool, interests: &[&str]) -> HealthExpert {
        HealthExpert {
            id: 7,
            name: "Dr. Test".to_string(),
            specialty: specialty.to_string(),
            institution: "General Hospital".to_string(),
            location: location.to_string(),
            available_for_meetings: available,
            research_interests: interests.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    fn patient(condition: &str, location: &str) -> PatientProfile {
        PatientProfile {
            condition: condition.to_string(),
            location: location.to_string(),
            additional_conditions: vec![],
        }
    }

    #[test]
    fn test_local_specialist() {
        let expert = expert(
            "Brain Cancer Surgery",
            "Toronto, Canada",
            true,
            &["Brain Cancer", "Brain Cancer Immunotherapy", "Surgical outcomes"],
        );
        let score = score_expert(&expert, &patient("Brain Cancer", "Toronto, Canada"), &ExpertWeights::default());
        // 35 + min(2 * 10, 30) + 25 + 10
        check!(score.value() == 90);
    }

    #[rstest]
    #[case("Lung Cancer", "Medical Oncology", 30)]
    #[case("Heart Disease", "Interventional Cardiology", 30)]
    #[case("Brain Cancer", "Pediatric Neurology", 30)]
    #[case("Brain Injury", "Pediatric Neurology", 30)]
    #[case("Asthma", "Dermatology", 0)]
    fn test_related_specialty(#[case] condition: &str, #[case] specialty: &str, #[case] expected: u8) {
        let expert = expert(specialty, "Tokyo, Japan", false, &[]);
        let weights = ExpertWeights {
            unavailable: 0,
            ..ExpertWeights::default()
        };
        let score = score_expert(&expert, &patient(condition, "Paris, France"), &weights);
        check!(score.value() == expected);
    }

    #[test]
    fn test_huge_interest_weight_clamps() {
        let expert = expert(
            "Dermatology",
            "Tokyo, Japan",
            false,
            &["asthma", "severe asthma"],
        );
        let weights = ExpertWeights {
            per_interest: u32::MAX,
            interest_cap: u32::MAX,
            unavailable: u32::MAX,
            ..ExpertWeights::default()
        };
        check!(score_expert(&expert, &patient("Asthma", "Paris, France"), &weights).value() == 100);
    }

    #[test]
    fn test_interest_bonus_is_capped() {
        let expert = expert(
            "Dermatology",
            "Tokyo, Japan",
            false,
            &["asthma", "asthma in children", "severe asthma", "asthma biologics"],
        );
        let weights = ExpertWeights {
            unavailable: 0,
            ..ExpertWeights::default()
        };
        check!(score_expert(&expert, &patient("Asthma", "Paris, France"), &weights).value() == 30);
    }

    #[test]
    fn test_interest_contained_in_condition() {
        let expert = expert("Dermatology", "Tokyo, Japan", false, &["Glioma", ""]);
        let weights = ExpertWeights {
            unavailable: 0,
            ..ExpertWeights::default()
        };
        let score = score_expert(&expert, &patient("recurrent glioma", "Paris, France"), &weights);
        check!(score.value() == 10);
    }

    #[test]
    fn test_availability_floor() {
        let profile = patient("", "");
        let available = expert("x", "Tokyo, Japan", true, &["anything"]);
        let unavailable = expert("x", "Tokyo, Japan", false, &["anything"]);
        // Both "other" region; empty condition earns nothing from interests
        check!(score_expert(&available, &profile, &ExpertWeights::default()).value() == 20);
        check!(score_expert(&unavailable, &profile, &ExpertWeights::default()).value() == 15);
    }

    #[test]
    fn test_experts_never_multi_center() {
        let expert = expert("x", "Multi-center", true, &[]);
        check!(expert.location_tier(&patient("", "Toronto, Canada")) != Some(LocationTier::MultiCenter));
    }
}
