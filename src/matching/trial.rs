use super::{
    DistanceClassifier, LocationTier, MatchScore, Points, Scorable, ScoringContext, Terms,
    TrialWeights,
};
use crate::types::{ClinicalTrial, PatientProfile};

/// Score a clinical trial for a patient.
///
/// Credit is awarded for, in order:
/// - condition in the title, else in the description, else the condition's
///   first word in the title
/// - location tier (multi-center trials get their own tier)
/// - phase (`Phase III` > `Phase II` > `Phase I`)
/// - enrollment status (`Recruiting` > `Enrolling` > `Active`)
pub fn score_trial(
    trial: &ClinicalTrial,
    profile: &PatientProfile,
    weights: &TrialWeights,
) -> MatchScore {
    let mut points = Points::default();

    if let Some(terms) = Terms::new(&profile.condition) {
        let title = trial.title.to_lowercase();
        let description = trial
            .description
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        if terms.found_in(&title) {
            points += weights.title_match;
        } else if terms.found_in(&description) {
            points += weights.description_match;
        } else if terms.first_word_found_in(&title) {
            points += weights.title_first_word;
        }
    }

    points += weights.location.points(trial_tier(trial, profile));

    points += match trial.phase.as_str() {
        "Phase III" => weights.phase_iii,
        "Phase II" => weights.phase_ii,
        "Phase I" => weights.phase_i,
        _ => 0,
    };

    points += match trial.status.as_str() {
        "Recruiting" => weights.recruiting,
        "Enrolling" => weights.enrolling,
        "Active" => weights.active,
        _ => 0,
    };

    MatchScore::from(points)
}

pub fn trial_tier(trial: &ClinicalTrial, profile: &PatientProfile) -> LocationTier {
    DistanceClassifier::TRIAL.classify(&trial.location, &profile.location)
}

impl Scorable for ClinicalTrial {
    type Profile = PatientProfile;
    type Weights = TrialWeights;

    fn match_score(
        &self,
        profile: &PatientProfile,
        weights: &TrialWeights,
        _context: &ScoringContext,
    ) -> MatchScore {
        score_trial(self, profile, weights)
    }

    fn location_tier(&self, profile: &PatientProfile) -> Option<LocationTier> {
        Some(trial_tier(self, profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::{fixture, rstest};

    fn trial(title: &str, phase: &str, status: &str, location: &str) -> ClinicalTrial {
        ClinicalTrial {
            id: 1,
            title: title.to_string(),
            phase: phase.to_string(),
            status: status.to_string(),
            location: location.to_string(),
            description: None,
        }
    }

    #[fixture]
    fn toronto_patient() -> PatientProfile {
        PatientProfile {
            condition: "Brain Cancer".to_string(),
            location: "Toronto, Canada".to_string(),
            additional_conditions: vec![],
        }
    }

    #[rstest]
    fn test_local_recruiting_phase_three_is_perfect(toronto_patient: PatientProfile) {
        let trial = trial(
            "Brain Cancer Phase III Trial",
            "Phase III",
            "Recruiting",
            "Toronto, Canada",
        );
        // 40 + 30 + 15 + 15
        check!(score_trial(&trial, &toronto_patient, &TrialWeights::default()).value() == 100);
    }

    #[rstest]
    fn test_multi_center_bonus(toronto_patient: PatientProfile) {
        let trial = trial("Unrelated Study", "Phase II", "Enrolling", "Multi-center");
        // 28 + 12 + 10
        check!(score_trial(&trial, &toronto_patient, &TrialWeights::default()).value() == 50);
    }

    #[rstest]
    fn test_description_and_first_word_fallbacks(toronto_patient: PatientProfile) {
        let weights = TrialWeights::default();
        let mut by_description = trial("Neuro-oncology study", "", "", "Tokyo, Japan");
        by_description.description = Some("Adults with brain cancer after surgery".into());
        check!(score_trial(&by_description, &toronto_patient, &weights).value() == 30);

        let by_first_word = trial("Brain imaging after therapy", "", "", "Tokyo, Japan");
        check!(score_trial(&by_first_word, &toronto_patient, &weights).value() == 20);
    }

    #[rstest]
    #[case("Phase III", 15)]
    #[case("Phase II", 12)]
    #[case("Phase I", 8)]
    #[case("Phase IV", 0)]
    #[case("phase iii", 0)]
    fn test_phase_points(#[case] phase: &str, #[case] expected: u8) {
        let profile = PatientProfile::default();
        let trial = trial("x", phase, "", "Berlin, Germany");
        check!(score_trial(&trial, &profile, &TrialWeights::default()).value() == expected);
    }

    #[test]
    fn test_empty_condition_earns_no_text_credit() {
        let profile = PatientProfile {
            condition: String::new(),
            location: "Paris, France".to_string(),
            additional_conditions: vec![],
        };
        let trial = trial("Anything at all", "", "", "Tokyo, Japan");
        check!(score_trial(&trial, &profile, &TrialWeights::default()).value() == 0);
    }

    /// Test: Oversized weights from a config file clamp instead of overflowing.
    #[rstest]
    fn test_huge_config_weights_clamp(toronto_patient: PatientProfile) {
        let weights: TrialWeights = toml::from_str(
            r#"
title_match = 4000000000
recruiting = 400000000
phase_iii = 4294967295

[location]
same_city = 4294967295
"#,
        )
        .unwrap();
        let trial = trial(
            "Brain Cancer Phase III Trial",
            "Phase III",
            "Recruiting",
            "Toronto, Canada",
        );
        check!(score_trial(&trial, &toronto_patient, &weights).value() == 100);
    }

    #[rstest]
    fn test_scorable_reports_tier(toronto_patient: PatientProfile) {
        let trial = trial("t", "", "", "Vancouver, Canada");
        check!(trial.location_tier(&toronto_patient) == Some(LocationTier::SameCountry));
    }
}
