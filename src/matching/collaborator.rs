//! Researcher-to-researcher matching.

use super::{CollaboratorWeights, MatchScore, Points, Scorable, ScoringContext};
use crate::types::{Collaborator, ResearcherProfile};

/// A research focus that, when present in the researcher's own specialties,
/// replaces the generic specialty-overlap rule with graded tiers.
#[derive(Debug)]
pub struct FocusRule {
    /// Any of these in one of the researcher's specialties selects the rule.
    pub triggers: &'static [&'static str],
    /// Checked in order against the collaborator's specialty; first hit wins.
    pub tiers: &'static [(&'static [&'static str], u32)],
}

/// Evaluated in order. Only the first selected rule is consulted, even when
/// none of its tiers match the collaborator.
pub const FOCUS_RULES: &[FocusRule] = &[
    FocusRule {
        triggers: &["movement disorders"],
        tiers: &[
            (&["pediatric neurology", "neurology"], 90),
            (&["movement disorders"], 95),
        ],
    },
    FocusRule {
        triggers: &["neurology"],
        tiers: &[(&["neurology", "movement disorders"], 85)],
    },
    FocusRule {
        triggers: &["proteomics", "glioma", "cancer"],
        tiers: &[
            (&["proteomics", "cancer research", "pathology"], 95),
            (&["chemical biology", "oncology"], 85),
        ],
    },
    FocusRule {
        triggers: &["adhd", "attention"],
        tiers: &[
            (&["neuroimaging", "developmental", "child"], 95),
            (&["psychiatry", "psychology"], 85),
        ],
    },
    FocusRule {
        triggers: &["depression", "depressive"],
        tiers: &[
            (&["neuroimaging", "psychiatry", "psychology"], 95),
            (&["neurology", "cognitive"], 85),
        ],
    },
];

/// `(researcher interest keyword, collaborator interest keyword)` pairs that
/// count as shared interests even without textual overlap.
pub const RELATED_INTERESTS: &[(&str, &str)] = &[
    ("parkinson", "movement"),
    ("movement", "parkinson"),
    ("neurology", "pediatric"),
    ("proteomics", "glioma"),
    ("glioma", "proteomics"),
    ("recurrent", "glioma"),
    ("biomarker", "discovery"),
];

/// `(city, institution keyword)`: institutions affiliated with a city's
/// research network even when their name does not mention the city.
pub const AFFILIATED_SITES: &[(&str, &str)] = &[
    ("toronto", "hospital for sick children"),
    ("toronto", "children's hospital"),
];

pub const PRESTIGE_INSTITUTIONS: &[&str] = &[
    "stanford",
    "harvard",
    "mit",
    "mayo",
    "johns hopkins",
    "hospital for sick children",
    "children's hospital",
    "toronto western",
    "university health network",
];

/// Score a potential collaborator for a researcher.
pub fn score_collaborator(
    collaborator: &Collaborator,
    researcher: &ResearcherProfile,
    weights: &CollaboratorWeights,
) -> MatchScore {
    let specialties = lowercased(&researcher.specialties);
    let specialty = collaborator.specialty.to_lowercase();
    let institution = collaborator.institution.to_lowercase();

    let mut points = Points::default();
    points += specialty_points(&specialties, &specialty, weights);

    let theirs = lowercased(&collaborator.research_interests);
    let shared = lowercased(&researcher.research_interests)
        .iter()
        .filter(|mine| shares_interest(mine, &theirs))
        .count() as u32;
    points += shared.saturating_mul(weights.per_shared_interest).min(weights.shared_interest_cap);

    let city = researcher
        .location
        .as_deref()
        .and_then(|loc| loc.split(',').next())
        .map(|c| c.trim().to_lowercase())
        .unwrap_or_default();
    if !city.is_empty() {
        let place = format!(
            "{} {}",
            collaborator.location.as_deref().unwrap_or_default().to_lowercase(),
            institution
        );
        if place.contains(&city) {
            points += weights.shared_city;
        } else if AFFILIATED_SITES
            .iter()
            .any(|(site_city, keyword)| *site_city == city && institution.contains(keyword))
        {
            points += weights.affiliated_site;
        }
    }

    if PRESTIGE_INSTITUTIONS.iter().any(|p| institution.contains(p)) {
        points += weights.prestige_institution;
    }

    if collaborator.publications > weights.prolific_threshold {
        points += weights.prolific;
    } else if collaborator.publications > weights.established_threshold {
        points += weights.established;
    }

    MatchScore::from(points)
}

fn specialty_points(mine: &[String], theirs: &str, weights: &CollaboratorWeights) -> u32 {
    let selected = FOCUS_RULES.iter().find(|rule| {
        mine.iter()
            .any(|spec| rule.triggers.iter().any(|t| spec.contains(t)))
    });

    match selected {
        Some(rule) => rule
            .tiers
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| theirs.contains(k)))
            .map_or(0, |(_, points)| *points),
        None => {
            let overlaps = mine
                .iter()
                .filter(|spec| !spec.is_empty())
                .any(|spec| theirs.contains(spec.as_str()) || spec.contains(theirs));
            if overlaps && !theirs.is_empty() {
                weights.specialty_overlap
            } else {
                0
            }
        }
    }
}

fn shares_interest(mine: &str, theirs: &[String]) -> bool {
    if mine.is_empty() {
        return false;
    }
    theirs.iter().filter(|t| !t.is_empty()).any(|t| {
        t.contains(mine)
            || mine.contains(t.as_str())
            || RELATED_INTERESTS
                .iter()
                .any(|(a, b)| mine.contains(a) && t.contains(b))
    })
}

fn lowercased(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.trim().to_lowercase()).collect()
}

impl Scorable for Collaborator {
    type Profile = ResearcherProfile;
    type Weights = CollaboratorWeights;

    fn match_score(
        &self,
        profile: &ResearcherProfile,
        weights: &CollaboratorWeights,
        _context: &ScoringContext,
    ) -> MatchScore {
        score_collaborator(self, profile, weights)
    }
}
