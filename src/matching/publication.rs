use super::{MatchScore, Points, PublicationWeights, Scorable, ScoringContext, Terms};
use crate::types::{PatientProfile, Publication};

pub const HIGH_IMPACT_JOURNALS: &[&str] = &["nature", "science", "nejm", "lancet", "jama", "cell"];

/// Score a publication for a patient.
///
/// Title and abstract relevance each fall back to the condition's first word.
/// Journal impact and recency are measured against `context.current_year`.
pub fn score_publication(
    publication: &Publication,
    profile: &PatientProfile,
    weights: &PublicationWeights,
    context: &ScoringContext,
) -> MatchScore {
    let mut points = Points::default();

    if let Some(terms) = Terms::new(&profile.condition) {
        let title = publication.title.to_lowercase();
        if terms.found_in(&title) {
            points += weights.title_match;
        } else if terms.first_word_found_in(&title) {
            points += weights.title_first_word;
        }

        let abstract_text = publication
            .abstract_text
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        if terms.found_in(&abstract_text) {
            points += weights.abstract_match;
        } else if terms.first_word_found_in(&abstract_text) {
            points += weights.abstract_first_word;
        }
    }

    let journal = publication.journal.to_lowercase();
    if HIGH_IMPACT_JOURNALS.iter().any(|j| journal.contains(j)) {
        points += weights.high_impact_journal;
    } else if journal.contains("journal") {
        points += weights.other_journal;
    }

    if let Some(year) = leading_year(&publication.date) {
        points += match context.current_year - year {
            ..=1 => weights.within_1_year,
            2..=3 => weights.within_3_years,
            4..=5 => weights.within_5_years,
            _ => 0,
        };
    }

    MatchScore::from(points)
}

/// Year from the leading digits of a date such as `2024-05-01` or `2023`.
fn leading_year(date: &str) -> Option<i32> {
    let trimmed = date.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

impl Scorable for Publication {
    type Profile = PatientProfile;
    type Weights = PublicationWeights;

    fn match_score(
        &self,
        profile: &PatientProfile,
        weights: &PublicationWeights,
        context: &ScoringContext,
    ) -> MatchScore {
        score_publication(self, profile, weights, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    const CONTEXT: ScoringContext = ScoringContext::new(2025);

    fn publication(title: &str, journal: &str, date: &str, abstract_text: Option<&str>) -> Publication {
        Publication {
            id: 1,
            title: title.to_string(),
            journal: journal.to_string(),
            authors: vec![],
            date: date.to_string(),
            doi: None,
            pmid: None,
            abstract_text: abstract_text.map(str::to_string),
        }
    }

    fn patient(condition: &str) -> PatientProfile {
        PatientProfile {
            condition: condition.to_string(),
            location: String::new(),
            additional_conditions: vec![],
        }
    }

    #[test]
    fn test_recent_high_impact_match() {
        let publication = publication(
            "Immunotherapy outcomes in brain cancer",
            "Nature Medicine",
            "2024-03-15",
            Some("We followed 200 brain cancer patients."),
        );
        let score = score_publication(
            &publication,
            &patient("Brain Cancer"),
            &PublicationWeights::default(),
            &CONTEXT,
        );
        // 40 + 25 + 20 + 15
        check!(score.value() == 100);
    }

    #[test]
    fn test_first_word_fallbacks() {
        let publication = publication(
            "Brain imaging review",
            "Radiology Today",
            "not a date",
            Some("brain scans"),
        );
        let score = score_publication(
            &publication,
            &patient("Brain Cancer"),
            &PublicationWeights::default(),
            &CONTEXT,
        );
        check!(score.value() == 25 + 15);
    }

    #[rstest]
    #[case("2025", 15)]
    #[case("2024", 15)]
    #[case("2023", 10)]
    #[case("2022-01-01", 10)]
    #[case("2020", 5)]
    #[case("2019", 0)]
    #[case("2027", 15)]
    #[case("", 0)]
    fn test_recency(#[case] date: &str, #[case] expected: u8) {
        let publication = publication("x", "x", date, None);
        let score = score_publication(
            &publication,
            &patient(""),
            &PublicationWeights::default(),
            &CONTEXT,
        );
        check!(score.value() == expected);
    }

    #[rstest]
    #[case("The Lancet Oncology", 20)]
    #[case("JAMA Neurology", 20)]
    #[case("Journal of Neuro-Oncology", 10)]
    #[case("Brain Research Reports", 0)]
    fn test_journal_impact(#[case] journal: &str, #[case] expected: u8) {
        let publication = publication("x", journal, "", None);
        let score = score_publication(
            &publication,
            &patient(""),
            &PublicationWeights::default(),
            &CONTEXT,
        );
        check!(score.value() == expected);
    }

    #[rstest]
    #[case("2024-05-01", Some(2024))]
    #[case(" 1999", Some(1999))]
    #[case("May 2024", None)]
    fn test_leading_year(#[case] date: &str, #[case] expected: Option<i32>) {
        check!(leading_year(date) == expected);
    }
}
