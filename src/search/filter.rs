use super::keywords::contains_ci;
use crate::types::{ClinicalTrial, Collaborator, ForumPost, HealthExpert, Publication};
use rmcp::schemars;
use serde::Deserialize;

/// A predicate over one item type.
///
/// `condition` is the profile's condition (or focus) and lets a free-text
/// search match the combined phrase `"{condition} {search}"`, so "therapy"
/// finds "brain cancer therapy" for a brain cancer patient.
pub trait Filter<T> {
    fn matches(&self, item: &T, condition: &str) -> bool;
}

/// Keep only items the filter accepts, preserving order.
pub fn apply_filter<T, F: Filter<T>>(items: Vec<T>, filter: &F, condition: &str) -> Vec<T> {
    let before = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter(|item| filter.matches(item, condition))
        .collect();
    tracing::trace!("Filter kept {}/{} items", kept.len(), before);
    kept
}

/// Lowercased search plus its condition-combined form. `None` when the search is empty.
struct SearchText {
    plain: String,
    combined: String,
}

impl SearchText {
    fn new(search: Option<&str>, condition: &str) -> Option<Self> {
        let plain = search?.trim().to_lowercase();
        if plain.is_empty() {
            return None;
        }
        let combined = format!("{} {}", condition.trim().to_lowercase(), plain);
        Some(Self { plain, combined })
    }

    fn in_any<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        fields.into_iter().any(|field| {
            let field = field.to_lowercase();
            field.contains(&self.plain) || field.contains(&self.combined)
        })
    }
}

fn opt(field: Option<&String>) -> &str {
    field.map_or("", String::as_str)
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct TrialFilter {
    /// Free-text search over title, phase and description
    #[serde(default)]
    pub search: Option<String>,
    /// Phase substring, e.g. "Phase II"
    #[serde(default)]
    pub phase: Option<String>,
    /// Status substring, e.g. "recruiting"
    #[serde(default)]
    pub status: Option<String>,
    /// Trial site substring, e.g. "Canada". Sent as `site`, apart from the patient's own location
    #[serde(default, rename = "site")]
    pub location: Option<String>,
}

impl Filter<ClinicalTrial> for TrialFilter {
    fn matches(&self, trial: &ClinicalTrial, condition: &str) -> bool {
        let search_ok = SearchText::new(self.search.as_deref(), condition).is_none_or(|s| {
            s.in_any([
                trial.title.as_str(),
                trial.phase.as_str(),
                opt(trial.description.as_ref()),
            ])
        });
        search_ok
            && contains_ci(&trial.phase, opt(self.phase.as_ref()))
            && contains_ci(&trial.status, opt(self.status.as_ref()))
            && contains_ci(&trial.location, opt(self.location.as_ref()))
    }
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct ExpertFilter {
    /// Free-text search over name, specialty, institution and research interests
    #[serde(default)]
    pub search: Option<String>,
    /// Specialty substring
    #[serde(default)]
    pub specialty: Option<String>,
    /// Expert location substring (city or country). Sent as `site`
    #[serde(default, rename = "site")]
    pub location: Option<String>,
    /// Only experts accepting meeting requests
    #[serde(default)]
    pub available_only: bool,
}

impl Filter<HealthExpert> for ExpertFilter {
    fn matches(&self, expert: &HealthExpert, condition: &str) -> bool {
        let search_ok = SearchText::new(self.search.as_deref(), condition).is_none_or(|s| {
            s.in_any(
                [
                    expert.name.as_str(),
                    expert.specialty.as_str(),
                    expert.institution.as_str(),
                ]
                .into_iter()
                .chain(expert.research_interests.iter().map(String::as_str)),
            )
        });
        search_ok
            && contains_ci(&expert.specialty, opt(self.specialty.as_ref()))
            && contains_ci(&expert.location, opt(self.location.as_ref()))
            && (!self.available_only || expert.available_for_meetings)
    }
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct PublicationFilter {
    /// Free-text search over title, journal, authors and abstract
    #[serde(default)]
    pub search: Option<String>,
    /// Journal substring
    #[serde(default)]
    pub journal: Option<String>,
    /// Publication year, matched against the date text
    #[serde(default)]
    pub year: Option<String>,
}

impl Filter<Publication> for PublicationFilter {
    fn matches(&self, publication: &Publication, condition: &str) -> bool {
        let search_ok = SearchText::new(self.search.as_deref(), condition).is_none_or(|s| {
            s.in_any(
                [
                    publication.title.as_str(),
                    publication.journal.as_str(),
                    opt(publication.abstract_text.as_ref()),
                ]
                .into_iter()
                .chain(publication.authors.iter().map(String::as_str)),
            )
        });
        let year_ok = self
            .year
            .as_deref()
            .map(str::trim)
            .is_none_or(|year| publication.date.contains(year));
        search_ok && year_ok && contains_ci(&publication.journal, opt(self.journal.as_ref()))
    }
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct ForumFilter {
    /// Category name, or "all"
    #[serde(default)]
    pub category: Option<String>,
}

impl Filter<ForumPost> for ForumFilter {
    fn matches(&self, post: &ForumPost, _condition: &str) -> bool {
        match self.category.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(category) if category.eq_ignore_ascii_case("all") => true,
            Some(category) => post.category.eq_ignore_ascii_case(category),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct CollaboratorFilter {
    /// Free-text search over name, specialty, institution and research interests
    #[serde(default)]
    pub search: Option<String>,
    /// Specialty substring
    #[serde(default)]
    pub specialty: Option<String>,
}

impl Filter<Collaborator> for CollaboratorFilter {
    fn matches(&self, collaborator: &Collaborator, focus: &str) -> bool {
        let search_ok = SearchText::new(self.search.as_deref(), focus).is_none_or(|s| {
            s.in_any(
                [
                    collaborator.name.as_str(),
                    collaborator.specialty.as_str(),
                    collaborator.institution.as_str(),
                ]
                .into_iter()
                .chain(collaborator.research_interests.iter().map(String::as_str)),
            )
        });
        search_ok && contains_ci(&collaborator.specialty, opt(self.specialty.as_ref()))
    }
}
