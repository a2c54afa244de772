//! Plain-text rendering shared by the CLI and the MCP tools.

use crate::api::TrialBrief;
use crate::matching::Scored;
use crate::normalize::{ConditionMatch, LocationMatch};
use crate::store::Favorites;
use crate::types::{
    ClinicalTrial, Collaborator, EntityKind, ForumPost, HealthExpert, ItemId, Publication,
};
use std::fmt::Write as _;

/// Longest description or abstract excerpt shown in a listing.
const EXCERPT_CHARS: usize = 160;

/// A record that can be listed as a match.
pub trait Listing {
    const KIND: EntityKind;
    /// Plural noun for headers, e.g. "clinical trials".
    const NOUN: &'static str;

    fn id(&self) -> ItemId;
    fn headline(&self) -> &str;
    /// Secondary lines under the headline.
    fn details(&self) -> Vec<String>;
}

impl Listing for ClinicalTrial {
    const KIND: EntityKind = EntityKind::Trial;
    const NOUN: &'static str = "clinical trials";

    fn id(&self) -> ItemId {
        self.id
    }

    fn headline(&self) -> &str {
        &self.title
    }

    fn details(&self) -> Vec<String> {
        let mut lines = vec![format!("{} • {} • {}", self.phase, self.status, self.location)];
        lines.extend(self.description.as_deref().map(excerpt));
        lines
    }
}

impl Listing for HealthExpert {
    const KIND: EntityKind = EntityKind::Expert;
    const NOUN: &'static str = "health experts";

    fn id(&self) -> ItemId {
        self.id
    }

    fn headline(&self) -> &str {
        &self.name
    }

    fn details(&self) -> Vec<String> {
        let mut lines = vec![format!("{} • {} • {}", self.specialty, self.institution, self.location)];
        if !self.research_interests.is_empty() {
            lines.push(format!("Interests: {}", self.research_interests.join(", ")));
        }
        if !self.available_for_meetings {
            lines.push("Not on the platform; requests go through an admin".to_string());
        }
        lines
    }
}

impl Listing for Publication {
    const KIND: EntityKind = EntityKind::Publication;
    const NOUN: &'static str = "publications";

    fn id(&self) -> ItemId {
        self.id
    }

    fn headline(&self) -> &str {
        &self.title
    }

    fn details(&self) -> Vec<String> {
        let mut lines = vec![format!("{} ({}) • {}", self.journal, self.date, self.authors.join(", "))];
        if let Some(doi) = &self.doi {
            lines.push(format!("DOI: {}", doi));
        }
        lines.extend(self.abstract_text.as_deref().map(excerpt));
        lines
    }
}

impl Listing for ForumPost {
    const KIND: EntityKind = EntityKind::ForumPost;
    const NOUN: &'static str = "forum posts";

    fn id(&self) -> ItemId {
        self.id
    }

    fn headline(&self) -> &str {
        &self.title
    }

    fn details(&self) -> Vec<String> {
        vec![
            format!(
                "{} • by {} • {} • {} upvotes • {} replies",
                self.category,
                self.author,
                self.time,
                self.upvotes,
                self.replies.len()
            ),
            excerpt(&self.content),
        ]
    }
}

impl Listing for Collaborator {
    const KIND: EntityKind = EntityKind::Collaborator;
    const NOUN: &'static str = "collaborators";

    fn id(&self) -> ItemId {
        self.id
    }

    fn headline(&self) -> &str {
        &self.name
    }

    fn details(&self) -> Vec<String> {
        let mut first = format!("{} • {}", self.specialty, self.institution);
        if let Some(location) = &self.location {
            let _ = write!(first, " • {}", location);
        }
        let mut lines = vec![first, format!("{} publications", self.publications)];
        if !self.research_interests.is_empty() {
            lines.push(format!("Interests: {}", self.research_interests.join(", ")));
        }
        lines
    }
}

/// Numbered listing of scored matches. Favorites are starred.
pub fn format_matches<T: Listing>(items: &[Scored<T>], favorites: Option<&Favorites>) -> String {
    if items.is_empty() {
        return format!(
            "No {} matched.\n\nTry a broader condition or clear the filters.",
            T::NOUN
        );
    }

    let mut output = format!("Found {} {}:\n", items.len(), T::NOUN);
    for (i, scored) in items.iter().enumerate() {
        let item = &scored.item;
        let starred = favorites.is_some_and(|f| f.contains(T::KIND, item.id()));
        let _ = write!(
            output,
            "\n{}. {} [#{}] {} ({})",
            i + 1,
            item.headline(),
            item.id(),
            scored.match_score,
            scored.match_score.band()
        );
        if let Some(tier) = scored.location_tier {
            let _ = write!(output, " • {}", tier.label());
        }
        if starred {
            output.push_str(" ★");
        }
        output.push('\n');
        for line in item.details() {
            let _ = writeln!(output, "   {}", line);
        }
    }
    output
}

pub fn format_condition(matched: &ConditionMatch, suggestions: &[String]) -> String {
    let mut output = format!(
        "Primary condition: {}\nConfidence: {:.1}\n",
        matched.primary_condition, matched.confidence
    );
    if !matched.identified_conditions.is_empty() {
        let _ = writeln!(output, "Identified: {}", matched.identified_conditions.join(", "));
    }
    if !suggestions.is_empty() {
        let _ = writeln!(output, "Suggestions: {}", suggestions.join(", "));
    }
    output
}

pub fn format_location(matched: &LocationMatch, suggestions: &[String]) -> String {
    let mut output = format!(
        "Location: {}\nCity: {}\nCountry: {}\nConfidence: {:.1}\n",
        matched.formatted_location, matched.city, matched.country, matched.confidence
    );
    if !suggestions.is_empty() {
        let _ = writeln!(output, "Suggestions: {}", suggestions.join(", "));
    }
    output
}

/// Favorite ids grouped by kind.
pub fn format_favorites(favorites: &Favorites) -> String {
    if favorites.is_empty() {
        return "No favorites saved.".to_string();
    }
    let mut output = String::from("Favorites:\n");
    for (kind, ids) in favorites.iter() {
        let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
        let _ = writeln!(output, "• {}: {}", kind, ids.join(", "));
    }
    output
}

pub fn format_trial_brief(trial: &ClinicalTrial, brief: &TrialBrief) -> String {
    format!(
        "{}\n\n{}\n\nKey points: {}\nTime commitment: {}\nRisk level: {}\nEligibility: {}\n",
        trial.title,
        brief.summary,
        brief.key_points.join(", "),
        brief.time_commitment,
        brief.risk_level,
        brief.eligibility
    )
}

fn excerpt(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= EXCERPT_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", cut.trim_end())
}
