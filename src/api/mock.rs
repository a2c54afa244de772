//! Bundled sample data served when the backend is unreachable.
//!
//! Each dataset is filtered by the same query the backend would have
//! received, so an offline dashboard still shows records relevant to the
//! profile.

use crate::search::keyword_terms;
use crate::types::{
    AuthorType, ClinicalTrial, Collaborator, ForumPost, ForumReply, HealthExpert, Publication,
};
use ahash::AHashSet;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

static TRIALS: LazyLock<Vec<ClinicalTrial>> =
    LazyLock::new(|| load("trials", include_str!("../../data/mock/trials.json")));
static EXPERTS: LazyLock<Vec<HealthExpert>> =
    LazyLock::new(|| load("experts", include_str!("../../data/mock/experts.json")));
static PUBLICATIONS: LazyLock<Vec<Publication>> = LazyLock::new(|| {
    load(
        "publications",
        include_str!("../../data/mock/publications.json"),
    )
});
static COLLABORATORS: LazyLock<Vec<Collaborator>> = LazyLock::new(|| {
    load(
        "collaborators",
        include_str!("../../data/mock/collaborators.json"),
    )
});

fn load<T: DeserializeOwned>(name: &str, raw: &str) -> Vec<T> {
    match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::error!("Bundled {} dataset is invalid: {}", name, e);
            Vec::new()
        }
    }
}

/// Placeholder author list the backend sometimes returns.
const PLACEHOLDER_AUTHOR: &str = "Research Team";
const MISSING_AUTHORS: &str = "Authors not available";

/// A query topic and the keywords that should also count as a hit for it.
#[derive(Debug)]
pub struct TopicExpansion {
    /// Any of these in the query selects the expansion.
    pub triggers: &'static [&'static str],
    pub keywords: &'static [&'static str],
}

pub const TOPIC_EXPANSIONS: &[TopicExpansion] = &[
    TopicExpansion {
        triggers: &["parkinson", "movement disorders", "vyalev"],
        keywords: &["parkinson", "movement disorders", "deep brain", "vyalev"],
    },
    TopicExpansion {
        triggers: &["multiple system", "system atrophy"],
        keywords: &["multiple system", "system atrophy"],
    },
    TopicExpansion {
        triggers: &["breast cancer", "ductal carcinoma"],
        keywords: &["breast cancer", "ductal carcinoma", "dcis"],
    },
    TopicExpansion {
        triggers: &["adhd", "attention-deficit", "hyperactivity"],
        keywords: &["adhd", "child"],
    },
    TopicExpansion {
        triggers: &["methylphenidate", "brain connectivity"],
        keywords: &["methylphenidate"],
    },
    TopicExpansion {
        triggers: &["depression", "depressive"],
        keywords: &["depression", "psychiatry"],
    },
    TopicExpansion {
        triggers: &["brain stimulation"],
        keywords: &["brain stimulation", "tms", "deep brain"],
    },
    TopicExpansion {
        triggers: &["glioma"],
        keywords: &["glioma"],
    },
    TopicExpansion {
        triggers: &["pediatric", "neurology"],
        keywords: &["pediatric", "neurology"],
    },
    TopicExpansion {
        triggers: &["proteomics"],
        keywords: &["proteomics", "glioma"],
    },
    TopicExpansion {
        triggers: &["neuroimaging"],
        keywords: &["neuroimaging", "adhd", "depression"],
    },
];

/// A lowercased search phrase with its split terms and topic expansions.
#[derive(Debug, Clone, Default)]
pub struct MockQuery {
    phrase: String,
    terms: Vec<String>,
    expansions: Vec<&'static str>,
}

impl MockQuery {
    pub fn new(query: &str) -> Self {
        let phrase = query.trim().to_lowercase();
        let terms = keyword_terms(&phrase);
        let mut expansions: Vec<&'static str> = Vec::new();
        for topic in TOPIC_EXPANSIONS {
            if topic.triggers.iter().any(|t| phrase.contains(t)) {
                for keyword in topic.keywords {
                    if !expansions.contains(keyword) {
                        expansions.push(keyword);
                    }
                }
            }
        }
        Self {
            phrase,
            terms,
            expansions,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.phrase.is_empty()
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// The whole phrase or an expansion keyword appears in a field.
    pub fn matches_phrase<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        self.matches_any(fields, false)
    }

    /// Like [`matches_phrase`](Self::matches_phrase), but any single query term also counts.
    pub fn matches_terms<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        self.matches_any(fields, true)
    }

    fn matches_any<'a>(&self, fields: impl IntoIterator<Item = &'a str>, per_term: bool) -> bool {
        if self.is_empty() {
            return true;
        }
        fields.into_iter().any(|field| {
            let field = field.to_lowercase();
            field.contains(&self.phrase)
                || self.expansions.iter().any(|k| field.contains(k))
                || (per_term && self.terms.iter().any(|t| field.contains(t.as_str())))
        })
    }

    /// Whether a title contains the whole phrase.
    fn exact(&self, title: &str) -> bool {
        !self.is_empty() && title.to_lowercase().contains(&self.phrase)
    }
}

/// Keep the first item per key, preserving order.
fn dedup_by<T>(items: Vec<T>, key: impl Fn(&T) -> String) -> Vec<T> {
    let mut seen = AHashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

/// Stable partition putting items whose title contains the whole phrase first.
fn exact_titles_first<T>(items: &mut [T], query: &MockQuery, title: impl Fn(&T) -> &str) {
    items.sort_by_key(|item| !query.exact(title(item)));
}

/// Trials whose title or description mentions the condition or any of its terms.
pub fn trials(condition: &str) -> Vec<ClinicalTrial> {
    let query = MockQuery::new(condition);
    let matched: Vec<ClinicalTrial> = TRIALS
        .iter()
        .filter(|trial| {
            query.matches_terms([
                trial.title.as_str(),
                trial.description.as_deref().unwrap_or_default(),
            ])
        })
        .cloned()
        .collect();

    let mut unique = dedup_by(matched, |t| t.title.clone());
    exact_titles_first(&mut unique, &query, |t| t.title.as_str());
    unique
}

/// Experts whose profile mentions the specialty, optionally restricted to a location.
///
/// A location matches on the whole text or on its city part. Experts with
/// more research interests mentioning the query come first.
pub fn experts(specialty: &str, location: Option<&str>) -> Vec<HealthExpert> {
    let query = MockQuery::new(specialty);
    let location = location.map(|l| l.trim().to_lowercase()).unwrap_or_default();
    let city = location.split(',').next().unwrap_or_default().trim();

    let matched: Vec<HealthExpert> = EXPERTS
        .iter()
        .filter(|expert| {
            query.matches_phrase(
                [
                    expert.name.as_str(),
                    expert.specialty.as_str(),
                    expert.institution.as_str(),
                ]
                .into_iter()
                .chain(expert.research_interests.iter().map(String::as_str)),
            )
        })
        .filter(|expert| {
            let theirs = expert.location.to_lowercase();
            location.is_empty()
                || theirs.contains(&location)
                || (!city.is_empty() && theirs.contains(city))
        })
        .cloned()
        .collect();

    let mut unique = dedup_by(matched, |e| e.name.clone());
    if !query.is_empty() {
        unique.sort_by_key(|expert| {
            std::cmp::Reverse(
                expert
                    .research_interests
                    .iter()
                    .filter(|i| query.matches_terms([i.as_str()]))
                    .count(),
            )
        });
    }
    unique
}

/// Publications matching a keyword, optionally restricted to a journal.
///
/// Titles are de-duplicated case-insensitively and placeholder author
/// lists are replaced with a single "Authors not available" entry.
pub fn publications(keyword: &str, journal: Option<&str>) -> Vec<Publication> {
    let query = MockQuery::new(keyword);
    let journal = journal.map(|j| j.trim().to_lowercase()).unwrap_or_default();

    let matched: Vec<Publication> = PUBLICATIONS
        .iter()
        .filter(|publication| {
            query.matches_phrase(
                [
                    publication.title.as_str(),
                    publication.abstract_text.as_deref().unwrap_or_default(),
                ]
                .into_iter()
                .chain(publication.authors.iter().map(String::as_str)),
            )
        })
        .filter(|publication| publication.journal.to_lowercase().contains(&journal))
        .cloned()
        .map(|mut publication| {
            if publication.authors.is_empty()
                || publication
                    .authors
                    .iter()
                    .any(|a| a.contains(PLACEHOLDER_AUTHOR))
            {
                publication.authors = vec![MISSING_AUTHORS.to_string()];
            }
            publication
        })
        .collect();

    let mut unique = dedup_by(matched, |p| p.title.trim().to_lowercase());
    exact_titles_first(&mut unique, &query, |p| p.title.as_str());
    unique
}

/// Collaborators for a specialty and research interest. With neither, all of them.
pub fn collaborators(specialty: Option<&str>, research_interest: Option<&str>) -> Vec<Collaborator> {
    let combined = [specialty, research_interest]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let query = MockQuery::new(&combined);

    COLLABORATORS
        .iter()
        .filter(|collaborator| {
            query.matches_terms(
                [
                    collaborator.name.as_str(),
                    collaborator.specialty.as_str(),
                    collaborator.institution.as_str(),
                ]
                .into_iter()
                .chain(collaborator.research_interests.iter().map(String::as_str)),
            )
        })
        .cloned()
        .collect()
}

/// Seed forum threads for a patient's condition.
///
/// There is no forum endpoint; every dashboard starts from these.
pub fn forum_posts(condition: &str) -> Vec<ForumPost> {
    let lower = condition.to_lowercase();
    let mut posts = Vec::new();

    if ["cancer", "glioma", "tumor"].iter().any(|k| lower.contains(k)) {
        posts.push(ForumPost {
            id: 1,
            title: format!("Latest treatments for {}?", condition),
            content: format!(
                "I was recently diagnosed with {} and my oncologist mentioned some new \
                 treatments. What are the most recent advances? I'm particularly interested \
                 in immunotherapy and targeted therapies.",
                condition
            ),
            category: "Cancer Research".to_string(),
            author: "Patient123".to_string(),
            author_type: AuthorType::Patient,
            time: "2 hours ago".to_string(),
            replies: vec![ForumReply {
                id: 101,
                content: format!(
                    "Recent advances for {} include CAR-T cell therapy and checkpoint \
                     inhibitors. Ask your oncologist about genetic testing to see whether \
                     precision medicine approaches apply.",
                    condition
                ),
                author: "Dr. Sarah Johnson".to_string(),
                author_type: AuthorType::Researcher,
                credentials: Some("Neuro-Oncologist, Memorial Sloan Kettering".to_string()),
                time: "1 hour ago".to_string(),
                upvotes: 8,
                is_upvoted: false,
            }],
            upvotes: 15,
            is_upvoted: false,
        });
    }

    if ["heart", "cardiac"].iter().any(|k| lower.contains(k)) {
        posts.push(ForumPost {
            id: 2,
            title: format!("Managing {} - lifestyle changes?", condition),
            content: format!(
                "What lifestyle changes have helped others with {}? My cardiologist \
                 mentioned diet and exercise but I'd love to hear real experiences.",
                condition
            ),
            category: "General Health".to_string(),
            author: "HeartPatient2024".to_string(),
            author_type: AuthorType::Patient,
            time: "4 hours ago".to_string(),
            replies: Vec::new(),
            upvotes: 12,
            is_upvoted: false,
        });
    }

    let next_id = posts.iter().map(|p| p.id).max().unwrap_or(0) + 1;
    posts.push(ForumPost {
        id: next_id,
        title: "Clinical trial eligibility questions".to_string(),
        content: "I found a clinical trial that might be relevant for my condition, but I'm \
                  not sure if I meet the eligibility criteria. How do I find out more?"
            .to_string(),
        category: "Clinical Trials Insights".to_string(),
        author: "Survivor2024".to_string(),
        author_type: AuthorType::Patient,
        time: "1 day ago".to_string(),
        replies: Vec::new(),
        upvotes: 18,
        is_upvoted: false,
    });

    posts
}
