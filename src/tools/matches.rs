//! Matching tools: score and rank candidates for a patient or researcher.
//!
//! Profile fields given in a request take precedence; anything omitted is
//! taken from the saved profile.

use crate::format::{Listing, format_matches};
use crate::matching::{ForumSort, Scored};
use crate::search::{
    CollaboratorFilter, ExpertFilter, ForumFilter, PublicationFilter, TrialFilter,
};
use crate::service::CuraLink;
use crate::store::KeyValueStore;
use crate::types::{PatientProfile, ResearcherProfile, Role};
use rmcp::schemars;
use serde::Deserialize;

const DEFAULT_LIMIT: usize = 10;

/// Patient fields shared by the patient-side tools.
#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct PatientArgs {
    /// Condition to match against. Defaults to the saved patient profile.
    #[serde(default)]
    pub condition: Option<String>,
    /// Patient location, e.g. "Toronto, Canada". Defaults to the saved patient profile.
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MatchTrialsRequest {
    #[serde(flatten)]
    pub patient: PatientArgs,
    #[serde(flatten)]
    pub filter: TrialFilter,
    /// Maximum number of results (default: 10)
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MatchExpertsRequest {
    #[serde(flatten)]
    pub patient: PatientArgs,
    #[serde(flatten)]
    pub filter: ExpertFilter,
    /// Also list experts who are not on the platform
    #[serde(default)]
    pub include_external: bool,
    /// Maximum number of results (default: 10)
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MatchPublicationsRequest {
    #[serde(flatten)]
    pub patient: PatientArgs,
    #[serde(flatten)]
    pub filter: PublicationFilter,
    /// Maximum number of results (default: 10)
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MatchForumPostsRequest {
    #[serde(flatten)]
    pub patient: PatientArgs,
    #[serde(flatten)]
    pub filter: ForumFilter,
    /// Ordering: relevance (default), popular or unanswered
    #[serde(default)]
    pub sort: ForumSort,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MatchCollaboratorsRequest {
    /// Researcher's own specialties. Defaults to the saved researcher profile.
    #[serde(default)]
    pub specialties: Option<Vec<String>>,
    /// Researcher's research interests. Defaults to the saved researcher profile.
    #[serde(default)]
    pub research_interests: Option<Vec<String>>,
    /// Researcher's location, e.g. "Toronto, Canada"
    #[serde(default)]
    pub location: Option<String>,
    #[serde(flatten)]
    pub filter: CollaboratorFilter,
    /// Maximum number of results (default: 10)
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Combine request fields with the saved patient profile.
pub fn resolve_patient<S: KeyValueStore>(
    engine: &CuraLink<S>,
    args: &PatientArgs,
) -> Result<PatientProfile, String> {
    let saved = engine.state().patient_profile().unwrap_or_default();
    let condition = args
        .condition
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(saved.condition);
    if condition.trim().is_empty() {
        return Err(
            "No condition given and no saved patient profile.\n\n\
             Pass a condition, e.g. {\"condition\": \"Brain Cancer\", \"location\": \"Toronto\"}"
                .to_string(),
        );
    }
    Ok(PatientProfile {
        condition,
        location: args.location.clone().unwrap_or(saved.location),
        additional_conditions: saved.additional_conditions,
    })
}

fn resolve_researcher<S: KeyValueStore>(
    engine: &CuraLink<S>,
    request: &MatchCollaboratorsRequest,
) -> Result<ResearcherProfile, String> {
    let saved = engine.state().researcher_profile().unwrap_or_default();
    let researcher = ResearcherProfile {
        specialties: request.specialties.clone().unwrap_or(saved.specialties),
        research_interests: request
            .research_interests
            .clone()
            .unwrap_or(saved.research_interests),
        location: request.location.clone().or(saved.location),
        ..saved
    };
    if researcher.specialties.is_empty() && researcher.research_interests.is_empty() {
        return Err(
            "No specialties or research interests given and no saved researcher profile."
                .to_string(),
        );
    }
    Ok(researcher)
}

fn render<T: Listing, S: KeyValueStore>(
    engine: &CuraLink<S>,
    role: Role,
    mut results: Vec<Scored<T>>,
    limit: Option<usize>,
) -> String {
    results.truncate(limit.unwrap_or(DEFAULT_LIMIT));
    let favorites = engine.state().favorites(role);
    format_matches(&results, Some(&favorites))
}

pub async fn handle_match_trials<S: KeyValueStore>(
    engine: &CuraLink<S>,
    request: MatchTrialsRequest,
) -> Result<String, String> {
    let profile = resolve_patient(engine, &request.patient)?;
    let results = engine.match_trials(&profile, &request.filter).await;
    Ok(render(engine, Role::Patient, results, request.limit))
}

pub async fn handle_match_experts<S: KeyValueStore>(
    engine: &CuraLink<S>,
    request: MatchExpertsRequest,
) -> Result<String, String> {
    let profile = resolve_patient(engine, &request.patient)?;
    let results = engine
        .match_experts(&profile, &request.filter, request.include_external)
        .await;
    Ok(render(engine, Role::Patient, results, request.limit))
}

pub async fn handle_match_publications<S: KeyValueStore>(
    engine: &CuraLink<S>,
    request: MatchPublicationsRequest,
) -> Result<String, String> {
    let profile = resolve_patient(engine, &request.patient)?;
    let results = engine.match_publications(&profile, &request.filter).await;
    Ok(render(engine, Role::Patient, results, request.limit))
}

pub fn handle_match_forum_posts<S: KeyValueStore>(
    engine: &CuraLink<S>,
    request: &MatchForumPostsRequest,
) -> Result<String, String> {
    let profile = resolve_patient(engine, &request.patient)?;
    let results = engine.match_forum_posts(&profile, &request.filter, request.sort);
    Ok(render(engine, Role::Patient, results, None))
}

pub async fn handle_match_collaborators<S: KeyValueStore>(
    engine: &CuraLink<S>,
    request: MatchCollaboratorsRequest,
) -> Result<String, String> {
    let researcher = resolve_researcher(engine, &request)?;
    let results = engine.match_collaborators(&researcher, &request.filter).await;
    Ok(render(engine, Role::Researcher, results, request.limit))
}
