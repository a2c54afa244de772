//! Dashboard pipelines.
//!
//! Each `match_*` operation fetches candidates (backend or sample data),
//! applies the dashboard filter, scores every survivor against the
//! normalized profile and returns them ranked.

use crate::api::{ApiClient, MeetingReceipt, SuggestionRequest, TrialBrief};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::matching::{
    ForumSort, ScoringContext, Scored, Weights, rank_by_proximity, rank_by_score, rank_forum_posts,
    score_all,
};
use crate::normalize::{process_condition_input, process_location_input};
use crate::search::{
    CollaboratorFilter, ExpertFilter, ForumFilter, PublicationFilter, TrialFilter, apply_filter,
};
use crate::store::{DynStore, FileStore, KeyValueStore, LocalState};
use crate::types::{
    AdminRequest, ClinicalTrial, Collaborator, ForumPost, HealthExpert, MeetingRequest,
    MeetingRequestForm, PatientProfile, Publication, ResearcherProfile,
};
use anyhow::Context;

/// How a meeting request was delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeetingOutcome {
    /// The backend accepted it.
    Sent(MeetingReceipt),
    /// The backend was unavailable; the request is queued in local state as `pending`.
    StoredLocally(MeetingRequest),
}

/// The matching engine: API client, scorer weights and local state.
#[derive(Debug)]
pub struct CuraLink<S> {
    api: ApiClient,
    weights: Weights,
    context: ScoringContext,
    state: LocalState<S>,
}

impl CuraLink<DynStore> {
    /// Engine backed by the configured data directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let dir = config.data_dir();
        tracing::debug!("Using state directory {}", dir.display());
        Self::new(config, Box::new(FileStore::new(dir)))
    }
}

impl<S: KeyValueStore> CuraLink<S> {
    pub fn new(config: &Config, store: S) -> Result<Self> {
        let api = ApiClient::new(config).context("Failed to create API client")?;
        Ok(Self {
            api,
            weights: config.weights.clone(),
            context: ScoringContext::now(),
            state: LocalState::new(store),
        })
    }

    /// Score against a fixed calendar instead of the clock.
    #[must_use]
    pub fn with_scoring_context(mut self, context: ScoringContext) -> Self {
        self.context = context;
        self
    }

    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    pub const fn state(&self) -> &LocalState<S> {
        &self.state
    }

    pub const fn weights(&self) -> &Weights {
        &self.weights
    }

    pub async fn match_trials(
        &self,
        profile: &PatientProfile,
        filter: &TrialFilter,
    ) -> Vec<Scored<ClinicalTrial>> {
        let profile = normalize_patient(profile);
        let query = search_query(&profile.condition, filter.search.as_deref());
        let trials = self
            .api
            .clinical_trials(&query, non_empty(&profile.location))
            .await;

        let trials = apply_filter(trials, filter, &profile.condition);
        let mut scored = score_all(trials, &profile, &self.weights.trial, &self.context);
        rank_by_proximity(&mut scored);
        tracing::debug!("Matched {} trials for '{}'", scored.len(), profile.condition);
        scored
    }

    pub async fn match_experts(
        &self,
        profile: &PatientProfile,
        filter: &ExpertFilter,
        include_external: bool,
    ) -> Vec<Scored<HealthExpert>> {
        let profile = normalize_patient(profile);
        let query = search_query(&profile.condition, filter.search.as_deref());
        let experts = self
            .api
            .health_experts(&query, non_empty(&profile.location), include_external)
            .await;

        let experts = apply_filter(experts, filter, &profile.condition);
        let mut scored = score_all(experts, &profile, &self.weights.expert, &self.context);
        rank_by_proximity(&mut scored);
        tracing::debug!("Matched {} experts for '{}'", scored.len(), profile.condition);
        scored
    }

    pub async fn match_publications(
        &self,
        profile: &PatientProfile,
        filter: &PublicationFilter,
    ) -> Vec<Scored<Publication>> {
        let profile = normalize_patient(profile);
        let publications = self
            .api
            .publications(&profile.condition, filter.journal.as_deref())
            .await;

        let publications = apply_filter(publications, filter, &profile.condition);
        let mut scored = score_all(
            publications,
            &profile,
            &self.weights.publication,
            &self.context,
        );
        rank_by_score(&mut scored);
        scored
    }

    /// Forum threads for the patient's condition. There is no forum
    /// endpoint, so threads always come from the seed set.
    pub fn match_forum_posts(
        &self,
        profile: &PatientProfile,
        filter: &ForumFilter,
        sort: ForumSort,
    ) -> Vec<Scored<ForumPost>> {
        let profile = normalize_patient(profile);
        let posts = crate::api::mock::forum_posts(&profile.condition);

        let posts = apply_filter(posts, filter, &profile.condition);
        let mut scored = score_all(posts, &profile, &self.weights.forum, &self.context);
        rank_forum_posts(&mut scored, sort);
        scored
    }

    pub async fn match_collaborators(
        &self,
        researcher: &ResearcherProfile,
        filter: &CollaboratorFilter,
    ) -> Vec<Scored<Collaborator>> {
        let specialty = filter
            .specialty
            .as_deref()
            .or_else(|| researcher.specialties.first().map(String::as_str));
        let interest = researcher.research_interests.first().map(String::as_str);
        let collaborators = self
            .api
            .collaborators(specialty, interest, researcher.location.as_deref())
            .await;

        let focus = researcher.specialties.join(" ");
        let collaborators = apply_filter(collaborators, filter, &focus);
        let mut scored = score_all(
            collaborators,
            researcher,
            &self.weights.collaborator,
            &self.context,
        );
        rank_by_score(&mut scored);
        scored
    }

    /// Send a meeting request, falling back to the local queue when the
    /// backend cannot take it.
    pub async fn request_meeting(
        &self,
        expert: &HealthExpert,
        form: MeetingRequestForm,
    ) -> Result<MeetingOutcome> {
        match self.api.create_meeting_request(expert.id, &form).await {
            Ok(receipt) => {
                tracing::info!("Meeting request for {} sent", expert.name);
                Ok(MeetingOutcome::Sent(receipt))
            }
            Err(e) => {
                if !matches!(e, ApiError::Offline) {
                    tracing::warn!("{}; storing meeting request locally", e);
                }
                let request = self
                    .state
                    .add_meeting_request(expert.id, &expert.name, form, expert.available_for_meetings)
                    .context("Failed to store meeting request")?;
                Ok(MeetingOutcome::StoredLocally(request))
            }
        }
    }

    /// Persist the patient profile locally and mirror it to the backend.
    ///
    /// Mirroring is best-effort; only the local write can fail.
    pub async fn save_patient_profile(&self, profile: &PatientProfile) -> Result<()> {
        self.state
            .save_patient_profile(profile)
            .context("Failed to save patient profile")?;
        if let Err(e) = self.api.create_patient_profile(profile).await {
            log_mirror_failure("patient", &e);
        }
        Ok(())
    }

    pub async fn save_researcher_profile(&self, profile: &ResearcherProfile) -> Result<()> {
        self.state
            .save_researcher_profile(profile)
            .context("Failed to save researcher profile")?;
        if let Err(e) = self.api.create_researcher_profile(profile).await {
            log_mirror_failure("researcher", &e);
        }
        Ok(())
    }

    /// The admin queue with locally recorded status changes applied.
    pub async fn admin_queue(&self) -> Vec<AdminRequest> {
        if let Err(e) = self.state.record_admin_access() {
            tracing::warn!("Failed to record admin access: {}", e);
        }
        let mut requests = match self.api.admin_requests().await {
            Ok(requests) => requests,
            Err(ApiError::Offline) => Vec::new(),
            Err(e) => {
                tracing::warn!("{}; admin queue unavailable", e);
                Vec::new()
            }
        };
        let overrides = self.state.admin_request_status();
        for request in &mut requests {
            if let Some(status) = overrides.get(&request.id) {
                request.status = *status;
            }
        }
        requests
    }

    pub fn trial_brief(&self, trial: &ClinicalTrial, profile: &PatientProfile) -> TrialBrief {
        crate::api::trial_brief(trial, &normalize_patient(profile).condition)
    }

    pub async fn research_suggestions(
        &self,
        researcher: &ResearcherProfile,
        question: Option<&str>,
    ) -> Vec<String> {
        let request = SuggestionRequest {
            profile: researcher,
            question,
        };
        self.api.research_suggestions(&request).await
    }
}

fn log_mirror_failure(kind: &str, error: &ApiError) {
    match error {
        ApiError::Offline => tracing::debug!("Offline; {} profile kept locally only", kind),
        e => tracing::warn!("Failed to mirror {} profile: {}", kind, e),
    }
}

/// Canonical condition and "City, Country" location for scoring.
///
/// An unrecognized location is kept as typed so country comparisons still
/// see the user's own spelling.
pub fn normalize_patient(profile: &PatientProfile) -> PatientProfile {
    let condition = if profile.condition.trim().is_empty() {
        String::new()
    } else {
        process_condition_input(&profile.condition).primary_condition
    };

    let location = if profile.location.trim().is_empty() {
        String::new()
    } else {
        let matched = process_location_input(&profile.location);
        if matched.country == "Unknown" {
            profile.location.trim().to_string()
        } else {
            matched.formatted_location
        }
    };

    PatientProfile {
        condition,
        location,
        additional_conditions: profile.additional_conditions.clone(),
    }
}

/// The backend query for a dashboard: the condition, refined by the search box.
fn search_query(condition: &str, search: Option<&str>) -> String {
    match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(search) => format!("{} {}", condition, search),
        None => condition.to_string(),
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("brain cancer", "Toronto", "Brain Cancer", "Toronto, Canada")]
    #[case("", "", "", "")]
    #[case("Glioma", "Atlantis", "Glioma", "Atlantis")]
    fn test_normalize_patient(
        #[case] condition: &str,
        #[case] location: &str,
        #[case] expected_condition: &str,
        #[case] expected_location: &str,
    ) {
        let profile = PatientProfile {
            condition: condition.into(),
            location: location.into(),
            additional_conditions: vec![],
        };
        let normalized = normalize_patient(&profile);
        check!(normalized.condition == expected_condition);
        check!(normalized.location == expected_location);
    }

    #[test]
    fn test_search_query() {
        check!(search_query("Glioma", None) == "Glioma");
        check!(search_query("Glioma", Some("  ")) == "Glioma");
        check!(search_query("Glioma", Some("vaccine")) == "Glioma vaccine");
    }
}
