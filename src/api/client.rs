use super::ai::{self, ConditionAnalysis, SuggestionRequest};
use super::mock;
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::types::{
    AdminRequest, ClinicalTrial, Collaborator, HealthExpert, ItemId, MeetingRequestForm,
    PatientProfile, Publication, RequestStatus, ResearcherProfile,
};
use anyhow::Context;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Deserialize)]
struct TrialsEnvelope {
    trials: Vec<ClinicalTrial>,
}

#[derive(Deserialize)]
struct ExpertsEnvelope {
    experts: Vec<HealthExpert>,
}

#[derive(Deserialize)]
struct PublicationsEnvelope {
    publications: Vec<Publication>,
}

#[derive(Deserialize)]
struct CollaboratorsEnvelope {
    collaborators: Vec<Collaborator>,
}

#[derive(Deserialize)]
struct AdminRequestsEnvelope {
    #[serde(default)]
    requests: Vec<AdminRequest>,
}

#[derive(Deserialize)]
struct AnalysisEnvelope {
    data: ConditionAnalysis,
}

#[derive(Deserialize)]
struct SummaryEnvelope {
    summary: String,
}

#[derive(Deserialize)]
struct SuggestionsEnvelope {
    suggestions: Vec<String>,
}

#[derive(Serialize)]
struct MeetingRequestBody<'a> {
    #[serde(flatten)]
    form: &'a MeetingRequestForm,
    researcher_id: String,
}

/// What the backend said about a submitted meeting request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MeetingReceipt {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
}

impl MeetingReceipt {
    /// The expert is not on the platform and an admin will reach out.
    pub fn is_admin_request(&self) -> bool {
        self.kind.as_deref() == Some("admin_request")
    }
}

/// HTTP client for the CuraLink backend.
///
/// Read endpoints never fail: transport errors, error statuses and bad
/// bodies are logged and answered from the bundled sample data. Write
/// endpoints return [`ApiError`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    offline: bool,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("curalink/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            offline: config.offline,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn is_offline(&self) -> bool {
        self.offline
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        endpoint: &str,
    ) -> std::result::Result<T, ApiError> {
        if self.offline {
            return Err(ApiError::Offline);
        }
        let transport = |source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        };

        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status,
            });
        }
        response.json::<T>().await.map_err(transport)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<T, ApiError> {
        tracing::debug!("GET {} {:?}", endpoint, query);
        self.send(self.http.get(self.url(endpoint)).query(query), endpoint)
            .await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> std::result::Result<T, ApiError> {
        tracing::debug!("POST {}", endpoint);
        self.send(self.http.post(self.url(endpoint)).json(body), endpoint)
            .await
    }

    async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> std::result::Result<T, ApiError> {
        tracing::debug!("PUT {}", endpoint);
        self.send(self.http.put(self.url(endpoint)).json(body), endpoint)
            .await
    }

    pub async fn create_patient_profile(
        &self,
        profile: &PatientProfile,
    ) -> std::result::Result<Value, ApiError> {
        self.post("/api/patients/profile", profile).await
    }

    pub async fn create_researcher_profile(
        &self,
        profile: &ResearcherProfile,
    ) -> std::result::Result<Value, ApiError> {
        self.post("/api/researchers/profile", profile).await
    }

    pub async fn clinical_trials(&self, condition: &str, location: Option<&str>) -> Vec<ClinicalTrial> {
        let query = query_params([("condition", Some(condition)), ("location", location)]);
        let result = self
            .get::<TrialsEnvelope>("/api/clinical-trials", &query)
            .await
            .map(|e| e.trials);
        or_sample_data(result, || mock::trials(condition))
    }

    pub async fn health_experts(
        &self,
        specialty: &str,
        location: Option<&str>,
        include_external: bool,
    ) -> Vec<HealthExpert> {
        let mut query = query_params([("specialty", Some(specialty)), ("location", location)]);
        if include_external {
            query.push(("include_external", "true".to_string()));
        }
        let result = self
            .get::<ExpertsEnvelope>("/api/health-experts", &query)
            .await
            .map(|e| e.experts);
        or_sample_data(result, || mock::experts(specialty, location))
    }

    pub async fn publications(&self, keyword: &str, journal: Option<&str>) -> Vec<Publication> {
        let query = query_params([("keyword", Some(keyword)), ("journal", journal)]);
        let result = self
            .get::<PublicationsEnvelope>("/api/publications", &query)
            .await
            .map(|e| e.publications);
        or_sample_data(result, || mock::publications(keyword, journal))
    }

    pub async fn collaborators(
        &self,
        specialty: Option<&str>,
        research_interest: Option<&str>,
        location: Option<&str>,
    ) -> Vec<Collaborator> {
        let query = query_params([
            ("specialty", specialty),
            ("research_interest", research_interest),
            ("location", location),
        ]);
        let result = self
            .get::<CollaboratorsEnvelope>("/api/collaborators", &query)
            .await
            .map(|e| e.collaborators);
        or_sample_data(result, || mock::collaborators(specialty, research_interest))
    }

    pub async fn create_meeting_request(
        &self,
        expert_id: ItemId,
        form: &MeetingRequestForm,
    ) -> std::result::Result<MeetingReceipt, ApiError> {
        let body = MeetingRequestBody {
            form,
            researcher_id: expert_id.to_string(),
        };
        self.post("/api/meeting-requests", &body).await
    }

    pub async fn meeting_requests(&self, researcher_id: &str) -> std::result::Result<Value, ApiError> {
        self.get(&format!("/api/meeting-requests/{}", researcher_id), &[])
            .await
    }

    pub async fn update_meeting_request(
        &self,
        request_id: ItemId,
        status: RequestStatus,
    ) -> std::result::Result<Value, ApiError> {
        self.put(
            &format!("/api/meeting-requests/{}", request_id),
            &serde_json::json!({ "status": status }),
        )
        .await
    }

    pub async fn sync_orcid(&self, orcid_id: &str) -> std::result::Result<Value, ApiError> {
        self.post("/api/orcid/sync", &serde_json::json!({ "orcid_id": orcid_id }))
            .await
    }

    pub async fn admin_requests(&self) -> std::result::Result<Vec<AdminRequest>, ApiError> {
        self.get::<AdminRequestsEnvelope>("/api/admin/requests", &[])
            .await
            .map(|e| e.requests)
    }

    pub async fn analyze_condition(&self, text: &str) -> ConditionAnalysis {
        let body = serde_json::json!({ "text": text, "analysis_type": "condition" });
        let result = self
            .post::<_, AnalysisEnvelope>("/api/ai/analyze-condition", &body)
            .await
            .map(|e| e.data);
        or_sample_data(result, || ai::fallback_analysis(text))
    }

    pub async fn trial_summary(&self, trial: &ClinicalTrial) -> String {
        let result = self
            .post::<_, SummaryEnvelope>("/api/ai/trial-summary", trial)
            .await
            .map(|e| e.summary);
        or_sample_data(result, || ai::fallback_trial_summary(trial))
    }

    pub async fn research_suggestions(&self, request: &SuggestionRequest<'_>) -> Vec<String> {
        let result = self
            .post::<_, SuggestionsEnvelope>("/api/ai/research-suggestions", request)
            .await
            .map(|e| e.suggestions);
        or_sample_data(result, || ai::fallback_suggestions(request))
    }
}

/// Non-empty parameters only, trimmed.
fn query_params<const N: usize>(params: [(&'static str, Option<&str>); N]) -> Vec<(&'static str, String)> {
    params
        .into_iter()
        .filter_map(|(name, value)| {
            let value = value?.trim();
            (!value.is_empty()).then(|| (name, value.to_string()))
        })
        .collect()
}

fn or_sample_data<T>(result: std::result::Result<T, ApiError>, fallback: impl FnOnce() -> T) -> T {
    match result {
        Ok(value) => value,
        Err(ApiError::Offline) => fallback(),
        Err(e) => {
            tracing::warn!("{}; using sample data", e);
            fallback()
        }
    }
}
