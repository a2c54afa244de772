//! MCP server exposing the matching engine as tools.

use crate::service::CuraLink;
use crate::store::DynStore;
use crate::tools::{
    ListFavoritesRequest, MatchCollaboratorsRequest, MatchExpertsRequest, MatchForumPostsRequest,
    MatchPublicationsRequest, MatchTrialsRequest, NormalizeConditionRequest,
    NormalizeLocationRequest, ToggleFavoriteRequest, handle_list_favorites,
    handle_match_collaborators, handle_match_experts, handle_match_forum_posts,
    handle_match_publications, handle_match_trials, handle_normalize_condition,
    handle_normalize_location, handle_toggle_favorite,
};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP server for patient and researcher matching
#[derive(Clone)]
pub struct MatchServer {
    /// Shared engine (API client, weights, local state)
    engine: Arc<CuraLink<DynStore>>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for MatchServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchServer")
            .field("api", &self.engine.api().base_url())
            .finish_non_exhaustive()
    }
}

#[tool_router]
impl MatchServer {
    pub fn new(engine: CuraLink<DynStore>) -> Self {
        Self {
            engine: Arc::new(engine),
            tool_router: Self::tool_router(),
        }
    }

    pub fn engine(&self) -> &CuraLink<DynStore> {
        &self.engine
    }

    #[tool(
        description = "Normalize a free-text condition description to a canonical condition name. Returns the primary condition, every recognized condition and a confidence score."
    )]
    fn normalize_condition(
        &self,
        Parameters(request): Parameters<NormalizeConditionRequest>,
    ) -> std::result::Result<String, String> {
        Ok(handle_normalize_condition(&request))
    }

    #[tool(
        description = "Normalize a free-text location to a canonical 'City, Country' pair with a confidence score."
    )]
    fn normalize_location(
        &self,
        Parameters(request): Parameters<NormalizeLocationRequest>,
    ) -> std::result::Result<String, String> {
        Ok(handle_normalize_location(&request))
    }

    #[tool(
        description = "Find clinical trials for a patient's condition, scored 0-100 and ranked by location proximity then score. Falls back to sample data when the backend is unavailable.",
        input_schema = inline_schema_for_type::<MatchTrialsRequest>()
    )]
    async fn match_trials(
        &self,
        Parameters(request): Parameters<MatchTrialsRequest>,
    ) -> std::result::Result<String, String> {
        handle_match_trials(&self.engine, request).await
    }

    #[tool(
        description = "Find health experts for a patient's condition, scored 0-100 and ranked by location proximity then score.",
        input_schema = inline_schema_for_type::<MatchExpertsRequest>()
    )]
    async fn match_experts(
        &self,
        Parameters(request): Parameters<MatchExpertsRequest>,
    ) -> std::result::Result<String, String> {
        handle_match_experts(&self.engine, request).await
    }

    #[tool(
        description = "Find research publications relevant to a patient's condition, ranked by score. Recent papers in high-impact journals score higher.",
        input_schema = inline_schema_for_type::<MatchPublicationsRequest>()
    )]
    async fn match_publications(
        &self,
        Parameters(request): Parameters<MatchPublicationsRequest>,
    ) -> std::result::Result<String, String> {
        handle_match_publications(&self.engine, request).await
    }

    #[tool(
        description = "List community forum threads for a patient's condition. Sort by relevance, popular or unanswered.",
        input_schema = inline_schema_for_type::<MatchForumPostsRequest>()
    )]
    fn match_forum_posts(
        &self,
        Parameters(request): Parameters<MatchForumPostsRequest>,
    ) -> std::result::Result<String, String> {
        handle_match_forum_posts(&self.engine, &request)
    }

    #[tool(
        description = "Find potential collaborators for a researcher based on specialties, shared research interests and location, ranked by score.",
        input_schema = inline_schema_for_type::<MatchCollaboratorsRequest>()
    )]
    async fn match_collaborators(
        &self,
        Parameters(request): Parameters<MatchCollaboratorsRequest>,
    ) -> std::result::Result<String, String> {
        handle_match_collaborators(&self.engine, request).await
    }

    #[tool(
        description = "Add an item to a patient's or researcher's favorites, or remove it if already saved.",
        input_schema = inline_schema_for_type::<ToggleFavoriteRequest>()
    )]
    fn toggle_favorite(
        &self,
        Parameters(request): Parameters<ToggleFavoriteRequest>,
    ) -> std::result::Result<String, String> {
        handle_toggle_favorite(&self.engine, &request)
    }

    #[tool(
        description = "List saved favorites for a patient or researcher, grouped by kind.",
        input_schema = inline_schema_for_type::<ListFavoritesRequest>()
    )]
    fn list_favorites(
        &self,
        Parameters(request): Parameters<ListFavoritesRequest>,
    ) -> std::result::Result<String, String> {
        Ok(handle_list_favorites(&self.engine, &request))
    }
}

#[tool_handler]
impl ServerHandler for MatchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "curalink: matches patients with clinical trials, health experts, publications \
                 and forum threads, and researchers with collaborators. \
                 Normalize free-text input with normalize_condition and normalize_location. \
                 Match tools use the saved profile when condition or location is omitted.",
            )
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this sets `inline_subschemas = true`
/// so enums such as `role` and `kind` render as dropdowns instead of `$ref`s.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();
    let json_object = match serde_json::to_value(schema) {
        Ok(serde_json::Value::Object(object)) => object,
        Ok(_) => {
            tracing::error!("Schema for {} is not an object", std::any::type_name::<T>());
            JsonObject::new()
        }
        Err(e) => {
            tracing::error!("Failed to serialize schema for {}: {}", std::any::type_name::<T>(), e);
            JsonObject::new()
        }
    };

    Arc::new(json_object)
}
