mod common;

use assert2::{check, let_assert};
use common::{engine, server};
use curalink::server::MatchServer;
use curalink::service::CuraLink;
use curalink::store::DynStore;
use curalink::tools::{
    ListFavoritesRequest, MatchCollaboratorsRequest, MatchExpertsRequest, MatchForumPostsRequest,
    MatchPublicationsRequest, MatchTrialsRequest, NormalizeConditionRequest,
    NormalizeLocationRequest, ToggleFavoriteRequest, handle_list_favorites,
    handle_match_collaborators, handle_match_experts, handle_match_forum_posts,
    handle_match_publications, handle_match_trials, handle_normalize_condition,
    handle_normalize_location, handle_toggle_favorite,
};
use curalink::types::{EntityKind, Role};
use rmcp::ServerHandler;
use rstest::rstest;

fn args<T: serde::de::DeserializeOwned>(json: serde_json::Value) -> T {
    serde_json::from_value(json).expect("Invalid tool arguments")
}

// --- Normalization ---

#[rstest]
#[case("I was diagnosed with glioblastoma", "Primary condition: Glioblastoma")]
#[case("brain cancer", "Primary condition: Brain Cancer")]
fn normalize_condition_tool(#[case] input: &str, #[case] expected: &str) {
    let output = handle_normalize_condition(&NormalizeConditionRequest {
        input: input.to_string(),
    });
    check!(output.contains(expected), "Unexpected output: {}", output);
}

#[test]
fn normalize_unknown_location_offers_suggestions() {
    let output = handle_normalize_location(&NormalizeLocationRequest {
        input: "Toront".to_string(),
    });
    check!(output.contains("Country: Unknown"));
    check!(output.contains("Suggestions:"));
}

// --- Matching ---

/// Test: Tool arguments with flattened filters parse and produce a listing.
#[rstest]
#[tokio::test]
async fn match_trials_tool(engine: CuraLink<DynStore>) {
    let request: MatchTrialsRequest = args(serde_json::json!({
        "condition": "Multiple System Atrophy",
        "location": "Toronto",
        "limit": 2
    }));
    let output = handle_match_trials(&engine, request).await.unwrap();

    check!(output.starts_with("Found 2 clinical trials:"));
    check!(output.contains("Multiple System Atrophy Natural History Study [#1]"));
    check!(output.contains("Local"));
}

/// Test: A site filter narrows trials without replacing the patient's location.
#[rstest]
#[tokio::test]
async fn match_trials_site_filter(engine: CuraLink<DynStore>) {
    let unfiltered: MatchTrialsRequest = args(serde_json::json!({
        "condition": "Ductal Carcinoma in Situ",
        "location": "Toronto"
    }));
    let output = handle_match_trials(&engine, unfiltered).await.unwrap();
    check!(output.contains("[#4]"));

    let request: MatchTrialsRequest = args(serde_json::json!({
        "condition": "Ductal Carcinoma in Situ",
        "location": "Toronto",
        "site": "Los Angeles"
    }));
    check!(request.patient.location.as_deref() == Some("Toronto"));
    let output = handle_match_trials(&engine, request).await.unwrap();

    check!(output.contains("Ductal Carcinoma in Situ Active Surveillance Study [#3]"));
    check!(!output.contains("[#4]"), "Multi-center trial kept: {}", output);
    check!(!output.contains("[#15]"));
}

/// Test: Omitted condition falls back to the saved profile.
#[rstest]
#[tokio::test]
async fn match_experts_uses_saved_profile(engine: CuraLink<DynStore>) {
    let missing: MatchExpertsRequest = args(serde_json::json!({}));
    let_assert!(Err(message) = handle_match_experts(&engine, missing).await);
    check!(message.contains("No condition given"));

    engine
        .save_patient_profile(&common::patient("ADHD", "Amsterdam"))
        .await
        .unwrap();
    let saved: MatchExpertsRequest = args(serde_json::json!({ "limit": 3 }));
    let output = handle_match_experts(&engine, saved).await.unwrap();
    check!(output.starts_with("Found 3 health experts:"));
}

#[rstest]
#[tokio::test]
async fn match_publications_journal_filter(engine: CuraLink<DynStore>) {
    let request: MatchPublicationsRequest = args(serde_json::json!({
        "condition": "Depression",
        "journal": "lancet"
    }));
    let output = handle_match_publications(&engine, request).await.unwrap();

    check!(output.contains("The Lancet Psychiatry"));
    check!(!output.contains("Nature Medicine"));
}

#[rstest]
fn match_forum_posts_tool(engine: CuraLink<DynStore>) {
    let request: MatchForumPostsRequest = args(serde_json::json!({
        "condition": "heart disease",
        "sort": "popular"
    }));
    let output = handle_match_forum_posts(&engine, &request).unwrap();
    check!(output.starts_with("Found 2 forum posts:"));
}

#[rstest]
#[tokio::test]
async fn match_collaborators_requires_focus(engine: CuraLink<DynStore>) {
    let empty: MatchCollaboratorsRequest = args(serde_json::json!({}));
    check!(handle_match_collaborators(&engine, empty).await.is_err());

    let request: MatchCollaboratorsRequest = args(serde_json::json!({
        "specialties": ["Proteomics"],
        "research_interests": ["Recurrent Glioma"],
        "location": "New York, USA"
    }));
    let output = handle_match_collaborators(&engine, request).await.unwrap();
    check!(output.contains("Dr. Amanda Paulovich"));
}

// --- Favorites ---

/// Test: Favorited items are starred in later listings.
#[rstest]
#[tokio::test]
async fn favorites_round_trip(engine: CuraLink<DynStore>) {
    let toggle: ToggleFavoriteRequest = args(serde_json::json!({
        "role": "patient",
        "kind": "trial",
        "id": 1
    }));
    let added = handle_toggle_favorite(&engine, &toggle).unwrap();
    check!(added == "Added trials #1 to patient favorites.");

    let list = handle_list_favorites(&engine, &ListFavoritesRequest { role: Role::Patient });
    check!(list.contains("• trials: 1"));
    let researcher = handle_list_favorites(
        &engine,
        &ListFavoritesRequest {
            role: Role::Researcher,
        },
    );
    check!(researcher == "No favorites saved.");

    let trials: MatchTrialsRequest = args(serde_json::json!({
        "condition": "Multiple System Atrophy",
        "location": "Toronto",
        "limit": 1
    }));
    let output = handle_match_trials(&engine, trials).await.unwrap();
    let line = output.lines().find(|l| l.contains("[#1]")).unwrap();
    check!(line.ends_with('★'));

    let removed = handle_toggle_favorite(&engine, &toggle).unwrap();
    check!(removed.starts_with("Removed"));
    check!(!engine.state().is_favorite(Role::Patient, EntityKind::Trial, 1));
}

// --- Server ---

#[rstest]
fn server_info_advertises_tools(server: MatchServer) {
    let info = server.get_info();
    check!(info.capabilities.tools.is_some());
    let_assert!(Some(instructions) = info.instructions);
    check!(instructions.contains("normalize_condition"));
}
