mod common;

use assert2::{check, let_assert};
use common::{FileEngine, engine, file_engine, patient};
use curalink::service::{CuraLink, MeetingOutcome};
use curalink::store::DynStore;
use curalink::types::{
    ClinicalTrial, EntityKind, HealthExpert, MeetingRequestForm, RequestStatus, RequestType,
    ResearcherProfile, Role,
};
use rstest::rstest;

fn external_expert() -> HealthExpert {
    HealthExpert {
        id: 42,
        name: "Dr. Jane Roe".to_string(),
        specialty: "Neuro-Oncology".to_string(),
        institution: "Example Hospital".to_string(),
        location: "Boston, USA".to_string(),
        available_for_meetings: false,
        research_interests: vec!["Glioma".to_string()],
    }
}

fn form() -> MeetingRequestForm {
    MeetingRequestForm {
        patient_name: "Alex Doe".to_string(),
        email: "alex@example.com".to_string(),
        message: "Question about glioma trials".to_string(),
        ..MeetingRequestForm::default()
    }
}

/// Test: Without a backend, a meeting request is queued locally as pending.
#[rstest]
#[tokio::test]
async fn meeting_request_stored_locally_when_offline(engine: CuraLink<DynStore>) {
    let outcome = engine.request_meeting(&external_expert(), form()).await.unwrap();

    let_assert!(MeetingOutcome::StoredLocally(request) = outcome);
    check!(request.status == RequestStatus::Pending);
    check!(request.request_type == RequestType::Admin);
    check!(request.is_external);
    check!(request.expert_name == "Dr. Jane Roe");

    let stored = engine.state().meeting_requests();
    check!(stored.len() == 1);
    check!(stored[0].id == request.id);
}

/// Test: Two queued requests get distinct ids.
#[rstest]
#[tokio::test]
async fn meeting_request_ids_unique(engine: CuraLink<DynStore>) {
    engine.request_meeting(&external_expert(), form()).await.unwrap();
    engine.request_meeting(&external_expert(), form()).await.unwrap();

    let stored = engine.state().meeting_requests();
    check!(stored.len() == 2);
    check!(stored[0].id != stored[1].id);
}

/// Test: Favorites and profiles survive a restart.
#[rstest]
#[tokio::test]
async fn state_persists_across_reopen(file_engine: FileEngine) {
    let engine = &file_engine.engine;
    check!(engine.state().toggle_favorite(Role::Patient, EntityKind::Trial, 7).unwrap());
    engine
        .save_patient_profile(&patient("Glioma", "Toronto, Canada"))
        .await
        .unwrap();

    check!(file_engine.dir().join("patientFavorites.json").is_file());

    let reopened = file_engine.reopen();
    check!(reopened.state().is_favorite(Role::Patient, EntityKind::Trial, 7));
    check!(!reopened.state().is_favorite(Role::Researcher, EntityKind::Trial, 7));
    let_assert!(Some(profile) = reopened.state().patient_profile());
    check!(profile.condition == "Glioma");
}

/// Test: Toggling twice restores the original favorites.
#[rstest]
fn toggle_twice_restores(engine: CuraLink<DynStore>) {
    let state = engine.state();
    let before = state.favorites(Role::Researcher);

    check!(state.toggle_favorite(Role::Researcher, EntityKind::Collaborator, 21).unwrap());
    check!(state.favorited_at(Role::Researcher, EntityKind::Collaborator, 21).is_some());
    check!(!state.toggle_favorite(Role::Researcher, EntityKind::Collaborator, 21).unwrap());

    check!(state.favorites(Role::Researcher) == before);
    check!(state.favorited_at(Role::Researcher, EntityKind::Collaborator, 21).is_none());
}

/// Test: A corrupt state file reads as empty and is replaced on the next write.
#[rstest]
fn corrupt_favorites_file_degrades(file_engine: FileEngine) {
    std::fs::write(file_engine.dir().join("patientFavorites.json"), "{not json").unwrap();

    let state = file_engine.engine.state();
    check!(state.favorites(Role::Patient).is_empty());
    check!(state.toggle_favorite(Role::Patient, EntityKind::Expert, 3).unwrap());
    check!(state.is_favorite(Role::Patient, EntityKind::Expert, 3));
}

/// Test: The admin queue is empty offline, but the visit is still counted.
#[rstest]
#[tokio::test]
async fn admin_queue_offline(engine: CuraLink<DynStore>) {
    check!(engine.admin_queue().await.is_empty());
    engine.admin_queue().await;

    let_assert!(Ok(profile) = engine.state().record_admin_access());
    check!(profile.access_count == 3);
    check!(profile.last_accessed.is_some());
}

/// Test: Collaborators for a Toronto movement-disorders researcher.
#[rstest]
#[tokio::test]
async fn collaborators_for_researcher(engine: CuraLink<DynStore>) {
    let researcher = ResearcherProfile {
        name: "Dr. Test".to_string(),
        institution: "University of Toronto".to_string(),
        location: Some("Toronto, Canada".to_string()),
        specialties: vec!["Movement Disorders Neurology".to_string()],
        research_interests: vec!["Parkinson's Disease".to_string()],
        ..ResearcherProfile::default()
    };
    let results = engine
        .match_collaborators(&researcher, &Default::default())
        .await;

    let_assert!(Some(top) = results.first());
    check!(top.item.location.as_deref() == Some("Toronto, Canada"));
    let scores: Vec<u8> = results.iter().map(|r| r.match_score.value()).collect();
    check!(scores.is_sorted_by(|a, b| a >= b));
}

/// Test: Research suggestions fall back to canned advice offline.
#[rstest]
#[tokio::test]
async fn research_suggestions_fallback(engine: CuraLink<DynStore>) {
    let researcher = ResearcherProfile {
        specialties: vec!["Neuroimaging".to_string()],
        ..ResearcherProfile::default()
    };

    let general = engine.research_suggestions(&researcher, None).await;
    check!(general.len() == 3);

    let answer = engine
        .research_suggestions(&researcher, Some("Who works on ADHD?"))
        .await;
    check!(answer.len() == 1);
    check!(answer[0].contains("Neuroimaging"));
}

/// Test: A trial brief is personalized with the normalized condition.
#[rstest]
fn trial_brief_personalized(engine: CuraLink<DynStore>) {
    let trial = ClinicalTrial {
        id: 10,
        title: "Bevacizumab Plus Radiotherapy for Recurrent Glioma".to_string(),
        phase: "Phase III".to_string(),
        status: "Recruiting".to_string(),
        location: "New York, NY, USA".to_string(),
        description: None,
    };
    let brief = engine.trial_brief(&trial, &patient("glioma", "Toronto"));
    check!(brief.summary.starts_with("For patients with Glioma: "));
}
