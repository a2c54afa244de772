//! Domain records exchanged with the backend API and kept in local state.
//!
//! Records are plain serde structs. Field names follow the backend's
//! `snake_case` wire format; the camelCase spellings the web client wrote into
//! local storage are accepted as aliases so older blobs still load.

use rmcp::schemars;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric identifier, unique only within one [`EntityKind`].
pub type ItemId = i64;

/// Which side of the platform a profile or favorites set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Researcher,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Researcher => "researcher",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "patient" => Ok(Self::Patient),
            "researcher" => Ok(Self::Researcher),
            other => Err(format!("unknown role '{}' (expected patient or researcher)", other)),
        }
    }
}

/// The kinds of candidate items that can be scored and favorited.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    #[serde(alias = "trials")]
    Trial,
    #[serde(alias = "experts")]
    Expert,
    #[serde(alias = "publications")]
    Publication,
    #[serde(alias = "forum_posts", alias = "forums")]
    ForumPost,
    #[serde(alias = "collaborators")]
    Collaborator,
}

impl EntityKind {
    pub const ALL: [Self; 5] = [
        Self::Trial,
        Self::Expert,
        Self::Publication,
        Self::ForumPost,
        Self::Collaborator,
    ];

    /// Key used for this kind inside a persisted favorites object.
    pub const fn favorites_key(self) -> &'static str {
        match self {
            Self::Trial => "trials",
            Self::Expert => "experts",
            Self::Publication => "publications",
            Self::ForumPost => "forum_posts",
            Self::Collaborator => "collaborators",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.favorites_key())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trial" | "trials" => Ok(Self::Trial),
            "expert" | "experts" => Ok(Self::Expert),
            "publication" | "publications" => Ok(Self::Publication),
            "forum" | "forums" | "forum_post" | "forum_posts" => Ok(Self::ForumPost),
            "collaborator" | "collaborators" => Ok(Self::Collaborator),
            other => Err(format!(
                "unknown entity kind '{}' (expected trial, expert, publication, forum_post or collaborator)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub condition: String,
    pub location: String,
    #[serde(default, alias = "additionalConditions")]
    pub additional_conditions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaborationStatus {
    Open,
    Selective,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactPreference {
    Direct,
    ThroughAdmin,
    EmailOnly,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearcherProfile {
    pub name: String,
    pub institution: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default, alias = "researchInterests")]
    pub research_interests: Vec<String>,
    #[serde(default)]
    pub orcid: Option<String>,
    #[serde(default, alias = "researchGate")]
    pub research_gate: Option<String>,
    #[serde(default, alias = "availableForMeetings")]
    pub available_for_meetings: bool,
    #[serde(default, alias = "collaborationStatus")]
    pub collaboration_status: Option<CollaborationStatus>,
    #[serde(default, alias = "contactPreference")]
    pub contact_preference: Option<ContactPreference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalTrial {
    pub id: ItemId,
    pub title: String,
    pub phase: String,
    pub status: String,
    pub location: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthExpert {
    pub id: ItemId,
    pub name: String,
    pub specialty: String,
    pub institution: String,
    pub location: String,
    #[serde(default, alias = "availableForMeetings")]
    pub available_for_meetings: bool,
    #[serde(default, alias = "researchInterests")]
    pub research_interests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub id: ItemId,
    pub title: String,
    pub journal: String,
    #[serde(default)]
    pub authors: Vec<String>,
    pub date: String,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub pmid: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorType {
    Patient,
    Researcher,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumReply {
    pub id: ItemId,
    pub content: String,
    pub author: String,
    #[serde(alias = "authorType")]
    pub author_type: AuthorType,
    #[serde(default)]
    pub credentials: Option<String>,
    pub time: String,
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default, alias = "isUpvoted")]
    pub is_upvoted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumPost {
    pub id: ItemId,
    pub title: String,
    pub content: String,
    pub category: String,
    pub author: String,
    #[serde(alias = "authorType")]
    pub author_type: AuthorType,
    pub time: String,
    #[serde(default)]
    pub replies: Vec<ForumReply>,
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default, alias = "isUpvoted")]
    pub is_upvoted: bool,
}

impl ForumPost {
    /// Flip the caller's upvote on this post, adjusting the count to match.
    pub fn toggle_upvote(&mut self) {
        if self.is_upvoted {
            self.upvotes = self.upvotes.saturating_sub(1);
        } else {
            self.upvotes += 1;
        }
        self.is_upvoted = !self.is_upvoted;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    pub id: ItemId,
    pub name: String,
    pub specialty: String,
    pub institution: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub publications: u32,
    #[serde(default, alias = "researchInterests")]
    pub research_interests: Vec<String>,
    #[serde(default, alias = "collaborationStatus")]
    pub collaboration_status: Option<CollaborationStatus>,
}

/// Lifecycle of a meeting request as tracked by patients and the admin queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Contacted,
    Completed,
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" | "accepted" => Ok(Self::Approved),
            "rejected" | "declined" => Ok(Self::Rejected),
            "contacted" => Ok(Self::Contacted),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown request status '{}'", other)),
        }
    }
}

/// How a meeting request reaches the expert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    /// The expert is on the platform and receives the request directly.
    Direct,
    /// The expert is external; an admin forwards the invitation.
    Admin,
}

/// Form fields a patient fills in when asking an expert for a meeting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingRequestForm {
    #[serde(alias = "patientName")]
    pub patient_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, alias = "preferredDate")]
    pub preferred_date: String,
    #[serde(default, alias = "preferredTime")]
    pub preferred_time: String,
    #[serde(default = "default_meeting_type", alias = "meetingType")]
    pub meeting_type: String,
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_urgency")]
    pub urgency: String,
}

fn default_meeting_type() -> String {
    "video".to_string()
}

fn default_urgency() -> String {
    "normal".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingRequest {
    pub id: ItemId,
    #[serde(alias = "expertId")]
    pub expert_id: ItemId,
    #[serde(alias = "expertName")]
    pub expert_name: String,
    #[serde(flatten)]
    pub form: MeetingRequestForm,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default, alias = "isExternal")]
    pub is_external: bool,
    #[serde(alias = "requestType")]
    pub request_type: RequestType,
    #[serde(alias = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A request as listed in the admin queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub expert_name: Option<String>,
    pub status: RequestStatus,
    pub created_at: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub urgency: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    #[rstest]
    #[case("trial", EntityKind::Trial)]
    #[case("Trials", EntityKind::Trial)]
    #[case("forums", EntityKind::ForumPost)]
    #[case(" collaborator ", EntityKind::Collaborator)]
    fn test_entity_kind_parsing(#[case] input: &str, #[case] expected: EntityKind) {
        let_assert!(Ok(kind) = input.parse::<EntityKind>());
        check!(kind == expected);
    }

    #[test]
    fn test_entity_kind_rejects_unknown() {
        check!("meeting".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_legacy_camel_case_expert_loads() {
        let json = r#"{
            "id": 3,
            "name": "Dr. Anthony Lang",
            "specialty": "Movement Disorders Neurology",
            "institution": "Toronto Western Hospital",
            "location": "Toronto, Canada",
            "availableForMeetings": true,
            "researchInterests": ["Parkinson's Disease"]
        }"#;
        let expert: HealthExpert = serde_json::from_str(json).unwrap();
        check!(expert.available_for_meetings);
        check!(expert.research_interests == vec!["Parkinson's Disease".to_string()]);
    }

    #[test]
    fn test_publication_abstract_field_name() {
        let json = r#"{"id":1,"title":"T","journal":"Nature","date":"2024","abstract":"text"}"#;
        let publication: Publication = serde_json::from_str(json).unwrap();
        check!(publication.abstract_text.as_deref() == Some("text"));
        check!(publication.authors.is_empty());
    }

    #[test]
    fn test_toggle_upvote_twice_restores_count() {
        let mut post = ForumPost {
            id: 1,
            title: "t".into(),
            content: "c".into(),
            category: "General Health".into(),
            author: "a".into(),
            author_type: AuthorType::Patient,
            time: "now".into(),
            replies: vec![],
            upvotes: 4,
            is_upvoted: false,
        };
        post.toggle_upvote();
        check!(post.upvotes == 5);
        check!(post.is_upvoted);
        post.toggle_upvote();
        check!(post.upvotes == 4);
        check!(!post.is_upvoted);
    }
}
