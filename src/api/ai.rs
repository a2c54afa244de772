//! Assistant endpoints' payloads and the answers used when they are down.

use crate::types::{ClinicalTrial, ResearcherProfile};
use serde::{Deserialize, Serialize};

const GREETING_REPLY: &str = "I'm here to help with medical questions and finding researchers. \
                              What specific condition or research area interests you?";
const GENERIC_RESEARCH_REPLY: &str =
    "I can help with research collaboration and academic questions. What would you like to know?";
const DEFAULT_SUGGESTIONS: [&str; 3] = [
    "Consider interdisciplinary collaborations",
    "Explore international partnerships",
    "Join research networks in your field",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionAnalysis {
    pub primary_condition: String,
    #[serde(default)]
    pub identified_conditions: Vec<String>,
}

/// Canned analysis: questions and greetings get a prompt back, anything
/// else is echoed as the condition.
pub fn fallback_analysis(text: &str) -> ConditionAnalysis {
    let lower = text.trim_start().to_lowercase();
    let conversational = text.contains('?') || lower.starts_with("hi") || lower.starts_with("hello");
    ConditionAnalysis {
        primary_condition: if conversational {
            GREETING_REPLY.to_string()
        } else {
            text.to_string()
        },
        identified_conditions: vec![text.to_string()],
    }
}

pub fn fallback_trial_summary(trial: &ClinicalTrial) -> String {
    format!(
        "This trial studies {}. Contact the research team for more details.",
        trial.title
    )
}

/// Body of a research-suggestions request: the researcher plus an optional question.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionRequest<'a> {
    #[serde(flatten)]
    pub profile: &'a ResearcherProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<&'a str>,
}

pub fn fallback_suggestions(request: &SuggestionRequest<'_>) -> Vec<String> {
    match request.question {
        Some(_) if request.profile.specialties.is_empty() => {
            vec![GENERIC_RESEARCH_REPLY.to_string()]
        }
        Some(_) => vec![format!(
            "I can help with research in {}. What specific research challenge are you facing?",
            request.profile.specialties.join(", ")
        )],
        None => DEFAULT_SUGGESTIONS.iter().map(|s| (*s).to_string()).collect(),
    }
}

/// Plain-language overview of a trial for a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialBrief {
    pub summary: String,
    pub key_points: Vec<&'static str>,
    pub risk_level: &'static str,
    pub time_commitment: &'static str,
    pub eligibility: &'static str,
}

struct BriefTemplate {
    matches: fn(&TrialText<'_>) -> bool,
    summary: &'static str,
    key_points: [&'static str; 3],
    risk_level: &'static str,
    time_commitment: &'static str,
    eligibility: &'static str,
}

struct TrialText<'a> {
    title: String,
    description: String,
    phase: &'a str,
    condition: String,
}

impl TrialText<'_> {
    fn mentions(&self, needle: &str) -> bool {
        self.title.contains(needle) || self.description.contains(needle)
    }
}

/// First matching template wins; the last entry always matches.
const BRIEF_TEMPLATES: &[BriefTemplate] = &[
    BriefTemplate {
        matches: |t| t.mentions("immunotherapy"),
        summary: "This trial trains the immune system to recognize and attack diseased cells, \
                  typically with checkpoint inhibitors or engineered T-cells.",
        key_points: ["Immune system training", "Durable responses possible", "Manageable side effects"],
        risk_level: "Moderate",
        time_commitment: "3-6 months",
        eligibility: "Previous treatment history may be required",
    },
    BriefTemplate {
        matches: |t| t.title.contains("targeted therapy") || t.description.contains("targeted"),
        summary: "This trial uses drugs aimed at specific genetic changes in the disease, \
                  usually taken orally with effects visible within weeks.",
        key_points: ["Personalized treatment", "Fewer side effects", "Genetic testing required"],
        risk_level: "Low-Moderate",
        time_commitment: "6-12 months",
        eligibility: "Specific genetic mutations required",
    },
    BriefTemplate {
        matches: |t| t.mentions("combination"),
        summary: "This trial combines several treatments so the disease cannot easily adapt \
                  to a single line of attack.",
        key_points: ["Multi-pronged attack", "Higher success rates", "More monitoring needed"],
        risk_level: "Moderate-High",
        time_commitment: "4-8 months",
        eligibility: "Good overall health status required",
    },
    BriefTemplate {
        matches: |t| t.phase.eq_ignore_ascii_case("phase iii"),
        summary: "This late-stage trial compares the new treatment against standard care \
                  with random assignment. Most such trials precede regulatory approval.",
        key_points: ["Gold standard trial", "Random assignment", "Potential FDA approval"],
        risk_level: "Low-Moderate",
        time_commitment: "6-12 months",
        eligibility: "Specific disease characteristics required",
    },
    BriefTemplate {
        matches: |t| t.phase.eq_ignore_ascii_case("phase ii"),
        summary: "This trial tests how well a treatment with a known safety profile works, \
                  with regular scans to track progress.",
        key_points: ["Proven safety profile", "Effectiveness testing", "Regular monitoring"],
        risk_level: "Moderate",
        time_commitment: "4-6 months",
        eligibility: "Specific disease stage may be required",
    },
    BriefTemplate {
        matches: |t| t.phase.eq_ignore_ascii_case("phase i"),
        summary: "This early trial is among the first to give the treatment to people. \
                  It focuses on safety and dosing under close monitoring.",
        key_points: ["First-in-human trial", "Experimental treatment", "Intensive monitoring"],
        risk_level: "Higher (Unknown)",
        time_commitment: "3-6 months intensive",
        eligibility: "Previous treatments may be required",
    },
    BriefTemplate {
        matches: |t| {
            t.condition.contains("brain") || t.title.contains("glioma") || t.title.contains("glioblastoma")
        },
        summary: "This trial targets tumors in the brain while monitoring cognitive function \
                  and quality of life.",
        key_points: ["Brain-specific delivery", "Cognitive monitoring", "Quality of life focus"],
        risk_level: "Moderate",
        time_commitment: "3-9 months",
        eligibility: "Specific tumor location and type",
    },
    BriefTemplate {
        matches: |_| true,
        summary: "This trial evaluates a new approach against current standard care. Contact \
                  the study team to discuss eligibility and enrollment.",
        key_points: ["Innovative approach", "Standard care comparison", "Medical advancement"],
        risk_level: "To be determined",
        time_commitment: "Varies by study",
        eligibility: "Contact study team for details",
    },
];

/// Build a brief for `trial`, personalized to the patient's condition.
pub fn trial_brief(trial: &ClinicalTrial, condition: &str) -> TrialBrief {
    let text = TrialText {
        title: trial.title.to_lowercase(),
        description: trial.description.as_deref().unwrap_or_default().to_lowercase(),
        phase: trial.phase.trim(),
        condition: condition.to_lowercase(),
    };
    let template = BRIEF_TEMPLATES
        .iter()
        .find(|template| (template.matches)(&text))
        .unwrap_or(&BRIEF_TEMPLATES[BRIEF_TEMPLATES.len() - 1]);

    let summary = if condition.trim().is_empty() {
        template.summary.to_string()
    } else {
        format!("For patients with {}: {}", condition.trim(), template.summary)
    };
    TrialBrief {
        summary,
        key_points: template.key_points.to_vec(),
        risk_level: template.risk_level,
        time_commitment: template.time_commitment,
        eligibility: template.eligibility,
    }
}
