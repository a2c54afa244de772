//! Medical condition identification from free-text input.
//!
//! Matching is case-insensitive substring containment against a fixed list of
//! canonical conditions and a synonym table, followed by a few phrase
//! patterns ("diagnosed with ..."). When nothing in the tables matches, a
//! best-guess name is extracted from the text and title-cased.

use super::title_case;
use rapidfuzz::distance::jaro_winkler;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Canonical condition names, in priority order.
pub const MEDICAL_CONDITIONS: &[&str] = &[
    // Cancer types
    "Brain Cancer",
    "Lung Cancer",
    "Breast Cancer",
    "Prostate Cancer",
    "Colon Cancer",
    "Glioblastoma",
    "Glioma",
    "Melanoma",
    "Leukemia",
    "Lymphoma",
    "Sarcoma",
    // Neurological
    "Alzheimer Disease",
    "Parkinson Disease",
    "Epilepsy",
    "Multiple Sclerosis",
    "Stroke",
    "Migraine",
    "ADHD",
    "Attention-Deficit/Hyperactivity Disorder (ADHD)",
    "Attention Deficit Hyperactivity Disorder",
    "Multiple System Atrophy",
    "Ductal Carcinoma in Situ",
    "DCIS",
    // Cardiovascular
    "Heart Disease",
    "Hypertension",
    "Diabetes",
    "High Blood Pressure",
    "Cardiac Disease",
    // Other
    "Arthritis",
    "Asthma",
    "Depression",
    "Anxiety",
    "Obesity",
    "Kidney Disease",
    "Liver Disease",
    "Autoimmune Disease",
    "Fibromyalgia",
    "Chronic Pain",
    "Major Depressive Disorder",
    "Major Depressive Disorder (Depression)",
    "Treatment-Resistant Depression",
];

/// Lay terms and abbreviations mapped to their canonical condition.
pub const CONDITION_SYNONYMS: &[(&str, &str)] = &[
    ("tumor", "Brain Cancer"),
    ("tumour", "Brain Cancer"),
    ("malignancy", "Brain Cancer"),
    ("carcinoma", "Brain Cancer"),
    ("oncology", "Brain Cancer"),
    ("brain tumor", "Brain Cancer"),
    ("brain tumour", "Brain Cancer"),
    ("gbm", "Glioblastoma"),
    ("heart attack", "Heart Disease"),
    ("cardiovascular", "Heart Disease"),
    ("high bp", "Hypertension"),
    ("mental health", "Depression"),
    ("ptsd", "Anxiety"),
    ("adhd", "ADHD"),
    ("attention deficit", "ADHD"),
    ("hyperactivity", "ADHD"),
    ("add", "ADHD"),
    ("major depression", "Major Depressive Disorder"),
    ("mdd", "Major Depressive Disorder"),
    ("clinical depression", "Depression"),
    ("depressive disorder", "Major Depressive Disorder"),
    ("type 1 diabetes", "Diabetes"),
    ("type 2 diabetes", "Diabetes"),
    ("diabetic", "Diabetes"),
];

/// Confidence reported when at least one table entry matched.
pub const MATCHED_CONFIDENCE: f32 = 0.8;
/// Confidence reported for a guessed condition.
pub const GUESSED_CONFIDENCE: f32 = 0.3;

/// Synonyms this short must match a whole word ("add" must not hit "address").
const SHORT_TERM_LEN: usize = 3;
/// Inputs shorter than this are not matched in reverse against condition names.
const MIN_REVERSE_LEN: usize = 3;
const MAX_SUGGESTIONS: usize = 5;
const FUZZY_THRESHOLD: f64 = 0.85;

static PHRASE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"diagnosed with (.+?)(?:\s|$|,|\.)",
        r"have (.+?)(?:\s|$|,|\.)",
        r"suffering from (.+?)(?:\s|$|,|\.)",
        r"treatment for (.+?)(?:\s|$|,|\.)",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){p}")).expect("static pattern"))
    .collect()
});

static EXTRACT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:diagnosed with|have|suffering from|treatment for)\s+(.+?)(?:\s*[,.]|$)",
        r"(.+?)\s*(?:cancer|disease|disorder|condition)",
        r"^(.+?)$",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){p}")).expect("static pattern"))
    .collect()
});

/// Result of interpreting a free-text condition description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionMatch {
    pub original_input: String,
    /// Every canonical condition the input matched, in discovery order.
    pub identified_conditions: Vec<String>,
    /// First identified condition, or a title-cased guess.
    pub primary_condition: String,
    pub confidence: f32,
}

/// Identify canonical conditions in `input`. Never fails.
pub fn process_condition_input(input: &str) -> ConditionMatch {
    let normalized = input.trim().to_lowercase();
    let mut identified: Vec<String> = Vec::new();

    if !normalized.is_empty() {
        let reverse = normalized.chars().count() >= MIN_REVERSE_LEN;
        for condition in MEDICAL_CONDITIONS {
            let lower = condition.to_lowercase();
            if normalized.contains(&lower) || (reverse && lower.contains(&normalized)) {
                push_unique(&mut identified, condition);
            }
        }

        for (synonym, canonical) in CONDITION_SYNONYMS {
            if contains_term(&normalized, synonym) {
                push_unique(&mut identified, canonical);
            }
        }

        for pattern in PHRASE_PATTERNS.iter() {
            let Some(fragment) = pattern.captures(&normalized).and_then(|c| c.get(1)) else {
                continue;
            };
            let fragment = fragment.as_str().trim();
            for condition in MEDICAL_CONDITIONS {
                if fragment.contains(&condition.to_lowercase()) {
                    push_unique(&mut identified, condition);
                }
            }
        }
    }

    let (primary_condition, confidence) = match identified.first() {
        Some(first) => (first.clone(), MATCHED_CONFIDENCE),
        None => (guess_condition(input), GUESSED_CONFIDENCE),
    };

    ConditionMatch {
        original_input: input.to_string(),
        identified_conditions: identified,
        primary_condition,
        confidence,
    }
}

/// Up to five canonical conditions related to `input`.
///
/// Substring matches in either direction come first; when there are none,
/// close spellings are offered instead.
pub fn condition_suggestions(input: &str) -> Vec<String> {
    let normalized = input.trim().to_lowercase();
    if normalized.is_empty() {
        return Vec::new();
    }

    let direct: Vec<String> = MEDICAL_CONDITIONS
        .iter()
        .filter(|condition| {
            let lower = condition.to_lowercase();
            lower.contains(&normalized) || normalized.contains(&lower)
        })
        .take(MAX_SUGGESTIONS)
        .map(|c| (*c).to_string())
        .collect();
    if !direct.is_empty() {
        return direct;
    }

    let mut fuzzy: Vec<(f64, &str)> = MEDICAL_CONDITIONS
        .iter()
        .map(|condition| {
            let lower = condition.to_lowercase();
            (
                jaro_winkler::similarity(normalized.chars(), lower.chars()),
                *condition,
            )
        })
        .filter(|(score, _)| *score >= FUZZY_THRESHOLD)
        .collect();
    fuzzy.sort_by(|a, b| b.0.total_cmp(&a.0));
    fuzzy
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, c)| c.to_string())
        .collect()
}

fn guess_condition(input: &str) -> String {
    EXTRACT_PATTERNS
        .iter()
        .find_map(|pattern| {
            pattern
                .captures(input)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
        })
        .map(|raw| title_case(&raw))
        .unwrap_or_default()
}

fn contains_term(haystack: &str, term: &str) -> bool {
    if term.len() > SHORT_TERM_LEN {
        return haystack.contains(term);
    }
    haystack
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word == term)
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}
