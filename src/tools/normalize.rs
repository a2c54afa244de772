//! Condition and location normalization tools.

use crate::format::{format_condition, format_location};
use crate::normalize::{
    condition_suggestions, location_suggestions, process_condition_input, process_location_input,
};
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NormalizeConditionRequest {
    /// Free-text condition, e.g. "I was diagnosed with GBM"
    pub input: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NormalizeLocationRequest {
    /// Free-text location, e.g. "toronto" or "Austin, TX"
    pub input: String,
}

pub fn handle_normalize_condition(request: &NormalizeConditionRequest) -> String {
    let matched = process_condition_input(&request.input);
    // Suggestions only help when nothing was recognized
    let suggestions = if matched.identified_conditions.is_empty() {
        condition_suggestions(&request.input)
    } else {
        Vec::new()
    };
    format_condition(&matched, &suggestions)
}

pub fn handle_normalize_location(request: &NormalizeLocationRequest) -> String {
    let matched = process_location_input(&request.input);
    let suggestions = if matched.country == "Unknown" {
        location_suggestions(&request.input)
    } else {
        Vec::new()
    };
    format_location(&matched, &suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn test_condition_tool_output() {
        let output = handle_normalize_condition(&NormalizeConditionRequest {
            input: "diagnosed with glioblastoma".into(),
        });
        check!(output.contains("Primary condition: Glioblastoma"));
        check!(!output.contains("Suggestions"));
    }

    #[test]
    fn test_location_tool_output() {
        let output = handle_normalize_location(&NormalizeLocationRequest {
            input: "toronto".into(),
        });
        check!(output.contains("Location: Toronto, Canada"));
    }
}
