//! Free-text normalization of user-entered conditions and locations.

pub mod condition;
pub mod location;

pub use condition::{ConditionMatch, condition_suggestions, process_condition_input};
pub use location::{LocationMatch, city_country, location_suggestions, process_location_input};

/// Capitalize the first letter of each space-separated word and lowercase the rest.
pub(crate) fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
