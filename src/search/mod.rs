//! Dashboard-side filtering applied to fetched items before scoring.
//!
//! Filters are plain structs deserialized from tool arguments or built from
//! CLI flags. An unset field never excludes anything.

pub(crate) mod filter;
pub(crate) mod keywords;

pub use filter::{
    CollaboratorFilter, ExpertFilter, Filter, ForumFilter, PublicationFilter, TrialFilter,
    apply_filter,
};
pub use keywords::keyword_terms;
