//! Patient and researcher matching for a healthcare research platform.
//!
//! Free-text conditions and locations are normalized to canonical names,
//! candidates (clinical trials, health experts, publications, forum threads,
//! collaborators) are fetched from the backend or sample data, scored 0-100
//! and ranked. Favorites, profiles and queued meeting requests persist in a
//! small key-value store.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod matching;
pub mod normalize;
pub mod search;
pub mod server;
pub mod service;
pub mod store;
pub mod tools;
pub mod tracing;
pub mod types;

pub use config::Config;
pub use error::{ApiError, ConfigError, Result, StoreError};
pub use matching::{LocationTier, MatchScore, Scored};
pub use service::CuraLink;
