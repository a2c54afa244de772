//! Backend API access.
//!
//! [`ApiClient`] talks to the CuraLink HTTP backend. When the backend is
//! unreachable, read endpoints answer from [`mock`] and the assistant
//! endpoints from the canned answers in [`ai`].

pub mod ai;
mod client;
pub mod mock;

pub use ai::{ConditionAnalysis, SuggestionRequest, TrialBrief, trial_brief};
pub use client::{ApiClient, MeetingReceipt};
