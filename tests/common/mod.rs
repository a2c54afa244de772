//! Shared test fixtures for integration tests.
//!
//! Every engine built here runs offline: the API client never opens a
//! socket and all candidates come from the bundled sample data. Scoring is
//! pinned to a fixed year so publication recency does not drift.
//!
//! # Available Fixtures
//!
//! - `engine`: in-memory state, nothing persisted
//! - `file_engine`: state in a fresh temp directory (see [`FileEngine`])
//! - `server`: the MCP server over an in-memory engine

use curalink::config::Config;
use curalink::matching::ScoringContext;
use curalink::server::MatchServer;
use curalink::service::CuraLink;
use curalink::store::{DynStore, FileStore, MemoryStore};
use curalink::types::PatientProfile;
use rstest::fixture;
use std::path::Path;
use tempfile::TempDir;

/// Year the sample publications are scored against.
#[allow(dead_code)]
pub const SCORING_YEAR: i32 = 2024;

/// Offline configuration with default weights.
pub fn offline_config() -> Config {
    curalink::tracing::init();
    Config {
        offline: true,
        ..Config::default()
    }
}

pub fn engine_with_store(store: DynStore) -> CuraLink<DynStore> {
    CuraLink::new(&offline_config(), store)
        .expect("Failed to create engine")
        .with_scoring_context(ScoringContext::new(SCORING_YEAR))
}

#[allow(dead_code)]
pub fn patient(condition: &str, location: &str) -> PatientProfile {
    PatientProfile {
        condition: condition.to_string(),
        location: location.to_string(),
        additional_conditions: vec![],
    }
}

/// An engine whose state lives in a temp directory.
///
/// The directory is removed when this is dropped, so keep it alive for the
/// whole test.
#[allow(dead_code)] // Used by a subset of integration test crates
pub struct FileEngine {
    temp: TempDir,
    pub engine: CuraLink<DynStore>,
}

#[allow(dead_code)]
impl FileEngine {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let engine = engine_with_store(Box::new(FileStore::new(temp.path())));
        Self { temp, engine }
    }

    /// A second engine over the same directory, as a restarted process would see it.
    pub fn reopen(&self) -> CuraLink<DynStore> {
        engine_with_store(Box::new(FileStore::new(self.temp.path())))
    }

    pub fn dir(&self) -> &Path {
        self.temp.path()
    }
}

impl Default for FileEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[fixture]
pub fn engine() -> CuraLink<DynStore> {
    engine_with_store(Box::new(MemoryStore::new()))
}

#[allow(dead_code)]
#[fixture]
pub fn file_engine() -> FileEngine {
    FileEngine::new()
}

#[allow(dead_code)]
#[fixture]
pub fn server() -> MatchServer {
    MatchServer::new(engine_with_store(Box::new(MemoryStore::new())))
}
