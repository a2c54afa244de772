//! Persisted client-side state.
//!
//! A [`KeyValueStore`] holds JSON text under string keys. [`LocalState`]
//! layers the typed read-modify-write operations (favorites, meeting
//! requests, profiles) on top of any store.

mod file;
mod memory;
mod state;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use state::{AdminProfile, Favorites, LocalState};

use crate::error::StoreError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// String-keyed storage of JSON values. Last write wins per key.
pub trait KeyValueStore: Send + Sync {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// All keys currently stored, sorted.
    fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Read and decode a value.
    ///
    /// A missing key, an unreadable backend or undecodable JSON all yield
    /// `None`; the latter two are logged.
    fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T>
    where
        Self: Sized,
    {
        let raw = match self.get_raw(key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Failed to read '{}', using empty value: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Corrupt JSON under '{}', using empty value: {}", key, e);
                None
            }
        }
    }

    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError>
    where
        Self: Sized,
    {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.set_raw(key, &raw)
    }
}

/// A store chosen at runtime.
pub type DynStore = Box<dyn KeyValueStore>;

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_raw(key)
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_raw(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        (**self).keys()
    }
}

/// Well-known storage keys. The names match what the web client used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    PatientProfile,
    ResearcherProfile,
    PatientFavorites,
    ResearcherFavorites,
    FavoriteDates,
    MeetingRequests,
    AdminRequestStatus,
    PatientActiveTab,
    ResearcherActiveTab,
    AdminProfile,
}

impl StorageKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PatientProfile => "patientProfile",
            Self::ResearcherProfile => "researcherProfile",
            Self::PatientFavorites => "patientFavorites",
            Self::ResearcherFavorites => "researcherFavorites",
            Self::FavoriteDates => "favoriteDates",
            Self::MeetingRequests => "meetingRequests",
            Self::AdminRequestStatus => "adminRequestStatus",
            Self::PatientActiveTab => "patientActiveTab",
            Self::ResearcherActiveTab => "researcherActiveTab",
            Self::AdminProfile => "adminProfile",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keys must be usable as plain file names.
pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    #[test]
    fn test_typed_roundtrip_and_corrupt_value() {
        let store = MemoryStore::new();
        store.set("numbers", &vec![1, 2, 3]).unwrap();
        check!(store.get::<Vec<i32>>("numbers") == Some(vec![1, 2, 3]));

        store.set_raw("broken", "{not json").unwrap();
        check!(store.get::<Vec<i32>>("broken").is_none());
        check!(store.get::<Vec<i32>>("missing").is_none());
    }

    #[rstest]
    #[case("patientFavorites", true)]
    #[case("meeting-requests_2", true)]
    #[case("", false)]
    #[case("../etc/passwd", false)]
    #[case("a b", false)]
    fn test_validate_key(#[case] key: &str, #[case] ok: bool) {
        check!(validate_key(key).is_ok() == ok);
    }

    #[test]
    fn test_invalid_key_error() {
        let_assert!(Err(StoreError::InvalidKey(key)) = validate_key("a/b"));
        check!(key == "a/b");
    }
}
