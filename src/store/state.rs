use super::{KeyValueStore, StorageKey};
use crate::error::StoreError;
use crate::types::{
    EntityKind, ItemId, MeetingRequest, MeetingRequestForm, PatientProfile, RequestStatus,
    RequestType, ResearcherProfile, Role,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;

const DEFAULT_TAB: &str = "overview";

/// Favorited ids per entity kind, persisted as `{"trials": [1, 4], ...}`.
///
/// Older blobs stored whole item objects instead of ids; those load too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites(
    #[serde(deserialize_with = "deserialize_favorite_ids")] BTreeMap<String, Vec<ItemId>>,
);

impl Favorites {
    pub fn ids(&self, kind: EntityKind) -> &[ItemId] {
        self.0
            .get(kind.favorites_key())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, kind: EntityKind, id: ItemId) -> bool {
        self.ids(kind).contains(&id)
    }

    /// Add the id if absent, otherwise remove it. Returns whether it is now a favorite.
    pub fn toggle(&mut self, kind: EntityKind, id: ItemId) -> bool {
        let key = kind.favorites_key();
        let ids = self.0.entry(key.to_string()).or_default();
        if ids.contains(&id) {
            ids.retain(|existing| *existing != id);
            // Empty kinds are never kept
            if ids.is_empty() {
                self.0.remove(key);
            }
            false
        } else {
            ids.push(id);
            true
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Non-empty kinds in [`EntityKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, &[ItemId])> {
        EntityKind::ALL
            .into_iter()
            .map(|kind| (kind, self.ids(kind)))
            .filter(|(_, ids)| !ids.is_empty())
    }
}

fn deserialize_favorite_ids<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<ItemId>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Id(ItemId),
        Item { id: ItemId },
    }

    let raw: BTreeMap<String, Vec<Entry>> = BTreeMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(kind, entries)| {
            let ids = entries
                .into_iter()
                .map(|entry| match entry {
                    Entry::Id(id) | Entry::Item { id } => id,
                })
                .collect::<Vec<_>>();
            (kind, ids)
        })
        .filter(|(_, ids)| !ids.is_empty())
        .collect())
}

/// Bookkeeping for the admin console.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    #[serde(default, alias = "lastAccessed")]
    pub last_accessed: Option<DateTime<Utc>>,
    #[serde(default, alias = "accessCount")]
    pub access_count: u64,
}

/// Typed repository over a [`KeyValueStore`].
///
/// Reads never fail: missing or corrupt entries come back as the empty
/// value. Read-modify-write operations are serialized within one process.
#[derive(Debug)]
pub struct LocalState<S> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> LocalState<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    fn read<T: for<'de> Deserialize<'de>>(&self, key: StorageKey) -> Option<T> {
        self.store.get(key.as_str())
    }

    fn write<T: Serialize>(&self, key: StorageKey, value: &T) -> Result<(), StoreError> {
        self.store.set(key.as_str(), value)
    }

    /// Run a read-modify-write without interleaving with another one.
    fn update<T, R>(
        &self,
        key: StorageKey,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, StoreError>
    where
        T: Default + Serialize + for<'de> Deserialize<'de>,
    {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut value: T = self.read(key).unwrap_or_default();
        let result = f(&mut value);
        self.write(key, &value)?;
        Ok(result)
    }

    pub fn patient_profile(&self) -> Option<PatientProfile> {
        self.read(StorageKey::PatientProfile)
    }

    pub fn save_patient_profile(&self, profile: &PatientProfile) -> Result<(), StoreError> {
        self.write(StorageKey::PatientProfile, profile)
    }

    pub fn researcher_profile(&self) -> Option<ResearcherProfile> {
        self.read(StorageKey::ResearcherProfile)
    }

    pub fn save_researcher_profile(&self, profile: &ResearcherProfile) -> Result<(), StoreError> {
        self.write(StorageKey::ResearcherProfile, profile)
    }

    pub fn favorites(&self, role: Role) -> Favorites {
        self.read(favorites_key(role)).unwrap_or_default()
    }

    pub fn is_favorite(&self, role: Role, kind: EntityKind, id: ItemId) -> bool {
        self.favorites(role).contains(kind, id)
    }

    /// Flip one favorite and persist. Returns whether the item is now a favorite.
    pub fn toggle_favorite(
        &self,
        role: Role,
        kind: EntityKind,
        id: ItemId,
    ) -> Result<bool, StoreError> {
        let added = self.update(favorites_key(role), |favorites: &mut Favorites| {
            favorites.toggle(kind, id)
        })?;

        let date_key = favorite_date_key(role, kind, id);
        self.update(
            StorageKey::FavoriteDates,
            |dates: &mut BTreeMap<String, DateTime<Utc>>| {
                if added {
                    dates.insert(date_key, Utc::now());
                } else {
                    dates.remove(&date_key);
                }
            },
        )?;

        tracing::debug!(
            "{} {} {} for {}",
            if added { "Favorited" } else { "Unfavorited" },
            kind,
            id,
            role.as_str()
        );
        Ok(added)
    }

    /// When an item was favorited, if it still is.
    pub fn favorited_at(&self, role: Role, kind: EntityKind, id: ItemId) -> Option<DateTime<Utc>> {
        let dates: BTreeMap<String, DateTime<Utc>> =
            self.read(StorageKey::FavoriteDates).unwrap_or_default();
        dates.get(&favorite_date_key(role, kind, id)).copied()
    }

    pub fn meeting_requests(&self) -> Vec<MeetingRequest> {
        self.read(StorageKey::MeetingRequests).unwrap_or_default()
    }

    /// Append a new `pending` request and return it.
    ///
    /// Experts not on the platform are routed through the admin queue.
    pub fn add_meeting_request(
        &self,
        expert_id: ItemId,
        expert_name: &str,
        form: MeetingRequestForm,
        expert_on_platform: bool,
    ) -> Result<MeetingRequest, StoreError> {
        self.update(
            StorageKey::MeetingRequests,
            |requests: &mut Vec<MeetingRequest>| {
                let now = Utc::now();
                let last_id = requests.iter().map(|r| r.id).max().unwrap_or(0);
                let request = MeetingRequest {
                    id: now.timestamp_millis().max(last_id + 1),
                    expert_id,
                    expert_name: expert_name.to_string(),
                    form,
                    status: RequestStatus::Pending,
                    is_external: !expert_on_platform,
                    request_type: if expert_on_platform {
                        RequestType::Direct
                    } else {
                        RequestType::Admin
                    },
                    created_at: now,
                };
                requests.push(request.clone());
                request
            },
        )
    }

    /// Set the status of a stored request. Returns `false` if no request has that id.
    pub fn update_meeting_request_status(
        &self,
        id: ItemId,
        status: RequestStatus,
    ) -> Result<bool, StoreError> {
        self.update(
            StorageKey::MeetingRequests,
            |requests: &mut Vec<MeetingRequest>| {
                requests
                    .iter_mut()
                    .find(|r| r.id == id)
                    .map(|r| r.status = status)
                    .is_some()
            },
        )
    }

    /// Admin-side status overrides keyed by admin request id.
    pub fn admin_request_status(&self) -> BTreeMap<String, RequestStatus> {
        self.read(StorageKey::AdminRequestStatus).unwrap_or_default()
    }

    pub fn set_admin_request_status(
        &self,
        request_id: &str,
        status: RequestStatus,
    ) -> Result<(), StoreError> {
        self.update(
            StorageKey::AdminRequestStatus,
            |overrides: &mut BTreeMap<String, RequestStatus>| {
                overrides.insert(request_id.to_string(), status);
            },
        )
    }

    /// Count one admin console visit and return the updated record.
    pub fn record_admin_access(&self) -> Result<AdminProfile, StoreError> {
        self.update(StorageKey::AdminProfile, |profile: &mut AdminProfile| {
            profile.access_count += 1;
            profile.last_accessed = Some(Utc::now());
            profile.clone()
        })
    }

    pub fn active_tab(&self, role: Role) -> String {
        self.read(active_tab_key(role))
            .unwrap_or_else(|| DEFAULT_TAB.to_string())
    }

    pub fn set_active_tab(&self, role: Role, tab: &str) -> Result<(), StoreError> {
        self.write(active_tab_key(role), &tab)
    }
}

const fn favorites_key(role: Role) -> StorageKey {
    match role {
        Role::Patient => StorageKey::PatientFavorites,
        Role::Researcher => StorageKey::ResearcherFavorites,
    }
}

const fn active_tab_key(role: Role) -> StorageKey {
    match role {
        Role::Patient => StorageKey::PatientActiveTab,
        Role::Researcher => StorageKey::ResearcherActiveTab,
    }
}

fn favorite_date_key(role: Role, kind: EntityKind, id: ItemId) -> String {
    format!("{}_{}_{}", role.as_str(), kind.favorites_key(), id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use assert2::{check, let_assert};
    use rstest::{fixture, rstest};

    #[fixture]
    fn state() -> LocalState<MemoryStore> {
        LocalState::new(MemoryStore::new())
    }

    #[rstest]
    fn test_toggle_twice_restores(state: LocalState<MemoryStore>) {
        state.toggle_favorite(Role::Patient, EntityKind::Trial, 1).unwrap();
        let before = state.favorites(Role::Patient);

        check!(state.toggle_favorite(Role::Patient, EntityKind::Trial, 9).unwrap());
        check!(state.is_favorite(Role::Patient, EntityKind::Trial, 9));
        check!(!state.toggle_favorite(Role::Patient, EntityKind::Trial, 9).unwrap());

        check!(state.favorites(Role::Patient) == before);
        check!(state.favorited_at(Role::Patient, EntityKind::Trial, 9).is_none());
        check!(state.favorited_at(Role::Patient, EntityKind::Trial, 1).is_some());
    }

    #[rstest]
    fn test_toggle_twice_from_empty_store(state: LocalState<MemoryStore>) {
        let before = state.favorites(Role::Patient);

        check!(state.toggle_favorite(Role::Patient, EntityKind::Trial, 7).unwrap());
        check!(!state.toggle_favorite(Role::Patient, EntityKind::Trial, 7).unwrap());

        check!(state.favorites(Role::Patient) == before);
        let_assert!(Some(raw) = state.store().get_raw("patientFavorites").unwrap());
        check!(raw == "{}");
    }

    #[test]
    fn test_empty_kinds_dropped_on_load() {
        let favorites: Favorites = serde_json::from_str(r#"{"trials": [], "experts": [4]}"#).unwrap();
        let mut expected = Favorites::default();
        expected.toggle(EntityKind::Expert, 4);
        check!(favorites == expected);
    }

    #[rstest]
    fn test_ids_scoped_by_kind_and_role(state: LocalState<MemoryStore>) {
        state.toggle_favorite(Role::Patient, EntityKind::Expert, 3).unwrap();
        check!(!state.is_favorite(Role::Patient, EntityKind::Trial, 3));
        check!(!state.is_favorite(Role::Researcher, EntityKind::Expert, 3));

        let favorites = state.favorites(Role::Patient);
        let kinds: Vec<EntityKind> = favorites.iter().map(|(kind, _)| kind).collect();
        check!(kinds == vec![EntityKind::Expert]);
    }

    #[rstest]
    fn test_corrupt_favorites_degrade_to_empty(state: LocalState<MemoryStore>) {
        state.store().set_raw("patientFavorites", "[[[").unwrap();
        check!(state.favorites(Role::Patient).is_empty());
        // And the next toggle overwrites the corrupt blob
        check!(state.toggle_favorite(Role::Patient, EntityKind::Publication, 2).unwrap());
        check!(state.is_favorite(Role::Patient, EntityKind::Publication, 2));
    }

    #[rstest]
    fn test_legacy_object_favorites_load(state: LocalState<MemoryStore>) {
        state
            .store()
            .set_raw(
                "patientFavorites",
                r#"{"trials":[{"id":4,"title":"Old"}],"experts":[7]}"#,
            )
            .unwrap();
        let favorites = state.favorites(Role::Patient);
        check!(favorites.ids(EntityKind::Trial) == [4]);
        check!(favorites.ids(EntityKind::Expert) == [7]);
    }

    #[rstest]
    fn test_meeting_request_lifecycle(state: LocalState<MemoryStore>) {
        let form = MeetingRequestForm {
            patient_name: "Ana".into(),
            email: "ana@example.com".into(),
            ..MeetingRequestForm::default()
        };
        let first = state.add_meeting_request(2, "Dr. Two", form.clone(), true).unwrap();
        let second = state.add_meeting_request(5, "Dr. Five", form, false).unwrap();

        check!(first.status == RequestStatus::Pending);
        check!(first.request_type == RequestType::Direct);
        check!(second.is_external);
        check!(second.request_type == RequestType::Admin);
        check!(second.id > first.id);

        check!(state.update_meeting_request_status(second.id, RequestStatus::Contacted).unwrap());
        check!(!state.update_meeting_request_status(-1, RequestStatus::Rejected).unwrap());

        let stored = state.meeting_requests();
        let_assert!([a, b] = stored.as_slice());
        check!(a.status == RequestStatus::Pending);
        check!(b.status == RequestStatus::Contacted);
    }

    #[rstest]
    fn test_admin_bookkeeping(state: LocalState<MemoryStore>) {
        check!(state.record_admin_access().unwrap().access_count == 1);
        check!(state.record_admin_access().unwrap().access_count == 2);

        state.set_admin_request_status("req-1", RequestStatus::Approved).unwrap();
        check!(state.admin_request_status().get("req-1") == Some(&RequestStatus::Approved));
    }

    #[rstest]
    fn test_active_tab_defaults(state: LocalState<MemoryStore>) {
        check!(state.active_tab(Role::Researcher) == "overview");
        state.set_active_tab(Role::Researcher, "collaborators").unwrap();
        check!(state.active_tab(Role::Researcher) == "collaborators");
        check!(state.active_tab(Role::Patient) == "overview");
    }

    #[rstest]
    fn test_profiles_roundtrip(state: LocalState<MemoryStore>) {
        check!(state.patient_profile().is_none());
        let profile = PatientProfile {
            condition: "Glioma".into(),
            location: "Toronto, Canada".into(),
            additional_conditions: vec![],
        };
        state.save_patient_profile(&profile).unwrap();
        check!(state.patient_profile() == Some(profile));
    }
}
