use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::roster::domain::{Member, MemberId, MemberPatch, Milestones};
use crate::roster::store::{MemberStore, StoreError};
use crate::roster::{roster_router, AccessGate, RosterService};

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    records: Arc<Mutex<BTreeMap<MemberId, Member>>>,
}

impl MemoryStore {
    pub(super) fn seeded(members: Vec<Member>) -> Self {
        let store = Self::default();
        for member in members {
            store.create_or_replace(member).expect("seed member");
        }
        store
    }

    pub(super) fn snapshot(&self, id: &str) -> Option<Member> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .get(&MemberId::from(id))
            .cloned()
    }

    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("store mutex poisoned").len()
    }
}

impl MemberStore for MemoryStore {
    fn list_all(&self) -> Result<Vec<Member>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn get_by_id(&self, id: &MemberId) -> Result<Option<Member>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn create_or_replace(&self, member: Member) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        guard.insert(member.id.clone(), member);
        Ok(())
    }

    fn update_fields(&self, id: &MemberId, patch: &MemberPatch) -> Result<Member, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let member = guard
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        member.apply(patch);
        Ok(member.clone())
    }
}

pub(super) struct UnavailableStore;

impl MemberStore for UnavailableStore {
    fn list_all(&self) -> Result<Vec<Member>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn get_by_id(&self, _id: &MemberId) -> Result<Option<Member>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn create_or_replace(&self, _member: Member) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn update_fields(&self, _id: &MemberId, _patch: &MemberPatch) -> Result<Member, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
}

pub(super) fn member(id: &str, name: &str, faculty: &str) -> Member {
    Member::new(MemberId::from(id), name, faculty, "0812")
}

pub(super) fn scored(
    id: &str,
    name: &str,
    committee_count: u32,
    meeting_count: u32,
    milestones: Milestones,
) -> Member {
    let mut member = member(id, name, "Teknik");
    member.committee_count = committee_count;
    member.meeting_count = meeting_count;
    member.milestones = milestones;
    member
}

pub(super) fn milestones(interview: bool, physical: bool, training: bool) -> Milestones {
    Milestones {
        interview,
        physical,
        training,
    }
}

/// Mixed roster covering every points and eligibility category.
pub(super) fn roster() -> Vec<Member> {
    vec![
        scored("2301", "Rani Putri", 6, 2, milestones(true, true, true)),
        scored("2302", "bayu Saputra", 2, 1, milestones(true, false, true)),
        scored("2303", "Citra Dewi", 1, 0, milestones(false, false, false)),
        scored("2304", "Adi Nugroho", 4, 0, milestones(true, true, false)),
        scored("2305", "Dimas Arya", 0, 2, milestones(false, true, false)),
        {
            let mut member = member("2306", "Eka Lestari", "FISIP");
            member.milestones = milestones(true, true, true);
            member
        },
    ]
}

pub(super) fn clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
}

pub(super) fn build_service() -> (RosterService<MemoryStore>, MemoryStore) {
    let store = MemoryStore::seeded(roster());
    let service = RosterService::new(Arc::new(store.clone()));
    (service, store)
}

pub(super) fn router_with_store(store: MemoryStore, gate: AccessGate) -> axum::Router {
    roster_router(Arc::new(RosterService::new(Arc::new(store))), gate)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
