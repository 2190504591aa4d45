use metrics_exporter_prometheus::PrometheusHandle;
use pab_roster::roster::{Member, MemberId, MemberPatch, MemberStore, StoreError, USERS_COLLECTION};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

type Snapshot = BTreeMap<String, Vec<Member>>;

/// Member documents held in memory and mirrored to a JSON snapshot after every
/// write. Without a path the store is purely in-memory.
///
/// The snapshot is written synchronously while the lock is held, so a handler
/// making a write blocks its runtime worker for the duration of the file write.
#[derive(Default, Clone)]
pub(crate) struct FileBackedMemberStore {
    records: Arc<Mutex<BTreeMap<MemberId, Member>>>,
    path: Option<PathBuf>,
}

impl FileBackedMemberStore {
    pub(crate) fn open(path: Option<PathBuf>) -> Result<Self, StoreError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let records = if path.exists() {
            load_snapshot(&path)?
        } else {
            BTreeMap::new()
        };
        info!(path = %path.display(), members = records.len(), "member snapshot opened");

        Ok(Self {
            records: Arc::new(Mutex::new(records)),
            path: Some(path),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<MemberId, Member>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("member store lock poisoned".to_string()))
    }

    fn persist(&self, records: &BTreeMap<MemberId, Member>) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut snapshot = Snapshot::new();
        snapshot.insert(
            USERS_COLLECTION.to_string(),
            records.values().cloned().collect(),
        );
        let body = serde_json::to_vec_pretty(&snapshot)
            .map_err(|err| StoreError::Unavailable(format!("failed to encode snapshot: {err}")))?;
        fs::write(path, body).map_err(|err| {
            StoreError::Unavailable(format!(
                "failed to write snapshot {}: {err}",
                path.display()
            ))
        })?;
        debug!(path = %path.display(), members = records.len(), "member snapshot written");
        Ok(())
    }
}

fn load_snapshot(path: &Path) -> Result<BTreeMap<MemberId, Member>, StoreError> {
    let raw = fs::read(path).map_err(|err| {
        StoreError::Unavailable(format!("failed to read snapshot {}: {err}", path.display()))
    })?;
    let mut snapshot: Snapshot = serde_json::from_slice(&raw).map_err(|err| {
        StoreError::Unavailable(format!("invalid snapshot {}: {err}", path.display()))
    })?;

    Ok(snapshot
        .remove(USERS_COLLECTION)
        .unwrap_or_default()
        .into_iter()
        .map(|member| (member.id.clone(), member))
        .collect())
}

impl MemberStore for FileBackedMemberStore {
    fn list_all(&self) -> Result<Vec<Member>, StoreError> {
        Ok(self.lock()?.values().cloned().collect())
    }

    fn get_by_id(&self, id: &MemberId) -> Result<Option<Member>, StoreError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn create_or_replace(&self, member: Member) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        let id = member.id.clone();
        let previous = guard.insert(id.clone(), member);

        if let Err(err) = self.persist(&guard) {
            match previous {
                Some(previous) => guard.insert(id, previous),
                None => guard.remove(&id),
            };
            return Err(err);
        }
        Ok(())
    }

    fn update_fields(&self, id: &MemberId, patch: &MemberPatch) -> Result<Member, StoreError> {
        let mut guard = self.lock()?;
        let member = guard
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let previous = member.clone();
        member.apply(patch);
        let updated = member.clone();

        if let Err(err) = self.persist(&guard) {
            guard.insert(id.clone(), previous);
            return Err(err);
        }
        Ok(updated)
    }
}
