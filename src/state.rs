//! Application state: live quiz sessions and the shared leaderboard.
//!
//! This module owns:
//!   - HTTP sessions by id, each with its own random source and lock
//!   - the record store (file-backed, or in-memory if the data dir is unusable)
//!   - the loaded settings
//!
//! The session table lock is never held across another lock. The records
//! lock is only taken by the transition that finishes a level.

use std::{collections::HashMap, sync::Arc, time::Duration};

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::config::Settings;
use crate::domain::Record;
use crate::logic::session_view;
use crate::protocol::SessionView;
use crate::records::{FileStore, KvStore, MemoryStore, RecordStore};
use crate::session::{Action, Session};

pub type SharedRecords = RecordStore<Box<dyn KvStore + Send + Sync>>;

/// A session together with the random source that feeds its task generator.
pub struct SessionSlot {
    pub session: Session,
    pub rng: StdRng,
}

/// Table entry for an HTTP session.
pub struct SessionEntry {
    pub slot: Arc<Mutex<SessionSlot>>,
    pub last_seen: Instant,
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    pub records: Arc<Mutex<SharedRecords>>,
}

impl AppState {
    /// Build state from settings, opening the records file under `data_dir`.
    #[instrument(level = "info", skip_all)]
    pub fn new(settings: Settings) -> Self {
        let kv: Box<dyn KvStore + Send + Sync> = match FileStore::open(&settings.data_dir) {
            Ok(store) => {
                info!(target: "perimetr_backend", data_dir = %settings.data_dir.display(), key = %settings.records_key, "Record store opened");
                Box::new(store)
            }
            Err(e) => {
                error!(target: "perimetr_backend", error = %e, "Data dir unusable; records will not survive a restart");
                Box::new(MemoryStore::default())
            }
        };
        Self::with_store(settings, kv)
    }

    pub fn with_store(settings: Settings, kv: Box<dyn KvStore + Send + Sync>) -> Self {
        let records = RecordStore::new(kv, settings.records_key.clone());
        Self {
            settings,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub fn new_slot(&self) -> SessionSlot {
        let rng = match self.settings.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        SessionSlot { session: Session::new(), rng }
    }

    /// Register a fresh session in the menu phase. Expired sessions are
    /// dropped first, then the least recently used ones while the table is full.
    #[instrument(level = "info", skip(self))]
    pub async fn create_session(&self) -> (String, SessionView) {
        let id = Uuid::new_v4().to_string();
        let slot = self.new_slot();
        let view = session_view(&slot.session);
        let now = Instant::now();
        let ttl = Duration::from_secs(self.settings.session_ttl_secs);
        let cap = self.settings.max_sessions.max(1);

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, e| now.saturating_duration_since(e.last_seen) < ttl);
        while sessions.len() >= cap {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, e)| e.last_seen)
                .map(|(k, _)| k.clone());
            let Some(k) = oldest else { break };
            sessions.remove(&k);
        }
        let evicted = before - sessions.len();
        sessions.insert(id.clone(), SessionEntry { slot: Arc::new(Mutex::new(slot)), last_seen: now });
        let live = sessions.len();
        drop(sessions);

        info!(target: "quiz", %id, evicted, live, "Session created");
        (id, view)
    }

    /// Mark a session as used and hand out its slot; the table lock is released on return.
    async fn touch(&self, id: &str) -> Option<Arc<Mutex<SessionSlot>>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(entry.slot.clone())
    }

    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn session_view(&self, id: &str) -> Option<SessionView> {
        let slot = self.touch(id).await?;
        let slot = slot.lock().await;
        Some(session_view(&slot.session))
    }

    /// Apply `action` to session `id`. `Ok(None)` means no such session.
    #[instrument(level = "info", skip(self), fields(%id))]
    pub async fn apply(&self, id: &str, action: Action) -> Result<Option<SessionView>> {
        let Some(slot) = self.touch(id).await else {
            return Ok(None);
        };
        let mut slot = slot.lock().await;
        apply_to_slot(&mut slot, action, &self.records).await.map(Some)
    }

    #[instrument(level = "info", skip(self), fields(%id))]
    pub async fn drop_session(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn records(&self) -> Vec<Record> {
        self.records.lock().await.load_all()
    }
}

/// Drive one slot. The records lock is taken only when this action ends the level.
pub async fn apply_to_slot(
    slot: &mut SessionSlot,
    action: Action,
    records: &Mutex<SharedRecords>,
) -> Result<SessionView> {
    let saves = matches!(action, Action::Advance) && slot.session.finishes_on_advance();
    let mut guard = if saves { Some(records.lock().await) } else { None };
    let mut sink = guard.as_deref_mut();
    let outcome = slot.session.dispatch(action, &mut slot.rng, &mut sink)?;
    tracing::debug!(target: "quiz", ?outcome, "Session transition");
    Ok(session_view(&slot.session))
}
