//! In-Memory Session Store Adapter
//!
//! A sharded map keyed by a hash of the session id. Each shard has its
//! own mutex, so read-modify-write sequences are atomic per session
//! while unrelated sessions proceed in parallel. The lock is only held
//! for the in-memory merge, never across I/O.
//!
//! Capacity is a hard FIFO bound: inserting a new session into a full
//! shard evicts that shard's oldest session by insertion order. Sessions
//! are short-lived and bursty, so FIFO keeps this simple; eviction is
//! invisible to callers.

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use crate::domain::foundation::{SessionId, UserId};
use crate::domain::triage::{ProjectState, StateUpdate};
use crate::ports::{SessionStore, SessionStoreError};

/// Capacity and sharding knobs for the in-memory store.
#[derive(Debug, Clone)]
pub struct SessionStoreConfig {
    /// Maximum total sessions held across all shards.
    pub max_sessions: usize,
    /// Number of lock stripes. Must divide `max_sessions` evenly for the
    /// global bound to be exact; the defaults do.
    pub shard_count: usize,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            max_sessions: 10_000,
            shard_count: 16,
        }
    }
}

#[derive(Debug, Default)]
struct Shard {
    entries: HashMap<SessionId, ProjectState>,
    /// Insertion order for FIFO eviction.
    order: VecDeque<SessionId>,
}

/// Sharded in-memory implementation of [`SessionStore`].
#[derive(Debug)]
pub struct InMemorySessionStore {
    shards: Vec<Mutex<Shard>>,
    per_shard_capacity: usize,
}

impl InMemorySessionStore {
    /// Creates a store with the given capacity configuration.
    pub fn new(config: SessionStoreConfig) -> Self {
        let shard_count = config.shard_count.max(1);
        let per_shard_capacity = (config.max_sessions.max(1)).div_ceil(shard_count);
        let shards = (0..shard_count).map(|_| Mutex::new(Shard::default())).collect();
        Self {
            shards,
            per_shard_capacity,
        }
    }

    /// Current total session count across shards.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.lock().map(|g| g.entries.len()).unwrap_or(0))
            .sum()
    }

    /// Whether the store holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a session is currently held.
    pub fn contains(&self, session_id: SessionId) -> bool {
        self.shards[self.shard_index(session_id)]
            .lock()
            .map(|g| g.entries.contains_key(&session_id))
            .unwrap_or(false)
    }

    fn shard_index(&self, session_id: SessionId) -> usize {
        let mut hasher = DefaultHasher::new();
        session_id.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards.len()
    }

    fn lock_shard(&self, index: usize) -> Result<std::sync::MutexGuard<'_, Shard>, SessionStoreError> {
        self.shards[index]
            .lock()
            .map_err(|_| SessionStoreError::Internal("session shard lock poisoned".to_string()))
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(SessionStoreConfig::default())
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: SessionId) -> Result<ProjectState, SessionStoreError> {
        let shard = self.lock_shard(self.shard_index(session_id))?;
        shard
            .entries
            .get(&session_id)
            .cloned()
            .ok_or(SessionStoreError::NotFound(session_id))
    }

    async fn update(
        &self,
        session_id: SessionId,
        update: StateUpdate,
        user_id: Option<UserId>,
    ) -> Result<ProjectState, SessionStoreError> {
        let mut shard = self.lock_shard(self.shard_index(session_id))?;

        let next = match shard.entries.get(&session_id) {
            Some(existing) => {
                let mut next = existing.apply(update);
                if next.user_id.is_none() {
                    next.user_id = user_id;
                }
                next
            }
            None => {
                if shard.entries.len() >= self.per_shard_capacity {
                    if let Some(oldest) = shard.order.pop_front() {
                        shard.entries.remove(&oldest);
                        tracing::debug!(session_id = %oldest, "evicted oldest session at capacity");
                    }
                }
                shard.order.push_back(session_id);
                ProjectState::new(session_id, user_id).apply(update)
            }
        };

        shard.entries.insert(session_id, next.clone());
        Ok(next)
    }
}
