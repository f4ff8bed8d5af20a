//! The user's bookmarked trail ids.
//!
//! [`SavedSet`] is the pure membership logic; [`SavedStore`] wraps it with
//! write-through persistence under a fixed storage key.

use tokio::sync::RwLock;

use crate::db::Repository;

/// Storage key holding the JSON array of saved ids.
pub const SAVED_TRAILS_KEY: &str = "savedTrails";

/// Set of trail ids in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedSet {
    ids: Vec<i64>,
}

impl SavedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present. Returns the new membership.
    pub fn toggle(&mut self, id: i64) -> bool {
        match self.ids.iter().position(|&saved| saved == id) {
            Some(index) => {
                self.ids.remove(index);
                false
            }
            None => {
                self.ids.push(id);
                true
            }
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn all(&self) -> Vec<i64> {
        self.ids.clone()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Decode a stored JSON array. Anything unreadable is an empty set.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Vec<i64>>(raw) {
            Ok(ids) => {
                let mut set = Self::new();
                for id in ids {
                    if !set.contains(id) {
                        set.ids.push(id);
                    }
                }
                set
            }
            Err(e) => {
                tracing::warn!("Ignoring malformed saved trails value: {}", e);
                Self::new()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::Value::from(self.ids.clone()).to_string()
    }
}

/// A [`SavedSet`] persisted after every mutation.
///
/// Mutations hold the write lock across the storage write, so a toggle is
/// atomic with respect to other requests.
pub struct SavedStore {
    set: RwLock<SavedSet>,
    repo: Repository,
}

impl SavedStore {
    /// Read the persisted set; storage failures yield an empty set.
    pub async fn load(repo: Repository) -> Self {
        let set = match repo.get_value(SAVED_TRAILS_KEY).await {
            Ok(Some(raw)) => SavedSet::from_json(&raw),
            Ok(None) => SavedSet::new(),
            Err(e) => {
                tracing::warn!("Could not read saved trails, starting empty: {}", e);
                SavedSet::new()
            }
        };
        tracing::info!("Loaded {} saved trails", set.len());

        Self {
            set: RwLock::new(set),
            repo,
        }
    }

    pub async fn toggle(&self, id: i64) -> bool {
        let mut set = self.set.write().await;
        let saved = set.toggle(id);
        self.persist(&set).await;
        saved
    }

    pub async fn contains(&self, id: i64) -> bool {
        self.set.read().await.contains(id)
    }

    pub async fn all(&self) -> Vec<i64> {
        self.set.read().await.all()
    }

    pub async fn clear(&self) {
        let mut set = self.set.write().await;
        set.clear();
        self.persist(&set).await;
    }

    async fn persist(&self, set: &SavedSet) {
        if let Err(e) = self.repo.put_value(SAVED_TRAILS_KEY, &set.to_json()).await {
            tracing::warn!("Failed to persist saved trails: {}", e);
        }
    }
}
