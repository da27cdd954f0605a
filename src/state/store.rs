use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::StoreError;
use crate::persistence::{load_snapshot, save_snapshot, FoodMap};
use crate::state::food::Food;

/// Durable map from food id to record.
///
/// Reads are served from memory. Every `insert`/`remove` rewrites the
/// snapshot file before returning, and is rolled back in memory if that
/// write fails, so the file and the map never disagree.
///
/// Cloning is cheap; clones share the same map and file.
#[derive(Clone)]
pub struct FoodStore {
    foods: Arc<RwLock<FoodMap>>,
    path: Arc<PathBuf>,
}

impl FoodStore {
    /// Open the store backed by `path`, loading any existing snapshot.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let foods = load_snapshot(&path)?;

        Ok(Self {
            foods: Arc::new(RwLock::new(foods)),
            path: Arc::new(path),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `food` under `id`, replacing whatever was there.
    ///
    /// Returns the previous record, if any.
    pub fn insert(&self, id: String, food: Food) -> Result<Option<Food>, StoreError> {
        if food.id != id {
            return Err(StoreError::KeyMismatch {
                key: id,
                record: food.id,
            });
        }

        let mut map = self.write()?;
        let previous = map.insert(id.clone(), food);

        if let Err(e) = save_snapshot(&self.path, &map) {
            match previous {
                Some(old) => map.insert(id, old),
                None => map.remove(&id),
            };
            tracing::error!("Failed to persist insert: {e}");
            return Err(e);
        }

        Ok(previous)
    }

    pub fn get(&self, id: &str) -> Result<Option<Food>, StoreError> {
        Ok(self.read()?.get(id).cloned())
    }

    /// Every stored record, in key order.
    pub fn get_all(&self) -> Result<Vec<Food>, StoreError> {
        Ok(self.read()?.values().cloned().collect())
    }

    /// Delete the record under `id`, returning it if it existed.
    pub fn remove(&self, id: &str) -> Result<Option<Food>, StoreError> {
        let mut map = self.write()?;
        let Some(removed) = map.remove(id) else {
            return Ok(None);
        };

        if let Err(e) = save_snapshot(&self.path, &map) {
            map.insert(id.to_string(), removed);
            tracing::error!("Failed to persist remove: {e}");
            return Err(e);
        }

        Ok(Some(removed))
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.is_empty())
    }

    /// Poison the map lock, as if a writer had panicked mid-update.
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let foods = Arc::clone(&self.foods);
        let _ = std::thread::spawn(move || {
            let _guard = foods.write();
            panic!("poisoning food store");
        })
        .join();
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, FoodMap>, StoreError> {
        self.foods.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, FoodMap>, StoreError> {
        self.foods.write().map_err(|_| StoreError::Poisoned)
    }
}
