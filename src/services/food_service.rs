use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::errors::{FoodError, StoreError};
use crate::state::food::{
    Food, CREATED_AT_FIELD, ID_FIELD, REQUIRED_FIELDS, UPDATED_AT_FIELD,
};
use crate::state::store::FoodStore;

/// Caller-supplied JSON object for create and update.
pub type FoodFields = Map<String, Value>;

/// CRUD operations for food records on top of a [`FoodStore`].
///
/// Caller fields are merged over a base document, then `id`, `createdAt`
/// and `updatedAt` are forced to their system values, so a payload can
/// never set them.
#[derive(Clone)]
pub struct FoodService {
    store: FoodStore,
    clock: Arc<dyn Clock>,
    // Serializes read-modify-write sequences (update, delete).
    mutation: Arc<Mutex<()>>,
}

impl FoodService {
    pub fn new(store: FoodStore) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: FoodStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            mutation: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &FoodStore {
        &self.store
    }

    /// Create a record with a fresh id and `createdAt = now`.
    pub fn create(&self, fields: FoodFields) -> Result<Food, FoodError> {
        let id = Uuid::new_v4().to_string();
        let now = self.clock.now();

        let mut doc = fields;
        doc.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        doc.insert(CREATED_AT_FIELD.to_string(), timestamp(now));
        doc.insert(UPDATED_AT_FIELD.to_string(), Value::Null);
        let food = into_food(doc)?;

        self.store.insert(id.clone(), food.clone())?;
        tracing::info!("Created food {id}");
        Ok(food)
    }

    pub fn list(&self) -> Result<Vec<Food>, FoodError> {
        Ok(self.store.get_all()?)
    }

    pub fn get(&self, id: &str) -> Result<Food, FoodError> {
        self.store
            .get(id)?
            .ok_or_else(|| FoodError::NotFound(id.to_string()))
    }

    /// Overlay `fields` on the stored record and stamp `updatedAt`.
    ///
    /// `id` and `createdAt` are kept from the stored record. A missing id
    /// never creates a record.
    pub fn update(&self, id: &str, fields: FoodFields) -> Result<Food, FoodError> {
        let _guard = self.lock()?;

        let existing = self
            .store
            .get(id)?
            .ok_or_else(|| FoodError::NotFound(id.to_string()))?;

        // The clock may step backwards; keep createdAt <= updatedAt.
        let now = self.clock.now().max(existing.created_at);

        let mut doc = match serde_json::to_value(&existing).map_err(StoreError::from)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        doc.extend(fields);
        doc.insert(ID_FIELD.to_string(), Value::String(existing.id.clone()));
        doc.insert(CREATED_AT_FIELD.to_string(), timestamp(existing.created_at));
        doc.insert(UPDATED_AT_FIELD.to_string(), timestamp(now));
        let food = into_food(doc)?;

        self.store.insert(existing.id, food.clone())?;
        tracing::info!("Updated food {id}");
        Ok(food)
    }

    /// Remove the record, returning its last state.
    pub fn delete(&self, id: &str) -> Result<Food, FoodError> {
        let _guard = self.lock()?;

        let removed = self
            .store
            .remove(id)?
            .ok_or_else(|| FoodError::NotFound(id.to_string()))?;

        tracing::info!("Deleted food {id}");
        Ok(removed)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, FoodError> {
        self.mutation
            .lock()
            .map_err(|_| FoodError::Unavailable(StoreError::Poisoned))
    }
}

fn timestamp(at: DateTime<Utc>) -> Value {
    serde_json::to_value(at).unwrap_or(Value::Null)
}

/// Only presence is checked: `null` counts as missing, any other JSON
/// value is accepted as given.
fn into_food(doc: FoodFields) -> Result<Food, FoodError> {
    if let Some(missing) = REQUIRED_FIELDS
        .iter()
        .find(|field| doc.get(**field).map_or(true, Value::is_null))
    {
        return Err(FoodError::InvalidPayload(format!(
            "missing field `{missing}`"
        )));
    }

    serde_json::from_value(Value::Object(doc))
        .map_err(|e| FoodError::InvalidPayload(e.to_string()))
}
