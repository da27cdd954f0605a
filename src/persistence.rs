use std::{
    collections::BTreeMap,
    ffi::OsString,
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};

use crate::errors::StoreError;
use crate::state::food::Food;

pub type FoodMap = BTreeMap<String, Food>;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Load the snapshot at `path` into a fresh map.
///
/// A missing file is an empty store. Anything else that does not decode
/// cleanly (unreadable file, non-object root, a single bad entry, an entry
/// whose `id` differs from its key) is an error, so the first write after
/// startup never drops data the loader did not understand.
pub fn load_snapshot(path: &Path) -> Result<FoodMap, StoreError> {
    let data = match fs::read_to_string(path) {
        Ok(d) => d,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!("No snapshot found at startup (path = {})", path.display());
            return Ok(FoodMap::new());
        }
        Err(e) => return Err(io_error(path)(e)),
    };

    let json: Value = serde_json::from_str(&data)?;
    let Value::Object(obj) = json else {
        return Err(StoreError::NotAnObject(path.to_path_buf()));
    };

    let mut foods = FoodMap::new();
    for (key, value) in obj {
        let food = serde_json::from_value::<Food>(value).map_err(|e| StoreError::BadEntry {
            key: key.clone(),
            reason: e.to_string(),
        })?;

        if food.id != key {
            return Err(StoreError::BadEntry {
                reason: format!("stored under `{key}` but has id `{}`", food.id),
                key,
            });
        }

        foods.insert(key, food);
    }

    tracing::info!("Loaded snapshot: {} foods", foods.len());
    Ok(foods)
}

/// Write `foods` to `path`.
///
/// The JSON goes to a sibling `.tmp` file which is synced and then renamed
/// over `path`, so readers see either the previous snapshot or the new one.
pub fn save_snapshot(path: &Path, foods: &FoodMap) -> Result<(), StoreError> {
    let mut obj = Map::new();
    for (id, food) in foods {
        obj.insert(id.clone(), serde_json::to_value(food)?);
    }
    let json = serde_json::to_string_pretty(&Value::Object(obj))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    let tmp = temp_path(path);
    let written = write_synced(&tmp, json.as_bytes())
        .and_then(|()| fs::rename(&tmp, path).map_err(io_error(path)));
    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&tmp) {
            if cleanup.kind() != ErrorKind::NotFound {
                tracing::warn!("Could not remove {}: {cleanup}", tmp.display());
            }
        }
        return Err(e);
    }

    tracing::debug!("Snapshot saved: {} foods", foods.len());
    Ok(())
}

fn write_synced(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let mut file = fs::File::create(path).map_err(io_error(path))?;
    file.write_all(bytes).map_err(io_error(path))?;
    file.sync_all().map_err(io_error(path))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("snapshot"));
    name.push(".tmp");
    path.with_file_name(name)
}
