// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use crate::episode::partial_path;
use crate::error::StoreError;

use super::record::StoreDocument;

/// Default location of the episode store
pub const DEFAULT_STORE_FILENAME: &str = "episode_metadata.json";

/// Load and validate the episode store
pub fn load(path: &Path) -> Result<StoreDocument, StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| StoreError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let document: StoreDocument =
        serde_json::from_str(&content).map_err(|e| StoreError::JsonParseFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    document.validate()?;
    Ok(document)
}

/// Save the episode store, replacing the file only once the new content is fully written
pub fn save(path: &Path, document: &StoreDocument) -> Result<(), StoreError> {
    document.validate()?;
    let json = serde_json::to_string_pretty(document)?;

    write_replacing(path, json).map_err(|e| StoreError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write `contents` to a `.partial` sibling, then rename it over `path`.
///
/// Readers of `path` see either the old file or the complete new one.
pub fn write_replacing(path: &Path, contents: impl AsRef<[u8]>) -> std::io::Result<()> {
    let partial = partial_path(path);
    std::fs::write(&partial, contents)?;

    std::fs::rename(&partial, path).inspect_err(|_| {
        let _ = std::fs::remove_file(&partial);
    })
}

/// Write a brand new store, refusing to replace an existing one unless `overwrite` is set
pub fn create(path: &Path, document: &StoreDocument, overwrite: bool) -> Result<(), StoreError> {
    if path.exists() && !overwrite {
        return Err(StoreError::AlreadyExists(path.to_path_buf()));
    }
    save(path, document)
}

/// Read-modify-write the store.
///
/// The store is only written if `modify` succeeds.
pub fn update<T, F>(path: &Path, modify: F) -> Result<T, StoreError>
where
    F: FnOnce(&mut StoreDocument) -> Result<T, StoreError>,
{
    let mut document = load(path)?;
    let result = modify(&mut document)?;
    save(path, &document)?;
    Ok(result)
}
