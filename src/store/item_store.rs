//! ItemStore: ordered in-memory index mirrored to one record file per item.
//!
//! On open the store walks its directory, decodes every record and fills the
//! index; any unreadable or undecodable record fails the open. Writes go to a
//! temporary file that is renamed over the record, and the index changes only
//! after the rename succeeded, so index and disk never diverge.

use std::collections::{BTreeSet, HashMap};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use regex::Regex;

use crate::codec::{JsonCodec, RecordCodec};
use crate::domain::{Category, Item, today};
use crate::error::{PrioritError, Result};
use crate::id::{id_key, validate_item_id};
use crate::store::index::ItemIndex;

/// Index plus the file each item was loaded from, guarded together
#[derive(Debug)]
struct StoreState {
    index: ItemIndex,
    paths: HashMap<String, PathBuf>,
}

/// Priority list persisted as one record file per item.
pub struct ItemStore<C: RecordCodec = JsonCodec> {
    directory: PathBuf,
    codec: C,
    state: Mutex<StoreState>,
}

impl<C: RecordCodec> std::fmt::Debug for ItemStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemStore")
            .field("directory", &self.directory)
            .field("extension", &self.codec.extension())
            .finish_non_exhaustive()
    }
}

impl ItemStore<JsonCodec> {
    /// Open or create a store at the given directory using JSON records.
    pub fn open(directory: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_codec(directory, JsonCodec)
    }
}

impl<C: RecordCodec> ItemStore<C> {
    /// Open or create a store at the given directory with an explicit codec.
    ///
    /// Fails with `StorageUnavailable` if the directory cannot be created or
    /// is not a directory, and with `LoadFailed` if any existing record
    /// cannot be read or decoded.
    pub fn open_with_codec(directory: impl AsRef<Path>, codec: C) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();

        fs::create_dir_all(&directory).map_err(|e| PrioritError::StorageUnavailable {
            path: directory.clone(),
            reason: e.to_string(),
        })?;
        if !directory.is_dir() {
            return Err(PrioritError::StorageUnavailable {
                path: directory,
                reason: "not a directory".to_string(),
            });
        }

        let state = Self::load(&directory, &codec)?;
        tracing::info!(
            directory = %directory.display(),
            items = state.index.len(),
            "Loaded item store"
        );

        Ok(Self {
            directory,
            codec,
            state: Mutex::new(state),
        })
    }

    /// Directory holding the record files
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Add an item unless one with the same id exists (or `overwrite` is set).
    ///
    /// A stored copy is kept; later changes to `item` do not affect the store.
    pub fn add_item(&self, item: &Item, overwrite: bool) -> Result<()> {
        self.put(item, overwrite).map(|_| ())
    }

    /// Replace the item with the same id, or add it if absent.
    ///
    /// Returns the replaced version. The replacement is written before the
    /// index changes, so a failed write leaves the original in place.
    pub fn update_item(&self, item: &Item) -> Result<Option<Item>> {
        let previous = self.put(item, true)?;
        tracing::debug!(id = %item.id(), replaced = previous.is_some(), "Updated item");
        Ok(previous)
    }

    /// Look up an item by id (case-insensitive)
    pub fn get_item(&self, id: &str) -> Result<Option<Item>> {
        let state = self.lock_state()?;
        Ok(state.index.get(&id_key(id)).cloned())
    }

    /// Every stored item, most important first
    pub fn all_items(&self) -> Result<Vec<Item>> {
        let state = self.lock_state()?;
        Ok(state.index.iter().cloned().collect())
    }

    /// The most important item, if any
    pub fn next_item(&self) -> Result<Option<Item>> {
        let state = self.lock_state()?;
        Ok(state.index.first().cloned())
    }

    /// Items whose id, title, text or any category fully matches `pattern`.
    ///
    /// The whole field must match; use `.*term.*` for substring search.
    pub fn search_item(&self, pattern: &str) -> Result<Vec<Item>> {
        // Validate alone first so the pattern cannot break out of the anchors
        Regex::new(pattern)?;
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        let state = self.lock_state()?;

        let found: Vec<Item> = state
            .index
            .iter()
            .filter(|item| {
                regex.is_match(item.id())
                    || regex.is_match(item.title())
                    || regex.is_match(item.text())
                    || item.categories().iter().any(|c| regex.is_match(c.name()))
            })
            .cloned()
            .collect();

        tracing::debug!(pattern = %pattern, found = found.len(), "Searched items");
        Ok(found)
    }

    /// Distinct category names across all items, compared ignoring case
    pub fn all_categories(&self) -> Result<Vec<String>> {
        let state = self.lock_state()?;
        let categories: BTreeSet<&Category> = state.index.iter().flat_map(|item| item.categories()).collect();
        Ok(categories.into_iter().map(|c| c.name().to_string()).collect())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock_state()?.index.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock_state()?.index.is_empty())
    }

    /// Lock the state and re-rank it for the current day
    fn lock_state(&self) -> Result<MutexGuard<'_, StoreState>> {
        let mut state = self.state.lock().map_err(|e| PrioritError::Lock(e.to_string()))?;
        state.index.refresh(today());
        Ok(state)
    }

    /// Write `item` and insert it into the index under one lock.
    fn put(&self, item: &Item, overwrite: bool) -> Result<Option<Item>> {
        validate_item_id(item.id())?;
        let key = item.key();
        let mut state = self.lock_state()?;

        if !overwrite && state.index.contains(&key) {
            tracing::warn!(id = %item.id(), "Item is already in list");
            return Err(PrioritError::DuplicateId(item.id().to_string()));
        }

        // Existing records are rewritten where they were loaded from
        let path = match state.paths.get(&key) {
            Some(existing) => existing.clone(),
            None => self.record_path(&key),
        };
        if let Err(source) = self.write_record(item, &path) {
            tracing::warn!(id = %item.id(), error = %source, "Failed to save item");
            return Err(PrioritError::PersistFailed {
                id: item.id().to_string(),
                source: Box::new(source),
            });
        }

        state.paths.insert(key, path.clone());
        tracing::debug!(id = %item.id(), path = %path.display(), "Saved item");
        Ok(state.index.insert(item.clone()))
    }

    /// Canonical record file for an id key
    fn record_path(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.{}", key, self.codec.extension()))
    }

    /// Encode and atomically replace the record file
    fn write_record(&self, item: &Item, path: &Path) -> Result<()> {
        let bytes = self.codec.encode(item)?;
        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let written = (|| -> Result<()> {
            let mut file = File::create(&tmp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
            fs::rename(&tmp_path, path)?;
            Ok(())
        })();

        if written.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        written
    }

    /// Decode every record under `directory` into a fresh state.
    fn load(directory: &Path, codec: &C) -> Result<StoreState> {
        let root = directory.to_str().ok_or_else(|| PrioritError::StorageUnavailable {
            path: directory.to_path_buf(),
            reason: "path is not valid UTF-8".to_string(),
        })?;
        let pattern = format!("{}/**/*.{}", glob::Pattern::escape(root), codec.extension());
        let entries = glob::glob(&pattern).map_err(|e| PrioritError::StorageUnavailable {
            path: directory.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut state = StoreState {
            index: ItemIndex::new(today()),
            paths: HashMap::new(),
        };
        let mut first_failure: Option<(PathBuf, PrioritError)> = None;
        let mut failures = 0;

        for entry in entries {
            let loaded = match entry {
                Ok(path) if path.is_dir() => continue,
                Ok(path) => Self::load_record(&path, codec, &state).map_err(|e| (path, e)),
                Err(e) => Err((e.path().to_path_buf(), PrioritError::Io(e.into_error()))),
            };

            match loaded {
                Ok((path, item)) => {
                    tracing::debug!(id = %item.id(), path = %path.display(), "Loaded item");
                    state.paths.insert(item.key(), path);
                    state.index.insert(item);
                }
                Err((path, error)) => {
                    tracing::warn!(path = %path.display(), error = %error, "Failed to load record");
                    failures += 1;
                    if first_failure.is_none() {
                        first_failure = Some((path, error));
                    }
                }
            }
        }

        match first_failure {
            Some((path, source)) => Err(PrioritError::LoadFailed {
                path,
                failures,
                source: Box::new(source),
            }),
            None => Ok(state),
        }
    }

    fn load_record(path: &Path, codec: &C, state: &StoreState) -> Result<(PathBuf, Item)> {
        let bytes = fs::read(path)?;
        let item = codec.decode(&bytes)?;
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        if stem != item.key() {
            return Err(PrioritError::MisnamedRecord {
                path: path.to_path_buf(),
                id: item.id().to_string(),
            });
        }
        if let Some(existing) = state.paths.get(&item.key()) {
            return Err(PrioritError::DuplicateId(format!(
                "{} (also in {})",
                item.id(),
                existing.display()
            )));
        }
        Ok((path.to_path_buf(), item))
    }
}
