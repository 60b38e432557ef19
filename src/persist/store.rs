use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use crate::config::SessionOpts;
use crate::editor::tools::Tool;
use crate::foundation::error::InpaintResult;
use crate::generation::settings::GenerationSettings;
use crate::persist::clock::{Clock, SystemClock};

/// Storage key of the editor snapshot.
pub const SNAPSHOT_KEY: &str = "inpaint-fluxapi-state";

/// Everything needed to bring the editor back after a reload.
///
/// Images are stored as data URLs, the result as its remote URL.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub original_image: Option<String>,
    pub mask_image: Option<String>,
    pub result_image: Option<String>,
    pub settings: GenerationSettings,
    pub brush_size: f64,
    pub selection_mode: Tool,
    /// PNG data URL of the overlay surface.
    pub canvas_data: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl SessionSnapshot {
    /// Whether there is anything worth saving.
    pub fn has_content(&self) -> bool {
        self.original_image.is_some() || self.mask_image.is_some() || self.result_image.is_some()
    }
}

/// String key-value store the snapshot lives in.
pub trait SnapshotStorage {
    fn get(&self, key: &str) -> InpaintResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> InpaintResult<()>;
    fn remove(&self, key: &str) -> InpaintResult<()>;
}

/// One `<key>.json` file per key under a directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SnapshotStorage for FileStorage {
    fn get(&self, key: &str) -> InpaintResult<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("read snapshot '{}'", path.display()))
                .into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> InpaintResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create snapshot dir '{}'", self.dir.display()))?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)
            .with_context(|| format!("write snapshot '{}'", tmp.display()))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("replace snapshot '{}'", path.display()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> InpaintResult<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("remove snapshot '{}'", path.display()))
                .into()),
        }
    }
}

/// Process-local storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl SnapshotStorage for MemoryStorage {
    fn get(&self, key: &str) -> InpaintResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> InpaintResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> InpaintResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

impl<T: SnapshotStorage + ?Sized> SnapshotStorage for &T {
    fn get(&self, key: &str) -> InpaintResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> InpaintResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> InpaintResult<()> {
        (**self).remove(key)
    }
}

impl SessionPersistence<FileStorage, SystemClock> {
    /// File-backed persistence under `opts.dir`, using wall-clock time.
    pub fn from_opts(opts: &SessionOpts) -> Self {
        Self::new(FileStorage::new(&opts.dir), SystemClock, opts.max_age())
    }
}

/// Saves and restores a [`SessionSnapshot`] with an expiry window.
#[derive(Debug)]
pub struct SessionPersistence<S, C> {
    storage: S,
    clock: C,
    max_age: Duration,
}

impl<S: SnapshotStorage, C: Clock> SessionPersistence<S, C> {
    pub fn new(storage: S, clock: C, max_age: Duration) -> Self {
        Self {
            storage,
            clock,
            max_age,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Store `snapshot`, stamping it with the current time.
    pub fn save(&self, snapshot: &SessionSnapshot) -> InpaintResult<()> {
        let mut stamped = snapshot.clone();
        stamped.timestamp = self.clock.now_ms();
        let json = serde_json::to_string(&stamped)?;
        self.storage.set(SNAPSHOT_KEY, &json)?;
        tracing::debug!(bytes = json.len(), "session snapshot saved");
        Ok(())
    }

    /// Load the stored snapshot. Stale or unreadable snapshots are deleted.
    pub fn load(&self) -> InpaintResult<Option<SessionSnapshot>> {
        let Some(raw) = self.storage.get(SNAPSHOT_KEY)? else {
            return Ok(None);
        };
        let snapshot: SessionSnapshot = match serde_json::from_str(&raw) {
            Ok(s) => s,
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable session snapshot");
                self.storage.remove(SNAPSHOT_KEY)?;
                return Ok(None);
            }
        };

        let max_age_ms = u64::try_from(self.max_age.as_millis()).unwrap_or(u64::MAX);
        let age_ms = self.clock.now_ms().saturating_sub(snapshot.timestamp);
        if age_ms >= max_age_ms {
            tracing::info!(age_ms, "session snapshot expired, cleared");
            self.storage.remove(SNAPSHOT_KEY)?;
            return Ok(None);
        }
        Ok(Some(snapshot))
    }

    pub fn clear(&self) -> InpaintResult<()> {
        self.storage.remove(SNAPSHOT_KEY)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/persist/store.rs"]
mod tests;
