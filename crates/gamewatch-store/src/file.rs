//! The JSON file backed [`Persistence`] implementation.
//!
//! Loading is synchronous and happens once at startup. Saving is fire and
//! forget: the snapshot is rendered immediately, then written by a spawned
//! task. Writes are serialized and tagged with a generation so a slow older
//! write can never overwrite a newer snapshot. Each write goes to a sibling
//! `.tmp` file that is renamed over the state file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gamewatch_core::{Persistence, SubscriptionCatalog};
use gamewatch_types::StateFile;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::error::StoreError;

/// State file store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    token: String,
    generation: u64,
    written: Arc<Mutex<u64>>,
}

impl JsonFileStore {
    /// Load and validate the state file at `path`.
    ///
    /// Returns the store, which keeps the token for later writes, together
    /// with the catalog rebuilt from the file.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the file does not exist.
    /// - [`StoreError::Io`] if it cannot be read.
    /// - [`StoreError::Parse`] if it is not a valid state document.
    /// - [`StoreError::MissingToken`] if the token is absent or blank.
    pub fn load(path: impl Into<PathBuf>) -> Result<(Self, SubscriptionCatalog), StoreError> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound { path: path.clone() }
            } else {
                StoreError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let state: StateFile =
            serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?;

        if state.token.trim().is_empty() {
            return Err(StoreError::MissingToken { path });
        }

        let catalog = SubscriptionCatalog::from_records(&state.guilds);
        info!(
            path = %path.display(),
            guilds = state.guilds.len(),
            "state file loaded"
        );

        let store = Self {
            path,
            token: state.token,
            generation: 0,
            written: Arc::new(Mutex::new(0)),
        };
        Ok((store, catalog))
    }

    /// Path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Platform credential read from the state file.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Write `catalog` and wait for the write to finish.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialize`] or [`StoreError::Io`] on failure.
    pub async fn save_now(&mut self, catalog: &SubscriptionCatalog) -> Result<(), StoreError> {
        let bytes = self.render(catalog)?;
        let generation = self.next_generation();
        write_generation(&self.written, &self.path, generation, &bytes).await
    }

    fn render(&self, catalog: &SubscriptionCatalog) -> Result<Vec<u8>, StoreError> {
        let state = StateFile {
            token: self.token.clone(),
            guilds: catalog.to_records(),
        };
        Ok(serde_json::to_vec_pretty(&state)?)
    }

    const fn next_generation(&mut self) -> u64 {
        self.generation = self.generation.saturating_add(1);
        self.generation
    }
}

impl Persistence for JsonFileStore {
    fn save(&mut self, catalog: &SubscriptionCatalog) {
        let bytes = match self.render(catalog) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "failed to save state file");
                return;
            }
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            error!(path = %self.path.display(), "no async runtime, state not saved");
            return;
        };

        let generation = self.next_generation();
        let written = Arc::clone(&self.written);
        let path = self.path.clone();
        runtime.spawn(async move {
            if let Err(e) = write_generation(&written, &path, generation, &bytes).await {
                error!(error = %e, generation, "failed to save state file");
            }
        });
    }
}

/// Write `bytes` unless a newer generation has already been written.
async fn write_generation(
    written: &Mutex<u64>,
    path: &Path,
    generation: u64,
    bytes: &[u8],
) -> Result<(), StoreError> {
    let mut latest = written.lock().await;
    if generation <= *latest {
        debug!(generation, latest = *latest, "skipping stale state snapshot");
        return Ok(());
    }
    write_atomic(path, bytes).await?;
    *latest = generation;
    debug!(path = %path.display(), generation, "state file written");
    Ok(())
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    if let Err(source) = write_then_rename(&tmp, path, bytes).await {
        tokio::fs::remove_file(&tmp).await.ok();
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

async fn write_then_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(tmp, bytes).await?;
    tokio::fs::rename(tmp, path).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use gamewatch_types::{GuildId, UserId};

    use super::*;

    fn temp_state(contents: Option<&str>) -> PathBuf {
        let path = std::env::temp_dir().join(format!("gamewatch-{}.json", uuid::Uuid::new_v4()));
        if let Some(contents) = contents {
            std::fs::write(&path, contents).unwrap();
        }
        path
    }

    fn read_state(path: &Path) -> StateFile {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn missing_file_is_not_found_with_instructions() {
        let path = temp_state(None);
        let err = JsonFileStore::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(err.to_string().contains(r#"{"token": "your-token"}"#));
    }

    #[test]
    fn blank_token_is_rejected() {
        let path = temp_state(Some(r#"{"token": "  ", "guilds": {}}"#));
        let err = JsonFileStore::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::MissingToken { .. }));
        assert!(err.to_string().contains(r#"{"token": "your-token"}"#));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn no_token_key_is_rejected() {
        let path = temp_state(Some(r#"{"guilds": {}}"#));
        assert!(matches!(
            JsonFileStore::load(&path),
            Err(StoreError::MissingToken { .. })
        ));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let path = temp_state(Some("{ not json"));
        assert!(matches!(
            JsonFileStore::load(&path),
            Err(StoreError::Parse { .. })
        ));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn token_only_file_loads_empty_catalog() {
        let path = temp_state(Some(r#"{"token": "my-token"}"#));
        let (store, catalog) = JsonFileStore::load(&path).unwrap();
        assert_eq!(store.token(), "my-token");
        assert_eq!(catalog, SubscriptionCatalog::new());
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn save_now_rewrites_pretty_and_keeps_token() {
        let path = temp_state(Some(
            r#"{"token":"t","guilds":{"1":{"games":{"Sample game":{"users":{}}}}}}"#,
        ));
        let (mut store, mut catalog) = JsonFileStore::load(&path).unwrap();
        catalog
            .subscribe(&GuildId::from("1"), &UserId::from("2"), "sample game")
            .unwrap();
        store.save_now(&catalog).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  \"token\": \"t\""));
        let state = read_state(&path);
        assert_eq!(state.token, "t");
        let (_, reloaded) = JsonFileStore::load(&path).unwrap();
        assert_eq!(reloaded, catalog);
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn background_save_lands_latest_snapshot() {
        let path = temp_state(Some(r#"{"token": "t"}"#));
        let (mut store, mut catalog) = JsonFileStore::load(&path).unwrap();
        let guild = GuildId::from("1");

        catalog.ensure_game(&guild, "Sample game");
        store.save(&catalog);
        catalog.ensure_game(&guild, "Other game");
        store.save(&catalog);

        let mut games = 0;
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            games = read_state(&path)
                .guilds
                .get(&guild)
                .map_or(0, |record| record.games.len());
            if games == 2 {
                break;
            }
        }
        assert_eq!(games, 2);
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn failed_rename_leaves_no_temp_file() {
        // Renaming a file over a non-empty directory fails on every platform.
        let target = temp_state(None);
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("occupied"), b"x").unwrap();

        let result = write_atomic(&target, b"{}").await;
        assert!(matches!(result, Err(StoreError::Io { .. })));

        let mut tmp = target.as_os_str().to_owned();
        tmp.push(".tmp");
        assert!(!PathBuf::from(tmp).exists());
        std::fs::remove_dir_all(target).ok();
    }

    #[tokio::test]
    async fn stale_generation_is_skipped() {
        let path = temp_state(None);
        let written = Mutex::new(0);
        write_generation(&written, &path, 2, b"new").await.unwrap();
        write_generation(&written, &path, 1, b"old").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
        std::fs::remove_file(path).ok();
    }
}
