use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{Error, Result};
use crate::learning::progress::EpisodeProgress;
use crate::parser::script::EpisodeContent;

const CONTENT_DIR: &str = "content";
const PROGRESS_DIR: &str = "progress";

/// Per-episode JSON blobs on disk: `content/<id>.json` holds the
/// immutable parse result, `progress/<id>.json` the mutable learning
/// state. Saves are atomic (write `.tmp`, fsync, rename) so a crash
/// never leaves a half-written record behind.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("linedrill");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(base_dir.join(CONTENT_DIR))?;
        fs::create_dir_all(base_dir.join(PROGRESS_DIR))?;
        Ok(Self { base_dir })
    }

    fn blob_path(&self, dir: &str, episode_id: &str) -> PathBuf {
        self.base_dir.join(dir).join(format!("{episode_id}.json"))
    }

    /// Ids of every episode with a stored progress record, in no
    /// particular order.
    pub fn episode_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(self.base_dir.join(PROGRESS_DIR))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                ids.push(stem.to_string());
            }
        }
        Ok(ids)
    }

    fn load<T: DeserializeOwned>(&self, dir: &str, episode_id: &str) -> Result<T> {
        let path = self.blob_path(dir, episode_id);
        if !path.exists() {
            return Err(Error::NotFound(episode_id.to_string()));
        }
        let json = fs::read_to_string(&path)?;
        serde_json::from_str(&json).map_err(|source| Error::MalformedPersisted {
            episode_id: episode_id.to_string(),
            source,
        })
    }

    fn save<T: Serialize>(&self, dir: &str, episode_id: &str, data: &T) -> Result<()> {
        let path = self.blob_path(dir, episode_id);
        let tmp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_content(&self, episode_id: &str) -> Result<EpisodeContent> {
        self.load(CONTENT_DIR, episode_id)
    }

    pub fn save_content(&self, content: &EpisodeContent) -> Result<()> {
        self.save(CONTENT_DIR, &content.episode_id, content)
    }

    pub fn load_progress(&self, episode_id: &str) -> Result<EpisodeProgress> {
        self.load(PROGRESS_DIR, episode_id)
    }

    pub fn save_progress(&self, progress: &EpisodeProgress) -> Result<()> {
        self.save(PROGRESS_DIR, &progress.episode_id, progress)
    }

    /// Remove both blobs for an episode. Missing files are fine; the
    /// episode may never have finished importing.
    pub fn delete_episode(&self, episode_id: &str) -> Result<()> {
        for dir in [CONTENT_DIR, PROGRESS_DIR] {
            let path = self.blob_path(dir, episode_id);
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}
