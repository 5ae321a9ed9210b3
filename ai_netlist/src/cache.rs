use anyhow::{Context, Result};
use log::debug;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Raw `generateContent` responses stored as `<sha256>.json`, keyed by everything that
/// influences the answer.
pub struct ResponseCache {
    folder: PathBuf,
}

impl ResponseCache {
    pub fn new(folder: impl Into<PathBuf>) -> Result<Self> {
        let folder = folder.into();
        fs::create_dir_all(&folder)
            .with_context(|| format!("Failed to create cache folder {folder:?}"))?;
        Ok(Self { folder })
    }

    pub fn key(model: &str, system_instruction: &str, prompt: &str) -> String {
        let mut hasher = Sha256::new();
        for field in [model, system_instruction, prompt] {
            hasher.update(field.as_bytes());
            // separator, so that ("ab", "c") and ("a", "bc") differ
            hasher.update([0u8]);
        }
        hex::encode(hasher.finalize())
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    fn path(&self, key: &str) -> PathBuf {
        self.folder.join(format!("{key}.json"))
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        if !fs::exists(&path)? {
            return Ok(None);
        }
        debug!("Cache hit: {path:?}");
        let body =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {path:?}"))?;
        Ok(Some(body))
    }

    pub fn put(&self, key: &str, body: &str) -> Result<()> {
        let path = self.path(key);
        fs::write(&path, body).with_context(|| format!("Failed to write {path:?}"))
    }
}
