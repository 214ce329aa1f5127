use crate::error::StartupError;
use log::info;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Rotating set of YouTube Data API keys.
///
/// The pool is owned by the pipeline and lent out by `&mut` to every call site,
/// so reading the current key and advancing past it always happen on the same
/// thread. A pool shared between concurrent workers has to sit behind a mutex
/// that covers both steps.
#[derive(Debug)]
pub struct KeyPool {
    keys: Vec<String>,
    index: usize,
}

impl KeyPool {
    pub fn new(keys: Vec<String>) -> Option<Self> {
        let keys: Vec<String> = keys
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        if keys.is_empty() {
            return None;
        }
        Some(KeyPool { keys, index: 0 })
    }

    /// Loads one key per line; blank lines are ignored.
    pub fn from_file(path: &Path) -> Result<Self, StartupError> {
        let raw = fs::read_to_string(path).map_err(|source| StartupError::CredentialsUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let pool = KeyPool::new(raw.lines().map(str::to_string).collect()).ok_or_else(|| {
            StartupError::EmptyCredentialPool {
                path: path.to_path_buf(),
            }
        })?;
        info!("Loaded {} API keys from {}", pool.len(), path.display());
        Ok(pool)
    }

    pub fn current_key(&self) -> &str {
        &self.keys[self.index]
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn advance(&mut self) {
        self.index = (self.index + 1) % self.keys.len();
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Starts a fresh rotation scope for one logical operation.
    pub fn attempt(&mut self) -> KeyAttempt<'_> {
        KeyAttempt {
            pool: self,
            tried: HashSet::new(),
        }
    }
}

/// Tracks which keys one operation already burned through quota on.
///
/// Keys are tracked by position, so a key listed twice in the file counts as two
/// slots and the loop still terminates after `len()` failures.
pub struct KeyAttempt<'a> {
    pool: &'a mut KeyPool,
    tried: HashSet<usize>,
}

impl KeyAttempt<'_> {
    /// Next key this operation has not tried yet, or `None` once every key
    /// has reported quota exhaustion.
    pub fn next_key(&mut self) -> Option<String> {
        if self.tried.len() >= self.pool.len() {
            return None;
        }
        while self.tried.contains(&self.pool.current_index()) {
            self.pool.advance();
        }
        Some(self.pool.current_key().to_string())
    }

    /// Marks the current key as exhausted for this operation and rotates.
    pub fn quota_exceeded(&mut self) {
        self.tried.insert(self.pool.current_index());
        self.pool.advance();
    }

    pub fn tried(&self) -> usize {
        self.tried.len()
    }
}
