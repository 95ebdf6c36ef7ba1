//! ursgen Storage Layer
//!
//! In-memory registries for chunks, sessions, questions, and documents.
//!
//! # Architecture
//!
//! Every stored value lives in a [`Registry`], a thread-safe map from string
//! id to value. Reads clone the value out; writes go through a closure so
//! the lock never escapes. No lock is held across an await point because no
//! registry method is async.
//!
//! Chunks are immutable once inserted, so [`ChunkStore`] exposes no update.
//!
//! # Examples
//!
//! ```
//! use ursgen_store::Registry;
//!
//! let reg: Registry<String> = Registry::new();
//! reg.insert("a".to_string(), "hello".to_string()).unwrap();
//! assert_eq!(reg.get("a").unwrap(), "hello");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

use ursgen_domain::{ClarifyingQuestion, Session, SourceChunk, Urs};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// No value under the given id
    #[error("not found: {0}")]
    NotFound(String),

    /// Insert would overwrite an existing value
    #[error("duplicate id: {0}")]
    Duplicate(String),
}

/// Thread-safe id-keyed registry.
///
/// Values must be `Clone`; `get` hands back a copy so callers never hold
/// the registry lock.
pub struct Registry<T: Clone> {
    inner: RwLock<HashMap<String, T>>,
}

impl<T: Clone> Registry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a new value. Fails on duplicate ids; stored values are only
    /// replaced through [`Registry::update`].
    pub fn insert(&self, id: String, value: T) -> Result<(), StoreError> {
        let mut map = self.inner.write().unwrap();
        if map.contains_key(&id) {
            return Err(StoreError::Duplicate(id));
        }
        map.insert(id, value);
        Ok(())
    }

    /// Clone out the value under `id`.
    pub fn get(&self, id: &str) -> Result<T, StoreError> {
        self.inner
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Mutate the value under `id` in place.
    pub fn update<F: FnOnce(&mut T)>(&self, id: &str, f: F) -> Result<(), StoreError> {
        self.update_with(id, f)
    }

    /// Mutate the value under `id`, returning whatever the closure returns.
    ///
    /// The write lock is held for the whole closure, so a read-modify-write
    /// expressed this way cannot interleave with another writer on the same
    /// key.
    pub fn update_with<R, F: FnOnce(&mut T) -> R>(&self, id: &str, f: F) -> Result<R, StoreError> {
        let mut map = self.inner.write().unwrap();
        match map.get_mut(id) {
            Some(value) => Ok(f(value)),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    /// Whether `id` is present.
    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().unwrap().contains_key(id)
    }

    /// Remove and return the value under `id`.
    pub fn remove(&self, id: &str) -> Result<T, StoreError> {
        self.inner
            .write()
            .unwrap()
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// All stored ids, in no particular order.
    pub fn ids(&self) -> Vec<String> {
        self.inner.read().unwrap().keys().cloned().collect()
    }

    /// All stored values, in no particular order.
    pub fn values(&self) -> Vec<T> {
        self.inner.read().unwrap().values().cloned().collect()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().is_empty()
    }
}

impl<T: Clone> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable chunk storage keyed by chunk id.
#[derive(Default)]
pub struct ChunkStore {
    registry: Registry<SourceChunk>,
}

impl ChunkStore {
    /// Create an empty chunk store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a chunk under its own id.
    pub fn insert(&self, chunk: SourceChunk) -> Result<(), StoreError> {
        self.registry.insert(chunk.chunk_id.clone(), chunk)
    }

    /// Fetch one chunk.
    pub fn get(&self, chunk_id: &str) -> Result<SourceChunk, StoreError> {
        self.registry.get(chunk_id)
    }

    /// Fetch several chunks, preserving order. Missing ids are errors.
    pub fn get_many(&self, chunk_ids: &[String]) -> Result<Vec<SourceChunk>, StoreError> {
        chunk_ids.iter().map(|id| self.registry.get(id)).collect()
    }

    /// Number of stored chunks.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether no chunks are stored.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

/// Session storage keyed by session id.
#[derive(Default)]
pub struct SessionStore {
    registry: Registry<Session>,
}

impl SessionStore {
    /// Create an empty session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a session under its own id.
    pub fn insert(&self, session: Session) -> Result<(), StoreError> {
        self.registry.insert(session.session_id.clone(), session)
    }

    /// Fetch one session.
    pub fn get(&self, session_id: &str) -> Result<Session, StoreError> {
        self.registry.get(session_id)
    }

    /// Mutate one session in place.
    pub fn update<F: FnOnce(&mut Session)>(
        &self,
        session_id: &str,
        f: F,
    ) -> Result<(), StoreError> {
        self.registry.update(session_id, f)
    }

    /// Mutate one session under the write lock, returning the closure's
    /// result.
    pub fn update_with<R, F: FnOnce(&mut Session) -> R>(
        &self,
        session_id: &str,
        f: F,
    ) -> Result<R, StoreError> {
        self.registry.update_with(session_id, f)
    }

    /// Number of sessions opened so far.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether no sessions exist.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

/// Clarifying-question storage keyed by question id.
#[derive(Default)]
pub struct QuestionStore {
    registry: Registry<ClarifyingQuestion>,
}

impl QuestionStore {
    /// Create an empty question store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a question under its own id.
    pub fn insert(&self, question: ClarifyingQuestion) -> Result<(), StoreError> {
        self.registry
            .insert(question.question_id.clone(), question)
    }

    /// Fetch one question.
    pub fn get(&self, question_id: &str) -> Result<ClarifyingQuestion, StoreError> {
        self.registry.get(question_id)
    }

    /// Whether a question id exists.
    pub fn contains(&self, question_id: &str) -> bool {
        self.registry.contains(question_id)
    }
}

/// Document storage keyed by URS id.
#[derive(Default)]
pub struct DocumentStore {
    registry: Registry<Urs>,
}

impl DocumentStore {
    /// Create an empty document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document under its metadata id.
    pub fn insert(&self, urs: Urs) -> Result<(), StoreError> {
        self.registry.insert(urs.metadata.id.clone(), urs)
    }

    /// Fetch one document.
    pub fn get(&self, urs_id: &str) -> Result<Urs, StoreError> {
        self.registry.get(urs_id)
    }

    /// Mutate one document in place.
    pub fn update<F: FnOnce(&mut Urs)>(&self, urs_id: &str, f: F) -> Result<(), StoreError> {
        self.registry.update(urs_id, f)
    }

    /// Mutate one document under the write lock, returning the closure's
    /// result. Lifecycle transitions go through this so two decisions on
    /// the same document can never overwrite each other.
    pub fn update_with<R, F: FnOnce(&mut Urs) -> R>(
        &self,
        urs_id: &str,
        f: F,
    ) -> Result<R, StoreError> {
        self.registry.update_with(urs_id, f)
    }

    /// Ids of all stored documents.
    pub fn ids(&self) -> Vec<String> {
        self.registry.ids()
    }

    /// All stored documents.
    pub fn list(&self) -> Vec<Urs> {
        self.registry.values()
    }
}
