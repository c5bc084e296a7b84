// 🗄️ Record Store - named JSON collections
//
// Every collection is one JSON document holding an array of records; the two
// singletons (wedding date, table config) are single objects. A document is
// always rewritten in full. There is no locking: last writer wins.
//
// Reads never fail. A missing or undecodable document reads as empty, but the
// caller is told which of the two happened through `LoadStatus`. Writes refuse
// to run against an undecodable collection so a corrupted file is never
// silently replaced by an empty one.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use crate::error::{PlannerError, Result};

// ============================================================================
// RECORD TRAITS
// ============================================================================

/// A record stored as one element of a collection document.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Human-readable collection name, used in errors and logs.
    const COLLECTION: &'static str;

    /// Backing document name.
    const FILE: &'static str;

    /// Stable identity. Empty only for legacy records not yet migrated.
    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);
}

/// A singleton document (a single JSON object rather than an array).
pub trait Document: Serialize + DeserializeOwned + Default {
    const FILE: &'static str;
}

/// Generate a fresh record identity.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ============================================================================
// BACKENDS
// ============================================================================

/// Raw document storage. Implementations know nothing about JSON.
pub trait Backend: Send + Sync + fmt::Debug {
    /// Read a whole document; `Ok(None)` if it does not exist.
    fn read(&self, name: &str) -> io::Result<Option<String>>;

    /// Replace a whole document.
    fn write(&self, name: &str, contents: &str) -> io::Result<()>;

    /// Where a document lives, for error messages.
    fn location(&self, name: &str) -> PathBuf;
}

/// Documents as files in a data directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileBackend { dir: dir.into() }
    }
}

impl Backend for FileBackend {
    fn read(&self, name: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.location(name)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, name: &str, contents: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        // Plain overwrite; a crash mid-write can leave a truncated file.
        fs::write(self.location(name), contents)
    }

    fn location(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

/// Documents held in memory. Used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    documents: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document with raw contents (which need not be valid JSON).
    pub fn with_document(self, name: &str, contents: &str) -> Self {
        if let Ok(mut documents) = self.documents.write() {
            documents.insert(name.to_string(), contents.to_string());
        }
        self
    }

    pub fn raw(&self, name: &str) -> Option<String> {
        self.documents.read().ok()?.get(name).cloned()
    }
}

fn poisoned() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "memory backend lock poisoned")
}

impl Backend for MemoryBackend {
    fn read(&self, name: &str) -> io::Result<Option<String>> {
        let documents = self.documents.read().map_err(|_| poisoned())?;
        Ok(documents.get(name).cloned())
    }

    fn write(&self, name: &str, contents: &str) -> io::Result<()> {
        let mut documents = self.documents.write().map_err(|_| poisoned())?;
        documents.insert(name.to_string(), contents.to_string());
        Ok(())
    }

    fn location(&self, name: &str) -> PathBuf {
        PathBuf::from(format!("memory://{name}"))
    }
}

// ============================================================================
// LOAD RESULT
// ============================================================================

/// What a read found on the backend.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum LoadStatus {
    /// The document exists and decoded (possibly to an empty list).
    Present,
    /// There is no document yet.
    Missing,
    /// The document exists but could not be read or decoded.
    Unreadable(String),
}

impl LoadStatus {
    pub fn is_unreadable(&self) -> bool {
        matches!(self, LoadStatus::Unreadable(_))
    }
}

/// Records plus the status of the read that produced them.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub status: LoadStatus,
}

impl<T: Record> Loaded<T> {
    /// Strict view: an unreadable collection becomes a decode error.
    pub fn require(self) -> Result<Vec<T>> {
        match self.status {
            LoadStatus::Unreadable(reason) => Err(PlannerError::Decode {
                collection: T::COLLECTION,
                reason,
            }),
            LoadStatus::Present | LoadStatus::Missing => Ok(self.records),
        }
    }
}

// ============================================================================
// RECORD STORE
// ============================================================================

/// Load/save of named collections over a [`Backend`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RecordStore {
    backend: Arc<dyn Backend>,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        RecordStore { backend }
    }

    /// Store backed by JSON files in `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileBackend::new(dir)))
    }

    /// Store backed by memory only.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Load a whole collection. Never fails; see [`LoadStatus`].
    ///
    /// Records written before identities existed get one here, and the
    /// collection is saved back so the ids stick.
    pub fn load<T: Record>(&self) -> Loaded<T> {
        let mut loaded = self.read_collection::<T>();

        let mut assigned = 0;
        for record in loaded.records.iter_mut().filter(|r| r.id().is_empty()) {
            record.set_id(new_id());
            assigned += 1;
        }

        if assigned > 0 {
            info!(
                collection = T::COLLECTION,
                "Assigned ids to {} legacy records", assigned
            );
            if let Err(e) = self.save(&loaded.records) {
                warn!(collection = T::COLLECTION, "Could not persist migrated ids: {}", e);
            }
        }

        loaded
    }

    /// Load a collection that is about to be modified and saved.
    ///
    /// Fails with a decode error rather than handing back an empty list that
    /// would overwrite the unreadable document on save.
    pub fn load_for_update<T: Record>(&self) -> Result<Vec<T>> {
        self.load::<T>().require()
    }

    /// Overwrite a whole collection.
    pub fn save<T: Record>(&self, records: &[T]) -> Result<()> {
        let contents = to_pretty_json(&records)?;
        self.write_raw(T::FILE, &contents)?;
        debug!(collection = T::COLLECTION, "Saved {} records", records.len());
        Ok(())
    }

    /// Load a singleton document, falling back to its default.
    pub fn load_document<T: Document>(&self) -> T {
        match self.backend.read(T::FILE) {
            Ok(Some(contents)) if contents.trim().is_empty() => T::default(),
            Ok(Some(contents)) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(file = T::FILE, "Document unreadable, using default: {}", e);
                T::default()
            }),
            Ok(None) => T::default(),
            Err(e) => {
                warn!(file = T::FILE, "Document unreadable, using default: {}", e);
                T::default()
            }
        }
    }

    /// Overwrite a singleton document.
    pub fn save_document<T: Document>(&self, document: &T) -> Result<()> {
        let contents = to_pretty_json(document)?;
        self.write_raw(T::FILE, &contents)?;
        debug!(file = T::FILE, "Saved document");
        Ok(())
    }

    /// Status of a collection without migrating or returning its records.
    pub fn status<T: Record>(&self) -> LoadStatus {
        self.read_collection::<T>().status
    }

    fn read_collection<T: Record>(&self) -> Loaded<T> {
        let contents = match self.backend.read(T::FILE) {
            Ok(Some(contents)) => contents,
            Ok(None) => {
                debug!(collection = T::COLLECTION, "No document yet");
                return Loaded {
                    records: Vec::new(),
                    status: LoadStatus::Missing,
                };
            }
            Err(e) => return unreadable::<T>(e.to_string()),
        };

        if contents.trim().is_empty() {
            return Loaded {
                records: Vec::new(),
                status: LoadStatus::Present,
            };
        }

        match serde_json::from_str::<Vec<T>>(&contents) {
            Ok(records) => {
                debug!(collection = T::COLLECTION, "Loaded {} records", records.len());
                Loaded {
                    records,
                    status: LoadStatus::Present,
                }
            }
            Err(e) => unreadable::<T>(e.to_string()),
        }
    }

    fn write_raw(&self, name: &str, contents: &str) -> Result<()> {
        self.backend
            .write(name, contents)
            .map_err(|source| PlannerError::Io {
                path: self.backend.location(name),
                source,
            })
    }
}

fn unreadable<T: Record>(reason: String) -> Loaded<T> {
    warn!(
        collection = T::COLLECTION,
        file = T::FILE,
        "Collection unreadable, treating as empty: {}",
        reason
    );
    Loaded {
        records: Vec::new(),
        status: LoadStatus::Unreadable(reason),
    }
}

/// JSON with four-space indentation, matching what earlier versions wrote.
fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        #[serde(default)]
        id: String,
        text: String,
    }

    impl Record for Note {
        const COLLECTION: &'static str = "note";
        const FILE: &'static str = "notes.json";

        fn id(&self) -> &str {
            &self.id
        }

        fn set_id(&mut self, id: String) {
            self.id = id;
        }
    }

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        value: u32,
    }

    impl Document for Counter {
        const FILE: &'static str = "counter.json";
    }

    fn note(text: &str) -> Note {
        Note {
            id: new_id(),
            text: text.to_string(),
        }
    }

    fn store_with(name: &str, contents: &str) -> RecordStore {
        RecordStore::new(Arc::new(MemoryBackend::new().with_document(name, contents)))
    }

    #[test]
    fn test_missing_collection_is_empty() {
        let store = RecordStore::in_memory();
        let loaded = store.load::<Note>();

        assert!(loaded.records.is_empty());
        assert_eq!(loaded.status, LoadStatus::Missing);
    }

    #[test]
    fn test_corrupted_collection_is_empty_and_flagged() {
        let store = store_with("notes.json", "{ this is not json");
        let loaded = store.load::<Note>();

        assert!(loaded.records.is_empty());
        assert!(loaded.status.is_unreadable());
    }

    #[test]
    fn test_wrong_shape_is_unreadable() {
        let store = store_with("notes.json", r#"{"text": "not an array"}"#);
        assert!(store.status::<Note>().is_unreadable());
    }

    #[test]
    fn test_blank_file_is_present_and_empty() {
        let store = store_with("notes.json", "  \n");
        let loaded = store.load::<Note>();

        assert!(loaded.records.is_empty());
        assert_eq!(loaded.status, LoadStatus::Present);
    }

    #[test]
    fn test_load_for_update_refuses_unreadable() {
        let store = store_with("notes.json", "[{");
        let err = store.load_for_update::<Note>().unwrap_err();

        assert!(matches!(err, PlannerError::Decode { collection: "note", .. }));
    }

    #[test]
    fn test_save_then_load_is_fixed_point() {
        let store = RecordStore::in_memory();
        let notes = vec![note("first"), note("second")];

        store.save(&notes).unwrap();
        let loaded = store.load::<Note>();
        assert_eq!(loaded.status, LoadStatus::Present);
        assert_eq!(loaded.records, notes);

        store.save(&loaded.records).unwrap();
        assert_eq!(store.load::<Note>().records, notes);
    }

    #[test]
    fn test_legacy_records_get_persisted_ids() {
        let backend = Arc::new(
            MemoryBackend::new().with_document("notes.json", r#"[{"text":"a"},{"text":"b"}]"#),
        );
        let store = RecordStore::new(backend.clone());

        let first = store.load::<Note>().records;
        assert!(first.iter().all(|n| !n.id.is_empty()));
        assert_ne!(first[0].id, first[1].id);

        // ids were written back, so a second load sees the same ones
        let second = store.load::<Note>().records;
        assert_eq!(first, second);
        assert!(backend.raw("notes.json").unwrap().contains(&first[0].id));
    }

    #[test]
    fn test_saved_json_uses_four_space_indent() {
        let backend = Arc::new(MemoryBackend::new());
        let store = RecordStore::new(backend.clone());
        store.save(&[note("x")]).unwrap();

        let raw = backend.raw("notes.json").unwrap();
        assert!(raw.starts_with("[\n    {\n        \"id\""));
    }

    #[test]
    fn test_document_defaults_and_round_trip() {
        let store = RecordStore::in_memory();
        assert_eq!(store.load_document::<Counter>(), Counter::default());

        store.save_document(&Counter { value: 7 }).unwrap();
        assert_eq!(store.load_document::<Counter>().value, 7);
    }

    #[test]
    fn test_corrupted_document_is_default() {
        let store = store_with("counter.json", "[1, 2");
        assert_eq!(store.load_document::<Counter>(), Counter::default());
    }

    #[test]
    fn test_file_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("data"));

        assert_eq!(store.status::<Note>(), LoadStatus::Missing);

        let notes = vec![note("on disk")];
        store.save(&notes).unwrap();

        assert!(dir.path().join("data").join("notes.json").exists());
        assert_eq!(store.load::<Note>().records, notes);
    }

    #[test]
    fn test_file_backend_corrupted_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.json"), "definitely not json").unwrap();

        let store = RecordStore::open(dir.path());
        let loaded = store.load::<Note>();
        assert!(loaded.records.is_empty());
        assert!(loaded.status.is_unreadable());

        // the corrupted file is left alone
        let raw = fs::read_to_string(dir.path().join("notes.json")).unwrap();
        assert_eq!(raw, "definitely not json");
    }
}
