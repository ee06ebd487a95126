//! Shared test helpers: in-memory store implementations with failure
//! injection, plus subject builders.

#![allow(dead_code)]

use async_trait::async_trait;
use media_reconciler::error::{Error, Result};
use media_reconciler::models::{Category, Subject};
use media_reconciler::stores::{ObjectStore, RecordStore};
use media_reconciler::EngineConfig;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Engine config with all delays and backoffs zeroed, for fast tests.
pub fn fast_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.request_delay_ms = 0;
    config.batch_delay_ms = 0;
    config.probe_backoff_ms = 0;
    config.transfer_backoff_ms = 0;
    config.relocate_backoff_ms = 0;
    config.pointer_backoff_ms = 0;
    config
}

pub fn subject(id: &str, fields: Value) -> Subject {
    match fields {
        Value::Object(map) => Subject::new(id, map),
        _ => panic!("subject fields must be an object"),
    }
}

/// In-memory object store keyed by (bucket, key), with injectable failures
/// and operation counters.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<(Category, String), Vec<u8>>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub fail_deletes: AtomicBool,
    pub probe_count: AtomicUsize,
    pub read_count: AtomicUsize,
    pub write_count: AtomicUsize,
    pub delete_count: AtomicUsize,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, category: Category, key: &str, bytes: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert((category, key.to_string()), bytes.to_vec());
    }

    pub fn contains(&self, category: Category, key: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&(category, key.to_string()))
    }

    pub fn writes(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }

    fn parse_url(url: &str) -> (Category, String) {
        let rest = url.strip_prefix("memory://").expect("memory url");
        let (bucket, key) = rest.split_once('/').expect("bucket/key");
        (bucket.parse().expect("known bucket"), key.to_string())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn resolve_public_url(&self, category: Category, key: &str) -> String {
        format!("memory://{}/{}", category.bucket(), key)
    }

    async fn probe(&self, url: &str) -> Result<bool> {
        self.probe_count.fetch_add(1, Ordering::SeqCst);
        let (category, key) = Self::parse_url(url);
        Ok(self.objects.lock().unwrap().contains_key(&(category, key)))
    }

    async fn read(&self, category: Category, key: &str) -> Result<Vec<u8>> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Http("injected read failure".into()));
        }
        self.objects
            .lock()
            .unwrap()
            .get(&(category, key.to_string()))
            .cloned()
            .ok_or_else(|| Error::Storage { status: 404, message: format!("{category}/{key}") })
    }

    async fn write(&self, category: Category, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Http("injected write failure".into()));
        }
        self.objects
            .lock()
            .unwrap()
            .insert((category, key.to_string()), bytes);
        Ok(())
    }

    async fn delete(&self, category: Category, key: &str) -> Result<()> {
        self.delete_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Error::Storage { status: 503, message: "injected delete failure".into() });
        }
        self.objects
            .lock()
            .unwrap()
            .remove(&(category, key.to_string()));
        Ok(())
    }
}

/// In-memory record store preserving insertion order, with injectable
/// failures and mid-run document disappearance.
#[derive(Default)]
pub struct MemoryRecordStore {
    docs: Mutex<Vec<(String, Map<String, Value>)>>,
    vanished: Mutex<HashSet<String>>,
    pub fail_updates: AtomicBool,
    pub fail_get_all: AtomicBool,
}

impl MemoryRecordStore {
    pub fn new(subjects: Vec<Subject>) -> Self {
        Self {
            docs: Mutex::new(subjects.into_iter().map(|s| (s.id, s.fields)).collect()),
            vanished: Mutex::new(HashSet::new()),
            fail_updates: AtomicBool::new(false),
            fail_get_all: AtomicBool::new(false),
        }
    }

    /// Simulate an external writer deleting a record mid-run: `get_all`
    /// still lists it, but single-document reads come back empty.
    pub fn vanish(&self, id: &str) {
        self.vanished.lock().unwrap().insert(id.to_string());
    }

    pub fn field(&self, id: &str, key: &str) -> Option<Value> {
        self.docs
            .lock()
            .unwrap()
            .iter()
            .find(|(doc_id, _)| doc_id == id)
            .and_then(|(_, fields)| fields.get(key).cloned())
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get_all(&self) -> Result<Vec<Subject>> {
        if self.fail_get_all.load(Ordering::SeqCst) {
            return Err(Error::Http("injected population fetch failure".into()));
        }
        Ok(self
            .docs
            .lock()
            .unwrap()
            .iter()
            .map(|(id, fields)| Subject::new(id.clone(), fields.clone()))
            .collect())
    }

    async fn get_one(&self, id: &str) -> Result<Option<Subject>> {
        if self.vanished.lock().unwrap().contains(id) {
            return Ok(None);
        }
        Ok(self
            .docs
            .lock()
            .unwrap()
            .iter()
            .find(|(doc_id, _)| doc_id == id)
            .map(|(id, fields)| Subject::new(id.clone(), fields.clone())))
    }

    async fn update_fields(&self, id: &str, fields: Map<String, Value>) -> Result<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(Error::Http("injected record store outage".into()));
        }
        let mut docs = self.docs.lock().unwrap();
        let Some((_, document)) = docs.iter_mut().find(|(doc_id, _)| doc_id == id) else {
            return Err(Error::NotFound(format!("player {id}")));
        };
        for (key, value) in fields {
            document.insert(key, value);
        }
        Ok(())
    }
}
