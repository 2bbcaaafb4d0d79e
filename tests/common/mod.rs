// Shared helpers for integration tests
#![allow(dead_code)]

use popcast::core::ArtifactStore;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const BASE_DIR: &str = "/srv/popcast";

/// Artifact whose prediction is `intercept` for every year
pub fn constant_artifact(intercept: f64) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "kind": "linear",
        "coefficients": [0.0],
        "intercept": intercept,
    }))
    .unwrap()
}

/// Artifact whose prediction is `slope * year`
pub fn linear_artifact(slope: f64) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "kind": "linear",
        "coefficients": [slope],
        "intercept": 0.0,
    }))
    .unwrap()
}

pub fn default_path(name: &str) -> PathBuf {
    Path::new(BASE_DIR).join(name)
}

/// In-memory artifact store that counts every access
#[derive(Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    unreadable: Mutex<HashSet<PathBuf>>,
    read_delay: Mutex<Duration>,
    accesses: AtomicUsize,
}

impl MemoryStore {
    pub fn with_file(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        let store = Self::default();
        store.put(path, bytes);
        store
    }

    pub fn put(&self, path: impl Into<PathBuf>, bytes: Vec<u8>) {
        self.files.lock().unwrap().insert(path.into(), bytes);
    }

    /// Path exists but every read of it fails, like a file without read permission
    pub fn mark_unreadable(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.files.lock().unwrap().entry(path.clone()).or_default();
        self.unreadable.lock().unwrap().insert(path);
    }

    /// Make every read block the calling thread, like a slow disk
    pub fn slow_reads(&self, delay: Duration) {
        *self.read_delay.lock().unwrap() = delay;
    }

    pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn accesses(&self) -> usize {
        self.accesses.load(Ordering::SeqCst)
    }
}

impl ArtifactStore for MemoryStore {
    fn exists(&self, path: &Path) -> bool {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        self.files.lock().unwrap().contains_key(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        let delay = *self.read_delay.lock().unwrap();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        if self.unreadable.lock().unwrap().contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"));
        }
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        self.put(path, bytes.to_vec());
        Ok(())
    }
}
