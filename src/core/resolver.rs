use crate::core::model::{ModelHandle, RegressionArtifact};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

/// Default artifact filenames under the base directory, highest priority first.
///
/// The artifact has been renamed across deployments; every old name must keep
/// resolving, in this order.
pub const DEFAULT_ARTIFACT_NAMES: [&str; 4] = [
    "population.pickle4",
    "population.pickle",
    "population.pickle3",
    "population.pkl",
];

/// Errors that can occur while resolving the model artifact
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error("Model not found. Tried: {candidates:?}. Last error: {}", .last_error.as_deref().unwrap_or("none"))]
    NotFound {
        candidates: Vec<PathBuf>,
        last_error: Option<String>,
    },

    #[error("Model artifact at {} could not be decoded: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },
}

/// Optional remote location the artifact can be fetched from
#[derive(Debug, Clone)]
pub struct RemoteSource {
    pub url: String,
    pub timeout: Duration,
}

/// Where the resolver looks for the artifact
#[derive(Debug, Clone)]
pub struct ModelSource {
    pub explicit_path: Option<PathBuf>,
    pub base_dir: PathBuf,
    pub remote: Option<RemoteSource>,
}

impl ModelSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            explicit_path: None,
            base_dir: base_dir.into(),
            remote: None,
        }
    }

    /// Ordered candidate list: explicit path first, then the default names
    pub fn candidates(&self) -> Vec<PathBuf> {
        self.explicit_path
            .iter()
            .cloned()
            .chain(DEFAULT_ARTIFACT_NAMES.iter().map(|name| self.base_dir.join(name)))
            .collect()
    }

    /// Path a remotely fetched artifact is written to
    pub fn fetch_target(&self) -> PathBuf {
        self.explicit_path
            .clone()
            .unwrap_or_else(|| self.base_dir.join(DEFAULT_ARTIFACT_NAMES[0]))
    }
}

/// Storage the resolver reads artifacts from (and writes fetched ones to)
pub trait ArtifactStore: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// Local filesystem store
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl ArtifactStore for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)
    }
}

/// Process-wide resolution state
#[derive(Debug, Clone)]
pub enum ResolutionState {
    Unattempted,
    Attempted(Result<ModelHandle, LoadError>),
}

/// Resolution status as reported by the health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "lowercase")]
pub enum ModelStatus {
    Unattempted,
    Loaded,
    Failed(String),
}

/// Locates, optionally downloads, and loads the regression artifact.
///
/// A successful load is permanent for the lifetime of the resolver. A failed
/// load is remembered for diagnostics but re-attempted on the next call, so a
/// model that shows up after a deploy-order race is still picked up.
///
/// Loading is not serialized: the lock only guards the state swap, so
/// concurrent cold-start callers may each run the search. Whoever installs a
/// handle first wins and later racers return that same handle.
pub struct ModelResolver {
    source: ModelSource,
    store: Arc<dyn ArtifactStore>,
    http: reqwest::Client,
    state: RwLock<ResolutionState>,
    fetch_attempted: AtomicBool,
}

impl ModelResolver {
    /// Create a resolver backed by the local filesystem
    pub fn new(source: ModelSource) -> Self {
        Self::with_store(source, Arc::new(LocalFs))
    }

    pub fn with_store(source: ModelSource, store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            source,
            store,
            http: reqwest::Client::new(),
            state: RwLock::new(ResolutionState::Unattempted),
            fetch_attempted: AtomicBool::new(false),
        }
    }

    pub fn source(&self) -> &ModelSource {
        &self.source
    }

    /// Return the loaded model, resolving it first if needed
    pub async fn ensure_loaded(&self) -> Result<ModelHandle, LoadError> {
        if let ResolutionState::Attempted(Ok(handle)) = &*self.state.read().await {
            return Ok(handle.clone());
        }

        self.fetch_remote_once().await;
        let outcome = self.load_candidates().await;

        let mut state = self.state.write().await;
        if let ResolutionState::Attempted(Ok(installed)) = &*state {
            return Ok(installed.clone());
        }

        if let Err(e) = &outcome {
            tracing::error!("Error loading ML model: {}", e);
        }
        *state = ResolutionState::Attempted(outcome.clone());
        outcome
    }

    /// Eager load at startup; failure is logged and left for the next request
    pub async fn warm_up(&self) {
        match self.ensure_loaded().await {
            Ok(_) => tracing::info!("ML model ready"),
            Err(_) => tracing::warn!("ML model unavailable at startup, will retry on first request"),
        }
    }

    pub async fn status(&self) -> ModelStatus {
        match &*self.state.read().await {
            ResolutionState::Unattempted => ModelStatus::Unattempted,
            ResolutionState::Attempted(Ok(_)) => ModelStatus::Loaded,
            ResolutionState::Attempted(Err(e)) => ModelStatus::Failed(e.to_string()),
        }
    }

    /// Run the candidate search on the blocking pool; store reads are synchronous
    async fn load_candidates(&self) -> Result<ModelHandle, LoadError> {
        let store = Arc::clone(&self.store);
        let candidates = self.source.candidates();
        let searched = candidates.clone();

        tokio::task::spawn_blocking(move || load_first_candidate(store.as_ref(), &candidates))
            .await
            .unwrap_or_else(|e| {
                Err(LoadError::NotFound {
                    candidates: searched,
                    last_error: Some(e.to_string()),
                })
            })
    }

    /// Download the artifact once if a remote source is configured and the
    /// target does not exist yet. Every failure is non-fatal.
    async fn fetch_remote_once(&self) {
        let Some(remote) = &self.source.remote else {
            return;
        };
        if self.fetch_attempted.swap(true, Ordering::SeqCst) {
            return;
        }

        let target = self.source.fetch_target();
        if self.store.exists(&target) {
            tracing::debug!("Model already present at {}, skipping download", target.display());
            return;
        }

        tracing::info!("Downloading model from {} ...", remote.url);
        match self.download(remote).await {
            Ok(bytes) => match self.store.write(&target, &bytes) {
                Ok(()) => tracing::info!("Model downloaded to {}", target.display()),
                Err(e) => tracing::warn!("Could not write downloaded model to {}: {}", target.display(), e),
            },
            Err(e) => tracing::warn!("Could not download model: {}", e),
        }
    }

    async fn download(&self, remote: &RemoteSource) -> Result<Vec<u8>, reqwest::Error> {
        let response = self
            .http
            .get(&remote.url)
            .timeout(remote.timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Load the first candidate that exists and decodes.
///
/// Unreadable or undecodable candidates are skipped so a broken
/// higher-priority file does not shadow a good lower-priority one. If the last
/// candidate actually tried failed to decode, the result is `Corrupt`;
/// otherwise `NotFound`.
pub fn load_first_candidate(
    store: &dyn ArtifactStore,
    candidates: &[PathBuf],
) -> Result<ModelHandle, LoadError> {
    let mut last_error: Option<String> = None;
    let mut last_corrupt: Option<LoadError> = None;

    for path in candidates {
        if !store.exists(path) {
            continue;
        }

        let bytes = match store.read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to read model candidate {}: {}", path.display(), e);
                last_error = Some(e.to_string());
                last_corrupt = None;
                continue;
            }
        };

        match RegressionArtifact::from_slice(&bytes) {
            Ok(artifact) => {
                tracing::info!("ML model loaded from: {}", path.display());
                return Ok(artifact.into_handle());
            }
            Err(e) => {
                tracing::warn!("Model candidate {} is not a valid artifact: {}", path.display(), e);
                last_error = Some(e.to_string());
                last_corrupt = Some(LoadError::Corrupt {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Err(last_corrupt.unwrap_or_else(|| LoadError::NotFound {
        candidates: candidates.to_vec(),
        last_error,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_order_without_explicit_path() {
        let source = ModelSource::new("/srv/app");
        let candidates = source.candidates();
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/srv/app/population.pickle4"),
                PathBuf::from("/srv/app/population.pickle"),
                PathBuf::from("/srv/app/population.pickle3"),
                PathBuf::from("/srv/app/population.pkl"),
            ]
        );
    }

    #[test]
    fn test_explicit_path_takes_priority() {
        let mut source = ModelSource::new("/srv/app");
        source.explicit_path = Some(PathBuf::from("/models/custom.json"));
        let candidates = source.candidates();
        assert_eq!(candidates.len(), 5);
        assert_eq!(candidates[0], PathBuf::from("/models/custom.json"));
        assert_eq!(source.fetch_target(), PathBuf::from("/models/custom.json"));
    }

    #[test]
    fn test_fetch_target_defaults_to_first_name() {
        let source = ModelSource::new("/srv/app");
        assert_eq!(source.fetch_target(), PathBuf::from("/srv/app/population.pickle4"));
    }

    #[test]
    fn test_status_before_first_attempt() {
        let resolver = ModelResolver::new(ModelSource::new("/nonexistent"));
        assert_eq!(tokio_test::block_on(resolver.status()), ModelStatus::Unattempted);
    }

    #[test]
    fn test_not_found_message_lists_candidates() {
        let err = LoadError::NotFound {
            candidates: vec![PathBuf::from("a.pkl")],
            last_error: None,
        };
        let msg = err.to_string();
        assert!(msg.contains("a.pkl"));
        assert!(msg.contains("Last error: none"));
    }

    #[test]
    fn test_local_fs_round_trip() {
        let dir = std::env::temp_dir().join(format!("popcast-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("population.pkl");
        let fs = LocalFs;

        assert!(!fs.exists(&path));
        fs.write(&path, br#"{"kind":"linear","coefficients":[1.0],"intercept":0.0}"#).unwrap();
        assert!(fs.exists(&path));

        let handle = load_first_candidate(&fs, &[path.clone()]).unwrap();
        assert_eq!(handle.predict(&[vec![4.0]]).unwrap(), vec![4.0]);

        std::fs::remove_dir_all(&dir).ok();
    }
}
