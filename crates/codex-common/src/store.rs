/// Shared in-memory catalog with an explicit load lifecycle.
///
/// The store starts in `Loading`, moves to `Ready` or `Failed` exactly once when
/// the initial fetch resolves, and never retries a failed fetch. Readers take an
/// `Arc` snapshot so filtering never runs while the lock is held.
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::error::CommonError;
use crate::source::{fetch_document, CatalogSource, FetchLimits};

enum LoadState<T> {
    Loading,
    Ready {
        catalog: Arc<T>,
        fingerprint: String,
    },
    Failed(String),
}

/// Point-in-time view of the store, handed to the pure filter functions.
pub enum Snapshot<T> {
    Loading,
    Ready(Arc<T>),
    Failed(String),
}

/// Result of a reload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadResult {
    /// Whether the catalog content changed and was swapped in.
    pub updated: bool,
    /// Fingerprint of the catalog now being served.
    pub fingerprint: String,
}

pub struct CatalogStore<T> {
    source: CatalogSource,
    limits: FetchLimits,
    state: Arc<RwLock<LoadState<T>>>,
}

impl<T> Clone for CatalogStore<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            limits: self.limits,
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> CatalogStore<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(source: CatalogSource, limits: FetchLimits) -> Self {
        Self {
            source,
            limits,
            state: Arc::new(RwLock::new(LoadState::Loading)),
        }
    }

    /// A store that is already `Ready`, for callers that parsed the catalog themselves.
    pub fn with_catalog(
        source: CatalogSource,
        limits: FetchLimits,
        catalog: T,
        fingerprint: String,
    ) -> Self {
        Self {
            source,
            limits,
            state: Arc::new(RwLock::new(LoadState::Ready {
                catalog: Arc::new(catalog),
                fingerprint,
            })),
        }
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Run the initial fetch on the runtime; tools observe `Loading` until it resolves.
    pub fn spawn_initial_load(&self) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move { store.load_initial().await })
    }

    pub async fn load_initial(&self) {
        let result = fetch_document(&self.source, self.limits)
            .await
            .and_then(|doc| Ok((doc.parse::<T>()?, doc.fingerprint)));

        let mut state = self.state.write().await;
        match result {
            Ok((catalog, fingerprint)) => {
                info!(source = %self.source, fingerprint = %fingerprint, "catalog loaded");
                *state = LoadState::Ready {
                    catalog: Arc::new(catalog),
                    fingerprint,
                };
            }
            Err(e) => {
                error!(source = %self.source, error = %e, "catalog load failed");
                *state = LoadState::Failed(e.to_string());
            }
        }
    }

    pub async fn snapshot(&self) -> Snapshot<T> {
        match &*self.state.read().await {
            LoadState::Loading => Snapshot::Loading,
            LoadState::Ready { catalog, .. } => Snapshot::Ready(Arc::clone(catalog)),
            LoadState::Failed(message) => Snapshot::Failed(message.clone()),
        }
    }

    /// The loaded catalog, or the reason it is not available.
    pub async fn catalog(&self) -> Result<Arc<T>, CommonError> {
        match self.snapshot().await {
            Snapshot::Ready(catalog) => Ok(catalog),
            Snapshot::Loading => Err(CommonError::Loading),
            Snapshot::Failed(message) => Err(CommonError::Unavailable(message)),
        }
    }

    /// Re-fetch the document and swap the catalog iff its fingerprint changed.
    ///
    /// Only valid once the initial load succeeded. A failed reload keeps the
    /// catalog that is currently served.
    pub async fn reload(&self) -> Result<ReloadResult, CommonError> {
        let current = match &*self.state.read().await {
            LoadState::Loading => return Err(CommonError::Loading),
            LoadState::Failed(message) => return Err(CommonError::Unavailable(message.clone())),
            LoadState::Ready { fingerprint, .. } => fingerprint.clone(),
        };

        let doc = fetch_document(&self.source, self.limits).await?;
        if doc.fingerprint == current {
            info!(fingerprint = %current, "catalog up to date, skipping reload");
            return Ok(ReloadResult {
                updated: false,
                fingerprint: current,
            });
        }

        let catalog: T = doc.parse()?;
        *self.state.write().await = LoadState::Ready {
            catalog: Arc::new(catalog),
            fingerprint: doc.fingerprint.clone(),
        };
        info!(previous = %current, fingerprint = %doc.fingerprint, "catalog reloaded");

        Ok(ReloadResult {
            updated: true,
            fingerprint: doc.fingerprint,
        })
    }
}
