use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::store::Snapshot;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Category key to browse, e.g. "all" (default), "perks", "harmful".
    pub category: Option<String>,
    /// Case-insensitive substring to look for. Empty or omitted matches everything.
    pub query: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryParams {
    /// Case-insensitive substring to look for. Empty or omitted matches everything.
    pub query: Option<String>,
}

/// Load state of the catalog backing a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed,
}

impl LoadStatus {
    /// Status plus the failure message, if any.
    pub fn of<T>(snapshot: &Snapshot<T>) -> (Self, Option<String>) {
        match snapshot {
            Snapshot::Loading => (Self::Loading, None),
            Snapshot::Ready(_) => (Self::Ready, None),
            Snapshot::Failed(message) => (Self::Failed, Some(message.clone())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoryCount {
    pub key: String,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoryListResponse {
    pub status: LoadStatus,
    pub error: Option<String>,
    pub categories: Vec<CategoryCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReloadCatalogResponse {
    pub updated: bool,
    pub fingerprint: String,
    pub source: String,
}
