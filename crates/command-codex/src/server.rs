/// MCP server for the command catalog.
///
/// Exposes tools:
/// - `search_commands`: category + substring search over the flattened catalog
/// - `list_categories`: record counts per category
/// - `enter_builder` / `builder_options` / `builder_select` / `builder_copy` / `exit_builder`:
///   the enchantment command builder
/// - `reload_catalog`: re-fetch the catalog document
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use codex_common::api::{
    CategoryCount, CategoryListResponse, LoadStatus, ReloadCatalogResponse, SearchParams,
};
use codex_common::store::{CatalogStore, Snapshot};
use codex_common::text::{format_name, SearchTerm};

use crate::builder::{
    enchantment_options, item_label, BuilderField, BuilderState, Composition,
};
use crate::error::AppError;
use crate::index::{category_counts, CategoryFilter, SearchableRecord};
use crate::model::{CommandCatalog, EnchantableItem, Enchantment};
use crate::search::{search, SearchOutcome};

#[derive(Debug, Deserialize, JsonSchema)]
struct BuilderOptionsParams {
    /// Enchantment category key, e.g. "fortify_skills".
    category: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct BuilderSelectParams {
    /// Which dropdown changed.
    field: BuilderField,
    /// Item id, enchantment category key, or enchantment id. Omit or leave empty to clear.
    value: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct CommandRecord {
    category: String,
    name: String,
    command: String,
    description: String,
    id: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct SearchCommandsResponse {
    status: LoadStatus,
    error: Option<String>,
    category: String,
    count: usize,
    records: Vec<CommandRecord>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct ItemPreview {
    label: String,
    name: String,
    id: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Serialize, JsonSchema)]
struct EnchantmentPreview {
    name: String,
    mgef_id: String,
    description: String,
}

#[derive(Debug, Serialize, JsonSchema)]
struct EnchantCategoryInfo {
    key: String,
    label: String,
    count: usize,
}

#[derive(Debug, Serialize, JsonSchema)]
struct BuilderView {
    /// The composed command, or a placeholder while not ready.
    command: String,
    ready: bool,
    item: Option<ItemPreview>,
    enchant1_category: Option<String>,
    enchant1: Option<EnchantmentPreview>,
    enchant2_category: Option<String>,
    enchant2: Option<EnchantmentPreview>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct EnterBuilderResponse {
    items: Vec<ItemPreview>,
    enchant_categories: Vec<EnchantCategoryInfo>,
    builder: BuilderView,
}

#[derive(Debug, Serialize, JsonSchema)]
struct BuilderOptionsResponse {
    category: String,
    /// False when the category is unknown; no enchantment can be chosen then.
    enabled: bool,
    enchantments: Vec<EnchantmentPreview>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct CopyResponse {
    text: String,
}

#[derive(Debug, Serialize, JsonSchema)]
struct OkResponse {
    ok: bool,
}

#[derive(Clone)]
pub struct CommandCodexServer {
    store: CatalogStore<CommandCatalog>,
    /// `None` outside builder mode.
    builder: Arc<RwLock<Option<BuilderState>>>,
    tool_router: ToolRouter<CommandCodexServer>,
}

impl CommandCodexServer {
    pub fn new(store: CatalogStore<CommandCatalog>) -> Self {
        Self {
            store,
            builder: Arc::new(RwLock::new(None)),
            tool_router: Self::tool_router(),
        }
    }

    /// Same catalog, fresh builder session for a new client connection.
    pub fn new_session(&self) -> Self {
        Self::new(self.store.clone())
    }

    async fn catalog(&self, tool: &str) -> Result<Arc<CommandCatalog>, String> {
        self.store
            .catalog()
            .await
            .map_err(|e| format!("{tool} failed: {e}"))
    }
}

#[tool_router]
impl CommandCodexServer {
    #[tool(description = "Search console commands and item codes. Filters by category key (all, general_commands, player_commands, perks, dragon_shouts, weapons, armor, spell_tomes, items) and a case-insensitive substring.")]
    async fn search_commands(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<Json<SearchCommandsResponse>, String> {
        let filter = CategoryFilter::parse(params.category.as_deref()).map_err(|e| e.to_string())?;
        let term = SearchTerm::from(params.query.as_deref());

        let snapshot = self.store.snapshot().await;
        let (status, error, records) = match search(&snapshot, filter, &term) {
            SearchOutcome::Loading => (LoadStatus::Loading, None, Vec::new()),
            SearchOutcome::Failed(message) => (LoadStatus::Failed, Some(message), Vec::new()),
            SearchOutcome::Matches(records) => (LoadStatus::Ready, None, records),
        };
        info!(
            category = filter.key(),
            query = term.as_str(),
            count = records.len(),
            "search_commands"
        );

        Ok(Json(SearchCommandsResponse {
            status,
            error,
            category: filter.key().to_string(),
            count: records.len(),
            records: records.into_iter().map(to_api_record).collect(),
        }))
    }

    #[tool(description = "List command categories with the number of records in each.")]
    async fn list_categories(&self) -> Result<Json<CategoryListResponse>, String> {
        let snapshot = self.store.snapshot().await;
        let (status, error) = LoadStatus::of(&snapshot);
        let categories: Vec<CategoryCount> = match &snapshot {
            Snapshot::Ready(catalog) => {
                let counts = category_counts(catalog);
                let total = counts.iter().map(|(_, count)| count).sum();
                std::iter::once(CategoryCount {
                    key: "all".to_string(),
                    label: "ALL".to_string(),
                    count: total,
                })
                .chain(counts.into_iter().map(|(category, count)| CategoryCount {
                    key: category.key().to_string(),
                    label: category.label().to_string(),
                    count,
                }))
                .collect()
            }
            _ => Vec::new(),
        };

        Ok(Json(CategoryListResponse {
            status,
            error,
            categories,
        }))
    }

    #[tool(description = "Enter enchantment builder mode. Starts an empty selection and returns the enchantable items and enchantment categories to choose from.")]
    async fn enter_builder(&self) -> Result<Json<EnterBuilderResponse>, String> {
        let catalog = self.catalog("enter_builder").await?;
        let state = BuilderState::default();
        let view = builder_view(&state);
        *self.builder.write().await = Some(state);
        info!(
            items = catalog.enchantable_items.len(),
            categories = catalog.magic_effects.len(),
            "builder mode entered"
        );

        Ok(Json(EnterBuilderResponse {
            items: catalog.enchantable_items.iter().map(item_preview).collect(),
            enchant_categories: catalog
                .magic_effects
                .iter()
                .map(|(key, effects)| EnchantCategoryInfo {
                    key: key.clone(),
                    label: format_name(key),
                    count: effects.len(),
                })
                .collect(),
            builder: view,
        }))
    }

    #[tool(description = "List the enchantments available in an enchantment category.")]
    async fn builder_options(
        &self,
        Parameters(params): Parameters<BuilderOptionsParams>,
    ) -> Result<Json<BuilderOptionsResponse>, String> {
        let catalog = self.catalog("builder_options").await?;
        let category = params.category.trim().to_string();
        let options = enchantment_options(&catalog, Some(category.as_str()));

        Ok(Json(BuilderOptionsResponse {
            enabled: options.is_some(),
            enchantments: options
                .unwrap_or_default()
                .iter()
                .map(enchantment_preview)
                .collect(),
            category,
        }))
    }

    #[tool(description = "Change one builder dropdown (item, enchant1_category, enchant1, enchant2_category, enchant2). Choosing a category clears that slot's enchantment. Returns the composed command, or a placeholder until an item and the first enchantment are chosen.")]
    async fn builder_select(
        &self,
        Parameters(params): Parameters<BuilderSelectParams>,
    ) -> Result<Json<BuilderView>, String> {
        let catalog = self.catalog("builder_select").await?;
        let mut session = self.builder.write().await;
        let current = session
            .as_ref()
            .ok_or_else(|| AppError::BuilderInactive.to_string())?;

        let next = current
            .select(&catalog, params.field, params.value.as_deref())
            .map_err(|e| format!("builder_select failed: {e}"))?;
        let view = builder_view(&next);
        *session = Some(next);
        Ok(Json(view))
    }

    #[tool(description = "Return the composed enchantment command for copying. Fails until an item and the first enchantment are selected.")]
    async fn builder_copy(&self) -> Result<Json<CopyResponse>, String> {
        let session = self.builder.read().await;
        let state = session
            .as_ref()
            .ok_or_else(|| AppError::BuilderInactive.to_string())?;
        let text = state.commit().map_err(|e| e.to_string())?;
        info!(command = %text, "builder command copied");
        Ok(Json(CopyResponse { text }))
    }

    #[tool(description = "Leave builder mode and discard the current selection.")]
    async fn exit_builder(&self) -> Result<Json<OkResponse>, String> {
        let previous = self.builder.write().await.take();
        info!(was_active = previous.is_some(), "builder mode exited");
        Ok(Json(OkResponse { ok: true }))
    }

    #[tool(description = "Re-fetch the catalog document and swap it in if its content changed.")]
    async fn reload_catalog(&self) -> Result<Json<ReloadCatalogResponse>, String> {
        info!("reload_catalog tool invoked");
        let result = self
            .store
            .reload()
            .await
            .map_err(|e| format!("reload failed: {e}"))?;

        Ok(Json(ReloadCatalogResponse {
            updated: result.updated,
            fingerprint: result.fingerprint,
            source: self.store.source().to_string(),
        }))
    }
}

fn to_api_record(record: SearchableRecord) -> CommandRecord {
    CommandRecord {
        category: record.category.label().to_string(),
        name: record.name,
        command: record.command,
        description: record.description,
        id: record.id,
    }
}

fn item_preview(item: &EnchantableItem) -> ItemPreview {
    ItemPreview {
        label: item_label(item),
        name: item.name.clone(),
        id: item.id.clone(),
        kind: item.kind.clone(),
    }
}

fn enchantment_preview(enchantment: &Enchantment) -> EnchantmentPreview {
    EnchantmentPreview {
        name: enchantment.name.clone(),
        mgef_id: enchantment.id.clone(),
        description: enchantment.description.clone(),
    }
}

fn builder_view(state: &BuilderState) -> BuilderView {
    let composition: Composition = state.composition();
    BuilderView {
        command: composition.text().to_string(),
        ready: composition.is_ready(),
        item: state.item.as_ref().map(item_preview),
        enchant1_category: state.slot1.category.clone(),
        enchant1: state.slot1.enchantment.as_ref().map(enchantment_preview),
        enchant2_category: state.slot2.category.clone(),
        enchant2: state.slot2.enchantment.as_ref().map(enchantment_preview),
    }
}

#[tool_handler]
impl ServerHandler for CommandCodexServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "command-codex".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Skyrim console command codex. Use search_commands to browse commands, perks, \
                 shouts and item codes by category and substring, list_categories for counts, \
                 and the builder tools (enter_builder, builder_options, builder_select, \
                 builder_copy, exit_builder) to compose playerenchantobject commands."
                    .to_string(),
            ),
        }
    }
}
