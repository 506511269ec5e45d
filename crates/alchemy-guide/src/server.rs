/// MCP server for the alchemy guide.
///
/// Exposes tools:
/// - `search_effects`: effects by type and substring, each with its ingredients
/// - `search_recipes`: curated recipes by substring
/// - `list_categories`: effect counts per type plus the recipe count
/// - `reload_catalog`: re-fetch the alchemy document
use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::Serialize;
use tracing::info;

use codex_common::api::{
    CategoryCount, CategoryListResponse, LoadStatus, QueryParams, ReloadCatalogResponse,
    SearchParams,
};
use codex_common::store::{CatalogStore, Snapshot};
use codex_common::text::SearchTerm;

use crate::model::{AlchemyCatalog, Ingredient, Recipe};
use crate::search::{
    filter_effects, filter_recipes, recipe_effect_names, recipe_spawn_commands, spawn_command,
    EffectFilter, EffectKind, EffectMatch,
};

#[derive(Debug, Serialize, JsonSchema)]
struct IngredientView {
    name: String,
    id: String,
    /// Console command spawning one unit.
    command: String,
}

#[derive(Debug, Serialize, JsonSchema)]
struct EffectView {
    key: String,
    name: String,
    description: String,
    #[serde(rename = "type")]
    kind: String,
    ingredient_count: usize,
    ingredients: Vec<IngredientView>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct SearchEffectsResponse {
    status: LoadStatus,
    error: Option<String>,
    category: String,
    count: usize,
    effects: Vec<EffectView>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct RecipeView {
    name: String,
    ingredients: Vec<String>,
    /// Effect names; keys missing from the catalog are shown as-is.
    effects: Vec<String>,
    /// Value tier, upper-cased.
    value: String,
    /// Spawn commands for the ingredients present in the catalog.
    spawn_commands: Vec<IngredientView>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct SearchRecipesResponse {
    status: LoadStatus,
    error: Option<String>,
    count: usize,
    recipes: Vec<RecipeView>,
}

#[derive(Clone)]
pub struct AlchemyGuideServer {
    store: CatalogStore<AlchemyCatalog>,
    tool_router: ToolRouter<AlchemyGuideServer>,
}

impl AlchemyGuideServer {
    pub fn new(store: CatalogStore<AlchemyCatalog>) -> Self {
        Self {
            store,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl AlchemyGuideServer {
    #[tool(description = "Search alchemy effects by type (all, beneficial, harmful) and a case-insensitive substring of the effect name or description. Each effect lists every ingredient that grants it with a spawn command.")]
    async fn search_effects(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<Json<SearchEffectsResponse>, String> {
        let filter = EffectFilter::parse(params.category.as_deref()).map_err(|e| e.to_string())?;
        let term = SearchTerm::from(params.query.as_deref());

        let snapshot = self.store.snapshot().await;
        let (status, error) = LoadStatus::of(&snapshot);
        let effects: Vec<EffectView> = match &snapshot {
            Snapshot::Ready(catalog) => filter_effects(catalog, filter, &term)
                .into_iter()
                .map(effect_view)
                .collect(),
            _ => Vec::new(),
        };
        info!(
            category = filter.key(),
            query = term.as_str(),
            count = effects.len(),
            "search_effects"
        );

        Ok(Json(SearchEffectsResponse {
            status,
            error,
            category: filter.key().to_string(),
            count: effects.len(),
            effects,
        }))
    }

    #[tool(description = "Search curated alchemy recipes by a case-insensitive substring of the recipe name, ingredient names or effect keys.")]
    async fn search_recipes(
        &self,
        Parameters(params): Parameters<QueryParams>,
    ) -> Result<Json<SearchRecipesResponse>, String> {
        let term = SearchTerm::from(params.query.as_deref());

        let snapshot = self.store.snapshot().await;
        let (status, error) = LoadStatus::of(&snapshot);
        let recipes: Vec<RecipeView> = match &snapshot {
            Snapshot::Ready(catalog) => filter_recipes(catalog, &term)
                .into_iter()
                .map(|recipe| recipe_view(catalog, recipe))
                .collect(),
            _ => Vec::new(),
        };
        info!(query = term.as_str(), count = recipes.len(), "search_recipes");

        Ok(Json(SearchRecipesResponse {
            status,
            error,
            count: recipes.len(),
            recipes,
        }))
    }

    #[tool(description = "List effect categories (all, beneficial, harmful) with effect counts, plus the number of recipes.")]
    async fn list_categories(&self) -> Result<Json<CategoryListResponse>, String> {
        let snapshot = self.store.snapshot().await;
        let (status, error) = LoadStatus::of(&snapshot);
        let categories = match &snapshot {
            Snapshot::Ready(catalog) => category_counts(catalog),
            _ => Vec::new(),
        };

        Ok(Json(CategoryListResponse {
            status,
            error,
            categories,
        }))
    }

    #[tool(description = "Re-fetch the alchemy document and swap it in if its content changed.")]
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

fn category_counts(catalog: &AlchemyCatalog) -> Vec<CategoryCount> {
    let mut counts = vec![CategoryCount {
        key: "all".to_string(),
        label: "ALL".to_string(),
        count: catalog.effects.len(),
    }];
    for kind in EffectKind::ALL {
        counts.push(CategoryCount {
            key: kind.key().to_string(),
            label: kind.label().to_string(),
            count: catalog
                .effects
                .values()
                .filter(|effect| EffectFilter::Only(kind).admits(effect))
                .count(),
        });
    }
    counts.push(CategoryCount {
        key: "recipes".to_string(),
        label: "RECIPES".to_string(),
        count: catalog.recipes.len(),
    });
    counts
}

fn ingredient_view(ingredient: &Ingredient) -> IngredientView {
    IngredientView {
        name: ingredient.name.clone(),
        id: ingredient.id.clone(),
        command: spawn_command(&ingredient.id),
    }
}

fn effect_view(matched: EffectMatch<'_>) -> EffectView {
    EffectView {
        key: matched.key.to_string(),
        name: matched.effect.name.clone(),
        description: matched.effect.description.clone(),
        kind: matched.effect.kind.clone(),
        ingredient_count: matched.ingredients.len(),
        ingredients: matched.ingredients.into_iter().map(ingredient_view).collect(),
    }
}

fn recipe_view(catalog: &AlchemyCatalog, recipe: &Recipe) -> RecipeView {
    RecipeView {
        name: recipe.name.clone(),
        ingredients: recipe.ingredients.clone(),
        effects: recipe_effect_names(catalog, recipe),
        value: recipe.value.to_uppercase(),
        spawn_commands: recipe_spawn_commands(catalog, recipe)
            .into_iter()
            .map(|(ingredient, command)| IngredientView {
                name: ingredient.name.clone(),
                id: ingredient.id.clone(),
                command,
            })
            .collect(),
    }
}

#[tool_handler]
impl ServerHandler for AlchemyGuideServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "alchemy-guide".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Skyrim alchemy guide. Use search_effects to find effects and the ingredients \
                 that grant them, search_recipes for curated potion and poison recipes, and \
                 list_categories for counts. Ingredient entries include player.additem spawn \
                 commands."
                    .to_string(),
            ),
        }
    }
}
