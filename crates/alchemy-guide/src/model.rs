use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use codex_common::de::null_as_default;

/// The alchemy document: effects keyed by effect key, the ingredients that
/// grant them, and curated recipes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlchemyCatalog {
    #[serde(deserialize_with = "null_as_default")]
    pub effects: IndexMap<String, Effect>,
    #[serde(deserialize_with = "null_as_default")]
    pub ingredients: Vec<Ingredient>,
    #[serde(deserialize_with = "null_as_default")]
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Effect {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    /// "beneficial" or "harmful".
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ingredient {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Effect keys this ingredient grants.
    #[serde(deserialize_with = "null_as_default")]
    pub effects: Vec<String>,
}

impl Ingredient {
    pub fn grants(&self, effect_key: &str) -> bool {
        self.effects.iter().any(|key| key == effect_key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipe {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Ingredient names.
    #[serde(deserialize_with = "null_as_default")]
    pub ingredients: Vec<String>,
    /// Effect keys.
    #[serde(deserialize_with = "null_as_default")]
    pub effects: Vec<String>,
    /// Value tier such as "low", "medium", "high" or "very_high".
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
}
