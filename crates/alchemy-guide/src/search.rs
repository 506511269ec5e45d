/// Effect and recipe filters for the alchemy catalog.
///
/// Effects are matched on name and description; each matched effect carries
/// every ingredient granting it, whatever the term. Recipes are matched on
/// name, ingredient names and effect keys.
use std::str::FromStr;

use codex_common::text::{search_blob, SearchTerm};

use crate::error::AppError;
use crate::model::{AlchemyCatalog, Effect, Ingredient, Recipe};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Beneficial,
    Harmful,
}

impl EffectKind {
    pub const ALL: [EffectKind; 2] = [EffectKind::Beneficial, EffectKind::Harmful];

    pub fn key(self) -> &'static str {
        match self {
            Self::Beneficial => "beneficial",
            Self::Harmful => "harmful",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Beneficial => "BENEFICIAL",
            Self::Harmful => "HARMFUL",
        }
    }
}

impl FromStr for EffectKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EffectFilter {
    #[default]
    All,
    Only(EffectKind),
}

impl EffectFilter {
    /// Effects whose type is neither beneficial nor harmful only show under "all".
    pub fn admits(self, effect: &Effect) -> bool {
        match self {
            Self::All => true,
            Self::Only(kind) => effect.kind == kind.key(),
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(kind) => kind.key(),
        }
    }

    /// Absent or empty means "all".
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::All),
            Some(key) if key.eq_ignore_ascii_case("all") => Ok(Self::All),
            Some(key) => key.parse().map(Self::Only),
        }
    }
}

/// A matched effect with the ingredients that grant it (possibly none).
#[derive(Debug, Clone, PartialEq)]
pub struct EffectMatch<'a> {
    pub key: &'a str,
    pub effect: &'a Effect,
    pub ingredients: Vec<&'a Ingredient>,
}

/// Ingredients granting `effect_key`, in catalog order.
pub fn ingredients_with_effect<'a>(
    catalog: &'a AlchemyCatalog,
    effect_key: &str,
) -> Vec<&'a Ingredient> {
    catalog
        .ingredients
        .iter()
        .filter(|ingredient| ingredient.grants(effect_key))
        .collect()
}

pub fn filter_effects<'a>(
    catalog: &'a AlchemyCatalog,
    filter: EffectFilter,
    term: &SearchTerm,
) -> Vec<EffectMatch<'a>> {
    catalog
        .effects
        .iter()
        .filter(|(_, effect)| filter.admits(effect))
        .filter(|(_, effect)| term.matches(&search_blob(&[effect.name.as_str(), effect.description.as_str()])))
        .map(|(key, effect)| EffectMatch {
            key: key.as_str(),
            effect,
            ingredients: ingredients_with_effect(catalog, key),
        })
        .collect()
}

pub fn filter_recipes<'a>(catalog: &'a AlchemyCatalog, term: &SearchTerm) -> Vec<&'a Recipe> {
    catalog
        .recipes
        .iter()
        .filter(|recipe| {
            let ingredients = recipe.ingredients.join(" ");
            let effects = recipe.effects.join(" ");
            term.matches(&search_blob(&[
                recipe.name.as_str(),
                ingredients.as_str(),
                effects.as_str(),
            ]))
        })
        .collect()
}

/// Console command that spawns one unit of an ingredient.
pub fn spawn_command(id: &str) -> String {
    format!("player.additem {id} 1")
}

/// Effect names for a recipe's effect keys; unknown keys are shown as-is.
pub fn recipe_effect_names(catalog: &AlchemyCatalog, recipe: &Recipe) -> Vec<String> {
    recipe
        .effects
        .iter()
        .map(|key| {
            catalog
                .effects
                .get(key)
                .map(|effect| effect.name.clone())
                .unwrap_or_else(|| key.clone())
        })
        .collect()
}

/// Recipe ingredients found by exact name, with their spawn commands.
/// Ingredients missing from the catalog are skipped.
pub fn recipe_spawn_commands<'a>(
    catalog: &'a AlchemyCatalog,
    recipe: &Recipe,
) -> Vec<(&'a Ingredient, String)> {
    recipe
        .ingredients
        .iter()
        .filter_map(|name| catalog.ingredients.iter().find(|i| &i.name == name))
        .map(|ingredient| (ingredient, spawn_command(&ingredient.id)))
        .collect()
}
