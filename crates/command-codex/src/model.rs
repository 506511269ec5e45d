use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use codex_common::de::null_as_default;

/// The command/item catalog document. Every section is optional; an absent
/// section deserializes as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandCatalog {
    #[serde(deserialize_with = "null_as_default")]
    pub general_commands: IndexMap<String, CommandEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub player_commands: IndexMap<String, CommandEntry>,
    /// Perks grouped by skill key, e.g. "one_handed".
    #[serde(deserialize_with = "null_as_default")]
    pub perks: IndexMap<String, Vec<Perk>>,
    /// Shout words grouped by shout key, e.g. "unrelenting_force".
    #[serde(deserialize_with = "null_as_default")]
    pub dragon_shouts: IndexMap<String, Vec<ShoutWord>>,
    #[serde(deserialize_with = "null_as_default")]
    pub weapons: Weapons,
    #[serde(deserialize_with = "null_as_default")]
    pub armor: Armor,
    #[serde(deserialize_with = "null_as_default")]
    pub spell_tomes: Vec<ListedEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub basic_items: IndexMap<String, ListedEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub jewelry: Vec<ListedEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub ingots: Vec<ListedEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub soul_gems: Vec<ListedEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub crafting_parts: Vec<ListedEntry>,
    /// Enchantments grouped by enchantment category, e.g. "fortify_skills".
    #[serde(deserialize_with = "null_as_default")]
    pub magic_effects: IndexMap<String, Vec<Enchantment>>,
    #[serde(deserialize_with = "null_as_default")]
    pub enchantable_items: Vec<EnchantableItem>,
}

/// A console command keyed by its symbolic name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub command: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Perk {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub command: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoutWord {
    #[serde(deserialize_with = "null_as_default")]
    pub word: String,
    #[serde(deserialize_with = "null_as_default")]
    pub translation: String,
    #[serde(deserialize_with = "null_as_default")]
    pub command: String,
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Weapons {
    #[serde(deserialize_with = "null_as_default")]
    pub unique: Vec<ListedEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub daedric: Vec<ListedEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Armor {
    #[serde(deserialize_with = "null_as_default")]
    pub dragonscale_light: Vec<ListedEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub daedric_heavy: Vec<ListedEntry>,
}

/// An item entry that already carries its own display name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListedEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub command: String,
    pub id: Option<String>,
}

/// A magic effect usable as an enchantment in the builder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Enchantment {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnchantableItem {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
}
