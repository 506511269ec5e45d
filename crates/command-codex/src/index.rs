/// Flattening indexer for the command catalog.
///
/// Each catalog section has its own nesting shape. Sections are described by the
/// `Section` tagged union and flattened through one record constructor, so every
/// record carries its category tag and a precomputed lowercase search blob.
///
/// Category order for "all" is the order of `SECTION_TABLE`:
/// general, player, perks, shouts, weapons, armor, spells, items.
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use codex_common::text::{format_name, search_blob};

use crate::error::AppError;
use crate::model::{CommandCatalog, CommandEntry, ListedEntry, Perk, ShoutWord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    General,
    Player,
    Perk,
    Shout,
    Weapon,
    Armor,
    Spell,
    Item,
}

impl Category {
    /// Key used by clients to select the category, matching the catalog section name.
    pub fn key(self) -> &'static str {
        match self {
            Self::General => "general_commands",
            Self::Player => "player_commands",
            Self::Perk => "perks",
            Self::Shout => "dragon_shouts",
            Self::Weapon => "weapons",
            Self::Armor => "armor",
            Self::Spell => "spell_tomes",
            Self::Item => "items",
        }
    }

    /// Tag shown on every record of the category.
    pub fn label(self) -> &'static str {
        match self {
            Self::General => "GENERAL",
            Self::Player => "PLAYER",
            Self::Perk => "PERK",
            Self::Shout => "SHOUT",
            Self::Weapon => "WEAPON",
            Self::Armor => "ARMOR",
            Self::Spell => "SPELL",
            Self::Item => "ITEM",
        }
    }

    /// All categories in flattening order.
    pub fn ordered() -> impl Iterator<Item = Category> {
        SECTION_TABLE.iter().map(|(category, _)| *category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .find(|c| c.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::UnknownCategory(s.to_string()))
    }
}

/// Current category selection: one category or all of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn admits(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == category,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(category) => category.key(),
        }
    }

    /// Parse an optional client-supplied key; absent or empty means "all".
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::All),
            Some(key) => key.parse(),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse::<Category>().map(Self::Only)
        }
    }
}

/// A flattened, uniform catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchableRecord {
    pub category: Category,
    pub name: String,
    pub command: String,
    pub description: String,
    pub id: Option<String>,
    /// Lowercase concatenation of every field the record is matched on.
    pub search_blob: String,
}

impl SearchableRecord {
    fn new(
        category: Category,
        name: String,
        command: &str,
        description: String,
        id: Option<&str>,
        blob_parts: &[&str],
    ) -> Self {
        Self {
            category,
            name,
            command: command.to_string(),
            description,
            id: id.filter(|id| !id.is_empty()).map(str::to_string),
            search_blob: search_blob(blob_parts),
        }
    }
}

/// One catalog section, by nesting shape.
pub enum Section<'a> {
    /// Mapping of symbolic key to `{command, description}`.
    Keyed {
        category: Category,
        entries: &'a IndexMap<String, CommandEntry>,
    },
    /// Perks grouped by skill.
    Perks(&'a IndexMap<String, Vec<Perk>>),
    /// Shout words grouped by shout; flattened one record per word.
    Shouts(&'a IndexMap<String, Vec<ShoutWord>>),
    /// Entries that carry their own name, with a fixed description and blob keyword.
    Listed {
        category: Category,
        entries: Vec<&'a ListedEntry>,
        description: &'static str,
        keyword: Option<&'static str>,
    },
}

impl Section<'_> {
    fn flatten_into(self, out: &mut Vec<SearchableRecord>) {
        match self {
            Section::Keyed { category, entries } => {
                for (key, entry) in entries {
                    out.push(SearchableRecord::new(
                        category,
                        format_name(key),
                        &entry.command,
                        entry.description.clone(),
                        None,
                        &[key.as_str(), entry.command.as_str(), entry.description.as_str()],
                    ));
                }
            }
            Section::Perks(groups) => {
                for (skill, perks) in groups {
                    let skill_name = format_name(skill);
                    for perk in perks {
                        out.push(SearchableRecord::new(
                            Category::Perk,
                            format!("{} ({skill_name})", perk.name),
                            &perk.command,
                            perk.description.clone(),
                            perk.id.as_deref(),
                            &[
                                perk.name.as_str(),
                                skill.as_str(),
                                perk.command.as_str(),
                                perk.description.as_str(),
                            ],
                        ));
                    }
                }
            }
            Section::Shouts(shouts) => {
                for (shout, words) in shouts {
                    let shout_name = format_name(shout);
                    for (index, word) in words.iter().enumerate() {
                        out.push(SearchableRecord::new(
                            Category::Shout,
                            format!("{shout_name} - {}", word.word),
                            &word.command,
                            format!(
                                "Word {}: \"{}\" means {}",
                                index + 1,
                                word.word,
                                word.translation
                            ),
                            word.id.as_deref(),
                            &[
                                shout.as_str(),
                                word.word.as_str(),
                                word.translation.as_str(),
                                word.command.as_str(),
                            ],
                        ));
                    }
                }
            }
            Section::Listed {
                category,
                entries,
                description,
                keyword,
            } => {
                for entry in entries {
                    let mut parts = vec![entry.name.as_str(), entry.command.as_str()];
                    parts.extend(keyword);
                    out.push(SearchableRecord::new(
                        category,
                        entry.name.clone(),
                        &entry.command,
                        description.to_string(),
                        entry.id.as_deref(),
                        &parts,
                    ));
                }
            }
        }
    }
}

type SectionsFn = for<'a> fn(&'a CommandCatalog) -> Vec<Section<'a>>;

/// Category lookup table, in "all" order.
static SECTION_TABLE: [(Category, SectionsFn); 8] = [
    (Category::General, general_sections),
    (Category::Player, player_sections),
    (Category::Perk, perk_sections),
    (Category::Shout, shout_sections),
    (Category::Weapon, weapon_sections),
    (Category::Armor, armor_sections),
    (Category::Spell, spell_sections),
    (Category::Item, item_sections),
];

fn general_sections(catalog: &CommandCatalog) -> Vec<Section<'_>> {
    vec![Section::Keyed {
        category: Category::General,
        entries: &catalog.general_commands,
    }]
}

fn player_sections(catalog: &CommandCatalog) -> Vec<Section<'_>> {
    vec![Section::Keyed {
        category: Category::Player,
        entries: &catalog.player_commands,
    }]
}

fn perk_sections(catalog: &CommandCatalog) -> Vec<Section<'_>> {
    vec![Section::Perks(&catalog.perks)]
}

fn shout_sections(catalog: &CommandCatalog) -> Vec<Section<'_>> {
    vec![Section::Shouts(&catalog.dragon_shouts)]
}

fn listed<'a>(
    category: Category,
    entries: impl IntoIterator<Item = &'a ListedEntry>,
    description: &'static str,
    keyword: Option<&'static str>,
) -> Section<'a> {
    Section::Listed {
        category,
        entries: entries.into_iter().collect(),
        description,
        keyword,
    }
}

fn weapon_sections(catalog: &CommandCatalog) -> Vec<Section<'_>> {
    vec![
        listed(Category::Weapon, &catalog.weapons.unique, "Unique Weapon", Some("weapon")),
        listed(
            Category::Weapon,
            &catalog.weapons.daedric,
            "Daedric Weapon",
            Some("daedric weapon"),
        ),
    ]
}

fn armor_sections(catalog: &CommandCatalog) -> Vec<Section<'_>> {
    vec![
        listed(
            Category::Armor,
            &catalog.armor.dragonscale_light,
            "Light Armor (Dragonscale)",
            Some("dragonscale armor"),
        ),
        listed(
            Category::Armor,
            &catalog.armor.daedric_heavy,
            "Heavy Armor (Daedric)",
            Some("daedric armor"),
        ),
    ]
}

fn spell_sections(catalog: &CommandCatalog) -> Vec<Section<'_>> {
    vec![listed(Category::Spell, &catalog.spell_tomes, "Spell Tome", Some("spell tome"))]
}

fn item_sections(catalog: &CommandCatalog) -> Vec<Section<'_>> {
    vec![
        listed(Category::Item, catalog.basic_items.values(), "Basic Item", None),
        listed(Category::Item, &catalog.jewelry, "Jewelry", Some("jewelry")),
        listed(Category::Item, &catalog.ingots, "Ingot (Crafting Material)", Some("ingot")),
        listed(Category::Item, &catalog.soul_gems, "Soul Gem", Some("soul gem")),
        listed(Category::Item, &catalog.crafting_parts, "Crafting Material", Some("crafting")),
    ]
}

/// Flatten the sections admitted by `filter`, in fixed category order.
pub fn flatten(catalog: &CommandCatalog, filter: CategoryFilter) -> Vec<SearchableRecord> {
    let mut records = Vec::new();
    for (category, sections) in SECTION_TABLE {
        if !filter.admits(category) {
            continue;
        }
        for section in sections(catalog) {
            section.flatten_into(&mut records);
        }
    }
    records
}

/// Record count per category, in category order.
pub fn category_counts(catalog: &CommandCatalog) -> Vec<(Category, usize)> {
    Category::ordered()
        .map(|category| (category, flatten(catalog, CategoryFilter::Only(category)).len()))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_catalog() -> CommandCatalog {
        serde_json::from_str(
            r#"{
            "general_commands": {
                "toggle_god_mode": {"command": "tgm", "description": "Toggle god mode"},
                "toggle_collision": {"command": "tcl", "description": "Toggle collision"}
            },
            "player_commands": {
                "set_level": {"command": "player.setlevel <level>", "description": "Set the player's level"}
            },
            "perks": {
                "one_handed": [
                    {"name": "Armsman", "command": "player.addperk 000BABE4", "description": "One-handed weapons do more damage", "id": "000BABE4"}
                ]
            },
            "dragon_shouts": {
                "unrelenting_force": [
                    {"word": "Fus", "translation": "Force", "command": "player.teachword 13E22", "id": "13E22"},
                    {"word": "Ro", "translation": "Balance", "command": "player.teachword 13E23", "id": "13E23"},
                    {"word": "Dah", "translation": "Push", "command": "player.teachword 13E24", "id": "13E24"}
                ]
            },
            "weapons": {
                "unique": [{"name": "Dawnbreaker", "command": "player.additem 0002ACD2 1", "id": "0002ACD2"}],
                "daedric": [{"name": "Daedric Sword", "command": "player.additem 000139B9 1", "id": "000139B9"}]
            },
            "armor": {
                "dragonscale_light": [{"name": "Dragonscale Armor", "command": "player.additem 0001393E 1", "id": "0001393E"}],
                "daedric_heavy": [{"name": "Daedric Armor", "command": "player.additem 0001396B 1", "id": "0001396B"}]
            },
            "spell_tomes": [{"name": "Fireball", "command": "player.additem 0010F7F4 1", "id": "0010F7F4"}],
            "basic_items": {
                "gold": {"name": "Gold", "command": "player.additem f 1000", "id": "f"}
            },
            "jewelry": [{"name": "Gold Ring", "command": "player.additem 0001CF2B 1", "id": "0001CF2B"}],
            "ingots": [{"name": "Ebony Ingot", "command": "player.additem 0005AD9D 10", "id": "0005AD9D"}],
            "soul_gems": [{"name": "Black Soul Gem", "command": "player.additem 0002E500 1", "id": "0002E500"}],
            "crafting_parts": [{"name": "Leather Strips", "command": "player.additem 000800E4 10", "id": "000800E4"}],
            "magic_effects": {
                "fortify_skills": [
                    {"name": "Fortify One-handed", "id": "0007A0F5", "description": "One-handed attacks do more damage"},
                    {"name": "Fortify Archery", "id": "0007A0F6", "description": "Bows do more damage"}
                ],
                "elemental": [
                    {"name": "Fire Damage", "id": "0004605A", "description": "Burns the target"}
                ]
            },
            "enchantable_items": [
                {"name": "Iron Sword", "id": "00012EB7", "type": "weapon"},
                {"name": "Gold Ring", "id": "0001CF2B", "type": "ring"}
            ]
        }"#,
        )
        .expect("sample catalog")
    }

    #[test]
    fn category_keys_round_trip() {
        for category in Category::ordered() {
            assert_eq!(category.key().parse::<Category>().unwrap(), category);
        }
        assert!(matches!(
            "builder".parse::<Category>(),
            Err(AppError::UnknownCategory(_))
        ));
        assert_eq!(CategoryFilter::parse(None).unwrap(), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(Some("ALL")).unwrap(), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse(Some("perks")).unwrap(),
            CategoryFilter::Only(Category::Perk)
        );
    }

    #[test]
    fn keyed_sections_use_formatted_key() {
        let records = flatten(&sample_catalog(), CategoryFilter::Only(Category::General));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Toggle God Mode");
        assert_eq!(records[0].command, "tgm");
        assert_eq!(records[0].search_blob, "toggle_god_mode tgm toggle god mode");
        assert_eq!(records[0].id, None);
        assert_eq!(records[1].name, "Toggle Collision");
    }

    #[test]
    fn perk_names_include_skill() {
        let records = flatten(&sample_catalog(), CategoryFilter::Only(Category::Perk));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Armsman (One Handed)");
        assert_eq!(records[0].id.as_deref(), Some("000BABE4"));
        assert!(records[0].search_blob.contains("one_handed"));
        assert!(records[0].search_blob.contains("armsman"));
    }

    #[test]
    fn shouts_flatten_one_record_per_word() {
        let records = flatten(&sample_catalog(), CategoryFilter::Only(Category::Shout));
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "Unrelenting Force - Fus");
        assert_eq!(records[0].description, "Word 1: \"Fus\" means Force");
        assert_eq!(records[2].description, "Word 3: \"Dah\" means Push");
        assert_eq!(
            records[1].search_blob,
            "unrelenting_force ro balance player.teachword 13e23"
        );
    }

    #[test]
    fn listed_sections_use_fixed_descriptions() {
        let records = flatten(&sample_catalog(), CategoryFilter::Only(Category::Item));
        let descriptions: Vec<&str> = records.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(
            descriptions,
            [
                "Basic Item",
                "Jewelry",
                "Ingot (Crafting Material)",
                "Soul Gem",
                "Crafting Material"
            ]
        );
        assert_eq!(records[0].search_blob, "gold player.additem f 1000");
        assert_eq!(records[3].search_blob, "black soul gem player.additem 0002e500 1 soul gem");

        let armor = flatten(&sample_catalog(), CategoryFilter::Only(Category::Armor));
        assert_eq!(armor[0].description, "Light Armor (Dragonscale)");
        assert!(armor[1].search_blob.ends_with("daedric armor"));
    }

    #[test]
    fn all_is_ordered_union_of_categories() {
        let catalog = sample_catalog();
        let all = flatten(&catalog, CategoryFilter::All);
        let union: Vec<SearchableRecord> = Category::ordered()
            .flat_map(|c| flatten(&catalog, CategoryFilter::Only(c)))
            .collect();
        assert_eq!(all, union);

        let order: Vec<Category> = Category::ordered().collect();
        assert_eq!(
            order,
            [
                Category::General,
                Category::Player,
                Category::Perk,
                Category::Shout,
                Category::Weapon,
                Category::Armor,
                Category::Spell,
                Category::Item
            ]
        );
    }

    #[test]
    fn null_fields_flatten_as_empty_values() {
        let catalog: CommandCatalog = serde_json::from_str(
            r#"{
                "jewelry": [{"name": "Ring", "command": "x", "id": null, "description": null}],
                "perks": {"one_handed": [{"name": "Armsman", "command": "c", "description": null}]},
                "general_commands": {"toggle_god_mode": {"command": "tgm", "description": null}},
                "armor": null
            }"#,
        )
        .expect("null fields should not reject the catalog");

        let records = flatten(&catalog, CategoryFilter::All);
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Toggle God Mode", "Armsman (One Handed)", "Ring"]);
        assert_eq!(records[0].description, "");
        assert_eq!(records[1].description, "");
        assert_eq!(records[2].id, None);
    }

    #[test]
    fn absent_sections_flatten_to_nothing() {
        let catalog = CommandCatalog::default();
        assert!(flatten(&catalog, CategoryFilter::All).is_empty());
        assert!(category_counts(&catalog).iter().all(|(_, n)| *n == 0));
    }

    #[test]
    fn category_counts_follow_order() {
        let counts = category_counts(&sample_catalog());
        assert_eq!(counts[0], (Category::General, 2));
        assert_eq!(counts[3], (Category::Shout, 3));
        assert_eq!(counts[7], (Category::Item, 5));
    }
}
