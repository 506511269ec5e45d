/// Enchantment command builder.
///
/// The builder composes `playerenchantobject <item> <enchant1> [<enchant2>]` from
/// an enchantable item and up to two enchantments. Each slot picks a category
/// first; choosing a category clears that slot's enchantment so a selection from
/// another category never survives. State is immutable: every selection returns
/// a new `BuilderState`.
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::model::{CommandCatalog, EnchantableItem, Enchantment};

/// Text shown instead of a command while the builder is not ready.
pub const PLACEHOLDER: &str = "Select an item and at least one enchantment...";

const COMMAND_VERB: &str = "playerenchantobject";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    First,
    Second,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("enchantment slot 1"),
            Self::Second => f.write_str("enchantment slot 2"),
        }
    }
}

/// The five independent dropdowns of the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BuilderField {
    Item,
    Enchant1Category,
    Enchant1,
    Enchant2Category,
    Enchant2,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotSelection {
    pub category: Option<String>,
    pub enchantment: Option<Enchantment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuilderState {
    pub item: Option<EnchantableItem>,
    pub slot1: SlotSelection,
    pub slot2: SlotSelection,
}

pub enum BuilderEvent {
    SelectItem(Option<EnchantableItem>),
    SelectCategory {
        slot: Slot,
        category: Option<String>,
    },
    SelectEnchantment {
        slot: Slot,
        enchantment: Option<Enchantment>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Composition {
    NotReady,
    Ready(String),
}

impl Composition {
    /// The command, or the placeholder while not ready.
    pub fn text(&self) -> &str {
        match self {
            Self::NotReady => PLACEHOLDER,
            Self::Ready(command) => command.as_str(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Derive the command. Ready iff both the item and slot 1 are selected.
pub fn compose(
    item: Option<&EnchantableItem>,
    slot1: Option<&Enchantment>,
    slot2: Option<&Enchantment>,
) -> Composition {
    let (Some(item), Some(slot1)) = (item, slot1) else {
        return Composition::NotReady;
    };
    let mut command = format!("{COMMAND_VERB} {} {}", item.id, slot1.id);
    if let Some(slot2) = slot2 {
        command.push(' ');
        command.push_str(&slot2.id);
    }
    Composition::Ready(command)
}

impl BuilderState {
    pub fn slot(&self, slot: Slot) -> &SlotSelection {
        match slot {
            Slot::First => &self.slot1,
            Slot::Second => &self.slot2,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut SlotSelection {
        match slot {
            Slot::First => &mut self.slot1,
            Slot::Second => &mut self.slot2,
        }
    }

    pub fn apply(&self, event: BuilderEvent) -> Self {
        let mut next = self.clone();
        match event {
            BuilderEvent::SelectItem(item) => next.item = item,
            BuilderEvent::SelectCategory { slot, category } => {
                *next.slot_mut(slot) = SlotSelection {
                    category,
                    enchantment: None,
                };
            }
            BuilderEvent::SelectEnchantment { slot, enchantment } => {
                next.slot_mut(slot).enchantment = enchantment;
            }
        }
        next
    }

    pub fn composition(&self) -> Composition {
        compose(
            self.item.as_ref(),
            self.slot1.enchantment.as_ref(),
            self.slot2.enchantment.as_ref(),
        )
    }

    /// The command to copy. Refused while the builder is not ready.
    pub fn commit(&self) -> Result<String, AppError> {
        match self.composition() {
            Composition::Ready(command) => Ok(command),
            Composition::NotReady => Err(AppError::BuilderNotReady),
        }
    }

    /// Resolve a dropdown value against the catalog and apply it.
    ///
    /// An absent or empty value clears the dropdown.
    pub fn select(
        &self,
        catalog: &CommandCatalog,
        field: BuilderField,
        value: Option<&str>,
    ) -> Result<Self, AppError> {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        let event = match field {
            BuilderField::Item => {
                BuilderEvent::SelectItem(value.map(|id| resolve_item(catalog, id)).transpose()?)
            }
            BuilderField::Enchant1Category => category_event(catalog, Slot::First, value)?,
            BuilderField::Enchant2Category => category_event(catalog, Slot::Second, value)?,
            BuilderField::Enchant1 => self.enchantment_event(catalog, Slot::First, value)?,
            BuilderField::Enchant2 => self.enchantment_event(catalog, Slot::Second, value)?,
        };
        Ok(self.apply(event))
    }

    fn enchantment_event(
        &self,
        catalog: &CommandCatalog,
        slot: Slot,
        value: Option<&str>,
    ) -> Result<BuilderEvent, AppError> {
        let enchantment = match value {
            None => None,
            Some(id) => {
                let category = self
                    .slot(slot)
                    .category
                    .as_deref()
                    .ok_or(AppError::NoEnchantCategory(slot))?;
                Some(resolve_enchantment(catalog, category, id)?)
            }
        };
        Ok(BuilderEvent::SelectEnchantment { slot, enchantment })
    }
}

fn category_event(
    catalog: &CommandCatalog,
    slot: Slot,
    value: Option<&str>,
) -> Result<BuilderEvent, AppError> {
    if let Some(category) = value {
        if !catalog.magic_effects.contains_key(category) {
            return Err(AppError::UnknownEnchantCategory(category.to_string()));
        }
    }
    Ok(BuilderEvent::SelectCategory {
        slot,
        category: value.map(str::to_string),
    })
}

pub fn resolve_item(catalog: &CommandCatalog, id: &str) -> Result<EnchantableItem, AppError> {
    catalog
        .enchantable_items
        .iter()
        .find(|item| item.id.eq_ignore_ascii_case(id))
        .cloned()
        .ok_or_else(|| AppError::UnknownItem(id.to_string()))
}

/// Enchantments offered for a category; `None` when the category is unset or unknown.
pub fn enchantment_options<'a>(
    catalog: &'a CommandCatalog,
    category: Option<&str>,
) -> Option<&'a [Enchantment]> {
    let category = category.filter(|c| !c.is_empty())?;
    catalog.magic_effects.get(category).map(Vec::as_slice)
}

pub fn resolve_enchantment(
    catalog: &CommandCatalog,
    category: &str,
    id: &str,
) -> Result<Enchantment, AppError> {
    enchantment_options(catalog, Some(category))
        .and_then(|options| options.iter().find(|e| e.id.eq_ignore_ascii_case(id)))
        .cloned()
        .ok_or_else(|| AppError::UnknownEnchantment {
            category: category.to_string(),
            id: id.to_string(),
        })
}

/// Dropdown label for an enchantable item.
pub fn item_label(item: &EnchantableItem) -> String {
    format!("{} ({})", item.name, item.kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::sample_catalog;

    fn item(id: &str) -> EnchantableItem {
        EnchantableItem {
            name: "Iron Sword".to_string(),
            id: id.to_string(),
            kind: "weapon".to_string(),
        }
    }

    fn enchant(id: &str) -> Enchantment {
        Enchantment {
            name: format!("Effect {id}"),
            id: id.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn compose_requires_item_and_first_slot() {
        let composition = compose(None, None, None);
        assert_eq!(composition, Composition::NotReady);
        assert_eq!(composition.text(), PLACEHOLDER);
        assert!(!composition.is_ready());

        assert_eq!(compose(Some(&item("0001")), None, Some(&enchant("5678"))), Composition::NotReady);
        assert_eq!(compose(None, Some(&enchant("1234")), None), Composition::NotReady);
    }

    #[test]
    fn compose_single_enchantment() {
        let composition = compose(Some(&item("0001")), Some(&enchant("1234")), None);
        assert!(composition.is_ready());
        assert_eq!(composition.text(), "playerenchantobject 0001 1234");
    }

    #[test]
    fn compose_two_enchantments() {
        let composition = compose(
            Some(&item("0001")),
            Some(&enchant("1234")),
            Some(&enchant("5678")),
        );
        assert_eq!(composition.text(), "playerenchantobject 0001 1234 5678");
    }

    #[test]
    fn category_change_clears_that_slot_only() {
        let state = BuilderState::default()
            .apply(BuilderEvent::SelectItem(Some(item("0001"))))
            .apply(BuilderEvent::SelectCategory {
                slot: Slot::First,
                category: Some("a".to_string()),
            })
            .apply(BuilderEvent::SelectEnchantment {
                slot: Slot::First,
                enchantment: Some(enchant("1234")),
            })
            .apply(BuilderEvent::SelectCategory {
                slot: Slot::Second,
                category: Some("a".to_string()),
            })
            .apply(BuilderEvent::SelectEnchantment {
                slot: Slot::Second,
                enchantment: Some(enchant("5678")),
            });
        assert_eq!(state.composition().text(), "playerenchantobject 0001 1234 5678");

        let recategorized = state.apply(BuilderEvent::SelectCategory {
            slot: Slot::Second,
            category: Some("b".to_string()),
        });
        assert_eq!(recategorized.slot2.enchantment, None);
        assert_eq!(recategorized.slot2.category.as_deref(), Some("b"));
        assert_eq!(recategorized.composition().text(), "playerenchantobject 0001 1234");
        assert_eq!(state.slot2.enchantment, Some(enchant("5678")));

        let slot1_reset = state.apply(BuilderEvent::SelectCategory {
            slot: Slot::First,
            category: Some("b".to_string()),
        });
        assert_eq!(slot1_reset.slot1.enchantment, None);
        assert_eq!(slot1_reset.slot2.enchantment, Some(enchant("5678")));
        assert!(!slot1_reset.composition().is_ready());
    }

    #[test]
    fn commit_refused_while_not_ready() {
        let state = BuilderState::default().apply(BuilderEvent::SelectItem(Some(item("0001"))));
        assert!(matches!(state.commit(), Err(AppError::BuilderNotReady)));

        let ready = state.apply(BuilderEvent::SelectEnchantment {
            slot: Slot::First,
            enchantment: Some(enchant("1234")),
        });
        assert_eq!(ready.commit().unwrap(), "playerenchantobject 0001 1234");
    }

    #[test]
    fn same_enchantment_in_both_slots_is_allowed() {
        let fire = enchant("0004605A");
        let composition = compose(Some(&item("0001")), Some(&fire), Some(&fire));
        assert_eq!(
            composition.text(),
            "playerenchantobject 0001 0004605A 0004605A"
        );
    }

    #[test]
    fn select_resolves_values_against_catalog() {
        let catalog = sample_catalog();
        let state = BuilderState::default()
            .select(&catalog, BuilderField::Item, Some("00012EB7"))
            .unwrap()
            .select(&catalog, BuilderField::Enchant1Category, Some("fortify_skills"))
            .unwrap()
            .select(&catalog, BuilderField::Enchant1, Some("0007A0F6"))
            .unwrap();

        assert_eq!(state.item.as_ref().map(|i| i.name.as_str()), Some("Iron Sword"));
        assert_eq!(
            state.slot1.enchantment.as_ref().map(|e| e.name.as_str()),
            Some("Fortify Archery")
        );
        assert_eq!(state.commit().unwrap(), "playerenchantobject 00012EB7 0007A0F6");

        let cleared = state.select(&catalog, BuilderField::Item, Some("")).unwrap();
        assert_eq!(cleared.item, None);
        assert_eq!(cleared.composition(), Composition::NotReady);
    }

    #[test]
    fn select_rejects_unresolvable_values() {
        let catalog = sample_catalog();
        let state = BuilderState::default();

        assert!(matches!(
            state.select(&catalog, BuilderField::Item, Some("nope")),
            Err(AppError::UnknownItem(_))
        ));
        assert!(matches!(
            state.select(&catalog, BuilderField::Enchant2, Some("0004605A")),
            Err(AppError::NoEnchantCategory(Slot::Second))
        ));
        assert!(matches!(
            state.select(&catalog, BuilderField::Enchant2Category, Some("necromancy")),
            Err(AppError::UnknownEnchantCategory(_))
        ));

        let scoped = state
            .select(&catalog, BuilderField::Enchant2Category, Some("elemental"))
            .unwrap();
        assert!(matches!(
            scoped.select(&catalog, BuilderField::Enchant2, Some("0007A0F5")),
            Err(AppError::UnknownEnchantment { .. })
        ));
    }

    #[test]
    fn options_are_scoped_by_category() {
        let catalog = sample_catalog();
        assert_eq!(enchantment_options(&catalog, Some("fortify_skills")).map(|o| o.len()), Some(2));
        assert!(enchantment_options(&catalog, Some("")).is_none());
        assert!(enchantment_options(&catalog, None).is_none());
        assert!(enchantment_options(&catalog, Some("unknown")).is_none());
        assert_eq!(item_label(&catalog.enchantable_items[1]), "Gold Ring (ring)");
    }
}
