use codex_common::error::CommonError;

use crate::builder::Slot;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("config error: {0}")]
    Config(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("builder mode is not active; call enter_builder first")]
    BuilderInactive,

    #[error("select an item and at least one enchantment first")]
    BuilderNotReady,

    #[error("unknown enchantable item: {0}")]
    UnknownItem(String),

    #[error("unknown enchantment category: {0}")]
    UnknownEnchantCategory(String),

    #[error("choose an enchantment category for {0} first")]
    NoEnchantCategory(Slot),

    #[error("enchantment {id} not found in category {category}")]
    UnknownEnchantment { category: String, id: String },
}
