//! Lenient field deserializers for hand-edited catalog documents.

use serde::{Deserialize, Deserializer};

/// Read an explicit `null` as the type's default, so one blank field empties
/// that field instead of rejecting the whole document.
///
/// Pair with `#[serde(default)]` on the container so absent keys behave the same.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
