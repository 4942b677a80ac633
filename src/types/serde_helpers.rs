//! Custom serde deserializers for the passport responses
//!
//! The passport API sends `null` for fields it has no value for, where other
//! responses omit the key entirely. Both read as the type's default.

use serde::{Deserialize, Deserializer};

/// Deserialize a value, mapping JSON `null` to `T::default()`.
///
/// Combine with `#[serde(default)]` so a missing key behaves the same way.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
