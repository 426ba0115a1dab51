use serde::de::{Deserialize, Deserializer};

/// Set `deserialize_with` to this fn to get the default if null.
/// The auth API sends `"user_metadata": null` for identities created without
/// metadata.
pub(crate) fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    T: Default + Deserialize<'de>,
    D: Deserializer<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Set `deserialize_with` to this fn to map null, missing and blank strings to
/// `None`. Metadata filled from web forms often carries `""` for fields the
/// user skipped.
pub(crate) fn deserialize_blank_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.trim().is_empty()))
}
