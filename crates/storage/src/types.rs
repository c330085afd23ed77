//! Common types used across hash store operations.

use std::collections::HashMap;

/// The fields of one stored hash, by field name.
///
/// Mirrors what `HGETALL` returns: unordered, string-valued, no duplicates.
pub type FieldMap = HashMap<String, String>;

/// Builds a [`FieldMap`] from borrowed field/value pairs.
///
/// # Examples
///
/// ```
/// use gateway_auth_storage::types::field_map;
///
/// let fields = field_map([("token", "abc"), ("token_expires", "")]);
/// assert_eq!(fields.get("token").map(String::as_str), Some("abc"));
/// ```
#[must_use]
pub fn field_map<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> FieldMap {
    pairs.into_iter().map(|(field, value)| (field.to_owned(), value.to_owned())).collect()
}
