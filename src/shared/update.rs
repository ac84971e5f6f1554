//! Whitelisted Updates
//!
//! A whitelisted update is a partial document patch that is rejected as a
//! whole when it names any field outside a fixed allowed set. Each patchable
//! resource declares a typed update struct; the allowed set is the struct's
//! own field list, checked before anything is deserialized or applied.
//!
//! Patch fields say what an explicit JSON `null` means. Fields that may be
//! cleared use [`nullable`] and become `Some(None)`. Every other field uses
//! [`non_null`], so `null` fails the whole patch instead of being ignored.

use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use serde_json::Value;

use crate::shared::error::SharedError;

/// A typed patch with a closed set of accepted JSON field names
pub trait WhitelistedUpdate: DeserializeOwned {
    /// JSON field names this patch may contain
    const ALLOWED_FIELDS: &'static [&'static str];

    /// Parse a raw JSON payload, rejecting it entirely on any disallowed field
    fn from_payload(payload: Value) -> Result<Self, SharedError> {
        let Value::Object(fields) = &payload else {
            return Err(SharedError::malformed("update must be a JSON object"));
        };

        let disallowed: Vec<String> = fields
            .keys()
            .filter(|key| !Self::ALLOWED_FIELDS.contains(&key.as_str()))
            .cloned()
            .collect();
        if !disallowed.is_empty() {
            return Err(SharedError::DisallowedFields { fields: disallowed });
        }

        Ok(serde_json::from_value(payload)?)
    }
}

/// Deserialize a present field that must not be `null`
///
/// Use with `#[serde(default, deserialize_with = "non_null")]`; an absent
/// field stays `None`.
pub fn non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Deserialize a present field where `null` clears the value
///
/// Absent stays `None`, `null` becomes `Some(None)`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(deny_unknown_fields, rename_all = "camelCase")]
    struct NotePatch {
        #[serde(default, deserialize_with = "non_null")]
        title: Option<String>,
        #[serde(default, deserialize_with = "non_null")]
        page_count: Option<u32>,
        #[serde(default, deserialize_with = "nullable")]
        summary: Option<Option<String>>,
    }

    impl WhitelistedUpdate for NotePatch {
        const ALLOWED_FIELDS: &'static [&'static str] = &["title", "pageCount", "summary"];
    }

    #[test]
    fn test_allowed_fields_parse() {
        let patch = NotePatch::from_payload(json!({ "pageCount": 3 })).unwrap();
        assert_eq!(
            patch,
            NotePatch {
                page_count: Some(3),
                ..NotePatch::default()
            }
        );
    }

    #[test]
    fn test_null_clears_nullable_field() {
        let patch = NotePatch::from_payload(json!({ "summary": null })).unwrap();
        assert_eq!(patch.summary, Some(None));

        let patch = NotePatch::from_payload(json!({ "summary": "short" })).unwrap();
        assert_eq!(patch.summary, Some(Some("short".to_string())));

        let patch = NotePatch::from_payload(json!({})).unwrap();
        assert_eq!(patch.summary, None);
    }

    #[test]
    fn test_null_rejected_on_required_field() {
        let err = NotePatch::from_payload(json!({ "title": null })).unwrap_err();
        assert!(matches!(err, SharedError::MalformedPayload { .. }));
    }

    #[test]
    fn test_any_disallowed_field_rejects_whole_patch() {
        let err = NotePatch::from_payload(json!({ "title": "ok", "owner": "me" })).unwrap_err();
        assert_eq!(
            err,
            SharedError::DisallowedFields {
                fields: vec!["owner".to_string()]
            }
        );
    }

    #[test]
    fn test_non_object_rejected() {
        let err = NotePatch::from_payload(json!(["title"])).unwrap_err();
        assert!(matches!(err, SharedError::MalformedPayload { .. }));
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let err = NotePatch::from_payload(json!({ "pageCount": "three" })).unwrap_err();
        assert!(matches!(err, SharedError::MalformedPayload { .. }));
    }
}
