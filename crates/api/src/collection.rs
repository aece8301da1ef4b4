// =============================================================================
// CreUp API - Hydra Collections
// =============================================================================
// Table of Contents:
// 1. Collection Envelope
// 2. Decoding
// 3. References
// 4. Identifiers
// =============================================================================

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};

const MEMBER_KEYS: [&str; 2] = ["member", "hydra:member"];
const TOTAL_KEYS: [&str; 2] = ["totalItems", "hydra:totalItems"];
const VIEW_KEYS: [&str; 2] = ["view", "hydra:view"];

// -----------------------------------------------------------------------------
// 1. Collection Envelope
// -----------------------------------------------------------------------------

/// Pagination links of a collection page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialView {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(alias = "hydra:first", default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(alias = "hydra:last", default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(alias = "hydra:next", default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(alias = "hydra:previous", default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

/// Normalized list response.
///
/// `member` keeps server order and is always present after decoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection<T> {
    #[serde(rename = "@context", skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(rename = "@id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "@type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub member: Vec<T>,
    #[serde(rename = "totalItems", skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<PartialView>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            context: None,
            id: None,
            kind: None,
            member: Vec::new(),
            total_items: None,
            view: None,
        }
    }
}

impl<T> Collection<T> {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collection without envelope metadata.
    pub fn from_members(member: Vec<T>) -> Self {
        Self {
            member,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.member.len()
    }

    pub fn is_empty(&self) -> bool {
        self.member.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.member.iter()
    }

    pub fn into_members(self) -> Vec<T> {
        self.member
    }

    /// Server-side total, or the page size when the server sent none.
    pub fn total(&self) -> u64 {
        self.total_items.unwrap_or(self.member.len() as u64)
    }

    pub fn next_page(&self) -> Option<&str> {
        self.view.as_ref().and_then(|view| view.next.as_deref())
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.member.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.member.iter()
    }
}

// -----------------------------------------------------------------------------
// 2. Decoding
// -----------------------------------------------------------------------------

impl<T: DeserializeOwned> Collection<T> {
    /// Decode any list-shaped response body.
    ///
    /// Accepted shapes:
    /// - envelope with `member` or `hydra:member` (and matching `totalItems`,
    ///   `view` spellings)
    /// - envelope whose `@type` ends in `Collection` without a member list,
    ///   decoded as empty
    /// - bare JSON array
    /// - `null`, decoded as empty
    /// - any other object, decoded as a single member
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::empty()),
            Value::Array(items) => Ok(Self::from_members(decode_members(items)?)),
            Value::Object(mut map) => match take_first(&mut map, &MEMBER_KEYS) {
                Some(Value::Array(items)) => {
                    let member = decode_members(items)?;
                    envelope(&mut map, member)
                }
                Some(Value::Null) => envelope(&mut map, Vec::new()),
                Some(other) => Err(ApiError::Deserialize(format!(
                    "collection member is not a list: {}",
                    other
                ))),
                None if is_collection_type(&map) => envelope(&mut map, Vec::new()),
                None => {
                    let record = serde_json::from_value(Value::Object(map))?;
                    Ok(Self::from_members(vec![record]))
                }
            },
            other => Err(ApiError::Deserialize(format!(
                "expected a collection, got {}",
                other
            ))),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Collection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Collection::from_value(value).map_err(|err| match err {
            ApiError::Deserialize(message) => de::Error::custom(message),
            other => de::Error::custom(other),
        })
    }
}

fn decode_members<T: DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>> {
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(ApiError::from))
        .collect()
}

fn envelope<T>(map: &mut Map<String, Value>, member: Vec<T>) -> Result<Collection<T>> {
    let total_items = match take_first(map, &TOTAL_KEYS) {
        Some(Value::Null) | None => None,
        Some(total) => Some(
            total
                .as_u64()
                .ok_or_else(|| ApiError::Deserialize(format!("invalid totalItems: {}", total)))?,
        ),
    };
    let view = match take_first(map, &VIEW_KEYS) {
        Some(Value::Null) | None => None,
        Some(view) => Some(serde_json::from_value(view)?),
    };

    Ok(Collection {
        context: take_string(map, "@context"),
        id: take_string(map, "@id"),
        kind: take_string(map, "@type"),
        member,
        total_items,
        view,
    })
}

fn take_first(map: &mut Map<String, Value>, keys: &[&str]) -> Option<Value> {
    keys.iter().find_map(|key| map.remove(*key))
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

fn is_collection_type(map: &Map<String, Value>) -> bool {
    map.get("@type")
        .and_then(Value::as_str)
        .is_some_and(|kind| kind.ends_with("Collection"))
}

// -----------------------------------------------------------------------------
// 3. References
// -----------------------------------------------------------------------------

/// Relation to another resource: an IRI such as `/api/partners/4`, or the
/// embedded record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference<T> {
    Iri(String),
    Embedded(T),
}

impl<T> Reference<T> {
    pub fn iri(&self) -> Option<&str> {
        match self {
            Reference::Iri(iri) => Some(iri),
            Reference::Embedded(_) => None,
        }
    }

    pub fn embedded(&self) -> Option<&T> {
        match self {
            Reference::Iri(_) => None,
            Reference::Embedded(record) => Some(record),
        }
    }
}

/// Last path segment of an IRI, i.e. the identifier.
pub fn iri_id(iri: &str) -> &str {
    let trimmed = iri.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

// -----------------------------------------------------------------------------
// 4. Identifiers
// -----------------------------------------------------------------------------

/// Identifier or display value sent either as text or as a JSON number.
/// Numbers keep their decimal text.
pub fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(de::Error::custom(format!("expected text or number, got {}", other))),
    }
}

/// [`text_or_number`] for optional fields; `null` stays `None`.
pub fn optional_text_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        Value::Number(number) => Ok(Some(number.to_string())),
        other => Err(de::Error::custom(format!("expected text or number, got {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Item {
        #[serde(deserialize_with = "text_or_number")]
        id: String,
    }

    fn ids(collection: &Collection<Item>) -> Vec<&str> {
        collection.iter().map(|item| item.id.as_str()).collect()
    }

    #[test]
    fn decodes_plain_envelope() {
        let collection: Collection<Item> = Collection::from_value(json!({
            "@context": "/api/contexts/Project",
            "@id": "/api/projects",
            "@type": "Collection",
            "member": [{ "id": "1" }, { "id": "2" }],
            "totalItems": 12,
            "view": {
                "@id": "/api/projects?page=1",
                "@type": "PartialCollectionView",
                "first": "/api/projects?page=1",
                "next": "/api/projects?page=2"
            }
        }))
        .unwrap();

        assert_eq!(ids(&collection), vec!["1", "2"]);
        assert_eq!(collection.id.as_deref(), Some("/api/projects"));
        assert_eq!(collection.kind.as_deref(), Some("Collection"));
        assert_eq!(collection.total(), 12);
        assert_eq!(collection.next_page(), Some("/api/projects?page=2"));
    }

    #[test]
    fn decodes_hydra_prefixed_envelope() {
        let collection: Collection<Item> = Collection::from_value(json!({
            "@id": "/api/projects",
            "@type": "hydra:Collection",
            "hydra:member": [{ "id": "3" }],
            "hydra:totalItems": 1,
            "hydra:view": { "@id": "/api/projects", "hydra:last": "/api/projects?page=1" }
        }))
        .unwrap();

        assert_eq!(ids(&collection), vec!["3"]);
        assert_eq!(collection.total_items, Some(1));
        assert_eq!(
            collection.view.unwrap().last.as_deref(),
            Some("/api/projects?page=1")
        );
    }

    #[test]
    fn missing_member_on_collection_is_empty() {
        let collection: Collection<Item> = Collection::from_value(json!({
            "@id": "/api/stats",
            "@type": "hydra:Collection"
        }))
        .unwrap();
        assert!(collection.is_empty());
        assert_eq!(collection.total(), 0);
    }

    #[test]
    fn bare_array_and_null_are_accepted() {
        let list: Collection<Item> = Collection::from_value(json!([{ "id": "a" }])).unwrap();
        assert_eq!(ids(&list), vec!["a"]);
        assert!(list.id.is_none());

        let empty: Collection<Item> = Collection::from_value(Value::Null).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn single_record_becomes_one_member() {
        let collection: Collection<Item> =
            Collection::from_value(json!({ "@id": "/api/services/9", "id": "9" })).unwrap();
        assert_eq!(ids(&collection), vec!["9"]);
    }

    #[test]
    fn malformed_member_is_an_error() {
        let err = Collection::<Item>::from_value(json!({ "member": "nope" })).unwrap_err();
        assert!(matches!(err, ApiError::Deserialize(_)));

        let err = Collection::<Item>::from_value(json!({ "member": [{ "name": "no id" }] }))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialize(_)));

        let err = Collection::<Item>::from_value(json!("text")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialize(_)));
    }

    #[test]
    fn deserialize_goes_through_the_same_decoder() {
        let collection: Collection<Item> =
            serde_json::from_str(r#"{ "hydra:member": [{ "id": "x" }] }"#).unwrap();
        assert_eq!(ids(&collection), vec!["x"]);
    }

    #[test]
    fn serializes_canonical_keys() {
        let collection = Collection {
            id: Some("/api/services".to_string()),
            total_items: Some(1),
            ..Collection::from_members(vec![json!({ "id": "1" })])
        };
        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value["@id"], "/api/services");
        assert_eq!(value["totalItems"], 1);
        assert_eq!(value["member"][0]["id"], "1");
        assert!(value.get("hydra:member").is_none());
    }

    #[test]
    fn references_accept_iri_or_object() {
        let iri: Reference<Item> = serde_json::from_value(json!("/api/partners/4")).unwrap();
        assert_eq!(iri.iri(), Some("/api/partners/4"));
        assert!(iri.embedded().is_none());

        let embedded: Reference<Item> = serde_json::from_value(json!({ "id": "4" })).unwrap();
        assert_eq!(embedded.embedded().map(|p| p.id.as_str()), Some("4"));
    }

    #[test]
    fn member_error_is_reported_once() {
        let err = serde_json::from_str::<Collection<Item>>(r#"{ "member": [{ "name": "no id" }] }"#)
            .map_err(ApiError::from)
            .unwrap_err();
        let message = err.to_string();
        assert_eq!(message.matches("Deserialization error").count(), 1, "{}", message);
        assert!(message.contains("missing field `id`"), "{}", message);
    }

    #[test]
    fn numeric_ids_keep_their_digits() {
        let collection: Collection<Item> =
            Collection::from_value(json!({ "member": [{ "id": 7 }, { "id": "8" }] })).unwrap();
        assert_eq!(ids(&collection), vec!["7", "8"]);

        let err = Collection::<Item>::from_value(json!([{ "id": true }])).unwrap_err();
        assert!(err.to_string().contains("expected text or number"));
    }

    #[test]
    fn iri_id_takes_last_segment() {
        assert_eq!(iri_id("/api/partners/4"), "4");
        assert_eq!(iri_id("/api/partners/4/"), "4");
        assert_eq!(iri_id("17"), "17");
    }
}
