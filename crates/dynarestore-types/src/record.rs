//! Table items and the backup line envelope.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeValue;

/// One table item: attribute name to value.
///
/// A record is moved between pipeline stages, never shared, so stages may
/// mutate attribute payloads in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, AttributeValue>);

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut AttributeValue> {
        self.0.get_mut(name)
    }

    /// Insert an attribute, returning the previous value under that name.
    pub fn insert(&mut self, name: impl Into<String>, value: AttributeValue) -> Option<AttributeValue> {
        self.0.insert(name.into(), value)
    }

    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.0.remove(name)
    }

    /// Binary payload of attribute `name`, if present and of type `B`.
    #[must_use]
    pub fn binary(&self, name: &str) -> Option<&[u8]> {
        self.get(name).and_then(AttributeValue::as_binary)
    }

    pub fn binary_mut(&mut self, name: &str) -> Option<&mut Vec<u8>> {
        self.get_mut(name).and_then(AttributeValue::as_binary_mut)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, AttributeValue> {
        self.0.iter()
    }

    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, AttributeValue> {
        self.0
    }
}

impl From<BTreeMap<String, AttributeValue>> for Record {
    fn from(attributes: BTreeMap<String, AttributeValue>) -> Self {
        Self(attributes)
    }
}

impl<K: Into<String>> FromIterator<(K, AttributeValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, AttributeValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl IntoIterator for Record {
    type Item = (String, AttributeValue);
    type IntoIter = btree_map::IntoIter<String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// `{"Item": {...}}` wrapper used by backup lines and put requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEnvelope {
    #[serde(rename = "Item")]
    pub item: Record,
}

impl ItemEnvelope {
    /// Decode one backup line.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the line is not a well-formed envelope.
    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Put request as it appears in `BatchWriteItem` request and response maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteRequest {
    #[serde(rename = "PutRequest")]
    pub put_request: ItemEnvelope,
}

impl From<Record> for WriteRequest {
    fn from(item: Record) -> Self {
        Self {
            put_request: ItemEnvelope { item },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn envelope_decodes_backup_line() {
        let line = r#"{"Item":{"a":{"B":"AQID"},"n":{"N":"7"},"s":{"S":"x"}}}"#;
        let env = ItemEnvelope::from_line(line).unwrap();
        assert_eq!(env.item.len(), 3);
        assert_eq!(env.item.binary("a"), Some(&[1u8, 2, 3][..]));
        assert_eq!(env.item.get("s").and_then(AttributeValue::as_str), Some("x"));
        assert_eq!(env.item.binary("n"), None);
    }

    #[test]
    fn envelope_requires_item_member() {
        assert!(ItemEnvelope::from_line(r#"{"a":{"S":"x"}}"#).is_err());
        assert!(ItemEnvelope::from_line("not json").is_err());
        assert!(ItemEnvelope::from_line(r#"{"Item":{"a":{"Q":"x"}}}"#).is_err());
    }

    #[test]
    fn write_request_shape_matches_batch_write_item() {
        let record: Record = [("k", AttributeValue::S("v".into()))].into_iter().collect();
        let json = serde_json::to_value(WriteRequest::from(record)).unwrap();
        assert_eq!(json, serde_json::json!({"PutRequest": {"Item": {"k": {"S": "v"}}}}));
    }

    #[test]
    fn binary_mut_edits_in_place() {
        let mut record: Record = [("a", AttributeValue::B(vec![0; 4]))].into_iter().collect();
        record.binary_mut("a").unwrap()[0] = 9;
        assert_eq!(record.binary("a"), Some(&[9u8, 0, 0, 0][..]));
    }
}
