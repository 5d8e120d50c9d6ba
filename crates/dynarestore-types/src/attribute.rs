//! DynamoDB attribute value model and its JSON wire form.
//!
//! [`AttributeValue`] mirrors the ten DynamoDB data types. The JSON form is
//! the single-member tagged object used by table exports and the low-level
//! API (`{"S": "text"}`, `{"B": "<base64>"}`, `{"L": [...]}`).
//!
//! Decoding reads the tag object generically, strips explicit `null`
//! members, and then requires exactly one known member. Absence and
//! explicit null therefore decode to the same variant.

use std::collections::BTreeMap;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discriminator of an [`AttributeValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Binary,
    Boolean,
    BinarySet,
    List,
    Map,
    Number,
    NumberSet,
    Null,
    String,
    StringSet,
}

impl AttributeType {
    /// Wire tags in declaration order.
    pub const TAGS: &'static [&'static str] =
        &["B", "BOOL", "BS", "L", "M", "N", "NS", "NULL", "S", "SS"];

    /// Wire tag used as the member name in the JSON form.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Binary => "B",
            Self::Boolean => "BOOL",
            Self::BinarySet => "BS",
            Self::List => "L",
            Self::Map => "M",
            Self::Number => "N",
            Self::NumberSet => "NS",
            Self::Null => "NULL",
            Self::String => "S",
            Self::StringSet => "SS",
        }
    }

    /// Parse a wire tag. Tags are case-sensitive.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "B" => Self::Binary,
            "BOOL" => Self::Boolean,
            "BS" => Self::BinarySet,
            "L" => Self::List,
            "M" => Self::Map,
            "N" => Self::Number,
            "NS" => Self::NumberSet,
            "NULL" => Self::Null,
            "S" => Self::String,
            "SS" => Self::StringSet,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single DynamoDB attribute value.
///
/// Numbers are kept as the decimal strings DynamoDB transmits; they are never
/// parsed, so no precision is lost in transit. Set variants keep their input
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    B(Vec<u8>),
    Bool(bool),
    Bs(Vec<Vec<u8>>),
    L(Vec<AttributeValue>),
    M(BTreeMap<String, AttributeValue>),
    N(String),
    Ns(Vec<String>),
    Null,
    S(String),
    Ss(Vec<String>),
}

impl AttributeValue {
    #[must_use]
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            Self::B(_) => AttributeType::Binary,
            Self::Bool(_) => AttributeType::Boolean,
            Self::Bs(_) => AttributeType::BinarySet,
            Self::L(_) => AttributeType::List,
            Self::M(_) => AttributeType::Map,
            Self::N(_) => AttributeType::Number,
            Self::Ns(_) => AttributeType::NumberSet,
            Self::Null => AttributeType::Null,
            Self::S(_) => AttributeType::String,
            Self::Ss(_) => AttributeType::StringSet,
        }
    }

    /// Binary payload, if this is a `B` value.
    #[must_use]
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Self::B(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Mutable binary payload, if this is a `B` value.
    pub fn as_binary_mut(&mut self) -> Option<&mut Vec<u8>> {
        match self {
            Self::B(bytes) => Some(bytes),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::S(s) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tag = self.attribute_type().tag();
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::B(bytes) => map.serialize_entry(tag, &STANDARD.encode(bytes))?,
            Self::Bool(v) => map.serialize_entry(tag, v)?,
            Self::Bs(set) => {
                let encoded: Vec<String> = set.iter().map(|b| STANDARD.encode(b)).collect();
                map.serialize_entry(tag, &encoded)?;
            }
            Self::L(items) => map.serialize_entry(tag, items)?,
            Self::M(members) => map.serialize_entry(tag, members)?,
            Self::N(text) | Self::S(text) => map.serialize_entry(tag, text)?,
            Self::Ns(set) | Self::Ss(set) => map.serialize_entry(tag, set)?,
            Self::Null => map.serialize_entry(tag, &true)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AttributeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AttributeValueVisitor)
    }
}

struct AttributeValueVisitor;

impl<'de> Visitor<'de> for AttributeValueVisitor {
    type Value = AttributeValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a DynamoDB attribute value object with exactly one type member")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut populated: Option<(AttributeType, Value)> = None;

        while let Some(tag) = access.next_key::<String>()? {
            let value: Value = access.next_value()?;
            if value.is_null() {
                continue;
            }
            let Some(kind) = AttributeType::from_tag(&tag) else {
                return Err(de::Error::unknown_variant(&tag, AttributeType::TAGS));
            };
            if let Some((first, _)) = &populated {
                return Err(de::Error::custom(format!(
                    "attribute value has both {first} and {kind} populated"
                )));
            }
            populated = Some((kind, value));
        }

        let (kind, value) = populated
            .ok_or_else(|| de::Error::custom("attribute value has no populated type member"))?;
        decode_member(kind, value).map_err(de::Error::custom)
    }
}

fn decode_member(kind: AttributeType, value: Value) -> Result<AttributeValue, serde_json::Error> {
    let decoded = match kind {
        AttributeType::Binary => {
            let text: String = serde_json::from_value(value)?;
            AttributeValue::B(decode_base64(&text)?)
        }
        AttributeType::Boolean => AttributeValue::Bool(serde_json::from_value(value)?),
        AttributeType::BinarySet => {
            let texts: Vec<String> = serde_json::from_value(value)?;
            let set = texts
                .iter()
                .map(|t| decode_base64(t))
                .collect::<Result<Vec<_>, _>>()?;
            AttributeValue::Bs(set)
        }
        AttributeType::List => AttributeValue::L(serde_json::from_value(value)?),
        AttributeType::Map => AttributeValue::M(serde_json::from_value(value)?),
        AttributeType::Number => AttributeValue::N(serde_json::from_value(value)?),
        AttributeType::NumberSet => AttributeValue::Ns(serde_json::from_value(value)?),
        AttributeType::Null => {
            let _: bool = serde_json::from_value(value)?;
            AttributeValue::Null
        }
        AttributeType::String => AttributeValue::S(serde_json::from_value(value)?),
        AttributeType::StringSet => AttributeValue::Ss(serde_json::from_value(value)?),
    };
    Ok(decoded)
}

fn decode_base64(text: &str) -> Result<Vec<u8>, serde_json::Error> {
    STANDARD
        .decode(text)
        .map_err(|e| de::Error::custom(format!("invalid base64 in binary value: {e}")))
}
