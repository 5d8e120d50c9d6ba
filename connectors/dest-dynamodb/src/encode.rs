//! Conversion between the backup value model and the SDK's attribute types.

use std::collections::HashMap;

use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::{AttributeValue as SdkValue, PutRequest, WriteRequest};
use dynarestore_types::{AttributeValue, Record, WriteError};

/// SDK attribute variant this build does not know how to represent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported SDK attribute value: {0}")]
pub struct UnsupportedAttribute(String);

#[must_use]
pub fn to_sdk(value: AttributeValue) -> SdkValue {
    match value {
        AttributeValue::B(bytes) => SdkValue::B(Blob::new(bytes)),
        AttributeValue::Bool(b) => SdkValue::Bool(b),
        AttributeValue::Bs(set) => SdkValue::Bs(set.into_iter().map(Blob::new).collect()),
        AttributeValue::L(list) => SdkValue::L(list.into_iter().map(to_sdk).collect()),
        AttributeValue::M(map) => SdkValue::M(
            map.into_iter()
                .map(|(k, v)| (k, to_sdk(v)))
                .collect(),
        ),
        AttributeValue::N(n) => SdkValue::N(n),
        AttributeValue::Ns(set) => SdkValue::Ns(set),
        AttributeValue::Null => SdkValue::Null(true),
        AttributeValue::S(s) => SdkValue::S(s),
        AttributeValue::Ss(set) => SdkValue::Ss(set),
    }
}

/// # Errors
///
/// Returns [`UnsupportedAttribute`] for variants added to the SDK union
/// after this build.
pub fn from_sdk(value: &SdkValue) -> Result<AttributeValue, UnsupportedAttribute> {
    Ok(match value {
        SdkValue::B(blob) => AttributeValue::B(blob.as_ref().to_vec()),
        SdkValue::Bool(b) => AttributeValue::Bool(*b),
        SdkValue::Bs(set) => AttributeValue::Bs(set.iter().map(|b| b.as_ref().to_vec()).collect()),
        SdkValue::L(list) => AttributeValue::L(list.iter().map(from_sdk).collect::<Result<_, _>>()?),
        SdkValue::M(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), from_sdk(v)?)))
                .collect::<Result<_, UnsupportedAttribute>>()?,
        ),
        SdkValue::N(n) => AttributeValue::N(n.clone()),
        SdkValue::Ns(set) => AttributeValue::Ns(set.clone()),
        SdkValue::Null(_) => AttributeValue::Null,
        SdkValue::S(s) => AttributeValue::S(s.clone()),
        SdkValue::Ss(set) => AttributeValue::Ss(set.clone()),
        other => return Err(UnsupportedAttribute(format!("{other:?}"))),
    })
}

#[must_use]
pub fn record_to_item(record: Record) -> HashMap<String, SdkValue> {
    record.into_iter().map(|(k, v)| (k, to_sdk(v))).collect()
}

/// # Errors
///
/// Fails when any attribute is an [`UnsupportedAttribute`].
pub fn item_to_record(item: &HashMap<String, SdkValue>) -> Result<Record, UnsupportedAttribute> {
    item.iter()
        .map(|(k, v)| Ok((k.clone(), from_sdk(v)?)))
        .collect()
}

/// Wrap every record in a put request.
///
/// # Errors
///
/// Returns a conversion [`WriteError`] if the SDK rejects a request shape.
pub fn write_requests(records: Vec<Record>) -> Result<Vec<WriteRequest>, WriteError> {
    records
        .into_iter()
        .map(|record| {
            let put = PutRequest::builder()
                .set_item(Some(record_to_item(record)))
                .build()
                .map_err(|e| WriteError::conversion("PUT_REQUEST_BUILD", e.to_string()))?;
            Ok(WriteRequest::builder().put_request(put).build())
        })
        .collect()
}

/// One batch in SDK form, kept next to the records it was built from so
/// unprocessed items map back to them without decoding.
#[derive(Debug, Clone)]
pub struct PreparedBatch {
    records: Vec<Record>,
    requests: Vec<WriteRequest>,
}

impl PreparedBatch {
    /// # Errors
    ///
    /// See [`write_requests`].
    pub fn new(records: Vec<Record>) -> Result<Self, WriteError> {
        let requests = write_requests(records.clone())?;
        Ok(Self { records, requests })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn requests(&self) -> &[WriteRequest] {
        &self.requests
    }

    /// Records the service returned as unprocessed for `table`.
    ///
    /// Each unprocessed put is matched to the record it was built from. A
    /// put that matches nothing in this batch is decoded from its SDK form.
    ///
    /// # Errors
    ///
    /// Returns a conversion [`WriteError`] only when an unmatched item
    /// cannot be decoded.
    pub fn unprocessed(
        self,
        unprocessed: Option<&HashMap<String, Vec<WriteRequest>>>,
        table: &str,
    ) -> Result<Vec<Record>, WriteError> {
        let Some(returned) = unprocessed.and_then(|m| m.get(table)) else {
            return Ok(Vec::new());
        };

        let mut pending: Vec<Option<Record>> = self.records.into_iter().map(Some).collect();
        let mut records = Vec::with_capacity(returned.len());
        for request in returned {
            let Some(put) = request.put_request() else {
                continue;
            };
            let matched = self
                .requests
                .iter()
                .zip(&pending)
                .position(|(sent, slot)| slot.is_some() && sent == request);
            match matched.and_then(|i| pending[i].take()) {
                Some(record) => records.push(record),
                None => records.push(
                    item_to_record(put.item())
                        .map_err(|e| WriteError::conversion("UNPROCESSED_ITEM", e.to_string()))?,
                ),
            }
        }
        Ok(records)
    }
}
