//! Default-journal sentinel detection.
//!
//! Every tenant carries one uninitialized "default" journal row. Its type
//! attribute holds the journal table id and its payload attribute holds a
//! protobuf `Journal` whose id is the zero UUID. Restoring that row into a
//! tenant that already has its own default journal would clobber it.

use dynarestore_types::Record;
use prost::Message;
use uuid::Uuid;

/// Type-discriminator value marking journal rows.
pub const JOURNAL_TABLE_ID: Uuid = Uuid::from_u128(0x9233_c407_a3ab_4277_9813_ddd4_0582_bfcd);

/// Attribute holding the row's table/type discriminator.
pub const TYPE_FIELD: &str = "t";

/// Attribute holding the encoded row payload.
pub const PAYLOAD_FIELD: &str = "g";

/// Journal payload. Only the id is decoded; other fields are skipped.
#[derive(Clone, PartialEq, Message)]
pub struct Journal {
    #[prost(message, optional, tag = "1")]
    pub journal_id: Option<ProtoUuid>,
}

/// UUID as carried in payload messages.
#[derive(Clone, PartialEq, Message)]
pub struct ProtoUuid {
    #[prost(bytes = "vec", tag = "1")]
    pub value: Vec<u8>,
}

impl ProtoUuid {
    /// True for the default (empty) message and for sixteen zero bytes.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value.is_empty() || self.value == [0u8; 16]
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SentinelError {
    #[error("journal row has no binary 'g' payload")]
    MissingPayload,

    #[error("journal payload is not a valid Journal message: {0}")]
    Decode(#[from] prost::DecodeError),
}

/// Whether `record` is the default journal row.
///
/// # Errors
///
/// A journal-typed row whose payload is missing or undecodable is corrupt
/// input and yields [`SentinelError`].
pub fn is_sentinel_record(record: &Record, journal_type_id: &Uuid) -> Result<bool, SentinelError> {
    let Some(kind) = record.binary(TYPE_FIELD) else {
        return Ok(false);
    };
    if kind != journal_type_id.as_bytes() {
        return Ok(false);
    }

    let payload = record
        .binary(PAYLOAD_FIELD)
        .ok_or(SentinelError::MissingPayload)?;
    let journal = Journal::decode(payload)?;
    Ok(journal.journal_id.is_some_and(|id| id.is_zero()))
}
