//! Token map record codec
//!
//! Key layout (no separators):
//!
//! ```text
//! "tmp-" | root chain type | root token
//! ```
//!
//! Value layout is a JSON object:
//!
//! ```text
//! {"roorChainType": "...", "rootToken": "...", "childToken": "...", "eventId": 42}
//! ```
//!
//! `roorChainType` is misspelled in every existing store and must stay that way.
//!
//! Values are read with the producer's JSON rules: field names match exactly
//! or else ignoring ASCII case, a repeated field keeps its last value, unknown
//! fields and `null` fields are skipped, and a bare `null` decodes to an empty
//! record.

use serde::de::{DeserializeOwned, Error as _, Unexpected};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Namespace prefix of every mapping key.
pub const TOKEN_MAP_PREFIX: &[u8] = b"tmp-";

/// Why a stored entry was rejected
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("key format is wrong: missing \"tmp-\" prefix")]
    KeyFormatInvalid,

    #[error("value is not a token map record: {0}")]
    ValueFormatInvalid(#[from] serde_json::Error),

    #[error("field validation failed: {0}")]
    FieldValidationFailed(&'static str),
}

/// One cross-chain token correspondence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenMapItem {
    #[serde(rename = "roorChainType")]
    pub root_chain_type: String,
    #[serde(rename = "rootToken")]
    pub root_token: String,
    #[serde(rename = "childToken")]
    pub child_token: String,
    #[serde(rename = "eventId")]
    pub event_id: u64,
}

impl TokenMapItem {
    pub fn new(
        root_chain_type: impl Into<String>,
        root_token: impl Into<String>,
        child_token: impl Into<String>,
        event_id: u64,
    ) -> Self {
        Self {
            root_chain_type: root_chain_type.into(),
            root_token: root_token.into(),
            child_token: child_token.into(),
            event_id,
        }
    }

    /// Checks the structural invariant: three non-empty strings and a positive event id.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.root_chain_type.is_empty() {
            return Err(RecordError::FieldValidationFailed("roorChainType is empty"));
        }
        if self.root_token.is_empty() {
            return Err(RecordError::FieldValidationFailed("rootToken is empty"));
        }
        if self.child_token.is_empty() {
            return Err(RecordError::FieldValidationFailed("childToken is empty"));
        }
        if self.event_id == 0 {
            return Err(RecordError::FieldValidationFailed("eventId is zero"));
        }
        Ok(())
    }

    /// Key this record lives under.
    pub fn key(&self) -> Vec<u8> {
        mapping_key(&self.root_chain_type, &self.root_token)
    }

    /// Serialize to the stored value format.
    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Builds the composite key for a chain type and root token.
pub fn mapping_key(root_chain_type: &str, root_token: &str) -> Vec<u8> {
    let mut key =
        Vec::with_capacity(TOKEN_MAP_PREFIX.len() + root_chain_type.len() + root_token.len());
    key.extend_from_slice(TOKEN_MAP_PREFIX);
    key.extend_from_slice(root_chain_type.as_bytes());
    key.extend_from_slice(root_token.as_bytes());
    key
}

/// Decodes and validates one stored entry.
///
/// Fields absent from the JSON object decode to their empty value and are then
/// rejected by validation rather than by the parser.
pub fn decode(key: &[u8], value: &[u8]) -> Result<TokenMapItem, RecordError> {
    if !key.starts_with(TOKEN_MAP_PREFIX) {
        return Err(RecordError::KeyFormatInvalid);
    }

    let item = from_wire(value)?;
    item.validate()?;

    Ok(item)
}

fn from_wire(value: &[u8]) -> Result<TokenMapItem, RecordError> {
    let fields = match serde_json::from_slice::<Value>(value)? {
        Value::Object(fields) => fields,
        Value::Null => return Ok(TokenMapItem::default()),
        other => {
            let kind = match other {
                Value::Array(_) => Unexpected::Seq,
                Value::Bool(b) => Unexpected::Bool(b),
                Value::Number(_) => Unexpected::Other("number"),
                _ => Unexpected::Other("string"),
            };
            return Err(serde_json::Error::invalid_type(kind, &"a token map object").into());
        }
    };

    Ok(TokenMapItem {
        root_chain_type: wire_field(&fields, "roorChainType")?.unwrap_or_default(),
        root_token: wire_field(&fields, "rootToken")?.unwrap_or_default(),
        child_token: wire_field(&fields, "childToken")?.unwrap_or_default(),
        event_id: wire_field(&fields, "eventId")?.unwrap_or_default(),
    })
}

/// Exact name first, then the first name equal ignoring ASCII case.
fn wire_field<T: DeserializeOwned>(
    fields: &Map<String, Value>,
    name: &str,
) -> Result<Option<T>, RecordError> {
    let found = fields.get(name).or_else(|| {
        fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    });

    match found {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
    }
}
