//! Opaque serialized objects.
//!
//! A JAVA_OBJECT value stores the serialized bytes of a runtime object. Objects
//! this crate knows how to write are encoded as a `{"type": ..., "value": ...}`
//! envelope; any other bytes are kept as-is with an unknown runtime type.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ValueError, ValueResult};
use crate::value::ValueKind;

/// Runtime types that can be serialized into an object value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ObjectPayload {
    Uuid(uuid::Uuid),
    Text(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Bytes(Vec<u8>),
}

impl ObjectPayload {
    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectPayload::Uuid(_) => "Uuid",
            ObjectPayload::Text(_) => "Text",
            ObjectPayload::Integer(_) => "Integer",
            ObjectPayload::Double(_) => "Double",
            ObjectPayload::Boolean(_) => "Boolean",
            ObjectPayload::Bytes(_) => "Bytes",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectValue {
    bytes: Arc<[u8]>,
}

impl ObjectValue {
    /// Wraps already serialized bytes
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        ObjectValue {
            bytes: bytes.into(),
        }
    }

    pub fn serialize(payload: &ObjectPayload) -> ValueResult<Self> {
        let bytes = serde_json::to_vec(payload).map_err(|e| {
            ValueError::conversion("serialize_object", ValueKind::JavaObject, ValueKind::JavaObject, e.to_string())
        })?;
        Ok(ObjectValue::from_bytes(bytes))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The decoded object, or `None` when its runtime type is unknown
    pub fn payload(&self) -> Option<ObjectPayload> {
        serde_json::from_slice(&self.bytes).ok()
    }

    pub fn type_name(&self) -> Option<&'static str> {
        self.payload().map(|p| p.type_name())
    }
}
