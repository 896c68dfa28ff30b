//! Random UUID generation and conversions between id representations

use rand::RngCore;
use uuid::Uuid;

use crate::error::{ValueError, ValueResult};
use crate::value::{ObjectPayload, ObjectValue, ValueKind};

pub struct UuidFactory;

impl UuidFactory {
    /// Version 4 id from the given random source; the version nibble is set
    /// to 4 and the variant bits to `10`
    pub fn random_with<R: RngCore + ?Sized>(rng: &mut R) -> Uuid {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }

    pub fn new_random() -> Uuid {
        UuidFactory::random_with(&mut rand::thread_rng())
    }

    pub fn from_halves(high: u64, low: u64) -> Uuid {
        Uuid::from_u64_pair(high, low)
    }

    pub fn halves(id: &Uuid) -> (u64, u64) {
        id.as_u64_pair()
    }

    /// Lowercase hyphenated 8-4-4-4-12 form
    pub fn render(id: &Uuid) -> String {
        id.hyphenated().to_string()
    }

    pub fn parse(text: &str) -> ValueResult<Uuid> {
        Uuid::parse_str(text.trim()).map_err(|e| {
            ValueError::conversion("parse_uuid", ValueKind::Varchar, ValueKind::Uuid, format!("\"{text}\": {e}"))
        })
    }

    /// Id from exactly 16 big-endian bytes
    pub fn from_bytes(bytes: &[u8]) -> ValueResult<Uuid> {
        Uuid::from_slice(bytes).map_err(|_| {
            ValueError::conversion(
                "uuid_from_bytes",
                ValueKind::Varbinary,
                ValueKind::Uuid,
                format!("expected 16 bytes, got {}", bytes.len()),
            )
        })
    }

    /// The id held by a serialized object; any other runtime type fails
    pub fn from_object(object: &ObjectValue) -> ValueResult<Uuid> {
        match object.payload() {
            Some(ObjectPayload::Uuid(id)) => Ok(id),
            other => Err(ValueError::conversion(
                "uuid_from_object",
                ValueKind::JavaObject,
                ValueKind::Uuid,
                format!(
                    "serialized object of type {} is not an id",
                    other.as_ref().map_or("unknown", ObjectPayload::type_name)
                ),
            )),
        }
    }
}
