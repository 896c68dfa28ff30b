//! Random id generation and conversions into the UUID kind.

use rand::rngs::StdRng;
use rand::SeedableRng;
use typelayer::value::{ObjectPayload, ObjectValue};
use typelayer::{TypeDescriptor, UuidFactory, Value, ValueContext, ValueError, ValueKind};

#[test]
fn test_hundred_random_ids_are_version_four() {
    for _ in 0..100 {
        let id = UuidFactory::new_random();
        let bytes = id.as_bytes();
        assert_eq!(bytes[6] & 0xf0, 0x40);
        assert_eq!(bytes[8] & 0xc0, 0x80);
        assert_eq!(id.get_version_num(), 4);
    }
}

#[test]
fn test_fixed_bits_override_random_input() {
    struct Ones;
    impl rand::RngCore for Ones {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }
        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0xff);
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            dest.fill(0xff);
            Ok(())
        }
    }
    let id = UuidFactory::random_with(&mut Ones);
    assert_eq!(UuidFactory::render(&id), "ffffffff-ffff-4fff-bfff-ffffffffffff");
}

#[test]
fn test_seeded_ids_are_reproducible() {
    let a = UuidFactory::random_with(&mut StdRng::seed_from_u64(42));
    let b = UuidFactory::random_with(&mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
}

#[test]
fn test_render_is_lowercase_hyphenated() {
    let id = UuidFactory::from_halves(0xABCD_EF01_2345_6789, 0x0);
    let text = UuidFactory::render(&id);
    assert_eq!(text, "abcdef01-2345-6789-0000-000000000000");
    assert_eq!(UuidFactory::parse(&text).unwrap(), id);
}

#[test]
fn test_object_holding_id_converts() {
    let id = UuidFactory::from_halves(1, 2);
    let object = ObjectValue::serialize(&ObjectPayload::Uuid(id)).unwrap();
    assert_eq!(UuidFactory::from_object(&object).unwrap(), id);
    let value = Value::java_object(object)
        .cast_to(&TypeDescriptor::UUID, &ValueContext::default())
        .unwrap();
    assert_eq!(value, Value::Uuid(id));
}

#[test]
fn test_object_of_other_type_fails() {
    let object = ObjectValue::serialize(&ObjectPayload::Text("not an id".into())).unwrap();
    let err = UuidFactory::from_object(&object).unwrap_err();
    assert!(matches!(
        err,
        ValueError::DataConversion { source_kind: ValueKind::JavaObject, target_kind: ValueKind::Uuid, .. }
    ));
    let opaque = ObjectValue::from_bytes(vec![0u8; 16]);
    assert!(Value::java_object(opaque)
        .cast_to(&TypeDescriptor::UUID, &ValueContext::default())
        .is_err());
}

#[test]
fn test_binary_round_trip() {
    let ctx = ValueContext::default();
    let id = Value::Uuid(UuidFactory::from_halves(u64::MAX, 7));
    let bytes = id.cast_to(&TypeDescriptor::VARBINARY, &ctx).unwrap();
    assert_eq!(bytes.as_bytes().map(<[u8]>::len), Some(16));
    assert_eq!(bytes.cast_to(&TypeDescriptor::UUID, &ctx).unwrap(), id);
    assert!(Value::varbinary(vec![1u8; 3]).cast_to(&TypeDescriptor::UUID, &ctx).is_err());
}
