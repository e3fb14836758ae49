use indexmap::IndexMap;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serialcraft::{
    Assigned, Error, Field, Schema, SerialCodec, SetInput,
    errors::{CompileError, ReadError, ValueError, WriteError},
};

fn serial_fields() -> Vec<Field> {
    vec![
        Field::with_bytes("date", 2),
        Field::new("product"),
        Field::new("version"),
        Field::new("revision"),
        Field::with_bytes("hardwareId", 6),
    ]
}

fn seeded(seed: u64) -> SerialCodec {
    let schema = Schema::compile(&serial_fields()).unwrap();
    SerialCodec::with_rng(schema, &mut ChaCha8Rng::seed_from_u64(seed))
}

const EXAMPLE: &[(&str, u128)] = &[
    ("date", 0),
    ("product", 255),
    ("version", 1),
    ("revision", 0),
    ("hardwareId", 100),
];

#[test]
fn test_construction() {
    assert_eq!(
        SerialCodec::from_fields(&[]).unwrap_err(),
        CompileError::EmptySchema
    );
    let codec = SerialCodec::from_fields(&serial_fields()).unwrap();
    assert_eq!(codec.schema().total_bits(), 100);
    assert_eq!(codec.salt().len(), 12);
}

#[cfg(feature = "serde")]
#[test]
fn test_construction_from_json() {
    assert_eq!(
        SerialCodec::from_json(r#""yo!""#).unwrap_err(),
        CompileError::NotAnObject
    );
    assert_eq!(
        SerialCodec::from_json("{}").unwrap_err(),
        CompileError::EmptySchema
    );

    let mut codec = SerialCodec::from_json(
        r#"{
            "date": {"bytes": 2},
            "product": {},
            "version": {},
            "revision": {},
            "hardwareId": {"bytes": 6}
        }"#,
    )
    .unwrap();
    codec.set_fields(EXAMPLE).unwrap();

    let mut other = seeded(3);
    other.deserialize(&codec.serialize().unwrap()).unwrap();
    assert_eq!(other.values(), codec.values());
}

#[test]
fn test_example_serial_round_trip() {
    let mut codec = seeded(1);
    codec.set(SetInput::Fields(EXAMPLE)).unwrap();

    let serial = codec.serialize().unwrap();
    assert_eq!(serial.len(), 100);
    assert!(serial.chars().all(|c| c == '0' || c == '1'));

    let mut decoder = seeded(2);
    decoder.deserialize(&serial).unwrap();
    for &(name, value) in EXAMPLE {
        assert_eq!(decoder.get(name), Ok(Some(value)));
    }
    assert_eq!(decoder.salt(), codec.salt());
    assert_eq!(decoder.serialize().unwrap(), serial);
}

#[test]
fn test_hex_hardware_id_through_set_serial() {
    let mut codec = seeded(5);
    codec
        .set_fields(&[
            ("date", 100),
            ("product", 1),
            ("version", 1),
            ("revision", 0),
            ("hardwareId", 0x1234567890),
        ])
        .unwrap();
    let serial = codec.serialize().unwrap();

    let assigned = codec.set(SetInput::Serial(&serial)).unwrap();
    let Assigned::Values(values) = assigned else {
        panic!("expected every value back");
    };
    assert_eq!(values.len(), 5);
    assert_eq!(values["hardwareId"], 0x1234567890);
}

#[test]
fn test_ranges_per_width() {
    let mut codec = seeded(9);
    assert_eq!(codec.set_field("date", 0xFFFF), Ok(0xFFFF));
    assert_eq!(codec.set_field("hardwareId", 0xFFFF_FFFF_FFFF), Ok(0xFFFF_FFFF_FFFF));
    assert!(matches!(
        codec.set(SetInput::Field("date", 0x1_0000)),
        Err(Error::Value(ValueError::OutOfRange { max: 0xFFFF, .. }))
    ));
    assert!(matches!(
        codec.set(SetInput::Field("hardwareId", 1 << 48)),
        Err(Error::Value(ValueError::OutOfRange { .. }))
    ));
    assert_eq!(
        codec.set(SetInput::Field("serial", 1)),
        Err(Error::Value(ValueError::UnknownField("serial".to_string())))
    );
}

#[test]
fn test_serialize_requires_every_field() {
    let mut codec = seeded(4);
    codec.set_field("date", 12).unwrap();
    assert_eq!(
        codec.serialize(),
        Err(WriteError::Incomplete(vec![
            "product".to_string(),
            "version".to_string(),
            "revision".to_string(),
            "hardwareId".to_string(),
        ]))
    );

    codec.set_fields(&EXAMPLE[1..]).unwrap();
    assert!(codec.serialize().is_ok());
}

#[test]
fn test_different_salts_give_different_serials() {
    let mut a = seeded(10);
    let mut b = seeded(11);
    a.set_fields(EXAMPLE).unwrap();
    b.set_fields(EXAMPLE).unwrap();
    assert_eq!(
        a.salt() != b.salt(),
        a.serialize().unwrap() != b.serialize().unwrap()
    );

    a.set_salt("000000000000").unwrap();
    b.set_salt("000000000001").unwrap();
    assert_ne!(a.serialize().unwrap(), b.serialize().unwrap());
}

#[test]
fn test_bad_serial_leaves_state_untouched() {
    let mut codec = seeded(6);
    codec.set_fields(EXAMPLE).unwrap();
    let serial = codec.serialize().unwrap();
    let values = codec.values();
    let salt = codec.salt().clone();

    let mut corrupted = serial.clone();
    corrupted.replace_range(50..51, "x");
    assert_eq!(codec.deserialize(&corrupted), Err(ReadError::NotBinary));
    assert_eq!(
        codec.deserialize(&serial[1..]),
        Err(ReadError::InvalidLength {
            expected: 100,
            actual: 99
        })
    );
    assert_eq!(
        codec.set(SetInput::Serial(&format!("{serial}0"))),
        Err(Error::Read(ReadError::InvalidLength {
            expected: 100,
            actual: 101
        }))
    );

    assert_eq!(codec.values(), values);
    assert_eq!(codec.salt(), &salt);
}

#[test]
fn test_values_snapshot_includes_undefined() {
    let mut codec = seeded(8);
    codec.set_field("product", 7).unwrap();
    let values = codec.values();
    assert_eq!(values.len(), 5);
    assert_eq!(values["product"], Some(7));
    assert_eq!(values["date"], None);
}

fn widths() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..=16, 1..6)
}

proptest! {
    #[test]
    fn prop_round_trip(
        widths in widths(),
        seed in any::<u64>(),
        raw in prop::collection::vec(any::<u128>(), 6),
    ) {
        let fields: Vec<Field> = widths
            .iter()
            .enumerate()
            .map(|(i, &bytes)| Field::with_bytes(format!("f{i}"), bytes))
            .collect();
        let schema = Schema::compile(&fields).unwrap();
        let mut codec =
            SerialCodec::with_rng(schema.clone(), &mut ChaCha8Rng::seed_from_u64(seed));

        let mut expected = IndexMap::new();
        for (field, raw) in schema.fields().iter().zip(&raw) {
            let value = raw & field.max;
            codec.set_field(&field.name, value).unwrap();
            expected.insert(field.name.clone(), Some(value));
        }

        let serial = codec.serialize().unwrap();
        prop_assert_eq!(serial.len(), schema.total_bits());

        let mut decoder = SerialCodec::with_rng(schema, &mut ChaCha8Rng::seed_from_u64(!seed));
        decoder.deserialize(&serial).unwrap();
        prop_assert_eq!(decoder.values(), expected);
        prop_assert_eq!(decoder.salt(), codec.salt());
        prop_assert_eq!(decoder.serialize().unwrap(), serial);
    }
}
