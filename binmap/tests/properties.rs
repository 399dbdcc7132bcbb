use anyhow::{anyhow, Result};
use binmap::serde::{FieldReader, TypeTag};
use binmap::{
    BinMap, BinMapError, FormatError, InputKindError, Mapping, Options, TextEncoding, Value,
    DEFAULT_MAX_SEQUENCE_LEN,
};
use std::thread;

fn demo_object() -> Value {
    let bytes = b"Hello World".to_vec();
    [
        ("a", Value::Number(1)),
        ("b", Value::from("Hello World")),
        ("c", Value::Boolean(true)),
        ("d", Value::Null),
        ("e", Value::Absent),
        ("f", Value::from(bytes.clone())),
        ("g", Value::from(&bytes[..])),
        ("h", (1u64..=5).map(Value::from).collect()),
        (
            "i",
            [
                ("a", Value::Number(1)),
                ("b", Value::from("Hello World")),
                ("c", Value::Boolean(true)),
            ]
            .into_iter()
            .collect(),
        ),
    ]
    .into_iter()
    .collect()
}

fn field<'v>(root: &'v Value, key: &str) -> Result<&'v Value> {
    root.as_mapping()
        .and_then(|m| m.get(key))
        .ok_or(anyhow!("missing key {}", key))
}

#[test]
fn round_trip_drops_absent() -> Result<()> {
    let obj = demo_object();
    let buf = binmap::serialize(&obj)?;
    let de = binmap::deserialize(&buf)?;

    let m = de.as_mapping().ok_or(anyhow!("not a mapping"))?;
    assert_eq!(
        m.keys().map(String::as_str).collect::<Vec<_>>(),
        ["a", "b", "c", "d", "f", "g", "h", "i"]
    );
    assert!(!m.contains_key("e"));
    assert_eq!(field(&de, "f")?.as_binary(), Some(&b"Hello World"[..]));
    assert_eq!(field(&de, "g")?, field(&de, "f")?);
    Ok(())
}

#[test]
fn sequence_order() -> Result<()> {
    let seq: Value = (1u64..=5).map(Value::from).collect();
    let de = binmap::deserialize(binmap::serialize(&seq)?)?;
    assert_eq!(de, seq);
    Ok(())
}

#[test]
fn boolean_bytes() -> Result<()> {
    for (b, byte) in [(true, 1u8), (false, 0u8)] {
        let obj: Value = [("a", Value::Boolean(b))].into_iter().collect();
        let buf = binmap::serialize(&obj)?;
        assert_eq!(
            buf,
            [TypeTag::Mapping as u8, TypeTag::Boolean as u8, 1, 0, 0, 0, b'a', 1, 0, 0, 0, byte]
        );
        assert_eq!(binmap::deserialize(&buf)?, obj);
    }
    Ok(())
}

#[test]
fn large_integers() -> Result<()> {
    for n in [1u64 << 60, (1 << 53) + 1, u64::MAX] {
        let obj: Value = [("n", Value::Number(n))].into_iter().collect();
        let de = binmap::deserialize(binmap::serialize(&obj)?)?;
        assert_eq!(field(&de, "n")?.as_number(), Some(n));
    }
    Ok(())
}

#[test]
fn nested_structures() -> Result<()> {
    let obj: Value = [
        ("h", (1u64..=3).map(Value::from).collect()),
        (
            "i",
            [("a", Value::Number(1)), ("b", Value::from("x"))]
                .into_iter()
                .collect(),
        ),
    ]
    .into_iter()
    .collect();
    let de = binmap::deserialize(binmap::serialize(&obj)?)?;
    assert_eq!(de, obj);
    assert!(field(&de, "h")?.as_sequence().is_some());
    assert!(field(&de, "i")?.as_mapping().is_some());
    Ok(())
}

#[test]
fn truncated_input_is_rejected() -> Result<()> {
    let buf = binmap::serialize(&demo_object())?;
    let res = binmap::deserialize(&buf[..buf.len() - 1]);
    assert!(
        matches!(res, Err(BinMapError::Format(FormatError::UnexpectedEof { .. }))),
        "{:?}",
        res
    );
    Ok(())
}

#[test]
fn binary_fidelity() -> Result<()> {
    let backing = [0xAAu8, 0x00, 0xFF, 0x10, 0xBB];
    let obj: Value = [("bin", Value::from(&backing[1..4]))].into_iter().collect();
    let de = binmap::deserialize(binmap::serialize(&obj)?)?;
    assert_eq!(field(&de, "bin")?.as_binary(), Some(&[0x00, 0xFF, 0x10][..]));
    Ok(())
}

#[test]
fn scalar_roots_are_rejected() {
    for root in [
        Value::Null,
        Value::Absent,
        Value::Number(1),
        Value::from("text"),
        Value::Boolean(false),
        Value::Binary(vec![]),
    ] {
        let kind = root.kind_name();
        assert!(
            matches!(
                binmap::serialize(&root),
                Err(BinMapError::InputKind(InputKindError::NonContainerRoot(k))) if k == kind
            ),
            "{}",
            kind
        );
    }
}

#[test]
fn unknown_field_tag_is_rejected() -> Result<()> {
    let mut buf = binmap::serialize(&[("a", Value::Null)].into_iter().collect())?;
    buf[1] = 9;
    assert!(matches!(
        binmap::deserialize(&buf),
        Err(BinMapError::Format(FormatError::UnknownTypeTag(9)))
    ));
    Ok(())
}

#[test]
fn text_encodings() -> Result<()> {
    let obj: Value = [("ключ", Value::from("значение"))].into_iter().collect();
    for enc in [TextEncoding::Utf8, TextEncoding::Utf16Le, TextEncoding::Utf16Be] {
        let opts = Options::new().with_text_encoding(enc);
        let buf = binmap::serialize_with_options(&obj, &opts)?;
        assert_eq!(binmap::deserialize_with_options(&buf, &opts)?, obj);
    }

    let utf8 = binmap::serialize(&obj)?;
    let utf16 = binmap::serialize_with_options(
        &obj,
        &Options::new().with_text_encoding(TextEncoding::Utf16Le),
    )?;
    assert_ne!(utf8, utf16);

    let latin1 = Options::new().with_text_encoding_label("latin1")?;
    let res = binmap::serialize_with_options(&obj, &latin1);
    assert!(matches!(
        res,
        Err(BinMapError::InputKind(InputKindError::Unencodable {
            encoding: TextEncoding::Latin1,
            ..
        }))
    ));
    Ok(())
}

#[test]
fn encode_depth_limit() -> Result<()> {
    let mut val = Value::Mapping(Mapping::new());
    for _ in 0..4 {
        val = [("x", val)].into_iter().collect();
    }
    /* 5 levels including the root. */
    let codec = BinMap::new(Options::new().with_max_depth(5));
    let buf = codec.serialize(&val)?;
    assert_eq!(codec.deserialize(&buf)?, val);

    let shallow = BinMap::new(Options::new().with_max_depth(4));
    assert!(matches!(
        shallow.serialize(&val),
        Err(BinMapError::InputKind(InputKindError::TooDeep(4)))
    ));
    assert!(matches!(
        shallow.deserialize(&buf),
        Err(BinMapError::Format(FormatError::TooDeep(4)))
    ));
    Ok(())
}

#[test]
fn json_bridge() -> Result<()> {
    let json = serde_json::json!({ "list": [1, "two", null, true], "n": 1u64 << 60 });
    let val = Value::try_from(json.clone())?;
    let de = binmap::deserialize(binmap::serialize(&val)?)?;
    assert_eq!(serde_json::Value::from(de), json);

    let negative = serde_json::json!({ "n": -1 });
    assert!(Value::try_from(negative).is_err());
    Ok(())
}

#[test]
fn json_bridge_keeps_key_order() -> Result<()> {
    let text = r#"{"zeta":1,"alpha":[true],"mid":"x"}"#;
    let val = Value::try_from(serde_json::from_str::<serde_json::Value>(text)?)?;
    let de = binmap::deserialize(binmap::serialize(&val)?)?;

    let m = de.as_mapping().ok_or(anyhow!("not a mapping"))?;
    assert_eq!(
        m.keys().map(String::as_str).collect::<Vec<_>>(),
        ["zeta", "alpha", "mid"]
    );
    assert_eq!(serde_json::to_string(&serde_json::Value::from(de))?, text);
    Ok(())
}

#[test]
fn sequence_limits_hold_on_both_sides() -> Result<()> {
    /* Anything serialize accepts, deserialize with the same options accepts. */
    let too_long = Value::Sequence(vec![Value::Null; DEFAULT_MAX_SEQUENCE_LEN + 1]);
    assert!(matches!(
        binmap::serialize(&too_long),
        Err(BinMapError::InputKind(InputKindError::SequenceTooLong { len, max }))
            if len == DEFAULT_MAX_SEQUENCE_LEN + 1 && max == DEFAULT_MAX_SEQUENCE_LEN
    ));

    let codec = BinMap::new(Options::new().with_max_sequence_len(3));
    let fits: Value = (0u64..3).map(Value::from).collect();
    assert_eq!(codec.deserialize(codec.serialize(&fits)?)?, fits);
    let over: Value = (0u64..4).map(Value::from).collect();
    assert!(matches!(
        codec.serialize(&over),
        Err(BinMapError::InputKind(InputKindError::SequenceTooLong { len: 4, max: 3 }))
    ));
    /* Encoded with a looser codec, the same value fails to decode. */
    let buf = binmap::serialize(&over)?;
    assert!(matches!(
        codec.deserialize(&buf),
        Err(BinMapError::Format(FormatError::IndexOutOfBounds { index: 3, max: 3 }))
    ));

    let codec = BinMap::new(Options::new().with_max_sequence_elements(4));
    let pair: Value = [("x", fits.clone()), ("y", fits)].into_iter().collect();
    assert!(matches!(
        codec.serialize(&pair),
        Err(BinMapError::InputKind(InputKindError::TooManySequenceElements(4)))
    ));
    assert!(matches!(
        codec.deserialize(binmap::serialize(&pair)?),
        Err(BinMapError::Format(FormatError::TooManySequenceElements(4)))
    ));
    Ok(())
}

#[test]
fn fields_are_iterable() -> Result<()> {
    let buf = binmap::serialize(&demo_object())?;
    let tags = FieldReader::new(&buf[1..])
        .map(|field| field.map(|f| f.tag))
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(
        tags,
        [
            TypeTag::Number,
            TypeTag::Text,
            TypeTag::Boolean,
            TypeTag::Null,
            TypeTag::Binary,
            TypeTag::Binary,
            TypeTag::Sequence,
            TypeTag::Mapping,
        ]
    );
    Ok(())
}

#[test]
fn shared_codec_across_threads() -> Result<()> {
    let codec = BinMap::default();
    let obj = demo_object();
    let expected = binmap::serialize(&obj)?;

    thread::scope(|s| {
        let handles = (0..4)
            .map(|_| {
                s.spawn(|| -> Result<()> {
                    let buf = codec.serialize(&obj)?;
                    assert_eq!(buf, expected);
                    codec.deserialize(&buf)?;
                    Ok(())
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.join().map_err(|_| anyhow!("thread panicked"))??;
        }
        Ok(())
    })
}
