// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Property tests: size agreement, round trips and offset independence.

use proptest::prelude::*;
use robomsg::{CodecValue, Ros1Codec};

const SAMPLE: &str = "\
int32 id
float64 score
bool valid
string name
uint8[] payload
int16[3] triple
time stamp
duration timeout
pkg/Item[] items
===
MSG: pkg/Item
string key
int64 value
float32[] weights
";

fn item_strategy() -> impl Strategy<Value = CodecValue> {
    (
        ".{0,12}",
        any::<i64>(),
        prop::collection::vec(-1.0e6f32..1.0e6f32, 0..6),
    )
        .prop_map(|(key, value, weights)| {
            CodecValue::from_fields([
                ("key", CodecValue::String(key)),
                ("value", CodecValue::Int64(value)),
                (
                    "weights",
                    CodecValue::Array(weights.into_iter().map(CodecValue::Float32).collect()),
                ),
            ])
        })
}

prop_compose! {
    fn sample_strategy()(
        id in any::<i32>(),
        score in -1.0e12f64..1.0e12f64,
        valid in any::<bool>(),
        name in ".{0,24}",
        payload in prop::collection::vec(any::<u8>(), 0..64),
        triple in prop::array::uniform3(any::<i16>()),
        sec in any::<u32>(),
        nsec in 0u32..1_000_000_000,
        timeout in (any::<i32>(), any::<i32>()),
        items in prop::collection::vec(item_strategy(), 0..4),
    ) -> CodecValue {
        CodecValue::from_fields([
            ("id", CodecValue::Int32(id)),
            ("score", CodecValue::Float64(score)),
            ("valid", CodecValue::Bool(valid)),
            ("name", CodecValue::String(name)),
            ("payload", CodecValue::Bytes(payload)),
            ("triple", CodecValue::Array(triple.into_iter().map(CodecValue::Int16).collect())),
            ("stamp", CodecValue::Time { sec, nsec }),
            ("timeout", CodecValue::Duration { sec: timeout.0, nsec: timeout.1 }),
            ("items", CodecValue::Array(items)),
        ])
    }
}

proptest! {
    #[test]
    fn test_calculated_size_matches_write(value in sample_strategy()) {
        let codec = Ros1Codec::from_definition(SAMPLE).unwrap();
        let size = codec.calculate_byte_size(&value).unwrap();
        let bytes = codec.write_message(&value).unwrap();
        prop_assert_eq!(bytes.len(), size);
        prop_assert_eq!(codec.size(&bytes).unwrap(), size);
    }

    #[test]
    fn test_materialize_round_trip(value in sample_strategy()) {
        let codec = Ros1Codec::from_definition(SAMPLE).unwrap();
        let bytes = codec.write_message(&value).unwrap();
        let view = codec.decode_message(&bytes);
        prop_assert_eq!(view.size().unwrap(), bytes.len());
        let decoded = view.materialize().unwrap();
        prop_assert_eq!(&decoded, &value);

        let rewritten = codec.write_message(&decoded).unwrap();
        prop_assert_eq!(rewritten, bytes);
    }

    #[test]
    fn test_offset_independence(
        value in sample_strategy(),
        prefix in prop::collection::vec(any::<u8>(), 0..16),
        suffix in prop::collection::vec(any::<u8>(), 0..16),
    ) {
        let codec = Ros1Codec::from_definition(SAMPLE).unwrap();
        let size = codec.calculate_byte_size(&value).unwrap();

        let mut buf = prefix.clone();
        buf.resize(prefix.len() + size, 0);
        buf.extend_from_slice(&suffix);
        let written = codec.write(&value, &mut buf, prefix.len(), size).unwrap();
        prop_assert_eq!(written, size);
        prop_assert_eq!(&buf[..prefix.len()], prefix.as_slice());
        prop_assert_eq!(&buf[prefix.len() + size..], suffix.as_slice());

        let standalone = codec.write_message(&value).unwrap();
        let inner = codec.decode(&buf, prefix.len(), size).unwrap();
        let outer = codec.decode_message(&standalone);
        prop_assert_eq!(inner.materialize().unwrap(), outer.materialize().unwrap());
        prop_assert_eq!(inner.as_bytes().unwrap(), standalone.as_slice());
    }

    #[test]
    fn test_array_element_matches_sub_range_decode(value in sample_strategy()) {
        let codec = Ros1Codec::from_definition(SAMPLE).unwrap();
        let bytes = codec.write_message(&value).unwrap();
        let items = value.as_struct().unwrap()["items"].as_array().unwrap();

        // `items` is the last field, so its elements end the message.
        let sizes: Vec<usize> = items
            .iter()
            .map(|item| codec.calculate_type_byte_size("pkg/Item", item).unwrap())
            .collect();
        let mut offset = bytes.len() - sizes.iter().sum::<usize>();

        let view = codec.decode_message(&bytes);
        let array = view.get("items").unwrap().as_array().unwrap();
        prop_assert_eq!(array.len(), items.len());

        for (i, size) in sizes.into_iter().enumerate() {
            let direct = codec.decode_type("pkg/Item", &bytes, offset, size).unwrap();
            let element = array.get(i).unwrap();
            prop_assert_eq!(direct.materialize().unwrap(), element.materialize().unwrap());
            prop_assert_eq!(&direct.materialize().unwrap(), &items[i]);

            let nested = element.as_view().unwrap();
            prop_assert_eq!(nested.size().unwrap(), size);
            prop_assert_eq!(nested.as_bytes().unwrap(), &bytes[offset..offset + size]);
            offset += size;
        }
    }

    #[test]
    fn test_truncation_never_panics(value in sample_strategy(), cut in 0usize..64) {
        let codec = Ros1Codec::from_definition(SAMPLE).unwrap();
        let bytes = codec.write_message(&value).unwrap();
        let end = bytes.len().saturating_sub(cut + 1);
        let view = codec.decode_message(&bytes[..end]);
        prop_assert!(view.materialize().is_err());
        prop_assert!(codec.size(&bytes[..end]).is_err());
    }
}
