//! Built-in TOON (Token-Oriented Object Notation) codec.
//!
//! Covers the shapes a JSON tree can take:
//!
//! ```text
//! name: Alice
//! tags[2]: admin,user
//! items[2]{id,price}:
//!   1,9.99
//!   2,14.99
//! mixed[2]:
//!   - 1
//!   - note: free form
//!     seen: true
//! ```
//!
//! Array headers carry their element count, so the decoder never guesses
//! where an array ends. Numbers are written with serde_json's formatting,
//! which keeps integers and floats apart across a round trip.

mod decode;
mod encode;
mod literal;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::constants::DEFAULT_INDENT;

pub use decode::{decode, DecodeError};
pub use encode::encode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }

    /// Marker placed after the count inside `[N]`; comma is implied.
    fn header_marker(self) -> &'static str {
        match self {
            Delimiter::Comma => "",
            Delimiter::Tab => "\t",
            Delimiter::Pipe => "|",
        }
    }

    fn from_marker(c: char) -> Option<Delimiter> {
        match c {
            '\t' => Some(Delimiter::Tab),
            '|' => Some(Delimiter::Pipe),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub indent: usize,
    pub delimiter: Delimiter,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            delimiter: Delimiter::Comma,
        }
    }
}

/// The delimiter is read from each array header, so only indentation is
/// configurable on the decode side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub indent: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, DecodeOptions, Delimiter, EncodeOptions};
    use crate::services::compare::compare_root;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn round_trip(v: &Value, opts: EncodeOptions) -> Value {
        let doc = encode(v, &opts);
        decode(&doc, &DecodeOptions { indent: opts.indent })
            .unwrap_or_else(|e| panic!("decode failed: {e}\n{doc}"))
    }

    #[test]
    fn awkward_values_survive_a_round_trip() {
        let v = json!({
            "": "empty key",
            "user-id": "-leading dash",
            "quote\"key": ["a,b", "c|d", " pad ", "", "true", "12", "x: y"],
            "nums": [0, -1, 1.0, 1.5e300, -0.25, 18446744073709551615u64],
            "rows": [{"a": 1, "b": null}, {"a": 2, "b": false}],
            "ragged": [{"a": 1}, {"b": 2}, {"a": [1, {"c": []}]}],
            "nested": [[[]], [[1], {}], {"deep": {"deeper": {}}}],
            "text": "line\nbreak\ttab \u{7f}"
        });
        for delimiter in [Delimiter::Comma, Delimiter::Tab, Delimiter::Pipe] {
            for indent in [1, 2, 4] {
                let back = round_trip(&v, EncodeOptions { indent, delimiter });
                assert_eq!(compare_root(&v, &back), Ok(()), "{delimiter:?}/{indent}");
            }
        }
    }

    #[test]
    fn root_scalars_round_trip() {
        for v in [json!(null), json!(true), json!(-7), json!(2.5), json!("hi there"), json!("")] {
            assert_eq!(round_trip(&v, EncodeOptions::default()), v);
        }
    }

    fn arbitrary_tree() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| Value::Number(n.into())),
            any::<f64>()
                .prop_filter("finite", |f| f.is_finite())
                .prop_map(|f| serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number)),
            ".*".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
                prop::collection::vec((".*", inner), 0..8)
                    .prop_map(|entries| Value::Object(entries.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(tree in arbitrary_tree()) {
            let back = round_trip(&tree, EncodeOptions::default());
            prop_assert_eq!(compare_root(&tree, &back), Ok(()));
        }

        #[test]
        fn decode_inverts_encode_with_pipes(tree in arbitrary_tree()) {
            let opts = EncodeOptions { indent: 3, delimiter: Delimiter::Pipe };
            let back = round_trip(&tree, opts);
            prop_assert_eq!(compare_root(&tree, &back), Ok(()));
        }
    }
}
