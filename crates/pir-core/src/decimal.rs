//! Serde helpers that encode `BigUint` as a decimal string.
//!
//! Deserialization also accepts plain JSON numbers that fit in a `u64`, so
//! hand-written config files can say `"alpha": 3`.

use num_bigint::BigUint;
use serde::{de, Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_str_radix(10))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Number(u64),
    Text(String),
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
    match Repr::deserialize(deserializer)? {
        Repr::Number(value) => Ok(BigUint::from(value)),
        Repr::Text(text) => text.trim().parse().map_err(de::Error::custom),
    }
}
