//! Token amounts at the JSON boundary.
//!
//! Amounts are carried as `U256` and written as decimal strings
//! (e.g. `"1000000000000000000"`). Reading also accepts `0x`-prefixed hex
//! strings and plain JSON integers, since pathfinder responses use both.

use alloy::primitives::U256;
use alloy::primitives::ruint::ParseError;
use serde::{Deserialize, Deserializer, Serializer, de};

/// Parse an amount from a decimal or `0x`-prefixed hex string.
pub fn parse_amount(text: &str) -> Result<U256, ParseError> {
    text.trim().parse::<U256>()
}

pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Text(text) => parse_amount(&text)
            .map_err(|e| de::Error::custom(format!("invalid amount `{text}`: {e}"))),
        Raw::Number(n) => Ok(U256::from(n)),
    }
}
