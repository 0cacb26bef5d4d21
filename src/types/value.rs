use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{ClientError, ClientResult};

/// Typed wire argument for a contract invocation.
///
/// The remote contract rejects mis-typed arguments at execution time rather
/// than at build time, so every operation constructs its argument list from
/// these variants explicitly instead of coercing from strings. 128-bit
/// integers travel as decimal strings because JSON numbers cannot carry them
/// without precision loss.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ScVal {
    Str(String),
    U64(u64),
    #[serde(with = "i128_decimal")]
    I128(i128),
    Address(String),
}

mod i128_decimal {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &i128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i128, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|err| D::Error::custom(format!("invalid i128 literal {raw:?}: {err}")))
    }
}

/// Strict decoding helpers for the loosely-typed record values returned by
/// read simulations. Shape mismatches surface as `QueryError`s at this
/// boundary instead of propagating untyped data upward.
pub fn expect_object<'a>(value: &'a Value, what: &str) -> ClientResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| ClientError::Query(format!("malformed {what}: expected a record")))
}

pub fn field_str(record: &Map<String, Value>, name: &str) -> ClientResult<String> {
    record
        .get(name)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| ClientError::Query(format!("malformed record: missing string field {name}")))
}

pub fn field_u64(record: &Map<String, Value>, name: &str) -> ClientResult<u64> {
    record
        .get(name)
        .and_then(Value::as_u64)
        .ok_or_else(|| ClientError::Query(format!("malformed record: missing u64 field {name}")))
}

pub fn field_bool(record: &Map<String, Value>, name: &str) -> ClientResult<bool> {
    record
        .get(name)
        .and_then(Value::as_bool)
        .ok_or_else(|| ClientError::Query(format!("malformed record: missing bool field {name}")))
}

/// Extended-precision amounts arrive either as a JSON number (small values)
/// or as a decimal string (the transport's i128 representation).
pub fn field_i128(record: &Map<String, Value>, name: &str) -> ClientResult<i128> {
    let value = record
        .get(name)
        .ok_or_else(|| ClientError::Query(format!("malformed record: missing field {name}")))?;
    match value {
        Value::Number(number) => number
            .as_i64()
            .map(i128::from)
            .ok_or_else(|| ClientError::Query(format!("malformed record: field {name} overflows"))),
        Value::String(raw) => raw.parse().map_err(|err| {
            ClientError::Query(format!("malformed record: field {name} is not an i128: {err}"))
        }),
        _ => Err(ClientError::Query(format!(
            "malformed record: field {name} is not numeric"
        ))),
    }
}
