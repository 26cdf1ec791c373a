//! Hashing System - SHA-256 digests for versions and pack members
//!
//! Provides deterministic, reproducible hashes so a stored version can be
//! checked against its parameters and artifacts.

use std::collections::BTreeMap;

use sha2::{Sha256, Digest};
use serde::Serialize;
use serde_json::{Value, to_string};

use crate::params::ParameterSet;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    let sorted = sort_value(&v);
    to_string(&sorted)
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            let sorted_map: serde_json::Map<String, Value> = sorted
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_value(v)))
                .collect();
            Value::Object(sorted_map)
        }
        Value::Array(arr) => {
            Value::Array(arr.iter().map(sort_value).collect())
        }
        _ => v.clone()
    }
}

/// Fingerprint of a parameter set, independent of field order.
pub fn params_hash(params: &ParameterSet) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(params)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

/// Digest per pack member, keyed by file name.
pub fn artifact_digests<'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a [u8])>,
) -> BTreeMap<String, String> {
    entries
        .into_iter()
        .map(|(name, bytes)| (name.to_string(), sha256_hex(bytes)))
        .collect()
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": 2, "m": 3});
        let canonical = canonical_json(&obj).unwrap();
        assert_eq!(canonical, r#"{"a":2,"m":3,"z":1}"#);
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_params_hash_tracks_changes() {
        let a = ParameterSet::default();
        let mut b = a.clone();
        assert_eq!(params_hash(&a).unwrap(), params_hash(&b).unwrap());
        b.body.chest_finished_circumference_mm += 10.0;
        assert_ne!(params_hash(&a).unwrap(), params_hash(&b).unwrap());
    }

    #[test]
    fn test_artifact_digests_keyed_by_name() {
        let digests = artifact_digests([("a.svg", &b"<svg/>"[..]), ("b.json", &b"{}"[..])]);
        assert_eq!(digests.len(), 2);
        assert_eq!(digests["b.json"], sha256_hex(b"{}"));
    }
}
