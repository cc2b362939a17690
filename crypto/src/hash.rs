//! SHA-256 hashing for blocks and sensitive identifiers.

use idseal_types::{Block, BlockHash, SecondaryIdHash, Timestamp};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Compute a SHA-256 digest of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 digest as 64 lowercase hex characters.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// One-way hash of a secondary identifier. Only the digest may be stored.
pub fn hash_secondary_id(raw: &str) -> SecondaryIdHash {
    SecondaryIdHash::from_digest_hex(sha256_hex(raw.as_bytes()))
}

/// Render a JSON value with object keys sorted at every depth.
///
/// Written out by hand rather than relying on `serde_json::Map` ordering, which
/// flips to insertion order when any crate in the build enables `preserve_order`.
pub fn canonical_payload(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                write_canonical(&map[*key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Everything in a block's hash input except the nonce, pre-fed into a hasher.
///
/// Mining hashes the same prefix thousands of times; cloning the primed
/// hasher avoids re-hashing the payload on every attempt.
#[derive(Clone)]
pub struct BlockPreimage {
    primed: Sha256,
}

impl BlockPreimage {
    pub fn new(
        index: u64,
        previous_hash: &BlockHash,
        timestamp: Timestamp,
        payload: &Value,
    ) -> Self {
        let mut primed = Sha256::new();
        primed.update(index.to_string().as_bytes());
        primed.update(previous_hash.to_hex().as_bytes());
        primed.update(timestamp.to_string().as_bytes());
        primed.update(canonical_payload(payload).as_bytes());
        Self { primed }
    }

    /// Finish the digest for one nonce.
    pub fn hash_with_nonce(&self, nonce: u64) -> BlockHash {
        let mut hasher = self.primed.clone();
        hasher.update(nonce.to_string().as_bytes());
        BlockHash::new(hasher.finalize().into())
    }
}

/// Hash the five sealed fields of a block.
pub fn hash_block_fields(
    index: u64,
    previous_hash: &BlockHash,
    timestamp: Timestamp,
    payload: &Value,
    nonce: u64,
) -> BlockHash {
    BlockPreimage::new(index, previous_hash, timestamp, payload).hash_with_nonce(nonce)
}

/// Recompute a stored block's hash from its own fields.
pub fn recompute_block_hash(block: &Block) -> BlockHash {
    hash_block_fields(
        block.index,
        &block.previous_hash,
        block.timestamp,
        &block.payload,
        block.nonce,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn secondary_id_hash_is_digest_not_raw() {
        let hashed = hash_secondary_id("123412341234");
        assert_eq!(hashed.as_str().len(), 64);
        assert!(!hashed.as_str().contains("123412341234"));
        assert_eq!(hashed, hash_secondary_id("123412341234"));
    }

    #[test]
    fn canonical_payload_sorts_nested_keys() {
        let a = json!({"b": 1, "a": {"y": [1, 2], "x": "s"}});
        assert_eq!(canonical_payload(&a), r#"{"a":{"x":"s","y":[1,2]},"b":1}"#);
    }

    #[test]
    fn canonical_payload_ignores_insertion_order() {
        let mut first = serde_json::Map::new();
        first.insert("name".into(), json!("A"));
        first.insert("key".into(), json!("K"));
        let mut second = serde_json::Map::new();
        second.insert("key".into(), json!("K"));
        second.insert("name".into(), json!("A"));
        assert_eq!(
            canonical_payload(&Value::Object(first)),
            canonical_payload(&Value::Object(second))
        );
    }

    #[test]
    fn preimage_matches_plain_concatenation() {
        let payload = json!({"k": "v"});
        let ts = Timestamp::from_millis(1_700_000_000_123);
        let expected = sha256(
            format!("3{}1700000000123{}42", BlockHash::ZERO, r#"{"k":"v"}"#).as_bytes(),
        );
        let got = hash_block_fields(3, &BlockHash::ZERO, ts, &payload, 42);
        assert_eq!(got, BlockHash::new(expected));
    }

    #[test]
    fn nonce_changes_hash() {
        let pre = BlockPreimage::new(0, &BlockHash::ZERO, Timestamp::EPOCH, &json!({}));
        assert_ne!(pre.hash_with_nonce(0), pre.hash_with_nonce(1));
    }
}
