//! String identifier codec for surrogate ids.
//!
//! Storage backends that key only on natural names still need a way to find
//! and deduplicate entities by surrogate id. The codec embeds the id into an
//! entity's free-form property map under a reserved key, and strips it again
//! before the map is ever returned to a caller. The reserved key is internal
//! bookkeeping owned entirely by the store/manager boundary.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::id::EntityId;

/// Reserved property key carrying the encoded surrogate id.
///
/// Never visible in a caller-facing property map.
pub const ID_KEY: &str = "atrium.identifier";

/// Prefix of every encoded identifier token.
const TOKEN_PREFIX: &str = "atrium.v1.uid";

/// A surrogate id in its property-map embeddable form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringIdentifier(EntityId);

impl StringIdentifier {
    /// Wraps an entity id for embedding.
    #[must_use]
    pub const fn from_id(id: EntityId) -> Self {
        Self(id)
    }

    /// Returns the wrapped entity id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.0
    }

    /// Encodes the id as a reversible string token.
    #[must_use]
    pub fn encode(&self) -> String {
        format!("{TOKEN_PREFIX}{}", self.0)
    }

    /// Decodes a token produced by [`encode`](Self::encode).
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedIdentifier`] if the token does not carry
    /// the expected prefix or a decimal id.
    pub fn decode(token: &str) -> Result<Self> {
        let digits = token
            .strip_prefix(TOKEN_PREFIX)
            .ok_or_else(|| Error::MalformedIdentifier {
                message: format!("token '{token}' does not start with '{TOKEN_PREFIX}'"),
            })?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::MalformedIdentifier {
                message: format!("token '{token}' does not carry a decimal id"),
            });
        }
        let raw: u64 = digits.parse().map_err(|e| Error::MalformedIdentifier {
            message: format!("token '{token}' id out of range: {e}"),
        })?;
        Ok(Self(EntityId::new(raw)))
    }

    /// Reads the identifier embedded in a property map, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedIdentifier`] if the reserved key is present
    /// but its token cannot be decoded.
    pub fn from_properties(properties: &HashMap<String, String>) -> Result<Option<Self>> {
        properties.get(ID_KEY).map(|t| Self::decode(t)).transpose()
    }

    /// Adds the reserved key to a property map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReservedKeyConflict`] if the caller-supplied map
    /// already uses the reserved key.
    pub fn embed_in_properties(
        &self,
        mut properties: HashMap<String, String>,
    ) -> Result<HashMap<String, String>> {
        if properties.contains_key(ID_KEY) {
            return Err(Error::ReservedKeyConflict {
                key: ID_KEY.to_string(),
            });
        }
        properties.insert(ID_KEY.to_string(), self.encode());
        Ok(properties)
    }

    /// Removes the reserved key from a property map.
    ///
    /// Total: a map without the key passes through unchanged.
    #[must_use]
    pub fn strip_from_properties(
        mut properties: HashMap<String, String>,
    ) -> HashMap<String, String> {
        properties.remove(ID_KEY);
        properties
    }
}

impl fmt::Display for StringIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrip() {
        let ident = StringIdentifier::from_id(EntityId::new(12_345));
        let token = ident.encode();
        assert_eq!(token, "atrium.v1.uid12345");
        let decoded = StringIdentifier::decode(&token).expect("decode should succeed");
        assert_eq!(decoded, ident);
    }

    #[test]
    fn decode_rejects_wrong_prefix() {
        let err = StringIdentifier::decode("other.v1.uid42").unwrap_err();
        assert!(matches!(err, Error::MalformedIdentifier { .. }));
    }

    #[test]
    fn decode_rejects_non_decimal_suffix() {
        for token in ["atrium.v1.uid", "atrium.v1.uid12x", "atrium.v1.uid-3"] {
            let err = StringIdentifier::decode(token).unwrap_err();
            assert!(matches!(err, Error::MalformedIdentifier { .. }), "{token}");
        }
    }

    #[test]
    fn embed_adds_reserved_key() {
        let ident = StringIdentifier::from_id(EntityId::new(7));
        let props = ident
            .embed_in_properties(HashMap::from([("k".to_string(), "v".to_string())]))
            .expect("embed should succeed");
        assert_eq!(props.get("k").map(String::as_str), Some("v"));
        assert_eq!(props.get(ID_KEY).map(String::as_str), Some("atrium.v1.uid7"));
    }

    #[test]
    fn embed_rejects_caller_supplied_reserved_key() {
        let ident = StringIdentifier::from_id(EntityId::new(7));
        let tainted = HashMap::from([(ID_KEY.to_string(), "spoofed".to_string())]);
        let err = ident.embed_in_properties(tainted).unwrap_err();
        assert!(matches!(err, Error::ReservedKeyConflict { .. }));
    }

    #[test]
    fn strip_removes_only_the_reserved_key() {
        let ident = StringIdentifier::from_id(EntityId::new(9));
        let props = ident
            .embed_in_properties(HashMap::from([("k".to_string(), "v".to_string())]))
            .expect("embed should succeed");
        let stripped = StringIdentifier::strip_from_properties(props);
        assert!(!stripped.contains_key(ID_KEY));
        assert_eq!(stripped.get("k").map(String::as_str), Some("v"));

        // Total on maps that never carried the key.
        let plain = HashMap::from([("a".to_string(), "b".to_string())]);
        let untouched = StringIdentifier::strip_from_properties(plain);
        assert_eq!(untouched.len(), 1);
    }

    #[test]
    fn from_properties_reads_embedded_id() {
        let ident = StringIdentifier::from_id(EntityId::new(31));
        let props = ident
            .embed_in_properties(HashMap::new())
            .expect("embed should succeed");
        let read = StringIdentifier::from_properties(&props).expect("read should succeed");
        assert_eq!(read, Some(ident));

        let empty = StringIdentifier::from_properties(&HashMap::new())
            .expect("read should succeed");
        assert_eq!(empty, None);
    }
}
