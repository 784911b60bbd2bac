use std::fmt;

use sha2::Digest;

/// A deterministic identity key for entities that lack a stable external
/// identifier.
///
/// Derived from a canonical `|`-joined field string via SHA-256, keeping
/// the first 16 bytes, rendered as lowercase hex. The same field tuple
/// always yields the same key; distinct rows sharing the tuple are the
/// same entity by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey([u8; 16]);

impl EntityKey {
    /// Derive a key from ordered components. Callers substitute
    /// [`crate::MISSING_KEY_TOKEN`] for absent components before calling.
    pub fn derive(components: &[&str]) -> Self {
        let mut hasher = sha2::Sha256::new();
        for (idx, component) in components.iter().enumerate() {
            if idx > 0 {
                hasher.update([0u8]);
            }
            hasher.update(component.as_bytes());
        }
        let digest: [u8; 32] = hasher.finalize().into();
        let mut out = [0u8; 16];
        out.copy_from_slice(&digest[..16]);
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl serde::Serialize for EntityKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        let a = EntityKey::derive(&["45", "1", "4106902", "19800101"]);
        let b = EntityKey::derive(&["45", "1", "4106902", "19800101"]);
        let c = EntityKey::derive(&["45", "1", "4106902", "19800102"]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn component_boundaries_matter() {
        // "ab"+"c" must not collide with "a"+"bc".
        let a = EntityKey::derive(&["ab", "c"]);
        let b = EntityKey::derive(&["a", "bc"]);
        assert_ne!(a, b);
    }

    #[test]
    fn hex_rendering_is_32_chars() {
        let key = EntityKey::derive(&["NA", "NA", "NA", "NA"]);
        assert_eq!(key.to_hex().len(), 32);
    }
}
