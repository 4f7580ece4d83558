//! Secret byte buffers that zero their memory when dropped.
//!
//! `SecretBytes` holds passphrase copies and entry secrets. It serializes
//! as a base64 string so the JSON document never carries a raw byte array,
//! and its `Debug` output never shows the contents.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// An owned byte buffer that is wiped on drop, on every exit path.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    /// Take ownership of `bytes` without copying.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Access the raw bytes.
    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    /// The bytes as UTF-8, if they are valid UTF-8.
    pub fn expose_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for SecretBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<String> for SecretBytes {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<&str> for SecretBytes {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<&[u8]> for SecretBytes {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl PartialEq for SecretBytes {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for SecretBytes {}

impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes(<redacted, {} bytes>)", self.0.len())
    }
}

impl Serialize for SecretBytes {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = Zeroizing::new(BASE64.encode(&self.0));
        serializer.serialize_str(&encoded)
    }
}

impl<'de> Deserialize<'de> for SecretBytes {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = Zeroizing::new(String::deserialize(deserializer)?);
        BASE64
            .decode(encoded.as_bytes())
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_is_redacted() {
        let secret = SecretBytes::from("hunter2");
        let shown = format!("{secret:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("7 bytes"));
    }

    #[test]
    fn serializes_as_base64_string() {
        let secret = SecretBytes::from("correcthorse");
        let json = serde_json::to_string(&secret).unwrap();
        assert_eq!(json, "\"Y29ycmVjdGhvcnNl\"");

        let back: SecretBytes = serde_json::from_str(&json).unwrap();
        assert_eq!(back, secret);
    }

    #[test]
    fn rejects_invalid_base64() {
        let result: std::result::Result<SecretBytes, _> = serde_json::from_str("\"not base64!\"");
        assert!(result.is_err());
    }

    #[test]
    fn equality_compares_contents() {
        assert_eq!(SecretBytes::from("abc"), SecretBytes::from(b"abc".to_vec()));
        assert_ne!(SecretBytes::from("abc"), SecretBytes::from("abd"));
        assert_ne!(SecretBytes::from("abc"), SecretBytes::from("abcd"));
    }

    #[test]
    fn zeroize_clears_contents() {
        let mut secret = SecretBytes::from("wipe me");
        secret.zeroize();
        assert!(secret.is_empty());
    }

    #[test]
    fn expose_str_handles_non_utf8() {
        assert_eq!(SecretBytes::from("plain").expose_str(), Some("plain"));
        assert_eq!(SecretBytes::from(vec![0xff, 0xfe]).expose_str(), None);
    }
}
