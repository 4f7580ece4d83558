//! Cryptographic primitives for Passman.
//!
//! This module provides:
//! - Scrypt password-based derivation of the cipher and MAC keys (`kdf`)
//! - AES-256-CTR keystream and a streaming encrypting writer (`stream`)
//! - The running HMAC-SHA256 accumulator helpers (`mac`)
//! - Byte buffers that are wiped when dropped (`secret`)

pub mod kdf;
pub mod mac;
pub mod secret;
pub mod stream;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{derive_keys, CtrStream, SecretBytes, ...};
pub use kdf::{derive_keys, fill_random, generate_salt, DerivedKeys, ScryptParams};
pub use mac::{current_tag, new_mac, tags_match, HmacSha256, MacWriter};
pub use secret::SecretBytes;
pub use stream::{CipherWriter, CtrStream};

/// Length of the stream cipher key (AES-256).
pub const KEY_LEN: usize = 32;

/// Length of the HMAC-SHA256 key.
pub const MAC_KEY_LEN: usize = 32;

/// Length of the KDF salt. Equal to `KEY_LEN` today, but the two are
/// independent and may change separately.
pub const SALT_LEN: usize = 32;

/// Length of an HMAC-SHA256 tag.
pub const TAG_LEN: usize = 32;

/// AES block size.
pub const BLOCK_LEN: usize = 16;
