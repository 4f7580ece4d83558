//! Password-based key derivation using scrypt.
//!
//! A single scrypt call produces 64 bytes of key material which is split
//! into two independent keys: the first 32 bytes drive the AES-256-CTR
//! stream, the last 32 bytes seed the HMAC-SHA256 accumulator.
//!
//! The cost parameters live in the (unauthenticated at read time) store
//! header, so they are validated against hard memory and work ceilings
//! before any derivation runs.

use std::fmt;

use rand::rngs::OsRng;
use rand::TryRngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::{KEY_LEN, MAC_KEY_LEN, SALT_LEN};
use crate::errors::{PassmanError, Result};

/// Total scrypt output: cipher key followed by MAC key.
const DERIVED_LEN: usize = KEY_LEN + MAC_KEY_LEN;

/// Upper bound on scrypt allocations (`128 * r * (N + p)` bytes): 1 GiB.
const MAX_MEMORY_BYTES: u64 = 1 << 30;

/// Upper bound on total scrypt work (`p * N * r` block mixes). Twice the
/// largest `N * r` that `MAX_MEMORY_BYTES` admits.
const MAX_WORK: u64 = 1 << 24;

/// Scrypt cost parameters as stored in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScryptParams {
    /// log2 of the iteration count N.
    pub log_n: u8,
    /// Block size factor.
    pub r: u32,
    /// Parallelization factor.
    pub p: u32,
}

impl Default for ScryptParams {
    fn default() -> Self {
        Self {
            log_n: 14,
            r: 8,
            p: 1,
        }
    }
}

impl ScryptParams {
    /// Build and validate a parameter set.
    pub fn new(log_n: u8, r: u32, p: u32) -> Result<Self> {
        let params = Self { log_n, r, p };
        params.validate()?;
        Ok(params)
    }

    /// The iteration count N, or `None` if `log_n` overflows.
    pub fn iterations(&self) -> Option<u64> {
        1u64.checked_shl(u32::from(self.log_n))
    }

    /// Bytes scrypt allocates: the `128 * r * N` scratch vector plus the
    /// `128 * r * p` block buffer. `None` on overflow.
    pub fn memory_bytes(&self) -> Option<u64> {
        self.iterations()?
            .checked_add(u64::from(self.p))?
            .checked_mul(u64::from(self.r))?
            .checked_mul(128)
    }

    /// Total work in block mixes (`p * N * r`), or `None` on overflow.
    pub fn work(&self) -> Option<u64> {
        self.iterations()?
            .checked_mul(u64::from(self.r))?
            .checked_mul(u64::from(self.p))
    }

    /// Reject parameter sets that scrypt refuses or that exceed
    /// `MAX_MEMORY_BYTES` or `MAX_WORK`. Values are never clamped.
    pub fn validate(&self) -> Result<()> {
        if self.r == 0 {
            return Err(PassmanError::KeyDerivation(
                "scrypt r must be at least 1".into(),
            ));
        }
        if self.p == 0 {
            return Err(PassmanError::KeyDerivation(
                "scrypt p must be at least 1".into(),
            ));
        }
        match self.memory_bytes() {
            Some(bytes) if bytes <= MAX_MEMORY_BYTES => {}
            _ => {
                return Err(PassmanError::KeyDerivation(format!(
                    "scrypt parameters (logN={}, r={}, p={}) exceed the {} MiB memory limit",
                    self.log_n,
                    self.r,
                    self.p,
                    MAX_MEMORY_BYTES >> 20
                )));
            }
        }
        match self.work() {
            Some(work) if work <= MAX_WORK => {}
            _ => {
                return Err(PassmanError::KeyDerivation(format!(
                    "scrypt parameters (logN={}, r={}, p={}) exceed the work limit (p*N*r <= 2^{})",
                    self.log_n,
                    self.r,
                    self.p,
                    MAX_WORK.trailing_zeros()
                )));
            }
        }
        self.to_scrypt().map(|_| ())
    }

    fn to_scrypt(self) -> Result<scrypt::Params> {
        scrypt::Params::new(self.log_n, self.r, self.p, DERIVED_LEN).map_err(|e| {
            PassmanError::KeyDerivation(format!(
                "invalid scrypt params (logN={}, r={}, p={}): {e}",
                self.log_n, self.r, self.p
            ))
        })
    }
}

/// The pair of keys derived from a passphrase. Both are zeroed on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKeys {
    cipher_key: [u8; KEY_LEN],
    mac_key: [u8; MAC_KEY_LEN],
}

impl DerivedKeys {
    /// Key for the AES-256-CTR stream.
    pub fn cipher_key(&self) -> &[u8; KEY_LEN] {
        &self.cipher_key
    }

    /// Key for the HMAC-SHA256 accumulator.
    pub fn mac_key(&self) -> &[u8; MAC_KEY_LEN] {
        &self.mac_key
    }
}

impl fmt::Debug for DerivedKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKeys(<redacted>)")
    }
}

/// Derive the cipher and MAC keys from `passphrase` and `salt`.
///
/// Deterministic: the same inputs always produce the same keys, which is
/// what lets `decode` reproduce the keys `encode` used.
pub fn derive_keys(passphrase: &[u8], salt: &[u8], params: &ScryptParams) -> Result<DerivedKeys> {
    params.validate()?;
    let scrypt_params = params.to_scrypt()?;

    debug!(
        log_n = params.log_n,
        r = params.r,
        p = params.p,
        "deriving store keys"
    );

    let mut okm = Zeroizing::new([0u8; DERIVED_LEN]);
    scrypt::scrypt(passphrase, salt, &scrypt_params, &mut okm[..])
        .map_err(|e| PassmanError::KeyDerivation(format!("scrypt failed: {e}")))?;

    let mut keys = DerivedKeys {
        cipher_key: [0u8; KEY_LEN],
        mac_key: [0u8; MAC_KEY_LEN],
    };
    keys.cipher_key.copy_from_slice(&okm[..KEY_LEN]);
    keys.mac_key.copy_from_slice(&okm[KEY_LEN..]);
    Ok(keys)
}

/// Fill `buf` from the operating system's CSPRNG.
pub fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| PassmanError::Random(e.to_string()))
}

/// Generate a fresh random salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    fill_random(&mut salt)?;
    Ok(salt)
}
