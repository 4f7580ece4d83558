//! Fixed-width binary store header.
//!
//! ```text
//! [signature: 7][version: 1][logN: 1][r: 4 LE][p: 4 LE][salt: 32]
//! ```
//!
//! The header is stored in plaintext but is covered by both HMAC tags.

use std::io::{self, Read};

use crate::crypto::kdf::{generate_salt, ScryptParams};
use crate::crypto::SALT_LEN;
use crate::errors::{PassmanError, Result};

/// Magic bytes at the start of every store file.
pub const SIGNATURE: &[u8; SIGNATURE_LEN] = b"passman";

/// The only format version this build reads or writes.
pub const CURRENT_VERSION: u8 = 0;

const SIGNATURE_LEN: usize = 7;
const VERSION_LEN: usize = 1;
const LOG_N_LEN: usize = 1;
const R_LEN: usize = 4;
const P_LEN: usize = 4;

/// Non-secret store metadata: format version, KDF costs and salt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    version: u8,
    params: ScryptParams,
    salt: [u8; SALT_LEN],
}

impl Header {
    /// Encoded width in bytes.
    pub const LEN: usize = SIGNATURE_LEN + VERSION_LEN + LOG_N_LEN + R_LEN + P_LEN + SALT_LEN;

    /// A current-version header with a freshly generated salt.
    pub fn new(params: ScryptParams) -> Result<Self> {
        Ok(Self::with_salt(params, generate_salt()?))
    }

    /// A current-version header with an explicit salt.
    pub fn with_salt(params: ScryptParams, salt: [u8; SALT_LEN]) -> Self {
        Self {
            version: CURRENT_VERSION,
            params,
            salt,
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn params(&self) -> &ScryptParams {
        &self.params
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut buf = [0u8; Self::LEN];
        let mut offset = 0;

        put(&mut buf, &mut offset, SIGNATURE);
        put(&mut buf, &mut offset, &[self.version]);
        put(&mut buf, &mut offset, &[self.params.log_n]);
        put(&mut buf, &mut offset, &self.params.r.to_le_bytes());
        put(&mut buf, &mut offset, &self.params.p.to_le_bytes());
        put(&mut buf, &mut offset, &self.salt);

        buf
    }

    /// Parse and check signature and version. KDF costs are validated
    /// later, right before derivation.
    pub fn from_bytes(data: &[u8; Self::LEN]) -> Result<Self> {
        if &data[..SIGNATURE_LEN] != SIGNATURE {
            return Err(PassmanError::Format(
                "not a passman store (incorrect signature)".into(),
            ));
        }

        let mut offset = SIGNATURE_LEN;

        let version = data[offset];
        if version != CURRENT_VERSION {
            return Err(PassmanError::VersionMismatch {
                found: version,
                expected: CURRENT_VERSION,
            });
        }
        offset += VERSION_LEN;

        let log_n = data[offset];
        offset += LOG_N_LEN;

        let mut r = [0u8; R_LEN];
        r.copy_from_slice(&data[offset..offset + R_LEN]);
        offset += R_LEN;

        let mut p = [0u8; P_LEN];
        p.copy_from_slice(&data[offset..offset + P_LEN]);
        offset += P_LEN;

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&data[offset..offset + SALT_LEN]);

        Ok(Self {
            version,
            params: ScryptParams {
                log_n,
                r: u32::from_le_bytes(r),
                p: u32::from_le_bytes(p),
            },
            salt,
        })
    }

    /// Read exactly `LEN` bytes from `reader` and decode them.
    ///
    /// Returns the raw bytes too, so the caller can authenticate exactly
    /// what was on disk. Nothing past the header is consumed.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<(Self, [u8; Self::LEN])> {
        let mut raw = [0u8; Self::LEN];
        reader.read_exact(&mut raw).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => {
                PassmanError::Format("store is too short to contain a header".into())
            }
            _ => PassmanError::Io(e),
        })?;
        let header = Self::from_bytes(&raw)?;
        Ok((header, raw))
    }
}

fn put(buf: &mut [u8], offset: &mut usize, bytes: &[u8]) {
    buf[*offset..*offset + bytes.len()].copy_from_slice(bytes);
    *offset += bytes.len();
}
