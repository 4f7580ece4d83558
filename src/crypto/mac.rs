//! HMAC-SHA256 accumulator helpers.
//!
//! The store format authenticates with one running HMAC: its intermediate
//! digest becomes the header tag, and the same state keeps absorbing bytes
//! until the final store tag. `current_tag` reads a digest without
//! consuming the state.

use std::io::{self, Write};

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::{MAC_KEY_LEN, TAG_LEN};
use crate::errors::{PassmanError, Result};

pub type HmacSha256 = Hmac<Sha256>;

/// Seed a new accumulator with `key`.
pub fn new_mac(key: &[u8; MAC_KEY_LEN]) -> Result<HmacSha256> {
    <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|e| PassmanError::KeyDerivation(format!("invalid HMAC key: {e}")))
}

/// Digest of everything absorbed so far. The accumulator keeps running.
pub fn current_tag(mac: &HmacSha256) -> [u8; TAG_LEN] {
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&mac.clone().finalize().into_bytes());
    tag
}

/// Constant-time tag comparison.
pub fn tags_match(expected: &[u8], found: &[u8]) -> bool {
    expected.ct_eq(found).into()
}

/// Writer adapter that feeds every byte it forwards into an HMAC.
pub struct MacWriter<'a, W: Write> {
    mac: &'a mut HmacSha256,
    inner: W,
}

impl<'a, W: Write> MacWriter<'a, W> {
    pub fn new(mac: &'a mut HmacSha256, inner: W) -> Self {
        Self { mac, inner }
    }
}

impl<W: Write> Write for MacWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.mac.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
