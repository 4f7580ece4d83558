//! AES-256 in counter mode, composed by hand over the raw block cipher.
//!
//! The counter block starts at all zeroes and is incremented as one
//! big-endian 128-bit integer per block. A zero IV is only sound because
//! every encoding derives a fresh key from a fresh salt; this type has no
//! defense of its own against reusing a (key, counter) pair.

use std::io::{self, Write};

use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes256Enc, Block as AesBlock};
use zeroize::Zeroize;

use super::{BLOCK_LEN, KEY_LEN};

/// Bytes encrypted per `CipherWriter::write` call.
const CHUNK_LEN: usize = 4096;

/// Keystream generator; XOR is its own inverse, so the same call
/// encrypts plaintext and decrypts ciphertext.
pub struct CtrStream {
    cipher: Aes256Enc,
    counter: [u8; BLOCK_LEN],
    keystream: [u8; BLOCK_LEN],
    used: usize,
}

impl CtrStream {
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self {
            cipher: Aes256Enc::new(key.into()),
            counter: [0u8; BLOCK_LEN],
            keystream: [0u8; BLOCK_LEN],
            used: BLOCK_LEN,
        }
    }

    /// XOR `data` in place with the next `data.len()` keystream bytes.
    pub fn apply_keystream(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            if self.used == BLOCK_LEN {
                self.refill();
            }
            *byte ^= self.keystream[self.used];
            self.used += 1;
        }
    }

    fn refill(&mut self) {
        let mut block = AesBlock::from(self.counter);
        self.cipher.encrypt_block(&mut block);
        self.keystream.copy_from_slice(block.as_slice());
        block.as_mut_slice().zeroize();

        for byte in self.counter.iter_mut().rev() {
            *byte = byte.wrapping_add(1);
            if *byte != 0 {
                break;
            }
        }
        self.used = 0;
    }
}

impl Drop for CtrStream {
    fn drop(&mut self) {
        self.counter.zeroize();
        self.keystream.zeroize();
    }
}

/// Writer adapter that encrypts everything passing through it.
///
/// Chain it in front of a `MacWriter` to authenticate the ciphertext
/// without ever buffering the whole payload.
pub struct CipherWriter<'a, W: Write> {
    stream: &'a mut CtrStream,
    inner: W,
}

impl<'a, W: Write> CipherWriter<'a, W> {
    pub fn new(stream: &'a mut CtrStream, inner: W) -> Self {
        Self { stream, inner }
    }
}

impl<W: Write> Write for CipherWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = buf.len().min(CHUNK_LEN);
        let mut chunk = [0u8; CHUNK_LEN];
        chunk[..n].copy_from_slice(&buf[..n]);
        self.stream.apply_keystream(&mut chunk[..n]);

        // The keystream for these bytes is spent, so all of them must land.
        let result = self.inner.write_all(&chunk[..n]);
        chunk[..n].zeroize();
        result.map(|()| n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
