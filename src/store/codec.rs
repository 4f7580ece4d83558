//! Encrypt-then-MAC store codec.
//!
//! ```text
//! [header: 49][header tag: 32][entries ciphertext: N][store tag: 32]
//! ```
//!
//! One HMAC-SHA256 accumulator runs over the whole file. Its digest after
//! the header is the header tag, which lets a wrong passphrase be caught
//! before any ciphertext is touched. The accumulator then absorbs that tag
//! and the ciphertext, and its final digest is the store tag.
//!
//! Both tag failures surface as `WrongPassphrase`; a wrong passphrase and a
//! tampered file are indistinguishable to the caller. Decrypted bytes are
//! only parsed after the store tag has been verified.

use std::collections::BTreeMap;
use std::io::{self, Read, Write};

use hmac::Mac;
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::{
    current_tag, derive_keys, new_mac, tags_match, CipherWriter, CtrStream, HmacSha256,
    MacWriter, TAG_LEN,
};
use crate::errors::{PassmanError, Result};

use super::entry::Entry;
use super::header::Header;
use super::model::Store;

/// Ciphertext bytes MACed and decrypted per step.
const CHUNK_LEN: usize = 4096;

/// Build the cipher and MAC for `header`. The derived keys are wiped
/// before this returns.
fn keyed_engines(header: &Header, passphrase: &[u8]) -> Result<(CtrStream, HmacSha256)> {
    let keys = derive_keys(passphrase, header.salt(), header.params())?;
    let stream = CtrStream::new(keys.cipher_key());
    let mac = new_mac(keys.mac_key())?;
    Ok((stream, mac))
}

/// Encode `store` to `out` under a freshly salted header.
///
/// The store's own salt is never reused; the header actually written is
/// returned so the caller can adopt it.
pub fn encode<W: Write>(out: W, store: &Store, passphrase: &[u8]) -> Result<Header> {
    let header = Header::new(*store.params())?;
    encode_with_header(out, &header, store.entries(), passphrase)?;
    Ok(header)
}

/// Encode into a new buffer.
pub fn encode_to_vec(store: &Store, passphrase: &[u8]) -> Result<(Vec<u8>, Header)> {
    let mut buf = Vec::new();
    let header = encode(&mut buf, store, passphrase)?;
    Ok((buf, header))
}

/// Encode with a caller-chosen header. Reusing a salt across two different
/// plaintexts under the same passphrase reuses the keystream.
pub(crate) fn encode_with_header<W: Write>(
    mut out: W,
    header: &Header,
    entries: &BTreeMap<String, Entry>,
    passphrase: &[u8],
) -> Result<()> {
    let (mut stream, mut mac) = keyed_engines(header, passphrase)?;

    let header_bytes = header.to_bytes();
    out.write_all(&header_bytes)?;
    mac.update(&header_bytes);

    let header_tag = current_tag(&mac);
    out.write_all(&header_tag)?;
    mac.update(&header_tag);

    {
        let mut sink = CipherWriter::new(&mut stream, MacWriter::new(&mut mac, &mut out));
        serde_json::to_writer(&mut sink, entries).map_err(|e| {
            if e.is_io() {
                PassmanError::Io(io::Error::from(e))
            } else {
                PassmanError::Serialization(format!("entries document: {e}"))
            }
        })?;
        sink.flush()?;
    }

    out.write_all(&current_tag(&mac))?;
    out.flush()?;

    debug!(entries = entries.len(), "store encoded");
    Ok(())
}

/// Decode and authenticate a store read from `input`.
pub fn decode<R: Read>(mut input: R, passphrase: &[u8]) -> Result<Store> {
    // Signature and version are checked before any key derivation.
    let (header, header_bytes) = Header::read_from(&mut input)?;

    let (mut stream, mut mac) = keyed_engines(&header, passphrase)?;
    mac.update(&header_bytes);

    let mut header_tag = [0u8; TAG_LEN];
    input.read_exact(&mut header_tag)?;
    if !tags_match(&current_tag(&mac), &header_tag) {
        debug!("header tag mismatch");
        return Err(PassmanError::WrongPassphrase);
    }
    mac.update(&header_tag);

    let mut rest = Vec::new();
    input.read_to_end(&mut rest)?;
    if rest.len() < TAG_LEN {
        debug!(len = rest.len(), "store tag missing");
        return Err(PassmanError::WrongPassphrase);
    }
    let (ciphertext, store_tag) = rest.split_at(rest.len() - TAG_LEN);

    let mut plaintext = Zeroizing::new(vec![0u8; ciphertext.len()]);
    for (src, dst) in ciphertext
        .chunks(CHUNK_LEN)
        .zip(plaintext.chunks_mut(CHUNK_LEN))
    {
        mac.update(src);
        dst.copy_from_slice(src);
        stream.apply_keystream(dst);
    }

    if !tags_match(&current_tag(&mac), store_tag) {
        debug!(ciphertext_len = ciphertext.len(), "store tag mismatch");
        return Err(PassmanError::WrongPassphrase);
    }

    let entries: BTreeMap<String, Entry> = serde_json::from_slice(&plaintext)
        .map_err(|e| PassmanError::Format(format!("entries document: {e}")))?;

    debug!(entries = entries.len(), "store decoded");
    Ok(Store::from_parts(header, entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{ScryptParams, SecretBytes, SALT_LEN};

    fn params() -> ScryptParams {
        ScryptParams::new(10, 8, 1).unwrap()
    }

    fn sample() -> Store {
        let mut store = Store::new(params()).unwrap();
        store
            .insert("email", Entry::new("alice", SecretBytes::from("hunter2")))
            .unwrap();
        store
    }

    #[test]
    fn layout_places_tags_where_documented() {
        let store = sample();
        let header = Header::with_salt(params(), [1u8; SALT_LEN]);
        let mut buf = Vec::new();
        encode_with_header(&mut buf, &header, store.entries(), b"pw").unwrap();

        assert_eq!(&buf[..Header::LEN], &header.to_bytes());

        let (_, mut mac) = keyed_engines(&header, b"pw").unwrap();
        mac.update(&buf[..Header::LEN]);
        let header_tag = current_tag(&mac);
        assert_eq!(&buf[Header::LEN..Header::LEN + TAG_LEN], &header_tag);

        mac.update(&buf[Header::LEN..buf.len() - TAG_LEN]);
        assert_eq!(&buf[buf.len() - TAG_LEN..], &current_tag(&mac));
    }

    #[test]
    fn ciphertext_is_not_plaintext_json() {
        let (buf, _) = encode_to_vec(&sample(), b"pw").unwrap();
        let body = &buf[Header::LEN + TAG_LEN..buf.len() - TAG_LEN];
        assert!(!body.windows(5).any(|w| w == b"alice"));
        assert_ne!(body.first(), Some(&b'{'));
    }

    #[test]
    fn same_header_is_deterministic() {
        let store = sample();
        let header = Header::with_salt(params(), [9u8; SALT_LEN]);
        let mut a = Vec::new();
        let mut b = Vec::new();
        encode_with_header(&mut a, &header, store.entries(), b"pw").unwrap();
        encode_with_header(&mut b, &header, store.entries(), b"pw").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn authenticated_garbage_is_format_error() {
        // Valid tags over a ciphertext whose plaintext is not a document.
        let header = Header::with_salt(params(), [3u8; SALT_LEN]);
        let (mut stream, mut mac) = keyed_engines(&header, b"pw").unwrap();

        let mut buf = header.to_bytes().to_vec();
        mac.update(&buf);
        let tag = current_tag(&mac);
        buf.extend_from_slice(&tag);
        mac.update(&tag);

        let mut body = b"not json".to_vec();
        stream.apply_keystream(&mut body);
        mac.update(&body);
        buf.extend_from_slice(&body);
        buf.extend_from_slice(&current_tag(&mac));

        assert!(matches!(
            decode(buf.as_slice(), b"pw"),
            Err(PassmanError::Format(_))
        ));
    }

    #[test]
    fn empty_store_roundtrips() {
        let store = Store::new(params()).unwrap();
        let (buf, header) = encode_to_vec(&store, b"").unwrap();
        let back = decode(buf.as_slice(), b"").unwrap();
        assert!(back.is_empty());
        assert_eq!(back.header(), &header);
    }
}
