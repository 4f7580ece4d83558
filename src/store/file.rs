//! On-disk persistence of the encoded store.
//!
//! Saves go through a sibling temp file that is synced and then renamed
//! over the target, so readers never see a half-written store.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;

use crate::errors::{PassmanError, Result};

use super::codec;
use super::header::Header;
use super::model::Store;

/// Plaintext facts about a store file, readable without the passphrase.
#[derive(Debug, Clone)]
pub struct StoreInfo {
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
    pub header: Header,
}

/// Open, authenticate and decrypt the store at `path`.
pub fn read_store(path: &Path, passphrase: &[u8]) -> Result<Store> {
    let file = open_existing(path)?;
    debug!(path = %path.display(), "reading store");
    codec::decode(BufReader::new(file), passphrase)
}

/// Read only the plaintext header. Nothing is authenticated.
pub fn read_header(path: &Path) -> Result<StoreInfo> {
    let mut file = open_existing(path)?;
    let meta = file.metadata()?;
    let (header, _) = Header::read_from(&mut file)?;

    Ok(StoreInfo {
        path: path.to_path_buf(),
        size: meta.len(),
        modified: meta.modified().ok().map(DateTime::<Local>::from),
        header,
    })
}

/// Encode `store` under a fresh salt and atomically replace `path`.
///
/// On success the store adopts the header that was written.
pub fn write_store(path: &Path, store: &mut Store, passphrase: &[u8]) -> Result<()> {
    let (buf, header) = codec::encode_to_vec(store, passphrase)?;
    write_atomic(path, &buf)?;
    store.adopt_header(header);
    debug!(path = %path.display(), bytes = buf.len(), "store written");
    Ok(())
}

/// Like `write_store`, but refuses to replace an existing file.
pub fn create_store(path: &Path, store: &mut Store, passphrase: &[u8]) -> Result<()> {
    if path.exists() {
        return Err(PassmanError::StoreAlreadyExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_store(path, store, passphrase)
}

fn open_existing(path: &Path) -> Result<File> {
    if !path.exists() {
        return Err(PassmanError::StoreNotFound(path.to_path_buf()));
    }
    Ok(File::open(path)?)
}

fn temp_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let tmp_path = temp_path(path);
    // A leftover from an interrupted save would keep its old permissions.
    let _ = fs::remove_file(&tmp_path);

    let result = (|| -> Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, path)?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{ScryptParams, SecretBytes};
    use crate::store::Entry;
    use tempfile::TempDir;

    fn store() -> Store {
        Store::new(ScryptParams::new(10, 8, 1).unwrap()).unwrap()
    }

    #[test]
    fn write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store");

        let mut s = store();
        s.insert("email", Entry::new("alice", SecretBytes::from("pw")))
            .unwrap();
        write_store(&path, &mut s, b"pass").unwrap();

        let back = read_store(&path, b"pass").unwrap();
        assert_eq!(back, s);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn every_save_changes_salt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store");
        let mut s = store();

        write_store(&path, &mut s, b"pass").unwrap();
        let first = *read_header(&path).unwrap().header.salt();
        assert_eq!(s.header().salt(), &first);

        write_store(&path, &mut s, b"pass").unwrap();
        let second = *read_header(&path).unwrap().header.salt();
        assert_ne!(first, second);
    }

    #[test]
    fn missing_file_is_store_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent");
        assert!(matches!(
            read_store(&path, b"x"),
            Err(PassmanError::StoreNotFound(_))
        ));
        assert!(matches!(
            read_header(&path),
            Err(PassmanError::StoreNotFound(_))
        ));
    }

    #[test]
    fn create_refuses_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store");
        create_store(&path, &mut store(), b"pass").unwrap();
        assert!(matches!(
            create_store(&path, &mut store(), b"pass"),
            Err(PassmanError::StoreAlreadyExists(_))
        ));
    }

    #[test]
    fn create_makes_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("store");
        create_store(&path, &mut store(), b"pass").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn read_header_reports_size_and_params() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store");
        write_store(&path, &mut store(), b"pass").unwrap();

        let info = read_header(&path).unwrap();
        assert_eq!(info.size, fs::metadata(&path).unwrap().len());
        assert_eq!(info.header.params().log_n, 10);
        assert!(info.modified.is_some());
    }

    #[cfg(unix)]
    #[test]
    fn store_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store");
        write_store(&path, &mut store(), b"pass").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
