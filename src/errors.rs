use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in Passman.
#[derive(Debug, Error)]
pub enum PassmanError {
    // --- Store format errors ---
    #[error("Invalid store format: {0}")]
    Format(String),

    #[error("Store version mismatch (found {found}, expected {expected})")]
    VersionMismatch { found: u8, expected: u8 },

    /// Returned for a wrong passphrase *and* for a failed integrity check.
    /// The two cases are deliberately indistinguishable.
    #[error("Incorrect passphrase (or the store has been tampered with)")]
    WrongPassphrase,

    // --- Crypto errors ---
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Random generator unavailable: {0}")]
    Random(String),

    // --- Store errors ---
    #[error("Store not found at {0}")]
    StoreNotFound(PathBuf),

    #[error("Store already exists at {0}")]
    StoreAlreadyExists(PathBuf),

    #[error("Entry '{0}' not found")]
    EntryNotFound(String),

    #[error("Entry '{0}' already exists")]
    EntryAlreadyExists(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- CLI errors ---
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for Passman results.
pub type Result<T> = std::result::Result<T, PassmanError>;
