use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::ScryptParams;
use crate::errors::{PassmanError, Result};

/// User-level configuration, loaded from `~/.passman.toml`.
///
/// Every field has a default so passman works without any config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Store location. Relative paths resolve against the home directory.
    #[serde(default = "default_store_file")]
    pub store_file: String,

    /// scrypt log2(N) for newly created stores.
    #[serde(default = "default_scrypt_log_n")]
    pub scrypt_log_n: u8,

    /// scrypt block size factor for newly created stores.
    #[serde(default = "default_scrypt_r")]
    pub scrypt_r: u32,

    /// scrypt parallelization factor for newly created stores.
    #[serde(default = "default_scrypt_p")]
    pub scrypt_p: u32,

    /// Seconds before `clip` clears the clipboard.
    #[serde(default = "default_clip_timeout_secs")]
    pub clip_timeout_secs: u64,

    /// Interactive passphrase attempts before giving up.
    #[serde(default = "default_passphrase_attempts")]
    pub passphrase_attempts: u32,

    /// Default length for `gen`.
    #[serde(default = "default_gen_length")]
    pub gen_length: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_store_file() -> String {
    ".pass_store".to_string()
}

fn default_scrypt_log_n() -> u8 {
    14
}

fn default_scrypt_r() -> u32 {
    8
}

fn default_scrypt_p() -> u32 {
    1
}

fn default_clip_timeout_secs() -> u64 {
    20
}

fn default_passphrase_attempts() -> u32 {
    3
}

fn default_gen_length() -> usize {
    24
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_file: default_store_file(),
            scrypt_log_n: default_scrypt_log_n(),
            scrypt_r: default_scrypt_r(),
            scrypt_p: default_scrypt_p(),
            clip_timeout_secs: default_clip_timeout_secs(),
            passphrase_attempts: default_passphrase_attempts(),
            gen_length: default_gen_length(),
        }
    }
}

impl Settings {
    /// Name of the config file looked up in the home directory.
    pub const FILE_NAME: &'static str = ".passman.toml";

    /// Load settings from `<home_dir>/.passman.toml`.
    ///
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load(home_dir: &Path) -> Result<Self> {
        let config_path = home_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            PassmanError::Config(format!("failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// The user's home directory, from `$HOME`.
    pub fn home_dir() -> Result<PathBuf> {
        std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| PassmanError::Config("HOME is not set".into()))
    }

    /// Resolve `store_file`. Absolute paths are used as-is.
    pub fn store_path(&self, home_dir: &Path) -> PathBuf {
        home_dir.join(&self.store_file)
    }

    /// KDF parameters for a new store, validated.
    pub fn scrypt_params(&self) -> Result<ScryptParams> {
        ScryptParams::new(self.scrypt_log_n, self.scrypt_r, self.scrypt_p)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
