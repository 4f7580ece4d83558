//! CLI module: Clap argument parser, shared prompts, and command implementations.

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use clap_complete::Shell;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{PassmanError, Result};
use crate::store::{self, Store};

/// Environment variable consulted before prompting for the passphrase.
pub const PASSPHRASE_ENV: &str = "PASSMAN_PASSPHRASE";

/// passman: encrypted password store.
#[derive(Parser)]
#[command(name = "passman", about = "Encrypted password store", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store file (default: ~/.pass_store, or `store_file` in ~/.passman.toml)
    #[arg(long, env = "PASSMAN_STORE", global = true)]
    pub file: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new, empty store
    Init {
        /// scrypt log2(N) (default from config: 14)
        #[arg(long)]
        log_n: Option<u8>,
        /// scrypt block size factor (default from config: 8)
        #[arg(long)]
        r: Option<u32>,
        /// scrypt parallelization factor (default from config: 1)
        #[arg(long)]
        p: Option<u32>,
    },

    /// Show a single entry, including its password
    Get {
        /// Entry id
        id: String,
    },

    /// Create or modify an entry
    Set {
        /// Entry id
        id: String,
        /// Display name (e.g. the login)
        #[arg(short, long)]
        name: Option<String>,
        /// Metadata field; an empty value removes the key (repeatable)
        #[arg(short, long = "meta", value_name = "KEY=VALUE")]
        meta: Vec<String>,
        /// Move the entry to a new id
        #[arg(long, value_name = "NEW_ID")]
        rename: Option<String>,
        /// Read a new password (always done for new entries)
        #[arg(short, long)]
        password: bool,
    },

    /// Delete an entry
    #[command(alias = "rm")]
    Delete {
        /// Entry id
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List entries, optionally filtered by a regex
    List {
        /// Regular expression matched against entry ids
        pattern: Option<String>,
    },

    /// Show store file metadata (no passphrase needed)
    Stat,

    /// Change a key derivation parameter and re-encrypt the store
    SetParam {
        /// Parameter to change
        #[arg(value_enum)]
        param: KdfParam,
        /// New value
        value: u32,
    },

    /// Generate random passwords
    Gen {
        /// Password length (default from config: 24)
        #[arg(short, long)]
        length: Option<usize>,
        /// Number of passwords
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// Lower case characters [a-z]
        #[arg(long)]
        lower: bool,
        /// Upper case characters [A-Z]
        #[arg(long)]
        upper: bool,
        /// Digits [0-9]
        #[arg(long)]
        digit: bool,
        /// ASCII punctuation
        #[arg(long)]
        symbol: bool,
    },

    /// Export the decrypted store as JSON
    Export {
        /// Output file path (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Copy an entry field to the clipboard
    Clip {
        /// Entry id
        id: String,
        /// Field to copy: password, name, or a metadata key
        #[arg(long, default_value = "password")]
        field: String,
        /// Seconds before the clipboard is cleared (default from config: 20)
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum, ignore_case = true)]
        shell: Shell,
    },
}

/// scrypt parameters that `set-param` can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KdfParam {
    /// log2 of the iteration count
    LogN,
    /// Block size factor
    R,
    /// Parallelization factor
    P,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load `~/.passman.toml`, or defaults when there is no home directory.
pub fn load_settings() -> Result<Settings> {
    match Settings::home_dir() {
        Ok(home) => Settings::load(&home),
        Err(_) => Ok(Settings::default()),
    }
}

/// Resolve the store path: `--file` / `PASSMAN_STORE`, then the config.
pub fn store_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    match &cli.file {
        Some(path) => Ok(path.clone()),
        None => Ok(settings.store_path(&Settings::home_dir()?)),
    }
}

fn passphrase_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSPHRASE_ENV).ok().map(Zeroizing::new)
}

/// Get the store passphrase, trying in order:
/// 1. `PASSMAN_PASSPHRASE` env var (scripting)
/// 2. Interactive hidden prompt
pub fn prompt_passphrase(path: &Path) -> Result<Zeroizing<String>> {
    if let Some(pass) = passphrase_from_env() {
        return Ok(pass);
    }

    let pass = dialoguer::Password::new()
        .with_prompt(format!("Enter passphrase for {}", path.display()))
        .allow_empty_password(true)
        .interact()
        .map_err(|e| PassmanError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Zeroizing::new(pass))
}

/// Prompt for a new passphrase with confirmation (used by `init`).
pub fn prompt_new_passphrase() -> Result<Zeroizing<String>> {
    if let Some(pass) = passphrase_from_env() {
        return Ok(pass);
    }

    let pass = dialoguer::Password::new()
        .with_prompt("Choose store passphrase")
        .with_confirmation(
            "Confirm store passphrase",
            "Passphrases do not match, try again",
        )
        .interact()
        .map_err(|e| PassmanError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Zeroizing::new(pass))
}

/// A decrypted store together with the passphrase needed to save it.
pub struct Session {
    pub path: PathBuf,
    pub settings: Settings,
    pub store: Store,
    passphrase: Zeroizing<String>,
}

impl Session {
    /// Open and decrypt the store named by the CLI arguments.
    ///
    /// A wrong interactive passphrase is re-prompted up to
    /// `passphrase_attempts` times. A passphrase from the environment
    /// gets exactly one try.
    pub fn open(cli: &Cli) -> Result<Self> {
        let settings = load_settings()?;
        let path = store_path(cli, &settings)?;

        if !path.exists() {
            output::tip("Run `passman init` to create a store.");
            return Err(PassmanError::StoreNotFound(path));
        }

        let attempts = if passphrase_from_env().is_some() {
            1
        } else {
            settings.passphrase_attempts.max(1)
        };

        let mut attempt = 1;
        loop {
            let passphrase = prompt_passphrase(&path)?;
            match store::read_store(&path, passphrase.as_bytes()) {
                Ok(store) => {
                    debug!(entries = store.len(), "store opened");
                    return Ok(Self {
                        path,
                        settings,
                        store,
                        passphrase,
                    });
                }
                Err(PassmanError::WrongPassphrase) if attempt < attempts => {
                    warn!(attempt, "store authentication failed");
                    output::warning("Wrong passphrase, try again.");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Re-encrypt the whole store under a fresh salt and write it back.
    pub fn save(&mut self) -> Result<()> {
        store::write_store(&self.path, &mut self.store, self.passphrase.as_bytes())
    }
}

/// Split a `KEY=VALUE` argument at the first `=`.
pub fn parse_key_value(arg: &str) -> Result<(&str, &str)> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => Err(PassmanError::InvalidArgument(format!(
            "invalid metadata '{arg}', expected KEY=VALUE"
        ))),
    }
}
