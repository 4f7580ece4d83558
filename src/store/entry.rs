//! A single named secret and its metadata.
//!
//! The secret payload is opaque bytes. It is never interpreted or
//! validated here, and it never appears in `Debug` or `Display` output.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::SecretBytes;

/// One record in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Human-readable display name (e.g. a login).
    pub name: String,

    /// The secret payload, base64 in the serialized document.
    pub secret: SecretBytes,

    /// When this entry was first created.
    pub created_at: DateTime<Utc>,

    /// When the secret was last replaced.
    pub modified_at: DateTime<Utc>,

    /// User-defined string fields (url, notes, ...).
    pub metadata: BTreeMap<String, String>,
}

impl Entry {
    /// A new entry timestamped now, with empty metadata.
    pub fn new(name: impl Into<String>, secret: SecretBytes) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            secret,
            created_at: now,
            modified_at: now,
            metadata: BTreeMap::new(),
        }
    }

    /// Replace the secret and bump the modification time.
    pub fn set_secret(&mut self, secret: SecretBytes) {
        self.secret = secret;
        self.modified_at = Utc::now();
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Set a metadata field. An empty value removes the key.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if value.is_empty() {
            self.metadata.remove(&key);
        } else {
            self.metadata.insert(key, value);
        }
    }

    /// Time since the secret was last replaced.
    pub fn age(&self) -> TimeDelta {
        Utc::now().signed_duration_since(self.modified_at)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "name:     {}", self.name)?;
        writeln!(f, "created:  {}", self.created_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        write!(f, "modified: {}", self.modified_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        for (key, value) in &self.metadata {
            write!(f, "\n{key}: {value}")?;
        }
        Ok(())
    }
}

/// Render a duration the way `list` shows entry ages: "3d", "5h", "12m", "now".
pub fn format_age(age: TimeDelta) -> String {
    let days = age.num_days();
    if days >= 365 {
        return format!("{}y", days / 365);
    }
    if days > 0 {
        return format!("{days}d");
    }
    let hours = age.num_hours();
    if hours > 0 {
        return format!("{hours}h");
    }
    let minutes = age.num_minutes();
    if minutes > 0 {
        return format!("{minutes}m");
    }
    "now".to_string()
}
