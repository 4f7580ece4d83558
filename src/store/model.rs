//! The in-memory store: a header plus a flat id -> entry map.
//!
//! Every mutation here is purely in memory. Persisting always re-encodes
//! the whole store through `codec::encode`, which picks a fresh salt.

use std::collections::BTreeMap;

use regex::Regex;

use crate::crypto::ScryptParams;
use crate::errors::{PassmanError, Result};

use super::entry::Entry;
use super::header::Header;

/// Decrypted store contents. Ids are used verbatim, with no normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    header: Header,
    entries: BTreeMap<String, Entry>,
}

impl Store {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// An empty store with a fresh header for `params`.
    pub fn new(params: ScryptParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            header: Header::new(params)?,
            entries: BTreeMap::new(),
        })
    }

    pub fn from_parts(header: Header, entries: BTreeMap<String, Entry>) -> Self {
        Self { header, entries }
    }

    // ------------------------------------------------------------------
    // Header
    // ------------------------------------------------------------------

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn params(&self) -> &ScryptParams {
        self.header.params()
    }

    /// Change the KDF costs used by the next save.
    pub fn set_params(&mut self, params: ScryptParams) -> Result<()> {
        params.validate()?;
        self.header = Header::new(params)?;
        Ok(())
    }

    /// Record the header that was actually written by the last save.
    pub(crate) fn adopt_header(&mut self, header: Header) {
        self.header = header;
    }

    // ------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entry> {
        self.entries.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Add a new entry. Fails if `id` is already taken.
    pub fn insert(&mut self, id: impl Into<String>, entry: Entry) -> Result<()> {
        let id = id.into();
        if self.entries.contains_key(&id) {
            return Err(PassmanError::EntryAlreadyExists(id));
        }
        self.entries.insert(id, entry);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<Entry> {
        self.entries
            .remove(id)
            .ok_or_else(|| PassmanError::EntryNotFound(id.to_string()))
    }

    /// Move an entry to a new id. Fails if `old` is missing or `new` is taken.
    pub fn rename(&mut self, old: &str, new: impl Into<String>) -> Result<()> {
        let new = new.into();
        if !self.entries.contains_key(old) {
            return Err(PassmanError::EntryNotFound(old.to_string()));
        }
        if self.entries.contains_key(&new) {
            return Err(PassmanError::EntryAlreadyExists(new));
        }
        if let Some(entry) = self.entries.remove(old) {
            self.entries.insert(new, entry);
        }
        Ok(())
    }

    /// Sorted ids, optionally filtered by `pattern`.
    pub fn ids(&self, pattern: Option<&Regex>) -> Vec<&str> {
        self.entries
            .keys()
            .map(String::as_str)
            .filter(|id| pattern.map_or(true, |re| re.is_match(id)))
            .collect()
    }

    pub fn entries(&self) -> &BTreeMap<String, Entry> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
