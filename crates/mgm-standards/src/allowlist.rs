#![deny(unsafe_code)]

//! User allow-list.
//!
//! The acting user is identified by a free-text name. Membership is checked
//! against a list of salted digests so the list itself does not disclose the
//! names it admits.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::error::SchemaLoadError;
use crate::hash::salted_sha512_hex;

/// Capability to decide whether a user may submit metadata.
pub trait Authorizer {
    fn is_authorized(&self, user_name: &str) -> bool;
}

/// Admits everyone. Used when no allow-list is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn is_authorized(&self, _user_name: &str) -> bool {
        true
    }
}

/// Digest of a user name as stored in the allow-list.
pub fn user_digest(salt: &str, user_name: &str) -> String {
    salted_sha512_hex(salt.as_bytes(), user_name.as_bytes())
}

#[derive(Debug, Clone, Default)]
pub struct DigestAllowList {
    salt: String,
    digests: BTreeSet<String>,
}

impl DigestAllowList {
    pub fn new<I, S>(salt: impl Into<String>, digests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            salt: salt.into(),
            digests: digests
                .into_iter()
                .map(|d| d.as_ref().trim().to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    /// Build a list from plain names, hashing each with `salt`.
    pub fn from_names<I, S>(salt: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let salt = salt.into();
        let digests: Vec<String> = names
            .into_iter()
            .map(|name| user_digest(&salt, name.as_ref()))
            .collect();
        Self::new(salt, digests)
    }

    /// Parse one hex digest per line; blank lines and `#` comments are skipped.
    pub fn parse(salt: impl Into<String>, contents: &str) -> Self {
        let digests = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));
        Self::new(salt, digests)
    }

    pub fn load(path: &Path, salt: impl Into<String>) -> Result<Self, SchemaLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| SchemaLoadError::io(path, e))?;
        let list = Self::parse(salt, &contents);
        debug!(path = %path.display(), entries = list.len(), "allow-list loaded");
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }
}

impl Authorizer for DigestAllowList {
    fn is_authorized(&self, user_name: &str) -> bool {
        self.digests.contains(&user_digest(&self.salt, user_name))
    }
}
