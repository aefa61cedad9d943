//! Caller-owned cookie jar the response translator replays into.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use super::CookieRecord;

/// Cookie storage keyed by `(name, path, domain)`.
///
/// The jar belongs to the simulated browser, not the connector: the response
/// translator writes into it after every dispatch and the test decides what
/// to send back on the next request.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: BTreeMap<(String, String, String), CookieRecord>,
}

impl CookieJar {
    /// Creates an empty jar.
    pub fn new() -> Self {
        CookieJar::default()
    }

    fn key(record: &CookieRecord) -> (String, String, String) {
        (
            record.name.clone(),
            record.path.clone().unwrap_or_else(|| "/".to_string()),
            record.domain.clone().unwrap_or_default(),
        )
    }

    /// Stores a record, replacing any record with the same name, path, and
    /// domain.
    pub fn set(&mut self, record: CookieRecord) {
        self.cookies.insert(Self::key(&record), record);
    }

    /// First stored record with the given name, regardless of path or domain.
    pub fn get(&self, name: &str) -> Option<&CookieRecord> {
        self.cookies.values().find(|record| record.name == name)
    }

    /// Record stored under an exact `(name, path, domain)` key.
    pub fn get_at(&self, name: &str, path: &str, domain: &str) -> Option<&CookieRecord> {
        self.cookies
            .get(&(name.to_string(), path.to_string(), domain.to_string()))
    }

    /// All stored records.
    pub fn all(&self) -> impl Iterator<Item = &CookieRecord> {
        self.cookies.values()
    }

    /// Number of stored records.
    #[inline]
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Whether the jar holds no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.cookies.clear();
    }

    /// Drops records whose expiry has passed at `now`.
    pub fn flush_expired(&mut self, now: DateTime<Utc>) {
        self.cookies.retain(|_, record| !record.is_expired(now));
    }
}
