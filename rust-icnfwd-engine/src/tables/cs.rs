//! Content Store: exact-name cache of Data packets.
//!
//! Admission is unconditional on Data delivery; a duplicate name overwrites
//! the stored Data and resets its timestamp. Entries marked static are
//! pinned and never aged out.

use rust_icnfwd_common::ndn::{Data, Name};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// One cached Data packet.
#[derive(Debug, Clone)]
pub struct CsEntry {
    pub data: Data,
    pub timestamp: Instant,
    pub is_static: bool,
}

/// The Content Store. Lookup is exact-name only; there is no prefix match
/// on cached content.
#[derive(Debug, Default)]
pub struct ContentStore {
    entries: HashMap<Name, CsEntry>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, name: &Name) -> Option<&CsEntry> {
        self.entries.get(name)
    }

    /// Admits a Data packet, overwriting any entry of the same name and
    /// resetting its timestamp.
    pub fn add(&mut self, data: Data, is_static: bool) {
        self.entries.insert(
            data.name.clone(),
            CsEntry {
                data,
                timestamp: Instant::now(),
                is_static,
            },
        );
    }

    pub fn remove(&mut self, name: &Name) -> Option<CsEntry> {
        self.entries.remove(name)
    }

    /// Refreshes the entry's timestamp, e.g. after a cache hit.
    pub fn update_timestamp(&mut self, name: &Name) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.timestamp = Instant::now();
        }
    }

    /// Evicts every non-static entry whose timestamp has fallen behind
    /// `now - timeout`. Returns the number of evicted entries.
    pub fn expire(&mut self, timeout: Duration) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.is_static || entry.timestamp + timeout >= now);
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CsEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
