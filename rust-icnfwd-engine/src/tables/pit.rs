//! Pending Interest Table.
//!
//! At most one entry exists per name; further Interests for the same name
//! aggregate onto it. The container keeps entries ordered by most recent
//! activity, with the aging driver re-inserting entries it has touched.

use crate::tables::FibEntry;
use rust_icnfwd_common::ndn::{Interest, Name};
use rust_icnfwd_common::types::FaceId;
use std::collections::HashSet;
use std::time::Instant;

/// One waiter recorded on a PIT entry: the face (or local application) the
/// Interest arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Downstream {
    pub face_id: FaceId,
    pub local_app: bool,
}

/// One pending Interest.
#[derive(Debug, Clone)]
pub struct PitEntry {
    pub name: Name,
    pub incoming: Vec<Downstream>,
    pub interest: Interest,
    pub timestamp: Instant,
    pub retransmits: u32,
    /// Routes already consumed by forwarding or Nack failover. Grows
    /// monotonically for the lifetime of the entry.
    pub used_fib: HashSet<FibEntry>,
}

impl PitEntry {
    fn new(name: Name, face_id: FaceId, interest: Interest, local_app: bool) -> Self {
        Self {
            name,
            incoming: vec![Downstream { face_id, local_app }],
            interest,
            timestamp: Instant::now(),
            retransmits: 0,
            used_fib: HashSet::new(),
        }
    }
}

/// The Pending Interest Table.
#[derive(Debug, Default)]
pub struct Pit {
    entries: Vec<PitEntry>,
}

impl Pit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, name: &Name) -> Option<&PitEntry> {
        self.entries.iter().find(|e| &e.name == name)
    }

    /// Creates an entry for `name`, or aggregates onto the existing one.
    ///
    /// Aggregation appends the `(face_id, local_app)` pair only if that
    /// exact pair is absent, and touches neither the timestamp nor the
    /// retransmit count; `update_timestamp` is a separate call when policy
    /// asks for a refresh. Returns true when a new entry was created.
    pub fn add(&mut self, name: Name, face_id: FaceId, interest: Interest, local_app: bool) -> bool {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
            let downstream = Downstream { face_id, local_app };
            if !entry.incoming.contains(&downstream) {
                entry.incoming.push(downstream);
            }
            false
        } else {
            self.entries
                .push(PitEntry::new(name, face_id, interest, local_app));
            true
        }
    }

    pub fn remove(&mut self, name: &Name) -> Option<PitEntry> {
        let index = self.entries.iter().position(|e| &e.name == name)?;
        Some(self.entries.remove(index))
    }

    /// Records a route as consumed so Nack failover never reuses it.
    pub fn add_used_fib(&mut self, name: &Name, fib_entry: FibEntry) {
        if let Some(entry) = self.entries.iter_mut().find(|e| &e.name == name) {
            entry.used_fib.insert(fib_entry);
        }
    }

    pub fn update_timestamp(&mut self, name: &Name) {
        if let Some(entry) = self.entries.iter_mut().find(|e| &e.name == name) {
            entry.timestamp = Instant::now();
        }
    }

    /// Puts an entry back at the tail of the activity order. The caller
    /// guarantees no entry of the same name is present.
    pub fn reinsert(&mut self, entry: PitEntry) {
        debug_assert!(self.find(&entry.name).is_none());
        self.entries.push(entry);
    }

    /// Removes and returns all entries, oldest activity first. Used by the
    /// aging driver, which re-inserts the survivors.
    pub fn drain(&mut self) -> Vec<PitEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PitEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
