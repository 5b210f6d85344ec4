//! Forwarding Information Base: longest-prefix match from names to faces.
//!
//! The table keeps insertion order; a lookup tie between equally long
//! prefixes goes to the earliest inserted entry. The forwarder only reads
//! the FIB; mutation belongs to the management surface.

use rust_icnfwd_common::ndn::Name;
use rust_icnfwd_common::types::FaceId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One route. Entries are compared by value, so a PIT entry can record the
/// routes it has consumed without holding a reference into the table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FibEntry {
    pub prefix: Name,
    pub face_id: FaceId,
    pub is_static: bool,
}

/// The Forwarding Information Base.
#[derive(Debug, Default)]
pub struct Fib {
    entries: Vec<FibEntry>,
}

impl Fib {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route. Re-adding an existing (prefix, face) pair updates it
    /// in place and keeps its position in the lookup order.
    pub fn add(&mut self, prefix: Name, face_id: FaceId, is_static: bool) {
        let entry = FibEntry {
            prefix,
            face_id,
            is_static,
        };
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.prefix == entry.prefix && e.face_id == entry.face_id)
        {
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
    }

    /// Removes every route under the given prefix.
    pub fn remove(&mut self, prefix: &Name) {
        self.entries.retain(|e| &e.prefix != prefix);
    }

    /// Longest-prefix match for `name`, skipping entries in `already_used`.
    /// Ties between equally long prefixes go to the earliest insertion.
    pub fn find(&self, name: &Name, already_used: &HashSet<FibEntry>) -> Option<&FibEntry> {
        let mut best: Option<&FibEntry> = None;
        for entry in &self.entries {
            if !entry.prefix.is_prefix_of(name) || already_used.contains(entry) {
                continue;
            }
            if best.map_or(true, |b| entry.prefix.len() > b.prefix.len()) {
                best = Some(entry);
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = &FibEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_exclusions() -> HashSet<FibEntry> {
        HashSet::new()
    }

    #[test]
    fn longest_prefix_wins() {
        let mut fib = Fib::new();
        fib.add(Name::from_uri("/a"), FaceId(1), false);
        fib.add(Name::from_uri("/a/b"), FaceId(2), false);

        let hit = fib.find(&Name::from_uri("/a/b/c"), &no_exclusions()).unwrap();
        assert_eq!(hit.face_id, FaceId(2));

        let hit = fib.find(&Name::from_uri("/a/x"), &no_exclusions()).unwrap();
        assert_eq!(hit.face_id, FaceId(1));
    }

    #[test]
    fn tie_goes_to_earliest_insertion() {
        let mut fib = Fib::new();
        fib.add(Name::from_uri("/a"), FaceId(7), false);
        fib.add(Name::from_uri("/a"), FaceId(8), false);

        let hit = fib.find(&Name::from_uri("/a/x"), &no_exclusions()).unwrap();
        assert_eq!(hit.face_id, FaceId(7));
    }

    #[test]
    fn exclusion_set_masks_entries() {
        let mut fib = Fib::new();
        fib.add(Name::from_uri("/a"), FaceId(7), false);
        fib.add(Name::from_uri("/a"), FaceId(8), false);

        let mut used = HashSet::new();
        used.insert(fib.find(&Name::from_uri("/a/x"), &used).unwrap().clone());

        let hit = fib.find(&Name::from_uri("/a/x"), &used).unwrap();
        assert_eq!(hit.face_id, FaceId(8));

        used.insert(hit.clone());
        assert!(fib.find(&Name::from_uri("/a/x"), &used).is_none());
    }

    #[test]
    fn no_route_for_unknown_name() {
        let mut fib = Fib::new();
        fib.add(Name::from_uri("/a"), FaceId(7), false);

        assert!(fib.find(&Name::from_uri("/b/y"), &no_exclusions()).is_none());
        // a longer name is not a prefix of a shorter one
        assert!(fib
            .find(&Name::from_uri("/"), &no_exclusions())
            .is_none());
    }

    #[test]
    fn readd_updates_in_place() {
        let mut fib = Fib::new();
        fib.add(Name::from_uri("/a"), FaceId(7), false);
        fib.add(Name::from_uri("/a"), FaceId(8), false);
        fib.add(Name::from_uri("/a"), FaceId(7), true);

        assert_eq!(fib.len(), 2);
        // position in the tie-break order is unchanged
        let hit = fib.find(&Name::from_uri("/a/x"), &HashSet::new()).unwrap();
        assert_eq!(hit.face_id, FaceId(7));
        assert!(hit.is_static);
    }

    #[test]
    fn remove_drops_all_routes_under_prefix() {
        let mut fib = Fib::new();
        fib.add(Name::from_uri("/a"), FaceId(7), false);
        fib.add(Name::from_uri("/a"), FaceId(8), false);
        fib.add(Name::from_uri("/b"), FaceId(9), false);

        fib.remove(&Name::from_uri("/a"));
        assert_eq!(fib.len(), 1);
        assert!(fib.find(&Name::from_uri("/a/x"), &HashSet::new()).is_none());
    }
}
