//! Identifier types shared between the forwarding engine and its neighbors.
//!
//! Faces and local applications are both addressed by an integer id; the
//! `local_app` marker on a PIT record decides which side of the node an id
//! refers to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum size of an NDN packet accepted by the codec.
pub const MAX_NDN_PACKET_SIZE: usize = 8800;

/// Unique identifier for a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FaceId(pub u32);

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FaceId({})", self.0)
    }
}

impl From<u32> for FaceId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Identifier of a local application endpoint. Shares the face id space;
/// PIT records carry the distinguishing `local_app` flag.
pub type AppId = FaceId;
