//! Error types for the icnfwd forwarder.

use thiserror::Error;

/// All possible errors that can occur within the forwarder.
///
/// None of these is fatal to the node: a failed decode or a closed channel
/// costs exactly the packet that triggered it.
#[derive(Error, Debug)]
pub enum Error {
    /// Error related to TLV encoding/decoding.
    #[error("TLV error: {0}")]
    Tlv(String),

    /// Error related to NDN packet processing.
    #[error("NDN packet error: {0}")]
    NdnPacket(String),

    /// Error related to one of the forwarding tables.
    #[error("table error: {0}")]
    Table(String),

    /// A queue to a neighboring layer is gone.
    #[error("channel error: {0}")]
    Channel(String),

    /// Error while loading or validating configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
