//! NDN packet types and structures.
//!
//! This module provides the value objects the forwarding plane operates on:
//! hierarchical names, the Interest/Data/Nack packet kinds, and their
//! NDN-TLV wire representation.

use crate::error::Error;
use crate::tlv::{self, TlvElement};
use crate::types::MAX_NDN_PACKET_SIZE;
use bytes::{Buf, Bytes, BytesMut};
use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt;

/* ---------------------------------------------------------------- *\
 * Name and NameComponent
\* ---------------------------------------------------------------- */

/// A single opaque component of a hierarchical name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameComponent(pub Bytes);

impl NameComponent {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }

    pub fn to_tlv(&self) -> TlvElement {
        TlvElement::new(tlv::TLV_COMPONENT, self.0.clone())
    }

    pub fn from_tlv(element: &TlvElement) -> Result<Self, Error> {
        if element.tlv_type != tlv::TLV_COMPONENT {
            return Err(Error::NdnPacket(format!(
                "expected name component TLV type {}, got {}",
                tlv::TLV_COMPONENT,
                element.tlv_type
            )));
        }
        Ok(Self(element.value.clone()))
    }
}

impl fmt::Display for NameComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let printable = self.0.iter().all(|&b| b.is_ascii_graphic() || b == b' ');
        if printable && !self.0.is_empty() {
            write!(f, "{}", String::from_utf8_lossy(&self.0))
        } else {
            write!(f, "0x")?;
            for &b in &self.0 {
                write!(f, "{:02x}", b)?;
            }
            Ok(())
        }
    }
}

/// A hierarchical name: an ordered sequence of opaque byte components.
///
/// Names are immutable values; equality and the prefix relation are
/// component-wise. The canonical string form is `/c1/c2/.../cn`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name {
    components: Vec<NameComponent>,
}

impl Name {
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Parses a name from its URI form, e.g. `/this/name/has/components`.
    /// Empty components are dropped, so `//a//b/` parses as `/a/b`.
    pub fn from_uri(s: &str) -> Self {
        let components = s
            .split('/')
            .filter(|comp| !comp.is_empty())
            .map(|comp| NameComponent::new(comp.as_bytes().to_vec()))
            .collect();
        Self { components }
    }

    pub fn push(&mut self, component: NameComponent) -> &mut Self {
        self.components.push(component);
        self
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> impl Iterator<Item = &NameComponent> {
        self.components.iter()
    }

    pub fn get(&self, index: usize) -> Option<&NameComponent> {
        self.components.get(index)
    }

    /// Returns the name truncated to its first `len` components.
    pub fn prefix(&self, len: usize) -> Self {
        Self {
            components: self.components.iter().take(len).cloned().collect(),
        }
    }

    /// True when every component of `self` matches the corresponding
    /// component of `other`. The empty name is a prefix of every name.
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.components.len() <= other.components.len()
            && self
                .components
                .iter()
                .zip(other.components.iter())
                .all(|(a, b)| a == b)
    }

    pub fn to_tlv(&self) -> TlvElement {
        let mut buf = BytesMut::new();
        for component in &self.components {
            component.to_tlv().encode(&mut buf);
        }
        TlvElement::new(tlv::TLV_NAME, buf.freeze())
    }

    pub fn from_tlv(element: &TlvElement) -> Result<Self, Error> {
        if element.tlv_type != tlv::TLV_NAME {
            return Err(Error::NdnPacket(format!(
                "expected name TLV type {}, got {}",
                tlv::TLV_NAME,
                element.tlv_type
            )));
        }

        let mut components = Vec::new();
        let mut buf = element.value.clone();
        while buf.has_remaining() {
            let e = TlvElement::decode(&mut buf)?;
            components.push(NameComponent::from_tlv(&e)?);
        }
        Ok(Self { components })
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return write!(f, "/");
        }
        for component in &self.components {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::new()
    }
}

/* ---------------------------------------------------------------- *\
 * Interest
\* ---------------------------------------------------------------- */

/// A name-addressed request packet.
///
/// The nonce exists on the wire only: it is freshly generated for every
/// Interest value and ignored for equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interest {
    pub name: Name,
    pub nonce: u32,
}

impl Interest {
    pub fn new(name: Name) -> Self {
        use std::time::{Duration, SystemTime, UNIX_EPOCH};

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_else(|_| Duration::from_secs(0));
        let nonce = (now.as_nanos() % u32::MAX as u128) as u32;

        Self { name, nonce }
    }

    pub fn with_nonce(mut self, nonce: u32) -> Self {
        self.nonce = nonce;
        self
    }

    /// Encodes `Interest { Name { Component* }, Nonce(4 bytes) }`.
    pub fn to_wire(&self) -> Bytes {
        let mut inner = BytesMut::new();
        self.name.to_tlv().encode(&mut inner);
        TlvElement::new(tlv::TLV_NONCE, self.nonce.to_be_bytes().to_vec()).encode(&mut inner);

        let mut buf = BytesMut::new();
        TlvElement::new(tlv::TLV_INTEREST, inner.freeze()).encode(&mut buf);
        buf.freeze()
    }

    /// Decodes an Interest frame. Only the name is recovered; the nonce and
    /// any unknown trailing siblings are skipped after a framing check.
    pub fn from_wire(frame: &[u8]) -> Result<Self, Error> {
        let mut buf = frame;
        let outer = TlvElement::decode(&mut buf)?;
        if outer.tlv_type != tlv::TLV_INTEREST {
            return Err(Error::NdnPacket(format!(
                "expected interest TLV type {}, got {}",
                tlv::TLV_INTEREST,
                outer.tlv_type
            )));
        }

        let mut inner = outer.value.clone();
        let name_element = TlvElement::decode(&mut inner)?;
        let name = Name::from_tlv(&name_element)?;

        while inner.has_remaining() {
            let skipped = TlvElement::decode(&mut inner)?;
            trace!("skipping interest element of type {:#04x}", skipped.tlv_type);
        }

        Ok(Self::new(name))
    }
}

impl PartialEq for Interest {
    fn eq(&self, other: &Self) -> bool {
        // the nonce is wire-only
        self.name == other.name
    }
}

impl Eq for Interest {}

/* ---------------------------------------------------------------- *\
 * Data
\* ---------------------------------------------------------------- */

/// A name-addressed response packet carrying a payload.
///
/// `wire` caches the encoded form a Data arrived with. When present it is
/// re-emitted verbatim, so signature elements produced upstream survive a
/// pass through this node even though the node never parses them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Data {
    pub name: Name,
    pub content: Bytes,
    pub wire: Option<Bytes>,
}

impl Data {
    pub fn new(name: Name, content: impl Into<Bytes>) -> Self {
        Self {
            name,
            content: content.into(),
            wire: None,
        }
    }

    /// Encodes `Data { Name, MetaInfo{}, Content{payload} }`, or emits the
    /// cached wire form verbatim when one is present.
    pub fn to_wire(&self) -> Bytes {
        if let Some(wire) = &self.wire {
            return wire.clone();
        }

        let mut inner = BytesMut::new();
        self.name.to_tlv().encode(&mut inner);
        TlvElement::new(tlv::TLV_META_INFO, Bytes::new()).encode(&mut inner);
        TlvElement::new(tlv::TLV_CONTENT, self.content.clone()).encode(&mut inner);

        let mut buf = BytesMut::new();
        TlvElement::new(tlv::TLV_DATA, inner.freeze()).encode(&mut buf);
        buf.freeze()
    }

    /// Decodes a Data frame: name, then MetaInfo (skipped, tolerated
    /// absent), then the Content payload. Unknown siblings such as signature
    /// elements are skipped but kept in the cached wire form.
    pub fn from_wire(frame: &[u8]) -> Result<Self, Error> {
        let mut buf = frame;
        let outer = TlvElement::decode(&mut buf)?;
        if outer.tlv_type != tlv::TLV_DATA {
            return Err(Error::NdnPacket(format!(
                "expected data TLV type {}, got {}",
                tlv::TLV_DATA,
                outer.tlv_type
            )));
        }
        let consumed = frame.len() - buf.remaining();

        let mut inner = outer.value.clone();
        let name_element = TlvElement::decode(&mut inner)?;
        let name = Name::from_tlv(&name_element)?;

        let mut content: Option<Bytes> = None;
        while inner.has_remaining() {
            let element = TlvElement::decode(&mut inner)?;
            match element.tlv_type {
                tlv::TLV_META_INFO => {} // never parsed
                tlv::TLV_CONTENT if content.is_none() => content = Some(element.value),
                other => trace!("skipping data element of type {:#04x}", other),
            }
        }

        let content = content
            .ok_or_else(|| Error::NdnPacket("data packet without content element".into()))?;

        Ok(Self {
            name,
            content,
            wire: Some(Bytes::copy_from_slice(&frame[..consumed])),
        })
    }
}

impl PartialEq for Data {
    fn eq(&self, other: &Self) -> bool {
        // the cached wire form carries no additional meaning
        self.name == other.name && self.content == other.content
    }
}

impl Eq for Data {}

/* ---------------------------------------------------------------- *\
 * Nack
\* ---------------------------------------------------------------- */

/// Reason code attached to a negative acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NackReason {
    NotSet,
    NoContent,
    NoRoute,
    CompException,
}

impl fmt::Display for NackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            NackReason::NotSet => "Nack Reason Not Set",
            NackReason::NoContent => "No Matching Content",
            NackReason::NoRoute => "No Route Available",
            NackReason::CompException => "Computation Exception",
        };
        write!(f, "{}", reason)
    }
}

/// A negative acknowledgment referring to a previously issued Interest.
///
/// The wire encoding of Nacks is reserved; they travel only through the
/// typed channel APIs between layers of the same node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nack {
    pub name: Name,
    pub reason: NackReason,
    pub interest: Interest,
}

impl Nack {
    pub fn new(name: Name, reason: NackReason, interest: Interest) -> Self {
        Self {
            name,
            reason,
            interest,
        }
    }

    /// Nack(NO_ROUTE) for the given Interest, addressed by its name.
    pub fn no_route(interest: Interest) -> Self {
        Self::new(interest.name.clone(), NackReason::NoRoute, interest)
    }
}

/* ---------------------------------------------------------------- *\
 * Packet
\* ---------------------------------------------------------------- */

/// A decoded NDN packet of any of the three kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Packet {
    Interest(Interest),
    Data(Data),
    Nack(Nack),
}

impl Packet {
    /// Get the name of the packet
    pub fn name(&self) -> &Name {
        match self {
            Packet::Interest(interest) => &interest.name,
            Packet::Data(data) => &data.name,
            Packet::Nack(nack) => &nack.name,
        }
    }

    /// Get the type of the packet as a string
    pub fn kind(&self) -> &'static str {
        match self {
            Packet::Interest(_) => "Interest",
            Packet::Data(_) => "Data",
            Packet::Nack(_) => "Nack",
        }
    }

    /// Convert the packet to bytes for transmission.
    ///
    /// Nacks have no agreed wire format yet; encoding one is an error so
    /// the caller cannot leak them onto the wire by accident.
    pub fn to_wire(&self) -> Result<Bytes, Error> {
        match self {
            Packet::Interest(interest) => Ok(interest.to_wire()),
            Packet::Data(data) => Ok(data.to_wire()),
            Packet::Nack(_) => Err(Error::NdnPacket(
                "nack wire encoding is reserved".into(),
            )),
        }
    }

    /// Create a packet from a framed wire buffer.
    ///
    /// Dispatches on the first byte. Anything that is neither an Interest
    /// nor a Data frame, including the reserved Nack form, is rejected so
    /// the caller drops the frame rather than misclassifying it.
    pub fn from_wire(frame: &[u8]) -> Result<Self, Error> {
        if frame.is_empty() {
            return Err(Error::NdnPacket("empty frame".into()));
        }
        if frame.len() > MAX_NDN_PACKET_SIZE {
            return Err(Error::NdnPacket(format!(
                "frame of {} bytes exceeds maximum packet size",
                frame.len()
            )));
        }

        match frame[0] {
            tlv::TLV_INTEREST => Ok(Packet::Interest(Interest::from_wire(frame)?)),
            tlv::TLV_DATA => Ok(Packet::Data(Data::from_wire(frame)?)),
            other => Err(Error::NdnPacket(format!(
                "unrecognized outer TLV type {:#04x}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests;
