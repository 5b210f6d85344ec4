//! TLV (Type-Length-Value) encoding and decoding utilities.
//!
//! Implements the NDN-TLV framing convention: every element is
//! `Type (varnum) | Length (varnum) | Value`. Only single-byte types are in
//! use on this wire.

use crate::error::Error;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// NDN TLV packet and element types
pub const TLV_INTEREST: u8 = 0x05;
pub const TLV_DATA: u8 = 0x06;
pub const TLV_NAME: u8 = 0x07;
pub const TLV_COMPONENT: u8 = 0x08;
pub const TLV_NONCE: u8 = 0x0A;
pub const TLV_META_INFO: u8 = 0x14;
pub const TLV_CONTENT: u8 = 0x15;

/// Encodes a TLV type field.
pub fn encode_tlv_type(tlv_type: u8, buf: &mut BytesMut) {
    buf.put_u8(tlv_type);
}

/// Encodes a TLV length field.
///
/// Variable-length encoding per the NDN spec:
/// - length < 253: 1 byte
/// - length <= 65535: marker 253 + 2 bytes
/// - otherwise: marker 254 + 4 bytes
pub fn encode_tlv_length(length: usize, buf: &mut BytesMut) {
    if length < 253 {
        buf.put_u8(length as u8);
    } else if length <= 65535 {
        buf.put_u8(253);
        buf.put_u16(length as u16);
    } else {
        buf.put_u8(254);
        buf.put_u32(length as u32);
    }
}

/// Decodes a TLV type field.
pub fn decode_tlv_type(buf: &mut impl Buf) -> Result<u8, Error> {
    if !buf.has_remaining() {
        return Err(Error::Tlv("buffer underflow when decoding TLV type".into()));
    }
    Ok(buf.get_u8())
}

/// Decodes a TLV length field.
pub fn decode_tlv_length(buf: &mut impl Buf) -> Result<usize, Error> {
    if !buf.has_remaining() {
        return Err(Error::Tlv("buffer underflow when decoding TLV length".into()));
    }

    match buf.get_u8() {
        len @ 0..=252 => Ok(len as usize),
        253 => {
            if buf.remaining() < 2 {
                return Err(Error::Tlv("buffer underflow when decoding 16-bit TLV length".into()));
            }
            Ok(buf.get_u16() as usize)
        }
        254 => {
            if buf.remaining() < 4 {
                return Err(Error::Tlv("buffer underflow when decoding 32-bit TLV length".into()));
            }
            Ok(buf.get_u32() as usize)
        }
        // marker 255 introduces a 64-bit length
        _ => Err(Error::Tlv("64-bit TLV lengths not supported".into())),
    }
}

/// A generic TLV element consisting of a type, length, and value.
#[derive(Debug, Clone, PartialEq)]
pub struct TlvElement {
    pub tlv_type: u8,
    pub value: Bytes,
}

impl TlvElement {
    /// Creates a new TLV element.
    pub fn new(tlv_type: u8, value: impl Into<Bytes>) -> Self {
        Self {
            tlv_type,
            value: value.into(),
        }
    }

    /// Returns the total length of this TLV element when encoded.
    pub fn len(&self) -> usize {
        let value_len = self.value.len();
        1 + tlv_length_size(value_len) + value_len
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Encodes this TLV element into the provided buffer.
    pub fn encode(&self, buf: &mut BytesMut) {
        encode_tlv_type(self.tlv_type, buf);
        encode_tlv_length(self.value.len(), buf);
        buf.extend_from_slice(&self.value);
    }

    /// Decodes a TLV element from the provided buffer.
    ///
    /// Fails on a truncated header or when the declared length overruns the
    /// remaining input.
    pub fn decode(buf: &mut impl Buf) -> Result<Self, Error> {
        let tlv_type = decode_tlv_type(buf)?;
        let length = decode_tlv_length(buf)?;

        if buf.remaining() < length {
            return Err(Error::Tlv(format!(
                "buffer underflow: TLV value requires {} bytes but only {} available",
                length,
                buf.remaining()
            )));
        }

        Ok(Self {
            tlv_type,
            value: buf.copy_to_bytes(length),
        })
    }
}

/// Returns the number of bytes needed to encode the given length.
fn tlv_length_size(length: usize) -> usize {
    if length < 253 {
        1
    } else if length <= 65535 {
        3
    } else {
        5
    }
}
