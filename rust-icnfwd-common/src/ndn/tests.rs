//! Unit tests for the NDN packet implementation

use super::*;
use bytes::{BufMut, BytesMut};

#[test]
fn test_name_creation() {
    let name = Name::from_uri("/test/data/1");

    assert_eq!(name.len(), 3);
    assert_eq!(name.get(0).unwrap().as_bytes().as_ref(), b"test");
    assert_eq!(name.get(1).unwrap().as_bytes().as_ref(), b"data");
    assert_eq!(name.get(2).unwrap().as_bytes().as_ref(), b"1");

    assert_eq!(name.to_string(), "/test/data/1");
    assert_eq!(Name::new().to_string(), "/");
    assert_eq!(Name::from_uri("//a//b/"), Name::from_uri("/a/b"));
}

#[test]
fn test_name_compare() {
    let name1 = Name::from_uri("/a/b/c");
    let name2 = Name::from_uri("/a/b/c");
    let name3 = Name::from_uri("/a/b/d");
    let name4 = Name::from_uri("/a/b");

    assert_eq!(name1, name2);
    assert_ne!(name1, name3);
    assert_ne!(name1, name4);

    assert!(name4.is_prefix_of(&name1));
    assert!(name1.is_prefix_of(&name1));
    assert!(Name::new().is_prefix_of(&name1));
    assert!(!name1.is_prefix_of(&name4));
    assert!(!name3.is_prefix_of(&name1));
}

#[test]
fn test_name_prefix_and_push() {
    let name = Name::from_uri("/a/b/c");
    assert_eq!(name.prefix(2), Name::from_uri("/a/b"));
    assert_eq!(name.prefix(9), name);
    assert_eq!(name.components().count(), 3);

    let mut built = Name::from_uri("/a/b");
    built.push(NameComponent::new(&b"c"[..]));
    assert_eq!(built, name);
}

#[test]
fn test_name_tlv_round_trip() {
    let name = Name::from_uri("/a/bb/ccc");
    let decoded = Name::from_tlv(&name.to_tlv()).unwrap();
    assert_eq!(decoded, name);
}

#[test]
fn test_interest_round_trip() {
    let interest = Interest::new(Name::from_uri("/test/interest"));
    let wire = interest.to_wire();

    assert_eq!(wire[0], tlv::TLV_INTEREST);

    match Packet::from_wire(&wire).unwrap() {
        Packet::Interest(parsed) => {
            assert_eq!(parsed.name, interest.name);
            // equality is modulo nonce
            assert_eq!(parsed, interest);
        }
        other => panic!("expected Interest, got {}", other.kind()),
    }
}

#[test]
fn test_interest_nonce_on_wire() {
    let interest = Interest::new(Name::from_uri("/n")).with_nonce(0xDEADBEEF);
    let mut wire = interest.to_wire();

    let outer = TlvElement::decode(&mut wire).unwrap();
    let mut inner = outer.value;
    let name_element = TlvElement::decode(&mut inner).unwrap();
    assert_eq!(name_element.tlv_type, tlv::TLV_NAME);

    let nonce = TlvElement::decode(&mut inner).unwrap();
    assert_eq!(nonce.tlv_type, tlv::TLV_NONCE);
    assert_eq!(nonce.value.as_ref(), &0xDEADBEEFu32.to_be_bytes());
}

#[test]
fn test_interest_without_nonce_is_tolerated() {
    let mut inner = BytesMut::new();
    Name::from_uri("/bare").to_tlv().encode(&mut inner);
    let mut frame = BytesMut::new();
    TlvElement::new(tlv::TLV_INTEREST, inner.freeze()).encode(&mut frame);

    match Packet::from_wire(&frame).unwrap() {
        Packet::Interest(interest) => assert_eq!(interest.name.to_string(), "/bare"),
        other => panic!("expected Interest, got {}", other.kind()),
    }
}

#[test]
fn test_data_round_trip() {
    let data = Data::new(Name::from_uri("/test/data"), &b"Hello, NDN!"[..]);
    let wire = data.to_wire();

    assert_eq!(wire[0], tlv::TLV_DATA);

    match Packet::from_wire(&wire).unwrap() {
        Packet::Data(parsed) => {
            assert_eq!(parsed.name, data.name);
            assert_eq!(parsed.content, data.content);
            // equality is modulo meta-info and the cached wire form
            assert_eq!(parsed, data);
        }
        other => panic!("expected Data, got {}", other.kind()),
    }
}

#[test]
fn test_data_wire_form_is_reemitted_verbatim() {
    let original = Data::new(Name::from_uri("/a/x"), &b"payload"[..]).to_wire();

    let decoded = match Packet::from_wire(&original).unwrap() {
        Packet::Data(data) => data,
        other => panic!("expected Data, got {}", other.kind()),
    };

    assert!(decoded.wire.is_some());
    assert_eq!(decoded.to_wire(), original);
}

#[test]
fn test_data_signature_elements_survive_forwarding() {
    // a Data frame as an upstream producer would sign it: unknown elements
    // after the Content must be skipped at decode but kept on re-emit
    let mut inner = BytesMut::new();
    Name::from_uri("/signed").to_tlv().encode(&mut inner);
    TlvElement::new(tlv::TLV_META_INFO, Bytes::new()).encode(&mut inner);
    TlvElement::new(tlv::TLV_CONTENT, &b"payload"[..]).encode(&mut inner);
    TlvElement::new(0x16, &b"siginfo"[..]).encode(&mut inner);
    TlvElement::new(0x17, &b"sigvalue"[..]).encode(&mut inner);
    let mut frame = BytesMut::new();
    TlvElement::new(tlv::TLV_DATA, inner.freeze()).encode(&mut frame);
    let frame = frame.freeze();

    let decoded = match Packet::from_wire(&frame).unwrap() {
        Packet::Data(data) => data,
        other => panic!("expected Data, got {}", other.kind()),
    };

    assert_eq!(decoded.content.as_ref(), b"payload");
    assert_eq!(decoded.to_wire(), frame);
}

#[test]
fn test_data_without_meta_info_is_tolerated() {
    let mut inner = BytesMut::new();
    Name::from_uri("/no/meta").to_tlv().encode(&mut inner);
    TlvElement::new(tlv::TLV_CONTENT, &b"p"[..]).encode(&mut inner);
    let mut frame = BytesMut::new();
    TlvElement::new(tlv::TLV_DATA, inner.freeze()).encode(&mut frame);

    match Packet::from_wire(&frame).unwrap() {
        Packet::Data(data) => assert_eq!(data.content.as_ref(), b"p"),
        other => panic!("expected Data, got {}", other.kind()),
    }
}

#[test]
fn test_data_without_content_is_rejected() {
    let mut inner = BytesMut::new();
    Name::from_uri("/hollow").to_tlv().encode(&mut inner);
    TlvElement::new(tlv::TLV_META_INFO, Bytes::new()).encode(&mut inner);
    let mut frame = BytesMut::new();
    TlvElement::new(tlv::TLV_DATA, inner.freeze()).encode(&mut frame);

    assert!(Packet::from_wire(&frame).is_err());
}

#[test]
fn test_unknown_outer_type_is_rejected() {
    // 0x03 is the reserved Nack framing; it must not be misclassified
    let mut frame = BytesMut::new();
    frame.put_u8(0x03);
    frame.put_u8(0);
    assert!(Packet::from_wire(&frame).is_err());

    assert!(Packet::from_wire(&[]).is_err());
}

#[test]
fn test_truncated_frame_is_rejected() {
    let wire = Data::new(Name::from_uri("/t"), &b"payload"[..]).to_wire();
    assert!(Packet::from_wire(&wire[..wire.len() - 3]).is_err());
}

#[test]
fn test_nack_has_no_wire_encoding() {
    let interest = Interest::new(Name::from_uri("/b/y"));
    let nack = Packet::Nack(Nack::no_route(interest));
    assert!(nack.to_wire().is_err());
}

#[test]
fn test_nack_reason_display() {
    assert_eq!(NackReason::NoContent.to_string(), "No Matching Content");
    assert_eq!(NackReason::NoRoute.to_string(), "No Route Available");
    assert_eq!(NackReason::NotSet.to_string(), "Nack Reason Not Set");
    assert_eq!(NackReason::CompException.to_string(), "Computation Exception");
}
