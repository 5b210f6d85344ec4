//! Frame decoding command implementation for the icnfwd CLI

use anyhow::{Context, Result};
use log::info;
use rust_icnfwd_common::ndn::Packet;

use crate::utils::{format_bytes, parse_hex};

/// Decode a hex-encoded frame and describe the packet
pub fn decode_frame(hex: String) -> Result<()> {
    let frame = parse_hex(&hex)?;
    info!("Decoding frame of {} bytes", frame.len());

    let packet = Packet::from_wire(&frame).context("Failed to decode frame")?;

    println!("Packet type: {}", packet.kind());
    println!("Name: {}", packet.name());

    if let Packet::Data(data) = &packet {
        let content = &data.content;
        if content.len() <= 100 {
            println!("Content: {:?}", content);

            // If content looks like UTF-8 text, print it as string
            if let Ok(text) = String::from_utf8(content.to_vec()) {
                println!("Content (as text): {}", text);
            }
        } else {
            println!("Content: {}", format_bytes(content.len()));
            println!("Content (first 100 bytes): {:?}", &content[..100]);
        }
    }

    Ok(())
}
