//! Data encoding command implementation for the icnfwd CLI

use anyhow::Result;
use bytes::Bytes;
use log::info;
use rust_icnfwd_common::ndn::{Data, Name};

use crate::utils::{format_bytes, hex_dump, print_header};

/// Encode a Data packet and print its wire format
pub fn encode_data(name_str: String, content: String) -> Result<()> {
    info!("Encoding Data: name={}, {} content bytes", name_str, content.len());

    // Parse the name string into a Name
    let name = Name::from_uri(&name_str);

    // Create the Data packet
    let data = Data::new(name, Bytes::from(content.into_bytes()));

    let wire = data.to_wire();

    println!("Data: {}", data.name);
    println!("Content: {}", format_bytes(data.content.len()));

    print_header("Wire format");
    print!("{}", hex_dump(&wire));
    println!("\nEncoded {}", format_bytes(wire.len()));

    Ok(())
}
