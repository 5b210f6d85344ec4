//! Interest encoding command implementation for the icnfwd CLI

use anyhow::Result;
use log::info;
use rust_icnfwd_common::ndn::{Interest, Name};

use crate::utils::{format_bytes, hex_dump, print_header};

/// Encode an Interest and print its wire format
pub fn encode_interest(name_str: String, nonce: Option<u32>) -> Result<()> {
    info!("Encoding Interest: name={}", name_str);

    // Parse the name string into a Name
    let name = Name::from_uri(&name_str);

    // Create an Interest packet
    let mut interest = Interest::new(name);
    if let Some(nonce) = nonce {
        interest = interest.with_nonce(nonce);
    }

    let wire = interest.to_wire();

    println!("Interest: {}", interest.name);
    println!("Nonce: {:#010x}", interest.nonce);

    print_header("Wire format");
    print!("{}", hex_dump(&wire));
    println!("\nEncoded {}", format_bytes(wire.len()));

    Ok(())
}
