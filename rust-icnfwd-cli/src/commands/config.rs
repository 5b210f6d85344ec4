//! Configuration inspection command for the icnfwd CLI

use anyhow::{Context, Result};
use log::info;
use rust_icnfwd_engine::ForwarderConfig;
use std::path::PathBuf;

use crate::utils::print_header;

/// Print the effective forwarder configuration
pub fn show_config(file: Option<PathBuf>) -> Result<()> {
    let config = match &file {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ForwarderConfig::from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => ForwarderConfig::default(),
    };

    print_header("Forwarder configuration");
    println!("cs_timeout       = {}s", config.cs_timeout);
    println!("pit_timeout      = {}s", config.pit_timeout);
    println!("pit_retransmits  = {}", config.pit_retransmits);
    println!("ageing_interval  = {}s", config.ageing_interval);
    println!("interest_to_app  = {}", config.interest_to_app);

    if file.is_none() {
        println!("\n(defaults; pass --file to merge a configuration file)");
    }

    Ok(())
}
