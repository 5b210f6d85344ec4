use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod utils;

/// icnfwd Command Line Interface
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Sets the level of verbosity
    #[clap(short, long, global = true)]
    verbose: bool,

    /// Subcommand to execute
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode an Interest and print its wire format
    Interest {
        /// Name to request (NDN URI format)
        name: String,

        /// Fixed nonce instead of a generated one
        #[clap(short, long)]
        nonce: Option<u32>,
    },

    /// Encode a Data packet and print its wire format
    Data {
        /// Name to publish under (NDN URI format)
        name: String,

        /// Content to carry (string)
        content: String,
    },

    /// Decode a hex-encoded packet frame and describe it
    Decode {
        /// Frame bytes as hex, whitespace ignored
        hex: String,
    },

    /// Show the effective forwarder configuration
    Config {
        /// Configuration file to merge over the defaults
        #[clap(short, long)]
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        if cli.verbose { "debug" } else { "info" },
    ))
    .init();

    // Execute the specified command
    match cli.command {
        Commands::Interest { name, nonce } => {
            commands::interest::encode_interest(name, nonce)?;
        }
        Commands::Data { name, content } => {
            commands::data::encode_data(name, content)?;
        }
        Commands::Decode { hex } => {
            commands::decode::decode_frame(hex)?;
        }
        Commands::Config { file } => {
            commands::config::show_config(file)?;
        }
    }

    Ok(())
}
