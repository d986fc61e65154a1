// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Robomsg CLI
//!
//! Command-line tool for ROS1 message definitions and serialized messages.
//!
//! ## Usage
//!
//! ```sh
//! # Show the compiled layout
//! robomsg schema plan sensor_msgs/LaserScan.msg
//!
//! # Encode a JSON value
//! robomsg encode String.msg value.json -o value.bin
//!
//! # Decode one field
//! robomsg decode String.msg value.bin --field data
//!
//! # Measure a message
//! robomsg size String.msg value.bin
//! ```

mod cmd;
mod common;

use std::process;

use clap::{ArgAction, Parser, Subcommand};
use cmd::{DecodeCmd, EncodeCmd, SchemaCmd, SizeCmd};
use common::Result;

/// Robomsg - ROS1 message codec
///
/// Compile message definitions, encode JSON values into ROS1 wire bytes and
/// decode them back lazily.
#[derive(Parser, Clone)]
#[command(name = "robomsg")]
#[command(about = "ROS1 message codec toolkit", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Schema operations (show, plan)
    #[command(subcommand)]
    Schema(SchemaCmd),

    /// Encode a JSON value into wire bytes
    Encode(EncodeCmd),

    /// Decode wire bytes into JSON
    Decode(DecodeCmd),

    /// Print the byte size of a serialized message
    Size(SizeCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    common::init_logging(cli.verbose);

    match cli.command {
        Commands::Schema(cmd) => cmd.run(),
        Commands::Encode(cmd) => cmd.run(),
        Commands::Decode(cmd) => cmd.run(),
        Commands::Size(cmd) => cmd.run(),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        common::report_error(&e);
        process::exit(1);
    }
}
