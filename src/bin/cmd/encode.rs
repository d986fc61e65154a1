// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Encode command - JSON value to ROS1 wire bytes.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use robomsg::encoding::json::parse_json;
use tracing::info;

use crate::common::{load_codec, read_input, write_output, Result};

/// Encode a JSON value as a ROS1 message.
#[derive(Args, Clone, Debug)]
pub struct EncodeCmd {
    /// Message definition file (.msg or gendeps output)
    #[arg(value_name = "MSG_FILE")]
    input: PathBuf,

    /// JSON value to encode, `-` for stdin
    #[arg(value_name = "JSON_FILE")]
    value: PathBuf,

    /// Fully qualified name of the root type
    #[arg(short = 't', long = "type")]
    type_name: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write hex text instead of raw bytes
    #[arg(long)]
    hex: bool,
}

impl EncodeCmd {
    pub fn run(self) -> Result<()> {
        let codec = load_codec(&self.input, self.type_name.as_deref())?;

        let text = String::from_utf8(read_input(&self.value)?)
            .context("JSON input is not valid UTF-8")?;
        let value = parse_json(&text)?;
        let bytes = codec.write_message(&value)?;
        info!(
            type_name = codec.root_type().display_name(),
            size = bytes.len(),
            "encoded message"
        );

        if self.hex {
            let mut line = hex::encode(&bytes);
            line.push('\n');
            write_output(self.output.as_deref(), line.as_bytes())
        } else {
            write_output(self.output.as_deref(), &bytes)
        }
    }
}
