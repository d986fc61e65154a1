// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decode command - ROS1 wire bytes to JSON.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;

use crate::common::{load_codec, print_json, read_input, Result};

/// Decode a ROS1 message and print it as JSON.
#[derive(Args, Clone, Debug)]
pub struct DecodeCmd {
    /// Message definition file (.msg or gendeps output)
    #[arg(value_name = "MSG_FILE")]
    input: PathBuf,

    /// Serialized message, `-` for stdin
    #[arg(value_name = "BIN_FILE")]
    data: PathBuf,

    /// Fully qualified name of the root type
    #[arg(short = 't', long = "type")]
    type_name: Option<String>,

    /// Byte offset of the message in the input
    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// Byte length of the message (default: rest of the input)
    #[arg(long)]
    length: Option<usize>,

    /// Decode a single top-level field
    #[arg(short, long, value_name = "NAME")]
    field: Option<String>,

    /// Read the input as hex text
    #[arg(long)]
    hex: bool,

    /// Pretty-print JSON
    #[arg(short, long)]
    pretty: bool,
}

impl DecodeCmd {
    pub fn run(self) -> Result<()> {
        let codec = load_codec(&self.input, self.type_name.as_deref())?;

        let mut data = read_input(&self.data)?;
        if self.hex {
            let text = String::from_utf8(data).context("hex input is not valid UTF-8")?;
            data = hex::decode(text.trim()).context("invalid hex input")?;
        }

        let length = match self.length {
            Some(length) => length,
            None => data.len().checked_sub(self.offset).with_context(|| {
                format!(
                    "offset {} is past the end of {} input bytes",
                    self.offset,
                    data.len()
                )
            })?,
        };
        let view = codec.decode(&data, self.offset, length)?;

        let json = match &self.field {
            Some(name) => view.get(name)?.to_json()?,
            None => view.to_json()?,
        };
        print_json(&json, self.pretty)
    }
}
