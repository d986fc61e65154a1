// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Size command - bytes occupied by a serialized message.

use std::path::PathBuf;

use clap::Args;

use crate::common::{load_codec, read_input, Result};

/// Print the number of bytes the message at the start of the input occupies.
#[derive(Args, Clone, Debug)]
pub struct SizeCmd {
    /// Message definition file (.msg or gendeps output)
    #[arg(value_name = "MSG_FILE")]
    input: PathBuf,

    /// Serialized message, `-` for stdin
    #[arg(value_name = "BIN_FILE")]
    data: PathBuf,

    /// Fully qualified name of the root type
    #[arg(short = 't', long = "type")]
    type_name: Option<String>,
}

impl SizeCmd {
    pub fn run(self) -> Result<()> {
        let codec = load_codec(&self.input, self.type_name.as_deref())?;
        let data = read_input(&self.data)?;
        let size = codec.size(&data)?;
        if size < data.len() {
            tracing::warn!(size, input = data.len(), "input has trailing bytes");
        }
        println!("{size}");
        Ok(())
    }
}
