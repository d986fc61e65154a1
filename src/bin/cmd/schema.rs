// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema commands - show parsed definitions and compiled layouts.

use std::path::PathBuf;

use clap::Subcommand;

use crate::common::{load_codec, print_json, Result};

/// Schema operations.
#[derive(Subcommand, Clone, Debug)]
pub enum SchemaCmd {
    /// Show the parsed type definitions
    Show {
        /// Message definition file (.msg or gendeps output)
        #[arg(value_name = "MSG_FILE")]
        input: PathBuf,

        /// Fully qualified name of the root type
        #[arg(short = 't', long = "type")]
        type_name: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the compiled layout of every type
    Plan {
        /// Message definition file (.msg or gendeps output)
        #[arg(value_name = "MSG_FILE")]
        input: PathBuf,

        /// Fully qualified name of the root type
        #[arg(short = 't', long = "type")]
        type_name: Option<String>,
    },
}

impl SchemaCmd {
    pub fn run(self) -> Result<()> {
        match self {
            SchemaCmd::Show {
                input,
                type_name,
                json,
            } => cmd_show(input, type_name, json),
            SchemaCmd::Plan { input, type_name } => cmd_plan(input, type_name),
        }
    }
}

fn cmd_show(input: PathBuf, type_name: Option<String>, json: bool) -> Result<()> {
    let codec = load_codec(&input, type_name.as_deref())?;

    if json {
        return print_json(&codec.definitions(), true);
    }

    for (i, definition) in codec.definitions().iter().enumerate() {
        if i > 0 {
            println!("================");
        }
        println!("# {}", definition.display_name());
        print!("{definition}");
    }
    Ok(())
}

fn cmd_plan(input: PathBuf, type_name: Option<String>) -> Result<()> {
    let codec = load_codec(&input, type_name.as_deref())?;
    print!("{}", *codec);
    Ok(())
}
