// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::fs;
use std::io::{self, Read as _, Write as _};
use std::path::Path;

use anyhow::Context as _;
use robomsg::{CodecError, CodecOptions, ParseOptions, Ros1Codec};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Install the fmt subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise each `-v` raises the level one step
/// from `warn`.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber may already be installed when running under a harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Read a message definition file and compile it.
///
/// `type_name` names the root type; without it the root stays unnamed.
pub fn load_codec(path: &Path, type_name: Option<&str>) -> Result<Ros1Codec> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read definition {}", path.display()))?;
    let mut parse_options = ParseOptions::new();
    if let Some(name) = type_name {
        parse_options = parse_options.top_level_type_name(name);
    }
    let codec = Ros1Codec::from_definition_with(&text, &parse_options, CodecOptions::default())
        .with_context(|| format!("Invalid definition {}", path.display()))?;
    Ok(codec)
}

/// Read a whole input file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }
    fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write bytes to a file, or stdout when `path` is `None`.
pub fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Print a failed command's error to stderr.
///
/// A codec error in the chain is also logged with its structured fields,
/// visible with `-vv`.
pub fn report_error(err: &anyhow::Error) {
    if let Some(codec_err) = err.chain().find_map(|e| e.downcast_ref::<CodecError>()) {
        let fields: Vec<String> = codec_err
            .log_fields()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        debug!(fields = %fields.join(" "), "codec error");
    }
    eprintln!("Error: {err:#}");
}

/// Print `value` as JSON, compact or indented.
pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
