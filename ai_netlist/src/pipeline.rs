//! The command line flow: get a circuit description, turn it into a netlist, save it and report.

use crate::cache::ResponseCache;
use crate::client::GeminiClient;
use crate::{Generation, request_circuit};
use anyhow::Result;
use circuit_core::diagnostics::log_diagnostics;
use circuit_core::spice_export::{build_netlist, save_netlist};
use log::info;
use spice_format::{CircuitDescription, load_circuit_description};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

pub const BLOCKED_MESSAGE: &str =
    "Error: The design was blocked by safety filters. Try a simpler prompt.";
pub const EMPTY_MESSAGE: &str = "Error: The model returned no circuit.";

pub enum Input {
    /// A circuit description already on disk; the model is not asked.
    Description(PathBuf),
    Prompt {
        client: GeminiClient,
        cache: Option<ResponseCache>,
        prompt: String,
    },
}

/// Runs the whole flow, writing the user facing report to `out`.
///
/// Refused or empty answers are reported and give a failing exit code; transport and format
/// problems are returned as errors.
pub fn run(input: Input, out_dir: &Path, out: &mut impl Write) -> Result<ExitCode> {
    let description = match input {
        Input::Description(path) => load_circuit_description(&path)?,
        Input::Prompt {
            client,
            cache,
            prompt,
        } => match request_circuit(&client, cache.as_ref(), &prompt)? {
            Generation::Circuit(description) => description,
            Generation::Blocked(reason) => {
                info!("Block reason: {reason}");
                writeln!(out, "{BLOCKED_MESSAGE}")?;
                return Ok(ExitCode::FAILURE);
            }
            Generation::Empty => {
                writeln!(out, "{EMPTY_MESSAGE}")?;
                return Ok(ExitCode::FAILURE);
            }
        },
    };
    write_netlist(&description, out_dir, out)?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the description and the netlist built from it, saves the netlist and prints where.
pub fn write_netlist(
    description: &CircuitDescription,
    out_dir: &Path,
    out: &mut impl Write,
) -> Result<PathBuf> {
    writeln!(out, "{}", serde_json::to_string_pretty(description)?)?;

    let mut diagnostics = Vec::new();
    let netlist = build_netlist(description, &mut diagnostics);
    log_diagnostics(&diagnostics);

    writeln!(out, "\n--- GENERATED SPICE NETLIST ---")?;
    write!(out, "{netlist}")?;
    writeln!(out, "-------------------------------\n")?;

    let path = save_netlist(&netlist, out_dir)?;
    let rule = "-".repeat(40);
    writeln!(out, "{rule}")?;
    writeln!(out, "Netlist saved to: {}", path.display())?;
    writeln!(out, "{rule}")?;
    Ok(path)
}
