use ai_netlist::cache::ResponseCache;
use ai_netlist::client::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient};
use ai_netlist::pipeline::{self, Input};
use anyhow::{Context, Error, Result};
use circuit_core::config::DEFAULT_OUTPUT_FOLDER;
use clap::Parser;
use log::error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "Describe a circuit in plain words and get a SPICE netlist (.cir) back"
)]
struct Args {
    /// What to build, e.g. "RC low pass with 1 kHz cutoff". Asked on stdin when omitted.
    prompt: Option<String>,
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Folder the netlist is written to.
    #[arg(long, default_value = DEFAULT_OUTPUT_FOLDER)]
    out_dir: PathBuf,
    /// Skip the model and read a circuit description from a JSON file.
    #[arg(long, value_name = "FILE", conflicts_with = "prompt")]
    from_json: Option<PathBuf>,
    /// Keep model answers in this folder and reuse them for identical prompts.
    #[arg(long, value_name = "DIR")]
    cache: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let Args {
        prompt,
        api_key,
        model,
        base_url,
        out_dir,
        from_json,
        cache,
    } = args;

    let input = match from_json {
        Some(path) => Input::Description(path),
        None => {
            let prompt = match prompt {
                Some(prompt) => prompt,
                None => read_prompt()?,
            };
            let api_key = api_key.ok_or_else(|| {
                Error::msg("No API key, pass --api-key or set GEMINI_API_KEY")
            })?;
            Input::Prompt {
                client: GeminiClient::new(api_key, model, base_url),
                cache: cache.map(ResponseCache::new).transpose()?,
                prompt,
            }
        }
    };
    pipeline::run(input, &out_dir, &mut io::stdout().lock())
}

fn read_prompt() -> Result<String> {
    print!("Describe the circuit: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read prompt")?;
    let prompt = line.trim();
    if prompt.is_empty() {
        return Err(Error::msg("Empty prompt"));
    }
    Ok(prompt.to_string())
}
