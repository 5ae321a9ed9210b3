pub mod cache;
pub mod client;
pub mod pipeline;
pub mod rest_api;

use crate::cache::ResponseCache;
use crate::client::GeminiClient;
use crate::rest_api::{FinishReason, GenerateContentRequest, GenerateContentResponse};
use anyhow::{Context, Error, Result};
use log::{info, warn};
use spice_format::CircuitDescription;
use spice_format::parse_circuit_description;

pub const SYSTEM_INSTRUCTION: &str = "You are an electrical engineering assistant. \
    Convert requests into JSON. \
    Schema: {'circuit_name': str, 'components': [{'type': str, 'id': str, \
    'nodes': [str, str], 'value': str}], 'simulation': str}. \
    Output ONLY valid JSON.";

#[derive(Debug, Clone, PartialEq)]
pub enum Generation {
    Circuit(CircuitDescription),
    /// Refused by the safety filters, with the reported reason.
    Blocked(String),
    /// The model answered without any text.
    Empty,
}

pub fn parse_response(body: &str) -> Result<GenerateContentResponse> {
    let deserializer = &mut serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(deserializer).map_err(|e| {
        let path = e.path().to_string();
        Error::msg(format!(
            "Malformed generateContent response: {} (at {path})",
            e.into_inner()
        ))
    })
}

pub fn interpret_response(response: &GenerateContentResponse) -> Result<Generation> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_ref())
    {
        return Ok(Generation::Blocked(reason.clone()));
    }
    let Some(candidate) = response.candidates.first() else {
        return Ok(Generation::Empty);
    };
    match candidate.finish_reason {
        Some(FinishReason::Safety) => return Ok(Generation::Blocked("SAFETY".to_string())),
        Some(FinishReason::MaxTokens) => warn!("Answer was cut at the token limit"),
        _ => {}
    }
    let Some(text) = candidate.text().filter(|t| !t.trim().is_empty()) else {
        return Ok(Generation::Empty);
    };
    let description =
        parse_circuit_description(&text).context("Model answer is not a circuit description")?;
    Ok(Generation::Circuit(description))
}

/// Asks the model for a circuit, answering from `cache` when the same question was asked before.
///
/// Only answers that decode into a circuit are cached.
pub fn request_circuit(
    client: &GeminiClient,
    cache: Option<&ResponseCache>,
    prompt: &str,
) -> Result<Generation> {
    let key = ResponseCache::key(client.model(), SYSTEM_INSTRUCTION, prompt);
    if let Some(cache) = cache {
        if let Some(body) = cache.get(&key)? {
            return interpret_response(&parse_response(&body)?);
        }
    }

    info!("Asking {} for a circuit", client.model());
    let request = GenerateContentRequest::json_prompt(SYSTEM_INSTRUCTION, prompt);
    let body = client.generate_content(&request)?;
    let generation = interpret_response(&parse_response(&body)?)?;
    if let (Some(cache), Generation::Circuit(_)) = (cache, &generation) {
        cache.put(&key, &body)?;
    }
    Ok(generation)
}
