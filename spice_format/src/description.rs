//! Circuit description as requested from a generative model:
//! `{ circuit_name, components: [{ type, id, nodes: [n+, n-], value }], simulation }`.

use crate::text_util::strip_code_fences;
use anyhow::{Context, Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::read_to_string;
use std::path::Path;

pub const DEFAULT_CIRCUIT_NAME: &str = "Design";
pub const DEFAULT_SIMULATION: &str = ".op";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitDescription {
    #[serde(default = "default_circuit_name")]
    pub circuit_name: String,
    #[serde(default)]
    pub components: Vec<ComponentDescription>,
    #[serde(default = "default_simulation")]
    pub simulation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDescription {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "text_like")]
    pub id: String,
    #[serde(deserialize_with = "text_like_seq")]
    pub nodes: Vec<String>,
    #[serde(deserialize_with = "text_like")]
    pub value: String,
}

fn default_circuit_name() -> String {
    DEFAULT_CIRCUIT_NAME.to_string()
}

fn default_simulation() -> String {
    DEFAULT_SIMULATION.to_string()
}

/// Models are not consistent about quoting: `"id": 1`, `"nodes": [1, 0]` and `"value": 1000` all occur.
#[derive(Deserialize)]
#[serde(untagged)]
enum TextLike {
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
}

impl From<TextLike> for String {
    fn from(value: TextLike) -> Self {
        match value {
            TextLike::Text(s) => s,
            TextLike::Integer(i) => i.to_string(),
            TextLike::Unsigned(u) => u.to_string(),
            TextLike::Float(f) => float_text(f),
        }
    }
}

/// Shortest round-trip digits, written the way Python's `str(float)` does:
/// `1.0`, `0.0001`, `1e-05`, `1e+16`.
fn float_text(f: f64) -> String {
    let scientific = format!("{f:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return f.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return f.to_string();
    };
    if !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs());
    }
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(m) => ("-", m),
        None => ("", mantissa),
    };
    let digits = mantissa.replace('.', "");
    if exponent < 0 {
        let zeros = "0".repeat(exponent.unsigned_abs() as usize - 1);
        return format!("{sign}0.{zeros}{digits}");
    }
    let point = exponent as usize + 1;
    if digits.len() <= point {
        format!("{sign}{digits}{}.0", "0".repeat(point - digits.len()))
    } else {
        format!("{sign}{}.{}", &digits[..point], &digits[point..])
    }
}

fn text_like<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    TextLike::deserialize(deserializer).map(String::from)
}

fn text_like_seq<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let items = Vec::<TextLike>::deserialize(deserializer)?;
    Ok(items.into_iter().map(String::from).collect())
}

/// Decodes model output, tolerating Markdown code fences around the JSON.
pub fn parse_circuit_description(text: &str) -> Result<CircuitDescription> {
    let cleaned = strip_code_fences(text);
    let deserializer = &mut serde_json::Deserializer::from_str(&cleaned);
    serde_path_to_error::deserialize(deserializer).map_err(|e| {
        let path = e.path().to_string();
        Error::msg(format!("{} (at {path})", e.into_inner()))
    })
}

pub fn load_circuit_description(path: &Path) -> Result<CircuitDescription> {
    let contents = read_to_string(path)
        .with_context(|| format!("Failed to read circuit description {path:?}"))?;
    parse_circuit_description(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_load_fenced_description() {
        let description =
            load_circuit_description(Path::new("test_input/rc_lowpass_fenced.json")).unwrap();
        assert_eq!(description.circuit_name, "RC Low Pass Filter");
        assert_eq!(description.components.len(), 3);
        assert_eq!(description.components[0].kind, "V");
        assert_eq!(description.components[1].nodes, ["in", "out"]);
        assert_eq!(description.simulation, ".ac dec 10 1 100k");
    }

    #[test]
    fn defaults_and_numbers() {
        let description = parse_circuit_description(
            r#"{"components": [{"type": "R", "id": 1, "nodes": [1, 0], "value": 1000}]}"#,
        )
        .unwrap();
        assert_eq!(description.circuit_name, DEFAULT_CIRCUIT_NAME);
        assert_eq!(description.simulation, DEFAULT_SIMULATION);
        let r = &description.components[0];
        assert_eq!(r.id, "1");
        assert_eq!(r.nodes, ["1", "0"]);
        assert_eq!(r.value, "1000");
    }

    #[test]
    fn float_numbers_keep_their_decimal_form() {
        let description = parse_circuit_description(
            r#"{"components": [{"type": "C", "id": 1.0, "nodes": [2.5, 0], "value": 1e-7}]}"#,
        )
        .unwrap();
        let c = &description.components[0];
        assert_eq!(c.id, "1.0");
        assert_eq!(c.nodes, ["2.5", "0"]);
        assert_eq!(c.value, "1e-07");

        assert_eq!(float_text(0.0001), "0.0001");
        assert_eq!(float_text(0.00001), "1e-05");
        assert_eq!(float_text(-0.25), "-0.25");
        assert_eq!(float_text(123456.789), "123456.789");
        assert_eq!(float_text(1e15), "1000000000000000.0");
        assert_eq!(float_text(1e16), "1e+16");
        assert_eq!(float_text(-1.5e-7), "-1.5e-07");
        assert_eq!(float_text(0.0), "0.0");
    }

    #[test]
    fn error_contains_json_path() {
        let err = parse_circuit_description(
            r#"{"circuit_name": "x", "components": [
                {"type": "R", "id": "1", "nodes": ["a", "b"], "value": "1k"},
                {"type": "C", "id": "1", "value": "1u"}
            ]}"#,
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("nodes"), "{message}");
        assert!(message.contains("components[1]"), "{message}");
    }

    #[test]
    fn rejects_non_json() {
        assert!(parse_circuit_description("Sorry, I can't help with that.").is_err());
    }
}
