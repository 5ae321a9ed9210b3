use crate::prelude::*;
use anyhow::{Error, Result};
use circuit_core::Diagnostic;
use circuit_core::checks::check_schematic;
use circuit_core::convert::schematic_from_description;
use spice_format::Schematic;
use spice_format::parse_circuit_description;
use spice_format::text_util::strip_code_fences;

/// Accepts pasted model output: either a ready schematic or a node-based circuit description,
/// optionally wrapped in Markdown code fences.
pub fn decode_circuit(text: &str) -> Result<(Schematic, Vec<Diagnostic>)> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return Err(Error::msg("Nothing to parse"));
    }

    let mut diagnostics = Vec::new();
    let schematic = match serde_json::from_str::<Schematic>(&cleaned) {
        Ok(schematic) => schematic,
        Err(schematic_err) => {
            trace!("Not a schematic: {schematic_err}");
            let description = parse_circuit_description(&cleaned).map_err(|e| {
                Error::msg(format!(
                    "Neither a schematic ({schematic_err}) nor a circuit description ({e})"
                ))
            })?;
            if description.components.is_empty() {
                return Err(Error::msg("Circuit description has no components"));
            }
            schematic_from_description(&description, &mut diagnostics)
        }
    };
    check_schematic(&schematic, &mut diagnostics);
    Ok((schematic, diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use circuit_core::DiagnosticKind;
    use spice_format::schematic::SymbolKind;

    #[test]
    fn decodes_both_shapes() {
        let (schematic, diagnostics) = decode_circuit(
            "```json\n{\"name\": \"One R\", \"components\": [{\"id\": \"R1\", \"type\": \"resistor\"}]}\n```",
        )
        .unwrap();
        assert_eq!(schematic.name, "One R");
        assert_eq!(diagnostics.len(), 2);
        assert!(
            diagnostics
                .iter()
                .all(|d| matches!(d.kind, DiagnosticKind::UnconnectedTerminal(_)))
        );

        let (schematic, diagnostics) = decode_circuit(
            r#"{"circuit_name": "Divider", "components": [
                {"type": "V", "id": 1, "nodes": ["in", "0"], "value": "5"},
                {"type": "R", "id": 1, "nodes": ["in", "mid"], "value": "1k"},
                {"type": "R", "id": 2, "nodes": ["mid", "0"], "value": "1k"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(schematic.name, "Divider");
        assert_eq!(schematic.components.len(), 4);
        assert_eq!(schematic.components[3].kind, SymbolKind::Ground);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
    }

    #[test]
    fn rejects_unknown_text() {
        assert!(decode_circuit("  ``` ```  ").is_err());
        let err = decode_circuit("{\"hello\": 1}").unwrap_err();
        assert_eq!(err.to_string(), "Circuit description has no components");
        let err = decode_circuit("[1, 2]").unwrap_err();
        assert!(err.to_string().starts_with("Neither a schematic"), "{err}");
    }
}
