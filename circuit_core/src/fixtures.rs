//! Sample circuits bundled with the visualizer.

use anyhow::{Context, Result};
use spice_format::Schematic;

const FIXTURES: [(&str, &str); 3] = [
    ("simple_led", include_str!("../fixtures/simple_led.json")),
    (
        "transistor_switch",
        include_str!("../fixtures/transistor_switch.json"),
    ),
    ("voltage_divider", include_str!("../fixtures/voltage_divider.json")),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    pub id: String,
    pub schematic: Schematic,
}

pub fn load_fixtures() -> Result<Vec<Fixture>> {
    FIXTURES
        .iter()
        .map(|(id, json)| {
            let schematic = serde_json::from_str(json)
                .with_context(|| format!("Fixture circuit {id} is malformed"))?;
            Ok(Fixture {
                id: id.to_string(),
                schematic,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;
    use crate::checks::check_schematic;
    use crate::diagnostics::DiagnosticKind;
    use spice_format::Designator;

    #[test]
    fn fixtures_load_in_order() {
        let fixtures = load_fixtures().unwrap();
        let ids = fixtures.iter().map(|f| f.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["simple_led", "transistor_switch", "voltage_divider"]);
        assert_eq!(fixtures[1].schematic.name, "NPN Transistor Switch");
        assert_eq!(fixtures[1].schematic.components.len(), 5);
        assert_eq!(fixtures[2].schematic.connections.len(), 3);
    }

    #[test]
    fn fixtures_are_consistent() {
        for fixture in load_fixtures().unwrap() {
            let mut diagnostics = Vec::new();
            check_schematic(&fixture.schematic, &mut diagnostics);
            assert!(
                diagnostics.iter().all(|d| d.severity == Severity::Info),
                "{}: {diagnostics:?}",
                fixture.id
            );
            if fixture.id == "voltage_divider" {
                // the V1.negative to GND wire is missing in the sample
                assert_eq!(diagnostics.len(), 1);
                assert_eq!(diagnostics[0].designator, Designator("V1".into()));
                assert_eq!(
                    diagnostics[0].kind,
                    DiagnosticKind::UnconnectedTerminal("negative".into())
                );
            } else {
                assert!(diagnostics.is_empty(), "{}: {diagnostics:?}", fixture.id);
            }
        }
    }
}
