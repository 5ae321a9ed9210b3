use crate::Severity;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use itertools::Itertools;
use spice_format::Designator;
use spice_format::schematic::{Schematic, SymbolKind, TerminalRef};
use std::collections::HashSet;

/// Kind of part the designator prefix stands for, if it is a recognizable one.
fn designator_kind(id: &Designator) -> Option<SymbolKind> {
    if id.is_led() {
        Some(SymbolKind::Led)
    } else if id.is_resistor() {
        Some(SymbolKind::Resistor)
    } else if id.is_capacitor() {
        Some(SymbolKind::Capacitor)
    } else if id.is_inductor() {
        Some(SymbolKind::Inductor)
    } else if id.is_voltage_source() {
        Some(SymbolKind::VoltageSource)
    } else if id.is_current_source() {
        Some(SymbolKind::CurrentSource)
    } else if id.is_transistor() {
        Some(SymbolKind::Transistor)
    } else if id.is_ground() {
        Some(SymbolKind::Ground)
    } else {
        None
    }
}

/// Reports wires that point nowhere, reused or misleading designators and terminals left open.
pub fn check_schematic(schematic: &Schematic, diagnostics: &mut Vec<Diagnostic>) {
    for id in schematic.components.iter().map(|c| &c.id).duplicates() {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            id.clone(),
            DiagnosticKind::DuplicateDesignator,
        ));
    }

    for component in &schematic.components {
        match designator_kind(&component.id) {
            Some(named) if named != component.kind => diagnostics.push(Diagnostic::new(
                Severity::Warning,
                component.id.clone(),
                DiagnosticKind::DesignatorMismatch(named, component.kind),
            )),
            _ => {}
        }
    }

    let mut connected: HashSet<&TerminalRef> = HashSet::new();
    for connection in &schematic.connections {
        for end in [&connection.from, &connection.to] {
            match schematic.component(&end.designator) {
                None => diagnostics.push(Diagnostic::new(
                    Severity::Error,
                    end.designator.clone(),
                    DiagnosticKind::UnknownComponent(end.clone()),
                )),
                Some(c) if !c.kind.has_terminal(&end.terminal) => {
                    diagnostics.push(Diagnostic::new(
                        Severity::Error,
                        end.designator.clone(),
                        DiagnosticKind::UnknownTerminal(end.clone()),
                    ))
                }
                Some(_) => {
                    connected.insert(end);
                }
            }
        }
    }

    let mut reported: HashSet<&Designator> = HashSet::new();
    for component in &schematic.components {
        if !reported.insert(&component.id) {
            continue;
        }
        for terminal in component.kind.terminals() {
            let terminal_ref = TerminalRef::new(component.id.0.clone(), *terminal);
            if !connected.contains(&terminal_ref) {
                diagnostics.push(Diagnostic::new(
                    Severity::Info,
                    component.id.clone(),
                    DiagnosticKind::UnconnectedTerminal(terminal.to_string()),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_broken_wires() {
        let schematic: Schematic = serde_json::from_str(
            r#"{
                "name": "broken",
                "components": [
                    {"id": "R1", "type": "resistor", "value": "1k"},
                    {"id": "R1", "type": "resistor", "value": "2k"},
                    {"id": "GND", "type": "ground"}
                ],
                "connections": [
                    {"from": "R1.1", "to": "X1.1"},
                    {"from": "R1.3", "to": "GND.terminal"}
                ]
            }"#,
        )
        .unwrap();
        let mut diagnostics = Vec::new();
        check_schematic(&schematic, &mut diagnostics);

        let errors = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.kind)
            .collect::<Vec<_>>();
        assert_eq!(
            errors,
            [
                &DiagnosticKind::DuplicateDesignator,
                &DiagnosticKind::UnknownComponent(TerminalRef::new("X1", "1")),
                &DiagnosticKind::UnknownTerminal(TerminalRef::new("R1", "3")),
            ]
        );

        let open = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Info)
            .map(|d| (d.designator.0.as_str(), &d.kind))
            .collect::<Vec<_>>();
        assert_eq!(
            open,
            [(
                "R1",
                &DiagnosticKind::UnconnectedTerminal("2".into())
            )]
        );
    }

    #[test]
    fn designator_prefix_must_fit_symbol() {
        let schematic: Schematic = serde_json::from_str(
            r#"{
                "name": "names",
                "components": [
                    {"id": "C5", "type": "resistor"},
                    {"id": "Vin", "type": "voltage_source"},
                    {"id": "LED2", "type": "led"},
                    {"id": "GND", "type": "ground"}
                ]
            }"#,
        )
        .unwrap();
        let mut diagnostics = Vec::new();
        check_schematic(&schematic, &mut diagnostics);
        let warnings = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .collect::<Vec<_>>();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].designator, Designator("C5".into()));
        assert_eq!(
            warnings[0].kind,
            DiagnosticKind::DesignatorMismatch(SymbolKind::Capacitor, SymbolKind::Resistor)
        );
    }
}
