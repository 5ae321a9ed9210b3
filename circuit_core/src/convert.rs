use crate::Severity;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use spice_format::Designator;
use spice_format::description::CircuitDescription;
use spice_format::netlist::{ElementKind, NodeName};
use spice_format::schematic::{
    Connection, Polarity, Schematic, SchematicComponent, SymbolKind, TerminalRef,
};

const GROUND_ID: &str = "GND";

fn symbol_for(kind: ElementKind) -> SymbolKind {
    match kind {
        ElementKind::Resistor => SymbolKind::Resistor,
        ElementKind::Capacitor => SymbolKind::Capacitor,
        ElementKind::Inductor => SymbolKind::Inductor,
        ElementKind::VoltageSource => SymbolKind::VoltageSource,
        ElementKind::CurrentSource => SymbolKind::CurrentSource,
    }
}

/// Turns a node-based description into something the visualizer can draw.
///
/// Terminals on the same node are chained with wires in component order. Node 0 gets a
/// ground symbol at the end of its chain.
pub fn schematic_from_description(
    description: &CircuitDescription,
    diagnostics: &mut Vec<Diagnostic>,
) -> Schematic {
    let mut components: Vec<SchematicComponent> = Vec::new();
    let mut nets: Vec<(NodeName, Vec<TerminalRef>)> = Vec::new();

    for component in &description.components {
        let Some(kind) = ElementKind::from_type(&component.kind) else {
            diagnostics.push(Diagnostic::new(
                Severity::Error,
                Designator(format!("{}{}", component.kind.trim().to_uppercase(), component.id)),
                DiagnosticKind::UnknownType(component.kind.clone()),
            ));
            continue;
        };
        let id = kind.element_name(&component.id);
        if component.nodes.len() < 2 {
            diagnostics.push(Diagnostic::new(
                Severity::Error,
                id,
                DiagnosticKind::TooFewNodes(component.nodes.len()),
            ));
            continue;
        }
        if components.iter().any(|c| c.id.0.eq_ignore_ascii_case(&id.0)) {
            diagnostics.push(Diagnostic::new(
                Severity::Error,
                id,
                DiagnosticKind::DuplicateDesignator,
            ));
            continue;
        }

        let symbol = symbol_for(kind);
        for (node, terminal) in component.nodes.iter().zip(symbol.terminals()) {
            let node = NodeName::from_description(node);
            let terminal = TerminalRef::new(id.0.clone(), *terminal);
            match nets.iter_mut().find(|(name, _)| *name == node) {
                Some((_, terminals)) => terminals.push(terminal),
                None => nets.push((node, vec![terminal])),
            }
        }

        let polarity = match symbol {
            SymbolKind::VoltageSource | SymbolKind::CurrentSource => {
                if component.value.trim_start().to_uppercase().starts_with("AC") {
                    Some(Polarity::Ac)
                } else {
                    Some(Polarity::Dc)
                }
            }
            _ => None,
        };
        components.push(SchematicComponent {
            id,
            kind: symbol,
            value: component.value.clone(),
            polarity,
            transistor_type: None,
        });
    }

    if let Some((_, terminals)) = nets.iter_mut().find(|(name, _)| name.is_ground()) {
        terminals.push(TerminalRef::new(GROUND_ID, "terminal"));
        components.push(SchematicComponent {
            id: Designator(GROUND_ID.to_string()),
            kind: SymbolKind::Ground,
            value: String::new(),
            polarity: None,
            transistor_type: None,
        });
    }

    let connections = nets
        .iter()
        .flat_map(|(_, terminals)| {
            terminals.windows(2).map(|pair| Connection {
                from: pair[0].clone(),
                to: pair[1].clone(),
            })
        })
        .collect();

    Schematic {
        name: description.circuit_name.clone(),
        components,
        connections,
    }
}
