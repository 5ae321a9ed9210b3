use crate::config::{
    BOTTOM_MARGIN, CANVAS_HEIGHT, CANVAS_WIDTH, COMPONENT_SPACING, LAYER_SPACING, START_X, START_Y,
};
use serde::Serialize;
use spice_format::Designator;
use spice_format::schematic::{Schematic, SymbolKind};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub layers: Vec<Vec<Designator>>,
    pub positions: BTreeMap<Designator, Position>,
}

/// Splits components into rows by following wires breadth-first, starting from the voltage sources.
///
/// Wires are followed from their `from` end to their `to` end only. When the walk gets stuck,
/// everything not placed yet goes into one last row, in component order.
pub fn layer_components(schematic: &Schematic) -> Vec<Vec<Designator>> {
    let known: HashSet<&Designator> = schematic.components.iter().map(|c| &c.id).collect();
    let mut placed: HashSet<&Designator> = HashSet::new();
    let mut layers: Vec<Vec<&Designator>> = Vec::new();

    let sources = schematic
        .components
        .iter()
        .filter(|c| c.kind == SymbolKind::VoltageSource)
        .filter_map(|c| placed.insert(&c.id).then_some(&c.id))
        .collect::<Vec<_>>();
    if !sources.is_empty() {
        layers.push(sources);
    }

    let mut frontier = layers.first().cloned().unwrap_or_default();
    while placed.len() < known.len() {
        let mut next = Vec::new();
        for id in &frontier {
            for connection in &schematic.connections {
                let to = &connection.to.designator;
                if &connection.from.designator == *id && known.contains(to) && placed.insert(to) {
                    next.push(to);
                }
            }
        }
        if next.is_empty() {
            for component in &schematic.components {
                if placed.insert(&component.id) {
                    next.push(&component.id);
                }
            }
        }
        frontier = next.clone();
        layers.push(next);
    }

    layers
        .into_iter()
        .map(|layer| layer.into_iter().cloned().collect())
        .collect()
}

pub fn calculate_layout(schematic: &Schematic, canvas: Canvas) -> Layout {
    let layers = layer_components(schematic);

    let available = canvas.height - BOTTOM_MARGIN - START_Y;
    let layer_spacing = if layers.len() > 1 {
        LAYER_SPACING.min(available / (layers.len() - 1) as f64)
    } else {
        LAYER_SPACING
    };

    let mut positions = BTreeMap::new();
    for (layer_idx, layer) in layers.iter().enumerate() {
        let y = START_Y + layer_idx as f64 * layer_spacing;
        let centering = (canvas.width - layer.len() as f64 * COMPONENT_SPACING) / 2.0;
        for (idx, id) in layer.iter().enumerate() {
            let x = START_X + idx as f64 * COMPONENT_SPACING + centering;
            positions.insert(id.clone(), Position { x, y });
        }
    }

    Layout { layers, positions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::load_fixtures;
    use spice_format::schematic::{Connection, SchematicComponent, TerminalRef};

    fn fixture(id: &str) -> Schematic {
        load_fixtures()
            .unwrap()
            .into_iter()
            .find(|f| f.id == id)
            .unwrap()
            .schematic
    }

    fn ids(layers: &[Vec<Designator>]) -> Vec<Vec<&str>> {
        layers
            .iter()
            .map(|l| l.iter().map(|d| d.0.as_str()).collect())
            .collect()
    }

    fn component(id: &str, kind: SymbolKind) -> SchematicComponent {
        SchematicComponent {
            id: Designator(id.into()),
            kind,
            value: String::new(),
            polarity: None,
            transistor_type: None,
        }
    }

    #[test]
    fn layers_follow_wires_from_sources() {
        let layers = layer_components(&fixture("voltage_divider"));
        assert_eq!(ids(&layers), [vec!["V1"], vec!["R1"], vec!["R2"], vec!["GND"]]);

        let layers = layer_components(&fixture("transistor_switch"));
        assert_eq!(
            ids(&layers),
            [vec!["V1"], vec!["R1"], vec!["LED1"], vec!["Q1"], vec!["R2"]]
        );
    }

    #[test]
    fn stuck_walk_places_the_rest_together() {
        let schematic = Schematic {
            name: "no source".into(),
            components: vec![
                component("R1", SymbolKind::Resistor),
                component("R2", SymbolKind::Resistor),
            ],
            connections: vec![Connection {
                from: TerminalRef::new("R1", "2"),
                to: TerminalRef::new("X9", "1"),
            }],
        };
        assert_eq!(ids(&layer_components(&schematic)), [vec!["R1", "R2"]]);

        let empty = Schematic {
            name: "empty".into(),
            components: vec![],
            connections: vec![],
        };
        assert!(layer_components(&empty).is_empty());
    }

    #[test]
    fn positions_are_centered_and_fit_the_canvas() {
        let layout = calculate_layout(&fixture("simple_led"), Canvas::default());
        assert_eq!(
            layout.positions[&Designator("V1".into())],
            Position { x: 625.0, y: 150.0 }
        );
        assert_eq!(
            layout.positions[&Designator("LED1".into())],
            Position { x: 625.0, y: 550.0 }
        );

        let layout = calculate_layout(&fixture("transistor_switch"), Canvas::default());
        let bottom = layout.positions[&Designator("R2".into())].y;
        assert_eq!(bottom, CANVAS_HEIGHT - BOTTOM_MARGIN);

        let two_in_a_row = Schematic {
            name: "pair".into(),
            components: vec![
                component("R1", SymbolKind::Resistor),
                component("R2", SymbolKind::Resistor),
            ],
            connections: vec![],
        };
        let layout = calculate_layout(&two_in_a_row, Canvas::default());
        assert_eq!(layout.positions[&Designator("R1".into())].x, 550.0);
        assert_eq!(layout.positions[&Designator("R2".into())].x, 700.0);
    }
}
