use crate::Designator;
use crate::passive_value::{Quantity, Unit};
use anyhow::{Error, Result};
use itertools::Itertools;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// SPICE netlist: title card, element cards and raw control lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Netlist {
    pub title: String,
    pub elements: Vec<Element>,
    pub raw_spice: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub kind: ElementKind,
    pub name: Designator,
    /// Positive node first, SPICE order.
    pub nodes: [NodeName; 2],
    pub value: ElementValue,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, AsRefStr, EnumIter, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Resistor,
    Capacitor,
    Inductor,
    VoltageSource,
    CurrentSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    Quantity(Quantity),
    /// Written as is, e.g. `DC 5` or `SIN(0 1 1k)`.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeName(pub String);

impl ElementKind {
    pub fn prefix(&self) -> char {
        match self {
            ElementKind::Resistor => 'R',
            ElementKind::Capacitor => 'C',
            ElementKind::Inductor => 'L',
            ElementKind::VoltageSource => 'V',
            ElementKind::CurrentSource => 'I',
        }
    }

    pub fn unit(&self) -> Unit {
        match self {
            ElementKind::Resistor => Unit::Ohm,
            ElementKind::Capacitor => Unit::Farad,
            ElementKind::Inductor => Unit::Henry,
            ElementKind::VoltageSource => Unit::Volt,
            ElementKind::CurrentSource => Unit::Ampere,
        }
    }

    /// Accepts the SPICE prefix letter in any case ("R", "c") or the full name ("voltage source").
    pub fn from_type(ty: &str) -> Option<Self> {
        let ty = ty.trim().replace(&[' ', '-'][..], "_");
        let mut chars = ty.chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c.to_ascii_uppercase()),
            _ => None,
        };
        ElementKind::iter()
            .find(|kind| Some(kind.prefix()) == letter || ty.eq_ignore_ascii_case(kind.as_ref()))
    }

    /// Element name for a component id: the prefix letter is added unless the id already has it.
    pub fn element_name(&self, id: &str) -> Designator {
        let id = WHITESPACE.replace_all(id.trim(), "_");
        let starts_with_prefix = id
            .chars()
            .next()
            .is_some_and(|c| c.to_ascii_uppercase() == self.prefix());
        if starts_with_prefix {
            Designator(id.to_string())
        } else {
            Designator(format!("{}{id}", self.prefix()))
        }
    }
}

impl NodeName {
    pub fn ground() -> Self {
        NodeName("0".to_string())
    }

    pub fn is_ground(&self) -> bool {
        self.0 == "0"
    }

    /// Normalizes a node name: `gnd` and `ground` become node 0, whitespace becomes `_`.
    pub fn from_description(name: &str) -> Self {
        let name = name.trim();
        if name == "0" || name.eq_ignore_ascii_case("gnd") || name.eq_ignore_ascii_case("ground") {
            return Self::ground();
        }
        NodeName(WHITESPACE.replace_all(name, "_").to_string())
    }
}

impl Netlist {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            elements: Vec::new(),
            raw_spice: Vec::new(),
        }
    }

    pub fn add(
        &mut self,
        kind: ElementKind,
        id: &str,
        nodes: [NodeName; 2],
        value: ElementValue,
    ) -> Result<&Element> {
        if id.trim().is_empty() {
            return Err(Error::msg("Element id is empty"));
        }
        let name = kind.element_name(id);
        if self.element(&name.0).is_some() {
            return Err(Error::msg(format!("Duplicate element name: {name}")));
        }
        self.elements.push(Element {
            kind,
            name,
            nodes,
            value,
        });
        Ok(&self.elements[self.elements.len() - 1])
    }

    pub fn push_raw(&mut self, line: impl Into<String>) {
        self.raw_spice.push(line.into());
    }

    /// Element names are case-insensitive in SPICE.
    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements
            .iter()
            .find(|e| e.name.0.eq_ignore_ascii_case(name))
    }

    pub fn nodes(&self) -> BTreeSet<&NodeName> {
        self.elements.iter().flat_map(|e| e.nodes.iter()).collect()
    }
}

impl Display for ElementValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementValue::Quantity(q) => write!(f, "{}", q.to_spice()),
            ElementValue::Raw(raw) => write!(f, "{raw}"),
        }
    }
}

impl Display for NodeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.name,
            self.nodes.iter().join(" "),
            self.value
        )
    }
}

impl Display for Netlist {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, ".title {}", self.title)?;
        for element in &self.elements {
            writeln!(f, "{element}")?;
        }
        for line in &self.raw_spice {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
