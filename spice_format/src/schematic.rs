use crate::Designator;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Circuit as drawn by the web page: symbols plus terminal-to-terminal wires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schematic {
    pub name: String,
    pub components: Vec<SchematicComponent>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchematicComponent {
    pub id: Designator,
    #[serde(rename = "type")]
    pub kind: SymbolKind,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polarity: Option<Polarity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transistor_type: Option<TransistorType>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    VoltageSource,
    CurrentSource,
    Resistor,
    Capacitor,
    Inductor,
    Led,
    Transistor,
    Ground,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Dc,
    Ac,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransistorType {
    Npn,
    Pnp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: TerminalRef,
    pub to: TerminalRef,
}

/// `<designator>.<terminal>`, e.g. `V1.positive` or `R1.2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TerminalRef {
    pub designator: Designator,
    pub terminal: String,
}

impl SymbolKind {
    pub fn terminals(&self) -> &'static [&'static str] {
        match self {
            SymbolKind::VoltageSource | SymbolKind::CurrentSource => &["positive", "negative"],
            SymbolKind::Resistor | SymbolKind::Capacitor | SymbolKind::Inductor => &["1", "2"],
            SymbolKind::Led => &["anode", "cathode"],
            SymbolKind::Transistor => &["base", "collector", "emitter"],
            SymbolKind::Ground => &["terminal"],
        }
    }

    pub fn has_terminal(&self, terminal: &str) -> bool {
        self.terminals().contains(&terminal)
    }
}

impl Schematic {
    pub fn component(&self, designator: &Designator) -> Option<&SchematicComponent> {
        self.components.iter().find(|c| &c.id == designator)
    }
}

impl TerminalRef {
    pub fn new(designator: impl Into<String>, terminal: impl Into<String>) -> Self {
        Self {
            designator: Designator(designator.into()),
            terminal: terminal.into(),
        }
    }
}

impl FromStr for TerminalRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((designator, terminal)) = s.split_once('.') else {
            return Err(Error::msg(format!(
                "Terminal reference \"{s}\" is not in <component>.<terminal> form"
            )));
        };
        if designator.is_empty() || terminal.is_empty() {
            return Err(Error::msg(format!("Incomplete terminal reference \"{s}\"")));
        }
        Ok(TerminalRef::new(designator, terminal))
    }
}

impl TryFrom<String> for TerminalRef {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TerminalRef> for String {
    fn from(value: TerminalRef) -> Self {
        value.to_string()
    }
}

impl Display for TerminalRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.designator, self.terminal)
    }
}
