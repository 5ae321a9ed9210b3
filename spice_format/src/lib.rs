pub mod description;
pub mod netlist;
pub mod passive_value;
pub mod schematic;
pub mod text_util;

pub use description::{CircuitDescription, load_circuit_description, parse_circuit_description};
pub use netlist::Netlist;
pub use schematic::Schematic;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Reference designator of a component, e.g. R1, C12, LED1, GND.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Designator(pub String);

impl Designator {
    pub fn is_resistor(&self) -> bool {
        self.has_prefix("R")
    }

    pub fn is_capacitor(&self) -> bool {
        self.has_prefix("C")
    }

    pub fn is_inductor(&self) -> bool {
        self.has_prefix("L")
    }

    pub fn is_voltage_source(&self) -> bool {
        self.has_prefix("V")
    }

    pub fn is_current_source(&self) -> bool {
        self.has_prefix("I")
    }

    pub fn is_led(&self) -> bool {
        self.has_prefix("LED")
    }

    pub fn is_transistor(&self) -> bool {
        self.has_prefix("Q")
    }

    pub fn is_ground(&self) -> bool {
        self.0.eq_ignore_ascii_case("GND")
    }

    /// Prefix followed by a digit or nothing at all, so that "RST" is not taken for a resistor.
    fn has_prefix(&self, prefix: &str) -> bool {
        let upper = self.0.to_uppercase();
        match upper.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with(|c: char| c.is_ascii_digit()),
            None => false,
        }
    }
}

impl Display for Designator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Designator {
    fn from(value: &str) -> Self {
        Designator(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::Designator;

    #[test]
    fn designator_kinds() {
        assert!(Designator::from("R1").is_resistor());
        assert!(Designator::from("r12").is_resistor());
        assert!(!Designator::from("RST").is_resistor());
        assert!(Designator::from("LED1").is_led());
        assert!(!Designator::from("LED1").is_inductor());
        assert!(Designator::from("L3").is_inductor());
        assert!(Designator::from("Q1").is_transistor());
        assert!(Designator::from("gnd").is_ground());
        assert!(Designator::from("V").is_voltage_source());
    }
}
