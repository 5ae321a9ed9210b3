use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::Severity;
use anyhow::{Context, Result};
use log::debug;
use regex::Regex;
use spice_format::description::{CircuitDescription, DEFAULT_CIRCUIT_NAME, DEFAULT_SIMULATION};
use spice_format::netlist::{ElementKind, ElementValue, Netlist, NodeName};
use spice_format::passive_value::parse_value;
use spice_format::Designator;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static FILE_NAME_UNSAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s").unwrap());

/// Maps a circuit description onto a SPICE netlist.
///
/// Components that cannot be expressed (unknown type, missing nodes or value, name clash) are
/// skipped and reported in `diagnostics`; the rest of the circuit is still built.
pub fn build_netlist(description: &CircuitDescription, diagnostics: &mut Vec<Diagnostic>) -> Netlist {
    let mut netlist = Netlist::new(circuit_title(&description.circuit_name));

    for component in &description.components {
        let Some(kind) = ElementKind::from_type(&component.kind) else {
            diagnostics.push(Diagnostic::new(
                Severity::Error,
                Designator(format!("{}{}", component.kind.trim().to_uppercase(), component.id)),
                DiagnosticKind::UnknownType(component.kind.clone()),
            ));
            continue;
        };
        let designator = kind.element_name(&component.id);

        let [n_plus, n_minus, rest @ ..] = component.nodes.as_slice() else {
            diagnostics.push(Diagnostic::new(
                Severity::Error,
                designator,
                DiagnosticKind::TooFewNodes(component.nodes.len()),
            ));
            continue;
        };
        if !rest.is_empty() {
            diagnostics.push(Diagnostic::new(
                Severity::Warning,
                designator.clone(),
                DiagnosticKind::ExtraNodes(component.nodes.len()),
            ));
        }

        let value = component.value.trim();
        if value.is_empty() {
            diagnostics.push(Diagnostic::new(
                Severity::Error,
                designator,
                DiagnosticKind::NoValue,
            ));
            continue;
        }
        let value = match parse_value(value, kind.unit()) {
            Ok((quantity, warning)) => {
                if let Some(w) = warning {
                    diagnostics.push(Diagnostic::new(
                        Severity::Warning,
                        designator.clone(),
                        DiagnosticKind::NonStandardValue(w),
                    ));
                }
                ElementValue::Quantity(quantity)
            }
            Err(e) => {
                debug!("{designator}: {value:?} is not a plain quantity: {e}");
                // DC/AC/SIN(...) values are normal for sources
                let severity = match kind {
                    ElementKind::VoltageSource | ElementKind::CurrentSource => Severity::Info,
                    _ => Severity::Warning,
                };
                diagnostics.push(Diagnostic::new(
                    severity,
                    designator.clone(),
                    DiagnosticKind::RawValue(value.to_string()),
                ));
                ElementValue::Raw(value.to_string())
            }
        };

        let nodes = [
            NodeName::from_description(n_plus),
            NodeName::from_description(n_minus),
        ];
        if let Err(e) = netlist.add(kind, &component.id, nodes, value) {
            diagnostics.push(Diagnostic::new(
                Severity::Error,
                designator,
                DiagnosticKind::Rejected(e.to_string()),
            ));
        }
    }

    let simulation = match description.simulation.trim() {
        "" => DEFAULT_SIMULATION,
        s => s,
    };
    for line in simulation.lines().map(str::trim).filter(|l| !l.is_empty()) {
        netlist.push_raw(line);
    }
    if !netlist
        .raw_spice
        .last()
        .is_some_and(|l| l.eq_ignore_ascii_case(".end"))
    {
        netlist.push_raw(".end");
    }
    netlist
}

/// Circuit names become the netlist title with every whitespace character replaced by an underscore.
pub fn circuit_title(name: &str) -> String {
    match name.trim() {
        "" => DEFAULT_CIRCUIT_NAME.to_string(),
        name => WHITESPACE.replace_all(name, "_").to_string(),
    }
}

fn file_stem(title: &str) -> String {
    let stem = FILE_NAME_UNSAFE.replace_all(title, "_");
    if stem.is_empty() {
        DEFAULT_CIRCUIT_NAME.to_string()
    } else {
        stem.to_string()
    }
}

/// Writes `<title>.cir` into `target_folder`, creating it if necessary, and returns the absolute path.
pub fn save_netlist(netlist: &Netlist, target_folder: &Path) -> Result<PathBuf> {
    fs::create_dir_all(target_folder)
        .with_context(|| format!("Failed to create output folder {target_folder:?}"))?;
    let path = target_folder.join(format!("{}.cir", file_stem(&netlist.title)));
    fs::write(&path, netlist.to_string())
        .with_context(|| format!("Failed to write netlist to {path:?}"))?;
    Ok(std::path::absolute(&path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spice_format::parse_circuit_description;

    fn build(json: &str) -> (Netlist, Vec<Diagnostic>) {
        let description = parse_circuit_description(json).unwrap();
        let mut diagnostics = Vec::new();
        let netlist = build_netlist(&description, &mut diagnostics);
        (netlist, diagnostics)
    }

    #[test]
    fn builds_rc_lowpass() {
        let (netlist, diagnostics) = build(
            r#"{
                "circuit_name": "RC Low Pass",
                "components": [
                    {"type": "V", "id": "1", "nodes": ["in", "0"], "value": "AC 1"},
                    {"type": "R", "id": "1", "nodes": ["in", "out"], "value": "1kΩ"},
                    {"type": "C", "id": "C1", "nodes": ["out", "GND"], "value": "100nF"}
                ],
                "simulation": ".ac dec 10 1 100k"
            }"#,
        );
        assert_eq!(
            netlist.to_string(),
            ".title RC_Low_Pass\nV1 in 0 AC 1\nR1 in out 1k\nC1 out 0 100n\n.ac dec 10 1 100k\n.end\n"
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Info);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::RawValue("AC 1".into()));
    }

    #[test]
    fn skips_what_cannot_be_built() {
        let (netlist, diagnostics) = build(
            r#"{
                "components": [
                    {"type": "D", "id": "1", "nodes": ["a", "b"], "value": "1N4148"},
                    {"type": "R", "id": "1", "nodes": ["a"], "value": "1k"},
                    {"type": "R", "id": "2", "nodes": ["a", "b", "c"], "value": "2k2"},
                    {"type": "R", "id": "R2", "nodes": ["b", "0"], "value": "1k"},
                    {"type": "L", "id": "1", "nodes": ["b", "0"], "value": ""},
                    {"type": "C", "id": "1", "nodes": ["b", "0"], "value": "9V"}
                ]
            }"#,
        );
        assert_eq!(netlist.title, "Design");
        assert_eq!(netlist.elements.len(), 2);
        assert_eq!(netlist.elements[0].to_string(), "R2 a b 2.2k");
        assert_eq!(netlist.elements[1].to_string(), "C1 b 0 9V");
        assert_eq!(netlist.raw_spice, [".op", ".end"]);

        let kinds = diagnostics.iter().map(|d| &d.kind).collect::<Vec<_>>();
        assert!(matches!(kinds[0], DiagnosticKind::UnknownType(t) if t == "D"));
        assert!(matches!(kinds[1], DiagnosticKind::TooFewNodes(1)));
        assert!(matches!(kinds[2], DiagnosticKind::ExtraNodes(3)));
        assert!(matches!(kinds[3], DiagnosticKind::Rejected(_)));
        assert!(matches!(kinds[4], DiagnosticKind::NoValue));
        assert!(matches!(kinds[5], DiagnosticKind::RawValue(v) if v == "9V"));
        assert_eq!(diagnostics[5].severity, Severity::Warning);
    }

    #[test]
    fn does_not_duplicate_end() {
        let (netlist, _) = build(
            r#"{"circuit_name": "t", "components": [], "simulation": ".tran 1u 1m\n.END"}"#,
        );
        assert_eq!(netlist.raw_spice, [".tran 1u 1m", ".END"]);

        let (netlist, _) = build(
            r#"{"circuit_name": "t", "components": [], "simulation": ".end\n.tran 1u 1m"}"#,
        );
        assert_eq!(netlist.raw_spice, [".end", ".tran 1u 1m", ".end"]);
    }

    #[test]
    fn title_stays_on_one_line() {
        assert_eq!(circuit_title("  Band\nPass\tFilter  x "), "Band_Pass_Filter__x");
        assert_eq!(circuit_title(" \n "), "Design");

        let (netlist, _) = build(
            r#"{"circuit_name": "Two\nLines", "components": [], "simulation": ".op"}"#,
        );
        assert_eq!(netlist.to_string().lines().next(), Some(".title Two_Lines"));
    }

    #[test]
    fn overflowing_exponent_is_written_raw() {
        let (netlist, diagnostics) = build(
            r#"{"components": [{"type": "R", "id": "1", "nodes": ["a", "0"], "value": "1e2147483647k"}]}"#,
        );
        assert_eq!(netlist.elements[0].to_string(), "R1 a 0 1e2147483647k");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert!(matches!(&diagnostics[0].kind, DiagnosticKind::RawValue(v) if v == "1e2147483647k"));
    }

    #[test]
    fn saves_netlist_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("generated_circuits");
        let mut netlist = Netlist::new(circuit_title("My Filter/../x"));
        netlist.push_raw(".end");
        let path = save_netlist(&netlist, &target).unwrap();
        assert!(path.is_absolute());
        assert_eq!(path.parent().unwrap(), target.as_path());
        assert_eq!(path.file_name().unwrap(), "My_Filter_.._x.cir");
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, ".title My_Filter/../x\n.end\n");
    }
}
