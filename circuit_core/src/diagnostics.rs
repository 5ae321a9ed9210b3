use crate::Severity;
use log::{error, info, warn};
use serde::Serialize;
use spice_format::Designator;
use spice_format::passive_value::ValueParseWarning;
use spice_format::schematic::{SymbolKind, TerminalRef};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub designator: Designator,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnknownType(String),
    TooFewNodes(usize),
    ExtraNodes(usize),
    NoValue,
    NonStandardValue(ValueParseWarning),
    /// Value is not a plain quantity and was passed through verbatim.
    RawValue(String),
    Rejected(String),
    DuplicateDesignator,
    /// Designator prefix names one kind of part, the symbol is another.
    DesignatorMismatch(SymbolKind, SymbolKind),
    UnknownComponent(TerminalRef),
    UnknownTerminal(TerminalRef),
    UnconnectedTerminal(String),
}

impl Diagnostic {
    pub fn new(severity: Severity, designator: Designator, kind: DiagnosticKind) -> Self {
        Self {
            severity,
            designator,
            kind,
        }
    }

    pub fn log(&self) {
        match self.severity {
            Severity::Error => error!("{self}"),
            Severity::Warning => warn!("{self}"),
            Severity::Info => info!("{self}"),
        }
    }
}

impl Display for DiagnosticKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::UnknownType(ty) => write!(f, "unsupported component type \"{ty}\""),
            DiagnosticKind::TooFewNodes(n) => write!(f, "needs two nodes, got {n}"),
            DiagnosticKind::ExtraNodes(n) => write!(f, "{n} nodes given, only the first two used"),
            DiagnosticKind::NoValue => write!(f, "no value"),
            DiagnosticKind::NonStandardValue(w) => write!(f, "non-standard value notation: {w:?}"),
            DiagnosticKind::RawValue(v) => write!(f, "value \"{v}\" written as is"),
            DiagnosticKind::Rejected(reason) => write!(f, "{reason}"),
            DiagnosticKind::DuplicateDesignator => write!(f, "designator used more than once"),
            DiagnosticKind::DesignatorMismatch(named, symbol) => {
                write!(f, "designator suggests {named:?}, but the symbol is {symbol:?}")
            }
            DiagnosticKind::UnknownComponent(t) => write!(f, "wire to unknown component: {t}"),
            DiagnosticKind::UnknownTerminal(t) => write!(f, "wire to unknown terminal: {t}"),
            DiagnosticKind::UnconnectedTerminal(t) => write!(f, "terminal \"{t}\" is not connected"),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.designator, self.kind)
    }
}

pub fn log_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        diagnostic.log();
    }
}
