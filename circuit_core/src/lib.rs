pub mod checks;
pub mod config;
pub mod convert;
pub mod diagnostics;
pub mod fixtures;
pub mod layout;
pub mod spice_export;

pub use diagnostics::{Diagnostic, DiagnosticKind};

use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}
