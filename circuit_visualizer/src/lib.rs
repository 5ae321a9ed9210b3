#![warn(clippy::all, rust_2018_idioms)]

mod context;
mod parse;
pub mod prelude;
mod routes;

pub use context::{Context, ContextShared};
pub use parse::decode_circuit;
pub use routes::{ApiError, router};
