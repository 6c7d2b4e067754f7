pub use crate::errors::{ErrorCategory, P8Error, ParseError};
pub use crate::pipeline::{format_code, Options, Pipeline, RunOutcome};

pub mod bridge;
pub mod cart;
pub mod cli;
pub mod errors;
pub mod pipeline;
pub mod render;
pub mod syntax;
