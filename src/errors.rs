//! p8pretty error handling
//!
//! Every failure in the pipeline is a [`P8Error`]. Each variant maps onto one
//! [`ErrorCategory`] and renders as a `miette` diagnostic with a stable code.

use std::{fmt, io, path::PathBuf};

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// SOURCE CONTEXT
// ============================================================================

/// Named code text handed to the parser so diagnostics can point into it.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Convert to NamedSource for use with miette error reporting
    pub fn to_named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.content.clone())
    }
}

// ============================================================================
// ERROR TYPES
// ============================================================================

/// The pipeline error. Detected where it happens, never retried.
#[derive(Debug, Error, Diagnostic)]
pub enum P8Error {
    #[error("cannot read {}", path.display())]
    #[diagnostic(code(p8pretty::input))]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not find a __lua__ section in {}", path.display())]
    #[diagnostic(
        code(p8pretty::section),
        help("a text cart starts its code with a line reading `__lua__`")
    )]
    Section { path: PathBuf },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error("cannot write {}", path.display())]
    #[diagnostic(code(p8pretty::output))]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("refusing to overwrite the input: default output would be {}", path.display())]
    #[diagnostic(
        code(p8pretty::output),
        help("pass an explicit OUTPUT path, or use --stdout")
    )]
    OverwriteRefused { path: PathBuf },

    #[error("formatted code contains {ch:?}, which the input's Latin-1 encoding cannot represent")]
    #[diagnostic(code(p8pretty::output))]
    Encode { ch: char },

    #[error("cannot serialize the syntax tree")]
    #[diagnostic(code(p8pretty::output))]
    Serialize(#[from] serde_json::Error),
}

/// A syntax error in the code text. Fatal for the run.
#[derive(Debug, Error, Diagnostic)]
#[error("parse error at line {line}, column {column}: {message}")]
#[diagnostic(code(p8pretty::parse))]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("{label}")]
    pub span: SourceSpan,
    pub label: String,
}

/// Failures of the image-cart converter.
#[derive(Debug, Error, Diagnostic)]
pub enum BridgeError {
    #[error("image cart converter is not available: {}", tool.display())]
    #[diagnostic(
        code(p8pretty::bridge),
        help("build the png_to_p8 tool, or point --png-to-p8 at it")
    )]
    Unavailable {
        tool: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("converting {} failed ({status})", input.display())]
    #[diagnostic(code(p8pretty::bridge))]
    Failed {
        input: PathBuf,
        status: String,
        #[help]
        stderr: Option<String>,
    },

    #[error("could not stage the converted cart")]
    #[diagnostic(code(p8pretty::bridge))]
    Staging {
        #[source]
        source: io::Error,
    },
}

// ============================================================================
// CATEGORIES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Input,
    Section,
    Bridge,
    Parse,
    Output,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCategory::Input => "input",
            ErrorCategory::Section => "section",
            ErrorCategory::Bridge => "bridge",
            ErrorCategory::Parse => "parse",
            ErrorCategory::Output => "output",
        };
        f.write_str(name)
    }
}

impl P8Error {
    /// Get the error category for test assertions
    pub fn category(&self) -> ErrorCategory {
        match self {
            P8Error::Input { .. } => ErrorCategory::Input,
            P8Error::Section { .. } => ErrorCategory::Section,
            P8Error::Bridge(_) => ErrorCategory::Bridge,
            P8Error::Parse(_) => ErrorCategory::Parse,
            P8Error::Output { .. }
            | P8Error::OverwriteRefused { .. }
            | P8Error::Encode { .. }
            | P8Error::Serialize(_) => ErrorCategory::Output,
        }
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints an error with full miette diagnostics to stderr.
pub fn print_error(error: P8Error) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}
