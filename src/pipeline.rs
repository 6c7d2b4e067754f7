//! The formatting pipeline.
//!
//! input file → (image carts: converter) → section split → parse → render →
//! reassemble → output. Every stage reports a [`P8Error`] and the first failure
//! ends the run; nothing is written until the formatted document is complete.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use miette::NamedSource;

use crate::{
    bridge::{CartConverter, ExternalConverter},
    cart::{self, CartDocument, OutputMode, TextEncoding},
    errors::{P8Error, ParseError, SourceContext},
    render::render_chunk,
    syntax::{parser, Chunk},
};

// ============================================================================
// INPUT CLASSIFICATION
// ============================================================================

/// What kind of document a path names, judged by its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// `*.p8.png`
    ImageCart,
    /// `*.p8`
    TextCart,
    /// `*.lua`
    BareCode,
    /// Anything else: a cart if it has a `__lua__` line, bare code otherwise.
    Unknown,
}

impl InputKind {
    pub fn from_path(path: &Path) -> Self {
        let name = file_name(path).to_ascii_lowercase();
        if name.ends_with(".p8.png") {
            InputKind::ImageCart
        } else if name.ends_with(".p8") {
            InputKind::TextCart
        } else if name.ends_with(".lua") {
            InputKind::BareCode
        } else {
            InputKind::Unknown
        }
    }
}

/// A decoded input document, split into sections when it is a cart.
#[derive(Debug, Clone)]
pub struct LoadedInput {
    pub path: PathBuf,
    pub kind: InputKind,
    pub encoding: TextEncoding,
    /// The whole decoded document.
    pub text: String,
    /// `None` for bare code.
    pub cart: Option<CartDocument>,
}

impl LoadedInput {
    /// The code text to format.
    pub fn code(&self) -> &str {
        match &self.cart {
            Some(cart) => &cart.code,
            None => &self.text,
        }
    }

    /// The output mode actually used: bare code can only produce code.
    pub fn effective_mode(&self, requested: OutputMode) -> OutputMode {
        match self.cart {
            Some(_) => requested,
            None => OutputMode::CodeOnly,
        }
    }

    /// The part of the input that an output in `mode` replaces.
    pub fn original(&self, mode: OutputMode) -> &str {
        match self.effective_mode(mode) {
            OutputMode::FullCart => &self.text,
            OutputMode::CodeOnly => self.code(),
        }
    }
}

/// A finished output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub text: String,
    pub mode: OutputMode,
    pub encoding: TextEncoding,
}

impl Formatted {
    /// The output bytes, in the input's encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, P8Error> {
        self.encoding.encode(&self.text)
    }
}

// ============================================================================
// RUN OPTIONS & OUTCOMES
// ============================================================================

/// Settings for one [`Pipeline::run`].
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub lua_only: bool,
    pub to_stdout: bool,
    pub check: bool,
    pub ast: bool,
}

impl Options {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    pub fn mode(&self) -> OutputMode {
        if self.lua_only {
            OutputMode::CodeOnly
        } else {
            OutputMode::FullCart
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Written { path: PathBuf, mode: OutputMode },
    /// Text for standard output (`--stdout`, `--ast`).
    Printed(String),
    /// `--check`: the replaced part of the input next to its formatted form.
    Checked {
        path: PathBuf,
        original: String,
        formatted: String,
    },
}

impl RunOutcome {
    /// For `Checked`, whether the input was already canonical.
    pub fn is_clean(&self) -> bool {
        match self {
            RunOutcome::Checked {
                original,
                formatted,
                ..
            } => original == formatted,
            _ => true,
        }
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Single-threaded formatter for one document per call. Holds no state
/// between calls beyond the image-cart converter.
pub struct Pipeline {
    converter: Box<dyn CartConverter>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(ExternalConverter::locate(None))
    }
}

impl Pipeline {
    pub fn new(converter: impl CartConverter + 'static) -> Self {
        Self {
            converter: Box::new(converter),
        }
    }

    /// Read and decode `path`, splitting out the code section.
    pub fn load(&self, path: &Path) -> Result<LoadedInput, P8Error> {
        let kind = InputKind::from_path(path);
        fs::metadata(path).map_err(|source| P8Error::Input {
            path: path.to_path_buf(),
            source,
        })?;

        let bytes = match kind {
            InputKind::ImageCart => self.converter.convert(path)?,
            _ => fs::read(path).map_err(|source| P8Error::Input {
                path: path.to_path_buf(),
                source,
            })?,
        };
        let (text, encoding) = TextEncoding::decode(bytes);

        let cart = match kind {
            InputKind::ImageCart | InputKind::TextCart => {
                let cart = CartDocument::split(&text).ok_or_else(|| P8Error::Section {
                    path: path.to_path_buf(),
                })?;
                Some(cart)
            }
            InputKind::BareCode => None,
            InputKind::Unknown => CartDocument::split(&text),
        };

        log::debug!(
            "loaded {} as {:?} ({:?}, {})",
            path.display(),
            kind,
            encoding,
            if cart.is_some() { "cart" } else { "bare code" }
        );

        Ok(LoadedInput {
            path: path.to_path_buf(),
            kind,
            encoding,
            text,
            cart,
        })
    }

    /// Parse the input's code section. Error locations refer to the whole file.
    pub fn parse(&self, input: &LoadedInput) -> Result<Chunk, P8Error> {
        let source = SourceContext::from_file(input.path.display().to_string(), input.code());
        parser::parse_source(&source).map_err(|error| relocate(error, input).into())
    }

    /// Format the input into its output document for `mode`.
    pub fn format_document(
        &self,
        input: &LoadedInput,
        mode: OutputMode,
    ) -> Result<Formatted, P8Error> {
        let chunk = self.parse(input)?;
        let code = render_chunk(&chunk);
        let mode = input.effective_mode(mode);

        Ok(Formatted {
            text: cart::assemble(input.cart.as_ref(), &code, mode),
            mode,
            encoding: input.encoding,
        })
    }

    /// Run one invocation end to end.
    pub fn run(&self, options: &Options) -> Result<RunOutcome, P8Error> {
        let writes_file = !(options.ast || options.check || options.to_stdout);
        let explicit_target = options.output.clone();

        let input = self.load(&options.input)?;

        if options.ast {
            let chunk = self.parse(&input)?;
            let mut json = serde_json::to_string_pretty(&chunk)?;
            json.push('\n');
            return Ok(RunOutcome::Printed(json));
        }

        let mode = input.effective_mode(options.mode());
        let target = match (writes_file, explicit_target) {
            (false, _) => None,
            (true, Some(path)) => Some(path),
            (true, None) => Some(default_output(&input.path, mode)?),
        };

        let formatted = self.format_document(&input, mode)?;

        if options.check {
            return Ok(RunOutcome::Checked {
                path: input.path.clone(),
                original: input.original(mode).to_string(),
                formatted: formatted.text,
            });
        }

        match target {
            Some(path) => {
                write_atomic(&path, &formatted.to_bytes()?)?;
                log::info!("wrote {} ({:?})", path.display(), formatted.mode);
                Ok(RunOutcome::Written {
                    path,
                    mode: formatted.mode,
                })
            }
            None => Ok(RunOutcome::Printed(formatted.text)),
        }
    }
}

/// Parse and render bare code text.
pub fn format_code(code: &str) -> Result<String, P8Error> {
    let chunk = parser::parse(code)?;
    Ok(render_chunk(&chunk))
}

/// The output path used when none is given.
///
/// Refuses paths that would overwrite the input.
pub fn default_output(input: &Path, mode: OutputMode) -> Result<PathBuf, P8Error> {
    let name = file_name(input);
    let lower = name.to_ascii_lowercase();
    let stem = |suffix: &str| name[..name.len() - suffix.len()].to_string();

    let new_name = match mode {
        OutputMode::CodeOnly if lower.ends_with(".p8.png") => format!("{}.lua", stem(".p8.png")),
        OutputMode::CodeOnly if lower.ends_with(".p8") => format!("{}.lua", stem(".p8")),
        OutputMode::CodeOnly if lower.ends_with(".lua") => {
            return Err(P8Error::OverwriteRefused {
                path: input.to_path_buf(),
            })
        }
        OutputMode::CodeOnly => format!("{name}.lua"),
        OutputMode::FullCart if lower.ends_with(".p8.png") => stem(".png"),
        OutputMode::FullCart if lower.ends_with(".p8") => {
            return Err(P8Error::OverwriteRefused {
                path: input.to_path_buf(),
            })
        }
        OutputMode::FullCart => format!("{name}.p8"),
    };

    Ok(input.with_file_name(new_name))
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Shift a code-relative parse error so it points into the whole document.
fn relocate(mut error: ParseError, input: &LoadedInput) -> ParseError {
    if let Some(cart) = &input.cart {
        let offset = cart.header.len();
        error.span = (error.span.offset() + offset, error.span.len()).into();
        error.line += cart.header.matches('\n').count();
    }
    error.src = NamedSource::new(input.path.display().to_string(), input.text.clone());
    error
}

/// Write through a temporary file in the destination directory so a failed
/// write never leaves a partial output behind.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), P8Error> {
    let output_error = |source| P8Error::Output {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(output_error)?;
    staged.write_all(bytes).map_err(output_error)?;
    staged.flush().map_err(output_error)?;
    staged
        .persist(path)
        .map_err(|err| output_error(err.error))?;
    Ok(())
}
