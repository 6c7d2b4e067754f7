//! Text cartridge containers.
//!
//! A `.p8` file is a header followed by line-delimited sections. Only the
//! `__lua__` section is reformatted; everything else passes through untouched.

use serde::Serialize;

use crate::errors::P8Error;

/// The line that opens the code section.
pub const CODE_MARKER: &str = "__lua__";

// ============================================================================
// ENCODING
// ============================================================================

/// How the input bytes were decoded. Output is encoded the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

impl TextEncoding {
    /// Decode `bytes` as UTF-8, falling back to Latin-1 when that fails.
    ///
    /// Latin-1 maps every byte to one char, so the fallback is lossless and
    /// cannot fail.
    pub fn decode(bytes: Vec<u8>) -> (String, TextEncoding) {
        match String::from_utf8(bytes) {
            Ok(text) => (text, TextEncoding::Utf8),
            Err(err) => {
                log::debug!(
                    "input is not valid UTF-8 ({}), decoding as Latin-1",
                    err.utf8_error()
                );
                let text = err.into_bytes().into_iter().map(char::from).collect();
                (text, TextEncoding::Latin1)
            }
        }
    }

    pub fn encode(self, text: &str) -> Result<Vec<u8>, P8Error> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Latin1 => text
                .chars()
                .map(|ch| u8::try_from(u32::from(ch)).map_err(|_| P8Error::Encode { ch }))
                .collect(),
        }
    }
}

// ============================================================================
// SPLITTING & REASSEMBLY
// ============================================================================

/// A text cart split around its code section.
///
/// `header + code + trailing` is exactly the original document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartDocument {
    /// Everything up to and including the `__lua__` line.
    pub header: String,
    /// The code section, including its final newline.
    pub code: String,
    /// The next section marker line and everything after it. May be empty.
    pub trailing: String,
}

impl CartDocument {
    /// Split `text` around its code section, or `None` if it has no `__lua__` line.
    pub fn split(text: &str) -> Option<CartDocument> {
        let mut lines = lines_with_offsets(text);

        let code_start = lines
            .by_ref()
            .find(|(_, line)| line_content(line) == CODE_MARKER)
            .map(|(offset, line)| offset + line.len())?;

        let code_end = lines
            .find(|(_, line)| is_section_marker(line))
            .map_or(text.len(), |(offset, _)| offset);

        log::debug!(
            "cart sections: header {} bytes, code {} bytes, trailing {} bytes",
            code_start,
            code_end - code_start,
            text.len() - code_end
        );

        Some(CartDocument {
            header: text[..code_start].to_string(),
            code: text[code_start..code_end].to_string(),
            trailing: text[code_end..].to_string(),
        })
    }

    /// Build the output document with `code` in place of the original code.
    pub fn reassemble(&self, code: &str) -> String {
        let mut out =
            String::with_capacity(self.header.len() + code.len() + self.trailing.len());
        out.push_str(&self.header);
        out.push_str(code);
        out.push_str(&self.trailing);
        out
    }
}

/// The code section of `text` alone, for code-only extraction.
pub fn extract_code(text: &str) -> Option<String> {
    CartDocument::split(text).map(|cart| cart.code)
}

/// What the output document contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutputMode {
    /// Header and trailing sections preserved around the formatted code.
    FullCart,
    /// Formatted code only.
    CodeOnly,
}

/// Reassemble the final document for `mode`. Bare code has no cart to wrap.
pub fn assemble(cart: Option<&CartDocument>, code: &str, mode: OutputMode) -> String {
    match (cart, mode) {
        (Some(cart), OutputMode::FullCart) => cart.reassemble(code),
        _ => code.to_string(),
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_inclusive('\n').scan(0, |offset, line| {
        let start = *offset;
        *offset += line.len();
        Some((start, line))
    })
}

fn line_content(line: &str) -> &str {
    line.trim_end_matches(|c| c == '\n' || c == '\r')
}

/// `__gfx__`, `__label__`, `__meta:title__` and friends.
fn is_section_marker(line: &str) -> bool {
    let content = line_content(line);
    content.len() > 4
        && content.starts_with("__")
        && content.ends_with("__")
        && !content.contains(char::is_whitespace)
}
