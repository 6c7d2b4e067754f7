//! Image-cart conversion.
//!
//! `.p8.png` carts are decoded by the external `png_to_p8` tool, which writes
//! an equivalent text cart. The pipeline only sees the [`CartConverter`] trait.

use std::{
    env, fs,
    path::{Path, PathBuf},
    process::Command,
};

use crate::errors::BridgeError;

/// Turns an image cart into the bytes of an equivalent text cart.
pub trait CartConverter {
    fn convert(&self, image: &Path) -> Result<Vec<u8>, BridgeError>;
}

/// Runs `png_to_p8 <input.p8.png> <output.p8>` as a subordinate process.
#[derive(Debug, Clone)]
pub struct ExternalConverter {
    program: PathBuf,
}

impl ExternalConverter {
    pub const TOOL_NAME: &'static str = "png_to_p8";

    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Pick the converter: `explicit` if given, else a `png_to_p8` next to the
    /// running executable, else `png_to_p8` from `PATH`.
    pub fn locate(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::new(path);
        }

        let tool = format!("{}{}", Self::TOOL_NAME, env::consts::EXE_SUFFIX);
        let sibling = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(&tool)))
            .filter(|candidate| candidate.is_file());

        match sibling {
            Some(path) => Self::new(path),
            None => Self::new(tool),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl CartConverter for ExternalConverter {
    fn convert(&self, image: &Path) -> Result<Vec<u8>, BridgeError> {
        // Removed when `staged` drops, on success and failure alike.
        let staged = tempfile::Builder::new()
            .prefix("p8pretty-")
            .suffix(".p8")
            .tempfile()
            .map_err(|source| BridgeError::Staging { source })?;

        log::debug!(
            "converting {} with {}",
            image.display(),
            self.program.display()
        );

        let output = Command::new(&self.program)
            .arg(image)
            .arg(staged.path())
            .output()
            .map_err(|source| BridgeError::Unavailable {
                tool: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(BridgeError::Failed {
                input: image.to_path_buf(),
                status: output.status.to_string(),
                stderr: (!stderr.is_empty()).then_some(stderr),
            });
        }

        fs::read(staged.path()).map_err(|source| BridgeError::Staging { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let converter = ExternalConverter::locate(Some(Path::new("/opt/tools/png_to_p8")));
        assert_eq!(converter.program(), Path::new("/opt/tools/png_to_p8"));
    }

    #[test]
    fn missing_tool_is_unavailable() {
        let converter = ExternalConverter::new("/nonexistent/p8pretty/png_to_p8");
        let err = converter.convert(Path::new("cart.p8.png")).unwrap_err();
        assert!(matches!(err, BridgeError::Unavailable { .. }));
    }

    // `sh <image> <output>` runs the "image" as a script that writes to `$1`.
    #[cfg(unix)]
    #[test]
    fn runs_tool_and_reads_its_output() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("cart.p8.png");
        fs::write(&image, "printf '__lua__\\nx=1\\n' > \"$1\"\n").unwrap();

        let bytes = ExternalConverter::new("/bin/sh").convert(&image).unwrap();
        assert_eq!(bytes, b"__lua__\nx=1\n");
    }

    #[cfg(unix)]
    #[test]
    fn failing_tool_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("cart.p8.png");
        fs::write(&image, "echo 'bad png' >&2\nexit 3\n").unwrap();

        let err = ExternalConverter::new("/bin/sh").convert(&image).unwrap_err();
        match err {
            BridgeError::Failed { stderr, .. } => assert_eq!(stderr.as_deref(), Some("bad png")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
