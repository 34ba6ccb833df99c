//! System preamble loading.
//!
//! The preamble is read once at startup and handed to the
//! [`PromptAssembler`](telcard_domain::PromptAssembler).

use std::path::{Path, PathBuf};
use telcard_domain::PromptTemplate;
use thiserror::Error;
use tracing::{debug, info};

/// Preamble file looked up when none is configured
pub const DEFAULT_PREAMBLE_PATH: &str = "prompts/static_prompt.txt";

#[derive(Error, Debug)]
pub enum PreambleError {
    #[error("Failed to read preamble {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Preamble file {0} is empty")]
    Empty(PathBuf),
}

/// Where the loaded preamble came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreambleSource {
    File(PathBuf),
    BuiltIn,
}

/// A loaded system preamble
#[derive(Debug, Clone)]
pub struct Preamble {
    pub text: String,
    pub source: PreambleSource,
}

pub struct PreambleLoader;

impl PreambleLoader {
    /// Load the preamble.
    ///
    /// An explicitly configured path must exist and be non-empty. Without
    /// one, [`DEFAULT_PREAMBLE_PATH`] is tried and the built-in preamble is
    /// used if that file is absent.
    pub fn load(configured: Option<&Path>) -> Result<Preamble, PreambleError> {
        match configured {
            Some(path) => Self::load_file(path),
            None => {
                let default_path = Path::new(DEFAULT_PREAMBLE_PATH);
                if default_path.exists() {
                    Self::load_file(default_path)
                } else {
                    debug!("No preamble file at {}, using built-in", DEFAULT_PREAMBLE_PATH);
                    Ok(Self::built_in())
                }
            }
        }
    }

    pub fn built_in() -> Preamble {
        Preamble {
            text: PromptTemplate::default_preamble().to_string(),
            source: PreambleSource::BuiltIn,
        }
    }

    fn load_file(path: &Path) -> Result<Preamble, PreambleError> {
        let text = std::fs::read_to_string(path).map_err(|source| PreambleError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if text.trim().is_empty() {
            return Err(PreambleError::Empty(path.to_path_buf()));
        }

        info!(path = %path.display(), bytes = text.len(), "Loaded system preamble");
        Ok(Preamble {
            text,
            source: PreambleSource::File(path.to_path_buf()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preamble.txt");
        std::fs::write(&path, "You are a RAN expert.\n").unwrap();

        let preamble = PreambleLoader::load(Some(path.as_path())).unwrap();
        assert_eq!(preamble.text, "You are a RAN expert.\n");
        assert_eq!(preamble.source, PreambleSource::File(path));
    }

    #[test]
    fn test_missing_configured_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let err = PreambleLoader::load(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, PreambleError::Read { .. }));
    }

    #[test]
    fn test_blank_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        std::fs::write(&path, "  \n").unwrap();

        let err = PreambleLoader::load(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, PreambleError::Empty(_)));
    }

    #[test]
    fn test_built_in_preamble() {
        let preamble = PreambleLoader::built_in();
        assert_eq!(preamble.source, PreambleSource::BuiltIn);
        assert_eq!(preamble.text, PromptTemplate::default_preamble());
    }
}
