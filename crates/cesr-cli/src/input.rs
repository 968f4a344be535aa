//! Input selection: a file, an inline argument, or stdin.

use clap::Args;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where to read stream content from.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Path to input file
    #[arg(short, long)]
    pub path: Option<PathBuf>,
    /// Inline content (stdin is read when neither this nor --path is given)
    pub content: Option<String>,
}

/// Errors while reading input.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),
    #[error("no input provided via -p, argument, or stdin")]
    Empty,
}

impl InputArgs {
    /// Reads the selected input. `--path` wins over the inline argument.
    pub fn read(&self) -> Result<String, InputError> {
        read_content(self.path.as_deref(), self.content.as_deref(), io::stdin())
    }
}

fn read_content(
    path: Option<&Path>,
    content: Option<&str>,
    mut stdin: impl Read,
) -> Result<String, InputError> {
    if let Some(path) = path {
        return fs::read_to_string(path).map_err(|source| InputError::File {
            path: path.to_path_buf(),
            source,
        });
    }

    if let Some(content) = content {
        return Ok(content.to_string());
    }

    let mut buffer = String::new();
    stdin
        .read_to_string(&mut buffer)
        .map_err(InputError::Stdin)?;
    if buffer.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(buffer)
}
