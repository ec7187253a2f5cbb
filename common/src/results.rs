use std::{
    io,
    num::ParseFloatError,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tokio::fs::read_to_string;

/// Why a result file could not be turned into a number. Both cases are
/// expected while scanning partially populated result directories.
#[derive(Debug, Error)]
pub enum ResultFileError {
    #[error("could not open {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("could not parse {contents:?} in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        contents: String,
        source: ParseFloatError,
    },
}

pub fn speedup_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{stem}.speedup"))
}

pub fn avgtime_path(dir: &Path, stem: &str, tag: &str) -> PathBuf {
    dir.join(format!("{stem}-{tag}.avgtime"))
}

/// Reads a file holding a single floating point literal.
pub async fn read_measurement(path: &Path) -> Result<f64, ResultFileError> {
    let contents = read_to_string(path)
        .await
        .map_err(|source| ResultFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    contents
        .trim()
        .parse::<f64>()
        .map_err(|source| ResultFileError::Parse {
            path: path.to_path_buf(),
            contents: contents.clone(),
            source,
        })
}
