use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{} exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("cannot create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Creates `dir` (and its parents) unless it already exists as a directory.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PersistError::NotADirectory(dir.to_path_buf())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|source| PersistError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })
        }
        Err(source) => Err(PersistError::CreateDir {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Replaces `dir/filename` with `content`.
///
/// The bytes go to a temp file in `dir` first and are renamed over the
/// target, so readers see the previous file or the complete new one.
pub fn write_atomically(
    dir: &Path,
    filename: &str,
    content: &[u8],
) -> Result<PathBuf, PersistError> {
    ensure_output_dir(dir)?;
    let target = dir.join(filename);
    let failed = |source| PersistError::Write {
        path: target.clone(),
        source,
    };

    let mut staged = NamedTempFile::new_in(dir).map_err(failed)?;
    staged.write_all(content).map_err(failed)?;
    staged.as_file().sync_all().map_err(failed)?;
    staged.persist(&target).map_err(|err| failed(err.error))?;
    Ok(target)
}
