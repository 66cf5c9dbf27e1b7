use std::{fs, io::Write, path::Path};

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::{Error, Result};

/// Pretty JSON with two space indentation and a trailing newline.
pub(crate) fn to_pretty_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<Vec<u8>> {
    let mut text = serde_json::to_vec_pretty(value).map_err(|source| Error::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    text.push(b'\n');
    Ok(text)
}

/// Writes through a temporary file in the destination directory and renames it into place, so the
/// destination either keeps its old content or holds the complete new content.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(Error::io(dir))?;
    let mut file = NamedTempFile::new_in(dir).map_err(Error::io(dir))?;
    file.write_all(contents).map_err(Error::io(path))?;
    file.as_file().sync_all().map_err(Error::io(path))?;
    file.persist(path).map_err(|err| Error::io(path)(err.error))?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}
