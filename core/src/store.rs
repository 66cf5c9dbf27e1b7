//! The split representation on disk: one `<name>.json` per token set plus the two index files.

use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{warn, Warning},
    group_from_fields, Error, Result, TokenGroup,
};

pub const METADATA_FILE: &str = "$metadata.json";
pub const THEMES_FILE: &str = "$themes.json";

/// Contents of `$metadata.json`: the order in which token sets are read and written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderIndex {
    #[serde(rename = "tokenSetOrder")]
    pub token_set_order: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TokenStore {
    root: PathBuf,
}
impl TokenStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
    pub fn root(&self) -> &Path {
        &self.root
    }
    pub fn metadata_path(&self) -> PathBuf {
        self.root.join(METADATA_FILE)
    }
    pub fn themes_path(&self) -> PathBuf {
        self.root.join(THEMES_FILE)
    }
    pub fn set_path(&self, name: &str) -> Result<PathBuf> {
        Ok(self.root.join(set_file_name(name)?))
    }

    /// Fails with every missing index file listed, not only the first.
    pub fn require_index_files(&self) -> Result<()> {
        let missing: Vec<PathBuf> = [self.metadata_path(), self.themes_path()]
            .into_iter()
            .filter(|path| !path.is_file())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingRequiredFiles(missing))
        }
    }

    /// Names are returned verbatim; duplicates and unknown names are left to the caller.
    pub fn read_order_index(&self) -> Result<OrderIndex> {
        let path = self.metadata_path();
        let value = read_json(&path)?.ok_or_else(|| Error::MissingFile(path.clone()))?;
        serde_json::from_value(value).map_err(|err| Error::MalformedIndex {
            path,
            reason: err.to_string(),
        })
    }

    /// A declared set without a file contributes nothing: it loads as an empty group and a warning
    /// is recorded.
    pub fn load_set(&self, name: &str, warnings: &mut Vec<Warning>) -> Result<TokenGroup> {
        let path = self.set_path(name)?;
        match read_json(&path)? {
            None => {
                warn(
                    warnings,
                    Warning::MissingTokenSet {
                        name: name.to_string(),
                        path,
                    },
                );
                Ok(TokenGroup::new())
            }
            Some(Value::Object(fields)) => {
                log::debug!("Loaded token set '{name}' from {}", path.display());
                Ok(group_from_fields(fields))
            }
            Some(_) => Err(Error::MalformedTokenSet {
                name: name.to_string(),
                path,
            }),
        }
    }

    /// Raw bytes of the theme index, if the store has one.
    pub fn read_themes(&self) -> Result<Option<Vec<u8>>> {
        let path = self.themes_path();
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::io(&path)(err)),
        }
    }

    pub fn has_entries(&self) -> Result<bool> {
        match fs::read_dir(&self.root) {
            Ok(mut entries) => Ok(entries.next().is_some()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(Error::io(&self.root)(err)),
        }
    }
}

/// `Ok(None)` when the file does not exist.
pub(crate) fn read_json(path: &Path) -> Result<Option<Value>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(Error::io(path)(err)),
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| Error::InvalidJson {
            path: path.to_path_buf(),
            source,
        })
}

/// Relative file name of a set. Names may address subdirectories with `/` but never leave the store.
pub fn set_file_name(name: &str) -> Result<PathBuf> {
    let invalid = || Error::InvalidTokenSetName(name.to_string());
    if name.is_empty()
        || name.contains('\\')
        || name
            .split('/')
            .any(|segment| matches!(segment, "" | "." | ".."))
    {
        return Err(invalid());
    }
    let file = PathBuf::from(format!("{name}.json"));
    if file == Path::new(METADATA_FILE) || file == Path::new(THEMES_FILE) {
        return Err(Error::ReservedTokenSetName(name.to_string()));
    }
    if file
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        Ok(file)
    } else {
        Err(invalid())
    }
}
