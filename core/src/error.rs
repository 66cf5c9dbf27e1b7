use std::{fmt, io, path::Path, path::PathBuf};

use itertools::Itertools;

use crate::TokenPath;

pub type Result<T> = std::result::Result<T, Error>;

/// Anything that aborts a consolidate or split run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Missing required files: {}", display_paths(.0))]
    MissingRequiredFiles(Vec<PathBuf>),

    #[error("Invalid JSON in {}: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed order index {}: {reason}", path.display())]
    MalformedIndex { path: PathBuf, reason: String },

    #[error("Malformed token set '{name}' in {}: expected a JSON object", path.display())]
    MalformedTokenSet { name: String, path: PathBuf },

    #[error("Malformed token document {}: expected a JSON object of token sets", .0.display())]
    MalformedDocument(PathBuf),

    #[error("Invalid token set name '{0}'")]
    InvalidTokenSetName(String),

    #[error("Token set name '{0}' collides with a store index file")]
    ReservedTokenSetName(String),

    #[error("Cannot back up token store {}: the path has no directory name", .0.display())]
    InvalidStorePath(PathBuf),

    #[error("Circular reference detected at {path}: {}", .chain.iter().join(" -> "))]
    CircularReference {
        path: TokenPath,
        chain: Vec<TokenPath>,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
impl Error {
    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
        move |source| Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths.iter().map(|path| path.display()).join(", ")
}

/// Conditions reported to the caller that do not stop a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    MissingTokenSet { name: String, path: PathBuf },
    DuplicateTokenSet { name: String },
    UnresolvedReference { token: TokenPath, target: TokenPath },
}
impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingTokenSet { name, path } => write!(
                f,
                "Token set '{name}' not found at {}, treating it as empty",
                path.display()
            ),
            Warning::DuplicateTokenSet { name } => {
                write!(f, "Token set '{name}' listed more than once, keeping the first entry")
            }
            Warning::UnresolvedReference { token, target } => {
                write!(f, "Unresolved reference in {token}: {{{target}}}")
            }
        }
    }
}

pub(crate) fn warn(warnings: &mut Vec<Warning>, warning: Warning) {
    log::warn!("{warning}");
    warnings.push(warning);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_files_names_all() {
        let err = Error::MissingRequiredFiles(vec![
            PathBuf::from("tokens/$metadata.json"),
            PathBuf::from("tokens/$themes.json"),
        ]);
        assert_eq!(
            err.to_string(),
            "Missing required files: tokens/$metadata.json, tokens/$themes.json"
        );
    }

    #[test]
    fn circular_reference_shows_chain() {
        let err = Error::CircularReference {
            path: TokenPath::from("a.x"),
            chain: vec![
                TokenPath::from("a.x"),
                TokenPath::from("b.y"),
                TokenPath::from("a.x"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Circular reference detected at a.x: a.x -> b.y -> a.x"
        );
    }
}
