use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::{
    atomic::{to_pretty_json, write_atomic},
    group_from_fields,
    store::{read_json, set_file_name, METADATA_FILE, THEMES_FILE},
    Error, OrderIndex, Result, TokenDocument, TokenStore,
};

/// Written to `$themes.json` when there is no theme index to carry over.
pub const THEMES_PLACEHOLDER: &[u8] = b"[]\n";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ThemesPolicy {
    /// Carry the store's current `$themes.json` forward, or write a placeholder if it has none.
    #[default]
    Keep,
    /// Copy the given file verbatim.
    CopyFrom(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitOptions {
    pub dry_run: bool,
    pub backup: bool,
    pub themes: ThemesPolicy,
}
impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            backup: true,
            themes: ThemesPolicy::Keep,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WriteKind {
    TokenSet(String),
    OrderIndex,
    CopiedThemes,
    PlaceholderThemes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedWrite {
    pub kind: WriteKind,
    pub path: PathBuf,
    /// Path relative to the store root.
    pub file: PathBuf,
}
impl fmt::Display for PlannedWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.kind {
            WriteKind::TokenSet(_) => "write",
            WriteKind::OrderIndex => "regenerate",
            WriteKind::CopiedThemes => "copy",
            WriteKind::PlaceholderThemes => "create placeholder",
        };
        write!(f, "{verb} {}", self.file.display())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitReport {
    pub token_sets_written: usize,
    /// Everything written, or in a dry run everything that would have been.
    pub writes: Vec<PlannedWrite>,
    pub backup: Option<PathBuf>,
    pub dry_run: bool,
}

/// Reads a consolidated document; every top-level value has to be an object.
pub fn read_document(source: &Path) -> Result<TokenDocument> {
    let Value::Object(sets) =
        read_json(source)?.ok_or_else(|| Error::MissingFile(source.to_path_buf()))?
    else {
        return Err(Error::MalformedDocument(source.to_path_buf()));
    };
    sets.into_iter()
        .map(|(name, set)| match set {
            Value::Object(fields) => Ok((name, group_from_fields(fields))),
            _ => Err(Error::MalformedTokenSet {
                name,
                path: source.to_path_buf(),
            }),
        })
        .collect()
}

/// Writes one file per top-level set of `source` into `tokens_dir` and regenerates the order index
/// from the document's own key order.
///
/// Every file body is prepared before anything touches the disk. In a dry run nothing is created,
/// moved or written and the report lists the planned writes.
pub fn split(source: &Path, tokens_dir: &Path, options: &SplitOptions) -> Result<SplitReport> {
    if options.backup && tokens_dir.file_name().is_none() {
        return Err(Error::InvalidStorePath(tokens_dir.to_path_buf()));
    }
    let document = read_document(source)?;
    let store = TokenStore::new(tokens_dir);

    let mut files = Vec::with_capacity(document.len() + 2);
    for (name, set) in document.iter() {
        let file = set_file_name(name)?;
        let path = tokens_dir.join(&file);
        let contents = to_pretty_json(&path, set)?;
        files.push((
            PlannedWrite {
                kind: WriteKind::TokenSet(name.to_string()),
                path,
                file,
            },
            contents,
        ));
    }

    let index = OrderIndex {
        token_set_order: document.names().map(str::to_string).collect(),
    };
    let path = store.metadata_path();
    let contents = to_pretty_json(&path, &index)?;
    files.push((
        PlannedWrite {
            kind: WriteKind::OrderIndex,
            path,
            file: PathBuf::from(METADATA_FILE),
        },
        contents,
    ));

    let (kind, contents) = match &options.themes {
        ThemesPolicy::CopyFrom(themes) => match fs::read(themes) {
            Ok(bytes) => (WriteKind::CopiedThemes, bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::MissingFile(themes.clone()))
            }
            Err(err) => return Err(Error::io(themes)(err)),
        },
        ThemesPolicy::Keep => match store.read_themes()? {
            Some(bytes) => (WriteKind::CopiedThemes, bytes),
            None => (WriteKind::PlaceholderThemes, THEMES_PLACEHOLDER.to_vec()),
        },
    };
    files.push((
        PlannedWrite {
            kind,
            path: store.themes_path(),
            file: PathBuf::from(THEMES_FILE),
        },
        contents,
    ));

    let backup = if options.backup && store.has_entries()? {
        Some(backup_path(tokens_dir)?)
    } else {
        None
    };

    if !options.dry_run {
        if let Some(backup) = &backup {
            fs::rename(tokens_dir, backup).map_err(Error::io(tokens_dir))?;
            log::info!("Moved {} to {}", tokens_dir.display(), backup.display());
        }
        for (write, contents) in &files {
            write_atomic(&write.path, contents)?;
        }
        log::info!(
            "Split {} token sets into {}",
            document.len(),
            tokens_dir.display()
        );
    }

    Ok(SplitReport {
        token_sets_written: document.len(),
        writes: files.into_iter().map(|(write, _)| write).collect(),
        backup,
        dry_run: options.dry_run,
    })
}

/// A sibling `<dir>.backup-<timestamp>` that does not exist yet.
///
fn backup_path(tokens_dir: &Path) -> Result<PathBuf> {
    let Some(name) = tokens_dir.file_name() else {
        return Err(Error::InvalidStorePath(tokens_dir.to_path_buf()));
    };
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let name = name.to_string_lossy();
    let base = tokens_dir.with_file_name(format!("{name}.backup-{stamp}"));
    let mut candidate = base.clone();
    let mut n = 1;
    while candidate.exists() {
        candidate = PathBuf::from(format!("{}-{n}", base.display()));
        n += 1;
    }
    Ok(candidate)
}
