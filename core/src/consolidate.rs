use std::{collections::HashSet, path::Path, path::PathBuf};

use crate::{
    atomic::{to_pretty_json, write_atomic},
    error::{warn, Warning},
    validate, Result, TokenDocument, TokenStore,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidateReport {
    pub token_sets_written: usize,
    pub output: PathBuf,
    pub warnings: Vec<Warning>,
}

/// Loads the sets of `store` in `$metadata.json` order, leaving out empty ones.
pub fn load_document(store: &TokenStore, warnings: &mut Vec<Warning>) -> Result<TokenDocument> {
    store.require_index_files()?;
    let index = store.read_order_index()?;

    let mut seen = HashSet::new();
    let mut document = TokenDocument::new();
    for name in index.token_set_order {
        if !seen.insert(name.clone()) {
            warn(warnings, Warning::DuplicateTokenSet { name });
            continue;
        }
        let set = store.load_set(&name, warnings)?;
        if set.is_empty() {
            log::debug!("Skipping empty token set '{name}'");
            continue;
        }
        document.insert(name, set);
    }
    Ok(document)
}

/// Merges every set of the store at `tokens_dir` into one document at `output`.
///
/// References are validated before anything is written; the output is replaced atomically.
pub fn consolidate(tokens_dir: &Path, output: &Path) -> Result<ConsolidateReport> {
    let store = TokenStore::new(tokens_dir);
    let mut warnings = Vec::new();
    let document = load_document(&store, &mut warnings)?;
    warnings.extend(validate(&document)?);

    let contents = to_pretty_json(output, &document)?;
    write_atomic(output, &contents)?;
    log::info!(
        "Consolidated {} token sets into {}",
        document.len(),
        output.display()
    );
    Ok(ConsolidateReport {
        token_sets_written: document.len(),
        output: output.to_path_buf(),
        warnings,
    })
}
