use std::collections::{HashMap, HashSet};

use crate::{
    error::{warn, Warning},
    walk, Error, Result, TokenDocument, TokenLeaf, TokenPath,
};

/// Checks every reference expression in `document`.
///
/// Chains of references are followed from each referencing token; a target seen twice in one chain
/// is an error. References to paths that do not exist are returned as warnings.
pub fn validate(document: &TokenDocument) -> Result<Vec<Warning>> {
    let mut catalog: HashMap<TokenPath, &TokenLeaf> = HashMap::new();
    for (name, set) in document.iter() {
        for (path, leaf) in walk(set, TokenPath::from(name)) {
            catalog.entry(path).or_insert(leaf);
        }
    }
    log::debug!("Validating references across {} tokens", catalog.len());

    let mut warnings = Vec::new();
    let mut acyclic = HashSet::new();
    for (name, set) in document.iter() {
        for (path, leaf) in walk(set, TokenPath::from(name)) {
            let Some(target) = leaf.reference() else {
                continue;
            };
            if !catalog.contains_key(&target) {
                warn(
                    &mut warnings,
                    Warning::UnresolvedReference {
                        token: path,
                        target,
                    },
                );
                continue;
            }
            follow_chain(&catalog, &mut acyclic, path, target)?;
        }
    }
    Ok(warnings)
}

/// Tokens in `acyclic` are already known to end in a literal or an unresolved target, so a chain
/// reaching one of them stops there.
fn follow_chain(
    catalog: &HashMap<TokenPath, &TokenLeaf>,
    acyclic: &mut HashSet<TokenPath>,
    start: TokenPath,
    target: TokenPath,
) -> Result<()> {
    let mut visited = HashSet::from([start.clone()]);
    let mut chain = vec![start];
    let mut next = Some(target);
    while let Some(target) = next {
        if acyclic.contains(&target) {
            break;
        }
        if !visited.insert(target.clone()) {
            chain.push(target.clone());
            return Err(Error::CircularReference {
                path: target,
                chain,
            });
        }
        next = catalog.get(&target).and_then(|leaf| leaf.reference());
        chain.push(target);
    }
    acyclic.extend(chain);
    Ok(())
}
