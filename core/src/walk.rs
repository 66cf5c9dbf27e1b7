use indexmap::map::Iter;

use crate::{TokenGroup, TokenLeaf, TokenNode, TokenPath};

/// Depth-first, in-order view of every token below `group`, each paired with its path under `base`.
pub fn walk<'a>(group: &'a TokenGroup, base: TokenPath) -> Leaves<'a> {
    Leaves {
        stack: vec![(base, group.iter())],
    }
}

pub struct Leaves<'a> {
    stack: Vec<(TokenPath, Iter<'a, String, TokenNode>)>,
}
impl<'a> Iterator for Leaves<'a> {
    type Item = (TokenPath, &'a TokenLeaf);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (prefix, children) = self.stack.last_mut()?;
            match children.next() {
                None => {
                    self.stack.pop();
                }
                Some((key, node)) => {
                    let path = prefix.child(key);
                    match node {
                        TokenNode::Token(leaf) => return Some((path, leaf)),
                        TokenNode::Group(group) => self.stack.push((path, group.iter())),
                        TokenNode::Value(_) => {}
                    }
                }
            }
        }
    }
}
