use std::{borrow::Borrow, fmt};

/// Dotted address of a token: the set name followed by every group and token key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenPath(String);

impl TokenPath {
    /// Parses `{set.group.token}`. Anything else, interpolations included, is a literal value.
    pub fn parse_reference(value: &str) -> Option<TokenPath> {
        reference_parser::reference(value).ok()
    }
    pub fn child(&self, key: &str) -> TokenPath {
        if self.0.is_empty() {
            TokenPath(key.to_string())
        } else {
            TokenPath(format!("{}.{key}", self.0))
        }
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<&str> for TokenPath {
    fn from(path: &str) -> Self {
        TokenPath(path.to_string())
    }
}
impl Borrow<str> for TokenPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}
impl fmt::Display for TokenPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

peg::parser! {
  grammar reference_parser() for str {
    rule segment() -> &'input str = $((!['.' | '{' | '}'] [_])+)

    pub(crate) rule reference() -> TokenPath
        = "{" v:(segment() ++ ".") "}" { TokenPath(v.join(".")) }
  }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_references() {
        assert_eq!(
            TokenPath::parse_reference("{core.color.primary}"),
            Some(TokenPath::from("core.color.primary"))
        );
        assert_eq!(
            TokenPath::parse_reference("{spacing.1.5}"),
            Some(TokenPath::from("spacing.1.5"))
        );
        assert_eq!(
            TokenPath::parse_reference("{ABC Diatype.weight}"),
            Some(TokenPath::from("ABC Diatype.weight"))
        );
    }

    #[test]
    fn rejects_non_references() {
        for value in [
            "#007bff",
            "{}",
            "{a..b}",
            "{.a}",
            "{a.}",
            "{x} * {y}",
            "{x}/5",
            " {x}",
            "{x} ",
            "{{x}}",
            "rgba({core.black}, 0.5)",
        ] {
            assert_eq!(TokenPath::parse_reference(value), None, "{value}");
        }
    }

    #[test]
    fn child_paths() {
        let root = TokenPath::from("");
        let set = root.child("core");
        assert_eq!(set.as_str(), "core");
        assert_eq!(set.child("color").child("primary").to_string(), "core.color.primary");
    }
}
