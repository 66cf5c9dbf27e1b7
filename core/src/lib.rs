use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

pub use consolidate::{consolidate, ConsolidateReport};
pub use error::{Error, Result, Warning};
pub use expression::TokenPath;
pub use split::{split, PlannedWrite, SplitOptions, SplitReport, ThemesPolicy, WriteKind};
pub use store::{OrderIndex, TokenStore};
pub use validate::validate;
pub use walk::{walk, Leaves};

mod atomic;
pub mod consolidate;
mod error;
mod expression;
pub mod split;
pub mod store;
mod validate;
mod walk;

pub const DEFAULT_TOKENS_DIR: &str = "tokens";
pub const DEFAULT_OUTPUT: &str = "tokensource.json";

pub type TokenGroup = IndexMap<String, TokenNode>;

/// A node of a token tree, classified by shape when it is parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TokenNode {
    Token(TokenLeaf),
    Group(TokenGroup),
    /// Non-object member of a group, such as a group level `$description`.
    Value(Value),
}
impl From<Value> for TokenNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => match TokenLeaf::from_fields(fields) {
                Ok(leaf) => TokenNode::Token(leaf),
                Err(fields) => TokenNode::Group(group_from_fields(fields)),
            },
            other => TokenNode::Value(other),
        }
    }
}
impl<'de> Deserialize<'de> for TokenNode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<TokenNode, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(TokenNode::from)
    }
}

pub(crate) fn group_from_fields(fields: Map<String, Value>) -> TokenGroup {
    fields
        .into_iter()
        .map(|(key, value)| (key, TokenNode::from(value)))
        .collect()
}

/// A token: an object carrying a string `$type` and a string, number or object `$value`.
///
/// The complete field map is kept in source order so metadata such as `$description` or
/// `$extensions` is written back exactly as it was read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TokenLeaf {
    fields: Map<String, Value>,
}
impl TokenLeaf {
    pub const TYPE: &'static str = "$type";
    pub const VALUE: &'static str = "$value";

    /// Returns the fields back when they do not have the shape of a token.
    pub fn from_fields(fields: Map<String, Value>) -> std::result::Result<Self, Map<String, Value>> {
        let typed = matches!(fields.get(Self::TYPE), Some(Value::String(_)));
        let valued = matches!(
            fields.get(Self::VALUE),
            Some(Value::String(_) | Value::Number(_) | Value::Object(_))
        );
        if typed && valued {
            Ok(Self { fields })
        } else {
            Err(fields)
        }
    }
    /// `None` when `value` is not a string, number or object.
    pub fn new(type_: &str, value: impl Into<Value>) -> Option<Self> {
        let mut fields = Map::new();
        fields.insert(Self::TYPE.to_string(), Value::String(type_.to_string()));
        fields.insert(Self::VALUE.to_string(), value.into());
        Self::from_fields(fields).ok()
    }
    pub fn token_type(&self) -> &str {
        match self.fields.get(Self::TYPE) {
            Some(Value::String(type_)) => type_,
            _ => unreachable!("token leaf without a string $type"),
        }
    }
    pub fn value(&self) -> TokenValue<'_> {
        match self.fields.get(Self::VALUE) {
            Some(Value::String(value)) => TokenValue::String(value),
            Some(Value::Number(value)) => TokenValue::Number(value),
            Some(Value::Object(value)) => TokenValue::Composite(value),
            _ => unreachable!("token leaf without a well-typed $value"),
        }
    }
    /// The target of this token when its value is exactly one reference expression.
    pub fn reference(&self) -> Option<TokenPath> {
        match self.value() {
            TokenValue::String(value) => TokenPath::parse_reference(value),
            _ => None,
        }
    }
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenValue<'a> {
    String(&'a str),
    Number(&'a Number),
    Composite(&'a Map<String, Value>),
}
impl fmt::Display for TokenValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::String(value) => f.write_str(value),
            TokenValue::Number(value) => write!(f, "{value}"),
            TokenValue::Composite(value) => write!(f, "{}", Value::Object((*value).clone())),
        }
    }
}

/// Every token set keyed by name, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TokenDocument {
    sets: IndexMap<String, TokenGroup>,
}
impl TokenDocument {
    pub fn new() -> Self {
        Self::default()
    }
    /// Keeps the position of an existing set and replaces its content.
    pub fn insert(&mut self, name: impl Into<String>, set: TokenGroup) {
        self.sets.insert(name.into(), set);
    }
    pub fn get(&self, name: &str) -> Option<&TokenGroup> {
        self.sets.get(name)
    }
    pub fn contains(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(|name| name.as_str())
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TokenGroup)> {
        self.sets.iter().map(|(name, set)| (name.as_str(), set))
    }
    pub fn len(&self) -> usize {
        self.sets.len()
    }
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
impl FromIterator<(String, TokenGroup)> for TokenDocument {
    fn from_iter<T: IntoIterator<Item = (String, TokenGroup)>>(iter: T) -> Self {
        Self {
            sets: iter.into_iter().collect(),
        }
    }
}
