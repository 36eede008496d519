//! Typed configuration values.

use std::collections::BTreeMap;
use std::fmt;

/// The declared type of a configuration key or flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// UTF-8 string.
    String,
    /// Boolean.
    Bool,
    /// Signed integer.
    Int,
    /// List of strings.
    StringList,
    /// String-to-string map.
    StringMap,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::StringList => "string list",
            Self::StringMap => "string map",
        };
        f.write_str(name)
    }
}

/// A configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// UTF-8 string.
    String(String),
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// List of strings.
    StringList(Vec<String>),
    /// String-to-string map.
    StringMap(BTreeMap<String, String>),
}

impl Value {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::StringList(_) => ValueKind::StringList,
            Self::StringMap(_) => ValueKind::StringMap,
        }
    }

    /// Returns the zero value for a kind.
    #[must_use]
    pub fn zero(kind: ValueKind) -> Self {
        match kind {
            ValueKind::String => Self::String(String::new()),
            ValueKind::Bool => Self::Bool(false),
            ValueKind::Int => Self::Int(0),
            ValueKind::StringList => Self::StringList(Vec::new()),
            ValueKind::StringMap => Self::StringMap(BTreeMap::new()),
        }
    }

    /// Parses environment text into a value of the given kind.
    ///
    /// Booleans accept `1/t/true/yes/on` and `0/f/false/no/off` in any case,
    /// lists are comma separated, maps are comma separated `key=value` pairs.
    pub fn parse(kind: ValueKind, text: &str) -> Result<Self, String> {
        match kind {
            ValueKind::String => Ok(Self::String(text.to_string())),
            ValueKind::Bool => parse_bool(text).map(Self::Bool),
            ValueKind::Int => text
                .trim()
                .parse::<i64>()
                .map(Self::Int)
                .map_err(|e| e.to_string()),
            ValueKind::StringList => Ok(Self::StringList(split_list(text))),
            ValueKind::StringMap => split_list(text)
                .iter()
                .map(|pair| parse_pair(pair))
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(Self::StringMap),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Self::StringList(value)
    }
}

impl From<BTreeMap<String, String>> for Value {
    fn from(value: BTreeMap<String, String>) -> Self {
        Self::StringMap(value)
    }
}

/// Parses a boolean the permissive way.
pub fn parse_bool(text: &str) -> Result<bool, String> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "f" | "false" | "no" | "n" | "off" | "" => Ok(false),
        other => Err(format!("'{other}' is not a boolean")),
    }
}

/// Splits a `key=value` pair.
pub fn parse_pair(text: &str) -> Result<(String, String), String> {
    match text.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("'{text}' is not in key=value form")),
    }
}

fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("true", true)]
    #[test_case("1", true)]
    #[test_case("YES", true)]
    #[test_case("false", false)]
    #[test_case("0", false)]
    #[test_case("", false)]
    fn bool_parsing(text: &str, expected: bool) {
        assert_eq!(parse_bool(text), Ok(expected));
    }

    #[test]
    fn bool_rejects_garbage() {
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn list_is_comma_split() {
        let value = Value::parse(ValueKind::StringList, "a, b,,c").unwrap();
        assert_eq!(
            value,
            Value::StringList(vec!["a".into(), "b".into(), "c".into()])
        );
    }

    #[test]
    fn map_collects_pairs() {
        let value = Value::parse(ValueKind::StringMap, "role=web,env=prod").unwrap();
        let Value::StringMap(map) = value else {
            panic!("expected map");
        };
        assert_eq!(map.get("role").map(String::as_str), Some("web"));
        assert_eq!(map.get("env").map(String::as_str), Some("prod"));
    }

    #[test]
    fn map_rejects_bare_words() {
        assert!(Value::parse(ValueKind::StringMap, "role").is_err());
    }

    #[test]
    fn int_parsing() {
        assert_eq!(Value::parse(ValueKind::Int, " 42 "), Ok(Value::Int(42)));
        assert!(Value::parse(ValueKind::Int, "forty").is_err());
    }

    #[test]
    fn zero_values_match_kind() {
        for kind in [
            ValueKind::String,
            ValueKind::Bool,
            ValueKind::Int,
            ValueKind::StringList,
            ValueKind::StringMap,
        ] {
            assert_eq!(Value::zero(kind).kind(), kind);
        }
    }
}
