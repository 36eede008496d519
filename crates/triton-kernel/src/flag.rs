//! Flag declarations.

use crate::value::{Value, ValueKind};

/// Visibility of a flag within the command tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Visible only on the declaring command.
    #[default]
    Local,
    /// Visible on the declaring command and every descendant.
    Persistent,
}

/// How many values a flag collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// One value; the last occurrence wins.
    Scalar,
    /// Repeated or comma-separated values.
    List,
    /// Repeated `key=value` occurrences.
    Map,
}

/// A named command-line flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Flag {
    long: &'static str,
    short: Option<char>,
    kind: ValueKind,
    default: Option<Value>,
    help: &'static str,
    scope: Scope,
    hidden: bool,
}

impl Flag {
    fn new(long: &'static str, kind: ValueKind) -> Self {
        Self {
            long,
            short: None,
            kind,
            default: None,
            help: "",
            scope: Scope::Local,
            hidden: false,
        }
    }

    /// A string flag.
    #[must_use]
    pub fn string(long: &'static str) -> Self {
        Self::new(long, ValueKind::String)
    }

    /// A boolean flag.
    #[must_use]
    pub fn bool(long: &'static str) -> Self {
        Self::new(long, ValueKind::Bool)
    }

    /// An integer flag.
    #[must_use]
    pub fn int(long: &'static str) -> Self {
        Self::new(long, ValueKind::Int)
    }

    /// A repeatable, comma-splitting list flag.
    #[must_use]
    pub fn list(long: &'static str) -> Self {
        Self::new(long, ValueKind::StringList)
    }

    /// A repeatable `key=value` flag.
    #[must_use]
    pub fn map(long: &'static str) -> Self {
        Self::new(long, ValueKind::StringMap)
    }

    /// Sets the single-character shorthand.
    #[must_use]
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help(mut self, help: &'static str) -> Self {
        self.help = help;
        self
    }

    /// Sets the default value; it must match the flag's kind.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Makes the flag visible on every descendant command.
    #[must_use]
    pub fn persistent(mut self) -> Self {
        self.scope = Scope::Persistent;
        self
    }

    /// Hides the flag from help output.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Long name, without dashes.
    #[must_use]
    pub const fn long(&self) -> &'static str {
        self.long
    }

    /// Shorthand, if any.
    #[must_use]
    pub const fn short_name(&self) -> Option<char> {
        self.short
    }

    /// Value type.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Default value, if any.
    #[must_use]
    pub const fn initial_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Help text.
    #[must_use]
    pub const fn help_text(&self) -> &'static str {
        self.help
    }

    /// Visibility.
    #[must_use]
    pub const fn scope(&self) -> Scope {
        self.scope
    }

    /// Whether the flag is hidden from help.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Arity derived from the value type.
    #[must_use]
    pub const fn arity(&self) -> Arity {
        match self.kind {
            ValueKind::StringList => Arity::List,
            ValueKind::StringMap => Arity::Map,
            _ => Arity::Scalar,
        }
    }

    /// Whether the flag is inherited by descendants.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.scope == Scope::Persistent
    }
}

/// Maps user-supplied flag names to canonical names.
///
/// Each entry turns an accepted spelling (`tag`) into the declared long
/// name (`tags`); unmatched names pass through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalizer {
    entries: Vec<(&'static str, &'static str)>,
}

impl Normalizer {
    /// Creates an empty normalizer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `from` to `to`.
    #[must_use]
    pub fn map(mut self, from: &'static str, to: &'static str) -> Self {
        self.entries.push((from, to));
        self
    }

    /// Canonical name for `name`.
    #[must_use]
    pub fn normalize<'a>(&'a self, name: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(from, _)| *from == name)
            .map_or(name, |(_, to)| *to)
    }

    /// Accepted spellings that normalize to `canonical`.
    #[must_use]
    pub fn spellings_of(&self, canonical: &str) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|(_, to)| *to == canonical)
            .map(|(from, _)| *from)
            .collect()
    }

    /// All mappings.
    #[must_use]
    pub fn entries(&self) -> &[(&'static str, &'static str)] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let flag = Flag::string("id")
            .short('i')
            .help("Instance ID")
            .persistent();
        assert_eq!(flag.long(), "id");
        assert_eq!(flag.short_name(), Some('i'));
        assert_eq!(flag.help_text(), "Instance ID");
        assert!(flag.is_persistent());
        assert_eq!(flag.arity(), Arity::Scalar);
    }

    #[test]
    fn arity_follows_kind() {
        assert_eq!(Flag::list("networks").arity(), Arity::List);
        assert_eq!(Flag::map("metadata").arity(), Arity::Map);
        assert_eq!(Flag::bool("wait").arity(), Arity::Scalar);
    }

    #[test]
    fn normalizer_maps_singular_to_plural() {
        let norm = Normalizer::new().map("tag", "tags");
        assert_eq!(norm.normalize("tag"), "tags");
        assert_eq!(norm.normalize("tags"), "tags");
        assert_eq!(norm.normalize("name"), "name");
        assert_eq!(norm.spellings_of("tags"), vec!["tag"]);
    }
}
