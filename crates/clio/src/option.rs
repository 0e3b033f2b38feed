//! Named options: kinds, per-pass state and the fluent declaration handle.

use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;

use crate::error::{Error, Result};
use crate::validate::{Pattern, Rules};

static OPTION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z_-]*$").expect("option name pattern is a valid regex")
});

pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.contains("--") || !OPTION_NAME.is_match(name) {
        return Err(Error::InvalidOptionName(name.to_string()));
    }
    Ok(())
}

/// Render a name the way it is typed: `-x` for one letter, `--name` otherwise.
pub(crate) fn dashed(name: &str) -> String {
    if name.chars().nth(1).is_none() {
        format!("-{name}")
    } else {
        format!("--{name}")
    }
}

/// What an option accepts, including its declared default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OptionKind {
    /// Present or not.
    #[default]
    Flag,
    /// Counts its occurrences.
    Accumulator,
    /// A single string value.
    Value { default: Option<String> },
    /// A single value resolved to a canonical filesystem path.
    Path { default: Option<String> },
    /// Every occurrence appends a value.
    MultiValued { defaults: Option<Vec<String>> },
}

impl OptionKind {
    pub fn takes_value(&self) -> bool {
        match self {
            Self::Flag | Self::Accumulator => false,
            Self::Value { .. } | Self::Path { .. } | Self::MultiValued { .. } => true,
        }
    }

    /// Values used when the option appears without one.
    pub(crate) fn defaults(&self) -> Option<&[String]> {
        match self {
            Self::Flag | Self::Accumulator => None,
            Self::Value { default } | Self::Path { default } => {
                default.as_ref().map(std::slice::from_ref)
            }
            Self::MultiValued { defaults } => defaults.as_deref(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Accumulator => "accumulator",
            Self::Value { .. } => "value",
            Self::Path { .. } => "path",
            Self::MultiValued { .. } => "multi-valued",
        }
    }
}

/// Stable identity of a declared option.
///
/// Every alias of an option resolves to the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptionId(pub(crate) usize);

#[derive(Debug)]
pub struct CliOption {
    pub(crate) name: String,
    pub(crate) aliases: IndexSet<String>,
    pub(crate) description: String,
    pub(crate) kind: OptionKind,
    pub(crate) rules: Rules,
    value: Option<String>,
    values: Vec<String>,
    count: usize,
    pub(crate) defaults_applied: bool,
}

impl CliOption {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            aliases: IndexSet::new(),
            description: String::new(),
            kind: OptionKind::Flag,
            rules: Rules::default(),
            value: None,
            values: Vec::new(),
            count: 0,
            defaults_applied: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().map(String::as_str)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> &OptionKind {
        &self.kind
    }

    pub(crate) fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(name)
    }

    pub(crate) fn reset(&mut self) {
        self.value = None;
        self.values.clear();
        self.count = 0;
        self.defaults_applied = false;
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    pub(crate) fn was_present(&self) -> bool {
        self.count > 0
    }

    pub(crate) fn mark_present(&mut self) {
        self.count += 1;
    }

    /// Store a resolved and validated value.
    pub(crate) fn store(&mut self, value: String) {
        if matches!(self.kind, OptionKind::MultiValued { .. }) {
            self.values.push(value.clone());
        }
        self.value = Some(value);
    }

    /// Explicit value, falling back to the declared default.
    pub(crate) fn value(&self) -> Option<&str> {
        self.value
            .as_deref()
            .or_else(|| self.kind.defaults().and_then(|d| d.last()).map(String::as_str))
    }

    pub(crate) fn values(&self) -> Option<&[String]> {
        if self.was_present() {
            Some(&self.values)
        } else {
            self.kind.defaults()
        }
    }
}

/// Fluent handle returned by [`Clio::option`](crate::Clio::option).
///
/// Kind setters are mutually exclusive; the last one wins.
pub struct OptionBuilder<'a> {
    options: &'a mut [CliOption],
    index: usize,
}

impl<'a> OptionBuilder<'a> {
    pub(crate) fn new(options: &'a mut [CliOption], index: usize) -> Self {
        Self { options, index }
    }

    fn option(&mut self) -> &mut CliOption {
        &mut self.options[self.index]
    }

    pub fn id(&self) -> OptionId {
        OptionId(self.index)
    }

    /// Add another name for this option.
    pub fn alias(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        if self.options.iter().any(|o| o.answers_to(&name)) {
            return Err(Error::DuplicateOptionName(name));
        }
        tracing::debug!(option = %self.option().name, alias = %name, "declared alias");
        self.option().aliases.insert(name);
        Ok(self)
    }

    pub fn described_as(mut self, description: impl Into<String>) -> Self {
        self.option().description = description.into();
        self
    }

    pub fn accumulates(mut self) -> Self {
        self.option().kind = OptionKind::Accumulator;
        self
    }

    pub fn with_value(mut self) -> Self {
        self.option().kind = OptionKind::Value { default: None };
        self
    }

    pub fn with_default_value(mut self, default: impl Into<String>) -> Self {
        self.option().kind = OptionKind::Value { default: Some(default.into()) };
        self
    }

    pub fn as_path(mut self) -> Self {
        self.option().kind = OptionKind::Path { default: None };
        self
    }

    pub fn as_path_or(mut self, default: impl Into<String>) -> Self {
        self.option().kind = OptionKind::Path { default: Some(default.into()) };
        self
    }

    pub fn with_many_values(mut self) -> Self {
        self.option().kind = OptionKind::MultiValued { defaults: None };
        self
    }

    pub fn with_many_values_or<I, S>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let defaults = defaults.into_iter().map(Into::into).collect();
        self.option().kind = OptionKind::MultiValued { defaults: Some(defaults) };
        self
    }

    /// Require every value to match `regex`.
    ///
    /// Both bare (`\d+`) and delimited (`|\d+|`, `/abc/i`) forms are accepted.
    pub fn matching_pattern(mut self, regex: impl Into<String>) -> Self {
        self.option().rules.pattern = Some(Pattern::new(regex));
        self
    }

    pub fn validated_by<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + 'static,
    {
        self.option().rules.predicate = Some(Box::new(predicate));
        self
    }

    /// Replace the generated message of a failed pattern or predicate check.
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.option().rules.message = Some(message.into());
        self
    }
}
