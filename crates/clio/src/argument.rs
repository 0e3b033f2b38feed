use crate::error::Result;
use crate::validate::resolve_path;

/// A positional argument, filled by cursor order.
#[derive(Debug, Clone)]
pub struct Argument {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) is_path: bool,
    value: Option<String>,
}

impl Argument {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), description: String::new(), is_path: false, value: None }
    }

    /// An argument created for a token beyond every declared one.
    pub(crate) fn implicit(position: usize) -> Self {
        Self::new(position.to_string())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_path(&self) -> bool {
        self.is_path
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    pub(crate) fn assign(&mut self, raw: &str) -> Result<()> {
        let value = if self.is_path { resolve_path(raw)? } else { raw.to_string() };
        self.value = Some(value);
        Ok(())
    }

    pub(crate) fn reset(&mut self) {
        self.value = None;
    }
}

/// Fluent handle returned by [`Clio::argument`](crate::Clio::argument).
pub struct ArgumentBuilder<'a> {
    argument: &'a mut Argument,
}

impl<'a> ArgumentBuilder<'a> {
    pub(crate) fn new(argument: &'a mut Argument) -> Self {
        Self { argument }
    }

    pub fn described_as(self, description: impl Into<String>) -> Self {
        self.argument.description = description.into();
        self
    }

    /// Resolve the bound token to a canonical filesystem path.
    pub fn should_be_path(self) -> Self {
        self.argument.is_path = true;
        self
    }
}
