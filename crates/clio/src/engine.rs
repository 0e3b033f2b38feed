//! The registry of declared options/arguments and the parse pass over argv.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::argument::{Argument, ArgumentBuilder};
use crate::error::{Error, Result};
use crate::host::Settings;
use crate::option::{CliOption, OptionBuilder, OptionId, OptionKind, dashed, validate_name};
use crate::validate::resolve_path;

/// Where the engine is in its parse cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseState {
    /// Nothing parsed yet, a declaration happened since, or the last pass failed.
    #[default]
    Unparsed,
    /// The token loop is running.
    Parsing,
    /// Results are cached until the next declaration.
    Parsed,
}

/// Declared options and arguments, the argument vector, and the cached result
/// of parsing one against the other.
///
/// Every query parses on demand. Repeated queries reuse the cached pass until
/// a new declaration (or [`Clio::set_args`]) invalidates it.
#[derive(Debug)]
pub struct Clio {
    pub(crate) program: String,
    argv: Vec<String>,
    pub(crate) options: Vec<CliOption>,
    pub(crate) arguments: Vec<Argument>,
    overflow: Vec<Argument>,
    index: HashMap<String, OptionId>,
    cursor: usize,
    state: ParseState,
    pub(crate) settings: Settings,
}

impl Clio {
    /// Create an engine over an already tokenized argument vector.
    ///
    /// `argv` must not contain the program name.
    pub fn new<I, S>(program: impl Into<String>, argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            argv: argv.into_iter().map(Into::into).collect(),
            options: Vec::new(),
            arguments: Vec::new(),
            overflow: Vec::new(),
            index: HashMap::new(),
            cursor: 0,
            state: ParseState::Unparsed,
            settings: Settings::default(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Replace the argument vector. The next query parses again.
    pub fn set_args<I, S>(&mut self, argv: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.argv = argv.into_iter().map(Into::into).collect();
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.state = ParseState::Unparsed;
    }

    /// Declare a named option. It starts out as a flag.
    pub fn option(&mut self, name: impl Into<String>) -> Result<OptionBuilder<'_>> {
        let name = name.into();
        validate_name(&name)?;
        if self.options.iter().any(|o| o.answers_to(&name)) {
            return Err(Error::DuplicateOptionName(name));
        }
        debug!(option = %name, "declared option");
        self.invalidate();
        let index = self.options.len();
        self.options.push(CliOption::new(name));
        Ok(OptionBuilder::new(&mut self.options, index))
    }

    /// Declare the next positional argument.
    pub fn argument(&mut self, name: impl Into<String>) -> ArgumentBuilder<'_> {
        let name = name.into();
        debug!(argument = %name, "declared argument");
        self.invalidate();
        let index = self.arguments.len();
        self.arguments.push(Argument::new(name));
        ArgumentBuilder::new(&mut self.arguments[index])
    }

    /// Declared options in declaration order.
    pub fn options(&self) -> impl Iterator<Item = &CliOption> {
        self.options.iter()
    }

    /// Declared arguments followed by the implicit ones of the last pass.
    pub fn arguments(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter().chain(&self.overflow)
    }

    /// Run a parse pass unless the cached one is still valid.
    ///
    /// A failed pass leaves the engine unparsed, so it can be retried.
    pub fn parse(&mut self) -> Result<()> {
        if self.state == ParseState::Parsed {
            return Ok(());
        }

        self.state = ParseState::Parsing;
        debug!(program = %self.program, tokens = self.argv.len(), "parse pass started");

        let argv = std::mem::take(&mut self.argv);
        let result = self.run(&argv);
        self.argv = argv;

        match result {
            Ok(()) => {
                self.state = ParseState::Parsed;
                debug!(positionals = self.cursor, "parse pass finished");
                Ok(())
            }
            Err(err) => {
                self.state = ParseState::Unparsed;
                debug!(error = %err, "parse pass failed");
                Err(err)
            }
        }
    }

    fn run(&mut self, argv: &[String]) -> Result<()> {
        self.reset();
        self.flatten();

        let mut tokens = argv.iter().map(String::as_str);
        while let Some(token) = tokens.next() {
            trace!(token, "dispatching token");
            if token == "--" {
                // A long option with no name.
                continue;
            } else if let Some(body) = token.strip_prefix("--") {
                self.long_option(body, &mut tokens)?;
            } else if let Some(cluster) = token.strip_prefix('-').filter(|c| !c.is_empty()) {
                self.short_cluster(cluster, &mut tokens)?;
            } else {
                self.bind_positional(token)?;
            }
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.options.iter_mut().for_each(CliOption::reset);
        self.arguments.iter_mut().for_each(Argument::reset);
        self.overflow.clear();
        self.cursor = 0;
    }

    /// Map every primary name and alias to its option.
    fn flatten(&mut self) {
        self.index.clear();
        for (i, option) in self.options.iter().enumerate() {
            let id = OptionId(i);
            self.index.insert(option.name.clone(), id);
            for alias in &option.aliases {
                self.index.insert(alias.clone(), id);
            }
        }
    }

    /// `shown` is the name as typed, dashes included.
    fn lookup(&self, name: &str, shown: &str) -> Result<OptionId> {
        self.index.get(name).copied().ok_or_else(|| Error::UnknownOption(shown.to_string()))
    }

    /// `--name` or `--name=value`.
    fn long_option<'t>(
        &mut self,
        body: &'t str,
        tokens: &mut impl Iterator<Item = &'t str>,
    ) -> Result<()> {
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let shown = format!("--{name}");
        let id = self.lookup(name, &shown)?;
        self.assign(id, shown, inline, tokens)
    }

    /// `-abc`: flags are counted left to right until a value-bearing letter,
    /// which takes the rest of the cluster (or the next token) as its value.
    fn short_cluster<'t>(
        &mut self,
        cluster: &'t str,
        tokens: &mut impl Iterator<Item = &'t str>,
    ) -> Result<()> {
        for (pos, letter) in cluster.char_indices() {
            let end = pos + letter.len_utf8();
            let name = &cluster[pos..end];
            let shown = format!("-{name}");
            let id = self.lookup(name, &shown)?;
            if self.options[id.0].kind.takes_value() {
                let rest = &cluster[end..];
                return self.assign(id, shown, (!rest.is_empty()).then_some(rest), tokens);
            }
            self.assign(id, shown, None, tokens)?;
        }
        Ok(())
    }

    /// Record one occurrence of an option, typed as `shown`.
    fn assign<'t>(
        &mut self,
        id: OptionId,
        shown: String,
        inline: Option<&'t str>,
        tokens: &mut impl Iterator<Item = &'t str>,
    ) -> Result<()> {
        let option = &mut self.options[id.0];
        option.mark_present();
        if !option.kind.takes_value() {
            return Ok(());
        }

        let raw = match (inline, option.kind.defaults()) {
            (Some(value), _) => vec![value.to_string()],
            // Defaults land once per pass, however often the option is bare.
            (None, Some(_)) if option.defaults_applied => return Ok(()),
            (None, Some(defaults)) => {
                let defaults = defaults.to_vec();
                option.defaults_applied = true;
                defaults
            }
            (None, None) => {
                let value = next_value(tokens).ok_or_else(|| Error::MissingOptionValue(shown.clone()))?;
                vec![value.to_string()]
            }
        };

        for raw in raw {
            let value = match option.kind {
                OptionKind::Path { .. } => resolve_path(&raw)?,
                _ => raw,
            };
            option.rules.check(&shown, &value)?;
            trace!(option = %option.name, value = %value, "assigned value");
            option.store(value);
        }
        Ok(())
    }

    fn bind_positional(&mut self, token: &str) -> Result<()> {
        let position = self.cursor;
        match self.arguments.get_mut(position) {
            Some(argument) => argument.assign(token)?,
            None => {
                let mut argument = Argument::implicit(position);
                argument.assign(token)?;
                self.overflow.push(argument);
            }
        }
        self.cursor += 1;
        Ok(())
    }

    fn find(&mut self, name: &str) -> Result<&CliOption> {
        let id = self.resolve(name)?;
        Ok(&self.options[id.0])
    }

    /// The option that `name` (primary or alias) refers to.
    pub fn resolve(&mut self, name: &str) -> Result<OptionId> {
        self.parse()?;
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| Error::usage(format!("option {} was not declared", dashed(name))))
    }

    pub fn was_present(&mut self, name: &str) -> Result<bool> {
        Ok(self.find(name)?.was_present())
    }

    /// How many times the option occurred, under any of its names.
    pub fn presence_count(&mut self, name: &str) -> Result<usize> {
        Ok(self.find(name)?.count())
    }

    /// The value given on the command line, else the declared default.
    pub fn value(&mut self, name: &str) -> Result<Option<&str>> {
        let option = self.find(name)?;
        if !option.kind.takes_value() {
            return Err(Error::usage(format!(
                "{} options do not have values",
                option.kind.label()
            )));
        }
        Ok(option.value())
    }

    /// Every value of a multi-valued option, in occurrence order.
    pub fn value_list(&mut self, name: &str) -> Result<&[String]> {
        let option = self.find(name)?;
        match &option.kind {
            OptionKind::MultiValued { .. } => {
                option.values().ok_or_else(|| Error::MissingOptionValue(dashed(name)))
            }
            OptionKind::Value { .. } | OptionKind::Path { .. } => {
                Err(Error::usage("value and path options only have one value"))
            }
            OptionKind::Flag | OptionKind::Accumulator => Err(Error::usage(format!(
                "{} options do not have values",
                option.kind.label()
            ))),
        }
    }

    /// Values of value-bearing options that have one, keyed by primary name.
    pub fn option_values(&mut self) -> Result<IndexMap<String, String>> {
        self.parse()?;
        Ok(self
            .options
            .iter()
            .filter(|o| o.kind.takes_value())
            .filter_map(|o| o.value().map(|v| (o.name.clone(), v.to_string())))
            .collect())
    }

    /// Every declared argument, then every implicit one, in positional order.
    ///
    /// A declared argument with no token maps to an empty string.
    pub fn argument_values(&mut self) -> Result<IndexMap<String, String>> {
        self.parse()?;
        Ok(self
            .arguments()
            .map(|a| (a.name.clone(), a.value().unwrap_or_default().to_string()))
            .collect())
    }

    pub fn argument_value(&mut self, name: &str) -> Result<Option<&str>> {
        self.parse()?;
        self.arguments
            .iter()
            .chain(&self.overflow)
            .find(|a| a.name == name)
            .map(Argument::value)
            .ok_or_else(|| Error::usage(format!("argument `{name}` was not declared")))
    }

    /// Number of positional tokens bound by the last pass.
    pub fn argument_count(&mut self) -> Result<usize> {
        self.parse()?;
        Ok(self.cursor)
    }
}

/// Pull the next token as an option value, refusing anything option-like.
fn next_value<'t>(tokens: &mut impl Iterator<Item = &'t str>) -> Option<&'t str> {
    tokens.next().filter(|v| !v.is_empty() && !v.starts_with('-'))
}
