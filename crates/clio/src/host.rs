//! Running as the process's own command line: engine configuration, building
//! from the environment, and the print-and-exit error path.

use std::path::Path;

use crate::engine::Clio;
use crate::error::{Error, Result};
use crate::option::CliOption;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Answer `--help` by printing help and exiting in [`Clio::parse_or_exit`].
    pub auto_help: bool,
    /// Replaces the whole generated help screen.
    pub help_text: Option<String>,
    /// Replaces the generated `Usage:` line.
    pub usage_text: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self { auto_help: true, help_text: None, usage_text: None }
    }
}

/// Result of a host-mode parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Parsing succeeded and the program should carry on.
    Proceed,
    /// `--help` was given; the rendered help screen.
    Help(String),
}

impl Clio {
    /// Build an engine from the process arguments, with `--help`/`-h` declared.
    pub fn from_env() -> Self {
        let mut clio = Self::from_env_without_help();
        clio.declare_help();
        clio
    }

    /// Build an engine from the process arguments.
    ///
    /// The program name is the file name of argv[0].
    pub fn from_env_without_help() -> Self {
        let mut args = std::env::args_os().map(|a| a.to_string_lossy().into_owned());
        let arg0 = args.next().unwrap_or_default();
        let program = Path::new(&arg0)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        let program = program.unwrap_or(arg0);
        Self::new(program, args)
    }

    fn declare_help(&mut self) {
        let mut help = CliOption::new("help".to_string());
        help.aliases.insert("h".to_string());
        help.description = "Show this help".to_string();
        self.options.push(help);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Do not treat `--help` specially in [`Clio::parse_or_exit`].
    pub fn suppress_auto_help(&mut self) -> &mut Self {
        self.settings.auto_help = false;
        self
    }

    pub fn set_help(&mut self, text: impl Into<String>) -> &mut Self {
        self.settings.help_text = Some(text.into());
        self
    }

    pub fn set_usage(&mut self, text: impl Into<String>) -> &mut Self {
        self.settings.usage_text = Some(text.into());
        self
    }

    /// Parse, and report whether the help screen was asked for.
    pub fn parse_with_help(&mut self) -> Result<ParseOutcome> {
        self.parse()?;
        let wants_help = self.settings.auto_help
            && self.options.iter().any(|o| o.answers_to("help") && o.was_present());
        if wants_help {
            return Ok(ParseOutcome::Help(self.help()));
        }
        Ok(ParseOutcome::Proceed)
    }

    /// The message printed for a failed parse: the error, then the help screen.
    pub fn render_error(&self, err: &Error) -> String {
        format!("error: {err}\n\n{}", self.help())
    }

    /// Parse for a command line program.
    ///
    /// On error, prints the error and help to stderr and exits with the
    /// error's exit code. When help was asked for, prints it and exits 0.
    pub fn parse_or_exit(&mut self) {
        match self.parse_with_help() {
            Ok(ParseOutcome::Proceed) => {}
            Ok(ParseOutcome::Help(text)) => {
                print!("{text}");
                std::process::exit(0);
            }
            Err(err) => {
                tracing::debug!(error = ?err, "exiting after parse error");
                eprint!("{}", self.render_error(&err));
                std::process::exit(err.exit_code());
            }
        }
    }
}
