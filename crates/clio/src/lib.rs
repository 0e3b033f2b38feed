//! Declarative command line parsing.
//!
//! Declare positional arguments and named options on a [`Clio`], then query
//! it. The first query parses the argument vector; later queries reuse that
//! result until another declaration is made.
//!
//! ```no_run
//! let mut clio = clio::Clio::from_env();
//! clio.argument("input").should_be_path();
//! clio.option("verbose").unwrap().alias("v").unwrap().accumulates();
//! clio.option("name").unwrap().alias("n").unwrap().with_default_value("world");
//! clio.parse_or_exit();
//!
//! let verbosity = clio.presence_count("v").unwrap();
//! let name = clio.value("name").unwrap().unwrap_or_default().to_string();
//! ```
//!
//! Options come in five kinds (see [`OptionKind`]). Short options cluster
//! (`-abc`); the first value-bearing letter in a cluster takes the rest of the
//! token, or the next token, as its value. Long options take `--name=value`
//! or `--name value`.

mod argument;
mod engine;
mod error;
mod help;
mod host;
mod option;
mod validate;

pub use crate::argument::{Argument, ArgumentBuilder};
pub use crate::engine::{Clio, ParseState};
pub use crate::error::{EXIT_DATAERR, EXIT_SOFTWARE, EXIT_USAGE, Error, Result};
pub use crate::help::{ArgumentInfo, OptionInfo, render_help};
pub use crate::host::{ParseOutcome, Settings};
pub use crate::option::{CliOption, OptionBuilder, OptionId, OptionKind};
