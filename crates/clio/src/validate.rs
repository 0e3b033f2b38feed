//! Post-assignment checks shared by every value-bearing option kind.

use std::borrow::Cow;
use std::fmt;

use regex::Regex;

use crate::error::{Error, Result};

const DELIMITERS: &[char] = &['/', '|', '#', '~', '!', '@', '%', ',', ';', ':', '\''];
const FLAGS: &[char] = &['i', 'm', 's', 'x', 'u', 'U'];

/// A value pattern as declared, plus its compiled form.
///
/// Compilation happens once at declaration. A malformed pattern is kept and
/// only reported when a value actually has to be checked against it.
pub(crate) struct Pattern {
    source: String,
    compiled: Result<Regex, regex::Error>,
}

impl Pattern {
    pub(crate) fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = Regex::new(&strip_delimiters(&source));
        Self { source, compiled }
    }

    pub(crate) fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("source", &self.source)
            .field("valid", &self.compiled.is_ok())
            .finish()
    }
}

/// Turn a delimited pattern (`|\d+|`, `/abc/i`) into plain regex syntax.
///
/// Anything that does not look delimited is returned untouched.
fn strip_delimiters(source: &str) -> Cow<'_, str> {
    let Some(open) = source.chars().next().filter(|c| DELIMITERS.contains(c)) else {
        return Cow::Borrowed(source);
    };
    let Some(end) = source.rfind(open).filter(|&end| end > 0) else {
        return Cow::Borrowed(source);
    };
    let flags = &source[end + 1..];
    if !flags.chars().all(|f| FLAGS.contains(&f)) {
        return Cow::Borrowed(source);
    }

    let body = &source[1..end];
    // Unicode is always on in `regex`.
    let inline: String = flags.chars().filter(|&f| f != 'u').collect();
    if inline.is_empty() {
        Cow::Borrowed(body)
    } else {
        Cow::Owned(format!("(?{inline}){body}"))
    }
}

pub(crate) type Predicate = Box<dyn Fn(&str) -> bool>;

/// Validation attached to one option.
#[derive(Default)]
pub(crate) struct Rules {
    pub(crate) pattern: Option<Pattern>,
    pub(crate) predicate: Option<Predicate>,
    pub(crate) message: Option<String>,
}

impl fmt::Debug for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rules")
            .field("pattern", &self.pattern)
            .field("predicate", &self.predicate.is_some())
            .field("message", &self.message)
            .finish()
    }
}

impl Rules {
    /// Check one value. `option` is the dashed name the user typed.
    pub(crate) fn check(&self, option: &str, value: &str) -> Result<()> {
        if let Some(pattern) = &self.pattern {
            let regex = pattern.compiled.as_ref().map_err(|err| Error::InvalidOptionValue {
                option: option.to_string(),
                message: format!(
                    "pattern `{}` is not a valid regular expression: {err}",
                    pattern.source()
                ),
            })?;
            if !regex.is_match(value) {
                return Err(self.reject(option, || {
                    format!(
                        "the value of `{option}` does not match the pattern `{}`",
                        pattern.source()
                    )
                }));
            }
        }

        if let Some(predicate) = &self.predicate {
            if !predicate(value) {
                return Err(self.reject(option, || format!("the value of `{option}` is not valid")));
            }
        }

        Ok(())
    }

    fn reject(&self, option: &str, fallback: impl FnOnce() -> String) -> Error {
        Error::InvalidOptionValue {
            option: option.to_string(),
            message: self.message.clone().unwrap_or_else(fallback),
        }
    }
}

/// Resolve `raw` to a canonical filesystem path.
pub(crate) fn resolve_path(raw: &str) -> Result<String> {
    std::fs::canonicalize(raw)
        .map(|path| path.to_string_lossy().into_owned())
        .map_err(|source| Error::InvalidPath { path: raw.to_string(), source })
}
