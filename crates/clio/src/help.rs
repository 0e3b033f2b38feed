//! Plain-text help rendering from engine metadata.
//!
//! The renderer only sees [`OptionInfo`] and [`ArgumentInfo`], never the
//! engine itself, so other front-ends can consume the same metadata.

use serde::Serialize;

use crate::engine::Clio;
use crate::option::dashed;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct OptionInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub kind: &'static str,
    pub takes_value: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArgumentInfo {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub is_path: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Clio {
    pub fn option_infos(&self) -> Vec<OptionInfo> {
        self.options()
            .map(|o| OptionInfo {
                name: o.name().to_string(),
                aliases: o.aliases().map(str::to_string).collect(),
                description: o.description().to_string(),
                kind: o.kind().label(),
                takes_value: o.kind().takes_value(),
            })
            .collect()
    }

    pub fn argument_infos(&self) -> Vec<ArgumentInfo> {
        self.arguments()
            .map(|a| ArgumentInfo {
                name: a.name().to_string(),
                description: a.description().to_string(),
                is_path: a.is_path(),
                value: a.value().map(str::to_string),
            })
            .collect()
    }

    /// The help screen: the configured override, or one rendered from metadata.
    pub fn help(&self) -> String {
        if let Some(text) = &self.settings.help_text {
            return text.clone();
        }
        // Only declared arguments belong in help.
        let arguments: Vec<ArgumentInfo> =
            self.argument_infos().into_iter().take(self.arguments.len()).collect();
        render_help(
            &self.program,
            self.settings.usage_text.as_deref(),
            &arguments,
            &self.option_infos(),
        )
    }
}

fn format_option_left(info: &OptionInfo) -> String {
    let mut out = std::iter::once(info.name.as_str())
        .chain(info.aliases.iter().map(String::as_str))
        .map(dashed)
        .collect::<Vec<_>>()
        .join(", ");
    if info.takes_value {
        out.push_str(" <VALUE>");
    }
    out
}

fn push_rows(out: &mut String, title: &str, rows: Vec<(String, &str)>) {
    if rows.is_empty() {
        return;
    }
    out.push_str(&format!("\n{title}:\n"));
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            out.push_str(&format!("  {left}\n"));
        } else {
            out.push_str(&format!("  {left:width$}  {help}\n"));
        }
    }
}

/// Render a help message.
///
/// `usage` replaces the generated `Usage:` line when given.
pub fn render_help(
    program: &str,
    usage: Option<&str>,
    arguments: &[ArgumentInfo],
    options: &[OptionInfo],
) -> String {
    let mut out = String::new();
    match usage.map(str::trim).filter(|u| !u.is_empty()) {
        Some(usage) => out.push_str(&format!("Usage: {usage}\n")),
        None => {
            let mut line = program.to_string();
            if !options.is_empty() {
                line.push_str(" [OPTIONS]");
            }
            for arg in arguments {
                line.push_str(&format!(" <{}>", arg.name));
            }
            out.push_str(&format!("Usage: {line}\n"));
        }
    }

    let rows = arguments
        .iter()
        .map(|a| (format!("<{}>", a.name), a.description.trim()))
        .collect();
    push_rows(&mut out, "Arguments", rows);

    let rows = options
        .iter()
        .map(|o| (format_option_left(o), o.description.trim()))
        .collect();
    push_rows(&mut out, "Options", rows);

    out
}
