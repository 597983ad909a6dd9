//! Shared output layer for human/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its result
//! accordingly. Results go to stdout; errors and the timing report go to
//! stderr so `--json` output stays parseable.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--json` flag
//! 2. `[output] format` from `strata.toml`, then the user config
//! 3. Default: [`OutputMode::Human`]

use std::io::{self, Write};

use serde::Serialize;
use strata_analysis::PipelineError;
use strata_core::{ErrorCode, GraphError, LoadError};

/// Shared width for human separators.
pub const RULE_WIDTH: usize = 72;

/// Write a horizontal separator.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<14} {}", format!("{key}:"), value.as_ref())
}

/// Join node ids as `0, 1, 2`.
pub fn join_ids(ids: &[usize]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    /// Resolve from the `--json` flag and the configured format name.
    pub fn resolve(json_flag: bool, configured: &str) -> Self {
        if json_flag || configured.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Human
        }
    }
}

/// Render a serializable value to stdout in the requested format.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Human => human_fn(value, &mut out)?,
    }
    Ok(())
}

/// A structured error with an optional hint and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Stable `E####` code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    pub fn with_code(message: String, code: ErrorCode) -> Self {
        Self {
            message,
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

/// Classify an error chain by the first typed error it contains.
impl From<&anyhow::Error> for CliError {
    fn from(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");
        let code = err.chain().find_map(|cause| {
            cause
                .downcast_ref::<LoadError>()
                .map(LoadError::code)
                .or_else(|| cause.downcast_ref::<PipelineError>().map(PipelineError::code))
                .or_else(|| cause.downcast_ref::<GraphError>().map(GraphError::code))
        });

        Self::with_code(message, code.unwrap_or(ErrorCode::InternalUnexpected))
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({ "error": error });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Human => {
            match &error.error_code {
                Some(code) => writeln!(out, "error[{code}]: {}", error.message)?,
                None => writeln!(out, "error: {}", error.message)?,
            }
            if let Some(suggestion) = &error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}
