//! Evaluate sqi expressions against JSON input

use super::CliError;
use crate::{EvalOptions, compile};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The expression to evaluate
    pub expression: String,
    /// JSON input string
    pub input: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
    /// Treat comparisons between mismatched kinds as errors
    pub strict: bool,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
}

impl CheckOptions {
    pub fn eval_options(&self) -> EvalOptions {
        EvalOptions::default().with_strict(self.strict)
    }
}

/// Result of a check operation
#[derive(Debug, Clone, PartialEq)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Expression evaluated successfully with JSON output
    Success(serde_json::Value),
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let expr = compile(&options.expression)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let input: serde_json::Value = serde_json::from_str(json_str)?;

    let result = expr.eval(&input, &options.eval_options())?;
    Ok(CheckResult::Success(result.to_json()))
}
