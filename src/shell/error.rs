use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::common::error::DatabaseError;

/// A command line that could not be parsed.
///
/// Carries the line and the offending span so the shell can point at it.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(scrawl::invalid_command))]
pub struct CommandError {
    pub message: String,

    #[source_code]
    pub src: String,

    #[label("here")]
    pub span: SourceSpan,

    #[help]
    pub help: Option<String>,
}

impl CommandError {
    pub fn new(src: &str, span: impl Into<SourceSpan>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            src: src.to_string(),
            span: span.into(),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl From<CommandError> for DatabaseError {
    fn from(err: CommandError) -> Self {
        DatabaseError::InvalidCommand(err.message)
    }
}
