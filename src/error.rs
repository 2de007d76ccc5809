//! Error types for registration, argument parsing and dispatch.
//!
//! Every failure carries enough context (the offending word, the unconsumed
//! tail, the command being registered) for a caller to render a helpful
//! message. Nothing here is logged by the library itself.

use thiserror::Error;

use crate::chain::ChainError;
use crate::value::ParamType;

/// A token could not be converted to the type a parameter expects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}: '{input}'")]
pub struct ParseError {
    /// Why the conversion failed (e.g. "not a number").
    pub reason: String,
    /// The text that was offered.
    pub input: String,
}

impl ParseError {
    pub fn new(reason: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            input: input.into(),
        }
    }
}

/// Errors raised while building the command tree.
///
/// Any of these aborts the whole group being registered; the tree is left
/// exactly as it was before the group was offered.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// A command names a parent path that does not exist in the tree.
    #[error("Missing parent node '{parent}' for command '{command}'")]
    MissingParent { command: String, parent: String },

    /// A command name or alias contains forbidden characters or is empty.
    #[error("Invalid command name: '{name}'")]
    InvalidName { name: String },

    /// The handler-owner instance for a group could not be constructed.
    #[error("No instance of command group '{group}' could be created: {source}")]
    NoOwner {
        group: String,
        #[source]
        source: anyhow::Error,
    },

    /// A default value was declared for a type no parser covers.
    #[error("No parser for type '{ty}' to pre-parse a default of command '{command}'")]
    NoParser { command: String, ty: ParamType },

    /// A declared default value does not parse as its parameter type.
    #[error("Invalid default value for command '{command}': {source}")]
    InvalidDefault {
        command: String,
        #[source]
        source: ParseError,
    },
}

/// Errors that terminate a single dispatch call.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The input contained nothing to read.
    #[error("No empty input allowed")]
    EmptyInput,

    /// A word matched neither an argument slot nor a child command.
    #[error("No matching command found: '{word}'")]
    NoMatchingCommand { word: String },

    /// Input ran out while required parameters were still unbound.
    #[error("Too few arguments: '{remaining}'")]
    TooFewArguments { remaining: String },

    /// A word could not be converted to the next parameter's type.
    #[error("Invalid argument: {0}")]
    Parse(#[from] ParseError),

    /// Values carried from a parent command do not fit the child's parameters.
    #[error("Arguments do not fit command '{command}': {source}")]
    IncompatibleArguments {
        command: String,
        #[source]
        source: ChainError,
    },

    /// The resolved handler ran and reported a failure.
    #[error("Command '{command}' failed: {source}")]
    Handler {
        command: String,
        #[source]
        source: anyhow::Error,
    },

    /// A background dispatch panicked or was cancelled before it finished.
    #[error("Dispatch task aborted")]
    Aborted,
}

impl DispatchError {
    /// The raw user input involved in the failure, if any.
    pub fn input(&self) -> Option<&str> {
        match self {
            DispatchError::EmptyInput => Some(""),
            DispatchError::NoMatchingCommand { word } => Some(word),
            DispatchError::TooFewArguments { remaining } => Some(remaining),
            DispatchError::Parse(err) => Some(&err.input),
            DispatchError::IncompatibleArguments { .. }
            | DispatchError::Handler { .. }
            | DispatchError::Aborted => None,
        }
    }

    /// Stable tag for machine-readable output.
    pub fn error_type(&self) -> &'static str {
        match self {
            DispatchError::EmptyInput => "empty_input",
            DispatchError::NoMatchingCommand { .. } => "no_matching_command",
            DispatchError::TooFewArguments { .. } => "too_few_arguments",
            DispatchError::Parse(_) => "parse_error",
            DispatchError::IncompatibleArguments { .. } => "incompatible_arguments",
            DispatchError::Handler { .. } => "handler_error",
            DispatchError::Aborted => "aborted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("not a number", "abc");
        assert_eq!(err.to_string(), "not a number: 'abc'");
    }

    #[test]
    fn test_dispatch_error_input_and_type() {
        let err = DispatchError::NoMatchingCommand {
            word: "nope".to_string(),
        };
        assert_eq!(err.input(), Some("nope"));
        assert_eq!(err.error_type(), "no_matching_command");

        let err = DispatchError::from(ParseError::new("not a boolean", "maybe"));
        assert_eq!(err.input(), Some("maybe"));
        assert_eq!(err.error_type(), "parse_error");

        assert_eq!(DispatchError::EmptyInput.input(), Some(""));
        assert_eq!(DispatchError::Aborted.input(), None);
    }

    #[test]
    fn test_registration_error_messages() {
        let err = RegistrationError::MissingParent {
            command: "child".to_string(),
            parent: "ghost".to_string(),
        };
        assert!(err.to_string().contains("ghost"));

        let err = RegistrationError::NoParser {
            command: "cmd".to_string(),
            ty: ParamType::Custom("point".to_string()),
        };
        assert!(err.to_string().contains("point"));
    }
}
