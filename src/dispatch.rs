//! Dispatcher: resolves one input line to one handler invocation.
//!
//! Resolution is greedy and left to right. Each word is bound as an
//! argument while the current command still has an unfilled parameter
//! (required or defaultable); only then is it looked up as a subcommand.
//! Descending into a subcommand carries the values bound so far into the
//! child's chain, and the context value is injected at most once, at the
//! first parameter whose type accepts it.

use std::sync::Arc;

use crate::chain::{ChainError, ParameterChain};
use crate::error::DispatchError;
use crate::parser::ParserRegistry;
use crate::reader::WordReader;
use crate::tree::{Command, CommandNode};
use crate::value::{Args, Value};

/// Read-only command tree plus the parsers used to bind arguments.
///
/// Cloning is cheap and clones share the tree, so one dispatcher can serve
/// any number of threads.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    root: Arc<CommandNode>,
    parsers: Arc<ParserRegistry>,
}

/// A fully resolved invocation that has not run yet.
#[derive(Debug)]
pub struct Resolved<'a> {
    pub node: &'a CommandNode,
    pub command: &'a Command,
    pub args: Args,
}

impl Resolved<'_> {
    /// Run the handler with the bound arguments.
    pub fn execute(&self) -> Result<(), DispatchError> {
        tracing::debug!(command = self.command.name(), args = %self.args, "Executing command");
        self.command
            .execute(&self.args)
            .map_err(|source| DispatchError::Handler {
                command: self.command.name().to_string(),
                source,
            })
    }
}

impl Dispatcher {
    pub fn new(root: Arc<CommandNode>, parsers: Arc<ParserRegistry>) -> Self {
        Self { root, parsers }
    }

    pub fn root(&self) -> &CommandNode {
        &self.root
    }

    pub fn parsers(&self) -> &Arc<ParserRegistry> {
        &self.parsers
    }

    /// Walk the tree by names or aliases.
    pub fn find_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&CommandNode> {
        self.root.find_path(path)
    }

    /// Resolve and execute `input`.
    pub fn dispatch(&self, context: Option<&Value>, input: &str) -> Result<(), DispatchError> {
        self.resolve(context, input)?.execute()
    }

    /// Resolve `input` to a command and its complete argument vector.
    pub fn resolve(&self, context: Option<&Value>, input: &str) -> Result<Resolved<'_>, DispatchError> {
        let mut reader = WordReader::new(input);
        let Ok(first) = reader.read_word() else {
            return Err(DispatchError::EmptyInput);
        };

        let (mut node, mut command) = child(&self.root, first)?;
        tracing::trace!(command = command.name(), "Resolved command");
        let mut chain = command.chain();
        offer_context(&mut chain, Vec::new(), context).map_err(|e| incompatible(command, e))?;

        while let Ok(word) = reader.read_word() {
            // An open slot wins over a subcommand of the same name.
            if let Some(ty) = chain.next_type() {
                let value = self.parsers.parse(word, ty)?;
                tracing::trace!(command = command.name(), word, ty = %ty, "Bound argument");
                chain.offer(value).map_err(|e| incompatible(command, e))?;
                continue;
            }

            let carry = chain.bound().to_vec();
            (node, command) = child(node, word)?;
            tracing::trace!(command = command.name(), carried = carry.len(), "Descended into subcommand");
            chain = command.chain();
            offer_context(&mut chain, carry, context).map_err(|e| incompatible(command, e))?;
        }

        if chain.requires_further() {
            reader.reset();
            return Err(DispatchError::TooFewArguments {
                remaining: reader.read_remaining().unwrap_or_default().to_string(),
            });
        }

        let args = chain.complete().map_err(|e| incompatible(command, e))?;
        Ok(Resolved { node, command, args })
    }
}

fn child<'t>(node: &'t CommandNode, word: &str) -> Result<(&'t CommandNode, &'t Command), DispatchError> {
    node.find(word)
        .and_then(|child| child.command().map(|command| (child, command)))
        .ok_or_else(|| DispatchError::NoMatchingCommand {
            word: word.to_string(),
        })
}

fn incompatible(command: &Command, source: ChainError) -> DispatchError {
    DispatchError::IncompatibleArguments {
        command: command.name().to_string(),
        source,
    }
}

/// Seed a freshly entered command's chain with the context value and the
/// values carried from its parent.
///
/// The context takes the next slot when that slot's type accepts it, unless
/// the carried values already start with it. When the slot does not accept
/// it, a leading carried context is dropped since only an ancestor used it.
fn offer_context(
    chain: &mut ParameterChain<'_>,
    carry: Vec<Value>,
    context: Option<&Value>,
) -> Result<(), ChainError> {
    if !chain.accepts_further() && carry.is_empty() {
        return Ok(());
    }

    let carries_context = matches!((carry.first(), context), (Some(first), Some(ctx)) if first == ctx);
    let mut carry = carry.into_iter();
    match context {
        Some(ctx) if chain.next_type().is_some_and(|ty| ty.accepts(ctx)) => {
            if !carries_context {
                chain.offer(ctx.clone())?;
            }
        }
        _ => {
            if carries_context {
                carry.next();
            }
        }
    }
    chain.offer_all(carry)
}
