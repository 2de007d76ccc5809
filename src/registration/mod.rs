//! Registration engine: builds the command tree from [`CommandSpec`]s.
//!
//! A group of specs is registered atomically. Names are validated and
//! defaults pre-parsed before the tree is touched; nodes are then inserted
//! into a copy of the tree, shallowest parent path first, and the copy
//! replaces the live tree only when every spec in the group found its parent.

mod spec;
mod validate;

pub use spec::{CommandGroup, CommandSpec, DefaultText, ParamDecl};
pub use validate::{check_command_name, is_valid_command_name, split_aliases};

use std::sync::Arc;

use crate::dispatch::Dispatcher;
use crate::error::{ParseError, RegistrationError};
use crate::parser::ParserRegistry;
use crate::tree::{Command, CommandNode, ParameterSpec};
use crate::value::{ParamType, Value};

/// A validated command ready to be inserted under its parent path.
struct Staged {
    parent: Vec<String>,
    aliases: Vec<String>,
    node: CommandNode,
}

impl Staged {
    fn name(&self) -> &str {
        self.node.name().unwrap_or_default()
    }
}

/// Mutable builder for the command tree.
///
/// Once every group is registered, [`finish`](Self::finish) freezes the
/// tree into a shareable [`Dispatcher`].
#[derive(Debug, Default)]
pub struct Registrar {
    root: CommandNode,
    parsers: Arc<ParserRegistry>,
}

impl Registrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom parser. Do this before registering commands whose
    /// defaults use the type.
    pub fn register_parser<F>(&mut self, ty: ParamType, parser: F) -> &mut Self
    where
        F: Fn(&str) -> Result<Value, ParseError> + Send + Sync + 'static,
    {
        self.parsers.register(ty, parser);
        self
    }

    /// The tree built so far.
    pub fn root(&self) -> &CommandNode {
        &self.root
    }

    /// Construct a handler owner through `factory` and register its commands.
    pub fn register_group<T, F>(&mut self, factory: F) -> Result<&mut Self, RegistrationError>
    where
        T: CommandGroup,
        F: FnOnce() -> anyhow::Result<T>,
    {
        let owner = factory().map_err(|source| RegistrationError::NoOwner {
            group: std::any::type_name::<T>().to_string(),
            source,
        })?;
        self.register(Arc::new(owner).commands())
    }

    /// Register one group of commands, all or nothing.
    pub fn register(&mut self, specs: Vec<CommandSpec>) -> Result<&mut Self, RegistrationError> {
        let mut staged = specs
            .iter()
            .map(|spec| self.stage(spec))
            .collect::<Result<Vec<_>, _>>()?;

        // Shallower parents first, so a node replaced by this group is in
        // place before anything is attached beneath it.
        staged.sort_by_cached_key(|s| {
            (
                s.parent.len(),
                s.parent.join(" ").to_lowercase(),
                s.name().to_lowercase(),
            )
        });

        let mut root = self.root.clone();
        let count = staged.len();
        for item in staged {
            let Some(parent) = node_at_mut(&mut root, &item.parent) else {
                return Err(RegistrationError::MissingParent {
                    parent: first_missing(&root, &item.parent),
                    command: item.name().to_string(),
                });
            };
            tracing::debug!(
                command = item.name(),
                parent = %item.parent.join(" "),
                aliases = ?item.aliases,
                "Registered command"
            );
            parent.add_child(&item.aliases, item.node);
        }

        self.root = root;
        tracing::debug!(count, "Registered command group");
        Ok(self)
    }

    /// Freeze the tree. It is read-only from here on.
    pub fn finish(self) -> Dispatcher {
        Dispatcher::new(Arc::new(self.root), self.parsers)
    }

    fn stage(&self, spec: &CommandSpec) -> Result<Staged, RegistrationError> {
        check_command_name(spec.name())?;
        for alias in spec.alias_names() {
            check_command_name(alias)?;
        }

        let mut defaults = Vec::with_capacity(spec.params().len());
        for decl in spec.params() {
            defaults.push(self.pre_parse(spec.name(), decl)?);
        }

        // Only the unbroken trailing run of defaults is honoured.
        let boundary = defaults
            .iter()
            .rposition(Option::is_none)
            .map_or(0, |i| i + 1);
        let mut parameters = Vec::with_capacity(defaults.len());
        for (index, (decl, default)) in spec.params().iter().zip(defaults).enumerate() {
            let parameter = match default {
                Some(value) if index >= boundary => ParameterSpec::defaultable(decl.ty.clone(), value),
                Some(_) => {
                    tracing::debug!(
                        command = spec.name(),
                        index,
                        "Default ignored on parameter followed by a required one"
                    );
                    ParameterSpec::required(decl.ty.clone())
                }
                None => ParameterSpec::required(decl.ty.clone()),
            };
            parameters.push(parameter);
        }

        let command = Command::new(spec.name(), parameters, spec.handler());
        Ok(Staged {
            parent: spec.parent_path().to_vec(),
            aliases: spec.alias_names().to_vec(),
            node: CommandNode::new(command),
        })
    }

    fn pre_parse(&self, command: &str, decl: &ParamDecl) -> Result<Option<Value>, RegistrationError> {
        match &decl.default {
            None => Ok(None),
            Some(DefaultText::Null) => Ok(Some(Value::Null)),
            Some(DefaultText::Text(text)) => {
                if !self.parsers.has(&decl.ty) {
                    return Err(RegistrationError::NoParser {
                        command: command.to_string(),
                        ty: decl.ty.clone(),
                    });
                }
                self.parsers
                    .parse(text, &decl.ty)
                    .map(Some)
                    .map_err(|source| RegistrationError::InvalidDefault {
                        command: command.to_string(),
                        source,
                    })
            }
        }
    }
}

fn node_at_mut<'a>(root: &'a mut CommandNode, path: &[String]) -> Option<&'a mut CommandNode> {
    path.iter().try_fold(root, |node, name| node.find_mut(name))
}

/// Name of the first segment of `path` that does not resolve.
fn first_missing(root: &CommandNode, path: &[String]) -> String {
    let mut node = root;
    for name in path {
        match node.find(name) {
            Some(child) => node = child,
            None => return name.clone(),
        }
    }
    path.join(" ")
}
