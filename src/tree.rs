//! Command tree: named nodes with alias lookup.
//!
//! Names are case-insensitive. Each node owns its children under their
//! lower-cased canonical name; aliases are extra lookup keys pointing at a
//! canonical name, never extra nodes. The root is a distinct variant with no
//! name and no handler, so it can never be executed.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::chain::ParameterChain;
use crate::value::{Args, ParamType, Value};

/// Handler invoked with the fully bound argument vector.
pub type Handler = Arc<dyn Fn(&Args) -> anyhow::Result<()> + Send + Sync>;

/// One declared parameter of a command.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub ty: ParamType,
    /// False only for members of the trailing run of defaultable parameters.
    pub required: bool,
    /// Pre-parsed fallback; `Some` exactly when `required` is false.
    pub default: Option<Value>,
}

impl ParameterSpec {
    pub fn required(ty: ParamType) -> Self {
        Self {
            ty,
            required: true,
            default: None,
        }
    }

    pub fn defaultable(ty: ParamType, default: Value) -> Self {
        Self {
            ty,
            required: false,
            default: Some(default),
        }
    }
}

/// An executable command: name, parameter list and handler.
#[derive(Clone)]
pub struct Command {
    name: String,
    parameters: Vec<ParameterSpec>,
    required_boundary: usize,
    handler: Handler,
}

impl Command {
    /// Build a command. Parameters past the last required one form the
    /// defaultable tail; the boundary is derived from them.
    pub fn new(name: impl Into<String>, parameters: Vec<ParameterSpec>, handler: Handler) -> Self {
        let required_boundary = parameters
            .iter()
            .rposition(|p| p.required)
            .map_or(0, |i| i + 1);
        Self {
            name: name.into(),
            parameters,
            required_boundary,
            handler,
        }
    }

    /// The name as declared (original casing).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// Index of the first defaultable parameter.
    pub fn required_boundary(&self) -> usize {
        self.required_boundary
    }

    /// A fresh, empty argument chain for one resolution attempt.
    pub fn chain(&self) -> ParameterChain<'_> {
        ParameterChain::new(&self.parameters, self.required_boundary)
    }

    pub fn execute(&self, args: &Args) -> anyhow::Result<()> {
        (self.handler)(args)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("required_boundary", &self.required_boundary)
            .finish_non_exhaustive()
    }
}

/// What a node is: the nameless root, or an executable command.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Root,
    Command(Command),
}

/// A node of the command tree.
#[derive(Debug, Clone)]
pub struct CommandNode {
    kind: NodeKind,
    /// canonical lower-cased name -> child
    children: HashMap<String, CommandNode>,
    /// lower-cased lookup key (name or alias) -> canonical key
    keys: HashMap<String, String>,
}

impl CommandNode {
    pub fn root() -> Self {
        Self::with_kind(NodeKind::Root)
    }

    pub fn new(command: Command) -> Self {
        Self::with_kind(NodeKind::Command(command))
    }

    fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            children: HashMap::new(),
            keys: HashMap::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self.kind, NodeKind::Root)
    }

    /// The command this node executes; `None` for the root.
    pub fn command(&self) -> Option<&Command> {
        match &self.kind {
            NodeKind::Root => None,
            NodeKind::Command(command) => Some(command),
        }
    }

    /// The declared name; the root has none.
    pub fn name(&self) -> Option<&str> {
        self.command().map(Command::name)
    }

    /// Look up a direct child by name or alias, ignoring case.
    pub fn find(&self, name: &str) -> Option<&CommandNode> {
        let key = self.keys.get(&name.to_lowercase())?;
        self.children.get(key)
    }

    pub(crate) fn find_mut(&mut self, name: &str) -> Option<&mut CommandNode> {
        let key = self.keys.get(&name.to_lowercase())?;
        self.children.get_mut(key)
    }

    /// Register `node` under its lower-cased name and every lower-cased alias.
    ///
    /// Re-adding an existing name replaces that child (and its subtree).
    /// Adding the root as a child is ignored: it has no name.
    pub fn add_child<S: AsRef<str>>(&mut self, aliases: &[S], node: CommandNode) {
        let Some(name) = node.name() else {
            return;
        };
        let canonical = name.to_lowercase();
        self.keys.insert(canonical.clone(), canonical.clone());
        for alias in aliases {
            self.keys
                .insert(alias.as_ref().to_lowercase(), canonical.clone());
        }
        self.children.insert(canonical, node);
    }

    /// Walk a path of names/aliases starting below this node.
    pub fn find_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&CommandNode> {
        path.iter()
            .try_fold(self, |node, name| node.find(name.as_ref()))
    }

    pub fn children(&self) -> impl Iterator<Item = &CommandNode> {
        self.children.values()
    }

    /// All lookup keys (names and aliases) that resolve to a child.
    pub fn lookup_keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }
}

impl Default for CommandNode {
    fn default() -> Self {
        CommandNode::root()
    }
}
