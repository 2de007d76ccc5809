//! Declarative command descriptors consumed by the [`Registrar`](super::Registrar).

use std::fmt;
use std::sync::Arc;

use crate::registration::validate::split_aliases;
use crate::tree::Handler;
use crate::value::{Args, ParamType};

/// Raw text of a declared default, before pre-parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultText {
    /// Explicit "no value"; binds [`Value::Null`](crate::Value::Null).
    Null,
    Text(String),
}

impl DefaultText {
    /// The literal text `null` is the no-value marker for every type.
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        if text == "null" {
            DefaultText::Null
        } else {
            DefaultText::Text(text)
        }
    }
}

/// One declared parameter: a type and an optional default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub ty: ParamType,
    pub default: Option<DefaultText>,
}

/// Everything needed to register one command.
#[derive(Clone)]
pub struct CommandSpec {
    name: String,
    parent: Vec<String>,
    aliases: Vec<String>,
    params: Vec<ParamDecl>,
    handler: Handler,
}

impl CommandSpec {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Args) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::with_handler(name, Arc::new(handler))
    }

    pub fn with_handler(name: impl Into<String>, handler: Handler) -> Self {
        Self {
            name: name.into(),
            parent: Vec::new(),
            aliases: Vec::new(),
            params: Vec::new(),
            handler,
        }
    }

    /// Names of the ancestors, top-level first. Empty means top-level.
    pub fn parent<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parent = path.into_iter().map(Into::into).collect();
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Aliases written as one comma-separated string.
    pub fn alias_list(mut self, list: &str) -> Self {
        self.aliases.extend(split_aliases(list));
        self
    }

    /// Append a parameter that must be supplied.
    pub fn param(mut self, ty: ParamType) -> Self {
        self.params.push(ParamDecl { ty, default: None });
        self
    }

    /// Append a parameter with a default (`"null"` means no value).
    pub fn defaults_to(mut self, ty: ParamType, text: impl Into<String>) -> Self {
        self.params.push(ParamDecl {
            ty,
            default: Some(DefaultText::parse(text)),
        });
        self
    }

    pub fn defaults_to_null(mut self, ty: ParamType) -> Self {
        self.params.push(ParamDecl {
            ty,
            default: Some(DefaultText::Null),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent_path(&self) -> &[String] {
        &self.parent
    }

    pub fn alias_names(&self) -> &[String] {
        &self.aliases
    }

    pub fn params(&self) -> &[ParamDecl] {
        &self.params
    }

    pub(crate) fn handler(&self) -> Handler {
        Arc::clone(&self.handler)
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("aliases", &self.aliases)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// A handler-owner type that declares a group of commands.
///
/// Handlers typically capture the shared owner to reach its state.
pub trait CommandGroup: Send + Sync + 'static {
    fn commands(self: Arc<Self>) -> Vec<CommandSpec>;
}
