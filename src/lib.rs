//! Resolve a typed input line into exactly one registered command invocation.
//!
//! Commands live in a tree of case-insensitive names and aliases. A
//! [`Registrar`] builds the tree from [`CommandSpec`]s, then freezes it into
//! a [`Dispatcher`], which tokenizes each line, walks the tree, binds typed
//! arguments and runs the matching handler.

pub mod chain;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod parser;
pub mod reader;
pub mod registration;
pub mod task;
pub mod tree;
pub mod value;

pub use dispatch::{Dispatcher, Resolved};
pub use error::{DispatchError, ParseError, RegistrationError};
pub use parser::ParserRegistry;
pub use registration::{CommandGroup, CommandSpec, Registrar};
pub use task::{AsyncDispatcher, DispatchHandle};
pub use tree::{Command, CommandNode, Handler};
pub use value::{Args, FromValue, ParamType, Value};
