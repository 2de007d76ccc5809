//! TOML command manifest.
//!
//! A manifest declares commands without code: each command replies with a
//! rendered template. It is the configuration layer used by the binary.

mod loader;
mod types;

pub use loader::ManifestError;
pub use types::{Aliases, CommandEntry, Manifest, ParamEntry, Settings};

use std::sync::Arc;

use crate::registration::CommandSpec;
use crate::value::{Args, ParamType, Value};

/// Type tag of the [`Session`] context value.
pub const SESSION_TAG: &str = "session";

/// Where rendered replies go.
pub type ReplySink = Arc<dyn Fn(String) + Send + Sync>;

/// Per-caller context handed to every dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: String,
}

impl Session {
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }

    pub fn into_value(self) -> Value {
        Value::custom(SESSION_TAG, self)
    }
}

impl Manifest {
    /// Build one registrable spec per manifest command.
    pub fn into_specs(&self, sink: ReplySink) -> Vec<CommandSpec> {
        self.commands
            .iter()
            .map(|entry| entry.to_spec(Arc::clone(&sink)))
            .collect()
    }
}

impl CommandEntry {
    fn to_spec(&self, sink: ReplySink) -> CommandSpec {
        let template = self.reply.clone();
        let name = self.name.clone();
        let mut spec = CommandSpec::new(self.name.clone(), move |args: &Args| {
            let line = match &template {
                Some(template) => render(template, args),
                None => format!("{name} {args}"),
            };
            sink(line);
            Ok(())
        })
        .parent(self.parent.iter().cloned())
        .aliases(self.aliases.to_vec());

        for param in &self.params {
            let ty = ParamType::from_name(&param.ty);
            spec = match &param.default {
                Some(text) => spec.defaults_to(ty, text.clone()),
                None => spec.param(ty),
            };
        }
        spec
    }
}

/// Replace each `{n}` in `template` with argument `n`.
///
/// Placeholders that are not a valid index are kept verbatim.
pub fn render(template: &str, args: &Args) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        match after[..close].parse::<usize>().ok().and_then(|i| args.value(i)) {
            Some(value) => out.push_str(&display(value)),
            None => out.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

fn display(value: &Value) -> String {
    match value.downcast_ref::<Session>() {
        Some(session) => session.user.clone(),
        None => value.to_string(),
    }
}
