//! Shared fixtures for the dispatch integration tests.

#![allow(dead_code, unused_imports)]

use std::sync::Arc;

use linedispatch::{Args, CommandSpec, Dispatcher, ParamType, Registrar, Value};
use parking_lot::Mutex;

/// Type tag of the [`Ctx`] context value.
pub const CTX: &str = "ctx";

/// Context value handed to dispatches in tests.
#[derive(Debug)]
pub struct Ctx {
    pub command: String,
}

pub fn ctx(command: &str) -> Value {
    Value::custom(
        CTX,
        Ctx {
            command: command.to_string(),
        },
    )
}

pub fn ctx_type() -> ParamType {
    ParamType::custom(CTX)
}

/// Records every handler invocation as (command name, bound arguments).
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<(String, Args)>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A spec whose handler records its invocation.
    pub fn spec(&self, name: &str) -> CommandSpec {
        let calls = Arc::clone(&self.calls);
        let label = name.to_string();
        CommandSpec::new(name, move |args: &Args| {
            calls.lock().push((label.clone(), args.clone()));
            Ok(())
        })
    }

    pub fn calls(&self) -> Vec<(String, Args)> {
        self.calls.lock().clone()
    }

    /// The single recorded call; panics unless exactly one happened.
    pub fn only_call(&self) -> (String, Args) {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one call, got {calls:?}");
        calls.into_iter().next().unwrap()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

/// The reference command set: cmd1 to cmd14 plus aliased abc/def.
pub fn scenario_specs(recorder: &Recorder) -> Vec<CommandSpec> {
    vec![
        recorder.spec("cmd1"),
        recorder.spec("cmd2").param(ParamType::Str).param(ParamType::Str),
        recorder.spec("cmd3").defaults_to(ParamType::Str, "opt"),
        recorder.spec("cmd4").defaults_to(ParamType::Str, "opt"),
        recorder.spec("cmd5").param(ctx_type()),
        recorder.spec("cmd6").param(ctx_type()).param(ParamType::Str),
        recorder
            .spec("cmd7")
            .param(ctx_type())
            .param(ParamType::Str)
            .defaults_to(ParamType::Str, "opt"),
        recorder
            .spec("cmd8")
            .param(ctx_type())
            .param(ParamType::Str)
            .defaults_to(ParamType::Str, "opt"),
        recorder.spec("cmd9").parent(["cmd1"]),
        recorder
            .spec("cmd10")
            .parent(["cmd1"])
            .param(ParamType::Str)
            .defaults_to(ParamType::Str, "hello world"),
        recorder
            .spec("cmd11")
            .parent(["cmd2"])
            .param(ParamType::Str)
            .param(ParamType::Str)
            .param(ParamType::Str),
        recorder.spec("cmd12").param(ParamType::I32),
        recorder.spec("cmd13").defaults_to(ParamType::I32, "13"),
        recorder
            .spec("cmd14")
            .param(ParamType::Bool)
            .param(ParamType::I32)
            .param(ParamType::I64)
            .param(ParamType::F32)
            .param(ParamType::F64),
        recorder.spec("abc").param(ctx_type()).aliases(["a"]),
        recorder.spec("def").param(ctx_type()).alias_list("d,e,f"),
    ]
}

pub fn scenario_dispatcher(recorder: &Recorder) -> Dispatcher {
    let mut registrar = Registrar::new();
    registrar
        .register(scenario_specs(recorder))
        .expect("scenario commands register");
    registrar.finish()
}
