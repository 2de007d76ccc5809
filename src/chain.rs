//! Parameter chain: the per-resolution argument binding state machine.
//!
//! A chain is created fresh each time the dispatcher enters a command. Values
//! are bound strictly in declaration order; once input is exhausted the
//! defaultable tail is filled from the pre-parsed defaults.

use thiserror::Error;

use crate::tree::ParameterSpec;
use crate::value::{Args, ParamType, Value};

/// A value could not be bound to the chain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChainError {
    #[error("no more parameters allowed (capacity {capacity})")]
    Full { capacity: usize },

    #[error("invalid type, expected {expected} but was {}", .found.as_ref().map_or("null", ParamType::name))]
    TypeMismatch {
        expected: ParamType,
        found: Option<ParamType>,
    },

    #[error("not all required parameters are satisfied ({bound} of {required})")]
    MissingRequired { bound: usize, required: usize },
}

/// Binding state for one command's parameters.
#[derive(Debug, Clone)]
pub struct ParameterChain<'a> {
    parameters: &'a [ParameterSpec],
    bound: Vec<Value>,
    required_boundary: usize,
}

impl<'a> ParameterChain<'a> {
    pub fn new(parameters: &'a [ParameterSpec], required_boundary: usize) -> Self {
        Self {
            parameters,
            bound: Vec::with_capacity(parameters.len()),
            required_boundary: required_boundary.min(parameters.len()),
        }
    }

    /// Index of the next unfilled parameter.
    pub fn cursor(&self) -> usize {
        self.bound.len()
    }

    /// More values are needed before the required parameters are satisfied.
    pub fn requires_further(&self) -> bool {
        self.cursor() < self.required_boundary
    }

    /// Another value (required or defaultable) can still be bound.
    pub fn accepts_further(&self) -> bool {
        self.cursor() < self.parameters.len()
    }

    /// Type of the next unfilled parameter.
    pub fn next_type(&self) -> Option<&'a ParamType> {
        self.parameters.get(self.cursor()).map(|p| &p.ty)
    }

    /// Bind `value` to the next parameter after checking its type.
    pub fn offer(&mut self, value: Value) -> Result<(), ChainError> {
        let Some(expected) = self.next_type() else {
            return Err(ChainError::Full {
                capacity: self.parameters.len(),
            });
        };
        if !expected.accepts(&value) {
            return Err(ChainError::TypeMismatch {
                expected: expected.clone(),
                found: value.param_type(),
            });
        }
        self.bound.push(value);
        Ok(())
    }

    pub fn offer_all<I>(&mut self, values: I) -> Result<(), ChainError>
    where
        I: IntoIterator<Item = Value>,
    {
        values.into_iter().try_for_each(|value| self.offer(value))
    }

    /// Values bound so far, in parameter order.
    pub fn bound(&self) -> &[Value] {
        &self.bound
    }

    /// Fill every unbound defaultable parameter with its default and return
    /// the complete argument vector.
    pub fn complete(mut self) -> Result<Args, ChainError> {
        if self.requires_further() {
            return Err(ChainError::MissingRequired {
                bound: self.cursor(),
                required: self.required_boundary,
            });
        }
        for parameter in &self.parameters[self.bound.len()..] {
            self.bound
                .push(parameter.default.clone().unwrap_or(Value::Null));
        }
        Ok(Args::new(self.bound))
    }
}
