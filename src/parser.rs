//! Parser registry: converts word text into typed [`Value`]s.
//!
//! Built-in parsers cover the scalar [`ParamType`]s and can never be
//! replaced; lookups always try them first. Custom parsers are keyed by
//! type and live behind a read-write lock, so registration can never race
//! with a concurrent `parse`.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::ParseError;
use crate::value::{ParamType, Value};

/// A custom parse function.
pub type ParseFn = Arc<dyn Fn(&str) -> Result<Value, ParseError> + Send + Sync>;

/// Type-to-parser mapping shared by registration and dispatch.
#[derive(Default)]
pub struct ParserRegistry {
    custom: RwLock<HashMap<ParamType, ParseFn>>,
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let custom = self.custom.read();
        let mut types: Vec<&str> = custom.keys().map(ParamType::name).collect();
        types.sort_unstable();
        f.debug_struct("ParserRegistry")
            .field("custom", &types)
            .finish()
    }
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the custom parser for `ty`.
    ///
    /// A parser registered for a built-in type is stored but never consulted.
    pub fn register<F>(&self, ty: ParamType, parser: F)
    where
        F: Fn(&str) -> Result<Value, ParseError> + Send + Sync + 'static,
    {
        if ty.is_builtin() {
            tracing::debug!(ty = %ty, "Custom parser shadowed by built-in parser");
        } else {
            tracing::debug!(ty = %ty, "Registered custom parser");
        }
        self.custom.write().insert(ty, Arc::new(parser));
    }

    /// Whether any parser covers `ty`.
    pub fn has(&self, ty: &ParamType) -> bool {
        ty.is_builtin() || self.custom.read().contains_key(ty)
    }

    /// Parse `input` as `ty`.
    pub fn parse(&self, input: &str, ty: &ParamType) -> Result<Value, ParseError> {
        if let Some(result) = parse_builtin(input, ty) {
            return result;
        }
        // Clone the parser out so user code never runs under the lock.
        let parser = self.custom.read().get(ty).cloned();
        match parser {
            Some(parser) => parser(input),
            None => Err(ParseError::new(
                format!("no parser for type '{ty}'"),
                input,
            )),
        }
    }
}

macro_rules! parse_number {
    ($input:expr, $ty:ty, $variant:ident) => {
        $input
            .parse::<$ty>()
            .map(Value::$variant)
            .map_err(|_| ParseError::new("not a number", $input))
    };
}

/// `None` when `ty` is not a built-in type.
fn parse_builtin(input: &str, ty: &ParamType) -> Option<Result<Value, ParseError>> {
    let result = match ty {
        ParamType::Str => Ok(Value::Str(input.to_string())),
        ParamType::Char => {
            let mut chars = input.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(ParseError::new("not a single character", input)),
            }
        }
        ParamType::Bool => {
            if input.eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if input.eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Err(ParseError::new("not a boolean", input))
            }
        }
        ParamType::I8 => parse_number!(input, i8, I8),
        ParamType::I16 => parse_number!(input, i16, I16),
        ParamType::I32 => parse_number!(input, i32, I32),
        ParamType::I64 => parse_number!(input, i64, I64),
        ParamType::U8 => parse_number!(input, u8, U8),
        ParamType::U16 => parse_number!(input, u16, U16),
        ParamType::U32 => parse_number!(input, u32, U32),
        ParamType::U64 => parse_number!(input, u64, U64),
        ParamType::F32 => parse_number!(input, f32, F32),
        ParamType::F64 => parse_number!(input, f64, F64),
        ParamType::Custom(_) => return None,
    };
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Point(i32, i32);

    fn point_parser(input: &str) -> Result<Value, ParseError> {
        let (x, y) = input
            .split_once(':')
            .ok_or_else(|| ParseError::new("not a point", input))?;
        let x = x.parse().map_err(|_| ParseError::new("not a point", input))?;
        let y = y.parse().map_err(|_| ParseError::new("not a point", input))?;
        Ok(Value::custom("point", Point(x, y)))
    }

    #[test]
    fn test_string_is_identity() {
        let registry = ParserRegistry::new();
        assert_eq!(
            registry.parse("Hello", &ParamType::Str),
            Ok(Value::Str("Hello".into()))
        );
    }

    #[test]
    fn test_char_requires_exactly_one() {
        let registry = ParserRegistry::new();
        assert_eq!(registry.parse("x", &ParamType::Char), Ok(Value::Char('x')));
        assert_eq!(registry.parse("ß", &ParamType::Char), Ok(Value::Char('ß')));
        assert!(registry.parse("xy", &ParamType::Char).is_err());
        assert!(registry.parse("", &ParamType::Char).is_err());
    }

    #[test]
    fn test_bool_case_insensitive_strict() {
        let registry = ParserRegistry::new();
        assert_eq!(registry.parse("TRUE", &ParamType::Bool), Ok(Value::Bool(true)));
        assert_eq!(registry.parse("False", &ParamType::Bool), Ok(Value::Bool(false)));
        let err = registry.parse("yes", &ParamType::Bool).unwrap_err();
        assert_eq!(err.input, "yes");
    }

    #[test]
    fn test_numbers() {
        let registry = ParserRegistry::new();
        assert_eq!(registry.parse("1337", &ParamType::I32), Ok(Value::I32(1337)));
        assert_eq!(registry.parse("-1337", &ParamType::I64), Ok(Value::I64(-1337)));
        assert_eq!(registry.parse("13.37", &ParamType::F32), Ok(Value::F32(13.37)));
        assert_eq!(registry.parse("-13.37", &ParamType::F64), Ok(Value::F64(-13.37)));
        assert_eq!(registry.parse("255", &ParamType::U8), Ok(Value::U8(255)));

        let err = registry.parse("128", &ParamType::I8).unwrap_err();
        assert_eq!(err, ParseError::new("not a number", "128"));
        assert!(registry.parse("12abc", &ParamType::I32).is_err());
        assert!(registry.parse("-1", &ParamType::U32).is_err());
    }

    #[test]
    fn test_custom_parser_registration() {
        let registry = ParserRegistry::new();
        let point = ParamType::custom("point");
        assert!(!registry.has(&point));
        let err = registry.parse("1:2", &point).unwrap_err();
        assert!(err.reason.contains("no parser"));

        registry.register(point.clone(), point_parser);
        assert!(registry.has(&point));
        let value = registry.parse("1:2", &point).unwrap();
        assert_eq!(value.downcast_ref::<Point>().map(|p| (p.0, p.1)), Some((1, 2)));
        assert!(registry.parse("oops", &point).is_err());
    }

    #[test]
    fn test_custom_parser_overwrites_custom_only() {
        let registry = ParserRegistry::new();
        let tag = ParamType::custom("word");
        registry.register(tag.clone(), |_| Ok(Value::custom("word", 1u8)));
        registry.register(tag.clone(), |_| Ok(Value::custom("word", 2u8)));
        let value = registry.parse("x", &tag).unwrap();
        assert_eq!(value.downcast_ref::<u8>(), Some(&2));

        // Built-ins always win.
        registry.register(ParamType::I32, |_| Ok(Value::I32(0)));
        assert_eq!(registry.parse("5", &ParamType::I32), Ok(Value::I32(5)));
    }
}
