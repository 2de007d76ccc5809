//! Parameter types and bound argument values.
//!
//! Types form a closed set: the built-in scalars plus `Custom` tags for
//! user-registered parsers. A slot "accepts" a value when the value's own
//! type equals the slot type; this is how the context value finds its
//! parameter without runtime reflection.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// The semantic type of a command parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    Str,
    Char,
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// A user-defined type, identified by its tag.
    Custom(String),
}

impl ParamType {
    pub fn custom(tag: impl Into<String>) -> Self {
        ParamType::Custom(tag.into())
    }

    /// Resolve a type name as written in a manifest (case-insensitive).
    ///
    /// Unknown names become `Custom` with the name lower-cased.
    pub fn from_name(name: &str) -> Self {
        let norm = name.trim().to_ascii_lowercase();
        match norm.as_str() {
            "string" | "str" => ParamType::Str,
            "char" => ParamType::Char,
            "bool" | "boolean" => ParamType::Bool,
            "byte" | "i8" => ParamType::I8,
            "short" | "i16" => ParamType::I16,
            "int" | "integer" | "i32" => ParamType::I32,
            "long" | "i64" => ParamType::I64,
            "u8" => ParamType::U8,
            "u16" => ParamType::U16,
            "u32" => ParamType::U32,
            "u64" => ParamType::U64,
            "float" | "f32" => ParamType::F32,
            "double" | "f64" => ParamType::F64,
            _ => ParamType::Custom(norm),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ParamType::Str => "string",
            ParamType::Char => "char",
            ParamType::Bool => "bool",
            ParamType::I8 => "i8",
            ParamType::I16 => "i16",
            ParamType::I32 => "i32",
            ParamType::I64 => "i64",
            ParamType::U8 => "u8",
            ParamType::U16 => "u16",
            ParamType::U32 => "u32",
            ParamType::U64 => "u64",
            ParamType::F32 => "f32",
            ParamType::F64 => "f64",
            ParamType::Custom(tag) => tag,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, ParamType::Custom(_))
    }

    /// Whether a slot of this type can hold `value`.
    ///
    /// `Null` is accepted by no type.
    pub fn accepts(&self, value: &Value) -> bool {
        value.param_type().as_ref() == Some(self)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque payload of a custom-typed value.
///
/// Cloning shares the payload; equality is pointer identity.
#[derive(Clone)]
pub struct CustomValue {
    tag: String,
    inner: Arc<dyn Any + Send + Sync>,
}

impl CustomValue {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    fn same_instance(&self, other: &CustomValue) -> bool {
        self.tag == other.tag
            && Arc::as_ptr(&self.inner) as *const () == Arc::as_ptr(&other.inner) as *const ()
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Custom<{}>", self.tag)
    }
}

/// A bound argument, a pre-parsed default, or a context value.
#[derive(Debug, Clone)]
pub enum Value {
    /// Explicit "no value" default.
    Null,
    Str(String),
    Char(char),
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Custom(CustomValue),
}

impl Value {
    /// Wrap an arbitrary value under a custom type tag.
    pub fn custom<T: Any + Send + Sync>(tag: impl Into<String>, value: T) -> Self {
        Value::Custom(CustomValue {
            tag: tag.into(),
            inner: Arc::new(value),
        })
    }

    /// The type of this value; `None` for `Null`.
    pub fn param_type(&self) -> Option<ParamType> {
        let ty = match self {
            Value::Null => return None,
            Value::Str(_) => ParamType::Str,
            Value::Char(_) => ParamType::Char,
            Value::Bool(_) => ParamType::Bool,
            Value::I8(_) => ParamType::I8,
            Value::I16(_) => ParamType::I16,
            Value::I32(_) => ParamType::I32,
            Value::I64(_) => ParamType::I64,
            Value::U8(_) => ParamType::U8,
            Value::U16(_) => ParamType::U16,
            Value::U32(_) => ParamType::U32,
            Value::U64(_) => ParamType::U64,
            Value::F32(_) => ParamType::F32,
            Value::F64(_) => ParamType::F64,
            Value::Custom(custom) => ParamType::Custom(custom.tag.clone()),
        };
        Some(ty)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow a custom payload as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Custom(custom) => custom.inner.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::U16(a), Value::U16(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Custom(a), Value::Custom(b)) => a.same_instance(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Str(s) => f.write_str(s),
            Value::Char(c) => write!(f, "{c}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::I8(n) => write!(f, "{n}"),
            Value::I16(n) => write!(f, "{n}"),
            Value::I32(n) => write!(f, "{n}"),
            Value::I64(n) => write!(f, "{n}"),
            Value::U8(n) => write!(f, "{n}"),
            Value::U16(n) => write!(f, "{n}"),
            Value::U32(n) => write!(f, "{n}"),
            Value::U64(n) => write!(f, "{n}"),
            Value::F32(n) => write!(f, "{n}"),
            Value::F64(n) => write!(f, "{n}"),
            Value::Custom(custom) => write!(f, "<{}>", custom.tag),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

/// Conversion from a bound [`Value`] into a concrete Rust type.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! scalar_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }

            impl FromValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(inner) => Some(inner.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

scalar_value! {
    String => Str,
    char => Char,
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// The positional argument vector handed to a command handler.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Args(Vec<Value>);

impl Args {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.0
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Typed read of argument `index`.
    pub fn get<T: FromValue>(&self, index: usize) -> Option<T> {
        self.0.get(index).and_then(T::from_value)
    }

    /// Typed read that fails with a descriptive error, for use inside handlers.
    pub fn require<T: FromValue>(&self, index: usize) -> anyhow::Result<T> {
        let value = self
            .0
            .get(index)
            .ok_or_else(|| anyhow::anyhow!("argument {index} is missing"))?;
        T::from_value(value).ok_or_else(|| {
            anyhow::anyhow!(
                "argument {index} has type {}, expected {}",
                value.param_type().map_or("null".to_string(), |t| t.to_string()),
                std::any::type_name::<T>()
            )
        })
    }

    pub fn str(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(Value::as_str)
    }

    /// Borrow a custom-typed argument (such as an injected context).
    pub fn custom<T: Any>(&self, index: usize) -> Option<&T> {
        self.0.get(index).and_then(Value::downcast_ref::<T>)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.0.iter()
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}
