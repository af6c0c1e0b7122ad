//! Dynamic value model used by every comparator.
//!
//! Rust values are lowered into a [`Value`] tree through the [`Reflect`]
//! trait. The tree keeps what the comparators need and what plain
//! `PartialEq` hides: the declared type of every container element, the
//! visibility of every struct field and the code address of functions.

use std::collections::BTreeMap;
use std::fmt;

mod reflect;
mod types;

pub use reflect::{Reflect, ReflectKey};
pub use types::{FieldType, Type, TypeFn};

/// The comparator-facing classification of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Slice,
    Array,
    Map,
    Struct,
    Pointer,
    Function,
    Other,
}

/// Represents any runtime value handed to a comparator.
///
/// # Examples
///
/// ```rust
/// use trial::value::{Kind, Value};
/// let v = Value::of(&vec![1, 2, 3]);
/// assert_eq!(v.kind(), Kind::Slice);
/// assert_eq!(v.type_name(), "Vec<i64>");
/// assert!(Value::default().is_nil());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(char),
    Str(String),
    Slice {
        elem: TypeFn,
        items: Vec<Value>,
    },
    Array {
        elem: TypeFn,
        items: Vec<Value>,
    },
    Map {
        key: TypeFn,
        value: TypeFn,
        entries: BTreeMap<Key, Value>,
    },
    Struct(StructValue),
    Pointer {
        elem: TypeFn,
        target: Option<Box<Value>>,
    },
    Func(FuncValue),
}

/// A map key. Only scalar, totally ordered values may key a map.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Char(char),
    Str(String),
}

impl Key {
    pub fn to_value(&self) -> Value {
        match self {
            Key::Bool(b) => Value::Bool(*b),
            Key::Int(i) => Value::Int(*i),
            Key::Uint(u) => Value::Uint(*u),
            Key::Char(c) => Value::Char(*c),
            Key::Str(s) => Value::Str(s.clone()),
        }
    }

    /// Key rendering with strings quoted.
    pub fn literal(&self) -> String {
        match self {
            Key::Str(s) => format!("{:?}", s),
            Key::Char(c) => format!("{:?}", c),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Bool(b) => write!(f, "{}", b),
            Key::Int(i) => write!(f, "{}", i),
            Key::Uint(u) => write!(f, "{}", u),
            Key::Char(c) => write!(f, "{}", c),
            Key::Str(s) => write!(f, "{}", s),
        }
    }
}

/// One field of a struct value.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    /// `true` for `pub` fields. Unexported fields are only compared when the
    /// owning struct type holds an access grant.
    pub exported: bool,
    /// Declared type of the field, used to build zero values.
    pub ty: TypeFn,
    pub value: Value,
}

impl Field {
    pub fn new(name: &'static str, exported: bool, ty: TypeFn, value: Value) -> Self {
        Self {
            name,
            exported,
            ty,
            value,
        }
    }
}

/// A struct value: type name, fields in declaration order and an optional
/// textual representation (what `Display` would print).
#[derive(Debug, Clone)]
pub struct StructValue {
    pub name: &'static str,
    /// Defining module, empty for hand-built values. Two structs with the
    /// same name from different modules are different types.
    pub module: &'static str,
    pub fields: Vec<Field>,
    pub text: Option<String>,
}

impl StructValue {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            module: "",
            fields: Vec::new(),
            text: None,
        }
    }

    pub fn in_module(mut self, module: &'static str) -> Self {
        self.module = module;
        self
    }

    /// `module::Name`, or just `Name` when no module is recorded.
    pub fn qualified_name(&self) -> String {
        if self.module.is_empty() {
            self.name.to_string()
        } else {
            format!("{}::{}", self.module, self.name)
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds an exported field of type `T`.
    pub fn field<T: Reflect>(self, name: &'static str, value: &T) -> Self {
        self.with_field(Field::new(name, true, T::type_desc, value.reflect()))
    }

    /// Adds an unexported field of type `T`.
    pub fn private_field<T: Reflect>(self, name: &'static str, value: &T) -> Self {
        self.with_field(Field::new(name, false, T::type_desc, value.reflect()))
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }
}

/// A function value identified by its code address. Address 0 is a nil
/// function of the given signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuncValue {
    pub sig: &'static str,
    pub addr: usize,
}

impl FuncValue {
    pub fn new(sig: &'static str, addr: usize) -> Self {
        Self { sig, addr }
    }

    pub fn is_nil(&self) -> bool {
        self.addr == 0
    }
}

impl Value {
    /// Lowers any reflectable Rust value.
    pub fn of<T: Reflect + ?Sized>(value: &T) -> Value {
        value.reflect()
    }

    /// Classifies the value for comparator dispatch.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trial::value::{Kind, Value};
    /// assert_eq!(Value::from("a").kind(), Kind::String);
    /// assert_eq!(Value::Nil.kind(), Kind::Other);
    /// assert_eq!(Value::from(1i64).kind(), Kind::Other);
    /// ```
    pub fn kind(&self) -> Kind {
        match self {
            Value::Str(_) => Kind::String,
            Value::Slice { .. } => Kind::Slice,
            Value::Array { .. } => Kind::Array,
            Value::Map { .. } => Kind::Map,
            Value::Struct(_) => Kind::Struct,
            Value::Pointer { .. } => Kind::Pointer,
            Value::Func(_) => Kind::Function,
            Value::Nil
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Uint(_)
            | Value::Float(_)
            | Value::Char(_) => Kind::Other,
        }
    }

    /// Returns the concrete type name, e.g. `Vec<i64>` or `Point`.
    pub fn type_name(&self) -> String {
        match self {
            Value::Nil => "nil".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_) => "i64".to_string(),
            Value::Uint(_) => "u64".to_string(),
            Value::Float(_) => "f64".to_string(),
            Value::Char(_) => "char".to_string(),
            Value::Str(_) => "String".to_string(),
            Value::Slice { elem, .. } => Type::Slice(*elem).name(),
            Value::Array { elem, items } => Type::Array(*elem, items.len()).name(),
            Value::Map { key, value, .. } => Type::Map(*key, *value).name(),
            Value::Struct(s) => s.name.to_string(),
            Value::Pointer { elem, .. } => Type::Pointer(*elem).name(),
            Value::Func(f) => f.sig.to_string(),
        }
    }

    /// True only for the untyped nil. Nil pointers and nil functions are typed.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Uint(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of a slice or array.
    pub fn items(&self) -> Option<&[Value]> {
        match self {
            Value::Slice { items, .. } | Value::Array { items, .. } => Some(items),
            _ => None,
        }
    }

    /// The textual representation of a string, or of a struct (or pointer to
    /// struct) that carries one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Struct(s) => s.text.as_deref(),
            Value::Pointer {
                target: Some(inner),
                ..
            } => match inner.as_ref() {
                Value::Struct(s) => s.text.as_deref(),
                _ => None,
            },
            _ => None,
        }
    }

    /// Rendering with every string quoted and struct fields spelled out.
    /// Used in diffs where `"1"` and `1` must stay distinguishable.
    pub fn literal(&self) -> String {
        let mut out = String::new();
        let _ = write_value(&mut out, self, Style::Literal, 0);
        out
    }

    // ------------------------------------------------------------------------
    // Display formatting helpers
    // ------------------------------------------------------------------------

    fn fmt_items(
        out: &mut impl fmt::Write,
        items: &[Value],
        style: Style,
        depth: usize,
    ) -> fmt::Result {
        write!(out, "[")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(out, ", ")?;
            }
            write_value(out, item, style, depth + 1)?;
        }
        write!(out, "]")
    }

    fn fmt_entries(
        out: &mut impl fmt::Write,
        entries: &BTreeMap<Key, Value>,
        style: Style,
        depth: usize,
    ) -> fmt::Result {
        write!(out, "{{")?;
        for (i, (k, v)) in entries.iter().enumerate() {
            if i > 0 {
                write!(out, ", ")?;
            }
            write!(out, "{}: ", k.literal())?;
            write_value(out, v, style, depth + 1)?;
        }
        write!(out, "}}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    /// Top-level strings bare, struct text preferred.
    Display,
    Literal,
}

fn write_value(out: &mut impl fmt::Write, value: &Value, style: Style, depth: usize) -> fmt::Result {
    match value {
        Value::Nil => write!(out, "nil"),
        Value::Bool(b) => write!(out, "{}", b),
        Value::Int(i) => write!(out, "{}", i),
        Value::Uint(u) => write!(out, "{}", u),
        Value::Float(x) => write!(out, "{}", x),
        Value::Char(c) if style == Style::Display && depth == 0 => write!(out, "{}", c),
        Value::Char(c) => write!(out, "{:?}", c),
        Value::Str(s) if style == Style::Display && depth == 0 => write!(out, "{}", s),
        Value::Str(s) => write!(out, "{:?}", s),
        Value::Slice { items, .. } | Value::Array { items, .. } => {
            Value::fmt_items(out, items, style, depth)
        }
        Value::Map { entries, .. } => Value::fmt_entries(out, entries, style, depth),
        Value::Struct(s) => match (&s.text, style) {
            (Some(text), Style::Display) => write!(out, "{}", text),
            _ => {
                write!(out, "{} {{", s.name)?;
                for (i, field) in s.fields.iter().enumerate() {
                    write!(out, "{}{}: ", if i > 0 { ", " } else { " " }, field.name)?;
                    write_value(out, &field.value, style, depth + 1)?;
                }
                if s.fields.is_empty() {
                    write!(out, "}}")
                } else {
                    write!(out, " }}")
                }
            }
        },
        Value::Pointer { target: None, .. } => write!(out, "None"),
        Value::Pointer {
            target: Some(inner),
            ..
        } => {
            write!(out, "Some(")?;
            write_value(out, inner, style, depth + 1)?;
            write!(out, ")")
        }
        Value::Func(func) if func.is_nil() => write!(out, "nil"),
        Value::Func(func) => write!(out, "{}@0x{:x}", func.sig, func.addr),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, Style::Display, 0)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint(u)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

/// JSON documents lower into dynamically typed containers: arrays become
/// `Vec<any>` and objects `Map<String, any>`.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::Slice {
                elem: <Value as Reflect>::type_desc,
                items: items.into_iter().map(Value::from).collect(),
            },
            serde_json::Value::Object(map) => Value::Map {
                key: <String as Reflect>::type_desc,
                value: <Value as Reflect>::type_desc,
                entries: map
                    .into_iter()
                    .map(|(k, v)| (Key::Str(k), Value::from(v)))
                    .collect(),
            },
        }
    }
}
