use std::collections::BTreeMap;

use super::{FuncValue, StructValue, Value};

/// Lazily evaluated type descriptor. Fields and elements refer to their
/// declared types through these pointers, so describing a self-referential
/// type never recurses on its own.
pub type TypeFn = fn() -> Type;

/// Declared type of a struct field.
#[derive(Debug, Clone)]
pub struct FieldType {
    pub name: &'static str,
    pub exported: bool,
    pub ty: TypeFn,
}

impl FieldType {
    pub fn new(name: &'static str, exported: bool, ty: TypeFn) -> Self {
        Self { name, exported, ty }
    }
}

/// Static description of a type: enough to name it and to build its zero
/// value.
#[derive(Debug, Clone)]
pub enum Type {
    /// A dynamically typed slot (`Value` itself). Its zero value is nil.
    Any,
    Bool,
    Int,
    Uint,
    Float,
    Char,
    String,
    Slice(TypeFn),
    Array(TypeFn, usize),
    Map(TypeFn, TypeFn),
    Struct {
        name: &'static str,
        module: &'static str,
        fields: Vec<FieldType>,
    },
    Pointer(TypeFn),
    Func(&'static str),
}

impl Type {
    pub fn structure(name: &'static str, fields: Vec<FieldType>) -> Self {
        Type::Struct {
            name,
            module: "",
            fields,
        }
    }

    /// Records the defining module of a struct type; other types are
    /// returned unchanged.
    pub fn in_module(self, module: &'static str) -> Self {
        match self {
            Type::Struct { name, fields, .. } => Type::Struct {
                name,
                module,
                fields,
            },
            other => other,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Type::Any => "any".to_string(),
            Type::Bool => "bool".to_string(),
            Type::Int => "i64".to_string(),
            Type::Uint => "u64".to_string(),
            Type::Float => "f64".to_string(),
            Type::Char => "char".to_string(),
            Type::String => "String".to_string(),
            Type::Slice(elem) => format!("Vec<{}>", elem().name()),
            Type::Array(elem, len) => format!("[{}; {}]", elem().name(), len),
            Type::Map(key, value) => format!("Map<{}, {}>", key().name(), value().name()),
            Type::Struct { name, .. } => name.to_string(),
            Type::Pointer(elem) => format!("Option<{}>", elem().name()),
            Type::Func(sig) => sig.to_string(),
        }
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Type::Struct { .. })
    }

    /// For `Pointer(T)` where `T` is a struct, returns `T`.
    pub fn pointee_struct(&self) -> Option<Type> {
        match self {
            Type::Pointer(elem) => Some(elem()).filter(Type::is_struct),
            _ => None,
        }
    }

    /// Builds the zero value of this type: empty containers, nil pointers,
    /// nil functions and structs whose fields are zero in turn.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trial::value::{Reflect, Type};
    /// let zero = <Vec<i32> as Reflect>::type_desc().zero();
    /// assert_eq!(zero.items().map(|items| items.len()), Some(0));
    /// assert!(Type::Any.zero().is_nil());
    /// ```
    pub fn zero(&self) -> Value {
        match self {
            Type::Any => Value::Nil,
            Type::Bool => Value::Bool(false),
            Type::Int => Value::Int(0),
            Type::Uint => Value::Uint(0),
            Type::Float => Value::Float(0.0),
            Type::Char => Value::Char('\0'),
            Type::String => Value::Str(String::new()),
            Type::Slice(elem) => Value::Slice {
                elem: *elem,
                items: Vec::new(),
            },
            Type::Array(elem, len) => Value::Array {
                elem: *elem,
                items: (0..*len).map(|_| elem().zero()).collect(),
            },
            Type::Map(key, value) => Value::Map {
                key: *key,
                value: *value,
                entries: BTreeMap::new(),
            },
            Type::Struct {
                name,
                module,
                fields,
            } => {
                let mut zero = StructValue::new(*name).in_module(*module);
                for field in fields {
                    zero = zero.with_field(super::Field::new(
                        field.name,
                        field.exported,
                        field.ty,
                        (field.ty)().zero(),
                    ));
                }
                Value::Struct(zero)
            }
            Type::Pointer(elem) => Value::Pointer {
                elem: *elem,
                target: None,
            },
            Type::Func(sig) => Value::Func(FuncValue::new(*sig, 0)),
        }
    }
}
