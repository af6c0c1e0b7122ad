//! Access grants for unexported struct fields.
//!
//! Exact comparison only looks at a struct's unexported fields when the
//! struct type holds a grant. [`allow_unexported`] walks a value and grants
//! every struct type reachable from it: the structs the value actually
//! holds (behind pointers and dynamically typed slots too) and the declared
//! types of unexported and pointer fields, inside maps, slices and arrays at
//! any depth.

use std::collections::BTreeSet;
use std::fmt;

use crate::value::{StructValue, Type, Value};

/// Permission to compare the unexported fields of one struct type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccessGrant(String);

impl AccessGrant {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self(type_name.into())
    }

    pub fn type_name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AllowUnexported({})", self.0)
    }
}

/// Computes the grants needed to compare `value` including unexported fields.
///
/// Grants come back in discovery order. Zero values built from declared
/// types are not re-entered once their struct type holds a grant, which is
/// what bounds the walk on self-referential types.
///
/// # Examples
///
/// ```rust
/// use trial::compare::allow_unexported;
/// use trial::value::{StructValue, Value};
///
/// let v = Value::Struct(StructValue::new("Secret").private_field("pin", &1234));
/// let grants = allow_unexported(&v);
/// assert_eq!(grants[0].type_name(), "Secret");
/// assert!(allow_unexported(&Value::from(3i64)).is_empty());
/// ```
pub fn allow_unexported(value: &Value) -> Vec<AccessGrant> {
    let mut grants = Grants::default();
    grants.scan(value);
    grants.ordered
}

#[derive(Default)]
struct Grants {
    ordered: Vec<AccessGrant>,
    seen: BTreeSet<String>,
}

impl Grants {
    fn scan(&mut self, value: &Value) {
        match value {
            Value::Pointer {
                target: Some(inner),
                ..
            } => self.scan(inner),
            Value::Struct(s) => self.scan_struct(s),
            Value::Map { entries, .. } => {
                for v in entries.values() {
                    self.scan(v);
                }
            }
            Value::Slice { items, .. } | Value::Array { items, .. } => {
                for item in items {
                    self.scan(item);
                }
            }
            _ => {}
        }
    }

    fn scan_struct(&mut self, s: &StructValue) {
        self.grant(s.name);
        for field in &s.fields {
            let declared = (field.ty)();
            if let Some(pointee) = declared.pointee_struct() {
                self.scan_zero(&pointee);
            } else if !field.exported {
                self.scan_zero(&declared);
            }
            // a dynamically typed slot only shows its struct through the value
            self.scan(&field.value);
        }
    }

    fn scan_zero(&mut self, ty: &Type) {
        if let Type::Struct { name, .. } = ty {
            if self.seen.contains(*name) {
                return;
            }
        }
        self.scan_declared(ty);
    }

    /// Walks a zero value by its declared type. Zero containers are empty,
    /// so element types are followed through the declaration instead.
    fn scan_declared(&mut self, ty: &Type) {
        match ty {
            Type::Struct { .. } => {
                if let Value::Struct(zero) = ty.zero() {
                    self.scan_struct(&zero);
                }
            }
            Type::Slice(elem) | Type::Array(elem, _) | Type::Map(_, elem) => {
                self.scan_zero(&elem());
            }
            _ => {}
        }
    }

    fn grant(&mut self, type_name: &str) {
        if self.seen.insert(type_name.to_string()) {
            tracing::trace!(type_name, "granting unexported access");
        }
        self.ordered.push(AccessGrant::new(type_name));
    }
}
