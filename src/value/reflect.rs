use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use super::{FuncValue, Key, Type, Value};

/// Lowers a Rust value into the dynamic [`Value`] model.
///
/// Struct types implement this through [`reflect_struct!`](crate::reflect_struct),
/// invoked next to the struct definition so private fields are reachable.
pub trait Reflect {
    /// The declared type of `Self`.
    fn type_desc() -> Type
    where
        Self: Sized;

    fn reflect(&self) -> Value;
}

/// Types usable as map keys.
pub trait ReflectKey: Reflect {
    fn key(&self) -> Key;
}

macro_rules! reflect_scalar {
    ($variant:ident, $key:ident as $repr:ty: $($t:ty),+) => {
        $(
            impl Reflect for $t {
                fn type_desc() -> Type {
                    Type::$variant
                }

                fn reflect(&self) -> Value {
                    Value::$variant(*self as $repr)
                }
            }

            impl ReflectKey for $t {
                fn key(&self) -> Key {
                    Key::$key(*self as $repr)
                }
            }
        )+
    };
}

reflect_scalar!(Int, Int as i64: i8, i16, i32, i64, isize);
reflect_scalar!(Uint, Uint as u64: u8, u16, u32, u64, usize);

impl Reflect for bool {
    fn type_desc() -> Type {
        Type::Bool
    }

    fn reflect(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ReflectKey for bool {
    fn key(&self) -> Key {
        Key::Bool(*self)
    }
}

impl Reflect for char {
    fn type_desc() -> Type {
        Type::Char
    }

    fn reflect(&self) -> Value {
        Value::Char(*self)
    }
}

impl ReflectKey for char {
    fn key(&self) -> Key {
        Key::Char(*self)
    }
}

impl Reflect for f32 {
    fn type_desc() -> Type {
        Type::Float
    }

    fn reflect(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl Reflect for f64 {
    fn type_desc() -> Type {
        Type::Float
    }

    fn reflect(&self) -> Value {
        Value::Float(*self)
    }
}

impl Reflect for String {
    fn type_desc() -> Type {
        Type::String
    }

    fn reflect(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl ReflectKey for String {
    fn key(&self) -> Key {
        Key::Str(self.clone())
    }
}

impl Reflect for &str {
    fn type_desc() -> Type {
        Type::String
    }

    fn reflect(&self) -> Value {
        Value::Str((*self).to_string())
    }
}

impl ReflectKey for &str {
    fn key(&self) -> Key {
        Key::Str((*self).to_string())
    }
}

/// `Value` is the dynamically typed slot.
impl Reflect for Value {
    fn type_desc() -> Type {
        Type::Any
    }

    fn reflect(&self) -> Value {
        self.clone()
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn type_desc() -> Type {
        Type::Slice(T::type_desc)
    }

    fn reflect(&self) -> Value {
        Value::Slice {
            elem: T::type_desc,
            items: self.iter().map(Reflect::reflect).collect(),
        }
    }
}

impl<T: Reflect> Reflect for &[T] {
    fn type_desc() -> Type {
        Type::Slice(T::type_desc)
    }

    fn reflect(&self) -> Value {
        Value::Slice {
            elem: T::type_desc,
            items: self.iter().map(Reflect::reflect).collect(),
        }
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn type_desc() -> Type {
        Type::Array(T::type_desc, N)
    }

    fn reflect(&self) -> Value {
        Value::Array {
            elem: T::type_desc,
            items: self.iter().map(Reflect::reflect).collect(),
        }
    }
}

/// `Option<T>` is a nullable pointer to `T`.
impl<T: Reflect> Reflect for Option<T> {
    fn type_desc() -> Type {
        Type::Pointer(T::type_desc)
    }

    fn reflect(&self) -> Value {
        Value::Pointer {
            elem: T::type_desc,
            target: self.as_ref().map(|inner| Box::new(inner.reflect())),
        }
    }
}

impl<T: Reflect> Reflect for Box<T> {
    fn type_desc() -> Type {
        T::type_desc()
    }

    fn reflect(&self) -> Value {
        (**self).reflect()
    }
}

impl<K: ReflectKey, V: Reflect, S: BuildHasher> Reflect for HashMap<K, V, S> {
    fn type_desc() -> Type {
        Type::Map(K::type_desc, V::type_desc)
    }

    fn reflect(&self) -> Value {
        Value::Map {
            key: K::type_desc,
            value: V::type_desc,
            entries: self.iter().map(|(k, v)| (k.key(), v.reflect())).collect(),
        }
    }
}

impl<K: ReflectKey, V: Reflect> Reflect for BTreeMap<K, V> {
    fn type_desc() -> Type {
        Type::Map(K::type_desc, V::type_desc)
    }

    fn reflect(&self) -> Value {
        Value::Map {
            key: K::type_desc,
            value: V::type_desc,
            entries: self.iter().map(|(k, v)| (k.key(), v.reflect())).collect(),
        }
    }
}

macro_rules! reflect_fn {
    ($($arg:ident),*) => {
        impl<R, $($arg),*> Reflect for fn($($arg),*) -> R {
            fn type_desc() -> Type {
                Type::Func(std::any::type_name::<Self>())
            }

            fn reflect(&self) -> Value {
                Value::Func(FuncValue::new(std::any::type_name::<Self>(), *self as usize))
            }
        }
    };
}

reflect_fn!();
reflect_fn!(A);
reflect_fn!(A, B);
reflect_fn!(A, B, C);

/// Implements [`Reflect`] for a named struct.
///
/// Invoke it in the module that defines the struct: fields written with
/// `pub` are exported, all others are unexported and only compared under an
/// access grant. The `: Display` form also records the struct's `Display`
/// output as its textual representation.
///
/// # Examples
///
/// ```rust
/// use trial::{compare::equal, reflect_struct, value::Value};
///
/// struct Account {
///     pub owner: String,
///     balance: i64,
/// }
///
/// reflect_struct!(Account {
///     pub owner: String,
///     balance: i64,
/// });
///
/// let a = Account { owner: "ann".into(), balance: 10 };
/// let b = Account { owner: "ann".into(), balance: 11 };
/// assert!(!equal(&Value::of(&a), &Value::of(&b)).0);
/// ```
#[macro_export]
macro_rules! reflect_struct {
    ($name:ident { $($vis:vis $field:ident : $fty:ty),* $(,)? }) => {
        impl $crate::value::Reflect for $name {
            fn type_desc() -> $crate::value::Type {
                $crate::value::Type::structure(
                    stringify!($name),
                    vec![$($crate::value::FieldType::new(
                        stringify!($field),
                        stringify!($vis) == "pub",
                        <$fty as $crate::value::Reflect>::type_desc,
                    )),*],
                )
                .in_module(module_path!())
            }

            fn reflect(&self) -> $crate::value::Value {
                $crate::value::Value::Struct(
                    $crate::value::StructValue::new(stringify!($name))
                        .in_module(module_path!())
                        $(.with_field($crate::value::Field::new(
                            stringify!($field),
                            stringify!($vis) == "pub",
                            <$fty as $crate::value::Reflect>::type_desc,
                            $crate::value::Reflect::reflect(&self.$field),
                        )))*,
                )
            }
        }
    };
    ($name:ident : Display { $($vis:vis $field:ident : $fty:ty),* $(,)? }) => {
        impl $crate::value::Reflect for $name {
            fn type_desc() -> $crate::value::Type {
                $crate::value::Type::structure(
                    stringify!($name),
                    vec![$($crate::value::FieldType::new(
                        stringify!($field),
                        stringify!($vis) == "pub",
                        <$fty as $crate::value::Reflect>::type_desc,
                    )),*],
                )
                .in_module(module_path!())
            }

            fn reflect(&self) -> $crate::value::Value {
                $crate::value::Value::Struct(
                    $crate::value::StructValue::new(stringify!($name))
                        .in_module(module_path!())
                        $(.with_field($crate::value::Field::new(
                            stringify!($field),
                            stringify!($vis) == "pub",
                            <$fty as $crate::value::Reflect>::type_desc,
                            $crate::value::Reflect::reflect(&self.$field),
                        )))*
                        .with_text(self.to_string()),
                )
            }
        }
    };
}
