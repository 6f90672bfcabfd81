//! Introspection of caller-owned values.
//!
//! The evaluator never sees concrete host types. It asks an [`Introspect`]
//! implementation to classify a value and to step into fields, keys and
//! elements. Implementations are provided for the standard scalar and
//! collection types and for [`serde_json::Value`]; structs opt in with the
//! [`record!`](crate::record) macro or a hand-written impl.
//!
//! # Examples
//!
//! ```
//! use sqi::{compile, record, EvalOptions};
//!
//! struct Person {
//!     name: String,
//!     children: Vec<Person>,
//! }
//!
//! record!(Person { Name => name, Children => children });
//!
//! let parent = Person {
//!     name: "Katie".into(),
//!     children: vec![
//!         Person { name: "Eleanor".into(), children: vec![] },
//!         Person { name: "Jason".into(), children: vec![] },
//!     ],
//! };
//!
//! let expr = compile("/Children[1]/Name").unwrap();
//! let result = expr.eval(&parent, &EvalOptions::default()).unwrap();
//! assert_eq!(result.as_str(), Some("Jason"));
//! ```

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

/// Broad shape of a host value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// No value (`None`, JSON `null`)
    Null,
    Scalar,
    Sequence,
    /// String-keyed collection
    Map,
    /// Struct with named fields
    Record,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Scalar => "scalar",
            Kind::Sequence => "sequence",
            Kind::Map => "map",
            Kind::Record => "record",
        }
    }
}

/// A scalar read out of a host value or a literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'a str),
}

impl Scalar<'_> {
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "boolean",
            Scalar::Int(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Str(_) => "string",
        }
    }
}

/// Capabilities the evaluator needs from a host value.
///
/// Only [`kind`](Introspect::kind) is required. The remaining methods default
/// to "nothing here" and are overridden according to the kind:
///
/// - `Scalar`: [`scalar`](Introspect::scalar)
/// - `Record`: [`field`](Introspect::field), [`entries`](Introspect::entries)
/// - `Map`: [`key`](Introspect::key), [`entries`](Introspect::entries)
/// - `Sequence`: [`len`](Introspect::len), [`index`](Introspect::index)
///
/// Pointers and `Option` forward to what they point at, so indirection is
/// invisible to the evaluator.
pub trait Introspect {
    fn kind(&self) -> Kind;

    fn scalar(&self) -> Option<Scalar<'_>> {
        None
    }

    /// Named field of a record. `None` means "no such field".
    fn field(&self, _name: &str) -> Option<&dyn Introspect> {
        None
    }

    /// Entry of a map.
    fn key(&self, _key: &str) -> Option<&dyn Introspect> {
        None
    }

    fn len(&self) -> usize {
        0
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn index(&self, _index: usize) -> Option<&dyn Introspect> {
        None
    }

    /// Fields or map entries in a stable order. Only used for rendering.
    fn entries(&self) -> Vec<(Cow<'_, str>, &dyn Introspect)> {
        Vec::new()
    }
}

/// Implements [`Introspect`] for a struct by listing its fields.
///
/// Each entry maps the name used in expressions to a struct field whose type
/// also implements [`Introspect`].
///
/// ```
/// use sqi::record;
///
/// struct Relative {
///     name: String,
/// }
///
/// record!(Relative { Name => name });
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ty { $($name:ident => $field:ident),* $(,)? }) => {
        impl $crate::Introspect for $ty {
            fn kind(&self) -> $crate::Kind {
                $crate::Kind::Record
            }

            fn field(&self, name: &str) -> Option<&dyn $crate::Introspect> {
                match name {
                    $(stringify!($name) => Some(&self.$field as &dyn $crate::Introspect),)*
                    _ => None,
                }
            }

            fn entries(&self) -> Vec<(std::borrow::Cow<'_, str>, &dyn $crate::Introspect)> {
                vec![
                    $((
                        std::borrow::Cow::Borrowed(stringify!($name)),
                        &self.$field as &dyn $crate::Introspect,
                    ),)*
                ]
            }
        }
    };
}

// ------------------------------------------------------------
// Indirection

macro_rules! forward_introspect {
    ($($ptr:ty),*) => {
        $(
            impl<T: Introspect + ?Sized> Introspect for $ptr {
                fn kind(&self) -> Kind {
                    (**self).kind()
                }
                fn scalar(&self) -> Option<Scalar<'_>> {
                    (**self).scalar()
                }
                fn field(&self, name: &str) -> Option<&dyn Introspect> {
                    (**self).field(name)
                }
                fn key(&self, key: &str) -> Option<&dyn Introspect> {
                    (**self).key(key)
                }
                fn len(&self) -> usize {
                    (**self).len()
                }
                fn index(&self, index: usize) -> Option<&dyn Introspect> {
                    (**self).index(index)
                }
                fn entries(&self) -> Vec<(Cow<'_, str>, &dyn Introspect)> {
                    (**self).entries()
                }
            }
        )*
    };
}

forward_introspect!(&T, Box<T>, Rc<T>, Arc<T>);

impl<T: Introspect> Introspect for Option<T> {
    fn kind(&self) -> Kind {
        self.as_ref().map_or(Kind::Null, Introspect::kind)
    }
    fn scalar(&self) -> Option<Scalar<'_>> {
        self.as_ref().and_then(Introspect::scalar)
    }
    fn field(&self, name: &str) -> Option<&dyn Introspect> {
        self.as_ref().and_then(|v| v.field(name))
    }
    fn key(&self, key: &str) -> Option<&dyn Introspect> {
        self.as_ref().and_then(|v| v.key(key))
    }
    fn len(&self) -> usize {
        self.as_ref().map_or(0, Introspect::len)
    }
    fn index(&self, index: usize) -> Option<&dyn Introspect> {
        self.as_ref().and_then(|v| v.index(index))
    }
    fn entries(&self) -> Vec<(Cow<'_, str>, &dyn Introspect)> {
        self.as_ref().map_or_else(Vec::new, Introspect::entries)
    }
}

// ------------------------------------------------------------
// Scalars

impl Introspect for bool {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }
    fn scalar(&self) -> Option<Scalar<'_>> {
        Some(Scalar::Bool(*self))
    }
}

macro_rules! int_scalar {
    ($($ty:ty),*) => {
        $(
            impl Introspect for $ty {
                fn kind(&self) -> Kind {
                    Kind::Scalar
                }
                fn scalar(&self) -> Option<Scalar<'_>> {
                    Some(Scalar::Int(i64::from(*self)))
                }
            }
        )*
    };
}

int_scalar!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! wide_int_scalar {
    ($($ty:ty),*) => {
        $(
            impl Introspect for $ty {
                fn kind(&self) -> Kind {
                    Kind::Scalar
                }
                fn scalar(&self) -> Option<Scalar<'_>> {
                    // Values beyond i64 keep their magnitude as floats
                    Some(match i64::try_from(*self) {
                        Ok(n) => Scalar::Int(n),
                        Err(_) => Scalar::Float(*self as f64),
                    })
                }
            }
        )*
    };
}

wide_int_scalar!(u64, usize, isize);

impl Introspect for f32 {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }
    fn scalar(&self) -> Option<Scalar<'_>> {
        Some(Scalar::Float(f64::from(*self)))
    }
}

impl Introspect for f64 {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }
    fn scalar(&self) -> Option<Scalar<'_>> {
        Some(Scalar::Float(*self))
    }
}

impl Introspect for str {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }
    fn scalar(&self) -> Option<Scalar<'_>> {
        Some(Scalar::Str(self))
    }
}

impl Introspect for String {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }
    fn scalar(&self) -> Option<Scalar<'_>> {
        Some(Scalar::Str(self))
    }
}

// ------------------------------------------------------------
// Sequences

impl<T: Introspect> Introspect for [T] {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }
    fn len(&self) -> usize {
        <[T]>::len(self)
    }
    fn index(&self, index: usize) -> Option<&dyn Introspect> {
        self.get(index).map(|v| v as &dyn Introspect)
    }
}

impl<T: Introspect> Introspect for Vec<T> {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }
    fn len(&self) -> usize {
        Vec::len(self)
    }
    fn index(&self, index: usize) -> Option<&dyn Introspect> {
        self.get(index).map(|v| v as &dyn Introspect)
    }
}

impl<T: Introspect, const N: usize> Introspect for [T; N] {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }
    fn len(&self) -> usize {
        N
    }
    fn index(&self, index: usize) -> Option<&dyn Introspect> {
        self.get(index).map(|v| v as &dyn Introspect)
    }
}

// ------------------------------------------------------------
// Maps

impl<V: Introspect, S: BuildHasher> Introspect for HashMap<String, V, S> {
    fn kind(&self) -> Kind {
        Kind::Map
    }
    fn key(&self, key: &str) -> Option<&dyn Introspect> {
        self.get(key).map(|v| v as &dyn Introspect)
    }
    fn len(&self) -> usize {
        HashMap::len(self)
    }
    fn entries(&self) -> Vec<(Cow<'_, str>, &dyn Introspect)> {
        let mut entries: Vec<_> = self
            .iter()
            .map(|(k, v)| (Cow::Borrowed(k.as_str()), v as &dyn Introspect))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl<V: Introspect> Introspect for BTreeMap<String, V> {
    fn kind(&self) -> Kind {
        Kind::Map
    }
    fn key(&self, key: &str) -> Option<&dyn Introspect> {
        self.get(key).map(|v| v as &dyn Introspect)
    }
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
    fn entries(&self) -> Vec<(Cow<'_, str>, &dyn Introspect)> {
        self.iter()
            .map(|(k, v)| (Cow::Borrowed(k.as_str()), v as &dyn Introspect))
            .collect()
    }
}

// ------------------------------------------------------------
// JSON

impl Introspect for serde_json::Value {
    fn kind(&self) -> Kind {
        match self {
            serde_json::Value::Null => Kind::Null,
            serde_json::Value::Bool(_)
            | serde_json::Value::Number(_)
            | serde_json::Value::String(_) => Kind::Scalar,
            serde_json::Value::Array(_) => Kind::Sequence,
            serde_json::Value::Object(_) => Kind::Map,
        }
    }

    fn scalar(&self) -> Option<Scalar<'_>> {
        match self {
            serde_json::Value::Bool(b) => Some(Scalar::Bool(*b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Scalar::Int(i)),
                None => n.as_f64().map(Scalar::Float),
            },
            serde_json::Value::String(s) => Some(Scalar::Str(s)),
            _ => None,
        }
    }

    fn key(&self, key: &str) -> Option<&dyn Introspect> {
        match self {
            serde_json::Value::Object(map) => map.get(key).map(|v| v as &dyn Introspect),
            _ => None,
        }
    }

    fn len(&self) -> usize {
        match self {
            serde_json::Value::Array(items) => items.len(),
            serde_json::Value::Object(map) => map.len(),
            _ => 0,
        }
    }

    fn index(&self, index: usize) -> Option<&dyn Introspect> {
        match self {
            serde_json::Value::Array(items) => items.get(index).map(|v| v as &dyn Introspect),
            _ => None,
        }
    }

    fn entries(&self) -> Vec<(Cow<'_, str>, &dyn Introspect)> {
        match self {
            serde_json::Value::Object(map) => map
                .iter()
                .map(|(k, v)| (Cow::Borrowed(k.as_str()), v as &dyn Introspect))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn option_and_box_are_transparent() {
        let some: Option<Box<i32>> = Some(Box::new(7));
        let none: Option<i32> = None;

        assert_eq!(some.kind(), Kind::Scalar);
        assert_eq!(some.scalar(), Some(Scalar::Int(7)));
        assert_eq!(none.kind(), Kind::Null);
    }

    #[test]
    fn json_classification() {
        let doc = json!({"a": [1, 2.5, "x"], "b": null});

        assert_eq!(doc.kind(), Kind::Map);
        let a = doc.key("a").unwrap();
        assert_eq!(a.kind(), Kind::Sequence);
        assert_eq!(a.len(), 3);
        assert_eq!(a.index(1).and_then(|v| v.scalar()), Some(Scalar::Float(2.5)));
        assert_eq!(doc.key("b").map(|v| v.kind()), Some(Kind::Null));
        assert!(doc.key("missing").is_none());
    }

    #[test]
    fn large_unsigned_values_become_floats() {
        assert_eq!(u64::MAX.scalar(), Some(Scalar::Float(u64::MAX as f64)));
        assert_eq!(5usize.scalar(), Some(Scalar::Int(5)));
    }
}
