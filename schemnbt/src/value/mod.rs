mod ser;

use crate::Tag;

/// The map type backing [`Value::Compound`]. Names are unique. With the
/// `preserve-order` feature the order of the input is kept, otherwise it is
/// unspecified.
#[cfg(not(feature = "preserve-order"))]
pub type Compound = std::collections::HashMap<String, Value>;

/// The map type backing [`Value::Compound`]. Names are unique. With the
/// `preserve-order` feature the order of the input is kept, otherwise it is
/// unspecified.
#[cfg(feature = "preserve-order")]
pub type Compound = indexmap::IndexMap<String, Value>;

/// Value is a complete NBT value. It owns its data. Compounds and lists are
/// recursively decoded. Every node exclusively owns its children, so the tree
/// can be sent across threads or dropped without any coordination.
///
/// ```
/// # use schemnbt::{nbt, Value};
/// let compound = nbt!({ "DataVersion": 3953 });
/// match compound.get("DataVersion") {
///     Some(Value::Int(ver)) => println!("Version: {}", ver),
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(List),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

/// An NBT list. Every element has the kind recorded in `element`, which is
/// kept even when the list is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    element: Tag,
    values: Vec<Value>,
}

impl List {
    /// Create a list of `element` kind. Returns `None` if any value is of a
    /// different kind, or if values are given for an `End` list.
    pub fn new(element: Tag, values: Vec<Value>) -> Option<Self> {
        if values.iter().all(|v| v.tag() == element) {
            Some(Self { element, values })
        } else {
            None
        }
    }

    /// An empty list that still remembers its declared element kind.
    pub fn empty(element: Tag) -> Self {
        Self {
            element,
            values: Vec::new(),
        }
    }

    /// Create a list taking the element kind from the first value. An empty
    /// vector gives an empty `End` list.
    pub fn from_values(values: Vec<Value>) -> Option<Self> {
        let element = values.first().map_or(Tag::End, Value::tag);
        Self::new(element, values)
    }

    pub fn element_tag(&self) -> Tag {
        self.element
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    // The decoder checks the kind of each element as it reads it.
    pub(crate) fn from_decoded(element: Tag, values: Vec<Value>) -> Self {
        Self { element, values }
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl Value {
    /// The kind of tag this value is stored as.
    pub fn tag(&self) -> Tag {
        match self {
            Value::Byte(_) => Tag::Byte,
            Value::Short(_) => Tag::Short,
            Value::Int(_) => Tag::Int,
            Value::Long(_) => Tag::Long,
            Value::Float(_) => Tag::Float,
            Value::Double(_) => Tag::Double,
            Value::ByteArray(_) => Tag::ByteArray,
            Value::String(_) => Tag::String,
            Value::List(_) => Tag::List,
            Value::Compound(_) => Tag::Compound,
            Value::IntArray(_) => Tag::IntArray,
            Value::LongArray(_) => Tag::LongArray,
        }
    }

    /// Integral values widened to i64. Floating point values are not
    /// converted.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(v as i64),
            Value::Short(v) => Some(v as i64),
            Value::Int(v) => Some(v as i64),
            Value::Long(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Byte(v) => Some(v as f64),
            Value::Short(v) => Some(v as f64),
            Value::Int(v) => Some(v as f64),
            Value::Long(v) => Some(v as f64),
            Value::Float(v) => Some(v as f64),
            Value::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Value::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_byte_array(&self) -> Option<&[i8]> {
        match self {
            Value::ByteArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int_array(&self) -> Option<&[i32]> {
        match self {
            Value::IntArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_long_array(&self) -> Option<&[i64]> {
        match self {
            Value::LongArray(v) => Some(v),
            _ => None,
        }
    }

    /// Look up a field of a compound. `None` if this is not a compound or the
    /// field is missing.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_compound()?.get(key)
    }
}

// ------------- From<T> impls -------------

macro_rules! from {
    ($type:ty, $variant:ident $(, $($part:tt)+)?) => {
        impl From<$type> for Value {
            fn from(val: $type) -> Self {
                Self::$variant(val$($($part)+)?)
            }
        }
        impl From<&$type> for Value {
            fn from(val: &$type) -> Self {
                Self::$variant(val.to_owned()$($($part)+)?)
            }
        }
    };
}
from!(i8, Byte);
from!(i16, Short);
from!(i32, Int);
from!(i64, Long);
from!(f32, Float);
from!(f64, Double);
from!(String, String);
from!(&str, String, .to_owned());
from!(List, List);
from!(Compound, Compound);

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Self::Byte(i8::from(val))
    }
}

impl From<Vec<i8>> for Value {
    fn from(val: Vec<i8>) -> Self {
        Self::ByteArray(val)
    }
}

impl From<Vec<i32>> for Value {
    fn from(val: Vec<i32>) -> Self {
        Self::IntArray(val)
    }
}

impl From<Vec<i64>> for Value {
    fn from(val: Vec<i64>) -> Self {
        Self::LongArray(val)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str().map_or(false, |s| s == other)
    }
}

impl<'a> PartialEq<&'a str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str().map_or(false, |s| s == *other)
    }
}

macro_rules! partialeq_integral {
    ($($ty:ty)*) => {
        $(
            impl PartialEq<$ty> for Value {
                fn eq(&self, other: &$ty) -> bool {
                    self.as_i64().map_or(false, |i| i == *other as i64)
                }
            }
        )*
    }
}

partialeq_integral! { i8 i16 i32 i64 }
