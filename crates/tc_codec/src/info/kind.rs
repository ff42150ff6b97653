use core::fmt;

/// An enumeration of the "kinds" of a native type.
///
/// Scalars keep their exact width and signedness, the converter never widens
/// or narrows on encode.
///
/// A newtype alias (`struct Age(u64)`) has the kind of the type it wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
    /// `num_complex::Complex<f32>`.
    Complex32,
    /// `num_complex::Complex<f64>`.
    Complex64,
    Char,
    Str,
    /// Variable-length ordered container, e.g. `Vec<T>`.
    Sequence,
    /// Fixed-length ordered container, e.g. `[T; N]`.
    Array,
    /// Associative container, e.g. `HashMap<K, V>`.
    Map,
    /// A type with named fields.
    Record,
    /// `Option<T>`, `Box<T>`, `Arc<T>`.
    Reference,
    /// A value whose concrete type is only known at runtime.
    Polymorphic,
    /// A value the converter never looks into.
    Opaque,
}

impl NativeKind {
    /// Whether this is a boolean, number (complex included), character or text kind.
    pub const fn is_scalar(self) -> bool {
        !matches!(
            self,
            Self::Sequence
                | Self::Array
                | Self::Map
                | Self::Record
                | Self::Reference
                | Self::Polymorphic
                | Self::Opaque
        )
    }

    /// Whether a zero value of this kind is represented as [`Value::Nil`](crate::Value::Nil).
    pub const fn is_nullable(self) -> bool {
        matches!(self, Self::Reference | Self::Polymorphic)
    }
}

impl fmt::Display for NativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
