use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{NativeKind, RecordInfo};
use crate::{Native, Typed};

// -----------------------------------------------------------------------------
// Type

/// The identity of a type: its [`TypeId`] and its path.
///
/// Comparisons only look at the [`TypeId`].
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
}

impl Type {
    /// Creates a new [`Type`] for `T`.
    ///
    /// ```
    /// # use tc_codec::info::Type;
    /// let ty = Type::of::<String>();
    /// assert!(ty.is::<String>());
    /// assert_eq!(ty.path(), "alloc::string::String");
    /// ```
    #[inline]
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: core::any::type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`] of the type.
    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the full path of the type, as given by [`core::any::type_name`].
    #[inline(always)]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Check if the given type matches this one.
    #[inline]
    pub fn is<T: Any + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl core::hash::Hash for Type {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

type InfoFn = fn() -> &'static TypeInfo;

#[derive(Clone)]
enum Shape {
    Scalar(NativeKind),
    Sequence { item: InfoFn },
    Array { item: InfoFn, len: usize },
    Map { key: InfoFn, value: InfoFn },
    Record(RecordInfo),
    Reference { referent: InfoFn },
    Polymorphic,
    Opaque,
    Alias { underlying: InfoFn },
}

/// Static information about a native type.
///
/// A `TypeInfo` contains:
///
/// - the [`Type`] identity and the [`NativeKind`];
/// - element, key and referent types for containers and references;
/// - the declared fields of a record, see [`RecordInfo`];
/// - constructors for the zero value and for an empty instance.
///
/// Child types are stored as function pointers and are only resolved
/// when asked for, so recursive types do not recurse at construction.
///
/// Newtype aliases (`struct Age(u64)`) are described with [`TypeInfo::alias`]:
/// every query resolves through them, except [`ty`](Self::ty) and
/// [`is_alias`](Self::is_alias).
///
/// Usually obtained through [`Typed::type_info`] or [`Native::native_type_info`].
#[derive(Clone)]
pub struct TypeInfo {
    ty: Type,
    shape: Shape,
    zero: fn() -> Box<dyn Native>,
    make_empty: fn() -> Box<dyn Native>,
}

fn boxed_zero<T: Typed>() -> Box<dyn Native> {
    Box::new(T::zero())
}

fn boxed_empty<T: Typed>() -> Box<dyn Native> {
    Box::new(T::make_empty())
}

impl TypeInfo {
    #[inline]
    fn new<T: Typed>(shape: Shape) -> Self {
        Self {
            ty: Type::of::<T>(),
            shape,
            zero: boxed_zero::<T>,
            make_empty: boxed_empty::<T>,
        }
    }

    /// Info of a boolean, number, character or text type.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is not a scalar kind.
    pub fn scalar<T: Typed>(kind: NativeKind) -> Self {
        assert!(kind.is_scalar(), "`{kind}` is not a scalar kind");
        Self::new::<T>(Shape::Scalar(kind))
    }

    /// Info of a variable-length sequence `T` with items of type `I`.
    pub fn sequence<T: Typed, I: Typed>() -> Self {
        Self::new::<T>(Shape::Sequence {
            item: I::type_info,
        })
    }

    /// Info of a fixed-length array `T` with `len` items of type `I`.
    pub fn array<T: Typed, I: Typed>(len: usize) -> Self {
        Self::new::<T>(Shape::Array {
            item: I::type_info,
            len,
        })
    }

    /// Info of an associative container `T` from `K` to `V`.
    pub fn map<T: Typed, K: Typed, V: Typed>() -> Self {
        Self::new::<T>(Shape::Map {
            key: K::type_info,
            value: V::type_info,
        })
    }

    /// Info of a record type.
    pub fn record<T: Typed>(info: RecordInfo) -> Self {
        Self::new::<T>(Shape::Record(info))
    }

    /// Info of a reference `T` pointing to an `R`.
    pub fn reference<T: Typed, R: Typed>() -> Self {
        Self::new::<T>(Shape::Reference {
            referent: R::type_info,
        })
    }

    /// Info of a type whose payload is only known at runtime.
    pub fn polymorphic<T: Typed>() -> Self {
        Self::new::<T>(Shape::Polymorphic)
    }

    /// Info of a type that converts as a whole, without looking inside.
    pub fn opaque<T: Typed>() -> Self {
        Self::new::<T>(Shape::Opaque)
    }

    /// Info of a newtype `T` standing for `U`.
    pub fn alias<T: Typed, U: Typed>() -> Self {
        Self::new::<T>(Shape::Alias {
            underlying: U::type_info,
        })
    }

    /// The identity of the described type, never resolved through aliases.
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Shorthand for `self.ty().id()`.
    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.ty.id()
    }

    /// Shorthand for `self.ty().path()`.
    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty.path()
    }

    /// Check if the described type is `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty.is::<T>()
    }

    /// Whether this type is a newtype over another type.
    #[inline]
    pub const fn is_alias(&self) -> bool {
        matches!(self.shape, Shape::Alias { .. })
    }

    /// The info of the type behind any number of aliases.
    pub fn strip_alias(&'static self) -> &'static TypeInfo {
        let mut info = self;
        while let Shape::Alias { underlying } = info.shape {
            info = underlying();
        }
        info
    }

    /// The kind of the type, resolved through aliases.
    pub fn kind(&self) -> NativeKind {
        match &self.shape {
            Shape::Scalar(kind) => *kind,
            Shape::Sequence { .. } => NativeKind::Sequence,
            Shape::Array { .. } => NativeKind::Array,
            Shape::Map { .. } => NativeKind::Map,
            Shape::Record(_) => NativeKind::Record,
            Shape::Reference { .. } => NativeKind::Reference,
            Shape::Polymorphic => NativeKind::Polymorphic,
            Shape::Opaque => NativeKind::Opaque,
            Shape::Alias { underlying } => underlying().kind(),
        }
    }

    /// The declared fields, if this is a record type.
    pub fn record_info(&'static self) -> Option<&'static RecordInfo> {
        match &self.strip_alias().shape {
            Shape::Record(info) => Some(info),
            _ => None,
        }
    }

    /// The item type of a sequence or array.
    pub fn element(&'static self) -> Option<&'static TypeInfo> {
        match self.strip_alias().shape {
            Shape::Sequence { item } | Shape::Array { item, .. } => Some(item()),
            _ => None,
        }
    }

    /// The fixed length of an array type.
    pub fn array_len(&'static self) -> Option<usize> {
        match self.strip_alias().shape {
            Shape::Array { len, .. } => Some(len),
            _ => None,
        }
    }

    /// The key type of a map.
    pub fn key(&'static self) -> Option<&'static TypeInfo> {
        match self.strip_alias().shape {
            Shape::Map { key, .. } => Some(key()),
            _ => None,
        }
    }

    /// The value type of a map.
    pub fn value(&'static self) -> Option<&'static TypeInfo> {
        match self.strip_alias().shape {
            Shape::Map { value, .. } => Some(value()),
            _ => None,
        }
    }

    /// The pointed-to type of a reference.
    pub fn referent(&'static self) -> Option<&'static TypeInfo> {
        match self.strip_alias().shape {
            Shape::Reference { referent } => Some(referent()),
            _ => None,
        }
    }

    /// A new zero instance of the type.
    #[inline]
    pub fn zero(&self) -> Box<dyn Native> {
        (self.zero)()
    }

    /// A new writable instance of the type, see [`Typed::make_empty`].
    #[inline]
    pub fn make_empty(&self) -> Box<dyn Native> {
        (self.make_empty)()
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("TypeInfo");
        s.field("ty", &self.ty).field("kind", &self.kind());
        if let Shape::Record(info) = &self.shape {
            s.field("record", info);
        }
        s.finish_non_exhaustive()
    }
}
