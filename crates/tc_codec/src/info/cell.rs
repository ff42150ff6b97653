//! Containers for static storage of type information.
//!
//! This is usually used to implement [`Typed`](crate::Typed).
//!
//! - [`NonGenericTypeInfoCell`]: an [`OnceLock`], for types without generics.
//! - [`GenericTypeInfoCell`]: a map from [`TypeId`] to leaked info, because the
//!   `static CELL` inside a generic function is shared by every instantiation.

use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::hash::{FixedHashState, HashMap};
use crate::info::TypeInfo;

/// Container for static storage of non-generic type information.
///
/// ## Example
///
/// ```
/// use tc_codec::info::{NonGenericTypeInfoCell, NativeKind, TypeInfo};
///
/// fn info() -> &'static TypeInfo {
///     static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///     CELL.get_or_init(|| TypeInfo::scalar::<u32>(NativeKind::U32))
/// }
///
/// assert!(core::ptr::eq(info(), info()));
/// assert_eq!(info().kind(), NativeKind::U32);
/// ```
pub struct NonGenericTypeInfoCell(OnceLock<TypeInfo>);

impl NonGenericTypeInfoCell {
    /// Create a empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored info, generating it with `f` on first access.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        self.0.get_or_init(f)
    }
}

impl Default for NonGenericTypeInfoCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Container for static storage of type information with generics.
///
/// ## Example
///
/// ```
/// use tc_codec::info::{GenericTypeInfoCell, NativeKind, TypeInfo};
/// use tc_codec::Typed;
///
/// fn info<T: Typed>() -> &'static TypeInfo {
///     static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///     CELL.get_or_insert::<Vec<T>>(TypeInfo::sequence::<Vec<T>, T>)
/// }
///
/// assert_eq!(info::<u8>().element().unwrap().kind(), NativeKind::U8);
/// assert_eq!(info::<String>().element().unwrap().kind(), NativeKind::Str);
/// ```
pub struct GenericTypeInfoCell(RwLock<HashMap<TypeId, &'static TypeInfo>>);

impl GenericTypeInfoCell {
    /// Create a empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(HashMap::with_hasher(FixedHashState)))
    }

    /// Returns the info stored for `G`, generating it with `f` if there is none.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> TypeInfo) -> &'static TypeInfo {
        // Separate to reduce code compilation times
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(
        &self,
        type_id: TypeId,
        f: impl FnOnce() -> TypeInfo,
    ) -> &'static TypeInfo {
        match self.get_by_type_id(type_id) {
            Some(info) => info,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: TypeInfo) -> &'static TypeInfo {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_insert_with(|| Box::leak(Box::new(value)))
    }
}

impl Default for GenericTypeInfoCell {
    fn default() -> Self {
        Self::new()
    }
}
