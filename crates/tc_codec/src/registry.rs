//! Memoization of [`RecordDescriptor`]s.
//!
//! A [`Registry`] maps `(namespace, type)` to the descriptor of that type for
//! that namespace. Lookups take a shared lock; a miss takes the exclusive lock
//! and builds the descriptor. Two threads missing the same key both build it
//! and the last one stored wins, the descriptors are equal.
//!
//! ## auto_register
//!
//! With the `auto_register` feature, types annotated `#[codec(auto_register)]`
//! are collected at link time through the [`inventory`] crate, and
//! [`Registry::auto_register`] builds their descriptors ahead of use.
//!
//! [`inventory`]: https://docs.rs/inventory

use core::any::TypeId;
use core::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use hashbrown::Equivalent;

use crate::Typed;
use crate::descriptor::RecordDescriptor;
use crate::hash::{FixedHashState, HashMap};
use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// Keys

#[derive(PartialEq, Eq, Hash)]
struct DescriptorKey {
    namespace: Box<str>,
    type_id: TypeId,
}

/// Borrowed form of [`DescriptorKey`], hashes identically.
#[derive(Hash)]
struct KeyRef<'a> {
    namespace: &'a str,
    type_id: TypeId,
}

impl Equivalent<DescriptorKey> for KeyRef<'_> {
    #[inline]
    fn equivalent(&self, key: &DescriptorKey) -> bool {
        self.type_id == key.type_id && self.namespace == &*key.namespace
    }
}

// -----------------------------------------------------------------------------
// Registry

/// A concurrency-safe cache of record descriptors.
///
/// Construct one per application, or share [`Registry::global`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tc_codec::derive::Native;
/// use tc_codec::Registry;
///
/// #[derive(Native)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let registry = Registry::new();
/// let a = registry.descriptor_of::<Point>("wire");
/// let b = registry.descriptor_of::<Point>("wire");
///
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(registry.len(), 1);
/// ```
pub struct Registry {
    descriptors: RwLock<HashMap<DescriptorKey, Arc<RecordDescriptor>>>,
}

impl Registry {
    /// Create an empty registry.
    #[inline]
    pub const fn new() -> Self {
        Self {
            descriptors: RwLock::new(HashMap::with_hasher(FixedHashState)),
        }
    }

    /// A process-wide registry.
    pub fn global() -> &'static Registry {
        static GLOBAL: Registry = Registry::new();
        &GLOBAL
    }

    /// The descriptor of `type_info` for `namespace`, built on first request.
    ///
    /// # Panics
    ///
    /// Panics if the type is neither a record nor a reference to a record.
    pub fn descriptor(&self, type_info: &'static TypeInfo, namespace: &str) -> Arc<RecordDescriptor> {
        let key = KeyRef {
            namespace,
            type_id: type_info.type_id(),
        };

        if let Some(descriptor) = self
            .descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Arc::clone(descriptor);
        }

        let mut descriptors = self
            .descriptors
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        // No re-check: a concurrent miss on the same key rebuilds and overwrites.
        let descriptor = Arc::new(RecordDescriptor::new(type_info, namespace));
        let key = DescriptorKey {
            namespace: namespace.into(),
            type_id: type_info.type_id(),
        };
        if descriptors.insert(key, Arc::clone(&descriptor)).is_some() {
            log::debug!(
                "descriptor of `{}` for namespace `{namespace}` was rebuilt and replaced",
                type_info.type_path(),
            );
        }
        descriptor
    }

    /// Shorthand for `self.descriptor(T::type_info(), namespace)`.
    #[inline]
    pub fn descriptor_of<T: Typed>(&self, namespace: &str) -> Arc<RecordDescriptor> {
        self.descriptor(T::type_info(), namespace)
    }

    /// Whether a descriptor of `type_id` for `namespace` is cached.
    pub fn contains(&self, type_id: TypeId, namespace: &str) -> bool {
        self.descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&KeyRef { namespace, type_id })
    }

    /// The number of cached descriptors.
    pub fn len(&self) -> usize {
        self.descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds the descriptors of every type annotated `#[codec(auto_register)]`,
    /// for every namespace its fields are annotated for.
    ///
    /// Returns the number of descriptors built, always `0` without the
    /// `auto_register` feature.
    ///
    /// # Examples
    ///
    /// ```
    /// use tc_codec::derive::Native;
    /// use tc_codec::{Registry, Typed};
    ///
    /// #[derive(Native)]
    /// #[codec(auto_register)]
    /// struct Account {
    ///     #[codec(db = "account_id", wire = "id")]
    ///     id: u64,
    /// }
    ///
    /// let registry = Registry::new();
    /// registry.auto_register();
    ///
    /// # if cfg!(feature = "auto_register") {
    /// assert!(registry.contains(Account::type_info().type_id(), "db"));
    /// assert!(registry.contains(Account::type_info().type_id(), "wire"));
    /// # }
    /// ```
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&self) -> usize {
        #[cfg(feature = "auto_register")]
        {
            use crate::__macro_exports::auto_register::AutoRegister;

            let mut built = 0;
            for AutoRegister(type_info) in inventory::iter::<AutoRegister> {
                let type_info = type_info();
                let Some(record) = type_info.record_info() else {
                    continue;
                };
                for namespace in record.namespaces() {
                    self.descriptor(type_info, namespace);
                    built += 1;
                }
            }
            log::debug!("auto registered {built} descriptors");
            built
        }

        #[cfg(not(feature = "auto_register"))]
        0
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};

    use super::Registry;
    use crate::derive::Native;
    use crate::descriptor::RecordDescriptor;
    use crate::Typed;

    #[derive(Native)]
    struct Sample {
        #[codec(wire = "n", db = "name")]
        name: String,
        #[codec(wire = "-")]
        secret: String,
    }

    #[test]
    fn caches_by_namespace_and_type() {
        let registry = Registry::new();
        assert!(registry.is_empty());

        let wire = registry.descriptor_of::<Sample>("wire");
        let db = registry.descriptor_of::<Sample>("db");
        let boxed = registry.descriptor_of::<Option<Box<Sample>>>("wire");

        assert_eq!(registry.len(), 3);
        assert!(!Arc::ptr_eq(&wire, &boxed));
        assert_eq!(wire.field_names(), ["n"]);
        assert_eq!(db.field_names(), ["name", "secret"]);
        assert!(registry.contains(Sample::type_info().type_id(), "db"));
        assert!(!registry.contains(Sample::type_info().type_id(), "other"));
    }

    #[test]
    fn cached_equals_uncached() {
        let registry = Registry::new();
        let cached = registry.descriptor_of::<Sample>("wire");
        let fresh = RecordDescriptor::new(Sample::type_info(), "wire");
        assert_eq!(*cached, fresh);
    }

    #[test]
    fn concurrent_cold_start() {
        const THREADS: usize = 8;

        let registry = Registry::new();
        let barrier = Barrier::new(THREADS);

        let descriptors: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        registry.descriptor_of::<Sample>("wire")
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(registry.len(), 1);
        for descriptor in &descriptors {
            assert_eq!(**descriptor, *descriptors[0]);
        }
    }

    #[test]
    fn global_is_shared() {
        assert!(core::ptr::eq(Registry::global(), Registry::global()));
    }
}
