use crate::Native;
use crate::annotation::Annotation;
use crate::info::{NativeKind, TypeInfo};

/// One encodable field of a record, for one namespace.
///
/// The `path` holds the declared-field indices leading from the record to the
/// field, more than one for fields promoted out of flattened records.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    declared_name: &'static str,
    path: Box<[usize]>,
    type_info: &'static TypeInfo,
    annotation: Annotation,
}

/// Follow references down to the value they point to.
fn deref_all(mut node: &dyn Native) -> Option<&dyn Native> {
    while node.kind() == NativeKind::Reference {
        node = node.referent()?;
    }
    Some(node)
}

/// Like [`deref_all`], replacing null references with empty ones on the way.
fn deref_all_mut(mut node: &mut dyn Native) -> Option<&mut dyn Native> {
    while node.kind() == NativeKind::Reference {
        if node.referent().is_none() {
            let empty = node.native_type_info().make_empty();
            node.set(empty).ok()?;
        }
        node = node.referent_mut()?;
    }
    Some(node)
}

impl FieldDescriptor {
    pub(crate) fn new(
        declared_name: &'static str,
        path: Box<[usize]>,
        type_info: &'static TypeInfo,
        annotation: Annotation,
    ) -> Self {
        Self {
            declared_name,
            path,
            type_info,
            annotation,
        }
    }

    #[inline]
    pub const fn declared_name(&self) -> &'static str {
        self.declared_name
    }

    #[inline]
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    #[inline]
    pub const fn type_info(&self) -> &'static TypeInfo {
        self.type_info
    }

    /// The kind of the field's type, resolved through aliases.
    #[inline]
    pub fn kind(&self) -> NativeKind {
        self.type_info.kind()
    }

    #[inline]
    pub const fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    /// The external key of the field.
    #[inline]
    pub fn nickname(&self) -> &str {
        self.annotation.nickname()
    }

    #[inline]
    pub fn is_flagged(&self, flag: &str) -> bool {
        self.annotation.is_flagged(flag)
    }

    #[inline]
    pub fn flag_value(&self, key: &str) -> Option<&str> {
        self.annotation.flag_value(key)
    }

    /// The namespace to recurse into this field with: its `@tag` value, else `default`.
    #[inline]
    pub fn namespace_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.annotation.sub_namespace().unwrap_or(default)
    }

    /// The field inside `record`, `None` if a flattened reference on the way is nil.
    pub fn locate<'a>(&self, record: &'a dyn Native) -> Option<&'a dyn Native> {
        let mut node = record;
        for &index in self.path.iter() {
            node = deref_all(node)?.field(index)?;
        }
        Some(node)
    }

    /// The field inside `record`.
    ///
    /// Nil flattened references on the way are allocated. Returns `None` if
    /// one of them is a shared [`Arc`](std::sync::Arc).
    pub fn locate_mut<'a>(&self, record: &'a mut dyn Native) -> Option<&'a mut dyn Native> {
        let mut node = record;
        for &index in self.path.iter() {
            node = deref_all_mut(node)?.field_mut(index)?;
        }
        Some(node)
    }
}
