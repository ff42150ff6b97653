use crate::Typed;
use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// FieldInfo

/// A declared field of a record.
///
/// Annotations are kept raw, one string per namespace, and parsed by
/// [`Annotation`](crate::annotation::Annotation) when a descriptor is built.
#[derive(Clone, Copy, Debug)]
pub struct FieldInfo {
    name: &'static str,
    index: usize,
    type_info: fn() -> &'static TypeInfo,
    annotations: &'static [(&'static str, &'static str)],
    flatten: bool,
}

impl FieldInfo {
    /// Info of the field `name`, the `index`-th declared field, of type `T`.
    #[inline]
    pub const fn new<T: Typed>(name: &'static str, index: usize) -> Self {
        Self {
            name,
            index,
            type_info: T::type_info,
            annotations: &[],
            flatten: false,
        }
    }

    /// Attach `(namespace, annotation)` pairs.
    #[inline]
    pub const fn with_annotations(
        mut self,
        annotations: &'static [(&'static str, &'static str)],
    ) -> Self {
        self.annotations = annotations;
        self
    }

    /// Mark the fields of this field's record as belonging to the outer record.
    #[inline]
    pub const fn flattened(mut self) -> Self {
        self.flatten = true;
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub const fn is_flattened(&self) -> bool {
        self.flatten
    }

    /// The raw annotation for `namespace`, empty if the field has none.
    pub fn annotation(&self, namespace: &str) -> &'static str {
        self.annotations
            .iter()
            .find(|(ns, _)| *ns == namespace)
            .map_or("", |&(_, raw)| raw)
    }

    /// All `(namespace, annotation)` pairs in declaration order.
    #[inline]
    pub const fn annotations(&self) -> &'static [(&'static str, &'static str)] {
        self.annotations
    }
}

// -----------------------------------------------------------------------------
// RecordInfo

/// The declared fields of a record type, in declaration order.
#[derive(Clone, Debug)]
pub struct RecordInfo {
    fields: Box<[FieldInfo]>,
}

impl RecordInfo {
    pub fn new(fields: &[FieldInfo]) -> Self {
        Self {
            fields: fields.into(),
        }
    }

    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Look up a field by its declared name.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&FieldInfo> {
        self.fields.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every namespace some field is annotated for, sorted and deduplicated.
    pub fn namespaces(&self) -> Vec<&'static str> {
        let mut namespaces: Vec<_> = self
            .fields
            .iter()
            .flat_map(|field| field.annotations.iter().map(|(ns, _)| *ns))
            .collect();
        namespaces.sort_unstable();
        namespaces.dedup();
        namespaces
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldInfo, RecordInfo};
    use crate::info::NativeKind;

    fn info() -> RecordInfo {
        RecordInfo::new(&[
            FieldInfo::new::<String>("name", 0).with_annotations(&[("wire", "n"), ("db", "")]),
            FieldInfo::new::<u32>("age", 1).with_annotations(&[("wire", "a,omit")]),
            FieldInfo::new::<bool>("flag", 2).flattened(),
        ])
    }

    #[test]
    fn lookup() {
        let info = info();
        assert_eq!(info.len(), 3);
        assert_eq!(info.field("age").unwrap().index(), 1);
        assert_eq!(info.field_at(0).unwrap().type_info().kind(), NativeKind::Str);
        assert!(info.field("missing").is_none());
        assert!(!info.field_at(0).unwrap().is_flattened());
        assert!(info.field_at(2).unwrap().is_flattened());
    }

    #[test]
    fn annotations_by_namespace() {
        let info = info();
        let name = info.field("name").unwrap();
        assert_eq!(name.annotation("wire"), "n");
        assert_eq!(name.annotation("db"), "");
        assert_eq!(name.annotation("other"), "");
        assert_eq!(info.namespaces(), ["db", "wire"]);
    }
}
