use crate::annotation::Annotation;
use crate::convert::unsupported;
use crate::descriptor::FieldDescriptor;
use crate::hash::{FixedHashState, HashMap};
use crate::info::{NativeKind, RecordInfo, TypeInfo};

/// The encodable fields of one record type for one namespace.
///
/// Fields excluded with `-` are left out. When two fields share a nickname
/// the later-declared one wins and takes the later position in the order.
///
/// Immutable once built, share it through an `Arc`.
///
/// # Examples
///
/// ```
/// use tc_codec::derive::Native;
/// use tc_codec::descriptor::RecordDescriptor;
/// use tc_codec::Typed;
///
/// #[derive(Native)]
/// struct User {
///     #[codec(wire = "name")]
///     full_name: String,
///     #[codec(wire = "-")]
///     password: String,
///     age: u32,
/// }
///
/// let descriptor = RecordDescriptor::new(User::type_info(), "wire");
/// assert_eq!(descriptor.field_names(), ["name", "age"]);
/// assert_eq!(descriptor.field("name").unwrap().declared_name(), "full_name");
/// assert!(descriptor.field("password").is_none());
/// ```
#[derive(Debug)]
pub struct RecordDescriptor {
    type_info: &'static TypeInfo,
    record_type: &'static TypeInfo,
    namespace: String,
    fields: HashMap<String, FieldDescriptor>,
    field_order: Vec<String>,
}

/// The record type behind any aliases and references.
fn resolve_record(info: &'static TypeInfo) -> Option<&'static TypeInfo> {
    let info = info.strip_alias();
    match info.kind() {
        NativeKind::Record => Some(info),
        NativeKind::Reference => resolve_record(info.referent()?),
        _ => None,
    }
}

impl RecordDescriptor {
    /// Build the descriptor of `type_info` for `namespace`, without caching.
    ///
    /// # Panics
    ///
    /// Panics if the type is neither a record nor a reference to a record.
    pub fn new(type_info: &'static TypeInfo, namespace: &str) -> Self {
        let Some(record_type) = resolve_record(type_info) else {
            unsupported(type_info.type_path(), "a record or a reference to a record");
        };

        let mut descriptor = Self {
            type_info,
            record_type,
            namespace: namespace.into(),
            fields: HashMap::with_hasher(FixedHashState),
            field_order: Vec::new(),
        };
        if let Some(record) = record_type.record_info() {
            descriptor.collect(record, &[]);
        }

        log::trace!(
            "built descriptor of `{}` for namespace `{}`: {:?}",
            type_info.type_path(),
            namespace,
            descriptor.field_order,
        );
        descriptor
    }

    fn collect(&mut self, record: &'static RecordInfo, prefix: &[usize]) {
        for field in record.fields() {
            let raw = field.annotation(&self.namespace);
            let annotation = Annotation::parse(&self.namespace, raw, field.name());
            if annotation.is_excluded() {
                continue;
            }

            let mut path = Vec::with_capacity(prefix.len() + 1);
            path.extend_from_slice(prefix);
            path.push(field.index());

            if field.is_flattened() {
                let inner = resolve_record(field.type_info()).and_then(TypeInfo::record_info);
                let Some(inner) = inner else {
                    unsupported(field.type_info().type_path(), "a record to flatten");
                };
                self.collect(inner, &path);
                continue;
            }

            let nickname = annotation.nickname().to_owned();
            let descriptor =
                FieldDescriptor::new(field.name(), path.into(), field.type_info(), annotation);

            if let Some(shadowed) = self.fields.insert(nickname.clone(), descriptor) {
                log::trace!(
                    "field `{}` of `{}` shadows `{}` under nickname `{nickname}`",
                    field.name(),
                    self.record_type.type_path(),
                    shadowed.declared_name(),
                );
                self.field_order.retain(|name| *name != nickname);
            }
            self.field_order.push(nickname);
        }
    }

    /// The type this descriptor was built for, possibly a reference to a record.
    #[inline]
    pub const fn type_info(&self) -> &'static TypeInfo {
        self.type_info
    }

    /// The record type behind [`type_info`](Self::type_info).
    #[inline]
    pub const fn record_type(&self) -> &'static TypeInfo {
        self.record_type
    }

    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Look up a field by nickname.
    #[inline]
    pub fn field(&self, nickname: &str) -> Option<&FieldDescriptor> {
        self.fields.get(nickname)
    }

    #[inline]
    pub fn contains(&self, nickname: &str) -> bool {
        self.fields.contains_key(nickname)
    }

    /// Nicknames in field order.
    #[inline]
    pub fn field_names(&self) -> &[String] {
        &self.field_order
    }

    /// Fields in field order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = &FieldDescriptor> {
        self.field_order.iter().map(|nickname| &self.fields[nickname.as_str()])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.field_order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.field_order.is_empty()
    }
}

impl PartialEq for RecordDescriptor {
    /// Same bound type, namespace and fields.
    fn eq(&self, other: &Self) -> bool {
        self.type_info.ty() == other.type_info.ty()
            && self.namespace == other.namespace
            && self.field_order == other.field_order
            && self.fields().zip(other.fields()).all(|(a, b)| {
                a.path() == b.path()
                    && a.declared_name() == b.declared_name()
                    && a.annotation() == b.annotation()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::RecordDescriptor;
    use crate::derive::Native;
    use crate::info::NativeKind;
    use crate::Typed;

    #[derive(Native)]
    struct Inner {
        #[codec(wire = "x")]
        a: u8,
        #[codec(wire = "-")]
        b: u8,
    }

    #[derive(Native)]
    struct Outer {
        #[codec(wire = "id")]
        id: u64,
        #[codec(flatten)]
        inner: Inner,
        #[codec(wire = "tail, @tag=alt")]
        tail: Option<Box<Inner>>,
    }

    #[derive(Native)]
    struct Collide {
        #[codec(wire = "same")]
        first: u8,
        #[codec(wire = "other")]
        second: u8,
        #[codec(wire = "same")]
        third: String,
    }

    #[test]
    fn field_order_and_exclusion() {
        let d = RecordDescriptor::new(Inner::type_info(), "wire");
        assert_eq!(d.field_names(), ["x"]);
        assert_eq!(d.len(), 1);
        assert!(!d.contains("b"));
        assert!(d.field("x").unwrap().kind() == NativeKind::U8);
    }

    #[test]
    fn missing_annotation_uses_declared_name() {
        let d = RecordDescriptor::new(Inner::type_info(), "other");
        assert_eq!(d.field_names(), ["a", "b"]);
        assert_eq!(d.namespace(), "other");
    }

    #[test]
    fn flattened_fields_are_promoted() {
        let d = RecordDescriptor::new(Outer::type_info(), "wire");
        assert_eq!(d.field_names(), ["id", "x", "tail"]);
        assert_eq!(d.field("id").unwrap().path(), [0]);
        assert_eq!(d.field("x").unwrap().path(), [1, 0]);
        assert_eq!(d.field("tail").unwrap().path(), [2]);
        assert_eq!(d.field("tail").unwrap().namespace_or("wire"), "alt");
        assert_eq!(d.field("id").unwrap().namespace_or("wire"), "wire");
    }

    #[test]
    fn later_nickname_wins() {
        let d = RecordDescriptor::new(Collide::type_info(), "wire");
        assert_eq!(d.field_names(), ["other", "same"]);
        assert_eq!(d.field("same").unwrap().declared_name(), "third");
        assert_eq!(d.field("same").unwrap().kind(), NativeKind::Str);
    }

    #[test]
    fn references_to_records_are_resolved() {
        let d = RecordDescriptor::new(<Option<Box<Inner>>>::type_info(), "wire");
        assert!(d.type_info().is::<Option<Box<Inner>>>());
        assert!(d.record_type().is::<Inner>());
        assert_eq!(d.field_names(), ["x"]);
    }

    #[test]
    fn rebuilt_descriptors_are_equal() {
        let a = RecordDescriptor::new(Outer::type_info(), "wire");
        let b = RecordDescriptor::new(Outer::type_info(), "wire");
        let c = RecordDescriptor::new(Outer::type_info(), "other");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    #[should_panic(expected = "expected a record or a reference to a record")]
    fn non_records_panic() {
        RecordDescriptor::new(<Vec<u8>>::type_info(), "wire");
    }
}
