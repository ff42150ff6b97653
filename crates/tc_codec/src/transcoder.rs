//! The public encode and decode operations of one record type.
//!
//! A [`Transcoder`] binds the [`RecordDescriptor`] of a type for a namespace,
//! and holds per-field override functions.
//!
//! # Binding
//!
//! The bound type is a record, an alias of one or a reference to one, e.g.
//! `User`, `Option<User>` or `Box<User>`. Operations taking a record accept a
//! value of the bound type or of any type leading to the record through
//! references.
//!
//! # Zero values
//!
//! [`encode`](Transcoder::encode) never omits a field. A zero-valued reference
//! or polymorphic field encodes to [`Value::Nil`], any other field encodes its
//! value, zero or not. [`decode`](Transcoder::decode) skips `Nil` and zero
//! entries, leaving the field at its empty value.

use core::fmt;
use std::sync::Arc;

use crate::convert::{BoxError, CodecError, Context};
use crate::descriptor::{FieldDescriptor, RecordDescriptor};
use crate::hash::{FixedHashState, HashMap};
use crate::info::{NativeKind, TypeInfo};
use crate::registry::Registry;
use crate::value::{Value, ValueMap};
use crate::{Native, Typed};

// -----------------------------------------------------------------------------
// Overrides

/// A caller-supplied encoder replacing the generic conversion of one field.
pub type FieldEncoder<'r> = Box<dyn Fn(&dyn Native) -> Result<Value, BoxError> + 'r>;

/// A caller-supplied decoder replacing the generic conversion of one field.
///
/// The returned value must have the type of the field.
pub type FieldDecoder<'r> = Box<dyn Fn(Value) -> Result<Box<dyn Native>, BoxError> + 'r>;

// -----------------------------------------------------------------------------
// Transcoder

/// Converts one record type to and from [`ValueMap`]s, for one namespace.
///
/// # Examples
///
/// ```
/// use tc_codec::derive::Native;
/// use tc_codec::{Registry, Transcoder, Value};
///
/// #[derive(Native, Debug, PartialEq)]
/// struct User {
///     #[codec(wire = "name")]
///     full_name: String,
///     #[codec(wire = "-")]
///     password: String,
///     age: u32,
/// }
///
/// let registry = Registry::new();
/// let transcoder = Transcoder::of::<User>(&registry, "wire");
///
/// let user = User { full_name: "bryn".into(), password: "hunter2".into(), age: 29 };
/// let map = transcoder.encode(&user).unwrap();
///
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["name", "age"]);
/// assert_eq!(map.get("age"), Some(&Value::U32(29)));
///
/// let back: User = transcoder.decode_as(map).unwrap();
/// assert_eq!(back, User { full_name: "bryn".into(), password: String::new(), age: 29 });
/// ```
pub struct Transcoder<'r> {
    registry: &'r Registry,
    descriptor: Arc<RecordDescriptor>,
    encoders: HashMap<String, FieldEncoder<'r>>,
    decoders: HashMap<String, FieldDecoder<'r>>,
}

impl<'r> Transcoder<'r> {
    /// Bind the type of `specimen`.
    ///
    /// # Panics
    ///
    /// Panics if the type is neither a record nor a reference to a record.
    #[inline]
    pub fn new(registry: &'r Registry, specimen: &dyn Native, namespace: &str) -> Self {
        Self::for_type(registry, specimen.native_type_info(), namespace)
    }

    /// Bind `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` is neither a record nor a reference to a record.
    #[inline]
    pub fn of<T: Typed>(registry: &'r Registry, namespace: &str) -> Self {
        Self::for_type(registry, T::type_info(), namespace)
    }

    /// Bind the type described by `type_info`.
    ///
    /// # Panics
    ///
    /// Panics if the type is neither a record nor a reference to a record.
    pub fn for_type(registry: &'r Registry, type_info: &'static TypeInfo, namespace: &str) -> Self {
        Self {
            registry,
            descriptor: registry.descriptor(type_info, namespace),
            encoders: HashMap::with_hasher(FixedHashState),
            decoders: HashMap::with_hasher(FixedHashState),
        }
    }

    /// Replace the generic encoding of field `nickname` with `encoder`.
    ///
    /// The encoder is not called for zero-valued reference or polymorphic
    /// fields, they encode to `Nil`.
    pub fn set_encoder<F>(&mut self, nickname: impl Into<String>, encoder: F) -> &mut Self
    where
        F: Fn(&dyn Native) -> Result<Value, BoxError> + 'r,
    {
        self.encoders.insert(nickname.into(), Box::new(encoder));
        self
    }

    /// Replace the generic decoding of field `nickname` with `decoder`.
    pub fn set_decoder<F>(&mut self, nickname: impl Into<String>, decoder: F) -> &mut Self
    where
        F: Fn(Value) -> Result<Box<dyn Native>, BoxError> + 'r,
    {
        self.decoders.insert(nickname.into(), Box::new(decoder));
        self
    }

    #[inline]
    pub fn descriptor(&self) -> &RecordDescriptor {
        &self.descriptor
    }

    #[inline]
    pub fn namespace(&self) -> &str {
        self.descriptor.namespace()
    }

    #[inline]
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Whether `nickname` names an encodable field.
    #[inline]
    pub fn is_known_field(&self, nickname: &str) -> bool {
        self.descriptor.contains(nickname)
    }

    /// Nicknames in field order.
    #[inline]
    pub fn field_names(&self) -> &[String] {
        self.descriptor.field_names()
    }

    // -------------------------------------------------------------------------
    // Construction

    /// A new instance of the bound type ready to be decoded into.
    ///
    /// References point to an empty record.
    #[inline]
    pub fn make_empty(&self) -> Box<dyn Native> {
        self.descriptor.type_info().make_empty()
    }

    /// Typed version of [`make_empty`](Self::make_empty).
    pub fn make_empty_as<T: Typed>(&self) -> Result<T, CodecError> {
        self.make_empty()
            .take::<T>()
            .map_err(|empty| mismatched::<T>(&*empty))
    }

    // -------------------------------------------------------------------------
    // Encode

    /// Encode every encodable field of `record` into a map keyed by nickname,
    /// in field order.
    pub fn encode(&self, record: &dyn Native) -> Result<ValueMap, CodecError> {
        let record = self.resolve(record)?;
        let mut map = ValueMap::with_capacity(self.descriptor.len());
        for field in self.descriptor.fields() {
            let value = self.encode_field(field, field.locate(record))?;
            map.insert(field.nickname(), value);
        }
        Ok(map)
    }

    /// Encode the field `nickname` of `record`.
    pub fn get(&self, record: &dyn Native, nickname: &str) -> Result<Value, CodecError> {
        let field = self.lookup(nickname)?;
        let record = self.resolve(record)?;
        self.encode_field(field, field.locate(record))
    }

    /// The field `nickname` of `record`, unconverted.
    pub fn field<'a>(&self, record: &'a dyn Native, nickname: &str) -> Result<&'a dyn Native, CodecError> {
        let field = self.lookup(nickname)?;
        let record = self.resolve(record)?;
        field.locate(record).ok_or_else(|| self.nil_record())
    }

    /// `native` is `None` when a flattened reference leading to the field is nil.
    fn encode_field(&self, field: &FieldDescriptor, native: Option<&dyn Native>) -> Result<Value, CodecError> {
        let nullable = field.kind().is_nullable();
        let zero;
        let native = match native {
            Some(native) if nullable && native.is_zero() => return Ok(Value::Nil),
            Some(native) => native,
            None if nullable => return Ok(Value::Nil),
            None => {
                zero = field.type_info().zero();
                &*zero
            }
        };

        let nickname = field.nickname();
        if let Some(encoder) = self.encoders.get(nickname) {
            return encoder(native).map_err(|source| CodecError::Override {
                nickname: nickname.into(),
                source,
            });
        }

        native
            .to_value(&self.field_context(field))
            .map_err(|err| err.in_field(nickname, self.record_path()))
    }

    // -------------------------------------------------------------------------
    // Decode

    /// Decode `map` into a new instance of the bound type.
    ///
    /// Unknown keys are ignored, `Nil` and zero entries are skipped.
    pub fn decode(&self, map: ValueMap) -> Result<Box<dyn Native>, CodecError> {
        let mut out = self.make_empty();
        self.decode_into(&mut *out, map)?;
        Ok(out)
    }

    /// Decode `map` into a new `T`, `T` being the bound type.
    pub fn decode_as<T: Typed>(&self, map: ValueMap) -> Result<T, CodecError> {
        self.decode(map)?
            .take::<T>()
            .map_err(|out| mismatched::<T>(&*out))
    }

    /// Decode the entries of `map` into the fields of `record`.
    ///
    /// Fields without an entry are left untouched.
    pub fn decode_into(&self, record: &mut dyn Native, map: ValueMap) -> Result<(), CodecError> {
        let record = self.resolve_mut(record)?;
        for (key, value) in map {
            let Some(field) = self.descriptor.field(&key) else {
                continue;
            };
            if value.is_nil() || value.is_zero() {
                continue;
            }

            if let Some(decoder) = self.decoders.get(&key) {
                let decoded = decoder(value).map_err(|source| CodecError::Override {
                    nickname: key.clone(),
                    source,
                })?;
                if decoded.is_zero() {
                    continue;
                }
                self.store(record, field, decoded)?;
            } else {
                let cx = self.field_context(field);
                let target = field.locate_mut(record).ok_or_else(|| self.nil_record())?;
                target
                    .apply_value(value, &cx)
                    .map_err(|err| err.in_field(&key, self.record_path()))?;
            }
        }
        Ok(())
    }

    /// Decode `value` into the field `nickname` of `record`.
    ///
    /// `Nil` resets the field to its zero value. Decoder overrides are not
    /// consulted.
    pub fn set(&self, record: &mut dyn Native, nickname: &str, value: Value) -> Result<(), CodecError> {
        let field = self.lookup(nickname)?;
        let cx = self.field_context(field);
        let record = self.resolve_mut(record)?;
        let target = field.locate_mut(record).ok_or_else(|| self.nil_record())?;
        target
            .apply_value(value, &cx)
            .map_err(|err| err.in_field(nickname, self.record_path()))
    }

    /// Store `value` into the field `nickname` of `record` as is.
    ///
    /// The value must have the exact type of the field.
    pub fn set_native(
        &self,
        record: &mut dyn Native,
        nickname: &str,
        value: Box<dyn Native>,
    ) -> Result<(), CodecError> {
        let field = self.lookup(nickname)?;
        let record = self.resolve_mut(record)?;
        self.store(record, field, value)
    }

    fn store(&self, record: &mut dyn Native, field: &FieldDescriptor, value: Box<dyn Native>) -> Result<(), CodecError> {
        let target = field.locate_mut(record).ok_or_else(|| self.nil_record())?;
        target.set(value).map_err(|value| {
            CodecError::MismatchedType {
                expected: field.type_info().type_path(),
                found: value.native_type_info().type_path(),
            }
            .in_field(field.nickname(), self.record_path())
        })
    }

    // -------------------------------------------------------------------------
    // Helpers

    fn lookup(&self, nickname: &str) -> Result<&FieldDescriptor, CodecError> {
        self.descriptor
            .field(nickname)
            .ok_or_else(|| CodecError::UnknownField {
                nickname: nickname.into(),
                record: self.record_path(),
            })
    }

    #[inline]
    fn field_context<'a>(&'a self, field: &'a FieldDescriptor) -> Context<'a> {
        Context::new(self.registry, field.namespace_or(self.namespace()))
    }

    #[inline]
    fn record_path(&self) -> &'static str {
        self.descriptor.record_type().type_path()
    }

    #[inline]
    fn nil_record(&self) -> CodecError {
        CodecError::NilRecord {
            record: self.record_path(),
        }
    }

    fn mismatch(&self, found: &TypeInfo) -> CodecError {
        CodecError::MismatchedType {
            expected: self.descriptor.type_info().type_path(),
            found: found.type_path(),
        }
    }

    /// Whether `info` is the bound record type, possibly behind an alias.
    #[inline]
    fn is_record(&self, info: &'static TypeInfo) -> bool {
        info.strip_alias().type_id() == self.descriptor.record_type().type_id()
    }

    /// Follow references from `node` down to the record.
    fn resolve<'a>(&self, mut node: &'a dyn Native) -> Result<&'a dyn Native, CodecError> {
        loop {
            let info = node.native_type_info();
            if self.is_record(info) {
                return Ok(node);
            }
            if info.kind() != NativeKind::Reference {
                return Err(self.mismatch(info));
            }
            node = node.referent().ok_or_else(|| self.nil_record())?;
        }
    }

    fn resolve_mut<'a>(&self, mut node: &'a mut dyn Native) -> Result<&'a mut dyn Native, CodecError> {
        loop {
            let info = node.native_type_info();
            if self.is_record(info) {
                return Ok(node);
            }
            if info.kind() != NativeKind::Reference {
                return Err(self.mismatch(info));
            }
            node = node.referent_mut().ok_or_else(|| self.nil_record())?;
        }
    }
}

#[cold]
fn mismatched<T: Typed>(found: &dyn Native) -> CodecError {
    CodecError::MismatchedType {
        expected: T::type_info().type_path(),
        found: found.native_type_info().type_path(),
    }
}

impl fmt::Debug for Transcoder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transcoder")
            .field("type", &self.descriptor.type_info().type_path())
            .field("namespace", &self.namespace())
            .field("fields", &self.field_names())
            .field("encoders", &self.encoders.keys().collect::<Vec<_>>())
            .field("decoders", &self.decoders.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use super::Transcoder;
    use crate::derive::Native;
    use crate::impls::AnyValue;
    use crate::{CodecError, Registry, Value, ValueMap};

    #[derive(Native, Debug, PartialEq)]
    struct Name(String);

    #[derive(Native, Debug, PartialEq)]
    struct Age(u64);

    #[derive(Native, Debug, Clone, PartialEq)]
    struct Inner {
        #[codec(weezy = "foo")]
        foo: String,
        #[codec(weezy = "bar")]
        bar: Vec<u64>,
    }

    #[derive(Native, Debug)]
    struct Keith {
        #[codec(xyzzy = "name")]
        name: Name,
        #[codec(xyzzy = "age")]
        age: Age,
        #[codec(xyzzy = "inner, @tag=weezy")]
        inner: Inner,
        #[codec(xyzzy = "structSlice, @tag=weezy")]
        struct_slice: Vec<Inner>,
        #[codec(xyzzy = "interfaceSlice")]
        interface_slice: Vec<AnyValue>,
        #[codec(xyzzy = "mapOfStructs, @tag=weezy")]
        map_of_structs: BTreeMap<String, Inner>,
        #[codec(xyzzy = "mapOfBools")]
        map_of_bools: HashMap<String, bool>,
        #[codec(xyzzy = "-")]
        secret: String,
        #[codec(xyzzy = "partner")]
        partner: Option<Box<Inner>>,
    }

    fn inner() -> Inner {
        Inner {
            foo: "xyzzy".into(),
            bar: vec![5, 6, 7],
        }
    }

    fn inner_map() -> Value {
        Value::Map(ValueMap::from_iter([
            ("foo", Value::from("xyzzy")),
            ("bar", Value::Seq(vec![Value::I64(5), Value::I64(6), Value::I64(7)])),
        ]))
    }

    fn keith_map() -> ValueMap {
        ValueMap::from_iter([
            ("name", Value::from("keith richards")),
            ("age", Value::I64(429)),
            ("inner", inner_map()),
            ("structSlice", Value::Seq(vec![inner_map()])),
            ("interfaceSlice", Value::Seq(vec![inner_map()])),
            ("mapOfStructs", Value::Map(ValueMap::from_iter([("some-key", inner_map())]))),
            ("mapOfBools", Value::Map(ValueMap::from_iter([("one", true), ("two", false)]))),
            ("secret", Value::from("ignored")),
            ("unknown", Value::from("ignored")),
        ])
    }

    /// Decodes `interfaceSlice` entries into `Inner` records.
    fn with_overrides<'r>(transcoder: &mut Transcoder<'r>, registry: &'r Registry) {
        transcoder.set_decoder("interfaceSlice", move |value| {
            let inner = Transcoder::of::<Inner>(registry, "weezy");
            let items = value.into_seq().map_err(|_| "expected a sequence")?;
            let mut decoded = Vec::with_capacity(items.len());
            for item in items {
                let map = item.into_map().map_err(|_| "expected a map")?;
                decoded.push(AnyValue::new(inner.decode_as::<Inner>(map)?));
            }
            Ok(Box::new(decoded))
        });
        transcoder.set_encoder("interfaceSlice", move |native| {
            let inner = Transcoder::of::<Inner>(registry, "weezy");
            let items = native
                .downcast_ref::<Vec<AnyValue>>()
                .ok_or("expected a Vec<AnyValue>")?;
            let mut encoded = Vec::with_capacity(items.len());
            for item in items {
                let record = item.downcast_ref::<Inner>().ok_or("expected an Inner")?;
                encoded.push(Value::Map(inner.encode(record)?));
            }
            Ok(Value::Seq(encoded))
        });
    }

    fn check_keith(keith: &Keith) {
        assert_eq!(keith.name, Name("keith richards".into()));
        assert_eq!(keith.age, Age(429));
        assert_eq!(keith.inner, inner());
        assert_eq!(keith.struct_slice, [inner()]);
        assert_eq!(keith.interface_slice.len(), 1);
        assert_eq!(keith.interface_slice[0].downcast_ref::<Inner>(), Some(&inner()));
        assert_eq!(keith.map_of_structs, BTreeMap::from([("some-key".into(), inner())]));
        assert_eq!(
            keith.map_of_bools,
            HashMap::from([("one".into(), true), ("two".into(), false)])
        );
        assert_eq!(keith.secret, "");
        assert_eq!(keith.partner, None);
    }

    #[test]
    fn decode_value_bound() {
        let registry = Registry::new();
        let mut transcoder = Transcoder::of::<Keith>(&registry, "xyzzy");
        with_overrides(&mut transcoder, &registry);

        let keith: Keith = transcoder.decode_as(keith_map()).unwrap();
        check_keith(&keith);
    }

    #[test]
    fn decode_reference_bound() {
        let registry = Registry::new();
        let mut transcoder = Transcoder::of::<Option<Box<Keith>>>(&registry, "xyzzy");
        with_overrides(&mut transcoder, &registry);

        let keith: Option<Box<Keith>> = transcoder.decode_as(keith_map()).unwrap();
        check_keith(keith.as_deref().unwrap());

        let err = transcoder.decode_as::<Keith>(keith_map()).unwrap_err();
        assert!(matches!(err, CodecError::MismatchedType { .. }));
    }

    #[test]
    fn encode_scenario() {
        let registry = Registry::new();
        let mut transcoder = Transcoder::of::<Keith>(&registry, "xyzzy");
        with_overrides(&mut transcoder, &registry);

        let keith: Keith = transcoder.decode_as(keith_map()).unwrap();
        let map = transcoder.encode(&keith).unwrap();

        assert_eq!(
            map.keys().collect::<Vec<_>>(),
            [
                "name",
                "age",
                "inner",
                "structSlice",
                "interfaceSlice",
                "mapOfStructs",
                "mapOfBools",
                "partner",
            ]
        );

        let inner_encoded = Value::Map(ValueMap::from_iter([
            ("foo", Value::from("xyzzy")),
            ("bar", Value::Seq(vec![Value::U64(5), Value::U64(6), Value::U64(7)])),
        ]));

        // Aliases are stripped.
        assert_eq!(map.get("name"), Some(&Value::from("keith richards")));
        assert_eq!(map.get("age"), Some(&Value::U64(429)));
        assert_eq!(map.get("inner"), Some(&inner_encoded));
        assert_eq!(map.get("structSlice"), Some(&Value::Seq(vec![inner_encoded.clone()])));
        assert_eq!(map.get("interfaceSlice"), Some(&Value::Seq(vec![inner_encoded.clone()])));
        assert_eq!(
            map.get("mapOfStructs"),
            Some(&Value::Map(ValueMap::from_iter([("some-key", inner_encoded)])))
        );
        assert_eq!(map.get("partner"), Some(&Value::Nil));
        assert!(!map.contains_key("secret"));
    }

    #[test]
    fn zero_values_are_normalized() {
        let registry = Registry::new();
        let transcoder = Transcoder::of::<Keith>(&registry, "xyzzy");

        let empty = transcoder.make_empty_as::<Keith>().unwrap();
        let map = transcoder.encode(&empty).unwrap();

        assert_eq!(map.len(), 8);
        assert_eq!(map.get("name"), Some(&Value::from("")));
        assert_eq!(map.get("age"), Some(&Value::U64(0)));
        assert_eq!(
            map.get("inner"),
            Some(&Value::Map(ValueMap::from_iter([
                ("foo", Value::from("")),
                ("bar", Value::Seq(Vec::new())),
            ])))
        );
        assert_eq!(map.get("interfaceSlice"), Some(&Value::Seq(Vec::new())));
        assert_eq!(map.get("mapOfBools"), Some(&Value::Map(ValueMap::new())));
        assert_eq!(map.get("partner"), Some(&Value::Nil));
    }

    #[test]
    fn nil_and_zero_entries_are_skipped() {
        let registry = Registry::new();
        let transcoder = Transcoder::of::<Inner>(&registry, "weezy");

        let map = ValueMap::from_iter([("foo", Value::Nil), ("bar", Value::Nil)]);
        assert_eq!(transcoder.decode_as::<Inner>(map).unwrap(), Inner {
            foo: String::new(),
            bar: Vec::new(),
        });

        let map = ValueMap::from_iter([("foo", Value::from("")), ("bar", Value::U8(0))]);
        assert!(transcoder.decode_as::<Inner>(map).is_ok());
    }

    #[test]
    fn namespaces_select_annotations() {
        let registry = Registry::new();
        let weezy = Transcoder::of::<Inner>(&registry, "weezy");
        let plain = Transcoder::of::<Inner>(&registry, "plain");

        assert_eq!(weezy.field_names(), ["foo", "bar"]);
        assert_eq!(plain.field_names(), ["foo", "bar"]);
        assert!(plain.is_known_field("foo"));

        let keith = Transcoder::of::<Keith>(&registry, "weezy");
        assert_eq!(keith.field_names()[0], "name");
        assert!(keith.is_known_field("secret"));
        assert!(keith.is_known_field("map_of_bools"));
        assert!(!keith.is_known_field("mapOfBools"));
    }

    #[test]
    fn get_and_set() {
        let registry = Registry::new();
        let transcoder = Transcoder::of::<Keith>(&registry, "xyzzy");
        let mut keith = transcoder.make_empty_as::<Keith>().unwrap();

        transcoder.set(&mut keith, "name", Value::from("keith")).unwrap();
        assert_eq!(keith.name, Name("keith".into()));
        assert_eq!(transcoder.get(&keith, "name").unwrap(), Value::from("keith"));

        transcoder.set(&mut keith, "partner", inner_map()).unwrap();
        assert_eq!(keith.partner.as_deref(), Some(&inner()));

        transcoder.set(&mut keith, "partner", Value::Nil).unwrap();
        assert_eq!(keith.partner, None);

        transcoder
            .set_native(&mut keith, "age", Box::new(Age(12)))
            .unwrap();
        assert_eq!(keith.age, Age(12));

        let field = transcoder.field(&keith, "age").unwrap();
        assert_eq!(field.downcast_ref::<Age>(), Some(&Age(12)));

        let err = transcoder
            .set_native(&mut keith, "age", Box::new(12u64))
            .unwrap_err();
        assert!(matches!(
            err.root_cause(),
            CodecError::MismatchedType { found: "u64", .. }
        ));
    }

    #[test]
    fn unknown_fields_and_nil_records() {
        let registry = Registry::new();
        let transcoder = Transcoder::of::<Option<Keith>>(&registry, "xyzzy");

        let none: Option<Keith> = None;
        let err = transcoder.get(&none, "name").unwrap_err();
        assert!(matches!(err, CodecError::NilRecord { .. }));

        let mut none: Option<Keith> = None;
        let err = transcoder.set(&mut none, "name", Value::from("x")).unwrap_err();
        assert!(matches!(err, CodecError::NilRecord { .. }));

        let some = transcoder.make_empty_as::<Option<Keith>>().unwrap();
        let err = transcoder.get(&some, "secret").unwrap_err();
        assert!(matches!(
            &err,
            CodecError::UnknownField { nickname, .. } if nickname == "secret"
        ));

        let err = transcoder.get(&12u8, "name").unwrap_err();
        assert!(matches!(err, CodecError::MismatchedType { found: "u8", .. }));
    }

    #[test]
    fn errors_carry_the_field_path() {
        let registry = Registry::new();
        let transcoder = Transcoder::of::<Keith>(&registry, "xyzzy");

        let map = ValueMap::from_iter([(
            "inner",
            Value::Map(ValueMap::from_iter([("bar", Value::Seq(vec![Value::I8(-1)]))])),
        )]);
        let err = transcoder.decode(map).unwrap_err();
        assert_eq!(err.path(), ["inner", "bar"]);
        assert!(matches!(
            err.root_cause(),
            CodecError::Conversion { from: "i8", to: "u64" }
        ));

        let map = ValueMap::from_iter([("age", Value::from("old"))]);
        let err = transcoder.decode(map).unwrap_err();
        assert_eq!(err.path(), ["age"]);
    }

    #[test]
    fn override_errors() {
        let registry = Registry::new();
        let mut transcoder = Transcoder::of::<Keith>(&registry, "xyzzy");
        transcoder.set_decoder("name", |_| Err("nope".into()));
        transcoder.set_encoder("age", |_| Err("nope".into()));

        let map = ValueMap::from_iter([("name", Value::from("x"))]);
        let err = transcoder.decode(map).unwrap_err();
        assert!(matches!(&err, CodecError::Override { nickname, .. } if nickname == "name"));
        assert_eq!(err.path(), ["name"]);

        let keith = transcoder.make_empty_as::<Keith>().unwrap();
        let err = transcoder.encode(&keith).unwrap_err();
        assert!(matches!(&err, CodecError::Override { nickname, .. } if nickname == "age"));

        // A decoder returning the wrong type is reported against the field.
        transcoder.set_decoder("name", |_| Ok(Box::new(1u8)));
        let map = ValueMap::from_iter([("name", Value::from("x"))]);
        let err = transcoder.decode(map).unwrap_err();
        assert_eq!(err.path(), ["name"]);
        assert!(matches!(err.root_cause(), CodecError::MismatchedType { .. }));
    }

    #[derive(Native, Debug, Default, PartialEq)]
    struct Meta {
        #[codec(xyzzy = "created")]
        created: u64,
        #[codec(xyzzy = "-")]
        hidden: u64,
    }

    #[derive(Native, Debug, PartialEq)]
    struct Document {
        #[codec(xyzzy = "id")]
        id: u32,
        #[codec(flatten)]
        meta: Meta,
        #[codec(flatten)]
        extra: Option<Box<Meta>>,
    }

    #[test]
    fn flattened_fields() {
        let registry = Registry::new();
        let transcoder = Transcoder::of::<Document>(&registry, "xyzzy");
        // `extra.created` shadows `meta.created`.
        assert_eq!(transcoder.field_names(), ["id", "created"]);

        let doc = Document {
            id: 1,
            meta: Meta { created: 2, hidden: 3 },
            extra: None,
        };
        let map = transcoder.encode(&doc).unwrap();
        assert_eq!(map.get("created"), Some(&Value::U64(0)));

        let map = ValueMap::from_iter([("id", Value::U32(1)), ("created", Value::U64(9))]);
        let doc: Document = transcoder.decode_as(map).unwrap();
        assert_eq!(doc.meta, Meta::default());
        assert_eq!(doc.extra.as_deref(), Some(&Meta { created: 9, hidden: 0 }));
    }

    #[derive(Native, Debug, PartialEq)]
    struct Node {
        #[codec(list = "value")]
        value: u32,
        #[codec(list = "next")]
        next: Option<Box<Node>>,
    }

    #[test]
    fn self_referential_records() {
        let registry = Registry::new();
        let transcoder = Transcoder::of::<Node>(&registry, "list");

        let list = Node {
            value: 1,
            next: Some(Box::new(Node {
                value: 2,
                next: Some(Box::new(Node { value: 3, next: None })),
            })),
        };

        let map = transcoder.encode(&list).unwrap();
        let second = map.get("next").and_then(Value::as_map).unwrap();
        assert_eq!(second.get("value"), Some(&Value::U32(2)));
        let third = second.get("next").and_then(Value::as_map).unwrap();
        assert_eq!(third.get("next"), Some(&Value::Nil));

        assert_eq!(transcoder.decode_as::<Node>(map).unwrap(), list);
    }

    #[derive(Native, Debug, PartialEq)]
    struct Pair<T> {
        #[codec(wire = "first")]
        head: T,
        #[codec(wire = "rest")]
        tail: Vec<T>,
    }

    #[test]
    fn generic_records() {
        let registry = Registry::new();

        let numbers = Transcoder::of::<Pair<u16>>(&registry, "wire");
        let words = Transcoder::of::<Pair<String>>(&registry, "wire");
        assert!(!core::ptr::eq(numbers.descriptor(), words.descriptor()));
        assert_eq!(numbers.field_names(), ["first", "rest"]);

        let pair = Pair { head: 7u16, tail: vec![8, 9] };
        let map = numbers.encode(&pair).unwrap();
        assert_eq!(map.get("first"), Some(&Value::U16(7)));
        assert_eq!(numbers.decode_as::<Pair<u16>>(map).unwrap(), pair);

        let pair = Pair {
            head: String::from("a"),
            tail: vec![String::from("b")],
        };
        let map = words.encode(&pair).unwrap();
        assert_eq!(map.get("first"), Some(&Value::from("a")));
        assert_eq!(words.decode_as::<Pair<String>>(map).unwrap(), pair);
    }

    #[derive(Native, Debug, PartialEq)]
    struct Everything {
        array: [u8; 3],
        deque: std::collections::VecDeque<i16>,
        nested: BTreeMap<String, Vec<Option<u32>>>,
        lookup: crate::hash::HashMap<String, bool>,
        wide: i128,
        unsigned: u128,
        letter: char,
        ratio: f32,
        phase: num_complex::Complex64,
        text: std::borrow::Cow<'static, str>,
        shared: std::sync::Arc<String>,
        maybe: Option<Vec<String>>,
        alias: Age,
    }

    #[test]
    fn every_container_round_trips() {
        let registry = Registry::new();
        let transcoder = Transcoder::of::<Everything>(&registry, "plain");

        let mut lookup = crate::hash::HashMap::default();
        lookup.insert(String::from("on"), true);
        lookup.insert(String::from("off"), false);

        let everything = Everything {
            array: [1, 0, 3],
            deque: [-1i16, 2].into(),
            nested: BTreeMap::from([
                (String::from("a"), vec![Some(1), None, Some(0)]),
                (String::from("b"), Vec::new()),
            ]),
            lookup,
            wide: i128::MIN,
            unsigned: u128::MAX,
            letter: 'λ',
            ratio: 0.75,
            phase: num_complex::Complex64::new(-1.0, 0.5),
            text: "borrowed".into(),
            shared: std::sync::Arc::new(String::from("shared")),
            maybe: Some(Vec::new()),
            alias: Age(3),
        };

        let map = transcoder.encode(&everything).unwrap();
        assert_eq!(map.len(), 13);
        assert_eq!(map.get("maybe"), Some(&Value::Seq(Vec::new())));
        assert_eq!(map.get("letter"), Some(&Value::Char('λ')));

        let back: Everything = transcoder.decode_as(map).unwrap();
        assert_eq!(back, everything);
    }

    #[derive(Native, Debug, Default, PartialEq)]
    struct Gauge {
        #[codec(wire = "count")]
        count: u8,
        #[codec(wire = "level")]
        level: i32,
    }

    #[test]
    fn lossy_conversions_are_rejected() {
        let registry = Registry::new();
        let transcoder = Transcoder::of::<Gauge>(&registry, "wire");
        let mut gauge = Gauge::default();

        let err = transcoder.set(&mut gauge, "count", Value::U64(300)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "field `count` of `tc_codec::transcoder::tests::Gauge`: cannot convert u64 to `u8`"
        );
        assert_eq!(gauge.count, 0);

        let map = ValueMap::from_iter([("level", Value::F64(0.5))]);
        let err = transcoder.decode(map).unwrap_err();
        assert_eq!(err.path(), ["level"]);
        assert_eq!(err.root_cause().to_string(), "cannot convert f64 to `i32`");

        let map = ValueMap::from_iter([("count", Value::U64(255)), ("level", Value::F64(-4.0))]);
        assert_eq!(transcoder.decode_as::<Gauge>(map).unwrap(), Gauge { count: 255, level: -4 });
    }

    #[test]
    fn transcoders_share_descriptors() {
        let registry = Registry::new();
        let a = Transcoder::of::<Inner>(&registry, "weezy");
        let b = Transcoder::new(&registry, &inner(), "weezy");
        assert!(core::ptr::eq(a.descriptor(), b.descriptor()));
        assert_eq!(b.namespace(), "weezy");
    }
}
