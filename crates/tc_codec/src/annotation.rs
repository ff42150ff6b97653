//! Parsing of per-field annotation strings.
//!
//! An annotation is the string attached to a field for one namespace, e.g.
//! `#[codec(wire = "inner, @tag=storage, omit")]`:
//!
//! ```text
//! annotation := nickname ("," flag)*
//! flag       := token | token "=" value
//! nickname   := token | ""      ; "" => the declared field name
//! ```
//!
//! Parts are separated by commas and trimmed of spaces and tabs only. Empty
//! flags are kept, so `"name,,x"` carries the flags `""` and `"x"`.
//!
//! A nickname or flag equal to `-` excludes the field. Any string parses,
//! there is no escaping and flag values cannot contain commas.

/// The nickname (or flag) that excludes a field.
pub const EXCLUDE: &str = "-";

/// The characters trimmed around each part.
const TRIMMED: [char; 2] = [' ', '\t'];

/// The reserved keyed flag naming the namespace used when recursing into a field.
pub const TAG_FLAG: &str = "@tag";

/// A parsed field annotation.
///
/// # Examples
///
/// ```
/// use tc_codec::annotation::Annotation;
///
/// let ann = Annotation::parse("weezy", "someField, @weezy, @flagKey=someValue", "SomeField");
///
/// assert_eq!(ann.nickname(), "someField");
/// assert!(ann.is_flagged("@weezy"));
/// assert_eq!(ann.flag_value("@flagKey"), Some("someValue"));
/// assert!(!ann.is_excluded());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    namespace: Box<str>,
    nickname: Box<str>,
    flags: Box<[Box<str>]>,
}

impl Annotation {
    /// Parse `raw`, the annotation of `declared_name` for `namespace`.
    pub fn parse(namespace: &str, raw: &str, declared_name: &str) -> Self {
        let mut parts = raw.split(',').map(|part| part.trim_matches(TRIMMED));

        let nickname = match parts.next() {
            Some("") | None => declared_name,
            Some(nickname) => nickname,
        };

        let flags = parts.map(Box::from).collect();

        Self {
            namespace: namespace.into(),
            nickname: nickname.into(),
            flags,
        }
    }

    /// The namespace this annotation was read for.
    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The external key of the field.
    #[inline]
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// The flags following the nickname, in declaration order.
    pub fn flags(&self) -> impl ExactSizeIterator<Item = &str> {
        self.flags.iter().map(|flag| &**flag)
    }

    /// Whether the exact token `flag` appears after the nickname.
    pub fn is_flagged(&self, flag: &str) -> bool {
        self.flags().any(|part| part == flag)
    }

    /// The value of the first `key=value` flag with the given key.
    pub fn flag_value(&self, key: &str) -> Option<&str> {
        self.flags().find_map(|part| {
            part.strip_prefix(key)
                .and_then(|rest| rest.strip_prefix('='))
        })
    }

    /// Whether the field is marked as not encodable.
    #[inline]
    pub fn is_excluded(&self) -> bool {
        &*self.nickname == EXCLUDE || self.is_flagged(EXCLUDE)
    }

    /// The namespace requested through `@tag=...`, if any.
    #[inline]
    pub fn sub_namespace(&self) -> Option<&str> {
        self.flag_value(TAG_FLAG)
    }
}

#[cfg(test)]
mod tests {
    use super::Annotation;

    #[test]
    fn nickname_defaults_to_declared_name() {
        assert_eq!(Annotation::parse("ns", "", "Field").nickname(), "Field");
        assert_eq!(Annotation::parse("ns", " , flag", "Field").nickname(), "Field");
        assert!(Annotation::parse("ns", " , flag", "Field").is_flagged("flag"));
    }

    #[test]
    fn parts_are_trimmed() {
        let ann = Annotation::parse("ns", "\tname ,  @weezy\t, key=value ", "Field");
        assert_eq!(ann.nickname(), "name");
        assert_eq!(ann.flags().collect::<Vec<_>>(), ["@weezy", "key=value"]);
    }

    #[test]
    fn only_spaces_and_tabs_are_trimmed() {
        let ann = Annotation::parse("ns", "name\n, \u{a0}flag", "Field");
        assert_eq!(ann.nickname(), "name\n");
        assert!(ann.is_flagged("\u{a0}flag"));
        assert!(!ann.is_flagged("flag"));
    }

    #[test]
    fn empty_flags_are_kept() {
        let ann = Annotation::parse("ns", "name,, x ,", "Field");
        assert_eq!(ann.flags().collect::<Vec<_>>(), ["", "x", ""]);
        assert!(ann.is_flagged(""));
        assert!(!ann.is_excluded());
    }

    #[test]
    fn flag_lookup_is_exact() {
        let ann = Annotation::parse("ns", "name, @weezy, @weezyX=1", "Field");
        assert!(ann.is_flagged("@weezy"));
        assert!(!ann.is_flagged("@wee"));
        assert!(!ann.is_flagged("name"));
        assert_eq!(ann.flag_value("@weezy"), None);
        assert_eq!(ann.flag_value("@weezyX"), Some("1"));
    }

    #[test]
    fn first_keyed_flag_wins() {
        let ann = Annotation::parse("ns", "name, @tag=first, @tag=second", "Field");
        assert_eq!(ann.sub_namespace(), Some("first"));
    }

    #[test]
    fn keyed_flag_value_may_contain_equals() {
        let ann = Annotation::parse("ns", "name, expr=a=b", "Field");
        assert_eq!(ann.flag_value("expr"), Some("a=b"));
    }

    #[test]
    fn exclusion() {
        assert!(Annotation::parse("ns", "-", "Field").is_excluded());
        assert!(Annotation::parse("ns", " - ", "Field").is_excluded());
        assert!(Annotation::parse("ns", "name, -", "Field").is_excluded());
        assert!(!Annotation::parse("ns", "name, -x", "Field").is_excluded());
    }
}
