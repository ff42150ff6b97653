use thiserror::Error;

/// A boxed error returned by caller-supplied field overrides.
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

// -----------------------------------------------------------------------------
// CodecError

/// The error type of every encode and decode operation.
///
/// Errors raised inside a record field are wrapped in a [`CodecError::Field`]
/// frame per record level, [`path`](CodecError::path) lists the nicknames
/// from the outermost record inward.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    #[error("unknown field `{nickname}` in record `{record}`")]
    UnknownField {
        nickname: String,
        record: &'static str,
    },

    #[error("reference to record `{record}` is nil")]
    NilRecord { record: &'static str },

    #[error("cannot convert {from} to `{to}`")]
    Conversion {
        from: &'static str,
        to: &'static str,
    },

    #[error("map key of type `{key_type}` does not encode to text")]
    NonTextKey { key_type: &'static str },

    #[error("length mismatch: expected {expected} items, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    MismatchedType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("override of field `{nickname}` failed: {source}")]
    Override { nickname: String, source: BoxError },

    #[error("field `{nickname}` of `{record}`: {source}")]
    Field {
        nickname: String,
        record: &'static str,
        source: Box<CodecError>,
    },
}

impl CodecError {
    /// Wrap `self` in a context frame for field `nickname` of `record`.
    #[inline]
    pub fn in_field(self, nickname: &str, record: &'static str) -> Self {
        Self::Field {
            nickname: nickname.into(),
            record,
            source: Box::new(self),
        }
    }

    /// The nicknames leading to the field that failed, outermost first.
    ///
    /// ```
    /// use tc_codec::CodecError;
    ///
    /// let err = CodecError::Conversion { from: "str", to: "u8" }
    ///     .in_field("age", "Inner")
    ///     .in_field("inner", "Outer");
    ///
    /// assert_eq!(err.path(), ["inner", "age"]);
    /// assert!(matches!(err.root_cause(), CodecError::Conversion { .. }));
    /// ```
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut err = self;
        loop {
            match err {
                Self::Field {
                    nickname, source, ..
                } => {
                    path.push(nickname.as_str());
                    err = source;
                }
                Self::Override { nickname, .. } | Self::UnknownField { nickname, .. } => {
                    path.push(nickname.as_str());
                    return path;
                }
                _ => return path,
            }
        }
    }

    /// The innermost error, below every context frame.
    pub fn root_cause(&self) -> &CodecError {
        let mut err = self;
        while let Self::Field { source, .. } = err {
            err = source;
        }
        err
    }
}
