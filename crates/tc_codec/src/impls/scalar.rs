use std::borrow::Cow;

use num_complex::{Complex, Complex32, Complex64};

use crate::convert::{CodecError, Context};
use crate::impls::{conversion_error, set_boxed};
use crate::info::{NativeKind, NonGenericTypeInfoCell, TypeInfo};
use crate::value::Value;
use crate::{Native, Typed};

// -----------------------------------------------------------------------------
// Conversions

/// An integral float as `i128`.
fn integral(float: f64) -> Option<i128> {
    let in_range = (i128::MIN as f64..i128::MAX as f64).contains(&float);
    (in_range && float.fract() == 0.0).then_some(float as i128)
}

/// Any number that `T` holds without loss.
fn to_int<T: TryFrom<i128> + TryFrom<u128>>(value: &Value) -> Option<T> {
    if let Some(int) = value.as_i128() {
        return T::try_from(int).ok();
    }
    match *value {
        Value::U128(int) => T::try_from(int).ok(),
        Value::F32(float) => integral(float.into()).and_then(|int| T::try_from(int).ok()),
        Value::F64(float) => integral(float).and_then(|int| T::try_from(int).ok()),
        _ => None,
    }
}

fn to_f32(value: &Value) -> Option<f32> {
    match *value {
        Value::F32(float) => Some(float),
        _ => {
            let wide = value.as_f64()?;
            let narrow = wide as f32;
            (f64::from(narrow) == wide || wide.is_nan()).then_some(narrow)
        }
    }
}

fn to_complex64(value: &Value) -> Option<Complex64> {
    match value {
        Value::Seq(parts) => match parts.as_slice() {
            [re, im] => Some(Complex64::new(re.as_f64()?, im.as_f64()?)),
            _ => None,
        },
        _ => value.as_complex64(),
    }
}

fn to_complex32(value: &Value) -> Option<Complex32> {
    match value {
        Value::Complex32(c) => Some(*c),
        _ => {
            let wide = to_complex64(value)?;
            let re = to_f32(&Value::F64(wide.re))?;
            let im = to_f32(&Value::F64(wide.im))?;
            Some(Complex::new(re, im))
        }
    }
}

fn to_char(value: &Value) -> Option<char> {
    match value {
        Value::Char(c) => Some(*c),
        Value::Str(s) => {
            let mut chars = s.chars();
            chars.next().filter(|_| chars.next().is_none())
        }
        _ => None,
    }
}

// -----------------------------------------------------------------------------
// Copy scalars

macro_rules! impl_scalar {
    ($ty:ty, $kind:ident, $zero:expr, |$value:ident| $decode:expr) => {
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::scalar::<Self>(NativeKind::$kind))
            }

            #[inline]
            fn zero() -> Self {
                $zero
            }
        }

        impl Native for $ty {
            #[inline]
            fn native_type_info(&self) -> &'static TypeInfo {
                <Self as Typed>::type_info()
            }

            #[inline]
            fn is_zero(&self) -> bool {
                *self == $zero
            }

            #[inline]
            fn to_value(&self, _cx: &Context<'_>) -> Result<Value, CodecError> {
                Ok(Value::from(*self))
            }

            fn apply_value(&mut self, value: Value, _cx: &Context<'_>) -> Result<(), CodecError> {
                let decoded: Option<$ty> = match &value {
                    Value::Nil => Some($zero),
                    Value::Any(payload) => payload.downcast_ref::<$ty>().copied(),
                    $value => $decode,
                };
                *self = decoded.ok_or_else(|| conversion_error(&value, Self::type_info()))?;
                Ok(())
            }

            #[inline]
            fn set(&mut self, value: Box<dyn Native>) -> Result<(), Box<dyn Native>> {
                set_boxed(self, value)
            }
        }
    };
}

macro_rules! impl_int {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl_scalar!($ty, $kind, 0, |value| to_int::<$ty>(value));
    )*};
}

impl_int! {
    i8 => I8, i16 => I16, i32 => I32, i64 => I64, i128 => I128, isize => Isize,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64, u128 => U128, usize => Usize,
}

impl_scalar!(f32, F32, 0.0, |value| to_f32(value));
impl_scalar!(f64, F64, 0.0, |value| value.as_f64());
impl_scalar!(bool, Bool, false, |value| value.as_bool());
impl_scalar!(char, Char, '\0', |value| to_char(value));
impl_scalar!(Complex32, Complex32, Complex::new(0.0, 0.0), |value| to_complex32(value));
impl_scalar!(Complex64, Complex64, Complex::new(0.0, 0.0), |value| to_complex64(value));

// -----------------------------------------------------------------------------
// Text

fn to_string(value: Value) -> Result<String, Value> {
    match value {
        Value::Str(s) => Ok(s),
        Value::Char(c) => Ok(c.into()),
        Value::Nil => Ok(String::new()),
        Value::Any(payload) => match payload.downcast_ref::<String>() {
            Some(s) => Ok(s.clone()),
            None => Err(Value::Any(payload)),
        },
        other => Err(other),
    }
}

impl Typed for String {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::scalar::<Self>(NativeKind::Str))
    }

    #[inline]
    fn zero() -> Self {
        String::new()
    }
}

impl Native for String {
    #[inline]
    fn native_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    #[inline]
    fn to_value(&self, _cx: &Context<'_>) -> Result<Value, CodecError> {
        Ok(Value::Str(self.clone()))
    }

    fn apply_value(&mut self, value: Value, _cx: &Context<'_>) -> Result<(), CodecError> {
        *self = to_string(value).map_err(|value| conversion_error(&value, Self::type_info()))?;
        Ok(())
    }

    #[inline]
    fn set(&mut self, value: Box<dyn Native>) -> Result<(), Box<dyn Native>> {
        set_boxed(self, value)
    }
}

impl Typed for Cow<'static, str> {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::scalar::<Self>(NativeKind::Str))
    }

    #[inline]
    fn zero() -> Self {
        Cow::Borrowed("")
    }
}

impl Native for Cow<'static, str> {
    #[inline]
    fn native_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    #[inline]
    fn to_value(&self, _cx: &Context<'_>) -> Result<Value, CodecError> {
        Ok(Value::Str(self.clone().into_owned()))
    }

    fn apply_value(&mut self, value: Value, _cx: &Context<'_>) -> Result<(), CodecError> {
        let text = to_string(value).map_err(|value| conversion_error(&value, Self::type_info()))?;
        *self = Cow::Owned(text);
        Ok(())
    }

    #[inline]
    fn set(&mut self, value: Box<dyn Native>) -> Result<(), Box<dyn Native>> {
        set_boxed(self, value)
    }
}

#[cfg(test)]
mod tests {
    use crate::{CodecError, Registry, Value, convert};

    fn decode<T: crate::Typed>(value: Value) -> Result<T, CodecError> {
        convert::from_value(value, "ns", &Registry::new())
    }

    #[test]
    fn encode_keeps_width() {
        let registry = Registry::new();
        let enc = |n: &dyn crate::Native| convert::to_value(n, "ns", &registry).unwrap();
        assert_eq!(enc(&7u32), Value::U32(7));
        assert_eq!(enc(&-7i8), Value::I8(-7));
        assert_eq!(enc(&7usize), Value::Usize(7));
        assert_eq!(enc(&1.5f32), Value::F32(1.5));
        assert_eq!(enc(&'x'), Value::Char('x'));
        assert_eq!(enc(&String::from("bryn")), Value::from("bryn"));
    }

    #[test]
    fn integers_convert_losslessly() {
        assert_eq!(decode::<u8>(Value::U64(200)).unwrap(), 200);
        assert_eq!(decode::<i64>(Value::U8(200)).unwrap(), 200);
        assert_eq!(decode::<u128>(Value::U128(u128::MAX)).unwrap(), u128::MAX);
        assert_eq!(decode::<i16>(Value::F64(-3.0)).unwrap(), -3);

        assert!(matches!(
            decode::<u8>(Value::I32(256)),
            Err(CodecError::Conversion { from: "i32", to: "u8" })
        ));
        assert!(decode::<u32>(Value::I8(-1)).is_err());
        assert!(decode::<i32>(Value::F64(0.5)).is_err());
        assert!(decode::<i32>(Value::from("1")).is_err());
    }

    #[test]
    fn floats_convert_exactly() {
        assert_eq!(decode::<f64>(Value::F32(0.5)).unwrap(), 0.5);
        assert_eq!(decode::<f64>(Value::U32(3)).unwrap(), 3.0);
        assert_eq!(decode::<f32>(Value::F64(0.25)).unwrap(), 0.25);
        assert!(decode::<f32>(Value::F64(0.1)).is_err());
        assert!(decode::<f64>(Value::U64(u64::MAX - 1)).is_err());
    }

    #[test]
    fn text_and_chars() {
        assert_eq!(decode::<char>(Value::from("x")).unwrap(), 'x');
        assert!(decode::<char>(Value::from("xy")).is_err());
        assert!(decode::<char>(Value::from("")).is_err());
        assert_eq!(decode::<String>(Value::Char('x')).unwrap(), "x");

        let cow = decode::<std::borrow::Cow<'static, str>>(Value::from("bryn")).unwrap();
        assert_eq!(cow, "bryn");
        assert!(decode::<String>(Value::U8(1)).is_err());
    }

    #[test]
    fn complex_numbers() {
        use num_complex::{Complex32, Complex64};

        use crate::Native;

        let registry = Registry::new();
        let narrow = Complex32::new(1.5, -0.25);
        let encoded = convert::to_value(&narrow, "ns", &registry).unwrap();
        assert_eq!(encoded, Value::Complex32(narrow));

        assert_eq!(decode::<Complex64>(encoded).unwrap(), Complex64::new(1.5, -0.25));
        assert_eq!(
            decode::<Complex32>(Value::Complex64(Complex64::new(0.5, 2.0))).unwrap(),
            Complex32::new(0.5, 2.0)
        );
        assert_eq!(decode::<Complex64>(Value::I32(3)).unwrap(), Complex64::new(3.0, 0.0));
        assert_eq!(
            decode::<Complex64>(Value::Seq(vec![Value::F64(1.0), Value::U8(2)])).unwrap(),
            Complex64::new(1.0, 2.0)
        );
        assert_eq!(decode::<Complex32>(Value::Nil).unwrap(), Complex32::new(0.0, 0.0));
        assert!(Complex64::new(0.0, 0.0).is_zero());
        assert!(!Complex64::new(0.0, 1.0).is_zero());

        assert!(matches!(
            decode::<Complex32>(Value::Complex64(Complex64::new(0.1, 0.0))),
            Err(CodecError::Conversion { from: "complex64", .. })
        ));
        assert!(decode::<Complex64>(Value::Seq(vec![Value::F64(1.0)])).is_err());
        assert!(decode::<f64>(Value::Complex64(Complex64::new(1.0, 0.0))).is_err());
    }

    #[test]
    fn nil_decodes_to_zero() {
        assert_eq!(decode::<u16>(Value::Nil).unwrap(), 0);
        assert!(!decode::<bool>(Value::Nil).unwrap());
        assert_eq!(decode::<String>(Value::Nil).unwrap(), "");
    }

    #[test]
    fn any_payload_of_the_same_type() {
        assert_eq!(decode::<u16>(Value::any(5u16)).unwrap(), 5);
        assert_eq!(decode::<String>(Value::any(String::from("a"))).unwrap(), "a");
        assert!(decode::<u16>(Value::any(5u32)).is_err());
    }
}
