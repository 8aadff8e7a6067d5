//! NativeValue: dynamic value representation at the binding boundary
//!
//! Plain data (null, bool, integers, floats, strings, lists) is held by value.
//! Native objects are held through a [`NativeHandle`], which shares the
//! instance rather than copying it, so two values holding the same object
//! compare equal only when they point at the same instance.

use crate::error::{AbiResult, NativeError};
use crate::types::NativeHandle;

/// Dynamic value passed to and returned from native modules.
#[derive(Clone, Default)]
pub enum NativeValue {
    /// Absence of a value (`void` results, optional arguments)
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integer, wide enough for every native integral type we export
    Int(i64),
    /// Floating point
    Float(f64),
    /// Owned string
    Str(String),
    /// Sequence (native arrays, `std::array`, tuples)
    List(Vec<NativeValue>),
    /// Native object instance
    Object(NativeHandle),
}

impl NativeValue {
    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, NativeValue::Null)
    }

    /// Check if this holds a native object
    pub fn is_object(&self) -> bool {
        matches!(self, NativeValue::Object(_))
    }

    /// Get as boolean if this is a bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            NativeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NativeValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a float or an integer
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NativeValue::Float(f) => Some(*f),
            NativeValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get as string slice if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NativeValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as list if this is a list
    pub fn as_list(&self) -> Option<&[NativeValue]> {
        match self {
            NativeValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get as object handle if this is an object
    pub fn as_object(&self) -> Option<&NativeHandle> {
        match self {
            NativeValue::Object(handle) => Some(handle),
            _ => None,
        }
    }

    /// Get type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            NativeValue::Null => "null",
            NativeValue::Bool(_) => "bool",
            NativeValue::Int(_) => "int",
            NativeValue::Float(_) => "float",
            NativeValue::Str(_) => "str",
            NativeValue::List(_) => "list",
            NativeValue::Object(_) => "object",
        }
    }

    /// Convert into a Rust value, failing on a type mismatch
    pub fn extract<T: FromNative>(&self) -> AbiResult<T> {
        T::from_native(self)
    }
}

impl PartialEq for NativeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NativeValue::Null, NativeValue::Null) => true,
            (NativeValue::Bool(a), NativeValue::Bool(b)) => a == b,
            (NativeValue::Int(a), NativeValue::Int(b)) => a == b,
            (NativeValue::Float(a), NativeValue::Float(b)) => a == b,
            (NativeValue::Str(a), NativeValue::Str(b)) => a == b,
            (NativeValue::List(a), NativeValue::List(b)) => a == b,
            (NativeValue::Object(a), NativeValue::Object(b)) => a.same_instance(b),
            _ => false,
        }
    }
}

impl std::fmt::Debug for NativeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NativeValue::Null => write!(f, "NativeValue::Null"),
            NativeValue::Bool(b) => write!(f, "NativeValue::Bool({})", b),
            NativeValue::Int(i) => write!(f, "NativeValue::Int({})", i),
            NativeValue::Float(x) => write!(f, "NativeValue::Float({})", x),
            NativeValue::Str(s) => write!(f, "NativeValue::Str({:?})", s),
            NativeValue::List(items) => f.debug_tuple("NativeValue::List").field(items).finish(),
            NativeValue::Object(handle) => write!(f, "NativeValue::Object({})", handle.type_name()),
        }
    }
}

// ============================================================================
// Conversions into NativeValue
// ============================================================================

macro_rules! from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for NativeValue {
                fn from(v: $ty) -> Self {
                    NativeValue::Int(v as i64)
                }
            }
        )*
    };
}

from_int!(i8, i16, i32, i64, u8, u16, u32);

impl TryFrom<usize> for NativeValue {
    type Error = NativeError;

    fn try_from(v: usize) -> AbiResult<Self> {
        i64::try_from(v)
            .map(NativeValue::Int)
            .map_err(|_| NativeError::ArgumentError(format!("{} does not fit in i64", v)))
    }
}

impl From<bool> for NativeValue {
    fn from(b: bool) -> Self {
        NativeValue::Bool(b)
    }
}

impl From<f64> for NativeValue {
    fn from(f: f64) -> Self {
        NativeValue::Float(f)
    }
}

impl From<f32> for NativeValue {
    fn from(f: f32) -> Self {
        NativeValue::Float(f as f64)
    }
}

impl From<&str> for NativeValue {
    fn from(s: &str) -> Self {
        NativeValue::Str(s.to_string())
    }
}

impl From<String> for NativeValue {
    fn from(s: String) -> Self {
        NativeValue::Str(s)
    }
}

impl From<()> for NativeValue {
    fn from(_: ()) -> Self {
        NativeValue::Null
    }
}

impl From<NativeHandle> for NativeValue {
    fn from(handle: NativeHandle) -> Self {
        NativeValue::Object(handle)
    }
}

impl<T: Into<NativeValue>> From<Vec<T>> for NativeValue {
    fn from(items: Vec<T>) -> Self {
        NativeValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<NativeValue>, const N: usize> From<[T; N]> for NativeValue {
    fn from(items: [T; N]) -> Self {
        NativeValue::List(items.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// Conversions out of NativeValue
// ============================================================================

/// Convert from NativeValue to a Rust type.
///
/// Native classes use this to read their constructor and method arguments.
pub trait FromNative: Sized {
    /// Convert from a NativeValue, returning an error if the type doesn't match.
    fn from_native(value: &NativeValue) -> AbiResult<Self>;
}

fn mismatch(expected: &str, value: &NativeValue) -> NativeError {
    NativeError::TypeMismatch {
        expected: expected.to_string(),
        got: value.type_name().to_string(),
    }
}

impl FromNative for NativeValue {
    fn from_native(value: &NativeValue) -> AbiResult<Self> {
        Ok(value.clone())
    }
}

impl FromNative for bool {
    fn from_native(value: &NativeValue) -> AbiResult<Self> {
        value.as_bool().ok_or_else(|| mismatch("bool", value))
    }
}

impl FromNative for i64 {
    fn from_native(value: &NativeValue) -> AbiResult<Self> {
        value.as_i64().ok_or_else(|| mismatch("int", value))
    }
}

impl FromNative for i32 {
    fn from_native(value: &NativeValue) -> AbiResult<Self> {
        let wide = i64::from_native(value)?;
        i32::try_from(wide)
            .map_err(|_| NativeError::ArgumentError(format!("{} does not fit in i32", wide)))
    }
}

impl FromNative for usize {
    fn from_native(value: &NativeValue) -> AbiResult<Self> {
        let wide = i64::from_native(value)?;
        usize::try_from(wide)
            .map_err(|_| NativeError::ArgumentError(format!("{} is not a valid size", wide)))
    }
}

impl FromNative for f64 {
    fn from_native(value: &NativeValue) -> AbiResult<Self> {
        value.as_f64().ok_or_else(|| mismatch("float", value))
    }
}

impl FromNative for f32 {
    fn from_native(value: &NativeValue) -> AbiResult<Self> {
        f64::from_native(value).map(|f| f as f32)
    }
}

impl FromNative for String {
    fn from_native(value: &NativeValue) -> AbiResult<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("str", value))
    }
}

impl FromNative for NativeHandle {
    fn from_native(value: &NativeValue) -> AbiResult<Self> {
        value.as_object().cloned().ok_or_else(|| mismatch("object", value))
    }
}

impl<T: FromNative> FromNative for Vec<T> {
    fn from_native(value: &NativeValue) -> AbiResult<Self> {
        value
            .as_list()
            .ok_or_else(|| mismatch("list", value))?
            .iter()
            .map(T::from_native)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null() {
        let v = NativeValue::Null;
        assert!(v.is_null());
        assert!(!v.is_object());
        assert_eq!(v, NativeValue::default());
    }

    #[test]
    fn test_primitive_accessors() {
        assert_eq!(NativeValue::from(true).as_bool(), Some(true));
        assert_eq!(NativeValue::from(42i32).as_i64(), Some(42));
        assert_eq!(NativeValue::from("rank").as_str(), Some("rank"));
        assert!((NativeValue::from(2.5f64).as_f64().unwrap() - 2.5).abs() < 1e-12);
        assert_eq!(NativeValue::from(7i64).as_f64(), Some(7.0));
        assert_eq!(NativeValue::from(7i64).as_bool(), None);
    }

    #[test]
    fn test_list_conversion() {
        let v = NativeValue::from([1, 2, 3]);
        assert_eq!(v.as_list().map(|l| l.len()), Some(3));
        assert_eq!(v.extract::<Vec<i32>>().unwrap(), vec![1, 2, 3]);

        let periodic = NativeValue::from(vec![true, false]);
        assert_eq!(periodic.extract::<Vec<bool>>().unwrap(), vec![true, false]);
    }

    #[test]
    fn test_extract_mismatch() {
        let err = NativeValue::from("x").extract::<i64>().unwrap_err();
        assert_eq!(
            err,
            NativeError::TypeMismatch {
                expected: "int".to_string(),
                got: "str".to_string(),
            }
        );
    }

    #[test]
    fn test_extract_narrowing() {
        assert!(NativeValue::from(i64::MAX).extract::<i32>().is_err());
        assert!(NativeValue::from(-1i64).extract::<usize>().is_err());
        assert_eq!(NativeValue::from(3i64).extract::<usize>().unwrap(), 3);
    }

    #[test]
    fn test_size_conversion() {
        assert_eq!(NativeValue::try_from(12usize).unwrap(), NativeValue::Int(12));
        assert!(matches!(
            NativeValue::try_from(usize::MAX),
            Err(NativeError::ArgumentError(_))
        ));
    }

    #[test]
    fn test_debug_format() {
        let s = format!("{:?}", NativeValue::from(42));
        assert!(s.contains("42"));
    }
}
