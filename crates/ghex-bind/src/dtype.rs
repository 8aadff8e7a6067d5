//! Numeric element types and their native names

use std::fmt;
use std::str::FromStr;

use crate::error::{BindError, BindResult};

/// Element type of a field buffer, named the way array libraries name it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dtype {
    /// 64-bit IEEE float
    Float64,
    /// 32-bit IEEE float
    Float32,
    /// Signed 8-bit integer
    Int8,
    /// Signed 16-bit integer
    Int16,
    /// Signed 32-bit integer
    Int32,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 8-bit integer
    UInt8,
    /// Unsigned 16-bit integer
    UInt16,
    /// Unsigned 32-bit integer
    UInt32,
    /// Unsigned 64-bit integer
    UInt64,
    /// Boolean
    Bool,
}

impl Dtype {
    /// Canonical name ("float64", "int32", ...)
    pub fn name(&self) -> &'static str {
        match self {
            Dtype::Float64 => "float64",
            Dtype::Float32 => "float32",
            Dtype::Int8 => "int8",
            Dtype::Int16 => "int16",
            Dtype::Int32 => "int32",
            Dtype::Int64 => "int64",
            Dtype::UInt8 => "uint8",
            Dtype::UInt16 => "uint16",
            Dtype::UInt32 => "uint32",
            Dtype::UInt64 => "uint64",
            Dtype::Bool => "bool",
        }
    }

    /// Size of one element in bytes
    pub fn itemsize(&self) -> usize {
        match self {
            Dtype::Int8 | Dtype::UInt8 | Dtype::Bool => 1,
            Dtype::Int16 | Dtype::UInt16 => 2,
            Dtype::Float32 | Dtype::Int32 | Dtype::UInt32 => 4,
            Dtype::Float64 | Dtype::Int64 | Dtype::UInt64 => 8,
        }
    }

    /// Dtype of a Rust scalar type
    pub fn of<T: Element>() -> Dtype {
        T::DTYPE
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dtype {
    type Err = BindError;

    /// Accepts canonical names, character codes ("f8") and byte-order
    /// prefixed codes ("<f8", "=i4").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim_start_matches(['<', '>', '=', '|']);
        let dtype = match code {
            "float64" | "f8" | "double" | "d" => Dtype::Float64,
            "float32" | "f4" | "single" | "f" => Dtype::Float32,
            "int8" | "i1" | "b" => Dtype::Int8,
            "int16" | "i2" | "h" => Dtype::Int16,
            "int32" | "i4" | "i" => Dtype::Int32,
            "int64" | "i8" | "q" => Dtype::Int64,
            "uint8" | "u1" | "B" => Dtype::UInt8,
            "uint16" | "u2" | "H" => Dtype::UInt16,
            "uint32" | "u4" | "I" => Dtype::UInt32,
            "uint64" | "u8" | "Q" => Dtype::UInt64,
            "bool" | "b1" | "?" => Dtype::Bool,
            _ => return Err(BindError::UnsupportedDtype(s.to_string())),
        };
        Ok(dtype)
    }
}

/// Rust scalar types with a known dtype
pub trait Element: Copy + 'static {
    /// Dtype of this scalar type
    const DTYPE: Dtype;
}

macro_rules! element {
    ($($ty:ty => $dtype:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const DTYPE: Dtype = Dtype::$dtype;
            }
        )*
    };
}

element! {
    f64 => Float64,
    f32 => Float32,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    bool => Bool,
}

/// Native type name used in template specializations for `dtype`.
///
/// Only the element types the native module instantiates its field
/// descriptors for are mapped.
pub fn dtype_to_cpp(dtype: Dtype) -> BindResult<&'static str> {
    match dtype {
        Dtype::Float64 => Ok("double"),
        Dtype::Float32 => Ok("float"),
        other => Err(BindError::UnsupportedDtype(other.name().to_string())),
    }
}
