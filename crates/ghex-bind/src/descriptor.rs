//! Type descriptors and their rendered native names
//!
//! A descriptor is either a bare exported name or a generic base name plus
//! ordered template arguments. Integer arguments stand for compile-time
//! integral constants and render as `std::integral_constant<int, N> `.

use std::fmt;
use std::num::TryFromIntError;

use serde::Deserialize;

use crate::dtype::{dtype_to_cpp, Dtype};
use crate::error::BindResult;

/// One template argument of a specialized type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TemplateArg {
    /// Type name, used verbatim
    Type(String),
    /// Integral constant
    Int(i64),
}

impl TemplateArg {
    /// Native type argument for the element type `dtype`
    pub fn dtype(dtype: Dtype) -> BindResult<Self> {
        Ok(TemplateArg::Type(dtype_to_cpp(dtype)?.to_string()))
    }

    /// Rendered form used inside the angle brackets.
    ///
    /// The trailing space after an integral constant is how the native
    /// demangler prints a nested closing bracket (`> >`), and exported names
    /// are looked up verbatim.
    pub fn render(&self) -> String {
        match self {
            TemplateArg::Type(name) => name.clone(),
            TemplateArg::Int(value) => format!("std::integral_constant<int, {}> ", value),
        }
    }
}

impl From<&str> for TemplateArg {
    fn from(name: &str) -> Self {
        TemplateArg::Type(name.to_string())
    }
}

impl From<String> for TemplateArg {
    fn from(name: String) -> Self {
        TemplateArg::Type(name)
    }
}

impl From<i64> for TemplateArg {
    fn from(value: i64) -> Self {
        TemplateArg::Int(value)
    }
}

impl From<i32> for TemplateArg {
    fn from(value: i32) -> Self {
        TemplateArg::Int(value as i64)
    }
}

impl TryFrom<usize> for TemplateArg {
    type Error = TryFromIntError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        i64::try_from(value).map(TemplateArg::Int)
    }
}

/// Descriptor of an exported native type.
///
/// Deserializes from a string (`"context"`) or from an array whose first
/// element is the base name and whose remaining elements are template
/// arguments (`["halo_generator", "int", 3]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawTypeSpec")]
pub enum TypeSpec {
    /// Bare exported name
    Name(String),
    /// Generic base name with ordered template arguments
    Specialized {
        /// Generic base name
        base: String,
        /// Template arguments, order significant
        args: Vec<TemplateArg>,
    },
}

impl TypeSpec {
    /// Bare name descriptor
    pub fn name(name: impl Into<String>) -> Self {
        TypeSpec::Name(name.into())
    }

    /// Specialized descriptor
    pub fn specialized<I, A>(base: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<TemplateArg>,
    {
        TypeSpec::Specialized {
            base: base.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Append one template argument, turning a bare name into a
    /// specialization
    pub fn with_arg(self, arg: impl Into<TemplateArg>) -> Self {
        match self {
            TypeSpec::Name(base) => TypeSpec::Specialized {
                base,
                args: vec![arg.into()],
            },
            TypeSpec::Specialized { base, mut args } => {
                args.push(arg.into());
                TypeSpec::Specialized { base, args }
            }
        }
    }

    /// Base name without template arguments
    pub fn base(&self) -> &str {
        match self {
            TypeSpec::Name(name) => name,
            TypeSpec::Specialized { base, .. } => base,
        }
    }

    /// Name under which the native module exports this type
    pub fn rendered_name(&self) -> String {
        match self {
            TypeSpec::Name(name) => name.clone(),
            TypeSpec::Specialized { base, args } => {
                let rendered: Vec<String> = args.iter().map(TemplateArg::render).collect();
                format!("{}<{}>", base, rendered.join(", "))
            }
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered_name())
    }
}

impl From<&str> for TypeSpec {
    fn from(name: &str) -> Self {
        TypeSpec::Name(name.to_string())
    }
}

impl From<String> for TypeSpec {
    fn from(name: String) -> Self {
        TypeSpec::Name(name)
    }
}

impl From<&TypeSpec> for TypeSpec {
    fn from(spec: &TypeSpec) -> Self {
        spec.clone()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTypeSpec {
    Name(String),
    Tuple(Vec<RawTemplateArg>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTemplateArg {
    Int(i64),
    Type(String),
}

impl TryFrom<RawTypeSpec> for TypeSpec {
    type Error = String;

    fn try_from(raw: RawTypeSpec) -> Result<Self, Self::Error> {
        match raw {
            RawTypeSpec::Name(name) => Ok(TypeSpec::Name(name)),
            RawTypeSpec::Tuple(items) => {
                let mut items = items.into_iter();
                let base = match items.next() {
                    Some(RawTemplateArg::Type(base)) => base,
                    Some(RawTemplateArg::Int(value)) => {
                        return Err(format!("type base name must be a string, got {}", value))
                    }
                    None => return Err("type descriptor array is empty".to_string()),
                };
                let args = items
                    .map(|arg| match arg {
                        RawTemplateArg::Int(value) => TemplateArg::Int(value),
                        RawTemplateArg::Type(name) => TemplateArg::Type(name),
                    })
                    .collect();
                Ok(TypeSpec::Specialized { base, args })
            }
        }
    }
}
