//! Call arguments handed to native constructors and methods

use crate::error::{AbiResult, NativeError};
use crate::value::{FromNative, NativeValue};

/// Positional and named arguments of a single native call.
///
/// Both lists keep insertion order. By the time a native class sees a
/// `CallArgs`, every wrapper has already been replaced by the instance it
/// owns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    positional: Vec<NativeValue>,
    named: Vec<(String, NativeValue)>,
}

impl CallArgs {
    /// Create an empty argument list
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from positional values only
    pub fn positional_only(values: Vec<NativeValue>) -> Self {
        Self {
            positional: values,
            named: Vec::new(),
        }
    }

    /// Append a positional argument
    pub fn push(&mut self, value: impl Into<NativeValue>) {
        self.positional.push(value.into());
    }

    /// Append a named argument
    pub fn push_named(&mut self, name: impl Into<String>, value: impl Into<NativeValue>) {
        self.named.push((name.into(), value.into()));
    }

    /// Builder form of [`CallArgs::push`]
    pub fn with(mut self, value: impl Into<NativeValue>) -> Self {
        self.push(value);
        self
    }

    /// Builder form of [`CallArgs::push_named`]
    pub fn with_named(mut self, name: impl Into<String>, value: impl Into<NativeValue>) -> Self {
        self.push_named(name, value);
        self
    }

    /// Positional arguments in call order
    pub fn positional(&self) -> &[NativeValue] {
        &self.positional
    }

    /// Named arguments in call order
    pub fn named(&self) -> &[(String, NativeValue)] {
        &self.named
    }

    /// Look up a named argument
    pub fn named_value(&self, name: &str) -> Option<&NativeValue> {
        self.named.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Total number of arguments, positional and named
    pub fn len(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    /// Check if no arguments were supplied
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// Get the argument at `index`, or the one named `name` when fewer
    /// positional arguments were passed.
    pub fn value(&self, index: usize, name: &str) -> AbiResult<&NativeValue> {
        self.positional
            .get(index)
            .or_else(|| self.named_value(name))
            .ok_or_else(|| NativeError::MissingArgument(name.to_string()))
    }

    /// Typed form of [`CallArgs::value`]
    pub fn get<T: FromNative>(&self, index: usize, name: &str) -> AbiResult<T> {
        T::from_native(self.value(index, name)?)
    }
}
