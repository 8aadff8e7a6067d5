//! Forwarding wrapper around one native instance
//!
//! [`CppWrapper`] owns a single native instance. Arguments passed to its
//! constructor or to forwarded calls are unwrapped one level: a wrapper is
//! replaced by the instance it owns, anything else passes through. Values
//! coming back from native code are returned as-is and never re-wrapped;
//! callers that want a wrapper around a returned handle use
//! [`CppWrapper::from_handle`].

use ghex_sdk::{CallArgs, MemberKind, NativeHandle, NativeValue};

use crate::descriptor::TypeSpec;
use crate::error::{BindError, BindResult};
use crate::resolver::TypeResolver;

/// Reserved attribute naming the owned instance itself. Never forwarded.
pub const WRAPPED_ATTR: &str = "__wrapped__";

// ============================================================================
// Arguments
// ============================================================================

/// A call argument that may be a wrapper
#[derive(Debug, Clone)]
pub enum Arg {
    /// Plain native value, passed through unchanged
    Native(NativeValue),
    /// Instance owned by a wrapper, substituted for the wrapper
    Wrapped(NativeHandle),
}

/// Replace a wrapper by its owned instance; pass anything else through.
pub fn unwrap(arg: Arg) -> NativeValue {
    match arg {
        Arg::Native(value) => value,
        Arg::Wrapped(handle) => NativeValue::Object(handle),
    }
}

impl From<&CppWrapper> for Arg {
    fn from(wrapper: &CppWrapper) -> Self {
        Arg::Wrapped(wrapper.wrapped.clone())
    }
}

impl From<NativeValue> for Arg {
    fn from(value: NativeValue) -> Self {
        Arg::Native(value)
    }
}

impl From<NativeHandle> for Arg {
    fn from(handle: NativeHandle) -> Self {
        Arg::Native(NativeValue::Object(handle))
    }
}

macro_rules! native_arg {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(v: $ty) -> Self {
                    Arg::Native(NativeValue::from(v))
                }
            }
        )*
    };
}

native_arg!(bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, &str, String);

impl<T: Into<NativeValue>> From<Vec<T>> for Arg {
    fn from(items: Vec<T>) -> Self {
        Arg::Native(NativeValue::from(items))
    }
}

impl<T: Into<NativeValue>, const N: usize> From<[T; N]> for Arg {
    fn from(items: [T; N]) -> Self {
        Arg::Native(NativeValue::from(items))
    }
}

/// Positional and named arguments before unwrapping
#[derive(Debug, Clone, Default)]
pub struct Args {
    positional: Vec<Arg>,
    named: Vec<(String, Arg)>,
}

impl Args {
    /// Create an empty argument list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.positional.push(arg.into());
        self
    }

    /// Append a named argument
    pub fn kwarg(mut self, name: impl Into<String>, arg: impl Into<Arg>) -> Self {
        self.named.push((name.into(), arg.into()));
        self
    }

    /// Total number of arguments, positional and named
    pub fn len(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    /// Check if no arguments were supplied
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

impl<A: Into<Arg>> FromIterator<A> for Args {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Args {
            positional: iter.into_iter().map(Into::into).collect(),
            named: Vec::new(),
        }
    }
}

/// Unwrap every argument, keeping positional order and argument names.
pub fn unwrap_args(args: Args) -> CallArgs {
    let mut call_args = CallArgs::new();
    for arg in args.positional {
        call_args.push(unwrap(arg));
    }
    for (name, arg) in args.named {
        call_args.push_named(name, unwrap(arg));
    }
    call_args
}

// ============================================================================
// CppWrapper
// ============================================================================

/// Wrapper owning exactly one native instance.
///
/// The instance binding is fixed at construction. All member access goes to
/// the instance, except [`WRAPPED_ATTR`], which names the instance itself.
#[derive(Debug)]
pub struct CppWrapper {
    wrapped: NativeHandle,
}

impl CppWrapper {
    /// Resolve `spec` and construct it with unwrapped `args`
    pub fn new(resolver: &TypeResolver, spec: impl Into<TypeSpec>, args: Args) -> BindResult<Self> {
        let spec = spec.into();
        let class = resolver.resolve(&spec)?;
        let call_args = unwrap_args(args);

        tracing::debug!(type_name = class.name(), args = call_args.len(), "constructing");
        let wrapped = class
            .instantiate(&call_args)
            .map_err(|source| BindError::Construction {
                type_name: class.name().to_string(),
                source,
            })?;
        Ok(Self { wrapped })
    }

    /// Wrap a handle obtained from native code
    pub fn from_handle(handle: NativeHandle) -> Self {
        Self { wrapped: handle }
    }

    /// The owned instance
    pub fn wrapped(&self) -> &NativeHandle {
        &self.wrapped
    }

    /// Give up the wrapper, keeping the instance
    pub fn into_wrapped(self) -> NativeHandle {
        self.wrapped
    }

    /// Native type name of the owned instance
    pub fn cpp_type(&self) -> &str {
        self.wrapped.type_name()
    }

    /// Look up a member of the owned instance.
    ///
    /// Fields are read immediately and returned unmodified; methods come
    /// back bound, so invoking them later unwraps their arguments.
    pub fn get(&self, name: &str) -> BindResult<Member<'_>> {
        if name == WRAPPED_ATTR {
            return Ok(Member::Field(NativeValue::Object(self.wrapped.clone())));
        }
        match self.wrapped.member_kind(name) {
            Some(MemberKind::Method) => Ok(Member::Method(BoundMethod {
                wrapper: self,
                name: name.to_string(),
            })),
            Some(MemberKind::Field) => self
                .wrapped
                .get_field(name)
                .map(Member::Field)
                .map_err(|source| self.forwarded(name, source)),
            None => Err(BindError::attribute_not_found(self.cpp_type(), name)),
        }
    }

    /// Read a field, failing if `name` is a method
    pub fn field(&self, name: &str) -> BindResult<NativeValue> {
        match self.get(name)? {
            Member::Field(value) => Ok(value),
            Member::Method(_) => Err(BindError::AttributeNotFound {
                type_name: self.cpp_type().to_string(),
                attr: name.to_string(),
                reason: Some("is a method, not a field"),
            }),
        }
    }

    /// Invoke method `name` on the owned instance with unwrapped `args`.
    ///
    /// The result is returned exactly as the native side produced it.
    pub fn call(&self, name: &str, args: Args) -> BindResult<NativeValue> {
        if name == WRAPPED_ATTR {
            return Err(BindError::AttributeNotFound {
                type_name: self.cpp_type().to_string(),
                attr: name.to_string(),
                reason: Some("reserved, not callable"),
            });
        }
        match self.wrapped.member_kind(name) {
            Some(MemberKind::Method) => {}
            Some(MemberKind::Field) => {
                return Err(BindError::AttributeNotFound {
                    type_name: self.cpp_type().to_string(),
                    attr: name.to_string(),
                    reason: Some("not callable"),
                })
            }
            None => return Err(BindError::attribute_not_found(self.cpp_type(), name)),
        }

        let call_args = unwrap_args(args);
        tracing::debug!(
            type_name = self.cpp_type(),
            method = name,
            args = call_args.len(),
            "forwarding call"
        );
        self.wrapped
            .call_method(name, &call_args)
            .map_err(|source| self.forwarded(name, source))
    }

    fn forwarded(&self, member: &str, source: ghex_sdk::NativeError) -> BindError {
        BindError::ForwardedCall {
            type_name: self.cpp_type().to_string(),
            member: member.to_string(),
            source,
        }
    }
}

/// Member of a wrapped instance
#[derive(Debug)]
pub enum Member<'a> {
    /// Field value, returned unmodified
    Field(NativeValue),
    /// Callable member bound to its wrapper
    Method(BoundMethod<'a>),
}

impl<'a> Member<'a> {
    /// Check if this member is callable
    pub fn is_callable(&self) -> bool {
        matches!(self, Member::Method(_))
    }

    /// Field value, if this is a field
    pub fn into_value(self) -> Option<NativeValue> {
        match self {
            Member::Field(value) => Some(value),
            Member::Method(_) => None,
        }
    }

    /// Bound method, if this is a method
    pub fn into_method(self) -> Option<BoundMethod<'a>> {
        match self {
            Member::Field(_) => None,
            Member::Method(method) => Some(method),
        }
    }
}

/// Method looked up through a wrapper; dispatches by name on each call.
#[derive(Debug)]
pub struct BoundMethod<'a> {
    wrapper: &'a CppWrapper,
    name: String,
}

impl BoundMethod<'_> {
    /// Method name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke through [`CppWrapper::call`]
    pub fn call(&self, args: Args) -> BindResult<NativeValue> {
        self.wrapper.call(&self.name, args)
    }
}
