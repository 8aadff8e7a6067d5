//! Class schemas, native classes and instance handles
//!
//! A native module publishes one [`NativeClass`] per exported type. Each class
//! carries an [`ObjectSchema`] listing exactly which fields and methods its
//! instances expose, so callers decide "field or method?" from the manifest
//! instead of probing the instance.

use std::any::Any;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::args::CallArgs;
use crate::error::{AbiResult, NativeError};
use crate::value::NativeValue;

/// Static field every exported class answers with its native type name.
pub const CPP_TYPE_ATTR: &str = "__cpp_type__";

// ============================================================================
// ObjectSchema
// ============================================================================

/// Number of arguments a method overload accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Any number of arguments (variadic or keyword-driven methods)
    Any,
    /// Exactly this many arguments
    Exact(usize),
}

impl Arity {
    /// Check if a call with `count` arguments matches this arity
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Any => true,
            Arity::Exact(n) => *n == count,
        }
    }
}

impl From<usize> for Arity {
    fn from(n: usize) -> Self {
        Arity::Exact(n)
    }
}

/// Kind of an exported member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Readable value
    Field,
    /// Callable member
    Method,
}

/// Builder for constructing ObjectSchema instances.
pub struct ObjectSchemaBuilder {
    schema: ObjectSchema,
}

impl ObjectSchemaBuilder {
    /// Add a readable field
    pub fn field(mut self, name: &str) -> Self {
        self.schema.insert_field(name);
        self
    }

    /// Add a method overload. Calling this again with the same name and a
    /// different arity adds another overload.
    pub fn method(mut self, name: &str, arity: impl Into<Arity>) -> Self {
        self.schema.insert_method(name, arity.into());
        self
    }

    /// Build the ObjectSchema
    pub fn build(self) -> ObjectSchema {
        self.schema
    }
}

/// Field/method manifest of one exported class.
///
/// Lookups are `FxHashMap<String, _>` → O(1). Field and method names are
/// disjoint; a later declaration of the same name replaces the earlier one.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    class_name: String,
    field_lookup: FxHashMap<String, usize>,
    field_names: Vec<String>,
    method_lookup: FxHashMap<String, Vec<Arity>>,
    method_names: Vec<String>,
}

impl ObjectSchema {
    /// Create a builder for a class with the given exported name
    pub fn builder(class_name: &str) -> ObjectSchemaBuilder {
        ObjectSchemaBuilder {
            schema: ObjectSchema {
                class_name: class_name.to_string(),
                ..Default::default()
            },
        }
    }

    fn insert_field(&mut self, name: &str) {
        self.remove_method(name);
        if !self.field_lookup.contains_key(name) {
            self.field_lookup.insert(name.to_string(), self.field_names.len());
            self.field_names.push(name.to_string());
        }
    }

    fn insert_method(&mut self, name: &str, arity: Arity) {
        self.remove_field(name);
        let overloads = self.method_lookup.entry(name.to_string()).or_insert_with(|| {
            self.method_names.push(name.to_string());
            Vec::new()
        });
        if !overloads.contains(&arity) {
            overloads.push(arity);
        }
    }

    fn remove_field(&mut self, name: &str) {
        if self.field_lookup.remove(name).is_some() {
            self.field_names.retain(|n| n != name);
            for (index, n) in self.field_names.iter().enumerate() {
                self.field_lookup.insert(n.clone(), index);
            }
        }
    }

    fn remove_method(&mut self, name: &str) {
        if self.method_lookup.remove(name).is_some() {
            self.method_names.retain(|n| n != name);
        }
    }

    /// Classify a member name
    pub fn member_kind(&self, name: &str) -> Option<MemberKind> {
        if self.field_lookup.contains_key(name) {
            Some(MemberKind::Field)
        } else if self.method_lookup.contains_key(name) {
            Some(MemberKind::Method)
        } else {
            None
        }
    }

    /// Check if `name` is a field
    pub fn is_field(&self, name: &str) -> bool {
        self.field_lookup.contains_key(name)
    }

    /// Check if `name` is a method
    pub fn is_method(&self, name: &str) -> bool {
        self.method_lookup.contains_key(name)
    }

    /// Look up field index (declaration order) by name
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.field_lookup.get(name).copied()
    }

    /// Declared overloads of a method
    pub fn method_arities(&self, name: &str) -> Option<&[Arity]> {
        self.method_lookup.get(name).map(Vec::as_slice)
    }

    /// Check if some overload of `method` takes `count` arguments
    pub fn accepts(&self, method: &str, count: usize) -> bool {
        self.method_arities(method)
            .is_some_and(|arities| arities.iter().any(|a| a.accepts(count)))
    }

    /// Get number of fields
    pub fn field_count(&self) -> usize {
        self.field_names.len()
    }

    /// Get number of methods (overloads of one name count once)
    pub fn method_count(&self) -> usize {
        self.method_names.len()
    }

    /// Get class name
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Get field names in declaration order
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Get method names in declaration order
    pub fn method_names(&self) -> &[String] {
        &self.method_names
    }
}

// ============================================================================
// NativeInstance
// ============================================================================

/// An instance of an exported native type.
///
/// Instances are shared between handles and may be read from several
/// places at once, so any state they mutate lives behind their own
/// interior mutability. Member names reaching these methods have already
/// been checked against the class schema.
pub trait NativeInstance: Any + Send + Sync {
    /// Read a field declared in the class schema
    fn get_field(&self, name: &str) -> AbiResult<NativeValue>;

    /// Invoke a method declared in the class schema
    fn call_method(&self, name: &str, args: &CallArgs) -> AbiResult<NativeValue>;
}

/// Constructor of a native class
pub type Constructor =
    Arc<dyn Fn(&CallArgs) -> AbiResult<Arc<dyn NativeInstance>> + Send + Sync>;

// ============================================================================
// NativeClass
// ============================================================================

/// An exported native type: its name, schema and (optional) constructor.
pub struct NativeClass {
    name: String,
    schema: ObjectSchema,
    constructor: Option<Constructor>,
}

impl NativeClass {
    /// Create a class with no constructor.
    ///
    /// Such classes are only ever produced by the native side (for
    /// example sub-objects returned from methods) and reached via
    /// [`NativeClass::adopt`].
    pub fn new(schema: ObjectSchema) -> Self {
        Self {
            name: schema.class_name().to_string(),
            schema,
            constructor: None,
        }
    }

    /// Attach a constructor
    pub fn with_constructor<F, I>(mut self, ctor: F) -> Self
    where
        F: Fn(&CallArgs) -> AbiResult<I> + Send + Sync + 'static,
        I: NativeInstance,
    {
        let constructor: Constructor =
            Arc::new(move |args: &CallArgs| -> AbiResult<Arc<dyn NativeInstance>> {
                Ok(Arc::new(ctor(args)?))
            });
        self.constructor = Some(constructor);
        self
    }

    /// Exported (fully rendered) native type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field/method manifest
    pub fn schema(&self) -> &ObjectSchema {
        &self.schema
    }

    /// Check if callers may construct this class
    pub fn is_constructible(&self) -> bool {
        self.constructor.is_some()
    }

    /// Construct a new instance from already-unwrapped arguments
    pub fn instantiate(self: &Arc<Self>, args: &CallArgs) -> AbiResult<NativeHandle> {
        let ctor = self
            .constructor
            .as_ref()
            .ok_or_else(|| NativeError::NoConstructor(self.name.clone()))?;
        Ok(NativeHandle {
            class: Arc::clone(self),
            instance: ctor(args)?,
        })
    }

    /// Wrap an instance created by native code
    pub fn adopt(self: &Arc<Self>, instance: impl NativeInstance) -> NativeHandle {
        NativeHandle {
            class: Arc::clone(self),
            instance: Arc::new(instance),
        }
    }
}

impl std::fmt::Debug for NativeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeClass")
            .field("name", &self.name)
            .field("fields", &self.schema.field_names())
            .field("methods", &self.schema.method_names())
            .field("constructible", &self.is_constructible())
            .finish()
    }
}

// ============================================================================
// NativeHandle
// ============================================================================

/// Reference to one native instance together with its class.
///
/// Cloning a handle shares the instance; it never copies it.
#[derive(Clone)]
pub struct NativeHandle {
    class: Arc<NativeClass>,
    instance: Arc<dyn NativeInstance>,
}

impl NativeHandle {
    /// Class of the instance
    pub fn class(&self) -> &Arc<NativeClass> {
        &self.class
    }

    /// Native type name of the instance
    pub fn type_name(&self) -> &str {
        self.class.name()
    }

    /// Classify a member name against the class schema
    pub fn member_kind(&self, name: &str) -> Option<MemberKind> {
        if name == CPP_TYPE_ATTR {
            return Some(MemberKind::Field);
        }
        self.class.schema().member_kind(name)
    }

    /// Read a field
    pub fn get_field(&self, name: &str) -> AbiResult<NativeValue> {
        if name == CPP_TYPE_ATTR {
            return Ok(NativeValue::Str(self.class.name().to_string()));
        }
        if !self.class.schema().is_field(name) {
            return Err(self.no_such_member(name));
        }
        self.instance.get_field(name)
    }

    /// Invoke a method, selecting the overload by argument count
    pub fn call_method(&self, name: &str, args: &CallArgs) -> AbiResult<NativeValue> {
        let schema = self.class.schema();
        if !schema.is_method(name) {
            return Err(self.no_such_member(name));
        }
        if !schema.accepts(name, args.len()) {
            return Err(NativeError::NoMatchingOverload {
                class: self.class.name().to_string(),
                method: name.to_string(),
                arity: args.len(),
            });
        }
        self.instance.call_method(name, args)
    }

    /// Check if both handles refer to the same instance
    pub fn same_instance(&self, other: &NativeHandle) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.instance), Arc::as_ptr(&other.instance))
    }

    /// Typed access to the instance, for native code receiving objects as
    /// arguments
    pub fn downcast_ref<T: NativeInstance>(&self) -> Option<&T> {
        let any: &dyn Any = &*self.instance;
        any.downcast_ref::<T>()
    }

    /// Typed access that fails with a type mismatch
    pub fn expect_instance<T: NativeInstance>(&self, expected: &str) -> AbiResult<&T> {
        self.downcast_ref::<T>().ok_or_else(|| NativeError::TypeMismatch {
            expected: expected.to_string(),
            got: self.type_name().to_string(),
        })
    }

    fn no_such_member(&self, name: &str) -> NativeError {
        NativeError::NoSuchMember {
            class: self.class.name().to_string(),
            member: name.to_string(),
        }
    }
}

impl std::fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "NativeHandle({} @ {:p})",
            self.class.name(),
            Arc::as_ptr(&self.instance) as *const ()
        )
    }
}
