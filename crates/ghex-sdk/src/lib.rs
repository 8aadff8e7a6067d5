//! GHEX SDK - native-side types for modules exported to the binding layer
//!
//! A native module publishes its types as [`NativeClass`]es in a
//! [`NativeModule`] symbol table. Each class carries an [`ObjectSchema`]
//! describing the fields and methods its instances expose; instances
//! implement [`NativeInstance`] and travel as [`NativeHandle`]s inside
//! [`NativeValue`]s.
//!
//! # Example
//!
//! ```ignore
//! use ghex_sdk::{CallArgs, NativeClass, NativeModule, ObjectSchema};
//!
//! let schema = ObjectSchema::builder("context")
//!     .method("rank", 0)
//!     .method("size", 0)
//!     .build();
//!
//! let mut module = NativeModule::new("ghex", "1.0.0");
//! module.register_class(NativeClass::new(schema).with_constructor(|args: &CallArgs| {
//!     Context::new(args.get(0, "rank")?, args.get(1, "size")?)
//! }));
//! ```

#![warn(missing_docs)]

pub mod args;
pub mod error;
pub mod module;
pub mod types;
pub mod value;

pub use args::CallArgs;
pub use error::{AbiResult, NativeError};
pub use module::NativeModule;
pub use types::{
    Arity, Constructor, MemberKind, NativeClass, NativeHandle, NativeInstance, ObjectSchema,
    ObjectSchemaBuilder, CPP_TYPE_ATTR,
};
pub use value::{FromNative, NativeValue};
