//! GHEX binding layer
//!
//! Resolves symbolic type descriptors to classes exported by a native
//! module and hands out [`CppWrapper`]s that own one instance each. Wrappers
//! passed as arguments are replaced by the instance they own; member access
//! and method calls are forwarded to the instance.
//!
//! # Example
//!
//! ```ignore
//! use ghex_bind::{Args, Binding, TypeSpec};
//!
//! let binding = Binding::new(ghex_module());
//! let context = binding.construct("context", Args::new().arg(0).arg(4))?;
//! let generator = binding.construct(
//!     TypeSpec::name("halo_generator").with_arg("int").with_arg(3),
//!     Args::new().arg([0, 0, 0]).arg([9, 9, 9]).arg([1; 6]).arg([true; 3]),
//! )?;
//! let rank = context.call("rank", Args::new())?;
//! ```

#![warn(missing_docs)]

pub mod binding;
pub mod config;
pub mod descriptor;
pub mod dtype;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod resolver;
pub mod wrapper;

pub use binding::Binding;
pub use config::{BindConfig, ConfigError, LoggingConfig, ResolverConfig};
pub use descriptor::{TemplateArg, TypeSpec};
pub use dtype::{dtype_to_cpp, Dtype, Element};
pub use error::{BindError, BindResult};
pub use logging::init_tracing;
pub use manifest::{BindingManifest, ManifestError};
pub use resolver::TypeResolver;
pub use wrapper::{unwrap, unwrap_args, Arg, Args, BoundMethod, CppWrapper, Member, WRAPPED_ATTR};

pub use ghex_sdk;
