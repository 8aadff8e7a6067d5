//! Error types for type resolution and forwarding

use ghex_sdk::NativeError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::manifest::ManifestError;

/// Result type for binding operations
pub type BindResult<T> = Result<T, BindError>;

/// Errors surfaced by the binding layer.
///
/// Native failures are never translated: the original [`NativeError`] is
/// kept as the source of the variant that classifies it.
#[derive(Debug, Error)]
pub enum BindError {
    /// Descriptor does not name any exported type
    #[error("Native module '{module}' exports no type named '{name}'")]
    NameNotFound {
        /// Module that was searched
        module: String,
        /// Rendered type name
        name: String,
    },

    /// The resolved type's constructor rejected the arguments
    #[error("Failed to construct '{type_name}'")]
    Construction {
        /// Native type being constructed
        type_name: String,
        /// Failure reported by the constructor
        #[source]
        source: NativeError,
    },

    /// The owned instance has no such member
    #[error("'{type_name}' has no attribute '{attr}'{}", reason_suffix(.reason))]
    AttributeNotFound {
        /// Native type of the owned instance
        type_name: String,
        /// Requested member
        attr: String,
        /// Extra detail, e.g. when a field was called like a method
        reason: Option<&'static str>,
    },

    /// A forwarded call or field read failed on the native side
    #[error("Call to '{type_name}.{member}' failed")]
    ForwardedCall {
        /// Native type of the owned instance
        type_name: String,
        /// Member that was invoked
        member: String,
        /// Failure reported by native code
        #[source]
        source: NativeError,
    },

    /// Numeric type has no native counterpart
    #[error("Unsupported dtype: {0}")]
    UnsupportedDtype(String),

    /// Binding manifest could not be loaded or does not match the module
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn reason_suffix(reason: &Option<&'static str>) -> String {
    reason.map(|r| format!(" ({})", r)).unwrap_or_default()
}

impl BindError {
    pub(crate) fn attribute_not_found(type_name: &str, attr: &str) -> Self {
        BindError::AttributeNotFound {
            type_name: type_name.to_string(),
            attr: attr.to_string(),
            reason: None,
        }
    }
}
