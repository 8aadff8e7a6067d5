//! Type resolution against a native module's symbol table

use std::sync::Arc;

use ghex_sdk::{NativeClass, NativeModule};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::descriptor::TypeSpec;
use crate::error::{BindError, BindResult};

/// Resolves type descriptors to exported native classes.
///
/// Every call looks the rendered name up in the module unless caching is
/// enabled, in which case successful resolutions are memoized by rendered
/// name. Misses are never cached.
pub struct TypeResolver {
    module: Arc<NativeModule>,
    cache: Option<Mutex<FxHashMap<String, Arc<NativeClass>>>>,
}

impl TypeResolver {
    /// Create a resolver that re-resolves on every call
    pub fn new(module: Arc<NativeModule>) -> Self {
        Self {
            module,
            cache: None,
        }
    }

    /// Create a resolver that memoizes successful resolutions
    pub fn cached(module: Arc<NativeModule>) -> Self {
        Self {
            module,
            cache: Some(Mutex::new(FxHashMap::default())),
        }
    }

    /// Module this resolver reads from
    pub fn module(&self) -> &Arc<NativeModule> {
        &self.module
    }

    /// Check if resolutions are memoized
    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// Resolve a descriptor to its exported class
    pub fn resolve(&self, spec: &TypeSpec) -> BindResult<Arc<NativeClass>> {
        let name = spec.rendered_name();

        if let Some(cache) = &self.cache {
            if let Some(class) = cache.lock().get(&name) {
                tracing::trace!(type_name = %name, "resolved from cache");
                return Ok(Arc::clone(class));
            }
        }

        let class = self.module.get_class(&name).ok_or_else(|| {
            tracing::debug!(module = self.module.name(), type_name = %name, "type not exported");
            BindError::NameNotFound {
                module: self.module.name().to_string(),
                name: name.clone(),
            }
        })?;

        tracing::trace!(module = self.module.name(), type_name = %name, "resolved type");
        if let Some(cache) = &self.cache {
            cache.lock().insert(name, Arc::clone(&class));
        }
        Ok(class)
    }
}

impl std::fmt::Debug for TypeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeResolver")
            .field("module", &self.module.name())
            .field("cached", &self.is_cached())
            .finish()
    }
}
