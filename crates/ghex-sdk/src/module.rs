//! Native module symbol table

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::types::NativeClass;

/// Native module definition.
///
/// Maps exported type names to classes. Template specializations are
/// exported under their fully rendered names (for example
/// `halo_generator<int, std::integral_constant<int, 3> >`), exactly as the
/// native demangler prints them.
///
/// # Thread Safety
///
/// NativeModule is Send + Sync; after registration it is only read.
#[derive(Debug)]
pub struct NativeModule {
    name: String,
    version: String,
    classes: FxHashMap<String, Arc<NativeClass>>,
}

impl NativeModule {
    /// Create a new native module.
    ///
    /// # Arguments
    /// * `name` - Module name (e.g., "ghex")
    /// * `version` - Semantic version (e.g., "1.0.0")
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        NativeModule {
            name: name.into(),
            version: version.into(),
            classes: FxHashMap::default(),
        }
    }

    /// Register a class under its exported name.
    ///
    /// Returns the shared class, which native code keeps to adopt instances
    /// it creates. A class already exported under the same name is replaced.
    pub fn register_class(&mut self, class: NativeClass) -> Arc<NativeClass> {
        let class = Arc::new(class);
        self.classes
            .insert(class.name().to_string(), Arc::clone(&class));
        class
    }

    /// Get module name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get module version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Get class by exported name
    pub fn get_class(&self, name: &str) -> Option<Arc<NativeClass>> {
        self.classes.get(name).cloned()
    }

    /// Check if a class is exported under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Get all exported class names
    pub fn class_names(&self) -> Vec<&str> {
        self.classes.keys().map(|s| s.as_str()).collect()
    }

    /// Get number of exported classes
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
}
