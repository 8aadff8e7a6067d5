//! Binding entry point

use std::sync::Arc;

use ghex_sdk::{NativeClass, NativeModule};

use crate::config::BindConfig;
use crate::descriptor::TypeSpec;
use crate::error::BindResult;
use crate::manifest::BindingManifest;
use crate::resolver::TypeResolver;
use crate::wrapper::{Args, CppWrapper};

/// A native module made available to callers through wrappers.
#[derive(Debug)]
pub struct Binding {
    resolver: TypeResolver,
    manifest: Option<BindingManifest>,
}

impl Binding {
    /// Bind a module with default settings (no caching, no manifest)
    pub fn new(module: Arc<NativeModule>) -> Self {
        Self {
            resolver: TypeResolver::new(module),
            manifest: None,
        }
    }

    /// Bind a module as configured, loading and checking the manifest if
    /// one is named
    pub fn from_config(module: Arc<NativeModule>, config: &BindConfig) -> BindResult<Self> {
        let resolver = if config.resolver.cache {
            TypeResolver::cached(module)
        } else {
            TypeResolver::new(module)
        };

        let manifest = match &config.manifest {
            Some(path) => Some(BindingManifest::from_file(path)?),
            None => None,
        };

        let binding = Self { resolver, manifest };
        binding.check_manifest()?;
        Ok(binding)
    }

    /// Attach a manifest and check the module against it
    pub fn with_manifest(mut self, manifest: BindingManifest) -> BindResult<Self> {
        self.manifest = Some(manifest);
        self.check_manifest()?;
        Ok(self)
    }

    fn check_manifest(&self) -> BindResult<()> {
        if let Some(manifest) = &self.manifest {
            manifest.check(&self.resolver)?;
            tracing::info!(
                module = self.module().name(),
                version = self.module().version(),
                "native module matches binding manifest"
            );
        }
        Ok(())
    }

    /// Bound module
    pub fn module(&self) -> &Arc<NativeModule> {
        self.resolver.module()
    }

    /// Manifest the module was checked against, if any
    pub fn manifest(&self) -> Option<&BindingManifest> {
        self.manifest.as_ref()
    }

    /// Resolver used for all lookups
    pub fn resolver(&self) -> &TypeResolver {
        &self.resolver
    }

    /// Resolve a descriptor to its exported class
    pub fn resolve(&self, spec: impl Into<TypeSpec>) -> BindResult<Arc<NativeClass>> {
        self.resolver.resolve(&spec.into())
    }

    /// Construct a wrapper around a new instance of `spec`
    pub fn construct(&self, spec: impl Into<TypeSpec>, args: Args) -> BindResult<CppWrapper> {
        CppWrapper::new(&self.resolver, spec, args)
    }
}
