//! Binding manifest parsing
//!
//! A binding manifest lists the types a binding expects the native module
//! to export, with the fields and methods each must provide. Checking it
//! once at startup turns "no such attribute" surprises deep inside a run
//! into a single load-time error.

use std::collections::HashSet;
use std::path::Path;

use ghex_sdk::{Arity, MemberKind};
use serde::Deserialize;
use thiserror::Error;

use crate::descriptor::TypeSpec;
use crate::error::BindError;
use crate::resolver::TypeResolver;

/// Errors that can occur while loading or checking a manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("Failed to read manifest file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse manifest: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Manifest is well-formed TOML but not a valid manifest
    #[error("Invalid manifest: {0}")]
    ValidationError(String),

    /// A declared type is not exported by the module
    #[error("Manifest type '{0}' is not exported by the native module")]
    Unresolved(String),

    /// A declared member is missing or has the wrong kind or arity
    #[error("Manifest mismatch for '{class}.{member}': {detail}")]
    Mismatch {
        /// Rendered type name
        class: String,
        /// Member name
        member: String,
        /// What differs
        detail: String,
    },
}

/// Binding manifest (TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BindingManifest {
    /// Module metadata
    pub module: ModuleInfo,

    /// Expected exported types
    #[serde(default, rename = "class")]
    pub classes: Vec<ClassEntry>,
}

/// Module metadata
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModuleInfo {
    /// Native module name
    pub name: String,

    /// Minimum module version, informational
    #[serde(default)]
    pub version: Option<String>,
}

/// One expected exported type
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClassEntry {
    /// Type descriptor (string or `[base, args...]`)
    #[serde(rename = "type")]
    pub spec: TypeSpec,

    /// Fields the type must expose
    #[serde(default)]
    pub fields: Vec<String>,

    /// Methods the type must expose
    #[serde(default)]
    pub methods: Vec<MethodEntry>,
}

/// Expected method, optionally with a required arity
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MethodEntry {
    /// Name only: any overload satisfies it
    Name(String),
    /// Name with an overload arity that must exist
    Detailed {
        /// Method name
        name: String,
        /// Argument count one overload must take
        #[serde(default)]
        arity: Option<usize>,
    },
}

impl MethodEntry {
    /// Method name
    pub fn name(&self) -> &str {
        match self {
            MethodEntry::Name(name) => name,
            MethodEntry::Detailed { name, .. } => name,
        }
    }

    /// Required arity, if any
    pub fn arity(&self) -> Option<usize> {
        match self {
            MethodEntry::Name(_) => None,
            MethodEntry::Detailed { arity, .. } => *arity,
        }
    }
}

impl BindingManifest {
    /// Parse a manifest from a file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a manifest from a string
    pub fn from_str(content: &str) -> Result<Self, ManifestError> {
        let manifest: BindingManifest = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate the manifest
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.module.name.is_empty() {
            return Err(ManifestError::ValidationError(
                "Module name cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for class in &self.classes {
            let name = class.spec.rendered_name();
            if class.spec.base().is_empty() {
                return Err(ManifestError::ValidationError(
                    "Type name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(name.clone()) {
                return Err(ManifestError::ValidationError(format!(
                    "Type '{}' is declared more than once",
                    name
                )));
            }
            let members = class
                .fields
                .iter()
                .map(String::as_str)
                .chain(class.methods.iter().map(MethodEntry::name));
            for member in members {
                if member.is_empty() {
                    return Err(ManifestError::ValidationError(format!(
                        "Type '{}' declares a member with an empty name",
                        name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Check the manifest against the module a resolver reads from
    pub fn check(&self, resolver: &TypeResolver) -> Result<(), ManifestError> {
        if self.module.name != resolver.module().name() {
            return Err(ManifestError::ValidationError(format!(
                "Manifest describes module '{}', but the binding loads '{}'",
                self.module.name,
                resolver.module().name()
            )));
        }

        for entry in &self.classes {
            let class = match resolver.resolve(&entry.spec) {
                Ok(class) => class,
                Err(BindError::NameNotFound { name, .. }) => {
                    return Err(ManifestError::Unresolved(name))
                }
                Err(other) => return Err(ManifestError::ValidationError(other.to_string())),
            };
            let schema = class.schema();
            let mismatch = |member: &str, detail: String| ManifestError::Mismatch {
                class: class.name().to_string(),
                member: member.to_string(),
                detail,
            };

            for field in &entry.fields {
                match schema.member_kind(field) {
                    Some(MemberKind::Field) => {}
                    Some(MemberKind::Method) => {
                        return Err(mismatch(field, "declared as field, exported as method".into()))
                    }
                    None => return Err(mismatch(field, "not exported".into())),
                }
            }

            for method in &entry.methods {
                let name = method.name();
                let arities = match schema.member_kind(name) {
                    Some(MemberKind::Method) => schema.method_arities(name).unwrap_or(&[]),
                    Some(MemberKind::Field) => {
                        return Err(mismatch(name, "declared as method, exported as field".into()))
                    }
                    None => return Err(mismatch(name, "not exported".into())),
                };
                if let Some(arity) = method.arity() {
                    if !arities.contains(&Arity::Exact(arity)) && !arities.contains(&Arity::Any) {
                        return Err(mismatch(name, format!("no overload takes {} argument(s)", arity)));
                    }
                }
            }
        }

        tracing::debug!(
            module = resolver.module().name(),
            classes = self.classes.len(),
            "binding manifest checked"
        );
        Ok(())
    }
}
