//! Module metadata model for the Trestle build system.
//!
//! This crate provides:
//! - Raw descriptor definitions (configurations, artifacts, excludes,
//!   dependency declarations) as plain data
//! - Per-configuration projection: the artifacts, excludes, and
//!   dependencies visible to a named configuration through its
//!   `extends` hierarchy
//! - The dependency configuration-mapping mini-language (`*`, `%`,
//!   `!name` negation)
//! - Mutable/immutable metadata duality with structural-sharing
//!   transforms, for both descriptor-driven and POM-derived modules
//!
//! Descriptor parsing, repository access, and graph resolution live in
//! other crates; this one is the pure in-memory projection they share.

mod artifact;
mod configuration;
mod descriptor;
mod identity;
mod ivy;
mod maven;
mod module;

pub use artifact::ArtifactMetadata;
pub use configuration::{ConfigurationMetadata, ConfiguredDependency};
pub use descriptor::{
    Artifact, Configuration, Dependency, Exclude, MATCH_ALL, NEGATION, WILDCARD,
};
pub use identity::{
    ArtifactName, ComponentId, IdentityError, ModuleId, ModuleSelector, ModuleVersionId,
    NamespaceId,
};
pub use ivy::{IvyModuleMetadata, MutableIvyModuleMetadata};
pub use maven::{
    maven2_configurations, MavenModuleMetadata, MutableMavenModuleMetadata, JAR_PACKAGINGS,
    POM_PACKAGING,
};
pub use module::{AttributesSchema, ModuleMetadata, ModuleSource, DEFAULT_STATUS};
