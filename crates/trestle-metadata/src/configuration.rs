//! The materialized view of a single configuration.

use crate::artifact::ArtifactMetadata;
use crate::descriptor::{Dependency, Exclude};
use crate::identity::{ComponentId, ModuleSelector};
use std::sync::Arc;

/// Everything a configuration exposes to the graph resolver: flags, its
/// transitively-closed hierarchy, and the artifact/exclude/dependency
/// subsets visible to it.
#[derive(Debug, Clone)]
pub struct ConfigurationMetadata {
    /// The component this configuration belongs to.
    pub component: ComponentId,

    /// Configuration name.
    pub name: String,

    /// Whether dependencies are carried transitively.
    pub transitive: bool,

    /// Whether the configuration is visible outside the module.
    pub visible: bool,

    /// The configuration's own name followed by every configuration it
    /// extends, directly or indirectly, in declared order.
    pub hierarchy: Vec<String>,

    /// Artifacts visible to this configuration, hierarchy-ordered and
    /// deduplicated. Instances are shared with every other configuration
    /// referencing the same raw definition.
    pub artifacts: Vec<Arc<ArtifactMetadata>>,

    /// Exclude rules applying to this configuration, in declaration order.
    pub excludes: Vec<Exclude>,

    /// Dependencies visible to this configuration, in declaration order,
    /// each carrying this configuration as context.
    pub dependencies: Vec<ConfiguredDependency>,
}

impl ConfigurationMetadata {
    /// Whether `name` is this configuration or one of its ancestors.
    #[must_use]
    pub fn in_hierarchy(&self, name: &str) -> bool {
        self.hierarchy.iter().any(|entry| entry == name)
    }
}

/// A dependency declaration seen from the configuration that included it.
///
/// The raw declaration is untouched; the wrapper only adds the owning
/// component and configuration so the graph resolver knows where an edge
/// originated.
#[derive(Debug, Clone)]
pub struct ConfiguredDependency {
    /// The component owning the declaration.
    pub component: ComponentId,

    /// Name of the configuration that included the declaration.
    pub configuration: String,

    /// The declaration as written in the descriptor.
    pub declaration: Dependency,
}

impl ConfiguredDependency {
    /// The target module selector of the underlying declaration.
    #[must_use]
    pub fn selector(&self) -> &ModuleSelector {
        &self.declaration.selector
    }
}
