//! Maven-style module metadata.
//!
//! POM-derived modules do not declare configurations; every module gets
//! the same well-known configuration set, and each configuration carries
//! the module's single main artifact, derived from its packaging. The
//! descriptor parser maps POM scopes onto the dependency declarations'
//! configuration tokens, so dependency filtering shares the Ivy-style
//! evaluator.

use crate::artifact::ArtifactMetadata;
use crate::configuration::{ConfigurationMetadata, ConfiguredDependency};
use crate::descriptor::{Configuration, Dependency};
use crate::identity::{ArtifactName, ComponentId, ModuleVersionId};
use crate::module::{
    close_hierarchy, ConfigurationCache, ModuleMetadata, ModuleSource, DEFAULT_STATUS,
};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

/// Packaging of modules published as plain POMs.
pub const POM_PACKAGING: &str = "pom";

/// Packagings known to produce a jar artifact.
pub const JAR_PACKAGINGS: [&str; 5] = ["jar", "ejb", "bundle", "maven-plugin", "eclipse-plugin"];

/// The well-known configuration set shared by every Maven-style module.
pub fn maven2_configurations() -> &'static BTreeMap<String, Configuration> {
    static CONFIGURATIONS: OnceLock<BTreeMap<String, Configuration>> = OnceLock::new();
    CONFIGURATIONS.get_or_init(|| {
        [
            Configuration::new("default").extending(["runtime", "master"]),
            Configuration::new("master"),
            Configuration::new("compile"),
            Configuration::new("provided"),
            Configuration::new("runtime").extending(["compile"]),
            Configuration::new("test").extending(["runtime"]),
            Configuration::new("system"),
            Configuration::new("sources"),
            Configuration::new("javadoc"),
            Configuration::new("optional"),
        ]
        .into_iter()
        .map(|configuration| (configuration.name.clone(), configuration))
        .collect()
    })
}

fn is_known_jar_packaging(packaging: &str) -> bool {
    JAR_PACKAGINGS.contains(&packaging)
}

/// Frozen Maven-style metadata snapshot.
#[derive(Debug)]
pub struct MavenModuleMetadata {
    id: ModuleVersionId,
    component: ComponentId,
    status: String,
    missing: bool,
    source: Option<ModuleSource>,
    dependencies: Arc<Vec<Dependency>>,
    packaging: String,
    relocated: bool,
    snapshot_timestamp: Option<String>,
    main_artifact: OnceLock<Arc<ArtifactMetadata>>,
    configurations: ConfigurationCache,
}

impl MavenModuleMetadata {
    fn from_mutable(mutable: &MutableMavenModuleMetadata) -> Self {
        Self {
            id: mutable.id.clone(),
            component: mutable.component.clone(),
            status: mutable.status.clone(),
            missing: mutable.missing,
            source: mutable.source.clone(),
            dependencies: Arc::new(mutable.dependencies.clone()),
            packaging: mutable.packaging.clone(),
            relocated: mutable.relocated,
            snapshot_timestamp: mutable.snapshot_timestamp.clone(),
            main_artifact: OnceLock::new(),
            configurations: ConfigurationCache::default(),
        }
    }

    /// POM packaging value, `jar` unless the descriptor said otherwise.
    #[must_use]
    pub fn packaging(&self) -> &str {
        &self.packaging
    }

    /// Whether the module was published as a plain POM.
    #[must_use]
    pub fn is_pom_packaging(&self) -> bool {
        self.packaging == POM_PACKAGING
    }

    /// Whether the packaging is one of the known jar-producing ones.
    #[must_use]
    pub fn is_known_jar_packaging(&self) -> bool {
        is_known_jar_packaging(&self.packaging)
    }

    /// Whether the descriptor relocated this module elsewhere.
    #[must_use]
    pub fn is_relocated(&self) -> bool {
        self.relocated
    }

    /// Timestamp of a unique snapshot publication, if any.
    #[must_use]
    pub fn snapshot_timestamp(&self) -> Option<&str> {
        self.snapshot_timestamp.as_deref()
    }

    /// The same metadata with different provenance.
    #[must_use]
    pub fn with_source(&self, source: ModuleSource) -> Self {
        Self {
            id: self.id.clone(),
            component: self.component.clone(),
            status: self.status.clone(),
            missing: self.missing,
            source: Some(source),
            dependencies: Arc::clone(&self.dependencies),
            packaging: self.packaging.clone(),
            relocated: self.relocated,
            snapshot_timestamp: self.snapshot_timestamp.clone(),
            main_artifact: OnceLock::new(),
            configurations: ConfigurationCache::default(),
        }
    }

    /// An independent mutable copy.
    #[must_use]
    pub fn unfreeze(&self) -> MutableMavenModuleMetadata {
        MutableMavenModuleMetadata {
            id: self.id.clone(),
            component: self.component.clone(),
            status: self.status.clone(),
            missing: self.missing,
            source: self.source.clone(),
            dependencies: (*self.dependencies).clone(),
            packaging: self.packaging.clone(),
            relocated: self.relocated,
            snapshot_timestamp: self.snapshot_timestamp.clone(),
        }
    }

    /// The module's single main artifact, shared by every configuration.
    /// Known jar packagings and plain POMs resolve to a jar; anything else
    /// keeps its packaging as type and extension.
    fn main_artifact(&self) -> Arc<ArtifactMetadata> {
        Arc::clone(self.main_artifact.get_or_init(|| {
            let kind = if self.is_pom_packaging() || self.is_known_jar_packaging() {
                "jar".to_string()
            } else {
                self.packaging.clone()
            };
            Arc::new(ArtifactMetadata::new(
                self.component.clone(),
                ArtifactName::new(self.id.name.clone(), kind),
            ))
        }))
    }

    fn materialize(&self, definition: &Configuration) -> ConfigurationMetadata {
        let hierarchy = close_hierarchy(&definition.name, maven2_configurations());
        let mut configuration = ConfigurationMetadata {
            component: self.component.clone(),
            name: definition.name.clone(),
            transitive: definition.transitive,
            visible: definition.visible,
            hierarchy,
            artifacts: vec![self.main_artifact()],
            excludes: Vec::new(),
            dependencies: Vec::new(),
        };
        configuration.dependencies = self
            .dependencies
            .iter()
            .filter(|dependency| {
                dependency.included_in(&configuration.name, &configuration.hierarchy)
            })
            .map(|dependency| ConfiguredDependency {
                component: self.component.clone(),
                configuration: configuration.name.clone(),
                declaration: dependency.clone(),
            })
            .collect();
        configuration
    }
}

impl ModuleMetadata for MavenModuleMetadata {
    fn id(&self) -> &ModuleVersionId {
        &self.id
    }

    fn component(&self) -> &ComponentId {
        &self.component
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn is_missing(&self) -> bool {
        self.missing
    }

    fn source(&self) -> Option<&ModuleSource> {
        self.source.as_ref()
    }

    fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    fn configuration_definitions(&self) -> &BTreeMap<String, Configuration> {
        maven2_configurations()
    }

    fn configuration(&self, name: &str) -> Option<Arc<ConfigurationMetadata>> {
        let definition = maven2_configurations().get(name)?;
        Some(
            self.configurations
                .get_or_materialize(name, || self.materialize(definition)),
        )
    }
}

/// Maven-style metadata under construction by the POM parser.
#[derive(Debug, Clone)]
pub struct MutableMavenModuleMetadata {
    /// The module version being described.
    pub id: ModuleVersionId,

    /// The component identity being resolved.
    pub component: ComponentId,

    /// Publication status.
    pub status: String,

    /// Whether this is placeholder metadata for an unlocatable module.
    pub missing: bool,

    /// Provenance, once known.
    pub source: Option<ModuleSource>,

    /// Dependency declarations with scopes already mapped onto
    /// configuration tokens.
    pub dependencies: Vec<Dependency>,

    /// POM packaging value.
    pub packaging: String,

    /// Whether the POM relocates the module elsewhere.
    pub relocated: bool,

    /// Timestamp of a unique snapshot publication.
    pub snapshot_timestamp: Option<String>,
}

impl MutableMavenModuleMetadata {
    /// Empty metadata with `jar` packaging.
    #[must_use]
    pub fn new(id: ModuleVersionId, component: ComponentId) -> Self {
        Self {
            id,
            component,
            status: DEFAULT_STATUS.to_string(),
            missing: false,
            source: None,
            dependencies: Vec::new(),
            packaging: "jar".to_string(),
            relocated: false,
            snapshot_timestamp: None,
        }
    }

    /// Placeholder metadata for a module that has no POM at all.
    #[must_use]
    pub fn missing(id: ModuleVersionId, component: ComponentId) -> Self {
        let mut metadata = Self::new(id, component);
        metadata.missing = true;
        metadata
    }

    /// Whether the module is published as a plain POM.
    #[must_use]
    pub fn is_pom_packaging(&self) -> bool {
        self.packaging == POM_PACKAGING
    }

    /// Whether the packaging is one of the known jar-producing ones.
    #[must_use]
    pub fn is_known_jar_packaging(&self) -> bool {
        is_known_jar_packaging(&self.packaging)
    }

    /// Append a dependency declaration.
    pub fn add_dependency(&mut self, dependency: Dependency) {
        self.dependencies.push(dependency);
    }

    /// Freeze into an immutable snapshot.
    #[must_use]
    pub fn freeze(&self) -> MavenModuleMetadata {
        MavenModuleMetadata::from_mutable(self)
    }
}
