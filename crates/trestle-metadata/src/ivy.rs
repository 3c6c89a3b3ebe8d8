//! Ivy-style module metadata.
//!
//! This is the descriptor-driven variant: configurations, artifact
//! membership, exclude scoping, and dependency configuration-mappings all
//! come from the parsed descriptor. The mutable type accumulates raw
//! definitions during parsing; freezing it yields an immutable snapshot
//! that materializes per-configuration views on demand and supports
//! structural-sharing transforms.

use crate::artifact::{ArtifactArena, ArtifactMetadata};
use crate::configuration::{ConfigurationMetadata, ConfiguredDependency};
use crate::descriptor::{Artifact, Configuration, Dependency, Exclude};
use crate::identity::{ComponentId, ModuleVersionId, NamespaceId};
use crate::module::{
    close_hierarchy, ConfigurationCache, ModuleMetadata, ModuleSource, DEFAULT_STATUS,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Frozen Ivy-style metadata snapshot.
///
/// Raw definition collections are shared (by reference) with values
/// produced by the `with_*` transforms; the artifact arena and the
/// configuration memo are derived state and always start empty in a new
/// instance.
#[derive(Debug)]
pub struct IvyModuleMetadata {
    id: ModuleVersionId,
    component: ComponentId,
    status: String,
    missing: bool,
    source: Option<ModuleSource>,
    branch: Option<String>,
    configuration_definitions: Arc<BTreeMap<String, Configuration>>,
    artifact_definitions: Arc<Vec<Artifact>>,
    excludes: Arc<Vec<Exclude>>,
    extra_attributes: Arc<BTreeMap<NamespaceId, String>>,
    dependencies: Arc<Vec<Dependency>>,
    artifacts: ArtifactArena,
    configurations: ConfigurationCache,
}

impl IvyModuleMetadata {
    fn from_mutable(mutable: &MutableIvyModuleMetadata) -> Self {
        Self {
            id: mutable.id.clone(),
            component: mutable.component.clone(),
            status: mutable.status.clone(),
            missing: mutable.missing,
            source: mutable.source.clone(),
            branch: mutable.branch.clone(),
            configuration_definitions: Arc::new(mutable.configurations.clone()),
            artifacts: ArtifactArena::with_capacity(mutable.artifacts.len()),
            artifact_definitions: Arc::new(mutable.artifacts.clone()),
            excludes: Arc::new(mutable.excludes.clone()),
            extra_attributes: Arc::new(mutable.extra_attributes.clone()),
            dependencies: Arc::new(mutable.dependencies.clone()),
            configurations: ConfigurationCache::default(),
        }
    }

    /// A new instance sharing every raw field, with empty derived caches.
    fn sharing(&self) -> Self {
        Self {
            id: self.id.clone(),
            component: self.component.clone(),
            status: self.status.clone(),
            missing: self.missing,
            source: self.source.clone(),
            branch: self.branch.clone(),
            configuration_definitions: Arc::clone(&self.configuration_definitions),
            artifact_definitions: Arc::clone(&self.artifact_definitions),
            excludes: Arc::clone(&self.excludes),
            extra_attributes: Arc::clone(&self.extra_attributes),
            dependencies: Arc::clone(&self.dependencies),
            artifacts: ArtifactArena::with_capacity(self.artifact_definitions.len()),
            configurations: ConfigurationCache::default(),
        }
    }

    /// VCS branch recorded by the descriptor, if any.
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Extra descriptor attributes keyed by namespaced id.
    #[must_use]
    pub fn extra_attributes(&self) -> &BTreeMap<NamespaceId, String> {
        &self.extra_attributes
    }

    /// Raw artifact definitions, in descriptor order.
    #[must_use]
    pub fn artifact_definitions(&self) -> &[Artifact] {
        &self.artifact_definitions
    }

    /// Raw exclude rules, in descriptor order.
    #[must_use]
    pub fn excludes(&self) -> &[Exclude] {
        &self.excludes
    }

    /// The same metadata with different provenance.
    #[must_use]
    pub fn with_source(&self, source: ModuleSource) -> Self {
        let mut next = self.sharing();
        next.source = Some(source);
        next
    }

    /// The same metadata with a replaced dependency list.
    #[must_use]
    pub fn with_dependencies(&self, dependencies: Vec<Dependency>) -> Self {
        let mut next = self.sharing();
        next.dependencies = Arc::new(dependencies);
        next
    }

    /// The same metadata with every dependency's requested version widened
    /// back to its recorded dynamic constraint. Declarations that were
    /// never dynamic pass through unchanged.
    #[must_use]
    pub fn with_dynamic_constraint_versions(&self) -> Self {
        let rewritten = self
            .dependencies
            .iter()
            .map(|dependency| match &dependency.dynamic_constraint_version {
                Some(constraint) => dependency.with_requested_version(constraint.clone()),
                None => dependency.clone(),
            })
            .collect();
        self.with_dependencies(rewritten)
    }

    /// An independent mutable copy; edits to it never affect this
    /// instance.
    #[must_use]
    pub fn unfreeze(&self) -> MutableIvyModuleMetadata {
        MutableIvyModuleMetadata {
            id: self.id.clone(),
            component: self.component.clone(),
            status: self.status.clone(),
            missing: self.missing,
            source: self.source.clone(),
            branch: self.branch.clone(),
            configurations: (*self.configuration_definitions).clone(),
            artifacts: (*self.artifact_definitions).clone(),
            excludes: (*self.excludes).clone(),
            extra_attributes: (*self.extra_attributes).clone(),
            dependencies: (*self.dependencies).clone(),
        }
    }

    /// Build the resolved view of one configuration. Artifacts and
    /// excludes are filtered first, then the dependency list is evaluated
    /// against the partially-built view, which supplies the name and
    /// hierarchy context.
    fn materialize(&self, definition: &Configuration) -> ConfigurationMetadata {
        let hierarchy = close_hierarchy(&definition.name, &self.configuration_definitions);
        let artifacts = self.filter_artifacts(&definition.name, &hierarchy);
        let excludes = self.filter_excludes(&hierarchy);

        let mut configuration = ConfigurationMetadata {
            component: self.component.clone(),
            name: definition.name.clone(),
            transitive: definition.transitive,
            visible: definition.visible,
            hierarchy,
            artifacts,
            excludes,
            dependencies: Vec::new(),
        };
        configuration.dependencies = self.filter_dependencies(&configuration);
        configuration
    }

    /// Artifacts visible to `name`: its own members first, then each
    /// ancestor's in hierarchy order, deduplicated by canonical identity
    /// with first-seen order preserved.
    fn filter_artifacts(&self, name: &str, hierarchy: &[String]) -> Vec<Arc<ArtifactMetadata>> {
        let mut seen = Vec::new();
        let mut artifacts = Vec::new();
        self.collect_artifacts_for(name, &mut seen, &mut artifacts);
        for ancestor in hierarchy {
            self.collect_artifacts_for(ancestor, &mut seen, &mut artifacts);
        }
        artifacts
    }

    fn collect_artifacts_for(
        &self,
        name: &str,
        seen: &mut Vec<usize>,
        dest: &mut Vec<Arc<ArtifactMetadata>>,
    ) {
        for (index, definition) in self.artifact_definitions.iter().enumerate() {
            // Exact membership only: a literal `*` here is an ordinary
            // name, unlike in dependency configuration-mappings.
            if definition.configurations.contains(name) && !seen.contains(&index) {
                seen.push(index);
                dest.push(self.artifacts.canonical(index, || {
                    ArtifactMetadata::new(self.component.clone(), definition.name.clone())
                }));
            }
        }
    }

    /// Exclude rules whose scope intersects the hierarchy, in declaration
    /// order. A rule scoped to no configurations never applies.
    fn filter_excludes(&self, hierarchy: &[String]) -> Vec<Exclude> {
        self.excludes
            .iter()
            .filter(|exclude| {
                exclude
                    .configurations
                    .iter()
                    .any(|scope| hierarchy.contains(scope))
            })
            .cloned()
            .collect()
    }

    /// Dependencies visible to the configuration, in declaration order,
    /// each wrapped with the configuration as context.
    fn filter_dependencies(
        &self,
        configuration: &ConfigurationMetadata,
    ) -> Vec<ConfiguredDependency> {
        self.dependencies
            .iter()
            .filter(|dependency| {
                dependency.included_in(&configuration.name, &configuration.hierarchy)
            })
            .map(|dependency| ConfiguredDependency {
                component: self.component.clone(),
                configuration: configuration.name.clone(),
                declaration: dependency.clone(),
            })
            .collect()
    }
}

impl ModuleMetadata for IvyModuleMetadata {
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
        &self.configuration_definitions
    }

    fn configuration(&self, name: &str) -> Option<Arc<ConfigurationMetadata>> {
        let definition = self.configuration_definitions.get(name)?;
        Some(
            self.configurations
                .get_or_materialize(name, || self.materialize(definition)),
        )
    }
}

/// Ivy-style metadata under construction by the descriptor parser.
#[derive(Debug, Clone)]
pub struct MutableIvyModuleMetadata {
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

    /// VCS branch recorded by the descriptor.
    pub branch: Option<String>,

    /// Configuration definitions keyed by name.
    pub configurations: BTreeMap<String, Configuration>,

    /// Artifact definitions in descriptor order.
    pub artifacts: Vec<Artifact>,

    /// Exclude rules in descriptor order.
    pub excludes: Vec<Exclude>,

    /// Extra descriptor attributes.
    pub extra_attributes: BTreeMap<NamespaceId, String>,

    /// Dependency declarations in descriptor order.
    pub dependencies: Vec<Dependency>,
}

impl MutableIvyModuleMetadata {
    /// Empty metadata for the given identities.
    #[must_use]
    pub fn new(id: ModuleVersionId, component: ComponentId) -> Self {
        Self {
            id,
            component,
            status: DEFAULT_STATUS.to_string(),
            missing: false,
            source: None,
            branch: None,
            configurations: BTreeMap::new(),
            artifacts: Vec::new(),
            excludes: Vec::new(),
            extra_attributes: BTreeMap::new(),
            dependencies: Vec::new(),
        }
    }

    /// Add a configuration definition, replacing any previous definition
    /// of the same name.
    pub fn add_configuration(&mut self, configuration: Configuration) {
        self.configurations
            .insert(configuration.name.clone(), configuration);
    }

    /// Append an artifact definition.
    pub fn add_artifact(&mut self, artifact: Artifact) {
        self.artifacts.push(artifact);
    }

    /// Append an exclude rule.
    pub fn add_exclude(&mut self, exclude: Exclude) {
        self.excludes.push(exclude);
    }

    /// Append a dependency declaration.
    pub fn add_dependency(&mut self, dependency: Dependency) {
        self.dependencies.push(dependency);
    }

    /// Freeze into an immutable snapshot. The snapshot copies every raw
    /// field, so further edits here never leak into it.
    #[must_use]
    pub fn freeze(&self) -> IvyModuleMetadata {
        IvyModuleMetadata::from_mutable(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{ArtifactName, ModuleId, ModuleSelector};

    fn component() -> ComponentId {
        ComponentId::new("org.example", "widget", "1.0")
    }

    fn dependency(module: &str, tokens: &[&str]) -> Dependency {
        Dependency::new(
            ModuleSelector::new("org.example", module, "1.0"),
            tokens.iter().copied(),
        )
    }

    /// Three-deep hierarchy with overlapping artifact membership plus a
    /// standalone configuration.
    fn fixture() -> MutableIvyModuleMetadata {
        let mut metadata = MutableIvyModuleMetadata::new(
            ModuleVersionId::new("org.example", "widget", "1.0"),
            component(),
        );

        metadata.add_configuration(Configuration::new("compile"));
        metadata.add_configuration(Configuration::new("runtime").extending(["compile"]));
        metadata.add_configuration(Configuration::new("test").extending(["runtime"]));
        metadata.add_configuration(Configuration::new("other"));

        metadata.add_artifact(Artifact::new(
            ArtifactName::new("widget", "jar"),
            ["compile", "runtime"],
        ));
        metadata.add_artifact(Artifact::new(
            ArtifactName::new("widget-api", "jar"),
            ["compile"],
        ));
        metadata.add_artifact(Artifact::new(
            ArtifactName::new("widget-tests", "jar"),
            ["test"],
        ));

        metadata.add_exclude(Exclude::new(
            ModuleId::new("org.excluded", "noisy"),
            ["compile"],
        ));
        metadata.add_exclude(Exclude::new(
            ModuleId::new("org.excluded", "flaky"),
            ["other"],
        ));
        metadata.add_exclude(Exclude::new(
            ModuleId::new("org.excluded", "vacuous"),
            Vec::<String>::new(),
        ));

        metadata.add_dependency(dependency("dep-compile", &["compile"]));
        metadata.add_dependency(dependency("dep-wild", &["*", "!test"]));
        metadata.add_dependency(
            dependency("dep-all", &["%"]).with_dynamic_constraint("2.+"),
        );
        metadata.add_dependency(dependency("dep-runtime", &["runtime"]));

        metadata
    }

    fn artifact_names(configuration: &ConfigurationMetadata) -> Vec<String> {
        configuration
            .artifacts
            .iter()
            .map(|artifact| artifact.name.name.clone())
            .collect()
    }

    fn dependency_modules(configuration: &ConfigurationMetadata) -> Vec<String> {
        configuration
            .dependencies
            .iter()
            .map(|dependency| dependency.selector().module.clone())
            .collect()
    }

    #[test]
    fn artifacts_collected_through_hierarchy_without_duplicates() {
        let metadata = fixture().freeze();
        let test = metadata.configuration("test").unwrap();

        assert_eq!(test.hierarchy, vec!["test", "runtime", "compile"]);
        // "widget" is a member of both runtime and compile but shows up once.
        assert_eq!(
            artifact_names(&test),
            vec!["widget-tests", "widget", "widget-api"]
        );
    }

    #[test]
    fn artifact_instances_shared_between_configurations() {
        let metadata = fixture().freeze();
        let compile = metadata.configuration("compile").unwrap();
        let runtime = metadata.configuration("runtime").unwrap();

        let from_compile = compile
            .artifacts
            .iter()
            .find(|artifact| artifact.name.name == "widget")
            .unwrap();
        let from_runtime = runtime
            .artifacts
            .iter()
            .find(|artifact| artifact.name.name == "widget")
            .unwrap();
        assert!(Arc::ptr_eq(from_compile, from_runtime));
    }

    #[test]
    fn artifact_filter_ignores_wildcard_token() {
        let mut mutable = fixture();
        mutable.add_artifact(Artifact::new(ArtifactName::new("widget-extra", "jar"), ["*"]));
        let metadata = mutable.freeze();

        // `*` is exact-match data for artifacts, not a wildcard.
        let compile = metadata.configuration("compile").unwrap();
        assert!(!artifact_names(&compile).contains(&"widget-extra".to_string()));
    }

    #[test]
    fn excludes_scoped_by_hierarchy_intersection() {
        let metadata = fixture().freeze();

        let compile = metadata.configuration("compile").unwrap();
        assert_eq!(compile.excludes.len(), 1);
        assert_eq!(compile.excludes[0].module.name, "noisy");

        // "test" reaches "compile" through its hierarchy.
        let test = metadata.configuration("test").unwrap();
        assert_eq!(test.excludes.len(), 1);
        assert_eq!(test.excludes[0].module.name, "noisy");

        let other = metadata.configuration("other").unwrap();
        assert_eq!(other.excludes.len(), 1);
        assert_eq!(other.excludes[0].module.name, "flaky");
    }

    #[test]
    fn vacuous_exclude_never_applies() {
        let metadata = fixture().freeze();
        for name in metadata.configuration_names() {
            let configuration = metadata.configuration(name).unwrap();
            assert!(configuration
                .excludes
                .iter()
                .all(|exclude| exclude.module.name != "vacuous"));
        }
    }

    #[test]
    fn dependencies_filtered_and_wrapped_with_context() {
        let metadata = fixture().freeze();

        let compile = metadata.configuration("compile").unwrap();
        assert_eq!(
            dependency_modules(&compile),
            vec!["dep-compile", "dep-wild", "dep-all"]
        );
        assert!(compile
            .dependencies
            .iter()
            .all(|dependency| dependency.configuration == "compile"
                && dependency.component == component()));

        // "!test" suppresses the wildcard for "test" but named and
        // match-all tokens still apply through the hierarchy.
        let test = metadata.configuration("test").unwrap();
        assert_eq!(
            dependency_modules(&test),
            vec!["dep-compile", "dep-all", "dep-runtime"]
        );
    }

    #[test]
    fn unknown_configuration_is_none() {
        let metadata = fixture().freeze();
        assert!(metadata.configuration("nope").is_none());
    }

    #[test]
    fn repeated_materialization_is_shared() {
        let metadata = fixture().freeze();
        let first = metadata.configuration("compile").unwrap();
        let second = metadata.configuration("compile").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn with_source_changes_provenance_only() {
        let metadata = fixture().freeze();
        let relocated = metadata.with_source(ModuleSource::new("https://repo.example/cache"));

        assert!(metadata.source().is_none());
        assert_eq!(
            relocated.source().unwrap().origin,
            "https://repo.example/cache"
        );
        assert_eq!(
            relocated.configuration_definitions(),
            metadata.configuration_definitions()
        );
        assert_eq!(relocated.artifact_definitions(), metadata.artifact_definitions());
        assert_eq!(relocated.dependencies(), metadata.dependencies());

        // Derived caches are not carried over: canonical artifacts are
        // rebuilt, equal in value but not the same instances.
        let before = metadata.configuration("compile").unwrap();
        let after = relocated.configuration("compile").unwrap();
        assert!(!Arc::ptr_eq(&before.artifacts[0], &after.artifacts[0]));
        assert_eq!(*before.artifacts[0], *after.artifacts[0]);
    }

    #[test]
    fn with_dependencies_replaces_the_list() {
        let metadata = fixture().freeze();
        let replaced = metadata.with_dependencies(vec![dependency("dep-only", &["%"])]);

        assert_eq!(metadata.dependencies().len(), 4);
        assert_eq!(replaced.dependencies().len(), 1);
        let compile = replaced.configuration("compile").unwrap();
        assert_eq!(dependency_modules(&compile), vec!["dep-only"]);
    }

    #[test]
    fn dynamic_constraint_versions_rewrite_only_dynamic_declarations() {
        let metadata = fixture().freeze();
        let widened = metadata.with_dynamic_constraint_versions();

        let rewritten = widened
            .dependencies()
            .iter()
            .find(|dependency| dependency.selector.module == "dep-all")
            .unwrap();
        assert_eq!(rewritten.selector.version, "2.+");

        // Everything else passes through, and the original is untouched.
        let untouched = widened
            .dependencies()
            .iter()
            .find(|dependency| dependency.selector.module == "dep-compile")
            .unwrap();
        assert_eq!(untouched.selector.version, "1.0");
        let original = metadata
            .dependencies()
            .iter()
            .find(|dependency| dependency.selector.module == "dep-all")
            .unwrap();
        assert_eq!(original.selector.version, "1.0");
    }

    #[test]
    fn freeze_unfreeze_round_trip_preserves_value() {
        let mut mutable = fixture();
        mutable.branch = Some("release-1.x".to_string());
        mutable
            .extra_attributes
            .insert(NamespaceId::new("e", "color"), "blue".to_string());
        let frozen = mutable.freeze();

        let thawed = frozen.unfreeze();
        let refrozen = thawed.freeze();

        assert_eq!(refrozen.id(), frozen.id());
        assert_eq!(refrozen.status(), frozen.status());
        assert_eq!(refrozen.branch(), frozen.branch());
        assert_eq!(
            refrozen.configuration_definitions(),
            frozen.configuration_definitions()
        );
        assert_eq!(refrozen.artifact_definitions(), frozen.artifact_definitions());
        assert_eq!(refrozen.excludes(), frozen.excludes());
        assert_eq!(refrozen.extra_attributes(), frozen.extra_attributes());
        assert_eq!(refrozen.dependencies(), frozen.dependencies());
    }

    #[test]
    fn unfrozen_copy_is_independent() {
        let metadata = fixture().freeze();
        let mut thawed = metadata.unfreeze();
        thawed.add_artifact(Artifact::new(ArtifactName::new("rogue", "jar"), ["compile"]));
        thawed.configurations.clear();

        assert_eq!(metadata.artifact_definitions().len(), 3);
        assert_eq!(metadata.configuration_names().len(), 4);
    }

    #[test]
    fn edits_after_freeze_do_not_leak_into_the_snapshot() {
        let mut mutable = fixture();
        let frozen = mutable.freeze();
        mutable.add_dependency(dependency("late", &["%"]));
        mutable.excludes.clear();

        assert_eq!(frozen.dependencies().len(), 4);
        assert_eq!(frozen.excludes().len(), 3);
    }

    #[test]
    fn missing_and_status_pass_through() {
        let mut mutable = fixture();
        mutable.status = "release".to_string();
        mutable.missing = true;
        let frozen = mutable.freeze();

        assert_eq!(frozen.status(), "release");
        assert!(frozen.is_missing());
    }
}
