//! The seam shared by every module metadata flavour.
//!
//! A metadata variant owns its raw definitions and supplies its own
//! configuration-materialization strategy; everything the graph resolver
//! needs is behind [`ModuleMetadata`]. The hierarchy closure and the
//! per-configuration memo live here because every variant materializes
//! through them.

use crate::configuration::ConfigurationMetadata;
use crate::descriptor::{Configuration, Dependency};
use crate::identity::{ComponentId, ModuleVersionId};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock, RwLock};

/// Status assigned to metadata when the descriptor declares none.
pub const DEFAULT_STATUS: &str = "integration";

/// Read access to resolved module metadata, independent of the descriptor
/// format it came from.
pub trait ModuleMetadata {
    /// The module version this metadata describes.
    fn id(&self) -> &ModuleVersionId;

    /// The component identity the resolver fetched.
    fn component(&self) -> &ComponentId;

    /// Publication status, e.g. `integration` or `release`.
    fn status(&self) -> &str;

    /// Whether this is placeholder metadata for a module that could not
    /// be located.
    fn is_missing(&self) -> bool;

    /// Provenance of the metadata, if recorded.
    fn source(&self) -> Option<&ModuleSource>;

    /// All dependency declarations, in descriptor order.
    fn dependencies(&self) -> &[Dependency];

    /// The raw configuration definitions, keyed by name.
    fn configuration_definitions(&self) -> &BTreeMap<String, Configuration>;

    /// The materialized view of the named configuration, or `None` when no
    /// such configuration is defined. Repeated calls for the same name on
    /// the same instance return the same shared value.
    fn configuration(&self, name: &str) -> Option<Arc<ConfigurationMetadata>>;

    /// Names of every defined configuration.
    fn configuration_names(&self) -> Vec<&str> {
        self.configuration_definitions()
            .keys()
            .map(String::as_str)
            .collect()
    }

    /// The variant-selection schema applied when a consumer expresses no
    /// preference. Fixed for all modules.
    fn attributes_schema(&self) -> &'static AttributesSchema {
        AttributesSchema::prefer_runtime()
    }
}

/// Provenance of a module's metadata: where the descriptor was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSource {
    /// Origin description, e.g. a repository URL or cache path.
    pub origin: String,
}

impl ModuleSource {
    /// Create a source record.
    #[must_use]
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
        }
    }
}

/// Default variant-selection policy applied to every module.
#[derive(Debug, PartialEq, Eq)]
pub struct AttributesSchema {
    preferred_usage: &'static str,
}

impl AttributesSchema {
    /// The process-wide schema preferring the runtime variant.
    #[must_use]
    pub fn prefer_runtime() -> &'static Self {
        static SCHEMA: OnceLock<AttributesSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| Self {
            preferred_usage: "runtime",
        })
    }

    /// Usage selected when a consumer expresses no preference.
    #[must_use]
    pub fn preferred_usage(&self) -> &str {
        self.preferred_usage
    }
}

/// Compute a configuration's transitive hierarchy: its own name first,
/// then every extended configuration depth-first in declared order, each
/// name at most once. Names without a definition contribute themselves and
/// nothing more; a cyclic `extends` chain terminates with each name once.
pub(crate) fn close_hierarchy(
    name: &str,
    definitions: &BTreeMap<String, Configuration>,
) -> Vec<String> {
    let mut hierarchy = Vec::new();
    collect_hierarchy(name, definitions, &mut hierarchy);
    hierarchy
}

fn collect_hierarchy(
    name: &str,
    definitions: &BTreeMap<String, Configuration>,
    dest: &mut Vec<String>,
) {
    if dest.iter().any(|entry| entry == name) {
        return;
    }
    dest.push(name.to_string());
    if let Some(definition) = definitions.get(name) {
        for parent in &definition.extends {
            collect_hierarchy(parent, definitions, dest);
        }
    }
}

/// Per-instance memo of materialized configurations.
///
/// Materialization is pure, so a lost race just recomputes; the write-side
/// entry check keeps every caller holding the same shared value.
#[derive(Debug, Default)]
pub(crate) struct ConfigurationCache {
    entries: RwLock<HashMap<String, Arc<ConfigurationMetadata>>>,
}

impl ConfigurationCache {
    /// The memoized view for `name`, materializing it on first use.
    pub(crate) fn get_or_materialize(
        &self,
        name: &str,
        materialize: impl FnOnce() -> ConfigurationMetadata,
    ) -> Arc<ConfigurationMetadata> {
        if let Some(hit) = self.entries.read().unwrap().get(name) {
            return Arc::clone(hit);
        }
        let computed = Arc::new(materialize());
        let mut entries = self.entries.write().unwrap();
        Arc::clone(entries.entry(name.to_string()).or_insert(computed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definitions(entries: Vec<Configuration>) -> BTreeMap<String, Configuration> {
        entries
            .into_iter()
            .map(|configuration| (configuration.name.clone(), configuration))
            .collect()
    }

    #[test]
    fn hierarchy_starts_with_self() {
        let defs = definitions(vec![
            Configuration::new("compile"),
            Configuration::new("runtime").extending(["compile"]),
        ]);
        assert_eq!(close_hierarchy("runtime", &defs), vec!["runtime", "compile"]);
    }

    #[test]
    fn hierarchy_is_depth_first_in_declared_order() {
        let defs = definitions(vec![
            Configuration::new("base"),
            Configuration::new("left").extending(["base"]),
            Configuration::new("right").extending(["base"]),
            Configuration::new("all").extending(["left", "right"]),
        ]);
        assert_eq!(
            close_hierarchy("all", &defs),
            vec!["all", "left", "base", "right"]
        );
    }

    #[test]
    fn hierarchy_tolerates_cycles_and_unknown_parents() {
        let defs = definitions(vec![
            Configuration::new("a").extending(["b", "ghost"]),
            Configuration::new("b").extending(["a"]),
        ]);
        assert_eq!(close_hierarchy("a", &defs), vec!["a", "b", "ghost"]);
    }

    #[test]
    fn undefined_name_is_its_own_hierarchy() {
        let defs = definitions(vec![]);
        assert_eq!(close_hierarchy("solo", &defs), vec!["solo"]);
    }

    #[test]
    fn schema_singleton_is_shared() {
        let first = AttributesSchema::prefer_runtime();
        let second = AttributesSchema::prefer_runtime();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.preferred_usage(), "runtime");
    }
}
