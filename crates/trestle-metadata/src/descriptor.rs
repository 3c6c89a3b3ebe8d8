//! Raw definitions produced by a module descriptor parser.
//!
//! The descriptor-parsing layer turns an on-disk module descriptor into
//! these plain values; this crate only projects them into per-configuration
//! views. Nothing here validates cross-references between definitions:
//! a configuration name that exists nowhere simply never matches.

use crate::identity::{ArtifactName, ModuleId, ModuleSelector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Configuration-mapping token matching every configuration unless negated.
pub const WILDCARD: &str = "*";

/// Configuration-mapping token matching every configuration unconditionally.
pub const MATCH_ALL: &str = "%";

/// Prefix marking a configuration-mapping negation token.
pub const NEGATION: char = '!';

/// A named configuration declared by the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    /// Configuration name, unique within the module.
    pub name: String,

    /// Whether the configuration is visible outside the module.
    #[serde(default = "default_true")]
    pub visible: bool,

    /// Whether dependencies of this configuration are carried transitively.
    #[serde(default = "default_true")]
    pub transitive: bool,

    /// Names of the configurations this one extends, in declared order.
    #[serde(default)]
    pub extends: Vec<String>,
}

impl Configuration {
    /// Create a visible, transitive configuration with no parents.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            transitive: true,
            extends: Vec::new(),
        }
    }

    /// The same configuration extending the given parents.
    #[must_use]
    pub fn extending(mut self, parents: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extends = parents.into_iter().map(Into::into).collect();
        self
    }
}

/// A publishable artifact declared by the descriptor.
///
/// The same `Artifact` value may be listed under several configurations;
/// its position in the descriptor's artifact list is its identity as far
/// as canonicalization is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Artifact {
    /// Logical artifact name.
    pub name: ArtifactName,

    /// Names of the configurations this artifact is published under.
    ///
    /// Membership is exact string containment: a literal `*` entry here is
    /// an ordinary name and matches nothing special.
    #[serde(default)]
    pub configurations: BTreeSet<String>,
}

impl Artifact {
    /// Create an artifact published under the given configurations.
    #[must_use]
    pub fn new(
        name: ArtifactName,
        configurations: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name,
            configurations: configurations.into_iter().map(Into::into).collect(),
        }
    }
}

/// An exclusion rule declared by the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Exclude {
    /// The module the rule excludes.
    pub module: ModuleId,

    /// Optional artifact pattern within the excluded module.
    #[serde(default)]
    pub artifact: Option<ArtifactName>,

    /// Pattern matcher name used by the graph resolver, e.g. `exact` or
    /// `glob`. Opaque to this crate.
    #[serde(default)]
    pub matcher: Option<String>,

    /// Names of the configurations the rule applies to. A rule scoped to
    /// no configurations never applies.
    #[serde(default)]
    pub configurations: BTreeSet<String>,
}

impl Exclude {
    /// Create an exclude rule scoped to the given configurations.
    #[must_use]
    pub fn new(
        module: ModuleId,
        configurations: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            module,
            artifact: None,
            matcher: None,
            configurations: configurations.into_iter().map(Into::into).collect(),
        }
    }
}

/// A dependency declared by the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dependency {
    /// Target module and requested version.
    pub selector: ModuleSelector,

    /// The revision constraint as originally written when the requested
    /// version was rewritten to something concrete, e.g. `1.+`. Absent when
    /// the declaration was never dynamic.
    #[serde(default, rename = "dynamic-constraint-version")]
    pub dynamic_constraint_version: Option<String>,

    /// Configuration-mapping tokens, in declared order: a configuration
    /// name, [`WILDCARD`], [`MATCH_ALL`], or a [`NEGATION`]-prefixed name.
    #[serde(default, rename = "module-configurations")]
    pub module_configurations: Vec<String>,

    /// Whether this dependency's own dependencies are followed.
    #[serde(default = "default_true")]
    pub transitive: bool,

    /// Whether the requested version overrides conflict resolution.
    #[serde(default)]
    pub force: bool,

    /// Whether the target is expected to change without a version bump.
    #[serde(default)]
    pub changing: bool,
}

impl Dependency {
    /// Create a dependency on `selector` mapped to the given tokens.
    #[must_use]
    pub fn new(
        selector: ModuleSelector,
        module_configurations: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            selector,
            dynamic_constraint_version: None,
            module_configurations: module_configurations.into_iter().map(Into::into).collect(),
            transitive: true,
            force: false,
            changing: false,
        }
    }

    /// The same declaration with a recorded dynamic constraint version.
    #[must_use]
    pub fn with_dynamic_constraint(mut self, version: impl Into<String>) -> Self {
        self.dynamic_constraint_version = Some(version.into());
        self
    }

    /// The same declaration requesting a different version.
    #[must_use]
    pub fn with_requested_version(&self, version: impl Into<String>) -> Self {
        let mut rewritten = self.clone();
        rewritten.selector = self.selector.with_version(version);
        rewritten
    }

    /// Whether this declaration is visible in the named configuration.
    ///
    /// A token matches when it is [`MATCH_ALL`], the configuration's own
    /// name, or any name in the configuration's hierarchy. Failing that,
    /// [`WILDCARD`] matches unless the token list also negates the exact
    /// configuration name; negating an ancestor does not negate a
    /// configuration that merely extends it. Anything else, including a
    /// malformed negation, is an ordinary non-matching string.
    #[must_use]
    pub fn included_in(&self, configuration: &str, hierarchy: &[String]) -> bool {
        for token in &self.module_configurations {
            if token == MATCH_ALL || token == configuration || hierarchy.contains(token) {
                return true;
            }
            if token == WILDCARD && !self.negates(configuration) {
                return true;
            }
        }
        false
    }

    /// Whether the token list carries a negation of exactly `configuration`.
    fn negates(&self, configuration: &str) -> bool {
        self.module_configurations
            .iter()
            .any(|token| token.strip_prefix(NEGATION) == Some(configuration))
    }
}

fn default_true() -> bool {
    true
}
