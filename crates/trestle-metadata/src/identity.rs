//! Identity value types for modules, components, and artifacts.
//!
//! These are opaque coordinates produced by the descriptor-parsing and
//! resolution layers and passed through this crate unchanged. They carry
//! no resolution logic of their own.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing identity coordinates.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// A coordinate string did not match the expected shape.
    #[error("invalid coordinate '{value}': {reason}")]
    InvalidCoordinate { value: String, reason: &'static str },
}

/// Identifies a module independent of version: `group:name`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleId {
    /// Organisation or group the module belongs to.
    pub group: String,

    /// Module name within the group.
    pub name: String,
}

impl ModuleId {
    /// Create a module id from group and name.
    #[must_use]
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

/// Identifies a specific version of a module: `group:name:version`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleVersionId {
    /// Organisation or group the module belongs to.
    pub group: String,

    /// Module name within the group.
    pub name: String,

    /// Resolved version string.
    pub version: String,
}

impl ModuleVersionId {
    /// Create a module version id from its three coordinates.
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// The version-independent module id.
    #[must_use]
    pub fn module(&self) -> ModuleId {
        ModuleId::new(self.group.clone(), self.name.clone())
    }
}

impl fmt::Display for ModuleVersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

impl FromStr for ModuleVersionId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (group, name, version) = split_coordinate(s)?;
        Ok(Self::new(group, name, version))
    }
}

/// Identifies a component in a repository: the unit the external resolver
/// fetches and walks. Shares the `group:module:version` notation with
/// [`ModuleVersionId`] but is kept distinct because the two identify
/// different things to different subsystems.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentId {
    /// Organisation or group the component belongs to.
    pub group: String,

    /// Module name within the group.
    pub module: String,

    /// Component version string.
    pub version: String,
}

impl ComponentId {
    /// Create a component id from its three coordinates.
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        module: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            module: module.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.module, self.version)
    }
}

impl FromStr for ComponentId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (group, module, version) = split_coordinate(s)?;
        Ok(Self::new(group, module, version))
    }
}

/// Selects the target module of a dependency declaration.
///
/// The version here is the *requested* version, which may be dynamic
/// (`1.+`, `latest.integration`); interpreting it is the resolver's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleSelector {
    /// Target group.
    pub group: String,

    /// Target module name.
    pub module: String,

    /// Requested version string.
    pub version: String,
}

impl ModuleSelector {
    /// Create a selector from its three coordinates.
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        module: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            module: module.into(),
            version: version.into(),
        }
    }

    /// The same selector with a different requested version.
    #[must_use]
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        Self {
            group: self.group.clone(),
            module: self.module.clone(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ModuleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.module, self.version)
    }
}

/// A namespaced key for descriptor extra attributes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NamespaceId {
    /// Namespace URI or prefix the attribute belongs to.
    pub namespace: String,

    /// Attribute name within the namespace.
    pub name: String,
}

impl NamespaceId {
    /// Create a namespaced attribute key.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// The logical name of a publishable artifact.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArtifactName {
    /// Base artifact name, usually the module name.
    pub name: String,

    /// Artifact type, e.g. `jar` or `zip`.
    #[serde(rename = "type")]
    pub kind: String,

    /// File extension; often but not always equal to the type.
    #[serde(default)]
    pub extension: Option<String>,

    /// Optional classifier, e.g. `sources`.
    #[serde(default)]
    pub classifier: Option<String>,
}

impl ArtifactName {
    /// Create an artifact name whose extension equals its type.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            name: name.into(),
            extension: Some(kind.clone()),
            kind,
            classifier: None,
        }
    }

    /// Attach a classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(classifier) = &self.classifier {
            write!(f, "-{classifier}")?;
        }
        if let Some(extension) = &self.extension {
            write!(f, ".{extension}")?;
        }
        Ok(())
    }
}

/// Split a `group:name:version` coordinate string.
fn split_coordinate(s: &str) -> Result<(&str, &str, &str), IdentityError> {
    let mut parts = s.split(':');
    let (Some(group), Some(name), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(IdentityError::InvalidCoordinate {
            value: s.to_string(),
            reason: "expected exactly three ':'-separated parts",
        });
    };

    if group.is_empty() || name.is_empty() || version.is_empty() {
        return Err(IdentityError::InvalidCoordinate {
            value: s.to_string(),
            reason: "coordinate parts cannot be empty",
        });
    }

    Ok((group, name, version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_module_version_id() {
        let id: ModuleVersionId = "org.example:widget:1.2.3".parse().unwrap();
        assert_eq!(id.group, "org.example");
        assert_eq!(id.name, "widget");
        assert_eq!(id.version, "1.2.3");
        assert_eq!(id.to_string(), "org.example:widget:1.2.3");
    }

    #[test]
    fn parse_component_id() {
        let id: ComponentId = "org.example:widget:2.0".parse().unwrap();
        assert_eq!(id.module, "widget");
    }

    #[test]
    fn reject_malformed_coordinates() {
        assert!("org.example:widget".parse::<ModuleVersionId>().is_err());
        assert!("a:b:c:d".parse::<ModuleVersionId>().is_err());
        assert!("::1.0".parse::<ComponentId>().is_err());
    }

    #[test]
    fn module_id_from_version_id() {
        let id = ModuleVersionId::new("org.example", "widget", "1.0");
        assert_eq!(id.module(), ModuleId::new("org.example", "widget"));
    }

    #[test]
    fn selector_with_version() {
        let selector = ModuleSelector::new("org.example", "widget", "1.0");
        let widened = selector.with_version("1.+");
        assert_eq!(widened.version, "1.+");
        assert_eq!(selector.version, "1.0");
    }

    #[test]
    fn artifact_name_display() {
        let name = ArtifactName::new("widget", "jar").with_classifier("sources");
        assert_eq!(name.to_string(), "widget-sources.jar");
        assert_eq!(name.kind, "jar");
    }
}
