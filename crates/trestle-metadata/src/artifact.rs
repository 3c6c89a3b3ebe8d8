//! Canonical artifact metadata and the identity arena backing it.
//!
//! A raw [`Artifact`](crate::descriptor::Artifact) definition may be
//! referenced by any number of configurations; all of them must observe
//! the same metadata instance. Each definition gets a stable index from
//! its position in the descriptor's artifact list, and the arena holds one
//! initialize-once slot per index.

use crate::identity::{ArtifactName, ComponentId};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Resolved metadata for a single publishable artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactMetadata {
    /// The component publishing the artifact.
    pub component: ComponentId,

    /// Logical artifact name.
    pub name: ArtifactName,
}

impl ArtifactMetadata {
    /// Create artifact metadata for a component.
    #[must_use]
    pub fn new(component: ComponentId, name: ArtifactName) -> Self {
        Self { component, name }
    }
}

impl fmt::Display for ArtifactMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.component)
    }
}

/// Index-keyed store of canonical artifact metadata.
///
/// Slots are lazily populated on first reference and never replaced, so
/// concurrent materialization of different configurations hands out one
/// shared instance per raw definition.
#[derive(Debug)]
pub(crate) struct ArtifactArena {
    slots: Box<[OnceLock<Arc<ArtifactMetadata>>]>,
}

impl ArtifactArena {
    /// Create an arena with one empty slot per raw artifact definition.
    pub(crate) fn with_capacity(definitions: usize) -> Self {
        Self {
            slots: (0..definitions).map(|_| OnceLock::new()).collect(),
        }
    }

    /// The canonical instance for the definition at `index`, creating it
    /// on first use.
    pub(crate) fn canonical(
        &self,
        index: usize,
        init: impl FnOnce() -> ArtifactMetadata,
    ) -> Arc<ArtifactMetadata> {
        Arc::clone(self.slots[index].get_or_init(|| Arc::new(init())))
    }
}
