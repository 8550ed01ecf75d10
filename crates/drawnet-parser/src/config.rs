//! Configuration for the extraction pipeline.

use drawnet_core::topology::Stage;

use crate::classify::ShapePatterns;

/// Which build stages must produce at least one entity.
///
/// A required stage that ends up empty aborts the conversion with the stage's
/// own error code. All three stages are required by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageRequirements {
    routers: bool,
    links: bool,
    networks: bool,
}

impl StageRequirements {
    /// Every stage required.
    pub fn all() -> Self {
        Self {
            routers: true,
            links: true,
            networks: true,
        }
    }

    /// Requirements with the given stages allowed to be empty.
    pub fn allowing_empty(stages: impl IntoIterator<Item = Stage>) -> Self {
        stages
            .into_iter()
            .fold(Self::all(), |reqs, stage| reqs.with_required(stage, false))
    }

    pub fn with_required(mut self, stage: Stage, required: bool) -> Self {
        match stage {
            Stage::Routers => self.routers = required,
            Stage::Links => self.links = required,
            Stage::Networks => self.networks = required,
        }
        self
    }

    pub fn is_required(&self, stage: Stage) -> bool {
        match stage {
            Stage::Routers => self.routers,
            Stage::Links => self.links,
            Stage::Networks => self.networks,
        }
    }
}

impl Default for StageRequirements {
    fn default() -> Self {
        Self::all()
    }
}

/// Settings for one call to [`crate::parse`].
#[derive(Debug, Clone, Default)]
pub struct ParseConfig {
    /// Router and network shape patterns.
    pub shapes: ShapePatterns,
    /// Stages that must not be empty.
    pub stages: StageRequirements,
}

impl ParseConfig {
    pub fn new(shapes: ShapePatterns, stages: StageRequirements) -> Self {
        Self { shapes, stages }
    }
}
