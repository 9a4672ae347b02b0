//! Shader stages and resource visibility.
//!
//! Every resource declares the set of shader stages it is visible to.  Binding synthesis only
//! emits a resource in stages its [StageSet] includes, and the access a storage receives in a
//! stage depends on the whole set (see [super::access_mode]).
//!
//! # Examples
//!
//! ```
//! use slots_and_strides::bindings::visible_to::{Stage, StageSet};
//!
//! // A particle buffer written by compute and drawn by the vertex stage
//! let particles = StageSet::COMPUTE | StageSet::VERTEX;
//! assert!(particles.includes(Stage::Vertex));
//! assert!(!particles.includes(Stage::Fragment));
//!
//! // Resources declared without a visibility are visible everywhere
//! assert_eq!(StageSet::default(), StageSet::all());
//! ```

use std::fmt::Display;

/// A shader execution context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Compute,
    Vertex,
    Fragment,
}

impl Stage {
    /// Every stage, in the order a render pass compiles them.
    pub const ALL: [Stage; 3] = [Stage::Compute, Stage::Vertex, Stage::Fragment];
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Stage::Compute => "compute",
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
        })
    }
}

bitflags::bitflags! {
    /// The set of stages a resource is visible to.
    ///
    /// Bit values follow WebGPU's `GPUShaderStage`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct StageSet: u32 {
        const VERTEX = 1 << 0;
        const FRAGMENT = 1 << 1;
        const COMPUTE = 1 << 2;
    }
}

impl StageSet {
    pub fn includes(self, stage: Stage) -> bool {
        self.contains(StageSet::from(stage))
    }
}

impl Default for StageSet {
    /// Unconstrained: visible to every stage.
    fn default() -> Self {
        StageSet::all()
    }
}

impl From<Stage> for StageSet {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::Compute => StageSet::COMPUTE,
            Stage::Vertex => StageSet::VERTEX,
            Stage::Fragment => StageSet::FRAGMENT,
        }
    }
}
