/*! Resource declarations and binding synthesis.

Resources are declared on a [Resources] registry.  When a pipeline compiles, [synthesize] assigns
each resource visible to a stage a `@binding` slot in its group and chooses its storage access
with [access_mode::resolve].
*/

pub mod access_mode;
pub mod resources;
pub mod sampler;
pub mod synthesize;
pub mod visible_to;

pub use access_mode::{Access, AccessMode};
pub use resources::{
    BindingTextureOptions, DeclareOptions, Resource, ResourceKind, Resources, StorageOptions,
};
pub use sampler::{SamplerType, StorageFormat};
pub use synthesize::{
    synthesize, verify_refresh, BindingAssignment, BoundResource, CompiledBindings, PassContext,
    INTERNAL_GROUP, USER_GROUP,
};
pub use visible_to::{Stage, StageSet};
