// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Binding synthesis.
//!
//! [synthesize] walks the declared resources in a fixed order and assigns binding indices for one
//! (render pass, stage, group).  It returns both the WGSL declarations and the host-side
//! [BindingAssignment]s; the two agree index-for-index, so a backend can build its bind group
//! layout from the assignments alone.
//!
//! # Order
//!
//! 1. Uniform block (`params: Params`, or `internal_params: InternalParams` in the internal group)
//! 2. Mesh-uniform block (`mesh: Mesh`), for the pass's own group
//! 3. Storages, in declaration order
//! 4. Layers
//! 5. Samplers
//! 6. Storage textures (not in the vertex stage)
//! 7. 2D textures
//! 8. Depth textures, except in the pass that writes them
//! 9. 2D texture arrays
//! 10. External textures
//! 11. Binding textures: the write side in compute, the read side in fragment
//!
//! Within a category only resources visible to the stage and belonging to the group are bound.
//! The index starts at 0 and increments once per bound resource, across categories.
//!
//! Synthesis is pure.  It runs once when the pipeline compiles and again whenever a resource's
//! backing object is replaced (a new video frame for an external texture, say); [verify_refresh]
//! checks the second result against the first.

use crate::bindings::access_mode::{resolve, AccessMode};
use crate::bindings::resources::{Layers, Resource, Resources};
use crate::bindings::sampler::{SamplerType, StorageFormat};
use crate::bindings::visible_to::Stage;
use crate::error::Error;
use std::fmt::Display;

/// Group holding user-declared resources.
pub const USER_GROUP: u32 = 0;
/// Group holding resources the system declares for its own passes.
pub const INTERNAL_GROUP: u32 = 1;

pub const UNIFORM_STRUCT: &str = "Params";
pub const UNIFORM_VAR: &str = "params";
pub const INTERNAL_UNIFORM_STRUCT: &str = "InternalParams";
pub const INTERNAL_UNIFORM_VAR: &str = "internal_params";
pub const MESH_STRUCT: &str = "Mesh";
pub const MESH_VAR: &str = "mesh";

/// What a render pass contributes to synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassContext {
    pub index: u32,
    pub internal: bool,
}

impl PassContext {
    /// The group this pass's own resources (and its mesh uniforms) bind in.
    pub const fn group(self) -> u32 {
        if self.internal {
            INTERNAL_GROUP
        } else {
            USER_GROUP
        }
    }

    /// Groups compiled for this pass.  An internal pass sees user resources too.
    pub fn groups(self) -> &'static [u32] {
        if self.internal {
            &[USER_GROUP, INTERNAL_GROUP]
        } else {
            &[USER_GROUP]
        }
    }
}

/// The resource behind a binding, with what a backend needs to describe it.
///
/// Buffer sizes are not carried here; see [crate::passes::CompiledPass::buffer_size].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoundResource {
    /// The uniform block of a group.
    Uniforms { internal: bool },
    /// The mesh-uniform block of a pass.
    MeshUniforms,
    Storage { name: String, readable: bool },
    Layers,
    Sampler { name: String, r#type: SamplerType },
    StorageTexture { name: String, format: StorageFormat },
    Texture2D { name: String },
    TextureDepth2D { name: String },
    Texture2DArray { name: String },
    ExternalTexture { name: String },
    /// Write side of a binding texture, bound in compute.
    BindingTextureWrite { name: String, format: StorageFormat },
    /// Read side of a binding texture, bound in fragment.
    BindingTextureRead { name: String },
}

impl BoundResource {
    /// Name of the shader variable.
    pub fn name(&self) -> &str {
        match self {
            BoundResource::Uniforms { internal: false } => UNIFORM_VAR,
            BoundResource::Uniforms { internal: true } => INTERNAL_UNIFORM_VAR,
            BoundResource::MeshUniforms => MESH_VAR,
            BoundResource::Layers => Layers::NAME,
            BoundResource::Storage { name, .. }
            | BoundResource::Sampler { name, .. }
            | BoundResource::StorageTexture { name, .. }
            | BoundResource::Texture2D { name }
            | BoundResource::TextureDepth2D { name }
            | BoundResource::Texture2DArray { name }
            | BoundResource::ExternalTexture { name }
            | BoundResource::BindingTextureWrite { name, .. }
            | BoundResource::BindingTextureRead { name } => name,
        }
    }

    fn kind_label(&self) -> &'static str {
        match self {
            BoundResource::Uniforms { .. } => "uniforms",
            BoundResource::MeshUniforms => "mesh uniforms",
            BoundResource::Storage { .. } => "storage",
            BoundResource::Layers => "layers",
            BoundResource::Sampler { .. } => "sampler",
            BoundResource::StorageTexture { .. } => "storage texture",
            BoundResource::Texture2D { .. } => "texture",
            BoundResource::TextureDepth2D { .. } => "depth texture",
            BoundResource::Texture2DArray { .. } => "texture array",
            BoundResource::ExternalTexture { .. } => "external texture",
            BoundResource::BindingTextureWrite { .. } => "binding texture (write)",
            BoundResource::BindingTextureRead { .. } => "binding texture (read)",
        }
    }
}

/// One binding slot of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingAssignment {
    pub resource: BoundResource,
    pub stage: Stage,
    pub group: u32,
    pub binding: u32,
    pub access: AccessMode,
}

impl Display for BindingAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} `{}` ({})",
            self.resource.kind_label(),
            self.resource.name(),
            self.access.wgsl_name()
        )
    }
}

/// The bindings of one group in one stage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledBindings {
    pub group: u32,
    /// WGSL declarations, one per line.
    pub text: String,
    pub assignments: Vec<BindingAssignment>,
}

/// A binding before its index is known.
struct Candidate {
    resource: BoundResource,
    access: AccessMode,
    declaration: String,
}

impl Candidate {
    fn new(resource: BoundResource, access: AccessMode, declaration: String) -> Self {
        Candidate {
            resource,
            access,
            declaration,
        }
    }
}

fn storage_declaration(name: &str, access: AccessMode, ty: impl Display) -> String {
    format!("var<storage, {}> {name}: {ty};", access.wgsl_name())
}

fn storage_texture_declaration(name: &str, format: StorageFormat) -> String {
    format!("var {name}: texture_storage_2d<{}, write>;", format.wgsl_name())
}

/// The binding `resource` receives in `stage` of `pass`, if any.
fn candidate(resource: &Resource, pass: PassContext, stage: Stage) -> Option<Candidate> {
    match resource {
        Resource::Storage(storage) => {
            let access = resolve(stage, storage.visibility).mode()?;
            Some(Candidate::new(
                BoundResource::Storage {
                    name: storage.name.clone(),
                    readable: storage.readable,
                },
                access,
                storage_declaration(&storage.name, access, &storage.r#type),
            ))
        }
        Resource::Layers(layers) => {
            let access = resolve(stage, layers.visibility).mode()?;
            Some(Candidate::new(
                BoundResource::Layers,
                access,
                storage_declaration(Layers::NAME, access, layers.r#type()),
            ))
        }
        Resource::Sampler(sampler) => sampler.visibility.includes(stage).then(|| {
            Candidate::new(
                BoundResource::Sampler {
                    name: sampler.name.clone(),
                    r#type: sampler.r#type,
                },
                AccessMode::Read,
                format!("var {}: {};", sampler.name, sampler.r#type.wgsl_type()),
            )
        }),
        Resource::StorageTexture(texture) => (stage != Stage::Vertex
            && texture.visibility.includes(stage))
        .then(|| {
            Candidate::new(
                BoundResource::StorageTexture {
                    name: texture.name.clone(),
                    format: texture.format,
                },
                AccessMode::ReadWrite,
                storage_texture_declaration(&texture.name, texture.format),
            )
        }),
        Resource::Texture2D(texture) => texture.visibility.includes(stage).then(|| {
            Candidate::new(
                BoundResource::Texture2D {
                    name: texture.name.clone(),
                },
                AccessMode::Read,
                format!("var {}: texture_2d<f32>;", texture.name),
            )
        }),
        Resource::TextureDepth2D(texture) => (texture.visibility.includes(stage)
            && texture.written_by_pass != Some(pass.index))
        .then(|| {
            Candidate::new(
                BoundResource::TextureDepth2D {
                    name: texture.name.clone(),
                },
                AccessMode::Read,
                format!("var {}: texture_depth_2d;", texture.name),
            )
        }),
        Resource::Texture2DArray(texture) => texture.visibility.includes(stage).then(|| {
            Candidate::new(
                BoundResource::Texture2DArray {
                    name: texture.name.clone(),
                },
                AccessMode::Read,
                format!("var {}: texture_2d_array<f32>;", texture.name),
            )
        }),
        Resource::ExternalTexture(texture) => texture.visibility.includes(stage).then(|| {
            Candidate::new(
                BoundResource::ExternalTexture {
                    name: texture.name.clone(),
                },
                AccessMode::Read,
                format!("var {}: texture_external;", texture.name),
            )
        }),
        Resource::BindingTexture(texture) => match stage {
            Stage::Vertex => None,
            Stage::Compute => texture
                .passes
                .is_none_or(|(write, _)| write == pass.index)
                .then(|| {
                    Candidate::new(
                        BoundResource::BindingTextureWrite {
                            name: texture.write_name.clone(),
                            format: texture.format,
                        },
                        AccessMode::ReadWrite,
                        storage_texture_declaration(&texture.write_name, texture.format),
                    )
                }),
            Stage::Fragment => texture
                .passes
                .is_none_or(|(_, read)| read == pass.index)
                .then(|| {
                    Candidate::new(
                        BoundResource::BindingTextureRead {
                            name: texture.read_name.clone(),
                        },
                        AccessMode::Read,
                        format!("var {}: texture_2d<f32>;", texture.read_name),
                    )
                }),
        },
    }
}

/// Computes the bindings of `group` for `stage` of `pass`.
pub fn synthesize(resources: &Resources, pass: PassContext, stage: Stage, group: u32) -> CompiledBindings {
    let internal = group == INTERNAL_GROUP;
    let mut candidates = Vec::new();

    if resources.uniforms(internal).next().is_some() {
        let (var, struct_name) = if internal {
            (INTERNAL_UNIFORM_VAR, INTERNAL_UNIFORM_STRUCT)
        } else {
            (UNIFORM_VAR, UNIFORM_STRUCT)
        };
        candidates.push(Candidate::new(
            BoundResource::Uniforms { internal },
            AccessMode::Read,
            format!("var<uniform> {var}: {struct_name};"),
        ));
    }
    if group == pass.group() && resources.mesh_uniforms(pass.index).next().is_some() {
        candidates.push(Candidate::new(
            BoundResource::MeshUniforms,
            AccessMode::Read,
            format!("var<uniform> {MESH_VAR}: {MESH_STRUCT};"),
        ));
    }
    candidates.extend(
        resources
            .in_binding_order()
            .into_iter()
            .filter(|r| r.internal() == internal)
            .filter_map(|r| candidate(r, pass, stage)),
    );

    let mut compiled = CompiledBindings {
        group,
        ..Default::default()
    };
    let mut next = 0;
    for candidate in candidates {
        compiled.text.push_str(&format!(
            "@group({group}) @binding({next}) {}\n",
            candidate.declaration
        ));
        let assignment = BindingAssignment {
            resource: candidate.resource,
            stage,
            group,
            binding: next,
            access: candidate.access,
        };
        logwise::trace_sync!(
            "pass {pass} {stage} @group({group}) @binding({binding}): {assignment}",
            pass = pass.index,
            stage = logwise::privacy::LogIt(&stage),
            group = group,
            binding = next,
            assignment = logwise::privacy::LogIt(&assignment.to_string())
        );
        compiled.assignments.push(assignment);
        next += 1;
    }
    compiled
}

fn describe(assignment: Option<&BindingAssignment>) -> String {
    assignment.map_or_else(|| "nothing".to_string(), ToString::to_string)
}

/// Checks that `refreshed` binds the same resources, in the same slots with the same access,
/// as `layout`.
pub fn verify_refresh(layout: &[BindingAssignment], refreshed: &[BindingAssignment]) -> Result<(), Error> {
    let len = layout.len().max(refreshed.len());
    for i in 0..len {
        let expected = layout.get(i);
        let found = refreshed.get(i);
        let same = match (expected, found) {
            (Some(e), Some(f)) => {
                e.binding == f.binding && e.resource == f.resource && e.access == f.access
            }
            _ => false,
        };
        if !same {
            return Err(Error::BindingMismatch {
                binding: u32::try_from(i).unwrap_or(u32::MAX),
                expected: describe(expected),
                found: describe(found),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::resources::{BindingTextureOptions, DeclareOptions, StorageOptions};
    use crate::bindings::visible_to::StageSet;

    const USER_PASS: PassContext = PassContext {
        index: 0,
        internal: false,
    };

    fn names(compiled: &CompiledBindings) -> Vec<&str> {
        compiled.assignments.iter().map(|a| a.resource.name()).collect()
    }

    fn sample_resources() -> Resources {
        let mut r = Resources::new();
        r.declare_uniform("time", 0.0f32, "f32");
        r.declare_texture("albedo", DeclareOptions::visible_to(StageSet::FRAGMENT));
        r.declare_sampler("linear", SamplerType::Filtering, DeclareOptions::default());
        r.declare_storage(
            "particles",
            "array<vec4f, 16>",
            StorageOptions {
                visibility: StageSet::COMPUTE | StageSet::VERTEX,
                ..Default::default()
            },
        )
        .unwrap();
        r.declare_storage_texture("out", StorageFormat::Rgba8Unorm, DeclareOptions::default());
        r
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn category_order_and_indices() {
        let r = sample_resources();
        let fragment = synthesize(&r, USER_PASS, Stage::Fragment, USER_GROUP);
        assert_eq!(names(&fragment), ["params", "linear", "out", "albedo"]);
        let bindings: Vec<u32> = fragment.assignments.iter().map(|a| a.binding).collect();
        assert_eq!(bindings, [0, 1, 2, 3]);
        assert_eq!(
            fragment.text,
            "@group(0) @binding(0) var<uniform> params: Params;\n\
             @group(0) @binding(1) var linear: sampler;\n\
             @group(0) @binding(2) var out: texture_storage_2d<rgba8unorm, write>;\n\
             @group(0) @binding(3) var albedo: texture_2d<f32>;\n"
        );

        let vertex = synthesize(&r, USER_PASS, Stage::Vertex, USER_GROUP);
        assert_eq!(names(&vertex), ["params", "particles", "linear"]);
        assert_eq!(vertex.assignments[1].access, AccessMode::Read);
        assert!(vertex.text.contains("var<storage, read> particles: array<vec4f,16>;"));

        let compute = synthesize(&r, USER_PASS, Stage::Compute, USER_GROUP);
        assert_eq!(names(&compute), ["params", "particles", "linear", "out"]);
        assert_eq!(compute.assignments[1].access, AccessMode::ReadWrite);
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn groups_do_not_mix() {
        let mut r = sample_resources();
        r.declare_internal_uniform("exposure", 1.0f32, "f32");
        r.declare_texture("history", DeclareOptions::default().internal());
        let user = synthesize(&r, USER_PASS, Stage::Fragment, USER_GROUP);
        assert!(!names(&user).contains(&"history"));
        let internal_pass = PassContext {
            index: 1,
            internal: true,
        };
        let internal = synthesize(&r, internal_pass, Stage::Fragment, INTERNAL_GROUP);
        assert_eq!(names(&internal), ["internal_params", "history"]);
        assert!(internal.text.starts_with("@group(1) @binding(0) var<uniform> internal_params: InternalParams;"));
        assert_eq!(internal_pass.groups(), &[USER_GROUP, INTERNAL_GROUP]);
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn mesh_block_follows_uniform_block() {
        let mut r = Resources::new();
        r.declare_mesh_uniform(0, "tint", [1.0f32, 1.0, 1.0, 1.0], "vec4f");
        r.declare_uniform("time", 0.0f32, "f32");
        let pass0 = synthesize(&r, USER_PASS, Stage::Vertex, USER_GROUP);
        assert_eq!(names(&pass0), ["params", "mesh"]);
        let pass1 = PassContext {
            index: 1,
            internal: false,
        };
        assert_eq!(names(&synthesize(&r, pass1, Stage::Vertex, USER_GROUP)), ["params"]);
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn depth_texture_skipped_in_writing_pass() {
        let mut r = Resources::new();
        r.declare_depth_texture("shadow", Some(0), DeclareOptions::default());
        assert!(synthesize(&r, USER_PASS, Stage::Fragment, USER_GROUP).assignments.is_empty());
        let pass1 = PassContext {
            index: 1,
            internal: false,
        };
        let bound = synthesize(&r, pass1, Stage::Fragment, USER_GROUP);
        assert_eq!(bound.text, "@group(0) @binding(0) var shadow: texture_depth_2d;\n");
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn binding_textures_never_in_vertex() {
        let mut r = Resources::new();
        r.declare_binding_texture(
            "trail_out",
            "trail_in",
            BindingTextureOptions {
                format: StorageFormat::Rgba16Float,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(synthesize(&r, USER_PASS, Stage::Vertex, USER_GROUP).assignments.is_empty());
        let compute = synthesize(&r, USER_PASS, Stage::Compute, USER_GROUP);
        assert_eq!(
            compute.text,
            "@group(0) @binding(0) var trail_out: texture_storage_2d<rgba16float, write>;\n"
        );
        let fragment = synthesize(&r, USER_PASS, Stage::Fragment, USER_GROUP);
        assert_eq!(fragment.text, "@group(0) @binding(0) var trail_in: texture_2d<f32>;\n");
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn pinned_binding_texture() {
        let mut r = Resources::new();
        r.declare_binding_texture(
            "w",
            "r",
            BindingTextureOptions {
                write_pass: Some(0),
                read_pass: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
        let pass1 = PassContext {
            index: 1,
            internal: false,
        };
        assert_eq!(synthesize(&r, USER_PASS, Stage::Compute, USER_GROUP).assignments.len(), 1);
        assert!(synthesize(&r, USER_PASS, Stage::Fragment, USER_GROUP).assignments.is_empty());
        assert!(synthesize(&r, pass1, Stage::Compute, USER_GROUP).assignments.is_empty());
        assert_eq!(synthesize(&r, pass1, Stage::Fragment, USER_GROUP).assignments.len(), 1);
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn refresh() {
        let r = sample_resources();
        let first = synthesize(&r, USER_PASS, Stage::Fragment, USER_GROUP);
        let second = synthesize(&r, USER_PASS, Stage::Fragment, USER_GROUP);
        assert_eq!(first, second);
        verify_refresh(&first.assignments, &second.assignments).unwrap();

        let mut reordered = second.assignments.clone();
        reordered.swap(1, 2);
        let err = verify_refresh(&first.assignments, &reordered).unwrap_err();
        assert!(matches!(err, Error::BindingMismatch { binding: 1, .. }));

        let err = verify_refresh(&first.assignments, &second.assignments[..3]).unwrap_err();
        assert_eq!(
            err,
            Error::BindingMismatch {
                binding: 3,
                expected: "texture `albedo` (read)".to_string(),
                found: "nothing".to_string()
            }
        );
    }
}
